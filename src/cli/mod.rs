mod args;

pub use args::{Args, Command, CompressArgs, ConvertArgs, PageSize, ServeArgs};
