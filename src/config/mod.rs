pub mod defaults;
mod server;
mod settings;

pub use server::ServerConfig;
pub use settings::{Settings, MM_TO_PT, PT_TO_MM};
