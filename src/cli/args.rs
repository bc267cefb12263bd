use clap::{Args as ClapArgs, Parser, Subcommand, ValueEnum};
use std::net::SocketAddr;
use std::path::PathBuf;

use crate::config::defaults::{
    DEFAULT_HOST, DEFAULT_MAX_CONCURRENT_JOBS, DEFAULT_MAX_UPLOAD_BYTES, DEFAULT_PORT,
};
use crate::config::ServerConfig;
use crate::error::ConfigError;
use crate::model::{CompressionLevel, DEFAULT_COMPRESSION_LEVEL};

#[derive(Parser, Debug)]
#[command(name = "docpdf")]
#[command(
    author,
    version,
    about = "Convert Word documents to PDF, merge or zip the results, and compress PDFs"
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the HTTP service
    Serve(ServeArgs),
    /// Convert one or more .docx files to a PDF (or a ZIP of PDFs)
    Convert(ConvertArgs),
    /// Compress a PDF
    Compress(CompressArgs),
}

#[derive(ClapArgs, Debug, Clone)]
pub struct ServeArgs {
    /// Address to bind
    #[arg(long, env = "DOCPDF_HOST", default_value = DEFAULT_HOST)]
    pub host: String,

    /// Port to listen on
    #[arg(short, long, env = "DOCPDF_PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Maximum accepted request body in bytes
    #[arg(long, env = "DOCPDF_MAX_UPLOAD_BYTES", default_value_t = DEFAULT_MAX_UPLOAD_BYTES)]
    pub max_upload_bytes: usize,

    /// Compression level used when a request does not name one
    #[arg(
        long,
        env = "DOCPDF_DEFAULT_COMPRESSION_LEVEL",
        default_value_t = DEFAULT_COMPRESSION_LEVEL,
        value_parser = clap::value_parser!(u8).range(0..=100)
    )]
    pub default_compression_level: u8,

    /// Maximum number of conversions running at once
    #[arg(long, env = "DOCPDF_MAX_CONCURRENT_JOBS", default_value_t = DEFAULT_MAX_CONCURRENT_JOBS)]
    pub max_concurrent_jobs: usize,

    /// Page size of generated PDFs
    #[arg(short = 's', long, value_enum, env = "DOCPDF_PAGE_SIZE", default_value = "a4")]
    pub page_size: PageSize,
}

#[derive(ClapArgs, Debug, Clone)]
pub struct ConvertArgs {
    /// Input .docx files, converted in the given order
    #[arg(required = true)]
    pub inputs: Vec<PathBuf>,

    /// Package one PDF per input into a ZIP instead of merging
    #[arg(long)]
    pub zip: bool,

    /// Output path (defaults to converted-documents.pdf / .zip)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Page size
    #[arg(short = 's', long, value_enum, default_value = "a4")]
    pub page_size: PageSize,

    /// Print "Document: <name>" at the top of each converted document
    #[arg(long)]
    pub title: bool,
}

#[derive(ClapArgs, Debug, Clone)]
pub struct CompressArgs {
    /// Input PDF file
    #[arg(required = true)]
    pub input: PathBuf,

    /// Compression level, 0 (lossless only) to 100 (most aggressive)
    #[arg(
        short,
        long,
        default_value_t = DEFAULT_COMPRESSION_LEVEL,
        value_parser = clap::value_parser!(u8).range(0..=100)
    )]
    pub level: u8,

    /// Output path (defaults to compressed_<name>.pdf next to the input)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum, Default)]
pub enum PageSize {
    #[default]
    A4,
    Letter,
}

impl PageSize {
    pub fn dimensions_mm(&self) -> (f32, f32) {
        match self {
            PageSize::A4 => (210.0, 297.0),
            PageSize::Letter => (215.9, 279.4),
        }
    }
}

impl ServeArgs {
    /// Validate and collect the server options
    pub fn to_config(&self) -> Result<ServerConfig, ConfigError> {
        let addr: SocketAddr = format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| ConfigError::Address(format!("{}:{} ({})", self.host, self.port, e)))?;
        if self.max_upload_bytes == 0 {
            return Err(ConfigError::Limit("max upload size must be positive".into()));
        }
        if self.max_concurrent_jobs == 0 {
            return Err(ConfigError::Limit(
                "max concurrent jobs must be positive".into(),
            ));
        }
        Ok(ServerConfig {
            addr,
            max_upload_bytes: self.max_upload_bytes,
            default_compression_level: CompressionLevel::new(
                self.default_compression_level as i64,
            )?,
            max_concurrent_jobs: self.max_concurrent_jobs,
            page_size: self.page_size,
        })
    }
}

impl ConvertArgs {
    pub fn output_path(&self) -> PathBuf {
        self.output.clone().unwrap_or_else(|| {
            PathBuf::from(if self.zip {
                crate::model::ARCHIVE_FILENAME
            } else {
                crate::model::MERGED_FILENAME
            })
        })
    }
}

impl CompressArgs {
    /// Defaults to `compressed_<stem>.pdf` in the input's directory
    pub fn output_path(&self) -> PathBuf {
        self.output.clone().unwrap_or_else(|| {
            let stem = self
                .input
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| "document".to_string());
            self.input.with_file_name(format!("compressed_{}.pdf", stem))
        })
    }
}
