use std::net::{Ipv4Addr, SocketAddr};

use crate::cli::PageSize;
use crate::model::CompressionLevel;

use super::defaults::{DEFAULT_MAX_CONCURRENT_JOBS, DEFAULT_MAX_UPLOAD_BYTES, DEFAULT_PORT};
use super::Settings;

/// Process-wide configuration of the HTTP service, shared read-only by requests
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub addr: SocketAddr,
    pub max_upload_bytes: usize,
    pub default_compression_level: CompressionLevel,
    pub max_concurrent_jobs: usize,
    pub page_size: PageSize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: SocketAddr::from((Ipv4Addr::UNSPECIFIED, DEFAULT_PORT)),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            default_compression_level: CompressionLevel::default(),
            max_concurrent_jobs: DEFAULT_MAX_CONCURRENT_JOBS,
            page_size: PageSize::default(),
        }
    }
}

impl ServerConfig {
    /// Render settings used for every conversion request
    pub fn render_settings(&self) -> Settings {
        Settings::for_page_size(self.page_size)
    }
}
