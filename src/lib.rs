pub mod api;
pub mod client;
pub mod clipboard;
pub mod composer;
pub mod config;
pub mod error;
pub mod render;
pub mod session;

use std::sync::Arc;
use client::{Endpoint, SitemapClient};
use config::Config;
use error::Result;

/// Application state that will be shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    /// Client for the backend's `/parse_sitemap`, shared by every relay route.
    pub client: SitemapClient,
}

impl AppState {
    pub fn new(config: Config) -> Result<Self> {
        let client = match config.request_timeout {
            Some(timeout) => SitemapClient::with_timeout(&config.backend_url, Endpoint::ParseSitemap, timeout)?,
            None => SitemapClient::new(&config.backend_url, Endpoint::ParseSitemap)?,
        };
        Ok(AppState {
            config: Arc::new(config),
            client,
        })
    }
}
