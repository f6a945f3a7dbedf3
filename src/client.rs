use std::fmt;
use std::time::Duration;

use once_cell::sync::Lazy;
use reqwest::{Client, ClientBuilder};
use serde_json::Value;
use tracing::{debug, info};
use url::Url;

use crate::api::models::SitemapRequest;
use crate::error::{AppError, Result};

// Shared client so every surface reuses the same connection pool
static CLIENT: Lazy<Client> = Lazy::new(|| {
    ClientBuilder::new()
        .pool_max_idle_per_host(10)
        .build()
        .expect("Failed to build HTTP client")
});

/// The interchangeable backend routes used by the different surfaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    ParseSitemap,
    FetchSitemap,
    Crawl,
}

impl Endpoint {
    pub fn path(self) -> &'static str {
        match self {
            Endpoint::ParseSitemap => "parse_sitemap",
            Endpoint::FetchSitemap => "fetch_sitemap",
            Endpoint::Crawl => "crawl",
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}", self.path())
    }
}

/// Resolves an endpoint against the backend base, keeping any path prefix the base carries.
pub fn endpoint_url(base: &Url, endpoint: Endpoint) -> Result<Url> {
    let mut base = base.clone();
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    base.join(endpoint.path())
        .map_err(|e| AppError::ConfigError(format!("Invalid endpoint URL: {}", e)))
}

#[derive(Clone, Debug)]
pub struct SitemapClient {
    http: Client,
    endpoint: Endpoint,
    url: Url,
}

impl SitemapClient {
    pub fn new(base: &Url, endpoint: Endpoint) -> Result<Self> {
        Ok(SitemapClient {
            http: CLIENT.clone(),
            endpoint,
            url: endpoint_url(base, endpoint)?,
        })
    }

    /// Like [`SitemapClient::new`] but gives up on the backend after `timeout`.
    pub fn with_timeout(base: &Url, endpoint: Endpoint, timeout: Duration) -> Result<Self> {
        let http = ClientBuilder::new()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::ConfigError(format!("Failed to build HTTP client: {}", e)))?;
        Ok(SitemapClient {
            http,
            endpoint,
            url: endpoint_url(base, endpoint)?,
        })
    }

    pub fn endpoint(&self) -> Endpoint {
        self.endpoint
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Sends one POST and parses the body as JSON whatever the status code is;
    /// backends report their own errors inside the payload.
    pub async fn submit(&self, request: &SitemapRequest) -> Result<Value> {
        let (_, payload) = self.submit_with_status(request).await?;
        Ok(payload)
    }

    /// [`SitemapClient::submit`], also returning the backend's HTTP status code.
    pub async fn submit_with_status(&self, request: &SitemapRequest) -> Result<(u16, Value)> {
        info!(endpoint = %self.url, sitemap_url = %request.sitemap_url, "Submitting sitemap request");
        let start_time = std::time::Instant::now();

        let response = self.http.post(self.url.clone()).json(request).send().await?;
        let status = response.status();
        let body = response.bytes().await?;
        debug!(%status, bytes = body.len(), elapsed = ?start_time.elapsed(), "Backend responded");

        let payload = serde_json::from_slice(&body)
            .map_err(|e| AppError::DecodeError(format!("Backend returned invalid JSON ({}): {}", status, e)))?;
        Ok((status.as_u16(), payload))
    }
}
