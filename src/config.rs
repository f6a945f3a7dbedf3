use std::env;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;
use url::Url;
use crate::error::{AppError, Result};

pub const DEFAULT_BACKEND_URL: &str = "http://127.0.0.1:8000";

#[derive(Clone, Debug)]
pub struct Config {
    pub server_addr: SocketAddr,
    pub backend_url: Url,
    /// Unset means requests wait for the backend indefinitely.
    pub request_timeout: Option<Duration>,
}

impl Config {
    pub fn load() -> Result<Self> {
        // Load environment variables from .env file if it exists
        dotenv::dotenv().ok();

        let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("PORT").unwrap_or_else(|_| "3000".to_string());
        let backend = env::var("SITEMAP_BACKEND_URL").unwrap_or_else(|_| DEFAULT_BACKEND_URL.to_string());
        let timeout = env::var("SITEMAP_TIMEOUT_SECS").ok();

        Self::from_parts(&host, &port, &backend, timeout.as_deref())
    }

    pub fn from_parts(host: &str, port: &str, backend: &str, timeout_secs: Option<&str>) -> Result<Self> {
        let port = port.parse::<u16>().map_err(|e| AppError::ConfigError(format!("Invalid port: {}", e)))?;
        let ip = IpAddr::from_str(host).map_err(|e| AppError::ConfigError(format!("Invalid host address: {}", e)))?;
        let backend_url = parse_backend_url(backend)?;

        let request_timeout = match timeout_secs {
            Some(raw) => {
                let secs = raw
                    .parse::<u64>()
                    .map_err(|e| AppError::ConfigError(format!("Invalid timeout: {}", e)))?;
                Some(Duration::from_secs(secs))
            }
            None => None,
        };

        Ok(Config {
            server_addr: SocketAddr::new(ip, port),
            backend_url,
            request_timeout,
        })
    }

    /// Base URL of this crate's own relay server, which is what serves `/crawl`.
    /// An unspecified bind address is reached through loopback.
    pub fn relay_url(&self) -> Result<Url> {
        let mut addr = self.server_addr;
        if addr.ip().is_unspecified() {
            let loopback = match addr.ip() {
                IpAddr::V4(_) => IpAddr::V4(Ipv4Addr::LOCALHOST),
                IpAddr::V6(_) => IpAddr::V6(Ipv6Addr::LOCALHOST),
            };
            addr.set_ip(loopback);
        }
        parse_backend_url(&format!("http://{}", addr))
    }
}

pub fn parse_backend_url(raw: &str) -> Result<Url> {
    let url = Url::parse(raw).map_err(|e| AppError::ConfigError(format!("Invalid backend URL: {}", e)))?;
    if url.cannot_be_a_base() {
        return Err(AppError::ConfigError(format!("Backend URL cannot be used as a base: {}", raw)));
    }
    Ok(url)
}
