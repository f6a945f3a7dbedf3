//! One front end wired to one endpoint and one output area.
//!
//! Submissions may overlap; each one takes a ticket and only the newest
//! ticket is allowed to touch the pane, so a slow early response can never
//! overwrite a later one.

use std::str::FromStr;
use std::sync::{Mutex, MutexGuard, PoisonError};

use serde_json::Value;
use tracing::{debug, error, info};

use crate::client::{Endpoint, SitemapClient};
use crate::composer::{compose, FormFields, Validation};
use crate::config::Config;
use crate::error::{AppError, Result};
use crate::render::{render, RenderMode, Rendering, ResultPane};

/// How transport failures reach the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reporting {
    Alert,
    Log,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Surface {
    pub name: &'static str,
    pub endpoint: Endpoint,
    pub validation: Validation,
    pub mode: RenderMode,
    pub shows_processing: bool,
    pub reporting: Reporting,
    pub missing_message: &'static str,
}

impl Surface {
    pub const POPUP: Surface = Surface {
        name: "popup",
        endpoint: Endpoint::ParseSitemap,
        validation: Validation::UrlOnly,
        mode: RenderMode::Verbatim,
        shows_processing: true,
        reporting: Reporting::Alert,
        missing_message: "Please enter a sitemap URL",
    };

    pub const INDEX: Surface = Surface {
        name: "index",
        endpoint: Endpoint::FetchSitemap,
        validation: Validation::UrlOnly,
        mode: RenderMode::Verbatim,
        shows_processing: false,
        reporting: Reporting::Log,
        missing_message: "Please enter a sitemap URL.",
    };

    pub const PAGE: Surface = Surface {
        name: "page",
        endpoint: Endpoint::Crawl,
        validation: Validation::UrlAndDates,
        mode: RenderMode::Listing,
        shows_processing: false,
        reporting: Reporting::Alert,
        missing_message: "Please enter all required fields.",
    };

    /// Same surface pointed at another endpoint, e.g. the page layout served
    /// by the relay, which talks to the backend's `/parse_sitemap` directly.
    pub fn with_endpoint(self, endpoint: Endpoint) -> Self {
        Surface { endpoint, ..self }
    }
}

impl FromStr for Surface {
    type Err = String;

    fn from_str(input: &str) -> std::result::Result<Self, Self::Err> {
        match input.to_lowercase().as_str() {
            "popup" => Ok(Surface::POPUP),
            "index" => Ok(Surface::INDEX),
            "page" => Ok(Surface::PAGE),
            _ => Err(format!("Invalid surface: {} (expected popup, index or page)", input)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// The response was rendered into the pane.
    Applied,
    /// A newer submission started meanwhile; this response was dropped.
    Superseded,
}

/// Output area plus the newest ticket handed out; one lock guards both.
#[derive(Debug, Default)]
struct PaneState {
    pane: ResultPane,
    latest: u64,
}

#[derive(Debug)]
pub struct Session {
    surface: Surface,
    client: SitemapClient,
    state: Mutex<PaneState>,
}

impl Session {
    pub fn new(surface: Surface, client: SitemapClient) -> Self {
        Session {
            surface,
            client,
            state: Mutex::new(PaneState::default()),
        }
    }

    pub fn from_config(surface: Surface, config: &Config) -> Result<Self> {
        let client = match config.request_timeout {
            Some(timeout) => SitemapClient::with_timeout(&config.backend_url, surface.endpoint, timeout)?,
            None => SitemapClient::new(&config.backend_url, surface.endpoint)?,
        };
        Ok(Session::new(surface, client))
    }

    pub fn surface(&self) -> Surface {
        self.surface
    }

    pub fn client(&self) -> &SitemapClient {
        &self.client
    }

    /// Snapshot of the output area.
    pub fn pane(&self) -> ResultPane {
        self.lock_state().pane.clone()
    }

    fn lock_state(&self) -> MutexGuard<'_, PaneState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Validates, sends one request and renders the answer if it is still the newest.
    pub async fn submit(&self, fields: &FormFields) -> Result<Delivery> {
        let request = compose(fields, self.surface.validation, self.surface.missing_message)?;
        let ticket = self.begin();
        let outcome = self.client.submit(&request).await;
        self.complete(ticket, outcome)
    }

    pub fn begin(&self) -> Ticket {
        let mut state = self.lock_state();
        state.latest += 1;
        let ticket = Ticket(state.latest);
        if self.surface.shows_processing {
            state.pane.show_processing();
        }
        debug!(surface = self.surface.name, ticket = ticket.0, "Request started");
        ticket
    }

    /// Applies a finished request. Stale tickets are dropped whatever their
    /// outcome; failures never modify the pane.
    pub fn complete(&self, ticket: Ticket, outcome: Result<Value>) -> Result<Delivery> {
        let mut state = self.lock_state();
        let latest = state.latest;
        if ticket.0 != latest {
            info!(surface = self.surface.name, ticket = ticket.0, latest, "Discarding stale response");
            return Ok(Delivery::Superseded);
        }

        match render(&outcome?, self.surface.mode)? {
            Rendering::Content(content) => {
                state.pane.apply(content);
                Ok(Delivery::Applied)
            }
            Rendering::BackendError(message) => Err(AppError::BackendError(message)),
        }
    }

    /// Text to alert for `err`, or `None` when this surface only logs it.
    pub fn report(&self, err: &AppError) -> Option<String> {
        match err {
            AppError::FetchError(_) | AppError::DecodeError(_) => match self.surface.reporting {
                Reporting::Alert => Some(format!("Failed to fetch data: {}", err.message())),
                Reporting::Log => {
                    error!(surface = self.surface.name, %err, "Error fetching sitemap");
                    None
                }
            },
            AppError::Validation(msg) => Some(msg.clone()),
            other => Some(other.to_string()),
        }
    }
}
