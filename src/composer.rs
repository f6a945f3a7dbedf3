//! Turns raw form values into a [`SitemapRequest`], or refuses before any
//! network traffic happens.

use crate::api::models::SitemapRequest;
use crate::error::{AppError, Result};

/// Raw values as read from the input controls.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormFields {
    pub sitemap_url: String,
    pub start_date: String,
    pub end_date: String,
    pub content_filter: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Validation {
    /// Only the sitemap URL must be present.
    UrlOnly,
    /// The sitemap URL and both dates must be present.
    UrlAndDates,
}

/// Builds the request body. No format checks are made on any field: any
/// non-empty string is forwarded.
pub fn compose(fields: &FormFields, validation: Validation, missing_message: &str) -> Result<SitemapRequest> {
    let sitemap_url = fields.sitemap_url.trim();
    if sitemap_url.is_empty() {
        return Err(AppError::Validation(missing_message.to_string()));
    }

    if validation == Validation::UrlAndDates
        && (fields.start_date.trim().is_empty() || fields.end_date.trim().is_empty())
    {
        return Err(AppError::Validation(missing_message.to_string()));
    }

    Ok(SitemapRequest {
        sitemap_url: sitemap_url.to_string(),
        start_date: fields.start_date.clone(),
        end_date: fields.end_date.clone(),
        content_filter: fields.content_filter.trim().to_string(),
    })
}
