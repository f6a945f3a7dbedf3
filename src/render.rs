//! Output area model and the rules that turn a backend payload into it.
//!
//! The payload is untrusted: only the presence of `error` and `urls` is
//! inspected, everything else is displayed as-is or ignored.

use std::fmt;

use serde_json::Value;

use crate::error::{AppError, Result};

pub const PROCESSING_TEXT: &str = "Processing...";
pub const NO_URLS_TEXT: &str = "No URLs found for the given criteria.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    /// Dump the whole payload as pretty-printed JSON.
    Verbatim,
    /// Render the `urls` mapping as one heading and list per sitemap.
    Listing,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SitemapSection {
    pub sitemap: String,
    pub urls: Vec<String>,
}

impl SitemapSection {
    pub fn heading(&self) -> String {
        format!("Sitemap: {}", self.sitemap)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum PaneContent {
    #[default]
    Blank,
    Processing,
    Json(String),
    Sections(Vec<SitemapSection>),
    NoUrls,
}

/// What a payload turned into: new pane content, or a backend-reported error
/// that must leave the pane alone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rendering {
    Content(PaneContent),
    BackendError(String),
}

pub fn render(payload: &Value, mode: RenderMode) -> Result<Rendering> {
    match mode {
        RenderMode::Verbatim => Ok(Rendering::Content(PaneContent::Json(pretty_json(payload)?))),
        RenderMode::Listing => render_listing(payload),
    }
}

fn pretty_json(payload: &Value) -> Result<String> {
    serde_json::to_string_pretty(payload).map_err(|e| AppError::DecodeError(e.to_string()))
}

fn render_listing(payload: &Value) -> Result<Rendering> {
    if let Some(error) = payload.get("error").filter(|e| is_truthy(e)) {
        let message = match error {
            Value::String(text) => text.clone(),
            other => other.to_string(),
        };
        return Ok(Rendering::BackendError(message));
    }

    let urls = match payload.get("urls") {
        None => return Ok(Rendering::Content(PaneContent::NoUrls)),
        Some(value) if !is_truthy(value) => return Ok(Rendering::Content(PaneContent::NoUrls)),
        Some(Value::Array(items)) if items.is_empty() => return Ok(Rendering::Content(PaneContent::NoUrls)),
        Some(Value::Object(map)) => map,
        Some(other) => {
            return Err(AppError::DecodeError(format!(
                "Expected `urls` to be an object, got {}",
                type_name(other)
            )));
        }
    };

    if urls.is_empty() {
        return Ok(Rendering::Content(PaneContent::NoUrls));
    }

    let mut sections = Vec::with_capacity(urls.len());
    for (sitemap, entries) in urls {
        let entries = entries.as_array().ok_or_else(|| {
            AppError::DecodeError(format!(
                "Expected a list of URLs for sitemap {}, got {}",
                sitemap,
                type_name(entries)
            ))
        })?;

        let urls = entries
            .iter()
            .map(|entry| match entry {
                Value::String(text) => text.clone(),
                other => other.to_string(),
            })
            .collect();

        sections.push(SitemapSection {
            sitemap: sitemap.clone(),
            urls,
        });
    }

    Ok(Rendering::Content(PaneContent::Sections(sections)))
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::String(text) => !text.is_empty(),
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// The designated output area of a surface.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultPane {
    content: PaneContent,
    copy_visible: bool,
}

impl ResultPane {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn content(&self) -> &PaneContent {
        &self.content
    }

    pub fn copy_visible(&self) -> bool {
        self.copy_visible
    }

    pub fn show_processing(&mut self) {
        self.content = PaneContent::Processing;
    }

    /// Replaces the previous content. The copy control only appears once a
    /// list has been rendered and stays visible afterwards.
    pub fn apply(&mut self, content: PaneContent) {
        if matches!(content, PaneContent::Sections(_)) {
            self.copy_visible = true;
        }
        self.content = content;
    }

    /// Every rendered list item in display order, one per line.
    pub fn copyable_text(&self) -> String {
        match &self.content {
            PaneContent::Sections(sections) => sections
                .iter()
                .flat_map(|section| section.urls.iter().map(String::as_str))
                .collect::<Vec<_>>()
                .join("\n"),
            _ => String::new(),
        }
    }
}

impl fmt::Display for ResultPane {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.content {
            PaneContent::Blank => Ok(()),
            PaneContent::Processing => write!(f, "{}", PROCESSING_TEXT),
            PaneContent::Json(text) => write!(f, "{}", text),
            PaneContent::NoUrls => write!(f, "{}", NO_URLS_TEXT),
            PaneContent::Sections(sections) => {
                for (index, section) in sections.iter().enumerate() {
                    if index > 0 {
                        writeln!(f)?;
                    }
                    writeln!(f, "{}", section.heading())?;
                    for url in &section.urls {
                        writeln!(f, "  - {}", url)?;
                    }
                }
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn listing(payload: Value) -> Rendering {
        render(&payload, RenderMode::Listing).unwrap()
    }

    #[test]
    fn urls_render_as_sections_in_order() {
        let rendering = listing(json!({ "urls": { "sitemap1": ["https://a", "https://b"] } }));
        let Rendering::Content(content) = rendering else {
            panic!("expected content");
        };

        let mut pane = ResultPane::new();
        pane.apply(content);

        let PaneContent::Sections(sections) = pane.content() else {
            panic!("expected sections");
        };
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].heading(), "Sitemap: sitemap1");
        assert_eq!(sections[0].urls, vec!["https://a", "https://b"]);
        assert!(pane.copy_visible());
        assert_eq!(pane.copyable_text(), "https://a\nhttps://b");
    }

    #[test]
    fn sitemap_keys_keep_backend_order() {
        let payload: Value = serde_json::from_str(
            r#"{"urls": {"zeta": ["https://z"], "alpha": ["https://a1", "https://a2"]}}"#,
        )
        .unwrap();
        let Rendering::Content(PaneContent::Sections(sections)) = listing(payload) else {
            panic!("expected sections");
        };
        let names: Vec<_> = sections.iter().map(|s| s.sitemap.as_str()).collect();
        assert_eq!(names, vec!["zeta", "alpha"]);

        let mut pane = ResultPane::new();
        pane.apply(PaneContent::Sections(sections));
        assert_eq!(pane.copyable_text(), "https://z\nhttps://a1\nhttps://a2");
    }

    #[test]
    fn empty_or_missing_urls_show_no_urls_message() {
        let payloads = [
            json!({ "urls": {} }),
            json!({ "sitemaps": {} }),
            json!({ "urls": null }),
            json!({ "urls": [] }),
            json!({ "urls": false }),
            json!({ "urls": "" }),
            json!({ "urls": 0 }),
        ];
        for payload in payloads {
            let Rendering::Content(content) = listing(payload) else {
                panic!("expected content");
            };
            let mut pane = ResultPane::new();
            pane.apply(content);
            assert_eq!(pane.to_string(), NO_URLS_TEXT);
            assert!(!pane.copy_visible());
        }
    }

    #[test]
    fn backend_error_wins_over_urls() {
        assert_eq!(
            listing(json!({ "error": "bad url", "urls": { "x": ["https://x"] } })),
            Rendering::BackendError("bad url".to_string())
        );
    }

    #[test]
    fn empty_error_field_is_ignored() {
        assert_eq!(
            listing(json!({ "error": "", "urls": {} })),
            Rendering::Content(PaneContent::NoUrls)
        );
    }

    #[test]
    fn malformed_urls_are_decode_errors() {
        assert!(render(&json!({ "urls": ["https://a"] }), RenderMode::Listing).is_err());
        assert!(render(&json!({ "urls": "https://a" }), RenderMode::Listing).is_err());
        assert!(render(&json!({ "urls": true }), RenderMode::Listing).is_err());
        assert!(render(&json!({ "urls": { "s": "https://a" } }), RenderMode::Listing).is_err());
    }

    #[test]
    fn verbatim_uses_two_space_indentation() {
        let rendering = render(&json!({ "foo": 1 }), RenderMode::Verbatim).unwrap();
        assert_eq!(rendering, Rendering::Content(PaneContent::Json("{\n  \"foo\": 1\n}".to_string())));
    }

    #[test]
    fn verbatim_dumps_errors_too() {
        let rendering = render(&json!({ "error": "bad url" }), RenderMode::Verbatim).unwrap();
        assert!(matches!(rendering, Rendering::Content(PaneContent::Json(text)) if text.contains("bad url")));
    }

    #[test]
    fn copy_before_listing_is_empty() {
        let mut pane = ResultPane::new();
        assert_eq!(pane.copyable_text(), "");
        pane.show_processing();
        assert_eq!(pane.to_string(), PROCESSING_TEXT);
        assert_eq!(pane.copyable_text(), "");
    }

    #[test]
    fn text_display_lists_each_section() {
        let mut pane = ResultPane::new();
        pane.apply(PaneContent::Sections(vec![
            SitemapSection { sitemap: "one".into(), urls: vec!["https://a".into()] },
            SitemapSection { sitemap: "two".into(), urls: vec!["https://b".into()] },
        ]));
        assert_eq!(
            pane.to_string(),
            "Sitemap: one\n  - https://a\n\nSitemap: two\n  - https://b\n"
        );
    }
}
