use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Body posted to the backend; built fresh for every submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SitemapRequest {
    // Missing URLs are forwarded as empty; the backend owns that check.
    #[serde(default)]
    pub sitemap_url: String,
    #[serde(default)]
    pub start_date: String,
    #[serde(default)]
    pub end_date: String,
    #[serde(default)]
    pub content_filter: String,
}

/// Message accepted by the background relay endpoint.
#[derive(Debug, Deserialize)]
pub struct RelayMessage {
    pub action: String,
    #[serde(flatten)]
    pub request: SitemapRequest,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct RelayReply {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Fields submitted by the HTML form on the relay page.
#[derive(Debug, Default, Deserialize)]
pub struct PageForm {
    #[serde(default)]
    pub sitemap_url: String,
    #[serde(default)]
    pub start_date: String,
    #[serde(default)]
    pub end_date: String,
    #[serde(default)]
    pub content_filter: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn request_serializes_with_backend_field_names() {
        let request = SitemapRequest {
            sitemap_url: "https://example.com/sitemap.xml".into(),
            start_date: "2024-01-01".into(),
            end_date: "2024-02-01".into(),
            content_filter: String::new(),
        };
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({
                "sitemap_url": "https://example.com/sitemap.xml",
                "start_date": "2024-01-01",
                "end_date": "2024-02-01",
                "content_filter": ""
            })
        );
    }

    #[test]
    fn relay_message_flattens_request_fields() {
        let message: RelayMessage = serde_json::from_value(json!({
            "action": "parse_sitemap",
            "sitemap_url": "https://example.com/sitemap.xml",
            "start_date": "2024-01-01"
        }))
        .unwrap();
        assert_eq!(message.action, "parse_sitemap");
        assert_eq!(message.request.start_date, "2024-01-01");
        assert_eq!(message.request.end_date, "");
    }

    #[test]
    fn relay_message_without_url_still_parses() {
        let message: RelayMessage =
            serde_json::from_value(json!({ "action": "parse_sitemap", "start_date": "2024-01-01" })).unwrap();
        assert_eq!(message.request.sitemap_url, "");
    }

    #[test]
    fn reply_omits_absent_fields() {
        let reply = RelayReply { success: false, data: None, error: Some("down".into()) };
        assert_eq!(serde_json::to_value(&reply).unwrap(), json!({ "success": false, "error": "down" }));
    }
}
