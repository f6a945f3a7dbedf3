//! Server-rendered version of the sitemap search page.

use html_escape::{encode_double_quoted_attribute, encode_text};

use crate::composer::FormFields;
use crate::render::{PaneContent, ResultPane, NO_URLS_TEXT, PROCESSING_TEXT};

const STYLE: &str = "body{font-family:sans-serif;max-width:48rem;margin:2rem auto;padding:0 1rem}\
label{display:block;margin-top:.75rem}\
input{width:100%;padding:.4rem;box-sizing:border-box}\
button{margin-top:1rem;padding:.5rem 1rem}\
.alert{background:#fdecea;border:1px solid #f5c2c0;padding:.75rem;margin:1rem 0}\
pre{background:#f6f8fa;padding:1rem;overflow:auto}\
#copyText{position:absolute;left:-9999px}";

const COPY_SCRIPT: &str = "function copyUrls(){\
navigator.clipboard.writeText(document.getElementById('copyText').value)\
.then(function(){alert('URLs copied to clipboard!');})\
.catch(function(err){alert('Failed to copy: '+err);});}";

pub fn render_page(fields: &FormFields, pane: &ResultPane, alert: Option<&str>) -> String {
    let mut html = String::with_capacity(2048);
    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"UTF-8\">\n");
    html.push_str("<title>Sitemap URL Finder</title>\n");
    html.push_str(&format!("<style>{}</style>\n", STYLE));
    html.push_str("</head>\n<body>\n<h1>Sitemap URL Finder</h1>\n");

    if let Some(message) = alert {
        html.push_str(&format!("<div class=\"alert\" role=\"alert\">{}</div>\n", encode_text(message)));
    }

    push_form(&mut html, fields);
    push_results(&mut html, pane);

    html.push_str("</body>\n</html>\n");
    html
}

fn push_form(html: &mut String, fields: &FormFields) {
    html.push_str("<form method=\"post\" action=\"/\">\n");
    push_input(html, "sitemapUrl", "sitemap_url", "Sitemap URL", "url", &fields.sitemap_url);
    push_input(html, "startDate", "start_date", "Start date", "date", &fields.start_date);
    push_input(html, "endDate", "end_date", "End date", "date", &fields.end_date);
    push_input(html, "contentFilter", "content_filter", "Content filter", "text", &fields.content_filter);
    html.push_str("<button id=\"fetchBtn\" type=\"submit\">Fetch URLs</button>\n</form>\n");
}

fn push_input(html: &mut String, id: &str, name: &str, label: &str, kind: &str, value: &str) {
    html.push_str(&format!(
        "<label for=\"{id}\">{label}</label>\n<input id=\"{id}\" name=\"{name}\" type=\"{kind}\" value=\"{}\">\n",
        encode_double_quoted_attribute(value)
    ));
}

fn push_results(html: &mut String, pane: &ResultPane) {
    html.push_str("<div id=\"urlList\">\n");
    match pane.content() {
        PaneContent::Blank => {}
        PaneContent::Processing => html.push_str(&format!("<p>{}</p>\n", PROCESSING_TEXT)),
        PaneContent::Json(text) => html.push_str(&format!("<pre id=\"output\">{}</pre>\n", encode_text(text))),
        PaneContent::NoUrls => html.push_str(&format!("<p>{}</p>\n", NO_URLS_TEXT)),
        PaneContent::Sections(sections) => {
            for section in sections {
                html.push_str(&format!("<h3>{}</h3>\n<ul>\n", encode_text(&section.heading())));
                for url in &section.urls {
                    html.push_str(&format!("<li>{}</li>\n", encode_text(url)));
                }
                html.push_str("</ul>\n");
            }
        }
    }
    html.push_str("</div>\n");

    if pane.copy_visible() {
        html.push_str(&format!(
            "<textarea id=\"copyText\" readonly>{}</textarea>\n\
             <button id=\"copyBtn\" type=\"button\" style=\"display:block\" onclick=\"copyUrls()\">Copy URLs</button>\n\
             <script>{}</script>\n",
            encode_text(&pane.copyable_text()),
            COPY_SCRIPT
        ));
    }
}
