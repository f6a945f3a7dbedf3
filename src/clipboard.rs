use std::io::Write;
use std::process::{Command, Stdio};

use tracing::{debug, warn};

use crate::error::{AppError, Result};
use crate::render::ResultPane;

pub const COPY_SUCCESS_TEXT: &str = "URLs copied to clipboard!";

pub trait Clipboard {
    fn write_text(&mut self, text: &str) -> Result<()>;
}

/// Hands text to the first clipboard tool that is installed and succeeds.
#[derive(Debug)]
pub struct SystemClipboard {
    tools: Vec<(String, Vec<String>)>,
}

impl SystemClipboard {
    pub fn with_tools(tools: Vec<(String, Vec<String>)>) -> Self {
        SystemClipboard { tools }
    }
}

impl Default for SystemClipboard {
    fn default() -> Self {
        let tools = CANDIDATES
            .iter()
            .map(|(program, args)| {
                (program.to_string(), args.iter().map(|arg| arg.to_string()).collect())
            })
            .collect();
        SystemClipboard { tools }
    }
}

const CANDIDATES: &[(&str, &[&str])] = &[
    ("pbcopy", &[]),
    ("wl-copy", &[]),
    ("xclip", &["-selection", "clipboard"]),
    ("xsel", &["--clipboard", "--input"]),
    ("clip", &[]),
];

impl Clipboard for SystemClipboard {
    fn write_text(&mut self, text: &str) -> Result<()> {
        for (program, args) in &self.tools {
            let mut child = match Command::new(program)
                .args(args)
                .stdin(Stdio::piped())
                .stdout(Stdio::null())
                .stderr(Stdio::null())
                .spawn()
            {
                Ok(child) => child,
                Err(err) => {
                    debug!(%program, %err, "Clipboard tool unavailable");
                    continue;
                }
            };

            // stdin closes at the end of the match so the tool sees EOF before the wait
            let written = match child.stdin.take() {
                Some(mut stdin) => stdin.write_all(text.as_bytes()),
                None => Ok(()),
            };

            let status = child.wait()?;
            written?;
            if status.success() {
                return Ok(());
            }
            warn!(%program, %status, "Clipboard tool failed");
        }

        Err(AppError::ClipboardError("no clipboard tool available".to_string()))
    }
}

/// Copies the pane's list items and returns the message to show the user.
pub fn copy_urls(pane: &ResultPane, clipboard: &mut dyn Clipboard) -> String {
    match clipboard.write_text(&pane.copyable_text()) {
        Ok(()) => COPY_SUCCESS_TEXT.to_string(),
        Err(err) => {
            warn!(%err, "Copy to clipboard failed");
            err.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{PaneContent, SitemapSection};

    #[derive(Default)]
    struct MemoryClipboard {
        contents: Option<String>,
        fail: bool,
    }

    impl Clipboard for MemoryClipboard {
        fn write_text(&mut self, text: &str) -> Result<()> {
            if self.fail {
                return Err(AppError::ClipboardError("permission denied".to_string()));
            }
            self.contents = Some(text.to_string());
            Ok(())
        }
    }

    fn two_item_pane() -> ResultPane {
        let mut pane = ResultPane::new();
        pane.apply(PaneContent::Sections(vec![SitemapSection {
            sitemap: "sitemap1".into(),
            urls: vec!["https://a".into(), "https://b".into()],
        }]));
        pane
    }

    #[test]
    fn copies_newline_joined_urls() {
        let mut clipboard = MemoryClipboard::default();
        let message = copy_urls(&two_item_pane(), &mut clipboard);
        assert_eq!(message, COPY_SUCCESS_TEXT);
        assert_eq!(clipboard.contents.as_deref(), Some("https://a\nhttps://b"));
    }

    #[test]
    fn failure_is_reported_not_raised() {
        let mut clipboard = MemoryClipboard { fail: true, ..Default::default() };
        let message = copy_urls(&two_item_pane(), &mut clipboard);
        assert_eq!(message, "Failed to copy: permission denied");
    }

    #[cfg(unix)]
    fn shell(script: &str) -> (String, Vec<String>) {
        ("sh".to_string(), vec!["-c".to_string(), script.to_string()])
    }

    #[cfg(unix)]
    #[test]
    fn system_clipboard_uses_first_working_tool() {
        let mut clipboard = SystemClipboard::with_tools(vec![
            ("definitely-not-a-clipboard-tool".to_string(), Vec::new()),
            shell("cat > /dev/null; exit 1"),
            shell("cat > /dev/null"),
        ]);
        assert!(clipboard.write_text("https://a\nhttps://b").is_ok());
    }

    #[cfg(unix)]
    #[test]
    fn tool_closing_stdin_early_is_an_error() {
        let mut clipboard = SystemClipboard::with_tools(vec![shell("exit 0")]);
        let text = "https://example.com/page\n".repeat(200_000);
        let err = clipboard.write_text(&text).unwrap_err();
        assert!(matches!(err, AppError::ClipboardError(_)));
    }

    #[cfg(unix)]
    #[test]
    fn no_working_tool_is_reported() {
        let mut clipboard = SystemClipboard::with_tools(vec![shell("cat > /dev/null; exit 3")]);
        let err = clipboard.write_text("x").unwrap_err();
        assert_eq!(err.to_string(), "Failed to copy: no clipboard tool available");
    }

    #[test]
    fn copying_an_unrendered_pane_writes_nothing_useful() {
        let mut clipboard = MemoryClipboard::default();
        copy_urls(&ResultPane::new(), &mut clipboard);
        assert_eq!(clipboard.contents.as_deref(), Some(""));
    }
}
