// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Sharing the story.

use anyhow::Result;

/// What gets shared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShareRequest {
    pub title: String,
    pub text: String,
    pub url: Option<String>,
}

impl ShareRequest {
    pub fn story() -> Self {
        Self {
            title: "Interactive Gingerbread Village".to_string(),
            text: "Check out this fun interactive gingerbread village!".to_string(),
            url: None,
        }
    }

    fn message(&self) -> String {
        match &self.url {
            Some(url) => format!("{}\n{}\n{}", self.title, self.text, url),
            None => format!("{}\n{}", self.title, self.text),
        }
    }
}

/// A platform capability that can share a request.
pub trait ShareTarget {
    fn share(&self, ctx: &egui::Context, request: &ShareRequest) -> Result<()>;
}

/// Shares by placing the message on the clipboard.
pub struct ClipboardShare;

impl ShareTarget for ClipboardShare {
    fn share(&self, ctx: &egui::Context, request: &ShareRequest) -> Result<()> {
        let message = request.message();
        ctx.output_mut(|o| o.copied_text = message);
        log::info!("Copied share text to clipboard");
        Ok(())
    }
}

/// Share through `target` if one exists. No target is a silent no-op.
pub fn share(target: Option<&dyn ShareTarget>, ctx: &egui::Context, request: &ShareRequest) {
    let Some(target) = target else {
        return;
    };
    if let Err(e) = target.share(ctx, request) {
        log::warn!("Share failed: {:#}", e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    struct Recorder(RefCell<Vec<ShareRequest>>);

    impl ShareTarget for Recorder {
        fn share(&self, _ctx: &egui::Context, request: &ShareRequest) -> Result<()> {
            self.0.borrow_mut().push(request.clone());
            Ok(())
        }
    }

    #[test]
    fn test_share_without_target_is_noop() {
        let ctx = egui::Context::default();
        share(None, &ctx, &ShareRequest::story());
    }

    #[test]
    fn test_share_reaches_target() {
        let ctx = egui::Context::default();
        let recorder = Recorder(RefCell::new(Vec::new()));
        share(Some(&recorder as &dyn ShareTarget), &ctx, &ShareRequest::story());
        assert_eq!(recorder.0.borrow().as_slice(), &[ShareRequest::story()]);
    }

    #[test]
    fn test_message_includes_url_when_present() {
        let mut request = ShareRequest::story();
        assert!(!request.message().contains("http"));
        request.url = Some("https://example.com/village".to_string());
        assert!(request.message().ends_with("https://example.com/village"));
    }
}
