//! The driver seam: every DOM interaction the core needs, as one trait.
//!
//! [`crate::browser::BrowserSession`] implements this over CDP; the
//! [`crate::testing::FakePage`] implementation runs the same login and send
//! logic without a browser.

use async_trait::async_trait;

use crate::error::Result;

/// Abstracts the browser page operations used by the login controller and
/// the send sequence.
#[async_trait]
pub trait Page: Send + Sync {
    /// Navigates the page to `url`.
    async fn goto(&self, url: &str) -> Result<()>;

    /// Returns whether any element currently matches the CSS `selector`.
    /// A single probe; callers own their own polling and bounds.
    async fn selector_present(&self, selector: &str) -> Result<bool>;

    /// Clicks the center of the first element matching `selector`.
    async fn click(&self, selector: &str) -> Result<()>;

    /// Focuses the first element matching `selector`.
    async fn focus(&self, selector: &str) -> Result<()>;

    /// Types `text` into the currently focused element.
    async fn type_text(&self, text: &str) -> Result<()>;

    /// Presses the Enter key on the currently focused element.
    async fn press_enter(&self) -> Result<()>;

    /// Evaluates a JavaScript `expression` and returns its string result.
    async fn evaluate(&self, expression: &str) -> Result<String>;
}

/// Escapes a string for interpolation inside a single-quoted JS/CSS literal.
pub fn escape_single_quoted(raw: &str) -> String {
    raw.replace('\\', "\\\\").replace('\'', "\\'")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escaping_handles_quotes_and_backslashes() {
        assert_eq!(escape_single_quoted("plain"), "plain");
        assert_eq!(escape_single_quoted("O'Brien"), "O\\'Brien");
        assert_eq!(escape_single_quoted("a\\b"), "a\\\\b");
    }
}
