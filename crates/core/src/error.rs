use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, WaError>;

/// What a bounded DOM lookup was searching for when it timed out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupTarget {
    /// The conversation list entry for a named contact.
    Contact(String),
    /// The message composition input of an open conversation.
    Composer,
}

impl fmt::Display for LookupTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LookupTarget::Contact(name) => write!(f, "conversation with '{name}'"),
            LookupTarget::Composer => write!(f, "message composer input"),
        }
    }
}

#[derive(Debug, Error)]
pub enum WaError {
    #[error("browser launch failed: {0}")]
    BrowserLaunch(String),

    #[error("navigation failed: {url}")]
    Navigation {
        url: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("could not extract login challenge: {0}")]
    ChallengeExtraction(String),

    #[error("timeout after {ms}ms waiting for {target}")]
    LookupTimeout { target: LookupTarget, ms: u64 },

    #[error("invalid schedule time {input:?}: {reason}")]
    ScheduleParse { input: String, reason: String },

    #[error("cannot access session storage at {path}")]
    SessionStorage {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("session is not authenticated; cannot dispatch")]
    NotAuthenticated,

    #[error("send aborted after {sent}/{requested} messages")]
    SendAborted {
        sent: u32,
        requested: u32,
        #[source]
        source: Box<WaError>,
    },

    #[error("element not found: {selector}")]
    ElementNotFound { selector: String },

    #[error("javascript evaluation failed: {0}")]
    JsEval(String),

    #[error("input dispatch failed: {0}")]
    InputDispatch(String),

    #[error("interrupted by operator")]
    Interrupted,

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Cdp(#[from] chromiumoxide::error::CdpError),
}

impl WaError {
    /// Check whether this failure leaves the browser session usable.
    ///
    /// Send-sequence lookup timeouts (and the partial-send failures built on
    /// them) abort only the send attempt; the authenticated session stays
    /// warm. Everything else tears the run down.
    pub fn keeps_session_open(&self) -> bool {
        matches!(
            self,
            WaError::LookupTimeout { .. } | WaError::SendAborted { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_timeout_names_the_failed_target() {
        let contact = WaError::LookupTimeout {
            target: LookupTarget::Contact("Atul".into()),
            ms: 30_000,
        };
        assert!(contact.to_string().contains("conversation with 'Atul'"));

        let composer = WaError::LookupTimeout {
            target: LookupTarget::Composer,
            ms: 30_000,
        };
        assert!(composer.to_string().contains("composer"));
    }

    #[test]
    fn only_send_phase_failures_keep_the_session_open() {
        let timeout = WaError::LookupTimeout {
            target: LookupTarget::Composer,
            ms: 30_000,
        };
        assert!(timeout.keeps_session_open());

        let aborted = WaError::SendAborted {
            sent: 2,
            requested: 5,
            source: Box::new(WaError::ElementNotFound {
                selector: ".composer".into(),
            }),
        };
        assert!(aborted.keeps_session_open());

        assert!(!WaError::NotAuthenticated.keeps_session_open());
        assert!(!WaError::BrowserLaunch("no chrome".into()).keeps_session_open());
    }
}
