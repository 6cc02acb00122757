//! Job configuration: plain scalar fields, no nested definitions.

use crate::schedule::TimeOfDay;

/// Fixed application address used when no `--url` override is given.
pub const DEFAULT_URL: &str = "https://web.whatsapp.com";
/// Session identifier used when none is supplied.
pub const DEFAULT_SESSION_ID: &str = "default";
/// Session root directory, relative to the working directory.
pub const DEFAULT_SESSION_ROOT: &str = "whatsapp-session";
/// Exported QR challenge image path.
pub const DEFAULT_QR_IMAGE: &str = "whatsapp-qr.png";

/// One message-sending job: who, what, how many times, and (optionally) when.
#[derive(Debug, Clone)]
pub struct SendJob {
    /// Contact name exactly as it appears in the conversation list.
    pub contact: String,
    /// Message body typed into the composer.
    pub message: String,
    /// Number of submissions, always at least 1.
    pub repeat: u32,
    /// Wall-clock time to fire at; `None` means send immediately.
    pub schedule: Option<TimeOfDay>,
}

impl SendJob {
    pub fn new(contact: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            contact: contact.into(),
            message: message.into(),
            repeat: 1,
            schedule: None,
        }
    }

    pub fn with_repeat(mut self, repeat: u32) -> Self {
        self.repeat = repeat.max(1);
        self
    }

    pub fn with_schedule(mut self, schedule: Option<TimeOfDay>) -> Self {
        self.schedule = schedule;
        self
    }
}

/// Parse a repeat count supplied as a string, falling back to 1 when the
/// value is unparsable or non-positive.
pub fn parse_repeat(raw: &str) -> u32 {
    match raw.trim().parse::<i64>() {
        Ok(n) if n >= 1 => u32::try_from(n).unwrap_or(u32::MAX),
        _ => 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeat_parses_positive_integers() {
        assert_eq!(parse_repeat("3"), 3);
        assert_eq!(parse_repeat(" 10 "), 10);
        assert_eq!(parse_repeat("1"), 1);
    }

    #[test]
    fn repeat_falls_back_to_one() {
        assert_eq!(parse_repeat(""), 1);
        assert_eq!(parse_repeat("abc"), 1);
        assert_eq!(parse_repeat("0"), 1);
        assert_eq!(parse_repeat("-4"), 1);
        assert_eq!(parse_repeat("2.5"), 1);
    }

    #[test]
    fn job_builder_clamps_repeat() {
        let job = SendJob::new("Atul", "hi").with_repeat(0);
        assert_eq!(job.repeat, 1);
    }
}
