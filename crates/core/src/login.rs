//! Session/login detection: probe race, QR challenge export, unbounded wait.

use std::path::PathBuf;
use std::time::Duration;

use tokio::time::{Instant, sleep};
use tracing::{info, warn};

use crate::config::{DEFAULT_QR_IMAGE, DEFAULT_URL};
use crate::error::{Result, WaError};
use crate::page::Page;
use crate::qr;

/// Login challenge canvas shown while the session is unauthenticated.
pub const QR_CANVAS_SELECTOR: &str = r#"canvas[aria-label="Scan me!"]"#;
/// Conversation side pane, present only once authenticated.
pub const CHAT_PANE_SELECTOR: &str = "#side";

/// Login progress within a single run. The machine never moves backwards:
/// a session that stops being authenticated mid-run is a fatal failure, not
/// a state transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginState {
    Unauthenticated,
    ChallengePresented,
    Authenticated,
}

/// Configuration for the login controller, explicit so tests run without
/// touching the real URL or a fixed artifact path.
#[derive(Debug, Clone)]
pub struct LoginConfig {
    /// Application address to navigate to.
    pub url: String,
    /// Where the challenge image is exported.
    pub qr_image_path: PathBuf,
    /// Bound on the initial challenge-vs-authenticated probe race.
    pub probe_window: Duration,
    /// Period between presence probes.
    pub probe_interval: Duration,
}

impl Default for LoginConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_URL.to_string(),
            qr_image_path: PathBuf::from(DEFAULT_QR_IMAGE),
            probe_window: Duration::from_secs(15),
            probe_interval: Duration::from_millis(500),
        }
    }
}

/// Drives a page from cold navigation to an authenticated session.
pub struct LoginController {
    config: LoginConfig,
}

impl LoginController {
    pub fn new(config: LoginConfig) -> Self {
        Self { config }
    }

    /// Navigates to the application and blocks until the session is
    /// authenticated.
    ///
    /// The initial probe race is bounded by `probe_window`; past the bound a
    /// warning is logged and probing continues unbounded. Once the challenge
    /// is detected it is exported and the wait for the authenticated marker
    /// has no timeout: the only way out is a human scanning the code or the
    /// run-level abort signal cancelling this future.
    pub async fn establish(&self, page: &dyn Page) -> Result<LoginState> {
        page.goto(&self.config.url).await?;

        let deadline = Instant::now() + self.config.probe_window;
        let mut warned = false;

        // Probe race: whichever marker appears first decides the state.
        loop {
            if page.selector_present(CHAT_PANE_SELECTOR).await? {
                println!("Already logged in!");
                info!(target = "wasend.login", "existing session detected");
                return Ok(LoginState::Authenticated);
            }
            if page.selector_present(QR_CANVAS_SELECTOR).await? {
                break;
            }
            if !warned && Instant::now() >= deadline {
                warn!(
                    target = "wasend.login",
                    window_ms = self.config.probe_window.as_millis() as u64,
                    "neither login challenge nor session marker appeared; still polling"
                );
                warned = true;
            }
            sleep(self.config.probe_interval).await;
        }

        println!("QR Code detected. Need to scan...");
        info!(target = "wasend.login", state = ?LoginState::ChallengePresented, "challenge presented");
        self.export_challenge(page).await?;

        // Unbounded: a human has to scan the code. Cancellation comes from
        // the caller aborting the whole run.
        while !page.selector_present(CHAT_PANE_SELECTOR).await? {
            sleep(self.config.probe_interval).await;
        }

        println!("Logged in successfully!");
        info!(target = "wasend.login", "authenticated");
        Ok(LoginState::Authenticated)
    }

    /// Exports the challenge: canvas image to disk, derived token to the
    /// terminal. A present-but-unreadable payload is fatal.
    async fn export_challenge(&self, page: &dyn Page) -> Result<()> {
        let data_url = page
            .evaluate(concat!(
                "(() => {",
                " const c = document.querySelector('canvas[aria-label=\"Scan me!\"]');",
                " return c ? c.toDataURL() : '';",
                " })()"
            ))
            .await?;
        if data_url.is_empty() {
            return Err(WaError::ChallengeExtraction(
                "challenge canvas disappeared before export".into(),
            ));
        }

        let png = qr::decode_png_data_url(&data_url)?;
        std::fs::write(&self.config.qr_image_path, png)?;
        println!("QR Code saved to {}", self.config.qr_image_path.display());

        // The page URL stands in for the real pairing payload; the exported
        // image is the artifact that actually scans.
        let token = page.evaluate("window.location.href").await?;
        match qr::render_terminal_qr(&token) {
            Ok(block) => {
                println!("{block}");
                println!("Scan the QR code above with your WhatsApp app");
                println!(
                    "(or scan the saved image at {})",
                    self.config.qr_image_path.display()
                );
            }
            Err(err) => {
                // Terminal rendering is a convenience; the PNG already
                // landed on disk.
                warn!(target = "wasend.login", error = %err, "terminal QR rendering skipped");
                println!(
                    "Scan the QR image saved at {}",
                    self.config.qr_image_path.display()
                );
            }
        }
        Ok(())
    }
}
