//! CDP-backed browser session implementing the [`Page`] seam.

use std::path::PathBuf;

use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig, HeadlessMode};
use chromiumoxide::cdp::browser_protocol::input::{
    DispatchKeyEventParams, DispatchKeyEventType, DispatchMouseEventParams,
    DispatchMouseEventType, MouseButton,
};
use futures::StreamExt;
use serde::Deserialize;
use tokio::task::JoinHandle;
use tracing::{debug, trace};

use crate::error::{Result, WaError};
use crate::page::{Page, escape_single_quoted};

/// How the browser process is launched.
#[derive(Debug, Clone)]
pub struct BrowserLaunchOptions {
    /// Profile directory holding the persisted session state.
    pub profile_dir: PathBuf,
    /// Run without a visible window.
    pub headless: bool,
    /// Window size in pixels.
    pub window: (u32, u32),
}

impl BrowserLaunchOptions {
    pub fn new(profile_dir: impl Into<PathBuf>) -> Self {
        Self {
            profile_dir: profile_dir.into(),
            headless: false,
            window: (1280, 900),
        }
    }
}

/// A launched browser with a single page, closed explicitly via
/// [`BrowserSession::close`]. Dropping it without closing kills the child
/// process without a clean CDP shutdown.
pub struct BrowserSession {
    browser: Browser,
    page: chromiumoxide::Page,
    handler_task: JoinHandle<()>,
}

impl BrowserSession {
    /// Launches the browser bound to the profile directory and opens a blank
    /// page.
    pub async fn launch(opts: &BrowserLaunchOptions) -> Result<Self> {
        let mut builder = BrowserConfig::builder()
            .user_data_dir(&opts.profile_dir)
            .window_size(opts.window.0, opts.window.1)
            .arg("--no-sandbox")
            .arg("--disable-setuid-sandbox")
            .arg("--disable-notifications")
            .arg("--disable-blink-features=AutomationControlled")
            .arg("--no-first-run")
            .arg("--no-default-browser-check");

        builder = if opts.headless {
            builder.headless_mode(HeadlessMode::New)
        } else {
            builder.with_head()
        };

        let config = builder.build().map_err(WaError::BrowserLaunch)?;
        let (browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|err| WaError::BrowserLaunch(err.to_string()))?;

        // Drain CDP events for the lifetime of the session.
        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                trace!(target = "wasend.browser", ?event, "cdp event");
            }
        });

        let page = browser.new_page("about:blank").await?;
        debug!(
            target = "wasend.browser",
            profile = %opts.profile_dir.display(),
            headless = opts.headless,
            "browser launched"
        );

        Ok(Self {
            browser,
            page,
            handler_task,
        })
    }

    /// Shuts the browser down and waits for the child process to exit.
    pub async fn close(mut self) -> Result<()> {
        self.browser.close().await?;
        self.browser.wait().await?;
        self.handler_task.abort();
        debug!(target = "wasend.browser", "browser closed");
        Ok(())
    }
}

/// Element center in viewport CSS pixels, located via injected JS.
#[derive(Debug, Deserialize)]
struct ClickPoint {
    found: bool,
    x: f64,
    y: f64,
}

impl BrowserSession {
    async fn locate_center(&self, selector: &str) -> Result<ClickPoint> {
        let escaped = escape_single_quoted(selector);
        let point: ClickPoint = self
            .page
            .evaluate(format!(
                "(() => {{ \
                 const el = document.querySelector('{escaped}'); \
                 if (!el) return {{ found: false, x: 0, y: 0 }}; \
                 el.scrollIntoView({{ block: 'center' }}); \
                 const r = el.getBoundingClientRect(); \
                 return {{ found: true, x: r.left + r.width / 2, y: r.top + r.height / 2 }}; \
                 }})()"
            ))
            .await?
            .into_value()?;
        if !point.found {
            return Err(WaError::ElementNotFound {
                selector: selector.to_string(),
            });
        }
        Ok(point)
    }

    async fn dispatch_mouse(
        &self,
        kind: DispatchMouseEventType,
        x: f64,
        y: f64,
        button: Option<MouseButton>,
    ) -> Result<()> {
        let mut builder = DispatchMouseEventParams::builder().r#type(kind).x(x).y(y);
        if let Some(button) = button {
            builder = builder.button(button).click_count(1);
        }
        let params = builder.build().map_err(WaError::InputDispatch)?;
        self.page.execute(params).await?;
        Ok(())
    }

    async fn dispatch_enter(&self, kind: DispatchKeyEventType) -> Result<()> {
        // text "\r" + VK 13 makes the key register as a real Enter press.
        let mut builder = DispatchKeyEventParams::builder()
            .r#type(kind.clone())
            .key("Enter")
            .code("Enter")
            .windows_virtual_key_code(13);
        if matches!(kind, DispatchKeyEventType::KeyDown) {
            builder = builder.text("\r");
        }
        let params = builder.build().map_err(WaError::InputDispatch)?;
        self.page.execute(params).await?;
        Ok(())
    }
}

#[async_trait]
impl Page for BrowserSession {
    async fn goto(&self, url: &str) -> Result<()> {
        self.page
            .goto(url)
            .await
            .map_err(|err| WaError::Navigation {
                url: url.to_string(),
                source: anyhow::Error::new(err),
            })?;
        Ok(())
    }

    async fn selector_present(&self, selector: &str) -> Result<bool> {
        let escaped = escape_single_quoted(selector);
        let present: bool = self
            .page
            .evaluate(format!("document.querySelector('{escaped}') !== null"))
            .await?
            .into_value()?;
        Ok(present)
    }

    async fn click(&self, selector: &str) -> Result<()> {
        let point = self.locate_center(selector).await?;
        debug!(target = "wasend.browser", %selector, x = point.x, y = point.y, "click");
        self.dispatch_mouse(DispatchMouseEventType::MouseMoved, point.x, point.y, None)
            .await?;
        self.dispatch_mouse(
            DispatchMouseEventType::MousePressed,
            point.x,
            point.y,
            Some(MouseButton::Left),
        )
        .await?;
        self.dispatch_mouse(
            DispatchMouseEventType::MouseReleased,
            point.x,
            point.y,
            Some(MouseButton::Left),
        )
        .await
    }

    async fn focus(&self, selector: &str) -> Result<()> {
        let escaped = escape_single_quoted(selector);
        let focused: bool = self
            .page
            .evaluate(format!(
                "(() => {{ \
                 const el = document.querySelector('{escaped}'); \
                 if (!el) return false; \
                 el.focus(); \
                 return true; \
                 }})()"
            ))
            .await?
            .into_value()?;
        if !focused {
            return Err(WaError::ElementNotFound {
                selector: selector.to_string(),
            });
        }
        Ok(())
    }

    async fn type_text(&self, text: &str) -> Result<()> {
        for ch in text.chars() {
            let params = DispatchKeyEventParams::builder()
                .r#type(DispatchKeyEventType::Char)
                .text(ch.to_string())
                .build()
                .map_err(WaError::InputDispatch)?;
            self.page.execute(params).await?;
        }
        Ok(())
    }

    async fn press_enter(&self) -> Result<()> {
        self.dispatch_enter(DispatchKeyEventType::KeyDown).await?;
        self.dispatch_enter(DispatchKeyEventType::KeyUp).await
    }

    async fn evaluate(&self, expression: &str) -> Result<String> {
        let value = self
            .page
            .evaluate(expression)
            .await
            .map_err(|err| WaError::JsEval(err.to_string()))?;
        Ok(value.into_value().unwrap_or_default())
    }
}
