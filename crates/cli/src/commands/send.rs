//! The send command: establish a session, dispatch the job, then hold the
//! browser open (or close it) per the operator's choice.

use std::path::PathBuf;

use tracing::{info, warn};
use wasend::config::parse_repeat;
use wasend::{
    BrowserLaunchOptions, BrowserSession, LoginConfig, LoginController, Result, SendJob,
    SessionStore, SystemClock, TimeOfDay, WaError,
};

pub struct SendArgs {
    pub contact: String,
    pub message: String,
    pub count: String,
    pub at: Option<String>,
    pub url: String,
    pub session: String,
    pub session_root: PathBuf,
    pub qr_image: PathBuf,
    pub headless: bool,
    pub close: bool,
}

pub async fn execute(args: SendArgs) -> Result<()> {
    // Schedule input is validated before any browser or filesystem work.
    let schedule = args
        .at
        .as_deref()
        .map(str::parse::<TimeOfDay>)
        .transpose()?;

    let job = SendJob::new(args.contact, args.message)
        .with_repeat(parse_repeat(&args.count))
        .with_schedule(schedule);

    let store = SessionStore::new(&args.session_root, &args.qr_image);
    let profile_dir = store.ensure_profile(&args.session)?;

    let mut launch = BrowserLaunchOptions::new(profile_dir);
    launch.headless = args.headless;
    let browser = BrowserSession::launch(&launch).await?;

    let login = LoginController::new(LoginConfig {
        url: args.url,
        qr_image_path: args.qr_image,
        ..LoginConfig::default()
    });

    let outcome = tokio::select! {
        result = run_job(&login, &job, &browser) => result,
        _ = tokio::signal::ctrl_c() => Err(WaError::Interrupted),
    };

    match outcome {
        Ok(sent) => {
            info!(target = "wasend", sent, "job complete");
            finish(browser, args.close).await
        }
        Err(err) if err.keeps_session_open() => {
            // Send-phase failure: report it but keep the authenticated
            // session warm, exactly like a success.
            warn!(target = "wasend", error = %err, "send failed; session left open");
            eprintln!("Error: {err}");
            finish(browser, args.close).await?;
            Err(err)
        }
        Err(err) => {
            browser.close().await?;
            Err(err)
        }
    }
}

async fn run_job(
    login: &LoginController,
    job: &SendJob,
    browser: &BrowserSession,
) -> Result<u32> {
    let state = login.establish(browser).await?;
    wasend::dispatch::dispatch(job, state, browser, &SystemClock).await
}

/// Closes the browser immediately, or holds it open until the operator
/// interrupts so the authenticated profile stays warm.
async fn finish(browser: BrowserSession, close: bool) -> Result<()> {
    if close {
        return browser.close().await;
    }
    println!("Browser left open to keep the session warm. Press Ctrl-C to exit.");
    tokio::signal::ctrl_c().await.ok();
    browser.close().await
}
