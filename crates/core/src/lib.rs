//! wasend: WhatsApp Web session login and message dispatch.
//!
//! The crate drives a Chromium instance against WhatsApp Web to send
//! repeated text messages to a named contact, optionally at a scheduled
//! time of day, persisting the browser profile so the QR login survives
//! between runs.
//!
//! Two independent units do the stateful work:
//!
//! - [`login::LoginController`] races the login-challenge probe against the
//!   authenticated-session probe, exports the QR challenge when needed, and
//!   waits (unbounded, cancellable) for a human to scan it.
//! - [`dispatch::dispatch`] gates on [`login::LoginState::Authenticated`],
//!   polls the wall clock in scheduled mode, and runs the one-shot send
//!   sequence.
//!
//! Both work against the [`page::Page`] trait, so the whole flow runs under
//! test with [`testing::FakePage`] and [`testing::FakeClock`], no browser
//! required.

pub mod browser;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod login;
pub mod page;
pub mod qr;
pub mod schedule;
pub mod send;
pub mod session;
pub mod testing;

pub use browser::{BrowserLaunchOptions, BrowserSession};
pub use config::SendJob;
pub use error::{LookupTarget, Result, WaError};
pub use login::{LoginConfig, LoginController, LoginState};
pub use page::Page;
pub use schedule::{Clock, SystemClock, TimeOfDay};
pub use session::{ResetOutcome, SessionStore};
