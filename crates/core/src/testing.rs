//! Test doubles for the driver seam and the wall clock.
//!
//! [`FakePage`] implements [`Page`] without a browser: configure which
//! selectors report present (immediately or after N probes) and what
//! evaluations return, then assert on the recorded [`PageAction`] sequence.
//! [`FakeClock`] replays a scripted sequence of (hour, minute) readings and
//! counts how often it was consulted.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use crate::error::{Result, WaError};
use crate::page::Page;
use crate::schedule::Clock;
use crate::send::COMPOSER_SELECTOR;

/// Action recorded by [`FakePage`] for test assertions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageAction {
    Goto { url: String },
    Click { selector: String },
    Focus { selector: String },
    TypeText { text: String },
    PressEnter,
    Evaluate { expression: String },
}

#[derive(Default)]
struct FakePageState {
    /// Selectors that report present. A positive value delays presence by
    /// that many probes; zero means present now.
    presence: HashMap<String, u32>,
    eval_results: HashMap<String, String>,
    /// When set, `type_text` fails after this many successful calls.
    type_failures_after: Option<u32>,
    successful_types: u32,
    actions: Vec<PageAction>,
}

/// Mock page recording every interaction.
#[derive(Default)]
pub struct FakePage {
    state: Mutex<FakePageState>,
}

impl FakePage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks `selector` present from the first probe on.
    pub fn set_present(&self, selector: &str) {
        self.state
            .lock()
            .unwrap()
            .presence
            .insert(selector.to_string(), 0);
    }

    /// Marks `selector` present starting with probe number `probes + 1`.
    pub fn set_present_after(&self, selector: &str, probes: u32) {
        self.state
            .lock()
            .unwrap()
            .presence
            .insert(selector.to_string(), probes);
    }

    /// Scripts the result of evaluating `expression`. Unscripted expressions
    /// evaluate to the empty string.
    pub fn set_eval_result(&self, expression: &str, result: &str) {
        self.state
            .lock()
            .unwrap()
            .eval_results
            .insert(expression.to_string(), result.to_string());
    }

    /// Makes `type_text` fail after `n` successful calls, simulating the
    /// composer becoming unavailable mid-loop.
    pub fn fail_type_after(&self, n: u32) {
        self.state.lock().unwrap().type_failures_after = Some(n);
    }

    /// All recorded actions, in order.
    pub fn actions(&self) -> Vec<PageAction> {
        self.state.lock().unwrap().actions.clone()
    }

    /// Number of Enter submissions recorded.
    pub fn submit_count(&self) -> usize {
        self.state
            .lock()
            .unwrap()
            .actions
            .iter()
            .filter(|a| matches!(a, PageAction::PressEnter))
            .count()
    }
}

#[async_trait]
impl Page for FakePage {
    async fn goto(&self, url: &str) -> Result<()> {
        self.state
            .lock()
            .unwrap()
            .actions
            .push(PageAction::Goto { url: url.into() });
        Ok(())
    }

    async fn selector_present(&self, selector: &str) -> Result<bool> {
        let mut state = self.state.lock().unwrap();
        match state.presence.get_mut(selector) {
            Some(0) => Ok(true),
            Some(remaining) => {
                *remaining -= 1;
                Ok(false)
            }
            None => Ok(false),
        }
    }

    async fn click(&self, selector: &str) -> Result<()> {
        self.state.lock().unwrap().actions.push(PageAction::Click {
            selector: selector.into(),
        });
        Ok(())
    }

    async fn focus(&self, selector: &str) -> Result<()> {
        self.state.lock().unwrap().actions.push(PageAction::Focus {
            selector: selector.into(),
        });
        Ok(())
    }

    async fn type_text(&self, text: &str) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        if let Some(limit) = state.type_failures_after {
            if state.successful_types >= limit {
                return Err(WaError::ElementNotFound {
                    selector: COMPOSER_SELECTOR.to_string(),
                });
            }
        }
        state.successful_types += 1;
        state
            .actions
            .push(PageAction::TypeText { text: text.into() });
        Ok(())
    }

    async fn press_enter(&self) -> Result<()> {
        self.state.lock().unwrap().actions.push(PageAction::PressEnter);
        Ok(())
    }

    async fn evaluate(&self, expression: &str) -> Result<String> {
        let mut state = self.state.lock().unwrap();
        state.actions.push(PageAction::Evaluate {
            expression: expression.into(),
        });
        Ok(state
            .eval_results
            .get(expression)
            .cloned()
            .unwrap_or_default())
    }
}

/// Scripted clock. Readings are consumed in order; the last one repeats once
/// the script runs out.
pub struct FakeClock {
    times: Vec<(u32, u32)>,
    consults: AtomicUsize,
}

impl FakeClock {
    /// `times` must be non-empty.
    pub fn new(times: Vec<(u32, u32)>) -> Self {
        assert!(!times.is_empty(), "FakeClock needs at least one reading");
        Self {
            times,
            consults: AtomicUsize::new(0),
        }
    }

    /// How many times `now_hm` was called.
    pub fn consults(&self) -> usize {
        self.consults.load(Ordering::SeqCst)
    }
}

impl Clock for FakeClock {
    fn now_hm(&self) -> (u32, u32) {
        let n = self.consults.fetch_add(1, Ordering::SeqCst);
        self.times[n.min(self.times.len() - 1)]
    }
}
