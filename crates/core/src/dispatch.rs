//! Dispatch: gate on authentication, wait for the schedule, send once.

use tracing::info;

use crate::config::SendJob;
use crate::error::{Result, WaError};
use crate::login::LoginState;
use crate::page::Page;
use crate::schedule::{self, Clock};
use crate::send;

/// Runs `job` against an established session. Returns the number of messages
/// sent.
///
/// In scheduled mode the clock poll stops permanently at the first exact
/// hour:minute match before the send sequence starts; the job is one-shot and
/// polling never resumes.
pub async fn dispatch(
    job: &SendJob,
    session: LoginState,
    page: &dyn Page,
    clock: &dyn Clock,
) -> Result<u32> {
    if session != LoginState::Authenticated {
        return Err(WaError::NotAuthenticated);
    }

    if let Some(at) = job.schedule {
        println!("Waiting until {at} to send...");
        info!(target = "wasend.dispatch", until = %at, "scheduled mode");
        schedule::wait_until(at, clock).await;
        info!(target = "wasend.dispatch", "scheduled time reached");
    }

    send::send_sequence(page, &job.contact, &job.message, job.repeat).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeClock, FakePage};

    #[tokio::test]
    async fn refuses_unauthenticated_sessions() {
        let page = FakePage::new();
        let clock = FakeClock::new(vec![(9, 0)]);
        let job = SendJob::new("Atul", "hi");

        for state in [LoginState::Unauthenticated, LoginState::ChallengePresented] {
            let err = dispatch(&job, state, &page, &clock).await.unwrap_err();
            assert!(matches!(err, WaError::NotAuthenticated));
        }
        // The gate fails before any page interaction.
        assert!(page.actions().is_empty());
        assert_eq!(clock.consults(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn immediate_mode_never_consults_the_clock() {
        let page = FakePage::new();
        page.set_present(&crate::send::contact_selector("Atul"));
        page.set_present(crate::send::COMPOSER_SELECTOR);
        let clock = FakeClock::new(vec![(0, 0)]);

        let job = SendJob::new("Atul", "hi");
        let sent = dispatch(&job, LoginState::Authenticated, &page, &clock)
            .await
            .unwrap();

        assert_eq!(sent, 1);
        assert_eq!(clock.consults(), 0);
    }
}
