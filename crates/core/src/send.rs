//! The send sequence: locate a conversation, then type/submit N messages.

use std::time::Duration;

use tokio::time::{Instant, sleep};
use tracing::{debug, info};

use crate::error::{LookupTarget, Result, WaError};
use crate::page::{Page, escape_single_quoted};

/// Bound on each DOM lookup (conversation entry, composer input).
pub const LOOKUP_TIMEOUT: Duration = Duration::from_secs(30);
/// Period between presence probes inside a bounded lookup.
pub const LOOKUP_POLL: Duration = Duration::from_secs(1);
/// Delay between consecutive message submissions.
pub const MESSAGE_DELAY: Duration = Duration::from_millis(500);

/// Message composition input of the open conversation.
pub const COMPOSER_SELECTOR: &str = ".selectable-text.copyable-text";

/// Conversation list entry for a contact name.
pub fn contact_selector(contact: &str) -> String {
    format!("span[title='{}']", escape_single_quoted(contact))
}

/// Polls for `selector` until present or the `timeout` elapses, reporting the
/// failed `target` on timeout.
pub async fn wait_for_selector(
    page: &dyn Page,
    selector: &str,
    target: LookupTarget,
    timeout: Duration,
) -> Result<()> {
    let deadline = Instant::now() + timeout;
    loop {
        if page.selector_present(selector).await? {
            return Ok(());
        }
        if Instant::now() >= deadline {
            return Err(WaError::LookupTimeout {
                target,
                ms: timeout.as_millis() as u64,
            });
        }
        debug!(target = "wasend.send", %selector, "selector not present yet");
        sleep(LOOKUP_POLL).await;
    }
}

/// Sends `message` to `contact` `repeat` times. Returns the number sent.
///
/// Either lookup failing aborts the whole sequence before anything is sent;
/// a submission failing mid-loop stops there and reports the count actually
/// sent. Nothing is retried.
pub async fn send_sequence(
    page: &dyn Page,
    contact: &str,
    message: &str,
    repeat: u32,
) -> Result<u32> {
    println!("Sending message to {contact}...");

    let conversation = contact_selector(contact);
    wait_for_selector(
        page,
        &conversation,
        LookupTarget::Contact(contact.to_string()),
        LOOKUP_TIMEOUT,
    )
    .await?;
    page.click(&conversation).await?;

    wait_for_selector(page, COMPOSER_SELECTOR, LookupTarget::Composer, LOOKUP_TIMEOUT).await?;
    page.focus(COMPOSER_SELECTOR).await?;

    println!("Sending {repeat} messages...");
    let mut sent = 0u32;
    for i in 0..repeat {
        if let Err(err) = submit_one(page, message).await {
            return Err(WaError::SendAborted {
                sent,
                requested: repeat,
                source: Box::new(err),
            });
        }
        sent += 1;
        sleep(MESSAGE_DELAY).await;
        println!("Message {}/{} sent", i + 1, repeat);
        info!(target = "wasend.send", sent, total = repeat, "message submitted");
    }

    println!("All messages sent successfully!");
    Ok(sent)
}

async fn submit_one(page: &dyn Page, message: &str) -> Result<()> {
    page.type_text(message).await?;
    page.press_enter().await
}
