use std::path::Path;

use serde_json::json;
use tracing::{info, warn};
use wasend::{ResetOutcome, Result, SessionStore};

pub fn status(session_root: &Path, session: Option<&str>) -> Result<()> {
    let store = SessionStore::new(session_root, "");

    if let Some(id) = session {
        let payload = json!({
            "session_root": session_root,
            "session": id,
            "exists": store.profile_dir(id).is_dir(),
        });
        println!("{}", serde_json::to_string_pretty(&payload)?);
        return Ok(());
    }

    let profiles = store.list()?;
    if profiles.is_empty() {
        println!("No session profiles under {}", session_root.display());
        return Ok(());
    }

    let payload = json!({
        "session_root": session_root,
        "profiles": profiles,
    });
    println!("{}", serde_json::to_string_pretty(&payload)?);
    Ok(())
}

pub fn reset(session_root: &Path, session: Option<&str>, qr_image: &Path) -> Result<()> {
    let store = SessionStore::new(session_root, qr_image);

    match store.reset(session)? {
        ResetOutcome::Cleared { removed_qr_image } => {
            info!(target = "wasend.session", ?session, "session data cleared");
            println!("Session data cleared successfully!");
            if removed_qr_image {
                println!("QR code image removed.");
            }
        }
        ResetOutcome::NothingToClear => {
            warn!(target = "wasend.session", ?session, "nothing to clear");
            println!("No session data found.");
        }
    }
    Ok(())
}
