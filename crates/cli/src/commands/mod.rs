mod send;
mod session;

use wasend::Result;

use crate::cli::{Commands, SessionAction};

pub async fn dispatch(command: Commands) -> Result<()> {
    match command {
        Commands::Send {
            contact,
            message,
            count,
            at,
            url,
            session,
            session_root,
            qr_image,
            headless,
            close,
        } => {
            send::execute(send::SendArgs {
                contact,
                message,
                count,
                at,
                url,
                session,
                session_root,
                qr_image,
                headless,
                close,
            })
            .await
        }
        Commands::Session { action } => match action {
            SessionAction::Status {
                session,
                session_root,
            } => session::status(&session_root, session.as_deref()),
            SessionAction::Reset {
                session,
                session_root,
                qr_image,
            } => session::reset(&session_root, session.as_deref(), &qr_image),
        },
    }
}
