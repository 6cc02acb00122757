use std::path::PathBuf;

use clap::{Parser, Subcommand};
use wasend::config::{DEFAULT_QR_IMAGE, DEFAULT_SESSION_ID, DEFAULT_SESSION_ROOT, DEFAULT_URL};

use crate::styles::cli_styles;

#[derive(Parser, Debug)]
#[command(name = "wasend")]
#[command(about = "Send WhatsApp Web messages from the command line")]
#[command(version)]
#[command(styles = cli_styles())]
pub struct Cli {
    /// Increase verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Log in (scanning the QR if needed) and send a message to a contact
    Send {
        /// Contact name exactly as it appears in the conversation list
        contact: String,

        /// Message text to send
        message: String,

        /// Number of times to send the message (unparsable values fall back to 1)
        #[arg(short = 'n', long, default_value = "1", value_name = "N")]
        count: String,

        /// Send at this time of day instead of immediately (24-hour clock)
        #[arg(long, value_name = "HH:MM")]
        at: Option<String>,

        /// WhatsApp Web address
        #[arg(long, default_value = DEFAULT_URL)]
        url: String,

        /// Session identifier selecting the browser profile to reuse
        #[arg(long, default_value = DEFAULT_SESSION_ID, value_name = "ID")]
        session: String,

        /// Directory holding the session profiles
        #[arg(long, default_value = DEFAULT_SESSION_ROOT, value_name = "DIR")]
        session_root: PathBuf,

        /// Where to export the QR challenge image
        #[arg(long, default_value = DEFAULT_QR_IMAGE, value_name = "FILE")]
        qr_image: PathBuf,

        /// Run the browser without a visible window
        #[arg(long)]
        headless: bool,

        /// Close the browser after sending instead of keeping the session warm
        #[arg(long)]
        close: bool,
    },

    /// Session storage inspection and cleanup
    Session {
        #[command(subcommand)]
        action: SessionAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum SessionAction {
    /// Show which session profiles exist on disk
    Status {
        /// Report on a single session identifier instead of listing all
        #[arg(long, value_name = "ID")]
        session: Option<String>,

        /// Directory holding the session profiles
        #[arg(long, default_value = DEFAULT_SESSION_ROOT, value_name = "DIR")]
        session_root: PathBuf,
    },

    /// Delete stored session data and the exported QR image
    Reset {
        /// Session identifier to reset; omit to clear the whole session root
        #[arg(long, value_name = "ID")]
        session: Option<String>,

        /// Directory holding the session profiles
        #[arg(long, default_value = DEFAULT_SESSION_ROOT, value_name = "DIR")]
        session_root: PathBuf,

        /// Exported QR challenge image to remove alongside the session data
        #[arg(long, default_value = DEFAULT_QR_IMAGE, value_name = "FILE")]
        qr_image: PathBuf,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_send_with_defaults() {
        let cli = Cli::try_parse_from(["wasend", "send", "Atul", "hi"]).unwrap();
        match cli.command {
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
                assert_eq!(contact, "Atul");
                assert_eq!(message, "hi");
                assert_eq!(count, "1");
                assert_eq!(at, None);
                assert_eq!(url, DEFAULT_URL);
                assert_eq!(session, "default");
                assert_eq!(session_root, PathBuf::from("whatsapp-session"));
                assert_eq!(qr_image, PathBuf::from("whatsapp-qr.png"));
                assert!(!headless);
                assert!(!close);
            }
            _ => panic!("expected Send command"),
        }
    }

    #[test]
    fn parse_send_scheduled_with_count() {
        let cli = Cli::try_parse_from([
            "wasend", "send", "Atul", "hi", "-n", "3", "--at", "09:05", "--headless",
        ])
        .unwrap();
        match cli.command {
            Commands::Send {
                count,
                at,
                headless,
                ..
            } => {
                assert_eq!(count, "3");
                assert_eq!(at.as_deref(), Some("09:05"));
                assert!(headless);
            }
            _ => panic!("expected Send command"),
        }
    }

    #[test]
    fn parse_session_reset_scoped_to_one_profile() {
        let cli =
            Cli::try_parse_from(["wasend", "session", "reset", "--session", "work"]).unwrap();
        match cli.command {
            Commands::Session {
                action: SessionAction::Reset { session, .. },
            } => assert_eq!(session.as_deref(), Some("work")),
            _ => panic!("expected Session Reset command"),
        }
    }

    #[test]
    fn verbose_flag_counts() {
        let cli = Cli::try_parse_from(["wasend", "-vv", "send", "Atul", "hi"]).unwrap();
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn missing_message_fails() {
        assert!(Cli::try_parse_from(["wasend", "send", "Atul"]).is_err());
    }

    #[test]
    fn unknown_command_fails() {
        assert!(Cli::try_parse_from(["wasend", "broadcast"]).is_err());
    }
}
