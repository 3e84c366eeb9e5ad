//! Bounce notification sorter
//!
//! Connects to an IMAP server (for example a local
//! [Proton Bridge](https://proton.me/mail/bridge)), makes sure INBOX
//! has a `bounceback` child folder, and moves every inbox message whose
//! subject marks it as a delivery failure notice into that folder.
//!
//! ```no_run
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! use bounceback::{BOUNCEBACK_FOLDER, ImapConfig};
//!
//! let config = ImapConfig::from_env()?;
//! let done = bounceback::connect(&config)
//!     .await?
//!     .ensure_folder(BOUNCEBACK_FOLDER)
//!     .await?
//!     .scan()
//!     .await?;
//! println!("moved {}", done.report().scan.moved);
//! # Ok(())
//! # }
//! ```

mod client;
mod config;
mod connection;
mod error;
mod folder;
mod provision;
mod run;
mod scan;
mod session;
mod store;


pub use client::ImapStore;
pub use config::ImapConfig;
pub use error::{Error, Result};
pub use folder::Folder;
pub use provision::{BOUNCEBACK_FOLDER, Provisioned, ensure_folder};
pub use run::{Connected, Done, Failed, FolderReady, RunReport, Stage};
pub use scan::{BOUNCE_MARKERS, MoveFailure, ScanAborted, ScanReport, is_bounce, move_bounces};
pub use session::connect;
pub use store::{Listing, Mailstore, Message, Unreadable};
