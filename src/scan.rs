//! Moving bounce notifications out of the inbox

use crate::error::{Error, Result};
use crate::folder::Folder;
use crate::store::{Listing, Mailstore, Unreadable};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Subject fragments that mark a delivery failure notice.
///
/// Matched case-sensitively anywhere in the subject.
pub const BOUNCE_MARKERS: [&str; 2] = ["Undeliverable", "Delivery Status Notification"];

/// Whether `subject` looks like a bounce notification.
///
/// ```
/// use bounceback::is_bounce;
///
/// assert!(is_bounce("Undeliverable: Mail Delivery Failed"));
/// assert!(!is_bounce("undeliverable"));
/// ```
#[must_use]
pub fn is_bounce(subject: &str) -> bool {
    BOUNCE_MARKERS.iter().any(|marker| subject.contains(marker))
}

/// A matched message that could not be moved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MoveFailure {
    pub uid: u32,
    pub subject: String,
    pub reason: String,
}

/// Tally of one pass over the inbox.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScanReport {
    /// Messages in the snapshot, readable or not.
    pub examined: usize,
    /// Messages whose subject carried a bounce marker.
    pub matched: usize,
    pub moved: usize,
    pub failures: Vec<MoveFailure>,
    /// Messages whose subject could not be read, so could not be
    /// checked for a marker.
    pub unreadable: Vec<Unreadable>,
}

/// A scan that stopped on an unrecoverable error.
#[derive(Error, Debug)]
#[error("{error}")]
pub struct ScanAborted {
    pub error: Error,
    /// What had been done before the error.
    pub partial: ScanReport,
}

/// Move every bounce notification in the inbox into `target`.
///
/// Works on a snapshot of the inbox taken up front. A message that
/// fails to move is recorded in [`ScanReport::failures`] and the scan
/// carries on with the next one.
///
/// # Errors
///
/// Fails if the inbox cannot be enumerated, or if the session is lost
/// part way through; in the latter case the partial tally is returned
/// alongside the error.
pub async fn move_bounces<S: Mailstore + Send>(
    store: &mut S,
    target: &Folder,
) -> std::result::Result<ScanReport, ScanAborted> {
    let mut report = ScanReport::default();

    let listing = match snapshot(store).await {
        Ok(listing) => listing,
        Err(error) => {
            return Err(ScanAborted {
                error,
                partial: report,
            });
        }
    };
    report.examined = listing.len();
    let Listing {
        messages,
        unreadable,
    } = listing;
    for entry in &unreadable {
        warn!("Could not read the subject of UID {}: {}", entry.uid, entry.reason);
    }
    report.unreadable = unreadable;

    for message in messages.iter().filter(|m| is_bounce(&m.subject)) {
        report.matched += 1;
        match store.move_message(message, target).await {
            Ok(()) => {
                debug!("Moved UID {} ({:?})", message.uid, message.subject);
                report.moved += 1;
            }
            Err(e) if e.is_recoverable() => {
                warn!("Skipping UID {}: {}", message.uid, e);
                report.failures.push(MoveFailure {
                    uid: message.uid,
                    subject: message.subject.clone(),
                    reason: e.to_string(),
                });
            }
            Err(error) => {
                return Err(ScanAborted {
                    error,
                    partial: report,
                });
            }
        }
    }

    info!(
        "Moved {} of {} bounce message(s) to {}",
        report.moved, report.matched, target
    );
    Ok(report)
}

async fn snapshot<S: Mailstore + Send>(store: &mut S) -> Result<Listing> {
    let inbox = store.inbox().await.map_err(into_enumeration)?;
    store.messages(&inbox).await.map_err(into_enumeration)
}

fn into_enumeration(e: Error) -> Error {
    match e {
        Error::Enumeration(_) => e,
        other => Error::Enumeration(other.to_string()),
    }
}
