//! One sorting run, as a sequence of states
//!
//! ```text
//! Disconnected -> Connected -> FolderReady -> Scanning -> Done
//!       \             \                          \
//!        `-------------`--------------------------`--> Failed
//! ```
//!
//! Each state is its own type and every transition consumes the
//! previous state, so a run can only move forward. A failed
//! transition yields [`Failed`], which records where the run stopped.

use crate::error::Error;
use crate::folder::Folder;
use crate::provision::{Provisioned, ensure_folder};
use crate::scan::{ScanReport, move_bounces};
use crate::store::Mailstore;
use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// The state a run was in when it failed.
///
/// Only these three can fail: a run with its folder ready moves
/// straight on to scanning, and a finished run has nothing left to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Stage {
    Disconnected,
    Connected,
    Scanning,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Disconnected => "connecting",
            Self::Connected => "preparing folder",
            Self::Scanning => "scanning",
        })
    }
}

/// Terminal failure of a run.
#[derive(Error, Debug)]
#[error("{stage} failed: {error}")]
pub struct Failed {
    pub stage: Stage,
    pub error: Error,
    /// Messages already moved when the run stopped.
    pub moved: usize,
}

impl Failed {
    pub(crate) const fn at(stage: Stage, error: Error) -> Self {
        Self {
            stage,
            error,
            moved: 0,
        }
    }

    /// Process exit code: the error's own class while connecting,
    /// otherwise the step that failed.
    #[must_use]
    pub const fn exit_code(&self) -> u8 {
        match self.stage {
            Stage::Disconnected => self.error.exit_code(),
            Stage::Connected => 3,
            Stage::Scanning => 4,
        }
    }
}

/// Summary of a completed run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunReport {
    pub folder: Folder,
    pub folder_created: bool,
    pub scan: ScanReport,
}

/// A run holding an open session.
pub struct Connected<S> {
    store: S,
}

/// A run whose target folder exists.
pub struct FolderReady<S> {
    store: S,
    provisioned: Provisioned,
}

/// A finished run.
pub struct Done<S> {
    store: S,
    report: RunReport,
}

impl<S: Mailstore + Send> Connected<S> {
    pub const fn new(store: S) -> Self {
        Self { store }
    }

    /// Find or create the folder called `name` below INBOX.
    ///
    /// # Errors
    ///
    /// Fails at [`Stage::Connected`] if the inbox is unavailable or the
    /// folder cannot be created.
    pub async fn ensure_folder(mut self, name: &str) -> Result<FolderReady<S>, Failed> {
        let provisioned = ensure_folder(&mut self.store, name)
            .await
            .map_err(|e| Failed::at(Stage::Connected, e))?;
        Ok(FolderReady {
            store: self.store,
            provisioned,
        })
    }
}

impl<S: Mailstore + Send> FolderReady<S> {
    #[must_use]
    pub const fn folder(&self) -> &Folder {
        &self.provisioned.folder
    }

    /// `true` if this run created the folder.
    #[must_use]
    pub const fn created(&self) -> bool {
        self.provisioned.created
    }

    /// Move every bounce in the inbox into the folder.
    ///
    /// Per-message failures end up in the report; they do not fail
    /// the run.
    ///
    /// # Errors
    ///
    /// Fails at [`Stage::Scanning`] if the inbox cannot be enumerated
    /// or the session is lost, carrying the number already moved.
    pub async fn scan(mut self) -> Result<Done<S>, Failed> {
        let scan = move_bounces(&mut self.store, &self.provisioned.folder)
            .await
            .map_err(|aborted| Failed {
                stage: Stage::Scanning,
                error: aborted.error,
                moved: aborted.partial.moved,
            })?;
        Ok(Done {
            store: self.store,
            report: RunReport {
                folder: self.provisioned.folder,
                folder_created: self.provisioned.created,
                scan,
            },
        })
    }
}

impl<S> Done<S> {
    #[must_use]
    pub const fn report(&self) -> &RunReport {
        &self.report
    }

    /// Hand back the session and the report.
    pub fn into_parts(self) -> (S, RunReport) {
        (self.store, self.report)
    }
}
