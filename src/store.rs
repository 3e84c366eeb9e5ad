//! The mail store seam
//!
//! [`Mailstore`] is the complete set of operations the sorter needs
//! from a mail store. [`ImapStore`](crate::ImapStore) implements it on
//! top of an IMAP session; tests substitute an in-memory fake.

use crate::error::Result;
use crate::folder::Folder;
use serde::Serialize;
use std::future::Future;

/// A message as seen in a folder snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Message {
    /// Store-assigned identifier, stable within its folder.
    pub uid: u32,
    pub subject: String,
}

/// A message whose subject could not be read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Unreadable {
    pub uid: u32,
    pub reason: String,
}

/// Snapshot of a folder's contents.
///
/// Every message the store reported is in exactly one of the two
/// lists.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Listing {
    pub messages: Vec<Message>,
    pub unreadable: Vec<Unreadable>,
}

impl Listing {
    /// Number of messages in the folder when it was listed.
    #[must_use]
    pub fn len(&self) -> usize {
        self.messages.len() + self.unreadable.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Operations on an open session with a mail store.
///
/// Every call blocks the run until it completes; nothing is issued
/// concurrently.
pub trait Mailstore {
    /// Resolve the account's default inbox.
    ///
    /// Fails with [`Error::FolderAccess`](crate::Error::FolderAccess)
    /// if the store has no usable inbox.
    fn inbox(&mut self) -> impl Future<Output = Result<Folder>> + Send;

    /// Immediate children of `parent`.
    fn child_folders(
        &mut self,
        parent: &Folder,
    ) -> impl Future<Output = Result<Vec<Folder>>> + Send;

    /// Create a folder called `name` directly below `parent`.
    fn create_child(
        &mut self,
        parent: &Folder,
        name: &str,
    ) -> impl Future<Output = Result<Folder>> + Send;

    /// Snapshot of the messages currently in `folder`.
    ///
    /// A message whose subject cannot be read is listed as
    /// [`Unreadable`] rather than failing the whole snapshot.
    fn messages(&mut self, folder: &Folder) -> impl Future<Output = Result<Listing>> + Send;

    /// Move `message` out of the folder it was listed from into `to`.
    ///
    /// A message that disappeared since the snapshot yields a
    /// recoverable [`Error::Move`](crate::Error::Move).
    fn move_message(
        &mut self,
        message: &Message,
        to: &Folder,
    ) -> impl Future<Output = Result<()>> + Send;
}
