//! IMAP-backed mail store

use crate::connection::{self, Extensions, ImapSession};
use crate::error::{Error, Result};
use crate::folder::Folder;
use crate::store::{Listing, Mailstore, Message, Unreadable};
use async_imap::types::UnsolicitedResponse;
use futures::StreamExt;
use mail_parser::MessageParser;
use std::collections::HashMap;
use tracing::{debug, info, warn};

const SUBJECT_ONLY: &str = "(UID BODY.PEEK[HEADER.FIELDS (SUBJECT)])";

/// [`Mailstore`] over a logged-in IMAP session.
///
/// Obtained from [`connect`](crate::connect). Message operations work
/// on the folder most recently passed to [`Mailstore::messages`],
/// which is the one left SELECTed on the server.
pub struct ImapStore {
    session: ImapSession,
    extensions: Extensions,
    /// Hierarchy delimiter, known once INBOX has been listed.
    delimiter: Option<Option<String>>,
    selected: Option<Folder>,
}

impl ImapStore {
    pub(crate) const fn new(session: ImapSession, extensions: Extensions) -> Self {
        Self {
            session,
            extensions,
            delimiter: None,
            selected: None,
        }
    }

    /// End the session politely. Failures are ignored.
    pub async fn logout(mut self) {
        self.session.logout().await.ok();
    }

    async fn hierarchy_delimiter(&mut self) -> Result<Option<String>> {
        if let Some(delimiter) = &self.delimiter {
            return Ok(delimiter.clone());
        }
        self.inbox().await?;
        Ok(self.delimiter.clone().flatten())
    }

    /// Subjects of `uids` in the selected folder, in one UID FETCH.
    ///
    /// Only the Subject header is requested, so attachments never
    /// cross the wire. A UID the server returns nothing for ends up in
    /// [`Listing::unreadable`].
    async fn fetch_subjects(&mut self, uids: &[u32]) -> Result<Listing> {
        let uid_set = uids
            .iter()
            .map(u32::to_string)
            .collect::<Vec<_>>()
            .join(",");
        let responses: Vec<_> = self
            .session
            .uid_fetch(&uid_set, SUBJECT_ONLY)
            .await
            .map_err(|e| Error::Enumeration(format!("Fetch of subjects failed: {e}")))?
            .collect()
            .await;

        let mut subjects = HashMap::with_capacity(uids.len());
        for response in responses {
            let fetch =
                response.map_err(|e| Error::Enumeration(format!("Fetch of subjects failed: {e}")))?;
            if let Some(uid) = fetch.uid {
                subjects.insert(uid, fetch.header().map(decode_subject).unwrap_or_default());
            }
        }

        let mut listing = Listing::default();
        for &uid in uids {
            match subjects.remove(&uid) {
                Some(subject) => listing.messages.push(Message { uid, subject }),
                None => listing.unreadable.push(Unreadable {
                    uid,
                    reason: Error::Parse(format!("server returned no header for UID {uid}"))
                        .to_string(),
                }),
            }
        }
        Ok(listing)
    }

    /// Discard queued unsolicited responses, returning how many were
    /// EXPUNGE notices.
    fn drain_expunges(&mut self) -> usize {
        let mut expunged = 0;
        while let Ok(response) = self.session.unsolicited_responses.try_recv() {
            if matches!(response, UnsolicitedResponse::Expunge(_)) {
                expunged += 1;
            }
        }
        expunged
    }

    /// `UID MOVE`, confirmed by the EXPUNGE the server sends for the
    /// source message. No EXPUNGE means the UID was already gone.
    async fn move_and_confirm(&mut self, uid: u32, to: &Folder) -> Result<()> {
        self.drain_expunges();
        let uid_set = format!("{uid}");
        self.session
            .uid_mv(&uid_set, to.as_str())
            .await
            .map_err(|e| classify(&e, || format!("Move of UID {uid} to {to} failed"), Error::Move))?;

        if self.drain_expunges() == 0 {
            return Err(Error::Move(format!(
                "UID {uid} vanished before it could be moved"
            )));
        }
        Ok(())
    }

    async fn copy_and_expunge(&mut self, uid: u32, to: &Folder) -> Result<()> {
        let uid_set = format!("{uid}");
        self.session
            .uid_copy(&uid_set, to.as_str())
            .await
            .map_err(|e| classify(&e, || format!("Copy of UID {uid} to {to} failed"), Error::Move))?;

        let flagged: Vec<_> = self
            .session
            .uid_store(&uid_set, "+FLAGS (\\Deleted)")
            .await
            .map_err(|e| classify(&e, || format!("Flagging UID {uid} failed"), Error::Move))?
            .collect()
            .await;
        if !flagged.iter().any(std::result::Result::is_ok) {
            return Err(Error::Move(format!(
                "UID {uid} vanished before it could be moved"
            )));
        }

        let expunged: Vec<_> = if self.extensions.uidplus {
            self.session
                .uid_expunge(&uid_set)
                .await
                .map_err(|e| classify(&e, || format!("Expunge of UID {uid} failed"), Error::Move))?
                .collect()
                .await
        } else {
            self.session
                .expunge()
                .await
                .map_err(|e| classify(&e, || format!("Expunge of UID {uid} failed"), Error::Move))?
                .collect()
                .await
        };
        debug!("Expunged {} message(s) after copying UID {}", expunged.len(), uid);
        Ok(())
    }
}

impl Mailstore for ImapStore {
    async fn inbox(&mut self) -> Result<Folder> {
        let names: Vec<_> = self
            .session
            .list(Some(""), Some("INBOX"))
            .await
            .map_err(|e| Error::FolderAccess(format!("Listing INBOX failed: {e}")))?
            .collect()
            .await;

        let inbox = names
            .into_iter()
            .filter_map(std::result::Result::ok)
            .find(|name| name.name().eq_ignore_ascii_case("INBOX"))
            .ok_or_else(|| Error::FolderAccess("Server did not list an INBOX".into()))?;

        let delimiter = inbox.delimiter().map(str::to_string);
        debug!("INBOX hierarchy delimiter: {:?}", delimiter);
        self.delimiter = Some(delimiter);
        Ok(Folder::Inbox)
    }

    async fn child_folders(&mut self, parent: &Folder) -> Result<Vec<Folder>> {
        let delimiter = self.hierarchy_delimiter().await?;
        let pattern = match &delimiter {
            Some(d) => format!("{parent}{d}%"),
            None => "%".to_string(),
        };

        let names: Vec<_> = self
            .session
            .list(Some(""), Some(&pattern))
            .await
            .map_err(|e| Error::FolderAccess(format!("Listing {pattern} failed: {e}")))?
            .collect()
            .await;

        let mut children = Vec::new();
        for item in names {
            match item {
                Ok(name) => {
                    let folder = Folder::from_listing(name.name(), name.delimiter());
                    if folder != Folder::Inbox && folder != *parent {
                        children.push(folder);
                    }
                }
                Err(e) => {
                    return Err(Error::FolderAccess(format!("Listing {pattern} failed: {e}")));
                }
            }
        }
        Ok(children)
    }

    async fn create_child(&mut self, parent: &Folder, name: &str) -> Result<Folder> {
        let delimiter = self.hierarchy_delimiter().await?;
        let folder = parent.child(name, delimiter.as_deref());

        self.session
            .create(folder.as_str())
            .await
            .map_err(|e| Error::FolderCreate(format!("Failed to create {folder}: {e}")))?;
        info!("Created folder {}", folder);

        // Keeps the folder visible to clients that only show LSUB.
        if let Err(e) = self.session.subscribe(folder.as_str()).await {
            warn!("Could not subscribe to {}: {}", folder, e);
        }
        Ok(folder)
    }

    async fn messages(&mut self, folder: &Folder) -> Result<Listing> {
        connection::select(&mut self.session, folder.as_str()).await?;
        self.selected = Some(folder.clone());

        let uids = self
            .session
            .uid_search("ALL")
            .await
            .map_err(|e| Error::Enumeration(format!("Search in {folder} failed: {e}")))?;

        let mut uid_list: Vec<u32> = uids.into_iter().collect();
        uid_list.sort_unstable();
        info!("Found {} messages in {}", uid_list.len(), folder);

        if uid_list.is_empty() {
            return Ok(Listing::default());
        }
        self.fetch_subjects(&uid_list).await
    }

    async fn move_message(&mut self, message: &Message, to: &Folder) -> Result<()> {
        let Some(from) = self.selected.clone() else {
            return Err(Error::Move(format!(
                "UID {} was not listed from a selected folder",
                message.uid
            )));
        };
        let uid = message.uid;
        debug!("Moving UID {} from {} to {}", uid, from, to);

        if self.extensions.move_cmd {
            self.move_and_confirm(uid, to).await
        } else {
            self.copy_and_expunge(uid, to).await
        }
    }
}

/// Decoded Subject from a header block, empty if there is none.
fn decode_subject(header: &[u8]) -> String {
    MessageParser::default()
        .parse_headers(header)
        .and_then(|parsed| parsed.subject().map(str::to_string))
        .unwrap_or_default()
}

/// Sort a failed per-message command into recoverable or fatal.
///
/// A tagged NO/BAD only concerns the message the command named.
/// Anything else means the session itself is gone.
fn classify(
    e: &async_imap::error::Error,
    context: impl FnOnce() -> String,
    recoverable: fn(String) -> Error,
) -> Error {
    match e {
        async_imap::error::Error::No(_) | async_imap::error::Error::Bad(_) => {
            recoverable(format!("{}: {e}", context()))
        }
        _ => Error::Connection(format!("{}: {e}", context())),
    }
}
