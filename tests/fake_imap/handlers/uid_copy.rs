//! UID COPY command handler.
//!
//! Appends copies of the named messages to the destination folder
//! under fresh UIDs. The originals stay where they are.
//!
//! Messages registered as vanishing are deleted from the source right
//! before the copy, the way a concurrent client might. Per RFC 3501
//! the copy then still succeeds, having copied nothing.

use super::sequence::uids_in;
use crate::fake_imap::io::write_tagged;
use crate::fake_imap::mailbox::Mailbox;
use imap_codec::imap_types::sequence::SequenceSet;
use std::sync::Mutex;
use tokio::io::{AsyncRead, AsyncWrite, BufReader};

/// Handle the UID COPY command.
pub async fn handle_uid_copy<S: AsyncRead + AsyncWrite + Unpin>(
    tag: &str,
    sequence_set: &SequenceSet,
    dest_folder: &str,
    mailbox: &Mutex<Mailbox>,
    selected_folder: Option<&str>,
    stream: &mut BufReader<S>,
) {
    let Some(folder_name) = selected_folder else {
        let _ = write_tagged(stream, tag, "BAD No folder selected").await;
        return;
    };

    // Copy under lock (no await inside).
    let status = {
        let mut mb = mailbox.lock().unwrap();
        copy(&mut mb, sequence_set, folder_name, dest_folder)
    };
    let _ = write_tagged(stream, tag, status).await;
}

fn copy(mb: &mut Mailbox, sequence_set: &SequenceSet, source: &str, dest: &str) -> &'static str {
    if mb.get_folder(dest).is_none() {
        return "NO [TRYCREATE] Destination folder not found";
    }

    mb.vanish_pending(source);
    let Some(src) = mb.get_folder_mut(source) else {
        return "BAD Source folder not found";
    };

    let max_uid = src.uid_next() - 1;
    let uids = uids_in(sequence_set, max_uid);
    let copies: Vec<_> = src
        .emails
        .iter()
        .filter(|e| uids.contains(&e.uid))
        .cloned()
        .collect();

    if let Some(dst) = mb.get_folder_mut(dest) {
        for mut email in copies {
            email.uid = dst.uid_next();
            email.deleted = false;
            dst.emails.push(email);
        }
    }
    "OK COPY completed"
}

#[cfg(test)]
mod tests {
    use super::super::sequence::uid_set;
    use super::*;
    use crate::fake_imap::io::test_util::{output, pipe};
    use crate::fake_imap::mailbox::MailboxBuilder;

    const RAW: &[u8] = b"From: a@b.com\r\nSubject: Test\r\n\r\nBody";

    async fn run(uid: u32, dest: &str, mailbox: &Mutex<Mailbox>) -> String {
        let (client, mut stream) = pipe();
        handle_uid_copy("A1", &uid_set(uid), dest, mailbox, Some("INBOX"), &mut stream).await;
        drop(stream);
        output(client).await
    }

    #[tokio::test]
    #[allow(clippy::significant_drop_tightening)]
    async fn copies_under_new_uid_and_keeps_original() {
        let mb = Mutex::new(
            MailboxBuilder::new()
                .folder("INBOX")
                .email(7, false, RAW)
                .folder("INBOX/bounceback")
                .email(1, true, RAW)
                .build(),
        );

        let out = run(7, "INBOX/bounceback", &mb).await;

        assert_eq!(out, "A1 OK COPY completed\r\n");
        let locked = mb.lock().unwrap();
        let dest = locked.get_folder("INBOX/bounceback").unwrap();
        assert_eq!(dest.emails.iter().map(|e| e.uid).collect::<Vec<_>>(), vec![1, 2]);
        assert_eq!(locked.get_folder("INBOX").unwrap().emails.len(), 1);
    }

    #[tokio::test]
    async fn missing_dest_returns_trycreate() {
        let mb = Mutex::new(MailboxBuilder::new().folder("INBOX").email(1, false, RAW).build());

        let out = run(1, "NoSuch", &mb).await;

        assert!(out.contains("NO [TRYCREATE]"));
    }

    #[tokio::test]
    #[allow(clippy::significant_drop_tightening)]
    async fn vanishing_message_is_gone_and_nothing_is_copied() {
        let mb = Mutex::new(
            MailboxBuilder::new()
                .folder("INBOX")
                .email(1, false, RAW)
                .folder("Archive")
                .vanishes(1)
                .build(),
        );

        let out = run(1, "Archive", &mb).await;

        assert_eq!(out, "A1 OK COPY completed\r\n");
        let locked = mb.lock().unwrap();
        assert!(locked.get_folder("INBOX").unwrap().emails.is_empty());
        assert!(locked.get_folder("Archive").unwrap().emails.is_empty());
    }
}
