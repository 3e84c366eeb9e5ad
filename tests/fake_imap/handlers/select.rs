//! SELECT command handler.
//!
//! Opens a folder and responds with the metadata RFC 3501 Section
//! 6.3.1 requires: FLAGS, EXISTS, RECENT, UIDVALIDITY and UIDNEXT.
//!
//! Returns the selected folder name (or `None` if not found).

use crate::fake_imap::io::{write_line, write_tagged};
use crate::fake_imap::mailbox::Mailbox;
use tokio::io::{AsyncRead, AsyncWrite, BufReader};

/// Handle the SELECT command. Returns the selected folder name.
pub async fn handle_select<S: AsyncRead + AsyncWrite + Unpin>(
    tag: &str,
    folder_name: &str,
    mailbox: &Mailbox,
    stream: &mut BufReader<S>,
) -> Option<String> {
    let Some(folder) = mailbox.get_folder(folder_name) else {
        let _ = write_tagged(stream, tag, "NO Folder not found").await;
        return None;
    };

    let lines = [
        "* FLAGS (\\Seen \\Answered \\Flagged \\Deleted \\Draft)\r\n".to_string(),
        format!("* {} EXISTS\r\n", folder.emails.len()),
        "* 0 RECENT\r\n".to_string(),
        "* OK [UIDVALIDITY 1]\r\n".to_string(),
        format!("* OK [UIDNEXT {}]\r\n", folder.uid_next()),
        "* OK [PERMANENTFLAGS (\\Seen \\Deleted)] Limited\r\n".to_string(),
    ];
    for line in &lines {
        if write_line(stream, line).await.is_err() {
            return None;
        }
    }

    let _ = write_tagged(stream, tag, "OK [READ-WRITE] SELECT completed").await;
    Some(folder_name.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fake_imap::io::test_util::{output, pipe};
    use crate::fake_imap::mailbox::MailboxBuilder;

    const RAW: &[u8] = b"From: a@b.com\r\nSubject: Test\r\n\r\nBody";

    async fn run(folder_name: &str, mailbox: &Mailbox) -> (String, Option<String>) {
        let (client, mut stream) = pipe();
        let selected = handle_select("A1", folder_name, mailbox, &mut stream).await;
        drop(stream);
        (output(client).await, selected)
    }

    #[tokio::test]
    async fn selects_child_folder() {
        let mailbox = MailboxBuilder::new()
            .folder("INBOX")
            .folder("INBOX/bounceback")
            .email(5, true, RAW)
            .email(9, false, RAW)
            .build();

        let (out, selected) = run("INBOX/bounceback", &mailbox).await;

        assert_eq!(selected.as_deref(), Some("INBOX/bounceback"));
        assert!(out.contains("* 2 EXISTS"));
        assert!(out.contains("* OK [UIDNEXT 10]"));
        assert!(out.ends_with("A1 OK [READ-WRITE] SELECT completed\r\n"));
    }

    #[tokio::test]
    async fn returns_none_for_missing_folder() {
        let mailbox = MailboxBuilder::new().folder("INBOX").build();

        let (out, selected) = run("NoSuchFolder", &mailbox).await;

        assert!(selected.is_none());
        assert_eq!(out, "A1 NO Folder not found\r\n");
    }
}
