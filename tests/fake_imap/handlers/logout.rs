//! LOGOUT command handler.
//!
//! BYE first, then the tagged OK, as RFC 3501 Section 6.1.3 requires.

use crate::fake_imap::io::{write_line, write_tagged};
use tokio::io::{AsyncRead, AsyncWrite, BufReader};

/// Handle the LOGOUT command.
pub async fn handle_logout<S: AsyncRead + AsyncWrite + Unpin>(
    tag: &str,
    stream: &mut BufReader<S>,
) {
    let _ = write_line(stream, "* BYE\r\n").await;
    let _ = write_tagged(stream, tag, "OK LOGOUT completed").await;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fake_imap::io::test_util::{output, pipe};

    #[tokio::test]
    async fn bye_comes_before_ok() {
        let (client, mut stream) = pipe();
        handle_logout("X1", &mut stream).await;
        drop(stream);

        let out = output(client).await;
        let bye = out.find("* BYE").unwrap();
        let ok = out.find("X1 OK LOGOUT").unwrap();
        assert!(bye < ok);
    }
}
