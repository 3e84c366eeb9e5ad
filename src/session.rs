//! Opening the session a run works on

use crate::client::ImapStore;
use crate::config::ImapConfig;
use crate::connection;
use crate::run::{Connected, Failed, Stage};
use tracing::warn;

/// Connect and log in to the IMAP server described by `config`.
///
/// No retries: a server that cannot be reached or refuses the login
/// needs attention from the user.
///
/// # Errors
///
/// Fails at [`Stage::Disconnected`] with a connection, TLS or I/O
/// error.
pub async fn connect(config: &ImapConfig) -> Result<Connected<ImapStore>, Failed> {
    match connection::connect(config).await {
        Ok((session, extensions)) => Ok(Connected::new(ImapStore::new(session, extensions))),
        Err(e) => {
            warn!("Could not connect to {}:{}: {}", config.host, config.port, e);
            Err(Failed::at(Stage::Disconnected, e))
        }
    }
}
