//! Finding or creating the bounceback folder below INBOX

use crate::error::Result;
use crate::folder::Folder;
use crate::store::Mailstore;
use serde::Serialize;
use tracing::{debug, info};

/// Name of the folder bounce notifications are sorted into.
pub const BOUNCEBACK_FOLDER: &str = "bounceback";

/// Outcome of [`ensure_folder`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Provisioned {
    pub folder: Folder,
    /// `false` when an existing folder was reused.
    pub created: bool,
}

/// Return the child of INBOX called `name`, creating it if needed.
///
/// Existing children are matched case-insensitively and reused as
/// they are. A new folder gets exactly `name`. At most one folder is
/// created per call.
///
/// # Errors
///
/// Returns [`Error::FolderAccess`](crate::Error::FolderAccess) if the
/// inbox or its children cannot be listed, and
/// [`Error::FolderCreate`](crate::Error::FolderCreate) if the store
/// refuses the new folder.
pub async fn ensure_folder<S: Mailstore + Send>(store: &mut S, name: &str) -> Result<Provisioned> {
    let inbox = store.inbox().await?;
    let children = store.child_folders(&inbox).await?;
    debug!("{} has {} child folder(s)", inbox, children.len());

    if let Some(folder) = children
        .into_iter()
        .find(|f| f.name().eq_ignore_ascii_case(name))
    {
        info!("Using existing folder {}", folder);
        return Ok(Provisioned {
            folder,
            created: false,
        });
    }

    let folder = store.create_child(&inbox, name).await?;
    Ok(Provisioned {
        folder,
        created: true,
    })
}
