//! IMAP folder types
//!
//! A folder is either the account's INBOX or a custom mailbox
//! identified by its full hierarchical path. The leaf name is kept
//! alongside the path so lookups never have to guess the server's
//! hierarchy delimiter.

use serde::Serialize;
use std::fmt;

/// An IMAP mailbox folder.
///
/// # Examples
///
/// ```
/// use bounceback::Folder;
///
/// let inbox = Folder::Inbox;
/// assert_eq!(inbox.as_str(), "INBOX");
///
/// let child = inbox.child("bounceback", Some("/"));
/// assert_eq!(child.as_str(), "INBOX/bounceback");
/// assert_eq!(child.name(), "bounceback");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(into = "String")]
pub enum Folder {
    /// The INBOX folder (RFC 3501 required, case-insensitive).
    Inbox,
    /// A user-defined or server-specific folder.
    Custom {
        /// Full mailbox name as sent on the wire.
        path: String,
        /// Last hierarchy component of `path`.
        name: String,
    },
}

impl Folder {
    /// Build a folder from a mailbox name returned by `LIST`.
    ///
    /// `delimiter` is the hierarchy delimiter the server reported for
    /// this mailbox (`None` for a flat namespace).
    #[must_use]
    pub fn from_listing(path: &str, delimiter: Option<&str>) -> Self {
        if path.eq_ignore_ascii_case("inbox") {
            return Self::Inbox;
        }
        let name = delimiter
            .filter(|d| !d.is_empty())
            .and_then(|d| path.rsplit(d).next())
            .unwrap_or(path);
        Self::Custom {
            path: path.to_string(),
            name: name.to_string(),
        }
    }

    /// The folder named `name` directly below this one.
    ///
    /// Without a delimiter the server has no hierarchy, so the child
    /// lives at the top level.
    #[must_use]
    pub fn child(&self, name: &str, delimiter: Option<&str>) -> Self {
        let path = match delimiter {
            Some(d) if !d.is_empty() => format!("{}{d}{name}", self.as_str()),
            _ => name.to_string(),
        };
        Self::Custom {
            path,
            name: name.to_string(),
        }
    }

    /// The IMAP folder name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Inbox => "INBOX",
            Self::Custom { path, .. } => path,
        }
    }

    /// The leaf name, without any parent components.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Inbox => "INBOX",
            Self::Custom { name, .. } => name,
        }
    }
}

impl fmt::Display for Folder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Folder> for String {
    fn from(folder: Folder) -> Self {
        folder.to_string()
    }
}
