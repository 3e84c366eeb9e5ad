//! Fake IMAP server for integration testing
//!
//! This module provides an in-process IMAP server that speaks enough
//! of the protocol to run the bounce sorter end-to-end:
//!
//! TCP -> greeting -> STARTTLS -> TLS handshake -> LOGIN -> CAPABILITY
//! -> LIST / CREATE / SELECT / SEARCH / FETCH / COPY / STORE / EXPUNGE
//! -> LOGOUT
//!
//! ## Module layout
//!
//! - `server` -- TCP listener, TLS setup, and connection dispatch
//! - `handlers/` -- one file per IMAP command (LIST, CREATE, etc.)
//! - `mailbox` -- test data model (folders, emails, builder)
//! - `io` -- shared write helpers

#![allow(dead_code)]


pub use mailbox::MailboxBuilder;
pub use server::FakeImapServer;
