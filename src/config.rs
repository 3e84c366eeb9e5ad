//! IMAP connection configuration

use crate::error::{Error, Result};
use std::env;

/// IMAP connection configuration
#[derive(Debug, Clone)]
pub struct ImapConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    /// Skip certificate verification (self-signed local bridges).
    pub accept_invalid_certs: bool,
}

impl ImapConfig {
    /// Load IMAP configuration from environment variables
    ///
    /// Reads from `.env` file if present. Required variables:
    /// - `IMAP_USERNAME`
    /// - `IMAP_PASSWORD`
    ///
    /// Optional (with defaults):
    /// - `IMAP_HOST` (default: `127.0.0.1`)
    /// - `IMAP_PORT` (default: `1143`)
    /// - `IMAP_ACCEPT_INVALID_CERTS` (default: `false`)
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if a required variable is missing or
    /// a value cannot be parsed.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        Ok(Self {
            host: env::var("IMAP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: env::var("IMAP_PORT")
                .unwrap_or_else(|_| "1143".to_string())
                .parse()
                .map_err(|e| Error::Config(format!("Invalid IMAP_PORT: {e}")))?,
            username: env::var("IMAP_USERNAME")
                .map_err(|_| Error::Config("IMAP_USERNAME not set".into()))?,
            password: env::var("IMAP_PASSWORD")
                .map_err(|_| Error::Config("IMAP_PASSWORD not set".into()))?,
            accept_invalid_certs: env::var("IMAP_ACCEPT_INVALID_CERTS")
                .map_or(Ok(false), |v| parse_flag(&v))?,
        })
    }
}

fn parse_flag(value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        other => Err(Error::Config(format!(
            "Invalid IMAP_ACCEPT_INVALID_CERTS: {other}"
        ))),
    }
}
