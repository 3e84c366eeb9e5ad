//! IMAP connection and TLS helpers
//!
//! Provides the low-level `connect()` used by the session connector
//! and the `select()` helper shared by the store operations.

use crate::config::ImapConfig;
use crate::error::{Error, Result};
use async_imap::Session;
use rustls::pki_types::ServerName;
use std::sync::Arc;
use tokio::net::TcpStream;
use tokio_rustls::TlsConnector;
use tokio_util::compat::{Compat, TokioAsyncReadCompatExt};
use tracing::{debug, info};

/// A TLS-wrapped IMAP session.
pub type ImapSession = Session<Compat<tokio_rustls::client::TlsStream<TcpStream>>>;

/// Extensions that change how a message is moved.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Extensions {
    /// RFC 6851 `UID MOVE`.
    pub move_cmd: bool,
    /// RFC 4315 `UID EXPUNGE`.
    pub uidplus: bool,
}

/// Build the TLS connector for `config`.
///
/// Local bridges (Proton Bridge and friends) present self-signed
/// certificates, so verification can be switched off explicitly.
/// Otherwise the server is checked against the Mozilla root set.
fn tls_connector(config: &ImapConfig) -> TlsConnector {
    let builder = rustls::ClientConfig::builder();
    let tls = if config.accept_invalid_certs {
        builder
            .dangerous()
            .with_custom_certificate_verifier(Arc::new(DangerousVerifier))
            .with_no_client_auth()
    } else {
        let mut roots = rustls::RootCertStore::empty();
        roots.extend(webpki_roots::TLS_SERVER_ROOTS.iter().cloned());
        builder.with_root_certificates(roots).with_no_client_auth()
    };
    TlsConnector::from(Arc::new(tls))
}

/// Open a fresh TLS-wrapped IMAP session.
///
/// Connects to `config.host:config.port` via TCP, issues STARTTLS,
/// performs the TLS handshake, logs in and reads the capability list.
pub async fn connect(config: &ImapConfig) -> Result<(ImapSession, Extensions)> {
    let addr = format!("{}:{}", config.host, config.port);
    debug!("Connecting to IMAP server at {}", addr);

    let tcp_stream = TcpStream::connect(&addr).await?;
    let mut client = async_imap::Client::new(tcp_stream.compat());

    client
        .run_command_and_check_ok("STARTTLS", None)
        .await
        .map_err(|e| Error::Tls(format!("STARTTLS failed: {e}")))?;

    let connector = tls_connector(config);
    let server_name = ServerName::try_from(config.host.clone())
        .map_err(|e| Error::Tls(format!("Invalid server name: {e}")))?;

    let inner = client.into_inner().into_inner();
    let tls_stream = connector
        .connect(server_name, inner)
        .await
        .map_err(|e| Error::Tls(e.to_string()))?;

    let tls_client = async_imap::Client::new(tls_stream.compat());

    let mut session = tls_client
        .login(&config.username, &config.password)
        .await
        .map_err(|(e, _)| Error::Connection(format!("Login failed: {e}")))?;

    let capabilities = session
        .capabilities()
        .await
        .map_err(|e| Error::Connection(format!("CAPABILITY failed: {e}")))?;
    let extensions = Extensions {
        move_cmd: capabilities.has_str("MOVE"),
        uidplus: capabilities.has_str("UIDPLUS"),
    };
    debug!("Server extensions: {:?}", extensions);

    info!("Connected to IMAP server");
    Ok((session, extensions))
}

/// SELECT a folder on an existing session.
pub async fn select(session: &mut ImapSession, folder: &str) -> Result<()> {
    session
        .select(folder)
        .await
        .map_err(|e| Error::Enumeration(format!("Failed to select {folder}: {e}")))?;
    Ok(())
}

/// Accepts any server certificate. Only used when
/// `accept_invalid_certs` is set.
#[derive(Debug)]
struct DangerousVerifier;

impl rustls::client::danger::ServerCertVerifier for DangerousVerifier {
    fn verify_server_cert(
        &self,
        _end_entity: &rustls::pki_types::CertificateDer<'_>,
        _intermediates: &[rustls::pki_types::CertificateDer<'_>],
        _server_name: &rustls::pki_types::ServerName<'_>,
        _ocsp_response: &[u8],
        _now: rustls::pki_types::UnixTime,
    ) -> std::result::Result<rustls::client::danger::ServerCertVerified, rustls::Error> {
        Ok(rustls::client::danger::ServerCertVerified::assertion())
    }

    fn verify_tls12_signature(
        &self,
        _message: &[u8],
        _cert: &rustls::pki_types::CertificateDer<'_>,
        _dss: &rustls::DigitallySignedStruct,
    ) -> std::result::Result<rustls::client::danger::HandshakeSignatureValid, rustls::Error> {
        Ok(rustls::client::danger::HandshakeSignatureValid::assertion())
    }

    fn verify_tls13_signature(
        &self,
        _message: &[u8],
        _cert: &rustls::pki_types::CertificateDer<'_>,
        _dss: &rustls::DigitallySignedStruct,
    ) -> std::result::Result<rustls::client::danger::HandshakeSignatureValid, rustls::Error> {
        Ok(rustls::client::danger::HandshakeSignatureValid::assertion())
    }

    fn supported_verify_schemes(&self) -> Vec<rustls::SignatureScheme> {
        rustls::crypto::ring::default_provider()
            .signature_verification_algorithms
            .supported_schemes()
    }
}
