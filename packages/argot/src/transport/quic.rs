//! QUIC client transport.
//!
//! One UDP endpoint outlives the session loop; each dial produces a fresh
//! connection carrying one bidirectional stream per capability. Certificate
//! verification is disabled: orchestrator deployments are addressed by IP
//! on a private network and present self-issued certificates, so the
//! handshake is validated but the chain is not.

use std::net::{Ipv4Addr, SocketAddr};
use std::sync::Arc;

use anyhow::{Context, Result};
use argot_registry::Capability;
use async_trait::async_trait;
use quinn::crypto::rustls::QuicClientConfig;
use rustls::client::danger::{HandshakeSignatureValid, ServerCertVerified, ServerCertVerifier};
use rustls::crypto::CryptoProvider;
use rustls::pki_types::{CertificateDer, ServerName, UnixTime};
use tracing::debug;

use super::{CapabilityStream, Connection, Connector, framing};
use crate::config::SessionConfig;
use crate::protocol::{ContainerFrame, OrchestratorFrame};

/// ALPN identifier for the translation protocol.
pub const ALPN: &[u8] = b"argot/1";

pub struct QuicConnector {
    endpoint: quinn::Endpoint,
    host: String,
    port: u16,
}

impl QuicConnector {
    /// Bind the client endpoint and prepare the dial configuration.
    pub fn new(config: &SessionConfig) -> Result<Self> {
        let mut endpoint = quinn::Endpoint::client(SocketAddr::from((Ipv4Addr::UNSPECIFIED, 0)))
            .context("failed to bind client endpoint")?;
        endpoint.set_default_client_config(client_config()?);
        Ok(Self {
            endpoint,
            host: config.orchestrator_host.clone(),
            port: config.orchestrator_port,
        })
    }
}

#[async_trait]
impl Connector for QuicConnector {
    type Connection = QuicConnection;

    async fn connect(&self) -> Result<QuicConnection> {
        let address = self.address();
        let remote = tokio::net::lookup_host(&address)
            .await
            .context("failed to resolve orchestrator address")?
            .next()
            .with_context(|| format!("no addresses for {address}"))?;

        let connection = self
            .endpoint
            .connect(remote, &self.host)
            .context("failed to start dial")?
            .await
            .context("handshake with orchestrator failed")?;

        Ok(QuicConnection { inner: connection })
    }

    fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Clone)]
pub struct QuicConnection {
    inner: quinn::Connection,
}

#[async_trait]
impl Connection for QuicConnection {
    type Stream = QuicStream;

    async fn open_stream(&self, capability: Capability) -> Result<QuicStream> {
        let (send, recv) = self
            .inner
            .open_bi()
            .await
            .context("failed to open bidirectional stream")?;
        debug!(capability = %capability, "opened capability stream");
        Ok(QuicStream { send, recv })
    }

    fn close(&self) {
        self.inner.close(0u32.into(), b"session torn down");
    }
}

pub struct QuicStream {
    send: quinn::SendStream,
    recv: quinn::RecvStream,
}

#[async_trait]
impl CapabilityStream for QuicStream {
    async fn send(&mut self, frame: ContainerFrame) -> Result<()> {
        framing::write_frame(&mut self.send, &frame).await
    }

    async fn recv(&mut self) -> Result<Option<OrchestratorFrame>> {
        framing::read_frame(&mut self.recv).await
    }
}

fn client_config() -> Result<quinn::ClientConfig> {
    let provider = Arc::new(rustls::crypto::ring::default_provider());
    let mut crypto = rustls::ClientConfig::builder_with_provider(Arc::clone(&provider))
        .with_protocol_versions(&[&rustls::version::TLS13])
        .context("failed to select TLS versions")?
        .dangerous()
        .with_custom_certificate_verifier(Arc::new(AcceptAnyCertificate { provider }))
        .with_no_client_auth();
    crypto.alpn_protocols = vec![ALPN.to_vec()];

    let crypto = QuicClientConfig::try_from(crypto).context("failed to build QUIC crypto")?;
    Ok(quinn::ClientConfig::new(Arc::new(crypto)))
}

/// Accepts whatever certificate the orchestrator presents. Handshake
/// signatures are still verified against the provider's algorithms.
#[derive(Debug)]
struct AcceptAnyCertificate {
    provider: Arc<CryptoProvider>,
}

impl ServerCertVerifier for AcceptAnyCertificate {
    fn verify_server_cert(
        &self,
        _end_entity: &CertificateDer<'_>,
        _intermediates: &[CertificateDer<'_>],
        _server_name: &ServerName<'_>,
        _ocsp_response: &[u8],
        _now: UnixTime,
    ) -> Result<ServerCertVerified, rustls::Error> {
        Ok(ServerCertVerified::assertion())
    }

    fn verify_tls12_signature(
        &self,
        message: &[u8],
        cert: &CertificateDer<'_>,
        dss: &rustls::DigitallySignedStruct,
    ) -> Result<HandshakeSignatureValid, rustls::Error> {
        rustls::crypto::verify_tls12_signature(
            message,
            cert,
            dss,
            &self.provider.signature_verification_algorithms,
        )
    }

    fn verify_tls13_signature(
        &self,
        message: &[u8],
        cert: &CertificateDer<'_>,
        dss: &rustls::DigitallySignedStruct,
    ) -> Result<HandshakeSignatureValid, rustls::Error> {
        rustls::crypto::verify_tls13_signature(
            message,
            cert,
            dss,
            &self.provider.signature_verification_algorithms,
        )
    }

    fn supported_verify_schemes(&self) -> Vec<rustls::SignatureScheme> {
        self.provider
            .signature_verification_algorithms
            .supported_schemes()
    }
}
