//! Transport layer: the dial and stream primitives the session runs on.
//!
//! The session core only sees the three traits here. Production code plugs
//! in [`QuicConnector`]; session tests plug in a scripted in-memory
//! implementation of the same traits.

pub mod framing;
pub mod quic;


use anyhow::Result;
use argot_registry::Capability;
use async_trait::async_trait;

use crate::protocol::{ContainerFrame, OrchestratorFrame};

pub use quic::QuicConnector;

/// Dials the orchestrator. One connector lives for the whole session loop;
/// every successful dial yields a fresh [`Connection`].
#[async_trait]
pub trait Connector: Send + Sync + 'static {
    type Connection: Connection;

    async fn connect(&self) -> Result<Self::Connection>;

    /// Dial target, for log context.
    fn address(&self) -> String;
}

/// One live transport session. Cloned into every capability worker; closing
/// it unblocks all stream I/O derived from it.
#[async_trait]
pub trait Connection: Clone + Send + Sync + 'static {
    type Stream: CapabilityStream;

    async fn open_stream(&self, capability: Capability) -> Result<Self::Stream>;

    fn close(&self);
}

/// A single capability's bidirectional frame stream.
#[async_trait]
pub trait CapabilityStream: Send + 'static {
    async fn send(&mut self, frame: ContainerFrame) -> Result<()>;

    /// `Ok(None)` is clean end-of-stream.
    async fn recv(&mut self) -> Result<Option<OrchestratorFrame>>;
}
