//! Session lifecycle: the reconnect supervisor and its capability workers.
//!
//! Failure handling is two-tier. Opening or registering a capability stream
//! must succeed or the whole session is torn down and redialled, because a
//! failed handshake means the connection is dead or the deployment is
//! misconfigured. Receive and send errors mid-stream are transient: the
//! worker reopens just its own stream while the siblings keep serving.

mod supervisor;
mod worker;

pub use supervisor::SessionSupervisor;

use std::sync::Arc;

use anyhow::Result;
use argot_registry::HandlerRegistry;

use crate::config::SessionConfig;
use crate::transport::QuicConnector;

/// Run a translation container session against the configured orchestrator.
/// Dial failures and session losses are retried forever, so this future
/// effectively runs until the process exits. Containers that need orderly
/// shutdown build a [`SessionSupervisor`] themselves and keep its
/// cancellation token, as the bundled binary does.
pub async fn run(
    container_name: impl Into<String>,
    config: &SessionConfig,
    registry: Arc<HandlerRegistry>,
) -> Result<()> {
    let connector = QuicConnector::new(config)?;
    SessionSupervisor::new(connector, registry, container_name, config.reconnect_delay)
        .run()
        .await;
    Ok(())
}
