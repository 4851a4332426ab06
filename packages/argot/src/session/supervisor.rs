//! Connection supervisor: the dial loop and the per-cycle teardown protocol.

use std::sync::Arc;
use std::time::Duration;

use argot_registry::{Capability, HandlerRegistry};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use super::worker::run_capability_worker;
use crate::transport::{Connection, Connector};

/// Supervises one persistent session: dial, spawn one worker per capability,
/// tear everything down when any worker signals, redial after a fixed delay.
///
/// Dial failures are retried forever at the same fixed interval; the
/// supervisor never gives up on its own and only stops through
/// [`cancellation_token`](Self::cancellation_token).
pub struct SessionSupervisor<C: Connector> {
    connector: C,
    registry: Arc<HandlerRegistry>,
    container_name: String,
    reconnect_delay: Duration,
    cancel: CancellationToken,
}

impl<C: Connector> SessionSupervisor<C> {
    pub fn new(
        connector: C,
        registry: Arc<HandlerRegistry>,
        container_name: impl Into<String>,
        reconnect_delay: Duration,
    ) -> Self {
        Self {
            connector,
            registry,
            container_name: container_name.into(),
            reconnect_delay,
            cancel: CancellationToken::new(),
        }
    }

    /// Token that stops the whole session loop when cancelled.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Dial and serve until the supervisor's token is cancelled.
    pub async fn run(self) {
        loop {
            if self.cancel.is_cancelled() {
                info!("session supervisor stopped");
                return;
            }

            debug!(
                address = %self.connector.address(),
                container = %self.container_name,
                "dialing orchestrator"
            );
            match self.connector.connect().await {
                Ok(connection) => {
                    info!(address = %self.connector.address(), "connected to orchestrator");
                    self.serve_cycle(connection).await;
                }
                Err(error) => {
                    error!(
                        address = %self.connector.address(),
                        error = %error,
                        "failed to reach orchestrator"
                    );
                }
            }

            tokio::select! {
                _ = self.cancel.cancelled() => {
                    info!("session supervisor stopped");
                    return;
                }
                _ = tokio::time::sleep(self.reconnect_delay) => {}
            }
        }
    }

    /// One connection cycle: spawn workers, wait for the first fatal signal,
    /// close the connection, then join every worker. The join barrier keeps
    /// any worker from overlapping into the next cycle.
    async fn serve_cycle(&self, connection: C::Connection) {
        let shutdown = self.cancel.child_token();
        let mut workers = JoinSet::new();
        for capability in Capability::ALL {
            workers.spawn(run_capability_worker(
                capability,
                self.container_name.clone(),
                connection.clone(),
                Arc::clone(&self.registry),
                shutdown.clone(),
            ));
        }

        shutdown.cancelled().await;
        info!("session lost, waiting for capability workers to exit");
        connection.close();
        while workers.join_next().await.is_some() {}
        debug!("all capability workers exited");
    }
}
