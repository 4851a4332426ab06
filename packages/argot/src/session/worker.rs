//! Capability stream worker: one long-lived stream serving one capability.

use std::sync::Arc;

use argot_registry::{Capability, HandlerRegistry};
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::envelope;
use crate::transport::{CapabilityStream, Connection};

/// Serve one capability over its own stream until the session ends.
///
/// Open or handshake failures cancel `shutdown` and exit: the connection is
/// dead or the deployment is misconfigured, and the supervisor must tear
/// down every sibling before redialling. Receive and send errors mid-stream
/// only reopen this worker's stream; the shared connection stays up.
pub(crate) async fn run_capability_worker<C: Connection>(
    capability: Capability,
    container_name: String,
    connection: C,
    registry: Arc<HandlerRegistry>,
    shutdown: CancellationToken,
) {
    loop {
        let mut stream = match connection.open_stream(capability).await {
            Ok(stream) => stream,
            Err(error) => {
                error!(
                    capability = %capability,
                    error = %error,
                    "failed to open capability stream, tearing down session"
                );
                shutdown.cancel();
                return;
            }
        };

        if let Err(error) = stream
            .send(envelope::register(&container_name, capability))
            .await
        {
            error!(
                capability = %capability,
                error = %error,
                "failed to register capability stream, tearing down session"
            );
            shutdown.cancel();
            return;
        }
        info!(
            capability = %capability,
            container = %container_name,
            "capability stream registered, listening for requests"
        );

        loop {
            let received = tokio::select! {
                _ = shutdown.cancelled() => return,
                received = stream.recv() => received,
            };

            let frame = match received {
                Ok(Some(frame)) => frame,
                Ok(None) => {
                    warn!(capability = %capability, "orchestrator closed the capability stream");
                    break;
                }
                Err(error) => {
                    warn!(
                        capability = %capability,
                        error = %error,
                        "failed to read from capability stream"
                    );
                    break;
                }
            };

            let call = match envelope::decode_call(capability, frame) {
                Ok(call) => call,
                Err(error) => {
                    warn!(capability = %capability, error = %error, "orchestrator sent a mismatched frame");
                    break;
                }
            };

            // Route by the name the message declares, not the configured
            // name: one process may answer for several registered containers.
            let requested = call.container_name().to_string();
            let result = match registry
                .lookup(&requested)
                .and_then(|bundle| bundle.dispatch(call))
            {
                Some(result) => result,
                None => {
                    error!(
                        requested = %requested,
                        configured = %container_name,
                        capability = %capability,
                        "no handler registered for the requested container, tearing down session"
                    );
                    shutdown.cancel();
                    return;
                }
            };

            let response = envelope::encode_result(&requested, result);
            if let Err(error) = stream.send(response).await {
                warn!(
                    capability = %capability,
                    error = %error,
                    "failed to send response to orchestrator"
                );
                break;
            }
        }

        warn!(capability = %capability, "capability stream lost, reopening");
    }
}
