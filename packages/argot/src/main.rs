//! Reference translation container: registers the passthrough bundle under
//! one name and keeps a session with the orchestrator until interrupted.

use std::sync::Arc;

use anyhow::Result;
use argot::transport::QuicConnector;
use argot::{SessionConfig, SessionSupervisor};
use argot_registry::HandlerRegistry;
use clap::Parser;
use tracing::info;

#[derive(Parser)]
#[command(name = "argot", about = "Passthrough translation container")]
struct Args {
    /// Container name to answer for.
    #[arg(long, default_value = "passthrough")]
    name: String,

    /// Widen the default log filter to debug.
    #[arg(long)]
    debug: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    argot::logging::init(args.debug);

    let config = SessionConfig::load()?;
    let registry = Arc::new(HandlerRegistry::new());
    registry.register(args.name.clone(), argot::passthrough::bundle());

    info!(
        container = %args.name,
        orchestrator = %config.address(),
        "starting translation container"
    );

    let supervisor = SessionSupervisor::new(
        QuicConnector::new(&config)?,
        registry,
        args.name,
        config.reconnect_delay,
    );
    let cancel = supervisor.cancellation_token();
    let session = tokio::spawn(supervisor.run());

    tokio::signal::ctrl_c().await?;
    info!("shutting down");
    cancel.cancel();
    session.await?;
    Ok(())
}
