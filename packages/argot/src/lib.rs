//! # argot
//!
//! Session core for translation containers: processes that sit between a
//! central orchestrator and agents speaking a custom dialect, translating
//! traffic in both directions and minting key material on request.
//!
//! A container holds one persistent QUIC connection to the orchestrator and
//! serves each capability over its own long-lived bidirectional stream. The
//! [`session`] module owns the lifecycle: a supervisor dials, spawns one
//! worker per capability, tears the whole session down when any worker hits
//! an unrecoverable error, and redials after a fixed delay, forever. Workers
//! route every inbound request through the [`argot_registry`] bundle for the
//! container name the request declares.
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use argot::SessionConfig;
//! use argot_registry::HandlerRegistry;
//!
//! # async fn demo() -> anyhow::Result<()> {
//! let registry = Arc::new(HandlerRegistry::new());
//! registry.register("my-translator", argot::passthrough::bundle());
//!
//! let config = SessionConfig::load()?;
//! argot::session::run("my-translator", &config, registry).await?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod envelope;
pub mod logging;
pub mod passthrough;
pub mod protocol;
pub mod session;
pub mod transport;

#[cfg(test)]
pub(crate) mod test_support;

pub use config::SessionConfig;
pub use session::SessionSupervisor;
