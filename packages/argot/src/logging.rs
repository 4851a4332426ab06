//! Process-wide tracing setup for containers that want the default format.

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

/// Install the default subscriber: fmt output with `RUST_LOG`-style
/// filtering. `debug` widens the default filter; `RUST_LOG` always wins.
/// Does nothing if a subscriber is already installed, so embedding processes
/// keep control of their own logging.
pub fn init(debug: bool) {
    let default_filter = if debug { "argot=debug,info" } else { "info" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    let _ = tracing_subscriber::registry()
        .with(fmt::layer())
        .with(env_filter)
        .try_init();
}
