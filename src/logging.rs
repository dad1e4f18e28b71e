//! Tracing setup for entry points that host the unwrapper.

use tracing_subscriber::EnvFilter;

/// Install a `fmt` subscriber filtered by `RUST_LOG` (default `info`).
///
/// Warm serverless invocations may call this repeatedly; only the first call
/// installs anything. Returns whether this call installed the subscriber.
pub fn init() -> bool {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .try_init()
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_is_idempotent() {
        init();
        assert!(!init());
        tracing::debug!("subscriber still usable");
    }
}
