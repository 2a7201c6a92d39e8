use tracing_subscriber::EnvFilter;

/// Install a global tracing subscriber for the process embedding the
/// queue.
///
/// The queue only emits `tracing` events; with no subscriber installed
/// they are dropped, which is the right default for a library. Embedding
/// applications (and tests) that want to see scheduler activity can call
/// this once at startup:
///
/// ```no_run
/// turno_core::telemetry::init_tracing("turno_core=debug").expect("first subscriber");
/// ```
///
/// `default_filter` is used when `RUST_LOG` is unset; the environment
/// variable always wins. Fails if some other global subscriber is already
/// installed, so callers that may race an existing setup (test binaries,
/// larger applications) can retry-tolerantly ignore the result.
pub fn init_tracing(
    default_filter: &str,
) -> Result<(), Box<dyn std::error::Error + Send + Sync + 'static>> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .compact()
        .try_init()
}
