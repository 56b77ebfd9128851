use tracing_subscriber::EnvFilter;

/// Initialize the tracing subscriber from `RUST_LOG`, defaulting to info
/// for this crate and tower-http request traces.
pub fn init() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "server=info,tower_http=info".into()),
        )
        .init();
}
