/// Initializes structured logging for the console.
///
/// Verbosity comes from `RUST_LOG`:
/// - `RUST_LOG=info` - fetches and mutations
/// - `RUST_LOG=debug` - queries, payloads, skipped duplicates
/// - `RUST_LOG=list_controller=debug` - only the controller internals
///
/// Calling it twice panics, like any global subscriber install.
pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .init();
}
