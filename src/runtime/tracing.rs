/// Initializes the tracing/logging infrastructure for the application.
///
/// Structured logging via the `tracing` crate with:
/// - **Environment-based filtering**: controlled via the `RUST_LOG` variable
/// - **Pretty formatting**: human-readable output with timestamps and levels
///
/// # Environment Variables
///
/// Set `RUST_LOG` to control log verbosity:
/// - `RUST_LOG=info` - info, warn, and error messages
/// - `RUST_LOG=scope_resolver=debug` - engine state transitions only
/// - `RUST_LOG=trace` - everything (very verbose)
///
/// # Example
///
/// ```ignore
/// setup_tracing();
/// tracing::info!("Application started");
/// ```
pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();
}
