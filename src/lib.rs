pub mod api;
pub mod config;
mod error;
pub mod monitor;
pub mod orchestrator;

pub use api::{ApiClient, LoanApplication, PredictionOutcome, PredictionResult};
pub use config::ApiConfig;
pub use error::ClientError;
pub use monitor::{probe, ServerStatus, StatusHandle, StatusMonitor};
pub use orchestrator::Predictor;

/// Initialize structured logging for the binary. `RUST_LOG` overrides the
/// default `info` filter.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();
}
