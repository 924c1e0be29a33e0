use thiserror::Error;

/// Batch-level failures. Everything that goes wrong for a single URL is
/// recorded inside the batch result instead; only these short-circuit the
/// whole invocation.
#[derive(Debug, Error)]
pub enum BatchError {
    /// The incoming URL list was empty or absent. Maps to HTTP 400.
    #[error("No URLs provided")]
    NoUrls,

    /// The browser could not be launched, so no URL was attempted. Maps to 500.
    #[error("browser launch failed: {0}")]
    Launch(String),
}
