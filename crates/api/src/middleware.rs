//! API state.

use nadecast_queue::ResultCorrelator;

/// Application state.
#[derive(Clone)]
pub struct AppState {
    /// Submits publish jobs and waits for their results.
    pub correlator: ResultCorrelator,
}

impl AppState {
    /// Create the state.
    #[must_use]
    pub const fn new(correlator: ResultCorrelator) -> Self {
        Self { correlator }
    }
}
