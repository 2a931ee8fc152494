//! Application state for the HTTP server.

use std::sync::Arc;

use crate::booking::BookingPolicy;
use crate::db::repository::FullRepository;
use crate::services::OperatingWindow;

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Repository instance for database operations
    pub repository: Arc<dyn FullRepository>,
    /// Admission policy applied to every reservation write
    pub policy: BookingPolicy,
    /// Operating window used when generating court slots
    pub window: OperatingWindow,
}

impl AppState {
    /// Create a new application state with the given repository and the
    /// policy knobs read from the environment.
    pub fn new(repository: Arc<dyn FullRepository>) -> Self {
        Self {
            repository,
            policy: BookingPolicy::from_env(),
            window: OperatingWindow::from_env(),
        }
    }

    /// Create a state with explicit policy and window, for tests and
    /// non-default deployments.
    pub fn with_policy(
        repository: Arc<dyn FullRepository>,
        policy: BookingPolicy,
        window: OperatingWindow,
    ) -> Self {
        Self {
            repository,
            policy,
            window,
        }
    }
}
