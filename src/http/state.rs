//! Application state for the HTTP server.

use std::sync::Arc;

use crate::db::repository::FullRepository;
use crate::models::{Clock, SystemClock};

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Repository instance for database operations
    pub repository: Arc<dyn FullRepository>,
    /// Time source; swapped for a fixed clock in tests
    pub clock: Arc<dyn Clock>,
}

impl AppState {
    /// Create application state with the wall clock.
    pub fn new(repository: Arc<dyn FullRepository>) -> Self {
        Self {
            repository,
            clock: Arc::new(SystemClock),
        }
    }

    /// Create application state with an explicit clock.
    pub fn with_clock(repository: Arc<dyn FullRepository>, clock: Arc<dyn Clock>) -> Self {
        Self { repository, clock }
    }
}
