use std::sync::Arc;
use std::time::Duration;

use crate::repository::UserRepository;

/// Dependencies shared by every request handler.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserRepository>,
    /// Upper bound on a single repository call.
    pub request_timeout: Duration,
}

impl AppState {
    pub fn new(users: Arc<dyn UserRepository>, request_timeout: Duration) -> Self {
        Self {
            users,
            request_timeout,
        }
    }
}
