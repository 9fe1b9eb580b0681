//! Application state for shared services

use std::sync::Arc;

use crate::infrastructure::{MicropostService, UserService};

/// Application state containing shared services
#[derive(Debug, Clone)]
pub struct AppState {
    pub user_service: Arc<UserService>,
    pub micropost_service: Arc<MicropostService>,
}

impl AppState {
    pub fn new(user_service: Arc<UserService>, micropost_service: Arc<MicropostService>) -> Self {
        Self {
            user_service,
            micropost_service,
        }
    }
}
