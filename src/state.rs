use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::services::storage::ObjectStorage;
use crate::services::timelines::TimelineService;

/// Shared by every handler. Built once at start-up from explicit parts.
#[derive(Clone)]
pub struct AppState {
    pub timelines: TimelineService,
    pub storage: Arc<dyn ObjectStorage>,
    pub upload_max_bytes: usize,
}

impl AppState {
    pub fn new(db: DatabaseConnection, storage: Arc<dyn ObjectStorage>, upload_max_bytes: usize) -> Self {
        Self {
            timelines: TimelineService::new(db),
            storage,
            upload_max_bytes,
        }
    }
}
