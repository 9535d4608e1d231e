use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use uuid::Uuid;

/// Tracks the preview URLs handed out for staged images. A URL stays live
/// until its [`PreviewHandle`] is dropped.
#[derive(Clone, Default)]
pub struct PreviewRegistry {
    live: Arc<Mutex<HashSet<String>>>,
}

impl PreviewRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create(&self) -> PreviewHandle {
        let url = format!("blob:preview/{}", Uuid::new_v4());
        self.lock().insert(url.clone());
        PreviewHandle {
            url,
            registry: self.clone(),
        }
    }

    pub fn is_live(&self, url: &str) -> bool {
        self.lock().contains(url)
    }

    pub fn live_count(&self) -> usize {
        self.lock().len()
    }

    fn revoke(&self, url: &str) {
        if self.lock().remove(url) {
            tracing::trace!(url, "preview revoked");
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashSet<String>> {
        self.live.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[derive(Debug)]
pub struct PreviewHandle {
    url: String,
    registry: PreviewRegistry,
}

impl PreviewHandle {
    pub fn url(&self) -> &str {
        &self.url
    }
}

impl Drop for PreviewHandle {
    fn drop(&mut self) {
        self.registry.revoke(&self.url);
    }
}

impl std::fmt::Debug for PreviewRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PreviewRegistry")
            .field("live", &self.live_count())
            .finish()
    }
}
