//! Shared application state for all routes. Built once at startup and cloned per request.

use crate::document::PatchPolicy;
use crate::store::StudentStore;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn StudentStore>,
    pub patch_policy: PatchPolicy,
}

impl AppState {
    pub fn new(store: Arc<dyn StudentStore>, patch_policy: PatchPolicy) -> Self {
        AppState { store, patch_policy }
    }
}
