//! In-process student collection. Insertion order is kept; ids are looked up linearly.

use super::{project_summary, ListQuery, StudentStore};
use crate::document::{Document, Patch};
use crate::error::AppError;
use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;

#[derive(Default)]
pub struct MemoryStore {
    docs: RwLock<Vec<Document>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.docs.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.docs.read().await.is_empty()
    }
}

fn has_id(doc: &Document, id: &str) -> bool {
    doc.get("id").and_then(Value::as_str) == Some(id)
}

#[async_trait]
impl StudentStore for MemoryStore {
    async fn insert(&self, id: &str, mut doc: Document) -> Result<(), AppError> {
        doc.insert("id".into(), Value::String(id.to_string()));
        self.docs.write().await.push(doc);
        Ok(())
    }

    async fn list(&self, query: &ListQuery) -> Result<Vec<Document>, AppError> {
        let docs = self.docs.read().await;
        let skip = usize::try_from(query.skip).unwrap_or(usize::MAX);
        let limit = usize::try_from(query.limit).unwrap_or(usize::MAX);
        Ok(docs
            .iter()
            .filter(|d| query.matches(d))
            .skip(skip)
            .take(limit)
            .map(project_summary)
            .collect())
    }

    async fn find(&self, id: &str) -> Result<Option<Document>, AppError> {
        let docs = self.docs.read().await;
        Ok(docs.iter().find(|d| has_id(d, id)).cloned())
    }

    async fn update(&self, id: &str, patch: &Patch) -> Result<Option<Document>, AppError> {
        let mut docs = self.docs.write().await;
        let Some(slot) = docs.iter_mut().find(|d| has_id(d, id)) else {
            return Ok(None);
        };
        let merged = patch.merged(slot)?;
        *slot = merged.clone();
        Ok(Some(merged))
    }

    async fn delete(&self, id: &str) -> Result<bool, AppError> {
        let mut docs = self.docs.write().await;
        match docs.iter().position(|d| has_id(d, id)) {
            Some(pos) => {
                docs.remove(pos);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }
}
