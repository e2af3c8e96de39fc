//! Student CRUD against any [`StudentStore`].

use crate::document::{Document, Patch, PatchPolicy};
use crate::error::AppError;
use crate::id::short_id;
use crate::model::{NewStudent, Student};
use crate::store::{ListQuery, StudentStore};
use serde_json::Value;

pub struct StudentService;

impl StudentService {
    /// Validate the body, assign a fresh id (any client id is discarded) and persist. Returns the id.
    pub async fn create(store: &dyn StudentStore, body: &Value) -> Result<String, AppError> {
        let new = NewStudent::from_value(body)?;
        let student = Student::new(short_id(), new);
        store.insert(&student.id, student.to_document()).await?;
        tracing::info!(id = %student.id, "student created");
        Ok(student.id)
    }

    /// Name and age of each matching student, in insertion order.
    pub async fn list(store: &dyn StudentStore, query: &ListQuery) -> Result<Vec<Document>, AppError> {
        store.list(query).await
    }

    pub async fn get(store: &dyn StudentStore, id: &str) -> Result<Document, AppError> {
        store.find(id).await?.ok_or(AppError::NotFound)
    }

    /// Merge `body` into the stored record and return the result. Never creates a record.
    pub async fn update(
        store: &dyn StudentStore,
        policy: PatchPolicy,
        id: &str,
        body: Value,
    ) -> Result<Document, AppError> {
        let patch = Patch::parse(body, policy)?;
        if patch.is_empty() {
            return Self::get(store, id).await;
        }
        let doc = store.update(id, &patch).await?.ok_or(AppError::NotFound)?;
        let fields: Vec<&String> = patch.fields().map(|(k, _)| k).collect();
        tracing::info!(id = %id, fields = ?fields, "student updated");
        Ok(doc)
    }

    pub async fn delete(store: &dyn StudentStore, id: &str) -> Result<(), AppError> {
        if !store.delete(id).await? {
            return Err(AppError::NotFound);
        }
        tracing::info!(id = %id, "student deleted");
        Ok(())
    }
}
