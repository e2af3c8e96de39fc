//! Student collection access. One trait, two backends: JSONB documents in PostgreSQL
//! and an in-process collection for local runs and tests.

mod memory;
mod postgres;

pub use memory::MemoryStore;
pub use postgres::{ensure_database_exists, ensure_students_collection, PgDocumentStore};

use crate::document::{Document, Patch};
use crate::error::AppError;
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;

pub const DEFAULT_PAGE_SIZE: i64 = 10;
pub const MAX_PAGE_SIZE: i64 = 100;

/// Fields returned by list.
pub const SUMMARY_FIELDS: [&str; 2] = ["name", "age"];

/// Document-store operations over the student collection. Each call touches at most one
/// document and every single-document write is atomic.
#[async_trait]
pub trait StudentStore: Send + Sync {
    async fn insert(&self, id: &str, doc: Document) -> Result<(), AppError>;

    /// Summaries (see [`SUMMARY_FIELDS`]) in insertion order.
    async fn list(&self, query: &ListQuery) -> Result<Vec<Document>, AppError>;

    async fn find(&self, id: &str) -> Result<Option<Document>, AppError>;

    /// Applies `patch` to the document with `id`. `None` when no such document exists.
    async fn update(&self, id: &str, patch: &Patch) -> Result<Option<Document>, AppError>;

    /// Returns whether a document was removed.
    async fn delete(&self, id: &str) -> Result<bool, AppError>;

    async fn ping(&self) -> Result<(), AppError>;
}

/// Filters and window for list.
#[derive(Clone, Debug, PartialEq)]
pub struct ListQuery {
    /// Exact, case-sensitive match on `address.country`.
    pub country: Option<String>,
    /// `age >= min_age`.
    pub min_age: Option<i64>,
    pub skip: u64,
    pub limit: u64,
}

impl Default for ListQuery {
    fn default() -> Self {
        ListQuery::new(None, None, None, None)
    }
}

impl ListQuery {
    /// Empty country and an age of 0 mean "no filter". Page and page size fall back to
    /// 1 and [`DEFAULT_PAGE_SIZE`] when absent or not positive.
    pub fn new(country: Option<String>, age: Option<i64>, page: Option<i64>, page_size: Option<i64>) -> Self {
        let page = page.filter(|p| *p > 0).unwrap_or(1) as u64;
        let page_size = page_size
            .filter(|s| *s > 0)
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .min(MAX_PAGE_SIZE) as u64;
        ListQuery {
            country: country.filter(|c| !c.is_empty()),
            min_age: age.filter(|a| *a != 0),
            skip: (page - 1).saturating_mul(page_size),
            limit: page_size,
        }
    }

    /// From query-string parameters `country`, `age`, `page`, `page_size`. Other keys are ignored.
    pub fn from_params(params: &HashMap<String, String>) -> Result<Self, AppError> {
        let int = |key: &str| -> Result<Option<i64>, AppError> {
            match params.get(key).map(|s| s.trim()) {
                None | Some("") => Ok(None),
                Some(s) => s
                    .parse::<i64>()
                    .map(Some)
                    .map_err(|_| AppError::field(key, format!("{} must be an integer", key))),
            }
        };
        Ok(ListQuery::new(
            params.get("country").cloned(),
            int("age")?,
            int("page")?,
            int("page_size")?,
        ))
    }

    pub fn matches(&self, doc: &Document) -> bool {
        if let Some(country) = &self.country {
            let found = doc
                .get("address")
                .and_then(|a| a.get("country"))
                .and_then(Value::as_str);
            if found != Some(country.as_str()) {
                return false;
            }
        }
        if let Some(min) = self.min_age {
            match doc.get("age").and_then(Value::as_f64) {
                Some(age) if age >= min as f64 => {}
                _ => return false,
            }
        }
        true
    }
}

/// Keeps only the summary fields a document actually has.
pub fn project_summary(doc: &Document) -> Document {
    SUMMARY_FIELDS
        .iter()
        .filter_map(|k| doc.get(*k).map(|v| (k.to_string(), v.clone())))
        .collect()
}
