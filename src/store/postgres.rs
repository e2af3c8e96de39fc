//! Student documents as JSONB rows in PostgreSQL.
//!
//! Table layout: `seq` is the internal key and defines insertion order, `id` is the external
//! key (unique), `doc` holds the whole record including `id`.

use super::{ListQuery, StudentStore, SUMMARY_FIELDS};
use crate::document::{Document, Patch};
use crate::error::AppError;
use async_trait::async_trait;
use serde_json::Value;
use sqlx::postgres::{PgConnectOptions, PgPool};
use sqlx::ConnectOptions;

const COLLECTION: &str = "students";

/// Quote identifier for PostgreSQL (schema names come from config only).
fn quoted(s: &str) -> String {
    format!("\"{}\"", s.replace('"', "\"\""))
}

fn qualified_collection(schema: &str) -> String {
    format!("{}.{}", quoted(schema), quoted(COLLECTION))
}

/// Create the schema and `students` table if missing.
pub async fn ensure_students_collection(pool: &PgPool, schema: &str) -> Result<(), AppError> {
    sqlx::query(&format!("CREATE SCHEMA IF NOT EXISTS {}", quoted(schema)))
        .execute(pool)
        .await?;
    let ddl = format!(
        r#"
        CREATE TABLE IF NOT EXISTS {} (
            seq BIGSERIAL PRIMARY KEY,
            id TEXT NOT NULL UNIQUE,
            doc JSONB NOT NULL
        )
        "#,
        qualified_collection(schema)
    );
    sqlx::query(&ddl).execute(pool).await?;
    Ok(())
}

/// Create the target database through the `postgres` maintenance database if it does not exist.
pub async fn ensure_database_exists(opts: &PgConnectOptions) -> Result<(), AppError> {
    let db_name = match opts.get_database() {
        Some(name) if !name.is_empty() && name != "postgres" => name.to_string(),
        _ => return Ok(()),
    };
    let mut conn = opts.clone().database("postgres").connect().await?;
    let exists: (bool,) = sqlx::query_as("SELECT EXISTS(SELECT 1 FROM pg_database WHERE datname = $1)")
        .bind(&db_name)
        .fetch_one(&mut conn)
        .await?;
    if !exists.0 {
        tracing::info!(database = %db_name, "creating database");
        sqlx::query(&format!("CREATE DATABASE {}", quoted(&db_name)))
            .execute(&mut conn)
            .await?;
    }
    Ok(())
}

enum Param {
    Text(String),
    Int(i64),
}

#[derive(Clone)]
pub struct PgDocumentStore {
    pool: PgPool,
    table: String,
}

impl PgDocumentStore {
    pub fn new(pool: PgPool, schema: &str) -> Self {
        PgDocumentStore {
            pool,
            table: qualified_collection(schema),
        }
    }

    /// SELECT for list: filters in `doc`, projection to the summary fields, insertion order.
    fn list_sql(&self, query: &ListQuery) -> (String, Vec<Param>) {
        let mut params = Vec::new();
        let mut clauses = Vec::new();
        if let Some(country) = &query.country {
            params.push(Param::Text(country.clone()));
            clauses.push(format!("doc->'address'->'country' = to_jsonb(${}::text)", params.len()));
        }
        if let Some(min_age) = query.min_age {
            params.push(Param::Int(min_age));
            clauses.push(format!(
                "CASE WHEN jsonb_typeof(doc->'age') = 'number' THEN (doc->>'age')::numeric >= ${} ELSE FALSE END",
                params.len()
            ));
        }
        let where_sql = if clauses.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", clauses.join(" AND "))
        };
        let keep = SUMMARY_FIELDS
            .iter()
            .map(|f| format!("'{}'", f))
            .collect::<Vec<_>>()
            .join(", ");
        params.push(Param::Int(i64::try_from(query.limit).unwrap_or(i64::MAX)));
        let limit_idx = params.len();
        params.push(Param::Int(i64::try_from(query.skip).unwrap_or(i64::MAX)));
        let offset_idx = params.len();
        let sql = format!(
            "SELECT COALESCE((SELECT jsonb_object_agg(key, value) FROM jsonb_each(doc) WHERE key IN ({})), '{{}}'::jsonb) \
             FROM {}{} ORDER BY seq LIMIT ${} OFFSET ${}",
            keep, self.table, where_sql, limit_idx, offset_idx
        );
        (sql, params)
    }
}

fn into_document(v: Value) -> Document {
    match v {
        Value::Object(m) => m,
        _ => Document::new(),
    }
}

#[async_trait]
impl StudentStore for PgDocumentStore {
    async fn insert(&self, id: &str, mut doc: Document) -> Result<(), AppError> {
        doc.insert("id".into(), Value::String(id.to_string()));
        let sql = format!("INSERT INTO {} (id, doc) VALUES ($1, $2)", self.table);
        tracing::debug!(sql = %sql, id = %id, "insert");
        sqlx::query(&sql)
            .bind(id)
            .bind(Value::Object(doc))
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn list(&self, query: &ListQuery) -> Result<Vec<Document>, AppError> {
        let (sql, params) = self.list_sql(query);
        tracing::debug!(sql = %sql, query = ?query, "list");
        let mut q = sqlx::query_scalar::<_, Value>(&sql);
        for p in params {
            q = match p {
                Param::Text(s) => q.bind(s),
                Param::Int(n) => q.bind(n),
            };
        }
        let rows = q.fetch_all(&self.pool).await?;
        Ok(rows.into_iter().map(into_document).collect())
    }

    async fn find(&self, id: &str) -> Result<Option<Document>, AppError> {
        let sql = format!("SELECT doc FROM {} WHERE id = $1", self.table);
        tracing::debug!(sql = %sql, id = %id, "find");
        let row: Option<Value> = sqlx::query_scalar(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(into_document))
    }

    async fn update(&self, id: &str, patch: &Patch) -> Result<Option<Document>, AppError> {
        let select = format!("SELECT doc FROM {} WHERE id = $1 FOR UPDATE", self.table);
        let write = format!("UPDATE {} SET doc = $2 WHERE id = $1", self.table);
        tracing::debug!(sql = %write, id = %id, "update");
        let mut tx = self.pool.begin().await?;
        let current: Option<Value> = sqlx::query_scalar(&select)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;
        let Some(current) = current else {
            return Ok(None);
        };
        let merged = patch.merged(&into_document(current))?;
        sqlx::query(&write)
            .bind(id)
            .bind(Value::Object(merged.clone()))
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(Some(merged))
    }

    async fn delete(&self, id: &str) -> Result<bool, AppError> {
        let sql = format!("DELETE FROM {} WHERE id = $1", self.table);
        tracing::debug!(sql = %sql, id = %id, "delete");
        let result = sqlx::query(&sql).bind(id).execute(&self.pool).await?;
        Ok(result.rows_affected() > 0)
    }

    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").fetch_optional(&self.pool).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::postgres::PgPoolOptions;

    fn store() -> PgDocumentStore {
        let pool = PgPoolOptions::new()
            .connect_lazy("postgres://localhost/students")
            .unwrap();
        PgDocumentStore::new(pool, "public")
    }

    #[tokio::test]
    async fn unfiltered_list_orders_by_insertion_and_windows() {
        let (sql, params) = store().list_sql(&ListQuery::default());
        assert!(sql.contains("FROM \"public\".\"students\" ORDER BY seq LIMIT $1 OFFSET $2"), "{sql}");
        assert!(sql.contains("key IN ('name', 'age')"), "{sql}");
        assert_eq!(params.len(), 2);
    }

    #[tokio::test]
    async fn filters_are_numbered_before_the_window() {
        let q = ListQuery::new(Some("France".into()), Some(21), Some(2), Some(5));
        let (sql, params) = store().list_sql(&q);
        assert!(sql.contains("doc->'address'->'country' = to_jsonb($1::text)"), "{sql}");
        assert!(sql.contains("(doc->>'age')::numeric >= $2"), "{sql}");
        assert!(sql.contains("LIMIT $3 OFFSET $4"), "{sql}");
        assert!(matches!(params[2], Param::Int(5)));
        assert!(matches!(params[3], Param::Int(5)));
    }

    #[test]
    fn schema_names_are_quoted() {
        assert_eq!(qualified_collection("we\"ird"), "\"we\"\"ird\".\"students\"");
    }
}
