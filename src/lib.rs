//! Student records: CRUD REST backend over a JSONB document store.

pub mod app;
pub mod config;
pub mod document;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod id;
pub mod model;
pub mod openapi;
pub mod response;
pub mod routes;
pub mod service;
pub mod state;
pub mod store;
pub mod telemetry;

pub use app::build_app;
pub use config::{CorsOrigins, DatabaseConfig, ServiceConfig, StoreKind};
pub use document::{Document, Patch, PatchPolicy};
pub use error::{AppError, ConfigError};
pub use model::{Address, NewStudent, Student};
pub use routes::{common_routes, common_routes_with_ready, student_routes};
pub use service::StudentService;
pub use state::AppState;
pub use store::{ensure_database_exists, ensure_students_collection, ListQuery, MemoryStore, PgDocumentStore, StudentStore};
pub use telemetry::init_tracing;
