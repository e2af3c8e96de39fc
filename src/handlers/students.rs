//! Student handlers: create, list, read, update, delete.

use crate::error::{AppError, ErrorBody};
use crate::extractors::ValidJson;
use crate::model::{NewStudent, StudentPatch};
use crate::response::{self, Message, StudentBody, StudentCreated, StudentList};
use crate::service::StudentService;
use crate::state::AppState;
use crate::store::ListQuery;
use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use serde_json::Value;
use std::collections::HashMap;

pub const DELETED_MESSAGE: &str = "Student deleted successfully";

/// POST /students/: any `id` in the body is ignored.
#[utoipa::path(
    post,
    path = "/students/",
    tag = "students",
    request_body = NewStudent,
    responses(
        (status = 201, description = "Student created; body carries the new id", body = StudentCreated),
        (status = 422, description = "Missing or mistyped field", body = ErrorBody)
    )
)]
pub async fn create(
    State(state): State<AppState>,
    ValidJson(body): ValidJson<Value>,
) -> Result<impl IntoResponse, AppError> {
    let id = StudentService::create(state.store.as_ref(), &body).await?;
    Ok(response::created(id))
}

/// GET /students/: `age` is a lower bound (age >= value), not an exact match.
#[utoipa::path(
    get,
    path = "/students/",
    tag = "students",
    params(
        ("country" = Option<String>, Query, description = "Exact, case-sensitive match on address.country"),
        ("age" = Option<i64>, Query, description = "Minimum age (inclusive)"),
        ("page" = Option<i64>, Query, description = "1-based page, default 1"),
        ("page_size" = Option<i64>, Query, description = "Page size, default 10, max 100")
    ),
    responses(
        (status = 200, description = "Name and age of matching students, in insertion order", body = StudentList),
        (status = 422, description = "Non-integer query value", body = ErrorBody)
    )
)]
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<impl IntoResponse, AppError> {
    let query = ListQuery::from_params(&params)?;
    let data = StudentService::list(state.store.as_ref(), &query).await?;
    Ok(response::list_ok(data))
}

#[utoipa::path(
    get,
    path = "/students/{id}",
    tag = "students",
    params(("id" = String, Path, description = "Student id")),
    responses(
        (status = 200, description = "Full student record", body = StudentBody),
        (status = 404, description = "No student with this id", body = ErrorBody)
    )
)]
pub async fn read(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let doc = StudentService::get(state.store.as_ref(), &id).await?;
    Ok(response::student_ok(doc))
}

/// PATCH /students/{id}: keys are field paths; `address.city` sets one nested field.
#[utoipa::path(
    patch,
    path = "/students/{id}",
    tag = "students",
    params(("id" = String, Path, description = "Student id")),
    request_body = StudentPatch,
    responses(
        (status = 200, description = "Record after the merge", body = StudentBody),
        (status = 404, description = "No student with this id", body = ErrorBody),
        (status = 422, description = "Field rejected by the patch policy", body = ErrorBody)
    )
)]
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidJson(body): ValidJson<Value>,
) -> Result<impl IntoResponse, AppError> {
    let doc = StudentService::update(state.store.as_ref(), state.patch_policy, &id, body).await?;
    Ok(response::student_ok(doc))
}

#[utoipa::path(
    delete,
    path = "/students/{id}",
    tag = "students",
    params(("id" = String, Path, description = "Student id")),
    responses(
        (status = 200, description = "Student removed", body = Message),
        (status = 404, description = "No student with this id", body = ErrorBody)
    )
)]
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    StudentService::delete(state.store.as_ref(), &id).await?;
    Ok(response::message_ok(DELETED_MESSAGE))
}
