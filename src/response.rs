//! Response envelopes for the student endpoints.

use crate::document::Document;
use crate::model::{Student, StudentSummary};
use axum::{http::StatusCode, Json};
use serde::Serialize;
use utoipa::ToSchema;

/// `{"student": "<id>"}`
#[derive(Serialize, ToSchema)]
pub struct StudentCreated {
    pub student: String,
}

/// `{"student": {...}}` with the full stored record.
#[derive(Serialize, ToSchema)]
pub struct StudentBody {
    #[schema(value_type = Student)]
    pub student: Document,
}

/// `{"data": [{"name", "age"}, ...]}`
#[derive(Serialize, ToSchema)]
pub struct StudentList {
    #[schema(value_type = Vec<StudentSummary>)]
    pub data: Vec<Document>,
}

#[derive(Serialize, ToSchema)]
pub struct Message {
    pub message: &'static str,
}

pub fn created(id: String) -> (StatusCode, Json<StudentCreated>) {
    (StatusCode::CREATED, Json(StudentCreated { student: id }))
}

pub fn student_ok(student: Document) -> (StatusCode, Json<StudentBody>) {
    (StatusCode::OK, Json(StudentBody { student }))
}

pub fn list_ok(data: Vec<Document>) -> (StatusCode, Json<StudentList>) {
    (StatusCode::OK, Json(StudentList { data }))
}

pub fn message_ok(message: &'static str) -> (StatusCode, Json<Message>) {
    (StatusCode::OK, Json(Message { message }))
}
