//! OpenAPI document for the student endpoints.

use crate::error::{ErrorBody, ErrorDetail};
use crate::model::{Address, NewStudent, Student, StudentPatch, StudentSummary};
use crate::response::{Message, StudentBody, StudentCreated, StudentList};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::students::create,
        crate::handlers::students::list,
        crate::handlers::students::read,
        crate::handlers::students::update,
        crate::handlers::students::delete,
    ),
    components(
        schemas(
            Address, Student, NewStudent, StudentPatch, StudentSummary,
            StudentCreated, StudentBody, StudentList, Message,
            ErrorBody, ErrorDetail
        )
    ),
    tags(
        (name = "students", description = "Student record management")
    ),
    info(
        title = "Student Records API",
        description = "Create, list, fetch, patch and delete student records"
    )
)]
pub struct ApiDoc;
