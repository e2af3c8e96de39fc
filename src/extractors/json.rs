//! JSON body extractor whose rejections use the service's error body.

use crate::error::AppError;
use async_trait::async_trait;
use axum::{
    extract::{rejection::JsonRejection, FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;

/// Like [`axum::Json`], but a malformed body becomes an [`AppError`].
#[derive(Clone, Debug)]
pub struct ValidJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ValidJson<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(ValidJson(value)),
            Err(rejection) => {
                tracing::warn!(status = %rejection.status(), reason = %rejection.body_text(), "rejected request body");
                Err(match rejection {
                    JsonRejection::JsonDataError(e) => AppError::validation(e.body_text()),
                    JsonRejection::JsonSyntaxError(e) => AppError::BadRequest(e.body_text()),
                    other => AppError::Rejected(other.status(), other.body_text()),
                })
            }
        }
    }
}
