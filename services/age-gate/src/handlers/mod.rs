use axum::{Json, extract::rejection::JsonRejection};

use crate::error::AgeGateError;

pub mod access;
pub mod admin;
pub mod health;
pub mod persona;
pub mod verification;

/// Unwrap a JSON body, replacing any extractor rejection with `invalid`.
pub(crate) fn json_body<T>(
    body: Result<Json<T>, JsonRejection>,
    invalid: AgeGateError,
) -> Result<T, AgeGateError> {
    match body {
        Ok(Json(value)) => Ok(value),
        Err(rejection) => {
            tracing::debug!(error = %rejection.body_text(), "request body rejected");
            Err(invalid)
        }
    }
}
