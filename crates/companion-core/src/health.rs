use axum::http::StatusCode;

/// `GET /healthz`. Answers as long as the process can serve HTTP; no
/// dependency is consulted.
pub async fn healthz() -> StatusCode {
    StatusCode::OK
}

/// Map the outcome of a dependency check to a readiness status:
/// `200` when it passed, `503` otherwise.
pub fn readiness<E>(check: Result<(), E>) -> StatusCode {
    match check {
        Ok(()) => StatusCode::OK,
        Err(_) => StatusCode::SERVICE_UNAVAILABLE,
    }
}
