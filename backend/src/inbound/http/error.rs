//! HTTP adapter mapping for domain errors.
//!
//! Purpose: keep the domain error type HTTP-agnostic while allowing Actix
//! handlers to turn domain failures into consistent JSON responses and
//! status codes.

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use tracing::error;

use crate::domain::{Error, ErrorCode};

/// Convenient result alias for HTTP handlers.
pub type ApiResult<T> = Result<T, Error>;

fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::InvalidRequest => StatusCode::BAD_REQUEST,
        ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
        ErrorCode::Forbidden => StatusCode::FORBIDDEN,
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::Conflict => StatusCode::CONFLICT,
        ErrorCode::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn redact_if_internal(err: &Error) -> Error {
    if matches!(err.code(), ErrorCode::InternalError) {
        Error::internal("Internal server error")
    } else {
        err.clone()
    }
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        status_for(self.code())
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(redact_if_internal(self))
    }
}

impl From<actix_web::Error> for Error {
    fn from(err: actix_web::Error) -> Self {
        // Do not leak implementation details to clients.
        error!(error = %err, "actix error promoted to domain error");
        Error::internal("Internal server error")
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use actix_web::body::to_bytes;
    use rstest::rstest;
    use serde_json::{Value, json};

    #[rstest]
    #[case(Error::invalid_request("bad"), StatusCode::BAD_REQUEST)]
    #[case(Error::unauthorized("no auth"), StatusCode::UNAUTHORIZED)]
    #[case(Error::forbidden("denied"), StatusCode::FORBIDDEN)]
    #[case(Error::not_found("missing"), StatusCode::NOT_FOUND)]
    #[case(Error::conflict("taken"), StatusCode::CONFLICT)]
    #[case(Error::service_unavailable("down"), StatusCode::SERVICE_UNAVAILABLE)]
    #[case(Error::internal("boom"), StatusCode::INTERNAL_SERVER_ERROR)]
    fn status_code_matches_error_code(#[case] err: Error, #[case] status: StatusCode) {
        assert_eq!(err.status_code(), status);
    }

    #[actix_web::test]
    async fn internal_errors_are_redacted() {
        let err = Error::internal("secret detail").with_details(json!({ "secret": "x" }));
        let response = err.error_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let bytes = to_bytes(response.into_body())
            .await
            .expect("reading response body succeeds");
        let value: Value = serde_json::from_slice(&bytes).expect("error payload");
        assert_eq!(
            value.get("message").and_then(Value::as_str),
            Some("Internal server error")
        );
        assert!(value.get("details").is_none());
    }

    #[actix_web::test]
    async fn client_errors_expose_details() {
        let err = Error::invalid_request("bad").with_details(json!({ "field": "title" }));
        let response = err.error_response();
        let bytes = to_bytes(response.into_body())
            .await
            .expect("reading response body succeeds");
        let value: Value = serde_json::from_slice(&bytes).expect("error payload");
        assert_eq!(value.get("message").and_then(Value::as_str), Some("bad"));
        assert_eq!(
            value.pointer("/details/field").and_then(Value::as_str),
            Some("title")
        );
    }
}
