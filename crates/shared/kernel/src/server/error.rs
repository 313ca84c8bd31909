use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use freg_derive::api_model;
use std::borrow::Cow;

/// JSON error body returned by every route.
#[api_model]
#[derive(Clone, PartialEq, Eq)]
pub struct ErrorBody {
    /// Machine-readable error kind (`validation`, `not_found`, ...).
    pub error: String,
    /// Human-readable description.
    pub message: String,
}

/// An HTTP status paired with an [`ErrorBody`].
#[derive(Debug, Clone)]
pub struct ApiError {
    pub status: StatusCode,
    pub kind: Cow<'static, str>,
    pub message: String,
}

impl ApiError {
    pub fn new(
        status: StatusCode,
        kind: impl Into<Cow<'static, str>>,
        message: impl Into<String>,
    ) -> Self {
        Self { status, kind: kind.into(), message: message.into() }
    }

    /// 401: the request carried no usable caller identity.
    pub fn unauthenticated(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, "unauthenticated", message)
    }

    /// 400: a path or body parameter could not be parsed.
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "bad_request", message)
    }

    /// 500 with a generic message; the detail is logged, not returned.
    pub fn internal(detail: &dyn std::fmt::Display) -> Self {
        tracing::error!(error = %detail, "Request failed");
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "internal", "internal server error")
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody { error: self.kind.into_owned(), message: self.message };
        (self.status, Json(body)).into_response()
    }
}
