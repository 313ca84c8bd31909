//! HTTP surface of the facility slice.

mod handlers;

use crate::error::FacilityError;
use axum::http::StatusCode;
use freg_kernel::server::{ApiError, ApiState};
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

/// Routes under `/facilities`, documented for OpenAPI.
pub fn router() -> OpenApiRouter<ApiState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::register_handler))
        .routes(routes!(handlers::count_handler))
        .routes(routes!(handlers::get_handler, handlers::update_handler))
        .routes(routes!(handlers::deactivate_handler))
        .routes(routes!(handlers::reactivate_handler))
        .routes(routes!(handlers::is_owner_handler))
}

impl From<FacilityError> for ApiError {
    fn from(err: FacilityError) -> Self {
        let status = match &err {
            FacilityError::Validation { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            FacilityError::NotFound { .. } => StatusCode::NOT_FOUND,
            FacilityError::Unauthorized { .. } => StatusCode::FORBIDDEN,
            FacilityError::Storage { .. } | FacilityError::Internal { .. } => {
                return Self::internal(&err);
            },
        };
        Self::new(status, err.kind(), err.to_string())
    }
}
