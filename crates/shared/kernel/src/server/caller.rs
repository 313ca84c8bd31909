use super::error::ApiError;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use freg_domain::Principal;
use freg_domain::constants::PRINCIPAL_HEADER;

/// Caller identity taken from the `x-principal` header.
///
/// Rejects with `401` when the header is absent, not ASCII, or not a valid
/// [`Principal`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caller(pub Principal);

impl<S: Send + Sync> FromRequestParts<S> for Caller {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let value = parts
            .headers
            .get(PRINCIPAL_HEADER)
            .ok_or_else(|| ApiError::unauthenticated(format!("missing {PRINCIPAL_HEADER} header")))?;

        let raw = value
            .to_str()
            .map_err(|_| ApiError::unauthenticated(format!("{PRINCIPAL_HEADER} is not ASCII")))?;

        Principal::parse(raw)
            .map(Self)
            .map_err(|e| ApiError::unauthenticated(format!("invalid {PRINCIPAL_HEADER}: {e}")))
    }
}
