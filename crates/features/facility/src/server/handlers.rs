use crate::Facilities;
use crate::model::{Facility, FacilityDetails, FacilityId};
use axum::Json;
use axum::http::StatusCode;
use freg_derive::{api_handler, api_model};
use freg_domain::Principal;
use freg_domain::constants::FACILITY_TAG;
use freg_kernel::context::CallContext;
use freg_kernel::server::{ApiError, ApiJson, ApiPath, Caller, ErrorBody, Slice};

#[api_model]
/// Identifier of the newly registered facility.
pub(super) struct RegisteredResponse {
    #[schema(value_type = u64)]
    id: FacilityId,
}

#[api_model]
/// Facilities ever registered.
pub(super) struct CountResponse {
    count: u64,
}

#[api_model]
pub(super) struct SuccessResponse {
    success: bool,
}

#[api_model]
pub(super) struct OwnershipResponse {
    is_owner: bool,
}

const OK: Json<SuccessResponse> = Json(SuccessResponse { success: true });

fn context(facilities: &Facilities, caller: Principal) -> CallContext {
    CallContext::at(caller, facilities.clock.as_ref())
}

#[api_handler(
    post,
    path = "/facilities",
    request_body = FacilityDetails,
    params(("x-principal" = String, Header, description = "Caller identity")),
    responses(
        (status = CREATED, description = "Facility registered", body = RegisteredResponse),
        (status = UNAUTHORIZED, description = "Missing or invalid caller", body = ErrorBody),
        (status = UNPROCESSABLE_ENTITY, description = "Invalid details", body = ErrorBody),
    ),
    tag = FACILITY_TAG,
)]
pub(super) async fn register_handler(
    Slice(facilities): Slice<Facilities>,
    Caller(caller): Caller,
    ApiJson(details): ApiJson<FacilityDetails>,
) -> Result<(StatusCode, Json<RegisteredResponse>), ApiError> {
    let ctx = context(&facilities, caller);
    let id = facilities.registry.register_facility(&ctx, details).await?;
    Ok((StatusCode::CREATED, Json(RegisteredResponse { id })))
}

#[api_handler(
    get,
    path = "/facilities/count",
    responses((status = OK, description = "Facilities ever registered", body = CountResponse)),
    tag = FACILITY_TAG,
)]
pub(super) async fn count_handler(
    Slice(facilities): Slice<Facilities>,
) -> Result<Json<CountResponse>, ApiError> {
    let count = facilities.registry.facility_count().await?;
    Ok(Json(CountResponse { count }))
}

#[api_handler(
    get,
    path = "/facilities/{id}",
    params(("id" = u64, Path, description = "Facility id")),
    responses(
        (status = OK, description = "Facility record", body = Facility),
        (status = BAD_REQUEST, description = "Malformed facility id", body = ErrorBody),
        (status = NOT_FOUND, description = "Unknown facility", body = ErrorBody),
    ),
    tag = FACILITY_TAG,
)]
pub(super) async fn get_handler(
    Slice(facilities): Slice<Facilities>,
    ApiPath(id): ApiPath<FacilityId>,
) -> Result<Json<Facility>, ApiError> {
    Ok(Json(facilities.registry.get_facility(id).await?))
}

#[api_handler(
    put,
    path = "/facilities/{id}",
    request_body = FacilityDetails,
    params(
        ("id" = u64, Path, description = "Facility id"),
        ("x-principal" = String, Header, description = "Caller identity"),
    ),
    responses(
        (status = OK, description = "Facility updated", body = SuccessResponse),
        (status = FORBIDDEN, description = "Caller is not the owner", body = ErrorBody),
        (status = BAD_REQUEST, description = "Malformed facility id", body = ErrorBody),
        (status = NOT_FOUND, description = "Unknown facility", body = ErrorBody),
        (status = UNPROCESSABLE_ENTITY, description = "Invalid details", body = ErrorBody),
    ),
    tag = FACILITY_TAG,
)]
pub(super) async fn update_handler(
    Slice(facilities): Slice<Facilities>,
    Caller(caller): Caller,
    ApiPath(id): ApiPath<FacilityId>,
    ApiJson(details): ApiJson<FacilityDetails>,
) -> Result<Json<SuccessResponse>, ApiError> {
    let ctx = context(&facilities, caller);
    facilities.registry.update_facility(&ctx, id, details).await?;
    Ok(OK)
}

#[api_handler(
    post,
    path = "/facilities/{id}/deactivate",
    params(
        ("id" = u64, Path, description = "Facility id"),
        ("x-principal" = String, Header, description = "Caller identity"),
    ),
    responses(
        (status = OK, description = "Facility is inactive", body = SuccessResponse),
        (status = FORBIDDEN, description = "Caller is not the owner", body = ErrorBody),
        (status = BAD_REQUEST, description = "Malformed facility id", body = ErrorBody),
        (status = NOT_FOUND, description = "Unknown facility", body = ErrorBody),
    ),
    tag = FACILITY_TAG,
)]
pub(super) async fn deactivate_handler(
    Slice(facilities): Slice<Facilities>,
    Caller(caller): Caller,
    ApiPath(id): ApiPath<FacilityId>,
) -> Result<Json<SuccessResponse>, ApiError> {
    let ctx = context(&facilities, caller);
    facilities.registry.deactivate_facility(&ctx, id).await?;
    Ok(OK)
}

#[api_handler(
    post,
    path = "/facilities/{id}/reactivate",
    params(
        ("id" = u64, Path, description = "Facility id"),
        ("x-principal" = String, Header, description = "Caller identity"),
    ),
    responses(
        (status = OK, description = "Facility is active", body = SuccessResponse),
        (status = FORBIDDEN, description = "Caller is not the owner", body = ErrorBody),
        (status = BAD_REQUEST, description = "Malformed facility id", body = ErrorBody),
        (status = NOT_FOUND, description = "Unknown facility", body = ErrorBody),
    ),
    tag = FACILITY_TAG,
)]
pub(super) async fn reactivate_handler(
    Slice(facilities): Slice<Facilities>,
    Caller(caller): Caller,
    ApiPath(id): ApiPath<FacilityId>,
) -> Result<Json<SuccessResponse>, ApiError> {
    let ctx = context(&facilities, caller);
    facilities.registry.reactivate_facility(&ctx, id).await?;
    Ok(OK)
}

#[api_handler(
    get,
    path = "/facilities/{id}/owners/{principal}",
    params(
        ("id" = u64, Path, description = "Facility id"),
        ("principal" = String, Path, description = "Identity to check"),
    ),
    responses(
        (status = OK, description = "Ownership answer", body = OwnershipResponse),
        (status = BAD_REQUEST, description = "Malformed facility id", body = ErrorBody),
        (status = NOT_FOUND, description = "Unknown facility", body = ErrorBody),
        (status = UNPROCESSABLE_ENTITY, description = "Malformed principal", body = ErrorBody),
    ),
    tag = FACILITY_TAG,
)]
pub(super) async fn is_owner_handler(
    Slice(facilities): Slice<Facilities>,
    ApiPath((id, principal)): ApiPath<(FacilityId, String)>,
) -> Result<Json<OwnershipResponse>, ApiError> {
    let identity = Principal::parse(principal).map_err(|e| {
        ApiError::new(StatusCode::UNPROCESSABLE_ENTITY, "validation", e.to_string())
    })?;
    let is_owner = facilities.registry.is_facility_owner(id, &identity).await?;
    Ok(Json(OwnershipResponse { is_owner }))
}
