//! Lending endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use axum_extra::extract::WithRejection;

use crate::{
    error::{AppError, AppResult, ErrorResponse},
    models::lending::{LendRequest, LendingRecord},
};

use super::{AdminCaller, ApiResponse, BorrowerCaller, LendingRecordListResponse, LendingRecordResponse};

/// Lend one unit of an item to the calling borrower (user)
#[utoipa::path(
    post,
    path = "/lends",
    tag = "lends",
    params(
        ("x-user-role" = String, Header, description = "Must be user"),
        ("x-user-id" = i32, Header, description = "Borrower ID"),
    ),
    request_body = LendRequest,
    responses(
        (status = 201, description = "Lend recorded; `data` holds the item after decrement", body = LendingRecordResponse),
        (status = 400, description = "Invalid input or missing borrower", body = ErrorResponse),
        (status = 403, description = "User role required", body = ErrorResponse),
        (status = 404, description = "Item not found", body = ErrorResponse),
        (status = 409, description = "Item is out of stock", body = ErrorResponse)
    )
)]
pub async fn create_lend(
    State(state): State<crate::AppState>,
    BorrowerCaller(borrower_id): BorrowerCaller,
    WithRejection(Json(request), _): WithRejection<Json<LendRequest>, AppError>,
) -> AppResult<(StatusCode, Json<ApiResponse<LendingRecord>>)> {
    let record = state.services.lending.lend(borrower_id, request).await?;

    Ok((
        StatusCode::CREATED,
        ApiResponse::ok("Item lent successfully", record),
    ))
}

/// List all lending records, newest first (admin)
#[utoipa::path(
    get,
    path = "/lends",
    tag = "lends",
    params(
        ("x-user-role" = String, Header, description = "Must be admin"),
    ),
    responses(
        (status = 200, description = "Lending records in `data`", body = LendingRecordListResponse),
        (status = 403, description = "Admin role required", body = ErrorResponse)
    )
)]
pub async fn list_lends(
    State(state): State<crate::AppState>,
    _admin: AdminCaller,
) -> AppResult<Json<ApiResponse<Vec<LendingRecord>>>> {
    let records = state.services.lending.list_lends().await?;
    Ok(ApiResponse::ok("Lending records retrieved successfully", records))
}

/// List the lending records of one borrower, newest first (admin)
#[utoipa::path(
    get,
    path = "/borrowers/{borrower_id}/lends",
    tag = "lends",
    params(
        ("borrower_id" = i32, Path, description = "Borrower ID"),
        ("x-user-role" = String, Header, description = "Must be admin"),
    ),
    responses(
        (status = 200, description = "Lending records in `data`", body = LendingRecordListResponse),
        (status = 403, description = "Admin role required", body = ErrorResponse)
    )
)]
pub async fn list_borrower_lends(
    State(state): State<crate::AppState>,
    _admin: AdminCaller,
    WithRejection(Path(borrower_id), _): WithRejection<Path<i32>, AppError>,
) -> AppResult<Json<ApiResponse<Vec<LendingRecord>>>> {
    let records = state.services.lending.list_borrower_lends(borrower_id).await?;
    Ok(ApiResponse::ok(
        "Borrower lending records retrieved successfully",
        records,
    ))
}
