//! Item (catalog) endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use axum_extra::extract::WithRejection;

use crate::{
    error::{AppError, AppResult, ErrorResponse},
    models::item::{CreateItem, Item, UpdateItem},
};

use super::{access::Caller, AdminCaller, ApiResponse, ItemListResponse, ItemResponse};

/// List all items
#[utoipa::path(
    get,
    path = "/items",
    tag = "items",
    params(
        ("x-user-role" = String, Header, description = "admin or user"),
    ),
    responses(
        (status = 200, description = "All items in `data`", body = ItemListResponse),
        (status = 400, description = "Missing or invalid role header", body = ErrorResponse)
    )
)]
pub async fn list_items(
    State(state): State<crate::AppState>,
    _caller: Caller,
) -> AppResult<Json<ApiResponse<Vec<Item>>>> {
    let items = state.services.catalog.list_items().await?;
    Ok(ApiResponse::ok("Items retrieved successfully", items))
}

/// Get item by ID
#[utoipa::path(
    get,
    path = "/items/{id}",
    tag = "items",
    params(
        ("id" = i32, Path, description = "Item ID"),
        ("x-user-role" = String, Header, description = "admin or user"),
    ),
    responses(
        (status = 200, description = "Item in `data`", body = ItemResponse),
        (status = 404, description = "Item not found", body = ErrorResponse)
    )
)]
pub async fn get_item(
    State(state): State<crate::AppState>,
    _caller: Caller,
    WithRejection(Path(id), _): WithRejection<Path<i32>, AppError>,
) -> AppResult<Json<ApiResponse<Item>>> {
    let item = state.services.catalog.get_item(id).await?;
    Ok(ApiResponse::ok("Item retrieved successfully", item))
}

/// Create a new item (admin)
#[utoipa::path(
    post,
    path = "/items",
    tag = "items",
    params(
        ("x-user-role" = String, Header, description = "Must be admin"),
    ),
    request_body = CreateItem,
    responses(
        (status = 201, description = "Item created, in `data`", body = ItemResponse),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 403, description = "Admin role required", body = ErrorResponse)
    )
)]
pub async fn create_item(
    State(state): State<crate::AppState>,
    _admin: AdminCaller,
    WithRejection(Json(request), _): WithRejection<Json<CreateItem>, AppError>,
) -> AppResult<(StatusCode, Json<ApiResponse<Item>>)> {
    let created = state.services.catalog.create_item(request).await?;
    Ok((
        StatusCode::CREATED,
        ApiResponse::ok("Item created successfully", created),
    ))
}

/// Update an existing item (admin); only the fields sent are changed
#[utoipa::path(
    put,
    path = "/items/{id}",
    tag = "items",
    params(
        ("id" = i32, Path, description = "Item ID"),
        ("x-user-role" = String, Header, description = "Must be admin"),
    ),
    request_body = UpdateItem,
    responses(
        (status = 200, description = "Item updated, in `data`", body = ItemResponse),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 403, description = "Admin role required", body = ErrorResponse),
        (status = 404, description = "Item not found", body = ErrorResponse)
    )
)]
pub async fn update_item(
    State(state): State<crate::AppState>,
    _admin: AdminCaller,
    WithRejection(Path(id), _): WithRejection<Path<i32>, AppError>,
    WithRejection(Json(request), _): WithRejection<Json<UpdateItem>, AppError>,
) -> AppResult<Json<ApiResponse<Item>>> {
    let updated = state.services.catalog.update_item(id, request).await?;
    Ok(ApiResponse::ok("Item updated successfully", updated))
}

/// Delete an item (admin). Lending history is kept.
#[utoipa::path(
    delete,
    path = "/items/{id}",
    tag = "items",
    params(
        ("id" = i32, Path, description = "Item ID"),
        ("x-user-role" = String, Header, description = "Must be admin"),
    ),
    responses(
        (status = 200, description = "Removed item in `data`", body = ItemResponse),
        (status = 403, description = "Admin role required", body = ErrorResponse),
        (status = 404, description = "Item not found", body = ErrorResponse)
    )
)]
pub async fn delete_item(
    State(state): State<crate::AppState>,
    _admin: AdminCaller,
    WithRejection(Path(id), _): WithRejection<Path<i32>, AppError>,
) -> AppResult<Json<ApiResponse<Item>>> {
    let removed = state.services.catalog.delete_item(id).await?;
    Ok(ApiResponse::ok("Item deleted successfully", removed))
}
