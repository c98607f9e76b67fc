//! API handlers for the lending REST endpoints

pub mod access;
pub mod health;
pub mod items;
pub mod lends;
pub mod openapi;


use axum::{
    async_trait,
    extract::FromRequestParts,
    http::request::Parts,
    routing::get,
    Json, Router,
};
use serde::Serialize;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use utoipa::ToSchema;

use crate::{
    error::AppError,
    models::{item::Item, lending::LendingRecord},
    AppState,
};
use access::Caller;
use health::HealthResponse;

/// Success envelope shared by every endpoint
#[derive(Debug, Serialize, ToSchema)]
#[aliases(
    ItemResponse = ApiResponse<Item>,
    ItemListResponse = ApiResponse<Vec<Item>>,
    LendingRecordResponse = ApiResponse<LendingRecord>,
    LendingRecordListResponse = ApiResponse<Vec<LendingRecord>>,
    HealthCheckResponse = ApiResponse<HealthResponse>
)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn ok(message: impl Into<String>, data: T) -> Json<Self> {
        Json(Self {
            success: true,
            message: message.into(),
            data: Some(data),
        })
    }
}

#[async_trait]
impl FromRequestParts<AppState> for Caller {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        state.classifier.classify(&parts.headers)
    }
}

/// Extractor admitting admin requests only
pub struct AdminCaller(pub Caller);

#[async_trait]
impl FromRequestParts<AppState> for AdminCaller {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let caller = Caller::from_request_parts(parts, state).await?;
        caller.require_admin()?;
        Ok(AdminCaller(caller))
    }
}

/// Extractor admitting user requests that carry a borrower identity
pub struct BorrowerCaller(pub i32);

#[async_trait]
impl FromRequestParts<AppState> for BorrowerCaller {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let caller = Caller::from_request_parts(parts, state).await?;
        Ok(BorrowerCaller(caller.require_borrower()?))
    }
}

/// Create the application router with all routes
pub fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // API v1 routes
    let api_v1 = Router::new()
        // Health check
        .route("/health", get(health::health_check))
        // Items (catalog)
        .route("/items", get(items::list_items).post(items::create_item))
        .route(
            "/items/:id",
            get(items::get_item)
                .put(items::update_item)
                .delete(items::delete_item),
        )
        // Lending
        .route("/lends", get(lends::list_lends).post(lends::create_lend))
        .route("/borrowers/:borrower_id/lends", get(lends::list_borrower_lends))
        .with_state(state);

    // OpenAPI documentation
    let openapi = openapi::create_openapi_router();

    Router::new()
        .nest("/api/v1", api_v1)
        .merge(openapi)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
