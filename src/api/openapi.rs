//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{access, health, items, lends};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Lending API",
        version = "0.1.0",
        description = "Inventory-backed lending service REST API"
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        // Items
        items::list_items,
        items::get_item,
        items::create_item,
        items::update_item,
        items::delete_item,
        // Lends
        lends::create_lend,
        lends::list_lends,
        lends::list_borrower_lends,
    ),
    components(
        schemas(
            // Items
            crate::models::item::Item,
            crate::models::item::CreateItem,
            crate::models::item::UpdateItem,
            // Lends
            crate::models::lending::LendRequest,
            crate::models::lending::LendingRecord,
            // Access
            access::Role,
            // Health
            health::HealthResponse,
            // Envelopes
            crate::api::ItemResponse,
            crate::api::ItemListResponse,
            crate::api::LendingRecordResponse,
            crate::api::LendingRecordListResponse,
            crate::api::HealthCheckResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "items", description = "Catalog item management"),
        (name = "lends", description = "Lending ledger")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_lists_every_route() {
        let doc = ApiDoc::openapi();
        let paths: Vec<&String> = doc.paths.paths.keys().collect();
        for expected in [
            "/health",
            "/items",
            "/items/{id}",
            "/lends",
            "/borrowers/{borrower_id}/lends",
        ] {
            assert!(
                paths.iter().any(|p| p.as_str() == expected),
                "missing {}",
                expected
            );
        }
    }

    #[test]
    fn test_success_bodies_are_enveloped() {
        let doc = serde_json::to_value(ApiDoc::openapi()).unwrap();
        let schemas = &doc["components"]["schemas"];
        for name in ["ItemResponse", "ItemListResponse", "LendingRecordResponse", "HealthCheckResponse"] {
            let properties = &schemas[name]["properties"];
            assert!(properties["success"].is_object(), "{} lacks success", name);
            assert!(properties["data"].is_object(), "{} lacks data", name);
        }

        let ok = &doc["paths"]["/items/{id}"]["get"]["responses"]["200"]["content"]["application/json"]["schema"]["$ref"];
        assert_eq!(ok, "#/components/schemas/ItemResponse");
        assert_eq!(schemas["Role"]["enum"], serde_json::json!(["admin", "user"]));
    }
}
