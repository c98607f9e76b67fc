//! Lending transaction service

use crate::{
    error::{AppError, AppResult},
    models::lending::{LendRequest, LendingRecord},
    repository::Repository,
};

#[derive(Clone)]
pub struct LendingService {
    repository: Repository,
}

impl LendingService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Lend one unit of an item to a borrower.
    ///
    /// Request fields are checked first (item id, latitude, longitude). The
    /// existence and stock checks, the decrement and the ledger append then
    /// happen as one store operation, so the returned record carries the item
    /// as it stands right after the decrement.
    pub async fn lend(&self, borrower_id: i32, request: LendRequest) -> AppResult<LendingRecord> {
        let lend = request.validate(borrower_id)?;
        let item_id = lend.item_id;

        match self.repository.lends.record_lend(lend).await {
            Ok(record) => {
                tracing::info!(
                    lend_id = record.id,
                    item_id,
                    borrower_id,
                    "Item lent"
                );
                Ok(record)
            }
            Err(AppError::Conflict(msg)) => {
                tracing::warn!(item_id, borrower_id, "Lend refused: out of stock");
                Err(AppError::Conflict(msg))
            }
            Err(e) => Err(e),
        }
    }

    /// All lending records, newest first
    pub async fn list_lends(&self) -> AppResult<Vec<LendingRecord>> {
        self.repository.lends.list().await
    }

    /// Lending records of one borrower, newest first
    pub async fn list_borrower_lends(&self, borrower_id: i32) -> AppResult<Vec<LendingRecord>> {
        self.repository.lends.list_by_borrower(borrower_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::Services;
    use serde_json::{json, Value};

    fn request(body: Value) -> LendRequest {
        serde_json::from_value(body).unwrap()
    }

    async fn services_with_item(quantity: i32) -> (Services, i32) {
        let services = Services::new(Repository::in_memory());
        let item = services
            .catalog
            .create_item(
                serde_json::from_value(
                    json!({"title": "Dune", "author": "Herbert", "quantity": quantity}),
                )
                .unwrap(),
            )
            .await
            .unwrap();
        (services, item.id)
    }

    #[tokio::test]
    async fn test_last_unit_goes_to_first_borrower() {
        let (services, item_id) = services_with_item(1).await;
        let body = json!({"item_id": item_id, "latitude": 10.5, "longitude": -20.25});

        let record = services.lending.lend(1, request(body.clone())).await.unwrap();
        assert_eq!(record.borrower_id, 1);
        assert_eq!(record.latitude, 10.5);
        assert_eq!(record.item.as_ref().unwrap().quantity, 0);

        let second = services.lending.lend(2, request(body)).await;
        assert!(matches!(second, Err(AppError::Conflict(_))));

        assert_eq!(services.catalog.get_item(item_id).await.unwrap().quantity, 0);
        assert_eq!(services.lending.list_lends().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_zero_quantity_item_is_unlendable() {
        let (services, item_id) = services_with_item(0).await;
        let result = services
            .lending
            .lend(1, request(json!({"item_id": item_id, "latitude": 0, "longitude": 0})))
            .await;
        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_latitude_boundaries() {
        let (services, item_id) = services_with_item(5).await;

        let at_pole = services
            .lending
            .lend(1, request(json!({"item_id": item_id, "latitude": 90, "longitude": 180})))
            .await;
        assert!(at_pole.is_ok());

        let beyond = services
            .lending
            .lend(1, request(json!({"item_id": item_id, "latitude": 91, "longitude": 0})))
            .await;
        assert!(matches!(beyond, Err(AppError::Validation(_))));

        let beyond = services
            .lending
            .lend(1, request(json!({"item_id": item_id, "latitude": 0, "longitude": -180.01})))
            .await;
        assert!(matches!(beyond, Err(AppError::Validation(_))));

        assert_eq!(services.catalog.get_item(item_id).await.unwrap().quantity, 4);
    }

    #[tokio::test]
    async fn test_invalid_fields_win_over_missing_item() {
        let (services, _) = services_with_item(1).await;
        let result = services
            .lending
            .lend(1, request(json!({"item_id": 999, "latitude": 100, "longitude": 0})))
            .await;
        assert!(matches!(result, Err(AppError::Validation(_))));

        let result = services
            .lending
            .lend(1, request(json!({"item_id": 999, "latitude": 1, "longitude": 1})))
            .await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_history_survives_item_deletion() {
        let (services, item_id) = services_with_item(2).await;
        services
            .lending
            .lend(3, request(json!({"item_id": item_id, "latitude": 1, "longitude": 1})))
            .await
            .unwrap();

        services.catalog.delete_item(item_id).await.unwrap();

        let records = services.lending.list_borrower_lends(3).await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].item_id, item_id);
        assert!(records[0].item.is_none());
    }
}
