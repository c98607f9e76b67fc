//! Lending server
//!
//! Tracks a catalog of lendable items and an append-only ledger of lending
//! events, exposed as a REST JSON API. An item can never be lent once its
//! quantity reaches zero.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

use api::access::{HeaderClassifier, RequestClassifier};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
    pub classifier: Arc<dyn RequestClassifier>,
}

impl AppState {
    /// State classifying requests by their role and identity headers
    pub fn new(config: AppConfig, services: services::Services) -> Self {
        Self::with_classifier(config, services, Arc::new(HeaderClassifier))
    }

    pub fn with_classifier(
        config: AppConfig,
        services: services::Services,
        classifier: Arc<dyn RequestClassifier>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            services: Arc::new(services),
            classifier,
        }
    }
}
