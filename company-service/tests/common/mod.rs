#![allow(dead_code)]

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use company_service::config::{CompanyConfig, MongoConfig, ObservabilityConfig, SeedConfig};
use company_service::models::{Company, FieldFilter};
use company_service::services::{CompanyStore, InMemoryStore};
use company_service::startup::{build_router, AppState};
use http_body_util::BodyExt;
use mongodb::bson::oid::ObjectId;
use service_core::config::Config as CoreConfig;
use service_core::error::AppError;
use std::sync::Arc;
use tower::ServiceExt;

pub fn company(name: &str, stage: &str, amount: Option<f64>) -> Company {
    Company {
        id: None,
        index: 0,
        company: name.to_string(),
        website: format!("{}.com", name.to_lowercase()),
        region: "USA".to_string(),
        vertical: "Software".to_string(),
        funding_amount_usd: amount,
        funding_stage: stage.to_string(),
        funding_date: "Jan-21".to_string(),
    }
}

/// Store whose every call fails the way an unreachable MongoDB does.
pub struct UnavailableStore;

fn unreachable_store() -> AppError {
    AppError::DatabaseError(anyhow::anyhow!("connection refused"))
}

#[async_trait]
impl CompanyStore for UnavailableStore {
    async fn insert(&self, _company: &Company) -> Result<ObjectId, AppError> {
        Err(unreachable_store())
    }

    async fn delete_all(&self) -> Result<u64, AppError> {
        Err(unreachable_store())
    }

    async fn find_by_filter(
        &self,
        _filter: &FieldFilter,
        _limit: i64,
    ) -> Result<Vec<Company>, AppError> {
        Err(unreachable_store())
    }

    async fn find_greater_than(
        &self,
        _field: &str,
        _threshold: f64,
    ) -> Result<Vec<Company>, AppError> {
        Err(unreachable_store())
    }

    async fn find_by_id(&self, _id: &str) -> Result<Option<Company>, AppError> {
        Err(unreachable_store())
    }

    async fn health_check(&self) -> Result<(), AppError> {
        Err(unreachable_store())
    }
}

pub async fn send(router: &Router, uri: &str) -> (StatusCode, Vec<u8>) {
    let response = router
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .expect("Failed to execute request");

    let status = response.status();
    let body = response
        .into_body()
        .collect()
        .await
        .expect("Failed to read body")
        .to_bytes()
        .to_vec();
    (status, body)
}

/// Router over an in-memory store holding Acme (Seed, 500k) and
/// Globex (Series A, 5M).
pub struct TestApp {
    pub router: Router,
    pub store: Arc<InMemoryStore>,
    pub acme_id: ObjectId,
    pub globex_id: ObjectId,
}

impl TestApp {
    pub async fn spawn() -> Self {
        let store = Arc::new(InMemoryStore::new());
        let acme_id = store
            .insert(&company("Acme", "Seed", Some(500_000.0)))
            .await
            .expect("Failed to insert Acme");
        let globex_id = store
            .insert(&company("Globex", "Series A", Some(5_000_000.0)))
            .await
            .expect("Failed to insert Globex");

        let router = build_router(AppState::new(store.clone()));

        TestApp {
            router,
            store,
            acme_id,
            globex_id,
        }
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Vec<u8>) {
        send(&self.router, uri).await
    }

    pub async fn get_json(&self, uri: &str) -> (StatusCode, serde_json::Value) {
        let (status, body) = self.get(uri).await;
        let json = serde_json::from_slice(&body).expect("Failed to parse JSON");
        (status, json)
    }
}

pub fn test_config(reset_db: bool) -> CompanyConfig {
    CompanyConfig {
        common: CoreConfig { port: 0 },
        mongodb: MongoConfig {
            uri: "mongodb://localhost:27017".to_string(),
            database: None,
        },
        seed: SeedConfig { reset_db },
        observability: ObservabilityConfig {
            log_level: "info".to_string(),
            otlp_endpoint: None,
        },
    }
}

pub fn names(body: &serde_json::Value) -> Vec<String> {
    body.as_array()
        .expect("Expected a JSON array")
        .iter()
        .map(|c| c["company"].as_str().unwrap_or_default().to_string())
        .collect()
}
