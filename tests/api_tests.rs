//! HTTP tests for the dashboard router.

#![cfg(feature = "rpc-server")]

use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use bizpulse::api::{router, AppState};
use bizpulse::prelude::*;

fn app_with(repo: ErpRepository<InMemoryStore>) -> Router {
    router(Arc::new(AppState::new(Arc::new(repo))))
}

fn seeded_repository() -> ErpRepository<InMemoryStore> {
    let repo = ErpRepository::new(InMemoryStore::new());
    let seed = SeedData::from_json(
        r#"{
            "financialSummary": {"revenue": 24500, "expenses": 16300, "profit": 8200},
            "monthlySeries": [
                {"month": "2024-05", "revenue": 24800, "expenses": 16000, "profit": 8800},
                {"month": "2024-06", "revenue": 24500, "expenses": 16300, "profit": 8200}
            ],
            "inventory": [
                {"id": "1", "name": "Widget", "quantity": 20, "reorderLevel": 5},
                {"id": "2", "name": "Gadget", "quantity": 2, "reorderLevel": 5},
                {"id": "3", "name": "Gizmo", "quantity": 9, "reorderLevel": 5},
                {"id": "4", "name": "Doohickey", "quantity": 5, "reorderLevel": 5},
                {"id": "5", "name": "Thingamajig", "quantity": 50, "reorderLevel": 10}
            ],
            "invoices": [
                {"id": "INV-1", "customer": "Acme", "amount": 1200, "status": "paid"},
                {"id": "INV-2", "customer": "Globex", "amount": 800, "status": "pending"},
                {"id": "INV-3", "customer": "Initech", "amount": 450, "status": "paid"}
            ]
        }"#,
    )
    .unwrap();
    repo.load_seed(&seed).unwrap();
    repo
}

async fn get(app: Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&body).unwrap())
}

// ==================== Health Check Tests ====================

#[tokio::test]
async fn test_health_check() {
    let (status, body) = get(app_with(ErpRepository::new(InMemoryStore::new())), "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["service"], "bizpulse-server");
    assert_eq!(body["version"], bizpulse::VERSION);
}

// ==================== Financial Health Tests ====================

#[tokio::test]
async fn test_financial_health_report() {
    let (status, body) = get(app_with(seeded_repository()), "/financial-health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["score"], 64);
    assert_eq!(body["category"], "Good");
    assert_eq!(body["metrics"]["profitMargin"]["score"], 30);
    assert_eq!(body["metrics"]["revenueGrowth"]["score"], 0);
    assert_eq!(body["metrics"]["expenseManagement"]["score"], 5);
    assert_eq!(body["metrics"]["inventoryHealth"]["score"], 9);
    assert_eq!(body["metrics"]["accountsReceivable"]["score"], 20);
    assert_eq!(body["metrics"]["accountsReceivable"]["maxScore"], 20);
    assert_eq!(body["recommendations"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_financial_health_parses_as_report() {
    let (_, body) = get(app_with(seeded_repository()), "/financial-health").await;

    let report: HealthReport = serde_json::from_value(body).unwrap();
    assert!(report.verify().is_ok());
}

#[tokio::test]
async fn test_financial_health_is_repeatable() {
    let repo = Arc::new(seeded_repository());
    let app = router(Arc::new(AppState::new(repo)));

    let (_, first) = get(app.clone(), "/financial-health").await;
    let (_, second) = get(app, "/financial-health").await;
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_financial_health_without_summary() {
    let (status, body) = get(
        app_with(ErpRepository::new(InMemoryStore::new())),
        "/financial-health",
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
    assert_eq!(body["code"], 1001);
    assert_eq!(body["error"], "Financial data not found");
}

struct UnavailableStore;

impl ErpDataSource for UnavailableStore {
    fn financial_summary(&self) -> Result<Option<FinancialSummary>> {
        Ok(Some(FinancialSummary::new(24_500.0, 16_300.0, 8_200.0)))
    }

    fn monthly_series(&self) -> Result<Vec<MonthlyFinancial>> {
        Err(Error::Storage("monthly series unavailable".into()))
    }

    fn inventory_snapshot(&self) -> Result<InventorySnapshot> {
        Ok(InventorySnapshot::default())
    }

    fn invoice_snapshot(&self) -> Result<InvoiceSnapshot> {
        Ok(InvoiceSnapshot::default())
    }
}

#[tokio::test]
async fn test_financial_health_storage_failure() {
    let app = router(Arc::new(AppState::new(Arc::new(UnavailableStore))));
    let (status, body) = get(app, "/financial-health").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["success"], false);
    assert_eq!(body["code"], 9003);
    assert_eq!(body["error"], "Storage error: monthly series unavailable");
    assert!(body.get("score").is_none());
}

#[tokio::test]
async fn test_unknown_route() {
    let response = app_with(seeded_repository())
        .oneshot(
            Request::builder()
                .uri("/financial-health/history")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
