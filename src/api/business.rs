//! Business endpoints

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;

use crate::models::Business;
use crate::reports::BusinessMetrics;
use crate::services::{parse_ref, BusinessService, BusinessSummary, CreateBusiness, UpdateBusiness};

use super::error::json_body;
use super::{run_blocking, ApiError, AppState, RevisionQuery};

pub async fn list(State(state): State<Arc<AppState>>) -> Result<Json<Vec<BusinessSummary>>, ApiError> {
    run_blocking(&state, "Error fetching businesses", |storage| {
        BusinessService::new(storage).list()
    })
    .await
    .map(Json)
}

pub async fn create(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CreateBusiness>, JsonRejection>,
) -> Result<(StatusCode, Json<BusinessSummary>), ApiError> {
    let request = json_body(payload)?;
    run_blocking(&state, "Error creating business", move |storage| {
        BusinessService::new(storage).create(request)
    })
    .await
    .map(|summary| (StatusCode::CREATED, Json(summary)))
}

pub async fn get(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<BusinessSummary>, ApiError> {
    run_blocking(&state, "Error fetching business", move |storage| {
        let id = parse_ref::<Business>(&id)?;
        BusinessService::new(storage).get_summary(id)
    })
    .await
    .map(Json)
}

pub async fn update(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateBusiness>, JsonRejection>,
) -> Result<Json<Business>, ApiError> {
    let request = json_body(payload)?;
    run_blocking(&state, "Error updating business", move |storage| {
        let id = parse_ref::<Business>(&id)?;
        BusinessService::new(storage).update(id, request)
    })
    .await
    .map(Json)
}

pub async fn delete(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Query(query): Query<RevisionQuery>,
) -> Result<Json<Business>, ApiError> {
    run_blocking(&state, "Error deleting business", move |storage| {
        let id = parse_ref::<Business>(&id)?;
        BusinessService::new(storage).delete(id, query.revision)
    })
    .await
    .map(Json)
}

pub async fn metrics(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<BusinessMetrics>, ApiError> {
    run_blocking(&state, "Error fetching metrics", move |storage| {
        let id = parse_ref::<Business>(&id)?;
        BusinessService::new(storage).metrics(id)
    })
    .await
    .map(Json)
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::json;

    use crate::api::tests::{send, test_app};

    #[tokio::test]
    async fn test_business_crud() {
        let (_temp_dir, _state, app) = test_app();

        let (status, created) = send(
            &app,
            "POST",
            "/api/businesses",
            Some(json!({ "name": "Servicell", "address": "Calle Mayor 1" })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created["_count"]["products"], 0);
        let id = created["id"].as_str().unwrap().to_string();

        let (status, fetched) = send(&app, "GET", &format!("/api/businesses/{}", id), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(fetched["address"], "Calle Mayor 1");

        let (status, updated) = send(
            &app,
            "PUT",
            &format!("/api/businesses/{}", id),
            Some(json!({ "website": "https://servicell.es" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated["name"], "Servicell");
        assert_eq!(updated["website"], "https://servicell.es");

        let (status, list) = send(&app, "GET", "/api/businesses", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(list.as_array().unwrap().len(), 1);

        let (status, _) = send(&app, "DELETE", &format!("/api/businesses/{}", id), None).await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = send(&app, "GET", &format!("/api/businesses/{}", id), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Business not found");
    }

    #[tokio::test]
    async fn test_create_requires_name() {
        let (_temp_dir, _state, app) = test_app();

        let (status, body) = send(&app, "POST", "/api/businesses", Some(json!({ "name": " " }))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Business name is required");
    }

    #[tokio::test]
    async fn test_malformed_id_is_not_found() {
        let (_temp_dir, _state, app) = test_app();

        let (status, _) = send(&app, "GET", "/api/businesses/not-an-id", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = send(&app, "GET", "/api/businesses/not-an-id/metrics", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_stale_delete_conflicts() {
        let (_temp_dir, _state, app) = test_app();
        let (_, created) = send(&app, "POST", "/api/businesses", Some(json!({ "name": "A" }))).await;
        let id = created["id"].as_str().unwrap().to_string();

        send(&app, "PUT", &format!("/api/businesses/{}", id), Some(json!({ "name": "B" }))).await;

        let (status, _) = send(&app, "DELETE", &format!("/api/businesses/{}?revision=1", id), None).await;
        assert_eq!(status, StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_metrics() {
        let (_temp_dir, _state, app) = test_app();
        let (_, created) = send(&app, "POST", "/api/businesses", Some(json!({ "name": "Servicell" }))).await;
        let id = created["id"].as_str().unwrap().to_string();

        send(
            &app,
            "POST",
            "/api/incomes",
            Some(json!({ "description": "Venta", "amount": 100, "businessId": id })),
        )
        .await;
        send(
            &app,
            "POST",
            "/api/expenses",
            Some(json!({ "description": "Luz", "amount": 40, "businessId": id })),
        )
        .await;

        let (status, metrics) = send(&app, "GET", &format!("/api/businesses/{}/metrics", id), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(metrics["financial"]["totalIncome"], 100);
        assert_eq!(metrics["financial"]["profit"], 60);
        assert_eq!(metrics["financial"]["profitMargin"], 60.0);
        assert_eq!(metrics["financial"]["costBenefitRatio"], 2.5);
        assert_eq!(metrics["financial"]["last7DaysIncome"], 100);
        assert_eq!(metrics["counts"]["expenses"], 1);
        assert_eq!(metrics["last7DaysIncomes"].as_array().unwrap().len(), 1);
    }
}
