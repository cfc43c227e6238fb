//! Product endpoints

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use crate::models::Product;
use crate::services::{parse_ref, CreateProduct, ProductService, ProductView, UpdateProduct};

use super::error::json_body;
use super::{business_filter, run_blocking, ApiError, AppState, RevisionQuery};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductQuery {
    pub business_id: Option<String>,
}

pub async fn list(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ProductQuery>,
) -> Result<Json<Vec<ProductView>>, ApiError> {
    let Ok(business_id) = business_filter(query.business_id.as_deref()) else {
        return Ok(Json(Vec::new()));
    };
    run_blocking(&state, "Error fetching products", move |storage| {
        ProductService::new(storage).list(business_id)
    })
    .await
    .map(Json)
}

pub async fn create(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CreateProduct>, JsonRejection>,
) -> Result<(StatusCode, Json<ProductView>), ApiError> {
    let request = json_body(payload)?;
    run_blocking(&state, "Error creating product", move |storage| {
        ProductService::new(storage).create(request)
    })
    .await
    .map(|view| (StatusCode::CREATED, Json(view)))
}

pub async fn get(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ProductView>, ApiError> {
    run_blocking(&state, "Error fetching product", move |storage| {
        let id = parse_ref::<Product>(&id)?;
        ProductService::new(storage).get_view(id)
    })
    .await
    .map(Json)
}

pub async fn update(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateProduct>, JsonRejection>,
) -> Result<Json<ProductView>, ApiError> {
    let request = json_body(payload)?;
    run_blocking(&state, "Error updating product", move |storage| {
        let id = parse_ref::<Product>(&id)?;
        ProductService::new(storage).update(id, request)
    })
    .await
    .map(Json)
}

pub async fn delete(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Query(query): Query<RevisionQuery>,
) -> Result<Json<Product>, ApiError> {
    run_blocking(&state, "Error deleting product", move |storage| {
        let id = parse_ref::<Product>(&id)?;
        ProductService::new(storage).delete(id, query.revision)
    })
    .await
    .map(Json)
}
