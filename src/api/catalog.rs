//! Category and brand endpoints

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;

use crate::models::{Brand, Category};
use crate::services::{
    parse_ref, BrandService, CatalogSummary, CategoryService, CreateBrand, CreateCategory,
    UpdateBrand, UpdateCategory,
};

use super::error::json_body;
use super::{run_blocking, ApiError, AppState, RevisionQuery};

pub async fn list_categories(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<CatalogSummary<Category>>>, ApiError> {
    run_blocking(&state, "Error fetching categories", |storage| {
        CategoryService::new(storage).list()
    })
    .await
    .map(Json)
}

pub async fn create_category(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CreateCategory>, JsonRejection>,
) -> Result<(StatusCode, Json<Category>), ApiError> {
    let request = json_body(payload)?;
    run_blocking(&state, "Error creating category", move |storage| {
        CategoryService::new(storage).create(request)
    })
    .await
    .map(|category| (StatusCode::CREATED, Json(category)))
}

pub async fn get_category(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Category>, ApiError> {
    run_blocking(&state, "Error fetching category", move |storage| {
        let id = parse_ref::<Category>(&id)?;
        CategoryService::new(storage).get(id)
    })
    .await
    .map(Json)
}

pub async fn update_category(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateCategory>, JsonRejection>,
) -> Result<Json<Category>, ApiError> {
    let request = json_body(payload)?;
    run_blocking(&state, "Error updating category", move |storage| {
        let id = parse_ref::<Category>(&id)?;
        CategoryService::new(storage).update(id, request)
    })
    .await
    .map(Json)
}

pub async fn delete_category(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Query(query): Query<RevisionQuery>,
) -> Result<Json<Category>, ApiError> {
    run_blocking(&state, "Error deleting category", move |storage| {
        let id = parse_ref::<Category>(&id)?;
        CategoryService::new(storage).delete(id, query.revision)
    })
    .await
    .map(Json)
}

pub async fn list_brands(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<CatalogSummary<Brand>>>, ApiError> {
    run_blocking(&state, "Error fetching brands", |storage| {
        BrandService::new(storage).list()
    })
    .await
    .map(Json)
}

pub async fn create_brand(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CreateBrand>, JsonRejection>,
) -> Result<(StatusCode, Json<Brand>), ApiError> {
    let request = json_body(payload)?;
    run_blocking(&state, "Error creating brand", move |storage| {
        BrandService::new(storage).create(request)
    })
    .await
    .map(|brand| (StatusCode::CREATED, Json(brand)))
}

pub async fn get_brand(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Brand>, ApiError> {
    run_blocking(&state, "Error fetching brand", move |storage| {
        let id = parse_ref::<Brand>(&id)?;
        BrandService::new(storage).get(id)
    })
    .await
    .map(Json)
}

pub async fn update_brand(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateBrand>, JsonRejection>,
) -> Result<Json<Brand>, ApiError> {
    let request = json_body(payload)?;
    run_blocking(&state, "Error updating brand", move |storage| {
        let id = parse_ref::<Brand>(&id)?;
        BrandService::new(storage).update(id, request)
    })
    .await
    .map(Json)
}

pub async fn delete_brand(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Query(query): Query<RevisionQuery>,
) -> Result<Json<Brand>, ApiError> {
    run_blocking(&state, "Error deleting brand", move |storage| {
        let id = parse_ref::<Brand>(&id)?;
        BrandService::new(storage).delete(id, query.revision)
    })
    .await
    .map(Json)
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::{json, Value};

    use crate::api::tests::{send, test_app};

    #[tokio::test]
    async fn test_categories_listed_by_name_with_counts() {
        let (_temp_dir, _state, app) = test_app();

        for name in ["Pantallas", "Baterías", "Cables"] {
            let (status, _) = send(&app, "POST", "/api/categories", Some(json!({ "name": name }))).await;
            assert_eq!(status, StatusCode::CREATED);
        }

        let (status, list) = send(&app, "GET", "/api/categories", None).await;
        assert_eq!(status, StatusCode::OK);
        let names: Vec<&str> = list
            .as_array()
            .unwrap()
            .iter()
            .map(|c| c["name"].as_str().unwrap())
            .collect();
        assert_eq!(names, vec!["Baterías", "Cables", "Pantallas"]);
        assert_eq!(list[0]["_count"]["products"], 0);
    }

    #[tokio::test]
    async fn test_duplicate_category_conflicts() {
        let (_temp_dir, _state, app) = test_app();

        send(&app, "POST", "/api/categories", Some(json!({ "name": "Fundas" }))).await;
        let (status, _) = send(&app, "POST", "/api/categories", Some(json!({ "name": "fundas" }))).await;
        assert_eq!(status, StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_deleting_brand_detaches_products() {
        let (_temp_dir, _state, app) = test_app();

        let (_, business) = send(&app, "POST", "/api/businesses", Some(json!({ "name": "Servicell" }))).await;
        let (_, brand) = send(
            &app,
            "POST",
            "/api/brands",
            Some(json!({ "name": "Anker", "website": "https://anker.com" })),
        )
        .await;
        assert_eq!(brand["website"], "https://anker.com");

        let (_, product) = send(
            &app,
            "POST",
            "/api/products",
            Some(json!({
                "name": "Cargador",
                "price": 20,
                "cost": 12,
                "businessId": business["id"],
                "brandId": brand["id"],
            })),
        )
        .await;
        assert_eq!(product["brand"]["name"], "Anker");

        let brand_uri = format!("/api/brands/{}", brand["id"].as_str().unwrap());
        let (status, _) = send(&app, "DELETE", &brand_uri, None).await;
        assert_eq!(status, StatusCode::OK);

        let product_uri = format!("/api/products/{}", product["id"].as_str().unwrap());
        let (status, product) = send(&app, "GET", &product_uri, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(product["brand"], Value::Null);

        let (status, body) = send(&app, "GET", &brand_uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Brand not found");
    }
}
