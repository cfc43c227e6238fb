//! Seed endpoint

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::services::SeedService;

use super::{run_blocking, ApiError, AppState};

#[derive(Debug, Serialize)]
pub struct SeedResponse {
    pub success: bool,
    pub message: &'static str,
    pub categories: usize,
    pub brands: usize,
}

pub async fn seed(State(state): State<Arc<AppState>>) -> Result<Json<SeedResponse>, ApiError> {
    let report = run_blocking(&state, "Error seeding data", |storage| {
        SeedService::new(storage).run()
    })
    .await?;

    Ok(Json(SeedResponse {
        success: true,
        message: "Datos iniciales cargados exitosamente",
        categories: report.categories,
        brands: report.brands,
    }))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;

    use crate::api::tests::{send, test_app};

    #[tokio::test]
    async fn test_seed_twice() {
        let (_temp_dir, state, app) = test_app();

        for _ in 0..2 {
            let (status, body) = send(&app, "POST", "/api/seed", None).await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(body["success"], true);
            assert_eq!(body["message"], "Datos iniciales cargados exitosamente");
            assert_eq!(body["categories"], 8);
            assert_eq!(body["brands"], 15);
        }

        assert_eq!(state.storage.categories.count().unwrap(), 8);
        assert_eq!(state.storage.brands.count().unwrap(), 15);
    }
}
