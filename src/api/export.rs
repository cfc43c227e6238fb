//! CSV export endpoint

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::Local;
use tracing::info;

use crate::export::{self, DataType, ExportData, ExportRequest, NOTHING_TO_EXPORT};
use crate::models::{Business, BusinessId};
use crate::services::{parse_ref, ExportService};

use super::error::json_body;
use super::{run_blocking, ApiError, AppState};

const EXPORT_FAILED: &str = "Error al exportar datos";

pub async fn export(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    payload: Result<Json<ExportRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let request = json_body(payload)?;
    let data_type = request
        .validate()
        .map_err(|e| ApiError::from_error(e, EXPORT_FAILED))?;

    // An unparseable id behaves like a business without data
    let business_id = parse_ref::<Business>(&id).ok();

    let data = match business_id {
        Some(business_id) => fetch(&state, business_id, data_type).await?,
        None => ExportData::default(),
    };

    let Some(content) = export::build_csv(
        data_type,
        &data,
        &request.selected_fields,
        &state.settings.export,
    ) else {
        return Err(ApiError::not_found(NOTHING_TO_EXPORT));
    };

    let name = match business_id {
        Some(business_id) => {
            run_blocking(&state, EXPORT_FAILED, move |storage| {
                ExportService::new(storage).business_name(business_id)
            })
            .await?
        }
        None => None,
    };
    let filename = export::export_filename(name.as_deref(), data_type, Local::now().date_naive());

    info!(data_type = %data_type, filename = %filename, "export generated");

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", filename),
            ),
        ],
        content,
    )
        .into_response())
}

/// Read the rows for `data_type`; the three sections of `all` are read
/// concurrently
async fn fetch(
    state: &AppState,
    business_id: BusinessId,
    data_type: DataType,
) -> Result<ExportData, ApiError> {
    let products = async {
        if data_type.includes(export::Section::Products) {
            run_blocking(state, EXPORT_FAILED, move |storage| {
                ExportService::new(storage).product_rows(business_id)
            })
            .await
        } else {
            Ok(Vec::new())
        }
    };
    let incomes = async {
        if data_type.includes(export::Section::Incomes) {
            run_blocking(state, EXPORT_FAILED, move |storage| {
                ExportService::new(storage).income_rows(business_id)
            })
            .await
        } else {
            Ok(Vec::new())
        }
    };
    let expenses = async {
        if data_type.includes(export::Section::Expenses) {
            run_blocking(state, EXPORT_FAILED, move |storage| {
                ExportService::new(storage).expense_rows(business_id)
            })
            .await
        } else {
            Ok(Vec::new())
        }
    };

    let (products, incomes, expenses) = tokio::try_join!(products, incomes, expenses)?;
    Ok(ExportData {
        products,
        incomes,
        expenses,
    })
}

#[cfg(test)]
mod tests {
    use axum::http::{header, StatusCode};
    use chrono::Local;
    use serde_json::json;

    use crate::api::tests::{send, send_raw, test_app, test_app_with};
    use crate::config::{EmptySectionPolicy, Settings};

    #[tokio::test]
    async fn test_empty_selection_is_rejected_first() {
        let (_temp_dir, _state, app) = test_app();

        let (status, body) = send(
            &app,
            "POST",
            "/api/businesses/whatever/export",
            Some(json!({ "dataType": "bogus", "selectedFields": [] })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Debes seleccionar al menos un campo para exportar");
    }

    #[tokio::test]
    async fn test_invalid_data_type() {
        let (_temp_dir, _state, app) = test_app();

        let (status, body) = send(
            &app,
            "POST",
            "/api/businesses/whatever/export",
            Some(json!({ "dataType": "bogus", "selectedFields": ["ID"] })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Tipo de datos no válido");
    }

    #[tokio::test]
    async fn test_export_products() {
        let (_temp_dir, _state, app) = test_app();
        let (_, business) = send(&app, "POST", "/api/businesses", Some(json!({ "name": "Servicell" }))).await;
        let id = business["id"].as_str().unwrap().to_string();

        for (name, price) in [("Cable USB", 5.5), ("Caja, Grande", 10.0)] {
            send(
                &app,
                "POST",
                "/api/products",
                Some(json!({ "name": name, "price": price, "cost": 1, "businessId": id })),
            )
            .await;
        }

        let (status, headers, body) = send_raw(
            &app,
            "POST",
            &format!("/api/businesses/{}/export", id),
            Some(json!({ "dataType": "products", "selectedFields": ["Nombre", "Precio"] })),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(headers[header::CONTENT_TYPE], "text/csv; charset=utf-8");
        let expected_name = format!(
            "attachment; filename=\"Servicell_productos_{}.csv\"",
            Local::now().date_naive().format("%Y-%m-%d")
        );
        assert_eq!(headers[header::CONTENT_DISPOSITION], expected_name.as_str());

        // Newest first
        assert_eq!(body, "Nombre,Precio\n\"Caja, Grande\",10\nCable USB,5.5");
    }

    #[tokio::test]
    async fn test_export_all_for_empty_business() {
        let (_temp_dir, _state, app) = test_app();
        let (_, business) = send(&app, "POST", "/api/businesses", Some(json!({ "name": "Vacío" }))).await;
        let id = business["id"].as_str().unwrap().to_string();

        let (status, _, body) = send_raw(
            &app,
            "POST",
            &format!("/api/businesses/{}/export", id),
            Some(json!({ "dataType": "all", "selectedFields": ["ID"] })),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            "El apartado de productos no contiene información\n\n\
             El apartado de ingresos no contiene información\n\n\
             El apartado de gastos no contiene información"
        );
    }

    #[tokio::test]
    async fn test_not_found_policy() {
        let mut settings = Settings::default();
        settings.export.empty_section = EmptySectionPolicy::NotFound;
        let (_temp_dir, _state, app) = test_app_with(settings);
        let (_, business) = send(&app, "POST", "/api/businesses", Some(json!({ "name": "Vacío" }))).await;
        let id = business["id"].as_str().unwrap().to_string();
        let uri = format!("/api/businesses/{}/export", id);

        let (status, body) = send(
            &app,
            "POST",
            &uri,
            Some(json!({ "dataType": "products", "selectedFields": ["ID"] })),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "No hay datos para exportar");

        let (status, _, _) = send_raw(
            &app,
            "POST",
            &uri,
            Some(json!({ "dataType": "all", "selectedFields": ["ID"] })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_unknown_business_uses_fallback_name() {
        let (_temp_dir, _state, app) = test_app();

        let (status, headers, body) = send_raw(
            &app,
            "POST",
            "/api/businesses/00000000-0000-4000-8000-000000000000/export",
            Some(json!({ "dataType": "incomes", "selectedFields": ["Cantidad"] })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert!(headers[header::CONTENT_DISPOSITION]
            .to_str()
            .unwrap()
            .contains("negocio_ingresos_"));
        assert_eq!(body, "El apartado de ingresos no contiene información");
    }
}
