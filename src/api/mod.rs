//! HTTP API
//!
//! An axum router over the service layer. Storage work is synchronous file
//! I/O, so every handler hands it to the blocking pool through
//! [`run_blocking`].

pub mod business;
pub mod catalog;
pub mod error;
pub mod export;
pub mod ledger;
pub mod product;
pub mod seed;

pub use error::ApiError;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use serde::Deserialize;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use crate::config::Settings;
use crate::error::BizdeskResult;
use crate::models::{BusinessId, Expense, Income};
use crate::storage::Storage;

/// State shared by every handler
pub struct AppState {
    pub storage: Arc<Storage>,
    pub settings: Settings,
}

impl AppState {
    pub fn new(storage: Storage, settings: Settings) -> Self {
        Self {
            storage: Arc::new(storage),
            settings,
        }
    }
}

/// Optimistic-concurrency check carried by DELETE requests
#[derive(Debug, Default, Deserialize)]
pub struct RevisionQuery {
    pub revision: Option<u32>,
}

/// Build the application router
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/businesses", get(business::list).post(business::create))
        .route(
            "/api/businesses/:id",
            get(business::get).put(business::update).delete(business::delete),
        )
        .route("/api/businesses/:id/metrics", get(business::metrics))
        .route("/api/businesses/:id/export", post(export::export))
        .route("/api/products", get(product::list).post(product::create))
        .route(
            "/api/products/:id",
            get(product::get).put(product::update).delete(product::delete),
        )
        .route(
            "/api/categories",
            get(catalog::list_categories).post(catalog::create_category),
        )
        .route(
            "/api/categories/:id",
            get(catalog::get_category)
                .put(catalog::update_category)
                .delete(catalog::delete_category),
        )
        .route("/api/brands", get(catalog::list_brands).post(catalog::create_brand))
        .route(
            "/api/brands/:id",
            get(catalog::get_brand)
                .put(catalog::update_brand)
                .delete(catalog::delete_brand),
        )
        .route(
            "/api/incomes",
            get(ledger::list::<Income>).post(ledger::create::<Income>),
        )
        .route(
            "/api/incomes/:id",
            get(ledger::get::<Income>)
                .put(ledger::update::<Income>)
                .delete(ledger::delete::<Income>),
        )
        .route(
            "/api/expenses",
            get(ledger::list::<Expense>).post(ledger::create::<Expense>),
        )
        .route(
            "/api/expenses/:id",
            get(ledger::get::<Expense>)
                .put(ledger::update::<Expense>)
                .delete(ledger::delete::<Expense>),
        )
        .route("/api/seed", post(seed::seed))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serve the API on `addr` until Ctrl-C or SIGTERM
pub async fn serve(state: Arc<AppState>, addr: SocketAddr) -> std::io::Result<()> {
    let app = router(state);

    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("Failed to bind to {}: {}", addr, e);
            return Err(e);
        }
    };
    info!("HTTP server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("HTTP server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl-C: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => error!("Failed to listen for SIGTERM: {}", e),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}

/// Run a storage task on the blocking pool
///
/// Crate errors map through [`ApiError::from_error`]; `context` is the
/// message answered for unexpected failures.
pub async fn run_blocking<T, F>(
    state: &AppState,
    context: &'static str,
    task: F,
) -> Result<T, ApiError>
where
    F: FnOnce(&Storage) -> BizdeskResult<T> + Send + 'static,
    T: Send + 'static,
{
    let storage = Arc::clone(&state.storage);
    match tokio::task::spawn_blocking(move || task(&storage)).await {
        Ok(result) => result.map_err(|e| ApiError::from_error(e, context)),
        Err(e) => {
            error!(error = %e, "{}", context);
            Err(ApiError::internal(context))
        }
    }
}

/// Parse an optional `businessId` filter
///
/// A malformed id matches no business, so the listing comes back empty.
pub(crate) fn business_filter(raw: Option<&str>) -> Result<Option<BusinessId>, ()> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(None),
        Some(s) => s.parse().map(Some).map_err(|_| ()),
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use serde_json::Value;
    use tempfile::TempDir;
    use tower::ServiceExt;

    use crate::config::BizdeskPaths;

    /// A router over a fresh temporary data directory
    pub(crate) fn test_app() -> (TempDir, Arc<AppState>, Router) {
        test_app_with(Settings::default())
    }

    pub(crate) fn test_app_with(settings: Settings) -> (TempDir, Arc<AppState>, Router) {
        let temp_dir = TempDir::new().unwrap();
        let paths = BizdeskPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();
        let state = Arc::new(AppState::new(storage, settings));
        let app = router(Arc::clone(&state));
        (temp_dir, state, app)
    }

    /// Send one request and return the status and raw body
    pub(crate) async fn send_raw(
        app: &Router,
        method: &str,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, axum::http::HeaderMap, String) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(json) => builder
                .header("content-type", "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, headers, String::from_utf8(bytes.to_vec()).unwrap())
    }

    /// Send one request and parse the JSON response
    pub(crate) async fn send(
        app: &Router,
        method: &str,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let (status, _, text) = send_raw(app, method, uri, body).await;
        let json = if text.is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&text).unwrap()
        };
        (status, json)
    }

    #[test]
    fn test_business_filter() {
        assert_eq!(business_filter(None), Ok(None));
        assert_eq!(business_filter(Some("  ")), Ok(None));
        assert!(business_filter(Some("not-a-uuid")).is_err());

        let id = BusinessId::new();
        assert_eq!(business_filter(Some(id.to_string().as_str())), Ok(Some(id)));
    }

    #[tokio::test]
    async fn test_unknown_route() {
        let (_temp_dir, _state, app) = test_app();
        let (status, _) = send(&app, "GET", "/api/unknown", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
