//! API handlers for the rpg-gen server
//!
//! Provides endpoints for:
//! - Category listing and random picks (HTML fragments or JSON)
//! - Per-generator pages
//! - Authenticated dataset upload

use std::path::Path;
use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Path as UrlPath, Query, State},
    http::{header::ACCEPT, HeaderMap},
    middleware,
    response::{Html, IntoResponse, Response},
    routing::{get, put},
    Json, Router,
};
use rpg_gen_core::{Catalog, CompilePolicy, GeneratorSet, NotFoundError};
use serde::{Deserialize, Serialize};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::{debug, info, warn};

use crate::auth::require_admin_key;
use crate::error::ServerError;
use crate::render;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<Catalog>,
    /// Policy applied to uploaded documents
    pub policy: CompilePolicy,
    /// Shared secret for `/admin`; `None` disables the admin routes
    pub admin_key: Option<Arc<str>>,
}

impl AppState {
    pub fn new(catalog: Catalog, policy: CompilePolicy, admin_key: Option<String>) -> Self {
        Self {
            catalog: Arc::new(catalog),
            policy,
            admin_key: admin_key.filter(|k| !k.is_empty()).map(Arc::from),
        }
    }
}

/// Build the full router. Static files are served for unmatched paths when
/// `static_dir` is given.
pub fn router(state: AppState, static_dir: Option<&Path>) -> Router {
    let admin = Router::new()
        .route("/upload", put(handle_upload))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_admin_key,
        ));

    let mut app = Router::new()
        .route("/health", get(handle_health))
        .route("/api/categories", get(handle_categories))
        .route("/api/random", get(handle_random))
        .route("/generator/:name", get(handle_generator_page))
        .nest("/admin", admin);

    if let Some(dir) = static_dir {
        app = app.fallback_service(ServeDir::new(dir));
    }

    app.layer(TraceLayer::new_for_http()).with_state(state)
}

/// Whether the client asked for JSON instead of HTML fragments.
fn wants_json(headers: &HeaderMap) -> bool {
    headers
        .get(ACCEPT)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.contains("application/json"))
}

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
    pub generators: usize,
}

/// Handler: GET /health
pub async fn handle_health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        service: "rpg-gen-server",
        version: env!("CARGO_PKG_VERSION"),
        generators: state.catalog.len(),
    })
}

#[derive(Serialize)]
pub struct CategoriesResponse {
    pub categories: Vec<String>,
}

/// Handler: GET /api/categories
pub async fn handle_categories(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let names = state.catalog.category_names();

    if wants_json(&headers) {
        Json(CategoriesResponse { categories: names }).into_response()
    } else {
        Html(render::category_options(names.iter().map(String::as_str))).into_response()
    }
}

/// Query for GET /api/random. `count` stays a string so that junk input
/// falls back to the minimum instead of failing the request.
#[derive(Debug, Deserialize)]
pub struct RandomQuery {
    #[serde(default)]
    pub category: String,
    pub count: Option<String>,
}

#[derive(Serialize)]
pub struct RandomResponse {
    pub category: String,
    pub results: Vec<String>,
}

/// Handler: GET /api/random
pub async fn handle_random(
    State(state): State<AppState>,
    Query(query): Query<RandomQuery>,
    headers: HeaderMap,
) -> Result<Response, ServerError> {
    let count = state.catalog.bounds().parse_count(query.count.as_deref());
    let results = state.catalog.sample(&query.category, count)?;
    debug!(
        "Sampled {} values from '{}'",
        results.len(),
        query.category
    );

    if wants_json(&headers) {
        Ok(Json(RandomResponse {
            category: query.category,
            results,
        })
        .into_response())
    } else {
        Ok(Html(render::result_items(results.iter().map(String::as_str))).into_response())
    }
}

/// Handler: GET /generator/:name
pub async fn handle_generator_page(
    State(state): State<AppState>,
    UrlPath(name): UrlPath<String>,
) -> Result<Html<String>, ServerError> {
    if state.catalog.lookup(&name).is_none() {
        return Err(NotFoundError(name).into());
    }
    Ok(Html(render::generator_page(
        &name,
        state.catalog.bounds().max(),
    )))
}

/// Handler: PUT /admin/upload
///
/// Compiles the uploaded document off the async runtime, then swaps it in.
/// On any failure the current dataset stays active.
pub async fn handle_upload(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<&'static str, ServerError> {
    info!("Upload received: {} bytes", body.len());

    let policy = state.policy;
    let set = tokio::task::spawn_blocking(move || GeneratorSet::from_slice(&body, &policy))
        .await
        .map_err(|e| ServerError::Internal(format!("Compile task failed: {}", e)))?
        .map_err(|e| {
            warn!("Rejected upload: {}", e);
            ServerError::from(e)
        })?;

    state.catalog.replace(set);
    Ok("data updated")
}
