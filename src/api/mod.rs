mod ws;

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;
use tower_http::cors::{Any, CorsLayer};

use crate::db::Repository;
use crate::error::Result;
use crate::ingest::NewsIngestor;
use crate::models::{NewSource, SourceKind};
use crate::notify::Notifier;

#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<Repository>,
    pub ingestor: Arc<NewsIngestor>,
    pub notifier: Notifier,
}

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(index))
        .route("/api/regions", get(list_regions))
        .route("/api/regions/counts", get(list_regions_with_counts))
        .route("/api/news/{code}", get(region_news))
        .route("/api/refresh", post(trigger_refresh))
        .route("/admin/sources", get(list_sources).post(add_source))
        .route("/admin/sources/{id}", delete(remove_source))
        .route("/ws", get(ws::subscribe))
        .layer(cors)
        .with_state(state)
}

async fn index() -> impl IntoResponse {
    Json(json!({
        "message": "targeted-news API is running",
        "endpoints": {
            "regions": "/api/regions",
            "region_counts": "/api/regions/counts",
            "news": "/api/news/{code}",
            "refresh": "/api/refresh",
            "admin_sources": "/admin/sources",
            "notifications": "/ws",
        }
    }))
}

async fn list_regions(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let regions = state.repo.regions().await?;
    Ok(Json(regions))
}

async fn list_regions_with_counts(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let regions = state.repo.regions_with_counts().await?;
    Ok(Json(regions))
}

async fn region_news(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<impl IntoResponse> {
    let articles = state.repo.articles_for_region(&code).await?;
    Ok(Json(json!({
        "success": true,
        "region": code,
        "count": articles.len(),
        "articles": articles,
    })))
}

/// Manual refresh trigger. Does not broadcast; only scheduled runs notify
/// subscribers.
async fn trigger_refresh(State(state): State<AppState>) -> Result<impl IntoResponse> {
    match state.ingestor.refresh().await? {
        Some(summary) => Ok(Json(json!({
            "success": true,
            "message": format!(
                "Successfully processed {} articles ({} new)",
                summary.processed, summary.inserted
            ),
            "count": summary.processed,
            "inserted": summary.inserted,
        }))),
        None => Ok(Json(json!({
            "success": false,
            "message": "A refresh is already in progress",
        }))),
    }
}

async fn list_sources(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let sources = state.repo.all_sources().await?;
    Ok(Json(sources))
}

#[derive(Debug, Deserialize)]
struct AddSourceRequest {
    region_code: String,
    endpoint: String,
    name: Option<String>,
    kind: Option<SourceKind>,
}

async fn add_source(
    State(state): State<AppState>,
    Json(request): Json<AddSourceRequest>,
) -> Result<Response> {
    if url::Url::parse(&request.endpoint).is_err() {
        return Ok(bad_request("endpoint must be a valid URL"));
    }

    if !state.repo.region_exists(&request.region_code).await? {
        return Ok(bad_request(&format!(
            "unknown region code: {}",
            request.region_code
        )));
    }

    let source = NewSource {
        region_code: request.region_code,
        endpoint: request.endpoint,
        name: request.name.unwrap_or_else(|| "Unknown Source".to_string()),
        kind: request.kind.unwrap_or(SourceKind::Rss),
    };

    let response = match state.repo.insert_source(source).await? {
        Some(id) => Json(json!({
            "success": true,
            "message": "Source added successfully",
            "id": id,
        })),
        None => Json(json!({
            "success": true,
            "message": "Source already registered",
        })),
    };
    Ok(response.into_response())
}

async fn remove_source(State(state): State<AppState>, Path(id): Path<i64>) -> Result<Response> {
    if state.repo.delete_source(id).await? {
        Ok(Json(json!({
            "success": true,
            "message": "Source deleted successfully",
        }))
        .into_response())
    } else {
        Ok((
            StatusCode::NOT_FOUND,
            Json(json!({
                "success": false,
                "error": "Source not found",
            })),
        )
            .into_response())
    }
}

fn bad_request(message: &str) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({
            "success": false,
            "error": message,
        })),
    )
        .into_response()
}
