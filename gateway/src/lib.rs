//! HTTP face of the film query boundary.
//!
//! `GET /films/{id}` answers with a camelCase film or a structured failure;
//! `GET /films` lists the catalogue. Lookups block on the upstream call, so
//! each one runs on Tokio's blocking pool.

pub mod config;
pub mod error;

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use ghibli_core::{Film, FilmLookup, FilmQuery, GhibliClient, UreqTransport};
use serde_json::{json, Value};

use crate::config::GatewayConfig;
use crate::error::AppResult;

#[derive(Clone)]
pub struct AppState {
    pub lookup: Arc<dyn FilmLookup>,
}

impl AppState {
    pub fn new(lookup: Arc<dyn FilmLookup>) -> Self {
        Self { lookup }
    }

    /// Lookup straight against the configured upstream catalogue.
    pub fn from_config(config: &GatewayConfig) -> Self {
        let transport = UreqTransport::with_timeout(config.upstream_timeout);
        let client = GhibliClient::with_base_url(transport, &config.upstream_base_url);
        Self::new(Arc::new(FilmQuery::new(client)))
    }
}

pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/films", get(list_films))
        .route("/films/{id}", get(get_film))
        .with_state(state)
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

async fn get_film(State(state): State<AppState>, Path(id): Path<String>) -> AppResult<Json<Film>> {
    let lookup = Arc::clone(&state.lookup);
    let film = tokio::task::spawn_blocking(move || lookup.film(&id)).await??;
    Ok(Json(film))
}

async fn list_films(State(state): State<AppState>) -> AppResult<Json<Vec<Film>>> {
    let lookup = Arc::clone(&state.lookup);
    let films = tokio::task::spawn_blocking(move || lookup.films()).await??;
    Ok(Json(films))
}
