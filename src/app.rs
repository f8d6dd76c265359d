use crate::config::Config;
use crate::proxy::{self, ReqwestUpstream, Upstream, API_KEY_PARAM, FAILURE_MESSAGE};
use crate::tmdb::{CatalogApi, TmdbClient};
use crate::views;
use anyhow::Result;
use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::json;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub upstream: Arc<dyn Upstream>,
    pub catalog: Arc<dyn CatalogApi>,
}

impl AppState {
    pub fn from_config(config: Config) -> Result<Self> {
        let upstream: Arc<dyn Upstream> = Arc::new(ReqwestUpstream::new(&config.tmdb_base_url)?);
        let catalog: Arc<dyn CatalogApi> = Arc::new(TmdbClient::new(&config)?);
        Ok(Self {
            config: Arc::new(config),
            upstream,
            catalog,
        })
    }
}

pub async fn run_server(config: Config) -> Result<()> {
    let addr = config.listen_addr;
    let state = AppState::from_config(config)?;
    let app = build_router(state);

    info!("Listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/*path", get(forward))
        .route("/home", get(home))
        .route("/movie/:id", get(movie))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> &'static str {
    "OK"
}

async fn forward(
    State(state): State<AppState>,
    Path(path): Path<String>,
    Query(params): Query<Vec<(String, String)>>,
) -> Response {
    let endpoint = proxy::join_segments(&path);
    let query = proxy::merge_query(params, API_KEY_PARAM, &state.config.api_key);

    match state.upstream.get(&endpoint, &query).await {
        Ok(res) => (
            res.status,
            [(header::CONTENT_TYPE, "application/json")],
            res.body,
        )
            .into_response(),
        Err(e) => {
            error!("TMDB API proxy error: {}", e);
            let status = e.status.unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            (status, Json(json!({ "error": FAILURE_MESSAGE }))).into_response()
        }
    }
}

async fn home(State(state): State<AppState>) -> Json<views::HomeView> {
    Json(views::load_home(state.catalog.as_ref()).await)
}

async fn movie(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    let not_found = || {
        (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "Movie not found" })),
        )
            .into_response()
    };
    let Ok(id) = id.parse::<i32>() else {
        return not_found();
    };
    let view = views::load_movie(state.catalog.as_ref(), id).await;
    if view.movie.is_none() {
        return not_found();
    }
    Json(view).into_response()
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        let mut term = signal(SignalKind::terminate()).expect("failed to install SIGTERM handler");
        term.recv().await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Shutdown signal received (Ctrl+C)");
        }
        _ = terminate => {
            info!("Shutdown signal received (SIGTERM)");
        }
    }
}
