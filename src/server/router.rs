//! Route table of the API

use super::versioning::negotiate_version;
use crate::handlers::{
    AppState, create_camp, create_talk, delete_camp, delete_talk, get_camp, get_speaker,
    get_talk, list_camps, list_speakers, list_talks, reload_config, search_camps, update_camp,
    update_talk,
};
use axum::{
    Json, Router, middleware,
    routing::{get, options},
};
use serde_json::{Value, json};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

/// Build the API routes
///
/// - GET/POST          /api/camps
/// - GET               /api/camps/search
/// - GET/PUT/DELETE    /api/camps/{moniker}
/// - GET/POST          /api/camps/{moniker}/talks
/// - GET/PUT/DELETE    /api/camps/{moniker}/talks/{id}
/// - GET               /api/speakers, /api/speakers/{id}
/// - OPTIONS           /api/operational/reloadconfig
///
/// All of them go through API version negotiation. Health routes do not.
pub fn build_routes(state: AppState) -> Router {
    let api = Router::new()
        .route("/api/camps", get(list_camps).post(create_camp))
        .route("/api/camps/search", get(search_camps))
        .route(
            "/api/camps/{moniker}",
            get(get_camp).put(update_camp).delete(delete_camp),
        )
        .route(
            "/api/camps/{moniker}/talks",
            get(list_talks).post(create_talk),
        )
        .route(
            "/api/camps/{moniker}/talks/{id}",
            get(get_talk).put(update_talk).delete(delete_talk),
        )
        .route("/api/speakers", get(list_speakers))
        .route("/api/speakers/{id}", get(get_speaker))
        .route("/api/operational/reloadconfig", options(reload_config))
        .route_layer(middleware::from_fn_with_state(
            state.config.clone(),
            negotiate_version,
        ))
        .with_state(state);

    health_routes()
        .merge(api)
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
}

/// Build health check routes
fn health_routes() -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/healthz", get(health_check))
}

/// Health check endpoint handler
async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "codecamp"
    }))
}
