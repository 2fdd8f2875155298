use axum::{
    Router,
    routing::{get, post},
};
use tower_http::services::ServeDir;

use crate::{AppState, handlers};

pub fn create_router(state: AppState) -> Router {
    let static_dir = state.config.static_dir.clone();

    Router::new()
        .route("/", get(handlers::index))
        .route("/formpage", get(handlers::lookup_form))
        .route("/formpage", post(handlers::lookup_report))
        .route("/reportDisplay", get(handlers::report_display))
        .route("/reportDisplay", post(handlers::download_report))
        .route("/payment", get(handlers::payment_form))
        .route("/payment", post(handlers::submit_payment))
        .route(
            "/api/reports/{report_id}/status",
            get(handlers::report_status),
        )
        .route("/api/health", get(handlers::health_check))
        .nest_service("/pics", ServeDir::new(static_dir.join("pics")))
        .nest_service("/css", ServeDir::new(static_dir.join("css")))
        .nest_service("/js", ServeDir::new(static_dir.join("js")))
        .with_state(state)
}
