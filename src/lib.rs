pub mod config;
pub mod db;
pub mod entities;
pub mod error;
pub mod loader;
pub mod models;
pub mod routes;
pub mod source;
pub mod store;
pub mod templates;
pub mod transform;

use std::sync::Arc;

use axum::{Router, routing::get};
use tower_http::trace::TraceLayer;

use crate::{config::Config, store::TitleStore};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub store: TitleStore,
}

pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(routes::index))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

pub const DEFAULT_LOG_FILTER: &str = "info,titles_etl=debug,sqlx=warn";

/// Year used for `content_age` when loading now.
pub fn current_year() -> i32 {
    let today: jiff::civil::Date = jiff::Zoned::now().into();
    i32::from(today.year())
}
