use std::sync::Arc;

use axum::{extract::State, response::Html};
use tracing::debug;

use crate::{AppState, error::AppResult, templates};

pub async fn index(State(state): State<Arc<AppState>>) -> AppResult<Html<String>> {
    let titles = state.store.find_all().await?;
    debug!(count = titles.len(), "rendering titles");
    Ok(Html(templates::titles_page(&titles)))
}
