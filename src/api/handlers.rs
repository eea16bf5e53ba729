use axum::{
    extract::{Query, State},
    response::Html,
};
use std::sync::Arc;
use std::time::Instant;

use crate::session::SearchSession;

use super::AppState;
use super::models::SearchParams;
use super::templates::render_search_page;

pub async fn search_page_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchParams>,
) -> Html<String> {
    let start = Instant::now();

    let mut session = SearchSession::new(state.client.clone(), state.thumb_concurrency)
        .with_top_k(params.top_k());
    session.load_actors().await;

    if params.is_submission() {
        session
            .submit(params.q(), params.object(), params.actor_id())
            .await;
    }

    tracing::debug!(
        elapsed_ms = start.elapsed().as_millis() as u64,
        status = %session.status().message,
        "rendered search page"
    );

    Html(render_search_page(&session, &params))
}

pub async fn health_handler() -> &'static str {
    "ok"
}
