use axum::{routing::{delete, get, post}, Router};
use std::{net::SocketAddr, sync::Arc};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

use samovar_core::DeckStore;
use crate::api::routes::{add_card, delete_card, post_review, queue, reset_card, stats, AppState};

pub fn router(store: Arc<dyn DeckStore>) -> Router {
    let state = Arc::new(AppState::new(store));

    Router::new()
        .route("/learners/:learner/stats", get(stats))
        .route("/learners/:learner/queue", get(queue))
        .route("/learners/:learner/cards", post(add_card))
        .route("/learners/:learner/cards/:id", delete(delete_card))
        .route("/learners/:learner/cards/:id/reset", post(reset_card))
        .route("/learners/:learner/reviews", post(post_review))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

pub async fn run(store: Arc<dyn DeckStore>, addr: SocketAddr) -> anyhow::Result<()> {
    let app = router(store);
    let listener = TcpListener::bind(addr).await?;
    info!(%addr, "api listening");
    axum::serve(listener, app.into_make_service()).await?;
    Ok(())
}
