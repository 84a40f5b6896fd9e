use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use parking_lot::Mutex;
use samovar_core::{CardId, CoreError, DeckManager, DeckStats, DeckStore, NewCard, Quality};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::warn;

use crate::api::dto::{CardOut, QueueQuery, ReviewIn, ReviewOut};

/// Open decks by learner. Each deck has its own lock; the outer map lock is
/// held only long enough to find or open a deck.
pub struct AppState {
    store: Arc<dyn DeckStore>,
    decks: Mutex<HashMap<String, Arc<Mutex<DeckManager>>>>,
}

impl AppState {
    pub fn new(store: Arc<dyn DeckStore>) -> Self {
        Self {
            store,
            decks: Mutex::new(HashMap::new()),
        }
    }

    pub fn deck(&self, learner: &str) -> Arc<Mutex<DeckManager>> {
        let mut decks = self.decks.lock();
        decks
            .entry(learner.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(DeckManager::open(self.store.clone(), learner))))
            .clone()
    }
}

pub struct ApiError(CoreError);

impl From<CoreError> for ApiError {
    fn from(e: CoreError) -> Self {
        Self(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let code = match &self.0 {
            CoreError::InvalidQuality(_) => StatusCode::BAD_REQUEST,
            CoreError::CardNotFound(_) => StatusCode::NOT_FOUND,
            CoreError::AnswerNotRevealed | CoreError::SessionFinished => StatusCode::CONFLICT,
            CoreError::Storage(_) | CoreError::Serialization(_) => {
                warn!(error = %self.0, "request failed");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        (code, self.0.to_string()).into_response()
    }
}

type ApiResult<T> = Result<T, ApiError>;

pub async fn stats(State(st): State<Arc<AppState>>, Path(learner): Path<String>) -> Json<DeckStats> {
    let deck = st.deck(&learner);
    let stats = deck.lock().stats();
    Json(stats)
}

pub async fn queue(
    State(st): State<Arc<AppState>>,
    Path(learner): Path<String>,
    Query(q): Query<QueueQuery>,
) -> Json<Vec<CardOut>> {
    let deck = st.deck(&learner);
    let mut cards = deck.lock().get_review_queue(q.include_new.unwrap_or(true));
    if let Some(m) = q.max {
        cards.truncate(m);
    }
    Json(cards.into_iter().map(CardOut::from).collect())
}

pub async fn add_card(
    State(st): State<Arc<AppState>>,
    Path(learner): Path<String>,
    Json(body): Json<NewCard>,
) -> ApiResult<(StatusCode, Json<CardOut>)> {
    let deck = st.deck(&learner);
    let card = deck.lock().add_card(body)?;
    Ok((StatusCode::CREATED, Json(card.into())))
}

pub async fn post_review(
    State(st): State<Arc<AppState>>,
    Path(learner): Path<String>,
    Json(body): Json<ReviewIn>,
) -> ApiResult<Json<ReviewOut>> {
    let quality = Quality::new(body.quality)?;
    let deck = st.deck(&learner);
    let out = deck.lock().review_card(body.card_id, quality)?;
    Ok(Json(ReviewOut {
        was_new: out.was_new,
        interval: out.interval,
        easiness: out.easiness,
        next_review: out.next_review,
        card: out.card.into(),
    }))
}

pub async fn reset_card(
    State(st): State<Arc<AppState>>,
    Path((learner, id)): Path<(String, CardId)>,
) -> ApiResult<Json<CardOut>> {
    let deck = st.deck(&learner);
    let card = deck.lock().reset_card(id)?;
    Ok(Json(card.into()))
}

pub async fn delete_card(
    State(st): State<Arc<AppState>>,
    Path((learner, id)): Path<(String, CardId)>,
) -> ApiResult<StatusCode> {
    let deck = st.deck(&learner);
    let removed = deck.lock().delete_card(id)?;
    Ok(if removed { StatusCode::NO_CONTENT } else { StatusCode::NOT_FOUND })
}

#[cfg(test)]
mod tests {
    use super::*;
    use samovar_core::MemoryStore;

    fn state() -> Arc<AppState> {
        Arc::new(AppState::new(Arc::new(MemoryStore::new())))
    }

    fn word(s: &str) -> Json<NewCard> {
        Json(NewCard::new(s, format!("{s}-en")))
    }

    #[tokio::test]
    async fn learners_are_isolated() {
        let st = state();
        add_card(State(st.clone()), Path("anna".into()), word("кот")).await.ok().unwrap();
        add_card(State(st.clone()), Path("anna".into()), word("дом")).await.ok().unwrap();
        add_card(State(st.clone()), Path("boris".into()), word("чай")).await.ok().unwrap();

        assert_eq!(stats(State(st.clone()), Path("anna".into())).await.0.total, 2);
        assert_eq!(stats(State(st.clone()), Path("boris".into())).await.0.total, 1);
        assert!(Arc::ptr_eq(&st.deck("anna"), &st.deck("anna")));
    }

    #[tokio::test]
    async fn review_then_reset_and_delete() {
        let st = state();
        let (_, Json(card)) = add_card(State(st.clone()), Path("anna".into()), word("кот")).await.ok().unwrap();

        let Json(q) = queue(State(st.clone()), Path("anna".into()), Query(QueueQuery::default())).await;
        assert_eq!(q.len(), 1);

        let body = ReviewIn { card_id: card.id, quality: 4 };
        let Json(out) = post_review(State(st.clone()), Path("anna".into()), Json(body)).await.ok().unwrap();
        assert!(out.was_new);
        assert_eq!(out.interval, 1);

        let bad = ReviewIn { card_id: card.id, quality: 9 };
        let err = post_review(State(st.clone()), Path("anna".into()), Json(bad)).await.err().unwrap();
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);

        let Json(reset) = reset_card(State(st.clone()), Path(("anna".into(), card.id))).await.ok().unwrap();
        assert_eq!(reset.interval, 0);

        let gone = delete_card(State(st.clone()), Path(("anna".into(), card.id))).await.ok().unwrap();
        assert_eq!(gone, StatusCode::NO_CONTENT);
        let again = delete_card(State(st.clone()), Path(("anna".into(), card.id))).await.ok().unwrap();
        assert_eq!(again, StatusCode::NOT_FOUND);

        let missing = reset_card(State(st), Path(("anna".into(), card.id))).await.err().unwrap();
        assert_eq!(missing.into_response().status(), StatusCode::NOT_FOUND);
    }
}
