use samovar_core::{Card, CardId, CardStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CardOut {
    pub id: CardId,
    pub source_text: String,
    pub target_text: String,
    pub transcription: Option<String>,
    pub example: Option<String>,
    pub example_translation: Option<String>,
    pub lesson_id: Option<String>,
    pub tags: Vec<String>,
    pub status: CardStatus,
    pub interval: u32,
    pub easiness: f64,
    pub next_review: DateTime<Utc>,
    pub accuracy: u32,
}

impl From<Card> for CardOut {
    fn from(c: Card) -> Self {
        Self {
            status: c.status(),
            accuracy: c.accuracy(),
            id: c.id,
            source_text: c.source_text,
            target_text: c.target_text,
            transcription: c.transcription,
            example: c.example,
            example_translation: c.example_translation,
            lesson_id: c.lesson_id,
            tags: c.tags,
            interval: c.interval,
            easiness: c.easiness,
            next_review: c.next_review,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewOut {
    pub card: CardOut,
    pub was_new: bool,
    pub interval: u32,
    pub easiness: f64,
    pub next_review: DateTime<Utc>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewIn {
    pub card_id: CardId,
    pub quality: u8,
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct QueueQuery {
    pub include_new: Option<bool>,
    pub max: Option<usize>,
}
