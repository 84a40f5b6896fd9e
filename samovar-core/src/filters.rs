use crate::{Card, CardStatus};
use chrono::{DateTime, Utc};

pub fn filter_by_text<'a>(cards: impl IntoIterator<Item = &'a Card>, query: &str) -> Vec<Card> {
    let q = query.trim().to_lowercase();
    cards
        .into_iter()
        .filter(|c| {
            q.is_empty()
                || c.source_text.to_lowercase().contains(&q)
                || c.target_text.to_lowercase().contains(&q)
                || c.transcription
                    .as_ref()
                    .map(|t| t.to_lowercase().contains(&q))
                    .unwrap_or(false)
                || c.tags.iter().any(|t| t.to_lowercase().contains(&q))
        })
        .cloned()
        .collect()
}

/// Exact tag match.
pub fn filter_by_tag<'a>(cards: impl IntoIterator<Item = &'a Card>, tag: &str) -> Vec<Card> {
    cards
        .into_iter()
        .filter(|c| c.tags.iter().any(|t| t == tag))
        .cloned()
        .collect()
}

pub fn filter_by_lesson<'a>(cards: impl IntoIterator<Item = &'a Card>, lesson_id: &str) -> Vec<Card> {
    cards
        .into_iter()
        .filter(|c| c.lesson_id.as_deref() == Some(lesson_id))
        .cloned()
        .collect()
}

pub fn filter_by_status<'a>(cards: impl IntoIterator<Item = &'a Card>, want: CardStatus) -> Vec<Card> {
    cards
        .into_iter()
        .filter(|c| c.status() == want)
        .cloned()
        .collect()
}

pub fn filter_due<'a>(cards: impl IntoIterator<Item = &'a Card>, now: DateTime<Utc>) -> Vec<Card> {
    cards.into_iter().filter(|c| c.is_due(now)).cloned().collect()
}
