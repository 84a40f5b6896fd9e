use crate::filters::{filter_by_lesson, filter_by_tag, filter_by_text};
use crate::queue::{interleave, DEFAULT_REVIEW_RATIO};
use crate::stats::{retention_rate, summarize, DeckStats};
use crate::{
    Card, CardEdit, CardId, Clock, CoreError, DeckExport, DeckImage, DeckImport, DeckStore, NewCard,
    Quality, SystemClock, IMAGE_VERSION,
};
use chrono::serde::ts_milliseconds;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, warn};

pub const DEFAULT_NEW_CARDS_PER_DAY: u32 = 20;
pub const DEFAULT_REVIEWS_PER_DAY: u32 = 100;

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct DeckSettings {
    pub new_cards_per_day: u32,
    /// Advisory only; no scheduling decision reads it.
    pub reviews_per_day: u32,
    /// Review cards emitted per new card when building the queue.
    pub review_ratio: u32,
}

impl Default for DeckSettings {
    fn default() -> Self {
        Self {
            new_cards_per_day: DEFAULT_NEW_CARDS_PER_DAY,
            reviews_per_day: DEFAULT_REVIEWS_PER_DAY,
            review_ratio: DEFAULT_REVIEW_RATIO,
        }
    }
}

/// Per-day intake counters, keyed by the learner-local date.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DailyStats {
    pub date: NaiveDate,
    #[serde(default)]
    pub new_cards: u32,
    #[serde(default)]
    pub reviews: u32,
    #[serde(default)]
    pub correct_reviews: u32,
}

impl DailyStats {
    pub fn fresh(date: NaiveDate) -> Self {
        Self {
            date,
            new_cards: 0,
            reviews: 0,
            correct_reviews: 0,
        }
    }
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewOutcome {
    pub card: Card,
    pub was_new: bool,
    #[serde(with = "ts_milliseconds")]
    pub next_review: DateTime<Utc>,
    pub interval: u32,
    pub easiness: f64,
}

/// One learner's deck. Every mutating call writes the whole deck through to
/// the store before returning.
pub struct DeckManager {
    key: String,
    store: Arc<dyn DeckStore>,
    clock: Arc<dyn Clock>,
    cards: HashMap<CardId, Card>,
    order: Vec<CardId>,
    settings: DeckSettings,
    daily: DailyStats,
}

impl DeckManager {
    pub fn open(store: Arc<dyn DeckStore>, key: impl Into<String>) -> Self {
        Self::open_with_clock(store, key, Arc::new(SystemClock))
    }

    /// Loads the deck stored under `key`. Missing, unreadable or corrupt state
    /// yields an empty deck with default settings; opening never fails.
    pub fn open_with_clock(store: Arc<dyn DeckStore>, key: impl Into<String>, clock: Arc<dyn Clock>) -> Self {
        let key = key.into();
        let image = match store.load(&key) {
            Ok(Some(payload)) => match DeckImage::from_json(&payload) {
                Ok(img) => Some(img),
                Err(e) => {
                    warn!(key = %key, error = %e, "discarding corrupt deck, starting empty");
                    None
                }
            },
            Ok(None) => None,
            Err(e) => {
                warn!(key = %key, error = %e, "deck could not be loaded, starting empty");
                None
            }
        };

        let today = clock.today();
        let mut deck = Self {
            key,
            store,
            clock,
            cards: HashMap::new(),
            order: Vec::new(),
            settings: DeckSettings::default(),
            daily: DailyStats::fresh(today),
        };
        if let Some(img) = image {
            deck.restore(img);
        }
        deck.roll_daily();
        debug!(key = %deck.key, cards = deck.len(), "deck opened");
        deck
    }

    fn restore(&mut self, img: DeckImage) {
        for mut card in img.cards {
            if card.sanitize() {
                warn!(card = %card.id, "stored card had out-of-range scheduling fields");
            }
            if self.cards.contains_key(&card.id) {
                warn!(card = %card.id, "duplicate card id in stored deck, keeping first");
                continue;
            }
            self.order.push(card.id);
            self.cards.insert(card.id, card);
        }
        self.settings = img.settings;
        if let Some(daily) = img.daily_stats {
            self.daily = daily;
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn settings(&self) -> DeckSettings {
        self.settings
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Cards in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Card> + '_ {
        self.order.iter().filter_map(|id| self.cards.get(id))
    }

    pub fn cards(&self) -> Vec<Card> {
        self.iter().cloned().collect()
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    // ===== Daily counters =====

    fn roll_daily(&mut self) -> bool {
        let today = self.clock.today();
        if self.daily.date == today {
            return false;
        }
        debug!(key = %self.key, from = %self.daily.date, to = %today, "daily counters reset");
        self.daily = DailyStats::fresh(today);
        true
    }

    /// Today's counters; a stale stored date reads as zeroes.
    pub fn daily_stats(&self) -> DailyStats {
        let today = self.clock.today();
        if self.daily.date == today {
            self.daily.clone()
        } else {
            DailyStats::fresh(today)
        }
    }

    pub fn remaining_new_today(&self) -> usize {
        self.settings
            .new_cards_per_day
            .saturating_sub(self.daily_stats().new_cards) as usize
    }

    // ===== Persistence =====

    pub fn image(&self) -> DeckImage {
        DeckImage {
            version: IMAGE_VERSION,
            cards: self.cards(),
            settings: self.settings,
            daily_stats: Some(self.daily.clone()),
            last_saved: Some(self.clock.now()),
        }
    }

    fn persist(&self) -> Result<(), CoreError> {
        let payload = self.image().to_json()?;
        self.store.save(&self.key, &payload)
    }

    pub fn update_settings(&mut self, settings: DeckSettings) -> Result<(), CoreError> {
        self.roll_daily();
        self.settings = settings;
        self.persist()
    }

    // ===== Cards =====

    fn insert_new(&mut self, data: NewCard) -> Card {
        let card = Card::new(data, self.clock.now());
        debug!(card = %card.id, source = %card.source_text, "card added");
        self.order.push(card.id);
        self.cards.insert(card.id, card.clone());
        card
    }

    /// Adds a card, or returns the existing one with the same source text.
    pub fn add_card(&mut self, data: NewCard) -> Result<Card, CoreError> {
        self.roll_daily();
        if let Some(existing) = self.find_by_source_text(&data.source_text) {
            warn!(source = %data.source_text, "card already exists");
            return Ok(existing);
        }
        let card = self.insert_new(data);
        self.persist()?;
        Ok(card)
    }

    /// `add_card` per record, results in input order. One write for the batch.
    pub fn add_cards(&mut self, list: impl IntoIterator<Item = NewCard>) -> Result<Vec<Card>, CoreError> {
        self.roll_daily();
        let mut out = Vec::new();
        let mut inserted = 0usize;
        for data in list {
            match self.find_by_source_text(&data.source_text) {
                Some(existing) => out.push(existing),
                None => {
                    out.push(self.insert_new(data));
                    inserted += 1;
                }
            }
        }
        if inserted > 0 {
            self.persist()?;
        }
        debug!(key = %self.key, requested = out.len(), inserted, "cards imported");
        Ok(out)
    }

    /// Imports a lesson's word list, tagging every record with `lesson_id`.
    pub fn import_from_lesson(
        &mut self,
        lesson_id: &str,
        words: impl IntoIterator<Item = NewCard>,
    ) -> Result<Vec<Card>, CoreError> {
        let words: Vec<NewCard> = words
            .into_iter()
            .map(|w| NewCard {
                lesson_id: Some(lesson_id.to_string()),
                ..w
            })
            .collect();
        self.add_cards(words)
    }

    pub fn find_by_source_text(&self, text: &str) -> Option<Card> {
        self.iter().find(|c| c.source_text == text).cloned()
    }

    pub fn get_card(&self, id: CardId) -> Option<Card> {
        self.cards.get(&id).cloned()
    }

    pub fn update_card(&mut self, id: CardId, edit: CardEdit) -> Result<Card, CoreError> {
        self.roll_daily();
        let now = self.clock.now();
        let card = self.cards.get_mut(&id).ok_or(CoreError::CardNotFound(id))?;
        card.apply_edit(edit, now);
        let out = card.clone();
        self.persist()?;
        Ok(out)
    }

    pub fn delete_card(&mut self, id: CardId) -> Result<bool, CoreError> {
        self.roll_daily();
        if self.cards.remove(&id).is_none() {
            warn!(card = %id, "delete of unknown card");
            return Ok(false);
        }
        self.order.retain(|c| *c != id);
        self.persist()?;
        Ok(true)
    }

    pub fn reset_card(&mut self, id: CardId) -> Result<Card, CoreError> {
        self.roll_daily();
        let now = self.clock.now();
        let Some(card) = self.cards.get_mut(&id) else {
            warn!(card = %id, "reset of unknown card");
            return Err(CoreError::CardNotFound(id));
        };
        card.reset(now);
        let out = card.clone();
        self.persist()?;
        Ok(out)
    }

    pub fn reset_all_progress(&mut self) -> Result<(), CoreError> {
        let now = self.clock.now();
        for card in self.cards.values_mut() {
            card.reset(now);
        }
        self.daily = DailyStats::fresh(self.clock.today());
        self.persist()
    }

    pub fn cards_by_lesson(&self, lesson_id: &str) -> Vec<Card> {
        filter_by_lesson(self.iter(), lesson_id)
    }

    pub fn cards_by_tag(&self, tag: &str) -> Vec<Card> {
        filter_by_tag(self.iter(), tag)
    }

    pub fn search(&self, query: &str) -> Vec<Card> {
        filter_by_text(self.iter(), query)
    }

    // ===== Queues =====

    /// Every due card, most urgent first.
    pub fn get_due_cards(&self, limit: Option<usize>) -> Vec<Card> {
        let now = self.clock.now();
        let mut due: Vec<(f64, &Card)> = self
            .iter()
            .filter(|c| c.is_due(now))
            .map(|c| (c.priority(now), c))
            .collect();
        due.sort_by(|a, b| b.0.total_cmp(&a.0));

        let take = limit.unwrap_or(due.len());
        due.into_iter().take(take).map(|(_, c)| c.clone()).collect()
    }

    /// Unreviewed cards, oldest import first, never more than what is left of
    /// today's new-card budget.
    pub fn get_new_cards(&self, limit: Option<usize>) -> Vec<Card> {
        let remaining = self.remaining_new_today();
        let cap = limit.map_or(remaining, |l| l.min(remaining));

        let mut fresh: Vec<&Card> = self.iter().filter(|c| c.is_new()).collect();
        fresh.sort_by_key(|c| c.created_at);
        fresh.into_iter().take(cap).cloned().collect()
    }

    /// Due reviews interleaved with budgeted new cards. Unreviewed cards only
    /// enter through the new-card budget, never through the due pool.
    pub fn get_review_queue(&self, include_new: bool) -> Vec<Card> {
        let reviews: Vec<Card> = self
            .get_due_cards(None)
            .into_iter()
            .filter(|c| !c.is_new())
            .collect();
        let fresh = if include_new {
            self.get_new_cards(None)
        } else {
            Vec::new()
        };
        interleave(reviews, fresh, self.settings.review_ratio)
    }

    // ===== Reviews =====

    pub fn review_card(&mut self, id: CardId, quality: Quality) -> Result<ReviewOutcome, CoreError> {
        self.roll_daily();
        let now = self.clock.now();
        let Some(card) = self.cards.get_mut(&id) else {
            warn!(card = %id, "review of unknown card");
            return Err(CoreError::CardNotFound(id));
        };

        let was_new = card.is_new();
        card.review(quality, now);
        let outcome = ReviewOutcome {
            card: card.clone(),
            was_new,
            next_review: card.next_review,
            interval: card.interval,
            easiness: card.easiness,
        };

        if was_new {
            self.daily.new_cards += 1;
        }
        self.daily.reviews += 1;
        if quality.is_pass() {
            self.daily.correct_reviews += 1;
        }
        debug!(
            card = %id,
            quality = quality.value(),
            interval = outcome.interval,
            easiness = outcome.easiness,
            "card reviewed"
        );

        self.persist()?;
        Ok(outcome)
    }

    // ===== Reporting =====

    pub fn stats(&self) -> DeckStats {
        let totals = summarize(self.iter(), self.clock.now());
        DeckStats::new(&totals, self.daily_stats(), self.settings)
    }

    pub fn retention_rate(&self, days: u32) -> u32 {
        retention_rate(self.iter(), self.clock.now(), days)
    }

    pub fn export_data(&self) -> DeckExport {
        DeckExport {
            cards: self.cards(),
            settings: self.settings,
            stats: self.stats(),
            exported_at: self.clock.now(),
        }
    }

    /// Inserts or overwrites cards by id and adopts the payload's settings.
    /// A card whose source text already belongs to a different id is skipped.
    /// Returns how many cards were taken.
    pub fn import_data(&mut self, data: DeckImport) -> Result<usize, CoreError> {
        self.roll_daily();
        let mut taken = 0usize;
        for mut card in data.cards {
            if card.sanitize() {
                warn!(card = %card.id, "imported card had out-of-range scheduling fields");
            }
            if self
                .iter()
                .any(|c| c.id != card.id && c.source_text == card.source_text)
            {
                warn!(source = %card.source_text, "skipping imported card with duplicate source text");
                continue;
            }
            if let Some(slot) = self.cards.get_mut(&card.id) {
                *slot = card;
            } else {
                self.order.push(card.id);
                self.cards.insert(card.id, card);
            }
            taken += 1;
        }
        if let Some(settings) = data.settings {
            self.settings = settings;
        }
        self.persist()?;
        Ok(taken)
    }
}
