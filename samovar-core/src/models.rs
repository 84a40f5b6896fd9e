use crate::scheduler::{self, Sm2State, EASINESS_DEFAULT, EASINESS_MIN, MAX_INTERVAL_DAYS};
use crate::CoreError;
use chrono::serde::{ts_milliseconds, ts_milliseconds_option};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

pub type CardId = Uuid;

/// Recall quality on the SM-2 0..=5 scale. Values above 5 cannot be constructed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Quality(u8);

impl Quality {
    pub const MAX: u8 = 5;
    pub const AGAIN: Quality = Quality(0);
    pub const HARD: Quality = Quality(3);
    pub const GOOD: Quality = Quality(4);
    pub const EASY: Quality = Quality(5);

    pub fn new(value: u8) -> Result<Self, CoreError> {
        if value > Self::MAX {
            return Err(CoreError::InvalidQuality(value));
        }
        Ok(Self(value))
    }

    pub fn value(self) -> u8 {
        self.0
    }

    pub fn is_pass(self) -> bool {
        self.0 >= scheduler::PASS_THRESHOLD
    }
}

impl TryFrom<u8> for Quality {
    type Error = CoreError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Quality::new(value)
    }
}

impl From<Quality> for u8 {
    fn from(q: Quality) -> u8 {
        q.0
    }
}

impl fmt::Display for Quality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum CardStatus {
    New,
    Learning,
    Reviewing,
}

impl fmt::Display for CardStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CardStatus::New => "new",
            CardStatus::Learning => "learning",
            CardStatus::Reviewing => "reviewing",
        };
        f.write_str(s)
    }
}

/// One vocabulary record as supplied by a lesson or a manual add.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewCard {
    pub source_text: String,
    pub target_text: String,
    #[serde(default)]
    pub transcription: Option<String>,
    #[serde(default)]
    pub example: Option<String>,
    #[serde(default)]
    pub example_translation: Option<String>,
    #[serde(default)]
    pub lesson_id: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl NewCard {
    pub fn new(source_text: impl Into<String>, target_text: impl Into<String>) -> Self {
        Self {
            source_text: source_text.into(),
            target_text: target_text.into(),
            ..Self::default()
        }
    }

    pub fn with_transcription(mut self, transcription: impl Into<String>) -> Self {
        self.transcription = Some(transcription.into());
        self
    }

    pub fn with_example(mut self, example: impl Into<String>, translation: impl Into<String>) -> Self {
        self.example = Some(example.into());
        self.example_translation = Some(translation.into());
        self
    }

    pub fn with_lesson(mut self, lesson_id: impl Into<String>) -> Self {
        self.lesson_id = Some(lesson_id.into());
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }
}

/// Content edits. `None` leaves a field untouched; `Some(None)` clears an optional field.
#[derive(Clone, Debug, Default)]
pub struct CardEdit {
    pub target_text: Option<String>,
    pub transcription: Option<Option<String>>,
    pub example: Option<Option<String>>,
    pub example_translation: Option<Option<String>>,
    pub lesson_id: Option<Option<String>>,
    pub tags: Option<Vec<String>>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub id: CardId,
    pub source_text: String,
    pub target_text: String,
    #[serde(default)]
    pub transcription: Option<String>,
    #[serde(default)]
    pub example: Option<String>,
    #[serde(default)]
    pub example_translation: Option<String>,
    #[serde(default)]
    pub lesson_id: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,

    pub repetitions: u32,
    pub easiness: f64,
    pub interval: u32,
    #[serde(default, with = "ts_milliseconds_option")]
    pub last_review: Option<DateTime<Utc>>,
    #[serde(with = "ts_milliseconds")]
    pub next_review: DateTime<Utc>,
    pub total_reviews: u32,
    pub correct_reviews: u32,

    #[serde(with = "ts_milliseconds")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "ts_milliseconds")]
    pub last_modified: DateTime<Utc>,
}

impl Card {
    pub fn new(data: NewCard, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            source_text: data.source_text,
            target_text: data.target_text,
            transcription: data.transcription,
            example: data.example,
            example_translation: data.example_translation,
            lesson_id: data.lesson_id,
            tags: data.tags,
            repetitions: 0,
            easiness: EASINESS_DEFAULT,
            interval: 0,
            last_review: None,
            next_review: now,
            total_reviews: 0,
            correct_reviews: 0,
            created_at: now,
            last_modified: now,
        }
    }

    pub fn schedule(&self) -> Sm2State {
        Sm2State {
            repetitions: self.repetitions,
            easiness: self.easiness,
            interval: self.interval,
        }
    }

    pub fn status(&self) -> CardStatus {
        match (self.repetitions, self.last_review) {
            (0, None) => CardStatus::New,
            (0, Some(_)) => CardStatus::Learning,
            _ => CardStatus::Reviewing,
        }
    }

    pub fn is_new(&self) -> bool {
        self.status() == CardStatus::New
    }

    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.next_review <= now
    }

    /// Rounded percentage of passing reviews; 0 before the first review.
    pub fn accuracy(&self) -> u32 {
        crate::stats::percent(u64::from(self.correct_reviews), u64::from(self.total_reviews))
    }

    pub fn priority(&self, now: DateTime<Utc>) -> f64 {
        scheduler::priority(self.schedule(), self.last_review, now)
    }

    /// Interval in days a rating would produce, without touching the card.
    pub fn preview_interval(&self, quality: Quality) -> u32 {
        scheduler::next_state(quality, self.schedule()).interval
    }

    pub fn review(&mut self, quality: Quality, now: DateTime<Utc>) {
        let next = scheduler::next_state(quality, self.schedule());
        let next_review = now
            .checked_add_signed(Duration::days(i64::from(next.interval)))
            .unwrap_or(DateTime::<Utc>::MAX_UTC);

        self.repetitions = next.repetitions;
        self.easiness = next.easiness;
        self.interval = next.interval;
        self.last_review = Some(now);
        self.next_review = next_review;
        self.total_reviews += 1;
        if quality.is_pass() {
            self.correct_reviews += 1;
        }
        self.last_modified = now;
    }

    /// Pulls scheduling fields from outside data back into range.
    pub fn sanitize(&mut self) -> bool {
        let mut fixed = false;
        if self.easiness.is_nan() {
            self.easiness = EASINESS_DEFAULT;
            fixed = true;
        } else if self.easiness < EASINESS_MIN {
            self.easiness = EASINESS_MIN;
            fixed = true;
        }
        if self.interval > MAX_INTERVAL_DAYS {
            self.interval = MAX_INTERVAL_DAYS;
            fixed = true;
        }
        if self.correct_reviews > self.total_reviews {
            self.correct_reviews = self.total_reviews;
            fixed = true;
        }
        fixed
    }

    pub fn reset(&mut self, now: DateTime<Utc>) {
        let fresh = Sm2State::default();
        self.repetitions = fresh.repetitions;
        self.easiness = fresh.easiness;
        self.interval = fresh.interval;
        self.last_review = None;
        self.next_review = now;
        self.total_reviews = 0;
        self.correct_reviews = 0;
        self.last_modified = now;
    }

    pub fn apply_edit(&mut self, edit: CardEdit, now: DateTime<Utc>) {
        if let Some(t) = edit.target_text {
            self.target_text = t;
        }
        if let Some(t) = edit.transcription {
            self.transcription = t;
        }
        if let Some(e) = edit.example {
            self.example = e;
        }
        if let Some(e) = edit.example_translation {
            self.example_translation = e;
        }
        if let Some(l) = edit.lesson_id {
            self.lesson_id = l;
        }
        if let Some(tags) = edit.tags {
            self.tags = tags;
        }
        self.last_modified = now;
    }
}
