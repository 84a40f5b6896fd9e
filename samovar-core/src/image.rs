use crate::{Card, CoreError, DailyStats, DeckSettings, DeckStats};
use chrono::serde::{ts_milliseconds, ts_milliseconds_option};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const IMAGE_VERSION: u32 = 1;

/// Persisted form of one learner's deck.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DeckImage {
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default)]
    pub cards: Vec<Card>,
    #[serde(default)]
    pub settings: DeckSettings,
    #[serde(default)]
    pub daily_stats: Option<DailyStats>,
    #[serde(default, with = "ts_milliseconds_option")]
    pub last_saved: Option<DateTime<Utc>>,
}

fn default_version() -> u32 {
    IMAGE_VERSION
}

impl DeckImage {
    pub fn to_json(&self) -> Result<String, CoreError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(s: &str) -> Result<Self, CoreError> {
        Ok(serde_json::from_str(s)?)
    }
}

/// Portable dump of a deck, stats included for whoever reads it.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeckExport {
    pub cards: Vec<Card>,
    pub settings: DeckSettings,
    pub stats: DeckStats,
    #[serde(with = "ts_milliseconds")]
    pub exported_at: DateTime<Utc>,
}

/// What `DeckManager::import_data` accepts. A `DeckExport` document parses
/// into this; its `stats` and `exportedAt` fields are ignored.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeckImport {
    pub cards: Vec<Card>,
    #[serde(default)]
    pub settings: Option<DeckSettings>,
}

impl From<DeckExport> for DeckImport {
    fn from(e: DeckExport) -> Self {
        Self {
            cards: e.cards,
            settings: Some(e.settings),
        }
    }
}
