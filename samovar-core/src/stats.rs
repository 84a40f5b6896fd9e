use crate::{Card, CardStatus, DailyStats, DeckSettings, EASINESS_DEFAULT};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// `part / whole` as a rounded percentage, 0 when `whole` is 0.
pub fn percent(part: u64, whole: u64) -> u32 {
    if whole == 0 {
        0
    } else {
        (part as f64 / whole as f64 * 100.0).round() as u32
    }
}

#[derive(Clone, Debug, Default)]
pub struct Totals {
    pub total: usize,
    pub new: usize,
    pub learning: usize,
    pub reviewing: usize,
    pub due: usize,
    pub total_reviews: u64,
    pub correct_reviews: u64,
    pub easiness_sum: f64,
}

impl Totals {
    pub fn record(&mut self, c: &Card, now: DateTime<Utc>) {
        self.total += 1;
        match c.status() {
            CardStatus::New => self.new += 1,
            CardStatus::Learning => self.learning += 1,
            CardStatus::Reviewing => self.reviewing += 1,
        }
        if c.is_due(now) {
            self.due += 1;
        }
        self.total_reviews += u64::from(c.total_reviews);
        self.correct_reviews += u64::from(c.correct_reviews);
        self.easiness_sum += c.easiness;
    }

    pub fn accuracy(&self) -> u32 {
        percent(self.correct_reviews, self.total_reviews)
    }

    pub fn avg_easiness(&self) -> f64 {
        if self.total == 0 {
            EASINESS_DEFAULT
        } else {
            self.easiness_sum / self.total as f64
        }
    }
}

pub fn summarize<'a>(cards: impl IntoIterator<Item = &'a Card>, now: DateTime<Utc>) -> Totals {
    let mut totals = Totals::default();
    for c in cards {
        totals.record(c, now);
    }
    totals
}

/// Accuracy over cards last reviewed within the trailing `days`.
pub fn retention_rate<'a>(cards: impl IntoIterator<Item = &'a Card>, now: DateTime<Utc>, days: u32) -> u32 {
    // A window reaching past the earliest representable time has no cutoff.
    let cutoff = now.checked_sub_signed(Duration::days(i64::from(days)));
    let recent = cards
        .into_iter()
        .filter(|c| match (c.last_review, cutoff) {
            (Some(t), Some(cutoff)) => t >= cutoff,
            (Some(_), None) => true,
            (None, _) => false,
        });
    summarize(recent, now).accuracy()
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DeckStats {
    pub total: usize,
    pub new: usize,
    pub learning: usize,
    pub reviewing: usize,
    pub due: usize,
    pub total_reviews: u64,
    pub overall_accuracy: u32,
    pub avg_easiness: f64,
    pub daily_stats: DailyStats,
    pub settings: DeckSettings,
}

impl DeckStats {
    pub fn new(totals: &Totals, daily_stats: DailyStats, settings: DeckSettings) -> Self {
        Self {
            total: totals.total,
            new: totals.new,
            learning: totals.learning,
            reviewing: totals.reviewing,
            due: totals.due,
            total_reviews: totals.total_reviews,
            overall_accuracy: totals.accuracy(),
            avg_easiness: totals.avg_easiness(),
            daily_stats,
            settings,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{NewCard, Quality};
    use chrono::TimeZone;

    #[test]
    fn percent_rounds() {
        assert_eq!(percent(0, 0), 0);
        assert_eq!(percent(2, 3), 67);
        assert_eq!(percent(1, 8), 13);
        assert_eq!(percent(5, 5), 100);
    }

    #[test]
    fn totals_split_by_status() {
        let now = Utc.with_ymd_and_hms(2024, 2, 1, 8, 0, 0).unwrap();
        let fresh = Card::new(NewCard::new("a", "a"), now);
        let mut failing = Card::new(NewCard::new("b", "b"), now);
        failing.review(Quality::AGAIN, now);
        let mut passing = Card::new(NewCard::new("c", "c"), now);
        passing.review(Quality::EASY, now);

        let t = summarize([&fresh, &failing, &passing], now);
        assert_eq!((t.total, t.new, t.learning, t.reviewing), (3, 1, 1, 1));
        assert_eq!(t.due, 1);
        assert_eq!(t.total_reviews, 2);
        assert_eq!(t.accuracy(), 50);
        assert!((t.avg_easiness() - (2.5 + 1.7 + 2.6) / 3.0).abs() < 1e-9);
    }

    #[test]
    fn empty_deck_defaults() {
        let now = Utc.with_ymd_and_hms(2024, 2, 1, 8, 0, 0).unwrap();
        let t = summarize(std::iter::empty(), now);
        assert_eq!(t.accuracy(), 0);
        assert_eq!(t.avg_easiness(), EASINESS_DEFAULT);
    }

    #[test]
    fn retention_ignores_stale_cards() {
        let now = Utc.with_ymd_and_hms(2024, 2, 20, 8, 0, 0).unwrap();
        let mut old = Card::new(NewCard::new("old", "gammel"), now - Duration::days(30));
        old.review(Quality::AGAIN, now - Duration::days(20));
        let mut recent = Card::new(NewCard::new("new", "ny"), now - Duration::days(3));
        recent.review(Quality::GOOD, now - Duration::days(2));

        assert_eq!(retention_rate([&old, &recent], now, 7), 100);
        assert_eq!(retention_rate([&old, &recent], now, 30), 50);
        assert_eq!(retention_rate([&old], now, 7), 0);
    }
}
