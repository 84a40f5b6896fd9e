//! A single bounded study session over a snapshot of the review queue.
//!
//! The snapshot is taken once at start; cards added to the deck afterwards
//! wait for the next session. Each card is shown once: present it, reveal the
//! answer, rate it, move on. The session ends when the snapshot runs out and
//! can be dropped at any card boundary.

use crate::stats::percent;
use crate::{Card, CoreError, DeckManager, Quality, ReviewOutcome};
use serde::{Deserialize, Serialize};
use tracing::debug;

pub const DEFAULT_SESSION_SIZE: usize = 20;

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct SessionOptions {
    pub session_size: usize,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            session_size: DEFAULT_SESSION_SIZE,
        }
    }
}

/// Deck-wide counts shown when there is nothing to study.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct EmptyReport {
    pub due: usize,
    pub new: usize,
    pub reviewing: usize,
}

#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SessionSummary {
    pub total: usize,
    /// Rated 3 or higher.
    pub correct: usize,
    /// Rated exactly 3.
    pub hard: usize,
    /// Rated 4 or 5.
    pub easy: usize,
}

impl SessionSummary {
    fn record(&mut self, quality: Quality) {
        self.total += 1;
        if quality.is_pass() {
            self.correct += 1;
        }
        match quality.value() {
            3 => self.hard += 1,
            4..=5 => self.easy += 1,
            _ => {}
        }
    }

    pub fn accuracy(&self) -> u32 {
        percent(self.correct as u64, self.total as u64)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionState {
    Empty(EmptyReport),
    Presenting { index: usize, revealed: bool },
    Finished,
}

#[derive(Clone, Debug)]
pub struct ReviewSession {
    queue: Vec<Card>,
    state: SessionState,
    summary: SessionSummary,
}

impl ReviewSession {
    pub fn start(deck: &DeckManager, options: SessionOptions) -> Self {
        let mut queue = deck.get_review_queue(true);
        queue.truncate(options.session_size);

        let state = if queue.is_empty() {
            let stats = deck.stats();
            SessionState::Empty(EmptyReport {
                due: stats.due,
                new: stats.new,
                reviewing: stats.reviewing,
            })
        } else {
            SessionState::Presenting {
                index: 0,
                revealed: false,
            }
        };
        debug!(key = deck.key(), cards = queue.len(), "review session started");

        Self {
            queue,
            state,
            summary: SessionSummary::default(),
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn is_finished(&self) -> bool {
        matches!(self.state, SessionState::Finished)
    }

    pub fn empty_report(&self) -> Option<EmptyReport> {
        match self.state {
            SessionState::Empty(report) => Some(report),
            _ => None,
        }
    }

    /// The card being prompted, as it looked when the session started.
    pub fn current(&self) -> Option<&Card> {
        match self.state {
            SessionState::Presenting { index, .. } => self.queue.get(index),
            _ => None,
        }
    }

    pub fn is_revealed(&self) -> bool {
        matches!(self.state, SessionState::Presenting { revealed: true, .. })
    }

    pub fn reveal(&mut self) -> Option<&Card> {
        if let SessionState::Presenting { revealed, .. } = &mut self.state {
            *revealed = true;
        }
        self.current()
    }

    /// 1-based position of the current card and the snapshot length.
    pub fn progress(&self) -> (usize, usize) {
        let position = match self.state {
            SessionState::Presenting { index, .. } => index + 1,
            SessionState::Finished => self.queue.len(),
            SessionState::Empty(_) => 0,
        };
        (position, self.queue.len())
    }

    pub fn summary(&self) -> SessionSummary {
        self.summary
    }

    /// Rates the current card and advances. A card deleted from the deck
    /// since the snapshot is stepped over and reported as `CardNotFound`.
    /// A failed write still advances: the review is already applied in memory.
    pub fn rate(&mut self, deck: &mut DeckManager, quality: Quality) -> Result<ReviewOutcome, CoreError> {
        let index = match self.state {
            SessionState::Presenting { revealed: false, .. } => return Err(CoreError::AnswerNotRevealed),
            SessionState::Presenting { index, .. } => index,
            SessionState::Empty(_) | SessionState::Finished => return Err(CoreError::SessionFinished),
        };
        let id = self.queue[index].id;

        let result = deck.review_card(id, quality);
        if !matches!(result, Err(CoreError::CardNotFound(_))) {
            self.summary.record(quality);
        }
        self.advance(index);
        result
    }

    fn advance(&mut self, index: usize) {
        let next = index + 1;
        self.state = if next < self.queue.len() {
            SessionState::Presenting {
                index: next,
                revealed: false,
            }
        } else {
            debug!(
                total = self.summary.total,
                correct = self.summary.correct,
                "review session finished"
            );
            SessionState::Finished
        };
    }
}
