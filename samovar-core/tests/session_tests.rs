use chrono::{Duration, TimeZone, Utc};
use samovar_core::{
    CoreError, DeckManager, DeckSettings, FixedClock, MemoryStore, NewCard, Quality, ReviewSession,
    SessionOptions, SessionState,
};
use std::sync::Arc;

fn q(v: u8) -> Quality {
    Quality::new(v).unwrap()
}

fn deck_with(words: &[&str]) -> (DeckManager, Arc<FixedClock>) {
    let clock = Arc::new(FixedClock::new(Utc.with_ymd_and_hms(2024, 11, 4, 7, 0, 0).unwrap()));
    let mut deck = DeckManager::open_with_clock(Arc::new(MemoryStore::new()), "anna", clock.clone());
    for w in words {
        deck.add_card(NewCard::new(*w, format!("{w}-da"))).unwrap();
        clock.advance(Duration::seconds(1));
    }
    (deck, clock)
}

#[test]
fn empty_deck_short_circuits() {
    let (deck, _) = deck_with(&[]);
    let mut session = ReviewSession::start(&deck, SessionOptions::default());

    assert!(session.is_empty());
    assert!(session.current().is_none());
    assert!(session.reveal().is_none());
    let report = session.empty_report().unwrap();
    assert_eq!((report.due, report.new, report.reviewing), (0, 0, 0));
}

#[test]
fn exhausted_budget_reports_why() {
    let (mut deck, _) = deck_with(&["а", "б"]);
    deck.update_settings(DeckSettings {
        new_cards_per_day: 0,
        ..DeckSettings::default()
    })
    .unwrap();

    let mut session = ReviewSession::start(&deck, SessionOptions::default());
    let report = session.empty_report().unwrap();
    assert_eq!(report.new, 2);
    assert_eq!(report.due, 2);
    assert!(matches!(session.rate(&mut deck, q(4)), Err(CoreError::SessionFinished)));
}

#[test]
fn walks_snapshot_and_summarizes() {
    let (mut deck, _) = deck_with(&["а", "б", "в", "г"]);
    let mut session = ReviewSession::start(&deck, SessionOptions::default());
    assert_eq!(session.len(), 4);

    let mut seen = Vec::new();
    for rating in [5u8, 3, 2, 4] {
        let card = session.current().unwrap().clone();
        assert!(!session.is_revealed());
        assert!(matches!(session.rate(&mut deck, q(rating)), Err(CoreError::AnswerNotRevealed)));

        assert_eq!(session.reveal().unwrap().id, card.id);
        let out = session.rate(&mut deck, q(rating)).unwrap();
        assert_eq!(out.card.id, card.id);
        assert!(out.was_new);
        seen.push(card.id);
    }

    assert!(session.is_finished());
    assert_eq!(session.progress(), (4, 4));
    seen.dedup();
    assert_eq!(seen.len(), 4);

    let summary = session.summary();
    assert_eq!(summary.total, 4);
    assert_eq!(summary.correct, 3);
    assert_eq!(summary.hard, 1);
    assert_eq!(summary.easy, 2);
    assert_eq!(summary.accuracy(), 75);
    assert!(matches!(session.rate(&mut deck, q(4)), Err(CoreError::SessionFinished)));

    assert_eq!(deck.daily_stats().reviews, 4);
}

#[test]
fn size_limits_snapshot_and_later_adds_wait() {
    let (mut deck, _) = deck_with(&["а", "б", "в"]);
    let mut session = ReviewSession::start(&deck, SessionOptions { session_size: 2 });
    assert_eq!(session.len(), 2);
    assert_eq!(session.progress(), (1, 2));

    deck.add_card(NewCard::new("поздно", "sent")).unwrap();

    session.reveal();
    session.rate(&mut deck, q(4)).unwrap();
    assert_eq!(session.progress(), (2, 2));
    session.reveal();
    session.rate(&mut deck, q(4)).unwrap();

    assert!(session.is_finished());
    assert_eq!(session.summary().total, 2);
}

#[test]
fn deleted_card_is_stepped_over() {
    let (mut deck, _) = deck_with(&["а", "б"]);
    let mut session = ReviewSession::start(&deck, SessionOptions::default());
    let first = session.current().unwrap().id;
    deck.delete_card(first).unwrap();

    session.reveal();
    assert!(matches!(session.rate(&mut deck, q(4)), Err(CoreError::CardNotFound(id)) if id == first));
    assert_eq!(session.state(), SessionState::Presenting { index: 1, revealed: false });

    session.reveal();
    session.rate(&mut deck, q(4)).unwrap();
    assert!(session.is_finished());
    assert_eq!(session.summary().total, 1);
}

#[test]
fn next_session_only_brings_due_cards_back() {
    let (mut deck, clock) = deck_with(&["а", "б"]);
    let mut session = ReviewSession::start(&deck, SessionOptions::default());
    while session.current().is_some() {
        session.reveal();
        session.rate(&mut deck, q(4)).unwrap();
    }

    assert!(ReviewSession::start(&deck, SessionOptions::default()).is_empty());

    clock.advance(Duration::days(1));
    let again = ReviewSession::start(&deck, SessionOptions::default());
    assert_eq!(again.len(), 2);
}
