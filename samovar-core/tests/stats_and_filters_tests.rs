use chrono::{Duration, TimeZone, Utc};
use samovar_core::{
    filter_by_lesson, filter_by_status, filter_by_tag, filter_by_text, filter_due, summarize, Card,
    CardStatus, NewCard, Quality,
};

#[test]
fn filters_text_tag_and_lesson() {
    let now = Utc.with_ymd_and_hms(2024, 1, 10, 12, 0, 0).unwrap();
    let c1 = Card::new(
        NewCard::new("Привет", "Hej")
            .with_transcription("privʲet")
            .with_lesson("01-intro")
            .with_tags(["greeting"]),
        now,
    );
    let c2 = Card::new(NewCard::new("Пока", "Farvel").with_lesson("02-goodbye"), now);
    let v = vec![c1, c2];

    let by_text = filter_by_text(&v, "PRIV");
    assert_eq!(by_text.len(), 1);
    assert_eq!(by_text[0].source_text, "Привет");

    assert_eq!(filter_by_text(&v, "farv").len(), 1);
    assert_eq!(filter_by_text(&v, "  ").len(), 2);

    let by_tag = filter_by_tag(&v, "greeting");
    assert_eq!(by_tag.len(), 1);
    assert!(filter_by_tag(&v, "greet").is_empty());

    let by_lesson = filter_by_lesson(&v, "02-goodbye");
    assert_eq!(by_lesson.len(), 1);
    assert_eq!(by_lesson[0].target_text, "Farvel");
}

#[test]
fn filters_status_and_due() {
    let now = Utc.with_ymd_and_hms(2024, 1, 10, 12, 0, 0).unwrap();
    let fresh = Card::new(NewCard::new("один", "en"), now);
    let mut failing = Card::new(NewCard::new("два", "to"), now);
    failing.review(Quality::AGAIN, now - Duration::days(2));
    let mut future = Card::new(NewCard::new("три", "tre"), now);
    future.review(Quality::GOOD, now);

    let v = vec![fresh, failing, future];

    assert_eq!(filter_by_status(&v, CardStatus::New).len(), 1);
    assert_eq!(filter_by_status(&v, CardStatus::Learning).len(), 1);
    assert_eq!(filter_by_status(&v, CardStatus::Reviewing).len(), 1);

    let due = filter_due(&v, now);
    assert_eq!(due.len(), 2);
    assert!(due.iter().all(|c| c.source_text != "три"));
}

#[test]
fn totals_accuracy() {
    let now = Utc.with_ymd_and_hms(2024, 1, 10, 12, 0, 0).unwrap();
    let mut card = Card::new(NewCard::new("хорошо", "godt"), now);
    card.review(Quality::EASY, now);
    card.review(Quality::new(2).unwrap(), now);
    card.review(Quality::HARD, now);

    let t = summarize([&card], now);
    assert_eq!(t.total_reviews, 3);
    assert_eq!(t.correct_reviews, 2);
    assert_eq!(t.accuracy(), 67);
    assert_eq!(card.accuracy(), 67);
}
