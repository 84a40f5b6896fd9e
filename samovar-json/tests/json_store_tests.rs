use samovar_core::{DeckManager, DeckStore, NewCard, Quality};
use samovar_json::{file_stem, JsonFileStore};
use std::fs;
use std::sync::Arc;

#[test]
fn missing_file_loads_as_none() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonFileStore::open_in(dir.path()).unwrap();
    assert_eq!(store.load("anna").unwrap(), None);
    assert!(store.keys().unwrap().is_empty());
}

#[test]
fn deck_survives_reopen_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(JsonFileStore::open_in(dir.path()).unwrap());

    let mut deck = DeckManager::open(store.clone(), "anna");
    let cards = deck
        .add_cards(vec![
            NewCard::new("Привет", "Hej").with_transcription("privʲet"),
            NewCard::new("Спасибо", "Tak").with_tags(["polite"]),
        ])
        .unwrap();
    deck.review_card(cards[0].id, Quality::GOOD).unwrap();
    deck.review_card(cards[1].id, Quality::new(2).unwrap()).unwrap();

    let reopened = DeckManager::open(Arc::new(JsonFileStore::open_in(dir.path()).unwrap()), "anna");
    assert_eq!(reopened.cards(), deck.cards());
    assert_eq!(reopened.daily_stats(), deck.daily_stats());
    assert_eq!(store.keys().unwrap(), vec!["anna".to_string()]);

    let raw = fs::read_to_string(store.path_for("anna")).unwrap();
    let v: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(v["cards"][0]["sourceText"], "Привет");
}

#[test]
fn corrupt_file_falls_back_to_empty_deck() {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(JsonFileStore::open_in(dir.path()).unwrap());
    fs::write(store.path_for("anna"), b"\x00\x01 not json").unwrap();

    let mut deck = DeckManager::open(store.clone(), "anna");
    assert!(deck.is_empty());

    deck.add_card(NewCard::new("да", "ja")).unwrap();
    assert_eq!(DeckManager::open(store, "anna").len(), 1);
}

#[test]
fn backups_rotate() {
    let dir = tempfile::tempdir().unwrap();
    let (decks, backups) = (dir.path().join("decks"), dir.path().join("backups"));
    let store = JsonFileStore::open_with(decks, backups, 3).unwrap();

    for i in 0..8 {
        store.save("anna", &format!("{{\"cards\":[],\"n\":{i}}}")).unwrap();
        std::thread::sleep(std::time::Duration::from_millis(2));
    }

    let kept = fs::read_dir(store.backups_for("anna")).unwrap().count();
    assert!(kept <= 3);
    assert!(kept >= 1);
    assert_eq!(store.load("anna").unwrap().as_deref(), Some("{\"cards\":[],\"n\":7}"));
}

#[test]
fn learner_keys_map_to_separate_files() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonFileStore::open_in(dir.path()).unwrap();
    store.save("anna", "{}").unwrap();
    store.save("boris/../x", "[]").unwrap();

    assert_eq!(store.load("anna").unwrap().as_deref(), Some("{}"));
    assert_eq!(store.load("boris/../x").unwrap().as_deref(), Some("[]"));
    assert!(store.path_for("boris/../x").starts_with(dir.path()));
    assert_eq!(file_stem("boris/../x"), "boris____x");
}
