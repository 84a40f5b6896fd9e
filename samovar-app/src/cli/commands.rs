use crate::cli::opts::*;

use anyhow::{anyhow, bail, Context, Result};
use samovar_core::{
    filter_due, Card, CardEdit, CoreError, DeckImport, DeckManager, DeckSettings, NewCard, Quality,
    ReviewSession, SessionOptions,
};
use samovar_json::JsonFileStore;
use serde::{Deserialize, Serialize};
use std::io::{stdin, stdout, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

pub fn run_cli(args: Cli) -> Result<()> {
    let mut deck = open_deck(args.data_dir.clone(), &args.learner)?;
    match args.cmd {
        Command::Add(a) => add_cmd(&mut deck, a),
        Command::Import(cmd) => import_cmd(&mut deck, cmd),
        Command::Export(cmd) => export_cmd(&deck, cmd),
        Command::List(cmd) => list_cmd(&deck, cmd),
        Command::Show { card } => {
            let c = resolve_card(&deck, &card)?;
            print_card(&c);
            Ok(())
        }
        Command::Edit(e) => edit_cmd(&mut deck, e),
        Command::Rm { card } => {
            let c = resolve_card(&deck, &card)?;
            deck.delete_card(c.id)?;
            println!("ok");
            Ok(())
        }
        Command::Reset { card } => {
            let c = resolve_card(&deck, &card)?;
            deck.reset_card(c.id)?;
            println!("ok");
            Ok(())
        }
        Command::ResetAll { yes } => {
            if !yes {
                bail!("this forgets all progress for learner '{}'; pass --yes to confirm", deck.key());
            }
            deck.reset_all_progress()?;
            println!("ok");
            Ok(())
        }
        Command::Queue(cmd) => queue_cmd(&deck, cmd),
        Command::Review(cmd) => review_cmd(&mut deck, cmd),
        Command::Stats(cmd) => stats_cmd(&deck, cmd),
        Command::Settings(cmd) => settings_cmd(&mut deck, cmd),
        Command::Tui | Command::Api(_) => unreachable!("routed in main"),
    }
}

pub fn open_store(data_dir: Option<PathBuf>) -> Result<Arc<JsonFileStore>> {
    let store = match data_dir {
        Some(dir) => JsonFileStore::open_in(&dir).with_context(|| format!("opening data dir {}", dir.display()))?,
        None => JsonFileStore::open_default().context("opening default data dir")?,
    };
    Ok(Arc::new(store))
}

pub fn open_deck(data_dir: Option<PathBuf>, learner: &str) -> Result<DeckManager> {
    let store = open_store(data_dir)?;
    let deck = DeckManager::open(store, learner);
    debug!(learner, cards = deck.len(), "deck opened");
    Ok(deck)
}

fn add_cmd(deck: &mut DeckManager, a: CardAdd) -> Result<()> {
    let mut data = NewCard::new(a.source, a.target).with_tags(a.tags);
    data.transcription = a.transcription;
    data.example = a.example;
    data.example_translation = a.example_translation;
    data.lesson_id = a.lesson;
    let c = deck.add_card(data)?;
    println!("{}", c.id);
    Ok(())
}

fn edit_cmd(deck: &mut DeckManager, e: CardEditArgs) -> Result<()> {
    let card = resolve_card(deck, &e.card)?;
    let edit = CardEdit {
        target_text: e.target,
        transcription: clearable(e.transcription, e.clear_transcription),
        example: clearable(e.example, e.clear_example),
        example_translation: clearable(e.example_translation, e.clear_example),
        lesson_id: clearable(e.lesson, e.clear_lesson),
        tags: if e.clear_tags {
            Some(Vec::new())
        } else if e.tags.is_empty() {
            None
        } else {
            Some(e.tags)
        },
    };
    deck.update_card(card.id, edit)?;
    println!("ok");
    Ok(())
}

fn clearable(value: Option<String>, clear: bool) -> Option<Option<String>> {
    if clear {
        Some(None)
    } else {
        value.map(Some)
    }
}

fn list_cmd(deck: &DeckManager, cmd: ListCmd) -> Result<()> {
    let mut cards = match &cmd.query {
        Some(q) => deck.search(q),
        None => deck.cards(),
    };
    if let Some(tag) = &cmd.tag {
        cards.retain(|c| c.tags.iter().any(|t| t == tag));
    }
    if let Some(lesson) = &cmd.lesson {
        cards.retain(|c| c.lesson_id.as_deref() == Some(lesson.as_str()));
    }
    if cmd.due {
        cards = filter_due(&cards, deck.now());
    }
    for c in cards {
        let tags = if c.tags.is_empty() { "-".to_string() } else { c.tags.join(";") };
        println!(
            "{}\t{}\t{}\t{}\tnext={}\ttags={}",
            c.id,
            c.source_text,
            c.target_text,
            c.status(),
            c.next_review.format("%Y-%m-%d %H:%M"),
            tags
        );
    }
    Ok(())
}

fn queue_cmd(deck: &DeckManager, cmd: QueueCmd) -> Result<()> {
    let mut queue = deck.get_review_queue(!cmd.no_new);
    if let Some(m) = cmd.max {
        queue.truncate(m);
    }
    if queue.is_empty() {
        println!("nothing to review");
        return Ok(());
    }
    for (i, c) in queue.iter().enumerate() {
        println!("{:>3}. {}\t{}\t{}", i + 1, c.source_text, c.status(), c.id);
    }
    Ok(())
}

fn review_cmd(deck: &mut DeckManager, cmd: ReviewCmd) -> Result<()> {
    let mut session = ReviewSession::start(deck, SessionOptions { session_size: cmd.size });
    if let Some(r) = session.empty_report() {
        println!("nothing to review right now");
        println!("due: {}  new: {}  reviewing: {}", r.due, r.new, r.reviewing);
        if r.new > 0 && deck.remaining_new_today() == 0 {
            println!("today's new-card limit is used up");
        }
        return Ok(());
    }

    while let Some(card) = session.current().cloned() {
        let (pos, len) = session.progress();
        println!("\n[{pos}/{len}] {}", card.source_text);
        if let Some(t) = &card.transcription {
            println!("    [{t}]");
        }
        if is_quit(&read_line("[enter=show, q=quit] ")?) {
            break;
        }
        session.reveal();
        println!("A: {}", card.target_text);
        if let (Some(ex), tr) = (&card.example, &card.example_translation) {
            println!("e.g. {ex}{}", tr.as_ref().map(|t| format!(" ({t})")).unwrap_or_default());
        }
        println!("{}", rating_legend(&card));

        let quality = loop {
            let line = read_line("rate> ")?;
            if is_quit(&line) {
                break None;
            }
            match line.trim().parse::<u8>().map_err(|_| ()).and_then(|v| Quality::new(v).map_err(|_| ())) {
                Ok(q) => break Some(q),
                Err(()) => println!("enter 0-5, or q"),
            }
        };
        let Some(quality) = quality else { break };

        match session.rate(deck, quality) {
            Ok(out) => println!("→ next review {}", format_interval(out.interval)),
            Err(CoreError::CardNotFound(_)) => println!("card was removed, skipping"),
            Err(e) => return Err(e).context("saving review"),
        }
    }

    let s = session.summary();
    println!(
        "\nreviewed {}  correct {}  hard {}  easy {}  accuracy {}%",
        s.total,
        s.correct,
        s.hard,
        s.easy,
        s.accuracy()
    );
    Ok(())
}

fn stats_cmd(deck: &DeckManager, cmd: StatsCmd) -> Result<()> {
    let stats = deck.stats();
    if cmd.json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
        return Ok(());
    }
    println!("learner    {}", deck.key());
    println!("cards      {} (new {}, learning {}, reviewing {})", stats.total, stats.new, stats.learning, stats.reviewing);
    println!("due        {}", stats.due);
    println!("reviews    {} ({}% correct)", stats.total_reviews, stats.overall_accuracy);
    println!("easiness   {:.2}", stats.avg_easiness);
    println!("retention  {}% over {} day(s)", deck.retention_rate(cmd.days), cmd.days);
    let d = &stats.daily_stats;
    println!(
        "today      {} new of {}, {} reviews ({} correct)",
        d.new_cards, stats.settings.new_cards_per_day, d.reviews, d.correct_reviews
    );
    Ok(())
}

fn settings_cmd(deck: &mut DeckManager, cmd: SettingsCmd) -> Result<()> {
    let current = deck.settings();
    let wanted = DeckSettings {
        new_cards_per_day: cmd.new_per_day.unwrap_or(current.new_cards_per_day),
        reviews_per_day: cmd.reviews_per_day.unwrap_or(current.reviews_per_day),
        review_ratio: cmd.review_ratio.unwrap_or(current.review_ratio),
    };
    if wanted != current {
        deck.update_settings(wanted)?;
    }
    let s = deck.settings();
    println!("new-per-day      {}", s.new_cards_per_day);
    println!("reviews-per-day  {}", s.reviews_per_day);
    println!("review-ratio     {}", s.review_ratio);
    Ok(())
}

fn export_cmd(deck: &DeckManager, cmd: ExportCmd) -> Result<()> {
    match cmd {
        ExportCmd::Json { path } => {
            let s = serde_json::to_string_pretty(&deck.export_data())?;
            std::fs::write(&path, s).with_context(|| format!("writing {}", path.display()))?;
            println!("wrote {}", path.display());
        }
        ExportCmd::Csv { path, lesson } => {
            let cards = match &lesson {
                Some(l) => deck.cards_by_lesson(l),
                None => deck.cards(),
            };
            write_csv(&path, &cards)?;
            println!("wrote {} cards to {}", cards.len(), path.display());
        }
    }
    Ok(())
}

fn import_cmd(deck: &mut DeckManager, cmd: ImportCmd) -> Result<()> {
    match cmd {
        ImportCmd::Json { path } => {
            let data = std::fs::read_to_string(&path).with_context(|| format!("reading {}", path.display()))?;
            match parse_import(&data)? {
                ImportPayload::Words(words) => {
                    let added = deck.add_cards(words)?;
                    println!("imported {} words", added.len());
                }
                ImportPayload::Deck(img) => {
                    let n = deck.import_data(img)?;
                    println!("imported {n} cards");
                }
            }
        }
        ImportCmd::Csv { path, lesson } => {
            let words = read_csv(&path)?;
            let added = match lesson {
                Some(l) => deck.import_from_lesson(&l, words)?,
                None => deck.add_cards(words)?,
            };
            println!("imported {} words", added.len());
        }
    }
    Ok(())
}

// ===== Helpers =====

/// Accepts a card id or the card's exact source text.
pub fn resolve_card(deck: &DeckManager, sel: &str) -> Result<Card> {
    if let Ok(id) = Uuid::parse_str(sel) {
        return deck.get_card(id).ok_or_else(|| anyhow!("card not found: {sel}"));
    }
    deck.find_by_source_text(sel).ok_or_else(|| anyhow!("card not found: {sel}"))
}

fn print_card(c: &Card) {
    println!("id           {}", c.id);
    println!("source       {}", c.source_text);
    println!("target       {}", c.target_text);
    if let Some(t) = &c.transcription {
        println!("transcr.     {t}");
    }
    if let Some(e) = &c.example {
        println!("example      {e}");
    }
    if let Some(e) = &c.example_translation {
        println!("             {e}");
    }
    if let Some(l) = &c.lesson_id {
        println!("lesson       {l}");
    }
    if !c.tags.is_empty() {
        println!("tags         {}", c.tags.join(", "));
    }
    println!("status       {}", c.status());
    println!("repetitions  {}", c.repetitions);
    println!("easiness     {:.2}", c.easiness);
    println!("interval     {} day(s)", c.interval);
    println!("next review  {}", c.next_review.format("%Y-%m-%d %H:%M UTC"));
    match c.last_review {
        Some(t) => println!("last review  {}", t.format("%Y-%m-%d %H:%M UTC")),
        None => println!("last review  never"),
    }
    println!("accuracy     {}% of {}", c.accuracy(), c.total_reviews);
}

/// Rating keys with the interval each would give.
pub fn rating_legend(card: &Card) -> String {
    (0..=Quality::MAX)
        .filter_map(|v| Quality::new(v).ok())
        .map(|q| format!("{}={}", q, format_interval(card.preview_interval(q))))
        .collect::<Vec<_>>()
        .join("  ")
}

pub fn format_interval(days: u32) -> String {
    match days {
        0 => "now".to_string(),
        1 => "in 1 day".to_string(),
        2..=30 => format!("in {days} days"),
        31..=364 => format!("in ~{} mo", (days as f64 / 30.0).round() as u32),
        _ => format!("in ~{:.1} y", days as f64 / 365.0),
    }
}

fn is_quit(line: &str) -> bool {
    matches!(line.trim().to_lowercase().as_str(), "q" | "quit")
}

fn read_line(prompt: &str) -> Result<String> {
    print!("{prompt}");
    stdout().flush().ok();
    let mut s = String::new();
    if stdin().read_line(&mut s)? == 0 {
        return Ok("q".to_string());
    }
    Ok(s)
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ImportPayload {
    Words(Vec<NewCard>),
    Deck(DeckImport),
}

fn parse_import(data: &str) -> Result<ImportPayload> {
    serde_json::from_str(data).context("expected a word list or a deck export")
}

#[derive(Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
struct CsvRow {
    source: String,
    target: String,
    transcription: Option<String>,
    example: Option<String>,
    example_translation: Option<String>,
    lesson: Option<String>,
    tags: String,
}

impl CsvRow {
    fn from_card(c: &Card) -> Self {
        Self {
            source: c.source_text.clone(),
            target: c.target_text.clone(),
            transcription: c.transcription.clone(),
            example: c.example.clone(),
            example_translation: c.example_translation.clone(),
            lesson: c.lesson_id.clone(),
            tags: c.tags.join(";"),
        }
    }

    fn into_new_card(self) -> Option<NewCard> {
        let source = self.source.trim();
        let target = self.target.trim();
        if source.is_empty() || target.is_empty() {
            return None;
        }
        let mut data = NewCard::new(source, target).with_tags(
            self.tags
                .split(';')
                .map(str::trim)
                .filter(|s| !s.is_empty()),
        );
        data.transcription = self.transcription.filter(|s| !s.is_empty());
        data.example = self.example.filter(|s| !s.is_empty());
        data.example_translation = self.example_translation.filter(|s| !s.is_empty());
        data.lesson_id = self.lesson.filter(|s| !s.is_empty());
        Some(data)
    }
}

fn write_csv(path: &Path, cards: &[Card]) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path).with_context(|| format!("creating {}", path.display()))?;
    for c in cards {
        wtr.serialize(CsvRow::from_card(c))?;
    }
    wtr.flush()?;
    Ok(())
}

fn read_csv(path: &Path) -> Result<Vec<NewCard>> {
    let rdr = csv::Reader::from_path(path).with_context(|| format!("opening {}", path.display()))?;
    parse_csv(rdr)
}

fn parse_csv<R: std::io::Read>(mut rdr: csv::Reader<R>) -> Result<Vec<NewCard>> {
    let mut words = Vec::new();
    for (line, rec) in rdr.deserialize::<CsvRow>().enumerate() {
        let row = rec.with_context(|| format!("csv row {}", line + 2))?;
        match row.into_new_card() {
            Some(w) => words.push(w),
            None => tracing::warn!(row = line + 2, "skipping csv row without source or target"),
        }
    }
    Ok(words)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn intervals_read_naturally() {
        assert_eq!(format_interval(0), "now");
        assert_eq!(format_interval(1), "in 1 day");
        assert_eq!(format_interval(6), "in 6 days");
        assert_eq!(format_interval(90), "in ~3 mo");
        assert_eq!(format_interval(730), "in ~2.0 y");
    }

    #[test]
    fn legend_previews_every_rating() {
        let now = Utc.with_ymd_and_hms(2024, 9, 2, 8, 0, 0).unwrap();
        let card = Card::new(NewCard::new("кот", "cat"), now);
        assert_eq!(
            rating_legend(&card),
            "0=in 1 day  1=in 1 day  2=in 1 day  3=in 1 day  4=in 1 day  5=in 1 day"
        );
    }

    #[test]
    fn csv_rows_become_words() {
        let data = "source,target,transcription,example,example_translation,lesson,tags\n\
                    кот,cat,kot,,,l1,animals; pets\n\
                    ,empty,,,,,\n\
                    собака,dog,,,,,\n";
        let words = parse_csv(csv::Reader::from_reader(data.as_bytes())).unwrap();
        assert_eq!(words.len(), 2);
        assert_eq!(words[0].transcription.as_deref(), Some("kot"));
        assert_eq!(words[0].example, None);
        assert_eq!(words[0].lesson_id.as_deref(), Some("l1"));
        assert_eq!(words[0].tags, vec!["animals", "pets"]);
        assert!(words[1].tags.is_empty());
    }

    #[test]
    fn csv_without_optional_columns() {
        let data = "source,target\nчай,tea\n";
        let words = parse_csv(csv::Reader::from_reader(data.as_bytes())).unwrap();
        assert_eq!(words, vec![NewCard::new("чай", "tea")]);
    }

    #[test]
    fn json_import_accepts_both_shapes() {
        let words = r#"[{"sourceText":"да","targetText":"yes"}]"#;
        assert!(matches!(parse_import(words).unwrap(), ImportPayload::Words(w) if w.len() == 1));

        let deck = r#"{"cards":[],"settings":{"newCardsPerDay":5},"exportedAt":0}"#;
        match parse_import(deck).unwrap() {
            ImportPayload::Deck(d) => assert_eq!(d.settings.unwrap().new_cards_per_day, 5),
            ImportPayload::Words(_) => panic!("parsed as word list"),
        }
    }
}
