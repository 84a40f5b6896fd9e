use crate::tui::theme::*;
use samovar_core::{Card, DeckStats, EmptyReport, SessionSummary};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

pub enum RightPane<'a> {
    Idle,
    Empty(EmptyReport),
    Card {
        card: &'a Card,
        reveal: bool,
        progress: (usize, usize),
        legend: String,
    },
    Finished(SessionSummary),
}

pub fn draw_ui(f: &mut Frame, area: Rect, learner: &str, stats: &DeckStats, status: Option<&str>, right: RightPane) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(1)])
        .split(area);
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(35), Constraint::Percentage(65)])
        .split(rows[0]);
    draw_stats(f, chunks[0], learner, stats);
    draw_right(f, chunks[1], status, right);

    let foot = Paragraph::new(Line::from(vec![
        Span::raw(" Enter start  "),
        Span::raw(" space reveal  "),
        Span::raw(" 0-5 rate  "),
        Span::raw(" q quit "),
    ]))
    .style(footer_style());
    f.render_widget(foot, rows[1]);
}

fn draw_stats(f: &mut Frame, area: Rect, learner: &str, s: &DeckStats) {
    let line = |label: &'static str, value: String| {
        Line::from(vec![Span::raw(format!("{label:<11}")).style(hint_style()), Span::raw(value)])
    };
    let d = &s.daily_stats;
    let text = vec![
        line("cards", s.total.to_string()),
        line("new", s.new.to_string()),
        line("learning", s.learning.to_string()),
        line("reviewing", s.reviewing.to_string()),
        line("due", s.due.to_string()),
        Line::from(""),
        line("reviews", s.total_reviews.to_string()),
        line("accuracy", format!("{}%", s.overall_accuracy)),
        line("easiness", format!("{:.2}", s.avg_easiness)),
        Line::from(""),
        line("today new", format!("{}/{}", d.new_cards, s.settings.new_cards_per_day)),
        line("today revs", format!("{} ({} ok)", d.reviews, d.correct_reviews)),
    ];
    let p = Paragraph::new(text).block(
        Block::default()
            .title(Span::raw(format!(" {learner} ")).style(title_style()))
            .borders(Borders::ALL),
    );
    f.render_widget(p, area);
}

fn draw_right(f: &mut Frame, area: Rect, status: Option<&str>, pane: RightPane) {
    let block = Block::default().title("Review").borders(Borders::ALL);
    let mut text: Vec<Line> = match pane {
        RightPane::Idle => vec![Line::from("Press Enter to start a session.")],
        RightPane::Empty(r) => vec![
            Line::from("Nothing to review right now."),
            Line::from(""),
            Line::from(format!("due {}  new {}  reviewing {}", r.due, r.new, r.reviewing)).style(hint_style()),
        ],
        RightPane::Finished(s) => vec![
            Line::from("Session complete.").style(good_style()),
            Line::from(""),
            Line::from(format!("reviewed {}  correct {}  accuracy {}%", s.total, s.correct, s.accuracy())),
            Line::from(format!("hard {}  easy {}", s.hard, s.easy)).style(hint_style()),
            Line::from(""),
            Line::from("Enter for another session."),
        ],
        RightPane::Card {
            card,
            reveal,
            progress,
            legend,
        } => {
            let mut t = vec![
                Line::from(format!("{}/{}", progress.0, progress.1)).style(hint_style()),
                Line::from(""),
                Line::from(vec![Span::raw("Q: ").style(title_style()), Span::raw(card.source_text.as_str())]),
            ];
            if let Some(tr) = &card.transcription {
                t.push(Line::from(format!("   [{tr}]")).style(hint_style()));
            }
            if reveal {
                t.push(Line::from(""));
                t.push(Line::from(vec![
                    Span::raw("A: ").style(title_style()),
                    Span::raw(card.target_text.as_str()).style(answer_style()),
                ]));
                if let Some(ex) = &card.example {
                    t.push(Line::from(format!("   {ex}")));
                }
                if let Some(ex) = &card.example_translation {
                    t.push(Line::from(format!("   {ex}")).style(hint_style()));
                }
                t.push(Line::from(""));
                t.push(Line::from(legend).style(hint_style()));
            } else {
                t.push(Line::from(""));
                t.push(Line::from("space to reveal").style(hint_style()));
            }
            t
        }
    };
    if let Some(msg) = status {
        text.push(Line::from(""));
        text.push(Line::from(msg.to_string()).style(good_style()));
    }
    let p = Paragraph::new(text).wrap(Wrap { trim: true }).block(block);
    f.render_widget(p, area);
}
