use crate::cli::commands::{format_interval, rating_legend};
use crate::tui::{inputs::{map_event, Action}, views::{self, RightPane}};
use crossterm::{
    event,
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use samovar_core::{CoreError, DeckManager, Quality, ReviewSession, SessionOptions, SessionState};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{stdout, Stdout};

pub struct TuiApp {
    deck: DeckManager,
    session: Option<ReviewSession>,
    status: Option<String>,
}

impl TuiApp {
    pub fn new(deck: DeckManager) -> Self {
        Self { deck, session: None, status: None }
    }

    pub fn run(&mut self) -> anyhow::Result<()> {
        enable_raw_mode()?;
        let mut stdout = stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let res = self.mainloop(&mut terminal);

        disable_raw_mode().ok();
        let mut out: Stdout = std::io::stdout();
        execute!(out, LeaveAlternateScreen).ok();
        terminal.show_cursor().ok();

        res
    }

    fn mainloop(&mut self, terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> anyhow::Result<()> {
        loop {
            let stats = self.deck.stats();
            terminal.draw(|f| {
                let right = match &self.session {
                    None => RightPane::Idle,
                    Some(s) => match (s.state(), s.current()) {
                        (SessionState::Empty(r), _) => RightPane::Empty(r),
                        (SessionState::Finished, _) => RightPane::Finished(s.summary()),
                        (SessionState::Presenting { revealed, .. }, Some(card)) => RightPane::Card {
                            card,
                            reveal: revealed,
                            progress: s.progress(),
                            legend: rating_legend(card),
                        },
                        (SessionState::Presenting { .. }, None) => RightPane::Idle,
                    },
                };
                let area = f.size();
                views::draw_ui(f, area, self.deck.key(), &stats, self.status.as_deref(), right);
            })?;

            if event::poll(std::time::Duration::from_millis(100))? {
                match map_event(event::read()?) {
                    Action::Quit => break,
                    Action::Enter => self.start_session(),
                    Action::Reveal => {
                        if let Some(s) = self.session.as_mut() {
                            s.reveal();
                        }
                    }
                    Action::Rate(v) => self.rate(v)?,
                    Action::None => {}
                }
            }
        }
        Ok(())
    }

    fn start_session(&mut self) {
        let busy = matches!(
            self.session.as_ref().map(|s| s.state()),
            Some(SessionState::Presenting { .. })
        );
        if !busy {
            self.session = Some(ReviewSession::start(&self.deck, SessionOptions::default()));
            self.status = None;
        }
    }

    fn rate(&mut self, value: u8) -> anyhow::Result<()> {
        let Some(session) = self.session.as_mut() else { return Ok(()) };
        if !session.is_revealed() {
            return Ok(());
        }
        let quality = Quality::new(value)?;
        self.status = match session.rate(&mut self.deck, quality) {
            Ok(out) => Some(format!("{} → next review {}", out.card.source_text, format_interval(out.interval))),
            Err(CoreError::CardNotFound(_)) => Some("card was removed, skipped".to_string()),
            Err(e) => Some(format!("not saved: {e}")),
        };
        Ok(())
    }
}
