use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    Enter,
    Reveal,
    Rate(u8),
    None,
}

pub fn map_event(ev: Event) -> Action {
    if let Event::Key(KeyEvent { code, kind, .. }) = ev {
        if kind == KeyEventKind::Release {
            return Action::None;
        }
        match code {
            KeyCode::Char('q') | KeyCode::Esc => Action::Quit,
            KeyCode::Enter => Action::Enter,
            KeyCode::Char(' ') => Action::Reveal,
            KeyCode::Char(c @ '0'..='5') => Action::Rate(c as u8 - b'0'),
            _ => Action::None,
        }
    } else {
        Action::None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    #[test]
    fn digits_map_to_ratings() {
        assert_eq!(map_event(key(KeyCode::Char('0'))), Action::Rate(0));
        assert_eq!(map_event(key(KeyCode::Char('5'))), Action::Rate(5));
        assert_eq!(map_event(key(KeyCode::Char('6'))), Action::None);
        assert_eq!(map_event(key(KeyCode::Char(' '))), Action::Reveal);
        assert_eq!(map_event(key(KeyCode::Char('q'))), Action::Quit);
    }
}
