use ratatui::style::{Color, Style, Stylize};

pub fn title_style() -> Style { Style::default().fg(Color::Cyan).bold() }
pub fn hint_style() -> Style { Style::default().fg(Color::DarkGray) }
pub fn answer_style() -> Style { Style::default().fg(Color::Yellow).bold() }
pub fn good_style() -> Style { Style::default().fg(Color::Green) }
pub fn footer_style() -> Style { Style::default().fg(Color::Gray) }
