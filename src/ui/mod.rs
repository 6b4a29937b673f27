// Terminal dashboards for both flows (ratatui + crossterm)

pub mod locations;
pub mod pets;

use crate::notice::{Notice, NoticeLevel};
use anyhow::Result;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    Terminal,
};
use std::io::{self, Stdout};

pub use locations::{run_locations, LocationsApp};
pub use pets::{run_pets, PetsApp};

/// Enter raw mode + alternate screen, run `app`, always restore the terminal
pub(crate) fn with_terminal<F>(app: F) -> Result<()>
where
    F: FnOnce(&mut Terminal<CrosstermBackend<Stdout>>) -> io::Result<()>,
{
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = app(&mut terminal);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        println!("Error: {:?}", err);
    }

    Ok(())
}

pub(crate) fn notice_color(level: NoticeLevel) -> Color {
    match level {
        NoticeLevel::Success => Color::Green,
        NoticeLevel::Info => Color::Cyan,
        NoticeLevel::Warning => Color::Yellow,
        NoticeLevel::Error => Color::Red,
    }
}

pub(crate) fn notice_line(notice: &Notice) -> Line<'static> {
    Line::from(Span::styled(
        notice.to_string(),
        Style::default()
            .fg(notice_color(notice.level))
            .add_modifier(Modifier::BOLD),
    ))
}

pub(crate) fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Key hint spans: `key` in yellow followed by its description
pub(crate) fn hint_spans(hints: &[(&'static str, &'static str)]) -> Vec<Span<'static>> {
    let mut spans = Vec::new();
    for (i, (key, label)) in hints.iter().enumerate() {
        if i > 0 {
            spans.push(Span::raw(" | "));
        }
        let color = if *key == "Esc" || *key == "q" { Color::Red } else { Color::Yellow };
        spans.push(Span::styled(*key, Style::default().fg(color)));
        spans.push(Span::raw(format!(" {}", label)));
    }
    spans
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_counts_characters() {
        assert_eq!(truncate("Bangkok", 10), "Bangkok");
        assert_eq!(truncate("กรุงเทพมหานคร", 6), "กรุ...");
    }
}
