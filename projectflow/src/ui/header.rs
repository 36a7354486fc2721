//! Header with navigation tabs and the session indicator.

use ratatui::{
    Frame,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use super::theme;
use crate::state::{AppState, Page};

/// Render the header bar.
pub fn render(frame: &mut Frame, area: Rect, state: &AppState) {
    let mut spans = vec![Span::styled("ProjectFlow", theme::bold()), Span::raw("  ")];

    for (i, page) in Page::NAVIGATION.iter().enumerate() {
        let style = if *page == state.active_page {
            theme::highlighted()
        } else {
            theme::dimmed()
        };
        spans.push(Span::styled(format!(" {} {} ", i + 1, page.label()), style));
    }

    spans.push(Span::raw("  "));
    match &state.user {
        Some(user) => {
            spans.push(Span::styled("● ", theme::normal().fg(theme::SUCCESS)));
            spans.push(Span::raw(user.name.clone()));
        }
        None => spans.push(Span::styled("Guest", theme::dimmed())),
    }

    let paragraph = Paragraph::new(Line::from(spans)).block(Block::default().borders(Borders::ALL));
    frame.render_widget(paragraph, area);
}
