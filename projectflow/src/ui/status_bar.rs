//! Status bar rendering.

use ratatui::{
    Frame,
    layout::Rect,
    text::{Line, Span},
    widgets::Paragraph,
};

use super::theme;
use crate::app::{App, Mode};
use crate::state::{AppState, Page};

/// Render the status bar at the bottom of the screen.
///
/// Shows the newest toast when there is one, otherwise key help.
pub fn render(frame: &mut Frame, area: Rect, app: &App, state: &AppState) {
    let help_text = match (&app.mode, state.active_page) {
        (Mode::Search, _) => "type to search | Backspace delete | Enter/Esc done",
        (Mode::Form(_), _) => "Tab next field | Enter submit | Esc cancel",
        (Mode::Confirm(_), _) => "y confirm | n cancel",
        (Mode::Normal, Page::Tasks) => {
            "jk move | Space mark | Enter toggle | n new | e edit | d delete | f filter | / search | r refresh | q quit"
        }
        (Mode::Normal, _) => "Tab/1-3 navigate | n new task | r refresh | q quit",
    };

    let (dot_color, activity) = if state.loading {
        (theme::WARNING, "Working...")
    } else if state.error.is_some() {
        (theme::ERROR, "Offline")
    } else {
        (theme::SUCCESS, "Ready")
    };

    let mut spans = vec![
        Span::styled("ProjectFlow", theme::bold()),
        Span::raw(" | "),
        Span::styled("●", theme::normal().fg(dot_color)),
        Span::raw(format!(" {activity}")),
        Span::raw(" | "),
    ];
    match app.toasts().last() {
        Some(toast) => spans.push(Span::styled(
            toast.notification.message.clone(),
            theme::toast(toast.notification.level),
        )),
        None => spans.push(Span::styled(help_text, theme::dimmed())),
    }

    let paragraph = Paragraph::new(Line::from(spans)).style(theme::status_bar_bg());
    frame.render_widget(paragraph, area);
}
