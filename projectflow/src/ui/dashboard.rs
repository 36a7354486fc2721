//! Dashboard page rendering.

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
};

use super::theme;
use crate::dashboard::DashboardStats;
use crate::state::AppState;

/// Render statistics and recent tasks.
pub fn render(frame: &mut Frame, area: Rect, state: &AppState, recent_limit: usize) {
    let today = chrono::Local::now().date_naive();
    let stats = DashboardStats::compute(&state.tasks, today, recent_limit);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(4), Constraint::Min(3)])
        .split(area);

    let stat = |label: &'static str, value: String| {
        vec![
            Span::styled(format!("{label}: "), theme::dimmed()),
            Span::styled(value, theme::bold()),
            Span::raw("   "),
        ]
    };
    let mut first = stat("Total", stats.total.to_string());
    first.extend(stat(
        "Completed",
        format!("{} ({}%)", stats.completed, stats.completion_rate),
    ));
    first.extend(stat("Pending", stats.pending.to_string()));
    let mut second = stat("High priority", stats.high_priority.to_string());
    let overdue_style = if stats.overdue > 0 {
        theme::overdue()
    } else {
        theme::bold()
    };
    second.push(Span::styled("Overdue: ", theme::dimmed()));
    second.push(Span::styled(stats.overdue.to_string(), overdue_style));

    let summary = Paragraph::new(vec![Line::from(first), Line::from(second)]).block(
        Block::default()
            .title(Span::styled(
                "Dashboard",
                theme::panel_title(theme::DASHBOARD_TITLE),
            ))
            .borders(Borders::ALL),
    );
    frame.render_widget(summary, chunks[0]);

    let items: Vec<ListItem> = if stats.recent.is_empty() {
        let hint = state
            .error
            .clone()
            .unwrap_or_else(|| "No tasks yet. Press n to add one.".to_string());
        vec![ListItem::new(Span::styled(hint, theme::dimmed()))]
    } else {
        stats
            .recent
            .iter()
            .map(|task| {
                let style = if task.done {
                    theme::dimmed()
                } else {
                    theme::normal()
                };
                ListItem::new(Line::from(vec![
                    Span::styled(if task.done { "[✓] " } else { "[ ] " }, style),
                    Span::styled(task.name.clone(), style),
                    Span::raw("  "),
                    Span::styled(
                        task.priority.to_string(),
                        theme::normal().fg(theme::priority_color(task.priority)),
                    ),
                ]))
            })
            .collect()
    };

    let recent = List::new(items).block(
        Block::default()
            .title("Recent Tasks")
            .borders(Borders::ALL),
    );
    frame.render_widget(recent, chunks[1]);
}
