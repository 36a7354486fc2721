//! Task list page rendering.

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};

use super::theme;
use crate::app::{App, DATE_FORMAT, Mode};
use crate::state::AppState;

/// Render the filter bar and the filtered task list.
pub fn render(frame: &mut Frame, area: Rect, app: &App, state: &AppState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(3)])
        .split(area);

    let search_style = if app.mode == Mode::Search {
        theme::highlighted()
    } else {
        theme::normal()
    };
    let bar = Line::from(vec![
        Span::styled(" Filter: ", theme::dimmed()),
        Span::styled(state.filter.label(), theme::bold()),
        Span::styled("   Search: ", theme::dimmed()),
        Span::styled(format!("{}▏", state.search_term), search_style),
    ]);
    frame.render_widget(Paragraph::new(bar), chunks[0]);

    let today = chrono::Local::now().date_naive();
    let items: Vec<ListItem> = state
        .filtered_tasks
        .iter()
        .map(|task| {
            let style = if task.done {
                theme::dimmed()
            } else {
                theme::normal()
            };
            let mark = if app.marked.contains(&task.id) { "* " } else { "  " };
            let mut spans = vec![
                Span::styled(mark, theme::highlighted()),
                Span::styled(if task.done { "[✓] " } else { "[ ] " }, style),
                Span::styled(task.name.clone(), style),
                Span::raw("  "),
                Span::styled(
                    task.priority.to_string(),
                    theme::normal().fg(theme::priority_color(task.priority)),
                ),
            ];
            if let Some(due) = task.due_date {
                let due_style = if task.is_overdue(today) {
                    theme::overdue()
                } else {
                    theme::dimmed()
                };
                spans.push(Span::styled(
                    format!("  due {}", due.format(DATE_FORMAT)),
                    due_style,
                ));
            }
            ListItem::new(Line::from(spans))
        })
        .collect();

    let title = format!(
        "Tasks ({} of {})",
        state.filtered_tasks.len(),
        state.tasks.len()
    );
    let list = List::new(items)
        .block(
            Block::default()
                .title(Span::styled(title, theme::panel_title(theme::TASKS_TITLE)))
                .borders(Borders::ALL),
        )
        .highlight_style(theme::selected());

    let mut list_state = ListState::default();
    if !state.filtered_tasks.is_empty() {
        list_state.select(Some(app.selected.min(state.filtered_tasks.len() - 1)));
    }
    frame.render_stateful_widget(list, chunks[1], &mut list_state);
}
