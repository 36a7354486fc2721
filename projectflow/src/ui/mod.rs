//! Terminal UI rendering.

pub mod dashboard;
pub mod form;
pub mod header;
pub mod status_bar;
pub mod task_list;
pub mod theme;

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};

use crate::app::{App, Mode};
use crate::state::{AppState, Page};

/// Main draw function for the entire UI.
pub fn draw(frame: &mut Frame, app: &App) {
    let state = app.state();

    // Header, page body, status bar
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .split(frame.area());

    header::render(frame, chunks[0], &state);

    match state.active_page {
        Page::Dashboard => dashboard::render(frame, chunks[1], &state, app.recent_limit),
        Page::Tasks => task_list::render(frame, chunks[1], app, &state),
        Page::About => render_about(frame, chunks[1]),
        Page::Profile => render_profile(frame, chunks[1], &state),
        // The form itself is drawn as an overlay.
        Page::Login | Page::Signup => {}
    }

    status_bar::render(frame, chunks[2], app, &state);

    match &app.mode {
        Mode::Form(form) => form::render_form(frame, form),
        Mode::Confirm(pending) => form::render_confirm(frame, &pending.prompt()),
        Mode::Normal | Mode::Search => {}
    }
}

fn render_about(frame: &mut Frame, area: Rect) {
    let text = vec![
        Line::from(Span::styled("ProjectFlow", theme::bold())),
        Line::raw(""),
        Line::raw("A small task manager: create, edit, complete, and delete tasks,"),
        Line::raw("filter them by status or priority, and search them by name."),
        Line::raw(""),
        Line::from(Span::styled(
            "Tab/1-3 navigate | n new task | r refresh | l sign in | u sign up",
            theme::dimmed(),
        )),
    ];
    let paragraph = Paragraph::new(text)
        .wrap(Wrap { trim: false })
        .block(Block::default().title("About").borders(Borders::ALL));
    frame.render_widget(paragraph, area);
}

fn render_profile(frame: &mut Frame, area: Rect, state: &AppState) {
    let lines = state.user.as_ref().map_or_else(
        || vec![Line::raw("Not signed in")],
        |user| {
            vec![
                Line::from(vec![
                    Span::styled("Name: ", theme::dimmed()),
                    Span::styled(user.name.clone(), theme::bold()),
                ]),
                Line::from(vec![
                    Span::styled("Id:   ", theme::dimmed()),
                    Span::raw(user.id.clone()),
                ]),
                Line::raw(""),
                Line::from(Span::styled("o sign out", theme::dimmed())),
            ]
        },
    );
    let paragraph =
        Paragraph::new(lines).block(Block::default().title("Profile").borders(Borders::ALL));
    frame.render_widget(paragraph, area);
}

/// A rectangle of `width` x `height` centered in `area`, clamped to it.
#[must_use]
pub fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
