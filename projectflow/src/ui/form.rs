//! Form and confirmation overlays.

use ratatui::{
    Frame,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

use super::{centered, theme};
use crate::app::Form;

/// Render an open form centered over the page.
pub fn render_form(frame: &mut Frame, form: &Form) {
    let mut lines = Vec::new();
    for (i, field) in form.fields.iter().enumerate() {
        let label_style = if i == form.focus {
            theme::highlighted()
        } else {
            theme::dimmed()
        };
        let value = if field.secret {
            "•".repeat(field.value.chars().count())
        } else {
            field.value.clone()
        };
        lines.push(Line::from(vec![
            Span::styled(format!("{}: ", field.label), label_style),
            Span::styled(value, theme::normal()),
        ]));
    }

    if let Some(priority) = form.priority {
        let label_style = if form.priority_focused() {
            theme::highlighted()
        } else {
            theme::dimmed()
        };
        lines.push(Line::from(vec![
            Span::styled("Priority: ", label_style),
            Span::styled(
                format!("< {priority} >"),
                theme::normal().fg(theme::priority_color(priority)),
            ),
        ]));
    }

    lines.push(Line::raw(""));
    for error in &form.errors {
        lines.push(Line::from(Span::styled(
            error.clone(),
            theme::normal().fg(theme::ERROR),
        )));
    }
    lines.push(Line::from(Span::styled(
        "Tab next field | Enter submit | Esc cancel",
        theme::dimmed(),
    )));

    let height = u16::try_from(lines.len() + 2).unwrap_or(u16::MAX);
    let area = centered(frame.area(), 64, height);
    let paragraph = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(Block::default().title(form.title()).borders(Borders::ALL));
    frame.render_widget(Clear, area);
    frame.render_widget(paragraph, area);
}

/// Render a yes/no prompt centered over the page.
pub fn render_confirm(frame: &mut Frame, prompt: &str) {
    let area = centered(frame.area(), 60, 5);
    let paragraph = Paragraph::new(vec![
        Line::from(Span::styled(prompt.to_string(), theme::bold())),
        Line::raw(""),
        Line::from(Span::styled("y confirm | n cancel", theme::dimmed())),
    ])
    .block(
        Block::default()
            .title("Confirm")
            .borders(Borders::ALL)
            .border_style(theme::normal().fg(theme::WARNING)),
    );
    frame.render_widget(Clear, area);
    frame.render_widget(paragraph, area);
}
