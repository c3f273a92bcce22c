use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
};

use crate::domain::email::Mailbox;
use crate::terminal::compose::ComposeField;
use crate::terminal::state::{AppState, DetailAction, Panel};

pub fn render(f: &mut Frame, state: &AppState) {
    let [nav, main, status, footer] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(0),
        Constraint::Length(1),
        Constraint::Length(1),
    ])
    .areas(f.area());

    render_nav(f, nav, state);
    match state.panel {
        Panel::Emails => render_emails(f, main, state),
        Panel::Detail => render_detail(f, main, state),
        Panel::Compose => render_compose(f, main, state),
    }
    render_status(f, status, state);
    render_footer(f, footer, state);
}

fn key_hint(key: &'static str) -> Span<'static> {
    Span::styled(key, Style::default().add_modifier(Modifier::BOLD))
}

fn render_nav(f: &mut Frame, area: Rect, state: &AppState) {
    let mut spans = Vec::new();
    for (key, mailbox) in [("i", Mailbox::Inbox), ("s", Mailbox::Sent), ("a", Mailbox::Archive)] {
        let active = state.panel != Panel::Compose && state.mailbox == mailbox;
        let style = if active {
            Style::default().fg(Color::Black).bg(Color::Yellow)
        } else {
            Style::default()
        };
        spans.push(Span::styled(format!(" [{key}] {} ", mailbox.title()), style));
    }
    let compose_style = if state.panel == Panel::Compose {
        Style::default().fg(Color::Black).bg(Color::Yellow)
    } else {
        Style::default()
    };
    spans.push(Span::styled(" [c] Compose ", compose_style));
    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_emails(f: &mut Frame, area: Rect, state: &AppState) {
    let block = Block::default()
        .title(format!(" {} ", state.header))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow));

    if state.rows.is_empty() {
        let text = if state.loading { "Loading…" } else { "No emails." };
        f.render_widget(
            Paragraph::new(text)
                .style(Style::default().fg(Color::Gray))
                .block(block),
            area,
        );
        return;
    }

    let items: Vec<ListItem> = state
        .rows
        .iter()
        .map(|row| {
            let e = &row.email;
            let style = if row.read {
                Style::default().fg(Color::DarkGray)
            } else {
                Style::default().add_modifier(Modifier::BOLD)
            };
            ListItem::new(Line::from(format!(
                "{} | {} | {}",
                e.recipients, e.subject, e.timestamp
            )))
            .style(style)
        })
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_symbol("➜ ")
        .highlight_style(Style::default().fg(Color::Green));

    f.render_stateful_widget(list, area, &mut state.list_state.clone());
}

fn render_detail(f: &mut Frame, area: Rect, state: &AppState) {
    let Some(detail) = &state.detail else {
        return;
    };
    let e = &detail.email;

    let [body_area, actions_area] =
        Layout::vertical([Constraint::Min(0), Constraint::Length(1)]).areas(area);

    let field = |label: &'static str, value: &str| {
        Line::from(vec![
            Span::styled(label, Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(value.to_string()),
        ])
    };
    let mut lines = vec![
        field("From: ", &e.sender),
        field("To: ", &e.recipients),
        field("Subject: ", &e.subject),
        field("Timestamp: ", &e.timestamp),
        Line::default(),
    ];
    lines.extend(e.body.lines().map(|l| Line::from(l.to_string())));

    let p = Paragraph::new(Text::from(lines))
        .block(
            Block::default()
                .title(format!(" {} ", detail.mailbox.title()))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Yellow)),
        )
        .wrap(Wrap { trim: false })
        .scroll((detail.scroll, 0));
    f.render_widget(p, body_area);

    let mut spans = Vec::new();
    for action in &detail.actions {
        let (key, color) = match action {
            DetailAction::Reply => ("r", Color::Cyan),
            DetailAction::Archive => ("e", Color::Red),
            DetailAction::Unarchive => ("e", Color::Green),
        };
        spans.push(Span::styled(
            format!(" [{key}] {} ", action.label()),
            Style::default().fg(Color::Black).bg(color),
        ));
        spans.push(Span::raw(" "));
    }
    f.render_widget(Paragraph::new(Line::from(spans)), actions_area);
}

fn render_compose(f: &mut Frame, area: Rect, state: &AppState) {
    let form = &state.compose;
    let [to_area, subject_area, body_area] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Length(3),
        Constraint::Min(3),
    ])
    .areas(area);

    for (field, rect) in ComposeField::ALL
        .into_iter()
        .zip([to_area, subject_area, body_area])
    {
        let focused = form.focus == field;
        let border = if focused { Color::Yellow } else { Color::DarkGray };
        let value = form.value(field);
        let p = Paragraph::new(value.to_string())
            .block(
                Block::default()
                    .title(format!(" {} ", field.label()))
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(border)),
            )
            .wrap(Wrap { trim: false });
        f.render_widget(p, rect);

        if focused {
            let (col, row) = cursor_offset(value, rect.width.saturating_sub(2));
            let x = rect
                .x
                .saturating_add(1)
                .saturating_add(col)
                .min(rect.right().saturating_sub(2));
            let y = rect
                .y
                .saturating_add(1)
                .saturating_add(row)
                .min(rect.bottom().saturating_sub(2));
            f.set_cursor_position((x, y));
        }
    }
}

/// Column and row of the end of `value` inside a wrapped box `width` cells wide.
/// Wrapping is counted per character, values past `u16::MAX` saturate.
fn cursor_offset(value: &str, width: u16) -> (u16, u16) {
    let width = usize::from(width.max(1));
    let mut rows = 0usize;
    let mut last = 0usize;
    for (i, line) in value.split('\n').enumerate() {
        if i > 0 {
            rows = rows.saturating_add(last / width + 1);
        }
        last = line.chars().count();
    }
    let row = rows.saturating_add(last / width);
    let col = last % width;
    let clamp = |n: usize| u16::try_from(n).unwrap_or(u16::MAX);
    (clamp(col), clamp(row))
}

fn render_status(f: &mut Frame, area: Rect, state: &AppState) {
    let line = if let Some(msg) = &state.banner {
        Line::from(Span::styled(
            msg.clone(),
            Style::default().fg(Color::White).bg(Color::Red),
        ))
    } else if state.loading {
        let what = if state.panel == Panel::Compose {
            "Sending…"
        } else {
            "Loading…"
        };
        Line::from(Span::styled(what, Style::default().fg(Color::Yellow)))
    } else {
        Line::default()
    };
    f.render_widget(Paragraph::new(line), area);
}

fn render_footer(f: &mut Frame, area: Rect, state: &AppState) {
    let mut spans = match state.panel {
        Panel::Emails => vec![
            key_hint("j/k"),
            Span::raw(" move  "),
            key_hint("Enter"),
            Span::raw(" open  "),
            key_hint("g"),
            Span::raw(" reload  "),
        ],
        Panel::Detail => vec![
            key_hint("j/k"),
            Span::raw(" scroll  "),
            key_hint("Esc"),
            Span::raw(" back  "),
        ],
        Panel::Compose => vec![
            key_hint("Tab"),
            Span::raw(" next field  "),
            key_hint("Ctrl-S"),
            Span::raw(" send  "),
            key_hint("Esc"),
            Span::raw(" cancel  "),
        ],
    };
    if state.panel != Panel::Compose {
        spans.push(key_hint("q"));
        spans.push(Span::raw(" quit"));
    }
    f.render_widget(Paragraph::new(Line::from(spans)), area);
}
