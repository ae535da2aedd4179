use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Gauge, List, ListItem, ListState, Paragraph, Wrap};

use crate::capacity::format_bytes;
use crate::model::EntryKind;
use crate::remote::Remote;
use crate::view::VisibleEntry;

use super::app::{App, StatusKind};

const HELP: &str = "j/k move  enter expand  space select  / search  e ext  f flat  \
n mkdir  u upload  r move  d delete  R refresh  L login  O logout  q quit";

pub(super) fn draw<R: Remote>(frame: &mut ratatui::Frame, app: &App<R>) {
    let area = frame.area();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(2),
            Constraint::Length(2),
        ])
        .split(area);

    draw_header(frame, app, chunks[0]);
    draw_meter(frame, app, chunks[1]);
    draw_tree(frame, app, chunks[2]);

    // Status
    let status = match &app.status {
        Some(s) => {
            let style = match s.kind {
                StatusKind::Info => Style::default().fg(Color::Green),
                StatusKind::Error => Style::default().fg(Color::Red),
            };
            Line::from(Span::styled(s.text.as_str(), style))
        }
        None => Line::from(""),
    };
    frame.render_widget(
        Paragraph::new(status)
            .wrap(Wrap { trim: false })
            .block(Block::default().borders(Borders::TOP)),
        chunks[3],
    );

    // Prompt or key help
    let bottom = match &app.prompt {
        Some(kind) => Line::from(vec![
            Span::styled(
                format!("{}: ", kind.label()),
                Style::default().fg(Color::Yellow),
            ),
            Span::raw(app.input.buf.as_str()),
        ]),
        None => Line::from(Span::styled(
            HELP,
            Style::default().fg(Color::Gray).add_modifier(Modifier::DIM),
        )),
    };
    frame.render_widget(
        Paragraph::new(bottom).block(Block::default().borders(Borders::TOP)),
        chunks[4],
    );
    if let Some(kind) = &app.prompt {
        let x = chunks[4].x + (kind.label().len() + 2 + app.input.cursor) as u16;
        frame.set_cursor_position((x, chunks[4].y + 1));
    }

    if let Some(confirm) = &app.confirm {
        dim_frame(frame);
        draw_confirm(frame, &confirm.question());
    }
}

fn draw_header<R: Remote>(frame: &mut ratatui::Frame, app: &App<R>, area: Rect) {
    let mut spans = vec![
        Span::styled("Treeward", Style::default().fg(Color::Black).bg(Color::White)),
        Span::raw("  "),
    ];
    match app.console.snapshot() {
        Some(snap) => {
            spans.push(Span::raw(format!("{}@{}", snap.repo.full_name, snap.branch)));
            spans.push(Span::raw(format!(
                "  files {}  dirs {}",
                snap.files.len(),
                snap.directories.len()
            )));
            if snap.truncated {
                spans.push(Span::styled("  (truncated)", Style::default().fg(Color::Yellow)));
            }
        }
        None => spans.push(Span::raw("(not loaded)")),
    }
    let selected = app.console.view().selected.len();
    if selected > 0 {
        spans.push(Span::styled(
            format!("  selected {}", selected),
            Style::default().fg(Color::Cyan),
        ));
    }
    let view = app.console.view();
    if !view.search.is_empty() {
        spans.push(Span::raw(format!("  q={}", view.search)));
    }
    if !view.extension.is_empty() {
        spans.push(Span::raw(format!("  ext={}", view.extension)));
    }
    spans.push(Span::raw("  "));
    if app.console.session().is_authenticated() {
        spans.push(Span::styled("signed in", Style::default().fg(Color::Green)));
    } else {
        spans.push(Span::styled("signed out", Style::default().fg(Color::Red)));
    }

    let header = Paragraph::new(Line::from(spans)).block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(header, area);
}

fn draw_meter<R: Remote>(frame: &mut ratatui::Frame, app: &App<R>, area: Rect) {
    let Some(meter) = app.console.meter() else {
        return;
    };
    let color = match meter.percent() {
        p if p >= 90.0 => Color::Red,
        p if p >= 70.0 => Color::Yellow,
        _ => Color::Green,
    };
    let gauge = Gauge::default()
        .gauge_style(Style::default().fg(color))
        .ratio((meter.percent() / 100.0).clamp(0.0, 1.0))
        .label(format!("{} ({:.1}%)", meter.label(), meter.percent()));
    frame.render_widget(gauge, area);
}

fn row_line(row: &VisibleEntry, flat: bool) -> Line<'static> {
    let indent = "  ".repeat(if flat { 0 } else { row.depth });
    let mark = if row.selected { "* " } else { "  " };
    let name = if flat || row.depth == 0 {
        if row.display_name.is_empty() {
            row.path.clone()
        } else {
            row.display_name.clone()
        }
    } else {
        row.display_name
            .rsplit('/')
            .next()
            .unwrap_or(&row.display_name)
            .to_string()
    };

    match row.kind {
        EntryKind::Directory => {
            let arrow = if row.depth == 0 || row.expanded { "▾ " } else { "▸ " };
            Line::from(vec![
                Span::raw(format!("{}{}", mark, indent)),
                Span::styled(
                    format!("{}{}/", if flat { "" } else { arrow }, name),
                    Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD),
                ),
            ])
        }
        EntryKind::File => Line::from(vec![
            Span::raw(format!("{}{}  ", mark, indent)),
            Span::raw(name),
            Span::styled(
                format!("  {}", format_bytes(row.size)),
                Style::default().fg(Color::Gray),
            ),
        ]),
    }
}

fn draw_tree<R: Remote>(frame: &mut ratatui::Frame, app: &App<R>, area: Rect) {
    let flat = app.console.view().flat;
    let items: Vec<ListItem> = app
        .rows
        .iter()
        .map(|row| ListItem::new(row_line(row, flat)))
        .collect();
    let title = if flat { "Files (flat)" } else { "Files" };
    let list = List::new(items)
        .block(Block::default().borders(Borders::NONE).title(title))
        .highlight_style(Style::default().bg(Color::DarkGray));
    let mut state = ListState::default().with_selected(Some(app.cursor));
    frame.render_stateful_widget(list, area, &mut state);
}

fn draw_confirm(frame: &mut ratatui::Frame, question: &str) {
    let area = frame.area();
    let w = area.width.saturating_sub(6).clamp(20, 70);
    let h = 5;
    let box_area = Rect {
        x: area.x + (area.width.saturating_sub(w)) / 2,
        y: area.y + (area.height.saturating_sub(h)) / 2,
        width: w,
        height: h.min(area.height),
    };
    frame.render_widget(Clear, box_area);
    let lines = vec![
        Line::from(question.to_string()),
        Line::from(""),
        Line::from(Span::styled("y = yes   n = no", Style::default().fg(Color::Yellow))),
    ];
    frame.render_widget(
        Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .block(Block::default().borders(Borders::ALL).title("Confirm")),
        box_area,
    );
}

fn dim_frame(frame: &mut ratatui::Frame) {
    let area = frame.area();
    let buf = frame.buffer_mut();
    for y in area.y..area.y.saturating_add(area.height) {
        for x in area.x..area.x.saturating_add(area.width) {
            if let Some(cell) = buf.cell_mut((x, y)) {
                cell.modifier |= Modifier::DIM;
            }
        }
    }
}
