//! Terminal drawing.
//!
//! Layout: the catalog tree on the left, documentation of the selected node on
//! the right, and a one line command bar at the bottom. The focused pane gets a
//! highlighted border.

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
};

use crate::data::{
    app_data::{AppData, Focus},
    catalog::NodeKind,
};

const TREE_PERCENT: u16 = 40;
const HINTS: &str = "Enter select  Esc back  Tab focus  h/l fold  b parent  / search  :q quit";

/// Label color of a node kind.
pub fn kind_color(kind: NodeKind) -> Color {
    match kind {
        NodeKind::Root => Color::Yellow,
        NodeKind::Group => Color::Green,
        NodeKind::Resource => Color::Blue,
        NodeKind::Field => Color::Gray,
    }
}

fn pane_block(title: String, focused: bool) -> Block<'static> {
    let border = if focused {
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    Block::default()
        .borders(Borders::ALL)
        .border_style(border)
        .title(title)
}

/// Draw the whole screen.
pub fn draw(frame: &mut Frame, app: &AppData) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(1)])
        .split(frame.area());
    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(TREE_PERCENT),
            Constraint::Percentage(100 - TREE_PERCENT),
        ])
        .split(chunks[0]);

    draw_tree(frame, body[0], app);
    draw_details(frame, body[1], app);
    draw_command_bar(frame, chunks[1], app);
}

fn draw_tree(frame: &mut Frame, area: Rect, app: &AppData) {
    let nav = &app.navigator;
    let catalog = nav.catalog();
    let rows = nav.rows();

    let items: Vec<ListItem> = rows
        .iter()
        .map(|row| {
            let node = catalog.node(row.id);
            let mut spans = vec![
                Span::raw("  ".repeat(row.depth)),
                Span::styled(node.label.clone(), Style::default().fg(kind_color(node.kind))),
            ];
            if node.has_children() {
                spans.push(Span::raw(" >"));
            }
            ListItem::new(Line::from(spans))
        })
        .collect();

    let mut state = ListState::default();
    state.select(rows.iter().position(|r| r.id == nav.selected()));

    let mut title = nav.breadcrumb().join(" > ");
    if let Some(query) = nav.query() {
        title = format!("{title} [/{query}]");
    }
    let list = List::new(items)
        .block(pane_block(title, app.focus == Focus::Tree))
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED));
    frame.render_stateful_widget(list, area, &mut state);
}

fn draw_details(frame: &mut Frame, area: Rect, app: &AppData) {
    let details = Paragraph::new(app.details())
        .wrap(Wrap { trim: false })
        .scroll((app.details_scroll, 0))
        .block(pane_block(
            app.details_title().to_string(),
            app.focus == Focus::Details,
        ));
    frame.render_widget(details, area);
}

fn draw_command_bar(frame: &mut Frame, area: Rect, app: &AppData) {
    let line = match app.input() {
        Some(input) => {
            let text = format!("{}{}", input.purpose.prompt(), input.text);
            frame.set_cursor_position((area.x + text.chars().count() as u16, area.y));
            Line::from(text)
        }
        None if !app.status().is_empty() => Line::styled(app.status(), Style::default().fg(Color::Red)),
        None => Line::styled(HINTS, Style::default().fg(Color::DarkGray)),
    };
    frame.render_widget(Paragraph::new(line), area);
}
