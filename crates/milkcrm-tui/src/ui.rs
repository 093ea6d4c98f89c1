//! UI rendering with Ratatui.

use crate::app::{App, InputMode, Managed, Tab};
use milkcrm_core::dashboard::{format_inr, DashboardData};
use milkcrm_core::palette::Target;
use milkcrm_core::search::paginate;
use milkcrm_core::{
    AdminKind, ClientKind, DashboardState, FieldKind, FormMode, PasswordChangeForm, StaffKind,
};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    prelude::*,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, List, ListItem, Paragraph, Row, Table, TableState, Tabs, Wrap},
    Frame,
};

const SELECTED_BG: Color = Color::Rgb(60, 60, 80);

/// Main render function.
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(5), Constraint::Length(1)])
        .split(area);

    render_tabs(frame, app, chunks[0]);
    match app.tab {
        Tab::Dashboard => render_dashboard(frame, app, chunks[1]),
        Tab::Clients => render_list::<ClientKind>(frame, app, chunks[1]),
        Tab::Staff => render_list::<StaffKind>(frame, app, chunks[1]),
        Tab::Settings => render_settings(frame, app, chunks[1]),
    }
    render_help(frame, app, chunks[2]);

    match app.input_mode {
        InputMode::Form => match app.tab {
            Tab::Clients => render_form::<ClientKind>(frame, app, area),
            Tab::Staff => render_form::<StaffKind>(frame, app, area),
            Tab::Settings => render_form::<AdminKind>(frame, app, area),
            Tab::Dashboard => {}
        },
        InputMode::ConfirmDelete => render_confirm(frame, app, area),
        InputMode::PasswordForm => render_password_form(frame, app, area),
        InputMode::Palette => render_palette(frame, app, area),
        InputMode::Normal | InputMode::Search => {}
    }
}

fn render_tabs(frame: &mut Frame, app: &App, area: Rect) {
    let titles: Vec<Line> = Tab::ALL
        .iter()
        .enumerate()
        .map(|(i, tab)| Line::from(format!(" {} {} ", i + 1, tab.title())))
        .collect();

    let tabs = Tabs::new(titles)
        .block(
            Block::default()
                .title(" 🥛 MilkCRM ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan)),
        )
        .select(app.tab.index())
        .style(Style::default().fg(Color::DarkGray))
        .highlight_style(
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        );
    frame.render_widget(tabs, area);
}

fn render_help(frame: &mut Frame, app: &App, area: Rect) {
    let text = match (app.input_mode, app.tab) {
        (InputMode::Search, _) => "type to filter | Enter: keep | Esc: clear",
        (InputMode::Form, _) => "Tab/↑↓: field | Space: toggle | Enter: save | Esc: cancel",
        (InputMode::ConfirmDelete, _) => "y: delete | n/Esc: keep",
        (InputMode::PasswordForm, _) => "Tab/↑↓: field | Enter: change | Esc: cancel",
        (InputMode::Palette, _) => "↑↓: select | Enter: go | Esc: close",
        (InputMode::Normal, Tab::Dashboard) => {
            "←/→: day | s: shift | r: refresh | 1-4/Tab: screen | Ctrl+P: find | q: quit"
        }
        (InputMode::Normal, Tab::Settings) => {
            "n: add | e: edit | d: delete | /: search | p: password | r: reload | q: quit"
        }
        (InputMode::Normal, _) => {
            "j/k: move | ←/→: page | n: add | e: edit | d: delete | /: search | r: reload | q: quit"
        }
    };
    let help = Paragraph::new(text).style(Style::default().fg(Color::DarkGray));
    frame.render_widget(help, area);
}

/// Render one entity list screen.
fn render_list<K: Managed>(frame: &mut Frame, app: &App, area: Rect) {
    let manager = K::manager(app);
    let title = if manager.is_loading() {
        format!(" {} (loading…) ", K::TITLE)
    } else {
        format!(" {} ", K::TITLE)
    };
    let focused = matches!(app.input_mode, InputMode::Normal | InputMode::Search);
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(if focused { Color::Cyan } else { Color::DarkGray }));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Search
            Constraint::Min(3),    // Table
            Constraint::Length(1), // Pagination
            Constraint::Length(1), // Messages
        ])
        .split(inner);

    // Search line
    let term = manager.search_term();
    let search = if app.input_mode == InputMode::Search {
        Line::from(vec![
            Span::styled("/ ", Style::default().fg(Color::Magenta)),
            Span::styled(term, Style::default().fg(Color::White)),
            Span::styled("_", Style::default().add_modifier(Modifier::SLOW_BLINK)),
        ])
    } else if term.is_empty() {
        Line::from(Span::styled(
            format!("Press / to search {}", K::COLLECTION),
            Style::default().fg(Color::DarkGray),
        ))
    } else {
        Line::from(vec![
            Span::styled("/ ", Style::default().fg(Color::DarkGray)),
            Span::styled(term, Style::default().fg(Color::Yellow)),
        ])
    };
    frame.render_widget(Paragraph::new(search), chunks[0]);

    let view = manager.visible();
    let cursor = K::cursor(app);
    let page = paginate(&view, cursor.page, app.page_size);

    if view.is_empty() {
        let message = if !manager.is_loaded() {
            format!("Loading {}…", K::COLLECTION)
        } else if term.is_empty() {
            format!("No {} yet. Press n to add one.", K::COLLECTION)
        } else {
            format!("No {} match \"{}\"", K::COLLECTION, term)
        };
        let empty = Paragraph::new(message)
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center);
        frame.render_widget(empty, chunks[1]);
    } else {
        let header = Row::new(K::COLUMNS.iter().copied())
            .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD));
        let rows = page.rows.iter().map(|record| Row::new(K::row(record)));
        let widths = K::COLUMNS.iter().map(|_| Constraint::Fill(1));

        let table = Table::new(rows, widths)
            .header(header)
            .row_highlight_style(
                Style::default()
                    .bg(SELECTED_BG)
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            );
        let mut state = TableState::default().with_selected(Some(cursor.row));
        frame.render_stateful_widget(table, chunks[1], &mut state);
    }

    let footer = if view.is_empty() {
        format!("Page {} of {}", page.index + 1, page.count)
    } else {
        format!(
            "Page {} of {} | {}-{} of {} {}",
            page.index + 1,
            page.count,
            page.offset + 1,
            page.offset + page.rows.len(),
            view.len(),
            K::COLLECTION
        )
    };
    frame.render_widget(
        Paragraph::new(footer)
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Right),
        chunks[2],
    );

    render_messages(frame, manager.error(), manager.notice(), chunks[3]);
}

fn render_messages(frame: &mut Frame, error: Option<&str>, notice: Option<&str>, area: Rect) {
    let line = match (error, notice) {
        (Some(error), _) => Span::styled(format!("✗ {error}"), Style::default().fg(Color::Red)),
        (None, Some(notice)) => Span::styled(format!("✓ {notice}"), Style::default().fg(Color::Green)),
        (None, None) => return,
    };
    frame.render_widget(Paragraph::new(Line::from(line)), area);
}

/// Render the settings screen: admin accounts and the password panel.
fn render_settings(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(8), Constraint::Length(4)])
        .split(area);

    render_list::<AdminKind>(frame, app, chunks[0]);

    let block = Block::default()
        .title(" Account ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));
    let inner = block.inner(chunks[1]);
    frame.render_widget(block, chunks[1]);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Length(1)])
        .split(inner);
    frame.render_widget(
        Paragraph::new("Press p to change your password").style(Style::default().fg(Color::White)),
        rows[0],
    );
    if !app.password.is_open() {
        render_messages(frame, app.password.error(), app.password.notice(), rows[1]);
    }
}

/// Render the create/edit form overlay.
fn render_form<K: Managed>(frame: &mut Frame, app: &App, area: Rect) {
    let manager = K::manager(app);
    let title = match manager.mode() {
        Some(FormMode::Create) => format!(" Add {} ", K::NOUN),
        Some(FormMode::Edit) => format!(" Edit {} ", K::NOUN),
        None => return,
    };

    let width = 64.min(area.width.saturating_sub(4));
    let height = (K::FIELDS.len() as u16 + 6).min(area.height.saturating_sub(2));
    let dialog_area = centered_rect(width, height, area);
    frame.render_widget(Clear, dialog_area);

    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    let inner = block.inner(dialog_area);
    frame.render_widget(block, dialog_area);

    let field_error = manager.field_error();
    let mut lines: Vec<Line> = K::FIELDS
        .iter()
        .enumerate()
        .map(|(i, spec)| {
            let focused = i == app.form_field;
            let value = K::field(manager.form(), spec.name).unwrap_or_default();
            let shown = match spec.kind {
                FieldKind::Secret => "•".repeat(value.chars().count()),
                FieldKind::Flag => format!("◂ {} ▸", if value == "true" { "Yes" } else { "No" }),
                FieldKind::Shift => format!("◂ {value} ▸"),
                FieldKind::Text | FieldKind::Number => value,
            };
            let in_error = field_error.is_some_and(|err| err.field == spec.name);

            let label_style = if in_error {
                Style::default().fg(Color::Red)
            } else if focused {
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::DarkGray)
            };
            let value_style = if focused {
                Style::default().bg(SELECTED_BG).fg(Color::White)
            } else {
                Style::default().fg(Color::White)
            };
            let editable = !matches!(spec.kind, FieldKind::Shift | FieldKind::Flag);

            let mut spans = vec![
                Span::styled(format!("{:>18}: ", spec.label), label_style),
                Span::styled(shown, value_style),
            ];
            if focused && editable {
                spans.push(Span::styled("_", Style::default().add_modifier(Modifier::SLOW_BLINK)));
            }
            Line::from(spans)
        })
        .collect();

    lines.push(Line::default());
    if let Some(err) = field_error {
        lines.push(Line::from(Span::styled(
            err.message.clone(),
            Style::default().fg(Color::Red),
        )));
    } else if let Some(error) = manager.error() {
        lines.push(Line::from(Span::styled(error, Style::default().fg(Color::Red))));
    } else if app.saving {
        lines.push(Line::from(Span::styled("Saving…", Style::default().fg(Color::Yellow))));
    }

    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), inner);
}

fn render_confirm(frame: &mut Frame, app: &App, area: Rect) {
    let Some(pending) = &app.pending_delete else {
        return;
    };

    let dialog_area = centered_rect(56.min(area.width.saturating_sub(4)), 5, area);
    frame.render_widget(Clear, dialog_area);

    let block = Block::default()
        .title(" Confirm delete ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Red));
    let inner = block.inner(dialog_area);
    frame.render_widget(block, dialog_area);

    let text = vec![
        Line::from(Span::styled(pending.prompt.as_str(), Style::default().fg(Color::White))),
        Line::from(Span::styled("(y/n)", Style::default().fg(Color::DarkGray))),
    ];
    frame.render_widget(Paragraph::new(text).wrap(Wrap { trim: true }), inner);
}

fn render_password_form(frame: &mut Frame, app: &App, area: Rect) {
    let dialog_area = centered_rect(56.min(area.width.saturating_sub(4)), 9, area);
    frame.render_widget(Clear, dialog_area);

    let block = Block::default()
        .title(" 🔐 Change Password ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    let inner = block.inner(dialog_area);
    frame.render_widget(block, dialog_area);

    let form = app.password.form();
    let mut lines: Vec<Line> = PasswordChangeForm::FIELDS
        .iter()
        .enumerate()
        .map(|(i, (name, label))| {
            let focused = i == app.password_field;
            let masked = "•".repeat(form.field(name).unwrap_or_default().chars().count());
            let label_style = if focused {
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::DarkGray)
            };
            let mut spans = vec![
                Span::styled(format!("{label:>20}: "), label_style),
                Span::styled(masked, Style::default().fg(Color::Yellow)),
            ];
            if focused {
                spans.push(Span::styled("_", Style::default().add_modifier(Modifier::SLOW_BLINK)));
            }
            Line::from(spans)
        })
        .collect();

    lines.push(Line::default());
    if let Some(error) = app.password.error() {
        lines.push(Line::from(Span::styled(error, Style::default().fg(Color::Red))));
    } else if app.saving {
        lines.push(Line::from(Span::styled("Saving…", Style::default().fg(Color::Yellow))));
    }

    frame.render_widget(Paragraph::new(lines), inner);
}

/// Render the quick-find overlay.
fn render_palette(frame: &mut Frame, app: &App, area: Rect) {
    let dialog_width = 60.min(area.width.saturating_sub(4));
    let dialog_height = 15.min(area.height.saturating_sub(4));
    let dialog_area = centered_rect(dialog_width, dialog_height, area);

    frame.render_widget(Clear, dialog_area);

    let block = Block::default()
        .title(" 🔍 Find client or staff ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Magenta));

    let inner = block.inner(dialog_area);
    frame.render_widget(block, dialog_area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(1)])
        .split(inner);

    let input_line = Line::from(vec![
        Span::styled("▸ ", Style::default().fg(Color::Magenta)),
        Span::styled(&app.palette.query, Style::default().fg(Color::White)),
        Span::styled("_", Style::default().fg(Color::White).add_modifier(Modifier::SLOW_BLINK)),
    ]);
    frame.render_widget(Paragraph::new(input_line), chunks[0]);

    if !app.palette.hits.is_empty() {
        let items: Vec<ListItem> = app
            .palette
            .hits
            .iter()
            .enumerate()
            .map(|(i, hit)| {
                let style = if i == app.palette.selected {
                    Style::default()
                        .bg(Color::Rgb(60, 40, 80))
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(Color::White)
                };
                let icon = match hit.candidate.target {
                    Target::Client(_) => "🏠 ",
                    Target::Staff(_) => "🚚 ",
                };

                let line = Line::from(vec![
                    Span::raw(icon),
                    Span::styled(hit.candidate.title.as_str(), style),
                    Span::raw(" "),
                    Span::styled(hit.candidate.detail.as_str(), Style::default().fg(Color::DarkGray)),
                ]);
                ListItem::new(line).style(style)
            })
            .collect();

        frame.render_widget(List::new(items), chunks[1]);
    } else if !app.palette.query.is_empty() {
        let no_results = Paragraph::new("No results found")
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center);
        frame.render_widget(no_results, chunks[1]);
    }
}

/// Render the delivery metrics screen.
fn render_dashboard(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .title(" Dashboard ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Query
            Constraint::Length(1), // Status
            Constraint::Length(3), // Cards
            Constraint::Length(1), // Summary
            Constraint::Min(4),    // Tables
        ])
        .split(inner);

    let query = app.dashboard.query;
    let shift = query.shift.map_or("All", |shift| shift.as_str());
    let query_line = Line::from(vec![
        Span::styled("Date: ", Style::default().fg(Color::DarkGray)),
        Span::styled(query.date.format("%Y-%m-%d").to_string(), Style::default().fg(Color::White)),
        Span::styled("   Shift: ", Style::default().fg(Color::DarkGray)),
        Span::styled(shift, Style::default().fg(Color::White)),
    ]);
    frame.render_widget(Paragraph::new(query_line), chunks[0]);

    let state = app.dashboard.state();
    let status = match state {
        DashboardState::Loading { .. } => {
            Span::styled("Loading dashboard…", Style::default().fg(Color::Yellow))
        }
        DashboardState::Failed { message, .. } => {
            Span::styled(message.as_str(), Style::default().fg(Color::Red))
        }
        DashboardState::Idle | DashboardState::Loaded(_) => Span::raw(""),
    };
    frame.render_widget(Paragraph::new(Line::from(status)), chunks[1]);

    let Some(data) = state.data() else {
        return;
    };

    render_cards(frame, data, chunks[2]);

    let summary = &data.delivery_summary;
    let summary_line = format!(
        "Deliveries: {}/{} delivered ({:.1}%) | Delivered {:.1} L of {:.1} L assigned | Revenue {}",
        summary.delivered,
        summary.total_deliveries,
        summary.success_rate,
        summary.total_quantity,
        data.assignment_status.total_quantity_assigned,
        format_inr(summary.total_revenue),
    );
    frame.render_widget(
        Paragraph::new(summary_line).style(Style::default().fg(Color::White)),
        chunks[3],
    );

    render_dashboard_tables(frame, data, chunks[4]);
}

fn render_cards(frame: &mut Frame, data: &DashboardData, area: Rect) {
    let cards = [
        ("Clients", data.counts.total_clients.to_string()),
        ("Staff", data.counts.total_staff.to_string()),
        ("Today", format!("{:.1} L", data.today.quantity)),
        ("Today's revenue", format_inr(data.today.revenue)),
        ("Monthly revenue", format_inr(data.monthly.revenue)),
        ("Success rate", format!("{:.1}%", data.today.success_rate)),
    ];

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(cards.iter().map(|_| Constraint::Ratio(1, cards.len() as u32)))
        .split(area);

    for ((title, value), column) in cards.into_iter().zip(columns.iter()) {
        let card = Paragraph::new(value)
            .style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD))
            .alignment(Alignment::Center)
            .block(
                Block::default()
                    .title(Span::styled(format!(" {title} "), Style::default().fg(Color::DarkGray)))
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::DarkGray)),
            );
        frame.render_widget(card, *column);
    }
}

fn render_dashboard_tables(frame: &mut Frame, data: &DashboardData, area: Rect) {
    let halves = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);
    let left = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(halves[0]);
    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(halves[1]);

    let priority = data
        .priority_clients
        .iter()
        .map(|c| {
            vec![
                c.name.clone(),
                c.location.clone(),
                c.time_shift.clone(),
                format!("{:.1}", c.quantity),
                c.delivery_status.clone(),
            ]
        })
        .collect();
    frame.render_widget(
        data_table(" ★ Priority clients ", &["Name", "Location", "Shift", "Qty", "Status"], priority),
        left[0],
    );

    let shifts = data
        .shift_analytics
        .iter()
        .map(|s| {
            vec![
                s.shift.clone(),
                format!("{}/{}", s.delivered_count, s.delivery_count),
                format!("{:.1}%", s.success_rate),
                format!("{:.1}", s.total_quantity),
                format_inr(s.total_revenue),
            ]
        })
        .collect();
    frame.render_widget(
        data_table(" Shifts ", &["Shift", "Delivered", "Success", "Qty", "Revenue"], shifts),
        left[1],
    );

    let staff = data
        .staff_performance
        .iter()
        .map(|s| {
            vec![
                s.staff_name.clone(),
                s.delivered_count.to_string(),
                s.not_delivered_count.to_string(),
                format!("{:.1}%", s.success_rate),
                format_inr(s.total_revenue),
            ]
        })
        .collect();
    frame.render_widget(
        data_table(" Staff performance ", &["Staff", "Done", "Missed", "Success", "Revenue"], staff),
        right[0],
    );

    let deliveries = data
        .delivery_records
        .iter()
        .map(|d| {
            vec![
                d.client_name.clone(),
                d.staff.clone(),
                d.shift.clone(),
                format!("{:.1}", d.quantity),
                d.status.clone(),
            ]
        })
        .collect();
    frame.render_widget(
        data_table(" Deliveries ", &["Client", "Staff", "Shift", "Qty", "Status"], deliveries),
        right[1],
    );
}

fn data_table<'a>(title: &'a str, columns: &'a [&'a str], rows: Vec<Vec<String>>) -> Table<'a> {
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));

    let header = Row::new(columns.iter().map(|c| Cell::from(*c)))
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD));
    let empty = rows.is_empty();
    let mut rows: Vec<Row> = rows.into_iter().map(Row::new).collect();
    if empty {
        rows.push(Row::new(["No data"]).style(Style::default().fg(Color::DarkGray)));
    }

    Table::new(rows, columns.iter().map(|_| Constraint::Fill(1)))
        .header(header)
        .block(block)
}

/// Helper to create a centered rectangle.
fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width.min(area.width), height.min(area.height))
}
