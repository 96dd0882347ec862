use crate::config::Align;
use crate::dashboard::{
    fit_key_hints, key_hints, Controller, EditSession, FooterKind, Overlay, ViewMode,
};
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Clear, Padding, Paragraph, Row, Table, TableState, Wrap};
use ratatui::Frame;

pub const DEFAULT_ACCENT: Color = Color::Cyan;
const SELECTOR_MATCH_LIMIT: usize = 8;

const HELP_LINES: [(&str, &str); 14] = [
    ("Up/Down, j/k", "move selection"),
    ("Home/End, g/G", "first / last row"),
    ("Enter", "open related resource"),
    ("Esc", "back to previous view"),
    ("PgDn, Ctrl-F", "next page"),
    ("PgUp, Ctrl-B", "previous page"),
    ("1-9", "jump to breadcrumb level"),
    (":", "switch root context"),
    ("Ctrl-E", "next environment"),
    ("r", "toggle auto-refresh"),
    ("e", "edit selected row"),
    ("Ctrl-D", "delete instance (press twice)"),
    ("?", "this help"),
    ("Ctrl-C", "quit"),
];

/// Accent color for an environment; unknown names fall back to the default.
pub fn accent_color(ui_color: Option<&str>) -> Color {
    ui_color
        .and_then(|raw| raw.trim().parse::<Color>().ok())
        .unwrap_or(DEFAULT_ACCENT)
}

fn alignment(align: Align) -> Alignment {
    match align {
        Align::Left => Alignment::Left,
        Align::Right => Alignment::Right,
        Align::Center => Alignment::Center,
    }
}

pub fn draw_dashboard(frame: &mut Frame, controller: &Controller, accent: Color) {
    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .split(frame.area());

    frame.render_widget(header(controller, accent), sections[0]);
    draw_table(frame, controller, accent, sections[1]);
    frame.render_widget(footer(controller, sections[2].width), sections[2]);

    match controller.overlay() {
        Overlay::None => {}
        Overlay::Help => draw_help(frame, accent),
        Overlay::ConfirmDelete { instance_id } => draw_confirm_delete(frame, instance_id),
        Overlay::Edit(session) => {
            draw_edit(frame, session, &controller.user_suggestions(), accent)
        }
        Overlay::ContextSelector { input } => draw_selector(frame, controller, input, accent),
    }
}

fn page_label(controller: &Controller) -> String {
    let view = controller.view();
    let rows = view.table.records().len() as u64;
    if view.mode == ViewMode::Variables {
        return format!("{rows} variables");
    }
    let page = controller.page_state();
    let total = page
        .total
        .map(|total| total.to_string())
        .unwrap_or_else(|| "?".to_string());
    if rows == 0 {
        return format!("0 of {total}");
    }
    format!("{}-{} of {total}", page.offset + 1, page.offset + rows)
}

fn header(controller: &Controller, accent: Color) -> Paragraph<'static> {
    let view = controller.view();
    let mut status = vec![
        Span::styled(
            "flowscope",
            Style::default().fg(accent).add_modifier(Modifier::BOLD),
        ),
        Span::raw(format!("  env: {}", controller.environment())),
        Span::raw(format!("  {}", page_label(controller))),
    ];
    if controller.auto_refresh() {
        status.push(Span::styled(
            "  [auto-refresh]",
            Style::default().fg(Color::Yellow),
        ));
    }

    let mut crumbs = Vec::new();
    for (index, resource) in view.breadcrumb.iter().enumerate() {
        if index > 0 {
            crumbs.push(Span::raw(" > "));
        }
        let style = if index + 1 == view.breadcrumb.len() {
            Style::default().fg(accent).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray)
        };
        crumbs.push(Span::styled(format!("{}:{resource}", index + 1), style));
    }

    Paragraph::new(vec![Line::from(status), Line::from(crumbs)])
}

fn draw_table(frame: &mut Frame, controller: &Controller, accent: Color, area: Rect) {
    let table = &controller.view().table;
    let header = Row::new(table.columns().iter().map(|column| {
        Cell::from(Line::from(column.title.clone()).alignment(alignment(column.align)))
    }))
    .style(Style::default().add_modifier(Modifier::BOLD));
    let rows = table.rows().iter().map(|row| {
        Row::new(row.iter().zip(table.columns()).map(|(cell, column)| {
            Cell::from(Line::from(cell.clone()).alignment(alignment(column.align)))
        }))
    });
    let widths = table
        .columns()
        .iter()
        .map(|column| Constraint::Length(column.width))
        .collect::<Vec<_>>();

    let widget = Table::new(rows, widths)
        .header(header)
        .column_spacing(0)
        .highlight_style(
            Style::default()
                .fg(Color::Black)
                .bg(accent)
                .add_modifier(Modifier::BOLD),
        )
        .block(
            Block::default()
                .title(controller.view().header.clone())
                .borders(Borders::ALL)
                .border_style(Style::default().fg(accent))
                .padding(Padding::horizontal(1)),
        );
    let mut state = TableState::default().with_selected(Some(table.cursor()));
    frame.render_stateful_widget(widget, area, &mut state);
}

fn footer(controller: &Controller, width: u16) -> Paragraph<'static> {
    if let Some(footer) = controller.footer() {
        let color = match footer.kind {
            FooterKind::Info => Color::Green,
            FooterKind::Error => Color::Red,
        };
        return Paragraph::new(Line::styled(
            footer.text.clone(),
            Style::default().fg(color),
        ));
    }
    if controller.is_loading() {
        return Paragraph::new(Line::styled(
            "Loading...",
            Style::default().fg(Color::Yellow),
        ));
    }
    let view = controller.view();
    let hints = key_hints(
        view.mode,
        controller.has_editable_columns(),
        controller.auto_refresh(),
        controller.has_history(),
    );
    let latency = controller
        .last_latency()
        .map(|latency| format!("{}ms", latency.as_millis()));
    let reserved = latency.as_ref().map_or(0, |label| label.len() + 2);
    let mut spans = vec![Span::styled(
        fit_key_hints(&hints, usize::from(width).saturating_sub(reserved)),
        Style::default().fg(Color::DarkGray),
    )];
    if let Some(label) = latency {
        spans.push(Span::raw("  "));
        spans.push(Span::styled(label, Style::default().fg(Color::Gray)));
    }
    Paragraph::new(Line::from(spans))
}

fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

fn popup(title: &str, accent: Color) -> Block<'static> {
    Block::default()
        .title(title.to_string())
        .borders(Borders::ALL)
        .border_style(Style::default().fg(accent))
        .padding(Padding::horizontal(1))
}

fn draw_help(frame: &mut Frame, accent: Color) {
    let lines = HELP_LINES
        .iter()
        .map(|(keys, description)| {
            Line::from(vec![
                Span::styled(
                    format!("{keys:<16}"),
                    Style::default().add_modifier(Modifier::BOLD),
                ),
                Span::raw(*description),
            ])
        })
        .collect::<Vec<_>>();
    let area = centered_rect(frame.area(), 52, HELP_LINES.len() as u16 + 2);
    frame.render_widget(Clear, area);
    frame.render_widget(
        Paragraph::new(lines).block(popup("Help (any key closes)", accent)),
        area,
    );
}

fn draw_confirm_delete(frame: &mut Frame, instance_id: &str) {
    let lines = vec![
        Line::raw(format!("Delete process instance {instance_id}?")),
        Line::raw(""),
        Line::styled(
            "Ctrl-D again to confirm, any other key cancels",
            Style::default().fg(Color::Gray),
        ),
    ];
    let area = centered_rect(frame.area(), 60, 5);
    frame.render_widget(Clear, area);
    frame.render_widget(
        Paragraph::new(lines)
            .wrap(Wrap { trim: true })
            .block(popup("Confirm delete", Color::Red)),
        area,
    );
}

fn draw_edit(frame: &mut Frame, session: &EditSession, suggestions: &[&str], accent: Color) {
    let mut lines = session
        .columns
        .iter()
        .enumerate()
        .map(|(position, column)| {
            let label = format!("{} ({})", column.title, column.input_type.as_str());
            if position == session.position {
                Line::styled(
                    format!("> {label}"),
                    Style::default().fg(accent).add_modifier(Modifier::BOLD),
                )
            } else {
                Line::raw(format!("  {label}"))
            }
        })
        .collect::<Vec<_>>();
    lines.push(Line::raw(""));
    lines.push(Line::raw(format!("value> {}█", session.input)));
    if let Some(error) = &session.error {
        lines.push(Line::styled(
            format!("Error: {error}"),
            Style::default().fg(Color::Red),
        ));
    }
    if !suggestions.is_empty() {
        lines.push(Line::styled(
            format!("Suggestions: {}", suggestions.join(", ")),
            Style::default().fg(Color::Gray),
        ));
    }
    let save = if session.can_save() {
        Span::styled(
            "[Save]",
            Style::default().fg(Color::Black).bg(accent).add_modifier(Modifier::BOLD),
        )
    } else {
        Span::styled("[Save]", Style::default().fg(Color::Gray).bg(Color::DarkGray))
    };
    lines.push(Line::from(vec![
        save,
        Span::styled(
            "  Tab/Shift-Tab column  Space toggle  Enter save  Esc cancel",
            Style::default().fg(Color::DarkGray),
        ),
    ]));
    let height = lines.len() as u16 + 2;
    let area = centered_rect(frame.area(), 64, height);
    frame.render_widget(Clear, area);
    frame.render_widget(
        Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .block(popup("Edit", accent)),
        area,
    );
}

fn draw_selector(frame: &mut Frame, controller: &Controller, input: &str, accent: Color) {
    let prefix = input.trim();
    let mut lines = vec![Line::raw(format!(": {input}█")), Line::raw("")];
    lines.extend(
        controller
            .roots()
            .iter()
            .filter(|root| root.starts_with(prefix))
            .take(SELECTOR_MATCH_LIMIT)
            .map(|root| Line::styled(root.clone(), Style::default().fg(Color::Gray))),
    );
    let height = lines.len() as u16 + 2;
    let area = centered_rect(frame.area(), 48, height);
    frame.render_widget(Clear, area);
    frame.render_widget(
        Paragraph::new(lines).block(popup("Context (Tab completes)", accent)),
        area,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{TableCatalog, TableDef};
    use crate::dashboard::Msg;
    use crate::engine::{EngineReply, FetchOutcome, FetchPayload, ProcessDefinition};
    use crate::shared::Logger;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    fn rendered(controller: &Controller) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 20)).expect("terminal");
        terminal
            .draw(|frame| draw_dashboard(frame, controller, DEFAULT_ACCENT))
            .expect("draw");
        terminal
            .backend()
            .buffer()
            .content
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    fn controller() -> Controller {
        controller_with(TableCatalog::default())
    }

    fn controller_with(catalog: TableCatalog) -> Controller {
        let mut controller = Controller::new(
            catalog,
            vec!["local".to_string()],
            "local".to_string(),
            Logger::disabled(),
        );
        controller.update(Msg::Resize {
            width: 100,
            height: 20,
        });
        controller
    }

    #[test]
    fn accent_colors_parse_hex_and_names() {
        assert_eq!(accent_color(Some("#00A0FF")), Color::Rgb(0, 160, 255));
        assert_eq!(accent_color(Some("red")), Color::Red);
        assert_eq!(accent_color(Some("not a color")), DEFAULT_ACCENT);
        assert_eq!(accent_color(None), DEFAULT_ACCENT);
    }

    #[test]
    fn dashboard_shows_breadcrumb_and_key_hints() {
        let text = rendered(&controller());
        assert!(text.contains("env: local"));
        assert!(text.contains("1:process-definitions"));
        assert!(text.contains("<?> help"));
    }

    /// Answers the first fetch issued by `start`.
    fn load_definitions(controller: &mut Controller) {
        controller.update(Msg::Engine(EngineReply::Fetched {
            generation: 1,
            result: Ok(FetchOutcome {
                resource: "process-definitions".to_string(),
                payload: FetchPayload::Definitions(vec![ProcessDefinition {
                    key: "invoice".to_string(),
                    name: Some("Invoice".to_string()),
                    ..ProcessDefinition::default()
                }]),
                total: Some(1),
            }),
        }));
    }

    #[test]
    fn footer_shows_loading_then_latency() {
        let mut controller = controller();
        controller.start();
        let text = rendered(&controller);
        assert!(text.contains("Loading..."));

        load_definitions(&mut controller);
        let text = rendered(&controller);
        assert!(!text.contains("Loading..."));
        assert!(text.contains("ms"));
        assert!(text.contains("<?> help"));
    }

    #[test]
    fn configured_alignment_applies_to_header_and_cells() {
        let table: TableDef = serde_yaml::from_str(
            "name: process-definitions\ncolumns: [{name: key, align: right}, {name: name}]",
        )
        .expect("parse table");
        let mut controller = controller_with(TableCatalog::new(vec![table]));
        controller.start();
        load_definitions(&mut controller);
        let text = rendered(&controller);
        assert!(text.contains("KEYNAME"));
        assert!(text.contains("invoiceInvoice"));
    }

    #[test]
    fn help_overlay_lists_keys() {
        let mut controller = controller();
        controller.update(Msg::Key(KeyEvent::new(
            KeyCode::Char('?'),
            KeyModifiers::NONE,
        )));
        let text = rendered(&controller);
        assert!(text.contains("Help (any key closes)"));
        assert!(text.contains("jump to breadcrumb level"));
    }
}
