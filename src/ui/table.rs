use ratatui::Frame;
use ratatui::layout::{Constraint, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::Span;
use ratatui::widgets::{Block, Borders, Cell, Row, Table, TableState};

use crate::app::SortMode;
use crate::format::{elapsed_time, truncate_unicode};
use crate::system::process::ProcessInfo;
use crate::ui::theme::Theme;

const COLUMNS: [(&str, SortMode); 4] = [
    ("PID", SortMode::Pid),
    ("USER", SortMode::User),
    ("CPU%", SortMode::Cpu),
    ("RAM", SortMode::Memory),
];

pub fn render(
    frame: &mut Frame,
    area: Rect,
    rows: &[&ProcessInfo],
    selected_index: usize,
    sort_mode: SortMode,
    theme: &Theme,
) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.overlay_border));

    // Generous upper bound; the layout clips the COMMAND column anyway.
    let command_width = area.width as usize;

    let header_cells = COLUMNS
        .iter()
        .map(|(label, mode)| header_cell(label, *mode == sort_mode, theme))
        .chain([
            header_cell("UPTIME", false, theme),
            header_cell("COMMAND", false, theme),
        ]);
    let header = Row::new(header_cells).height(1);

    let body = rows.iter().map(|p| {
        Row::new([
            Cell::from(p.pid.to_string()),
            Cell::from(p.user.clone()),
            Cell::from(format!("{:.1}", p.cpu_percent)),
            Cell::from(p.ram_label.clone()),
            Cell::from(elapsed_time(p.uptime_secs)),
            Cell::from(truncate_unicode(&p.command, command_width)),
        ])
        .style(Style::default().fg(theme.text_primary))
    });

    let widths = [
        Constraint::Length(7),
        Constraint::Length(10),
        Constraint::Length(6),
        Constraint::Length(8),
        Constraint::Length(10),
        Constraint::Min(20),
    ];

    let table = Table::new(body, widths)
        .header(header)
        .block(block)
        .column_spacing(1)
        .row_highlight_style(
            Style::default()
                .fg(theme.selection_fg)
                .bg(theme.selection_bg)
                .add_modifier(Modifier::BOLD),
        );

    let mut state = TableState::default();
    if !rows.is_empty() {
        state.select(Some(selected_index.min(rows.len() - 1)));
    }
    frame.render_stateful_widget(table, area, &mut state);
}

fn header_cell<'a>(label: &'a str, active: bool, theme: &Theme) -> Cell<'a> {
    let mut style = Style::default()
        .fg(theme.table_header_fg)
        .add_modifier(Modifier::BOLD);
    if active {
        style = style.add_modifier(Modifier::UNDERLINED);
    }
    Cell::from(Span::styled(label, style))
}
