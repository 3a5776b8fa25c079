use std::collections::VecDeque;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Gauge, Paragraph, Sparkline};

use crate::format::elapsed_time;
use crate::system::snapshot::SystemSnapshot;
use crate::ui::theme::Theme;

pub fn render(
    frame: &mut Frame,
    area: Rect,
    snapshot: &SystemSnapshot,
    theme: &Theme,
    cpu_history: &VecDeque<u64>,
) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(44),
            Constraint::Percentage(28),
            Constraint::Percentage(28),
        ])
        .split(area);

    render_identity(frame, chunks[0], snapshot, theme);
    render_memory_gauge(frame, chunks[1], snapshot, theme);
    render_cpu_sparkline(frame, chunks[2], snapshot, theme, cpu_history);
}

fn render_identity(frame: &mut Frame, area: Rect, snapshot: &SystemSnapshot, theme: &Theme) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.overlay_border));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let brand_line = Line::from(vec![
        Span::styled(
            " proctop ",
            Style::default()
                .fg(theme.header_accent_fg)
                .bg(theme.header_accent_bg)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" "),
        Span::styled(
            snapshot.os_name.as_str(),
            Style::default().fg(theme.text_primary),
        ),
        Span::raw("  "),
        Span::styled(
            snapshot.kernel.as_str(),
            Style::default().fg(theme.text_secondary),
        ),
    ]);

    let counters_line = Line::from(vec![
        Span::styled("Up ", Style::default().fg(theme.text_secondary)),
        Span::styled(
            elapsed_time(snapshot.uptime_secs),
            Style::default().fg(theme.text_primary),
        ),
        Span::styled(
            format!(
                "  Procs: {}  Running: {}",
                snapshot.total_processes, snapshot.running_processes
            ),
            Style::default().fg(theme.text_secondary),
        ),
    ]);

    frame.render_widget(Paragraph::new(vec![brand_line, counters_line]), inner);
}

fn render_memory_gauge(frame: &mut Frame, area: Rect, snapshot: &SystemSnapshot, theme: &Theme) {
    let ratio = snapshot.memory_utilization.clamp(0.0, 1.0);

    let mem_block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.overlay_border))
        .title(Span::styled(
            " Memory ",
            Style::default()
                .fg(theme.text_secondary)
                .add_modifier(Modifier::BOLD),
        ));

    let gauge = Gauge::default()
        .block(mem_block)
        .gauge_style(
            Style::default()
                .fg(theme.gauge_filled)
                .bg(theme.gauge_unfilled),
        )
        .ratio(ratio)
        .label(format!("{:.1}%", ratio * 100.0));

    frame.render_widget(gauge, area);
}

fn render_cpu_sparkline(
    frame: &mut Frame,
    area: Rect,
    snapshot: &SystemSnapshot,
    theme: &Theme,
    cpu_history: &VecDeque<u64>,
) {
    let cpu_block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.overlay_border))
        .title(Span::styled(
            format!(" CPU {:.1}% ", snapshot.cpu_utilization * 100.0),
            Style::default()
                .fg(theme.text_secondary)
                .add_modifier(Modifier::BOLD),
        ));

    let cpu_data: Vec<u64> = cpu_history.iter().copied().collect();
    let sparkline = Sparkline::default()
        .block(cpu_block)
        .data(&cpu_data)
        .max(10_000)
        .style(Style::default().fg(theme.sparkline_color));

    frame.render_widget(sparkline, area);
}
