use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Clear, Paragraph};
use unicode_width::UnicodeWidthStr;

use crate::ui::theme::Theme;

// Key column + two-space gutter + description + side padding.
const GUTTER: usize = 2;
const SIDE_PADDING: usize = 2;
const BORDER: u16 = 2;

pub fn render(frame: &mut Frame, area: Rect, entries: &[(String, &str)], theme: &Theme) {
    let overlay = overlay_rect(entries, area);
    frame.render_widget(Clear, overlay);

    let key_col = key_column_width(entries);
    let lines: Vec<Line> = entries
        .iter()
        .map(|(key, desc)| {
            Line::from(vec![
                Span::raw(" "),
                Span::styled(
                    format!("{key:>key_col$}"),
                    Style::default()
                        .fg(theme.pill_key_fg)
                        .bg(theme.pill_key_bg)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::raw("  "),
                Span::styled(desc.to_string(), Style::default().fg(theme.pill_desc_fg)),
            ])
        })
        .collect();

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.overlay_border))
        .title(Span::styled(
            " Keys ",
            Style::default()
                .fg(theme.accent)
                .add_modifier(Modifier::BOLD),
        ));
    let inner = block.inner(overlay);
    frame.render_widget(block, overlay);
    frame.render_widget(
        Paragraph::new(lines).style(Style::default().bg(theme.surface_bg)),
        inner,
    );
}

fn key_column_width(entries: &[(String, &str)]) -> usize {
    entries.iter().map(|(key, _)| key.width()).max().unwrap_or(0)
}

/// Overlay sized to the widest entry and centered in `area`, clamped so a
/// cramped terminal still gets a drawable rect.
fn overlay_rect(entries: &[(String, &str)], area: Rect) -> Rect {
    let key_col = key_column_width(entries);
    let desc_col = entries
        .iter()
        .map(|(_, desc)| desc.width())
        .max()
        .unwrap_or(0);

    let width = ((key_col + GUTTER + desc_col + SIDE_PADDING) as u16 + BORDER).min(area.width);
    let height = (entries.len() as u16 + BORDER).min(area.height);

    let x = area.x + (area.width - width) / 2;
    let y = area.y + (area.height - height) / 2;
    Rect::new(x, y, width, height)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entries() -> Vec<(String, &'static str)> {
        vec![
            ("q".to_string(), "Quit"),
            ("PgUp/PgDn".to_string(), "Jump"),
            ("?".to_string(), "Toggle help"),
        ]
    }

    #[test]
    fn overlay_sized_to_widest_entry() {
        let area = Rect::new(0, 0, 100, 40);
        let overlay = overlay_rect(&entries(), area);
        // key col 9 + gutter 2 + desc 11 + padding 2 + borders 2
        assert_eq!(overlay.width, 26);
        assert_eq!(overlay.height, 5);
    }

    #[test]
    fn overlay_is_centered() {
        let area = Rect::new(0, 0, 100, 41);
        let overlay = overlay_rect(&entries(), area);
        let right_margin = area.width - overlay.x - overlay.width;
        assert!(overlay.x.abs_diff(right_margin) <= 1);
        let bottom_margin = area.height - overlay.y - overlay.height;
        assert!(overlay.y.abs_diff(bottom_margin) <= 1);
    }

    #[test]
    fn overlay_clamps_to_cramped_terminal() {
        let area = Rect::new(0, 0, 10, 3);
        let overlay = overlay_rect(&entries(), area);
        assert!(overlay.width <= area.width);
        assert!(overlay.height <= area.height);
        assert!(overlay.x + overlay.width <= area.width);
        assert!(overlay.y + overlay.height <= area.height);
    }

    #[test]
    fn key_column_matches_longest_key() {
        assert_eq!(key_column_width(&entries()), 9);
        assert_eq!(key_column_width(&[]), 0);
    }
}
