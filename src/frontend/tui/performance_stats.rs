//! Terminal-oriented performance statistics widget.
//!
//! The `PerformanceStatsWidget` renders the metrics gathered by
//! `crate::performance::PerformanceStats` as a compact block of labeled
//! values. The page draws it as an overlay in the top-right corner when the
//! stats are toggled on.

use crate::performance::PerformanceStats;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph, Widget as RatatuiWidget},
};

/// Overlay width including the border
pub const OVERLAY_WIDTH: u16 = 34;

/// Labeled block that surfaces frame timing, page activity and uptime.
pub struct PerformanceStatsWidget {
    border_color: Color,
    background_color: Option<Color>,
}

impl Default for PerformanceStatsWidget {
    fn default() -> Self {
        Self::new()
    }
}

impl PerformanceStatsWidget {
    /// Create a widget with sensible defaults (gray border, black fill).
    pub fn new() -> Self {
        Self {
            border_color: Color::Gray,
            background_color: Some(Color::Black),
        }
    }

    /// Override the color used for every border segment.
    pub fn with_border_color(mut self, color: Color) -> Self {
        self.border_color = color;
        self
    }

    /// Height needed to show every line
    pub fn height(&self) -> u16 {
        Self::LINES + 2
    }

    const LINES: u16 = 9;

    fn label(text: &str, color: Color) -> Span<'_> {
        Span::styled(text, Style::default().fg(color))
    }

    fn value(text: String) -> Span<'static> {
        Span::styled(text, Style::default().fg(Color::White))
    }

    /// Render the widget into the provided buffer.
    ///
    /// `scroll` is the (current, maximum) page offset in rows.
    pub fn render(&self, area: Rect, buf: &mut Buffer, stats: &PerformanceStats, scroll: (f32, f32)) {
        let area = area.intersection(buf.area);
        if area.is_empty() {
            return;
        }

        // Fill background so page content doesn't show through
        if let Some(bg_color) = self.background_color {
            for y in area.top()..area.bottom() {
                for x in area.left()..area.right() {
                    buf[(x, y)].set_char(' ').set_bg(bg_color).set_fg(Color::Reset);
                }
            }
        }

        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Plain)
            .border_style(Style::default().fg(self.border_color))
            .title("Performance Stats");
        let inner = block.inner(area);
        block.render(area, buf);

        let lines = vec![
            Line::from(vec![
                Self::label("FPS: ", Color::Cyan),
                Self::value(format!("{:.1}", stats.fps())),
            ]),
            Line::from(vec![
                Self::label("Frame: ", Color::Cyan),
                Self::value(format!(
                    "{:.2}ms (max: {:.2})",
                    stats.avg_frame_time_ms(),
                    stats.max_frame_time_ms()
                )),
            ]),
            Line::from(vec![
                Self::label("Render: ", Color::Cyan),
                Self::value(format!(
                    "{:.2}ms (max: {:.2})",
                    stats.avg_render_time_ms(),
                    stats.max_render_time_ms()
                )),
            ]),
            Line::from(vec![
                Self::label("Events: ", Color::Magenta),
                Self::value(format!(
                    "{} ({:.0}μs avg)",
                    stats.total_events_processed(),
                    stats.avg_event_process_time_us()
                )),
            ]),
            Line::from(""),
            Line::from(vec![
                Self::label("Blocks: ", Color::Green),
                Self::value(format!(
                    "{} visible, {} animating",
                    stats.visible_blocks(),
                    stats.animating_blocks()
                )),
            ]),
            Line::from(vec![
                Self::label("Slides: ", Color::Green),
                Self::value(format!("{} ticks", stats.carousel_ticks())),
            ]),
            Line::from(vec![
                Self::label("Scroll: ", Color::Yellow),
                Self::value(format!("{:.1} / {:.0}", scroll.0, scroll.1)),
            ]),
            Line::from(vec![
                Self::label("Uptime: ", Color::Yellow),
                Self::value(stats.uptime_formatted()),
            ]),
        ];

        Paragraph::new(lines).render(inner, buf);
    }
}
