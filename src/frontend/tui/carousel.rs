//! Gallery carousel renderer.
//!
//! Reads `CarouselState` and draws the slide strip, indicator dots and counter.

use super::media::{put_centered, render_media};
use crate::theme::SiteTheme;
use crate::widgets::{CarouselState, MediaSlot};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
};
use std::time::Instant;

/// Slides on a horizontal row translated by `-100% × position`, dots under
/// them and an `n / total` counter in the corner.
pub fn render_carousel(
    state: &CarouselState,
    slides: &[MediaSlot],
    area: Rect,
    buf: &mut Buffer,
    theme: &SiteTheme,
    now: Instant,
) {
    if area.height < 2 || area.width == 0 || slides.is_empty() {
        return;
    }
    let track = Rect::new(area.x, area.y, area.width, area.height - 1);
    let width = track.width as f32;
    let position = state.position(now);

    for (i, slide) in slides.iter().enumerate() {
        let shift = ((i as f32 - position) * width).round() as i32;
        if shift.unsigned_abs() >= track.width as u32 {
            continue;
        }
        // Draw the whole slide offscreen, then copy the part inside the track
        let mut slide_buf = Buffer::empty(Rect::new(0, 0, track.width, track.height));
        render_media(slide, slide_buf.area, &mut slide_buf, theme);
        for sx in 0..track.width {
            let x = sx as i32 + shift;
            if x < 0 || x >= track.width as i32 {
                continue;
            }
            for sy in 0..track.height {
                if let (Some(src), Some(dst)) = (
                    slide_buf.cell((sx, sy)).cloned(),
                    buf.cell_mut((track.x + x as u16, track.y + sy)),
                ) {
                    *dst = src;
                }
            }
        }
    }

    let counter = state.counter_label();
    buf.set_string(
        track.right().saturating_sub(counter.len() as u16 + 2),
        track.y,
        format!(" {} ", counter),
        Style::default()
            .fg(theme.page_background)
            .bg(theme.primary.shade(700))
            .add_modifier(Modifier::BOLD),
    );

    let dots: Vec<&str> = (0..state.len())
        .map(|i| if state.is_current(i) { "●" } else { "○" })
        .collect();
    put_centered(
        buf,
        area,
        area.bottom() - 1,
        &dots.join(" "),
        Style::default().fg(theme.primary.shade(500)),
    );
}
