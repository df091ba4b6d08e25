//! Scrolling marquee strip.

use super::media::render_media;
use crate::data::page::MARQUEE_CARD_HEIGHT;
use crate::theme::{blend, SiteTheme};
use crate::widgets::{MarqueeState, MediaSlot};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
};

/// Widest edge fade, cells
const MAX_FADE: u16 = 10;

/// Draw the three-copy track at the state's current offset, then fade
/// both edges into the page background.
pub fn render_marquee(
    state: &MarqueeState,
    items: &[MediaSlot],
    area: Rect,
    buf: &mut Buffer,
    theme: &SiteTheme,
) {
    if area.is_empty() || items.is_empty() {
        return;
    }
    let card_height = MARQUEE_CARD_HEIGHT.min(area.height);
    let card_y = area.y + area.height.saturating_sub(card_height) / 2;
    let item_width = state.item_width().max(1);
    let offset = state.offset().round() as i64;

    // One offscreen card per item, reused for every copy on the track
    let cards: Vec<Buffer> = items
        .iter()
        .map(|slot| {
            let mut card = Buffer::empty(Rect::new(0, 0, item_width, card_height));
            render_media(slot, card.area, &mut card, theme);
            card
        })
        .collect();

    for (slot_index, item) in state.track().enumerate() {
        let left = offset + slot_index as i64 * state.pitch() as i64;
        if left >= area.width as i64 {
            break;
        }
        if left + item_width as i64 <= 0 {
            continue;
        }
        let Some(card) = cards.get(item) else {
            continue;
        };
        for cx in 0..item_width {
            let x = left + cx as i64;
            if x < 0 || x >= area.width as i64 {
                continue;
            }
            for cy in 0..card_height {
                if let (Some(src), Some(dst)) = (
                    card.cell((cx, cy)).cloned(),
                    buf.cell_mut((area.x + x as u16, card_y + cy)),
                ) {
                    *dst = src;
                }
            }
        }
    }

    fade_edges(buf, area, theme.page_background);

    if state.is_paused() {
        buf.set_string(
            area.right().saturating_sub(3),
            area.y,
            "⏸",
            Style::default().fg(theme.primary.shade(600)),
        );
    }
}

/// Blend the leftmost and rightmost columns toward `edge`
fn fade_edges(buf: &mut Buffer, area: Rect, edge: Color) {
    let fade = MAX_FADE.min(area.width / 6);
    if fade == 0 {
        return;
    }
    for i in 0..fade {
        // 1.0 at the very edge, falling off inward
        let strength = 1.0 - i as f32 / fade as f32;
        for x in [area.x + i, area.right() - 1 - i] {
            for y in area.top()..area.bottom() {
                if let Some(cell) = buf.cell_mut((x, y)) {
                    let bg = if cell.bg == Color::Reset { edge } else { cell.bg };
                    cell.bg = blend(bg, edge, strength);
                    if cell.fg != Color::Reset {
                        cell.fg = blend(cell.fg, edge, strength);
                    }
                }
            }
        }
    }
}
