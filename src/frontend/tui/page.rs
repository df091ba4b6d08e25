//! Whole-screen rendering: section backgrounds, blocks, navbar, overlay.

use super::blocks::render_block;
use super::navbar::render_navbar;
use super::performance_stats::{PerformanceStatsWidget, OVERLAY_WIDTH};
use super::reveal::{blit, CellMetrics};
use crate::core::{AppCore, NAVBAR_HEIGHT};
use crate::theme::SiteTheme;
use ratatui::{buffer::Buffer, layout::Rect};
use std::time::Instant;

/// Rows above/below the viewport still drawn, so sliding blocks can enter
const OFFSCREEN_MARGIN: i32 = 4;

/// Draw everything for the current frame.
pub fn render_site(core: &AppCore, area: Rect, buf: &mut Buffer, theme: &SiteTheme, now: Instant) {
    let page = Rect::new(
        area.x,
        area.y + NAVBAR_HEIGHT.min(area.height),
        area.width,
        area.height.saturating_sub(NAVBAR_HEIGHT),
    );
    render_page(core, page, buf, theme, now);
    render_navbar(core, area, buf, theme);

    if core.show_perf_stats {
        let widget = PerformanceStatsWidget::new().with_border_color(theme.primary.shade(300));
        let width = OVERLAY_WIDTH.min(page.width);
        let overlay = Rect::new(
            page.right().saturating_sub(width),
            page.y,
            width,
            widget.height().min(page.height),
        );
        widget.render(
            overlay,
            buf,
            &core.perf_stats,
            (core.nav.offset(), core.nav.max_offset()),
        );
    }
}

/// Section backgrounds plus every block near the viewport
pub fn render_page(core: &AppCore, area: Rect, buf: &mut Buffer, theme: &SiteTheme, now: Instant) {
    if area.is_empty() {
        return;
    }
    let row = core.nav.row();

    for y in area.top()..area.bottom() {
        let page_y = row + (y - area.y) as i32;
        let tone = core
            .layout
            .section_at(page_y)
            .map(|s| core.site.sections[s].tone);
        for x in area.left()..area.right() {
            let bg = match tone {
                Some(tone) => theme.section_background(tone, x - area.x, area.width),
                None => theme.page_background,
            };
            if let Some(cell) = buf.cell_mut((x, y)) {
                cell.reset();
                cell.bg = bg;
            }
        }
    }

    let metrics = CellMetrics {
        width_px: core.config.ui.cell_width_px,
        height_px: core.config.ui.cell_height_px,
    };
    let top = row - OFFSCREEN_MARGIN;
    let bottom = row + area.height as i32 + OFFSCREEN_MARGIN;

    for (i, placed) in core.layout.blocks().iter().enumerate() {
        let bounds = placed.bounds;
        if bounds.bottom() < top || bounds.y > bottom {
            continue;
        }
        let style = core.blocks[i].reveal.current(now);
        if style.opacity <= 0.0 {
            continue;
        }

        let mut block_buf = Buffer::empty(Rect::new(0, 0, bounds.width, bounds.height));
        render_block(core, i, block_buf.area, &mut block_buf, theme, now);

        let origin = (
            area.x as i32 + bounds.x,
            area.y as i32 + bounds.y - row,
        );
        blit(&block_buf, buf, origin, area, &style, metrics);
    }
}
