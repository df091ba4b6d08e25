//! Navbar and the compact-mode dropdown menu.

use super::media::fill_gradient;
use crate::core::navigation::{brand_text, nav_item_text, TOGGLE_CLOSED, TOGGLE_OPEN};
use crate::core::{AppCore, NAVBAR_HEIGHT};
use crate::data::page::SIDE_MARGIN;
use crate::theme::SiteTheme;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
};

/// Navbar across the top: brand on the left, section links (or the menu
/// button in compact mode) on the right. Gradient at the top of the page,
/// solid once scrolled.
pub fn render_navbar(core: &AppCore, area: Rect, buf: &mut Buffer, theme: &SiteTheme) {
    let bar = Rect::new(area.x, area.y, area.width, NAVBAR_HEIGHT.min(area.height));
    if bar.is_empty() {
        return;
    }
    let scrolled = core.nav.is_scrolled();
    let (bg, fg) = theme.navbar(scrolled);
    if scrolled {
        fill_gradient(buf, bar, bg, bg);
        // Bottom rule in place of a shadow
        let rule_y = bar.bottom() - 1;
        for x in bar.left()..bar.right() {
            if let Some(cell) = buf.cell_mut((x, rule_y)) {
                cell.set_symbol("─");
                cell.fg = theme.primary.shade(200);
            }
        }
    } else {
        fill_gradient(buf, bar, bg, theme.secondary.shade(300));
    }

    let row = bar.y + bar.height / 2;
    buf.set_stringn(
        bar.x + SIDE_MARGIN,
        row,
        brand_text(&core.site, &core.logo),
        core.navbar.brand_width as usize,
        Style::default().fg(fg).add_modifier(Modifier::BOLD),
    );

    let active = core.nav.active_section(&core.layout);
    for item in &core.navbar.items {
        let Some(section) = core.site.sections.get(item.section) else {
            continue;
        };
        let mut style = Style::default().fg(fg);
        if item.section == active {
            style = style
                .fg(theme.page_background)
                .bg(theme.primary.shade(500))
                .add_modifier(Modifier::BOLD);
        }
        buf.set_stringn(
            bar.x + item.x,
            row,
            nav_item_text(&section.icon, &section.label),
            item.width as usize,
            style,
        );
    }

    if let Some((x, _)) = core.navbar.toggle {
        let symbol = if core.nav.is_menu_open() {
            TOGGLE_OPEN
        } else {
            TOGGLE_CLOSED
        };
        buf.set_string(
            bar.x + x + 1,
            row,
            symbol,
            Style::default().fg(fg).add_modifier(Modifier::BOLD),
        );
    }

    if core.navbar.compact && core.nav.is_menu_open() {
        render_menu(core, area, buf, theme, active);
    }
}

/// Dropdown list of sections under the navbar
fn render_menu(core: &AppCore, area: Rect, buf: &mut Buffer, theme: &SiteTheme, active: usize) {
    let rows = core.navbar.menu_rows.min(area.height.saturating_sub(NAVBAR_HEIGHT));
    let menu = Rect::new(area.x, area.y + NAVBAR_HEIGHT, area.width, rows);
    fill_gradient(buf, menu, theme.page_background, theme.page_background);

    for (i, section) in core.site.sections.iter().enumerate().take(rows as usize) {
        let y = menu.y + i as u16;
        let style = if i == active {
            Style::default()
                .fg(theme.primary.shade(700))
                .bg(theme.primary.shade(100))
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(theme.text)
        };
        if i == active {
            for x in menu.left()..menu.right() {
                if let Some(cell) = buf.cell_mut((x, y)) {
                    cell.bg = theme.primary.shade(100);
                }
            }
        }
        buf.set_stringn(
            menu.x + SIDE_MARGIN,
            y,
            nav_item_text(&section.icon, &section.label),
            menu.width.saturating_sub(SIDE_MARGIN * 2) as usize,
            style,
        );
    }
}
