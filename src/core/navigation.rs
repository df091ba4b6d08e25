//! Page scrolling, section anchors and the navbar menu
//!
//! Offsets are in page rows. The scroll position is fractional so smooth
//! scrolling can ease between rows; renderers use [`Navigation::row`].

use crate::data::page::{text_width, PageLayout, SIDE_MARGIN};
use crate::data::site::SiteContent;
use crate::widgets::reveal::Easing;
use crate::widgets::MediaSlot;
use std::time::{Duration, Instant};

/// Rows taken by the navbar at the top of the screen
pub const NAVBAR_HEIGHT: u16 = 3;

/// Space between navbar items
const ITEM_GAP: u16 = 2;

#[derive(Debug, Clone, Copy, PartialEq)]
struct SmoothScroll {
    from: f32,
    to: f32,
    started: Instant,
}

#[derive(Debug, Clone)]
pub struct Navigation {
    offset: f32,
    viewport_height: u16,
    page_height: u32,
    smooth: Option<SmoothScroll>,
    smooth_duration: Duration,
    /// Navbar turns solid past this offset (rows)
    scrolled_threshold: f32,
    compact: bool,
    menu_open: bool,
}

impl Navigation {
    pub fn new(smooth_duration: Duration, scrolled_threshold: f32) -> Self {
        Self {
            offset: 0.0,
            viewport_height: 0,
            page_height: 0,
            smooth: None,
            smooth_duration,
            scrolled_threshold,
            compact: false,
            menu_open: false,
        }
    }

    /// New viewport or page size. Keeps the offset inside the page.
    pub fn resize(&mut self, viewport_height: u16, page_height: u32, compact: bool) {
        self.viewport_height = viewport_height;
        self.page_height = page_height;
        self.offset = self.clamp(self.offset);
        if let Some(smooth) = self.smooth.as_mut() {
            smooth.to = smooth.to.clamp(0.0, self.page_height.saturating_sub(self.viewport_height as u32) as f32);
        }
        if self.compact != compact {
            tracing::debug!("Navbar compact mode: {}", compact);
        }
        self.compact = compact;
        if !compact {
            self.menu_open = false;
        }
    }

    pub fn max_offset(&self) -> f32 {
        self.page_height.saturating_sub(self.viewport_height as u32) as f32
    }

    fn clamp(&self, offset: f32) -> f32 {
        offset.clamp(0.0, self.max_offset())
    }

    /// Exact scroll offset
    pub fn offset(&self) -> f32 {
        self.offset
    }

    /// Scroll offset rounded to a page row
    pub fn row(&self) -> i32 {
        self.offset.round() as i32
    }

    pub fn viewport_height(&self) -> u16 {
        self.viewport_height
    }

    /// Scroll by `delta` rows, cancelling any smooth scroll in flight.
    pub fn scroll_by(&mut self, delta: i32) {
        self.smooth = None;
        self.offset = self.clamp(self.offset.round() + delta as f32);
    }

    pub fn page_down(&mut self) {
        let step = self.viewport_height.saturating_sub(1).max(1) as i32;
        self.scroll_by(step);
    }

    pub fn page_up(&mut self) {
        let step = self.viewport_height.saturating_sub(1).max(1) as i32;
        self.scroll_by(-step);
    }

    pub fn home(&mut self) {
        self.smooth = None;
        self.offset = 0.0;
    }

    pub fn end(&mut self) {
        self.smooth = None;
        self.offset = self.max_offset();
    }

    /// Start a smooth scroll toward page row `target`, from wherever the
    /// page currently is.
    pub fn scroll_to(&mut self, target: i32, now: Instant) {
        let to = self.clamp(target as f32);
        if self.smooth_duration.is_zero() {
            self.smooth = None;
            self.offset = to;
            return;
        }
        self.smooth = Some(SmoothScroll {
            from: self.offset,
            to,
            started: now,
        });
    }

    /// Smooth-scroll to the section with `anchor`. Closes the menu.
    pub fn scroll_to_anchor(&mut self, layout: &PageLayout, anchor: &str, now: Instant) -> bool {
        let Some(top) = layout.section_top(anchor) else {
            tracing::warn!("No section with anchor '{}'", anchor);
            return false;
        };
        tracing::info!("Navigating to #{}", anchor);
        self.menu_open = false;
        self.scroll_to(top, now);
        true
    }

    /// Advance the smooth scroll. Returns true while the offset moves.
    pub fn update(&mut self, now: Instant) -> bool {
        let Some(smooth) = self.smooth else {
            return false;
        };
        let t = now.saturating_duration_since(smooth.started).as_secs_f32()
            / self.smooth_duration.as_secs_f32();
        if t >= 1.0 {
            self.offset = smooth.to;
            self.smooth = None;
        } else {
            self.offset = smooth.from + (smooth.to - smooth.from) * Easing::EaseInOut.apply(t);
        }
        true
    }

    /// Last section whose top is at or above the upper third of the viewport
    pub fn active_section(&self, layout: &PageLayout) -> usize {
        let probe = self.offset + self.viewport_height as f32 / 3.0;
        layout
            .sections()
            .iter()
            .rposition(|s| s.top as f32 <= probe)
            .unwrap_or(0)
    }

    /// Section after the active one, if any
    pub fn next_section(&self, layout: &PageLayout) -> Option<usize> {
        let next = self.active_section(layout) + 1;
        (next < layout.sections().len()).then_some(next)
    }

    /// Start of the active section, or the section before when already there
    pub fn prev_section(&self, layout: &PageLayout) -> Option<usize> {
        let active = self.active_section(layout);
        let top = layout.sections().get(active)?.top as f32;
        if self.offset > top + 0.5 {
            Some(active)
        } else {
            active.checked_sub(1)
        }
    }

    /// Navbar switches to its solid style past the threshold
    pub fn is_scrolled(&self) -> bool {
        self.offset > self.scrolled_threshold
    }

    pub fn is_menu_open(&self) -> bool {
        self.menu_open
    }

    /// Open/close the compact menu. Ignored in wide mode.
    pub fn toggle_menu(&mut self) {
        if self.compact {
            self.menu_open = !self.menu_open;
        }
    }

    pub fn close_menu(&mut self) -> bool {
        std::mem::replace(&mut self.menu_open, false)
    }
}

/// One navbar entry's horizontal extent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavItemSpan {
    pub section: usize,
    pub x: u16,
    pub width: u16,
}

/// What a click on the navbar (or the open menu) hit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavHit {
    Brand,
    Toggle,
    Section(usize),
}

/// Column positions of the navbar, shared by the renderer and hit-testing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavbarLayout {
    pub width: u16,
    pub brand_width: u16,
    /// Item spans in wide mode (empty when compact)
    pub items: Vec<NavItemSpan>,
    /// Menu button span in compact mode
    pub toggle: Option<(u16, u16)>,
    /// Number of rows in the dropdown menu
    pub menu_rows: u16,
    pub compact: bool,
}

pub const TOGGLE_OPEN: &str = "✕";
pub const TOGGLE_CLOSED: &str = "☰";

/// "icon label" text of a navbar entry
pub fn nav_item_text(icon: &str, label: &str) -> String {
    if icon.is_empty() {
        label.to_string()
    } else {
        format!("{} {}", icon, label)
    }
}

/// "icon name" text of the brand on the left. The logo's fallback icon
/// until it resolves, the photo mark after.
pub fn brand_text(site: &SiteContent, logo: &MediaSlot) -> String {
    nav_item_text(logo.display_icon(), &site.identity.name)
}

impl NavbarLayout {
    /// Lay out the navbar. Falls back to compact mode when the terminal is
    /// narrower than `compact_width` or the items would overlap the brand.
    pub fn build(site: &SiteContent, logo: &MediaSlot, width: u16, compact_width: u16) -> Self {
        let brand_width = text_width(&brand_text(site, logo)) as u16;
        let widths: Vec<u16> = site
            .sections
            .iter()
            .map(|s| text_width(&nav_item_text(&s.icon, &s.label)) as u16)
            .collect();
        let total: u16 = widths.iter().sum::<u16>()
            + ITEM_GAP * (widths.len().saturating_sub(1) as u16);

        let brand_end = SIDE_MARGIN + brand_width + ITEM_GAP;
        let fits = width >= brand_end + total + SIDE_MARGIN;
        let compact = width < compact_width || !fits;

        if compact {
            let toggle_width = 3;
            return Self {
                width,
                brand_width,
                items: Vec::new(),
                toggle: Some((width.saturating_sub(SIDE_MARGIN + toggle_width), toggle_width)),
                menu_rows: site.sections.len() as u16,
                compact,
            };
        }

        let mut x = width - SIDE_MARGIN - total;
        let mut items = Vec::with_capacity(widths.len());
        for (section, w) in widths.into_iter().enumerate() {
            items.push(NavItemSpan { section, x, width: w });
            x += w + ITEM_GAP;
        }

        Self {
            width,
            brand_width,
            items,
            toggle: None,
            menu_rows: 0,
            compact,
        }
    }

    /// Resolve a click at screen cell (`x`, `y`).
    pub fn hit(&self, x: u16, y: u16, menu_open: bool) -> Option<NavHit> {
        if y < NAVBAR_HEIGHT {
            if x >= SIDE_MARGIN && x < SIDE_MARGIN + self.brand_width {
                return Some(NavHit::Brand);
            }
            if let Some((tx, tw)) = self.toggle {
                if x >= tx && x < tx + tw {
                    return Some(NavHit::Toggle);
                }
            }
            return self
                .items
                .iter()
                .find(|item| x >= item.x && x < item.x + item.width)
                .map(|item| NavHit::Section(item.section));
        }

        if menu_open && self.compact {
            let row = y - NAVBAR_HEIGHT;
            if row < self.menu_rows {
                return Some(NavHit::Section(row as usize));
            }
        }
        None
    }
}
