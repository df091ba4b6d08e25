use crate::config::Config;
use crate::core::input_router::{route_key, route_mouse, PageAction};
use crate::core::navigation::{NavHit, NavbarLayout, Navigation, NAVBAR_HEIGHT};
use crate::core::timers::{spawn_interval, SiteEvent, TimerGuard};
use crate::data::page::PageLayout;
use crate::data::site::{BlockContent, BlockSpec, SiteContent};
use crate::performance::PerformanceStats;
use crate::widgets::{
    AssetSource, Bounds, CarouselState, MarqueeDirection, MarqueeState, MediaSlot,
    ObserverHandle, ObserverRegistry, RevealAnimator, VideoEmbed,
};
use anyhow::{Context, Result};
use crossterm::event::{KeyCode, KeyModifiers, MouseEventKind};
use std::time::{Duration, Instant};
use tokio::sync::mpsc::UnboundedSender;

/// Interactive state of one block
#[derive(Debug)]
pub enum BlockWidget {
    /// Text-only blocks (hero, heading, facts, ...)
    Static,
    Carousel {
        state: CarouselState,
        slides: Vec<MediaSlot>,
    },
    Marquee {
        state: MarqueeState,
        items: Vec<MediaSlot>,
    },
    Image(MediaSlot),
    Video(VideoEmbed),
}

impl BlockWidget {
    fn build(content: &BlockContent, config: &Config, assets: &dyn AssetSource) -> Self {
        let resolve = |item: &crate::widgets::MediaItem| {
            let mut slot = MediaSlot::new(item.clone());
            slot.resolve(assets);
            slot
        };

        match content {
            BlockContent::Carousel { images } => BlockWidget::Carousel {
                state: CarouselState::new(images.len(), config.carousel.interval())
                    .with_slide_duration(config.carousel.slide()),
                slides: images.iter().map(resolve).collect(),
            },
            BlockContent::Marquee {
                images,
                speed,
                direction,
            } => BlockWidget::Marquee {
                state: MarqueeState::new(
                    images.len(),
                    config.marquee.item_width,
                    config.marquee.gap,
                    config.marquee.speed(*speed),
                    MarqueeDirection::from_name(direction),
                ),
                items: images.iter().map(resolve).collect(),
            },
            BlockContent::Image { image } => BlockWidget::Image(resolve(image)),
            BlockContent::Video { url, .. } => BlockWidget::Video(VideoEmbed::from_url(url)),
            _ => BlockWidget::Static,
        }
    }
}

/// A block on the page together with its reveal animation and visibility
/// subscription
#[derive(Debug)]
pub struct BlockRuntime {
    pub section: usize,
    pub index: usize,
    pub reveal: RevealAnimator,
    pub widget: BlockWidget,
    observer: ObserverHandle,
}

impl BlockRuntime {
    pub fn is_visible(&self) -> bool {
        self.reveal.is_visible()
    }
}

/// Core application state (frontend-agnostic)
///
/// AppCore owns the site content, its layout, scrolling and every block's
/// interactive state. Frontends read it to render and feed it input.
pub struct AppCore {
    /// Application configuration
    pub config: Config,

    /// Site being shown
    pub site: SiteContent,

    /// Block and section positions for the current width
    pub layout: PageLayout,

    /// Navbar columns for the current width
    pub navbar: NavbarLayout,

    /// Scroll offset, active section and menu state
    pub nav: Navigation,

    /// Per-block runtime state, in layout order
    pub blocks: Vec<BlockRuntime>,

    /// Navbar logo
    pub logo: MediaSlot,

    /// Performance statistics
    pub perf_stats: PerformanceStats,

    /// Whether to show performance stats
    pub show_perf_stats: bool,

    /// Application running flag
    pub running: bool,

    /// Set when something on screen changed
    pub needs_render: bool,

    observers: ObserverRegistry,
    screen: (u16, u16),
    timers: Vec<TimerGuard>,
    pointer: Option<(u16, u16)>,
    hovered_marquee: Option<usize>,
}

impl AppCore {
    /// Build the page for a `width` x `height` screen.
    pub fn new(
        config: Config,
        site: SiteContent,
        assets: &dyn AssetSource,
        width: u16,
        height: u16,
    ) -> Result<Self> {
        let observer_options = config
            .reveal
            .observer_options()
            .context("Invalid [reveal] root_margin")?;

        let mut logo = MediaSlot::new(site.identity.logo.clone());
        logo.resolve(assets);
        if logo.shows_placeholder() {
            tracing::debug!("Logo unavailable, navbar uses {}", logo.item().placeholder_icon());
        }

        let layout = PageLayout::build(&site, width);
        let navbar = NavbarLayout::build(&site, &logo, width, config.ui.compact_width);
        let mut nav = Navigation::new(
            config.navigation.smooth_scroll(),
            config.ui.scrolled_threshold_rows(),
        );
        nav.resize(
            height.saturating_sub(NAVBAR_HEIGHT),
            layout.total_height(),
            navbar.compact,
        );

        let observers = ObserverRegistry::new();
        let mut blocks = Vec::with_capacity(layout.blocks().len());
        for placed in layout.blocks() {
            let section = &site.sections[placed.section];
            let spec = &section.blocks[placed.index];
            let label = format!("{}#{}:{}", section.anchor, placed.index, spec.content.kind());
            blocks.push(BlockRuntime {
                section: placed.section,
                index: placed.index,
                reveal: RevealAnimator::new(
                    spec.reveal.variant(),
                    spec.reveal.delay(),
                    spec.reveal.duration(),
                ),
                widget: BlockWidget::build(&spec.content, &config, assets),
                observer: observers.observe(&label, placed.bounds, observer_options),
            });
        }

        tracing::info!(
            "Page laid out: {} sections, {} blocks, {} rows at width {}",
            site.sections.len(),
            blocks.len(),
            layout.total_height(),
            width
        );

        let show_perf_stats = config.ui.show_perf_stats;
        let mut core = Self {
            config,
            site,
            layout,
            navbar,
            nav,
            blocks,
            logo,
            perf_stats: PerformanceStats::new(),
            show_perf_stats,
            running: true,
            needs_render: true,
            observers,
            screen: (width, height),
            timers: Vec::new(),
            pointer: None,
            hovered_marquee: None,
        };
        core.process_visibility(Instant::now());
        Ok(core)
    }

    /// Site description of the block at `i`
    pub fn block_spec(&self, i: usize) -> &BlockSpec {
        let block = &self.blocks[i];
        &self.site.sections[block.section].blocks[block.index]
    }

    pub fn screen_size(&self) -> (u16, u16) {
        self.screen
    }

    /// Page area currently on screen (below the navbar)
    pub fn viewport(&self) -> Bounds {
        Bounds::new(0, self.nav.row(), self.screen.0, self.nav.viewport_height())
    }

    /// Page row under screen row `y`, if below the navbar
    pub fn screen_to_page(&self, y: u16) -> Option<i32> {
        (y >= NAVBAR_HEIGHT).then(|| (y - NAVBAR_HEIGHT) as i32 + self.nav.row())
    }

    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    pub fn attached_observer_count(&self) -> usize {
        self.observers.attached_count()
    }

    pub fn timer_count(&self) -> usize {
        self.timers.len()
    }

    /// Rebuild layout for a new screen size and move observer targets.
    pub fn resize(&mut self, width: u16, height: u16, now: Instant) {
        if self.screen == (width, height) {
            return;
        }
        tracing::debug!("Resize to {}x{}", width, height);
        self.screen = (width, height);

        if self.layout.width() != width {
            self.layout = PageLayout::build(&self.site, width);
            self.navbar = NavbarLayout::build(&self.site, &self.logo, width, self.config.ui.compact_width);
            for (block, placed) in self.blocks.iter().zip(self.layout.blocks()) {
                block.observer.set_target(placed.bounds);
            }
        }
        self.nav.resize(
            height.saturating_sub(NAVBAR_HEIGHT),
            self.layout.total_height(),
            self.navbar.compact,
        );
        self.process_visibility(now);
        self.refresh_hover();
        self.needs_render = true;
    }

    /// Run the observers against the viewport and start reveal transitions
    /// for every flag that flipped.
    fn process_visibility(&mut self, now: Instant) {
        for change in self.observers.process(self.viewport()) {
            let Some(block) = self
                .blocks
                .iter_mut()
                .find(|b| b.observer.id() == change.id)
            else {
                continue;
            };
            if block.reveal.set_visible(change.visible, now) {
                tracing::trace!(
                    "{} '{}'",
                    if change.visible { "Reveal" } else { "Hide" },
                    change.label
                );
                self.needs_render = true;
            }
        }
    }

    /// Record a frame at `now` and advance everything time-based.
    pub fn frame(&mut self, now: Instant) {
        let dt = self.perf_stats.record_frame(now);
        self.update(now, dt);
    }

    /// Advance scrolling, visibility, animations and marquees.
    pub fn update(&mut self, now: Instant, dt: Duration) {
        if self.nav.update(now) {
            self.refresh_hover();
            self.needs_render = true;
        }
        self.process_visibility(now);

        let mut visible = 0;
        let mut animating = 0;
        for block in &mut self.blocks {
            if block.reveal.is_visible() {
                visible += 1;
            }
            if block.reveal.is_animating(now) {
                animating += 1;
            }
            match &mut block.widget {
                BlockWidget::Marquee { state, .. } => {
                    if !state.is_paused() && state.item_count() > 0 {
                        state.advance(dt);
                        self.needs_render = true;
                    }
                }
                BlockWidget::Carousel { state, .. } => {
                    if state.is_sliding(now) {
                        self.needs_render = true;
                    }
                }
                _ => {}
            }
        }
        if animating > 0 {
            self.needs_render = true;
        }
        self.perf_stats.update_page_stats(visible, animating);
    }

    /// Start one interval timer per non-empty carousel.
    pub fn start_timers(&mut self, tx: &UnboundedSender<SiteEvent>) {
        self.stop_timers();
        for (i, block) in self.blocks.iter().enumerate() {
            let BlockWidget::Carousel { state, .. } = &block.widget else {
                continue;
            };
            if state.is_empty() {
                continue;
            }
            let anchor = &self.site.sections[block.section].anchor;
            let label = format!("carousel {}#{}", anchor, block.index);
            if let Some(guard) = spawn_interval(
                &label,
                state.interval(),
                tx.clone(),
                SiteEvent::CarouselTick { block: i },
            ) {
                self.timers.push(guard);
            }
        }
    }

    pub fn stop_timers(&mut self) {
        self.timers.clear();
    }

    /// Apply an event from a background task
    pub fn handle_site_event(&mut self, event: SiteEvent, now: Instant) {
        match event {
            SiteEvent::CarouselTick { block } => {
                if let Some(BlockWidget::Carousel { state, .. }) =
                    self.blocks.get_mut(block).map(|b| &mut b.widget)
                {
                    state.tick(now);
                    tracing::trace!("Carousel {} at slide {}", block, state.index());
                    self.perf_stats.record_carousel_tick();
                    self.needs_render = true;
                }
            }
        }
    }

    pub fn handle_key(&mut self, code: KeyCode, modifiers: KeyModifiers, now: Instant) {
        self.handle_action(route_key(code, modifiers), now);
    }

    pub fn handle_mouse(&mut self, kind: MouseEventKind, x: u16, y: u16, now: Instant) {
        self.handle_action(route_mouse(kind, x, y), now);
    }

    pub fn handle_action(&mut self, action: PageAction, now: Instant) {
        match action {
            PageAction::None => return,
            PageAction::Quit => self.running = false,
            PageAction::Escape => {
                if !self.nav.close_menu() {
                    self.running = false;
                }
            }
            PageAction::ScrollBy(delta) => self.nav.scroll_by(delta),
            PageAction::PageUp => self.nav.page_up(),
            PageAction::PageDown => self.nav.page_down(),
            PageAction::Home => self.nav.home(),
            PageAction::End => self.nav.end(),
            PageAction::JumpToSection(i) => self.jump_to_section(i, now),
            PageAction::NextSection => {
                if let Some(i) = self.nav.next_section(&self.layout) {
                    self.jump_to_section(i, now);
                }
            }
            PageAction::PrevSection => {
                if let Some(i) = self.nav.prev_section(&self.layout) {
                    self.jump_to_section(i, now);
                }
            }
            PageAction::ToggleMenu => self.nav.toggle_menu(),
            PageAction::TogglePerfStats => self.show_perf_stats = !self.show_perf_stats,
            PageAction::Click { x, y } => self.handle_click(x, y, now),
            PageAction::Hover { x, y } => {
                self.pointer = Some((x, y));
                self.refresh_hover();
                return;
            }
        }
        self.process_visibility(now);
        self.refresh_hover();
        self.needs_render = true;
    }

    fn jump_to_section(&mut self, i: usize, now: Instant) {
        let Some(section) = self.site.sections.get(i) else {
            return;
        };
        self.nav.scroll_to_anchor(&self.layout, &section.anchor, now);
    }

    fn handle_click(&mut self, x: u16, y: u16, now: Instant) {
        match self.navbar.hit(x, y, self.nav.is_menu_open()) {
            Some(NavHit::Brand) => self.jump_to_section(0, now),
            Some(NavHit::Toggle) => self.nav.toggle_menu(),
            Some(NavHit::Section(i)) => self.jump_to_section(i, now),
            None => {
                self.nav.close_menu();
            }
        }
    }

    /// Pause the marquee under the last pointer position, resume the one it
    /// left. Re-run whenever the page moves under a still pointer.
    fn refresh_hover(&mut self) {
        let (width, height) = self.screen_size();
        let hovered = self.pointer.and_then(|(x, y)| {
            if x >= width || y >= height {
                return None;
            }
            let menu_covers =
                self.nav.is_menu_open() && y < NAVBAR_HEIGHT + self.navbar.menu_rows;
            if menu_covers {
                return None;
            }
            self.screen_to_page(y)
                .and_then(|page_y| self.layout.block_at(x as i32, page_y))
                .filter(|&i| matches!(self.blocks[i].widget, BlockWidget::Marquee { .. }))
        });
        if hovered == self.hovered_marquee {
            return;
        }

        for (i, on) in [(self.hovered_marquee, false), (hovered, true)] {
            if let Some(BlockWidget::Marquee { state, .. }) =
                i.and_then(|i| self.blocks.get_mut(i)).map(|b| &mut b.widget)
            {
                state.set_hovered(on);
            }
        }
        self.hovered_marquee = hovered;
        self.needs_render = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::widgets::media::{AssetError, AssetKind};
    use std::path::PathBuf;
    use tokio::sync::mpsc;

    /// Every local image is missing, remote ones load
    struct NoLocalAssets;

    impl AssetSource for NoLocalAssets {
        fn load(&self, src: &str) -> Result<AssetKind, AssetError> {
            if src.starts_with("http") {
                return Ok(AssetKind::Remote {
                    url: src.to_string(),
                });
            }
            Err(AssetError::NotFound(PathBuf::from(src)))
        }
    }

    fn core_with(config: Config) -> AppCore {
        let site = Config::default_site().expect("embedded site");
        AppCore::new(config, site, &NoLocalAssets, 120, 40).expect("core")
    }

    fn core() -> AppCore {
        core_with(Config::default())
    }

    /// Screen row showing page row `y`
    fn screen_row(core: &AppCore, y: i32) -> u16 {
        (y - core.nav.row() + NAVBAR_HEIGHT as i32) as u16
    }

    fn first_block_of(core: &AppCore, anchor: &str, kind: &str) -> usize {
        (0..core.blocks.len())
            .find(|&i| {
                core.site.sections[core.blocks[i].section].anchor == anchor
                    && core.block_spec(i).content.kind() == kind
            })
            .expect("block")
    }

    #[test]
    fn test_one_observer_per_block() {
        let core = core();
        assert_eq!(core.blocks.len(), core.layout.blocks().len());
        assert_eq!(core.observer_count(), core.blocks.len());
        assert!(core.blocks[0].is_visible());
        assert!(core.logo.shows_placeholder());
    }

    #[test]
    fn test_blocks_reveal_and_hide_while_scrolling() {
        let mut core = core();
        let now = Instant::now();
        let galeri = first_block_of(&core, "galeri", "hero");
        assert!(!core.blocks[galeri].is_visible());

        let top = core.layout.section_top("galeri").expect("galeri");
        core.handle_action(PageAction::ScrollBy(top), now);
        assert!(core.blocks[galeri].is_visible());
        // Left the viewport, hides again
        assert!(!core.blocks[0].is_visible());
        assert_eq!(core.attached_observer_count(), core.blocks.len());
    }

    #[test]
    fn test_trigger_once_pins_revealed_blocks() {
        let mut config = Config::default();
        config.reveal.trigger_once = true;
        let mut core = core_with(config);
        let now = Instant::now();

        assert!(core.blocks[0].is_visible());
        assert!(!core.blocks[0].observer.is_attached());

        core.handle_action(PageAction::End, now);
        assert!(core.blocks[0].is_visible());
        // Subscriptions stay registered until the page goes away
        assert_eq!(core.observer_count(), core.blocks.len());
    }

    #[test]
    fn test_carousel_tick_advances_slide() {
        let mut core = core();
        let now = Instant::now();
        let carousel = first_block_of(&core, "beranda", "carousel");

        core.handle_site_event(SiteEvent::CarouselTick { block: carousel }, now);
        let BlockWidget::Carousel { state, .. } = &core.blocks[carousel].widget else {
            panic!("not a carousel");
        };
        assert_eq!(state.index(), 1);
        assert_eq!(core.perf_stats.carousel_ticks(), 1);

        // Ticks for non-carousel blocks are ignored
        core.handle_site_event(SiteEvent::CarouselTick { block: 0 }, now);
        assert_eq!(core.perf_stats.carousel_ticks(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_carousel_timers_drive_index() {
        let mut core = core();
        let carousel = first_block_of(&core, "beranda", "carousel");
        let (tx, mut rx) = mpsc::unbounded_channel();
        core.start_timers(&tx);
        drop(tx);
        assert_eq!(core.timer_count(), 1);

        tokio::time::sleep(Duration::from_millis(8_001)).await;
        while let Ok(event) = rx.try_recv() {
            core.handle_site_event(event, Instant::now());
        }

        let BlockWidget::Carousel { state, .. } = &core.blocks[carousel].widget else {
            panic!("not a carousel");
        };
        assert_eq!(state.index(), 2 % state.len());

        // Tearing the page down releases the timers
        drop(core);
        tokio::time::sleep(Duration::from_millis(10_000)).await;
        assert!(matches!(
            rx.try_recv(),
            Err(mpsc::error::TryRecvError::Disconnected)
        ));
    }

    #[test]
    fn test_marquee_moves_and_pauses_on_hover() {
        let mut core = core();
        let now = Instant::now();
        let marquee = first_block_of(&core, "galeri", "marquee");
        let bounds = core.layout.blocks()[marquee].bounds;

        core.handle_action(PageAction::ScrollBy(bounds.y), now);
        core.update(now, Duration::from_secs(1));
        let offset = match &core.blocks[marquee].widget {
            BlockWidget::Marquee { state, .. } => state.offset(),
            _ => panic!("not a marquee"),
        };
        assert!(offset < 0.0);

        let screen_y = screen_row(&core, bounds.y + 1);
        core.handle_mouse(MouseEventKind::Moved, 5, screen_y, now);
        core.update(now, Duration::from_secs(1));
        let BlockWidget::Marquee { state, .. } = &core.blocks[marquee].widget else {
            panic!("not a marquee");
        };
        assert!(state.is_paused());
        assert_eq!(state.offset(), offset);

        // Pointer over the navbar: resumes
        core.handle_mouse(MouseEventKind::Moved, 5, 0, now);
        let BlockWidget::Marquee { state, .. } = &core.blocks[marquee].widget else {
            panic!("not a marquee");
        };
        assert!(!state.is_paused());
    }

    #[test]
    fn test_marquee_resumes_when_page_scrolls_under_pointer() {
        let mut core = core();
        let now = Instant::now();
        let marquee = first_block_of(&core, "galeri", "marquee");
        let bounds = core.layout.blocks()[marquee].bounds;

        core.handle_action(PageAction::ScrollBy(bounds.y), now);
        let screen_y = screen_row(&core, bounds.y + 1);
        core.handle_mouse(MouseEventKind::Moved, 5, screen_y, now);
        assert!(matches!(
            &core.blocks[marquee].widget,
            BlockWidget::Marquee { state, .. } if state.is_paused()
        ));

        // Wheel scrolls carry the marquee away from the still pointer
        for _ in 0..20 {
            core.handle_mouse(MouseEventKind::ScrollDown, 5, screen_y, now);
        }
        let under = core
            .screen_to_page(screen_y)
            .and_then(|y| core.layout.block_at(5, y));
        assert_ne!(under, Some(marquee));

        let before = match &core.blocks[marquee].widget {
            BlockWidget::Marquee { state, .. } => state.offset(),
            _ => panic!("not a marquee"),
        };
        core.update(now, Duration::from_secs(2));
        let BlockWidget::Marquee { state, .. } = &core.blocks[marquee].widget else {
            panic!("not a marquee");
        };
        assert!(!state.is_paused());
        assert_ne!(state.offset(), before);
    }

    #[test]
    fn test_marquee_hover_follows_smooth_scroll_and_resize() {
        let mut core = core();
        let now = Instant::now();
        let marquee = first_block_of(&core, "galeri", "marquee");
        let bounds = core.layout.blocks()[marquee].bounds;
        let paused = |core: &AppCore| {
            matches!(
                &core.blocks[marquee].widget,
                BlockWidget::Marquee { state, .. } if state.is_paused()
            )
        };

        core.handle_action(PageAction::ScrollBy(bounds.y), now);
        let screen_y = screen_row(&core, bounds.y + 1);
        core.handle_mouse(MouseEventKind::Moved, 5, screen_y, now);
        assert!(paused(&core));

        // Smooth scroll to the first section moves the marquee off screen
        core.handle_action(PageAction::JumpToSection(0), now);
        core.update(now + Duration::from_secs(1), Duration::ZERO);
        assert!(!paused(&core));

        // Coming back under the pointer pauses it again
        core.handle_action(PageAction::Home, now);
        core.handle_action(PageAction::ScrollBy(bounds.y), now);
        assert!(paused(&core));

        // Shrinking the terminal leaves the pointer outside it
        core.resize(120, screen_y, now);
        assert!(!paused(&core));
    }

    #[test]
    fn test_escape_closes_menu_before_quitting() {
        let site = Config::default_site().expect("embedded site");
        let mut core =
            AppCore::new(Config::default(), site, &NoLocalAssets, 60, 30).expect("core");
        let now = Instant::now();
        assert!(core.navbar.compact);

        core.handle_action(PageAction::ToggleMenu, now);
        assert!(core.nav.is_menu_open());
        core.handle_key(KeyCode::Esc, KeyModifiers::NONE, now);
        assert!(!core.nav.is_menu_open());
        assert!(core.running);
        core.handle_key(KeyCode::Esc, KeyModifiers::NONE, now);
        assert!(!core.running);
    }

    #[test]
    fn test_navbar_click_navigates() {
        let mut core = core();
        let now = Instant::now();
        let item = core.navbar.items[3];
        core.handle_mouse(
            MouseEventKind::Down(crossterm::event::MouseButton::Left),
            item.x,
            1,
            now,
        );
        let target = core.layout.section_top("galeri").expect("galeri");
        assert_eq!(core.nav.row(), 0);

        core.update(now + Duration::from_secs(1), Duration::ZERO);
        assert_eq!(core.nav.row(), target);
        let active = core.nav.active_section(&core.layout);
        assert_eq!(core.site.sections[active].anchor, "galeri");
    }

    #[test]
    fn test_resize_moves_observer_targets() {
        let mut core = core();
        let now = Instant::now();
        core.resize(70, 40, now);
        assert_eq!(core.layout.width(), 70);
        assert!(core.navbar.compact);

        // Narrow page is taller; jumping to the last section still reveals it
        core.handle_action(PageAction::End, now);
        let last = core.blocks.len() - 1;
        assert!(core.blocks[last].is_visible());
    }

    #[test]
    fn test_toggle_perf_stats_and_quit() {
        let mut core = core();
        let now = Instant::now();
        assert!(!core.show_perf_stats);
        core.handle_key(KeyCode::Char('p'), KeyModifiers::NONE, now);
        assert!(core.show_perf_stats);
        core.handle_key(KeyCode::Char('q'), KeyModifiers::NONE, now);
        assert!(!core.running);
    }
}
