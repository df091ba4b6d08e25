//! Viewport intersection tracking for scroll-reveal blocks.
//!
//! Each animated block registers its page-space bounds with an
//! [`ObserverRegistry`]. Once per frame the registry compares every attached
//! target against the visible part of the page and flips the block's visibility
//! flag when it crosses its threshold. The returned [`ObserverHandle`] owns the
//! subscription: dropping it unobserves the target.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::{Rc, Weak};
use std::str::FromStr;
use thiserror::Error;

/// Rectangle in page coordinates (terminal cells, y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Bounds {
    pub x: i32,
    pub y: i32,
    pub width: u16,
    pub height: u16,
}

impl Bounds {
    pub fn new(x: i32, y: i32, width: u16, height: u16) -> Self {
        Self { x, y, width, height }
    }

    pub fn right(&self) -> i32 {
        self.x + self.width as i32
    }

    pub fn bottom(&self) -> i32 {
        self.y + self.height as i32
    }

    pub fn area(&self) -> u32 {
        self.width as u32 * self.height as u32
    }

    /// Overlapping region, if any (zero-sized overlaps count)
    pub fn intersection(&self, other: &Bounds) -> Option<Bounds> {
        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());
        if right < x || bottom < y {
            return None;
        }
        Some(Bounds::new(x, y, (right - x) as u16, (bottom - y) as u16))
    }
}

/// One side of a root margin
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MarginLength {
    /// Absolute number of cells
    Cells(i32),
    /// Percentage of the viewport dimension on that axis
    Percent(f32),
}

impl MarginLength {
    fn resolve(&self, extent: u16) -> i32 {
        match *self {
            MarginLength::Cells(n) => n,
            MarginLength::Percent(p) => (extent as f32 * p / 100.0).round() as i32,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RootMarginError {
    #[error("root margin needs 1 to 4 values, got {0}")]
    WrongArity(usize),
    #[error("invalid root margin value '{0}' (expected cells like '4' or a percentage like '10%')")]
    InvalidLength(String),
}

impl FromStr for MarginLength {
    type Err = RootMarginError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || RootMarginError::InvalidLength(s.to_string());
        if let Some(pct) = s.strip_suffix('%') {
            pct.parse::<f32>().map(MarginLength::Percent).map_err(|_| invalid())
        } else {
            s.parse::<i32>().map(MarginLength::Cells).map_err(|_| invalid())
        }
    }
}

/// Grows (positive) or shrinks (negative) the viewport before intersecting.
///
/// Uses CSS margin shorthand order: `top [right [bottom [left]]]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RootMargin {
    pub top: MarginLength,
    pub right: MarginLength,
    pub bottom: MarginLength,
    pub left: MarginLength,
}

impl Default for RootMargin {
    fn default() -> Self {
        let zero = MarginLength::Cells(0);
        Self { top: zero, right: zero, bottom: zero, left: zero }
    }
}

impl RootMargin {
    /// Apply the margin to a viewport rectangle
    pub fn expand(&self, viewport: Bounds) -> Bounds {
        let top = self.top.resolve(viewport.height);
        let bottom = self.bottom.resolve(viewport.height);
        let left = self.left.resolve(viewport.width);
        let right = self.right.resolve(viewport.width);

        let width = (viewport.width as i32 + left + right).max(0);
        let height = (viewport.height as i32 + top + bottom).max(0);
        Bounds::new(
            viewport.x - left,
            viewport.y - top,
            width.min(u16::MAX as i32) as u16,
            height.min(u16::MAX as i32) as u16,
        )
    }
}

impl FromStr for RootMargin {
    type Err = RootMarginError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let values = s
            .split_whitespace()
            .map(str::parse::<MarginLength>)
            .collect::<Result<Vec<_>, _>>()?;
        match values.as_slice() {
            [all] => Ok(Self { top: *all, right: *all, bottom: *all, left: *all }),
            [v, h] => Ok(Self { top: *v, right: *h, bottom: *v, left: *h }),
            [t, h, b] => Ok(Self { top: *t, right: *h, bottom: *b, left: *h }),
            [t, r, b, l] => Ok(Self { top: *t, right: *r, bottom: *b, left: *l }),
            other => Err(RootMarginError::WrongArity(other.len())),
        }
    }
}

/// Observer configuration
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObserverOptions {
    /// Fraction of the target that must be on screen (0.0 - 1.0)
    pub threshold: f32,
    pub root_margin: RootMargin,
    /// Pin the flag once it turns on
    pub trigger_once: bool,
}

impl Default for ObserverOptions {
    fn default() -> Self {
        Self {
            threshold: 0.1,
            root_margin: RootMargin::default(),
            trigger_once: false,
        }
    }
}

/// Fraction of `target` covered by `root`
pub fn intersection_ratio(target: &Bounds, root: &Bounds) -> f32 {
    match target.intersection(root) {
        None => 0.0,
        // A zero-sized target is either fully in or fully out
        Some(_) if target.area() == 0 => 1.0,
        Some(hit) => hit.area() as f32 / target.area() as f32,
    }
}

/// Whether `target` counts as intersecting `root` for the given threshold.
pub fn is_intersecting(target: &Bounds, root: &Bounds, threshold: f32) -> bool {
    if target.intersection(root).is_none() {
        return false;
    }
    let ratio = intersection_ratio(target, root);
    if threshold <= 0.0 {
        ratio > 0.0 || target.area() == 0
    } else {
        ratio >= threshold.min(1.0)
    }
}

/// Visibility state machine for a single target
#[derive(Debug, Clone)]
pub struct VisibilityObserver {
    options: ObserverOptions,
    visible: bool,
    attached: bool,
}

impl VisibilityObserver {
    pub fn new(options: ObserverOptions) -> Self {
        Self {
            options,
            visible: false,
            attached: true,
        }
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// False once a trigger-once observer has fired
    pub fn is_attached(&self) -> bool {
        self.attached
    }

    /// Feed one intersection notification. Returns true if the flag changed.
    pub fn handle_entry(&mut self, intersecting: bool) -> bool {
        if !self.attached {
            return false;
        }
        if intersecting {
            let changed = !self.visible;
            self.visible = true;
            if self.options.trigger_once {
                self.attached = false;
            }
            changed
        } else if !self.options.trigger_once {
            let changed = self.visible;
            self.visible = false;
            changed
        } else {
            false
        }
    }

    /// Intersect `target` with the margin-adjusted `viewport` and update.
    pub fn evaluate(&mut self, target: &Bounds, viewport: &Bounds) -> bool {
        let root = self.options.root_margin.expand(*viewport);
        let hit = is_intersecting(target, &root, self.options.threshold);
        self.handle_entry(hit)
    }
}

/// Identifier of a registered observer
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ObserverId(u64);

/// Flag change reported by [`ObserverRegistry::process`]
#[derive(Debug, Clone, PartialEq)]
pub struct VisibilityChange {
    pub id: ObserverId,
    pub label: String,
    pub visible: bool,
}

#[derive(Debug)]
struct ObserverEntry {
    label: String,
    target: Bounds,
    observer: VisibilityObserver,
}

#[derive(Debug, Default)]
struct RegistryInner {
    next_id: u64,
    entries: BTreeMap<ObserverId, ObserverEntry>,
}

/// Owns every live visibility subscription on the page
#[derive(Debug, Default)]
pub struct ObserverRegistry {
    inner: Rc<RefCell<RegistryInner>>,
}

impl ObserverRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start observing `target`. The subscription lives as long as the handle.
    pub fn observe(&self, label: &str, target: Bounds, options: ObserverOptions) -> ObserverHandle {
        let mut inner = self.inner.borrow_mut();
        let id = ObserverId(inner.next_id);
        inner.next_id += 1;
        inner.entries.insert(
            id,
            ObserverEntry {
                label: label.to_string(),
                target,
                observer: VisibilityObserver::new(options),
            },
        );
        tracing::debug!("Observing '{}' ({:?}) at {:?}", label, id, target);

        ObserverHandle {
            id,
            registry: Rc::downgrade(&self.inner),
        }
    }

    /// Evaluate every attached observer against the viewport.
    pub fn process(&self, viewport: Bounds) -> Vec<VisibilityChange> {
        let mut inner = self.inner.borrow_mut();
        let mut changes = Vec::new();
        for (id, entry) in inner.entries.iter_mut() {
            if !entry.observer.is_attached() {
                continue;
            }
            if entry.observer.evaluate(&entry.target, &viewport) {
                changes.push(VisibilityChange {
                    id: *id,
                    label: entry.label.clone(),
                    visible: entry.observer.is_visible(),
                });
            }
        }
        changes
    }

    /// Number of live subscriptions (attached or pinned)
    pub fn len(&self) -> usize {
        self.inner.borrow().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of subscriptions still receiving updates
    pub fn attached_count(&self) -> usize {
        self.inner
            .borrow()
            .entries
            .values()
            .filter(|e| e.observer.is_attached())
            .count()
    }
}

/// Scoped visibility subscription. Dropping it unobserves the target.
#[derive(Debug)]
pub struct ObserverHandle {
    id: ObserverId,
    registry: Weak<RefCell<RegistryInner>>,
}

impl ObserverHandle {
    pub fn id(&self) -> ObserverId {
        self.id
    }

    fn with_entry<R>(&self, f: impl FnOnce(&mut ObserverEntry) -> R) -> Option<R> {
        let inner = self.registry.upgrade()?;
        let mut inner = inner.borrow_mut();
        inner.entries.get_mut(&self.id).map(f)
    }

    /// Current flag (false if the registry is gone)
    pub fn is_visible(&self) -> bool {
        self.with_entry(|e| e.observer.is_visible()).unwrap_or(false)
    }

    pub fn is_attached(&self) -> bool {
        self.with_entry(|e| e.observer.is_attached()).unwrap_or(false)
    }

    /// Move the target (page relayout)
    pub fn set_target(&self, target: Bounds) {
        self.with_entry(|e| e.target = target);
    }
}

impl Drop for ObserverHandle {
    fn drop(&mut self) {
        if let Some(inner) = self.registry.upgrade() {
            if let Some(entry) = inner.borrow_mut().entries.remove(&self.id) {
                tracing::debug!("Unobserved '{}' ({:?})", entry.label, self.id);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn viewport_at(y: i32) -> Bounds {
        Bounds::new(0, y, 80, 20)
    }

    fn opts(trigger_once: bool) -> ObserverOptions {
        ObserverOptions {
            trigger_once,
            ..ObserverOptions::default()
        }
    }

    #[test]
    fn test_intersection_ratio() {
        let target = Bounds::new(0, 10, 80, 10);
        assert_eq!(intersection_ratio(&target, &viewport_at(0)), 1.0);
        assert_eq!(intersection_ratio(&target, &viewport_at(15)), 0.5);
        assert_eq!(intersection_ratio(&target, &viewport_at(40)), 0.0);

        let point = Bounds::new(5, 5, 0, 0);
        assert_eq!(intersection_ratio(&point, &viewport_at(0)), 1.0);
    }

    #[test]
    fn test_threshold_boundaries() {
        let target = Bounds::new(0, 19, 80, 10);
        // One of ten rows on screen = 0.1
        assert!(is_intersecting(&target, &viewport_at(0), 0.1));
        assert!(!is_intersecting(&target, &viewport_at(0), 0.2));
        // Touching edges only
        let below = Bounds::new(0, 20, 80, 10);
        assert!(!is_intersecting(&below, &viewport_at(0), 0.0));
    }

    #[test]
    fn test_toggles_without_trigger_once() {
        let mut obs = VisibilityObserver::new(opts(false));
        assert!(!obs.is_visible());
        assert!(obs.handle_entry(true));
        assert!(obs.is_visible());
        assert!(obs.handle_entry(false));
        assert!(!obs.is_visible());
        assert!(obs.handle_entry(true));
        assert!(obs.is_visible());
        assert!(obs.is_attached());
    }

    #[test]
    fn test_trigger_once_pins_and_detaches() {
        let mut obs = VisibilityObserver::new(opts(true));
        assert!(!obs.handle_entry(false));
        assert!(obs.handle_entry(true));
        assert!(!obs.is_attached());

        for _ in 0..3 {
            assert!(!obs.handle_entry(false));
            assert!(obs.is_visible());
        }
    }

    #[test]
    fn test_root_margin_parsing() {
        let m: RootMargin = "0".parse().unwrap();
        assert_eq!(m, RootMargin::default());

        let m: RootMargin = "2 10%".parse().unwrap();
        assert_eq!(m.top, MarginLength::Cells(2));
        assert_eq!(m.bottom, MarginLength::Cells(2));
        assert_eq!(m.left, MarginLength::Percent(10.0));

        let m: RootMargin = "1 2 3 4".parse().unwrap();
        assert_eq!(m.left, MarginLength::Cells(4));

        assert_eq!("".parse::<RootMargin>(), Err(RootMarginError::WrongArity(0)));
        assert_eq!("1 2 3 4 5".parse::<RootMargin>(), Err(RootMarginError::WrongArity(5)));
        assert!(matches!("10px".parse::<RootMargin>(), Err(RootMarginError::InvalidLength(_))));
    }

    #[test]
    fn test_negative_margin_shrinks_viewport() {
        let options = ObserverOptions {
            threshold: 0.0,
            root_margin: "-5 0".parse().unwrap(),
            trigger_once: false,
        };
        let mut obs = VisibilityObserver::new(options);
        // Visible in the raw viewport (rows 16..18) but inside the trimmed bottom margin
        let target = Bounds::new(0, 16, 80, 2);
        assert!(!obs.evaluate(&target, &viewport_at(0)));
        assert!(obs.evaluate(&target, &viewport_at(5)));
    }

    #[test]
    fn test_registry_process_reports_changes() {
        let registry = ObserverRegistry::new();
        let near = registry.observe("near", Bounds::new(0, 5, 80, 5), opts(false));
        let far = registry.observe("far", Bounds::new(0, 100, 80, 5), opts(false));

        let changes = registry.process(viewport_at(0));
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].label, "near");
        assert!(near.is_visible());
        assert!(!far.is_visible());

        // Nothing changed, nothing reported
        assert!(registry.process(viewport_at(0)).is_empty());

        let changes = registry.process(viewport_at(95));
        assert_eq!(changes.len(), 2);
        assert!(!near.is_visible());
        assert!(far.is_visible());
    }

    #[test]
    fn test_registry_trigger_once_stays_revealed() {
        let registry = ObserverRegistry::new();
        let handle = registry.observe("hero", Bounds::new(0, 5, 80, 5), opts(true));
        registry.process(viewport_at(0));
        assert!(handle.is_visible());
        assert_eq!(registry.attached_count(), 0);

        assert!(registry.process(viewport_at(200)).is_empty());
        assert!(handle.is_visible());
    }

    #[test]
    fn test_set_target_moves_observer() {
        let registry = ObserverRegistry::new();
        let handle = registry.observe("block", Bounds::new(0, 100, 80, 5), opts(false));
        registry.process(viewport_at(0));
        assert!(!handle.is_visible());

        handle.set_target(Bounds::new(0, 3, 80, 5));
        registry.process(viewport_at(0));
        assert!(handle.is_visible());
    }

    #[test]
    fn test_drop_releases_subscription() {
        let registry = ObserverRegistry::new();
        let a = registry.observe("a", Bounds::new(0, 0, 10, 1), opts(false));
        let b = registry.observe("b", Bounds::new(0, 0, 10, 1), opts(true));
        assert_eq!(registry.len(), 2);

        drop(a);
        assert_eq!(registry.len(), 1);
        drop(b);
        assert!(registry.is_empty());
    }

    #[test]
    fn test_handle_outliving_registry_is_inert() {
        let registry = ObserverRegistry::new();
        let handle = registry.observe("orphan", Bounds::new(0, 0, 10, 1), opts(false));
        drop(registry);
        assert!(!handle.is_visible());
        assert!(!handle.is_attached());
        handle.set_target(Bounds::new(0, 5, 10, 1));
        assert!(!handle.is_visible());
    }
}
