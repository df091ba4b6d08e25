//! Scroll-reveal animation styles.
//!
//! Every animated block on the page names one of a fixed set of reveal variants.
//! A variant only decides what the block looks like while hidden; once its
//! visibility flag turns on, every variant settles on opacity 1 with the identity
//! transform. Transforms are expressed in CSS units (px / degrees) and the
//! frontend converts them to terminal cells when it draws.

use std::fmt;
use std::str::FromStr;
use std::time::{Duration, Instant};
use thiserror::Error;

/// Default transition length used when a block doesn't specify one
pub const DEFAULT_DURATION: Duration = Duration::from_millis(600);

/// Distance (px) a slide variant travels
const SLIDE_DISTANCE: f32 = 50.0;

/// Reveal animation variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RevealVariant {
    FadeIn,
    SlideUp,
    SlideDown,
    SlideLeft,
    SlideRight,
    ScaleIn,
    PopIn,
    RotateIn,
    FlipIn,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown reveal animation '{0}'")]
pub struct UnknownVariant(pub String);

impl RevealVariant {
    pub const ALL: [RevealVariant; 9] = [
        RevealVariant::FadeIn,
        RevealVariant::SlideUp,
        RevealVariant::SlideDown,
        RevealVariant::SlideLeft,
        RevealVariant::SlideRight,
        RevealVariant::ScaleIn,
        RevealVariant::PopIn,
        RevealVariant::RotateIn,
        RevealVariant::FlipIn,
    ];

    /// Name used in site descriptions
    pub fn name(&self) -> &'static str {
        match self {
            Self::FadeIn => "fade-in",
            Self::SlideUp => "slide-up",
            Self::SlideDown => "slide-down",
            Self::SlideLeft => "slide-left",
            Self::SlideRight => "slide-right",
            Self::ScaleIn => "scale-in",
            Self::PopIn => "pop-in",
            Self::RotateIn => "rotate-in",
            Self::FlipIn => "flip-in",
        }
    }

    /// Parse a variant name, falling back to `fade-in` for anything unknown.
    pub fn from_name_lossy(name: &str) -> Self {
        match name.parse() {
            Ok(variant) => variant,
            Err(UnknownVariant(name)) => {
                tracing::debug!("Unknown reveal animation '{}', using fade-in", name);
                Self::FadeIn
            }
        }
    }

    /// Transform applied while the block is hidden
    pub fn hidden_transform(&self) -> Transform {
        let id = Transform::IDENTITY;
        match self {
            Self::FadeIn => id,
            Self::SlideUp => Transform { translate_y: SLIDE_DISTANCE, ..id },
            Self::SlideDown => Transform { translate_y: -SLIDE_DISTANCE, ..id },
            Self::SlideLeft => Transform { translate_x: SLIDE_DISTANCE, ..id },
            Self::SlideRight => Transform { translate_x: -SLIDE_DISTANCE, ..id },
            Self::ScaleIn => Transform { scale: 0.8, ..id },
            Self::PopIn => Transform { scale: 0.5, ..id },
            Self::RotateIn => Transform { rotate: -180.0, scale: 0.5, ..id },
            Self::FlipIn => Transform { rotate_y: -90.0, ..id },
        }
    }

    pub fn easing(&self) -> Easing {
        match self {
            Self::PopIn => Easing::OVERSHOOT,
            _ => Easing::EaseOut,
        }
    }
}

impl FromStr for RevealVariant {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|v| v.name().eq_ignore_ascii_case(name))
            .ok_or_else(|| UnknownVariant(name.to_string()))
    }
}

impl fmt::Display for RevealVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// 2D transform plus a Y-axis rotation, in CSS units
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    /// Horizontal offset in px
    pub translate_x: f32,
    /// Vertical offset in px
    pub translate_y: f32,
    /// Uniform scale factor
    pub scale: f32,
    /// Rotation in the screen plane, degrees
    pub rotate: f32,
    /// Rotation around the vertical axis, degrees
    pub rotate_y: f32,
}

impl Transform {
    pub const IDENTITY: Transform = Transform {
        translate_x: 0.0,
        translate_y: 0.0,
        scale: 1.0,
        rotate: 0.0,
        rotate_y: 0.0,
    };

    /// No rotation or scaling: at most a translation
    pub fn is_upright(&self) -> bool {
        self.scale == 1.0 && self.rotate == 0.0 && self.rotate_y == 0.0
    }

    /// Component-wise interpolation. `t` is not clamped so overshooting
    /// easings can carry the transform past its target.
    pub fn lerp(&self, to: &Transform, t: f32) -> Transform {
        let mix = |a: f32, b: f32| a + (b - a) * t;
        Transform {
            translate_x: mix(self.translate_x, to.translate_x),
            translate_y: mix(self.translate_y, to.translate_y),
            scale: mix(self.scale, to.scale),
            rotate: mix(self.rotate, to.rotate),
            rotate_y: mix(self.rotate_y, to.rotate_y),
        }
    }
}

/// Timing function of a transition
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Easing {
    EaseOut,
    EaseInOut,
    CubicBezier(f32, f32, f32, f32),
}

impl Easing {
    /// Back-out curve used by `pop-in`
    pub const OVERSHOOT: Easing = Easing::CubicBezier(0.68, -0.55, 0.265, 1.55);

    fn control_points(&self) -> (f32, f32, f32, f32) {
        match *self {
            Easing::EaseOut => (0.0, 0.0, 0.58, 1.0),
            Easing::EaseInOut => (0.42, 0.0, 0.58, 1.0),
            Easing::CubicBezier(x1, y1, x2, y2) => (x1, y1, x2, y2),
        }
    }

    /// Map linear progress `t` in [0, 1] to eased progress.
    pub fn apply(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        let (x1, y1, x2, y2) = self.control_points();
        if t == 0.0 || t == 1.0 {
            return t;
        }
        let s = solve_bezier_x(t, x1, x2);
        bezier(s, y1, y2)
    }
}

/// One coordinate of a cubic Bézier with endpoints fixed at 0 and 1.
fn bezier(s: f32, p1: f32, p2: f32) -> f32 {
    let inv = 1.0 - s;
    3.0 * inv * inv * s * p1 + 3.0 * inv * s * s * p2 + s * s * s
}

fn bezier_slope(s: f32, p1: f32, p2: f32) -> f32 {
    let inv = 1.0 - s;
    3.0 * inv * inv * p1 + 6.0 * inv * s * (p2 - p1) + 3.0 * s * s * (1.0 - p2)
}

/// Find the curve parameter whose x equals `x`.
fn solve_bezier_x(x: f32, x1: f32, x2: f32) -> f32 {
    let mut s = x;
    for _ in 0..8 {
        let err = bezier(s, x1, x2) - x;
        if err.abs() < 1e-6 {
            return s;
        }
        let slope = bezier_slope(s, x1, x2);
        if slope.abs() < 1e-6 {
            break;
        }
        s -= err / slope;
    }

    // Newton stalled, bisect instead (x is monotonic for x1, x2 in [0, 1])
    let (mut lo, mut hi) = (0.0f32, 1.0f32);
    s = x;
    for _ in 0..32 {
        let value = bezier(s, x1, x2);
        if (value - x).abs() < 1e-6 {
            break;
        }
        if value < x {
            lo = s;
        } else {
            hi = s;
        }
        s = (lo + hi) / 2.0;
    }
    s
}

/// Transition timing for a reveal
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transition {
    pub duration: Duration,
    pub delay: Duration,
    pub easing: Easing,
}

impl Transition {
    /// Eased progress after `elapsed` since the transition was triggered.
    pub fn progress(&self, elapsed: Duration) -> f32 {
        if elapsed < self.delay {
            return 0.0;
        }
        if self.duration.is_zero() {
            return 1.0;
        }
        let t = (elapsed - self.delay).as_secs_f32() / self.duration.as_secs_f32();
        self.easing.apply(t.min(1.0))
    }

    /// Time from trigger until the transition has settled
    pub fn total(&self) -> Duration {
        self.delay + self.duration
    }
}

/// Concrete style of a revealed (or hidden) block
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RevealStyle {
    pub opacity: f32,
    pub transform: Transform,
    pub transition: Transition,
}

/// Style of a block for the given visibility.
pub fn reveal_style(
    variant: RevealVariant,
    visible: bool,
    delay: Duration,
    duration: Duration,
) -> RevealStyle {
    let transition = Transition {
        duration,
        delay,
        easing: variant.easing(),
    };
    if visible {
        RevealStyle {
            opacity: 1.0,
            transform: Transform::IDENTITY,
            transition,
        }
    } else {
        RevealStyle {
            opacity: 0.0,
            transform: variant.hidden_transform(),
            transition,
        }
    }
}

/// Animates a block between its hidden and shown styles over time.
///
/// Mirrors how a CSS transition behaves when the target style changes: the
/// animation starts from wherever the block currently is, waits out the
/// delay, then eases toward the new target.
#[derive(Debug, Clone)]
pub struct RevealAnimator {
    variant: RevealVariant,
    delay: Duration,
    duration: Duration,
    visible: bool,
    from_opacity: f32,
    from_transform: Transform,
    changed_at: Option<Instant>,
}

impl RevealAnimator {
    /// New animator, settled in the hidden state
    pub fn new(variant: RevealVariant, delay: Duration, duration: Duration) -> Self {
        let hidden = reveal_style(variant, false, delay, duration);
        Self {
            variant,
            delay,
            duration,
            visible: false,
            from_opacity: hidden.opacity,
            from_transform: hidden.transform,
            changed_at: None,
        }
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn target(&self) -> RevealStyle {
        reveal_style(self.variant, self.visible, self.delay, self.duration)
    }

    /// Update the visibility flag. Returns true if it changed.
    pub fn set_visible(&mut self, visible: bool, now: Instant) -> bool {
        if visible == self.visible {
            return false;
        }
        let current = self.current(now);
        self.from_opacity = current.opacity;
        self.from_transform = current.transform;
        self.visible = visible;
        self.changed_at = Some(now);
        true
    }

    /// Interpolated style at `now`
    pub fn current(&self, now: Instant) -> RevealStyle {
        let target = self.target();
        let Some(changed_at) = self.changed_at else {
            return target;
        };
        let p = target
            .transition
            .progress(now.saturating_duration_since(changed_at));
        RevealStyle {
            opacity: (self.from_opacity + (target.opacity - self.from_opacity) * p).clamp(0.0, 1.0),
            transform: self.from_transform.lerp(&target.transform, p),
            transition: target.transition,
        }
    }

    /// True while a transition is still in flight
    pub fn is_animating(&self, now: Instant) -> bool {
        self.changed_at
            .map(|t| now.saturating_duration_since(t) < self.target().transition.total())
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DELAY: Duration = Duration::from_millis(200);

    #[test]
    fn test_opacity_follows_visibility_for_every_variant() {
        for variant in RevealVariant::ALL {
            let hidden = reveal_style(variant, false, DELAY, DEFAULT_DURATION);
            let shown = reveal_style(variant, true, DELAY, DEFAULT_DURATION);
            assert_eq!(hidden.opacity, 0.0, "{}", variant);
            assert_eq!(shown.opacity, 1.0, "{}", variant);
            assert_eq!(shown.transform, Transform::IDENTITY, "{}", variant);
            assert_eq!(shown.transition.delay, DELAY);
            assert_eq!(shown.transition.duration, DEFAULT_DURATION);
        }
    }

    #[test]
    fn test_hidden_transforms() {
        assert_eq!(RevealVariant::SlideUp.hidden_transform().translate_y, 50.0);
        assert_eq!(RevealVariant::SlideDown.hidden_transform().translate_y, -50.0);
        assert_eq!(RevealVariant::SlideLeft.hidden_transform().translate_x, 50.0);
        assert_eq!(RevealVariant::SlideRight.hidden_transform().translate_x, -50.0);
        assert_eq!(RevealVariant::ScaleIn.hidden_transform().scale, 0.8);
        assert_eq!(RevealVariant::PopIn.hidden_transform().scale, 0.5);

        let rotate = RevealVariant::RotateIn.hidden_transform();
        assert_eq!(rotate.rotate, -180.0);
        assert_eq!(rotate.scale, 0.5);

        assert_eq!(RevealVariant::FlipIn.hidden_transform().rotate_y, -90.0);
        assert_eq!(RevealVariant::FadeIn.hidden_transform(), Transform::IDENTITY);
        assert!(RevealVariant::SlideLeft.hidden_transform().is_upright());
        assert!(!rotate.is_upright());
    }

    #[test]
    fn test_only_pop_in_overshoots() {
        for variant in RevealVariant::ALL {
            let expected = if variant == RevealVariant::PopIn {
                Easing::OVERSHOOT
            } else {
                Easing::EaseOut
            };
            assert_eq!(variant.easing(), expected, "{}", variant);
        }
    }

    #[test]
    fn test_variant_names_round_trip() {
        for variant in RevealVariant::ALL {
            assert_eq!(variant.name().parse::<RevealVariant>(), Ok(variant));
        }
        assert_eq!("  Slide-Up ".parse::<RevealVariant>(), Ok(RevealVariant::SlideUp));
    }

    #[test]
    fn test_unknown_variant_falls_back_to_fade() {
        assert_eq!(
            "zoom-in".parse::<RevealVariant>(),
            Err(UnknownVariant("zoom-in".to_string()))
        );
        assert_eq!(RevealVariant::from_name_lossy("zoom-in"), RevealVariant::FadeIn);
        assert_eq!(RevealVariant::from_name_lossy(""), RevealVariant::FadeIn);
    }

    #[test]
    fn test_easing_endpoints_and_shape() {
        for easing in [Easing::EaseOut, Easing::EaseInOut, Easing::OVERSHOOT] {
            assert_eq!(easing.apply(0.0), 0.0);
            assert_eq!(easing.apply(1.0), 1.0);
        }
        // ease-out front-loads progress
        assert!(Easing::EaseOut.apply(0.5) > 0.5);
        assert!((Easing::EaseInOut.apply(0.5) - 0.5).abs() < 0.01);

        // back-out dips below zero early and overshoots late
        let samples: Vec<f32> = (1..20).map(|i| Easing::OVERSHOOT.apply(i as f32 / 20.0)).collect();
        assert!(samples.iter().any(|&v| v < 0.0));
        assert!(samples.iter().any(|&v| v > 1.0));
    }

    #[test]
    fn test_transition_respects_delay() {
        let style = reveal_style(RevealVariant::FadeIn, true, DELAY, DEFAULT_DURATION);
        let t = style.transition;
        assert_eq!(t.progress(Duration::from_millis(100)), 0.0);
        assert_eq!(t.progress(DELAY), 0.0);
        assert_eq!(t.progress(t.total()), 1.0);
        assert_eq!(t.progress(t.total() * 2), 1.0);
        assert_eq!(t.total(), Duration::from_millis(800));
    }

    #[test]
    fn test_animator_settles_on_target() {
        let start = Instant::now();
        let mut anim = RevealAnimator::new(RevealVariant::SlideUp, Duration::ZERO, DEFAULT_DURATION);
        assert_eq!(anim.current(start).opacity, 0.0);
        assert!(!anim.is_animating(start));

        assert!(anim.set_visible(true, start));
        assert!(!anim.set_visible(true, start));
        assert!(anim.is_animating(start + Duration::from_millis(300)));

        let mid = anim.current(start + Duration::from_millis(300));
        assert!(mid.opacity > 0.0 && mid.opacity < 1.0);
        assert!(mid.transform.translate_y > 0.0 && mid.transform.translate_y < 50.0);

        let done = anim.current(start + DEFAULT_DURATION);
        assert_eq!(done.opacity, 1.0);
        assert_eq!(done.transform, Transform::IDENTITY);
        assert!(!anim.is_animating(start + DEFAULT_DURATION));
    }

    #[test]
    fn test_animator_reverses_from_current_position() {
        let start = Instant::now();
        let mut anim = RevealAnimator::new(RevealVariant::FadeIn, Duration::ZERO, DEFAULT_DURATION);
        anim.set_visible(true, start);

        let flip_at = start + Duration::from_millis(300);
        let before = anim.current(flip_at).opacity;
        anim.set_visible(false, flip_at);

        // No jump at the moment of reversal
        let after = anim.current(flip_at).opacity;
        assert!((before - after).abs() < 1e-6);
        assert_eq!(anim.current(flip_at + DEFAULT_DURATION).opacity, 0.0);
    }

    #[test]
    fn test_pop_in_opacity_stays_in_range() {
        let start = Instant::now();
        let mut anim = RevealAnimator::new(RevealVariant::PopIn, Duration::ZERO, DEFAULT_DURATION);
        anim.set_visible(true, start);
        for ms in (0..=600).step_by(20) {
            let style = anim.current(start + Duration::from_millis(ms));
            assert!((0.0..=1.0).contains(&style.opacity));
        }
    }
}
