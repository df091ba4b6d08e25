//! Widget state structs (rendering-agnostic)
//!
//! This module contains the state behind every animated piece of the page:
//! visibility observers, reveal styles, the carousel, the marquee strip,
//! media slots and video embeds. These structs hold data and provide methods
//! for state manipulation, but contain no rendering logic. The TUI frontend
//! reads them and draws with ratatui.

pub mod carousel;
pub mod marquee;
pub mod media;
pub mod reveal;
pub mod video;
pub mod visibility;

pub use carousel::CarouselState;
pub use marquee::{MarqueeDirection, MarqueeState};
pub use media::{AssetSource, FsAssetSource, MediaItem, MediaSlot};
pub use reveal::{RevealAnimator, RevealStyle};
pub use video::VideoEmbed;
pub use visibility::{Bounds, ObserverHandle, ObserverRegistry};
