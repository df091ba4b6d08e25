//! Site description: identity, sections and their content blocks.
//!
//! Pure data deserialized from `site.toml`. Each section is one page anchor
//! and holds an ordered list of blocks. Every block carries its reveal
//! animation next to its content.

use crate::widgets::media::{AssetSource, MediaItem};
use crate::widgets::reveal::{RevealVariant, DEFAULT_DURATION};
use crate::widgets::video::youtube_video_id;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SiteError {
    #[error("failed to parse site description: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("site has no sections")]
    NoSections,
    #[error("section #{0} has an empty anchor")]
    EmptyAnchor(usize),
    #[error("duplicate section anchor '{0}'")]
    DuplicateAnchor(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteContent {
    pub identity: Identity,
    #[serde(default, rename = "section")]
    pub sections: Vec<SectionSpec>,
}

/// Name, tagline and logo shown in the navbar
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Identity {
    pub name: String,
    #[serde(default)]
    pub tagline: String,
    #[serde(default = "default_logo")]
    pub logo: MediaItem,
}

fn default_logo() -> MediaItem {
    MediaItem {
        icon: Some("🏘️".to_string()),
        ..MediaItem::default()
    }
}

/// Background family of a section
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionTone {
    Primary,
    Secondary,
    Accent,
    Light,
    #[default]
    Plain,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionSpec {
    /// Page anchor (`beranda`, `profil`, ...)
    pub anchor: String,
    /// Navbar label
    pub label: String,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub tone: SectionTone,
    #[serde(default, rename = "block")]
    pub blocks: Vec<BlockSpec>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockSpec {
    #[serde(default)]
    pub reveal: RevealSpec,
    pub content: BlockContent,
}

/// Reveal animation of one block, as written in the site file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RevealSpec {
    #[serde(default = "default_animation")]
    pub animation: String,
    /// Seconds
    #[serde(default)]
    pub delay: f32,
    /// Seconds
    #[serde(default = "default_duration")]
    pub duration: f32,
}

fn default_animation() -> String {
    RevealVariant::FadeIn.name().to_string()
}

fn default_duration() -> f32 {
    DEFAULT_DURATION.as_secs_f32()
}

impl Default for RevealSpec {
    fn default() -> Self {
        Self {
            animation: default_animation(),
            delay: 0.0,
            duration: default_duration(),
        }
    }
}

impl RevealSpec {
    pub fn variant(&self) -> RevealVariant {
        RevealVariant::from_name_lossy(&self.animation)
    }

    pub fn delay(&self) -> Duration {
        seconds(self.delay)
    }

    pub fn duration(&self) -> Duration {
        seconds(self.duration)
    }
}

/// Seconds as written in TOML, to whole milliseconds. Negative or NaN is zero.
pub fn seconds(secs: f32) -> Duration {
    if secs.is_finite() && secs > 0.0 {
        Duration::from_millis((f64::from(secs) * 1000.0).round() as u64)
    } else {
        Duration::ZERO
    }
}

/// One labelled value (service, personal data, location detail)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fact {
    #[serde(default)]
    pub icon: String,
    pub label: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum BlockContent {
    /// Big greeting: title, highlighted second line, tagline
    Hero {
        title: String,
        highlight: String,
        #[serde(default)]
        tagline: String,
    },
    Heading {
        text: String,
        #[serde(default)]
        highlight: String,
        #[serde(default)]
        subtitle: String,
    },
    Text {
        #[serde(default)]
        title: String,
        paragraphs: Vec<String>,
    },
    Carousel {
        images: Vec<MediaItem>,
    },
    Facts {
        #[serde(default)]
        title: String,
        #[serde(default)]
        subtitle: String,
        items: Vec<Fact>,
    },
    Image {
        image: MediaItem,
    },
    Video {
        url: String,
        #[serde(default)]
        title: String,
        #[serde(default)]
        description: String,
    },
    Link {
        label: String,
        url: String,
        #[serde(default)]
        icon: String,
    },
    Marquee {
        images: Vec<MediaItem>,
        /// Seconds per loop (config default when absent)
        #[serde(default)]
        speed: Option<f32>,
        #[serde(default)]
        direction: String,
    },
    Callout {
        #[serde(default)]
        icon: String,
        title: String,
        text: String,
    },
}

impl BlockContent {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Hero { .. } => "hero",
            Self::Heading { .. } => "heading",
            Self::Text { .. } => "text",
            Self::Carousel { .. } => "carousel",
            Self::Facts { .. } => "facts",
            Self::Image { .. } => "image",
            Self::Video { .. } => "video",
            Self::Link { .. } => "link",
            Self::Marquee { .. } => "marquee",
            Self::Callout { .. } => "callout",
        }
    }

    /// Every image referenced by the block
    pub fn media(&self) -> Vec<&MediaItem> {
        match self {
            Self::Carousel { images } | Self::Marquee { images, .. } => images.iter().collect(),
            Self::Image { image } => vec![image],
            _ => Vec::new(),
        }
    }
}

/// Non-fatal problem found by [`SiteContent::warnings`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteWarning {
    /// `anchor#block` the warning refers to
    pub location: String,
    pub message: String,
}

impl std::fmt::Display for SiteWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.location, self.message)
    }
}

impl SiteContent {
    /// Parse and check a site description.
    pub fn from_toml(contents: &str) -> Result<Self, SiteError> {
        let site: SiteContent = toml::from_str(contents)?;
        site.check()?;
        Ok(site)
    }

    /// Structural errors: the page can't be built without these fixed.
    pub fn check(&self) -> Result<(), SiteError> {
        if self.sections.is_empty() {
            return Err(SiteError::NoSections);
        }
        let mut seen = HashSet::new();
        for (i, section) in self.sections.iter().enumerate() {
            let anchor = section.anchor.trim();
            if anchor.is_empty() {
                return Err(SiteError::EmptyAnchor(i));
            }
            if !seen.insert(anchor) {
                return Err(SiteError::DuplicateAnchor(anchor.to_string()));
            }
        }
        Ok(())
    }

    /// Content that renders, but probably not the way the author meant.
    pub fn warnings(&self, assets: &dyn AssetSource) -> Vec<SiteWarning> {
        let mut warnings = Vec::new();
        if let Some(src) = self.identity.logo.src.as_deref() {
            if let Err(e) = assets.load(src) {
                warnings.push(SiteWarning {
                    location: "identity".to_string(),
                    message: format!("logo will use its fallback icon ({})", e),
                });
            }
        }

        for section in &self.sections {
            for (i, block) in section.blocks.iter().enumerate() {
                let location = format!("{}#{}", section.anchor, i);
                let mut warn = |message: String| {
                    warnings.push(SiteWarning {
                        location: location.clone(),
                        message,
                    })
                };

                if block.reveal.animation.parse::<RevealVariant>().is_err() {
                    warn(format!(
                        "unknown animation '{}', fade-in will be used",
                        block.reveal.animation
                    ));
                }

                match &block.content {
                    BlockContent::Carousel { images } if images.is_empty() => {
                        warn("carousel has no images".to_string());
                    }
                    BlockContent::Marquee { images, .. } if images.is_empty() => {
                        warn("marquee has no images".to_string());
                    }
                    BlockContent::Marquee { speed: Some(speed), .. } if *speed <= 0.0 => {
                        warn(format!("marquee speed {} will not move", speed));
                    }
                    BlockContent::Video { url, .. } if youtube_video_id(url).is_none() => {
                        warn(format!("'{}' is not a recognised YouTube link", url));
                    }
                    _ => {}
                }

                for item in block.content.media() {
                    let Some(src) = item.src.as_deref() else {
                        continue;
                    };
                    if let Err(e) = assets.load(src) {
                        warn(format!("placeholder will be shown: {}", e));
                    }
                }
            }
        }
        warnings
    }
}
