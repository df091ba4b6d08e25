//! Configuration loader plus strongly typed settings structures.
//!
//! `config.toml` tunes the animation mechanics (reveal thresholds, carousel
//! timing, marquee geometry, scroll feel) and `site.toml` holds the page
//! content. Both ship embedded so the binary runs without any files, and both
//! can be overridden from the data directory (`~/.sangen` by default).

use crate::data::site::{seconds, SiteContent};
use crate::widgets::carousel;
use crate::widgets::visibility::{ObserverOptions, RootMargin, RootMarginError};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

// Embed default configuration files at compile time
const DEFAULT_CONFIG: &str = include_str!("../defaults/config.toml");
const DEFAULT_SITE: &str = include_str!("../defaults/site.toml");

/// Environment variable that overrides the data directory
pub const DATA_DIR_ENV: &str = "SANGEN_DIR";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub ui: UiConfig,
    #[serde(default)]
    pub reveal: RevealConfig,
    #[serde(default)]
    pub carousel: CarouselConfig,
    #[serde(default)]
    pub marquee: MarqueeConfig,
    #[serde(default)]
    pub navigation: NavigationConfig,
    #[serde(default)]
    pub assets: AssetsConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UiConfig {
    #[serde(default = "default_frame_rate")]
    pub frame_rate: u32,
    #[serde(default = "default_cell_width")]
    pub cell_width_px: f32,
    #[serde(default = "default_cell_height")]
    pub cell_height_px: f32,
    #[serde(default = "default_scrolled_threshold")]
    pub scrolled_threshold_px: f32,
    #[serde(default)]
    pub show_perf_stats: bool,
    #[serde(default = "default_compact_width")]
    pub compact_width: u16,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            frame_rate: default_frame_rate(),
            cell_width_px: default_cell_width(),
            cell_height_px: default_cell_height(),
            scrolled_threshold_px: default_scrolled_threshold(),
            show_perf_stats: false,
            compact_width: default_compact_width(),
        }
    }
}

impl UiConfig {
    /// Time budget of one frame
    pub fn frame_interval(&self) -> Duration {
        Duration::from_micros(1_000_000 / self.frame_rate.clamp(1, 240) as u64)
    }

    /// Navbar "scrolled" threshold converted to rows
    pub fn scrolled_threshold_rows(&self) -> f32 {
        self.scrolled_threshold_px / self.cell_height_px.max(1.0)
    }
}

fn default_frame_rate() -> u32 {
    60
}

fn default_cell_width() -> f32 {
    8.0
}

fn default_cell_height() -> f32 {
    16.0
}

fn default_scrolled_threshold() -> f32 {
    50.0
}

fn default_compact_width() -> u16 {
    100
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RevealConfig {
    #[serde(default = "default_threshold")]
    pub threshold: f32,
    #[serde(default = "default_root_margin")]
    pub root_margin: String,
    #[serde(default)]
    pub trigger_once: bool,
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self {
            threshold: default_threshold(),
            root_margin: default_root_margin(),
            trigger_once: false,
        }
    }
}

impl RevealConfig {
    pub fn observer_options(&self) -> Result<ObserverOptions, RootMarginError> {
        Ok(ObserverOptions {
            threshold: self.threshold.clamp(0.0, 1.0),
            root_margin: self.root_margin.parse::<RootMargin>()?,
            trigger_once: self.trigger_once,
        })
    }
}

fn default_threshold() -> f32 {
    0.1
}

fn default_root_margin() -> String {
    "0".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CarouselConfig {
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,
    #[serde(default = "default_slide_ms")]
    pub slide_ms: u64,
}

impl Default for CarouselConfig {
    fn default() -> Self {
        Self {
            interval_ms: default_interval_ms(),
            slide_ms: default_slide_ms(),
        }
    }
}

impl CarouselConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    pub fn slide(&self) -> Duration {
        Duration::from_millis(self.slide_ms)
    }
}

fn default_interval_ms() -> u64 {
    carousel::DEFAULT_INTERVAL.as_millis() as u64
}

fn default_slide_ms() -> u64 {
    carousel::DEFAULT_SLIDE.as_millis() as u64
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarqueeConfig {
    #[serde(default = "default_item_width")]
    pub item_width: u16,
    #[serde(default = "default_gap")]
    pub gap: u16,
    #[serde(default = "default_speed_secs")]
    pub speed_secs: f32,
}

impl Default for MarqueeConfig {
    fn default() -> Self {
        Self {
            item_width: default_item_width(),
            gap: default_gap(),
            speed_secs: default_speed_secs(),
        }
    }
}

impl MarqueeConfig {
    /// Loop length for a strip, preferring the block's own speed
    pub fn speed(&self, block_speed: Option<f32>) -> Duration {
        seconds(block_speed.unwrap_or(self.speed_secs))
    }
}

fn default_item_width() -> u16 {
    32
}

fn default_gap() -> u16 {
    2
}

fn default_speed_secs() -> f32 {
    30.0
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NavigationConfig {
    #[serde(default = "default_smooth_scroll_ms")]
    pub smooth_scroll_ms: u64,
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            smooth_scroll_ms: default_smooth_scroll_ms(),
        }
    }
}

impl NavigationConfig {
    pub fn smooth_scroll(&self) -> Duration {
        Duration::from_millis(self.smooth_scroll_ms)
    }
}

fn default_smooth_scroll_ms() -> u64 {
    450
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetsConfig {
    #[serde(default = "default_asset_root")]
    pub root: PathBuf,
}

impl Default for AssetsConfig {
    fn default() -> Self {
        Self {
            root: default_asset_root(),
        }
    }
}

fn default_asset_root() -> PathBuf {
    PathBuf::from("public")
}

impl Config {
    /// Load `config.toml` from the data directory, or the defaults if absent.
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        if path.exists() {
            Self::load_from_path(&path)
        } else {
            tracing::debug!("No config at {:?}, using defaults", path);
            Ok(Self::default())
        }
    }

    pub fn load_from_path(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {:?}", path))?;
        let config: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file {:?}", path))?;
        tracing::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Load the site description.
    ///
    /// Order: explicit path, then `site.toml` in the data directory, then the
    /// embedded default.
    pub fn load_site(path: Option<&Path>) -> Result<SiteContent> {
        if let Some(path) = path {
            return Self::load_site_from_path(path);
        }
        let path = Self::site_path()?;
        if path.exists() {
            Self::load_site_from_path(&path)
        } else {
            Self::default_site()
        }
    }

    pub fn load_site_from_path(path: &Path) -> Result<SiteContent> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read site file {:?}", path))?;
        let site = SiteContent::from_toml(&contents)
            .with_context(|| format!("Invalid site file {:?}", path))?;
        tracing::info!("Loaded site '{}' from {:?}", site.identity.name, path);
        Ok(site)
    }

    pub fn default_site() -> Result<SiteContent> {
        SiteContent::from_toml(DEFAULT_SITE).context("Embedded site description is invalid")
    }

    /// Get the base sangen directory (~/.sangen/)
    /// Can be overridden with SANGEN_DIR environment variable
    pub fn config_dir() -> Result<PathBuf> {
        if let Ok(custom_dir) = std::env::var(DATA_DIR_ENV) {
            return Ok(PathBuf::from(custom_dir));
        }

        let home = dirs::home_dir().context("Could not find home directory")?;
        Ok(home.join(".sangen"))
    }

    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    pub fn site_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("site.toml"))
    }

    /// Write any default file missing from `dir`. Returns the files created.
    pub fn extract_defaults_to(dir: &Path) -> Result<Vec<PathBuf>> {
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create data directory {:?}", dir))?;

        let mut written = Vec::new();
        for (name, contents) in [("config.toml", DEFAULT_CONFIG), ("site.toml", DEFAULT_SITE)] {
            let path = dir.join(name);
            if path.exists() {
                tracing::debug!("Keeping existing {:?}", path);
                continue;
            }
            fs::write(&path, contents).with_context(|| format!("Failed to write {:?}", path))?;
            written.push(path);
        }
        Ok(written)
    }
}
