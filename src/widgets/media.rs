//! Image slots with placeholder fallback.
//!
//! Every picture on the site is optional. A slot starts out pending, gets
//! resolved once against an [`AssetSource`] when the page mounts, and shows the
//! item's icon + caption whenever the image is missing or fails to load. Load
//! failures never leave this module.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Icon shown for images that don't name their own
pub const DEFAULT_ICON: &str = "🖼️";

/// Marks a slot whose image resolved
pub const PHOTO_ICON: &str = "📷";

/// A picture reference plus the text that goes with it
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaItem {
    /// Path (relative to the asset root) or http(s) URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub src: Option<String>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub title: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    /// Emoji shown in the placeholder
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

impl MediaItem {
    pub fn placeholder_icon(&self) -> &str {
        self.icon.as_deref().unwrap_or(DEFAULT_ICON)
    }

    /// Title, or the file name when the item has none
    pub fn caption(&self) -> String {
        if !self.title.is_empty() {
            return self.title.clone();
        }
        self.src
            .as_deref()
            .and_then(|src| Path::new(src).file_stem())
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

/// What a successful load found
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetKind {
    /// File under the asset root
    Local { path: PathBuf, bytes: u64 },
    /// Remote URL, left to the viewer
    Remote { url: String },
}

#[derive(Debug, Error)]
pub enum AssetError {
    #[error("asset not found: {0}")]
    NotFound(PathBuf),
    #[error("asset is not a file: {0}")]
    NotAFile(PathBuf),
    #[error("unreadable asset {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Resolves image references (the static file server of the site)
pub trait AssetSource {
    fn load(&self, src: &str) -> Result<AssetKind, AssetError>;
}

/// Resolves relative paths under a directory on disk
#[derive(Debug, Clone)]
pub struct FsAssetSource {
    root: PathBuf,
}

impl FsAssetSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Map a site path (`/images/x.png` or `images/x.png`) into the root
    pub fn resolve_path(&self, src: &str) -> PathBuf {
        self.root.join(src.trim_start_matches('/'))
    }
}

impl AssetSource for FsAssetSource {
    fn load(&self, src: &str) -> Result<AssetKind, AssetError> {
        if src.starts_with("http://") || src.starts_with("https://") {
            return Ok(AssetKind::Remote { url: src.to_string() });
        }
        let path = self.resolve_path(src);
        let meta = match std::fs::metadata(&path) {
            Ok(meta) => meta,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(AssetError::NotFound(path));
            }
            Err(source) => return Err(AssetError::Io { path, source }),
        };
        if !meta.is_file() {
            return Err(AssetError::NotAFile(path));
        }
        Ok(AssetKind::Local { bytes: meta.len(), path })
    }
}

/// Load state of a slot
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetState {
    /// Not resolved yet
    Pending,
    /// Item has no image at all
    Absent,
    Loaded(AssetKind),
    Failed,
}

/// One image position on the page
#[derive(Debug, Clone)]
pub struct MediaSlot {
    item: MediaItem,
    state: AssetState,
}

impl MediaSlot {
    pub fn new(item: MediaItem) -> Self {
        let state = if item.src.as_deref().map_or(true, |s| s.trim().is_empty()) {
            AssetState::Absent
        } else {
            AssetState::Pending
        };
        Self { item, state }
    }

    pub fn item(&self) -> &MediaItem {
        &self.item
    }

    /// Resolve the image once. Later calls are no-ops.
    pub fn resolve(&mut self, source: &dyn AssetSource) {
        if self.state != AssetState::Pending {
            return;
        }
        let Some(src) = self.item.src.as_deref() else {
            self.state = AssetState::Absent;
            return;
        };
        match source.load(src) {
            Ok(kind) => {
                if let AssetKind::Local { path, bytes } = &kind {
                    tracing::trace!("Loaded {:?} ({} bytes)", path, bytes);
                }
                self.state = AssetState::Loaded(kind);
            }
            Err(e) => {
                tracing::debug!("Using placeholder for '{}': {}", src, e);
                self.fail();
            }
        }
    }

    /// Swap in the placeholder. Returns false if it was already showing.
    pub fn fail(&mut self) -> bool {
        match self.state {
            AssetState::Failed | AssetState::Absent => false,
            _ => {
                self.state = AssetState::Failed;
                true
            }
        }
    }

    pub fn shows_image(&self) -> bool {
        matches!(self.state, AssetState::Loaded(_))
    }

    pub fn shows_placeholder(&self) -> bool {
        matches!(self.state, AssetState::Failed | AssetState::Absent)
    }

    /// Icon standing in for the slot: the photo mark once loaded, else the item's own
    pub fn display_icon(&self) -> &str {
        if self.shows_image() {
            PHOTO_ICON
        } else {
            self.item.placeholder_icon()
        }
    }

    /// Short label for the loaded image (file name or URL)
    pub fn image_label(&self) -> Option<String> {
        match &self.state {
            AssetState::Loaded(AssetKind::Local { path, .. }) => path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned()),
            AssetState::Loaded(AssetKind::Remote { url }) => Some(url.clone()),
            _ => None,
        }
    }
}
