//! Video link normalisation for the "Video Profil" block.
//!
//! The site links a single YouTube video. Players want the `/embed/` form, so we
//! pull the 11-character video id out of whatever share link was configured.
//! Anything we can't recognise is passed through untouched.

use regex::Regex;
use std::sync::LazyLock;

/// Matches the common YouTube URL shapes and captures the id candidate.
static VIDEO_ID: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^.*(youtu\.be/|v/|u/\w/|embed/|watch\?v=|&v=)([^#&?]*).*")
        .expect("video id pattern is valid")
});

/// Length of a YouTube video id
const VIDEO_ID_LEN: usize = 11;

const EMBED_BASE: &str = "https://www.youtube.com/embed/";
const EMBED_PARAMS: &str = "?rel=0&modestbranding=1&showinfo=0";

/// Extract the video id from a YouTube URL, if it has one.
pub fn youtube_video_id(url: &str) -> Option<&str> {
    let caps = VIDEO_ID.captures(url)?;
    let id = caps.get(2)?.as_str();
    (id.len() == VIDEO_ID_LEN).then_some(id)
}

/// Convert a YouTube URL to its embeddable form.
///
/// Returns the input unchanged when no id can be extracted.
pub fn youtube_embed_url(url: &str) -> String {
    match youtube_video_id(url) {
        Some(id) => format!("{}{}{}", EMBED_BASE, id, EMBED_PARAMS),
        None => url.to_string(),
    }
}

/// Resolved video reference held by a video block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoEmbed {
    /// URL as written in the site description
    pub source: String,
    /// Extracted id (None if the URL wasn't recognised)
    pub video_id: Option<String>,
    /// URL handed to the external player
    pub embed_url: String,
}

impl VideoEmbed {
    pub fn from_url(url: &str) -> Self {
        let url = url.trim();
        Self {
            source: url.to_string(),
            video_id: youtube_video_id(url).map(str::to_string),
            embed_url: youtube_embed_url(url),
        }
    }

    /// True when there is anything to hand to a player at all.
    ///
    /// An empty source shows the "video coming soon" placeholder instead.
    pub fn is_available(&self) -> bool {
        !self.embed_url.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_link_with_share_params() {
        let url = "https://youtu.be/5LgFuPKB_S0?si=MGskaeEJy0ft7Wfd";
        assert_eq!(youtube_video_id(url), Some("5LgFuPKB_S0"));
        assert_eq!(
            youtube_embed_url(url),
            "https://www.youtube.com/embed/5LgFuPKB_S0?rel=0&modestbranding=1&showinfo=0"
        );
    }

    #[test]
    fn test_known_url_shapes() {
        let cases = [
            "https://www.youtube.com/watch?v=dQw4w9WgXcQ",
            "https://www.youtube.com/watch?feature=share&v=dQw4w9WgXcQ",
            "https://www.youtube.com/embed/dQw4w9WgXcQ",
            "https://www.youtube.com/v/dQw4w9WgXcQ?version=3",
            "https://www.youtube.com/u/w/dQw4w9WgXcQ",
            "https://www.youtube.com/watch?v=dQw4w9WgXcQ#t=30",
        ];
        for url in cases {
            assert_eq!(youtube_video_id(url), Some("dQw4w9WgXcQ"), "{}", url);
        }
    }

    #[test]
    fn test_unparseable_passes_through() {
        for url in ["not a url", "https://vimeo.com/123456", "https://youtu.be/short"] {
            assert_eq!(youtube_embed_url(url), url);
        }
    }

    #[test]
    fn test_empty_url_has_no_embed() {
        let embed = VideoEmbed::from_url("   ");
        assert_eq!(embed.embed_url, "");
        assert!(embed.video_id.is_none());
        assert!(!embed.is_available());
    }

    #[test]
    fn test_video_embed_from_url() {
        let embed = VideoEmbed::from_url("https://youtu.be/5LgFuPKB_S0?si=abc");
        assert_eq!(embed.video_id.as_deref(), Some("5LgFuPKB_S0"));
        assert!(embed.embed_url.starts_with("https://www.youtube.com/embed/5LgFuPKB_S0"));
        assert!(embed.is_available());
    }
}
