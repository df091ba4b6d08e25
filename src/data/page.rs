//! Page geometry: where every block of the site sits on the scrollable page.
//!
//! The page is one long column of terminal rows. Sections stack top to bottom,
//! blocks stack inside their section. Heights depend on the terminal width
//! (text wraps), so the layout is rebuilt on every resize.

use crate::data::site::{BlockContent, SiteContent};
use crate::widgets::visibility::Bounds;
use ratatui::text::Line;

/// Blank rows above and below the blocks of a section
pub const SECTION_PADDING: u16 = 2;
/// Blank rows between two blocks
pub const BLOCK_GAP: u16 = 1;
/// Widest the text column gets on large terminals
pub const MAX_CONTENT_WIDTH: u16 = 100;
/// Columns kept free on each side of the text column
pub const SIDE_MARGIN: u16 = 2;
/// Height of a carousel or picture frame
pub const MEDIA_HEIGHT: u16 = 14;
/// Height of the video frame
pub const VIDEO_HEIGHT: u16 = 15;
/// Height of one marquee card (picture part)
pub const MARQUEE_CARD_HEIGHT: u16 = 8;
/// Card plus the two caption rows under it
pub const MARQUEE_HEIGHT: u16 = MARQUEE_CARD_HEIGHT + 2;
/// Facts are laid out in two columns from this width on
pub const TWO_COLUMN_WIDTH: u16 = 60;
/// Columns between the two fact columns
pub const COLUMN_GAP: u16 = 2;

/// Display width of a string in terminal cells
pub fn text_width(text: &str) -> usize {
    Line::from(text).width()
}

/// Greedy word wrap to `width` cells. Words wider than a line are split.
pub fn wrap_text(text: &str, width: u16) -> Vec<String> {
    let width = width.max(1) as usize;
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_width = 0;

    for word in text.split_whitespace() {
        let word_width = text_width(word);
        if word_width > width {
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
                current_width = 0;
            }
            for ch in word.chars() {
                let w = text_width(ch.encode_utf8(&mut [0; 4]));
                if current_width + w > width && !current.is_empty() {
                    lines.push(std::mem::take(&mut current));
                    current_width = 0;
                }
                current.push(ch);
                current_width += w;
            }
            continue;
        }

        let needed = if current.is_empty() { word_width } else { current_width + 1 + word_width };
        if needed > width {
            lines.push(std::mem::take(&mut current));
            current.push_str(word);
            current_width = word_width;
        } else {
            if !current.is_empty() {
                current.push(' ');
            }
            current.push_str(word);
            current_width = needed;
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

fn wrapped_rows(text: &str, width: u16) -> u16 {
    wrap_text(text, width).len() as u16
}

/// Number of fact columns for a block `width` cells wide
pub fn fact_columns(width: u16) -> u16 {
    if width >= TWO_COLUMN_WIDTH {
        2
    } else {
        1
    }
}

/// Width of one fact column
pub fn fact_column_width(width: u16) -> u16 {
    let cols = fact_columns(width);
    (width.saturating_sub((cols - 1) * COLUMN_GAP)) / cols
}

/// Rows taken by one fact: label line plus the wrapped value (indented 3)
pub fn fact_height(value: &str, column_width: u16) -> u16 {
    1 + wrapped_rows(value, column_width.saturating_sub(3)).max(1)
}

/// Rows a block needs when laid out `width` cells wide.
pub fn block_height(content: &BlockContent, width: u16) -> u16 {
    match content {
        BlockContent::Hero { tagline, .. } => {
            let tagline_rows = if tagline.is_empty() { 0 } else { 1 + wrapped_rows(tagline, width) };
            2 + tagline_rows
        }
        BlockContent::Heading { text, highlight, subtitle } => {
            let heading = format!("{} {}", text, highlight);
            let subtitle_rows = if subtitle.is_empty() { 0 } else { 1 + wrapped_rows(subtitle, width) };
            wrapped_rows(&heading, width).max(1) + subtitle_rows
        }
        BlockContent::Text { title, paragraphs } => {
            let title_rows = if title.is_empty() { 0 } else { wrapped_rows(title, width) + 1 };
            let body: u16 = paragraphs.iter().map(|p| wrapped_rows(p, width)).sum();
            let gaps = paragraphs.len().saturating_sub(1) as u16;
            (title_rows + body + gaps).max(1)
        }
        BlockContent::Carousel { .. } => MEDIA_HEIGHT,
        BlockContent::Facts { title, subtitle, items } => {
            let mut rows = 0;
            if !title.is_empty() {
                rows += wrapped_rows(title, width);
            }
            if !subtitle.is_empty() {
                rows += wrapped_rows(subtitle, width);
            }
            if rows > 0 {
                rows += 1;
            }
            let cols = fact_columns(width) as usize;
            let col_width = fact_column_width(width);
            let grid_rows: Vec<u16> = items
                .chunks(cols)
                .map(|row| row.iter().map(|f| fact_height(&f.value, col_width)).max().unwrap_or(0))
                .collect();
            let gaps = grid_rows.len().saturating_sub(1) as u16;
            (rows + grid_rows.iter().sum::<u16>() + gaps).max(1)
        }
        BlockContent::Image { .. } => MEDIA_HEIGHT + 1,
        BlockContent::Video { .. } => VIDEO_HEIGHT + 1,
        BlockContent::Link { .. } => 3,
        BlockContent::Marquee { .. } => MARQUEE_HEIGHT,
        BlockContent::Callout { text, .. } => 3 + wrapped_rows(text, width.saturating_sub(4)).max(1),
    }
}

/// Whether a block spans the full terminal width instead of the text column
pub fn is_full_bleed(content: &BlockContent) -> bool {
    matches!(content, BlockContent::Marquee { .. })
}

/// Position of one block on the page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockLayout {
    pub section: usize,
    /// Index of the block inside its section
    pub index: usize,
    pub bounds: Bounds,
}

/// Vertical extent of one section
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionLayout {
    pub anchor: String,
    pub top: i32,
    pub height: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageLayout {
    width: u16,
    blocks: Vec<BlockLayout>,
    sections: Vec<SectionLayout>,
    total_height: u32,
}

impl PageLayout {
    /// Lay out `site` for a page `width` cells wide.
    pub fn build(site: &SiteContent, width: u16) -> Self {
        let column_width = width
            .saturating_sub(SIDE_MARGIN * 2)
            .min(MAX_CONTENT_WIDTH)
            .max(1);
        let column_x = ((width.saturating_sub(column_width)) / 2) as i32;

        let mut blocks = Vec::new();
        let mut sections = Vec::with_capacity(site.sections.len());
        let mut y: i32 = 0;

        for (s, section) in site.sections.iter().enumerate() {
            let top = y;
            y += SECTION_PADDING as i32;
            for (b, block) in section.blocks.iter().enumerate() {
                if b > 0 {
                    y += BLOCK_GAP as i32;
                }
                let (x, w) = if is_full_bleed(&block.content) {
                    (0, width.max(1))
                } else {
                    (column_x, column_width)
                };
                let height = block_height(&block.content, w);
                blocks.push(BlockLayout {
                    section: s,
                    index: b,
                    bounds: Bounds::new(x, y, w, height),
                });
                y += height as i32;
            }
            y += SECTION_PADDING as i32;
            sections.push(SectionLayout {
                anchor: section.anchor.clone(),
                top,
                height: (y - top) as u32,
            });
        }

        Self {
            width,
            blocks,
            sections,
            total_height: y.max(0) as u32,
        }
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn total_height(&self) -> u32 {
        self.total_height
    }

    pub fn blocks(&self) -> &[BlockLayout] {
        &self.blocks
    }

    pub fn sections(&self) -> &[SectionLayout] {
        &self.sections
    }

    pub fn section_top(&self, anchor: &str) -> Option<i32> {
        self.sections.iter().find(|s| s.anchor == anchor).map(|s| s.top)
    }

    /// Section containing page row `y`
    pub fn section_at(&self, y: i32) -> Option<usize> {
        self.sections
            .iter()
            .position(|s| y >= s.top && y < s.top + s.height as i32)
    }

    /// Block whose bounds contain the page cell (`x`, `y`)
    pub fn block_at(&self, x: i32, y: i32) -> Option<usize> {
        self.blocks.iter().position(|b| {
            x >= b.bounds.x && x < b.bounds.right() && y >= b.bounds.y && y < b.bounds.bottom()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::site::{BlockSpec, Fact, Identity, RevealSpec, SectionSpec, SectionTone};
    use crate::widgets::media::MediaItem;

    fn block(content: BlockContent) -> BlockSpec {
        BlockSpec {
            reveal: RevealSpec::default(),
            content,
        }
    }

    fn site() -> SiteContent {
        SiteContent {
            identity: Identity {
                name: "Padukuhan Sangen 2".to_string(),
                tagline: String::new(),
                logo: MediaItem::default(),
            },
            sections: vec![
                SectionSpec {
                    anchor: "beranda".to_string(),
                    label: "Beranda".to_string(),
                    icon: String::new(),
                    tone: SectionTone::Primary,
                    blocks: vec![
                        block(BlockContent::Hero {
                            title: "Selamat Datang di".to_string(),
                            highlight: "Padukuhan Sangen 2".to_string(),
                            tagline: String::new(),
                        }),
                        block(BlockContent::Carousel { images: vec![] }),
                    ],
                },
                SectionSpec {
                    anchor: "galeri".to_string(),
                    label: "Galeri Desa".to_string(),
                    icon: String::new(),
                    tone: SectionTone::Plain,
                    blocks: vec![block(BlockContent::Marquee {
                        images: vec![],
                        speed: Some(30.0),
                        direction: String::new(),
                    })],
                },
            ],
        }
    }

    #[test]
    fn test_wrap_text() {
        assert_eq!(wrap_text("satu dua tiga", 8), vec!["satu dua", "tiga"]);
        assert_eq!(wrap_text("  ", 10), Vec::<String>::new());
        assert_eq!(wrap_text("abcdefgh", 3), vec!["abc", "def", "gh"]);
        assert_eq!(wrap_text("a bcdefg", 3), vec!["a", "bcd", "efg"]);
    }

    #[test]
    fn test_wrap_never_exceeds_width() {
        let text = "Padukuhan Sangen II adalah sebuah dusun yang terletak di Kalurahan Banjarejo, \
                    Kapanewon Tanjungsari, Kabupaten Gunung Kidul, Daerah Istimewa Yogyakarta.";
        for width in [5u16, 12, 30, 80] {
            for line in wrap_text(text, width) {
                assert!(text_width(&line) <= width as usize, "{:?} at {}", line, width);
            }
        }
    }

    #[test]
    fn test_sections_stack() {
        let layout = PageLayout::build(&site(), 80);
        let sections = layout.sections();
        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].top, 0);

        // padding + hero(2) + gap + carousel + padding
        let first = SECTION_PADDING * 2 + 2 + BLOCK_GAP + MEDIA_HEIGHT;
        assert_eq!(sections[0].height, first as u32);
        assert_eq!(sections[1].top, first as i32);
        assert_eq!(layout.section_top("galeri"), Some(first as i32));
        assert_eq!(layout.section_top("nowhere"), None);
        assert_eq!(
            layout.total_height(),
            sections[1].top as u32 + sections[1].height
        );
    }

    #[test]
    fn test_block_positions() {
        let layout = PageLayout::build(&site(), 120);
        let blocks = layout.blocks();
        assert_eq!(blocks.len(), 3);

        // Text column is capped and centred
        assert_eq!(blocks[0].bounds.width, MAX_CONTENT_WIDTH);
        assert_eq!(blocks[0].bounds.x, 10);
        assert_eq!(blocks[0].bounds.y, SECTION_PADDING as i32);
        assert_eq!(blocks[1].bounds.y, blocks[0].bounds.bottom() + BLOCK_GAP as i32);

        // Marquee spans the whole width
        assert_eq!(blocks[2].bounds.x, 0);
        assert_eq!(blocks[2].bounds.width, 120);
        assert_eq!(blocks[2].section, 1);

        let inside = blocks[1].bounds;
        assert_eq!(layout.block_at(inside.x + 1, inside.y + 1), Some(1));
        assert_eq!(layout.block_at(0, 0), None);
        assert_eq!(layout.section_at(inside.y), Some(0));
    }

    #[test]
    fn test_narrow_terminal_wraps_taller() {
        let text = BlockContent::Text {
            title: String::new(),
            paragraphs: vec!["satu dua tiga empat lima enam tujuh delapan".to_string()],
        };
        assert!(block_height(&text, 12) > block_height(&text, 80));
    }

    #[test]
    fn test_fact_grid_height() {
        let facts = BlockContent::Facts {
            title: "Profil Kepala Dukuh".to_string(),
            subtitle: String::new(),
            items: vec![
                Fact { icon: "📅".into(), label: "Tanggal Lahir".into(), value: "06 Maret 1980".into() },
                Fact { icon: "📍".into(), label: "Tempat Lahir".into(), value: "Gunungkidul".into() },
                Fact { icon: "🕌".into(), label: "Agama".into(), value: "Islam".into() },
            ],
        };
        // title + blank + two grid rows of 2 + gap
        assert_eq!(block_height(&facts, 80), 1 + 1 + 2 + 1 + 2);
        // single column: three rows of 2 + two gaps
        assert_eq!(block_height(&facts, 40), 1 + 1 + 2 * 3 + 2);
    }
}
