//! Picture cards: a loaded image or its placeholder.
//!
//! Terminals can't show the picture itself, so a loaded image is drawn as a
//! darker "photo" card with the title overlaid at the bottom and the file
//! name in the corner. Missing or failed images get the light placeholder
//! with the item's icon and title.

use crate::data::page::{text_width, wrap_text};
use crate::theme::{blend, SiteTheme};
use crate::widgets::media::PHOTO_ICON;
use crate::widgets::MediaSlot;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
};

/// Fill `area` with a left-to-right gradient
pub fn fill_gradient(buf: &mut Buffer, area: Rect, from: Color, to: Color) {
    let span = area.width.saturating_sub(1).max(1) as f32;
    for x in area.left()..area.right() {
        let bg = blend(from, to, (x - area.x) as f32 / span);
        for y in area.top()..area.bottom() {
            if let Some(cell) = buf.cell_mut((x, y)) {
                cell.set_symbol(" ");
                cell.bg = bg;
            }
        }
    }
}

/// Write `text` centred on row `y` of `area`, truncated to fit
pub fn put_centered(buf: &mut Buffer, area: Rect, y: u16, text: &str, style: Style) {
    if y < area.top() || y >= area.bottom() || area.width == 0 {
        return;
    }
    let width = text_width(text) as u16;
    let x = area.x + area.width.saturating_sub(width) / 2;
    buf.set_stringn(x, y, text, area.width as usize, style);
}

/// Draw `slot` filling `area`
pub fn render_media(slot: &MediaSlot, area: Rect, buf: &mut Buffer, theme: &SiteTheme) {
    if area.is_empty() {
        return;
    }
    let item = slot.item();

    if slot.shows_image() {
        fill_gradient(
            buf,
            area,
            theme.primary.shade(600),
            theme.secondary.shade(700),
        );
        if let Some(label) = slot.image_label() {
            buf.set_stringn(
                area.x + 1,
                area.y,
                format!("{} {}", PHOTO_ICON, label),
                area.width.saturating_sub(2) as usize,
                Style::default().fg(theme.primary.shade(200)),
            );
        }
        if !item.title.is_empty() && area.height >= 2 {
            buf.set_stringn(
                area.x + 2,
                area.bottom() - 2,
                &item.title,
                area.width.saturating_sub(4) as usize,
                Style::default().fg(Color::Rgb(255, 255, 255)).add_modifier(Modifier::BOLD),
            );
        }
        return;
    }

    let (from, to) = theme.media_gradient();
    fill_gradient(buf, area, from, to);

    let mut lines: Vec<(String, Style)> = vec![(
        item.placeholder_icon().to_string(),
        Style::default().fg(theme.text),
    )];
    if !item.title.is_empty() {
        lines.push((String::new(), Style::default()));
        for line in wrap_text(&item.title, area.width.saturating_sub(4)) {
            lines.push((
                line,
                Style::default().fg(theme.text).add_modifier(Modifier::BOLD),
            ));
        }
    }
    if !item.description.is_empty() {
        for line in wrap_text(&item.description, area.width.saturating_sub(4)) {
            lines.push((line, Style::default().fg(theme.text_muted)));
        }
    }

    let height = (lines.len() as u16).min(area.height);
    let top = area.y + area.height.saturating_sub(height) / 2;
    for (i, (text, style)) in lines.iter().take(height as usize).enumerate() {
        put_centered(buf, area, top + i as u16, text, *style);
    }
}

/// Draw `slot` with a caption row under the picture
pub fn render_media_with_caption(
    slot: &MediaSlot,
    area: Rect,
    buf: &mut Buffer,
    theme: &SiteTheme,
) {
    if area.height < 2 {
        render_media(slot, area, buf, theme);
        return;
    }
    let picture = Rect::new(area.x, area.y, area.width, area.height - 1);
    render_media(slot, picture, buf, theme);
    put_centered(
        buf,
        area,
        area.bottom() - 1,
        &slot.item().caption(),
        Style::default()
            .fg(theme.text_muted)
            .add_modifier(Modifier::ITALIC),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::widgets::media::{AssetError, AssetKind, AssetSource, MediaItem};
    use std::path::PathBuf;

    struct Missing;

    impl AssetSource for Missing {
        fn load(&self, src: &str) -> Result<AssetKind, AssetError> {
            Err(AssetError::NotFound(PathBuf::from(src)))
        }
    }

    struct Present;

    impl AssetSource for Present {
        fn load(&self, src: &str) -> Result<AssetKind, AssetError> {
            Ok(AssetKind::Local {
                path: PathBuf::from(src),
                bytes: 10,
            })
        }
    }

    fn row_text(buf: &Buffer, y: u16) -> String {
        (0..buf.area.width).map(|x| buf[(x, y)].symbol()).collect()
    }

    fn slot(source: &dyn AssetSource) -> MediaSlot {
        let mut slot = MediaSlot::new(MediaItem {
            src: Some("/images/balai.jpg".to_string()),
            title: "Balai Padukuhan".to_string(),
            description: String::new(),
            icon: Some("🏛️".to_string()),
        });
        slot.resolve(source);
        slot
    }

    #[test]
    fn test_failed_image_shows_placeholder_title() {
        let theme = SiteTheme::default();
        let area = Rect::new(0, 0, 30, 6);
        let mut buf = Buffer::empty(area);
        render_media(&slot(&Missing), area, &mut buf, &theme);

        let text: String = (0..6).map(|y| row_text(&buf, y)).collect();
        assert!(text.contains("Balai Padukuhan"));
        assert!(!text.contains("balai.jpg"));
        // Placeholder background covers the whole card
        assert_ne!(buf[(0, 0)].bg, Color::Reset);
    }

    #[test]
    fn test_loaded_image_shows_file_and_title() {
        let theme = SiteTheme::default();
        let area = Rect::new(0, 0, 30, 6);
        let mut buf = Buffer::empty(area);
        render_media(&slot(&Present), area, &mut buf, &theme);

        assert!(row_text(&buf, 0).contains("balai.jpg"));
        assert!(row_text(&buf, 4).contains("Balai Padukuhan"));
    }

    #[test]
    fn test_caption_row() {
        let theme = SiteTheme::default();
        let area = Rect::new(0, 0, 30, 6);
        let mut buf = Buffer::empty(area);
        render_media_with_caption(&slot(&Missing), area, &mut buf, &theme);
        assert!(row_text(&buf, 5).contains("Balai Padukuhan"));
    }
}
