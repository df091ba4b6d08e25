//! Video embed frame.

use super::media::{fill_gradient, put_centered};
use crate::data::page::wrap_text;
use crate::theme::SiteTheme;
use crate::widgets::VideoEmbed;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    widgets::{Block, BorderType, Borders, Widget},
};

const PLAYER_BG: Color = Color::Rgb(0x11, 0x18, 0x27);

/// Player frame with the embed URL underneath, or the "coming soon"
/// placeholder when the block has no video.
pub fn render_video(
    embed: &VideoEmbed,
    title: &str,
    description: &str,
    area: Rect,
    buf: &mut Buffer,
    theme: &SiteTheme,
) {
    if area.height < 3 || area.width < 4 {
        return;
    }
    let frame = Rect::new(area.x, area.y, area.width, area.height - 1);

    if !embed.is_available() {
        let (from, to) = (theme.secondary.shade(100), theme.primary.shade(100));
        fill_gradient(buf, frame, from, to);
        let middle = frame.y + frame.height / 2;
        put_centered(buf, frame, middle.saturating_sub(2), "🎬", Style::default());
        put_centered(
            buf,
            frame,
            middle,
            title,
            Style::default().fg(theme.text).add_modifier(Modifier::BOLD),
        );
        put_centered(
            buf,
            frame,
            middle + 1,
            "Video akan segera tersedia",
            Style::default().fg(theme.text_muted),
        );
        return;
    }

    fill_gradient(buf, frame, PLAYER_BG, PLAYER_BG);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.primary.shade(300)))
        .title(format!(" {} ", title));
    let inner = block.inner(frame);
    block.render(frame, buf);

    let white = Style::default().fg(Color::Rgb(255, 255, 255));
    let middle = inner.y + inner.height / 2;
    put_centered(
        buf,
        inner,
        middle.saturating_sub(1),
        "▶",
        white.add_modifier(Modifier::BOLD),
    );
    for (i, line) in wrap_text(description, inner.width.saturating_sub(4))
        .iter()
        .take(inner.height.saturating_sub(inner.height / 2 + 1) as usize)
        .enumerate()
    {
        put_centered(
            buf,
            inner,
            middle + 1 + i as u16,
            line,
            Style::default().fg(theme.primary.shade(200)),
        );
    }

    put_centered(
        buf,
        area,
        area.bottom() - 1,
        &format!("↗ {}", embed.embed_url),
        Style::default()
            .fg(theme.primary.shade(600))
            .add_modifier(Modifier::UNDERLINED),
    );
}
