//! Drawing of individual page blocks into their own buffers.

use super::carousel::render_carousel;
use super::marquee::render_marquee;
use super::media::{put_centered, render_media_with_caption};
use super::video::render_video;
use crate::core::{AppCore, BlockWidget};
use crate::data::page::{fact_column_width, fact_columns, fact_height, wrap_text, COLUMN_GAP};
use crate::data::site::{BlockContent, Fact, SectionTone};
use crate::theme::SiteTheme;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Widget},
};
use std::time::Instant;

/// Draw block `i` of the page into `area` (normally a fresh buffer sized to
/// the block).
pub fn render_block(
    core: &AppCore,
    i: usize,
    area: Rect,
    buf: &mut Buffer,
    theme: &SiteTheme,
    now: Instant,
) {
    let block = &core.blocks[i];
    let tone = core.site.sections[block.section].tone;
    let content = &core.block_spec(i).content;

    match (&block.widget, content) {
        (BlockWidget::Carousel { state, slides }, _) => {
            render_carousel(state, slides, area, buf, theme, now)
        }
        (BlockWidget::Marquee { state, items }, _) => {
            render_marquee(state, items, area, buf, theme)
        }
        (BlockWidget::Image(slot), _) => render_media_with_caption(slot, area, buf, theme),
        (BlockWidget::Video(embed), BlockContent::Video { title, description, .. }) => {
            render_video(embed, title, description, area, buf, theme)
        }
        (_, content) => render_text_block(content, tone, area, buf, theme),
    }
}

/// Hero, heading, text, facts, link and callout blocks
pub fn render_text_block(
    content: &BlockContent,
    tone: SectionTone,
    area: Rect,
    buf: &mut Buffer,
    theme: &SiteTheme,
) {
    let text = Style::default().fg(theme.text);
    let muted = Style::default().fg(theme.muted(tone));
    let highlight_style = Style::default()
        .fg(theme.highlight(tone))
        .add_modifier(Modifier::BOLD);

    match content {
        BlockContent::Hero {
            title,
            highlight,
            tagline,
        } => {
            put_centered(buf, area, area.y, title, text.add_modifier(Modifier::BOLD));
            put_centered(buf, area, area.y + 1, highlight, highlight_style);
            if !tagline.is_empty() {
                for (n, line) in wrap_text(tagline, area.width).iter().enumerate() {
                    put_centered(buf, area, area.y + 2 + n as u16 + 1, line, muted);
                }
            }
        }
        BlockContent::Heading {
            text: heading,
            highlight,
            subtitle,
        } => {
            // Words past the plain part of the heading are highlighted
            let plain_words = heading.split_whitespace().count();
            let joined = format!("{} {}", heading, highlight);
            let lines = wrap_text(&joined, area.width);
            let mut word_index = 0;
            let mut y = area.y;
            for line in &lines {
                let mut spans = Vec::new();
                for (n, word) in line.split_whitespace().enumerate() {
                    if n > 0 {
                        spans.push(Span::raw(" "));
                    }
                    let style = if word_index >= plain_words {
                        highlight_style
                    } else {
                        text.add_modifier(Modifier::BOLD)
                    };
                    spans.push(Span::styled(word.to_string(), style));
                    word_index += 1;
                }
                let line = Line::from(spans);
                let x = area.x + area.width.saturating_sub(line.width() as u16) / 2;
                buf.set_line(x, y, &line, area.width);
                y += 1;
            }
            if !subtitle.is_empty() {
                y += 1;
                for line in wrap_text(subtitle, area.width) {
                    put_centered(buf, area, y, &line, muted);
                    y += 1;
                }
            }
        }
        BlockContent::Text { title, paragraphs } => {
            let mut y = area.y;
            if !title.is_empty() {
                for line in wrap_text(title, area.width) {
                    buf.set_stringn(area.x, y, line, area.width as usize, text.add_modifier(Modifier::BOLD));
                    y += 1;
                }
                y += 1;
            }
            for (n, paragraph) in paragraphs.iter().enumerate() {
                if n > 0 {
                    y += 1;
                }
                for line in wrap_text(paragraph, area.width) {
                    buf.set_stringn(area.x, y, line, area.width as usize, text);
                    y += 1;
                }
            }
        }
        BlockContent::Facts {
            title,
            subtitle,
            items,
        } => render_facts(title, subtitle, items, tone, area, buf, theme),
        BlockContent::Link { label, url, icon } => {
            let block = Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(theme.primary.shade(500)));
            let inner = block.inner(area);
            block.render(area, buf);
            let label = if icon.is_empty() {
                label.clone()
            } else {
                format!("{} {}", icon, label)
            };
            let line = Line::from(vec![
                Span::styled(label, text.add_modifier(Modifier::BOLD)),
                Span::raw("  "),
                Span::styled(
                    format!("↗ {}", url),
                    Style::default()
                        .fg(theme.primary.shade(600))
                        .add_modifier(Modifier::UNDERLINED),
                ),
            ]);
            let x = inner.x + inner.width.saturating_sub(line.width() as u16) / 2;
            buf.set_line(x, inner.y, &line, inner.width);
        }
        BlockContent::Callout { icon, title, text: body } => {
            let block = Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(theme.accent.shade(800)))
                .style(Style::default().bg(theme.accent.shade(50)));
            let inner = block.inner(area);
            block.render(area, buf);
            let heading = if icon.is_empty() {
                title.clone()
            } else {
                format!("{} {}", icon, title)
            };
            put_centered(buf, inner, inner.y, &heading, text.add_modifier(Modifier::BOLD));
            for (n, line) in wrap_text(body, area.width.saturating_sub(4)).iter().enumerate() {
                put_centered(buf, inner, inner.y + 1 + n as u16, line, Style::default().fg(theme.text_muted));
            }
        }
        // Interactive kinds are drawn from their widget state
        BlockContent::Carousel { .. }
        | BlockContent::Image { .. }
        | BlockContent::Video { .. }
        | BlockContent::Marquee { .. } => {}
    }
}

fn render_facts(
    title: &str,
    subtitle: &str,
    items: &[Fact],
    tone: SectionTone,
    area: Rect,
    buf: &mut Buffer,
    theme: &SiteTheme,
) {
    let mut y = area.y;
    if !title.is_empty() {
        for line in wrap_text(title, area.width) {
            put_centered(buf, area, y, &line, Style::default().fg(theme.text).add_modifier(Modifier::BOLD));
            y += 1;
        }
    }
    if !subtitle.is_empty() {
        for line in wrap_text(subtitle, area.width) {
            put_centered(buf, area, y, &line, Style::default().fg(theme.muted(tone)));
            y += 1;
        }
    }
    if y > area.y {
        y += 1;
    }

    let cols = fact_columns(area.width) as usize;
    let col_width = fact_column_width(area.width);
    for (r, row) in items.chunks(cols).enumerate() {
        if r > 0 {
            y += 1;
        }
        let row_height = row
            .iter()
            .map(|f| fact_height(&f.value, col_width))
            .max()
            .unwrap_or(0);
        for (c, fact) in row.iter().enumerate() {
            let x = area.x + c as u16 * (col_width + COLUMN_GAP);
            let label = if fact.icon.is_empty() {
                fact.label.clone()
            } else {
                format!("{} {}", fact.icon, fact.label)
            };
            buf.set_stringn(
                x,
                y,
                label,
                col_width as usize,
                Style::default()
                    .fg(theme.primary.shade(700))
                    .add_modifier(Modifier::BOLD),
            );
            for (n, line) in wrap_text(&fact.value, col_width.saturating_sub(3)).iter().enumerate() {
                buf.set_stringn(
                    x + 3,
                    y + 1 + n as u16,
                    line,
                    col_width.saturating_sub(3) as usize,
                    Style::default().fg(theme.text),
                );
            }
        }
        y += row_height;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::page::block_height;

    fn render(content: &BlockContent, width: u16) -> Buffer {
        let theme = SiteTheme::default();
        let area = Rect::new(0, 0, width, block_height(content, width));
        let mut buf = Buffer::empty(area);
        render_text_block(content, SectionTone::Primary, area, &mut buf, &theme);
        buf
    }

    fn row(buf: &Buffer, y: u16) -> String {
        (0..buf.area.width).map(|x| buf[(x, y)].symbol()).collect::<String>()
    }

    #[test]
    fn test_hero_lines() {
        let buf = render(
            &BlockContent::Hero {
                title: "Selamat Datang di".to_string(),
                highlight: "Padukuhan Sangen 2".to_string(),
                tagline: "Desa yang asri".to_string(),
            },
            40,
        );
        assert_eq!(buf.area.height, 4);
        assert!(row(&buf, 0).contains("Selamat Datang di"));
        assert!(row(&buf, 1).contains("Padukuhan Sangen 2"));
        assert!(row(&buf, 3).contains("Desa yang asri"));
    }

    #[test]
    fn test_heading_highlights_tail_words() {
        let theme = SiteTheme::default();
        let buf = render(
            &BlockContent::Heading {
                text: "Galeri".to_string(),
                highlight: "Desa".to_string(),
                subtitle: String::new(),
            },
            30,
        );
        let line = row(&buf, 0);
        let start = line.find("Galeri").expect("heading");
        let desa = line.find("Desa").expect("highlight") as u16;
        assert_eq!(buf[(start as u16, 0)].fg, theme.text);
        assert_eq!(buf[(desa, 0)].fg, theme.highlight(SectionTone::Primary));
    }

    #[test]
    fn test_facts_fill_two_columns() {
        let facts: Vec<Fact> = (0..4)
            .map(|i| Fact {
                icon: String::new(),
                label: format!("Label{}", i),
                value: format!("Nilai{}", i),
            })
            .collect();
        let content = BlockContent::Facts {
            title: "Data".to_string(),
            subtitle: String::new(),
            items: facts,
        };
        let buf = render(&content, 80);
        // Title, blank, row 1 (2 rows), gap, row 2 (2 rows)
        assert_eq!(buf.area.height, 7);
        assert!(row(&buf, 2).contains("Label0"));
        assert!(row(&buf, 2).contains("Label1"));
        assert!(row(&buf, 3).contains("Nilai1"));
        assert!(row(&buf, 5).contains("Label2"));
    }

    #[test]
    fn test_callout_wraps_inside_border() {
        let buf = render(
            &BlockContent::Callout {
                icon: String::new(),
                title: "Catatan".to_string(),
                text: "satu dua tiga empat lima enam".to_string(),
            },
            16,
        );
        assert!(row(&buf, 0).starts_with('╭'));
        assert!(row(&buf, 1).contains("Catatan"));
        let last = buf.area.height - 1;
        assert!(row(&buf, last).starts_with('╰'));
        let body: String = (2..last).map(|y| row(&buf, y)).collect();
        assert!(body.contains("enam"));
    }
}
