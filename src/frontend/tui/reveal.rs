//! Applies reveal styles while copying a block onto the screen.
//!
//! Blocks are drawn into their own offscreen buffer first. `blit` then
//! copies that buffer into the frame with the block's current transform
//! (translate, rotate, rotateY squash, scale) by inverse sampling around the
//! block centre, and fades it in by blending each cell toward whatever is
//! already drawn underneath.

use crate::theme::blend;
use crate::widgets::RevealStyle;
use ratatui::{buffer::Buffer, buffer::Cell, layout::Rect, style::Color};

/// Pixel size of one terminal cell, for converting CSS lengths
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellMetrics {
    pub width_px: f32,
    pub height_px: f32,
}

impl Default for CellMetrics {
    fn default() -> Self {
        Self {
            width_px: 8.0,
            height_px: 16.0,
        }
    }
}

/// Below this the block isn't drawn at all
const MIN_OPACITY: f32 = 0.01;

/// A cell nobody drew into: blank with no background
fn is_transparent(cell: &Cell) -> bool {
    cell.bg == Color::Reset && cell.symbol() == " "
}

/// Draw `src` over `dst` at `opacity`
fn composite(dst: &mut Cell, src: &Cell, opacity: f32) {
    if is_transparent(src) {
        return;
    }
    let under = dst.bg;
    let bg = if src.bg == Color::Reset {
        under
    } else {
        blend(under, src.bg, opacity)
    };
    let fg = if src.fg == Color::Reset {
        src.fg
    } else {
        blend(under, src.fg, opacity)
    };
    dst.set_symbol(src.symbol());
    dst.fg = fg;
    dst.bg = bg;
    dst.modifier = src.modifier;
}

/// Copy `src` into `dst` with its top-left corner at `origin` (in `dst`
/// coordinates, may be negative), clipped to `clip`, styled by `style`.
pub fn blit(
    src: &Buffer,
    dst: &mut Buffer,
    origin: (i32, i32),
    clip: Rect,
    style: &RevealStyle,
    metrics: CellMetrics,
) {
    let opacity = style.opacity.clamp(0.0, 1.0);
    if opacity < MIN_OPACITY {
        return;
    }
    let clip = clip.intersection(dst.area);
    let t = style.transform;
    let (w, h) = (src.area.width as f32, src.area.height as f32);
    if w == 0.0 || h == 0.0 || clip.is_empty() {
        return;
    }

    let cw = metrics.width_px.max(1.0);
    let ch = metrics.height_px.max(1.0);
    let dx = t.translate_x / cw;
    let dy = t.translate_y / ch;

    let squash = t.rotate_y.to_radians().cos();
    if t.scale.abs() < 0.01 || squash.abs() < 0.02 {
        return;
    }
    let (sin, cos) = t.rotate.to_radians().sin_cos();

    // Block centre on screen, in cells
    let cx = origin.0 as f32 + dx + w / 2.0;
    let cy = origin.1 as f32 + dy + h / 2.0;

    // Screen-space bounding box of the transformed block
    let (mut min_x, mut min_y, mut max_x, mut max_y) = (f32::MAX, f32::MAX, f32::MIN, f32::MIN);
    for (u, v) in [(-w / 2.0, -h / 2.0), (w / 2.0, -h / 2.0), (-w / 2.0, h / 2.0), (w / 2.0, h / 2.0)] {
        let px = u * cw * t.scale * squash;
        let py = v * ch * t.scale;
        let rx = (px * cos - py * sin) / cw;
        let ry = (px * sin + py * cos) / ch;
        min_x = min_x.min(cx + rx);
        max_x = max_x.max(cx + rx);
        min_y = min_y.min(cy + ry);
        max_y = max_y.max(cy + ry);
    }

    let x0 = (min_x.floor() as i32).max(clip.x as i32);
    let x1 = (max_x.ceil() as i32).min(clip.right() as i32);
    let y0 = (min_y.floor() as i32).max(clip.y as i32);
    let y1 = (max_y.ceil() as i32).min(clip.bottom() as i32);

    let upright = t.is_upright();

    for y in y0..y1 {
        for x in x0..x1 {
            let (sx, sy) = if upright {
                // Plain translation: no resampling, keeps wide glyphs intact
                (
                    x - origin.0 - dx.round() as i32,
                    y - origin.1 - dy.round() as i32,
                )
            } else {
                // Inverse of translate, rotate, rotateY, scale
                let px = (x as f32 + 0.5 - cx) * cw;
                let py = (y as f32 + 0.5 - cy) * ch;
                let rx = px * cos + py * sin;
                let ry = -px * sin + py * cos;
                let ux = rx / (t.scale * squash) / cw + w / 2.0;
                let uy = ry / t.scale / ch + h / 2.0;
                (ux.floor() as i32, uy.floor() as i32)
            };
            if sx < 0 || sy < 0 || sx >= w as i32 || sy >= h as i32 {
                continue;
            }
            let Some(src_cell) = src.cell((sx as u16, sy as u16)) else {
                continue;
            };
            if let Some(dst_cell) = dst.cell_mut((x as u16, y as u16)) {
                composite(dst_cell, src_cell, opacity);
            }
        }
    }
}
