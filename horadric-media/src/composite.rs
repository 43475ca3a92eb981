use std::io::Cursor;

use image::imageops::{self, FilterType};
use image::{DynamicImage, ImageFormat, RgbaImage};

use crate::composite_layout::{CompositeConfig, CompositeLayout};
use crate::error::MediaError;

/// Decode icon bytes of any supported format.
pub fn decode_icon(bytes: &[u8]) -> Result<RgbaImage, MediaError> {
    Ok(image::load_from_memory(bytes)?.into_rgba8())
}

/// Compose rune icons, in socket order, onto a transparent canvas.
///
/// Each icon is scaled to fit its cell and centered in it. Returns the
/// canvas encoded as PNG.
pub fn render_composite(
    icons: &[RgbaImage],
    config: &CompositeConfig,
) -> Result<Vec<u8>, MediaError> {
    let layout = CompositeLayout::for_count(icons.len())?;
    let (canvas_w, canvas_h) = layout.canvas_size(config);
    let mut canvas = RgbaImage::new(canvas_w, canvas_h);

    for (icon, (cell_x, cell_y)) in icons.iter().zip(layout.cell_origins(config)) {
        let (w, h) = fit_to_bounds(icon.width(), icon.height(), config.cell_size, config.cell_size);
        if w == 0 || h == 0 {
            continue;
        }
        let upscaling = w > icon.width() || h > icon.height();
        let filter = if upscaling {
            FilterType::Nearest // keep sprite edges crisp
        } else {
            FilterType::Lanczos3
        };
        let scaled = if (w, h) == icon.dimensions() {
            icon.clone()
        } else {
            imageops::resize(icon, w, h, filter)
        };

        let x = cell_x + (config.cell_size - w) / 2;
        let y = cell_y + (config.cell_size - h) / 2;
        imageops::overlay(&mut canvas, &scaled, x as i64, y as i64);
    }

    encode_png(canvas)
}

fn encode_png(canvas: RgbaImage) -> Result<Vec<u8>, MediaError> {
    let mut bytes = Vec::new();
    DynamicImage::ImageRgba8(canvas).write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
    Ok(bytes)
}

/// Scale dimensions to fit within max bounds, preserving aspect ratio.
/// Scales both up and down.
pub(crate) fn fit_to_bounds(src_w: u32, src_h: u32, max_w: u32, max_h: u32) -> (u32, u32) {
    if src_w == 0 || src_h == 0 {
        return (0, 0);
    }

    let scale_w = max_w as f64 / src_w as f64;
    let scale_h = max_h as f64 / src_h as f64;
    let scale = scale_w.min(scale_h);

    let new_w = ((src_w as f64 * scale).round() as u32).min(max_w);
    let new_h = ((src_h as f64 * scale).round() as u32).min(max_h);

    (new_w.max(1), new_h.max(1))
}

#[cfg(test)]
#[path = "tests/composite_tests.rs"]
mod tests;
