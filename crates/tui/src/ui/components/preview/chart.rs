//! Convergence chart drawn with half-block cells.
//!
//! Each terminal cell shows two vertically stacked pixels: the upper one as
//! the `▀` foreground and the lower one as the background. The PNG is
//! decoded once when a generation completes and scaled on every draw to fit
//! the area, keeping its aspect ratio.

use std::fmt;

use colorevolve_types::ConvergenceChart;
use image::imageops::{self, FilterType};
use image::{ImageFormat, ImageResult, Rgba, RgbaImage};
use ratatui::{
    buffer::Buffer,
    layout::{Position, Rect},
    style::Color,
    widgets::Widget,
};

const UPPER_HALF_BLOCK: &str = "▀";

/// Decoded chart pixels.
#[derive(Clone)]
pub struct ChartImage {
    pixels: RgbaImage,
}

impl fmt::Debug for ChartImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChartImage").field("dimensions", &self.pixels.dimensions()).finish()
    }
}

impl ChartImage {
    pub fn decode(chart: &ConvergenceChart) -> ImageResult<Self> {
        let pixels = image::load_from_memory_with_format(chart.bytes(), ImageFormat::Png)?.to_rgba8();
        Ok(Self { pixels })
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.pixels.dimensions()
    }

    /// Scale to fit `width` columns and `height` rows of half-block cells.
    fn fitted(&self, width: u16, height: u16) -> Option<RgbaImage> {
        let (source_width, source_height) = self.pixels.dimensions();
        if source_width == 0 || source_height == 0 || width == 0 || height == 0 {
            return None;
        }
        let max_width = u32::from(width);
        let max_height = u32::from(height) * 2;
        let scale = f64::min(
            f64::from(max_width) / f64::from(source_width),
            f64::from(max_height) / f64::from(source_height),
        );
        let target_width = ((f64::from(source_width) * scale).round() as u32).clamp(1, max_width);
        let target_height = ((f64::from(source_height) * scale).round() as u32).clamp(1, max_height);
        Some(imageops::resize(&self.pixels, target_width, target_height, FilterType::Triangle))
    }
}

/// Blend a pixel over white; the optimizer renders its charts on white.
fn cell_color(pixel: &Rgba<u8>) -> Color {
    let [red, green, blue, alpha] = pixel.0;
    let blend = |channel: u8| -> u8 {
        let alpha = u16::from(alpha);
        ((u16::from(channel) * alpha + 255 * (255 - alpha)) / 255) as u8
    };
    Color::Rgb(blend(red), blend(green), blend(blue))
}

impl Widget for &ChartImage {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let Some(fitted) = self.fitted(area.width, area.height) else {
            return;
        };
        // Centered horizontally; fitted width never exceeds the area.
        let x_offset = (u32::from(area.width) - fitted.width()) / 2;
        for cell_y in 0..fitted.height().div_ceil(2) {
            let top_y = cell_y * 2;
            for x in 0..fitted.width() {
                let position = Position::new(area.x + (x + x_offset) as u16, area.y + cell_y as u16);
                let Some(cell) = buf.cell_mut(position) else {
                    continue;
                };
                cell.set_symbol(UPPER_HALF_BLOCK)
                    .set_fg(cell_color(fitted.get_pixel(x, top_y)));
                if top_y + 1 < fitted.height() {
                    cell.set_bg(cell_color(fitted.get_pixel(x, top_y + 1)));
                }
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::io::Cursor;

    use image::DynamicImage;

    use super::*;

    /// PNG bytes of a `width`×`height` image, red on top and blue below.
    pub(crate) fn two_band_png(width: u32, height: u32) -> Vec<u8> {
        let image = RgbaImage::from_fn(width, height, |_, y| {
            if y < height / 2 { Rgba([255, 0, 0, 255]) } else { Rgba([0, 0, 255, 255]) }
        });
        let mut bytes = Vec::new();
        DynamicImage::ImageRgba8(image)
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();
        bytes
    }

    #[test]
    fn decodes_png_and_rejects_other_bytes() {
        let chart = ConvergenceChart::from_bytes(two_band_png(6, 4));
        assert_eq!(ChartImage::decode(&chart).unwrap().dimensions(), (6, 4));
        assert!(ChartImage::decode(&ConvergenceChart::from_bytes(b"\x89PNG\r\n\x1a\n".to_vec())).is_err());
    }

    #[test]
    fn draws_two_pixels_per_cell() {
        let chart = ChartImage::decode(&ConvergenceChart::from_bytes(two_band_png(8, 4))).unwrap();
        let area = Rect::new(0, 0, 8, 2);
        let mut buf = Buffer::empty(area);
        (&chart).render(area, &mut buf);

        let top = &buf[(0, 0)];
        assert_eq!(top.symbol(), UPPER_HALF_BLOCK);
        assert_eq!(top.fg, Color::Rgb(255, 0, 0));
        assert_eq!(buf[(7, 1)].bg, Color::Rgb(0, 0, 255));
    }

    #[test]
    fn wide_chart_keeps_aspect_ratio_and_is_centered() {
        let chart = ChartImage::decode(&ConvergenceChart::from_bytes(two_band_png(4, 4))).unwrap();
        let area = Rect::new(0, 0, 10, 2);
        let mut buf = Buffer::empty(area);
        (&chart).render(area, &mut buf);

        // 4×4 pixels fit as 4 columns by 2 cell rows, centered in 10 columns.
        assert_eq!(buf[(2, 0)].symbol(), " ");
        assert_eq!(buf[(3, 0)].symbol(), UPPER_HALF_BLOCK);
        assert_eq!(buf[(6, 1)].symbol(), UPPER_HALF_BLOCK);
        assert_eq!(buf[(7, 1)].symbol(), " ");
    }

    #[test]
    fn transparent_pixels_blend_to_white() {
        assert_eq!(cell_color(&Rgba([0, 0, 0, 0])), Color::Rgb(255, 255, 255));
        assert_eq!(cell_color(&Rgba([10, 20, 30, 255])), Color::Rgb(10, 20, 30));
    }
}
