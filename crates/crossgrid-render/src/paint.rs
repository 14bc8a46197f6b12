//! Pixel-level drawing on an RGBA image.

use std::collections::HashMap;

use fontdue::{Font, Metrics};
use image::{Rgba, RgbaImage};

/// Pixel rectangle in image coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x: i64,
    pub y: i64,
    pub w: u32,
    pub h: u32,
}

impl Rect {
    pub fn new(x: i64, y: i64, w: u32, h: u32) -> Self {
        Self { x, y, w, h }
    }

    pub fn center(&self) -> (i64, i64) {
        (self.x + self.w as i64 / 2, self.y + self.h as i64 / 2)
    }

    /// Upper or lower half
    pub fn half(&self, lower: bool) -> Rect {
        let h = self.h / 2;
        if lower {
            Rect::new(self.x, self.y + h as i64, self.w, self.h - h)
        } else {
            Rect::new(self.x, self.y, self.w, h)
        }
    }
}

/// Fill a rectangle, clipped to the image
pub fn fill_rect(image: &mut RgbaImage, rect: Rect, color: Rgba<u8>) {
    let x0 = rect.x.max(0);
    let y0 = rect.y.max(0);
    let x1 = (rect.x + rect.w as i64).min(image.width() as i64);
    let y1 = (rect.y + rect.h as i64).min(image.height() as i64);
    for y in y0..y1 {
        for x in x0..x1 {
            image.put_pixel(x as u32, y as u32, color);
        }
    }
}

/// Composite `color` over the pixel with the given coverage
pub fn blend_pixel(image: &mut RgbaImage, x: i64, y: i64, color: Rgba<u8>, coverage: u8) {
    if x < 0 || y < 0 || x >= image.width() as i64 || y >= image.height() as i64 {
        return;
    }
    let alpha = coverage as f32 / 255.0;
    let bg = image.get_pixel(x as u32, y as u32);
    let mix = |b: u8, f: u8| (b as f32 * (1.0 - alpha) + f as f32 * alpha) as u8;
    let blended = Rgba([
        mix(bg[0], color[0]),
        mix(bg[1], color[1]),
        mix(bg[2], color[2]),
        255,
    ]);
    image.put_pixel(x as u32, y as u32, blended);
}

/// Axis-aligned stroke between two points
pub fn stroke(
    image: &mut RgbaImage,
    from: (i64, i64),
    to: (i64, i64),
    thickness: u32,
    color: Rgba<u8>,
) {
    let half = thickness as i64 / 2;
    let (x0, x1) = (from.0.min(to.0), from.0.max(to.0));
    let (y0, y1) = (from.1.min(to.1), from.1.max(to.1));
    let rect = Rect::new(
        x0 - half,
        y0 - half,
        (x1 - x0) as u32 + thickness,
        (y1 - y0) as u32 + thickness,
    );
    fill_rect(image, rect, color);
}

/// Solid triangular head with its tip at `tip`, pointing along `(dr, dc)`
pub fn arrow_head(
    image: &mut RgbaImage,
    tip: (i64, i64),
    (dr, dc): (i8, i8),
    size: u32,
    color: Rgba<u8>,
) {
    let size = size as i64;
    for back in 0..size {
        let x = tip.0 - dc as i64 * back;
        let y = tip.1 - dr as i64 * back;
        let spread = back;
        let rect = if dc != 0 {
            Rect::new(x, y - spread, 1, (2 * spread + 1) as u32)
        } else {
            Rect::new(x - spread, y, (2 * spread + 1) as u32, 1)
        };
        fill_rect(image, rect, color);
    }
}

type GlyphCache = HashMap<(char, u32), (Metrics, Vec<u8>)>;

/// Draws text with a fontdue font, caching rasterized glyphs
pub struct TextPainter<'f> {
    font: &'f Font,
    glyph_cache: GlyphCache,
}

impl<'f> TextPainter<'f> {
    pub fn new(font: &'f Font) -> Self {
        Self {
            font,
            glyph_cache: HashMap::new(),
        }
    }

    fn glyph(&mut self, ch: char, font_size: f32) -> &(Metrics, Vec<u8>) {
        let font = self.font;
        self.glyph_cache
            .entry((ch, font_size.to_bits()))
            .or_insert_with(|| font.rasterize(ch, font_size))
    }

    /// Advance width of `text` at `font_size`
    pub fn measure(&mut self, text: &str, font_size: f32) -> f32 {
        text.chars()
            .map(|ch| self.glyph(ch, font_size).0.advance_width)
            .sum()
    }

    /// Draw one line centered in `rect`, shrinking it to fit the width
    pub fn draw_centered(
        &mut self,
        image: &mut RgbaImage,
        rect: Rect,
        text: &str,
        color: Rgba<u8>,
    ) {
        if text.is_empty() || rect.h == 0 {
            return;
        }
        let max_width = rect.w as f32 * 0.9;
        let mut font_size = rect.h as f32 * 0.6;
        let measured = self.measure(text, font_size);
        if measured > max_width {
            font_size *= max_width / measured;
        }

        let (ascent, descent) = self
            .font
            .horizontal_line_metrics(font_size)
            .map(|m| (m.ascent, m.descent))
            .unwrap_or((font_size * 0.8, -font_size * 0.2));
        let text_height = ascent - descent;
        let baseline = rect.y as f32 + (rect.h as f32 - text_height) / 2.0 + ascent;
        let mut pen_x = rect.x as f32 + (rect.w as f32 - self.measure(text, font_size)) / 2.0;

        for ch in text.chars() {
            let (metrics, bitmap) = self.glyph(ch, font_size).clone();
            let glyph_top = baseline - metrics.height as f32 - metrics.ymin as f32;
            for gy in 0..metrics.height {
                for gx in 0..metrics.width {
                    let coverage = bitmap[gy * metrics.width + gx];
                    if coverage == 0 {
                        continue;
                    }
                    let px = pen_x as i64 + gx as i64 + metrics.xmin as i64;
                    let py = (glyph_top + gy as f32) as i64;
                    blend_pixel(image, px, py, color, coverage);
                }
            }
            pen_x += metrics.advance_width;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Rgba<u8> = Rgba([255, 0, 0, 255]);
    const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);

    #[test]
    fn test_fill_rect_clips() {
        let mut image = RgbaImage::from_pixel(4, 4, WHITE);
        fill_rect(&mut image, Rect::new(-2, 2, 10, 10), RED);
        assert_eq!(*image.get_pixel(0, 3), RED);
        assert_eq!(*image.get_pixel(3, 2), RED);
        assert_eq!(*image.get_pixel(0, 1), WHITE);
    }

    #[test]
    fn test_blend_pixel_half_coverage() {
        let mut image = RgbaImage::from_pixel(1, 1, WHITE);
        blend_pixel(&mut image, 0, 0, Rgba([0, 0, 0, 255]), 128);
        let value = image.get_pixel(0, 0)[0];
        assert!((120..=135).contains(&value));
        blend_pixel(&mut image, 5, 5, RED, 255);
    }

    #[test]
    fn test_stroke_and_head() {
        let mut image = RgbaImage::from_pixel(20, 20, WHITE);
        stroke(&mut image, (2, 10), (15, 10), 2, RED);
        assert_eq!(*image.get_pixel(8, 10), RED);
        assert_eq!(*image.get_pixel(8, 5), WHITE);

        arrow_head(&mut image, (15, 10), (0, 1), 4, RED);
        assert_eq!(*image.get_pixel(12, 13), RED);
        assert_eq!(*image.get_pixel(12, 15), WHITE);
    }

    #[test]
    fn test_rect_halves() {
        let rect = Rect::new(0, 0, 10, 11);
        assert_eq!(rect.half(false), Rect::new(0, 0, 10, 5));
        assert_eq!(rect.half(true), Rect::new(0, 5, 10, 6));
        assert_eq!(rect.center(), (5, 5));
    }
}
