//! Raster export of a prepared crossword sheet.
//!
//! [`rasterize`] draws the full grid at `cell_size * scale` pixels per square
//! and [`encode_png`] turns the result into PNG bytes for download.

pub mod paint;

use std::io::Cursor;

use crossgrid_core::config::{EditorConfig, DEFAULT_CELL_SIZE, DEFAULT_EXPORT_SCALE};
use crossgrid_core::{Direction, ExportCell, ExportContent, ExportSheet};
use fontdue::FontSettings;
use image::{ImageFormat, Rgba, RgbaImage};
use thiserror::Error;

use paint::{arrow_head, fill_rect, stroke, Rect, TextPainter};

pub use fontdue::Font;

pub const BACKGROUND: Rgba<u8> = Rgba([255, 255, 255, 255]);
pub const GRID_LINE: Rgba<u8> = Rgba([0, 0, 0, 255]);
pub const FILLED: Rgba<u8> = Rgba([0, 0, 0, 255]);
pub const HINT_TINT: Rgba<u8> = Rgba([236, 236, 236, 255]);
pub const INK: Rgba<u8> = Rgba([0, 0, 0, 255]);

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Sheet has no cells")]
    EmptySheet,

    #[error("Font error: {0}")]
    Font(String),

    #[error("Image encoding error: {0}")]
    Encode(#[from] image::ImageError),

    #[error("Image too large: {width}x{height} squares of {cell_size}px at scale {scale}")]
    TooLarge {
        width: usize,
        height: usize,
        cell_size: u32,
        scale: u32,
    },
}

/// Pixel geometry of one export
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    pub square: u32,
    pub width: u32,
    pub height: u32,
}

/// Parse a TrueType/OpenType font for hint text
pub fn load_font(bytes: &[u8]) -> Result<Font, RenderError> {
    Font::from_bytes(bytes, FontSettings::default()).map_err(|e| RenderError::Font(e.to_string()))
}

#[derive(Clone, Copy)]
pub struct RenderOptions<'f> {
    /// Square side before supersampling
    pub cell_size: u32,
    /// Supersampling factor
    pub scale: u32,
    /// Without a font, hint squares are tinted but carry no text
    pub font: Option<&'f Font>,
}

impl Default for RenderOptions<'_> {
    fn default() -> Self {
        Self {
            cell_size: DEFAULT_CELL_SIZE,
            scale: DEFAULT_EXPORT_SCALE,
            font: None,
        }
    }
}

impl<'f> RenderOptions<'f> {
    pub fn from_config(config: &EditorConfig) -> Self {
        Self {
            cell_size: config.cell_size,
            scale: config.export_scale,
            font: None,
        }
    }

    pub fn with_font(mut self, font: &'f Font) -> Self {
        self.font = Some(font);
        self
    }

    /// Side of one square in output pixels, `None` on overflow
    pub fn square(&self) -> Option<u32> {
        self.cell_size.max(1).checked_mul(self.scale.max(1))
    }

    /// Output size for a sheet; the RGBA buffer length must fit in memory
    pub fn layout(&self, sheet: &ExportSheet) -> Result<Layout, RenderError> {
        let too_large = || RenderError::TooLarge {
            width: sheet.width,
            height: sheet.height,
            cell_size: self.cell_size,
            scale: self.scale,
        };
        let square = self.square().ok_or_else(too_large)?;
        let side = |count: usize| {
            u32::try_from(count)
                .ok()
                .and_then(|count| count.checked_mul(square))
        };
        let (width, height) = side(sheet.width)
            .zip(side(sheet.height))
            .ok_or_else(too_large)?;
        (width as usize)
            .checked_mul(height as usize)
            .and_then(|pixels| pixels.checked_mul(4))
            .ok_or_else(too_large)?;
        Ok(Layout {
            square,
            width,
            height,
        })
    }

    fn line_width(&self) -> u32 {
        self.scale.max(1)
    }
}

/// Draw the whole sheet; nothing is clipped to a viewport
pub fn rasterize(
    sheet: &ExportSheet,
    options: &RenderOptions<'_>,
) -> Result<RgbaImage, RenderError> {
    let Layout {
        square,
        width,
        height,
    } = options.layout(sheet)?;
    let mut image = RgbaImage::from_pixel(width, height, BACKGROUND);
    let mut painter = options.font.map(TextPainter::new);

    for row in 0..sheet.height {
        for col in 0..sheet.width {
            let Some(cell) = sheet.cell(row, col) else {
                continue;
            };
            let rect = Rect::new(
                col as i64 * square as i64,
                row as i64 * square as i64,
                square,
                square,
            );
            draw_cell(&mut image, painter.as_mut(), rect, cell, options.line_width());
        }
    }

    draw_grid_lines(&mut image, sheet, square, options.line_width());
    tracing::debug!(width, height, "rasterized sheet");
    Ok(image)
}

fn draw_cell(
    image: &mut RgbaImage,
    painter: Option<&mut TextPainter<'_>>,
    rect: Rect,
    cell: &ExportCell,
    line_width: u32,
) {
    if cell.class.empty {
        fill_rect(image, rect, FILLED);
        return;
    }
    if cell.class.hint {
        fill_rect(image, rect, HINT_TINT);
    }

    match &cell.content {
        ExportContent::Blank => {}
        ExportContent::Arrow { direction } => draw_arrow(image, rect, *direction, line_width),
        ExportContent::Text { text } => {
            if let Some(painter) = painter {
                painter.draw_centered(image, rect, text, INK);
            }
        }
        ExportContent::Split { upper, lower } => {
            let (_, cy) = rect.center();
            stroke(
                image,
                (rect.x, cy),
                (rect.x + rect.w as i64 - 1, cy),
                line_width,
                GRID_LINE,
            );
            if let Some(painter) = painter {
                painter.draw_centered(image, rect.half(false), upper, INK);
                painter.draw_centered(image, rect.half(true), lower, INK);
            }
        }
    }
}

/// Straight arrows cross the square's centre; bent ones turn at it
fn draw_arrow(image: &mut RgbaImage, rect: Rect, direction: Direction, line_width: u32) {
    let legs = direction.legs();
    let reach = rect.w as i64 * 35 / 100;
    let (cx, cy) = rect.center();
    let step = |(x, y): (i64, i64), (dr, dc): (i8, i8), len: i64| {
        (x + dc as i64 * len, y + dr as i64 * len)
    };

    let (first, last) = match legs {
        [only] => (*only, *only),
        [first, .., last] => (*first, *last),
        [] => return,
    };
    let start = step((cx, cy), (-first.0, -first.1), reach);
    let mut pen = start;
    if legs.len() == 1 {
        let end = step((cx, cy), first, reach);
        stroke(image, pen, end, line_width * 2, INK);
        pen = end;
    } else {
        for &leg in legs {
            let next = step(pen, leg, reach);
            stroke(image, pen, next, line_width * 2, INK);
            pen = next;
        }
    }
    arrow_head(image, pen, last, rect.w / 8, INK);
}

fn draw_grid_lines(image: &mut RgbaImage, sheet: &ExportSheet, square: u32, line_width: u32) {
    let (width, height) = (image.width(), image.height());
    for col in 0..=sheet.width as u32 {
        let x = (col * square).min(width.saturating_sub(line_width));
        fill_rect(image, Rect::new(x as i64, 0, line_width, height), GRID_LINE);
    }
    for row in 0..=sheet.height as u32 {
        let y = (row * square).min(height.saturating_sub(line_width));
        fill_rect(image, Rect::new(0, y as i64, width, line_width), GRID_LINE);
    }
}

/// Encode an image as PNG
pub fn encode_png(image: &RgbaImage) -> Result<Vec<u8>, RenderError> {
    let mut bytes = Vec::new();
    image.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
    Ok(bytes)
}

/// Rasterize and encode in one step
pub fn render_png(
    sheet: &ExportSheet,
    options: &RenderOptions<'_>,
) -> Result<Vec<u8>, RenderError> {
    if sheet.cells.is_empty() {
        return Err(RenderError::EmptySheet);
    }
    encode_png(&rasterize(sheet, options)?)
}
