//! Text measurement and drawing.
//!
//! [`BitmapTypeface`] ships with the binary and draws hard-edged glyphs, so two
//! renders of the same record are pixel-identical. [`OutlineTypeface`] renders
//! TrueType fonts supplied by configuration.

use crate::canvas::Canvas;
use crate::error::RasterError;
use certforge_layout::{FontWeight, TextMeasure, TextStyle, VMetrics};
use font8x8::{BASIC_FONTS, LATIN_FONTS, UnicodeFonts};
use rusttype::{Font, Scale, point};
use std::fmt::Debug;

/// A font that can both measure and draw.
pub trait Typeface: TextMeasure + Send + Sync + Debug {
    /// Draws `text` with its left edge at `left` and its baseline at `baseline`.
    fn draw(&self, canvas: &mut Canvas, text: &str, left: f32, baseline: f32, style: &TextStyle);

    fn name(&self) -> &'static str;
}

/// Glyphs are 8x8 cells: rows 0..7 sit above the baseline, row 7 is the descender.
const GLYPH_ROWS: u32 = 8;
const BASELINE_ROW: u32 = 7;
const ITALIC_SHEAR: f32 = 0.2;
const REPLACEMENT: [u8; 8] = [0x7E, 0x42, 0x42, 0x42, 0x42, 0x42, 0x7E, 0x00];

/// The built-in 8x8 bitmap font, scaled by nearest neighbour to the requested
/// size. Bold is a second strike one pixel (or more at large sizes) to the
/// right; italic shears rows above the baseline.
#[derive(Debug, Clone, Copy, Default)]
pub struct BitmapTypeface;

impl BitmapTypeface {
    pub fn new() -> Self {
        Self
    }

    fn cell(size: f32) -> u32 {
        size.round().max(1.0) as u32
    }

    fn bold_offset(cell: u32, style: &TextStyle) -> u32 {
        match style.weight {
            FontWeight::Bold => (cell / 16).max(1),
            FontWeight::Regular => 0,
        }
    }

    fn glyph(ch: char) -> [u8; 8] {
        BASIC_FONTS
            .get(ch)
            .or_else(|| LATIN_FONTS.get(ch))
            .unwrap_or(REPLACEMENT)
    }
}

impl TextMeasure for BitmapTypeface {
    fn measure(&self, text: &str, style: &TextStyle) -> f32 {
        let count = text.chars().count() as u32;
        if count == 0 {
            return 0.0;
        }
        let cell = Self::cell(style.size);
        (count * cell + Self::bold_offset(cell, style)) as f32
    }

    fn metrics(&self, _style: &TextStyle) -> VMetrics {
        VMetrics {
            ascent: BASELINE_ROW as f32 / GLYPH_ROWS as f32,
            descent: (GLYPH_ROWS - BASELINE_ROW) as f32 / GLYPH_ROWS as f32,
        }
    }
}

impl Typeface for BitmapTypeface {
    fn draw(&self, canvas: &mut Canvas, text: &str, left: f32, baseline: f32, style: &TextStyle) {
        let cell = Self::cell(style.size);
        let strikes = Self::bold_offset(cell, style);
        let left = left.round() as i32;
        let baseline = baseline.round() as i32;
        let top = baseline - (cell * BASELINE_ROW / GLYPH_ROWS) as i32;

        for (index, ch) in text.chars().enumerate() {
            let rows = Self::glyph(ch);
            let origin = left + (index as u32 * cell) as i32;

            for dy in 0..cell {
                let bits = rows[(dy * GLYPH_ROWS / cell) as usize];
                if bits == 0 {
                    continue;
                }
                let y = top + dy as i32;
                let shear = if style.italic {
                    ((baseline - y) as f32 * ITALIC_SHEAR).round() as i32
                } else {
                    0
                };
                for dx in 0..cell {
                    let column = dx * GLYPH_ROWS / cell;
                    if bits & (1 << column) == 0 {
                        continue;
                    }
                    let x = origin + dx as i32 + shear;
                    for strike in 0..=strikes {
                        canvas.put(x + strike as i32, y, style.color);
                    }
                }
            }
        }
    }

    fn name(&self) -> &'static str {
        "BitmapTypeface"
    }
}

/// TrueType faces rendered through `rusttype`. Missing bold or italic faces
/// fall back to the regular face.
pub struct OutlineTypeface {
    regular: Font<'static>,
    bold: Option<Font<'static>>,
    italic: Option<Font<'static>>,
}

impl Debug for OutlineTypeface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OutlineTypeface")
            .field("bold", &self.bold.is_some())
            .field("italic", &self.italic.is_some())
            .finish()
    }
}

impl OutlineTypeface {
    pub fn from_bytes(regular: Vec<u8>) -> Result<Self, RasterError> {
        Ok(Self {
            regular: parse_font(regular, "regular")?,
            bold: None,
            italic: None,
        })
    }

    pub fn with_bold(mut self, data: Vec<u8>) -> Result<Self, RasterError> {
        self.bold = Some(parse_font(data, "bold")?);
        Ok(self)
    }

    pub fn with_italic(mut self, data: Vec<u8>) -> Result<Self, RasterError> {
        self.italic = Some(parse_font(data, "italic")?);
        Ok(self)
    }

    fn face(&self, style: &TextStyle) -> &Font<'static> {
        let preferred = match (style.weight, style.italic) {
            (FontWeight::Bold, _) => self.bold.as_ref(),
            (FontWeight::Regular, true) => self.italic.as_ref(),
            (FontWeight::Regular, false) => None,
        };
        preferred.unwrap_or(&self.regular)
    }
}

fn parse_font(data: Vec<u8>, face: &str) -> Result<Font<'static>, RasterError> {
    Font::try_from_vec(data)
        .ok_or_else(|| RasterError::InvalidFont(format!("{} face is not a TrueType font", face)))
}

impl TextMeasure for OutlineTypeface {
    fn measure(&self, text: &str, style: &TextStyle) -> f32 {
        let font = self.face(style);
        let scale = Scale::uniform(style.size);
        font.layout(text, scale, point(0.0, 0.0))
            .last()
            .map(|g| g.position().x + g.unpositioned().h_metrics().advance_width)
            .unwrap_or(0.0)
    }

    fn metrics(&self, style: &TextStyle) -> VMetrics {
        let v = self.face(style).v_metrics(Scale::uniform(style.size));
        VMetrics {
            ascent: v.ascent / style.size,
            descent: -v.descent / style.size,
        }
    }
}

impl Typeface for OutlineTypeface {
    fn draw(&self, canvas: &mut Canvas, text: &str, left: f32, baseline: f32, style: &TextStyle) {
        let font = self.face(style);
        let scale = Scale::uniform(style.size);
        for glyph in font.layout(text, scale, point(left, baseline)) {
            let Some(bb) = glyph.pixel_bounding_box() else {
                continue;
            };
            glyph.draw(|gx, gy, coverage| {
                canvas.blend(
                    bb.min.x + gx as i32,
                    bb.min.y + gy as i32,
                    style.color,
                    coverage,
                );
            });
        }
    }

    fn name(&self) -> &'static str {
        "OutlineTypeface"
    }
}
