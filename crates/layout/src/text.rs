use certforge_types::{Color, Rect};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FontWeight {
    Regular,
    Bold,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextAlign {
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    /// Font size in canvas pixels (the em height).
    pub size: f32,
    pub weight: FontWeight,
    pub italic: bool,
    pub align: TextAlign,
    pub color: Color,
}

impl TextStyle {
    pub const fn regular(size: f32, color: Color) -> Self {
        Self {
            size,
            weight: FontWeight::Regular,
            italic: false,
            align: TextAlign::Center,
            color,
        }
    }

    pub const fn bold(self) -> Self {
        Self {
            weight: FontWeight::Bold,
            ..self
        }
    }

    pub const fn italic(self) -> Self {
        Self {
            italic: true,
            ..self
        }
    }

    pub const fn aligned(self, align: TextAlign) -> Self {
        Self { align, ..self }
    }
}

/// Vertical font metrics as fractions of the font size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VMetrics {
    pub ascent: f32,
    pub descent: f32,
}

/// Anything that can report how wide a string renders. Implemented by the
/// raster typefaces; kept here so planning does not depend on a rasterizer.
pub trait TextMeasure {
    /// Advance width of `text` in canvas pixels.
    fn measure(&self, text: &str, style: &TextStyle) -> f32;

    fn metrics(&self, style: &TextStyle) -> VMetrics;
}

/// Where one line of text goes: an anchor on its baseline, interpreted
/// according to `style.align`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextSlot {
    pub anchor_x: f32,
    pub baseline: f32,
    pub style: TextStyle,
}

impl TextSlot {
    pub const fn new(anchor_x: f32, baseline: f32, style: TextStyle) -> Self {
        Self {
            anchor_x,
            baseline,
            style,
        }
    }

    /// Left edge of a run of `width` pixels, snapped to the pixel grid.
    pub fn left_edge(&self, width: f32) -> f32 {
        let left = match self.style.align {
            TextAlign::Left => self.anchor_x,
            TextAlign::Center => self.anchor_x - width / 2.0,
            TextAlign::Right => self.anchor_x - width,
        };
        left.round()
    }

    /// The box a run of `width` pixels occupies when drawn in this slot.
    pub fn extent(&self, width: f32, metrics: VMetrics) -> TextExtent {
        TextExtent {
            left: self.left_edge(width),
            baseline: self.baseline,
            width,
            ascent: metrics.ascent * self.style.size,
            descent: metrics.descent * self.style.size,
        }
    }

    /// Measures `text` and returns its extent in this slot.
    pub fn measure<M: TextMeasure + ?Sized>(&self, text: &str, measurer: &M) -> TextExtent {
        let width = measurer.measure(text, &self.style);
        self.extent(width, measurer.metrics(&self.style))
    }
}

/// The painted box of one text run, in canvas pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextExtent {
    pub left: f32,
    pub baseline: f32,
    pub width: f32,
    /// Pixels above the baseline.
    pub ascent: f32,
    /// Pixels below the baseline.
    pub descent: f32,
}

impl TextExtent {
    pub fn right(&self) -> f32 {
        self.left + self.width
    }

    pub fn top(&self) -> f32 {
        self.baseline - self.ascent
    }

    pub fn bottom(&self) -> f32 {
        self.baseline + self.descent
    }

    pub fn rect(&self) -> Rect {
        Rect::from_edges(self.left, self.top(), self.right(), self.bottom())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Mono(f32);

    impl TextMeasure for Mono {
        fn measure(&self, text: &str, style: &TextStyle) -> f32 {
            text.chars().count() as f32 * style.size * self.0
        }

        fn metrics(&self, _style: &TextStyle) -> VMetrics {
            VMetrics {
                ascent: 0.75,
                descent: 0.25,
            }
        }
    }

    const STYLE: TextStyle = TextStyle::regular(20.0, Color::BLACK);

    #[test]
    fn alignment_resolves_left_edge() {
        let center = TextSlot::new(800.0, 100.0, STYLE);
        assert_eq!(center.left_edge(200.0), 700.0);

        let left = TextSlot::new(160.0, 100.0, STYLE.aligned(TextAlign::Left));
        assert_eq!(left.left_edge(200.0), 160.0);

        let right = TextSlot::new(1440.0, 100.0, STYLE.aligned(TextAlign::Right));
        assert_eq!(right.left_edge(200.0), 1240.0);
    }

    #[test]
    fn left_edge_snaps_to_pixel_grid() {
        let center = TextSlot::new(800.0, 100.0, STYLE);
        assert_eq!(center.left_edge(101.0), 750.0);
    }

    #[test]
    fn extent_height_comes_from_font_size() {
        let slot = TextSlot::new(800.0, 100.0, STYLE);
        let extent = slot.measure("abcd", &Mono(1.0));
        assert_eq!(extent.width, 80.0);
        assert_eq!(extent.left, 760.0);
        assert_eq!(extent.top(), 85.0);
        assert_eq!(extent.bottom(), 105.0);
        assert_eq!(extent.rect(), Rect::new(760.0, 85.0, 80.0, 20.0));
    }

    #[test]
    fn style_builders_compose() {
        let style = STYLE.bold().italic().aligned(TextAlign::Right);
        assert_eq!(style.weight, FontWeight::Bold);
        assert!(style.italic);
        assert_eq!(style.align, TextAlign::Right);
        assert_eq!(style.size, 20.0);
    }
}
