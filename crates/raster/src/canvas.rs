//! Pixel buffer with the handful of primitives a certificate needs.
//!
//! Shape fills test pixel centres against the exact geometry and write solid
//! colour, so output is free of anti-aliasing and identical from run to run.

use certforge_types::{Color, Point, Rect};
use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};

#[derive(Debug, Clone)]
pub struct Canvas {
    image: RgbaImage,
}

impl Canvas {
    pub fn new(width: u32, height: u32, background: Color) -> Self {
        Self {
            image: RgbaImage::from_pixel(width, height, Rgba(opaque(background))),
        }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn into_image(self) -> RgbaImage {
        self.image
    }

    /// Writes one pixel, ignoring coordinates off the canvas.
    pub fn put(&mut self, x: i32, y: i32, color: Color) {
        self.blend(x, y, color, 1.0);
    }

    /// Source-over blend of `color` at `coverage` (0..=1). The result is opaque.
    pub fn blend(&mut self, x: i32, y: i32, color: Color, coverage: f32) {
        if x < 0 || y < 0 || x as u32 >= self.width() || y as u32 >= self.height() {
            return;
        }
        let alpha = (color.a * coverage).clamp(0.0, 1.0);
        if alpha <= 0.0 {
            return;
        }
        let src = color.to_rgba8();
        let dst = self.image.get_pixel_mut(x as u32, y as u32);
        *dst = Rgba(mix(dst.0, [src[0], src[1], src[2]], alpha));
    }

    pub fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.fill_where(rect, color, |_, _| true);
    }

    pub fn fill_rounded_rect(&mut self, rect: Rect, radius: f32, color: Color) {
        let radius = radius.clamp(0.0, rect.width.min(rect.height) / 2.0);
        let (left, top) = (rect.x + radius, rect.y + radius);
        let (right, bottom) = (rect.right() - radius, rect.bottom() - radius);

        self.fill_where(rect, color, |cx, cy| {
            // Distance to the inner rectangle; non-zero only in the corners.
            let dx = (left - cx).max(cx - right).max(0.0);
            let dy = (top - cy).max(cy - bottom).max(0.0);
            dx * dx + dy * dy <= radius * radius
        });
    }

    /// A straight stroke with square ends flush to the endpoints.
    pub fn line(&mut self, from: Point, to: Point, thickness: f32, color: Color) {
        let half = thickness / 2.0;
        let bounds = Rect::from_edges(
            from.x.min(to.x) - half,
            from.y.min(to.y) - half,
            from.x.max(to.x) + half,
            from.y.max(to.y) + half,
        );
        self.fill_where(bounds, color, |cx, cy| {
            segment_distance(Point::new(cx, cy), from, to) <= half
        });
    }

    /// Two-stroke tick fitted to `rect`.
    pub fn checkmark(&mut self, rect: Rect, thickness: f32, color: Color) {
        let start = Point::new(rect.x, rect.y + rect.height * 0.55);
        let corner = Point::new(rect.x + rect.width * 0.38, rect.bottom());
        let end = Point::new(rect.right(), rect.y);
        self.line(start, corner, thickness, color);
        self.line(corner, end, thickness, color);
    }

    /// Scales `source` into `rect` and composites it over the canvas.
    pub fn blit(&mut self, source: &RgbaImage, rect: Rect) {
        let width = rect.width.round().max(0.0) as u32;
        let height = rect.height.round().max(0.0) as u32;
        if width == 0 || height == 0 || source.width() == 0 || source.height() == 0 {
            return;
        }

        let scaled;
        let pixels = if source.dimensions() == (width, height) {
            source
        } else {
            scaled = imageops::resize(source, width, height, FilterType::Triangle);
            &scaled
        };

        let (x0, y0) = (rect.x.round() as i32, rect.y.round() as i32);
        for (sx, sy, pixel) in pixels.enumerate_pixels() {
            let [r, g, b, a] = pixel.0;
            if a == 0 {
                continue;
            }
            let color = Color::rgb(r, g, b);
            self.blend(x0 + sx as i32, y0 + sy as i32, color, a as f32 / 255.0);
        }
    }

    /// Fills every pixel whose centre lies inside `bounds` and passes `inside`.
    fn fill_where<F>(&mut self, bounds: Rect, color: Color, inside: F)
    where
        F: Fn(f32, f32) -> bool,
    {
        let x_start = (bounds.x - 0.5).ceil().max(0.0) as u32;
        let y_start = (bounds.y - 0.5).ceil().max(0.0) as u32;
        let x_end = ((bounds.right() - 0.5).ceil().max(0.0) as u32).min(self.width());
        let y_end = ((bounds.bottom() - 0.5).ceil().max(0.0) as u32).min(self.height());

        for y in y_start..y_end {
            let cy = y as f32 + 0.5;
            for x in x_start..x_end {
                let cx = x as f32 + 0.5;
                if inside(cx, cy) {
                    self.blend(x as i32, y as i32, color, 1.0);
                }
            }
        }
    }
}

fn opaque(color: Color) -> [u8; 4] {
    let [r, g, b, _] = color.to_rgba8();
    [r, g, b, 255]
}

fn mix(dst: [u8; 4], src: [u8; 3], alpha: f32) -> [u8; 4] {
    if alpha >= 1.0 {
        return [src[0], src[1], src[2], 255];
    }
    let channel = |s: u8, d: u8| (s as f32 * alpha + d as f32 * (1.0 - alpha)).round() as u8;
    [
        channel(src[0], dst[0]),
        channel(src[1], dst[1]),
        channel(src[2], dst[2]),
        255,
    ]
}

fn segment_distance(p: Point, a: Point, b: Point) -> f32 {
    let (abx, aby) = (b.x - a.x, b.y - a.y);
    let length_sq = abx * abx + aby * aby;
    let t = if length_sq == 0.0 {
        0.0
    } else {
        (((p.x - a.x) * abx + (p.y - a.y) * aby) / length_sq).clamp(0.0, 1.0)
    };
    let (dx, dy) = (p.x - (a.x + t * abx), p.y - (a.y + t * aby));
    (dx * dx + dy * dy).sqrt()
}
