//! The certificate design as a single immutable value.

use crate::text::{TextAlign, TextSlot, TextStyle};
use certforge_types::{Color, Point, Rect, Size};

const NAVY: Color = Color::rgb(0x1e, 0x3a, 0x8a);
const INK: Color = Color::rgb(0x0f, 0x17, 0x2a);
const MUTED: Color = Color::rgb(0x47, 0x55, 0x69);
const SUBTLE: Color = Color::rgb(0x64, 0x74, 0x8b);
const LINK: Color = Color::rgb(0x25, 0x63, 0xeb);

/// Two nested rounded rectangles forming the border.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameLayout {
    pub outer: Rect,
    pub outer_radius: f32,
    pub outer_color: Color,
    pub inner: Rect,
    pub inner_radius: f32,
    pub inner_color: Color,
}

/// The "verified" pill: rounded background, checkmark glyph and label.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BadgeLayout {
    pub pill: Rect,
    pub radius: f32,
    pub fill: Color,
    pub checkmark: Rect,
    pub check_thickness: f32,
    pub check_color: Color,
    pub label: TextSlot,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DividerLayout {
    pub from: Point,
    pub to: Point,
    pub thickness: f32,
    pub color: Color,
}

/// Fixed wording drawn on every certificate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CertificateCopy {
    pub brand_fallback: &'static str,
    pub badge_label: &'static str,
    pub title: &'static str,
    pub holder_lead_in: &'static str,
    pub program_lead_in: &'static str,
    pub verify_lead_in: &'static str,
    pub id_label: &'static str,
    pub date_label: &'static str,
}

impl Default for CertificateCopy {
    fn default() -> Self {
        Self {
            brand_fallback: "</>",
            badge_label: "VERIFIED",
            title: "Certificate of Completion",
            holder_lead_in: "This is to certify that",
            program_lead_in: "has successfully completed the program",
            verify_lead_in: "Verify the authenticity of this certificate at",
            id_label: "CERTIFICATE ID",
            date_label: "ISSUE DATE",
        }
    }
}

/// Every coordinate and size drawn on the certificate canvas.
///
/// The painter positions text from these slots and the document exporter
/// derives link regions from the same slots, so the two stay in registration.
/// Build one with [`CertificateLayout::standard`] and share it behind an `Arc`.
#[derive(Debug, Clone, PartialEq)]
pub struct CertificateLayout {
    pub canvas: Size,
    pub background: Color,
    pub frame: FrameLayout,
    pub brand_mark: Rect,
    /// Text drawn inside the brand-mark envelope when the image is unavailable.
    pub brand_fallback: TextSlot,
    pub badge: BadgeLayout,
    pub title: TextSlot,
    pub holder_lead_in: TextSlot,
    pub holder_name: TextSlot,
    pub program_lead_in: TextSlot,
    pub program_name: TextSlot,
    pub verify_lead_in: TextSlot,
    pub verification_url: TextSlot,
    pub divider: DividerLayout,
    pub id_label: TextSlot,
    pub id_value: TextSlot,
    pub date_label: TextSlot,
    pub date_value: TextSlot,
    pub seal: Rect,
    pub footer_url: TextSlot,
    pub copy: CertificateCopy,
}

impl CertificateLayout {
    pub const WIDTH: u32 = 1600;
    pub const HEIGHT: u32 = 1130;

    /// The 1600 x 1130 landscape design.
    pub fn standard() -> Self {
        let canvas = Size::new(Self::WIDTH as f32, Self::HEIGHT as f32);
        let center = canvas.width / 2.0;
        let page = Rect::new(0.0, 0.0, canvas.width, canvas.height);
        let margin_left = 160.0;
        let margin_right = canvas.width - margin_left;

        let centered = |baseline: f32, style: TextStyle| TextSlot::new(center, baseline, style);

        let pill = Rect::centered(center, 212.0, Size::new(240.0, 44.0));

        Self {
            canvas,
            background: Color::rgb(0xf1, 0xf5, 0xf9),
            frame: FrameLayout {
                outer: page.inset(20.0),
                outer_radius: 28.0,
                outer_color: NAVY,
                inner: page.inset(36.0),
                inner_radius: 18.0,
                inner_color: Color::WHITE,
            },
            brand_mark: Rect::centered(center, 72.0, Size::new(120.0, 120.0)),
            brand_fallback: centered(146.0, TextStyle::regular(36.0, NAVY).bold()),
            badge: BadgeLayout {
                pill,
                radius: pill.height / 2.0,
                fill: Color::rgb(0xdc, 0xfc, 0xe7),
                checkmark: Rect::new(pill.x + 20.0, 224.0, 22.0, 20.0),
                check_thickness: 4.0,
                check_color: Color::rgb(0x16, 0x65, 0x34),
                label: TextSlot::new(
                    pill.x + 54.0,
                    243.0,
                    TextStyle::regular(20.0, Color::rgb(0x16, 0x65, 0x34))
                        .bold()
                        .aligned(TextAlign::Left),
                ),
            },
            title: centered(330.0, TextStyle::regular(52.0, INK).bold()),
            holder_lead_in: centered(392.0, TextStyle::regular(24.0, MUTED).italic()),
            holder_name: centered(470.0, TextStyle::regular(60.0, NAVY).bold()),
            program_lead_in: centered(530.0, TextStyle::regular(24.0, MUTED).italic()),
            program_name: centered(596.0, TextStyle::regular(40.0, INK).bold()),
            verify_lead_in: centered(650.0, TextStyle::regular(20.0, SUBTLE).italic()),
            verification_url: centered(690.0, TextStyle::regular(22.0, LINK)),
            divider: DividerLayout {
                from: Point::new(margin_left, 730.0),
                to: Point::new(margin_right, 730.0),
                thickness: 2.0,
                color: Color::rgb(0xcb, 0xd5, 0xe1),
            },
            id_label: TextSlot::new(
                margin_left,
                780.0,
                TextStyle::regular(16.0, SUBTLE).aligned(TextAlign::Left),
            ),
            id_value: TextSlot::new(
                margin_left,
                816.0,
                TextStyle::regular(24.0, NAVY).bold().aligned(TextAlign::Left),
            ),
            date_label: TextSlot::new(
                margin_right,
                780.0,
                TextStyle::regular(16.0, SUBTLE).aligned(TextAlign::Right),
            ),
            date_value: TextSlot::new(
                margin_right,
                816.0,
                TextStyle::regular(24.0, INK).bold().aligned(TextAlign::Right),
            ),
            seal: Rect::centered(center, 846.0, Size::new(150.0, 150.0)),
            footer_url: centered(1050.0, TextStyle::regular(20.0, SUBTLE)),
            copy: CertificateCopy::default(),
        }
    }

    pub fn width(&self) -> u32 {
        self.canvas.width as u32
    }

    pub fn height(&self) -> u32 {
        self.canvas.height as u32
    }
}

impl Default for CertificateLayout {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_canvas_dimensions() {
        let layout = CertificateLayout::standard();
        assert_eq!(layout.width(), 1600);
        assert_eq!(layout.height(), 1130);
    }

    #[test]
    fn text_baselines_run_top_to_bottom() {
        let layout = CertificateLayout::standard();
        let baselines = [
            layout.brand_fallback.baseline,
            layout.badge.label.baseline,
            layout.title.baseline,
            layout.holder_lead_in.baseline,
            layout.holder_name.baseline,
            layout.program_lead_in.baseline,
            layout.program_name.baseline,
            layout.verify_lead_in.baseline,
            layout.verification_url.baseline,
            layout.divider.from.y,
            layout.id_label.baseline,
            layout.id_value.baseline,
            layout.footer_url.baseline,
        ];
        assert!(baselines.windows(2).all(|w| w[0] < w[1]), "{:?}", baselines);
    }

    #[test]
    fn every_element_sits_inside_the_inner_frame() {
        let layout = CertificateLayout::standard();
        let inner = layout.frame.inner;
        for rect in [layout.brand_mark, layout.badge.pill, layout.badge.checkmark, layout.seal] {
            assert!(rect.x >= inner.x && rect.right() <= inner.right());
            assert!(rect.y >= inner.y && rect.bottom() <= inner.bottom());
        }
        assert!(layout.footer_url.baseline < inner.bottom());
    }

    #[test]
    fn fallback_glyph_baseline_is_inside_brand_envelope() {
        let layout = CertificateLayout::standard();
        let envelope = layout.brand_mark;
        let slot = layout.brand_fallback;
        assert_eq!(slot.anchor_x, envelope.center_x());
        assert!(slot.baseline - slot.style.size >= envelope.y);
        assert!(slot.baseline <= envelope.bottom());
    }

    #[test]
    fn badge_parts_sit_inside_pill() {
        let badge = CertificateLayout::standard().badge;
        assert!(badge.checkmark.x > badge.pill.x);
        assert!(badge.checkmark.bottom() < badge.pill.bottom());
        assert!(badge.label.anchor_x > badge.checkmark.right());
        assert!(badge.label.baseline < badge.pill.bottom());
    }
}
