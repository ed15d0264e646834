//! Turns one certificate's content into ordered draw instructions.
//!
//! Planning does no pixel work. It resolves every text run to a [`TextExtent`]
//! using the supplied [`TextMeasure`], which is what lets the exporter place
//! link regions without touching the raster.

use crate::certificate::CertificateLayout;
use crate::links::LinkTargets;
use crate::text::{TextExtent, TextMeasure, TextSlot, TextStyle};
use certforge_types::{CertificateRecord, Color, Point, Rect};

/// The variable text printed on a certificate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CertificateContent {
    pub holder_name: String,
    pub program_name: String,
    pub display_id: String,
    pub issue_date: String,
    pub verification_text: String,
    pub footer_text: String,
}

impl CertificateContent {
    pub fn from_record(record: &CertificateRecord, links: &LinkTargets) -> Self {
        Self {
            holder_name: record.holder_name.clone(),
            program_name: record.program_name.clone(),
            display_id: record.display_id.clone(),
            issue_date: record.formatted_issue_date(),
            verification_text: links.verification_display(),
            footer_text: links.site_display(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssetKind {
    BrandMark,
    Seal,
}

/// Which decorative images decoded successfully.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AssetAvailability {
    pub brand_mark: bool,
    pub seal: bool,
}

impl AssetAvailability {
    pub const ALL: AssetAvailability = AssetAvailability {
        brand_mark: true,
        seal: true,
    };
    pub const NONE: AssetAvailability = AssetAvailability {
        brand_mark: false,
        seal: false,
    };
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextRun {
    pub text: String,
    pub extent: TextExtent,
    pub style: TextStyle,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    FillRect {
        rect: Rect,
        color: Color,
    },
    FillRoundedRect {
        rect: Rect,
        radius: f32,
        color: Color,
    },
    Line {
        from: Point,
        to: Point,
        thickness: f32,
        color: Color,
    },
    Checkmark {
        rect: Rect,
        thickness: f32,
        color: Color,
    },
    Text(TextRun),
    Image {
        asset: AssetKind,
        rect: Rect,
    },
}

/// Draw instructions plus the extents the exporter turns into link regions.
#[derive(Debug, Clone, PartialEq)]
pub struct CertificatePlan {
    pub ops: Vec<DrawOp>,
    pub verification_url: TextExtent,
    pub footer_url: TextExtent,
}

impl CertificatePlan {
    pub fn text_runs(&self) -> impl Iterator<Item = &TextRun> {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::Text(run) => Some(run),
            _ => None,
        })
    }

    pub fn contains_image(&self, asset: AssetKind) -> bool {
        self.ops
            .iter()
            .any(|op| matches!(op, DrawOp::Image { asset: a, .. } if *a == asset))
    }
}

struct Builder<'m, M: ?Sized> {
    ops: Vec<DrawOp>,
    measure: &'m M,
}

impl<M: TextMeasure + ?Sized> Builder<'_, M> {
    fn push(&mut self, op: DrawOp) {
        self.ops.push(op);
    }

    fn text(&mut self, slot: &TextSlot, value: &str) -> TextExtent {
        let extent = slot.measure(value, self.measure);
        self.ops.push(DrawOp::Text(TextRun {
            text: value.to_string(),
            extent,
            style: slot.style,
        }));
        extent
    }
}

/// Builds the draw list for `content`, back to front.
///
/// A missing brand mark is replaced by the fallback glyph inside the same
/// envelope; a missing seal is left out.
pub fn plan<M: TextMeasure + ?Sized>(
    layout: &CertificateLayout,
    content: &CertificateContent,
    availability: AssetAvailability,
    measure: &M,
) -> CertificatePlan {
    let mut b = Builder {
        ops: Vec::with_capacity(24),
        measure,
    };
    let copy = &layout.copy;

    b.push(DrawOp::FillRect {
        rect: Rect::new(0.0, 0.0, layout.canvas.width, layout.canvas.height),
        color: layout.background,
    });
    b.push(DrawOp::FillRoundedRect {
        rect: layout.frame.outer,
        radius: layout.frame.outer_radius,
        color: layout.frame.outer_color,
    });
    b.push(DrawOp::FillRoundedRect {
        rect: layout.frame.inner,
        radius: layout.frame.inner_radius,
        color: layout.frame.inner_color,
    });

    if availability.brand_mark {
        b.push(DrawOp::Image {
            asset: AssetKind::BrandMark,
            rect: layout.brand_mark,
        });
    } else {
        b.text(&layout.brand_fallback, copy.brand_fallback);
    }

    let badge = &layout.badge;
    b.push(DrawOp::FillRoundedRect {
        rect: badge.pill,
        radius: badge.radius,
        color: badge.fill,
    });
    b.push(DrawOp::Checkmark {
        rect: badge.checkmark,
        thickness: badge.check_thickness,
        color: badge.check_color,
    });
    b.text(&badge.label, copy.badge_label);

    b.text(&layout.title, copy.title);
    b.text(&layout.holder_lead_in, copy.holder_lead_in);
    b.text(&layout.holder_name, &content.holder_name);
    b.text(&layout.program_lead_in, copy.program_lead_in);
    b.text(&layout.program_name, &content.program_name);
    b.text(&layout.verify_lead_in, copy.verify_lead_in);
    let verification_url = b.text(&layout.verification_url, &content.verification_text);

    let divider = &layout.divider;
    b.push(DrawOp::Line {
        from: divider.from,
        to: divider.to,
        thickness: divider.thickness,
        color: divider.color,
    });

    b.text(&layout.id_label, copy.id_label);
    b.text(&layout.id_value, &content.display_id);
    b.text(&layout.date_label, copy.date_label);
    b.text(&layout.date_value, &content.issue_date);

    if availability.seal {
        b.push(DrawOp::Image {
            asset: AssetKind::Seal,
            rect: layout.seal,
        });
    }

    let footer_url = b.text(&layout.footer_url, &content.footer_text);

    CertificatePlan {
        ops: b.ops,
        verification_url,
        footer_url,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::VMetrics;
    use certforge_types::CertificateStatus;

    /// Every glyph is exactly `size` wide.
    struct Square;

    impl TextMeasure for Square {
        fn measure(&self, text: &str, style: &TextStyle) -> f32 {
            text.chars().count() as f32 * style.size
        }

        fn metrics(&self, _style: &TextStyle) -> VMetrics {
            VMetrics {
                ascent: 0.875,
                descent: 0.125,
            }
        }
    }

    fn content() -> CertificateContent {
        let record = CertificateRecord {
            id: "1".into(),
            display_id: "EZZCODE-2024-WD-001".into(),
            holder_name: "Ada Lovelace".into(),
            program_name: "Web Development".into(),
            issue_date: "2024-03-15".into(),
            status: CertificateStatus::Valid,
        };
        CertificateContent::from_record(&record, &LinkTargets::default())
    }

    fn texts(plan: &CertificatePlan) -> Vec<&str> {
        plan.text_runs().map(|r| r.text.as_str()).collect()
    }

    #[test]
    fn content_formats_date_and_links() {
        let content = content();
        assert_eq!(content.issue_date, "March 15, 2024");
        assert_eq!(content.verification_text, "ezzcode.com/#certificate");
        assert_eq!(content.footer_text, "ezzcode.com");
    }

    #[test]
    fn full_plan_draws_elements_in_order() {
        let layout = CertificateLayout::standard();
        let plan = plan(&layout, &content(), AssetAvailability::ALL, &Square);

        assert!(matches!(plan.ops[0], DrawOp::FillRect { .. }));
        assert!(matches!(
            plan.ops[3],
            DrawOp::Image {
                asset: AssetKind::BrandMark,
                ..
            }
        ));
        assert!(plan.contains_image(AssetKind::Seal));
        assert_eq!(
            texts(&plan),
            vec![
                "VERIFIED",
                "Certificate of Completion",
                "This is to certify that",
                "Ada Lovelace",
                "has successfully completed the program",
                "Web Development",
                "Verify the authenticity of this certificate at",
                "ezzcode.com/#certificate",
                "CERTIFICATE ID",
                "EZZCODE-2024-WD-001",
                "ISSUE DATE",
                "March 15, 2024",
                "ezzcode.com",
            ]
        );
    }

    #[test]
    fn missing_brand_mark_uses_fallback_glyph_in_same_envelope() {
        let layout = CertificateLayout::standard();
        let plan = plan(
            &layout,
            &content(),
            AssetAvailability {
                brand_mark: false,
                seal: true,
            },
            &Square,
        );

        assert!(!plan.contains_image(AssetKind::BrandMark));
        let glyph = plan
            .text_runs()
            .find(|r| r.text == "</>")
            .expect("fallback glyph");
        let envelope = layout.brand_mark;
        let drawn = glyph.extent.rect();
        assert!(drawn.x >= envelope.x && drawn.right() <= envelope.right());
        assert!(drawn.y >= envelope.y && drawn.bottom() <= envelope.bottom());
    }

    #[test]
    fn missing_seal_is_omitted() {
        let layout = CertificateLayout::standard();
        let with_seal = plan(&layout, &content(), AssetAvailability::ALL, &Square);
        let without = plan(
            &layout,
            &content(),
            AssetAvailability {
                brand_mark: true,
                seal: false,
            },
            &Square,
        );

        assert_eq!(without.ops.len(), with_seal.ops.len() - 1);
        assert!(!without.contains_image(AssetKind::Seal));
        assert_eq!(texts(&without), texts(&with_seal));
    }

    #[test]
    fn published_extents_match_their_text_runs() {
        let layout = CertificateLayout::standard();
        let plan = plan(&layout, &content(), AssetAvailability::NONE, &Square);

        let url = plan
            .text_runs()
            .find(|r| r.text == "ezzcode.com/#certificate")
            .expect("verification url run");
        assert_eq!(url.extent, plan.verification_url);
        assert_eq!(plan.verification_url.baseline, layout.verification_url.baseline);
        // 24 glyphs of 22px centred on 800.
        assert_eq!(plan.verification_url.left, 536.0);
        assert_eq!(plan.verification_url.width, 528.0);

        assert_eq!(plan.footer_url.baseline, layout.footer_url.baseline);
        assert_eq!(plan.footer_url.left, 690.0);
    }

    #[test]
    fn long_names_overflow_rather_than_wrap() {
        let layout = CertificateLayout::standard();
        let mut long = content();
        long.holder_name = "X".repeat(40);
        let plan = plan(&layout, &long, AssetAvailability::ALL, &Square);

        let name = plan
            .text_runs()
            .find(|r| r.text == long.holder_name)
            .expect("holder name run");
        assert!(name.extent.left < 0.0);
        assert!(name.extent.right() > layout.canvas.width);
        assert_eq!(plan.text_runs().filter(|r| r.text.starts_with('X')).count(), 1);
    }
}
