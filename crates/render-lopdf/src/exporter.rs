use crate::error::ExportFailure;
use crate::link::{LinkKind, LinkRegion};
use certforge_raster::RenderedCertificate;
use certforge_types::Size;
use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream, StringFormat, dictionary};

const IMAGE_NAME: &str = "Im1";

/// A finished single-page PDF ready to be offered as a download.
#[derive(Debug, Clone)]
pub struct ExportedDocument {
    /// `<display id>.pdf`
    pub filename: String,
    pub bytes: Vec<u8>,
    /// Page size in points.
    pub page_size: Size,
    pub links: Vec<LinkRegion>,
}

impl ExportedDocument {
    pub fn link(&self, kind: LinkKind) -> Option<&LinkRegion> {
        self.links.iter().find(|l| l.kind == kind)
    }
}

/// Converts a rendered certificate into a PDF whose single page has the
/// raster's aspect ratio at a fixed width.
#[derive(Debug, Clone, Copy)]
pub struct DocumentExporter {
    page_width: f32,
}

impl Default for DocumentExporter {
    fn default() -> Self {
        Self::new(Self::DEFAULT_PAGE_WIDTH)
    }
}

impl DocumentExporter {
    /// A4 landscape width in points.
    pub const DEFAULT_PAGE_WIDTH: f32 = 842.0;

    pub fn new(page_width: f32) -> Self {
        Self { page_width }
    }

    pub fn page_width(&self) -> f32 {
        self.page_width
    }

    /// Points per raster pixel for a raster `raster_width` pixels wide.
    pub fn scale_for(&self, raster_width: u32) -> f32 {
        self.page_width / raster_width as f32
    }

    /// Link targets and the filename come from `rendered`, so each annotation
    /// opens the URL whose text was painted under it.
    pub fn export(&self, rendered: &RenderedCertificate) -> Result<ExportedDocument, ExportFailure> {
        let (width, height) = rendered.image.dimensions();
        if width == 0 || height == 0 {
            return Err(ExportFailure::EmptyRaster);
        }
        if !self.page_width.is_finite() || self.page_width <= 0.0 {
            return Err(ExportFailure::Encode(format!(
                "invalid page width {}",
                self.page_width
            )));
        }

        let scale = self.scale_for(width);
        let page_size = Size::new(self.page_width, height as f32 * scale);

        let links = &rendered.links;
        let regions = vec![
            LinkRegion::from_extent(
                LinkKind::Verification,
                links.verification_url.as_str(),
                &rendered.verification_url,
                scale,
                page_size.height,
            ),
            LinkRegion::from_extent(
                LinkKind::Site,
                links.site_url.as_str(),
                &rendered.footer_url,
                scale,
                page_size.height,
            ),
        ];

        let bytes = self.build_pdf(rendered, &rendered.display_id, page_size, &regions)?;
        log::debug!(
            "Exported {} ({}x{} px -> {:.1}x{:.1} pt, {} bytes)",
            rendered.display_id,
            width,
            height,
            page_size.width,
            page_size.height,
            bytes.len()
        );

        Ok(ExportedDocument {
            filename: format!("{}.pdf", rendered.display_id),
            bytes,
            page_size,
            links: regions,
        })
    }

    fn build_pdf(
        &self,
        rendered: &RenderedCertificate,
        title: &str,
        page_size: Size,
        regions: &[LinkRegion],
    ) -> Result<Vec<u8>, ExportFailure> {
        let mut doc = Document::with_version("1.7");
        let pages_id = doc.new_object_id();

        let image_id = doc.add_object(image_xobject(rendered)?);

        let content = Content {
            operations: vec![
                Operation::new("q", vec![]),
                Operation::new(
                    "cm",
                    vec![
                        page_size.width.into(),
                        0.into(),
                        0.into(),
                        page_size.height.into(),
                        0.into(),
                        0.into(),
                    ],
                ),
                Operation::new("Do", vec![Object::Name(IMAGE_NAME.as_bytes().to_vec())]),
                Operation::new("Q", vec![]),
            ],
        };
        let content_id = doc.add_object(Stream::new(Dictionary::new(), content.encode()?));

        let annot_ids: Vec<Object> = regions
            .iter()
            .map(|region| Object::Reference(link_annotation(&mut doc, region)))
            .collect();

        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![0.into(), 0.into(), page_size.width.into(), page_size.height.into()],
            "Resources" => dictionary! {
                "XObject" => dictionary! { IMAGE_NAME => image_id },
            },
            "Contents" => content_id,
            "Annots" => annot_ids,
        });

        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => vec![page_id.into()],
                "Count" => 1,
            }),
        );

        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        let info_id = doc.add_object(dictionary! {
            "Title" => text_string(title),
            "Producer" => Object::string_literal("certforge"),
        });
        doc.trailer.set("Root", catalog_id);
        doc.trailer.set("Info", info_id);

        let mut bytes = Vec::new();
        doc.save_to(&mut bytes)?;
        Ok(bytes)
    }
}

/// A PDF text string: literal for ASCII, otherwise UTF-16BE with a byte order mark.
fn text_string(text: &str) -> Object {
    if text.is_ascii() {
        return Object::string_literal(text);
    }
    let mut bytes = vec![0xFE, 0xFF];
    bytes.extend(text.encode_utf16().flat_map(u16::to_be_bytes));
    Object::String(bytes, StringFormat::Hexadecimal)
}

/// The raster as an 8-bit DeviceRGB image, Flate-compressed. Alpha is dropped;
/// rendered certificates are opaque.
fn image_xobject(rendered: &RenderedCertificate) -> Result<Stream, ExportFailure> {
    let (width, height) = rendered.image.dimensions();
    let rgb: Vec<u8> = rendered
        .image
        .pixels()
        .flat_map(|p| [p.0[0], p.0[1], p.0[2]])
        .collect();

    let dict = dictionary! {
        "Type" => "XObject",
        "Subtype" => "Image",
        "Width" => width as i64,
        "Height" => height as i64,
        "ColorSpace" => "DeviceRGB",
        "BitsPerComponent" => 8,
    };
    let mut stream = Stream::new(dict, rgb);
    stream.compress()?;
    Ok(stream)
}

fn link_annotation(doc: &mut Document, region: &LinkRegion) -> ObjectId {
    let action = dictionary! {
        "Type" => "Action",
        "S" => "URI",
        "URI" => Object::string_literal(region.target.as_str()),
    };
    let rect: Vec<Object> = region.pdf_rect().iter().map(|v| (*v).into()).collect();
    doc.add_object(dictionary! {
        "Type" => "Annot",
        "Subtype" => "Link",
        "Rect" => rect,
        "Border" => vec![0.into(), 0.into(), 0.into()],
        "A" => action,
    })
}
