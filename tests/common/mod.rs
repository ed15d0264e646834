#![allow(dead_code)]

use async_trait::async_trait;
use certforge::{
    AssetLoader, AssetLocations, CertificateLayout, CertificateRecord, CertificateRenderer,
    CertificateStatus, InMemoryRecordStore, LinkTargets,
};
use certforge_raster::BitmapTypeface;
use certforge_traits::{AssetSource, InMemoryResourceProvider, ResourceError, SharedResourceData};
use certforge_resource::ProviderAssetSource;
use image::{ImageFormat, Rgba, RgbaImage};
use lopdf::Document as LopdfDocument;
use std::io::Cursor;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

pub type TestResult = Result<(), Box<dyn std::error::Error>>;

pub const BRAND_MARK: &str = "brand-mark.png";
pub const SEAL: &str = "seal.png";

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn sample_record() -> CertificateRecord {
    CertificateRecord {
        id: "7f3c2a10-0001-4c1e-9a11-000000000001".into(),
        display_id: "EZZCODE-2024-WD-001".into(),
        holder_name: "Aisha Rahman".into(),
        program_name: "Full-Stack Web Development".into(),
        issue_date: "2024-03-15".into(),
        status: CertificateStatus::Valid,
    }
}

/// The records shipped in `config/certificates.json`.
pub fn seeded_store() -> InMemoryRecordStore {
    InMemoryRecordStore::from_json(include_str!("../../config/certificates.json"))
        .expect("seed file parses")
}

/// A solid square PNG.
pub fn png(size: u32, color: [u8; 4]) -> Vec<u8> {
    let image = RgbaImage::from_pixel(size, size, Rgba(color));
    let mut bytes = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .expect("png encodes");
    bytes
}

/// An in-memory asset source holding both decorative images.
pub fn full_assets() -> InMemoryResourceProvider {
    InMemoryResourceProvider::new()
        .with(BRAND_MARK, png(64, [0x1e, 0x3a, 0x8a, 255]))
        .with(SEAL, png(64, [0xd9, 0x77, 0x06, 255]))
}

pub fn renderer_with(provider: InMemoryResourceProvider) -> CertificateRenderer {
    renderer_with_source(Arc::new(ProviderAssetSource::new(Arc::new(provider))))
}

pub fn renderer_with_source(source: Arc<dyn AssetSource>) -> CertificateRenderer {
    renderer_with_source_and_links(source, LinkTargets::default())
}

pub fn renderer_with_links(
    provider: InMemoryResourceProvider,
    links: LinkTargets,
) -> CertificateRenderer {
    renderer_with_source_and_links(Arc::new(ProviderAssetSource::new(Arc::new(provider))), links)
}

pub fn renderer_with_source_and_links(
    source: Arc<dyn AssetSource>,
    links: LinkTargets,
) -> CertificateRenderer {
    CertificateRenderer::new(
        Arc::new(CertificateLayout::standard()),
        Arc::new(BitmapTypeface::new()),
        AssetLoader::new(source, AssetLocations::new(BRAND_MARK, SEAL)),
        links,
    )
}

/// Fails every fetch and counts attempts.
#[derive(Debug, Default)]
pub struct FailingAssetSource {
    pub attempts: AtomicUsize,
}

impl FailingAssetSource {
    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AssetSource for FailingAssetSource {
    async fn fetch(&self, location: &str) -> Result<SharedResourceData, ResourceError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        Err(ResourceError::LoadFailed {
            path: location.to_string(),
            message: "connection reset".into(),
        })
    }

    fn name(&self) -> &'static str {
        "FailingAssetSource"
    }
}

/// Returns an asset only for the listed locations.
#[derive(Debug)]
pub struct PartialAssetSource {
    pub available: Vec<(&'static str, Vec<u8>)>,
}

#[async_trait]
impl AssetSource for PartialAssetSource {
    async fn fetch(&self, location: &str) -> Result<SharedResourceData, ResourceError> {
        self.available
            .iter()
            .find(|(name, _)| *name == location)
            .map(|(_, bytes)| Arc::new(bytes.clone()))
            .ok_or_else(|| ResourceError::NotFound(location.to_string()))
    }

    fn name(&self) -> &'static str {
        "PartialAssetSource"
    }
}

/// A `/Link` annotation read back from an exported PDF.
#[derive(Debug, Clone)]
pub struct LinkAnnotation {
    pub rect: [f32; 4],
    pub uri: String,
}

/// Wrapper around an exported PDF with helper methods
pub struct ExportedPdf {
    pub bytes: Vec<u8>,
    pub doc: LopdfDocument,
}

impl ExportedPdf {
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self, Box<dyn std::error::Error>> {
        let doc = LopdfDocument::load_mem(&bytes)?;
        Ok(Self { bytes, doc })
    }

    pub fn page_count(&self) -> usize {
        self.doc.get_pages().len()
    }

    fn first_page(&self) -> Result<&lopdf::Dictionary, Box<dyn std::error::Error>> {
        let page_id = *self
            .doc
            .get_pages()
            .values()
            .next()
            .ok_or("document has no pages")?;
        Ok(self.doc.get_object(page_id)?.as_dict()?)
    }

    /// `[x1, y1, x2, y2]` of the first page.
    pub fn media_box(&self) -> Result<[f32; 4], Box<dyn std::error::Error>> {
        let array = self.first_page()?.get(b"MediaBox")?.as_array()?;
        Ok(four_floats(array)?)
    }

    /// Pixel dimensions of the page's image XObject.
    pub fn image_size(&self) -> Result<(i64, i64), Box<dyn std::error::Error>> {
        let resources = self.first_page()?.get(b"Resources")?.as_dict()?;
        let xobjects = resources.get(b"XObject")?.as_dict()?;
        let (_, image_ref) = xobjects.iter().next().ok_or("no image XObject")?;
        let stream = self.doc.get_object(image_ref.as_reference()?)?.as_stream()?;
        Ok((
            stream.dict.get(b"Width")?.as_i64()?,
            stream.dict.get(b"Height")?.as_i64()?,
        ))
    }

    pub fn links(&self) -> Result<Vec<LinkAnnotation>, Box<dyn std::error::Error>> {
        let annots = self.first_page()?.get(b"Annots")?.as_array()?;
        let mut links = Vec::new();
        for annot in annots {
            let dict = self.doc.get_object(annot.as_reference()?)?.as_dict()?;
            if dict.get(b"Subtype")?.as_name()? != b"Link" {
                continue;
            }
            let action = dict.get(b"A")?.as_dict()?;
            links.push(LinkAnnotation {
                rect: four_floats(dict.get(b"Rect")?.as_array()?)?,
                uri: String::from_utf8(action.get(b"URI")?.as_str()?.to_vec())?,
            });
        }
        Ok(links)
    }

    /// Save PDF to a file for manual debugging
    pub fn save_for_debug(&self, name: &str) -> std::io::Result<()> {
        std::fs::write(format!("test_output_{}.pdf", name), &self.bytes)
    }
}

fn four_floats(array: &[lopdf::Object]) -> Result<[f32; 4], lopdf::Error> {
    Ok([
        array[0].as_float()?,
        array[1].as_float()?,
        array[2].as_float()?,
        array[3].as_float()?,
    ])
}
