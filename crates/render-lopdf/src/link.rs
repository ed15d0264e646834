use certforge_layout::TextExtent;
use certforge_types::Rect;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LinkKind {
    /// The verification URL line.
    Verification,
    /// The footer site URL.
    Site,
}

/// A clickable rectangle on the exported page.
///
/// `rect` is in PDF user space: points, origin at the bottom-left corner,
/// `y` is the lower edge.
#[derive(Debug, Clone, PartialEq)]
pub struct LinkRegion {
    pub kind: LinkKind,
    pub target: String,
    pub rect: Rect,
}

impl LinkRegion {
    /// Maps a painted text extent onto a page scaled by `scale` (points per
    /// raster pixel) with height `page_height`.
    pub fn from_extent(
        kind: LinkKind,
        target: impl Into<String>,
        extent: &TextExtent,
        scale: f32,
        page_height: f32,
    ) -> Self {
        let raster = extent.rect();
        let width = raster.width * scale;
        let height = raster.height * scale;
        Self {
            kind,
            target: target.into(),
            rect: Rect::new(
                raster.x * scale,
                page_height - raster.bottom() * scale,
                width,
                height,
            ),
        }
    }

    /// The region in raster pixels (top-left origin). Exact inverse of
    /// [`LinkRegion::from_extent`].
    pub fn to_raster(&self, scale: f32, page_height: f32) -> Rect {
        let top = page_height - (self.rect.y + self.rect.height);
        Rect::new(
            self.rect.x / scale,
            top / scale,
            self.rect.width / scale,
            self.rect.height / scale,
        )
    }

    /// `[x1 y1 x2 y2]` as written to the annotation's `/Rect`.
    pub fn pdf_rect(&self) -> [f32; 4] {
        [
            self.rect.x,
            self.rect.y,
            self.rect.right(),
            self.rect.bottom(),
        ]
    }
}
