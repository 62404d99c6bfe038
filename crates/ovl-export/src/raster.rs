//! PNG capture through resvg.

use crate::RasterCapture;
use crate::error::ExportError;
use crate::fonts::FontBundle;
use ovl_core::{CanvasSize, Color};
use std::sync::Arc;

/// Rasterizes at the canvas' native size, one pixel per canvas unit.
#[derive(Debug, Clone, Default)]
pub struct ResvgCapture {
    /// Painted under the scene. Transparent when `None`.
    pub background: Option<Color>,
    /// Fall back to the host's installed fonts for families the bundle lacks.
    pub load_system_fonts: bool,
}

impl ResvgCapture {
    pub fn new(background: Option<Color>, load_system_fonts: bool) -> Self {
        Self {
            background,
            load_system_fonts,
        }
    }

    fn options(&self, fonts: &FontBundle) -> usvg::Options<'static> {
        let mut opt = usvg::Options::default();
        let db = Arc::make_mut(&mut opt.fontdb);
        if self.load_system_fonts {
            db.load_system_fonts();
        }
        for face in &fonts.faces {
            db.load_font_data(face.data.clone());
        }
        log::debug!("font database holds {} faces", db.len());
        opt
    }
}

impl RasterCapture for ResvgCapture {
    fn capture(
        &self,
        svg: &str,
        size: CanvasSize,
        fonts: &FontBundle,
    ) -> Result<Vec<u8>, ExportError> {
        let opt = self.options(fonts);
        let tree = usvg::Tree::from_str(svg, &opt).map_err(|e| ExportError::Svg(e.to_string()))?;

        let mut pixmap = tiny_skia::Pixmap::new(size.width, size.height).ok_or(ExportError::Pixmap {
            width: size.width,
            height: size.height,
        })?;
        if let Some(bg) = self.background
            && let Some(color) = tiny_skia::Color::from_rgba(bg.r, bg.g, bg.b, bg.a)
        {
            pixmap.fill(color);
        }

        resvg::render(&tree, tiny_skia::Transform::default(), &mut pixmap.as_mut());

        pixmap
            .encode_png()
            .map_err(|e| ExportError::Encode(e.to_string()))
    }
}
