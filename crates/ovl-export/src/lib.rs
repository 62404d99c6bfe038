//! Overlay export: SVG, PNG and static HTML.
//!
//! The SVG renderer is the common ground. The raster path feeds it to
//! resvg (feature `raster`), the browser host can rasterize the same
//! document itself.

pub mod engine;
pub mod error;
pub mod fonts;
pub mod markup;
#[cfg(feature = "raster")]
pub mod raster;
pub mod svg;

pub use engine::{ExportConfig, ExportEngine, MarkupDocument, RasterImage};
pub use error::{ExportError, FontError};
pub use fonts::{FontBundle, FontFace, FontSource, LoadedFace, parse_font_faces, prepare_font_bundle};
pub use markup::render_html;
#[cfg(feature = "raster")]
pub use raster::ResvgCapture;
pub use svg::{RenderOptions, render_svg};

use ovl_core::CanvasSize;

/// Turns an export SVG into encoded PNG bytes.
pub trait RasterCapture {
    fn capture(
        &self,
        svg: &str,
        size: CanvasSize,
        fonts: &FontBundle,
    ) -> Result<Vec<u8>, ExportError>;
}

/// Escape text for XML/HTML content and attribute values.
pub fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_markup() {
        assert_eq!(
            escape_xml(r#"<a href="x">Tom & 'Jerry'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; &apos;Jerry&apos;&lt;/a&gt;"
        );
    }
}
