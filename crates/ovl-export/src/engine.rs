//! Export orchestration.
//!
//! An export runs under the session's activity gate, so it never overlaps
//! a cloud save or load. Capturing reads the active scene with the
//! selection stashed and never records history.

use crate::error::ExportError;
use crate::fonts::FontBundle;
#[cfg(feature = "async")]
use crate::fonts::{FontSource, prepare_font_bundle};
use crate::markup::render_html;
use crate::svg::{RenderOptions, render_svg};
use crate::RasterCapture;
use ovl_core::{Color, Scene};
use ovl_editor::{Activity, EditorSession};
use serde::{Deserialize, Serialize};

/// Export settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Pause before capturing so pending layout and image loads settle.
    pub settle_delay_ms: u64,
    /// Raster background. Transparent when unset.
    pub background: Option<Color>,
    pub png_file_name: String,
    pub html_file_name: String,
    pub load_system_fonts: bool,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            settle_delay_ms: 500,
            background: None,
            png_file_name: "overlay.png".to_string(),
            html_file_name: "overlay.html".to_string(),
            load_system_fonts: true,
        }
    }
}

impl ExportConfig {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// An encoded PNG ready to hand to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterImage {
    pub bytes: Vec<u8>,
    pub file_name: String,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkupDocument {
    pub html: String,
    pub file_name: String,
}

pub struct ExportEngine<C> {
    config: ExportConfig,
    capture: C,
}

#[cfg(feature = "raster")]
impl ExportEngine<crate::raster::ResvgCapture> {
    /// Engine backed by resvg, configured from `config`.
    pub fn new(config: ExportConfig) -> Self {
        let capture = crate::raster::ResvgCapture::new(config.background, config.load_system_fonts);
        Self { config, capture }
    }
}

impl<C: RasterCapture> ExportEngine<C> {
    pub fn with_capture(config: ExportConfig, capture: C) -> Self {
        Self { config, capture }
    }

    pub fn config(&self) -> &ExportConfig {
        &self.config
    }

    pub fn capture(&self) -> &C {
        &self.capture
    }

    /// Wait for the page to settle, then inline its web fonts.
    #[cfg(feature = "async")]
    pub async fn prepare<S: FontSource + ?Sized>(&self, fonts: &S) -> FontBundle {
        if self.config.settle_delay_ms > 0 {
            tokio::time::sleep(std::time::Duration::from_millis(self.config.settle_delay_ms)).await;
        }
        prepare_font_bundle(fonts).await
    }

    /// Capture the active scene as PNG.
    pub fn capture_raster(
        &self,
        session: &mut EditorSession,
        fonts: &FontBundle,
    ) -> Result<RasterImage, ExportError> {
        let _guard = session.gate().try_begin(Activity::Export)?;
        self.capture_locked(session, fonts)
    }

    /// `prepare` then `capture_raster`, holding the gate throughout.
    #[cfg(feature = "async")]
    pub async fn export_png<S: FontSource + ?Sized>(
        &self,
        session: &mut EditorSession,
        fonts: &S,
    ) -> Result<RasterImage, ExportError> {
        let _guard = session.gate().try_begin(Activity::Export)?;
        let bundle = self.prepare(fonts).await;
        self.capture_locked(session, &bundle)
    }

    /// Static page of `scene`, embedding the bundle's stylesheet when given.
    pub fn export_html(&self, scene: &Scene, fonts: Option<&FontBundle>) -> MarkupDocument {
        MarkupDocument {
            html: render_html(scene, fonts.map(|b| b.css.as_str())),
            file_name: self.config.html_file_name.clone(),
        }
    }

    fn capture_locked(
        &self,
        session: &mut EditorSession,
        fonts: &FontBundle,
    ) -> Result<RasterImage, ExportError> {
        let (size, result) = session.with_selection_hidden(|scene| {
            let svg = render_svg(scene, &RenderOptions::export());
            (scene.canvas_size, self.capture.capture(&svg, scene.canvas_size, fonts))
        });

        match result {
            Ok(bytes) => {
                log::info!(
                    "captured {}x{} PNG ({} bytes)",
                    size.width,
                    size.height,
                    bytes.len()
                );
                Ok(RasterImage {
                    bytes,
                    file_name: self.config.png_file_name.clone(),
                    width: size.width,
                    height: size.height,
                })
            }
            Err(e) => {
                log::warn!("export capture failed: {e}");
                Err(e)
            }
        }
    }
}
