//! Integration tests: export through an editor session.

use async_trait::async_trait;
use ovl_core::{CameraStyle, CanvasSize, ShapeKind};
use ovl_editor::{Activity, EditorSession, NewElement};
use ovl_export::{
    ExportConfig, ExportEngine, ExportError, FontBundle, FontError, FontSource, RasterCapture,
};
use pretty_assertions::assert_eq;
use std::cell::RefCell;

/// Capture that records the SVG it was given.
#[derive(Default)]
struct RecordingCapture {
    svgs: RefCell<Vec<String>>,
}

impl RasterCapture for RecordingCapture {
    fn capture(
        &self,
        svg: &str,
        _size: CanvasSize,
        _fonts: &FontBundle,
    ) -> Result<Vec<u8>, ExportError> {
        self.svgs.borrow_mut().push(svg.to_string());
        Ok(b"PNG".to_vec())
    }
}

struct FailingCapture;

impl RasterCapture for FailingCapture {
    fn capture(
        &self,
        _svg: &str,
        _size: CanvasSize,
        _fonts: &FontBundle,
    ) -> Result<Vec<u8>, ExportError> {
        Err(ExportError::Capture("renderer crashed".into()))
    }
}

struct NoFonts;

#[async_trait(?Send)]
impl FontSource for NoFonts {
    fn stylesheet_urls(&self) -> Vec<String> {
        vec!["https://fonts.googleapis.com/css?family=Roboto".into()]
    }

    async fn fetch_text(&self, url: &str) -> Result<String, FontError> {
        Err(FontError::Fetch {
            url: url.to_string(),
            reason: "offline".into(),
        })
    }

    async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, FontError> {
        self.fetch_text(url).await.map(String::into_bytes)
    }
}

fn instant() -> ExportConfig {
    ExportConfig {
        settle_delay_ms: 0,
        ..ExportConfig::default()
    }
}

fn populated_session() -> EditorSession {
    let mut session = EditorSession::default();
    session.add_element(NewElement::Camera {
        subtype: CameraStyle::Neon,
    });
    session.add_element(NewElement::Shape {
        subtype: ShapeKind::Heart,
    });
    session.add_element(NewElement::Text);
    session
}

#[test]
fn capture_hides_selection_and_restores_it() {
    let mut session = populated_session();
    let selected = session.selected();
    assert!(selected.is_some());

    let engine = ExportEngine::with_capture(instant(), RecordingCapture::default());
    let image = engine
        .capture_raster(&mut session, &FontBundle::default())
        .unwrap();

    assert_eq!(image.bytes, b"PNG".to_vec());
    assert_eq!(image.file_name, "overlay.png");
    assert_eq!((image.width, image.height), (1920, 1080));
    assert_eq!(session.selected(), selected);

    let svgs = engine.capture().svgs.borrow();
    assert_eq!(svgs.len(), 1);
    // Neither the selection outline nor the webcam placeholder
    assert!(!svgs[0].contains("stroke-dasharray=\"6 4\""));
    assert!(!svgs[0].contains("rgba(17,24,39,0.2)"));
    assert!(session.gate().is_idle());
}

#[test]
fn failed_capture_leaves_session_untouched() {
    let mut session = populated_session();
    let scene = session.scene().clone();
    let history_len = session.history().len();
    let cursor = session.history().cursor();
    let selected = session.selected();

    let engine = ExportEngine::with_capture(instant(), FailingCapture);
    let err = engine
        .capture_raster(&mut session, &FontBundle::default())
        .unwrap_err();
    assert!(matches!(err, ExportError::Capture(_)));

    assert_eq!(session.scene(), &scene);
    assert_eq!(session.history().len(), history_len);
    assert_eq!(session.history().cursor(), cursor);
    assert_eq!(session.selected(), selected);
    assert!(session.gate().is_idle());
}

#[test]
fn export_refused_while_saving() {
    let mut session = populated_session();
    let gate = session.gate().clone();
    let _save = gate.try_begin(Activity::Save).unwrap();

    let engine = ExportEngine::with_capture(instant(), RecordingCapture::default());
    let err = engine
        .capture_raster(&mut session, &FontBundle::default())
        .unwrap_err();
    assert!(matches!(err, ExportError::Busy(_)));
    assert!(engine.capture().svgs.borrow().is_empty());
}

#[tokio::test]
async fn export_png_renders_native_size() {
    let mut session = populated_session();
    session.set_canvas_size(640, 360).unwrap();
    let before = session.history().len();

    let engine = ExportEngine::new(instant());
    let image = engine.export_png(&mut session, &NoFonts).await.unwrap();

    assert_eq!(&image.bytes[..8], b"\x89PNG\r\n\x1a\n");
    assert_eq!(
        u32::from_be_bytes([image.bytes[16], image.bytes[17], image.bytes[18], image.bytes[19]]),
        640
    );
    assert_eq!(
        u32::from_be_bytes([image.bytes[20], image.bytes[21], image.bytes[22], image.bytes[23]]),
        360
    );
    assert_eq!((image.width, image.height), (640, 360));
    assert_eq!(session.history().len(), before);
    assert!(session.gate().is_idle());
}

#[test]
fn html_export_uses_configured_name() {
    let session = populated_session();
    let engine = ExportEngine::with_capture(instant(), FailingCapture);
    let doc = engine.export_html(session.scene(), None);
    assert_eq!(doc.file_name, "overlay.html");
    assert!(doc.html.starts_with("<!DOCTYPE html><html><body>"));
    assert_eq!(doc.html.matches("position:absolute").count(), 3);
}
