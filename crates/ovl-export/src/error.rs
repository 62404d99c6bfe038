use ovl_editor::Busy;

/// Errors from rendering or capturing an export.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error(transparent)]
    Busy(#[from] Busy),

    #[error("SVG parsing failed: {0}")]
    Svg(String),

    #[error("cannot allocate a {width}x{height} pixmap")]
    Pixmap { width: u32, height: u32 },

    #[error("PNG encoding failed: {0}")]
    Encode(String),

    /// The capture backend failed for another reason.
    #[error("capture failed: {0}")]
    Capture(String),
}

/// Errors from a `FontSource`.
#[derive(Debug, thiserror::Error)]
pub enum FontError {
    #[error("failed to fetch {url}: {reason}")]
    Fetch { url: String, reason: String },
}
