//! Element model for overlay layouts.
//!
//! An element is one placed object on the stage: a webcam placeholder, a
//! shape, a text block, or an image. Geometry and opacity are shared by every
//! kind; everything else lives on the kind's own attribute struct so a text
//! element never carries a fill and a shape never carries a font.
//!
//! The JSON form is a flat object with a `type` tag and camelCase keys, which
//! is also how layouts saved by earlier versions of the editor look (those
//! used `box` and `webcam` as tags; both are accepted as aliases).

use crate::error::{ModelError, finite, non_negative};
use crate::id::ElementId;
use kurbo::{Point, Rect};
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

// ─── Colors ──────────────────────────────────────────────────────────────

/// RGBA color. Stored as 4 × f32 [0.0, 1.0].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

/// Helper to parse a single hex digit.
fn hex_val(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'a'..=b'f' => Some(c - b'a' + 10),
        b'A'..=b'F' => Some(c - b'A' + 10),
        _ => None,
    }
}

impl Color {
    pub const WHITE: Color = Color::rgba(1.0, 1.0, 1.0, 1.0);
    pub const BLACK: Color = Color::rgba(0.0, 0.0, 0.0, 1.0);

    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Parse a hex color string: `#RGB`, `#RGBA`, `#RRGGBB`, `#RRGGBBAA`.
    /// The string may optionally start with `#`.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim();
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        let bytes = hex.as_bytes();

        let short = |i: usize| hex_val(bytes[i]).map(|v| f32::from(v * 17) / 255.0);
        let long = |i: usize| {
            let hi = hex_val(bytes[i])?;
            let lo = hex_val(bytes[i + 1])?;
            Some(f32::from(hi << 4 | lo) / 255.0)
        };

        match bytes.len() {
            3 => Some(Self::rgba(short(0)?, short(1)?, short(2)?, 1.0)),
            4 => Some(Self::rgba(short(0)?, short(1)?, short(2)?, short(3)?)),
            6 => Some(Self::rgba(long(0)?, long(2)?, long(4)?, 1.0)),
            8 => Some(Self::rgba(long(0)?, long(2)?, long(4)?, long(6)?)),
            _ => None,
        }
    }

    pub fn parse(s: &str) -> Result<Self, ModelError> {
        Self::from_hex(s).ok_or_else(|| ModelError::InvalidColor(s.to_string()))
    }

    fn channels(&self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a].map(|c| (c.clamp(0.0, 1.0) * 255.0).round() as u8)
    }

    /// Emit as `#RRGGBB`, or `#RRGGBBAA` when not fully opaque.
    pub fn to_hex(&self) -> String {
        let [r, g, b, a] = self.channels();
        if a == 255 {
            format!("#{r:02X}{g:02X}{b:02X}")
        } else {
            format!("#{r:02X}{g:02X}{b:02X}{a:02X}")
        }
    }

    /// CSS/SVG color value: hex when opaque, `rgba()` otherwise.
    pub fn to_css(&self) -> String {
        let [r, g, b, a] = self.channels();
        if a == 255 {
            format!("#{r:02X}{g:02X}{b:02X}")
        } else {
            let alpha = (f64::from(self.a) * 100.0).round() / 100.0;
            format!("rgba({r},{g},{b},{alpha})")
        }
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Color::from_hex(&s).ok_or_else(|| de::Error::custom(format!("invalid color `{s}`")))
    }
}

// ─── Angle ───────────────────────────────────────────────────────────────

/// A gradient direction in CSS degrees. Serialized as `"90deg"`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Angle(pub f64);

impl Angle {
    pub const RIGHT: Angle = Angle(90.0);

    /// Accepts `"45deg"`, `"45"`, or `" 45 deg "`.
    pub fn parse(s: &str) -> Result<Self, ModelError> {
        let trimmed = s.trim();
        let number = trimmed.strip_suffix("deg").unwrap_or(trimmed).trim();
        number
            .parse::<f64>()
            .ok()
            .filter(|deg| deg.is_finite())
            .map(Angle)
            .ok_or_else(|| ModelError::InvalidAngle(s.to_string()))
    }
}

impl Default for Angle {
    fn default() -> Self {
        Self::RIGHT
    }
}

impl fmt::Display for Angle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}deg", self.0)
    }
}

impl Serialize for Angle {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Angle {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct AngleVisitor;

        impl Visitor<'_> for AngleVisitor {
            type Value = Angle;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("an angle such as \"90deg\" or 90")
            }

            fn visit_f64<E: de::Error>(self, v: f64) -> Result<Angle, E> {
                Ok(Angle(v))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Angle, E> {
                Ok(Angle(v as f64))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Angle, E> {
                Ok(Angle(v as f64))
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Angle, E> {
                Angle::parse(v).map_err(E::custom)
            }
        }

        deserializer.deserialize_any(AngleVisitor)
    }
}

// ─── Dimension ───────────────────────────────────────────────────────────

/// Width or height of an element.
///
/// `Auto` marks an image whose natural size has not been resolved yet; the
/// host replaces it once the image has loaded.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Dimension {
    Px(f64),
    Auto,
}

impl Dimension {
    pub fn px(self) -> Option<f64> {
        match self {
            Dimension::Px(v) => Some(v),
            Dimension::Auto => None,
        }
    }

    pub fn is_auto(self) -> bool {
        matches!(self, Dimension::Auto)
    }
}

impl From<f64> for Dimension {
    fn from(v: f64) -> Self {
        Dimension::Px(v)
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dimension::Px(v) => write!(f, "{v}px"),
            Dimension::Auto => f.write_str("auto"),
        }
    }
}

impl Serialize for Dimension {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Dimension::Px(v) => serializer.serialize_f64(*v),
            Dimension::Auto => serializer.serialize_str("auto"),
        }
    }
}

impl<'de> Deserialize<'de> for Dimension {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct DimensionVisitor;

        impl Visitor<'_> for DimensionVisitor {
            type Value = Dimension;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a number of pixels or \"auto\"")
            }

            fn visit_f64<E: de::Error>(self, v: f64) -> Result<Dimension, E> {
                Ok(Dimension::Px(v))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Dimension, E> {
                Ok(Dimension::Px(v as f64))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Dimension, E> {
                Ok(Dimension::Px(v as f64))
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Dimension, E> {
                let v = v.trim();
                if v == "auto" {
                    return Ok(Dimension::Auto);
                }
                // Older layouts stored resized sizes as "320px".
                v.strip_suffix("px")
                    .unwrap_or(v)
                    .parse::<f64>()
                    .map(Dimension::Px)
                    .map_err(|_| E::custom(format!("invalid dimension `{v}`")))
            }
        }

        deserializer.deserialize_any(DimensionVisitor)
    }
}

// ─── Subtypes ────────────────────────────────────────────────────────────

/// Border treatment of a webcam placeholder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CameraStyle {
    #[default]
    Simple,
    Neon,
    #[serde(alias = "windowed")]
    Windows,
    Pastel,
}

/// Outline of a shape element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    #[default]
    Rectangle,
    Circle,
    Triangle,
    Star,
    Heart,
}

/// How a shape's background is painted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FillKind {
    #[default]
    Solid,
    Gradient,
    Transparent,
}

impl CameraStyle {
    pub fn parse(s: &str) -> Result<Self, ModelError> {
        match s {
            "simple" => Ok(Self::Simple),
            "neon" => Ok(Self::Neon),
            "windows" | "windowed" => Ok(Self::Windows),
            "pastel" => Ok(Self::Pastel),
            _ => Err(ModelError::UnknownSubtype {
                kind: "camera",
                value: s.to_string(),
            }),
        }
    }
}

impl ShapeKind {
    pub fn parse(s: &str) -> Result<Self, ModelError> {
        match s {
            "rectangle" => Ok(Self::Rectangle),
            "circle" => Ok(Self::Circle),
            "triangle" => Ok(Self::Triangle),
            "star" => Ok(Self::Star),
            "heart" => Ok(Self::Heart),
            _ => Err(ModelError::UnknownSubtype {
                kind: "shape",
                value: s.to_string(),
            }),
        }
    }
}

impl FillKind {
    pub fn parse(s: &str) -> Result<Self, ModelError> {
        match s {
            "solid" => Ok(Self::Solid),
            "gradient" => Ok(Self::Gradient),
            "transparent" => Ok(Self::Transparent),
            _ => Err(ModelError::InvalidValue {
                key: "bgType",
                expected: "solid, gradient, or transparent",
            }),
        }
    }
}

// ─── Kind attributes ─────────────────────────────────────────────────────

pub const DEFAULT_FONT_FAMILY: &str = "'Roboto', sans-serif";
pub const DEFAULT_SHAPE_FILL: Color = Color::rgba(59.0 / 255.0, 130.0 / 255.0, 246.0 / 255.0, 1.0);
pub const DEFAULT_CAMERA_BORDER: Color = Color::rgba(0.0, 1.0, 0.0, 1.0);

fn default_camera_border() -> Color {
    DEFAULT_CAMERA_BORDER
}

fn default_shape_fill() -> Color {
    DEFAULT_SHAPE_FILL
}

fn default_white() -> Color {
    Color::WHITE
}

fn default_font_family() -> String {
    DEFAULT_FONT_FAMILY.to_string()
}

fn default_font_size() -> f64 {
    80.0
}

fn default_opacity() -> f64 {
    1.0
}

fn is_false(b: &bool) -> bool {
    !*b
}

fn is_zero(v: &f64) -> bool {
    *v == 0.0
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CameraAttrs {
    #[serde(default)]
    pub subtype: CameraStyle,
    #[serde(default = "default_camera_border")]
    pub border_color: Color,
    #[serde(default)]
    pub border_width: f64,
    #[serde(default)]
    pub border_radius: f64,
    /// Keep the 16:9 (or whatever) ratio while resizing.
    #[serde(default, rename = "aspectRatio")]
    pub lock_aspect: bool,
    /// Title shown in the `windows` style's title bar.
    #[serde(default)]
    pub window_title: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShapeAttrs {
    #[serde(default)]
    pub subtype: ShapeKind,
    #[serde(default, rename = "bgType")]
    pub fill: FillKind,
    #[serde(default = "default_shape_fill")]
    pub bg: Color,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bg_start: Option<Color>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bg_end: Option<Color>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gradient_dir: Option<Angle>,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub border_width: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border_color: Option<Color>,
    #[serde(default)]
    pub border_radius: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextAttrs {
    #[serde(default)]
    pub content: String,
    #[serde(default = "default_font_family")]
    pub font_family: String,
    #[serde(default = "default_font_size")]
    pub font_size: f64,
    #[serde(default = "default_white")]
    pub color: Color,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub stroke_width: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke_color: Option<Color>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub text_gradient: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color_start: Option<Color>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color_end: Option<Color>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gradient_dir: Option<Angle>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub neon: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub shadow: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageAttrs {
    /// Data URL or remote URL of the picture.
    pub src: String,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub border_radius: f64,
}

/// The closed set of element kinds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ElementKind {
    #[serde(alias = "webcam")]
    Camera(CameraAttrs),
    #[serde(alias = "box")]
    Shape(ShapeAttrs),
    Text(TextAttrs),
    Image(ImageAttrs),
}

impl ElementKind {
    pub fn name(&self) -> &'static str {
        match self {
            ElementKind::Camera(_) => "camera",
            ElementKind::Shape(_) => "shape",
            ElementKind::Text(_) => "text",
            ElementKind::Image(_) => "image",
        }
    }
}

// ─── Element ─────────────────────────────────────────────────────────────

/// One placed object on the stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Element {
    pub id: ElementId,
    pub x: f64,
    pub y: f64,
    pub width: Dimension,
    pub height: Dimension,
    #[serde(default = "default_opacity")]
    pub opacity: f64,
    #[serde(flatten)]
    pub kind: ElementKind,
}

impl Element {
    pub fn new(id: ElementId, x: f64, y: f64, width: f64, height: f64, kind: ElementKind) -> Self {
        Self {
            id,
            x,
            y,
            width: Dimension::Px(width),
            height: Dimension::Px(height),
            opacity: 1.0,
            kind,
        }
    }

    /// Webcam placeholder with the editor's stock green border.
    pub fn camera(id: ElementId, style: CameraStyle) -> Self {
        Self::new(
            id,
            50.0,
            50.0,
            480.0,
            270.0,
            ElementKind::Camera(CameraAttrs {
                subtype: style,
                border_color: DEFAULT_CAMERA_BORDER,
                border_width: 5.0,
                border_radius: 0.0,
                lock_aspect: true,
                window_title: "Webcam".to_string(),
            }),
        )
    }

    pub fn text(id: ElementId) -> Self {
        Self::new(
            id,
            100.0,
            100.0,
            300.0,
            120.0,
            ElementKind::Text(TextAttrs {
                content: "TEXTO".to_string(),
                font_family: DEFAULT_FONT_FAMILY.to_string(),
                font_size: 80.0,
                color: Color::WHITE,
                stroke_width: 0.0,
                stroke_color: None,
                text_gradient: false,
                color_start: None,
                color_end: None,
                gradient_dir: None,
                neon: false,
                shadow: true,
            }),
        )
    }

    pub fn shape(id: ElementId, kind: ShapeKind) -> Self {
        Self::new(
            id,
            150.0,
            150.0,
            150.0,
            150.0,
            ElementKind::Shape(ShapeAttrs {
                subtype: kind,
                fill: FillKind::Solid,
                bg: DEFAULT_SHAPE_FILL,
                bg_start: None,
                bg_end: None,
                gradient_dir: None,
                border_width: 0.0,
                border_color: None,
                border_radius: 0.0,
            }),
        )
    }

    /// Image with its height pending until the host reports the natural size.
    pub fn image(id: ElementId, src: impl Into<String>) -> Self {
        Self {
            id,
            x: 200.0,
            y: 200.0,
            width: Dimension::Px(300.0),
            height: Dimension::Auto,
            opacity: 1.0,
            kind: ElementKind::Image(ImageAttrs {
                src: src.into(),
                border_radius: 0.0,
            }),
        }
    }

    pub fn kind_name(&self) -> &'static str {
        self.kind.name()
    }

    pub fn as_text(&self) -> Option<&TextAttrs> {
        match &self.kind {
            ElementKind::Text(t) => Some(t),
            _ => None,
        }
    }

    /// Pixel size with `auto` resolved: a missing side copies the other one.
    pub fn resolved_size(&self) -> (f64, f64) {
        match (self.width, self.height) {
            (Dimension::Px(w), Dimension::Px(h)) => (w, h),
            (Dimension::Px(w), Dimension::Auto) => (w, w),
            (Dimension::Auto, Dimension::Px(h)) => (h, h),
            (Dimension::Auto, Dimension::Auto) => (0.0, 0.0),
        }
    }

    pub fn bounds(&self) -> Rect {
        let (w, h) = self.resolved_size();
        Rect::new(self.x, self.y, self.x + w, self.y + h)
    }

    pub fn contains(&self, point: Point) -> bool {
        let b = self.bounds();
        point.x >= b.x0 && point.x <= b.x1 && point.y >= b.y0 && point.y <= b.y1
    }

    /// Whether interactive resizing keeps the current width/height ratio.
    pub fn locks_aspect_ratio(&self) -> bool {
        match &self.kind {
            ElementKind::Camera(c) => c.lock_aspect,
            ElementKind::Shape(s) => matches!(
                s.subtype,
                ShapeKind::Circle | ShapeKind::Star | ShapeKind::Heart
            ),
            ElementKind::Text(_) => true,
            ElementKind::Image(_) => false,
        }
    }

    /// Clamp opacity into `[0, 1]`. NaN is left for `validate` to reject.
    pub fn clamp_opacity(&mut self) {
        if self.opacity.is_finite() {
            self.opacity = self.opacity.clamp(0.0, 1.0);
        }
    }

    /// Check every invariant an element must hold inside a scene.
    pub fn validate(&self) -> Result<(), ModelError> {
        finite("x", self.x)?;
        finite("y", self.y)?;
        for (field, dim) in [("width", self.width), ("height", self.height)] {
            match dim {
                Dimension::Px(v) => {
                    non_negative(field, v)?;
                }
                Dimension::Auto if !matches!(self.kind, ElementKind::Image(_)) => {
                    return Err(ModelError::AutoNotAllowed);
                }
                Dimension::Auto => {}
            }
        }
        let opacity = finite("opacity", self.opacity)?;
        if !(0.0..=1.0).contains(&opacity) {
            return Err(ModelError::InvalidValue {
                key: "opacity",
                expected: "a number between 0 and 1",
            });
        }

        match &self.kind {
            ElementKind::Camera(c) => {
                non_negative("borderWidth", c.border_width)?;
                non_negative("borderRadius", c.border_radius)?;
            }
            ElementKind::Shape(s) => {
                non_negative("borderWidth", s.border_width)?;
                non_negative("borderRadius", s.border_radius)?;
                if let Some(angle) = s.gradient_dir {
                    finite("gradientDir", angle.0)?;
                }
            }
            ElementKind::Text(t) => {
                if t.font_family.trim().is_empty() {
                    return Err(ModelError::EmptyFontFamily);
                }
                let size = finite("fontSize", t.font_size)?;
                if size <= 0.0 {
                    return Err(ModelError::FontSize(size));
                }
                non_negative("strokeWidth", t.stroke_width)?;
                if let Some(angle) = t.gradient_dir {
                    finite("gradientDir", angle.0)?;
                }
            }
            ElementKind::Image(i) => {
                non_negative("borderRadius", i.border_radius)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn hex_roundtrip() {
        let c = Color::from_hex("#3b82f6").unwrap();
        assert_eq!(c.to_hex(), "#3B82F6");
        assert_eq!(Color::from_hex("fff").unwrap(), Color::WHITE);
        assert_eq!(Color::from_hex("#00FF0080").unwrap().to_hex(), "#00FF0080");
        assert!(Color::from_hex("#12345").is_none());
        assert!(Color::from_hex("#zzz").is_none());
    }

    #[test]
    fn css_color_uses_rgba_for_translucent() {
        let c = Color::rgba(1.0, 1.0, 1.0, 0.1);
        assert_eq!(c.to_css(), "rgba(255,255,255,0.1)");
    }

    #[test]
    fn angle_parses_css_degrees() {
        assert_eq!(Angle::parse("45deg").unwrap(), Angle(45.0));
        assert_eq!(Angle::parse("180").unwrap(), Angle(180.0));
        assert!(Angle::parse("left").is_err());
        assert_eq!(Angle(90.0).to_string(), "90deg");
    }

    #[test]
    fn dimension_accepts_auto_and_px_strings() {
        let d: Dimension = serde_json::from_str("\"auto\"").unwrap();
        assert_eq!(d, Dimension::Auto);
        let d: Dimension = serde_json::from_str("\"320px\"").unwrap();
        assert_eq!(d, Dimension::Px(320.0));
        let d: Dimension = serde_json::from_str("42").unwrap();
        assert_eq!(d, Dimension::Px(42.0));
    }

    #[test]
    fn legacy_webcam_tag_loads_as_camera() {
        let json = r##"{"id":1,"type":"webcam","subtype":"neon","x":50,"y":50,"width":480,"height":270,
            "borderColor":"#00FF00","borderWidth":5,"aspectRatio":true,"windowTitle":"Webcam","borderRadius":0}"##;
        let el: Element = serde_json::from_str(json).unwrap();
        match &el.kind {
            ElementKind::Camera(c) => {
                assert_eq!(c.subtype, CameraStyle::Neon);
                assert!(c.lock_aspect);
                assert_eq!(c.border_width, 5.0);
            }
            other => panic!("expected camera, got {other:?}"),
        }
        assert_eq!(el.opacity, 1.0);
        assert!(el.validate().is_ok());
    }

    #[test]
    fn legacy_box_with_gradient_loads_as_shape() {
        let json = r##"{"id":2,"type":"box","subtype":"star","x":150,"y":150,"width":150,"height":150,
            "bg":"#3b82f6","bgType":"gradient","bgStart":"#ff0000","gradientDir":"45deg","opacity":0.5}"##;
        let el: Element = serde_json::from_str(json).unwrap();
        match &el.kind {
            ElementKind::Shape(s) => {
                assert_eq!(s.subtype, ShapeKind::Star);
                assert_eq!(s.fill, FillKind::Gradient);
                assert_eq!(s.gradient_dir, Some(Angle(45.0)));
                assert_eq!(s.bg_start, Color::from_hex("#ff0000"));
            }
            other => panic!("expected shape, got {other:?}"),
        }
        assert!(el.locks_aspect_ratio());
    }

    #[test]
    fn serialized_element_uses_new_tags() {
        let el = Element::shape(ElementId::from_raw(7), ShapeKind::Circle);
        let value = serde_json::to_value(&el).unwrap();
        assert_eq!(value["type"], "shape");
        assert_eq!(value["subtype"], "circle");
        assert_eq!(value["bgType"], "solid");
        assert_eq!(value["id"], 7);
    }

    #[test]
    fn image_defaults_to_auto_height() {
        let el = Element::image(ElementId::from_raw(3), "data:image/png;base64,AAAA");
        assert_eq!(el.height, Dimension::Auto);
        assert_eq!(el.resolved_size(), (300.0, 300.0));
        assert!(el.validate().is_ok());
    }

    #[test]
    fn validate_rejects_bad_geometry() {
        let mut el = Element::shape(ElementId::from_raw(4), ShapeKind::Rectangle);
        el.x = f64::NAN;
        assert!(matches!(el.validate(), Err(ModelError::NonFinite { field: "x", .. })));

        let mut el = Element::shape(ElementId::from_raw(4), ShapeKind::Rectangle);
        el.width = Dimension::Px(f64::INFINITY);
        assert!(el.validate().is_err());

        let mut el = Element::shape(ElementId::from_raw(4), ShapeKind::Rectangle);
        el.height = Dimension::Auto;
        assert_eq!(el.validate(), Err(ModelError::AutoNotAllowed));
    }

    #[test]
    fn validate_rejects_bad_text() {
        let mut el = Element::text(ElementId::from_raw(5));
        if let ElementKind::Text(t) = &mut el.kind {
            t.font_family = "  ".into();
        }
        assert_eq!(el.validate(), Err(ModelError::EmptyFontFamily));

        let mut el = Element::text(ElementId::from_raw(5));
        if let ElementKind::Text(t) = &mut el.kind {
            t.font_size = 0.0;
        }
        assert_eq!(el.validate(), Err(ModelError::FontSize(0.0)));
    }

    #[test]
    fn opacity_is_clamped() {
        let mut el = Element::text(ElementId::from_raw(6));
        el.opacity = 3.0;
        el.clamp_opacity();
        assert_eq!(el.opacity, 1.0);
        el.opacity = -1.0;
        el.clamp_opacity();
        assert_eq!(el.opacity, 0.0);
    }
}
