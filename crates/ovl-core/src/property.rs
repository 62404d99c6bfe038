//! Typed property edits.
//!
//! The properties panel edits one attribute at a time by key (`"fontSize"`,
//! `"bg"`, ...). `Property` is the typed form of such an edit; `parse` turns
//! the host's key/value pair into one, and `apply` writes it onto an element
//! only if the result still validates.

use crate::error::{ModelError, finite, non_negative};
use crate::model::{
    Angle, CameraStyle, Color, Dimension, Element, ElementKind, FillKind, ShapeKind,
};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq)]
pub enum Property {
    X(f64),
    Y(f64),
    Width(f64),
    Height(f64),
    Opacity(f64),

    // Text
    Content(String),
    FontFamily(String),
    FontSize(f64),
    StrokeWidth(f64),
    StrokeColor(Color),
    TextGradient(bool),
    ColorStart(Color),
    ColorEnd(Color),
    Color(Color),
    Neon(bool),
    Shadow(bool),

    // Shape
    Background(Color),
    FillKind(FillKind),
    BackgroundStart(Color),
    BackgroundEnd(Color),

    // Shared by shape and text gradients
    GradientDir(Angle),

    // Camera and shape borders; radius also applies to images
    BorderColor(Color),
    BorderWidth(f64),
    BorderRadius(f64),

    // Camera
    WindowTitle(String),
    LockAspect(bool),

    /// Camera style or shape outline, resolved against the element's kind.
    Subtype(String),

    // Image
    Source(String),
}

fn number(key: &'static str, value: &Value) -> Result<f64, ModelError> {
    match value {
        Value::Number(n) => n.as_f64().ok_or(ModelError::InvalidValue {
            key,
            expected: "a number",
        }),
        // Form inputs hand over strings
        Value::String(s) => s.trim().parse::<f64>().map_err(|_| ModelError::InvalidValue {
            key,
            expected: "a number",
        }),
        _ => Err(ModelError::InvalidValue {
            key,
            expected: "a number",
        }),
    }
}

fn flag(key: &'static str, value: &Value) -> Result<bool, ModelError> {
    value.as_bool().ok_or(ModelError::InvalidValue {
        key,
        expected: "true or false",
    })
}

fn text(key: &'static str, value: &Value) -> Result<String, ModelError> {
    value
        .as_str()
        .map(str::to_string)
        .ok_or(ModelError::InvalidValue {
            key,
            expected: "a string",
        })
}

fn color(key: &'static str, value: &Value) -> Result<Color, ModelError> {
    Color::parse(&text(key, value)?)
}

impl Property {
    /// Build a property from the panel's key and JSON value.
    pub fn parse(key: &str, value: &Value) -> Result<Self, ModelError> {
        let prop = match key {
            "x" => Property::X(number("x", value)?),
            "y" => Property::Y(number("y", value)?),
            "width" => Property::Width(number("width", value)?),
            "height" => Property::Height(number("height", value)?),
            "opacity" => Property::Opacity(number("opacity", value)?),
            "content" => Property::Content(text("content", value)?),
            "fontFamily" => Property::FontFamily(text("fontFamily", value)?),
            "fontSize" => Property::FontSize(number("fontSize", value)?),
            "strokeWidth" => Property::StrokeWidth(number("strokeWidth", value)?),
            "strokeColor" => Property::StrokeColor(color("strokeColor", value)?),
            "textGradient" => Property::TextGradient(flag("textGradient", value)?),
            "colorStart" => Property::ColorStart(color("colorStart", value)?),
            "colorEnd" => Property::ColorEnd(color("colorEnd", value)?),
            "color" => Property::Color(color("color", value)?),
            "neon" => Property::Neon(flag("neon", value)?),
            "shadow" => Property::Shadow(flag("shadow", value)?),
            "bg" => Property::Background(color("bg", value)?),
            "bgType" => Property::FillKind(FillKind::parse(&text("bgType", value)?)?),
            "bgStart" => Property::BackgroundStart(color("bgStart", value)?),
            "bgEnd" => Property::BackgroundEnd(color("bgEnd", value)?),
            "gradientDir" => Property::GradientDir(match value {
                Value::String(s) => Angle::parse(s)?,
                other => Angle(number("gradientDir", other)?),
            }),
            "borderColor" => Property::BorderColor(color("borderColor", value)?),
            "borderWidth" => Property::BorderWidth(number("borderWidth", value)?),
            "borderRadius" => Property::BorderRadius(number("borderRadius", value)?),
            "windowTitle" => Property::WindowTitle(text("windowTitle", value)?),
            "aspectRatio" => Property::LockAspect(flag("aspectRatio", value)?),
            "subtype" => Property::Subtype(text("subtype", value)?),
            "src" => Property::Source(text("src", value)?),
            other => return Err(ModelError::UnknownProperty(other.to_string())),
        };
        Ok(prop)
    }

    /// The panel key this property edits.
    pub fn key(&self) -> &'static str {
        match self {
            Property::X(_) => "x",
            Property::Y(_) => "y",
            Property::Width(_) => "width",
            Property::Height(_) => "height",
            Property::Opacity(_) => "opacity",
            Property::Content(_) => "content",
            Property::FontFamily(_) => "fontFamily",
            Property::FontSize(_) => "fontSize",
            Property::StrokeWidth(_) => "strokeWidth",
            Property::StrokeColor(_) => "strokeColor",
            Property::TextGradient(_) => "textGradient",
            Property::ColorStart(_) => "colorStart",
            Property::ColorEnd(_) => "colorEnd",
            Property::Color(_) => "color",
            Property::Neon(_) => "neon",
            Property::Shadow(_) => "shadow",
            Property::Background(_) => "bg",
            Property::FillKind(_) => "bgType",
            Property::BackgroundStart(_) => "bgStart",
            Property::BackgroundEnd(_) => "bgEnd",
            Property::GradientDir(_) => "gradientDir",
            Property::BorderColor(_) => "borderColor",
            Property::BorderWidth(_) => "borderWidth",
            Property::BorderRadius(_) => "borderRadius",
            Property::WindowTitle(_) => "windowTitle",
            Property::LockAspect(_) => "aspectRatio",
            Property::Subtype(_) => "subtype",
            Property::Source(_) => "src",
        }
    }

    /// Write the property onto `element`.
    ///
    /// The element is left untouched when the value is invalid or the
    /// property does not exist on the element's kind.
    pub fn apply(&self, element: &mut Element) -> Result<(), ModelError> {
        let mut next = element.clone();
        self.write(&mut next)?;
        next.clamp_opacity();
        next.validate()?;
        *element = next;
        Ok(())
    }

    fn write(&self, el: &mut Element) -> Result<(), ModelError> {
        let not_applicable = ModelError::NotApplicable {
            key: self.key(),
            kind: el.kind_name(),
        };

        match (self, &mut el.kind) {
            (Property::X(v), _) => el.x = finite("x", *v)?,
            (Property::Y(v), _) => el.y = finite("y", *v)?,
            (Property::Width(v), _) => el.width = Dimension::Px(non_negative("width", *v)?),
            (Property::Height(v), _) => el.height = Dimension::Px(non_negative("height", *v)?),
            (Property::Opacity(v), _) => el.opacity = finite("opacity", *v)?.clamp(0.0, 1.0),

            (Property::Content(s), ElementKind::Text(t)) => t.content = s.clone(),
            (Property::FontFamily(s), ElementKind::Text(t)) => t.font_family = s.clone(),
            (Property::FontSize(v), ElementKind::Text(t)) => t.font_size = *v,
            (Property::StrokeWidth(v), ElementKind::Text(t)) => t.stroke_width = *v,
            (Property::StrokeColor(c), ElementKind::Text(t)) => t.stroke_color = Some(*c),
            (Property::TextGradient(b), ElementKind::Text(t)) => t.text_gradient = *b,
            (Property::ColorStart(c), ElementKind::Text(t)) => t.color_start = Some(*c),
            (Property::ColorEnd(c), ElementKind::Text(t)) => t.color_end = Some(*c),
            (Property::Color(c), ElementKind::Text(t)) => t.color = *c,
            (Property::Neon(b), ElementKind::Text(t)) => t.neon = *b,
            (Property::Shadow(b), ElementKind::Text(t)) => t.shadow = *b,
            (Property::GradientDir(a), ElementKind::Text(t)) => t.gradient_dir = Some(*a),

            (Property::Background(c), ElementKind::Shape(s)) => s.bg = *c,
            (Property::FillKind(k), ElementKind::Shape(s)) => s.fill = *k,
            (Property::BackgroundStart(c), ElementKind::Shape(s)) => s.bg_start = Some(*c),
            (Property::BackgroundEnd(c), ElementKind::Shape(s)) => s.bg_end = Some(*c),
            (Property::GradientDir(a), ElementKind::Shape(s)) => s.gradient_dir = Some(*a),
            (Property::BorderColor(c), ElementKind::Shape(s)) => s.border_color = Some(*c),
            (Property::BorderWidth(v), ElementKind::Shape(s)) => s.border_width = *v,
            (Property::BorderRadius(v), ElementKind::Shape(s)) => s.border_radius = *v,
            (Property::Subtype(v), ElementKind::Shape(s)) => s.subtype = ShapeKind::parse(v)?,

            (Property::BorderColor(c), ElementKind::Camera(cam)) => cam.border_color = *c,
            (Property::BorderWidth(v), ElementKind::Camera(cam)) => cam.border_width = *v,
            (Property::BorderRadius(v), ElementKind::Camera(cam)) => cam.border_radius = *v,
            (Property::WindowTitle(s), ElementKind::Camera(cam)) => cam.window_title = s.clone(),
            (Property::LockAspect(b), ElementKind::Camera(cam)) => cam.lock_aspect = *b,
            (Property::Subtype(v), ElementKind::Camera(cam)) => {
                cam.subtype = CameraStyle::parse(v)?;
            }

            (Property::BorderRadius(v), ElementKind::Image(img)) => img.border_radius = *v,
            (Property::Source(s), ElementKind::Image(img)) => img.src = s.clone(),

            _ => return Err(not_applicable),
        }
        Ok(())
    }
}
