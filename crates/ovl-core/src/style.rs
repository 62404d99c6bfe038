//! Element → render attributes.
//!
//! `render_attributes_for` is the single place that decides how an element
//! looks: which background, which border, whether it is clipped to a star,
//! whether its text glows. The browser host turns the descriptor into inline
//! CSS (`to_css`), the exporter turns it into SVG. Neither looks at raw
//! element fields.

use crate::model::{
    Angle, CameraStyle, Color, Element, ElementKind, FillKind, ShapeKind, TextAttrs,
};
use kurbo::{BezPath, Point, Rect};
use std::fmt::Write;

const GRADIENT_START: Color = Color::rgba(59.0 / 255.0, 130.0 / 255.0, 246.0 / 255.0, 1.0);
const GRADIENT_END: Color = Color::rgba(147.0 / 255.0, 51.0 / 255.0, 234.0 / 255.0, 1.0);
const TEXT_GRADIENT_END: Color = Color::rgba(1.0, 0.0, 0.0, 1.0);
const PASTEL_WASH: Color = Color::rgba(1.0, 1.0, 1.0, 0.1);
const WINDOW_BAR_HEIGHT: f64 = 32.0;

/// Fill of a box or of text glyphs.
#[derive(Debug, Clone, PartialEq)]
pub enum Paint {
    Transparent,
    Solid(Color),
    LinearGradient { angle: Angle, from: Color, to: Color },
}

impl Paint {
    pub fn to_css(&self) -> String {
        match self {
            Paint::Transparent => "transparent".to_string(),
            Paint::Solid(c) => c.to_css(),
            Paint::LinearGradient { angle, from, to } => {
                format!("linear-gradient({angle}, {}, {})", from.to_css(), to.to_css())
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Border {
    pub width: f64,
    pub color: Color,
    pub dashed: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CornerRadius {
    Px(f64),
    /// Fully rounded (ellipse inscribed in the box).
    Full,
}

/// Silhouette the box is clipped to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outline {
    Box,
    Triangle,
    Star,
    Heart,
}

const TRIANGLE: &[(f64, f64)] = &[(0.5, 0.0), (0.0, 1.0), (1.0, 1.0)];
const STAR: &[(f64, f64)] = &[
    (0.50, 0.00),
    (0.61, 0.35),
    (0.98, 0.35),
    (0.68, 0.57),
    (0.79, 0.91),
    (0.50, 0.70),
    (0.21, 0.91),
    (0.32, 0.57),
    (0.02, 0.35),
    (0.39, 0.35),
];
/// Coarse heart used where only polygons are available (CSS `clip-path`).
const HEART_POLYGON: &[(f64, f64)] = &[
    (0.50, 0.00),
    (1.00, 0.38),
    (0.82, 1.00),
    (0.50, 0.80),
    (0.18, 1.00),
    (0.00, 0.38),
];

impl Outline {
    /// Polygon in unit box coordinates, for outlines that have one.
    pub fn polygon(self) -> Option<&'static [(f64, f64)]> {
        match self {
            Outline::Box => None,
            Outline::Triangle => Some(TRIANGLE),
            Outline::Star => Some(STAR),
            Outline::Heart => Some(HEART_POLYGON),
        }
    }

    /// Exact outline path fitted to `rect`. `None` for plain boxes.
    pub fn path(self, rect: Rect) -> Option<BezPath> {
        let map = |u: f64, v: f64| Point::new(rect.x0 + u * rect.width(), rect.y0 + v * rect.height());
        match self {
            Outline::Box => None,
            Outline::Heart => {
                // Material heart icon, 24×24 viewbox
                let p = |x: f64, y: f64| map(x / 24.0, y / 24.0);
                let mut path = BezPath::new();
                path.move_to(p(12.0, 21.35));
                path.line_to(p(10.55, 20.03));
                path.curve_to(p(5.4, 15.36), p(2.0, 12.28), p(2.0, 8.5));
                path.curve_to(p(2.0, 5.42), p(4.42, 3.0), p(7.5, 3.0));
                path.curve_to(p(9.24, 3.0), p(10.91, 3.81), p(12.0, 5.09));
                path.curve_to(p(13.09, 3.81), p(14.76, 3.0), p(16.5, 3.0));
                path.curve_to(p(19.58, 3.0), p(22.0, 5.42), p(22.0, 8.5));
                path.curve_to(p(22.0, 12.28), p(18.6, 15.36), p(13.45, 20.04));
                path.line_to(p(12.0, 21.35));
                path.close_path();
                Some(path)
            }
            polygon => {
                let points = polygon.polygon()?;
                let mut path = BezPath::new();
                for (i, &(u, v)) in points.iter().enumerate() {
                    if i == 0 {
                        path.move_to(map(u, v));
                    } else {
                        path.line_to(map(u, v));
                    }
                }
                path.close_path();
                Some(path)
            }
        }
    }

    fn clip_path_css(self) -> Option<String> {
        let points = self.polygon()?;
        let list: Vec<String> = points
            .iter()
            .map(|(u, v)| format!("{}% {}%", (u * 100.0).round(), (v * 100.0).round()))
            .collect();
        Some(format!("polygon({})", list.join(", ")))
    }
}

/// Outer glow around a box or text.
#[derive(Debug, Clone, PartialEq)]
pub struct Glow {
    pub color: Color,
    /// Blur radii, innermost first.
    pub radii: Vec<f64>,
    /// Breathes between a tight and a wide glow.
    pub pulse: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TextShadow {
    None,
    /// Hard 3px offset black shadow.
    Drop,
    Neon(Glow),
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextPaint {
    pub content: String,
    pub font_family: String,
    pub font_size: f64,
    pub fill: Paint,
    pub stroke: Option<(f64, Color)>,
    pub shadow: TextShadow,
    pub line_height: f64,
    pub bold: bool,
}

/// Title bar of the `windows` webcam style.
#[derive(Debug, Clone, PartialEq)]
pub struct WindowChrome {
    pub title: String,
    pub bar_color: Color,
    pub bar_height: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImageFit {
    pub src: String,
}

/// Everything needed to draw one element, independent of the backend.
#[derive(Debug, Clone, PartialEq)]
pub struct StyleDescriptor {
    pub opacity: f64,
    pub background: Paint,
    pub border: Option<Border>,
    pub radius: CornerRadius,
    pub outline: Outline,
    pub glow: Option<Glow>,
    pub chrome: Option<WindowChrome>,
    pub text: Option<TextPaint>,
    pub image: Option<ImageFit>,
    /// Camera icon drawn in the editor only; never exported.
    pub placeholder_icon: bool,
}

impl StyleDescriptor {
    fn plain(opacity: f64) -> Self {
        Self {
            opacity,
            background: Paint::Transparent,
            border: None,
            radius: CornerRadius::Px(0.0),
            outline: Outline::Box,
            glow: None,
            chrome: None,
            text: None,
            image: None,
            placeholder_icon: false,
        }
    }

    /// Inline CSS for the element's content box.
    pub fn to_css(&self) -> String {
        let mut css = String::new();
        let _ = write!(css, "opacity:{};", self.opacity);
        let _ = write!(css, "background:{};", self.background.to_css());
        if let Some(border) = &self.border {
            let kind = if border.dashed { "dashed" } else { "solid" };
            let _ = write!(css, "border:{}px {kind} {};", border.width, border.color.to_css());
        }
        match self.radius {
            CornerRadius::Px(r) => {
                let _ = write!(css, "border-radius:{r}px;");
            }
            CornerRadius::Full => css.push_str("border-radius:50%;"),
        }
        if let Some(clip) = self.outline.clip_path_css() {
            let _ = write!(css, "clip-path:{clip};");
        }
        if let Some(glow) = &self.glow {
            let color = glow.color.to_css();
            let shadows: Vec<String> = glow.radii.iter().map(|r| format!("0 0 {r}px {color}")).collect();
            let _ = write!(css, "box-shadow:{};", shadows.join(", "));
            if glow.pulse {
                let _ = write!(css, "--neon-color:{color};animation:neonPulse 2s infinite alternate;");
            }
        }
        if let Some(text) = &self.text {
            let _ = write!(
                css,
                "display:flex;align-items:center;justify-content:center;font-size:{}px;font-family:{};line-height:{};white-space:nowrap;",
                text.font_size, text.font_family, text.line_height
            );
            if text.bold {
                css.push_str("font-weight:bold;");
            }
            match &text.fill {
                Paint::LinearGradient { .. } => {
                    let _ = write!(
                        css,
                        "background:{};-webkit-background-clip:text;-webkit-text-fill-color:transparent;",
                        text.fill.to_css()
                    );
                }
                other => {
                    let _ = write!(css, "color:{};", other.to_css());
                }
            }
            match &text.stroke {
                Some((w, c)) => {
                    let _ = write!(css, "-webkit-text-stroke:{w}px {};", c.to_css());
                }
                None => css.push_str("-webkit-text-stroke:0px;"),
            }
            match &text.shadow {
                TextShadow::None => {}
                TextShadow::Drop => css.push_str("text-shadow:3px 3px 0px #000000;"),
                TextShadow::Neon(glow) => {
                    let color = glow.color.to_css();
                    let shadows: Vec<String> =
                        glow.radii.iter().map(|r| format!("0 0 {r}px {color}")).collect();
                    let _ = write!(css, "text-shadow:{};", shadows.join(", "));
                }
            }
        }
        if self.image.is_some() {
            css.push_str("object-fit:contain;");
        }
        css
    }
}

fn text_paint(t: &TextAttrs) -> TextPaint {
    let fill = if t.text_gradient {
        Paint::LinearGradient {
            angle: t.gradient_dir.unwrap_or_default(),
            from: t.color_start.unwrap_or(Color::WHITE),
            to: t.color_end.unwrap_or(TEXT_GRADIENT_END),
        }
    } else {
        Paint::Solid(t.color)
    };
    let stroke = (t.stroke_width > 0.0).then(|| (t.stroke_width, t.stroke_color.unwrap_or(Color::BLACK)));
    let shadow = if t.neon {
        TextShadow::Neon(Glow {
            color: t.color,
            radii: vec![10.0, 20.0, 30.0, 40.0],
            pulse: false,
        })
    } else if t.shadow {
        TextShadow::Drop
    } else {
        TextShadow::None
    };
    TextPaint {
        content: t.content.clone(),
        font_family: t.font_family.clone(),
        font_size: t.font_size,
        fill,
        stroke,
        shadow,
        line_height: 1.2,
        bold: true,
    }
}

/// Compute the render attributes of one element.
pub fn render_attributes_for(element: &Element) -> StyleDescriptor {
    let mut style = StyleDescriptor::plain(element.opacity);

    match &element.kind {
        ElementKind::Camera(cam) => {
            style.radius = CornerRadius::Px(cam.border_radius);
            style.placeholder_icon = true;
            let solid = Border {
                width: cam.border_width,
                color: cam.border_color,
                dashed: false,
            };
            match cam.subtype {
                CameraStyle::Simple => style.border = Some(solid),
                CameraStyle::Neon => {
                    style.border = Some(solid);
                    style.glow = Some(Glow {
                        color: cam.border_color,
                        radii: vec![10.0, 20.0],
                        pulse: true,
                    });
                }
                CameraStyle::Windows => {
                    style.border = Some(Border {
                        width: cam.border_width.max(2.0),
                        ..solid
                    });
                    style.chrome = Some(WindowChrome {
                        title: cam.window_title.clone(),
                        bar_color: cam.border_color,
                        bar_height: WINDOW_BAR_HEIGHT,
                    });
                }
                CameraStyle::Pastel => {
                    style.border = Some(Border { dashed: true, ..solid });
                    style.background = Paint::Solid(PASTEL_WASH);
                }
            }
        }
        ElementKind::Shape(shape) => {
            style.background = match shape.fill {
                FillKind::Transparent => Paint::Transparent,
                FillKind::Gradient => Paint::LinearGradient {
                    angle: shape.gradient_dir.unwrap_or_default(),
                    from: shape.bg_start.unwrap_or(GRADIENT_START),
                    to: shape.bg_end.unwrap_or(GRADIENT_END),
                },
                FillKind::Solid => Paint::Solid(shape.bg),
            };
            if shape.border_width > 0.0 {
                style.border = Some(Border {
                    width: shape.border_width,
                    color: shape.border_color.unwrap_or(Color::WHITE),
                    dashed: false,
                });
            }
            match shape.subtype {
                ShapeKind::Rectangle => style.radius = CornerRadius::Px(shape.border_radius),
                ShapeKind::Circle => style.radius = CornerRadius::Full,
                // Clipped outlines cut the CSS border away
                ShapeKind::Triangle => {
                    style.outline = Outline::Triangle;
                    style.border = None;
                }
                ShapeKind::Star => {
                    style.outline = Outline::Star;
                    style.border = None;
                }
                ShapeKind::Heart => {
                    style.outline = Outline::Heart;
                    style.border = None;
                }
            }
        }
        ElementKind::Text(t) => {
            style.text = Some(text_paint(t));
        }
        ElementKind::Image(img) => {
            style.radius = CornerRadius::Px(img.border_radius);
            style.image = Some(ImageFit { src: img.src.clone() });
        }
    }

    log::trace!("style for {} {}: {:?}", element.kind_name(), element.id, style.outline);
    style
}
