//! Scene → SVG.
//!
//! Draws every element from its `StyleDescriptor` at the scene's native
//! canvas size. The same document feeds the raster capture and the
//! browser's exported-image preview.

use crate::escape_xml;
use ovl_core::kurbo::Rect;
use ovl_core::style::{
    Border, CornerRadius, Glow, Outline, Paint, StyleDescriptor, TextPaint, TextShadow,
};
use ovl_core::{Angle, Color, Element, ElementId, Scene, render_attributes_for};
use std::fmt::Write;

const SELECTION_COLOR: &str = "#3B82F6";
const PLACEHOLDER_WASH: &str = "rgba(17,24,39,0.2)";
const PLACEHOLDER_ICON: &str = "rgba(255,255,255,0.5)";

/// Editor-only decorations to draw on top of the scene.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderOptions {
    /// Draws a selection outline around this element.
    pub selected: Option<ElementId>,
    /// Draws the camera icon inside webcam placeholders.
    pub placeholders: bool,
}

impl RenderOptions {
    /// Live canvas: selection outline and placeholder icons.
    pub fn editor(selected: Option<ElementId>) -> Self {
        Self {
            selected,
            placeholders: true,
        }
    }

    /// Exported image: the scene only.
    pub fn export() -> Self {
        Self::default()
    }
}

/// Render `scene` to a standalone SVG document.
pub fn render_svg(scene: &Scene, options: &RenderOptions) -> String {
    let (w, h) = (scene.canvas_size.width, scene.canvas_size.height);
    let mut defs = Defs::default();
    let mut body = String::new();

    for element in &scene.elements {
        render_element(&mut body, &mut defs, element, options);
    }

    if let Some(id) = options.selected
        && let Some(element) = scene.find(id)
    {
        let b = element.bounds();
        let _ = writeln!(
            body,
            "  <rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" fill=\"none\" stroke=\"{SELECTION_COLOR}\" stroke-width=\"2\" stroke-dasharray=\"6 4\" />",
            b.x0,
            b.y0,
            b.width(),
            b.height()
        );
    }

    let mut svg = String::new();
    let _ = writeln!(
        svg,
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w}\" height=\"{h}\" viewBox=\"0 0 {w} {h}\">"
    );
    if !defs.out.is_empty() {
        svg.push_str("<defs>\n");
        svg.push_str(&defs.out);
        svg.push_str("</defs>\n");
    }
    svg.push_str(&body);
    svg.push_str("</svg>");
    svg
}

/// Accumulates gradients and filters with unique ids.
#[derive(Default)]
struct Defs {
    out: String,
    next: usize,
}

impl Defs {
    fn id(&mut self, prefix: &str) -> String {
        self.next += 1;
        format!("{prefix}{}", self.next)
    }

    /// CSS gradient angle → SVG objectBoundingBox vector.
    fn linear_gradient(&mut self, angle: Angle, from: Color, to: Color) -> String {
        let id = self.id("grad");
        let rad = angle.0.to_radians();
        let (dx, dy) = (rad.sin() * 0.5, -rad.cos() * 0.5);
        let _ = writeln!(
            self.out,
            "  <linearGradient id=\"{id}\" x1=\"{}\" y1=\"{}\" x2=\"{}\" y2=\"{}\"><stop offset=\"0\" stop-color=\"{}\" /><stop offset=\"1\" stop-color=\"{}\" /></linearGradient>",
            0.5 - dx,
            0.5 - dy,
            0.5 + dx,
            0.5 + dy,
            from.to_css(),
            to.to_css()
        );
        id
    }

    fn glow(&mut self, glow: &Glow) -> String {
        let id = self.id("glow");
        let color = glow.color.to_css();
        let _ = writeln!(
            self.out,
            "  <filter id=\"{id}\" x=\"-50%\" y=\"-50%\" width=\"200%\" height=\"200%\">"
        );
        for (i, r) in glow.radii.iter().enumerate() {
            let _ = writeln!(
                self.out,
                "    <feDropShadow in=\"SourceGraphic\" dx=\"0\" dy=\"0\" stdDeviation=\"{}\" flood-color=\"{color}\" result=\"s{i}\" />",
                r / 2.0
            );
        }
        self.out.push_str("    <feMerge>");
        for i in 0..glow.radii.len() {
            let _ = write!(self.out, "<feMergeNode in=\"s{i}\" />");
        }
        self.out.push_str("<feMergeNode in=\"SourceGraphic\" /></feMerge>\n  </filter>\n");
        id
    }

    fn paint(&mut self, paint: &Paint) -> String {
        match paint {
            Paint::Transparent => "none".to_string(),
            Paint::Solid(c) => c.to_css(),
            Paint::LinearGradient { angle, from, to } => {
                let id = self.linear_gradient(*angle, *from, *to);
                format!("url(#{id})")
            }
        }
    }
}

/// Opening of the tag outlining `rect`, without attributes or closing.
fn outline_tag(outline: Outline, radius: CornerRadius, rect: Rect) -> String {
    if let Some(path) = outline.path(rect) {
        return format!("<path d=\"{}\"", path.to_svg());
    }
    match radius {
        CornerRadius::Full => {
            let c = rect.center();
            format!(
                "<ellipse cx=\"{}\" cy=\"{}\" rx=\"{}\" ry=\"{}\"",
                c.x,
                c.y,
                rect.width() / 2.0,
                rect.height() / 2.0
            )
        }
        CornerRadius::Px(r) => format!(
            "<rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" rx=\"{r}\" ry=\"{r}\"",
            rect.x0,
            rect.y0,
            rect.width(),
            rect.height()
        ),
    }
}

fn render_element(out: &mut String, defs: &mut Defs, element: &Element, options: &RenderOptions) {
    let style = render_attributes_for(element);
    let b = element.bounds();

    let mut group = String::from("<g");
    if style.opacity < 1.0 {
        let _ = write!(group, " opacity=\"{}\"", style.opacity);
    }
    if let Some(glow) = &style.glow {
        let id = defs.glow(glow);
        let _ = write!(group, " filter=\"url(#{id})\"");
    }
    out.push_str("  ");
    out.push_str(&group);
    out.push_str(">\n");

    match &style.text {
        Some(text) => render_text(out, defs, text, b),
        None => render_box(out, defs, &style, b, options),
    }

    out.push_str("  </g>\n");
}

fn render_box(
    out: &mut String,
    defs: &mut Defs,
    style: &StyleDescriptor,
    b: Rect,
    options: &RenderOptions,
) {
    let fill = defs.paint(&style.background);
    if fill != "none" {
        let tag = outline_tag(style.outline, style.radius, b);
        let _ = writeln!(out, "    {tag} fill=\"{fill}\" />");
    }

    if let Some(image) = &style.image {
        let _ = writeln!(
            out,
            "    <image href=\"{}\" x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" preserveAspectRatio=\"xMidYMid meet\" />",
            escape_xml(&image.src),
            b.x0,
            b.y0,
            b.width(),
            b.height()
        );
    }

    let content = match &style.chrome {
        Some(chrome) => {
            let bar = Rect::new(b.x0, b.y0, b.x1, (b.y0 + chrome.bar_height).min(b.y1));
            let _ = writeln!(
                out,
                "    <rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" fill=\"{}\" />",
                bar.x0,
                bar.y0,
                bar.width(),
                bar.height(),
                chrome.bar_color.to_css()
            );
            let _ = writeln!(
                out,
                "    <text x=\"{}\" y=\"{}\" font-size=\"12\" font-weight=\"bold\" fill=\"#FFFFFF\">{}</text>",
                bar.x0 + 8.0,
                bar.y0 + bar.height() / 2.0 + 4.0,
                escape_xml(&chrome.title)
            );
            Rect::new(b.x0, bar.y1, b.x1, b.y1)
        }
        None => b,
    };

    if options.placeholders && style.placeholder_icon {
        render_placeholder(out, content);
    }

    if let Some(border) = style.border {
        render_border(out, style, border, b);
    }
}

/// CSS borders sit inside the box; SVG strokes are centered on the path.
fn render_border(out: &mut String, style: &StyleDescriptor, border: Border, b: Rect) {
    if border.width <= 0.0 {
        return;
    }
    let half = border.width / 2.0;
    let inset = b.inset(-half);
    if inset.width() <= 0.0 || inset.height() <= 0.0 {
        return;
    }
    let radius = match style.radius {
        CornerRadius::Px(r) => CornerRadius::Px((r - half).max(0.0)),
        full => full,
    };
    let tag = outline_tag(style.outline, radius, inset);
    let dash = if border.dashed {
        format!(" stroke-dasharray=\"{} {}\"", border.width * 2.0, border.width * 2.0)
    } else {
        String::new()
    };
    let _ = writeln!(
        out,
        "    {tag} fill=\"none\" stroke=\"{}\" stroke-width=\"{}\"{dash} />",
        border.color.to_css(),
        border.width
    );
}

fn render_placeholder(out: &mut String, area: Rect) {
    let _ = writeln!(
        out,
        "    <rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" fill=\"{PLACEHOLDER_WASH}\" />",
        area.x0,
        area.y0,
        area.width(),
        area.height()
    );
    let c = area.center();
    // 32px camera glyph: body plus lens flap
    let _ = writeln!(
        out,
        "    <rect x=\"{}\" y=\"{}\" width=\"22\" height=\"18\" rx=\"3\" fill=\"{PLACEHOLDER_ICON}\" />",
        c.x - 16.0,
        c.y - 9.0
    );
    let _ = writeln!(
        out,
        "    <path d=\"M{} {}L{} {}L{} {}Z\" fill=\"{PLACEHOLDER_ICON}\" />",
        c.x + 8.0,
        c.y,
        c.x + 16.0,
        c.y - 7.0,
        c.x + 16.0,
        c.y + 7.0
    );
}

fn render_text(out: &mut String, defs: &mut Defs, text: &TextPaint, b: Rect) {
    // Centered on both axes, like the editor's flex box
    let center = b.center();
    let (x, y) = (center.x, center.y);
    let weight = if text.bold { " font-weight=\"bold\"" } else { "" };
    let font = format!(
        "font-family=\"{}\" font-size=\"{}\"{weight} text-anchor=\"middle\" dominant-baseline=\"central\"",
        escape_xml(&text.font_family),
        text.font_size
    );
    let content = escape_xml(&text.content);

    let mut filter = String::new();
    match &text.shadow {
        TextShadow::None => {}
        TextShadow::Drop => {
            let _ = writeln!(
                out,
                "    <text x=\"{}\" y=\"{}\" {font} fill=\"#000000\" xml:space=\"preserve\">{content}</text>",
                x + 3.0,
                y + 3.0
            );
        }
        TextShadow::Neon(glow) => {
            let id = defs.glow(glow);
            filter = format!(" filter=\"url(#{id})\"");
        }
    }

    let fill = defs.paint(&text.fill);
    let stroke = match text.stroke {
        Some((width, color)) => format!(
            " stroke=\"{}\" stroke-width=\"{width}\" paint-order=\"stroke\"",
            color.to_css()
        ),
        None => String::new(),
    };
    let _ = writeln!(
        out,
        "    <text x=\"{x}\" y=\"{y}\" {font} fill=\"{fill}\"{stroke}{filter} xml:space=\"preserve\">{content}</text>"
    );
}
