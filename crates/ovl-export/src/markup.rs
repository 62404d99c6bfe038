//! Static HTML export.
//!
//! A plain absolutely-positioned page, one `div` per element, written from
//! the element's own border, background and color fields. This is a
//! reduced-fidelity rendition: gradients, clip outlines, glows, window
//! chrome and images are not reproduced. Use the PNG export for a faithful
//! copy.

use crate::escape_xml;
use ovl_core::{Color, Element, ElementKind, Scene};
use std::fmt::Write;

/// Render `scene` as a standalone HTML page.
///
/// `font_css` is embedded in a `<style>` block when given, so the text
/// keeps its web fonts offline.
pub fn render_html(scene: &Scene, font_css: Option<&str>) -> String {
    let mut html = String::from("<!DOCTYPE html><html>");
    if let Some(css) = font_css.filter(|css| !css.trim().is_empty()) {
        // Only `</style` can break out of a style element
        let _ = write!(html, "<head><style>{}</style></head>", css.replace("</", "<\\/"));
    }
    let _ = write!(
        html,
        "<body><div style=\"position:relative;width:{}px;height:{}px;\">",
        scene.canvas_size.width, scene.canvas_size.height
    );
    for element in &scene.elements {
        render_div(&mut html, element);
    }
    html.push_str("</div></body></html>");
    html
}

fn render_div(html: &mut String, element: &Element) {
    let (w, h) = element.resolved_size();

    let mut css = format!(
        "position:absolute;left:{}px;top:{}px;width:{w}px;height:{h}px;",
        element.x, element.y
    );
    let mut content = String::new();
    match &element.kind {
        ElementKind::Camera(cam) => {
            let _ = write!(css, "border:{}px solid {};", cam.border_width, cam.border_color.to_css());
        }
        ElementKind::Shape(shape) => {
            if shape.border_width > 0.0 {
                let color = shape.border_color.unwrap_or(Color::WHITE);
                let _ = write!(css, "border:{}px solid {};", shape.border_width, color.to_css());
            }
            let _ = write!(css, "background:{};", shape.bg.to_css());
        }
        ElementKind::Text(text) => {
            let _ = write!(css, "color:{};font-size:{}px;", text.color.to_css(), text.font_size);
            content = escape_xml(&text.content);
        }
        ElementKind::Image(_) => {}
    }

    let _ = write!(html, "<div style=\"{}\">{content}</div>", escape_xml(&css));
}

#[cfg(test)]
mod tests {
    use super::*;
    use ovl_core::{CameraStyle, CanvasSize, ElementId, Property, ShapeKind};
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_scene_is_a_sized_container() {
        let scene = Scene::with_canvas(CanvasSize {
            width: 1280,
            height: 720,
        });
        assert_eq!(
            render_html(&scene, None),
            "<!DOCTYPE html><html><body><div style=\"position:relative;width:1280px;height:720px;\"></div></body></html>"
        );
    }

    #[test]
    fn camera_gets_border_only() {
        let mut scene = Scene::new();
        scene
            .elements
            .push(Element::camera(ElementId::from_raw(1), CameraStyle::Simple));
        let html = render_html(&scene, None);
        assert!(html.contains(
            "position:absolute;left:50px;top:50px;width:480px;height:270px;border:5px solid #00FF00;"
        ));
        assert!(!html.contains("background:"));
        assert!(!html.contains("font-size"));
    }

    #[test]
    fn text_is_escaped_with_color_and_size() {
        let mut el = Element::text(ElementId::from_raw(1));
        Property::Content("<b>GG</b>".into()).apply(&mut el).unwrap();
        let mut scene = Scene::new();
        scene.elements.push(el);
        let html = render_html(&scene, None);
        assert!(html.contains("color:#FFFFFF;font-size:80px;\">&lt;b&gt;GG&lt;/b&gt;</div>"));
    }

    #[test]
    fn shape_writes_its_own_fill_and_border() {
        let mut el = Element::shape(ElementId::from_raw(1), ShapeKind::Star);
        Property::FillKind(ovl_core::FillKind::Gradient)
            .apply(&mut el)
            .unwrap();
        Property::BorderWidth(4.0).apply(&mut el).unwrap();
        Property::BorderColor(Color::rgba(1.0, 0.0, 0.0, 1.0))
            .apply(&mut el)
            .unwrap();
        let mut scene = Scene::new();
        scene.elements.push(el);
        let html = render_html(&scene, None);
        assert!(html.contains("border:4px solid #FF0000;background:#3B82F6;"));
        assert!(!html.contains("linear-gradient"));
    }

    #[test]
    fn windows_camera_keeps_its_border_width() {
        let mut el = Element::camera(ElementId::from_raw(1), CameraStyle::Windows);
        Property::BorderWidth(0.0).apply(&mut el).unwrap();
        let mut scene = Scene::new();
        scene.elements.push(el);
        assert!(render_html(&scene, None).contains("border:0px solid #00FF00;"));
    }

    #[test]
    fn gradient_text_uses_its_color_field() {
        let mut el = Element::text(ElementId::from_raw(1));
        Property::TextGradient(true).apply(&mut el).unwrap();
        Property::ColorStart(Color::rgba(1.0, 0.0, 0.0, 1.0))
            .apply(&mut el)
            .unwrap();
        let mut scene = Scene::new();
        scene.elements.push(el);
        assert!(render_html(&scene, None).contains("color:#FFFFFF;font-size:80px;"));
    }

    #[test]
    fn font_css_is_embedded() {
        let html = render_html(&Scene::new(), Some("@font-face{font-family:X}"));
        assert!(html.contains("<head><style>@font-face{font-family:X}</style></head>"));
    }
}
