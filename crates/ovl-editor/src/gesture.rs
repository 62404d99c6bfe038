//! Pointer gesture geometry.
//!
//! Moves and resizes are computed from the pointer's total displacement
//! since pointer-down, never accumulated per move event, so the result only
//! depends on where the pointer is now.
//!
//! ## Constraints
//!
//! | Gesture | Canvas bounds | Aspect lock | Minimum |
//! |---------|---------------|-------------|---------|
//! | Move    | element stays inside | n/a  | n/a     |
//! | Resize  | moving edges stay inside | kept when locked | 1px |

use ovl_core::CanvasSize;
use ovl_core::kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};

const MIN_SIZE: f64 = 1.0;

/// One of the eight resize handles around a selected element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResizeHandle {
    N,
    S,
    E,
    W,
    NE,
    NW,
    SE,
    SW,
}

impl ResizeHandle {
    pub const ALL: [ResizeHandle; 8] = [
        ResizeHandle::N,
        ResizeHandle::S,
        ResizeHandle::E,
        ResizeHandle::W,
        ResizeHandle::NE,
        ResizeHandle::NW,
        ResizeHandle::SE,
        ResizeHandle::SW,
    ];

    fn north(self) -> bool {
        matches!(self, Self::N | Self::NE | Self::NW)
    }

    fn south(self) -> bool {
        matches!(self, Self::S | Self::SE | Self::SW)
    }

    fn east(self) -> bool {
        matches!(self, Self::E | Self::NE | Self::SE)
    }

    fn west(self) -> bool {
        matches!(self, Self::W | Self::NW | Self::SW)
    }

    fn is_corner(self) -> bool {
        (self.north() || self.south()) && (self.east() || self.west())
    }

    /// Where this handle sits on `rect`.
    pub fn anchor_on(self, rect: Rect) -> Point {
        let x = if self.west() {
            rect.x0
        } else if self.east() {
            rect.x1
        } else {
            rect.center().x
        };
        let y = if self.north() {
            rect.y0
        } else if self.south() {
            rect.y1
        } else {
            rect.center().y
        };
        Point::new(x, y)
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "n" | "top" => Some(Self::N),
            "s" | "bottom" => Some(Self::S),
            "e" | "right" => Some(Self::E),
            "w" | "left" => Some(Self::W),
            "ne" | "topright" => Some(Self::NE),
            "nw" | "topleft" => Some(Self::NW),
            "se" | "bottomright" => Some(Self::SE),
            "sw" | "bottomleft" => Some(Self::SW),
            _ => None,
        }
    }
}

/// New top-left corner for a dragged element.
///
/// The element keeps its size and stays inside the canvas. An element larger
/// than the canvas is pinned to the origin on that axis.
pub fn drag(start: Rect, delta: Vec2, canvas: CanvasSize) -> Point {
    let max_x = (f64::from(canvas.width) - start.width()).max(0.0);
    let max_y = (f64::from(canvas.height) - start.height()).max(0.0);
    Point::new(
        (start.x0 + delta.x).clamp(0.0, max_x),
        (start.y0 + delta.y).clamp(0.0, max_y),
    )
}

/// Resized rectangle for a handle dragged by `delta`.
///
/// The edges opposite the handle stay fixed. With `lock_aspect` the
/// starting width/height ratio is kept; corner handles follow whichever
/// axis changed more.
pub fn resize(
    start: Rect,
    handle: ResizeHandle,
    delta: Vec2,
    lock_aspect: bool,
    canvas: CanvasSize,
) -> Rect {
    let (w0, h0) = (start.width().max(MIN_SIZE), start.height().max(MIN_SIZE));
    let ratio = w0 / h0;

    let mut w = w0;
    let mut h = h0;
    if handle.east() {
        w += delta.x;
    } else if handle.west() {
        w -= delta.x;
    }
    if handle.south() {
        h += delta.y;
    } else if handle.north() {
        h -= delta.y;
    }
    w = w.max(MIN_SIZE);
    h = h.max(MIN_SIZE);

    if lock_aspect {
        let horizontal = handle.east() || handle.west();
        let follow_width = if handle.is_corner() {
            (w / w0 - 1.0).abs() >= (h / h0 - 1.0).abs()
        } else {
            horizontal
        };
        if follow_width {
            h = w / ratio;
        } else {
            w = h * ratio;
        }
    }

    // Room left between the fixed edges and the canvas border
    let cw = f64::from(canvas.width);
    let ch = f64::from(canvas.height);
    let max_w = if handle.west() { start.x1 } else { cw - start.x0 }.max(MIN_SIZE);
    let max_h = if handle.north() { start.y1 } else { ch - start.y0 }.max(MIN_SIZE);

    if lock_aspect {
        if w > max_w {
            w = max_w;
            h = w / ratio;
        }
        if h > max_h {
            h = max_h;
            w = h * ratio;
        }
    } else {
        w = w.min(max_w);
        h = h.min(max_h);
    }
    w = w.max(MIN_SIZE);
    h = h.max(MIN_SIZE);

    let x0 = if handle.west() { start.x1 - w } else { start.x0 };
    let y0 = if handle.north() { start.y1 - h } else { start.y0 };
    Rect::new(x0, y0, x0 + w, y0 + h)
}

#[cfg(test)]
mod tests {
    use super::*;

    const CANVAS: CanvasSize = CanvasSize {
        width: 1920,
        height: 1080,
    };

    fn rect(x: f64, y: f64, w: f64, h: f64) -> Rect {
        Rect::new(x, y, x + w, y + h)
    }

    #[test]
    fn drag_is_clamped_to_canvas() {
        let r = rect(100.0, 100.0, 200.0, 100.0);
        assert_eq!(drag(r, Vec2::new(50.0, 20.0), CANVAS), Point::new(150.0, 120.0));
        assert_eq!(drag(r, Vec2::new(-500.0, -500.0), CANVAS), Point::new(0.0, 0.0));
        assert_eq!(
            drag(r, Vec2::new(5000.0, 5000.0), CANVAS),
            Point::new(1720.0, 980.0)
        );
    }

    #[test]
    fn east_handle_only_changes_width() {
        let r = resize(rect(10.0, 10.0, 100.0, 50.0), ResizeHandle::E, Vec2::new(40.0, 99.0), false, CANVAS);
        assert_eq!(r, rect(10.0, 10.0, 140.0, 50.0));
    }

    #[test]
    fn west_handle_keeps_right_edge() {
        let r = resize(rect(100.0, 10.0, 100.0, 50.0), ResizeHandle::W, Vec2::new(-30.0, 0.0), false, CANVAS);
        assert_eq!(r, rect(70.0, 10.0, 130.0, 50.0));
    }

    #[test]
    fn locked_corner_keeps_ratio() {
        let r = resize(rect(0.0, 0.0, 200.0, 100.0), ResizeHandle::SE, Vec2::new(200.0, 10.0), true, CANVAS);
        assert_eq!(r.width(), 400.0);
        assert_eq!(r.height(), 200.0);
    }

    #[test]
    fn locked_edge_scales_other_axis() {
        let r = resize(rect(0.0, 0.0, 100.0, 100.0), ResizeHandle::S, Vec2::new(0.0, 50.0), true, CANVAS);
        assert_eq!((r.width(), r.height()), (150.0, 150.0));
    }

    #[test]
    fn minimum_size_is_one_pixel() {
        let r = resize(rect(0.0, 0.0, 100.0, 100.0), ResizeHandle::NW, Vec2::new(500.0, 500.0), false, CANVAS);
        assert_eq!((r.width(), r.height()), (1.0, 1.0));
        assert_eq!((r.x1, r.y1), (100.0, 100.0));
    }

    #[test]
    fn resize_stops_at_canvas_edge() {
        let r = resize(rect(1800.0, 0.0, 100.0, 100.0), ResizeHandle::E, Vec2::new(500.0, 0.0), false, CANVAS);
        assert_eq!(r.x1, 1920.0);

        let r = resize(rect(1800.0, 0.0, 100.0, 100.0), ResizeHandle::SE, Vec2::new(500.0, 500.0), true, CANVAS);
        assert_eq!((r.width(), r.height()), (120.0, 120.0));
    }

    #[test]
    fn handle_names_parse() {
        for h in ResizeHandle::ALL {
            let name = serde_json::to_value(h).unwrap();
            assert_eq!(ResizeHandle::parse(name.as_str().unwrap()), Some(h));
        }
        assert_eq!(ResizeHandle::parse("bottomRight"), Some(ResizeHandle::SE));
    }
}
