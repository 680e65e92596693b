// Copyright 2025 the Scopeview Authors
// SPDX-License-Identifier: Apache-2.0

//! Rectangle hit testing helpers

use kurbo::{Point, Rect, Size};

/// Whether any rectangle contains the point.
///
/// Edges are inclusive so a touch exactly on a shared border between two
/// adjacent targets still lands somewhere.
pub fn contains_any(rects: &[Rect], point: Point) -> bool {
    rects.iter().any(|rect| contains_inclusive(*rect, point))
}

/// Inclusive containment test
pub fn contains_inclusive(rect: Rect, point: Point) -> bool {
    point.x >= rect.x0 && point.x <= rect.x1 && point.y >= rect.y0 && point.y <= rect.y1
}

/// Grow `rect` around `anchor` so both sides are at least `min` wide, then
/// clamp it into `within`
pub fn enlarge_to_min(rect: Rect, anchor: Point, min: Size, within: Rect) -> Rect {
    let mut out = rect.abs();
    if out.width() < min.width {
        out.x0 = anchor.x - min.width / 2.0;
        out.x1 = anchor.x + min.width / 2.0;
    }
    if out.height() < min.height {
        out.y0 = anchor.y - min.height / 2.0;
        out.y1 = anchor.y + min.height / 2.0;
    }
    clamp_into(out, within)
}

/// Shift and shrink `rect` so it lies inside `within`
pub fn clamp_into(rect: Rect, within: Rect) -> Rect {
    let within = within.abs();
    let width = rect.width().min(within.width());
    let height = rect.height().min(within.height());
    let x0 = rect.x0.min(within.x1 - width).max(within.x0);
    let y0 = rect.y0.min(within.y1 - height).max(within.y0);
    Rect::new(x0, y0, x0 + width, y0 + height)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn border_points_hit() {
        let rects = [Rect::new(0.0, 0.0, 10.0, 10.0)];
        assert!(contains_any(&rects, Point::new(10.0, 10.0)));
        assert!(!contains_any(&rects, Point::new(10.1, 5.0)));
        assert!(!contains_any(&[], Point::ZERO));
    }

    #[test]
    fn narrow_rect_is_enlarged_around_anchor() {
        let within = Rect::new(0.0, 0.0, 400.0, 400.0);
        let rect = Rect::new(100.0, 0.0, 110.0, 40.0);
        let out = enlarge_to_min(rect, Point::new(105.0, 20.0), Size::new(44.0, 44.0), within);

        assert_eq!(out.width(), 44.0);
        assert_eq!(out.height(), 44.0);
        assert_eq!(out.center().x, 105.0);
    }

    #[test]
    fn enlarged_rect_stays_inside_bounds() {
        let within = Rect::new(0.0, 0.0, 400.0, 400.0);
        let rect = Rect::new(0.0, 0.0, 4.0, 40.0);
        let out = enlarge_to_min(rect, Point::new(2.0, 20.0), Size::new(44.0, 40.0), within);

        assert_eq!(out.x0, 0.0);
        assert_eq!(out.width(), 44.0);
    }

    #[test]
    fn wide_rect_is_left_alone() {
        let within = Rect::new(0.0, 0.0, 400.0, 400.0);
        let rect = Rect::new(50.0, 0.0, 150.0, 40.0);
        let out = enlarge_to_min(rect, Point::new(60.0, 20.0), Size::new(44.0, 40.0), within);
        assert_eq!(out, rect);
    }
}
