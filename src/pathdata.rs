// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use kurbo::ParamCurveExtrema;

use crate::geom::{BBox, Rect};
use crate::Transform;

/// A path's absolute segment.
///
/// Unlike the SVG spec, can contain only `M`, `L`, `C` and `Z` segments.
/// All other segments will be converted into this set.
#[allow(missing_docs)]
#[derive(Clone, Copy, PartialEq, Debug)]
pub enum PathSegment {
    MoveTo {
        x: f64,
        y: f64,
    },
    LineTo {
        x: f64,
        y: f64,
    },
    CurveTo {
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
        x: f64,
        y: f64,
    },
    ClosePath,
}

/// An SVG path data container.
///
/// All segments are in absolute coordinates.
#[derive(Clone, Default, PartialEq, Debug)]
pub struct PathData(pub Vec<PathSegment>);

impl PathData {
    /// Creates a new path.
    #[inline]
    pub fn new() -> Self {
        PathData(Vec::new())
    }

    /// Creates a new path with a specified capacity.
    #[inline]
    pub fn with_capacity(capacity: usize) -> Self {
        PathData(Vec::with_capacity(capacity))
    }

    /// Creates a path from a rect.
    pub fn from_rect(rect: Rect) -> Self {
        let mut path = PathData::with_capacity(5);
        path.push_move_to(rect.x, rect.y);
        path.push_line_to(rect.right(), rect.y);
        path.push_line_to(rect.right(), rect.bottom());
        path.push_line_to(rect.x, rect.bottom());
        path.push_close_path();
        path
    }

    /// Pushes a MoveTo segment to the path.
    #[inline]
    pub fn push_move_to(&mut self, x: f64, y: f64) {
        self.0.push(PathSegment::MoveTo { x, y });
    }

    /// Pushes a LineTo segment to the path.
    #[inline]
    pub fn push_line_to(&mut self, x: f64, y: f64) {
        self.0.push(PathSegment::LineTo { x, y });
    }

    /// Pushes a CurveTo segment to the path.
    #[inline]
    pub fn push_curve_to(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, x: f64, y: f64) {
        self.0.push(PathSegment::CurveTo {
            x1,
            y1,
            x2,
            y2,
            x,
            y,
        });
    }

    /// Pushes a QuadTo segment to the path.
    ///
    /// Will be converted into a cubic curve.
    pub fn push_quad_to(&mut self, x1: f64, y1: f64, x: f64, y: f64) {
        let (px, py) = self.last_pos();
        #[inline]
        fn calc(n1: f64, n2: f64) -> f64 {
            (n1 + n2 * 2.0) / 3.0
        }

        self.push_curve_to(
            calc(px, x1),
            calc(py, y1),
            calc(x, x1),
            calc(y, y1),
            x,
            y,
        );
    }

    /// Pushes a ClosePath segment to the path.
    #[inline]
    pub fn push_close_path(&mut self) {
        self.0.push(PathSegment::ClosePath);
    }

    /// Returns the number of segments.
    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Checks that the path is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the segment list.
    #[inline]
    pub fn segments(&self) -> &[PathSegment] {
        &self.0
    }

    fn last_pos(&self) -> (f64, f64) {
        match self.0.last() {
            Some(PathSegment::MoveTo { x, y })
            | Some(PathSegment::LineTo { x, y })
            | Some(PathSegment::CurveTo { x, y, .. }) => (*x, *y),
            _ => (0.0, 0.0),
        }
    }

    /// Calculates the path's bounding box, accounting for curve extrema.
    pub fn bbox(&self) -> Option<Rect> {
        if self.0.is_empty() {
            return None;
        }

        let mut bbox = BBox::default();
        let mut prev_x = 0.0;
        let mut prev_y = 0.0;
        for seg in self.0.iter().cloned() {
            match seg {
                PathSegment::MoveTo { x, y } | PathSegment::LineTo { x, y } => {
                    bbox.push_point(x, y);
                    prev_x = x;
                    prev_y = y;
                }
                PathSegment::CurveTo {
                    x1,
                    y1,
                    x2,
                    y2,
                    x,
                    y,
                } => {
                    let curve = kurbo::CubicBez::new(
                        kurbo::Point::new(prev_x, prev_y),
                        kurbo::Point::new(x1, y1),
                        kurbo::Point::new(x2, y2),
                        kurbo::Point::new(x, y),
                    );
                    let r = curve.bounding_box();
                    bbox.push_point(r.x0, r.y0);
                    bbox.push_point(r.x1, r.y1);
                    prev_x = x;
                    prev_y = y;
                }
                PathSegment::ClosePath => {}
            }
        }

        bbox.to_rect()
    }

    /// Applies the transform to every coordinate of the path,
    /// control points included.
    pub fn transform(&mut self, ts: Transform) {
        for seg in &mut self.0 {
            match seg {
                PathSegment::MoveTo { x, y } | PathSegment::LineTo { x, y } => {
                    ts.apply_to(x, y);
                }
                PathSegment::CurveTo {
                    x1,
                    y1,
                    x2,
                    y2,
                    x,
                    y,
                } => {
                    ts.apply_to(x1, y1);
                    ts.apply_to(x2, y2);
                    ts.apply_to(x, y);
                }
                PathSegment::ClosePath => {}
            }
        }
    }

    /// Scales every coordinate, independently by axis.
    #[inline]
    pub fn scale(&mut self, sx: f64, sy: f64) {
        self.transform(Transform::new_scale(sx, sy));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quad_expands_to_cubic() {
        let mut path = PathData::new();
        path.push_move_to(0.0, 0.0);
        path.push_quad_to(5.0, 10.0, 10.0, 0.0);
        assert!(matches!(path.segments()[1], PathSegment::CurveTo { .. }));
    }

    #[test]
    fn transform_moves_control_points() {
        let mut path = PathData::new();
        path.push_move_to(0.0, 0.0);
        path.push_curve_to(1.0, 0.0, 2.0, 0.0, 3.0, 0.0);
        path.transform(Transform::new_translate(10.0, 0.0));
        match path.segments()[1] {
            PathSegment::CurveTo { x1, x2, x, .. } => {
                assert_eq!((x1, x2, x), (11.0, 12.0, 13.0));
            }
            _ => unreachable!(),
        }
    }

    #[test]
    fn rect_bbox() {
        let path = PathData::from_rect(Rect::from_xywh(1.0, 2.0, 3.0, 4.0));
        assert_eq!(path.bbox(), Some(Rect::from_xywh(1.0, 2.0, 3.0, 4.0)));
    }
}
