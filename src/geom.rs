// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use strict_num::ApproxEqUlps;

/// A 2D size representation.
///
/// Width and height are guaranteed to be positive and finite.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Size {
    width: f64,
    height: f64,
}

impl Size {
    /// Creates a new `Size` from values.
    ///
    /// Returns `None` for non-finite or non-positive values.
    pub fn from_wh(width: f64, height: f64) -> Option<Self> {
        if width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0 {
            Some(Size { width, height })
        } else {
            None
        }
    }

    /// Returns the size width.
    #[inline]
    pub fn width(&self) -> f64 {
        self.width
    }

    /// Returns the size height.
    #[inline]
    pub fn height(&self) -> f64 {
        self.height
    }

    /// Converts the size into a `Rect` at the provided position.
    #[inline]
    pub fn to_rect(&self, x: f64, y: f64) -> Rect {
        Rect::from_xywh(x, y, self.width, self.height)
    }
}

/// A rect representation.
#[allow(missing_docs)]
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    /// Creates a new `Rect` from values.
    #[inline]
    pub fn from_xywh(x: f64, y: f64, width: f64, height: f64) -> Self {
        Rect {
            x,
            y,
            width,
            height,
        }
    }

    /// Returns rect's left edge position.
    #[inline]
    pub fn left(&self) -> f64 {
        self.x
    }

    /// Returns rect's right edge position.
    #[inline]
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Returns rect's top edge position.
    #[inline]
    pub fn top(&self) -> f64 {
        self.y
    }

    /// Returns rect's bottom edge position.
    #[inline]
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Checks that the rect has a valid, non-zero size.
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.width.is_finite()
            && self.height.is_finite()
            && self.width > 0.0
            && self.height > 0.0
    }

    /// Checks that two rects are approximately equal.
    pub fn fuzzy_eq(&self, other: &Rect) -> bool {
        self.x.approx_eq_ulps(&other.x, 4)
            && self.y.approx_eq_ulps(&other.y, 4)
            && self.width.approx_eq_ulps(&other.width, 4)
            && self.height.approx_eq_ulps(&other.height, 4)
    }
}

/// A bounding box accumulator.
///
/// Starts empty and grows point by point. Unlike `Rect` it can represent
/// a zero-area box, which paths made of a single segment produce.
#[derive(Clone, Copy, Debug)]
pub struct BBox {
    minx: f64,
    miny: f64,
    maxx: f64,
    maxy: f64,
}

impl Default for BBox {
    fn default() -> Self {
        BBox {
            minx: f64::MAX,
            miny: f64::MAX,
            maxx: f64::MIN,
            maxy: f64::MIN,
        }
    }
}

impl BBox {
    /// Creates an empty box.
    #[inline]
    pub fn new() -> Self {
        BBox::default()
    }

    /// Expands the box to include a point.
    #[inline]
    pub fn push_point(&mut self, x: f64, y: f64) {
        if x < self.minx {
            self.minx = x;
        }
        if x > self.maxx {
            self.maxx = x;
        }
        if y < self.miny {
            self.miny = y;
        }
        if y > self.maxy {
            self.maxy = y;
        }
    }

    /// Expands the box to include a rect.
    pub fn push_rect(&mut self, rect: Rect) {
        self.push_point(rect.left(), rect.top());
        self.push_point(rect.right(), rect.bottom());
    }

    /// Checks that at least one point was pushed.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.minx > self.maxx || self.miny > self.maxy
    }

    /// Converts the box into a rect.
    ///
    /// Returns `None` when nothing was pushed.
    pub fn to_rect(&self) -> Option<Rect> {
        if self.is_empty() {
            return None;
        }

        Some(Rect::from_xywh(
            self.minx,
            self.miny,
            self.maxx - self.minx,
            self.maxy - self.miny,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_bbox() {
        assert!(BBox::default().to_rect().is_none());
    }

    #[test]
    fn bbox_accumulation() {
        let mut bbox = BBox::default();
        bbox.push_point(10.0, -5.0);
        bbox.push_point(-2.0, 7.0);
        assert_eq!(
            bbox.to_rect(),
            Some(Rect::from_xywh(-2.0, -5.0, 12.0, 12.0))
        );
    }

    #[test]
    fn invalid_size() {
        assert!(Size::from_wh(0.0, 10.0).is_none());
        assert!(Size::from_wh(10.0, f64::NAN).is_none());
    }
}
