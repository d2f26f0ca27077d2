// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use strict_num::ApproxEqUlps;
use svgtypes::{TransformListParser, TransformListToken};

/// Representation of the SVG [`<transform>`] type.
///
/// A 2x3 affine matrix. No perspective.
///
/// [`<transform>`]: https://www.w3.org/TR/SVG2/coords.html#InterfaceSVGTransform
#[derive(Clone, Copy, PartialEq, Debug)]
#[allow(missing_docs)]
pub struct Transform {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub e: f64,
    pub f: f64,
}

impl Transform {
    /// Constructs a new transform.
    #[inline]
    pub fn new(a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) -> Self {
        Transform { a, b, c, d, e, f }
    }

    /// Constructs a new translate transform.
    #[inline]
    pub fn new_translate(x: f64, y: f64) -> Self {
        Transform::new(1.0, 0.0, 0.0, 1.0, x, y)
    }

    /// Constructs a new scale transform.
    #[inline]
    pub fn new_scale(sx: f64, sy: f64) -> Self {
        Transform::new(sx, 0.0, 0.0, sy, 0.0, 0.0)
    }

    /// Constructs a new rotate transform, in degrees.
    #[inline]
    pub fn new_rotate(angle: f64) -> Self {
        let v = angle.to_radians();
        let a = v.cos();
        let b = v.sin();
        Transform::new(a, b, -b, a, 0.0, 0.0)
    }

    /// Parses a `transform` attribute value.
    ///
    /// The list of transform functions is folded so that the first-written
    /// function ends up outermost, matching SVG semantics. A malformed or
    /// unknown function is skipped with a warning; later valid functions
    /// still apply.
    pub fn from_list_str(text: &str) -> Self {
        let mut ts = Transform::default();
        // Each function ends at its closing paren, so the list can be
        // re-synchronized after a bad entry.
        for part in text.split(')') {
            let part = part.trim_start_matches(|c: char| c.is_whitespace() || c == ',');
            if part.is_empty() {
                continue;
            }

            let func = format!("{})", part);
            for token in TransformListParser::from(func.as_str()) {
                let token = match token {
                    Ok(v) => v,
                    Err(_) => {
                        log::warn!("Failed to parse a transform function: '{}'. Skipped.", func);
                        break;
                    }
                };

                ts.append(&match token {
                    TransformListToken::Matrix { a, b, c, d, e, f } => {
                        Transform::new(a, b, c, d, e, f)
                    }
                    TransformListToken::Translate { tx, ty } => Transform::new_translate(tx, ty),
                    TransformListToken::Scale { sx, sy } => Transform::new_scale(sx, sy),
                    TransformListToken::Rotate { angle } => Transform::new_rotate(angle),
                    TransformListToken::SkewX { angle } => {
                        Transform::new(1.0, 0.0, angle.to_radians().tan(), 1.0, 0.0, 0.0)
                    }
                    TransformListToken::SkewY { angle } => {
                        Transform::new(1.0, angle.to_radians().tan(), 0.0, 1.0, 0.0, 0.0)
                    }
                });
            }
        }

        if ts.is_valid() {
            ts
        } else {
            Transform::default()
        }
    }

    /// Appends transform to the current transform.
    #[inline]
    pub fn append(&mut self, other: &Transform) {
        *self = multiply(self, other);
    }

    /// Prepends transform to the current transform.
    #[inline]
    pub fn prepend(&mut self, other: &Transform) {
        *self = multiply(other, self);
    }

    /// Returns `true` if the transform is the identity, aka `(1 0 0 1 0 0)`.
    pub fn is_identity(&self) -> bool {
        self.a.approx_eq_ulps(&1.0, 4)
            && self.b.approx_eq_ulps(&0.0, 4)
            && self.c.approx_eq_ulps(&0.0, 4)
            && self.d.approx_eq_ulps(&1.0, 4)
            && self.e.approx_eq_ulps(&0.0, 4)
            && self.f.approx_eq_ulps(&0.0, 4)
    }

    /// Checks that all matrix values are finite.
    pub fn is_valid(&self) -> bool {
        self.a.is_finite()
            && self.b.is_finite()
            && self.c.is_finite()
            && self.d.is_finite()
            && self.e.is_finite()
            && self.f.is_finite()
    }

    /// Applies the transform to the selected coordinates.
    #[inline]
    pub fn apply(&self, x: f64, y: f64) -> (f64, f64) {
        (
            self.a * x + self.c * y + self.e,
            self.b * x + self.d * y + self.f,
        )
    }

    /// Applies the transform to the selected coordinates in place.
    #[inline]
    pub fn apply_to(&self, x: &mut f64, y: &mut f64) {
        let tx = *x;
        let ty = *y;
        *x = self.a * tx + self.c * ty + self.e;
        *y = self.b * tx + self.d * ty + self.f;
    }
}

#[inline(never)]
fn multiply(ts1: &Transform, ts2: &Transform) -> Transform {
    Transform {
        a: ts1.a * ts2.a + ts1.c * ts2.b,
        b: ts1.b * ts2.a + ts1.d * ts2.b,
        c: ts1.a * ts2.c + ts1.c * ts2.d,
        d: ts1.b * ts2.c + ts1.d * ts2.d,
        e: ts1.a * ts2.e + ts1.c * ts2.f + ts1.e,
        f: ts1.b * ts2.e + ts1.d * ts2.f + ts1.f,
    }
}

impl Default for Transform {
    #[inline]
    fn default() -> Transform {
        Transform::new(1.0, 0.0, 0.0, 1.0, 0.0, 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: (f64, f64), b: (f64, f64)) -> bool {
        (a.0 - b.0).abs() < 1e-9 && (a.1 - b.1).abs() < 1e-9
    }

    #[test]
    fn first_written_function_is_outermost() {
        let ts = Transform::from_list_str("translate(10,20) scale(2)");
        assert!(approx(ts.apply(0.0, 0.0), (10.0, 20.0)));
        assert!(approx(ts.apply(1.0, 0.0), (12.0, 20.0)));
    }

    #[test]
    fn rotate_about_point() {
        let ts = Transform::from_list_str("rotate(90 10 10)");
        assert!(approx(ts.apply(10.0, 10.0), (10.0, 10.0)));
        assert!(approx(ts.apply(20.0, 10.0), (10.0, 20.0)));
    }

    #[test]
    fn unknown_function_is_skipped() {
        let ts = Transform::from_list_str("translate(5) frobnicate(1,2)");
        assert!(approx(ts.apply(0.0, 0.0), (5.0, 0.0)));
    }

    #[test]
    fn functions_after_a_bad_entry_still_apply() {
        let ts = Transform::from_list_str("scale(2) frobnicate(1) translate(5,0)");
        assert!(approx(ts.apply(0.0, 0.0), (10.0, 0.0)));
    }

    #[test]
    fn comma_separated_functions() {
        let ts = Transform::from_list_str("translate(1,2), translate(3,4)");
        assert!(approx(ts.apply(0.0, 0.0), (4.0, 6.0)));
    }

    #[test]
    fn empty_list_is_identity() {
        assert!(Transform::from_list_str("").is_identity());
    }
}
