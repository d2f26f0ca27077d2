// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use strict_num::ApproxEqUlps;
use svgtypes::Length;

use super::converter::{Context, State};
use super::style;
use super::svgtree::{AId, EId, SvgNode};
use crate::pathdata::PathData;
use crate::tree::{Style, Units};

// Lower radial error than the classic 0.552284749831.
const KAPPA: f64 = 0.551915024494;

pub(crate) fn convert(node: SvgNode, state: &State) -> Option<PathData> {
    match node.tag_name()? {
        EId::Rect => convert_rect(node, state),
        EId::Circle => convert_circle(node, state),
        EId::Ellipse => convert_ellipse(node, state),
        EId::Line => convert_line(node, state),
        EId::Polyline => convert_polyline(node),
        EId::Polygon => convert_polygon(node),
        EId::Path => convert_path(node),
        _ => None,
    }
}

pub(crate) fn convert_path(node: SvgNode) -> Option<PathData> {
    let value: String = match node.attribute::<&str>(AId::D) {
        Some(v) => v.to_string(),
        // No `d`, but maybe it is animated. Sample a static fallback.
        None => style::animate_static_fallback(node, "d")?,
    };

    let mut path = PathData::new();
    for segment in svgtypes::SimplifyingPathParser::from(value.as_str()) {
        let segment = match segment {
            Ok(v) => v,
            // Keep whatever prefix parsed.
            Err(_) => {
                log::warn!(
                    "Path '{}' has an invalid 'd' value. Truncated.",
                    node.element_id()
                );
                break;
            }
        };

        match segment {
            svgtypes::SimplePathSegment::MoveTo { x, y } => {
                path.push_move_to(x, y);
            }
            svgtypes::SimplePathSegment::LineTo { x, y } => {
                path.push_line_to(x, y);
            }
            svgtypes::SimplePathSegment::Quadratic { x1, y1, x, y } => {
                path.push_quad_to(x1, y1, x, y);
            }
            svgtypes::SimplePathSegment::CurveTo {
                x1,
                y1,
                x2,
                y2,
                x,
                y,
            } => {
                path.push_curve_to(x1, y1, x2, y2, x, y);
            }
            svgtypes::SimplePathSegment::ClosePath => {
                path.push_close_path();
            }
        }
    }

    if path.is_empty() {
        return None;
    }

    Some(path)
}

fn convert_rect(node: SvgNode, state: &State) -> Option<PathData> {
    // 'width' and 'height' attributes must be positive and non-zero.
    let width = node.convert_user_length(AId::Width, state, Length::zero());
    let height = node.convert_user_length(AId::Height, state, Length::zero());
    if !(width > 0.0 && width.is_finite()) {
        log::warn!(
            "Rect '{}' has an invalid 'width' value. Skipped.",
            node.element_id()
        );
        return None;
    }
    if !(height > 0.0 && height.is_finite()) {
        log::warn!(
            "Rect '{}' has an invalid 'height' value. Skipped.",
            node.element_id()
        );
        return None;
    }

    let x = node.convert_user_length(AId::X, state, Length::zero());
    let y = node.convert_user_length(AId::Y, state, Length::zero());

    let (mut rx, mut ry) = resolve_rx_ry(node, state);

    // Clamp rx/ry to the half of the width/height.
    //
    // Should be done only after resolving.
    if rx > width / 2.0 {
        rx = width / 2.0;
    }
    if ry > height / 2.0 {
        ry = height / 2.0;
    }

    let path = if rx.approx_eq_ulps(&0.0, 4) {
        PathData::from_rect(crate::geom::Rect::from_xywh(x, y, width, height))
    } else {
        let mut path = PathData::new();
        // Four quadratic corner segments with the control point at the
        // sharp corner.
        path.push_move_to(x + rx, y);

        path.push_line_to(x + width - rx, y);
        path.push_quad_to(x + width, y, x + width, y + ry);

        path.push_line_to(x + width, y + height - ry);
        path.push_quad_to(x + width, y + height, x + width - rx, y + height);

        path.push_line_to(x + rx, y + height);
        path.push_quad_to(x, y + height, x, y + height - ry);

        path.push_line_to(x, y + ry);
        path.push_quad_to(x, y, x + rx, y);

        path.push_close_path();
        path
    };

    Some(path)
}

fn resolve_rx_ry(node: SvgNode, state: &State) -> (f64, f64) {
    let mut rx_opt = node.attribute::<Length>(AId::Rx);
    let mut ry_opt = node.attribute::<Length>(AId::Ry);

    // Remove negative values first.
    if let Some(v) = rx_opt {
        if v.number.is_sign_negative() {
            rx_opt = None;
        }
    }
    if let Some(v) = ry_opt {
        if v.number.is_sign_negative() {
            ry_opt = None;
        }
    }

    // Resolve.
    match (rx_opt, ry_opt) {
        (None, None) => (0.0, 0.0),
        (Some(rx), None) => {
            let rx = super::units::convert_user_length(rx, node, AId::Rx, state);
            (rx, rx)
        }
        (None, Some(ry)) => {
            let ry = super::units::convert_user_length(ry, node, AId::Ry, state);
            (ry, ry)
        }
        (Some(rx), Some(ry)) => {
            let rx = super::units::convert_user_length(rx, node, AId::Rx, state);
            let ry = super::units::convert_user_length(ry, node, AId::Ry, state);
            (rx, ry)
        }
    }
}

fn convert_line(node: SvgNode, state: &State) -> Option<PathData> {
    let x1 = node.convert_user_length(AId::X1, state, Length::zero());
    let y1 = node.convert_user_length(AId::Y1, state, Length::zero());
    let x2 = node.convert_user_length(AId::X2, state, Length::zero());
    let y2 = node.convert_user_length(AId::Y2, state, Length::zero());

    let mut path = PathData::new();
    path.push_move_to(x1, y1);
    path.push_line_to(x2, y2);
    Some(path)
}

fn convert_polyline(node: SvgNode) -> Option<PathData> {
    points_to_path(node, "Polyline")
}

fn convert_polygon(node: SvgNode) -> Option<PathData> {
    let mut path = points_to_path(node, "Polygon")?;
    path.push_close_path();
    Some(path)
}

fn points_to_path(node: SvgNode, eid: &str) -> Option<PathData> {
    use svgtypes::PointsParser;

    let mut path = PathData::new();
    match node.attribute::<&str>(AId::Points) {
        Some(text) => {
            for (x, y) in PointsParser::from(text) {
                if path.is_empty() {
                    path.push_move_to(x, y);
                } else {
                    path.push_line_to(x, y);
                }
            }
        }
        _ => {
            log::warn!(
                "{} '{}' has an invalid 'points' value. Skipped.",
                eid,
                node.element_id()
            );
            return None;
        }
    };

    // 'polyline' and 'polygon' elements must contain at least 2 points.
    if path.len() < 2 {
        log::warn!(
            "{} '{}' has less than 2 points. Skipped.",
            eid,
            node.element_id()
        );
        return None;
    }

    Some(path)
}

fn convert_circle(node: SvgNode, state: &State) -> Option<PathData> {
    let cx = node.convert_user_length(AId::Cx, state, Length::zero());
    let cy = node.convert_user_length(AId::Cy, state, Length::zero());
    let r = node.convert_user_length(AId::R, state, Length::zero());

    if !(r > 0.0 && r.is_finite()) {
        log::warn!(
            "Circle '{}' has an invalid 'r' value. Skipped.",
            node.element_id()
        );
        return None;
    }

    Some(ellipse_to_path(cx, cy, r, r))
}

fn convert_ellipse(node: SvgNode, state: &State) -> Option<PathData> {
    let cx = node.convert_user_length(AId::Cx, state, Length::zero());
    let cy = node.convert_user_length(AId::Cy, state, Length::zero());
    let (rx, ry) = resolve_rx_ry(node, state);

    if !(rx > 0.0 && rx.is_finite()) {
        log::warn!(
            "Ellipse '{}' has an invalid 'rx' value. Skipped.",
            node.element_id()
        );
        return None;
    }

    if !(ry > 0.0 && ry.is_finite()) {
        log::warn!(
            "Ellipse '{}' has an invalid 'ry' value. Skipped.",
            node.element_id()
        );
        return None;
    }

    Some(ellipse_to_path(cx, cy, rx, ry))
}

/// Decomposes an ellipse into four cubic arcs.
fn ellipse_to_path(cx: f64, cy: f64, rx: f64, ry: f64) -> PathData {
    let ox = rx * KAPPA;
    let oy = ry * KAPPA;

    let mut path = PathData::with_capacity(6);
    path.push_move_to(cx + rx, cy);
    path.push_curve_to(cx + rx, cy + oy, cx + ox, cy + ry, cx, cy + ry);
    path.push_curve_to(cx - ox, cy + ry, cx - rx, cy + oy, cx - rx, cy);
    path.push_curve_to(cx - rx, cy - oy, cx - ox, cy - ry, cx, cy - ry);
    path.push_curve_to(cx + ox, cy - ry, cx + rx, cy - oy, cx + rx, cy);
    path.push_close_path();
    path
}

/// Decides whether the accumulated transform must stay a separate
/// matrix instead of being baked into coordinates.
///
/// Preserved when:
/// - the element or a descendant carries `animateTransform`, or an
///   ancestor does — baking would corrupt the animation's reference
///   frame;
/// - resolved fill/stroke references a paint server with explicit
///   `userSpaceOnUse` units — such paint is evaluated in original user
///   space and baking would double-transform it;
/// - a referenced filter declares user-space `filterUnits` or
///   `primitiveUnits`.
pub(crate) fn should_preserve_transform(node: SvgNode, ctx: &Context, style: &Style) -> bool {
    if ctx.has_animated_ancestor {
        return true;
    }

    if node
        .descendants()
        .any(|n| n.tag_name() == Some(EId::AnimateTransform))
    {
        return true;
    }

    if paint_is_user_space(node, style.fill.as_deref())
        || paint_is_user_space(node, style.stroke.as_deref())
    {
        return true;
    }

    if let Some(filter) = node.attribute::<SvgNode>(AId::Filter) {
        if filter.attribute::<Units>(AId::FilterUnits) == Some(Units::UserSpaceOnUse)
            || filter.attribute::<Units>(AId::PrimitiveUnits) == Some(Units::UserSpaceOnUse)
        {
            return true;
        }
    }

    false
}

fn paint_is_user_space(node: SvgNode, paint: Option<&str>) -> bool {
    let paint = match paint {
        Some(v) => v,
        None => return false,
    };

    let iri = match svgtypes::FuncIRI::from_str(paint) {
        Ok(v) => v.0,
        Err(_) => return false,
    };

    let target = match node.document().element_by_id(iri) {
        Some(v) => v,
        None => return false,
    };

    if !target.tag_name().map_or(false, |t| t.is_paint_server()) {
        return false;
    }

    let units_aid = if target.tag_name() == Some(EId::Pattern) {
        AId::PatternUnits
    } else {
        AId::GradientUnits
    };

    // Only an explicit attribute counts. The defaults differ per
    // element kind and are not a preserve signal.
    target.attribute::<Units>(units_aid) == Some(Units::UserSpaceOnUse)
}
