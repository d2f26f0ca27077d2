// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Presentation-attribute resolution.
//!
//! Per property: own presentation attribute (inline `style` and CSS
//! declarations were already merged below it at parse time), then the
//! inherited value threaded through the context, then the fixed SVG
//! default. `fill` defaults to black, `stroke` to none.

use std::str::FromStr;

use strict_num::NormalizedF64;
use svgtypes::Length;

use super::converter::Context;
use super::registry::Registry;
use super::svgtree::{AId, EId, SvgNode};
use super::units;
use crate::tree::{FillRule, Style};

pub(crate) fn resolve_style(node: SvgNode, ctx: &Context, registry: &Registry) -> Style {
    let mut style = Style::default();

    style.fill = match resolve_paint_value(node, ctx, AId::Fill) {
        Some(value) => Some(split_color_alpha(&value, &mut style.fill_opacity)),
        None => Some("black".to_string()),
    };

    style.stroke = match resolve_paint_value(node, ctx, AId::Stroke) {
        Some(value) => Some(split_color_alpha(&value, &mut style.stroke_opacity)),
        None => Some("none".to_string()),
    };

    if let Some(opacity) = resolve_opacity(node, ctx, AId::FillOpacity) {
        style.fill_opacity = NormalizedF64::new_clamped(style.fill_opacity * opacity).get();
    }
    if let Some(opacity) = resolve_opacity(node, ctx, AId::StrokeOpacity) {
        style.stroke_opacity = NormalizedF64::new_clamped(style.stroke_opacity * opacity).get();
    }
    if let Some(opacity) = resolve_opacity(node, ctx, AId::Opacity) {
        style.opacity = opacity;
    }

    if let Some(value) = resolve_value(node, ctx, AId::StrokeWidth) {
        if let Ok(length) = Length::from_str(&value) {
            style.stroke_width =
                units::convert_user_length(length, node, AId::StrokeWidth, ctx.state);
        }
    }

    if let Some(value) = resolve_value(node, ctx, AId::FillRule) {
        if value == "evenodd" {
            style.fill_rule = FillRule::EvenOdd;
        }
    }

    registry.extend_style(node, &mut style);

    style
}

/// Resolves a raw property value: own attribute, then inherited.
fn resolve_value(node: SvgNode, ctx: &Context, aid: AId) -> Option<String> {
    if let Some(value) = node.attribute::<&str>(aid) {
        return Some(value.to_string());
    }

    ctx.inherited.get(&aid).cloned()
}

/// Like [`resolve_value`], with the degenerate-`animate` fallback.
///
/// An unset paint on an element that animates the same property still
/// gets a static approximation, so a non-animating viewer shows
/// something sensible.
fn resolve_paint_value(node: SvgNode, ctx: &Context, aid: AId) -> Option<String> {
    resolve_value(node, ctx, aid).or_else(|| animate_static_fallback(node, aid.to_str()))
}

fn resolve_opacity(node: SvgNode, ctx: &Context, aid: AId) -> Option<f64> {
    let value = resolve_value(node, ctx, aid)?;
    let length = Length::from_str(value.trim()).ok()?;
    let n = match length.unit {
        svgtypes::LengthUnit::Percent => length.number / 100.0,
        svgtypes::LengthUnit::None => length.number,
        _ => return None,
    };

    Some(NormalizedF64::new_clamped(n).get())
}

/// Samples a static value from a same-attribute `animate` child:
/// the first `values` entry, else `from`, else `to`.
pub(crate) fn animate_static_fallback(node: SvgNode, name: &str) -> Option<String> {
    let animate = node
        .children()
        .find(|child| {
            child.tag_name() == Some(EId::Animate)
                && child.attribute::<&str>(AId::AttributeName) == Some(name)
        })?;

    if let Some(values) = animate.attribute::<&str>(AId::Values) {
        let first = values.split(';').next().map(str::trim).unwrap_or("");
        if !first.is_empty() {
            return Some(first.to_string());
        }
    }

    if let Some(from) = animate.attribute::<&str>(AId::From) {
        return Some(from.to_string());
    }

    animate.attribute::<&str>(AId::To).map(str::to_string)
}

/// Splits an alpha-carrying color (`rgba()`, 8- and 4-digit hex) into a
/// plain color and a separate opacity factor.
///
/// Non-color values (`none`, `url(#..)`, keywords with full alpha) pass
/// through unchanged.
pub(crate) fn split_color_alpha(value: &str, opacity: &mut f64) -> String {
    let trimmed = value.trim();
    if let Ok(color) = svgtypes::Color::from_str(trimmed) {
        if color.alpha != 255 {
            *opacity *= f64::from(color.alpha) / 255.0;
            return format!("#{:02x}{:02x}{:02x}", color.red, color.green, color.blue);
        }
    }

    trimmed.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rgba_splits_into_color_and_opacity() {
        let mut opacity = 1.0;
        let color = split_color_alpha("rgba(255, 0, 0, 0.5)", &mut opacity);
        assert_eq!(color, "#ff0000");
        assert!((opacity - 0.5).abs() < 0.01);
    }

    #[test]
    fn short_hex_with_alpha_splits() {
        let mut opacity = 1.0;
        let color = split_color_alpha("#f008", &mut opacity);
        assert_eq!(color, "#ff0000");
        assert!(opacity < 1.0);
    }

    #[test]
    fn opaque_values_pass_through() {
        let mut opacity = 1.0;
        assert_eq!(split_color_alpha("none", &mut opacity), "none");
        assert_eq!(split_color_alpha("url(#g1)", &mut opacity), "url(#g1)");
        assert_eq!(opacity, 1.0);
    }
}
