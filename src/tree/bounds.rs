// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Aggregate bounds over an imported tree.

use std::collections::BTreeMap;

use crate::geom::{BBox, Rect};
use crate::tree::ImportedElement;
use crate::Transform;

/// Computes the union bounds of all visible, non-definition elements.
pub fn aggregate_bounds(elements: &[ImportedElement]) -> Option<Rect> {
    let mut bbox = BBox::new();
    for element in elements {
        if element.is_hidden() || element.is_definition() {
            continue;
        }

        if let Some(rect) = element_bounds(element) {
            bbox.push_rect(rect);
        }
    }

    bbox.to_rect()
}

/// Computes a single element's bounds.
///
/// When the element preserves a transform, all four corners of its local
/// bounds are mapped through the matrix before min/max accumulation.
/// Axis-aligned bounds do not commute with rotation.
pub fn element_bounds(element: &ImportedElement) -> Option<Rect> {
    match element {
        ImportedElement::Path(e) => {
            let rect = e.data.bbox()?;
            Some(apply_transform(rect, e.transform))
        }
        ImportedElement::Group(g) => {
            let mut bbox = BBox::new();
            for child in &g.children {
                if let Some(rect) = element_bounds(child) {
                    bbox.push_rect(rect);
                }
            }
            bbox.to_rect()
        }
        ImportedElement::Shape(e) => {
            let rect = shape_bounds(&e.kind, &e.attributes)?;
            Some(apply_transform(rect, e.transform))
        }
        ImportedElement::Text(e) => {
            let rect = text_bounds(&e.text, &e.attributes)?;
            Some(apply_transform(rect, e.transform))
        }
        ImportedElement::Image(e) => {
            let rect = viewport_bounds(&e.attributes)?;
            Some(apply_transform(rect, e.transform))
        }
        ImportedElement::ForeignObject(e) => {
            let rect = viewport_bounds(&e.attributes)?;
            Some(apply_transform(rect, e.transform))
        }
        ImportedElement::SymbolInstance(e) => {
            let rect = viewport_bounds(&e.attributes)?;
            Some(apply_transform(rect, e.transform))
        }
        ImportedElement::Use(e) => {
            let rect = Rect::from_xywh(0.0, 0.0, e.width?, e.height?);
            Some(apply_transform(rect, e.transform))
        }
        ImportedElement::EmbeddedSvg(e) => {
            let rect = viewport_bounds(&e.attributes)?;
            Some(apply_transform(rect, e.transform))
        }
    }
}

fn apply_transform(rect: Rect, ts: Option<Transform>) -> Rect {
    let ts = match ts {
        Some(v) => v,
        None => return rect,
    };

    let mut bbox = BBox::new();
    for (x, y) in [
        (rect.left(), rect.top()),
        (rect.right(), rect.top()),
        (rect.right(), rect.bottom()),
        (rect.left(), rect.bottom()),
    ] {
        let (tx, ty) = ts.apply(x, y);
        bbox.push_point(tx, ty);
    }

    // The input rect has four finite corners, so this cannot be empty.
    bbox.to_rect().unwrap_or(rect)
}

fn attr_num(attributes: &BTreeMap<String, String>, name: &str) -> Option<f64> {
    let value = attributes.get(name)?;
    let n = value.trim().trim_end_matches("px").parse::<f64>().ok()?;
    if n.is_finite() {
        Some(n)
    } else {
        None
    }
}

fn shape_bounds(kind: &str, attributes: &BTreeMap<String, String>) -> Option<Rect> {
    match kind {
        "rect" | "image" => viewport_bounds(attributes),
        "circle" => {
            let cx = attr_num(attributes, "cx").unwrap_or(0.0);
            let cy = attr_num(attributes, "cy").unwrap_or(0.0);
            let r = attr_num(attributes, "r")?;
            Some(Rect::from_xywh(cx - r, cy - r, r * 2.0, r * 2.0))
        }
        "ellipse" => {
            let cx = attr_num(attributes, "cx").unwrap_or(0.0);
            let cy = attr_num(attributes, "cy").unwrap_or(0.0);
            let rx = attr_num(attributes, "rx")?;
            let ry = attr_num(attributes, "ry")?;
            Some(Rect::from_xywh(cx - rx, cy - ry, rx * 2.0, ry * 2.0))
        }
        "line" => {
            let mut bbox = BBox::new();
            bbox.push_point(
                attr_num(attributes, "x1").unwrap_or(0.0),
                attr_num(attributes, "y1").unwrap_or(0.0),
            );
            bbox.push_point(
                attr_num(attributes, "x2").unwrap_or(0.0),
                attr_num(attributes, "y2").unwrap_or(0.0),
            );
            bbox.to_rect()
        }
        "polyline" | "polygon" => {
            let points = attributes.get("points")?;
            let mut bbox = BBox::new();
            let mut iter = svgtypes::NumberListParser::from(points.as_str()).flatten();
            while let (Some(x), Some(y)) = (iter.next(), iter.next()) {
                bbox.push_point(x, y);
            }
            bbox.to_rect()
        }
        _ => None,
    }
}

fn viewport_bounds(attributes: &BTreeMap<String, String>) -> Option<Rect> {
    let x = attr_num(attributes, "x").unwrap_or(0.0);
    let y = attr_num(attributes, "y").unwrap_or(0.0);
    let width = attr_num(attributes, "width")?;
    let height = attr_num(attributes, "height")?;
    Some(Rect::from_xywh(x, y, width, height))
}

// A coarse approximation. Real text metrics need shaping and font
// access, which the importer deliberately avoids.
fn text_bounds(text: &str, attributes: &BTreeMap<String, String>) -> Option<Rect> {
    let x = attr_num(attributes, "x").unwrap_or(0.0);
    let y = attr_num(attributes, "y").unwrap_or(0.0);
    let font_size = attr_num(attributes, "font-size").unwrap_or(16.0);

    let chars = text.chars().count();
    if chars == 0 {
        return None;
    }

    let width = chars as f64 * font_size * 0.6;
    Some(Rect::from_xywh(x, y - font_size * 0.8, width, font_size))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pathdata::PathData;
    use crate::tree::{Path, Style};

    #[test]
    fn rotated_path_bounds_use_mapped_corners() {
        let mut data = PathData::new();
        data.push_move_to(0.0, 0.0);
        data.push_line_to(10.0, 0.0);
        data.push_line_to(10.0, 10.0);
        data.push_line_to(0.0, 10.0);
        data.push_close_path();

        let element = ImportedElement::Path(Box::new(Path {
            source_id: None,
            data,
            style: Style::default(),
            transform: Some(Transform::new_rotate(90.0)),
            hidden: false,
            is_definition: false,
            text_path: None,
        }));

        let bounds = element_bounds(&element).unwrap();
        assert!((bounds.left() - (-10.0)).abs() < 1e-9);
        assert!((bounds.right() - 0.0).abs() < 1e-9);
        assert!((bounds.top() - 0.0).abs() < 1e-9);
        assert!((bounds.bottom() - 10.0).abs() < 1e-9);
    }

    #[test]
    fn definitions_are_excluded_from_aggregate_bounds() {
        let mut data = PathData::new();
        data.push_move_to(100.0, 100.0);
        data.push_line_to(200.0, 100.0);

        let def = ImportedElement::Path(Box::new(Path {
            source_id: Some("hidden".to_string()),
            data,
            style: Style::default(),
            transform: None,
            hidden: true,
            is_definition: true,
            text_path: None,
        }));

        assert!(aggregate_bounds(&[def]).is_none());
    }

    #[test]
    fn circle_shape_bounds() {
        let mut attributes = BTreeMap::new();
        attributes.insert("cx".to_string(), "5".to_string());
        attributes.insert("cy".to_string(), "5".to_string());
        attributes.insert("r".to_string(), "10".to_string());

        let rect = shape_bounds("circle", &attributes).unwrap();
        assert_eq!(rect.left(), -5.0);
        assert_eq!(rect.right(), 15.0);
    }
}
