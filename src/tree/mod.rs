// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The imported scene-graph representation.
//!
//! Everything in here is build-once, read-once: the importer produces a
//! tree of [`ImportedElement`] values and the caller consumes it to
//! allocate its own document elements.

use std::collections::BTreeMap;

use crate::pathdata::PathData;
use crate::Transform;

pub mod bounds;
pub mod colors;

/// A paint-server/filter coordinate system.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Units {
    /// Evaluated in the coordinate system active at reference time.
    UserSpaceOnUse,
    /// Evaluated relative to the referencing shape's bounding box.
    ObjectBoundingBox,
}

/// A fill rule.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum FillRule {
    #[default]
    NonZero,
    EvenOdd,
}

/// A resolved presentation-style bag.
///
/// `fill`/`stroke` keep the explicit `"none"` keyword as `Some("none")`,
/// distinct from an unset value. After extraction the SVG defaults are
/// already applied: `fill` is black, `stroke` is none.
#[derive(Clone, PartialEq, Debug)]
pub struct Style {
    pub fill: Option<String>,
    pub stroke: Option<String>,
    /// In the 0..=1 range.
    pub fill_opacity: f64,
    /// In the 0..=1 range.
    pub stroke_opacity: f64,
    /// In the 0..=1 range.
    pub opacity: f64,
    pub stroke_width: f64,
    pub fill_rule: FillRule,
    /// Extension-contributed properties. Add-only: extractors cannot
    /// replace core-resolved values.
    pub extra: BTreeMap<String, String>,
}

impl Default for Style {
    fn default() -> Self {
        Style {
            fill: None,
            stroke: None,
            fill_opacity: 1.0,
            stroke_opacity: 1.0,
            opacity: 1.0,
            stroke_width: 1.0,
            fill_rule: FillRule::NonZero,
            extra: BTreeMap::new(),
        }
    }
}

/// A `textPath` payload carried by a path or its proxy group.
#[derive(Clone, PartialEq, Debug)]
pub struct TextPathPayload {
    /// The referenced element id, without the leading `#`.
    pub target: String,
    pub text: String,
    pub attributes: BTreeMap<String, String>,
}

/// A deferred text-on-path request, resolved after the whole tree exists.
#[derive(Clone, Debug)]
pub struct TextPathAttachment {
    pub target_id: String,
    pub payload: TextPathPayload,
}

/// A path element with canonical Move/Line/Cubic/Close geometry.
#[derive(Clone, Debug)]
pub struct Path {
    pub source_id: Option<String>,
    pub data: PathData,
    pub style: Style,
    /// Present only when the transform was preserved. When `None`,
    /// the coordinates are already baked.
    pub transform: Option<Transform>,
    pub hidden: bool,
    pub is_definition: bool,
    pub text_path: Option<TextPathPayload>,
}

/// A group. Mirrors the XML nesting, so no cycles are possible.
#[derive(Clone, Debug)]
pub struct Group {
    pub source_id: Option<String>,
    pub children: Vec<ImportedElement>,
    pub hidden: bool,
    pub is_definition: bool,
    /// Set on invisible proxy groups standing in for a text-on-path.
    pub text_path: Option<TextPathPayload>,
}

/// A shape a plugin recognizer chose to keep native instead of
/// converting to path geometry.
#[derive(Clone, Debug)]
pub struct NativeShape {
    pub source_id: Option<String>,
    /// The source tag name, e.g. `rect`.
    pub kind: String,
    pub attributes: BTreeMap<String, String>,
    pub style: Style,
    pub transform: Option<Transform>,
    pub hidden: bool,
    pub is_definition: bool,
}

/// A text element kept as editable text.
#[derive(Clone, Debug)]
pub struct NativeText {
    pub source_id: Option<String>,
    pub text: String,
    pub attributes: BTreeMap<String, String>,
    pub style: Style,
    pub transform: Option<Transform>,
    pub hidden: bool,
    pub is_definition: bool,
}

/// A raster image reference.
#[derive(Clone, Debug)]
pub struct Image {
    pub source_id: Option<String>,
    pub href: String,
    pub attributes: BTreeMap<String, String>,
    pub transform: Option<Transform>,
    pub hidden: bool,
    pub is_definition: bool,
}

/// A `foreignObject` kept verbatim as raw markup.
#[derive(Clone, Debug)]
pub struct ForeignObject {
    pub source_id: Option<String>,
    /// The whole element as written in the source, tags included.
    pub markup: String,
    pub attributes: BTreeMap<String, String>,
    pub transform: Option<Transform>,
    pub hidden: bool,
    pub is_definition: bool,
}

/// An instantiated `symbol` reference.
#[derive(Clone, Debug)]
pub struct SymbolInstance {
    pub source_id: Option<String>,
    pub symbol_id: String,
    pub attributes: BTreeMap<String, String>,
    pub transform: Option<Transform>,
    pub hidden: bool,
    pub is_definition: bool,
}

/// An unresolved `use` kept as an opaque reference.
#[derive(Clone, Debug)]
pub struct UseRef {
    pub source_id: Option<String>,
    pub href: String,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub transform: Option<Transform>,
    pub hidden: bool,
    pub is_definition: bool,
}

/// A nested `svg` kept verbatim as raw markup.
#[derive(Clone, Debug)]
pub struct EmbeddedSvg {
    pub source_id: Option<String>,
    /// The whole element as written in the source, tags included, so the
    /// snippet re-parses on its own. The root attributes are also
    /// available in `attributes`.
    pub markup: String,
    pub attributes: BTreeMap<String, String>,
    pub transform: Option<Transform>,
    pub hidden: bool,
    pub is_definition: bool,
}

/// An element produced by the importer.
///
/// A closed set: every consumer matches exhaustively, so adding a kind
/// produces compile-time-visible gaps.
#[derive(Clone, Debug)]
pub enum ImportedElement {
    Path(Box<Path>),
    Group(Box<Group>),
    Shape(Box<NativeShape>),
    Text(Box<NativeText>),
    Image(Box<Image>),
    ForeignObject(Box<ForeignObject>),
    SymbolInstance(Box<SymbolInstance>),
    Use(Box<UseRef>),
    EmbeddedSvg(Box<EmbeddedSvg>),
}

impl ImportedElement {
    /// Returns the element's source id, if it carried one.
    pub fn source_id(&self) -> Option<&str> {
        match self {
            ImportedElement::Path(e) => e.source_id.as_deref(),
            ImportedElement::Group(e) => e.source_id.as_deref(),
            ImportedElement::Shape(e) => e.source_id.as_deref(),
            ImportedElement::Text(e) => e.source_id.as_deref(),
            ImportedElement::Image(e) => e.source_id.as_deref(),
            ImportedElement::ForeignObject(e) => e.source_id.as_deref(),
            ImportedElement::SymbolInstance(e) => e.source_id.as_deref(),
            ImportedElement::Use(e) => e.source_id.as_deref(),
            ImportedElement::EmbeddedSvg(e) => e.source_id.as_deref(),
        }
    }

    /// Drops the element's source id.
    ///
    /// Used when inline-cloning `use` targets to avoid id collisions.
    pub fn clear_source_id(&mut self) {
        match self {
            ImportedElement::Path(e) => e.source_id = None,
            ImportedElement::Group(e) => e.source_id = None,
            ImportedElement::Shape(e) => e.source_id = None,
            ImportedElement::Text(e) => e.source_id = None,
            ImportedElement::Image(e) => e.source_id = None,
            ImportedElement::ForeignObject(e) => e.source_id = None,
            ImportedElement::SymbolInstance(e) => e.source_id = None,
            ImportedElement::Use(e) => e.source_id = None,
            ImportedElement::EmbeddedSvg(e) => e.source_id = None,
        }
    }

    pub fn is_hidden(&self) -> bool {
        match self {
            ImportedElement::Path(e) => e.hidden,
            ImportedElement::Group(e) => e.hidden,
            ImportedElement::Shape(e) => e.hidden,
            ImportedElement::Text(e) => e.hidden,
            ImportedElement::Image(e) => e.hidden,
            ImportedElement::ForeignObject(e) => e.hidden,
            ImportedElement::SymbolInstance(e) => e.hidden,
            ImportedElement::Use(e) => e.hidden,
            ImportedElement::EmbeddedSvg(e) => e.hidden,
        }
    }

    pub fn is_definition(&self) -> bool {
        match self {
            ImportedElement::Path(e) => e.is_definition,
            ImportedElement::Group(e) => e.is_definition,
            ImportedElement::Shape(e) => e.is_definition,
            ImportedElement::Text(e) => e.is_definition,
            ImportedElement::Image(e) => e.is_definition,
            ImportedElement::ForeignObject(e) => e.is_definition,
            ImportedElement::SymbolInstance(e) => e.is_definition,
            ImportedElement::Use(e) => e.is_definition,
            ImportedElement::EmbeddedSvg(e) => e.is_definition,
        }
    }

    /// Returns the preserved transform, if any.
    pub fn transform(&self) -> Option<Transform> {
        match self {
            ImportedElement::Path(e) => e.transform,
            ImportedElement::Group(_) => None,
            ImportedElement::Shape(e) => e.transform,
            ImportedElement::Text(e) => e.transform,
            ImportedElement::Image(e) => e.transform,
            ImportedElement::ForeignObject(e) => e.transform,
            ImportedElement::SymbolInstance(e) => e.transform,
            ImportedElement::Use(e) => e.transform,
            ImportedElement::EmbeddedSvg(e) => e.transform,
        }
    }

    /// Calls `f` for every path in this subtree, depth-first.
    pub fn for_each_path(&self, f: &mut impl FnMut(&Path)) {
        match self {
            ImportedElement::Path(e) => f(e),
            ImportedElement::Group(g) => {
                for child in &g.children {
                    child.for_each_path(f);
                }
            }
            _ => {}
        }
    }

    /// Calls `f` for every path in this subtree, depth-first.
    pub fn for_each_path_mut(&mut self, f: &mut impl FnMut(&mut Path)) {
        match self {
            ImportedElement::Path(e) => f(e),
            ImportedElement::Group(g) => {
                for child in &mut g.children {
                    child.for_each_path_mut(f);
                }
            }
            _ => {}
        }
    }

    /// Scales every coordinate and stroke width by `(sx, sy)`.
    pub fn scale(&mut self, sx: f64, sy: f64) {
        let scale_transform = |ts: &mut Option<Transform>| {
            if let Some(m) = ts {
                m.prepend(&Transform::new_scale(sx, sy));
            }
        };

        match self {
            ImportedElement::Path(e) => {
                if e.transform.is_some() {
                    // The matrix rescales strokes at render time.
                    scale_transform(&mut e.transform);
                } else {
                    e.data.scale(sx, sy);
                    e.style.stroke_width *= (sx + sy) / 2.0;
                }
            }
            ImportedElement::Group(g) => {
                for child in &mut g.children {
                    child.scale(sx, sy);
                }
            }
            ImportedElement::Shape(e) => {
                if e.transform.is_some() {
                    scale_transform(&mut e.transform);
                } else {
                    scale_attributes(&mut e.attributes, sx, sy);
                    e.style.stroke_width *= (sx + sy) / 2.0;
                }
            }
            ImportedElement::Text(e) => {
                if e.transform.is_some() {
                    scale_transform(&mut e.transform);
                } else {
                    scale_attributes(&mut e.attributes, sx, sy);
                }
            }
            ImportedElement::Image(e) => {
                if e.transform.is_some() {
                    scale_transform(&mut e.transform);
                } else {
                    scale_attributes(&mut e.attributes, sx, sy);
                }
            }
            ImportedElement::ForeignObject(e) => {
                if e.transform.is_some() {
                    scale_transform(&mut e.transform);
                } else {
                    scale_attributes(&mut e.attributes, sx, sy);
                }
            }
            ImportedElement::SymbolInstance(e) => {
                if e.transform.is_some() {
                    scale_transform(&mut e.transform);
                } else {
                    scale_attributes(&mut e.attributes, sx, sy);
                }
            }
            ImportedElement::Use(e) => {
                if e.transform.is_some() {
                    scale_transform(&mut e.transform);
                } else {
                    e.width = e.width.map(|v| v * sx);
                    e.height = e.height.map(|v| v * sy);
                }
            }
            ImportedElement::EmbeddedSvg(e) => {
                if e.transform.is_some() {
                    scale_transform(&mut e.transform);
                } else {
                    scale_attributes(&mut e.attributes, sx, sy);
                }
            }
        }
    }
}

// Only the well-known positional attributes are rescaled.
// Anything else in the bag is opaque to the importer.
fn scale_attributes(attributes: &mut BTreeMap<String, String>, sx: f64, sy: f64) {
    let scale_one = |attributes: &mut BTreeMap<String, String>, name: &str, factor: f64| {
        if let Some(value) = attributes.get(name) {
            if let Ok(n) = value.parse::<f64>() {
                attributes.insert(name.to_string(), (n * factor).to_string());
            }
        }
    };

    for name in ["x", "x1", "x2", "cx", "width", "rx"] {
        scale_one(attributes, name, sx);
    }
    for name in ["y", "y1", "y2", "cy", "height", "ry"] {
        scale_one(attributes, name, sy);
    }
    scale_one(attributes, "r", (sx + sy) / 2.0);
    scale_one(attributes, "font-size", (sx + sy) / 2.0);
    scale_one(attributes, "stroke-width", (sx + sy) / 2.0);
}

/// Collects a flat copy of every path's geometry in document order.
pub fn flatten_paths(elements: &[ImportedElement]) -> Vec<PathData> {
    let mut paths = Vec::new();
    for element in elements {
        element.for_each_path(&mut |p| paths.push(p.data.clone()));
    }
    paths
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_path() -> Path {
        let mut data = PathData::new();
        data.push_move_to(0.0, 0.0);
        data.push_line_to(10.0, 0.0);
        data.push_close_path();

        Path {
            source_id: Some("p1".to_string()),
            data,
            style: Style::default(),
            transform: None,
            hidden: false,
            is_definition: false,
            text_path: None,
        }
    }

    #[test]
    fn flatten_recurses_into_groups() {
        let tree = vec![ImportedElement::Group(Box::new(Group {
            source_id: None,
            children: vec![
                ImportedElement::Path(Box::new(sample_path())),
                ImportedElement::Path(Box::new(sample_path())),
            ],
            hidden: false,
            is_definition: false,
            text_path: None,
        }))];

        assert_eq!(flatten_paths(&tree).len(), 2);
    }

    #[test]
    fn scale_baked_path_scales_coordinates() {
        let mut el = ImportedElement::Path(Box::new(sample_path()));
        el.scale(2.0, 3.0);

        let bbox = match &el {
            ImportedElement::Path(p) => p.data.bbox().unwrap(),
            _ => unreachable!(),
        };
        assert_eq!(bbox.right(), 20.0);
    }

    #[test]
    fn scale_preserved_path_scales_matrix_only() {
        let mut path = sample_path();
        path.transform = Some(Transform::default());
        let mut el = ImportedElement::Path(Box::new(path));
        el.scale(2.0, 2.0);

        match &el {
            ImportedElement::Path(p) => {
                let ts = p.transform.unwrap();
                assert_eq!(ts.a, 2.0);
                assert_eq!(p.data.bbox().unwrap().right(), 10.0);
                // A consumer applying the matrix would double-scale the
                // stroke if the width changed as well.
                assert_eq!(p.style.stroke_width, 1.0);
            }
            _ => unreachable!(),
        }
    }
}
