// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Built-in element recognizers.
//!
//! These cover the element kinds the editor keeps native instead of
//! flattening to path geometry: text, raster images and symbol
//! instantiation. They go through the same registry as external
//! recognizers and enjoy no special treatment.

use std::collections::BTreeMap;

use super::converter::{preserve_matrix, source_id, Context};
use super::registry::{Definition, ElementImporter};
use super::style;
use super::svgtree::{AId, Document, EId, SvgNode};
use crate::pathdata::PathData;
use crate::tree::{
    Image, ImportedElement, NativeText, Path, SymbolInstance, TextPathPayload,
};
use crate::Transform;

/// Copies every attribute of a node into a flat string bag.
pub(crate) fn attribute_bag(node: SvgNode) -> BTreeMap<String, String> {
    let mut bag = BTreeMap::new();
    for attr in node.attributes() {
        bag.insert(attr.name.to_str().to_string(), attr.value.as_str().to_string());
    }
    bag
}

/// Concatenates the text content of a node's subtree.
pub(crate) fn collect_text(node: SvgNode) -> String {
    let mut out = String::new();
    for descendant in node.descendants() {
        if descendant.is_text() {
            out.push_str(descendant.text());
        }
    }
    out.trim().to_string()
}

/// Recognizes `text` elements and keeps them editable.
pub struct TextImporter;

impl ElementImporter for TextImporter {
    fn name(&self) -> &'static str {
        "text"
    }

    fn import(&self, node: SvgNode, ctx: &Context) -> Option<Vec<ImportedElement>> {
        if node.tag_name() != Some(EId::Text) {
            return None;
        }

        let resolved = style::resolve_style(node, ctx, ctx.registry);

        // A text-on-path comes out as a path carrying the payload.
        // The processor turns it into an attachment plus a proxy group.
        if let Some(text_path) = node
            .children()
            .find(|c| c.tag_name() == Some(EId::TextPath))
        {
            let target = text_path
                .attribute::<&str>(AId::Href)
                .and_then(|v| svgtypes::IRI::from_str(v).ok().map(|iri| iri.0.to_string()))?;

            let payload = TextPathPayload {
                target,
                text: collect_text(text_path),
                attributes: text_attributes(node, ctx),
            };

            return Some(vec![ImportedElement::Path(Box::new(Path {
                source_id: source_id(node),
                data: PathData::new(),
                style: resolved,
                transform: preserve_matrix(ctx.transform),
                hidden: ctx.hidden,
                is_definition: ctx.in_defs,
                text_path: Some(payload),
            }))]);
        }

        let text = collect_text(node);
        if text.is_empty() {
            log::warn!("Text '{}' has no content. Skipped.", node.element_id());
            return Some(Vec::new());
        }

        Some(vec![ImportedElement::Text(Box::new(NativeText {
            source_id: source_id(node),
            text,
            attributes: text_attributes(node, ctx),
            style: resolved,
            transform: preserve_matrix(ctx.transform),
            hidden: ctx.hidden,
            is_definition: ctx.in_defs,
        }))])
    }
}

// Global text defaults fill only the missing attributes. An explicit
// value always wins.
fn text_attributes(node: SvgNode, ctx: &Context) -> BTreeMap<String, String> {
    let mut bag = attribute_bag(node);
    bag.entry("font-family".to_string())
        .or_insert_with(|| ctx.text_style.font_family.clone());
    bag.entry("font-size".to_string())
        .or_insert_with(|| ctx.text_style.font_size.to_string());
    bag
}

/// Recognizes `image` elements.
pub struct ImageImporter;

impl ElementImporter for ImageImporter {
    fn name(&self) -> &'static str {
        "image"
    }

    fn import(&self, node: SvgNode, ctx: &Context) -> Option<Vec<ImportedElement>> {
        if node.tag_name() != Some(EId::Image) {
            return None;
        }

        let href = match node.attribute::<&str>(AId::Href) {
            Some(v) => v.to_string(),
            None => {
                log::warn!("Image '{}' lacks an 'href'. Skipped.", node.element_id());
                return Some(Vec::new());
            }
        };

        Some(vec![ImportedElement::Image(Box::new(Image {
            source_id: source_id(node),
            href,
            attributes: attribute_bag(node),
            transform: preserve_matrix(ctx.transform),
            hidden: ctx.hidden,
            is_definition: ctx.in_defs,
        }))])
    }
}

/// Recognizes `use` elements whose target is a `symbol` and turns them
/// into symbol instances. Plain `use` resolution stays with the
/// structural stage.
pub struct SymbolImporter;

impl ElementImporter for SymbolImporter {
    fn name(&self) -> &'static str {
        "symbol"
    }

    fn import(&self, node: SvgNode, ctx: &Context) -> Option<Vec<ImportedElement>> {
        if node.tag_name() != Some(EId::Use) {
            return None;
        }

        let target = node.attribute::<SvgNode>(AId::Href)?;
        if target.tag_name() != Some(EId::Symbol) {
            return None;
        }

        let symbol_id = target.element_id().to_string();

        // The x/y offset composes into the instance matrix.
        let x = node.attribute::<f64>(AId::X).unwrap_or(0.0);
        let y = node.attribute::<f64>(AId::Y).unwrap_or(0.0);
        let mut ts = ctx.transform;
        ts.append(&Transform::new_translate(x, y));

        Some(vec![ImportedElement::SymbolInstance(Box::new(
            SymbolInstance {
                source_id: source_id(node),
                symbol_id,
                attributes: attribute_bag(node),
                transform: preserve_matrix(ts),
                hidden: ctx.hidden,
                is_definition: ctx.in_defs,
            },
        ))])
    }

    fn collect_definitions(&self, doc: &Document) -> Vec<Definition> {
        collect_by_tag(doc, EId::Symbol, "symbol")
    }
}

/// Scans the whole document for `marker` definitions.
///
/// Always runs, independent of which recognizers are registered.
pub(crate) fn collect_marker_definitions(doc: &Document) -> Vec<Definition> {
    collect_by_tag(doc, EId::Marker, "marker")
}

/// Scans the whole document for `mask` definitions. Always runs.
pub(crate) fn collect_mask_definitions(doc: &Document) -> Vec<Definition> {
    collect_by_tag(doc, EId::Mask, "mask")
}

fn collect_by_tag(doc: &Document, tag: EId, kind: &str) -> Vec<Definition> {
    let mut defs = Vec::new();
    for node in doc.descendants().filter(|n| n.tag_name() == Some(tag)) {
        let id = node.element_id();
        if id.is_empty() {
            continue;
        }

        defs.push(Definition {
            id: id.to_string(),
            kind: kind.to_string(),
            markup: node.outer_markup().to_string(),
        });
    }

    defs
}
