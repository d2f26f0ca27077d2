// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The per-element processing state machine and the document driver.
//!
//! Each node runs through a fixed stage order: nested-`svg` capture,
//! recognizer registry, structural tags, path-geometry fallback. The
//! first applicable stage consumes the node. The driver wraps the walk
//! with size resolution, metadata extraction, the deferred-attachment
//! pass and the optional whole-result post-processing.

use std::collections::{BTreeMap, HashSet};

use svgtypes::{Length, LengthUnit};

use super::options::Options;
use super::registry::{self, Definition, Registry};
use super::svgtree::{AId, Document, EId, SvgNode};
use super::{metadata, plugins, shapes, style, switch, units, use_node, Error, ImportResult};
use crate::geom::{Rect, Size};
use crate::tree::{
    self, bounds, colors, EmbeddedSvg, ForeignObject, Group, ImportedElement, Path, Style,
    TextPathAttachment, Units,
};
use crate::Transform;

// Matches the XML nesting bound in svgtree.
const MAX_DEPTH: u32 = 1024;

/// Per-import read-only state.
pub(crate) struct State<'a> {
    pub(crate) size: Size,
    pub(crate) view_box: Rect,
    pub(crate) opt: &'a Options<'a>,
}

/// Global text defaults, filled from [`Options`] and the root element.
#[derive(Clone, Debug)]
pub struct TextStyle {
    pub font_family: String,
    pub font_size: f64,
}

/// The import context threaded through the recursive walk.
///
/// Cloned and structurally updated at every level, never mutated in
/// place, so each level's effective context stays reproducible.
#[derive(Clone)]
pub struct Context<'a> {
    pub(crate) state: &'a State<'a>,
    pub(crate) registry: &'a Registry,
    /// Inheritable presentation values pushed down from ancestors.
    pub inherited: BTreeMap<AId, String>,
    /// The transform accumulated from the nearest group-like ancestor.
    pub transform: Transform,
    pub text_style: TextStyle,
    /// Source ids of the enclosing groups. Used as the `use` cycle guard.
    pub ancestor_ids: Vec<String>,
    pub hidden: bool,
    /// An ancestor carries a transform animation, which forces
    /// descendants to preserve rather than bake their own transform.
    pub has_animated_ancestor: bool,
    pub in_defs: bool,
    depth: u32,
}

impl Context<'_> {
    /// Resolves the effective style of a node under this context.
    pub fn resolve_style(&self, node: SvgNode) -> Style {
        style::resolve_style(node, self, self.registry)
    }

    /// The resolved document size.
    pub fn svg_size(&self) -> Size {
        self.state.size
    }
}

/// Walk-wide mutable bookkeeping.
#[derive(Default)]
pub(crate) struct Cache {
    pub(crate) attachments: Vec<TextPathAttachment>,

    // used for ID generation
    all_ids: HashSet<String>,
    group_index: usize,
}

impl Cache {
    pub(crate) fn gen_group_id(&mut self) -> String {
        loop {
            self.group_index += 1;
            let new_id = format!("group{}", self.group_index);
            if !self.all_ids.contains(&new_id) {
                return new_id;
            }
        }
    }
}

impl<'a, 'input: 'a> SvgNode<'a, 'input> {
    pub(crate) fn convert_length(
        &self,
        aid: AId,
        object_units: Units,
        state: &State,
        def: Length,
    ) -> f64 {
        units::convert_length(
            self.attribute(aid).unwrap_or(def),
            *self,
            aid,
            object_units,
            state,
        )
    }

    pub(crate) fn convert_user_length(&self, aid: AId, state: &State, def: Length) -> f64 {
        self.convert_length(aid, Units::UserSpaceOnUse, state, def)
    }
}

pub(crate) fn convert_doc(
    doc: &Document,
    opt: &Options,
    registry: &Registry,
) -> Result<ImportResult, Error> {
    let svg = doc.root_element();
    let (size, view_box) = resolve_svg_size(svg, opt)?;
    let state = State {
        size,
        view_box: view_box.unwrap_or_else(|| size.to_rect(0.0, 0.0)),
        opt,
    };

    let mut artboard_metadata = metadata::extract(doc);

    let text_style = TextStyle {
        font_family: svg
            .attribute::<&str>(AId::FontFamily)
            .map(str::to_string)
            .unwrap_or_else(|| opt.font_family.clone()),
        font_size: units::resolve_font_size(svg, &state),
    };

    let ctx = Context {
        state: &state,
        registry,
        inherited: BTreeMap::new(),
        transform: Transform::default(),
        text_style,
        ancestor_ids: Vec::new(),
        hidden: false,
        has_animated_ancestor: false,
        in_defs: false,
        depth: 0,
    };

    let mut cache = Cache::default();
    for node in doc.descendants() {
        if node.is_element() && !node.element_id().is_empty() {
            cache.all_ids.insert(node.element_id().to_string());
        }
    }

    let mut elements = Vec::new();
    convert_children(svg, &ctx, &mut cache, &mut elements);

    // An import that produced nothing at all is rejected as a whole.
    // The caller's document is untouched either way.
    if elements.is_empty() && artboard_metadata.is_none() {
        return Err(Error::EmptyDocument);
    }

    resolve_attachments(&mut elements, cache.attachments);

    let mut plugin_imports = registry.collect_definitions(doc);
    merge_scan(&mut plugin_imports, "marker", plugins::collect_marker_definitions(doc));
    merge_scan(&mut plugin_imports, "mask", plugins::collect_mask_definitions(doc));

    if let Some(viewer_mode) = opt.color_mode {
        let source_mode = artboard_metadata
            .as_ref()
            .and_then(|m| m.background_color.as_deref())
            .and_then(colors::color_mode_from_background);

        if let Some(source_mode) = source_mode {
            if source_mode != viewer_mode {
                colors::remap_mono_colors(&mut elements, source_mode, viewer_mode);
                if let Some(m) = artboard_metadata.as_mut() {
                    m.remap_mono_background();
                }
            }
        }
    }

    let mut size = state.size;
    if let Some((sx, sy)) = opt.resize {
        if sx.is_finite() && sy.is_finite() && sx > 0.0 && sy > 0.0 {
            for element in &mut elements {
                element.scale(sx, sy);
            }
            size = Size::from_wh(size.width() * sx, size.height() * sy).unwrap_or(size);
        } else {
            log::warn!("Invalid resize factors ({}, {}). Ignored.", sx, sy);
        }
    }

    let mut paths = tree::flatten_paths(&elements);
    if let Some(resolver) = &opt.path_union {
        if let Some(unioned) = (resolver.resolve)(&paths) {
            paths = vec![unioned];
        }
    }

    let bounds = bounds::aggregate_bounds(&elements);

    Ok(ImportResult {
        size,
        view_box,
        elements,
        paths,
        plugin_imports,
        artboard_metadata,
        bounds,
    })
}

fn merge_scan(
    imports: &mut BTreeMap<String, Vec<Definition>>,
    kind: &str,
    defs: Vec<Definition>,
) {
    if defs.is_empty() {
        return;
    }

    let list = imports.entry(kind.to_string()).or_default();
    for def in defs {
        registry::merge_definition(list, def);
    }
}

fn resolve_svg_size(svg: SvgNode, opt: &Options) -> Result<(Size, Option<Rect>), Error> {
    let view_box = svg
        .attribute::<svgtypes::ViewBox>(AId::ViewBox)
        .map(|vb| Rect::from_xywh(vb.x, vb.y, vb.w, vb.h))
        .filter(|r| r.is_valid());

    let def = Length::new(100.0, LengthUnit::Percent);
    let width: Length = svg.attribute(AId::Width).unwrap_or(def);
    let height: Length = svg.attribute(AId::Height).unwrap_or(def);

    // Percent dimensions resolve against the viewBox when present and
    // against the configured fallback size otherwise.
    let (base_w, base_h) = match view_box {
        Some(vb) => (vb.width, vb.height),
        None => (opt.default_size.width(), opt.default_size.height()),
    };

    let size = Size::from_wh(
        convert_root_length(width, base_w, opt),
        convert_root_length(height, base_h, opt),
    );

    match size {
        Some(size) => Ok((size, view_box)),
        None => Err(Error::InvalidSize),
    }
}

// Root-level length conversion. `em`/`ex` resolve against the default
// font size since there is no ancestor chain yet.
fn convert_root_length(length: Length, base: f64, opt: &Options) -> f64 {
    let dpi = opt.dpi;
    let n = length.number;
    match length.unit {
        LengthUnit::None | LengthUnit::Px => n,
        LengthUnit::Em => n * opt.font_size,
        LengthUnit::Ex => n * opt.font_size / 2.0,
        LengthUnit::In => n * dpi,
        LengthUnit::Cm => n * dpi / 2.54,
        LengthUnit::Mm => n * dpi / 25.4,
        LengthUnit::Pt => n * dpi / 72.0,
        LengthUnit::Pc => n * dpi / 6.0,
        LengthUnit::Percent => base * n / 100.0,
    }
}

/// Converts every child of `parent`, threading `parent`'s inheritable
/// attributes into the children's context.
pub(crate) fn convert_children(
    parent: SvgNode,
    ctx: &Context,
    cache: &mut Cache,
    elements: &mut Vec<ImportedElement>,
) {
    let child_ctx = inherit_context(parent, ctx);
    for child in parent.children() {
        convert_element(child, &child_ctx, cache, elements);
    }
}

pub(crate) fn inherit_context<'a>(parent: SvgNode, ctx: &Context<'a>) -> Context<'a> {
    let mut child_ctx = ctx.clone();
    child_ctx.depth = ctx.depth + 1;

    for attr in parent.attributes() {
        if attr.name.is_inheritable() {
            child_ctx
                .inherited
                .insert(attr.name, attr.value.as_str().to_string());
        }
    }

    if parent
        .children()
        .any(|n| n.tag_name() == Some(EId::AnimateTransform))
    {
        child_ctx.has_animated_ancestor = true;
    }

    child_ctx
}

pub(crate) fn convert_element(
    node: SvgNode,
    ctx: &Context,
    cache: &mut Cache,
    elements: &mut Vec<ImportedElement>,
) {
    if !node.is_element() {
        return;
    }

    let tag_name = match node.tag_name() {
        Some(v) => v,
        None => return,
    };

    if ctx.depth > MAX_DEPTH {
        log::warn!("Element '{}' is nested too deeply. Skipped.", tag_name);
        return;
    }

    // Round-trip bookkeeping nodes, not user content.
    let id = node.element_id();
    if id == metadata::METADATA_ID || id == metadata::BACKGROUND_ID {
        return;
    }

    if matches!(tag_name, EId::Metadata | EId::Style) || tag_name.is_animation() {
        return;
    }

    let mut ctx = ctx.clone();
    if let Some(ts) = node.attribute::<Transform>(AId::Transform) {
        ctx.transform.append(&ts);
    }
    if node.attribute::<&str>(AId::Display) == Some("none") {
        ctx.hidden = true;
    }

    // A nested `svg` is captured verbatim, markup and matrix alike.
    if tag_name == EId::Svg {
        elements.push(ImportedElement::EmbeddedSvg(Box::new(EmbeddedSvg {
            source_id: source_id(node),
            markup: node.outer_markup().to_string(),
            attributes: plugins::attribute_bag(node),
            transform: preserve_matrix(ctx.transform),
            hidden: ctx.hidden,
            is_definition: ctx.in_defs,
        })));
        return;
    }

    // Recognizers take the node unconditionally over every later stage.
    if let Some(recognized) = ctx.registry.recognize(node, &ctx) {
        absorb_recognized(recognized, &ctx, cache, elements);
        return;
    }

    match tag_name {
        EId::ForeignObject => {
            elements.push(ImportedElement::ForeignObject(Box::new(ForeignObject {
                source_id: source_id(node),
                markup: node.outer_markup().to_string(),
                attributes: plugins::attribute_bag(node),
                transform: preserve_matrix(ctx.transform),
                hidden: ctx.hidden,
                is_definition: ctx.in_defs,
            })));
        }
        EId::Defs => {
            // Children recurse with the transform reset to identity;
            // the output stays in the tree, referenceable by id, but is
            // flagged hidden/definition.
            let mut defs_ctx = ctx.clone();
            defs_ctx.transform = Transform::default();
            defs_ctx.in_defs = true;
            defs_ctx.hidden = true;
            convert_children(node, &defs_ctx, cache, elements);
        }
        EId::G | EId::A => {
            convert_group(node, &ctx, cache, elements);
        }
        EId::Switch => {
            if let Some(child) = switch::select_child(node, ctx.state.opt) {
                let child_ctx = inherit_context(node, &ctx);
                convert_element(child, &child_ctx, cache, elements);
            }
        }
        EId::Use => {
            use_node::convert(node, &ctx, cache, elements);
        }
        // Instantiated via `use`; collected separately as a definition.
        EId::Symbol => {}
        _ => {
            convert_shape(node, &ctx, elements);
        }
    }
}

fn convert_group(
    node: SvgNode,
    ctx: &Context,
    cache: &mut Cache,
    elements: &mut Vec<ImportedElement>,
) {
    let id = node.element_id();
    let source_id = if id.is_empty() {
        cache.gen_group_id()
    } else {
        id.to_string()
    };

    let mut group_ctx = ctx.clone();
    group_ctx.ancestor_ids.push(source_id.clone());

    let mut children = Vec::new();
    convert_children(node, &group_ctx, cache, &mut children);

    // An emptied-out group contributes nothing.
    if children.is_empty() {
        return;
    }

    elements.push(ImportedElement::Group(Box::new(Group {
        source_id: Some(source_id),
        children,
        hidden: ctx.hidden,
        is_definition: ctx.in_defs,
        text_path: None,
    })));
}

/// Folds recognizer output into the tree.
///
/// A path carrying a text-on-path payload is not used verbatim: its
/// payload is queued as a deferred attachment and the path itself is
/// replaced with an invisible proxy group carrying the same payload.
fn absorb_recognized(
    recognized: Vec<ImportedElement>,
    ctx: &Context,
    cache: &mut Cache,
    elements: &mut Vec<ImportedElement>,
) {
    for element in recognized {
        if let ImportedElement::Path(path) = &element {
            if let Some(payload) = &path.text_path {
                if payload.text.is_empty() {
                    log::warn!("A text-on-path without content. Skipped.");
                    continue;
                }

                cache.attachments.push(TextPathAttachment {
                    target_id: payload.target.clone(),
                    payload: payload.clone(),
                });

                elements.push(ImportedElement::Group(Box::new(Group {
                    source_id: path.source_id.clone(),
                    children: Vec::new(),
                    hidden: true,
                    is_definition: ctx.in_defs,
                    text_path: Some(payload.clone()),
                })));
                continue;
            }
        }

        elements.push(element);
    }
}

fn convert_shape(node: SvgNode, ctx: &Context, elements: &mut Vec<ImportedElement>) {
    let mut data = match shapes::convert(node, ctx.state) {
        Some(v) => v,
        None => return,
    };

    let style = style::resolve_style(node, ctx, ctx.registry);

    let transform = if shapes::should_preserve_transform(node, ctx, &style) {
        preserve_matrix(ctx.transform)
    } else {
        data.transform(ctx.transform);
        None
    };

    elements.push(ImportedElement::Path(Box::new(Path {
        source_id: source_id(node),
        data,
        style,
        transform,
        hidden: ctx.hidden,
        is_definition: ctx.in_defs,
        text_path: None,
    })));
}

pub(crate) fn source_id(node: SvgNode) -> Option<String> {
    let id = node.element_id();
    if id.is_empty() {
        None
    } else {
        Some(id.to_string())
    }
}

pub(crate) fn preserve_matrix(ts: Transform) -> Option<Transform> {
    if ts.is_identity() {
        None
    } else {
        Some(ts)
    }
}

/// The deferred attachment pass.
///
/// Runs twice per request: first excluding definition-reference targets,
/// then including them, so a duplicate id shared between a visible path
/// and a hidden definition prefers the visible one.
fn resolve_attachments(elements: &mut [ImportedElement], attachments: Vec<TextPathAttachment>) {
    for attachment in attachments {
        if attach_payload(elements, &attachment, false) {
            continue;
        }
        if attach_payload(elements, &attachment, true) {
            continue;
        }

        log::warn!(
            "No path with id '{}' for a text-on-path. Ignored.",
            attachment.target_id
        );
    }
}

fn attach_payload(
    elements: &mut [ImportedElement],
    attachment: &TextPathAttachment,
    include_definitions: bool,
) -> bool {
    for element in elements.iter_mut() {
        match element {
            ImportedElement::Path(path) => {
                if path.source_id.as_deref() == Some(attachment.target_id.as_str())
                    && (include_definitions || !path.is_definition)
                {
                    path.text_path = Some(attachment.payload.clone());
                    return true;
                }
            }
            ImportedElement::Group(group) => {
                if attach_payload(&mut group.children, attachment, include_definitions) {
                    return true;
                }
            }
            _ => {}
        }
    }

    false
}
