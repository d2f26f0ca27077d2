// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! `use` inline-cloning.
//!
//! A resolvable, non-`symbol` target is cloned by re-running the
//! processor on it with the `use` transform and x/y offset composed in.
//! Unresolved and recursive references degrade to an opaque leaf that a
//! renderer can resolve later.

use svgtypes::Length;

use super::converter::{self, Cache, Context};
use super::svgtree::{AId, EId, SvgNode};
use super::units;
use crate::tree::{Group, ImportedElement, UseRef};
use crate::Transform;

pub(crate) fn convert(
    node: SvgNode,
    ctx: &Context,
    cache: &mut Cache,
    elements: &mut Vec<ImportedElement>,
) {
    let href = match node.attribute::<&str>(AId::Href) {
        Some(v) => v,
        None => {
            log::warn!("'use' element without an 'href' attribute. Skipped.");
            return;
        }
    };

    // The x/y offset composes after the element's own transform.
    let x = node.convert_user_length(AId::X, ctx.state, Length::zero());
    let y = node.convert_user_length(AId::Y, ctx.state, Length::zero());
    let mut ts = ctx.transform;
    ts.append(&Transform::new_translate(x, y));

    let target = match node.attribute::<SvgNode>(AId::Href) {
        Some(v) => v,
        // Unresolved or external; defer to render time.
        None => {
            elements.push(opaque_use(node, ctx, ts, href));
            return;
        }
    };

    // Symbols are a recognizer's job.
    if target.tag_name() == Some(EId::Symbol) {
        return;
    }

    let target_id = target.element_id();
    if !target_id.is_empty() && ctx.ancestor_ids.iter().any(|id| id == target_id) {
        log::warn!("Detected a recursive 'use' reference to '{}'.", target_id);
        elements.push(opaque_use(node, ctx, ts, href));
        return;
    }

    let mut clone_ctx = converter::inherit_context(node, ctx);
    clone_ctx.transform = ts;
    if !target_id.is_empty() {
        clone_ctx.ancestor_ids.push(target_id.to_string());
    }

    let mut children = Vec::new();
    converter::convert_element(target, &clone_ctx, cache, &mut children);
    if children.is_empty() {
        return;
    }

    // The clone must not answer to the original's id.
    strip_source_ids(&mut children);

    let id = node.element_id();
    let source_id = if id.is_empty() {
        cache.gen_group_id()
    } else {
        id.to_string()
    };

    elements.push(ImportedElement::Group(Box::new(Group {
        source_id: Some(source_id),
        children,
        hidden: ctx.hidden,
        is_definition: ctx.in_defs,
        text_path: None,
    })));
}

fn opaque_use(node: SvgNode, ctx: &Context, ts: Transform, href: &str) -> ImportedElement {
    let width = node
        .attribute::<Length>(AId::Width)
        .map(|v| units::convert_user_length(v, node, AId::Width, ctx.state));
    let height = node
        .attribute::<Length>(AId::Height)
        .map(|v| units::convert_user_length(v, node, AId::Height, ctx.state));

    ImportedElement::Use(Box::new(UseRef {
        source_id: converter::source_id(node),
        href: href.to_string(),
        width,
        height,
        transform: converter::preserve_matrix(ts),
        hidden: ctx.hidden,
        is_definition: ctx.in_defs,
    }))
}

fn strip_source_ids(elements: &mut [ImportedElement]) {
    for element in elements.iter_mut() {
        element.clear_source_id();
        if let ImportedElement::Group(group) = element {
            strip_source_ids(&mut group.children);
        }
    }
}
