// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Recognizer and style-extractor registries.
//!
//! The registry is built once, passed into the import entry point by
//! reference and never mutated during a walk. Recognition order is
//! priority-descending, stable within equal priority, and the first
//! acceptance wins unconditionally.

use std::collections::BTreeMap;

use super::converter::Context;
use super::svgtree::{Document, SvgNode};
use crate::tree::{ImportedElement, Style};

/// A reusable definition captured by a whole-document scan.
#[derive(Clone, PartialEq, Debug)]
pub struct Definition {
    /// The source element id.
    pub id: String,
    /// The source tag name, e.g. `marker`.
    pub kind: String,
    /// The raw markup slice, kept verbatim for downstream consumers.
    pub markup: String,
}

/// A per-element recognizer.
///
/// Offered every node before the structural stages run. Returning
/// `Some` consumes the node; `None` declines and lets the next stage
/// try.
pub trait ElementImporter {
    /// The kind key used to group this importer's definitions.
    fn name(&self) -> &'static str;

    /// Recognizers with a higher priority are offered nodes first.
    /// Registration order breaks ties.
    fn priority(&self) -> i16 {
        0
    }

    /// Offers a node together with the accumulated import context.
    fn import(&self, node: SvgNode, ctx: &Context) -> Option<Vec<ImportedElement>>;

    /// A whole-document definition scan, run once per import.
    fn collect_definitions(&self, _doc: &Document) -> Vec<Definition> {
        Vec::new()
    }
}

/// A style-extractor extension.
///
/// Runs after core resolution. Add-only: returned pairs land in
/// [`Style::extra`] only when the key is not already taken, and can
/// never replace core-resolved values.
pub trait StyleExtractor {
    fn extract(&self, node: SvgNode, style: &Style) -> Vec<(String, String)>;
}

/// The importer/extractor collection for one import run.
pub struct Registry {
    importers: Vec<Box<dyn ElementImporter>>,
    extractors: Vec<Box<dyn StyleExtractor>>,
}

impl Registry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Registry {
            importers: Vec::new(),
            extractors: Vec::new(),
        }
    }

    /// Creates a registry with the built-in recognizers
    /// (text, image, symbol instantiation).
    pub fn with_builtins() -> Self {
        let mut registry = Registry::new();
        registry.register_importer(Box::new(super::plugins::TextImporter));
        registry.register_importer(Box::new(super::plugins::ImageImporter));
        registry.register_importer(Box::new(super::plugins::SymbolImporter));
        registry
    }

    /// Adds a recognizer, keeping the collection priority-sorted.
    ///
    /// The sort is stable, so equal priorities keep registration order.
    pub fn register_importer(&mut self, importer: Box<dyn ElementImporter>) {
        self.importers.push(importer);
        self.importers.sort_by_key(|i| std::cmp::Reverse(i.priority()));
    }

    /// Adds a style-extractor extension.
    pub fn register_extractor(&mut self, extractor: Box<dyn StyleExtractor>) {
        self.extractors.push(extractor);
    }

    /// Offers a node to every recognizer in priority order.
    pub(crate) fn recognize(
        &self,
        node: SvgNode,
        ctx: &Context,
    ) -> Option<Vec<ImportedElement>> {
        for importer in &self.importers {
            if let Some(elements) = importer.import(node, ctx) {
                return Some(elements);
            }
        }

        None
    }

    /// Runs every whole-document definition scan, grouped by importer
    /// name and de-duplicated by id with last-write-wins.
    pub(crate) fn collect_definitions(&self, doc: &Document) -> BTreeMap<String, Vec<Definition>> {
        let mut imports: BTreeMap<String, Vec<Definition>> = BTreeMap::new();
        for importer in &self.importers {
            let defs = importer.collect_definitions(doc);
            if defs.is_empty() {
                continue;
            }

            let list = imports.entry(importer.name().to_string()).or_default();
            for def in defs {
                merge_definition(list, def);
            }
        }

        imports
    }

    /// Applies extension extractors to a core-resolved style. Add-only.
    pub(crate) fn extend_style(&self, node: SvgNode, style: &mut Style) {
        for extractor in &self.extractors {
            for (key, value) in extractor.extract(node, &*style) {
                if is_core_style_key(&key) {
                    log::warn!("Style extension cannot override '{}'. Skipped.", key);
                    continue;
                }

                style.extra.entry(key).or_insert(value);
            }
        }
    }
}

impl Default for Registry {
    fn default() -> Self {
        Registry::with_builtins()
    }
}

/// Replaces an existing definition with the same id, appends otherwise.
pub(crate) fn merge_definition(list: &mut Vec<Definition>, def: Definition) {
    if let Some(existing) = list.iter_mut().find(|d| d.id == def.id) {
        *existing = def;
    } else {
        list.push(def);
    }
}

fn is_core_style_key(key: &str) -> bool {
    matches!(
        key,
        "fill" | "stroke" | "fill-opacity" | "stroke-opacity" | "opacity" | "stroke-width"
            | "fill-rule"
    )
}
