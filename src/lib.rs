// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/*!
`svgimport` resolves an SVG document into a tree of editor-ready
elements.

Unlike a renderer, the importer keeps elements editable: text stays
text, images stay references, transforms are baked into coordinates
only when doing so is safe. The pipeline:

1. parse the XML into a read-only DOM with CSS pre-applied;
2. walk every element through a fixed stage order (recognizer registry,
   structural tags, path geometry), threading transform and style
   through an immutable per-level context;
3. resolve deferred text-on-path attachments;
4. compute aggregate bounds and run the optional whole-result
   post-processing (resize, path union, color-mode remap).

The entry points are [`ImportResult::from_data`] and
[`ImportResult::from_str`]. Recognition is extensible through
[`ElementImporter`] and [`StyleExtractor`] registered on a [`Registry`].
*/

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![allow(clippy::collapsible_else_if)]
#![allow(clippy::collapsible_if)]
#![allow(clippy::field_reassign_with_default)]
#![allow(clippy::too_many_arguments)]

mod geom;
pub mod parser;
mod pathdata;
mod transform;
pub mod tree;

pub use geom::{BBox, Rect, Size};
pub use parser::{
    decompress_svgz, ArtboardMetadata, Context, Definition, ElementImporter, Error, ExportBounds,
    ImageImporter, ImportResult, Options, PathUnionFn, PathUnionResolver, Registry,
    StyleExtractor, SymbolImporter, TextImporter, TextStyle, BACKGROUND_ID, METADATA_ID,
};
pub use pathdata::{PathData, PathSegment};
pub use transform::Transform;
pub use tree::colors::ColorMode;
pub use tree::{
    FillRule, ImportedElement, Style, TextPathAttachment, TextPathPayload, Units,
};
