// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! SVG parsing and conversion into an [`ImportedElement`] tree.

use std::collections::BTreeMap;

use crate::geom::{Rect, Size};
use crate::pathdata::PathData;
use crate::tree::ImportedElement;

mod converter;
mod metadata;
mod options;
mod plugins;
mod registry;
mod shapes;
mod style;
mod switch;
mod units;
mod use_node;

pub mod svgtree;

pub use converter::{Context, TextStyle};
pub use metadata::{ArtboardMetadata, ExportBounds, BACKGROUND_ID, METADATA_ID};
pub use options::{Options, PathUnionFn, PathUnionResolver};
pub use plugins::{ImageImporter, SymbolImporter, TextImporter};
pub use registry::{Definition, ElementImporter, Registry, StyleExtractor};

/// List of all errors.
#[derive(Debug)]
pub enum Error {
    /// Only UTF-8 content is supported.
    NotAnUtf8Str,

    /// Compressed SVG must use the GZip algorithm.
    MalformedGZip,

    /// We do not allow SVG with more than 1_000_000 elements for security reasons.
    ElementsLimitReached,

    /// SVG doesn't have a valid size.
    ///
    /// Occurs when width and/or height are <= 0.
    InvalidSize,

    /// Failed to parse an SVG data.
    ParsingFailed(roxmltree::Error),

    /// The document produced no elements and carries no artboard
    /// metadata. The whole import is rejected.
    EmptyDocument,
}

impl From<roxmltree::Error> for Error {
    fn from(e: roxmltree::Error) -> Self {
        Error::ParsingFailed(e)
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Error::NotAnUtf8Str => {
                write!(f, "provided data has not an UTF-8 encoding")
            }
            Error::MalformedGZip => {
                write!(f, "provided data has a malformed GZip content")
            }
            Error::ElementsLimitReached => {
                write!(f, "the maximum number of SVG elements has been reached")
            }
            Error::InvalidSize => {
                write!(f, "SVG has an invalid size")
            }
            Error::ParsingFailed(e) => {
                write!(f, "SVG data parsing failed cause {}", e)
            }
            Error::EmptyDocument => {
                write!(f, "SVG document has no importable content")
            }
        }
    }
}

impl std::error::Error for Error {}

/// The outcome of one import run.
#[derive(Debug)]
pub struct ImportResult {
    /// The resolved document size.
    pub size: Size,
    /// The root `viewBox`, when one was present.
    pub view_box: Option<Rect>,
    /// The element tree, in document order.
    pub elements: Vec<ImportedElement>,
    /// A flat copy of every path's geometry. When a union hook ran,
    /// a single compound path.
    pub paths: Vec<PathData>,
    /// Definitions contributed by whole-document scans, grouped by kind.
    pub plugin_imports: BTreeMap<String, Vec<Definition>>,
    /// The decoded artboard metadata block, when present and valid.
    pub artboard_metadata: Option<ArtboardMetadata>,
    /// Aggregate bounds of the visible elements.
    pub bounds: Option<Rect>,
}

impl ImportResult {
    /// Imports an SVG or SVGZ buffer.
    pub fn from_data(
        data: &[u8],
        opt: &Options,
        registry: &Registry,
    ) -> Result<Self, Error> {
        if data.starts_with(&[0x1f, 0x8b]) {
            let data = decompress_svgz(data)?;
            let text = std::str::from_utf8(&data).map_err(|_| Error::NotAnUtf8Str)?;
            Self::from_str(text, opt, registry)
        } else {
            let text = std::str::from_utf8(data).map_err(|_| Error::NotAnUtf8Str)?;
            Self::from_str(text, opt, registry)
        }
    }

    /// Imports an SVG string.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(text: &str, opt: &Options, registry: &Registry) -> Result<Self, Error> {
        let xml_opt = roxmltree::ParsingOptions {
            allow_dtd: true,
            ..Default::default()
        };

        let xml = roxmltree::Document::parse_with_options(text, xml_opt)
            .map_err(Error::ParsingFailed)?;

        Self::from_xmltree(&xml, opt, registry)
    }

    /// Imports an already parsed XML document.
    pub fn from_xmltree(
        xml: &roxmltree::Document,
        opt: &Options,
        registry: &Registry,
    ) -> Result<Self, Error> {
        let doc = svgtree::Document::parse_tree(xml).map_err(|e| match e {
            roxmltree::Error::NodesLimitReached => Error::ElementsLimitReached,
            e => Error::ParsingFailed(e),
        })?;

        converter::convert_doc(&doc, opt, registry)
    }
}

/// Decompresses an SVGZ file.
pub fn decompress_svgz(data: &[u8]) -> Result<Vec<u8>, Error> {
    use std::io::Read;

    let mut decoder = flate2::read::GzDecoder::new(data);
    let mut decoded = Vec::with_capacity(data.len() * 2);
    decoder
        .read_to_end(&mut decoded)
        .map_err(|_| Error::MalformedGZip)?;
    Ok(decoded)
}
