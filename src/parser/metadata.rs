// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The private artboard-metadata block.
//!
//! Editors round-trip artboard settings through a reserved-id
//! `<metadata>` element carrying URL-encoded-or-plain JSON, either in a
//! `data-artboard` attribute or as text content. The block is pure
//! bookkeeping: an invalid payload is dropped with a warning and never
//! fails the rest of the import.

use serde::{Deserialize, Serialize};

use super::svgtree::{AId, Document, EId, SvgNode};

/// The reserved id of the metadata element.
pub const METADATA_ID: &str = "artboard-metadata";

/// The reserved id of the artboard background rect.
pub const BACKGROUND_ID: &str = "artboard-background";

/// The artboard export region.
#[derive(Clone, Copy, PartialEq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportBounds {
    pub min_x: f64,
    pub min_y: f64,
    pub width: f64,
    pub height: f64,
}

/// The versioned artboard settings payload.
///
/// Version 1 passes through unchanged; version 2 and later participate
/// in color-mode remapping.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtboardMetadata {
    pub version: u32,
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub selected_preset_id: Option<String>,
    #[serde(default)]
    pub custom_width: Option<f64>,
    #[serde(default)]
    pub custom_height: Option<f64>,
    #[serde(default)]
    pub background_color: Option<String>,
    #[serde(default)]
    pub show_margins: bool,
    #[serde(default)]
    pub margin_size: Option<f64>,
    /// Required. A missing or malformed region invalidates the whole
    /// block.
    pub export_bounds: ExportBounds,
}

impl ArtboardMetadata {
    /// Swaps a literal mono background color. Version-1 payloads are
    /// exempt, they predate the color-mode convention.
    pub(crate) fn remap_mono_background(&mut self) {
        if self.version < 2 {
            return;
        }

        if let Some(background) = &self.background_color {
            if let Some(swapped) = crate::tree::colors::swap_mono(background) {
                self.background_color = Some(swapped);
            }
        }
    }
}

/// Locates and decodes the metadata block, if the document carries one.
pub(crate) fn extract(doc: &Document) -> Option<ArtboardMetadata> {
    let node = find_metadata_node(doc)?;

    let raw = match node.attribute::<&str>(AId::DataArtboard) {
        Some(v) => v.to_string(),
        None => node.text().trim().to_string(),
    };

    if raw.is_empty() {
        return None;
    }

    let json = if raw.contains('%') {
        percent_decode(&raw)
    } else {
        raw
    };

    match serde_json::from_str::<ArtboardMetadata>(&json) {
        Ok(meta) if is_valid_bounds(&meta.export_bounds) => Some(meta),
        Ok(_) => {
            log::warn!("Artboard metadata has invalid export bounds. Ignored.");
            None
        }
        Err(e) => {
            log::warn!("Failed to decode artboard metadata: {}. Ignored.", e);
            None
        }
    }
}

fn find_metadata_node<'a, 'input>(doc: &'a Document<'input>) -> Option<SvgNode<'a, 'input>> {
    if let Some(node) = doc.element_by_id(METADATA_ID) {
        if node.tag_name() == Some(EId::Metadata) {
            return Some(node);
        }
    }

    doc.descendants().find(|n| {
        n.tag_name() == Some(EId::Metadata) && n.has_attribute(AId::DataArtboard)
    })
}

fn is_valid_bounds(bounds: &ExportBounds) -> bool {
    bounds.min_x.is_finite()
        && bounds.min_y.is_finite()
        && bounds.width.is_finite()
        && bounds.height.is_finite()
        && bounds.width >= 0.0
        && bounds.height >= 0.0
}

/// A minimal `%XX` decoder. `+` is left alone, the payload is JSON and
/// not a form body.
fn percent_decode(value: &str) -> String {
    let bytes = value.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' && i + 3 <= bytes.len() {
            let hi = (bytes[i + 1] as char).to_digit(16);
            let lo = (bytes[i + 2] as char).to_digit(16);
            if let (Some(hi), Some(lo)) = (hi, lo) {
                out.push((hi * 16 + lo) as u8);
                i += 3;
                continue;
            }
        }

        out.push(bytes[i]);
        i += 1;
    }

    String::from_utf8(out).unwrap_or_else(|_| value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percent_decoding() {
        assert_eq!(percent_decode("%7B%22a%22%3A1%7D"), "{\"a\":1}");
        assert_eq!(percent_decode("plain"), "plain");
        assert_eq!(percent_decode("bad%"), "bad%");
    }

    #[test]
    fn plain_json_round_trips() {
        let json = r##"{
            "version": 2,
            "enabled": true,
            "backgroundColor": "#ffffff",
            "exportBounds": {"minX": 0.0, "minY": 0.0, "width": 100.0, "height": 50.0}
        }"##;

        let meta: ArtboardMetadata = serde_json::from_str(json).unwrap();
        assert_eq!(meta.version, 2);
        assert!(meta.enabled);
        assert_eq!(meta.export_bounds.width, 100.0);
    }

    #[test]
    fn missing_export_bounds_is_an_error() {
        let json = r#"{"version": 1, "enabled": true}"#;
        assert!(serde_json::from_str::<ArtboardMetadata>(json).is_err());
    }

    #[test]
    fn v1_background_is_not_remapped() {
        let mut meta = ArtboardMetadata {
            version: 1,
            enabled: true,
            selected_preset_id: None,
            custom_width: None,
            custom_height: None,
            background_color: Some("#000000".to_string()),
            show_margins: false,
            margin_size: None,
            export_bounds: ExportBounds {
                min_x: 0.0,
                min_y: 0.0,
                width: 10.0,
                height: 10.0,
            },
        };

        meta.remap_mono_background();
        assert_eq!(meta.background_color.as_deref(), Some("#000000"));

        meta.version = 2;
        meta.remap_mono_background();
        assert_eq!(meta.background_color.as_deref(), Some("#ffffff"));
    }
}
