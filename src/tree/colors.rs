// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Color-mode detection and mono-color remapping.
//!
//! A document authored against a dark canvas draws its line work in
//! white; imported into a light-canvas viewer it would vanish. When the
//! source and viewer conventions differ, literal black/white values are
//! swapped across the already-built tree. Geometry is untouched.

use std::collections::BTreeMap;
use std::str::FromStr;

use crate::tree::ImportedElement;

/// The canvas convention a document was authored against.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ColorMode {
    /// Dark strokes on a light background.
    Light,
    /// Light strokes on a dark background.
    Dark,
}

/// Guesses the color mode from a background color value.
///
/// Returns `None` for unparseable values and paint-server references.
pub fn color_mode_from_background(value: &str) -> Option<ColorMode> {
    let color = svgtypes::Color::from_str(value.trim()).ok()?;
    let luminance =
        0.299 * f64::from(color.red) + 0.587 * f64::from(color.green) + 0.114 * f64::from(color.blue);
    if luminance >= 128.0 {
        Some(ColorMode::Light)
    } else {
        Some(ColorMode::Dark)
    }
}

/// Swaps literal black/white values through the whole tree.
///
/// Runs only when `from != to`. Non-mono colors and paint-server
/// references pass through unchanged.
pub fn remap_mono_colors(elements: &mut [ImportedElement], from: ColorMode, to: ColorMode) {
    if from == to {
        return;
    }

    for element in elements {
        remap_element(element);
    }
}

fn remap_element(element: &mut ImportedElement) {
    match element {
        ImportedElement::Path(e) => {
            remap_style_value(&mut e.style.fill);
            remap_style_value(&mut e.style.stroke);
            remap_map(&mut e.style.extra);
        }
        ImportedElement::Group(g) => {
            for child in &mut g.children {
                remap_element(child);
            }
        }
        ImportedElement::Shape(e) => {
            remap_style_value(&mut e.style.fill);
            remap_style_value(&mut e.style.stroke);
            remap_map(&mut e.style.extra);
            remap_map(&mut e.attributes);
        }
        ImportedElement::Text(e) => {
            remap_style_value(&mut e.style.fill);
            remap_style_value(&mut e.style.stroke);
            remap_map(&mut e.style.extra);
            remap_map(&mut e.attributes);
        }
        ImportedElement::Image(_) => {}
        ImportedElement::ForeignObject(_) => {}
        ImportedElement::SymbolInstance(e) => {
            remap_map(&mut e.attributes);
        }
        ImportedElement::Use(_) => {}
        ImportedElement::EmbeddedSvg(_) => {}
    }
}

const COLOR_KEYS: &[&str] = &["fill", "stroke", "color", "stop-color"];

fn remap_map(map: &mut BTreeMap<String, String>) {
    for key in COLOR_KEYS {
        if let Some(value) = map.get(*key) {
            if let Some(swapped) = swap_mono(value) {
                map.insert((*key).to_string(), swapped);
            }
        }
    }
}

fn remap_style_value(value: &mut Option<String>) {
    if let Some(v) = value {
        if let Some(swapped) = swap_mono(v) {
            *value = Some(swapped);
        }
    }
}

/// Maps black to white and vice versa, in every literal spelling
/// (`#000`, `#000000`, `black`, `rgb(0,0,0)`, ...).
pub(crate) fn swap_mono(value: &str) -> Option<String> {
    let color = svgtypes::Color::from_str(value.trim()).ok()?;

    if color.red == 0 && color.green == 0 && color.blue == 0 {
        Some("#ffffff".to_string())
    } else if color.red == 255 && color.green == 255 && color.blue == 255 {
        Some("#000000".to_string())
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pathdata::PathData;
    use crate::tree::{Path, Style};

    #[test]
    fn mono_spellings_are_swapped() {
        assert_eq!(swap_mono("#000"), Some("#ffffff".to_string()));
        assert_eq!(swap_mono("white"), Some("#000000".to_string()));
        assert_eq!(swap_mono("rgb(255,255,255)"), Some("#000000".to_string()));
        assert_eq!(swap_mono("#ff0000"), None);
        assert_eq!(swap_mono("url(#g1)"), None);
    }

    #[test]
    fn background_luminance_detection() {
        assert_eq!(color_mode_from_background("#ffffff"), Some(ColorMode::Light));
        assert_eq!(color_mode_from_background("#1e1e1e"), Some(ColorMode::Dark));
        assert_eq!(color_mode_from_background("url(#p)"), None);
    }

    #[test]
    fn remap_walks_into_groups() {
        let mut data = PathData::new();
        data.push_move_to(0.0, 0.0);
        data.push_line_to(1.0, 1.0);

        let path = Path {
            source_id: None,
            data,
            style: Style {
                fill: Some("#000000".to_string()),
                stroke: Some("none".to_string()),
                ..Style::default()
            },
            transform: None,
            hidden: false,
            is_definition: false,
            text_path: None,
        };

        let mut tree = vec![ImportedElement::Group(Box::new(crate::tree::Group {
            source_id: None,
            children: vec![ImportedElement::Path(Box::new(path))],
            hidden: false,
            is_definition: false,
            text_path: None,
        }))];

        remap_mono_colors(&mut tree, ColorMode::Dark, ColorMode::Light);

        match &tree[0] {
            ImportedElement::Group(g) => match &g.children[0] {
                ImportedElement::Path(p) => {
                    assert_eq!(p.style.fill.as_deref(), Some("#ffffff"));
                    assert_eq!(p.style.stroke.as_deref(), Some("none"));
                }
                _ => unreachable!(),
            },
            _ => unreachable!(),
        }
    }
}
