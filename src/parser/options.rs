// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use crate::geom::Size;
use crate::pathdata::PathData;
use crate::tree::colors::ColorMode;

/// A path boolean-union collaborator.
///
/// Receives every path produced by an import and returns one compound
/// path, or `None` to leave the result untouched.
pub type PathUnionFn<'a> = Box<dyn Fn(&[PathData]) -> Option<PathData> + Send + Sync + 'a>;

/// A boolean-union hook.
///
/// Path unioning needs a real geometry kernel, which the importer does
/// not ship. The editor passes its own.
pub struct PathUnionResolver<'a> {
    /// The union function itself.
    pub resolve: PathUnionFn<'a>,
}

impl std::fmt::Debug for PathUnionResolver<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("PathUnionResolver { .. }")
    }
}

/// Processing options.
#[derive(Debug)]
pub struct Options<'a> {
    /// Target DPI.
    ///
    /// Impacts units conversion.
    ///
    /// Default: 96.0
    pub dpi: f64,

    /// A default font family.
    ///
    /// Will be used when no `font-family` attribute is set in the SVG.
    ///
    /// Default: Times New Roman
    pub font_family: String,

    /// A default font size.
    ///
    /// Will be used when no `font-size` attribute is set in the SVG.
    ///
    /// Default: 12
    pub font_size: f64,

    /// A list of languages.
    ///
    /// Will be used to resolve a `systemLanguage` conditional attribute.
    ///
    /// Format: en, en-US.
    ///
    /// Default: `[en]`
    pub languages: Vec<String>,

    /// Default viewport size to assume if there is no `viewBox` attribute and
    /// the `width` or `height` attributes are relative.
    ///
    /// Default: `(100, 100)`
    pub default_size: Size,

    /// The viewer's canvas convention.
    ///
    /// When set and the imported document was authored against the
    /// opposite convention, literal black/white values are remapped.
    ///
    /// Default: `None` (no remapping)
    pub color_mode: Option<ColorMode>,

    /// Post-processing scale factors applied to the whole result,
    /// coordinates and stroke widths alike.
    ///
    /// Default: `None`
    pub resize: Option<(f64, f64)>,

    /// When set, all resulting geometry is additionally unioned into one
    /// compound path stored in the result.
    ///
    /// Default: `None`
    pub path_union: Option<PathUnionResolver<'a>>,
}

impl Default for Options<'_> {
    fn default() -> Options<'static> {
        Options {
            dpi: 96.0,
            // Default font is user-agent dependent so we can use whichever we like.
            font_family: "Times New Roman".to_owned(),
            font_size: 12.0,
            languages: vec!["en".to_string()],
            default_size: Size::from_wh(100.0, 100.0).unwrap(),
            color_mode: None,
            resize: None,
            path_union: None,
        }
    }
}
