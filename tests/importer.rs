// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use svgimport::parser::svgtree::EId;
use svgimport::tree::{ImportedElement, NativeShape, Path, Style};
use svgimport::{
    ColorMode, Context, ElementImporter, ImportResult, Options, Registry, StyleExtractor,
    Transform,
};

fn import(svg: &str) -> ImportResult {
    ImportResult::from_str(svg, &Options::default(), &Registry::default()).unwrap()
}

fn import_with(svg: &str, opt: &Options) -> ImportResult {
    ImportResult::from_str(svg, opt, &Registry::default()).unwrap()
}

fn collect_paths(elements: &[ImportedElement]) -> Vec<&Path> {
    let mut paths = Vec::new();
    for element in elements {
        match element {
            ImportedElement::Path(p) => paths.push(p.as_ref()),
            ImportedElement::Group(g) => paths.extend(collect_paths(&g.children)),
            _ => {}
        }
    }
    paths
}

#[test]
fn transform_composition_first_written_outermost() {
    let ts = Transform::from_list_str("translate(10,20) scale(2)");
    assert_eq!(ts.apply(0.0, 0.0), (10.0, 20.0));
    assert_eq!(ts.apply(1.0, 0.0), (12.0, 20.0));
}

#[test]
fn user_space_gradient_preserves_transform() {
    let result = import(
        "<svg xmlns='http://www.w3.org/2000/svg' viewBox='0 0 100 100'>
            <defs>
                <linearGradient id='g' gradientUnits='userSpaceOnUse'/>
            </defs>
            <path id='p' transform='translate(10 0)' fill='url(#g)'
                  d='M 0 0 L 10 0 L 10 10 Z'/>
        </svg>",
    );

    let paths = collect_paths(&result.elements);
    let path = paths
        .iter()
        .find(|p| p.source_id.as_deref() == Some("p"))
        .unwrap();

    // Coordinates untouched, matrix kept.
    let ts = path.transform.unwrap();
    assert_eq!(ts.e, 10.0);
    assert_eq!(path.data.bbox().unwrap().left(), 0.0);
}

#[test]
fn object_bounding_box_gradient_bakes_transform() {
    let result = import(
        "<svg xmlns='http://www.w3.org/2000/svg' viewBox='0 0 100 100'>
            <defs>
                <linearGradient id='g' gradientUnits='objectBoundingBox'/>
            </defs>
            <path id='p' transform='translate(10 0)' fill='url(#g)'
                  d='M 0 0 L 10 0 L 10 10 Z'/>
        </svg>",
    );

    let paths = collect_paths(&result.elements);
    let path = paths
        .iter()
        .find(|p| p.source_id.as_deref() == Some("p"))
        .unwrap();

    assert!(path.transform.is_none());
    assert_eq!(path.data.bbox().unwrap().left(), 10.0);
}

#[test]
fn animate_transform_forces_preserve() {
    let result = import(
        "<svg xmlns='http://www.w3.org/2000/svg' viewBox='0 0 100 100'>
            <path id='p' transform='translate(5 0)' d='M 0 0 L 10 0'>
                <animateTransform attributeName='transform' type='rotate'
                                  from='0' to='360' dur='1s'/>
            </path>
        </svg>",
    );

    let paths = collect_paths(&result.elements);
    assert!(paths[0].transform.is_some());
    assert_eq!(paths[0].data.bbox().unwrap().left(), 0.0);
}

#[test]
fn empty_group_is_pruned() {
    let result = import(
        "<svg xmlns='http://www.w3.org/2000/svg' viewBox='0 0 100 100'>
            <g id='empty'><linearGradient id='g'/></g>
            <rect x='0' y='0' width='10' height='10'/>
        </svg>",
    );

    assert_eq!(result.elements.len(), 1);
    assert!(matches!(result.elements[0], ImportedElement::Path(_)));
}

#[test]
fn defs_content_is_retained_as_definition() {
    let result = import(
        "<svg xmlns='http://www.w3.org/2000/svg' viewBox='0 0 100 100'>
            <defs>
                <rect id='tpl' x='0' y='0' width='10' height='10'/>
            </defs>
            <rect x='20' y='20' width='10' height='10'/>
        </svg>",
    );

    let paths = collect_paths(&result.elements);
    let tpl = paths
        .iter()
        .find(|p| p.source_id.as_deref() == Some("tpl"))
        .unwrap();
    assert!(tpl.is_definition);
    assert!(tpl.hidden);

    // Definitions never count into the visible bounds.
    let bounds = result.bounds.unwrap();
    assert_eq!(bounds.left(), 20.0);
}

#[test]
fn attachment_prefers_visible_target_over_definition() {
    let result = import(
        "<svg xmlns='http://www.w3.org/2000/svg' viewBox='0 0 100 100'>
            <defs>
                <path id='wave' d='M 0 50 L 100 50'/>
            </defs>
            <path id='wave' d='M 0 20 L 100 20'/>
            <text><textPath href='#wave'>hello</textPath></text>
        </svg>",
    );

    let paths = collect_paths(&result.elements);
    let visible = paths
        .iter()
        .find(|p| p.source_id.as_deref() == Some("wave") && !p.is_definition)
        .unwrap();
    let definition = paths
        .iter()
        .find(|p| p.source_id.as_deref() == Some("wave") && p.is_definition)
        .unwrap();

    assert_eq!(visible.text_path.as_ref().unwrap().text, "hello");
    assert!(definition.text_path.is_none());

    // The text element itself became an invisible proxy group.
    let proxy = result.elements.iter().find_map(|e| match e {
        ImportedElement::Group(g) if g.text_path.is_some() => Some(g),
        _ => None,
    });
    assert!(proxy.unwrap().hidden);
}

#[test]
fn empty_text_on_path_is_dropped() {
    let result = import(
        "<svg xmlns='http://www.w3.org/2000/svg' viewBox='0 0 100 100'>
            <path id='wave' d='M 0 50 L 100 50'/>
            <text><textPath href='#wave'></textPath></text>
        </svg>",
    );

    assert_eq!(result.elements.len(), 1);
    let paths = collect_paths(&result.elements);
    assert!(paths[0].text_path.is_none());
}

#[test]
fn switch_picks_first_satisfied_child() {
    let result = import(
        "<svg xmlns='http://www.w3.org/2000/svg' viewBox='0 0 100 100'>
            <switch>
                <rect systemLanguage='zz' x='0' y='0' width='10' height='10'/>
                <rect x='30' y='0' width='10' height='10'/>
            </switch>
        </svg>",
    );

    assert_eq!(result.elements.len(), 1);
    assert_eq!(result.bounds.unwrap().left(), 30.0);
}

#[test]
fn switch_falls_back_to_first_child() {
    let result = import(
        "<svg xmlns='http://www.w3.org/2000/svg' viewBox='0 0 100 100'>
            <switch>
                <rect systemLanguage='zz' x='0' y='0' width='10' height='10'/>
                <rect systemLanguage='yy' x='30' y='0' width='10' height='10'/>
            </switch>
        </svg>",
    );

    assert_eq!(result.elements.len(), 1);
    assert_eq!(result.bounds.unwrap().left(), 0.0);
}

#[test]
fn circle_converts_to_four_cubics_with_exact_bounds() {
    let result = import(
        "<svg xmlns='http://www.w3.org/2000/svg' viewBox='-50 -50 100 100'>
            <circle cx='0' cy='0' r='10'/>
        </svg>",
    );

    let paths = collect_paths(&result.elements);
    // One move, four curves, one close.
    assert_eq!(paths[0].data.len(), 6);

    let bbox = paths[0].data.bbox().unwrap();
    assert!((bbox.left() - -10.0).abs() < 0.01);
    assert!((bbox.top() - -10.0).abs() < 0.01);
    assert!((bbox.right() - 10.0).abs() < 0.01);
    assert!((bbox.bottom() - 10.0).abs() < 0.01);
}

#[test]
fn reimporting_canonical_output_reproduces_bounds() {
    let original = import(
        "<svg xmlns='http://www.w3.org/2000/svg' viewBox='0 0 100 100'>
            <rect x='10' y='10' width='50' height='30'/>
        </svg>",
    );

    let canonical = import(
        "<svg xmlns='http://www.w3.org/2000/svg' viewBox='0 0 100 100'>
            <path d='M 10 10 L 60 10 L 60 40 L 10 40 Z'/>
        </svg>",
    );

    assert!(original
        .bounds
        .unwrap()
        .fuzzy_eq(&canonical.bounds.unwrap()));
}

#[test]
fn presentation_attribute_beats_style_beats_class() {
    let result = import(
        "<svg xmlns='http://www.w3.org/2000/svg' viewBox='0 0 100 100'>
            <style>.c { fill: #00ff00 }</style>
            <rect class='c' style='fill:#0000ff' fill='#ff0000'
                  x='0' y='0' width='10' height='10'/>
            <rect class='c' style='fill:#0000ff'
                  x='20' y='0' width='10' height='10'/>
            <rect class='c' x='40' y='0' width='10' height='10'/>
        </svg>",
    );

    let paths = collect_paths(&result.elements);
    assert_eq!(paths[0].style.fill.as_deref(), Some("#ff0000"));
    assert_eq!(paths[1].style.fill.as_deref(), Some("#0000ff"));
    assert_eq!(paths[2].style.fill.as_deref(), Some("#00ff00"));
}

#[test]
fn fill_inherits_from_group() {
    let result = import(
        "<svg xmlns='http://www.w3.org/2000/svg' viewBox='0 0 100 100'>
            <g fill='#123456'>
                <rect x='0' y='0' width='10' height='10'/>
            </g>
        </svg>",
    );

    let paths = collect_paths(&result.elements);
    assert_eq!(paths[0].style.fill.as_deref(), Some("#123456"));
    // Untouched defaults.
    assert_eq!(paths[0].style.stroke.as_deref(), Some("none"));
}

#[test]
fn rgba_fill_splits_into_color_and_opacity() {
    let result = import(
        "<svg xmlns='http://www.w3.org/2000/svg' viewBox='0 0 100 100'>
            <rect fill='rgba(255,0,0,0.5)' x='0' y='0' width='10' height='10'/>
        </svg>",
    );

    let paths = collect_paths(&result.elements);
    assert_eq!(paths[0].style.fill.as_deref(), Some("#ff0000"));
    assert!((paths[0].style.fill_opacity - 0.5).abs() < 0.01);
}

#[test]
fn animated_d_samples_first_value() {
    let result = import(
        "<svg xmlns='http://www.w3.org/2000/svg' viewBox='0 0 100 100'>
            <path>
                <animate attributeName='d'
                         values='M 0 0 L 10 0; M 0 0 L 20 0' dur='1s'/>
            </path>
        </svg>",
    );

    let paths = collect_paths(&result.elements);
    assert_eq!(paths.len(), 1);
    assert_eq!(paths[0].data.bbox().unwrap().right(), 10.0);
}

#[test]
fn animated_fill_samples_static_fallback() {
    let result = import(
        "<svg xmlns='http://www.w3.org/2000/svg' viewBox='0 0 100 100'>
            <rect x='0' y='0' width='10' height='10'>
                <animate attributeName='fill' from='#112233' to='#445566' dur='1s'/>
            </rect>
        </svg>",
    );

    let paths = collect_paths(&result.elements);
    assert_eq!(paths[0].style.fill.as_deref(), Some("#112233"));
}

#[test]
fn use_inline_clones_target() {
    let result = import(
        "<svg xmlns='http://www.w3.org/2000/svg' viewBox='0 0 100 100'>
            <rect id='r' x='0' y='0' width='10' height='10'/>
            <use href='#r' x='5' y='5'/>
        </svg>",
    );

    assert_eq!(result.elements.len(), 2);
    let clone = match &result.elements[1] {
        ImportedElement::Group(g) => g,
        other => panic!("expected a group, got {:?}", other),
    };

    // Cloned content answers to no id and is baked with the offset.
    let paths = collect_paths(&clone.children);
    assert_eq!(paths[0].source_id, None);
    assert_eq!(paths[0].data.bbox().unwrap().left(), 5.0);
}

#[test]
fn synthetic_group_id_avoids_document_ids() {
    let result = import(
        "<svg xmlns='http://www.w3.org/2000/svg' viewBox='0 0 100 100'>
            <rect id='group1' x='0' y='0' width='10' height='10'/>
            <g><use href='#group1'/></g>
        </svg>",
    );

    // The anonymous group must not shadow the document's own 'group1',
    // or the reference would be taken for a cycle.
    let group = match &result.elements[1] {
        ImportedElement::Group(g) => g,
        other => panic!("expected a group, got {:?}", other),
    };
    assert_ne!(group.source_id.as_deref(), Some("group1"));

    let paths = collect_paths(&group.children);
    assert_eq!(paths.len(), 1);
    assert_eq!(paths[0].data.bbox().unwrap().right(), 10.0);
}

#[test]
fn unresolved_use_becomes_opaque_leaf() {
    let result = import(
        "<svg xmlns='http://www.w3.org/2000/svg' viewBox='0 0 100 100'>
            <use href='#missing' width='40' height='20'/>
        </svg>",
    );

    let leaf = match &result.elements[0] {
        ImportedElement::Use(u) => u,
        other => panic!("expected a use leaf, got {:?}", other),
    };
    assert_eq!(leaf.href, "#missing");
    assert_eq!(leaf.width, Some(40.0));
    assert_eq!(leaf.height, Some(20.0));
}

#[test]
fn text_is_kept_native_with_font_defaults() {
    let result = import(
        "<svg xmlns='http://www.w3.org/2000/svg' viewBox='0 0 100 100'>
            <text x='10' y='20' font-size='20'>Hi</text>
        </svg>",
    );

    let text = match &result.elements[0] {
        ImportedElement::Text(t) => t,
        other => panic!("expected text, got {:?}", other),
    };
    assert_eq!(text.text, "Hi");
    // Explicit attribute kept, missing one filled from the defaults.
    assert_eq!(text.attributes.get("font-size").unwrap(), "20");
    assert_eq!(text.attributes.get("font-family").unwrap(), "Times New Roman");
}

#[test]
fn symbol_use_becomes_instance() {
    let result = import(
        "<svg xmlns='http://www.w3.org/2000/svg' viewBox='0 0 100 100'>
            <symbol id='s'>
                <rect x='0' y='0' width='10' height='10'/>
            </symbol>
            <use href='#s' x='5' y='5'/>
        </svg>",
    );

    let instance = result
        .elements
        .iter()
        .find_map(|e| match e {
            ImportedElement::SymbolInstance(s) => Some(s),
            _ => None,
        })
        .unwrap();
    assert_eq!(instance.symbol_id, "s");

    // The symbol body is also available as a definition.
    assert_eq!(result.plugin_imports["symbol"].len(), 1);
}

#[test]
fn nested_svg_is_captured_verbatim() {
    let result = import(
        "<svg xmlns='http://www.w3.org/2000/svg' viewBox='0 0 100 100'>
            <svg x='10' y='10' width='20' height='20'>
                <rect x='0' y='0' width='5' height='5'/>
            </svg>
        </svg>",
    );

    let embedded = match &result.elements[0] {
        ImportedElement::EmbeddedSvg(e) => e,
        other => panic!("expected embedded svg, got {:?}", other),
    };
    // The whole element, tags included, so the snippet re-parses alone.
    assert!(embedded.markup.starts_with("<svg"));
    assert!(embedded.markup.ends_with("</svg>"));
    assert!(embedded.markup.contains("<rect"));
    assert_eq!(embedded.attributes.get("x").unwrap(), "10");
}

#[test]
fn marker_and_mask_scans_always_run() {
    let result = import(
        "<svg xmlns='http://www.w3.org/2000/svg' viewBox='0 0 100 100'>
            <defs>
                <marker id='m1'><path d='M 0 0 L 5 5'/></marker>
                <mask id='k1'><rect x='0' y='0' width='10' height='10'/></mask>
            </defs>
            <rect x='0' y='0' width='10' height='10'/>
        </svg>",
    );

    assert_eq!(result.plugin_imports["marker"].len(), 1);
    assert!(result.plugin_imports["marker"][0].markup.contains("<marker"));
    assert_eq!(result.plugin_imports["mask"][0].id, "k1");
}

#[test]
fn artboard_metadata_is_decoded_and_excluded_from_content() {
    let result = import(
        "<svg xmlns='http://www.w3.org/2000/svg' viewBox='0 0 100 100'>
            <metadata id='artboard-metadata'>
                {\"version\":2,\"enabled\":true,\"backgroundColor\":\"#ffffff\",
                 \"exportBounds\":{\"minX\":0,\"minY\":0,\"width\":100,\"height\":100}}
            </metadata>
        </svg>",
    );

    let meta = result.artboard_metadata.unwrap();
    assert_eq!(meta.version, 2);
    assert!(meta.enabled);
    assert_eq!(meta.export_bounds.width, 100.0);
    assert!(result.elements.is_empty());
}

#[test]
fn missing_export_bounds_invalidates_metadata_block() {
    let result = ImportResult::from_str(
        "<svg xmlns='http://www.w3.org/2000/svg' viewBox='0 0 100 100'>
            <metadata id='artboard-metadata'>{\"version\":2}</metadata>
        </svg>",
        &Options::default(),
        &Registry::default(),
    );

    // No elements and no valid metadata: the whole import is rejected.
    assert!(matches!(result, Err(svgimport::Error::EmptyDocument)));
}

#[test]
fn color_mode_mismatch_remaps_mono_colors() {
    let opt = Options {
        color_mode: Some(ColorMode::Light),
        ..Options::default()
    };

    let result = import_with(
        "<svg xmlns='http://www.w3.org/2000/svg' viewBox='0 0 100 100'>
            <metadata id='artboard-metadata'>
                {\"version\":2,\"backgroundColor\":\"#000000\",
                 \"exportBounds\":{\"minX\":0,\"minY\":0,\"width\":100,\"height\":100}}
            </metadata>
            <rect fill='#ffffff' stroke='#ff0000' x='0' y='0' width='10' height='10'/>
        </svg>",
        &opt,
    );

    let paths = collect_paths(&result.elements);
    assert_eq!(paths[0].style.fill.as_deref(), Some("#000000"));
    // Non-mono values pass through.
    assert_eq!(paths[0].style.stroke.as_deref(), Some("#ff0000"));

    let meta = result.artboard_metadata.unwrap();
    assert_eq!(meta.background_color.as_deref(), Some("#ffffff"));
}

#[test]
fn resize_scales_coordinates_and_stroke() {
    let opt = Options {
        resize: Some((2.0, 2.0)),
        ..Options::default()
    };

    let result = import_with(
        "<svg xmlns='http://www.w3.org/2000/svg' viewBox='0 0 100 100'>
            <rect x='10' y='10' width='10' height='10' stroke-width='4'/>
        </svg>",
        &opt,
    );

    assert_eq!(result.size.width(), 200.0);
    let bounds = result.bounds.unwrap();
    assert_eq!(bounds.left(), 20.0);
    assert_eq!(bounds.right(), 40.0);

    let paths = collect_paths(&result.elements);
    assert_eq!(paths[0].style.stroke_width, 8.0);
}

#[test]
fn path_union_hook_replaces_flat_path_list() {
    let resolver = svgimport::PathUnionResolver {
        resolve: Box::new(|paths| {
            let mut union = svgimport::PathData::new();
            for path in paths {
                union.0.extend_from_slice(&path.0);
            }
            Some(union)
        }),
    };
    let opt = Options {
        path_union: Some(resolver),
        ..Options::default()
    };

    let result = import_with(
        "<svg xmlns='http://www.w3.org/2000/svg' viewBox='0 0 100 100'>
            <rect x='0' y='0' width='10' height='10'/>
            <rect x='20' y='0' width='10' height='10'/>
        </svg>",
        &opt,
    );

    assert_eq!(result.paths.len(), 1);
}

#[test]
fn imports_svgz_data() {
    use std::io::Write;

    let svg = "<svg xmlns='http://www.w3.org/2000/svg' viewBox='0 0 100 100'>
        <rect x='0' y='0' width='10' height='10'/>
    </svg>";

    let mut encoder =
        flate2::write::GzEncoder::new(Vec::new(), flate2::Compression::default());
    encoder.write_all(svg.as_bytes()).unwrap();
    let data = encoder.finish().unwrap();

    let result =
        ImportResult::from_data(&data, &Options::default(), &Registry::default()).unwrap();
    assert_eq!(result.elements.len(), 1);
}

#[test]
fn display_none_content_is_retained_hidden() {
    let result = import(
        "<svg xmlns='http://www.w3.org/2000/svg' viewBox='0 0 100 100'>
            <rect display='none' x='0' y='0' width='10' height='10'/>
            <rect x='20' y='0' width='10' height='10'/>
        </svg>",
    );

    assert_eq!(result.elements.len(), 2);
    let paths = collect_paths(&result.elements);
    assert!(paths[0].hidden);
    assert!(!paths[0].is_definition);
    assert_eq!(result.bounds.unwrap().left(), 20.0);
}

struct RectGrabber;

impl ElementImporter for RectGrabber {
    fn name(&self) -> &'static str {
        "rect-grabber"
    }

    fn priority(&self) -> i16 {
        10
    }

    fn import(&self, node: svgimport::parser::svgtree::SvgNode, ctx: &Context) -> Option<Vec<ImportedElement>> {
        if node.tag_name() != Some(EId::Rect) {
            return None;
        }

        Some(vec![ImportedElement::Shape(Box::new(NativeShape {
            source_id: None,
            kind: "rect".to_string(),
            attributes: Default::default(),
            style: ctx.resolve_style(node),
            transform: None,
            hidden: false,
            is_definition: false,
        }))])
    }
}

#[test]
fn custom_recognizer_wins_over_geometry_fallback() {
    let mut registry = Registry::with_builtins();
    registry.register_importer(Box::new(RectGrabber));

    let result = ImportResult::from_str(
        "<svg xmlns='http://www.w3.org/2000/svg' viewBox='0 0 100 100'>
            <rect fill='#ff0000' x='0' y='0' width='10' height='10'/>
        </svg>",
        &Options::default(),
        &registry,
    )
    .unwrap();

    let shape = match &result.elements[0] {
        ImportedElement::Shape(s) => s,
        other => panic!("expected a native shape, got {:?}", other),
    };
    assert_eq!(shape.kind, "rect");
    assert_eq!(shape.style.fill.as_deref(), Some("#ff0000"));
}

struct GlowExtractor;

impl StyleExtractor for GlowExtractor {
    fn extract(
        &self,
        _node: svgimport::parser::svgtree::SvgNode,
        _style: &Style,
    ) -> Vec<(String, String)> {
        vec![
            ("glow".to_string(), "1".to_string()),
            // Must be rejected, `fill` is core-resolved.
            ("fill".to_string(), "#00ff00".to_string()),
        ]
    }
}

#[test]
fn style_extensions_are_add_only() {
    let mut registry = Registry::with_builtins();
    registry.register_extractor(Box::new(GlowExtractor));

    let result = ImportResult::from_str(
        "<svg xmlns='http://www.w3.org/2000/svg' viewBox='0 0 100 100'>
            <rect fill='#ff0000' x='0' y='0' width='10' height='10'/>
        </svg>",
        &Options::default(),
        &registry,
    )
    .unwrap();

    let paths = collect_paths(&result.elements);
    assert_eq!(paths[0].style.fill.as_deref(), Some("#ff0000"));
    assert_eq!(paths[0].style.extra.get("glow").unwrap(), "1");
    assert!(!paths[0].style.extra.contains_key("fill"));
}

#[test]
fn unconvertible_document_is_rejected() {
    let result = ImportResult::from_str(
        "<svg xmlns='http://www.w3.org/2000/svg' viewBox='0 0 100 100'>
            <linearGradient id='g'/>
        </svg>",
        &Options::default(),
        &Registry::default(),
    );

    assert!(matches!(result, Err(svgimport::Error::EmptyDocument)));
}

#[test]
fn missing_root_is_a_parse_error() {
    let result = ImportResult::from_str(
        "<html xmlns='http://www.w3.org/1999/xhtml'></html>",
        &Options::default(),
        &Registry::default(),
    );

    assert!(matches!(result, Err(svgimport::Error::ParsingFailed(_))));
}
