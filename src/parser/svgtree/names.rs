// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/// SVG element names the importer recognizes.
///
/// Everything else stays in the XML tree as an unknown element and is
/// offered only to plugin recognizers.
#[allow(missing_docs)]
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum EId {
    A,
    Animate,
    AnimateMotion,
    AnimateTransform,
    Circle,
    Defs,
    Ellipse,
    Filter,
    ForeignObject,
    G,
    Image,
    Line,
    LinearGradient,
    Marker,
    Mask,
    Metadata,
    Path,
    Pattern,
    Polygon,
    Polyline,
    RadialGradient,
    Rect,
    Stop,
    Style,
    Svg,
    Switch,
    Symbol,
    Text,
    TextPath,
    Tspan,
    Use,
}

impl EId {
    pub(crate) fn from_str(s: &str) -> Option<Self> {
        let eid = match s {
            "a" => EId::A,
            "animate" => EId::Animate,
            "animateMotion" => EId::AnimateMotion,
            "animateTransform" => EId::AnimateTransform,
            "circle" => EId::Circle,
            "defs" => EId::Defs,
            "ellipse" => EId::Ellipse,
            "filter" => EId::Filter,
            "foreignObject" => EId::ForeignObject,
            "g" => EId::G,
            "image" => EId::Image,
            "line" => EId::Line,
            "linearGradient" => EId::LinearGradient,
            "marker" => EId::Marker,
            "mask" => EId::Mask,
            "metadata" => EId::Metadata,
            "path" => EId::Path,
            "pattern" => EId::Pattern,
            "polygon" => EId::Polygon,
            "polyline" => EId::Polyline,
            "radialGradient" => EId::RadialGradient,
            "rect" => EId::Rect,
            "stop" => EId::Stop,
            "style" => EId::Style,
            "svg" => EId::Svg,
            "switch" => EId::Switch,
            "symbol" => EId::Symbol,
            "text" => EId::Text,
            "textPath" => EId::TextPath,
            "tspan" => EId::Tspan,
            "use" => EId::Use,
            _ => return None,
        };

        Some(eid)
    }

    /// Returns the element name.
    pub fn to_str(self) -> &'static str {
        match self {
            EId::A => "a",
            EId::Animate => "animate",
            EId::AnimateMotion => "animateMotion",
            EId::AnimateTransform => "animateTransform",
            EId::Circle => "circle",
            EId::Defs => "defs",
            EId::Ellipse => "ellipse",
            EId::Filter => "filter",
            EId::ForeignObject => "foreignObject",
            EId::G => "g",
            EId::Image => "image",
            EId::Line => "line",
            EId::LinearGradient => "linearGradient",
            EId::Marker => "marker",
            EId::Mask => "mask",
            EId::Metadata => "metadata",
            EId::Path => "path",
            EId::Pattern => "pattern",
            EId::Polygon => "polygon",
            EId::Polyline => "polyline",
            EId::RadialGradient => "radialGradient",
            EId::Rect => "rect",
            EId::Stop => "stop",
            EId::Style => "style",
            EId::Svg => "svg",
            EId::Switch => "switch",
            EId::Symbol => "symbol",
            EId::Text => "text",
            EId::TextPath => "textPath",
            EId::Tspan => "tspan",
            EId::Use => "use",
        }
    }

    /// Checks if this is a
    /// [basic shape or path](https://www.w3.org/TR/SVG11/intro.html#TermGraphicsElement).
    pub fn is_shape(&self) -> bool {
        matches!(
            self,
            EId::Circle
                | EId::Ellipse
                | EId::Line
                | EId::Path
                | EId::Polygon
                | EId::Polyline
                | EId::Rect
        )
    }

    /// Checks if this is a
    /// [paint server element](https://www.w3.org/TR/SVG11/intro.html#TermPaint).
    pub fn is_paint_server(&self) -> bool {
        matches!(
            self,
            EId::LinearGradient | EId::RadialGradient | EId::Pattern
        )
    }

    /// Checks if this is an animation element.
    pub fn is_animation(&self) -> bool {
        matches!(
            self,
            EId::Animate | EId::AnimateMotion | EId::AnimateTransform
        )
    }
}

impl std::fmt::Display for EId {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.to_str())
    }
}

/// SVG attribute names the importer recognizes.
#[allow(missing_docs)]
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub enum AId {
    AttributeName,
    Class,
    Color,
    Cx,
    Cy,
    D,
    DataArtboard,
    Display,
    Fill,
    FillOpacity,
    FillRule,
    Filter,
    FilterUnits,
    FontFamily,
    FontSize,
    FontStyle,
    FontWeight,
    From,
    GradientUnits,
    Height,
    Href,
    Id,
    LetterSpacing,
    Opacity,
    PatternUnits,
    Points,
    PrimitiveUnits,
    R,
    RequiredExtensions,
    RequiredFeatures,
    Rx,
    Ry,
    StartOffset,
    Stroke,
    StrokeDasharray,
    StrokeDashoffset,
    StrokeLinecap,
    StrokeLinejoin,
    StrokeMiterlimit,
    StrokeOpacity,
    StrokeWidth,
    Style,
    SystemLanguage,
    TextAnchor,
    To,
    Transform,
    Values,
    ViewBox,
    Width,
    X,
    X1,
    X2,
    Y,
    Y1,
    Y2,
}

impl AId {
    pub(crate) fn from_str(s: &str) -> Option<Self> {
        let aid = match s {
            "attributeName" => AId::AttributeName,
            "class" => AId::Class,
            "color" => AId::Color,
            "cx" => AId::Cx,
            "cy" => AId::Cy,
            "d" => AId::D,
            "data-artboard" => AId::DataArtboard,
            "display" => AId::Display,
            "fill" => AId::Fill,
            "fill-opacity" => AId::FillOpacity,
            "fill-rule" => AId::FillRule,
            "filter" => AId::Filter,
            "filterUnits" => AId::FilterUnits,
            "font-family" => AId::FontFamily,
            "font-size" => AId::FontSize,
            "font-style" => AId::FontStyle,
            "font-weight" => AId::FontWeight,
            "from" => AId::From,
            "gradientUnits" => AId::GradientUnits,
            "height" => AId::Height,
            "href" => AId::Href,
            "id" => AId::Id,
            "letter-spacing" => AId::LetterSpacing,
            "opacity" => AId::Opacity,
            "patternUnits" => AId::PatternUnits,
            "points" => AId::Points,
            "primitiveUnits" => AId::PrimitiveUnits,
            "r" => AId::R,
            "requiredExtensions" => AId::RequiredExtensions,
            "requiredFeatures" => AId::RequiredFeatures,
            "rx" => AId::Rx,
            "ry" => AId::Ry,
            "startOffset" => AId::StartOffset,
            "stroke" => AId::Stroke,
            "stroke-dasharray" => AId::StrokeDasharray,
            "stroke-dashoffset" => AId::StrokeDashoffset,
            "stroke-linecap" => AId::StrokeLinecap,
            "stroke-linejoin" => AId::StrokeLinejoin,
            "stroke-miterlimit" => AId::StrokeMiterlimit,
            "stroke-opacity" => AId::StrokeOpacity,
            "stroke-width" => AId::StrokeWidth,
            "style" => AId::Style,
            "systemLanguage" => AId::SystemLanguage,
            "text-anchor" => AId::TextAnchor,
            "to" => AId::To,
            "transform" => AId::Transform,
            "values" => AId::Values,
            "viewBox" => AId::ViewBox,
            "width" => AId::Width,
            "x" => AId::X,
            "x1" => AId::X1,
            "x2" => AId::X2,
            "y" => AId::Y,
            "y1" => AId::Y1,
            "y2" => AId::Y2,
            _ => return None,
        };

        Some(aid)
    }

    /// Returns the attribute name.
    pub fn to_str(self) -> &'static str {
        match self {
            AId::AttributeName => "attributeName",
            AId::Class => "class",
            AId::Color => "color",
            AId::Cx => "cx",
            AId::Cy => "cy",
            AId::D => "d",
            AId::DataArtboard => "data-artboard",
            AId::Display => "display",
            AId::Fill => "fill",
            AId::FillOpacity => "fill-opacity",
            AId::FillRule => "fill-rule",
            AId::Filter => "filter",
            AId::FilterUnits => "filterUnits",
            AId::FontFamily => "font-family",
            AId::FontSize => "font-size",
            AId::FontStyle => "font-style",
            AId::FontWeight => "font-weight",
            AId::From => "from",
            AId::GradientUnits => "gradientUnits",
            AId::Height => "height",
            AId::Href => "href",
            AId::Id => "id",
            AId::LetterSpacing => "letter-spacing",
            AId::Opacity => "opacity",
            AId::PatternUnits => "patternUnits",
            AId::Points => "points",
            AId::PrimitiveUnits => "primitiveUnits",
            AId::R => "r",
            AId::RequiredExtensions => "requiredExtensions",
            AId::RequiredFeatures => "requiredFeatures",
            AId::Rx => "rx",
            AId::Ry => "ry",
            AId::StartOffset => "startOffset",
            AId::Stroke => "stroke",
            AId::StrokeDasharray => "stroke-dasharray",
            AId::StrokeDashoffset => "stroke-dashoffset",
            AId::StrokeLinecap => "stroke-linecap",
            AId::StrokeLinejoin => "stroke-linejoin",
            AId::StrokeMiterlimit => "stroke-miterlimit",
            AId::StrokeOpacity => "stroke-opacity",
            AId::StrokeWidth => "stroke-width",
            AId::Style => "style",
            AId::SystemLanguage => "systemLanguage",
            AId::TextAnchor => "text-anchor",
            AId::To => "to",
            AId::Transform => "transform",
            AId::Values => "values",
            AId::ViewBox => "viewBox",
            AId::Width => "width",
            AId::X => "x",
            AId::X1 => "x1",
            AId::X2 => "x2",
            AId::Y => "y",
            AId::Y1 => "y1",
            AId::Y2 => "y2",
        }
    }

    /// Checks if the attribute is a presentation attribute.
    pub(crate) fn is_presentation(&self) -> bool {
        matches!(
            self,
            AId::Color
                | AId::Display
                | AId::Fill
                | AId::FillOpacity
                | AId::FillRule
                | AId::Filter
                | AId::FontFamily
                | AId::FontSize
                | AId::FontStyle
                | AId::FontWeight
                | AId::LetterSpacing
                | AId::Opacity
                | AId::Stroke
                | AId::StrokeDasharray
                | AId::StrokeDashoffset
                | AId::StrokeLinecap
                | AId::StrokeLinejoin
                | AId::StrokeMiterlimit
                | AId::StrokeOpacity
                | AId::StrokeWidth
                | AId::TextAnchor
        )
    }

    /// Checks if the attribute is inheritable.
    pub(crate) fn is_inheritable(&self) -> bool {
        self.is_presentation() && !matches!(self, AId::Display | AId::Filter | AId::Opacity)
    }

    /// Checks if the `inherit` keyword is a valid value for this attribute.
    pub(crate) fn allows_inherit_value(&self) -> bool {
        self.is_presentation()
    }
}

impl std::fmt::Display for AId {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.to_str())
    }
}
