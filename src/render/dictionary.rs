use crate::properties::{VerticalAlign, VisualProperty, VisualValue};

/// How a visual value is rendered into a declaration string.
#[derive(Clone, Copy, Debug)]
pub(crate) enum ValueFormat {
    /// Enum keyword (`ellipse`, `dashed`, `top`, ...).
    Keyword,
    /// Hex color string.
    ColorHex,
    /// Bare number.
    Number,
    /// Free text.
    Text,
    /// Label offset derived from a vertical alignment value.
    ValignMargin,
}

/// One renderer declaration produced from a visual property.
#[derive(Clone, Copy, Debug)]
pub(crate) struct RendererTarget {
    /// Renderer-native property name.
    pub name: &'static str,
    pub format: ValueFormat,
}

const fn target(name: &'static str, format: ValueFormat) -> RendererTarget {
    RendererTarget { name, format }
}

/// Static translation dictionary: visual property → renderer declarations.
///
/// Properties may decompose into several declarations (`NodeSize` drives
/// both dimensions, label vertical alignment also derives a margin).
/// Properties with no entry here have no style-rule representation and are
/// omitted — node positions travel through the renderer's layout API
/// instead.
const DICTIONARY: &[(VisualProperty, &[RendererTarget])] = &[
    (
        VisualProperty::NodeShape,
        &[target("shape", ValueFormat::Keyword)],
    ),
    (
        VisualProperty::NodeFillColor,
        &[target("background-color", ValueFormat::ColorHex)],
    ),
    (
        VisualProperty::NodeBorderColor,
        &[target("border-color", ValueFormat::ColorHex)],
    ),
    (
        VisualProperty::NodeBorderWidth,
        &[target("border-width", ValueFormat::Number)],
    ),
    (
        VisualProperty::NodeSize,
        &[
            target("width", ValueFormat::Number),
            target("height", ValueFormat::Number),
        ],
    ),
    (
        VisualProperty::NodeOpacity,
        &[target("opacity", ValueFormat::Number)],
    ),
    (
        VisualProperty::NodeLabel,
        &[target("label", ValueFormat::Text)],
    ),
    (
        VisualProperty::NodeLabelColor,
        &[target("color", ValueFormat::ColorHex)],
    ),
    (
        VisualProperty::NodeLabelFontSize,
        &[target("font-size", ValueFormat::Number)],
    ),
    (
        VisualProperty::NodeLabelHorizontalAlign,
        &[target("text-halign", ValueFormat::Keyword)],
    ),
    (
        VisualProperty::NodeLabelVerticalAlign,
        &[
            target("text-valign", ValueFormat::Keyword),
            target("text-margin-y", ValueFormat::ValignMargin),
        ],
    ),
    (
        VisualProperty::NodeVisibility,
        &[target("display", ValueFormat::Keyword)],
    ),
    (
        VisualProperty::EdgeLineColor,
        &[target("line-color", ValueFormat::ColorHex)],
    ),
    (
        VisualProperty::EdgeLineStyle,
        &[target("line-style", ValueFormat::Keyword)],
    ),
    (
        VisualProperty::EdgeWidth,
        &[target("width", ValueFormat::Number)],
    ),
    (
        VisualProperty::EdgeOpacity,
        &[target("opacity", ValueFormat::Number)],
    ),
    (
        VisualProperty::EdgeLabel,
        &[target("label", ValueFormat::Text)],
    ),
    (
        VisualProperty::EdgeLabelColor,
        &[target("color", ValueFormat::ColorHex)],
    ),
    (
        VisualProperty::EdgeLabelFontSize,
        &[target("font-size", ValueFormat::Number)],
    ),
    (
        VisualProperty::EdgeSourceArrowShape,
        &[target("source-arrow-shape", ValueFormat::Keyword)],
    ),
    (
        VisualProperty::EdgeSourceArrowColor,
        &[target("source-arrow-color", ValueFormat::ColorHex)],
    ),
    (
        VisualProperty::EdgeTargetArrowShape,
        &[target("target-arrow-shape", ValueFormat::Keyword)],
    ),
    (
        VisualProperty::EdgeTargetArrowColor,
        &[target("target-arrow-color", ValueFormat::ColorHex)],
    ),
    (
        VisualProperty::EdgeVisibility,
        &[target("display", ValueFormat::Keyword)],
    ),
    (
        VisualProperty::NetworkBackgroundColor,
        &[target("background-color", ValueFormat::ColorHex)],
    ),
];

/// Renderer declarations for a property; `None` when the renderer has no
/// style-rule equivalent.
pub(crate) fn targets(property: VisualProperty) -> Option<&'static [RendererTarget]> {
    DICTIONARY
        .iter()
        .find(|(p, _)| *p == property)
        .map(|(_, t)| *t)
}

/// Formats a resolved value for one renderer target. `None` on a
/// format/kind mismatch, which the emission layer treats as "no
/// declaration".
pub(crate) fn format_value(format: ValueFormat, value: &VisualValue) -> Option<String> {
    match (format, value) {
        (ValueFormat::ColorHex, VisualValue::Color(c)) => Some(c.to_hex()),
        (ValueFormat::Number, VisualValue::Number(n)) => Some(format_number(*n)),
        (ValueFormat::Text, VisualValue::Text(s)) => Some(s.clone()),
        (ValueFormat::Keyword, v) => keyword(v),
        (ValueFormat::ValignMargin, VisualValue::VerticalAlign(align)) => {
            // Labels anchored to the top or bottom edge get a small offset
            // clearing the node border.
            let margin = match align {
                VerticalAlign::Top => -2.0,
                VerticalAlign::Center => 0.0,
                VerticalAlign::Bottom => 2.0,
            };
            Some(format_number(margin))
        }
        _ => None,
    }
}

fn keyword(value: &VisualValue) -> Option<String> {
    let name = match value {
        VisualValue::Shape(v) => v.css_name(),
        VisualValue::LineStyle(v) => v.css_name(),
        VisualValue::ArrowShape(v) => v.css_name(),
        VisualValue::HorizontalAlign(v) => v.css_name(),
        VisualValue::VerticalAlign(v) => v.css_name(),
        VisualValue::Visibility(v) => v.css_name(),
        VisualValue::Boolean(v) => {
            if *v {
                "true"
            } else {
                "false"
            }
        }
        _ => return None,
    };
    Some(name.to_string())
}

/// Numbers print without a trailing `.0` so `35.0` becomes `35`.
fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{n}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::properties::Color;

    #[test]
    fn every_entry_formats_its_property_default() {
        for p in VisualProperty::all() {
            let Some(targets) = targets(*p) else {
                continue;
            };
            for t in targets {
                assert!(
                    format_value(t.format, &p.default_value()).is_some(),
                    "dictionary entry {} cannot format default of {}",
                    t.name,
                    p.name()
                );
            }
        }
    }

    #[test]
    fn position_properties_have_no_entry() {
        assert!(targets(VisualProperty::NodeXPosition).is_none());
        assert!(targets(VisualProperty::NodeYPosition).is_none());
    }

    #[test]
    fn number_formatting_drops_integral_fraction() {
        assert_eq!(format_number(35.0), "35");
        assert_eq!(format_number(1.5), "1.5");
        assert_eq!(format_number(-2.0), "-2");
    }

    #[test]
    fn color_formats_as_hex() {
        assert_eq!(
            format_value(ValueFormat::ColorHex, &VisualValue::Color(Color::rgb(255, 0, 0))),
            Some("#ff0000".to_string())
        );
    }
}
