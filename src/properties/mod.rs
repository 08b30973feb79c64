mod value;

pub use value::{
    ArrowShape, Color, ColorParseError, HorizontalAlign, LineStyle, ShapeKind, ValueKind,
    VerticalAlign, Visibility, VisualValue,
};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error returned when a caller references a visual property name outside the
/// registry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown visual property: {name:?}")]
pub struct UnknownPropertyError {
    /// The unregistered name.
    pub name: String,
}

/// Which element kind a visual property applies to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ElementScope {
    Node,
    Edge,
    Network,
}

/// The closed set of visual property names.
///
/// Every property has exactly one scope and one [`ValueKind`]; both are
/// resolved by exhaustive `match`, so extending the set is a compile-checked
/// change.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum VisualProperty {
    // Node scope
    NodeShape,
    NodeFillColor,
    NodeBorderColor,
    NodeBorderWidth,
    NodeSize,
    NodeOpacity,
    NodeLabel,
    NodeLabelColor,
    NodeLabelFontSize,
    NodeLabelHorizontalAlign,
    NodeLabelVerticalAlign,
    NodeVisibility,
    NodeXPosition,
    NodeYPosition,
    // Edge scope
    EdgeLineColor,
    EdgeLineStyle,
    EdgeWidth,
    EdgeOpacity,
    EdgeLabel,
    EdgeLabelColor,
    EdgeLabelFontSize,
    EdgeSourceArrowShape,
    EdgeSourceArrowColor,
    EdgeTargetArrowShape,
    EdgeTargetArrowColor,
    EdgeVisibility,
    // Network scope
    NetworkBackgroundColor,
}

/// All registered properties, ordered node, edge, network.
const ALL: &[VisualProperty] = &[
    VisualProperty::NodeShape,
    VisualProperty::NodeFillColor,
    VisualProperty::NodeBorderColor,
    VisualProperty::NodeBorderWidth,
    VisualProperty::NodeSize,
    VisualProperty::NodeOpacity,
    VisualProperty::NodeLabel,
    VisualProperty::NodeLabelColor,
    VisualProperty::NodeLabelFontSize,
    VisualProperty::NodeLabelHorizontalAlign,
    VisualProperty::NodeLabelVerticalAlign,
    VisualProperty::NodeVisibility,
    VisualProperty::NodeXPosition,
    VisualProperty::NodeYPosition,
    VisualProperty::EdgeLineColor,
    VisualProperty::EdgeLineStyle,
    VisualProperty::EdgeWidth,
    VisualProperty::EdgeOpacity,
    VisualProperty::EdgeLabel,
    VisualProperty::EdgeLabelColor,
    VisualProperty::EdgeLabelFontSize,
    VisualProperty::EdgeSourceArrowShape,
    VisualProperty::EdgeSourceArrowColor,
    VisualProperty::EdgeTargetArrowShape,
    VisualProperty::EdgeTargetArrowColor,
    VisualProperty::EdgeVisibility,
    VisualProperty::NetworkBackgroundColor,
];

impl VisualProperty {
    /// Every registered property.
    pub fn all() -> &'static [VisualProperty] {
        ALL
    }

    /// Node-scoped properties.
    pub fn node_properties() -> impl Iterator<Item = VisualProperty> {
        ALL.iter()
            .copied()
            .filter(|p| p.scope() == ElementScope::Node)
    }

    /// Edge-scoped properties.
    pub fn edge_properties() -> impl Iterator<Item = VisualProperty> {
        ALL.iter()
            .copied()
            .filter(|p| p.scope() == ElementScope::Edge)
    }

    /// Network-scoped properties.
    pub fn network_properties() -> impl Iterator<Item = VisualProperty> {
        ALL.iter()
            .copied()
            .filter(|p| p.scope() == ElementScope::Network)
    }

    pub fn scope(self) -> ElementScope {
        match self {
            VisualProperty::NodeShape
            | VisualProperty::NodeFillColor
            | VisualProperty::NodeBorderColor
            | VisualProperty::NodeBorderWidth
            | VisualProperty::NodeSize
            | VisualProperty::NodeOpacity
            | VisualProperty::NodeLabel
            | VisualProperty::NodeLabelColor
            | VisualProperty::NodeLabelFontSize
            | VisualProperty::NodeLabelHorizontalAlign
            | VisualProperty::NodeLabelVerticalAlign
            | VisualProperty::NodeVisibility
            | VisualProperty::NodeXPosition
            | VisualProperty::NodeYPosition => ElementScope::Node,
            VisualProperty::EdgeLineColor
            | VisualProperty::EdgeLineStyle
            | VisualProperty::EdgeWidth
            | VisualProperty::EdgeOpacity
            | VisualProperty::EdgeLabel
            | VisualProperty::EdgeLabelColor
            | VisualProperty::EdgeLabelFontSize
            | VisualProperty::EdgeSourceArrowShape
            | VisualProperty::EdgeSourceArrowColor
            | VisualProperty::EdgeTargetArrowShape
            | VisualProperty::EdgeTargetArrowColor
            | VisualProperty::EdgeVisibility => ElementScope::Edge,
            VisualProperty::NetworkBackgroundColor => ElementScope::Network,
        }
    }

    pub fn value_kind(self) -> ValueKind {
        match self {
            VisualProperty::NodeFillColor
            | VisualProperty::NodeBorderColor
            | VisualProperty::NodeLabelColor
            | VisualProperty::EdgeLineColor
            | VisualProperty::EdgeLabelColor
            | VisualProperty::EdgeSourceArrowColor
            | VisualProperty::EdgeTargetArrowColor
            | VisualProperty::NetworkBackgroundColor => ValueKind::Color,
            VisualProperty::NodeShape => ValueKind::Shape,
            VisualProperty::EdgeLineStyle => ValueKind::LineStyle,
            VisualProperty::EdgeSourceArrowShape | VisualProperty::EdgeTargetArrowShape => {
                ValueKind::ArrowShape
            }
            VisualProperty::NodeLabelHorizontalAlign => ValueKind::HorizontalAlign,
            VisualProperty::NodeLabelVerticalAlign => ValueKind::VerticalAlign,
            VisualProperty::NodeVisibility | VisualProperty::EdgeVisibility => {
                ValueKind::Visibility
            }
            VisualProperty::NodeBorderWidth
            | VisualProperty::NodeSize
            | VisualProperty::NodeOpacity
            | VisualProperty::NodeLabelFontSize
            | VisualProperty::NodeXPosition
            | VisualProperty::NodeYPosition
            | VisualProperty::EdgeWidth
            | VisualProperty::EdgeOpacity
            | VisualProperty::EdgeLabelFontSize => ValueKind::Number,
            VisualProperty::NodeLabel | VisualProperty::EdgeLabel => ValueKind::Text,
        }
    }

    /// The baked-in default used when a style carries no mapping for the
    /// property.
    pub fn default_value(self) -> VisualValue {
        match self {
            VisualProperty::NodeShape => VisualValue::Shape(ShapeKind::Ellipse),
            VisualProperty::NodeFillColor => VisualValue::Color(Color::GRAY),
            VisualProperty::NodeBorderColor => VisualValue::Color(Color::DARK_GRAY),
            VisualProperty::NodeBorderWidth => VisualValue::Number(1.0),
            VisualProperty::NodeSize => VisualValue::Number(35.0),
            VisualProperty::NodeOpacity => VisualValue::Number(1.0),
            VisualProperty::NodeLabel => VisualValue::Text(String::new()),
            VisualProperty::NodeLabelColor => VisualValue::Color(Color::BLACK),
            VisualProperty::NodeLabelFontSize => VisualValue::Number(12.0),
            VisualProperty::NodeLabelHorizontalAlign => {
                VisualValue::HorizontalAlign(HorizontalAlign::Center)
            }
            VisualProperty::NodeLabelVerticalAlign => {
                VisualValue::VerticalAlign(VerticalAlign::Center)
            }
            VisualProperty::NodeVisibility => VisualValue::Visibility(Visibility::Visible),
            VisualProperty::NodeXPosition | VisualProperty::NodeYPosition => {
                VisualValue::Number(0.0)
            }
            VisualProperty::EdgeLineColor => VisualValue::Color(Color::DARK_GRAY),
            VisualProperty::EdgeLineStyle => VisualValue::LineStyle(LineStyle::Solid),
            VisualProperty::EdgeWidth => VisualValue::Number(2.0),
            VisualProperty::EdgeOpacity => VisualValue::Number(1.0),
            VisualProperty::EdgeLabel => VisualValue::Text(String::new()),
            VisualProperty::EdgeLabelColor => VisualValue::Color(Color::BLACK),
            VisualProperty::EdgeLabelFontSize => VisualValue::Number(10.0),
            VisualProperty::EdgeSourceArrowShape => VisualValue::ArrowShape(ArrowShape::None),
            VisualProperty::EdgeSourceArrowColor => VisualValue::Color(Color::DARK_GRAY),
            VisualProperty::EdgeTargetArrowShape => VisualValue::ArrowShape(ArrowShape::None),
            VisualProperty::EdgeTargetArrowColor => VisualValue::Color(Color::DARK_GRAY),
            VisualProperty::EdgeVisibility => VisualValue::Visibility(Visibility::Visible),
            VisualProperty::NetworkBackgroundColor => VisualValue::Color(Color::WHITE),
        }
    }

    /// Wire name of the property (the host's camel-case identifier).
    pub fn name(self) -> &'static str {
        match self {
            VisualProperty::NodeShape => "nodeShape",
            VisualProperty::NodeFillColor => "nodeFillColor",
            VisualProperty::NodeBorderColor => "nodeBorderColor",
            VisualProperty::NodeBorderWidth => "nodeBorderWidth",
            VisualProperty::NodeSize => "nodeSize",
            VisualProperty::NodeOpacity => "nodeOpacity",
            VisualProperty::NodeLabel => "nodeLabel",
            VisualProperty::NodeLabelColor => "nodeLabelColor",
            VisualProperty::NodeLabelFontSize => "nodeLabelFontSize",
            VisualProperty::NodeLabelHorizontalAlign => "nodeLabelHorizontalAlign",
            VisualProperty::NodeLabelVerticalAlign => "nodeLabelVerticalAlign",
            VisualProperty::NodeVisibility => "nodeVisibility",
            VisualProperty::NodeXPosition => "nodeXPosition",
            VisualProperty::NodeYPosition => "nodeYPosition",
            VisualProperty::EdgeLineColor => "edgeLineColor",
            VisualProperty::EdgeLineStyle => "edgeLineStyle",
            VisualProperty::EdgeWidth => "edgeWidth",
            VisualProperty::EdgeOpacity => "edgeOpacity",
            VisualProperty::EdgeLabel => "edgeLabel",
            VisualProperty::EdgeLabelColor => "edgeLabelColor",
            VisualProperty::EdgeLabelFontSize => "edgeLabelFontSize",
            VisualProperty::EdgeSourceArrowShape => "edgeSourceArrowShape",
            VisualProperty::EdgeSourceArrowColor => "edgeSourceArrowColor",
            VisualProperty::EdgeTargetArrowShape => "edgeTargetArrowShape",
            VisualProperty::EdgeTargetArrowColor => "edgeTargetArrowColor",
            VisualProperty::EdgeVisibility => "edgeVisibility",
            VisualProperty::NetworkBackgroundColor => "networkBackgroundColor",
        }
    }

    /// Looks up a property by its wire name.
    pub fn from_name(name: &str) -> Result<VisualProperty, UnknownPropertyError> {
        ALL.iter()
            .copied()
            .find(|p| p.name() == name)
            .ok_or_else(|| UnknownPropertyError {
                name: name.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_property_default_matches_declared_kind() {
        for p in VisualProperty::all() {
            assert_eq!(
                p.default_value().kind(),
                p.value_kind(),
                "default kind mismatch for {}",
                p.name()
            );
        }
    }

    #[test]
    fn names_round_trip() {
        for p in VisualProperty::all() {
            assert_eq!(VisualProperty::from_name(p.name()), Ok(*p));
        }
    }

    #[test]
    fn unknown_name_is_rejected() {
        let err = VisualProperty::from_name("nodeSparkle").unwrap_err();
        assert_eq!(err.name, "nodeSparkle");
    }

    #[test]
    fn scopes_partition_the_registry() {
        let node = VisualProperty::node_properties().count();
        let edge = VisualProperty::edge_properties().count();
        let network = VisualProperty::network_properties().count();
        assert_eq!(node + edge + network, VisualProperty::all().len());
    }
}
