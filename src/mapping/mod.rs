use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::properties::{ElementScope, ValueKind, VisualProperty, VisualValue};
use crate::table::{AttributeTable, ColumnType, DiscreteKey, TableSchema};

/// Error raised when a mapping is structurally unsound for its property or
/// the table it reads from. Raised once, at style construction/validation
/// time — never during per-element evaluation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InvalidMappingError {
    #[error("{property:?} is network-scoped and only accepts a fixed default")]
    ScopeMismatch { property: VisualProperty },

    #[error("{property:?} expects {expected:?} values, mapping produces {actual:?}")]
    ValueKindMismatch {
        property: VisualProperty,
        expected: ValueKind,
        actual: ValueKind,
    },

    #[error("mapping for {property:?} references nonexistent column {column:?}")]
    MissingColumn {
        property: VisualProperty,
        column: String,
    },

    #[error("continuous mapping for {property:?} requires a numeric column, {column:?} is {ty:?}")]
    NonNumericColumn {
        property: VisualProperty,
        column: String,
        ty: ColumnType,
    },

    #[error("continuous mapping for {property:?}: {kind:?} values are not interpolable")]
    NonInterpolableKind {
        property: VisualProperty,
        kind: ValueKind,
    },

    #[error("continuous mapping for {property:?} has no control points")]
    NoControlPoints { property: VisualProperty },

    #[error("continuous mapping for {property:?} has non-ascending control points")]
    UnorderedControlPoints { property: VisualProperty },
}

/// One control point of a continuous mapping.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ControlPoint {
    /// Attribute domain value.
    pub input: f64,
    /// Visual value at that domain point.
    pub output: VisualValue,
}

impl ControlPoint {
    pub fn new(input: f64, output: VisualValue) -> Self {
        Self { input, output }
    }
}

/// The rule computing a visual property value for an element.
///
/// Evaluation is infallible: missing columns, rows, or unmapped values fall
/// back to the mapping's declared default. Structural problems are caught by
/// [`Mapping::validate`] before a style ever becomes active.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Mapping {
    /// Fixed value. When `column` is set, the renderer adapter additionally
    /// emits an attribute data-binding for this property; evaluation still
    /// returns `default` (the renderer reads the attribute itself).
    Passthrough {
        column: Option<String>,
        default: VisualValue,
    },
    /// Raw value → visual value lookup.
    Discrete {
        column: String,
        table: HashMap<DiscreteKey, VisualValue>,
        default: VisualValue,
    },
    /// Linear interpolation over a numeric column.
    Continuous {
        column: String,
        points: Vec<ControlPoint>,
        below: VisualValue,
        above: VisualValue,
        default: VisualValue,
    },
}

impl Mapping {
    /// Fixed-value mapping without an attribute binding.
    pub fn fixed(value: VisualValue) -> Self {
        Mapping::Passthrough {
            column: None,
            default: value,
        }
    }

    /// Passthrough bound to an attribute column.
    pub fn passthrough(column: impl Into<String>, default: VisualValue) -> Self {
        Mapping::Passthrough {
            column: Some(column.into()),
            default,
        }
    }

    /// The column this mapping reads, if any.
    pub fn column(&self) -> Option<&str> {
        match self {
            Mapping::Passthrough { column, .. } => column.as_deref(),
            Mapping::Discrete { column, .. } | Mapping::Continuous { column, .. } => {
                Some(column.as_str())
            }
        }
    }

    /// Whether this mapping is resolved per element (as opposed to a fixed
    /// default or a renderer-side data binding).
    pub fn is_data_driven(&self) -> bool {
        matches!(self, Mapping::Discrete { .. } | Mapping::Continuous { .. })
    }

    /// Computes the visual value for `element`. Never fails.
    pub fn evaluate(&self, element: &str, table: &AttributeTable) -> VisualValue {
        match self {
            Mapping::Passthrough { default, .. } => default.clone(),
            Mapping::Discrete {
                column,
                table: lookup,
                default,
            } => table
                .value(element, column)
                .and_then(crate::table::AttrValue::discrete_key)
                .and_then(|key| lookup.get(&key))
                .unwrap_or(default)
                .clone(),
            Mapping::Continuous {
                column,
                points,
                below,
                above,
                default,
            } => match table.value(element, column).and_then(|v| v.as_number()) {
                Some(input) => interpolate(points, below, above, input),
                None => default.clone(),
            },
        }
    }

    /// Validates this mapping for `property` against a table schema.
    pub fn validate(
        &self,
        property: VisualProperty,
        schema: &TableSchema,
    ) -> Result<(), InvalidMappingError> {
        let expected = property.value_kind();
        let check_kind = |value: &VisualValue| {
            if value.kind() == expected {
                Ok(())
            } else {
                Err(InvalidMappingError::ValueKindMismatch {
                    property,
                    expected,
                    actual: value.kind(),
                })
            }
        };
        let check_column = |column: &str| {
            if schema.contains(column) {
                Ok(())
            } else {
                Err(InvalidMappingError::MissingColumn {
                    property,
                    column: column.to_string(),
                })
            }
        };

        // Network-scoped properties have no backing element rows to map over.
        if property.scope() == ElementScope::Network && self.column().is_some() {
            return Err(InvalidMappingError::ScopeMismatch { property });
        }

        match self {
            Mapping::Passthrough { column, default } => {
                check_kind(default)?;
                if let Some(column) = column {
                    check_column(column)?;
                }
                Ok(())
            }
            Mapping::Discrete {
                column,
                table,
                default,
            } => {
                check_column(column)?;
                check_kind(default)?;
                for value in table.values() {
                    check_kind(value)?;
                }
                Ok(())
            }
            Mapping::Continuous {
                column,
                points,
                below,
                above,
                default,
            } => {
                check_column(column)?;
                if !expected.is_interpolable() {
                    return Err(InvalidMappingError::NonInterpolableKind {
                        property,
                        kind: expected,
                    });
                }
                // check_column guarantees presence.
                if let Some(ty) = schema.column_type(column) {
                    if !ty.is_numeric() {
                        return Err(InvalidMappingError::NonNumericColumn {
                            property,
                            column: column.clone(),
                            ty,
                        });
                    }
                }
                if points.is_empty() {
                    return Err(InvalidMappingError::NoControlPoints { property });
                }
                if points.windows(2).any(|w| w[0].input >= w[1].input) {
                    return Err(InvalidMappingError::UnorderedControlPoints { property });
                }
                for point in points {
                    check_kind(&point.output)?;
                }
                check_kind(below)?;
                check_kind(above)?;
                check_kind(default)
            }
        }
    }
}

/// Piecewise-linear interpolation over ascending control points.
fn interpolate(
    points: &[ControlPoint],
    below: &VisualValue,
    above: &VisualValue,
    input: f64,
) -> VisualValue {
    let (Some(first), Some(last)) = (points.first(), points.last()) else {
        return below.clone();
    };
    if input < first.input {
        return below.clone();
    }
    if input > last.input {
        return above.clone();
    }

    for pair in points.windows(2) {
        let (a, b) = (&pair[0], &pair[1]);
        if input < a.input || input > b.input {
            continue;
        }
        if input == a.input {
            return a.output.clone();
        }
        if input == b.input {
            return b.output.clone();
        }
        let t = (input - a.input) / (b.input - a.input);
        if let Some(value) = a.output.lerp(&b.output, t) {
            return value;
        }
    }

    // Single control point, or a kind drift that validation excludes.
    first.output.clone()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::properties::Color;
    use crate::table::Column;

    fn table() -> AttributeTable {
        let mut t = AttributeTable::new();
        t.add_column(Column::new("type", ColumnType::String)).unwrap();
        t.add_column(Column::new("score", ColumnType::Double)).unwrap();
        t.add_column(Column::new("flag", ColumnType::Boolean)).unwrap();
        t.set("n1", "type", "A").unwrap();
        t.set("n2", "type", "B").unwrap();
        t.set("n1", "score", 50.0).unwrap();
        t.set("n3", "score", -5.0).unwrap();
        t.set("n4", "score", 150.0).unwrap();
        t
    }

    fn discrete() -> Mapping {
        Mapping::Discrete {
            column: "type".into(),
            table: HashMap::from([(
                DiscreteKey::from("A"),
                VisualValue::Color(Color::rgb(255, 0, 0)),
            )]),
            default: VisualValue::Color(Color::GRAY),
        }
    }

    fn continuous() -> Mapping {
        Mapping::Continuous {
            column: "score".into(),
            points: vec![
                ControlPoint::new(0.0, VisualValue::Number(10.0)),
                ControlPoint::new(100.0, VisualValue::Number(50.0)),
            ],
            below: VisualValue::Number(5.0),
            above: VisualValue::Number(60.0),
            default: VisualValue::Number(35.0),
        }
    }

    #[test]
    fn passthrough_returns_default_unconditionally() {
        let t = table();
        let m = Mapping::passthrough("type", VisualValue::Text("x".into()));
        assert_eq!(m.evaluate("n1", &t), VisualValue::Text("x".into()));
        assert_eq!(m.evaluate("ghost", &t), VisualValue::Text("x".into()));
    }

    #[test]
    fn discrete_hits_and_falls_back() {
        let t = table();
        let m = discrete();
        assert_eq!(
            m.evaluate("n1", &t),
            VisualValue::Color(Color::rgb(255, 0, 0))
        );
        // "B" is not a key; absent element has no row at all.
        assert_eq!(m.evaluate("n2", &t), VisualValue::Color(Color::GRAY));
        assert_eq!(m.evaluate("ghost", &t), VisualValue::Color(Color::GRAY));
    }

    #[test]
    fn continuous_interpolates_and_clamps() {
        let t = table();
        let m = continuous();
        assert_eq!(m.evaluate("n1", &t), VisualValue::Number(30.0));
        assert_eq!(m.evaluate("n3", &t), VisualValue::Number(5.0));
        assert_eq!(m.evaluate("n4", &t), VisualValue::Number(60.0));
        // Absent attribute falls back to the mapping default, not below/above.
        assert_eq!(m.evaluate("ghost", &t), VisualValue::Number(35.0));
    }

    #[test]
    fn continuous_exact_control_point_hit() {
        let mut t = table();
        t.set("n5", "score", 0.0).unwrap();
        t.set("n6", "score", 100.0).unwrap();
        let m = continuous();
        assert_eq!(m.evaluate("n5", &t), VisualValue::Number(10.0));
        assert_eq!(m.evaluate("n6", &t), VisualValue::Number(50.0));
    }

    #[test]
    fn continuous_color_interpolation_is_channelwise() {
        let mut t = AttributeTable::new();
        t.add_column(Column::new("score", ColumnType::Double)).unwrap();
        t.set("n1", "score", 50.0).unwrap();

        let m = Mapping::Continuous {
            column: "score".into(),
            points: vec![
                ControlPoint::new(0.0, VisualValue::Color(Color::rgb(0, 0, 0))),
                ControlPoint::new(100.0, VisualValue::Color(Color::rgb(200, 100, 50))),
            ],
            below: VisualValue::Color(Color::BLACK),
            above: VisualValue::Color(Color::WHITE),
            default: VisualValue::Color(Color::GRAY),
        };
        assert_eq!(
            m.evaluate("n1", &t),
            VisualValue::Color(Color::rgb(100, 50, 25))
        );
    }

    #[test]
    fn continuous_on_boolean_column_is_invalid() {
        let schema = table().schema();
        let m = Mapping::Continuous {
            column: "flag".into(),
            points: vec![ControlPoint::new(0.0, VisualValue::Number(1.0))],
            below: VisualValue::Number(0.0),
            above: VisualValue::Number(2.0),
            default: VisualValue::Number(1.0),
        };
        let err = m.validate(VisualProperty::NodeSize, &schema).unwrap_err();
        assert!(matches!(err, InvalidMappingError::NonNumericColumn { .. }));
    }

    #[test]
    fn continuous_on_enum_kind_is_invalid_at_construction() {
        let schema = table().schema();
        let m = Mapping::Continuous {
            column: "score".into(),
            points: vec![ControlPoint::new(
                0.0,
                VisualValue::Shape(crate::properties::ShapeKind::Ellipse),
            )],
            below: VisualValue::Shape(crate::properties::ShapeKind::Ellipse),
            above: VisualValue::Shape(crate::properties::ShapeKind::Ellipse),
            default: VisualValue::Shape(crate::properties::ShapeKind::Ellipse),
        };
        let err = m.validate(VisualProperty::NodeShape, &schema).unwrap_err();
        assert!(matches!(err, InvalidMappingError::NonInterpolableKind { .. }));
    }

    #[test]
    fn discrete_on_missing_column_is_invalid() {
        let schema = table().schema();
        let err = Mapping::Discrete {
            column: "nope".into(),
            table: HashMap::new(),
            default: VisualValue::Color(Color::GRAY),
        }
        .validate(VisualProperty::NodeFillColor, &schema)
        .unwrap_err();
        assert_eq!(
            err,
            InvalidMappingError::MissingColumn {
                property: VisualProperty::NodeFillColor,
                column: "nope".into()
            }
        );
    }

    #[test]
    fn unordered_control_points_are_invalid() {
        let schema = table().schema();
        let m = Mapping::Continuous {
            column: "score".into(),
            points: vec![
                ControlPoint::new(10.0, VisualValue::Number(1.0)),
                ControlPoint::new(10.0, VisualValue::Number(2.0)),
            ],
            below: VisualValue::Number(0.0),
            above: VisualValue::Number(3.0),
            default: VisualValue::Number(1.0),
        };
        let err = m.validate(VisualProperty::NodeSize, &schema).unwrap_err();
        assert!(matches!(
            err,
            InvalidMappingError::UnorderedControlPoints { .. }
        ));
    }

    #[test]
    fn value_kind_mismatch_is_invalid() {
        let schema = table().schema();
        let err = Mapping::fixed(VisualValue::Number(4.0))
            .validate(VisualProperty::NodeFillColor, &schema)
            .unwrap_err();
        assert!(matches!(err, InvalidMappingError::ValueKindMismatch { .. }));
    }

    #[test]
    fn network_property_rejects_data_driven_mapping() {
        let schema = table().schema();
        let err = Mapping::passthrough("type", VisualValue::Color(Color::WHITE))
            .validate(VisualProperty::NetworkBackgroundColor, &schema)
            .unwrap_err();
        assert_eq!(
            err,
            InvalidMappingError::ScopeMismatch {
                property: VisualProperty::NetworkBackgroundColor
            }
        );
    }
}
