use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::mapping::{InvalidMappingError, Mapping};
use crate::properties::{VisualProperty, VisualValue};
use crate::table::{AttributeTable, TableSchema};

/// A visual style: one [`Mapping`] per visual property.
///
/// Properties without an explicit mapping resolve through the registry
/// default. A style is a plain value; it only becomes active on a view after
/// [`VisualStyle::validate`] passes (see `NetworkView::apply_style`).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct VisualStyle {
    mappings: BTreeMap<VisualProperty, Mapping>,
}

impl VisualStyle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the mapping for a property, replacing any previous one.
    pub fn set(&mut self, property: VisualProperty, mapping: Mapping) -> &mut Self {
        self.mappings.insert(property, mapping);
        self
    }

    /// Builder-style variant of [`VisualStyle::set`].
    pub fn with(mut self, property: VisualProperty, mapping: Mapping) -> Self {
        self.mappings.insert(property, mapping);
        self
    }

    /// Removes the mapping for a property, reverting it to the registry
    /// default.
    pub fn unset(&mut self, property: VisualProperty) -> Option<Mapping> {
        self.mappings.remove(&property)
    }

    pub fn mapping(&self, property: VisualProperty) -> Option<&Mapping> {
        self.mappings.get(&property)
    }

    /// Explicitly mapped properties, in registry order.
    pub fn mappings(&self) -> impl Iterator<Item = (VisualProperty, &Mapping)> {
        self.mappings.iter().map(|(p, m)| (*p, m))
    }

    /// Resolves one property for one element: the explicit mapping when set,
    /// the registry default otherwise.
    pub fn resolve_value(
        &self,
        property: VisualProperty,
        element: &str,
        table: &AttributeTable,
    ) -> VisualValue {
        match self.mappings.get(&property) {
            Some(mapping) => mapping.evaluate(element, table),
            None => property.default_value(),
        }
    }

    /// The fixed value of a property that has no element context (network
    /// scope, or base defaults for the renderer adapter).
    pub fn default_of(&self, property: VisualProperty) -> VisualValue {
        match self.mappings.get(&property) {
            Some(
                Mapping::Passthrough { default, .. }
                | Mapping::Discrete { default, .. }
                | Mapping::Continuous { default, .. },
            ) => default.clone(),
            None => property.default_value(),
        }
    }

    /// Validates every mapping against the property registry and the table
    /// schema. Called once before a style becomes active; the per-element
    /// evaluation path relies on it and stays infallible.
    pub fn validate(&self, schema: &TableSchema) -> Result<(), InvalidMappingError> {
        for (property, mapping) in &self.mappings {
            mapping.validate(*property, schema)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::properties::Color;
    use crate::table::{Column, ColumnType};

    #[test]
    fn unset_properties_resolve_to_registry_default() {
        let style = VisualStyle::new();
        let table = AttributeTable::new();
        assert_eq!(
            style.resolve_value(VisualProperty::NodeFillColor, "n1", &table),
            VisualProperty::NodeFillColor.default_value()
        );
    }

    #[test]
    fn set_replaces_and_unset_reverts() {
        let mut style = VisualStyle::new();
        style.set(
            VisualProperty::NodeFillColor,
            Mapping::fixed(VisualValue::Color(Color::rgb(1, 2, 3))),
        );
        let table = AttributeTable::new();
        assert_eq!(
            style.resolve_value(VisualProperty::NodeFillColor, "n1", &table),
            VisualValue::Color(Color::rgb(1, 2, 3))
        );

        style.unset(VisualProperty::NodeFillColor);
        assert_eq!(
            style.resolve_value(VisualProperty::NodeFillColor, "n1", &table),
            VisualProperty::NodeFillColor.default_value()
        );
    }

    #[test]
    fn validate_surfaces_first_broken_mapping() {
        let mut t = AttributeTable::new();
        t.add_column(Column::new("w", ColumnType::Double)).unwrap();

        let style = VisualStyle::new().with(
            VisualProperty::NodeSize,
            Mapping::Discrete {
                column: "missing".into(),
                table: std::collections::HashMap::new(),
                default: VisualValue::Number(10.0),
            },
        );
        assert!(style.validate(&t.schema()).is_err());
    }
}
