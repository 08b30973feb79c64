use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::properties::{VisualProperty, VisualValue};

/// Resolved visual state of one node: the concrete value of every node-scoped
/// property after mapping evaluation.
///
/// Owned exclusively by the `NetworkView` that created it; recomputed fully
/// or incrementally when the style or the underlying attributes change.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NodeView {
    id: String,
    values: BTreeMap<VisualProperty, VisualValue>,
}

impl NodeView {
    pub(crate) fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            values: BTreeMap::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn value(&self, property: VisualProperty) -> Option<&VisualValue> {
        self.values.get(&property)
    }

    /// Resolved values in registry order.
    pub fn values(&self) -> impl Iterator<Item = (VisualProperty, &VisualValue)> {
        self.values.iter().map(|(p, v)| (*p, v))
    }

    pub(crate) fn set_value(&mut self, property: VisualProperty, value: VisualValue) {
        self.values.insert(property, value);
    }
}
