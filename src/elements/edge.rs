use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::properties::{VisualProperty, VisualValue};

/// Resolved visual state of one edge, plus its endpoint ids for the
/// renderer's element data record.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EdgeView {
    id: String,
    source: String,
    target: String,
    values: BTreeMap<VisualProperty, VisualValue>,
}

impl EdgeView {
    pub(crate) fn new(
        id: impl Into<String>,
        source: impl Into<String>,
        target: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            source: source.into(),
            target: target.into(),
            values: BTreeMap::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn target(&self) -> &str {
        &self.target
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
