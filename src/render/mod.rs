mod dictionary;

use std::collections::BTreeMap;

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::mapping::Mapping;
use crate::network_view::NetworkView;
use crate::properties::{ElementScope, VisualProperty, VisualValue};
use crate::style::VisualStyle;

use dictionary::{format_value, targets};

/// Value side of a renderer declaration: a literal, or a binding to an
/// element data attribute the renderer reads itself.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Declaration {
    Literal(String),
    Data(String),
}

impl std::fmt::Display for Declaration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Declaration::Literal(v) => write!(f, "{v}"),
            Declaration::Data(column) => write!(f, "data({column})"),
        }
    }
}

impl Serialize for Declaration {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// One renderer style rule: a selector plus its declarations.
///
/// Derived output, regenerated whenever the style or the translation
/// dictionary changes; serializes to the `{selector, style}` JSON records
/// the rendering library's stylesheet API consumes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StyleRule {
    pub selector: String,
    pub declarations: BTreeMap<String, Declaration>,
}

impl Serialize for StyleRule {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(2))?;
        map.serialize_entry("selector", &self.selector)?;
        map.serialize_entry("style", &self.declarations)?;
        map.end()
    }
}

impl StyleRule {
    fn new(selector: impl Into<String>) -> Self {
        Self {
            selector: selector.into(),
            declarations: BTreeMap::new(),
        }
    }

    fn push_literal(&mut self, property: VisualProperty, value: &VisualValue) {
        let Some(targets) = targets(property) else {
            return;
        };
        for t in targets {
            if let Some(formatted) = format_value(t.format, value) {
                self.declarations
                    .insert(t.name.to_string(), Declaration::Literal(formatted));
            }
        }
    }

    fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }
}

/// Translates a resolved view and its active style into renderer rules.
///
/// Emission strategy per property:
/// - passthrough without a column contributes to the scope's base rule
///   (`node` / `edge`) — one literal shared by every element;
/// - passthrough with a column becomes an attribute-guarded data-binding
///   rule (`node[col] { prop: data(col) }`) — no per-element precomputation;
/// - discrete/continuous mappings emit per-element literal rules
///   (`node#id`) from the view's resolved values;
/// - network-scoped values land on the `core` selector.
///
/// Properties absent from the translation dictionary are skipped.
pub fn renderer_rules(view: &NetworkView) -> Vec<StyleRule> {
    let style = view.style();
    let mut rules = Vec::new();

    rules.extend(base_rule("node", VisualProperty::node_properties(), style));
    rules.extend(base_rule("edge", VisualProperty::edge_properties(), style));
    rules.extend(data_rules(style));

    for node in view.node_views() {
        rules.extend(element_rule("node", node.id(), node.values(), style));
    }
    for edge in view.edge_views() {
        rules.extend(element_rule("edge", edge.id(), edge.values(), style));
    }

    let mut core = StyleRule::new("core");
    for property in VisualProperty::network_properties() {
        if let Some(value) = view.network_value(property) {
            core.push_literal(property, value);
        }
    }
    if !core.is_empty() {
        rules.push(core);
    }

    rules
}

/// Base rule for one scope: literals for every fixed (non-data-driven,
/// non-bound) property.
fn base_rule(
    selector: &str,
    properties: impl Iterator<Item = VisualProperty>,
    style: &VisualStyle,
) -> Option<StyleRule> {
    let mut rule = StyleRule::new(selector);
    for property in properties {
        match style.mapping(property) {
            None => rule.push_literal(property, &property.default_value()),
            Some(Mapping::Passthrough { column: None, default }) => {
                rule.push_literal(property, default);
            }
            // Bound or per-element mappings are emitted elsewhere.
            Some(_) => {}
        }
    }
    (!rule.is_empty()).then_some(rule)
}

/// Attribute data-binding rules for passthrough-with-column mappings,
/// grouped by (scope, column) so several properties bound to one column
/// share a selector.
fn data_rules(style: &VisualStyle) -> Vec<StyleRule> {
    let mut grouped: BTreeMap<String, StyleRule> = BTreeMap::new();

    for (property, mapping) in style.mappings() {
        let Mapping::Passthrough {
            column: Some(column),
            ..
        } = mapping
        else {
            continue;
        };
        let scope = match property.scope() {
            ElementScope::Node => "node",
            ElementScope::Edge => "edge",
            // Validation forbids bound mappings on network scope.
            ElementScope::Network => continue,
        };
        let Some(targets) = targets(property) else {
            continue;
        };

        let selector = format!("{scope}[{column}]");
        let rule = grouped
            .entry(selector.clone())
            .or_insert_with(|| StyleRule::new(selector));
        for t in targets {
            rule.declarations
                .insert(t.name.to_string(), Declaration::Data(column.clone()));
        }
    }

    grouped.into_values().collect()
}

/// Per-element rule carrying resolved values of data-driven mappings.
fn element_rule<'a>(
    scope: &str,
    id: &str,
    values: impl Iterator<Item = (VisualProperty, &'a VisualValue)>,
    style: &VisualStyle,
) -> Option<StyleRule> {
    let mut rule = StyleRule::new(format!("{scope}#{id}"));
    for (property, value) in values {
        let data_driven = style
            .mapping(property)
            .is_some_and(Mapping::is_data_driven);
        if data_driven {
            rule.push_literal(property, value);
        }
    }
    (!rule.is_empty()).then_some(rule)
}
