use std::collections::{BTreeMap, BTreeSet};

use instant::Instant;
use log::{debug, warn};

use crate::elements::{EdgeView, NodeView};
use crate::mapping::InvalidMappingError;
use crate::network::Network;
use crate::properties::{VisualProperty, VisualValue};
use crate::style::VisualStyle;
use crate::table::AttributeTable;

#[cfg(feature = "events")]
use crate::events::{
    Event, EventSink, PayloadStyleApplied, PayloadStyleRejected, PayloadViewRefreshed,
};

/// Bookkeeping of the last resolution pass.
#[derive(Clone, Copy, Debug, Default)]
pub struct ViewStats {
    /// Wall-clock time of the last full or incremental resolve (milliseconds).
    pub last_resolve_ms: f32,
    /// Node views touched by the last resolve.
    pub resolved_nodes: usize,
    /// Edge views touched by the last resolve.
    pub resolved_edges: usize,
}

/// What changed since the last resolution pass.
///
/// `None` on a dimension means "unrestricted": a change set with no element
/// filter touches every element, one with no property filter touches every
/// property.
#[derive(Clone, Debug, Default)]
pub struct ChangeSet {
    elements: Option<BTreeSet<String>>,
    properties: Option<BTreeSet<VisualProperty>>,
}

impl ChangeSet {
    /// Restricts the pass to the given element ids.
    pub fn elements<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            elements: Some(ids.into_iter().map(Into::into).collect()),
            properties: None,
        }
    }

    /// Restricts the pass to the given properties.
    pub fn properties<I>(properties: I) -> Self
    where
        I: IntoIterator<Item = VisualProperty>,
    {
        Self {
            elements: None,
            properties: Some(properties.into_iter().collect()),
        }
    }

    /// Restricts both dimensions.
    pub fn restricted<I, S, P>(ids: I, properties: P) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
        P: IntoIterator<Item = VisualProperty>,
    {
        Self {
            elements: Some(ids.into_iter().map(Into::into).collect()),
            properties: Some(properties.into_iter().collect()),
        }
    }

    fn includes_element(&self, id: &str) -> bool {
        self.elements.as_ref().is_none_or(|s| s.contains(id))
    }

    fn includes_property(&self, property: VisualProperty) -> bool {
        self.properties.as_ref().is_none_or(|s| s.contains(&property))
    }
}

/// Per-network resolved view: one [`NodeView`]/[`EdgeView`] per element,
/// holding the concrete value of every visual property under the active
/// style.
///
/// Created when a network is loaded, recomputed on style or attribute
/// change, discarded when the network is closed. Resolution is a pure
/// function of (topology, style, table): identical inputs yield identical
/// views, and an incremental pass equals the corresponding restriction of a
/// full pass.
pub struct NetworkView {
    node_views: BTreeMap<String, NodeView>,
    edge_views: BTreeMap<String, EdgeView>,
    network_values: BTreeMap<VisualProperty, VisualValue>,
    style: VisualStyle,
    stats: ViewStats,

    #[cfg(feature = "events")]
    sink: Option<std::rc::Rc<dyn EventSink>>,
}

impl NetworkView {
    /// Builds a view by validating `style` and fully resolving every element.
    pub fn new(
        network: &Network,
        style: VisualStyle,
        table: &AttributeTable,
    ) -> Result<Self, InvalidMappingError> {
        style.validate(&table.schema())?;

        let mut view = Self {
            node_views: BTreeMap::new(),
            edge_views: BTreeMap::new(),
            network_values: BTreeMap::new(),
            style,
            stats: ViewStats::default(),
            #[cfg(feature = "events")]
            sink: None,
        };
        view.full_resolve(network, table);
        Ok(view)
    }

    /// Attaches an event sink; subsequent style/resolve operations publish
    /// events to it.
    #[cfg(feature = "events")]
    pub fn with_event_sink(mut self, sink: std::rc::Rc<dyn EventSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    #[cfg(feature = "events")]
    fn emit(&self, event: Event) {
        if let Some(sink) = &self.sink {
            sink.send_event(event);
        }
    }

    /// Replaces the active style after validation.
    ///
    /// Reject-and-keep-previous: on error the current style and all resolved
    /// views are left untouched.
    pub fn apply_style(
        &mut self,
        style: VisualStyle,
        network: &Network,
        table: &AttributeTable,
    ) -> Result<(), InvalidMappingError> {
        if let Err(err) = style.validate(&table.schema()) {
            warn!("rejecting visual style: {err}");
            #[cfg(feature = "events")]
            self.emit(Event::StyleRejected(PayloadStyleRejected {
                reason: err.to_string(),
            }));
            return Err(err);
        }

        self.style = style;
        self.full_resolve(network, table);
        #[cfg(feature = "events")]
        self.emit(Event::StyleApplied(PayloadStyleApplied {
            mapped_properties: self.style.mappings().count(),
        }));
        Ok(())
    }

    /// Resolves every property of every element from scratch.
    pub fn full_resolve(&mut self, network: &Network, table: &AttributeTable) {
        let start = Instant::now();

        self.node_views = network
            .node_ids()
            .map(|id| {
                let mut view = NodeView::new(id);
                resolve_node(&mut view, &self.style, table);
                (id.to_string(), view)
            })
            .collect();

        self.edge_views = network
            .edge_ids()
            .filter_map(|id| network.edge(id))
            .map(|edge| {
                let mut view = EdgeView::new(edge.id(), edge.source(), edge.target());
                resolve_edge(&mut view, &self.style, table);
                (edge.id().to_string(), view)
            })
            .collect();

        self.network_values = VisualProperty::network_properties()
            .map(|p| (p, self.style.default_of(p)))
            .collect();

        self.stats = ViewStats {
            last_resolve_ms: start.elapsed().as_secs_f32() * 1000.0,
            resolved_nodes: self.node_views.len(),
            resolved_edges: self.edge_views.len(),
        };
        debug!(
            "full resolve: {} nodes, {} edges in {:.2}ms",
            self.stats.resolved_nodes, self.stats.resolved_edges, self.stats.last_resolve_ms
        );
        #[cfg(feature = "events")]
        self.emit(Event::ViewRefreshed(PayloadViewRefreshed {
            nodes: self.stats.resolved_nodes,
            edges: self.stats.resolved_edges,
        }));
    }

    /// Incrementally re-resolves the elements/properties named by `changes`.
    ///
    /// Produces exactly the state a full resolve would, restricted to the
    /// change set: stale views of removed elements are dropped, views for
    /// new elements are created, and untouched views keep their previous
    /// values.
    pub fn refresh(&mut self, network: &Network, table: &AttributeTable, changes: &ChangeSet) {
        let start = Instant::now();
        let mut resolved_nodes = 0;
        let mut resolved_edges = 0;

        // Elements removed from the network leave the view.
        let in_scope = |id: &str| changes.includes_element(id);
        self.node_views
            .retain(|id, _| !in_scope(id) || network.contains_node(id));
        self.edge_views
            .retain(|id, _| !in_scope(id) || network.contains_edge(id));

        for id in network.node_ids() {
            if !changes.includes_element(id) {
                continue;
            }
            let view = self
                .node_views
                .entry(id.to_string())
                .or_insert_with(|| NodeView::new(id));
            for property in VisualProperty::node_properties() {
                if changes.includes_property(property) {
                    view.set_value(property, self.style.resolve_value(property, id, table));
                }
            }
            resolved_nodes += 1;
        }

        for id in network.edge_ids() {
            if !changes.includes_element(id) {
                continue;
            }
            let Some(edge) = network.edge(id) else {
                continue;
            };
            let view = self
                .edge_views
                .entry(id.to_string())
                .or_insert_with(|| EdgeView::new(edge.id(), edge.source(), edge.target()));
            for property in VisualProperty::edge_properties() {
                if changes.includes_property(property) {
                    view.set_value(property, self.style.resolve_value(property, id, table));
                }
            }
            resolved_edges += 1;
        }

        for property in VisualProperty::network_properties() {
            if changes.includes_property(property) {
                self.network_values
                    .insert(property, self.style.default_of(property));
            }
        }

        self.stats = ViewStats {
            last_resolve_ms: start.elapsed().as_secs_f32() * 1000.0,
            resolved_nodes,
            resolved_edges,
        };
        debug!(
            "incremental resolve: {resolved_nodes} nodes, {resolved_edges} edges in {:.2}ms",
            self.stats.last_resolve_ms
        );
        #[cfg(feature = "events")]
        self.emit(Event::ViewRefreshed(PayloadViewRefreshed {
            nodes: resolved_nodes,
            edges: resolved_edges,
        }));
    }

    pub fn node_view(&self, id: &str) -> Option<&NodeView> {
        self.node_views.get(id)
    }

    pub fn edge_view(&self, id: &str) -> Option<&EdgeView> {
        self.edge_views.get(id)
    }

    /// Node views in id order.
    pub fn node_views(&self) -> impl Iterator<Item = &NodeView> {
        self.node_views.values()
    }

    /// Edge views in id order.
    pub fn edge_views(&self) -> impl Iterator<Item = &EdgeView> {
        self.edge_views.values()
    }

    /// Resolved value of a network-scoped property.
    pub fn network_value(&self, property: VisualProperty) -> Option<&VisualValue> {
        self.network_values.get(&property)
    }

    pub fn style(&self) -> &VisualStyle {
        &self.style
    }

    pub fn stats(&self) -> ViewStats {
        self.stats
    }
}

fn resolve_node(view: &mut NodeView, style: &VisualStyle, table: &AttributeTable) {
    let id = view.id().to_string();
    for property in VisualProperty::node_properties() {
        view.set_value(property, style.resolve_value(property, &id, table));
    }
}

fn resolve_edge(view: &mut EdgeView, style: &VisualStyle, table: &AttributeTable) {
    let id = view.id().to_string();
    for property in VisualProperty::edge_properties() {
        view.set_value(property, style.resolve_value(property, &id, table));
    }
}
