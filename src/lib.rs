//! Visual style mapping engine for interactive network visualization.
//!
//! Translates renderer-independent visual properties — resolved per element
//! through passthrough, discrete, or continuous mapping functions over typed
//! attribute tables — into the selector/declaration style rules a rendering
//! library consumes, and loads independently built app modules into the host
//! workspace with per-module failure isolation.
//!
//! The pipeline: [`AttributeTable`] + [`VisualStyle`] → mapping evaluation →
//! [`NetworkView`] (resolved [`NodeView`]/[`EdgeView`] records) →
//! [`renderer_rules`] → rendering library.

#[cfg(feature = "events")]
pub mod events;

mod elements;
mod mapping;
mod network;
mod network_view;
mod plugins;
mod properties;
mod render;
mod style;
mod table;

pub use elements::{EdgeView, NodeView};
pub use mapping::{ControlPoint, InvalidMappingError, Mapping};
pub use network::{Network, NetworkEdge, NetworkNode};
pub use network_view::{ChangeSet, NetworkView, ViewStats};
pub use plugins::{
    AppLoader, AppModule, LoadFuture, PluginDescriptor, PluginFactory, PluginLoadError,
    PluginState, ServiceDescriptor, ServiceKind,
};
pub use properties::{
    ArrowShape, Color, ColorParseError, ElementScope, HorizontalAlign, LineStyle, ShapeKind,
    UnknownPropertyError, ValueKind, VerticalAlign, Visibility, VisualProperty, VisualValue,
};
pub use render::{renderer_rules, Declaration, StyleRule};
pub use style::VisualStyle;
pub use table::{
    AttrValue, AttributeTable, Column, ColumnType, DiscreteKey, TableError, TableSchema,
};
