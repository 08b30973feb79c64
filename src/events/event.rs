use serde::{Deserialize, Serialize};

/// A validated style became active on a view.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayloadStyleApplied {
    /// Number of explicitly mapped properties in the new style.
    pub mapped_properties: usize,
}

/// A candidate style failed validation; the previous style stays active.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayloadStyleRejected {
    pub reason: String,
}

/// A full or incremental resolution pass finished.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayloadViewRefreshed {
    pub nodes: usize,
    pub edges: usize,
}

/// A remote app module finished loading.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayloadPluginLoaded {
    pub name: String,
}

/// A remote app module failed to load; the host shows a retryable fallback.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayloadPluginFailed {
    pub name: String,
    pub reason: String,
}

/// Events published by the style engine and the app loader.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Event {
    StyleApplied(PayloadStyleApplied),
    StyleRejected(PayloadStyleRejected),
    ViewRefreshed(PayloadViewRefreshed),
    PluginLoaded(PayloadPluginLoaded),
    PluginFailed(PayloadPluginFailed),
}
