use serde::{Deserialize, Serialize};

/// Registry entry describing where a remote app module lives. Created on
/// registration, removed on explicit unregister; never persisted across
/// sessions.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginDescriptor {
    pub name: String,
    pub path: String,
}

impl PluginDescriptor {
    pub fn new(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
        }
    }
}

/// What a remote service endpoint does.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ServiceKind {
    /// Runs a computation over the current network.
    Task,
    /// Contributes a panel to the workspace UI.
    Panel,
}

/// Remote service metadata exported by a loaded app module.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceDescriptor {
    pub name: String,
    pub endpoint: String,
    pub kind: ServiceKind,
}

/// The default module payload handed to the host workspace: the descriptor
/// the module was loaded from plus its exported service metadata.
///
/// Hosts with richer component types use `AppLoader` with their own payload
/// instead.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppModule {
    pub descriptor: PluginDescriptor,
    pub services: Vec<ServiceDescriptor>,
}
