mod loader;
mod module;

pub use loader::{AppLoader, LoadFuture, PluginFactory, PluginState};
pub use module::{AppModule, PluginDescriptor, ServiceDescriptor, ServiceKind};

use thiserror::Error;

/// Failure loading a remote app module. Always recoverable: the host renders
/// a fallback with a retry, and no failure touches other modules' state.
///
/// `Clone` because the loader shares one in-flight result between every
/// concurrent caller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PluginLoadError {
    #[error("app {name:?} is not registered")]
    Unregistered { name: String },

    #[error("fetching app {name:?} failed: {reason}")]
    Fetch { name: String, reason: String },

    #[error("instantiating app {name:?} failed: {reason}")]
    Instantiate { name: String, reason: String },
}
