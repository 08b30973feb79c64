mod event;
mod sink;

pub use event::{
    Event, PayloadPluginFailed, PayloadPluginLoaded, PayloadStyleApplied, PayloadStyleRejected,
    PayloadViewRefreshed,
};

pub use sink::EventSink;
