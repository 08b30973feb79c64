use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::{Rc, Weak};

use futures::future::{LocalBoxFuture, Shared};
use futures::FutureExt;
use log::{debug, warn};

use super::{AppModule, PluginDescriptor, PluginLoadError};

#[cfg(feature = "events")]
use crate::events::{Event, EventSink, PayloadPluginFailed, PayloadPluginLoaded};

/// Future produced by a plugin factory.
pub type LoadFuture<M> = LocalBoxFuture<'static, Result<M, PluginLoadError>>;

/// Factory producing a module from its descriptor. Factories are registered
/// up front and resolved by name, so no string-path dynamic loading happens
/// at discovery time.
pub type PluginFactory<M> = Rc<dyn Fn(&PluginDescriptor) -> LoadFuture<M>>;

/// Lifecycle of one registered module.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PluginState {
    /// No registry entry, or registered but never requested.
    Unregistered,
    /// A fetch is in flight; concurrent requests attach to it.
    Discovering,
    /// Cached for the process lifetime.
    Loaded,
    /// The captured failure; a later load request retries.
    Failed(PluginLoadError),
}

enum Slot<M: Clone> {
    Idle,
    InFlight(Shared<LoadFuture<M>>),
    Loaded(M),
    Failed(PluginLoadError),
}

struct Entry<M: Clone> {
    descriptor: PluginDescriptor,
    factory: PluginFactory<M>,
    slot: Slot<M>,
    /// Bumped on (re-)registration so a stale in-flight fetch cannot write
    /// into a replaced entry.
    generation: u64,
}

type Entries<M> = Rc<RefCell<HashMap<String, Entry<M>>>>;

/// Loader and cache for independently built app modules.
///
/// Single-threaded and cooperative: the registry is the only shared mutable
/// structure, and every mutation happens between suspension points. A module
/// failure is local to its entry; successful loads are cached until explicit
/// unregistration.
pub struct AppLoader<M: Clone + 'static = AppModule> {
    entries: Entries<M>,

    #[cfg(feature = "events")]
    sink: Option<Rc<dyn EventSink>>,
}

impl<M: Clone + 'static> Default for AppLoader<M> {
    fn default() -> Self {
        Self {
            entries: Rc::default(),
            #[cfg(feature = "events")]
            sink: None,
        }
    }
}

impl<M: Clone + 'static> AppLoader<M> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attaches an event sink; load outcomes publish events to it.
    #[cfg(feature = "events")]
    pub fn with_event_sink(mut self, sink: Rc<dyn EventSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Registers a module. Re-registering a name replaces the previous entry
    /// and resets its state; an in-flight fetch of the old entry can no
    /// longer touch the new one.
    pub fn register(&self, descriptor: PluginDescriptor, factory: PluginFactory<M>) {
        let mut entries = self.entries.borrow_mut();
        let name = descriptor.name.clone();
        let generation = entries.get(&name).map_or(0, |e| e.generation + 1);
        entries.insert(
            name,
            Entry {
                descriptor,
                factory,
                slot: Slot::Idle,
                generation,
            },
        );
    }

    /// Removes a module from the registry, dropping any cached result.
    pub fn unregister(&self, name: &str) -> bool {
        self.entries.borrow_mut().remove(name).is_some()
    }

    /// Loads a module by name, entering `Discovering` unless a cached result
    /// exists.
    ///
    /// Concurrent calls for the same name share one underlying fetch; the
    /// caller that drives it to completion records the outcome once, and
    /// abandoning a caller leaves the shared fetch available to the others.
    /// A previous failure does not stick: the next call retries.
    pub async fn load(&self, name: &str) -> Result<M, PluginLoadError> {
        let shared = {
            let mut entries = self.entries.borrow_mut();
            let entry = entries
                .get_mut(name)
                .ok_or_else(|| PluginLoadError::Unregistered {
                    name: name.to_string(),
                })?;
            match &entry.slot {
                Slot::Loaded(module) => return Ok(module.clone()),
                Slot::InFlight(shared) => shared.clone(),
                Slot::Idle | Slot::Failed(_) => {
                    debug!("discovering app {name:?}");
                    let shared = self
                        .spawn_fetch(name, entry)
                        .shared();
                    entry.slot = Slot::InFlight(shared.clone());
                    shared
                }
            }
        };
        // The registry borrow is released; whichever caller polls first
        // drives the fetch.
        shared.await
    }

    /// Wraps the factory future so its completion writes the outcome back
    /// into the registry exactly once.
    fn spawn_fetch(&self, name: &str, entry: &Entry<M>) -> LoadFuture<M> {
        let fut = (entry.factory)(&entry.descriptor);
        let entries: Weak<_> = Rc::downgrade(&self.entries);
        let key = name.to_string();
        let generation = entry.generation;
        #[cfg(feature = "events")]
        let sink = self.sink.clone();

        async move {
            let result = fut.await;
            if let Some(entries) = entries.upgrade() {
                let mut entries = entries.borrow_mut();
                if let Some(entry) = entries.get_mut(&key) {
                    if entry.generation == generation {
                        entry.slot = match &result {
                            Ok(module) => Slot::Loaded(module.clone()),
                            Err(err) => {
                                warn!("app {key:?} failed to load: {err}");
                                Slot::Failed(err.clone())
                            }
                        };
                    }
                }
            }
            #[cfg(feature = "events")]
            if let Some(sink) = sink {
                sink.send_event(match &result {
                    Ok(_) => Event::PluginLoaded(PayloadPluginLoaded { name: key.clone() }),
                    Err(err) => Event::PluginFailed(PayloadPluginFailed {
                        name: key.clone(),
                        reason: err.to_string(),
                    }),
                });
            }
            result
        }
        .boxed_local()
    }

    /// Current lifecycle state of a module.
    pub fn state(&self, name: &str) -> PluginState {
        match self.entries.borrow().get(name) {
            None => PluginState::Unregistered,
            Some(entry) => match &entry.slot {
                // Registered but never requested: discovery not yet entered.
                Slot::Idle => PluginState::Unregistered,
                Slot::InFlight(_) => PluginState::Discovering,
                Slot::Loaded(_) => PluginState::Loaded,
                Slot::Failed(err) => PluginState::Failed(err.clone()),
            },
        }
    }

    /// The cached module, when loaded.
    pub fn module(&self, name: &str) -> Option<M> {
        match &self.entries.borrow().get(name)?.slot {
            Slot::Loaded(module) => Some(module.clone()),
            _ => None,
        }
    }

    pub fn is_registered(&self, name: &str) -> bool {
        self.entries.borrow().contains_key(name)
    }

    /// Descriptors of every registered module, name-ordered.
    pub fn descriptors(&self) -> Vec<PluginDescriptor> {
        let mut all: Vec<PluginDescriptor> = self
            .entries
            .borrow()
            .values()
            .map(|e| e.descriptor.clone())
            .collect();
        all.sort_by(|a, b| a.name.cmp(&b.name));
        all
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::executor::block_on;
    use futures::{join, pin_mut, poll};
    use std::future::Future;
    use std::pin::Pin;
    use std::task::{Context, Poll};

    /// Pends exactly once, then resolves; forces a load to stay in
    /// `Discovering` across one poll.
    struct YieldOnce(bool);

    impl Future for YieldOnce {
        type Output = ();

        fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
            if self.0 {
                Poll::Ready(())
            } else {
                self.0 = true;
                cx.waker().wake_by_ref();
                Poll::Pending
            }
        }
    }

    fn counting_factory(
        calls: Rc<RefCell<usize>>,
        fail_first: bool,
    ) -> PluginFactory<String> {
        Rc::new(move |descriptor: &PluginDescriptor| {
            let calls = calls.clone();
            let name = descriptor.name.clone();
            async move {
                YieldOnce(false).await;
                let n = {
                    let mut c = calls.borrow_mut();
                    *c += 1;
                    *c
                };
                if fail_first && n == 1 {
                    Err(PluginLoadError::Fetch {
                        name,
                        reason: "connection reset".into(),
                    })
                } else {
                    Ok(format!("component:{name}"))
                }
            }
            .boxed_local()
        })
    }

    #[test]
    fn concurrent_loads_share_one_fetch() {
        let loader: AppLoader<String> = AppLoader::new();
        let calls = Rc::new(RefCell::new(0));
        loader.register(
            PluginDescriptor::new("viz", "https://apps.example/viz.js"),
            counting_factory(calls.clone(), false),
        );

        let (a, b) = block_on(async { join!(loader.load("viz"), loader.load("viz")) });
        assert_eq!(a, Ok("component:viz".to_string()));
        assert_eq!(a, b);
        assert_eq!(*calls.borrow(), 1);
        assert_eq!(loader.state("viz"), PluginState::Loaded);
    }

    #[test]
    fn loaded_modules_are_cached() {
        let loader: AppLoader<String> = AppLoader::new();
        let calls = Rc::new(RefCell::new(0));
        loader.register(
            PluginDescriptor::new("viz", "https://apps.example/viz.js"),
            counting_factory(calls.clone(), false),
        );

        block_on(loader.load("viz")).unwrap();
        block_on(loader.load("viz")).unwrap();
        assert_eq!(*calls.borrow(), 1);
        assert_eq!(loader.module("viz"), Some("component:viz".to_string()));
    }

    #[test]
    fn failure_is_isolated_and_retryable() {
        let loader: AppLoader<String> = AppLoader::new();
        let ok_calls = Rc::new(RefCell::new(0));
        let bad_calls = Rc::new(RefCell::new(0));
        loader.register(
            PluginDescriptor::new("stable", "https://apps.example/stable.js"),
            counting_factory(ok_calls, false),
        );
        loader.register(
            PluginDescriptor::new("flaky", "https://apps.example/flaky.js"),
            counting_factory(bad_calls.clone(), true),
        );

        block_on(loader.load("stable")).unwrap();

        let err = block_on(loader.load("flaky")).unwrap_err();
        assert!(matches!(err, PluginLoadError::Fetch { .. }));
        assert_eq!(loader.state("flaky"), PluginState::Failed(err));
        // The failure did not disturb the loaded module.
        assert_eq!(loader.state("stable"), PluginState::Loaded);

        // A retry re-enters discovery and succeeds.
        assert_eq!(
            block_on(loader.load("flaky")),
            Ok("component:flaky".to_string())
        );
        assert_eq!(*bad_calls.borrow(), 2);
    }

    #[test]
    fn abandoned_caller_leaves_shared_fetch_usable() {
        let loader: AppLoader<String> = AppLoader::new();
        let calls = Rc::new(RefCell::new(0));
        loader.register(
            PluginDescriptor::new("viz", "https://apps.example/viz.js"),
            counting_factory(calls.clone(), false),
        );

        block_on(async {
            {
                let first = loader.load("viz");
                pin_mut!(first);
                // Drive into Discovering, then abandon the caller.
                assert!(poll!(first.as_mut()).is_pending());
            }
            assert_eq!(loader.state("viz"), PluginState::Discovering);

            // A later caller attaches to the same fetch and completes it.
            assert_eq!(loader.load("viz").await, Ok("component:viz".to_string()));
        });
        assert_eq!(*calls.borrow(), 1);
    }

    #[test]
    fn unknown_module_is_an_error() {
        let loader: AppLoader<String> = AppLoader::new();
        let err = block_on(loader.load("ghost")).unwrap_err();
        assert_eq!(
            err,
            PluginLoadError::Unregistered {
                name: "ghost".into()
            }
        );
    }

    #[test]
    fn unregister_drops_cache() {
        let loader: AppLoader<String> = AppLoader::new();
        let calls = Rc::new(RefCell::new(0));
        loader.register(
            PluginDescriptor::new("viz", "https://apps.example/viz.js"),
            counting_factory(calls, false),
        );
        block_on(loader.load("viz")).unwrap();

        assert!(loader.unregister("viz"));
        assert_eq!(loader.state("viz"), PluginState::Unregistered);
        assert!(loader.module("viz").is_none());
    }
}
