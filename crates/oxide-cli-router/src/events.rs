//! Failure notifications.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::error::Failure;

/// Name of the event fired when a run fails.
pub const ERROR: &str = "error";

/// A failure listener.
pub type Listener = Arc<dyn Fn(&Failure) + Send + Sync>;

/// Listeners by event name.
///
/// The router fires [`ERROR`] when a run fails, before the run's own future
/// resolves with the same failure. Other names are free for hosts to use.
#[derive(Clone, Default)]
pub struct Events {
    listeners: HashMap<String, Vec<Listener>>,
}

impl Events {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a listener.
    pub fn on<F>(&mut self, event: impl Into<String>, listener: F)
    where
        F: Fn(&Failure) + Send + Sync + 'static,
    {
        self.listeners
            .entry(event.into())
            .or_default()
            .push(Arc::new(listener));
    }

    /// Calls every listener for `event`, in registration order.
    ///
    /// Returns the number of listeners called.
    pub fn emit(&self, event: &str, failure: &Failure) -> usize {
        let Some(listeners) = self.listeners.get(event) else {
            return 0;
        };
        for listener in listeners {
            listener(failure);
        }
        listeners.len()
    }

    /// Number of listeners for `event`.
    pub fn listener_count(&self, event: &str) -> usize {
        self.listeners.get(event).map_or(0, Vec::len)
    }
}

impl fmt::Debug for Events {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.listeners.iter().map(|(k, v)| (k, v.len())))
            .finish()
    }
}
