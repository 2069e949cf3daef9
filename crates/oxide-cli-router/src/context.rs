//! Per-run execution context.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use oxide_args::{Args, Value};
use serde_json::Value as JsonValue;

use crate::path::Params;

/// State shared by every stage of one run.
///
/// A context is created by [`Router::run`](crate::Router::run), handed down
/// the chain by `&mut` reborrow and dropped when the run settles. Stages
/// communicate through [`insert`](Self::insert) / [`get`](Self::get), which
/// store one value per type.
pub struct Context {
    /// The routed path: the first positional token, or `""`.
    pub path: String,
    /// The raw argv with the routed token removed.
    pub argv: Vec<String>,
    /// Parsed flags and the remaining positional tokens.
    pub args: Args,
    /// Parameters captured by the pattern of the running stage.
    pub params: Params,
    /// Data attached to the route of the running stage.
    pub data: Option<Arc<JsonValue>>,
    extensions: HashMap<TypeId, Box<dyn Any + Send + Sync>>,
}

impl Context {
    /// Creates a context.
    pub fn new(path: impl Into<String>, argv: Vec<String>, args: Args) -> Self {
        Self {
            path: path.into(),
            argv,
            args,
            params: Params::new(),
            data: None,
            extensions: HashMap::new(),
        }
    }

    /// Gets a flag value.
    pub fn flag(&self, name: &str) -> Option<&Value> {
        self.args.get(name)
    }

    /// Data attached to the running stage's route, if any.
    pub fn data(&self) -> Option<&JsonValue> {
        self.data.as_deref()
    }

    /// The positional tokens left after routing.
    pub fn positional(&self) -> &[String] {
        &self.args.positional
    }

    /// Stores a value, returning the previous value of the same type.
    pub fn insert<T: Send + Sync + 'static>(&mut self, value: T) -> Option<T> {
        self.extensions
            .insert(TypeId::of::<T>(), Box::new(value))
            .and_then(|old| old.downcast().ok().map(|b: Box<T>| *b))
    }

    /// Gets a stored value.
    pub fn get<T: Send + Sync + 'static>(&self) -> Option<&T> {
        self.extensions
            .get(&TypeId::of::<T>())
            .and_then(|v| v.downcast_ref())
    }

    /// Gets a stored value mutably.
    pub fn get_mut<T: Send + Sync + 'static>(&mut self) -> Option<&mut T> {
        self.extensions
            .get_mut(&TypeId::of::<T>())
            .and_then(|v| v.downcast_mut())
    }

    /// Gets a stored value, inserting the default first if missing.
    pub fn get_or_default<T: Default + Send + Sync + 'static>(&mut self) -> &mut T {
        let slot = self
            .extensions
            .entry(TypeId::of::<T>())
            .or_insert_with(|| -> Box<dyn Any + Send + Sync> { Box::new(T::default()) });
        match slot.downcast_mut() {
            Some(value) => value,
            None => unreachable!("extension slot keyed by its own TypeId"),
        }
    }

    /// Removes a stored value.
    pub fn remove<T: Send + Sync + 'static>(&mut self) -> Option<T> {
        self.extensions
            .remove(&TypeId::of::<T>())
            .and_then(|old| old.downcast().ok().map(|b: Box<T>| *b))
    }

    /// Returns `true` if a value of type `T` is stored.
    pub fn contains<T: Send + Sync + 'static>(&self) -> bool {
        self.extensions.contains_key(&TypeId::of::<T>())
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("path", &self.path)
            .field("argv", &self.argv)
            .field("args", &self.args)
            .field("params", &self.params)
            .field("data", &self.data)
            .field("extensions", &self.extensions.len())
            .finish()
    }
}
