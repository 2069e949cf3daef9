//! The route table.

use std::sync::Arc;

use serde_json::Value as JsonValue;
use tracing::trace;

use crate::compose::Link;
use crate::middleware::Middleware;
use crate::path::PathPattern;

/// A single registration.
#[derive(Debug, Clone)]
pub struct Route {
    /// Compiled pattern.
    pub pattern: PathPattern,
    /// Middleware to run when the pattern matches.
    pub middleware: Middleware,
    /// Data attached at registration, visible to the middleware as
    /// [`Context::data`](crate::Context::data).
    pub data: Option<Arc<JsonValue>>,
}

impl Route {
    /// Creates a new route.
    pub fn new(spec: &str, middleware: Middleware) -> Self {
        Self {
            pattern: PathPattern::new(spec),
            middleware,
            data: None,
        }
    }

    /// Attaches data to the route.
    #[must_use]
    pub fn with_data(mut self, data: JsonValue) -> Self {
        self.data = Some(Arc::new(data));
        self
    }
}

/// Registered routes, in registration order.
///
/// Several routes may match the same path; all of them run, in the order
/// they were registered.
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    routes: Vec<Route>,
}

impl RouteTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Compiles `spec` and appends a route.
    pub fn register(&mut self, spec: &str, middleware: Middleware) {
        self.push(Route::new(spec, middleware));
    }

    /// Appends an already built route.
    pub fn push(&mut self, route: Route) {
        self.routes.push(route);
    }

    /// Returns the links that apply to `path`.
    ///
    /// Every route whose pattern matches `path` is included, in registration
    /// order. If none matches, the routes matching the index (empty) path are
    /// used instead. An empty result means nothing is registered for either.
    pub fn resolve(&self, path: &str) -> Vec<Link> {
        let links = self.matching(path);
        if !links.is_empty() || path.is_empty() {
            return links;
        }

        trace!(path, "no route matched, falling back to index");
        self.matching("")
    }

    fn matching(&self, path: &str) -> Vec<Link> {
        self.routes
            .iter()
            .filter_map(|route| {
                route.pattern.match_path(path).map(|params| Link {
                    middleware: route.middleware.clone(),
                    params,
                    data: route.data.clone(),
                    pattern: route.pattern.pattern().to_string(),
                })
            })
            .collect()
    }

    /// Number of registered routes.
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// Returns `true` if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}
