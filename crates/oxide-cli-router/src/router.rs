//! Main router implementation.

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context as TaskContext, Poll};

use oxide_args::{parse, ParseOptions};
use serde_json::Value as JsonValue;
use tracing::debug;

use crate::compose::Chain;
use crate::context::Context;
use crate::error::{Failure, Result};
use crate::events::{Events, ERROR};
use crate::middleware::{BoxFuture, Middleware, StageResult};
use crate::table::{Route, RouteTable};

/// Supplies the argv used by [`Router::run_default`].
pub type ArgvSource = Arc<dyn Fn() -> Vec<String> + Send + Sync>;

/// Router configuration.
#[derive(Clone, Default)]
pub struct RouterOptions {
    /// How argv is split into flags and positional tokens.
    pub args: ParseOptions,
    /// Where [`Router::run_default`] takes argv from.
    pub default_argv: Option<ArgvSource>,
}

impl RouterOptions {
    /// Creates default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the argv parser configuration.
    #[must_use]
    pub fn args(mut self, args: ParseOptions) -> Self {
        self.args = args;
        self
    }

    /// Sets the argv source for [`Router::run_default`].
    #[must_use]
    pub fn default_argv<F>(mut self, source: F) -> Self
    where
        F: Fn() -> Vec<String> + Send + Sync + 'static,
    {
        self.default_argv = Some(Arc::new(source));
        self
    }
}

impl fmt::Debug for RouterOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouterOptions")
            .field("args", &self.args)
            .field("default_argv", &self.default_argv.is_some())
            .finish()
    }
}

/// Routes an argument vector to middleware.
///
/// Registration happens through the builder methods, which consume the
/// router; running only borrows it, so one router serves any number of
/// sequential or overlapping runs.
///
/// # Example
///
/// ```
/// use oxide_cli_router::{Middleware, Router};
///
/// # tokio_test::block_on(async {
/// let router = Router::new()
///     .route("start", Middleware::handler(|ctx| {
///         assert_eq!(ctx.positional(), ["web"]);
///         Ok(())
///     }))
///     .on_error(|err| eprintln!("error: {err}"));
///
/// router.run(["start", "web"]).unwrap().await.unwrap();
/// # });
/// ```
#[derive(Debug, Default)]
pub struct Router {
    table: RouteTable,
    events: Arc<Events>,
    options: RouterOptions,
}

impl Router {
    /// Creates a new empty router.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a router with the given options.
    pub fn with_options(options: RouterOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    /// Registers middleware under a route specification.
    ///
    /// `*` matches every path; `index` or `""` matches only the empty path.
    /// See [`PathPattern`](crate::PathPattern) for the full syntax.
    #[must_use]
    pub fn route(mut self, spec: &str, middleware: Middleware) -> Self {
        debug!(spec, immediate = middleware.is_immediate(), "registering route");
        self.table.register(spec, middleware);
        self
    }

    /// Registers middleware together with data it can read through
    /// [`Context::data`] while it runs.
    ///
    /// ```
    /// use oxide_cli_router::{Middleware, Router};
    /// use serde_json::json;
    ///
    /// let router = Router::new().route_with_data(
    ///     "deploy",
    ///     json!({"description": "deploy a service"}),
    ///     Middleware::handler(|ctx| {
    ///         let about = ctx.data().and_then(|d| d["description"].as_str());
    ///         println!("{}", about.unwrap_or_default());
    ///         Ok(())
    ///     }),
    /// );
    /// ```
    #[must_use]
    pub fn route_with_data(
        mut self,
        spec: &str,
        data: JsonValue,
        middleware: Middleware,
    ) -> Self {
        debug!(spec, immediate = middleware.is_immediate(), "registering route with data");
        self.table.push(Route::new(spec, middleware).with_data(data));
        self
    }

    /// Registers middleware for every path.
    #[must_use]
    pub fn middleware(self, middleware: Middleware) -> Self {
        self.route("*", middleware)
    }

    /// Registers a listener for `event`.
    #[must_use]
    pub fn on<F>(mut self, event: impl Into<String>, listener: F) -> Self
    where
        F: Fn(&Failure) + Send + Sync + 'static,
    {
        Arc::make_mut(&mut self.events).on(event, listener);
        self
    }

    /// Registers a listener for failed runs.
    #[must_use]
    pub fn on_error<F>(self, listener: F) -> Self
    where
        F: Fn(&Failure) + Send + Sync + 'static,
    {
        self.on(ERROR, listener)
    }

    /// Returns the route table.
    pub const fn table(&self) -> &RouteTable {
        &self.table
    }

    /// Returns the listener registry.
    pub fn events(&self) -> &Events {
        &self.events
    }

    /// Starts a run over `argv`.
    ///
    /// The first positional token becomes the routed path and is removed
    /// from both the raw argv and the positional list. The returned [`Run`]
    /// resolves once every stage has settled; a failure is also reported to
    /// the `error` listeners.
    ///
    /// # Errors
    ///
    /// Returns [`RouterError::MisplacedHandler`](crate::RouterError) if the
    /// matched middleware puts an immediate handler before another stage. No
    /// stage runs in that case.
    pub fn run<I, S>(&self, argv: I) -> Result<Run>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut argv: Vec<String> = argv.into_iter().map(Into::into).collect();
        let mut args = parse(argv.iter().map(String::as_str), &self.options.args);

        let path = args.positional.first().cloned().unwrap_or_default();
        if !path.is_empty() {
            args.positional.remove(0);
            if let Some(at) = argv.iter().position(|t| *t == path) {
                argv.remove(at);
            }
        }

        let links = self.table.resolve(&path);
        let chain = Chain::from_links(links)?;
        debug!(path = %path, stages = chain.len(), ?chain, "dispatching");

        let events = Arc::clone(&self.events);
        let mut ctx = Context::new(path.clone(), argv, args);
        let future = Box::pin(async move {
            let outcome = chain.run(&mut ctx).await;
            if let Err(failure) = &outcome {
                let notified = events.emit(ERROR, failure);
                debug!(path = %ctx.path, notified, error = %failure, "run failed");
            }
            outcome
        });

        Ok(Run { path, future })
    }

    /// Starts a run over the argv supplied by [`RouterOptions::default_argv`].
    ///
    /// Without a configured source the run sees an empty argv.
    ///
    /// # Errors
    ///
    /// Same as [`Router::run`].
    pub fn run_default(&self) -> Result<Run> {
        let argv = self
            .options
            .default_argv
            .as_ref()
            .map(|source| source())
            .unwrap_or_default();
        self.run(argv)
    }
}

/// One in-flight run.
///
/// Resolves to `Ok(())` once the chain completes, or to the first failure no
/// stage intercepted.
#[must_use = "a run does nothing unless awaited"]
pub struct Run {
    path: String,
    future: BoxFuture<'static, StageResult>,
}

impl Run {
    /// The routed path.
    pub fn path(&self) -> &str {
        &self.path
    }
}

impl Future for Run {
    type Output = StageResult;

    fn poll(mut self: Pin<&mut Self>, cx: &mut TaskContext<'_>) -> Poll<Self::Output> {
        self.future.as_mut().poll(cx)
    }
}

impl fmt::Debug for Run {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Run").field("path", &self.path).finish()
    }
}
