//! # oxide-cli-router
//!
//! Routes a process's argument vector to middleware, then runs the matched
//! middleware as one onion-ordered async chain.
//!
//! This crate provides:
//! - Path patterns over the first positional token (literal, `{param}`,
//!   `{*rest}`, `*`, `index`)
//! - Immediate handlers and suspendable stages, composed in registration order
//! - Failure interception around `next`
//! - A single outcome per run plus `error` listeners
//!
//! ## Quick Start
//!
//! ```
//! use oxide_cli_router::{Middleware, Router};
//!
//! # tokio_test::block_on(async {
//! let router = Router::new()
//!     .middleware(Middleware::stage(|ctx, next| {
//!         Box::pin(async move {
//!             println!("--> {}", ctx.path);
//!             let outcome = next.run(ctx).await;
//!             println!("<-- {}", ctx.path);
//!             outcome
//!         })
//!     }))
//!     .route("greet", Middleware::handler(|ctx| {
//!         let name = ctx.args.get_str("name").unwrap_or("world");
//!         println!("hello, {name}");
//!         Ok(())
//!     }))
//!     .on_error(|err| eprintln!("error: {err}"));
//!
//! router.run(["greet", "--name", "ferris"])?.await?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! # }).unwrap();
//! ```
//!
//! ## Routing
//!
//! The path is the first positional token, or `""` when there is none.
//! Every route whose pattern matches the path runs, in registration order.
//! When nothing matches, the routes registered under `index` run instead.
//!
//! ```ignore
//! router
//!     .route("index", usage)          // no command, or an unknown one
//!     .route("remote/{name}", remote) // `remote/origin`
//!     .route("*", audit)              // every path
//! ```
//!
//! ## Middleware
//!
//! An immediate handler ([`Middleware::handler`]) must be the last stage of
//! the chain a path resolves to; anything else fails [`Router::run`] with
//! [`RouterError::MisplacedHandler`] before a single stage runs. Suspendable
//! stages ([`Middleware::stage`], [`Middleware::hooks`]) wrap everything
//! registered after them and can intercept the failures it returns.
//!
//! ## Failures
//!
//! A failed run resolves to the [`Failure`] no stage intercepted, and the
//! same failure is passed to every `error` listener first.

mod compose;
mod context;
mod error;
mod events;
mod logging;
mod middleware;
mod path;
mod router;
mod table;

pub use compose::{Chain, Link};
pub use context::Context;
pub use error::{Failure, Result, RouterError};
pub use events::{Events, Listener, ERROR};
pub use logging::Logging;
pub use middleware::{BoxFuture, Handler, Hooks, Middleware, Next, Stage, StageResult};
pub use path::{Params, PathPattern, PathSegment};
pub use router::{ArgvSource, Router, RouterOptions, Run};
pub use table::{Route, RouteTable};

pub use oxide_args::{Args, ParseOptions, Value};
