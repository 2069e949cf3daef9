//! Middleware kinds and the continuation passed between stages.

use std::fmt;
use std::sync::Arc;

pub use futures::future::BoxFuture;

use crate::context::Context;
use crate::error::Failure;

/// Outcome of a stage or of a whole run.
pub type StageResult = Result<(), Failure>;

/// A handler that runs to completion without wrapping later stages.
///
/// Handlers are the final stage of a chain; see [`Middleware::Immediate`].
pub trait Handler: Send + Sync {
    /// Runs the handler.
    fn call<'a>(&'a self, ctx: &'a mut Context) -> BoxFuture<'a, StageResult>;
}

/// A stage that wraps the rest of the chain.
///
/// The stage decides when to continue by calling [`Next::run`]. Code before
/// that call runs on the way in, code after it runs on the way out, and the
/// `Err` returned by `Next::run` can be inspected, replaced or swallowed.
///
/// # Example
///
/// ```
/// use oxide_cli_router::{BoxFuture, Context, Next, Stage, StageResult};
///
/// struct Retry;
///
/// impl Stage for Retry {
///     fn call<'a>(&'a self, ctx: &'a mut Context, next: Next<'a>) -> BoxFuture<'a, StageResult> {
///         Box::pin(async move {
///             // Swallow whatever failed further in.
///             let _ = next.run(ctx).await;
///             Ok(())
///         })
///     }
/// }
/// ```
pub trait Stage: Send + Sync {
    /// Runs the stage around `next`.
    fn call<'a>(&'a self, ctx: &'a mut Context, next: Next<'a>) -> BoxFuture<'a, StageResult>;
}

/// A two-phase stage: `before` runs on the way in, `after` on the way out.
///
/// `after` receives the outcome of the nested stages and returns the outcome
/// to propagate outward, so returning `Ok(())` for an `Err` intercepts it.
pub trait Hooks: Send + Sync {
    /// Called before the nested stages. An error skips them and `after`.
    fn before<'a>(&'a self, _ctx: &'a mut Context) -> BoxFuture<'a, StageResult> {
        Box::pin(async { Ok(()) })
    }

    /// Called after the nested stages settle.
    fn after<'a>(
        &'a self,
        _ctx: &'a mut Context,
        outcome: StageResult,
    ) -> BoxFuture<'a, StageResult> {
        Box::pin(async move { outcome })
    }
}

/// The remainder of a composed chain, as seen from one stage.
pub struct Next<'a> {
    links: &'a [crate::compose::Link],
}

impl<'a> Next<'a> {
    pub(crate) const fn new(links: &'a [crate::compose::Link]) -> Self {
        Self { links }
    }

    /// Runs the remaining stages and settles with their outcome.
    ///
    /// At the end of the chain this completes immediately with `Ok(())`.
    pub fn run<'c>(self, ctx: &'c mut Context) -> BoxFuture<'c, StageResult>
    where
        'a: 'c,
    {
        match self.links.split_first() {
            None => Box::pin(async { Ok(()) }),
            Some((link, rest)) => link.call(ctx, Next::new(rest)),
        }
    }
}

impl fmt::Debug for Next<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Next")
            .field("remaining", &self.links.len())
            .finish()
    }
}

/// A registered middleware.
///
/// The kind is fixed at registration: an immediate handler may only be the
/// last stage of a chain, a suspendable stage may appear anywhere.
#[derive(Clone)]
pub enum Middleware {
    /// Runs, settles, then continues. Only valid as the last stage.
    Immediate(Arc<dyn Handler>),
    /// Wraps the rest of the chain.
    Suspendable(Arc<dyn Stage>),
}

impl Middleware {
    /// Creates an immediate middleware from a synchronous closure.
    ///
    /// ```
    /// use oxide_cli_router::Middleware;
    ///
    /// let hello = Middleware::handler(|ctx| {
    ///     println!("hello from {}", ctx.path);
    ///     Ok(())
    /// });
    /// assert!(hello.is_immediate());
    /// ```
    pub fn handler<F>(f: F) -> Self
    where
        F: Fn(&mut Context) -> StageResult + Send + Sync + 'static,
    {
        Self::Immediate(Arc::new(SyncFn(f)))
    }

    /// Creates an immediate middleware from a closure returning a future.
    pub fn handler_async<F>(f: F) -> Self
    where
        F: for<'a> Fn(&'a mut Context) -> BoxFuture<'a, StageResult> + Send + Sync + 'static,
    {
        Self::Immediate(Arc::new(AsyncFn(f)))
    }

    /// Creates a suspendable middleware from a closure taking [`Next`].
    ///
    /// ```
    /// use oxide_cli_router::Middleware;
    ///
    /// let timing = Middleware::stage(|ctx, next| {
    ///     Box::pin(async move {
    ///         let started = std::time::Instant::now();
    ///         let outcome = next.run(ctx).await;
    ///         println!("{} took {:?}", ctx.path, started.elapsed());
    ///         outcome
    ///     })
    /// });
    /// assert!(!timing.is_immediate());
    /// ```
    pub fn stage<F>(f: F) -> Self
    where
        F: for<'a> Fn(&'a mut Context, Next<'a>) -> BoxFuture<'a, StageResult>
            + Send
            + Sync
            + 'static,
    {
        Self::Suspendable(Arc::new(StageFn(f)))
    }

    /// Creates a suspendable middleware from a [`Hooks`] implementation.
    pub fn hooks(hooks: impl Hooks + 'static) -> Self {
        Self::Suspendable(Arc::new(HooksStage(hooks)))
    }

    /// Returns `true` for [`Middleware::Immediate`].
    pub const fn is_immediate(&self) -> bool {
        matches!(self, Self::Immediate(_))
    }

    /// Runs this middleware as one stage of a chain.
    ///
    /// An immediate handler is normalized into a stage: it runs, its future
    /// settles, and only then does the chain continue.
    pub(crate) fn call<'a>(
        &'a self,
        ctx: &'a mut Context,
        next: Next<'a>,
    ) -> BoxFuture<'a, StageResult> {
        match self {
            Self::Suspendable(stage) => stage.call(ctx, next),
            Self::Immediate(handler) => Box::pin(async move {
                handler.call(ctx).await?;
                next.run(ctx).await
            }),
        }
    }
}

impl fmt::Debug for Middleware {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Immediate(_) => f.write_str("Middleware::Immediate"),
            Self::Suspendable(_) => f.write_str("Middleware::Suspendable"),
        }
    }
}

struct SyncFn<F>(F);

impl<F> Handler for SyncFn<F>
where
    F: Fn(&mut Context) -> StageResult + Send + Sync,
{
    fn call<'a>(&'a self, ctx: &'a mut Context) -> BoxFuture<'a, StageResult> {
        Box::pin(async move { (self.0)(ctx) })
    }
}

struct AsyncFn<F>(F);

impl<F> Handler for AsyncFn<F>
where
    F: for<'a> Fn(&'a mut Context) -> BoxFuture<'a, StageResult> + Send + Sync,
{
    fn call<'a>(&'a self, ctx: &'a mut Context) -> BoxFuture<'a, StageResult> {
        (self.0)(ctx)
    }
}

struct StageFn<F>(F);

impl<F> Stage for StageFn<F>
where
    F: for<'a> Fn(&'a mut Context, Next<'a>) -> BoxFuture<'a, StageResult> + Send + Sync,
{
    fn call<'a>(&'a self, ctx: &'a mut Context, next: Next<'a>) -> BoxFuture<'a, StageResult> {
        (self.0)(ctx, next)
    }
}

struct HooksStage<H>(H);

impl<H: Hooks> Stage for HooksStage<H> {
    fn call<'a>(&'a self, ctx: &'a mut Context, next: Next<'a>) -> BoxFuture<'a, StageResult> {
        Box::pin(async move {
            self.0.before(ctx).await?;
            let outcome = next.run(ctx).await;
            self.0.after(ctx, outcome).await
        })
    }
}
