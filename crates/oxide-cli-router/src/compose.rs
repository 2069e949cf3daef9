//! Composition of middleware into one onion-ordered chain.

use std::fmt;
use std::sync::Arc;

use serde_json::Value as JsonValue;

use crate::context::Context;
use crate::error::{Result, RouterError};
use crate::middleware::{BoxFuture, Middleware, Next, StageResult};
use crate::path::Params;

/// One stage of a chain, bound to the parameters its pattern captured.
#[derive(Debug, Clone)]
pub struct Link {
    /// The middleware to run.
    pub middleware: Middleware,
    /// Parameters exposed through [`Context::params`] while this stage runs.
    pub params: Params,
    /// Route data exposed through [`Context::data`] while this stage runs.
    pub data: Option<Arc<JsonValue>>,
    /// Route specification the middleware was registered under.
    pub pattern: String,
}

impl Link {
    /// Creates a link with no captured parameters.
    pub fn new(pattern: impl Into<String>, middleware: Middleware) -> Self {
        Self {
            middleware,
            params: Params::new(),
            data: None,
            pattern: pattern.into(),
        }
    }

    /// Runs the stage with its own parameters and data in the context,
    /// restoring the enclosing stage's once it settles.
    pub(crate) fn call<'a>(
        &'a self,
        ctx: &'a mut Context,
        next: Next<'a>,
    ) -> BoxFuture<'a, StageResult> {
        Box::pin(async move {
            let params = std::mem::replace(&mut ctx.params, self.params.clone());
            let data = std::mem::replace(&mut ctx.data, self.data.clone());
            let outcome = self.middleware.call(ctx, next).await;
            ctx.params = params;
            ctx.data = data;
            outcome
        })
    }
}

/// A composed chain, ready to run over a context.
///
/// Stage `i` runs its code up to [`Next::run`], then stages `i + 1..`, then
/// the rest of its own code. Failures travel outward through every enclosing
/// stage until one intercepts them or they leave the chain.
pub struct Chain {
    links: Vec<Link>,
}

impl Chain {
    /// Composes middleware in order, each registered under `*`.
    ///
    /// # Errors
    ///
    /// Returns [`RouterError::MisplacedHandler`] if an immediate handler is
    /// not the last element.
    pub fn compose(middleware: impl IntoIterator<Item = Middleware>) -> Result<Self> {
        Self::from_links(middleware.into_iter().map(|mw| Link::new("*", mw)).collect())
    }

    /// Composes links in order.
    ///
    /// # Errors
    ///
    /// Returns [`RouterError::MisplacedHandler`] if an immediate handler is
    /// not the last link. Nothing runs in that case.
    pub fn from_links(links: Vec<Link>) -> Result<Self> {
        let len = links.len();
        let misplaced = links
            .iter()
            .enumerate()
            .find(|(position, link)| link.middleware.is_immediate() && position + 1 < len);

        if let Some((position, link)) = misplaced {
            return Err(RouterError::MisplacedHandler {
                pattern: link.pattern.clone(),
                position,
                len,
            });
        }

        Ok(Self { links })
    }

    /// Runs the chain over a context.
    ///
    /// An empty chain completes immediately with `Ok(())`.
    pub fn run<'a>(&'a self, ctx: &'a mut Context) -> BoxFuture<'a, StageResult> {
        Next::new(&self.links).run(ctx)
    }

    /// Number of stages.
    pub fn len(&self) -> usize {
        self.links.len()
    }

    /// Returns `true` if the chain has no stages.
    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }
}

impl fmt::Debug for Chain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.links.iter().map(|l| &l.pattern))
            .finish()
    }
}
