//! Built-in logging middleware.

use std::time::Instant;

use tracing::{debug, info};

use crate::context::Context;
use crate::middleware::{BoxFuture, Hooks, Middleware, StageResult};

/// Middleware that logs each run on entry and exit.
///
/// Register it first so it wraps every other stage:
///
/// ```
/// use oxide_cli_router::{Logging, Router};
///
/// let router = Router::new().middleware(Logging::middleware());
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct Logging;

struct Started(Instant);

impl Logging {
    /// Returns the logger as a registrable middleware.
    pub fn middleware() -> Middleware {
        Middleware::hooks(Self)
    }
}

impl Hooks for Logging {
    fn before<'a>(&'a self, ctx: &'a mut Context) -> BoxFuture<'a, StageResult> {
        debug!(path = %ctx.path, argv = ?ctx.argv, "--> run");
        ctx.insert(Started(Instant::now()));
        Box::pin(async { Ok(()) })
    }

    fn after<'a>(
        &'a self,
        ctx: &'a mut Context,
        outcome: StageResult,
    ) -> BoxFuture<'a, StageResult> {
        let elapsed = ctx.remove::<Started>().map(|s| s.0.elapsed());
        match &outcome {
            Ok(()) => debug!(path = %ctx.path, ?elapsed, "<-- ok"),
            Err(err) => info!(path = %ctx.path, ?elapsed, error = %err, "<-- failed"),
        }
        Box::pin(async move { outcome })
    }
}

#[cfg(test)]
mod tests {
    use oxide_args::Args;

    use super::*;
    use crate::compose::Chain;
    use crate::error::Failure;

    #[tokio::test]
    async fn test_passes_outcome_through() {
        let failing = Middleware::handler(|_| Err(Failure::msg("boom")));
        let chain = Chain::compose([Logging::middleware(), failing]).unwrap();

        let mut ctx = Context::new("start", Vec::new(), Args::default());
        let err = chain.run(&mut ctx).await.unwrap_err();

        assert_eq!(err.to_string(), "boom");
        assert!(!ctx.contains::<Started>());
    }
}
