#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use oxide_cli_router::{Failure, Middleware, Router};

/// Shared, ordered record of what ran.
#[derive(Clone, Default)]
pub struct Trace(Arc<Mutex<Vec<String>>>);

impl Trace {
    pub fn push(&self, entry: impl Into<String>) {
        self.0.lock().unwrap().push(entry.into());
    }

    pub fn entries(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }

    /// Immediate handler that records `name`.
    pub fn handler(&self, name: &'static str) -> Middleware {
        let trace = self.clone();
        Middleware::handler(move |_| {
            trace.push(name);
            Ok(())
        })
    }

    /// Suspendable stage that records `<name>-pre` and `<name>-post`.
    pub fn around(&self, name: &'static str) -> Middleware {
        let trace = self.clone();
        Middleware::stage(move |ctx, next| {
            let trace = trace.clone();
            Box::pin(async move {
                trace.push(format!("{name}-pre"));
                let outcome = next.run(ctx).await;
                trace.push(format!("{name}-post"));
                outcome
            })
        })
    }
}

/// Collects every failure passed to the router's `error` listeners.
#[derive(Clone, Default)]
pub struct ErrorLog(Arc<Mutex<Vec<Failure>>>);

impl ErrorLog {
    pub fn attach(&self, router: Router) -> Router {
        let log = self.clone();
        router.on_error(move |err| log.0.lock().unwrap().push(err.clone()))
    }

    pub fn failures(&self) -> Vec<Failure> {
        self.0.lock().unwrap().clone()
    }
}
