//! Tests for routing, composition order and failure reporting.

mod common;

use std::time::Duration;

use common::{ErrorLog, Trace};
use oxide_cli_router::{
    BoxFuture, Context, Failure, Hooks, Middleware, Router, RouterError, StageResult,
};
use serde_json::json;

#[tokio::test]
async fn test_exact_path_match() {
    let trace = Trace::default();
    let router = Router::new()
        .route("start", trace.handler("start"))
        .route("stop", trace.handler("stop"));

    router.run(["start"]).unwrap().await.unwrap();

    assert_eq!(trace.entries(), vec!["start"]);
}

#[tokio::test]
async fn test_similar_names_do_not_cross_trigger() {
    for name in ["start", "started", "starts"] {
        let trace = Trace::default();
        let router = Router::new()
            .route("start", trace.handler("start"))
            .route("started", trace.handler("started"))
            .route("starts", trace.handler("starts"));

        router.run([name]).unwrap().await.unwrap();

        assert_eq!(trace.entries(), vec![name]);
    }
}

#[tokio::test]
async fn test_onion_ordering() {
    let trace = Trace::default();
    let router = Router::new()
        .middleware(trace.around("A"))
        .middleware(trace.around("B"))
        .route("run", trace.handler("C"));

    router.run(["run"]).unwrap().await.unwrap();

    assert_eq!(
        trace.entries(),
        vec!["A-pre", "B-pre", "C", "B-post", "A-post"]
    );
}

#[tokio::test]
async fn test_index_fallback() {
    for argv in [vec![], vec!["unregistered-token"]] {
        let trace = Trace::default();
        let router = Router::new().route("index", trace.handler("index"));

        router.run(argv).unwrap().await.unwrap();

        assert_eq!(trace.entries(), vec!["index"]);
    }
}

#[tokio::test]
async fn test_unintercepted_failure_reaches_outcome_and_listener() {
    let errors = ErrorLog::default();
    let router = errors.attach(
        Router::new().route("start", Middleware::handler(|_| Err(Failure::msg("boom")))),
    );

    let outcome = router.run(["start"]).unwrap().await.unwrap_err();

    let reported = errors.failures();
    assert_eq!(reported.len(), 1);
    assert!(Failure::ptr_eq(&reported[0], &outcome));
    assert_eq!(outcome.to_string(), "boom");
}

#[tokio::test]
async fn test_failure_without_listener_still_rejects() {
    let router =
        Router::new().route("start", Middleware::handler(|_| Err(Failure::msg("boom"))));

    let outcome = router.run(["start"]).unwrap().await;

    assert!(outcome.is_err());
}

#[tokio::test]
async fn test_intercepted_failure_settles_successfully() {
    let errors = ErrorLog::default();
    let trace = Trace::default();
    let recorder = trace.clone();
    let router = errors.attach(
        Router::new()
            .middleware(Middleware::stage(move |ctx, next| {
                let trace = recorder.clone();
                Box::pin(async move {
                    if let Err(err) = next.run(ctx).await {
                        trace.push(format!("caught {err}"));
                    }
                    Ok(())
                })
            }))
            .route("start", Middleware::handler(|_| Err(Failure::msg("boom")))),
    );

    router.run(["start"]).unwrap().await.unwrap();

    assert_eq!(trace.entries(), vec!["caught boom"]);
    assert!(errors.failures().is_empty());
}

#[tokio::test]
async fn test_misplaced_handler_fails_before_any_stage() {
    let trace = Trace::default();
    let router = Router::new()
        .middleware(trace.around("A"))
        .route("start", trace.handler("early"))
        .route("start", trace.around("B"));

    let err = router.run(["start"]).unwrap_err();

    assert_eq!(
        err,
        RouterError::MisplacedHandler {
            pattern: "start".into(),
            position: 1,
            len: 3,
        }
    );
    assert!(trace.entries().is_empty());
}

#[tokio::test]
async fn test_same_spec_keeps_registration_order() {
    let trace = Trace::default();
    let router = Router::new()
        .route("build", trace.around("first"))
        .route("build", trace.around("second"))
        .route("build", trace.handler("third"));

    router.run(["build"]).unwrap().await.unwrap();

    assert_eq!(
        trace.entries(),
        vec!["first-pre", "second-pre", "third", "second-post", "first-post"]
    );
}

#[tokio::test]
async fn test_async_handler_awaited_before_unwinding() {
    let trace = Trace::default();
    let inner = trace.clone();
    let router = Router::new().middleware(trace.around("A")).route(
        "sleep",
        Middleware::handler_async(move |_| {
            let trace = inner.clone();
            Box::pin(async move {
                tokio::time::sleep(Duration::from_millis(5)).await;
                trace.push("slept");
                Ok(())
            })
        }),
    );

    router.run(["sleep"]).unwrap().await.unwrap();

    assert_eq!(trace.entries(), vec!["A-pre", "slept", "A-post"]);
}

#[tokio::test]
async fn test_route_params_visible_to_their_stage() {
    let trace = Trace::default();
    let recorder = trace.clone();
    let router = Router::new().route(
        "{command}",
        Middleware::handler(move |ctx| {
            recorder.push(ctx.params.get("command").unwrap_or_default());
            Ok(())
        }),
    );

    router.run(["deploy", "--to", "prod"]).unwrap().await.unwrap();

    assert_eq!(trace.entries(), vec!["deploy"]);
}

#[tokio::test]
async fn test_overlapping_runs_keep_separate_contexts() {
    struct Seen(String);

    let trace = Trace::default();
    let recorder = trace.clone();
    let router = Router::new().middleware(Middleware::stage(move |ctx, next| {
        let trace = recorder.clone();
        Box::pin(async move {
            ctx.insert(Seen(ctx.path.clone()));
            tokio::task::yield_now().await;
            let outcome = next.run(ctx).await;
            let seen = ctx.get::<Seen>().map(|s| s.0.clone()).unwrap_or_default();
            trace.push(format!("{}={seen}", ctx.path));
            outcome
        })
    }));

    let first = tokio::spawn(router.run(["one"]).unwrap());
    let second = tokio::spawn(router.run(["two"]).unwrap());
    let (first, second) = tokio::join!(first, second);
    first.unwrap().unwrap();
    second.unwrap().unwrap();

    let mut entries = trace.entries();
    entries.sort();
    assert_eq!(entries, vec!["one=one", "two=two"]);
}

#[tokio::test]
async fn test_wildcard_match_suppresses_index_fallback() {
    let trace = Trace::default();
    let router = Router::new()
        .middleware(trace.around("audit"))
        .route("index", trace.handler("index"));

    router.run(["nope"]).unwrap().await.unwrap();

    assert_eq!(trace.entries(), vec!["audit-pre", "audit-post"]);
}

/// Records both phases and swallows any failure from further in.
struct Recover(Trace);

impl Hooks for Recover {
    fn before<'a>(&'a self, _ctx: &'a mut Context) -> BoxFuture<'a, StageResult> {
        self.0.push("H-before");
        Box::pin(async { Ok(()) })
    }

    fn after<'a>(
        &'a self,
        _ctx: &'a mut Context,
        outcome: StageResult,
    ) -> BoxFuture<'a, StageResult> {
        if outcome.is_err() {
            self.0.push("H-after");
        }
        Box::pin(async { Ok(()) })
    }
}

#[tokio::test]
async fn test_hooks_after_runs_last_and_can_recover() {
    let errors = ErrorLog::default();
    let trace = Trace::default();
    let router = errors.attach(
        Router::new()
            .middleware(Middleware::hooks(Recover(trace.clone())))
            .middleware(trace.around("B"))
            .route("start", Middleware::handler(|_| Err(Failure::msg("boom")))),
    );

    router.run(["start"]).unwrap().await.unwrap();

    assert_eq!(trace.entries(), vec!["H-before", "B-pre", "B-post", "H-after"]);
    assert!(errors.failures().is_empty());
}

#[tokio::test]
async fn test_route_data_visible_to_its_own_stage() {
    let trace = Trace::default();
    let outer = trace.clone();
    let inner = trace.clone();
    let router = Router::new()
        .middleware(Middleware::stage(move |ctx, next| {
            let trace = outer.clone();
            Box::pin(async move {
                trace.push(format!("outer sees data: {}", ctx.data().is_some()));
                let outcome = next.run(ctx).await;
                trace.push(format!("outer after: {}", ctx.data().is_some()));
                outcome
            })
        }))
        .route_with_data(
            "deploy",
            json!({"summary": "ship it"}),
            Middleware::handler(move |ctx| {
                let summary = ctx.data().and_then(|d| d["summary"].as_str());
                inner.push(summary.unwrap_or("none"));
                Ok(())
            }),
        );

    router.run(["deploy"]).unwrap().await.unwrap();

    assert_eq!(
        trace.entries(),
        vec!["outer sees data: false", "ship it", "outer after: false"]
    );
}

#[tokio::test]
async fn test_token_with_trailing_slash_is_not_the_command() {
    let trace = Trace::default();
    let router = Router::new()
        .route("start", trace.handler("start"))
        .route("index", trace.handler("index"));

    router.run(["start/"]).unwrap().await.unwrap();
    router.run(["/start"]).unwrap().await.unwrap();

    assert_eq!(trace.entries(), vec!["index", "index"]);
}
