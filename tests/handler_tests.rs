//! Handler identifiers, resolution and validation through the public API

mod common;

use common::fixtures;
use http::Method;
use serde_json::json;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use switchyard::handler::{
    HandlerDispatcher, HandlerId, HandlerParser, Invocable, MethodTable, Service, ServiceMap,
};
use switchyard::route::{Route, RouteCollection};
use switchyard::runtime_config::RuntimeConfig;
use switchyard::{RequestContext, Router, RoutingError};

#[test]
fn test_identifier_forms() {
    let id: HandlerId = "App\\Pages::home".parse().unwrap();
    assert!(matches!(id, HandlerId::Static { ref class, ref method } if class == "App\\Pages" && method == "home"));

    let id: HandlerId = "users.repo@show".parse().unwrap();
    assert!(matches!(id, HandlerId::Service { ref key, .. } if key == "users.repo"));

    // `::` wins over `@` when both appear.
    assert!(matches!(
        HandlerId::parse("a@b::c"),
        Err(RoutingError::HandlerResolution { .. })
    ));
    for bad in ["", "plain", "::x", "x::", "@x", "x@"] {
        assert!(HandlerId::parse(bad).is_err(), "accepted {bad:?}");
    }
}

#[test]
fn test_malformed_identifier_fails_at_route_build() {
    let err = Route::builder("broken", "/").handler("not a handler").build().unwrap_err();
    assert_eq!(
        err.to_string(),
        "no routing handler could be found for 'not a handler'"
    );
}

#[test]
fn test_unknown_class_fails_at_dispatch_without_validation() {
    let routes = RouteCollection::from_routes([Route::builder("home", "/")
        .handler("Missing::bar")
        .build()
        .unwrap()])
    .unwrap();
    let router = Router::builder(routes)
        .config(RuntimeConfig {
            validate_handlers: false,
            ..RuntimeConfig::default()
        })
        .build()
        .unwrap();
    let err = router
        .dispatch(&RequestContext::new(Method::GET, "/"))
        .unwrap_err();
    assert!(matches!(err, RoutingError::HandlerResolution { ref identifier } if identifier == "Missing::bar"));
    assert!(router.dispatch_stack().is_empty());
    assert!(router.validate_handlers().is_err());
}

#[test]
fn test_service_map_resolution_is_memoised() {
    struct Counting {
        lookups: Arc<AtomicUsize>,
    }

    impl Service for Counting {
        fn method(&self, name: &str) -> Option<Invocable> {
            self.lookups.fetch_add(1, Ordering::SeqCst);
            (name == "index").then(|| Invocable::new(|_| Ok(json!("listed"))))
        }
    }

    let lookups = Arc::new(AtomicUsize::new(0));
    let mut services: ServiceMap = HashMap::new();
    services.insert(
        "things".to_string(),
        Arc::new(Counting {
            lookups: Arc::clone(&lookups),
        }),
    );
    let routes = RouteCollection::from_routes([Route::builder("things", "/things")
        .handler("things@index")
        .build()
        .unwrap()])
    .unwrap();
    let router = Router::builder(routes)
        .config(RuntimeConfig::default())
        .handlers(HandlerDispatcher::new(HandlerParser::with_services(services)))
        .build()
        .unwrap();

    for _ in 0..3 {
        let out = router
            .dispatch(&RequestContext::new(Method::GET, "/things"))
            .unwrap();
        assert_eq!(out, json!("listed"));
    }
    assert_eq!(lookups.load(Ordering::SeqCst), 1, "validated once, then cached");
}

#[test]
fn test_instantiable_class_gets_fresh_instance_per_dispatch() {
    let created = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&created);
    let parser = HandlerParser::new().instantiable("Reports", move || {
        let n = counter.fetch_add(1, Ordering::SeqCst) + 1;
        Arc::new(MethodTable::new().method("latest", Invocable::new(move |_| Ok(json!(n)))))
    });
    let routes = RouteCollection::from_routes([Route::builder("reports", "/reports")
        .handler("Reports@latest")
        .build()
        .unwrap()])
    .unwrap();
    let router = Router::builder(routes)
        .config(RuntimeConfig {
            validate_handlers: false,
            ..RuntimeConfig::default()
        })
        .parser(parser)
        .build()
        .unwrap();

    let ctx = RequestContext::new(Method::GET, "/reports");
    assert_eq!(router.dispatch(&ctx).unwrap(), json!(1));
    assert_eq!(router.dispatch(&ctx).unwrap(), json!(2));
}

#[test]
fn test_fixture_router_validates() {
    let router = fixtures::router();
    assert!(router.validate_handlers().is_ok());
    assert_eq!(router.routes().len(), 4);
}

#[test]
fn test_match_without_handler_is_invalid_route() {
    let router = fixtures::router();
    let request = RequestContext::new(Method::GET, "/nowhere");
    let err = HandlerDispatcher::default()
        .dispatch_handler(&router, &request, &switchyard::MatchContext::no_match("/nowhere"))
        .unwrap_err();
    assert!(
        matches!(err, RoutingError::InvalidRoute { ref reason, .. } if reason == "match carries no handler"),
        "{err}"
    );
    assert!(router.dispatch_stack().is_empty());
}
