use super::{MatchStatus, PatternMatcher, RequestMatcher};
use crate::request::RequestContext;
use crate::route::{Route, RouteCollection};
use http::Method;

fn routes() -> RouteCollection {
    RouteCollection::from_routes([
        Route::builder("home", "/").method(Method::GET).handler("Pages::home").build().unwrap(),
        Route::builder("user.new", "/users/new")
            .method(Method::GET)
            .handler("users@create_form")
            .build()
            .unwrap(),
        Route::builder("user.show", "/users/{id}")
            .methods([Method::GET, Method::HEAD])
            .handler("users@show")
            .build()
            .unwrap(),
        Route::builder("user.update", "/users/{id}")
            .method(Method::PUT)
            .handler("users@update")
            .build()
            .unwrap(),
        Route::builder("tenant.dashboard", "/dashboard")
            .host("{tenant}.example.com")
            .handler("Dashboard::show")
            .build()
            .unwrap(),
        Route::builder("secure", "/secure")
            .scheme("https")
            .default("mode", "strict")
            .handler("Secure::show")
            .build()
            .unwrap(),
    ])
    .unwrap()
}

fn run(ctx: &RequestContext) -> super::MatchContext {
    PatternMatcher.match_request(ctx, &routes())
}

#[test]
fn test_root_matches() {
    let m = run(&RequestContext::new(Method::GET, "/"));
    assert!(m.is_match());
    assert_eq!(m.name(), Some("home"));
}

#[test]
fn test_registration_order_wins() {
    // `/users/new` is also matched by `/users/{id}`; the earlier route wins.
    let m = run(&RequestContext::new(Method::GET, "/users/new"));
    assert_eq!(m.name(), Some("user.new"));
}

#[test]
fn test_method_constraint_selects_route() {
    let get = run(&RequestContext::new(Method::GET, "/users/9"));
    let put = run(&RequestContext::new(Method::PUT, "/users/9"));
    let delete = run(&RequestContext::new(Method::DELETE, "/users/9"));
    assert_eq!(get.name(), Some("user.show"));
    assert_eq!(put.name(), Some("user.update"));
    assert_eq!(delete.status(), MatchStatus::NoMatch);
    assert_eq!(delete.name(), None);
    assert_eq!(delete.path(), "/users/9");
}

#[test]
fn test_host_constraint_captures() {
    let ctx = RequestContext::builder()
        .host("acme.example.com")
        .path("/dashboard")
        .build();
    let m = run(&ctx);
    assert_eq!(m.name(), Some("tenant.dashboard"));
    assert_eq!(m.parameters().get("tenant"), Some("acme"));

    let other = RequestContext::builder().host("example.org").path("/dashboard").build();
    assert!(!run(&other).is_match());
}

#[test]
fn test_scheme_constraint_and_defaults() {
    let plain = RequestContext::new(Method::GET, "/secure");
    assert!(!run(&plain).is_match());

    let tls = RequestContext::builder().scheme("https").port(443).path("/secure").build();
    let m = run(&tls);
    assert!(m.is_match());
    assert_eq!(m.parameters().get("mode"), Some("strict"));
}

#[test]
fn test_matching_is_deterministic() {
    let ctx = RequestContext::new(Method::HEAD, "/users/abc");
    let a = run(&ctx);
    let b = run(&ctx);
    assert_eq!(a.status(), b.status());
    assert_eq!(a.name(), b.name());
    assert_eq!(a.parameters(), b.parameters());
}

#[test]
fn test_capture_order_follows_template() {
    let routes = RouteCollection::from_routes([Route::builder(
        "post.show",
        "/users/{user_id}/posts/{post_id}",
    )
    .handler("posts@show")
    .build()
    .unwrap()])
    .unwrap();
    let m = PatternMatcher.match_request(&RequestContext::new(Method::GET, "/users/3/posts/8"), &routes);
    let pairs: Vec<_> = m.parameters().iter().collect();
    assert_eq!(pairs, vec![("user_id", "3"), ("post_id", "8")]);
}
