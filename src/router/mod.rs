//! # Router Module
//!
//! The [`Router`] ties the other pieces together: it matches a request,
//! dispatches the matched handler, maps the handler's raw result through the
//! [`crate::response::ResponseMapper`] and keeps track of which routes are
//! executing right now.
//!
//! ## Dispatch
//!
//! There are two entry points:
//!
//! - [`Router::dispatch`] matches a [`crate::request::RequestContext`]
//!   against the route collection. An unmatched request is an error
//!   ([`crate::RoutingError::NoRouteMatch`]).
//! - [`Router::dispatch_route`] skips matching and runs a named route under a
//!   synthetic request built from [`DispatchOptions`]. This is the
//!   "forward to another route" primitive handlers use.
//!
//! ## Nested dispatch
//!
//! Handlers receive the router through [`crate::handler::HandlerCall`] and may
//! dispatch again. While a handler runs:
//!
//! 1. its route name is on top of the dispatch stack
//!    ([`Router::current_route_name`]; the outermost is
//!    [`Router::first_route_name`]);
//! 2. the URL generator's ambient context is the handler's request, so
//!    generated absolute URLs use its scheme, host and port.
//!
//! Both are undone when the handler returns, fails or panics. An ambient
//! context that was unset before the dispatch is not cleared afterwards.
//!
//! ## Example
//!
//! ```rust
//! use switchyard::handler::Invocable;
//! use switchyard::request::{Parameters, RequestContext};
//! use switchyard::route::{Route, RouteCollection};
//! use switchyard::router::{DispatchOptions, Router};
//! use http::Method;
//! use serde_json::json;
//!
//! let show = Invocable::new(|call| Ok(json!({ "id": call.args()[0] }))).with_argument("id");
//! let routes = RouteCollection::from_routes([
//!     Route::builder("user.show", "/users/{id}").method(Method::GET).invocable(show).build()?,
//! ])?;
//! let router = Router::new(routes);
//!
//! let by_match = router.dispatch(&RequestContext::new(Method::GET, "/users/42"))?;
//! let by_name = router.dispatch_route(
//!     "user.show",
//!     &Parameters::new().with("id", 42),
//!     &DispatchOptions::default(),
//! )?;
//! assert_eq!(by_match, by_name);
//! # Ok::<(), switchyard::RoutingError>(())
//! ```

mod core;
mod options;
mod scope;

pub use self::core::{Router, RouterBuilder};
pub use options::{DispatchOptions, ResolvedOptions};
