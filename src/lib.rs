//! # switchyard
//!
//! **switchyard** is a synchronous request-routing and dispatch engine: it
//! matches a request against an ordered table of named routes, invokes the
//! handler the matched route points at, and generates URLs for routes by name.
//!
//! ## Overview
//!
//! Routes pair a path template (`/users/{id}`), optional method, host and
//! scheme constraints, and a handler identifier. Requests are matched first
//! route wins, captured parameters are bound to the handler's declared
//! arguments, and the handler's result is passed through a response mapper.
//! Handlers get the router back and may dispatch other routes; the router
//! keeps a stack of executing route names and an ambient request context for
//! URL generation, both restored on every exit path.
//!
//! ## Architecture
//!
//! - **[`route`]** - Route definitions, template compilation, the ordered
//!   [`route::RouteCollection`], and YAML/JSON route tables
//! - **[`request`]** - [`request::RequestContext`] and [`request::Parameters`]
//! - **[`matcher`]** - [`matcher::RequestMatcher`] and the regex-based
//!   [`matcher::PatternMatcher`]
//! - **[`handler`]** - Handler identifiers, resolution through classes and
//!   services, argument binding and invocation
//! - **[`response`]** - [`response::ResponseMapper`] implementations
//! - **[`url_generator`]** - Reverse routing and the ambient context
//! - **[`router`]** - The [`Router`] orchestrator and dispatch options
//! - **[`runtime_config`]** / **[`logging`]** - Environment configuration
//! - **[`cli`]** - The `switchyard` inspection binary
//!
//! ### Request Handling Flow
//!
//! ```mermaid
//! sequenceDiagram
//!     participant Caller
//!     participant Router
//!     participant Matcher as RequestMatcher
//!     participant Dispatcher as HandlerDispatcher
//!     participant Parser as HandlerParser
//!     participant Handler
//!     participant Mapper as ResponseMapper
//!
//!     Caller->>Router: dispatch(RequestContext)
//!     Router->>Matcher: match_request(ctx, routes)
//!     alt No route matched
//!         Matcher-->>Router: MatchContext (NoMatch)
//!         Router-->>Caller: Err(NoRouteMatch)
//!     else Route matched
//!         Matcher-->>Router: MatchContext (Match, name, params)
//!         Router->>Router: depth check, enter DispatchScope
//!         Router->>Dispatcher: dispatch_handler(router, ctx, match)
//!         Dispatcher->>Parser: resolve(HandlerId)
//!         Parser-->>Dispatcher: Invocable
//!         Dispatcher->>Handler: invoke(HandlerCall)
//!         Handler-->>Dispatcher: raw Value
//!         Dispatcher-->>Router: raw Value
//!         Router->>Mapper: map_response(raw)
//!         Router->>Router: leave DispatchScope (pop, restore)
//!         Router-->>Caller: Ok(response)
//!     end
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use switchyard::handler::{HandlerParser, Invocable, MethodTable};
//! use switchyard::request::RequestContext;
//! use switchyard::route::{Route, RouteCollection};
//! use switchyard::runtime_config::RuntimeConfig;
//! use switchyard::Router;
//! use http::Method;
//! use serde_json::json;
//!
//! let routes = RouteCollection::from_routes([
//!     Route::builder("home", "/").method(Method::GET).handler("Pages::home").build()?,
//! ])?;
//! let parser = HandlerParser::new().class(
//!     "Pages",
//!     MethodTable::new().method("home", Invocable::new(|_| Ok(json!("ok")))),
//! );
//! let router = Router::builder(routes)
//!     .config(RuntimeConfig::default())
//!     .parser(parser)
//!     .build()?;
//!
//! let response = router.dispatch(&RequestContext::new(Method::GET, "/"))?;
//! assert_eq!(response, json!("ok"));
//! # Ok::<(), switchyard::RoutingError>(())
//! ```
//!
//! ## Configuration
//!
//! Runtime behavior is read from `SWITCHYARD_*` environment variables; see
//! [`runtime_config`] and [`logging`].

pub mod cli;
pub mod error;
pub mod handler;
pub mod ids;
pub mod logging;
pub mod matcher;
pub mod request;
pub mod response;
pub mod route;
pub mod router;
pub mod runtime_config;
pub mod url_generator;

pub use error::{Result, RoutingError};
pub use matcher::{MatchContext, MatchStatus};
pub use request::{Parameters, RequestContext};
pub use route::{load_routes, Route, RouteCollection};
pub use router::{DispatchOptions, Router};
pub use url_generator::{UrlGenerator, UrlType};
