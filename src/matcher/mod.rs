//! # Matcher Module
//!
//! Matches a [`crate::request::RequestContext`] against a
//! [`crate::route::RouteCollection`] and reports the outcome as a
//! [`MatchContext`].
//!
//! The matcher never fails: an unmatched request yields
//! `MatchStatus::NoMatch`. Turning that into an error is the router's job.
//!
//! ## Example
//!
//! ```rust
//! use switchyard::matcher::{PatternMatcher, RequestMatcher};
//! use switchyard::request::RequestContext;
//! use switchyard::route::{Route, RouteCollection};
//! use http::Method;
//!
//! let routes = RouteCollection::from_routes([
//!     Route::builder("user.show", "/users/{id}").method(Method::GET).handler("users@show").build()?,
//! ])?;
//! let m = PatternMatcher.match_request(&RequestContext::new(Method::GET, "/users/42"), &routes);
//! assert!(m.is_match());
//! assert_eq!(m.parameters().get("id"), Some("42"));
//! # Ok::<(), switchyard::RoutingError>(())
//! ```

mod core;
#[cfg(test)]
mod tests;

pub use self::core::{MatchContext, MatchStatus, PatternMatcher, RequestMatcher};
