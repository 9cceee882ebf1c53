//! # Route Module
//!
//! Route definitions and the ordered [`RouteCollection`] registry.
//!
//! ## Architecture
//!
//! Routes are compiled once, at configuration time:
//!
//! 1. **Compilation**: path templates such as `/users/{id}` (and optional host
//!    templates such as `{tenant}.example.com`) become anchored regexes with an
//!    ordered list of capture names. Handler identifiers are parsed into
//!    [`crate::handler::HandlerId`] at the same moment.
//! 2. **Lookup**: the collection keeps registration order, which is the
//!    first-match-wins priority used by the matcher, plus a name index used by
//!    URL generation and route introspection.
//!
//! ## Example
//!
//! ```rust
//! use switchyard::route::{Route, RouteCollection};
//! use http::Method;
//!
//! let routes = RouteCollection::from_routes([
//!     Route::builder("home", "/").method(Method::GET).handler("Pages::home").build()?,
//!     Route::builder("user.show", "/users/{id}").handler("users@show").build()?,
//! ])?;
//! assert!(routes.has("user.show"));
//! # Ok::<(), switchyard::RoutingError>(())
//! ```

mod collection;
mod core;
mod load;
mod template;

pub use self::core::{Route, RouteBuilder};
pub use collection::RouteCollection;
pub use load::{
    load_routes, load_routes_from_str, RouteDefinition, RouteTable, Scalar, TableFormat,
};
pub use template::{Capture, Template, TemplateKind, Token};
