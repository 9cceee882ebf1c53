//! # Handler Module
//!
//! Turns a route's handler identifier into something callable and calls it.
//!
//! ## Identifier forms
//!
//! | Form             | Variant                  | Resolved through                         |
//! |------------------|--------------------------|------------------------------------------|
//! | `Class::method`  | [`HandlerId::Static`]    | class registry, static method table      |
//! | `service@method` | [`HandlerId::Service`]   | service map, then instantiable classes   |
//! | invocable value  | [`HandlerId::Direct`]    | nothing, called as is                    |
//!
//! Identifiers are parsed when a route is built, so the dispatch path only
//! performs map lookups. [`HandlerParser::validate`] resolves a whole route
//! collection up front.
//!
//! ## Argument binding
//!
//! An [`Invocable`] may declare arguments. The dispatcher binds each one by
//! name from the match parameters (falling back to the declared default) and
//! hands them to the handler in declaration order:
//!
//! ```rust
//! use switchyard::handler::Invocable;
//! use serde_json::json;
//!
//! let show = Invocable::new(|call| Ok(json!({ "id": call.args()[0] })))
//!     .with_argument("id")
//!     .with_optional_argument("format", "json");
//! assert_eq!(show.arguments().len(), 2);
//! ```

mod dispatcher;
mod id;
mod invocable;
mod parser;

pub use dispatcher::HandlerDispatcher;
pub use id::HandlerId;
pub use invocable::{Argument, HandlerCall, HandlerFn, Invocable};
pub use parser::{ClassFactory, HandlerParser, MethodTable, Service, ServiceMap};
