//! # Request Module
//!
//! Addressing information for one logical request ([`RequestContext`]) and the
//! insertion-ordered parameter map ([`Parameters`]) that flows from matching
//! into handler invocation and URL generation.

mod context;
mod params;

pub use context::{
    default_port, RequestContext, RequestContextBuilder, DEFAULT_HOST, DEFAULT_PORT,
    DEFAULT_SCHEME,
};
pub use params::{ParamVec, Parameters, MAX_INLINE_PARAMS};
