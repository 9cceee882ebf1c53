//! Error taxonomy for matching, handler resolution, URL generation and dispatch.

use http::Method;
use thiserror::Error;

/// Errors raised by the routing core.
///
/// A request that matches nothing is *not* an error at the matcher layer
/// (see [`crate::matcher::MatchContext`]); it only becomes
/// [`RoutingError::NoRouteMatch`] once [`crate::router::Router::dispatch`]
/// decides the absence is fatal.
#[derive(Error, Debug)]
pub enum RoutingError {
    /// `dispatch()` found no route satisfying the request
    #[error("no route matches {method} {path}")]
    NoRouteMatch {
        /// Method of the unmatched request
        method: Method,
        /// Path of the unmatched request
        path: String,
    },
    /// A route name was referenced that is not registered
    #[error("route '{name}' is not registered")]
    RouteNotFound {
        /// The unknown route name
        name: String,
    },
    /// A route name was registered twice
    #[error("route '{name}' is already registered")]
    DuplicateRoute {
        /// The duplicated route name
        name: String,
    },
    /// A route definition could not be compiled
    #[error("invalid route '{name}': {reason}")]
    InvalidRoute {
        /// Name of the offending route
        name: String,
        /// What is wrong with it
        reason: String,
    },
    /// A handler identifier could not be resolved to something invocable
    #[error("no routing handler could be found for '{identifier}'")]
    HandlerResolution {
        /// The raw handler identifier
        identifier: String,
    },
    /// URL generation lacked a value for a required capture
    #[error("route '{route}' requires parameter '{parameter}'")]
    MissingParameter {
        /// Route being generated
        route: String,
        /// Capture without a value
        parameter: String,
    },
    /// URL generation received a value that the capture would not match back
    #[error("parameter '{parameter}' of route '{route}' does not accept '{value}'")]
    InvalidParameter {
        /// Route being generated
        route: String,
        /// Offending capture
        parameter: String,
        /// Rejected value
        value: String,
    },
    /// A declared handler argument could not be bound from the match parameters
    #[error("handler '{handler}' requires argument '{argument}'")]
    MissingArgument {
        /// Handler identifier
        handler: String,
        /// Unbound argument name
        argument: String,
    },
    /// A dispatch option carried a value that cannot be used
    #[error("invalid dispatch option '{option}': '{value}'")]
    InvalidOption {
        /// Option key
        option: String,
        /// Rejected value
        value: String,
    },
    /// Nested dispatch went deeper than the configured limit
    #[error("dispatch depth limit of {limit} exceeded while entering route '{route}'")]
    DispatchDepthExceeded {
        /// Configured maximum depth
        limit: usize,
        /// Route that would have exceeded it
        route: String,
    },
    /// Error raised by the invoked handler itself, passed through untouched
    #[error(transparent)]
    Handler(#[from] anyhow::Error),
}

impl RoutingError {
    /// Builds an [`RoutingError::InvalidRoute`].
    pub(crate) fn invalid_route(name: &str, reason: impl Into<String>) -> Self {
        RoutingError::InvalidRoute {
            name: name.to_string(),
            reason: reason.into(),
        }
    }

    /// Builds a [`RoutingError::HandlerResolution`].
    pub(crate) fn unresolved(identifier: impl Into<String>) -> Self {
        RoutingError::HandlerResolution {
            identifier: identifier.into(),
        }
    }

    /// Returns the handler's own error when this is a [`RoutingError::Handler`].
    #[must_use]
    pub fn handler_error(&self) -> Option<&anyhow::Error> {
        match self {
            RoutingError::Handler(err) => Some(err),
            _ => None,
        }
    }
}

/// Result alias used throughout the crate.
pub type Result<T, E = RoutingError> = std::result::Result<T, E>;
