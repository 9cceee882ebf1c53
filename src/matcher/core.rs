//! Matcher core - hot path for request matching.

use crate::handler::HandlerId;
use crate::request::{Parameters, RequestContext};
use crate::route::{Route, RouteCollection};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Matches above this duration are logged as slow.
const SLOW_MATCH_THRESHOLD: Duration = Duration::from_millis(1);

/// Outcome of a matching attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchStatus {
    NoMatch,
    Match,
}

/// Result of matching a [`RequestContext`] against a [`RouteCollection`].
///
/// A `NoMatch` result is ordinary data; whether it is fatal is the caller's
/// decision.
#[derive(Debug, Clone)]
pub struct MatchContext {
    status: MatchStatus,
    name: Option<String>,
    path: String,
    handler: Option<HandlerId>,
    parameters: Parameters,
}

impl MatchContext {
    /// A successful match.
    #[must_use]
    pub fn matched(name: &str, path: &str, handler: HandlerId, parameters: Parameters) -> Self {
        Self {
            status: MatchStatus::Match,
            name: Some(name.to_string()),
            path: path.to_string(),
            handler: Some(handler),
            parameters,
        }
    }

    /// No route matched `path`.
    #[must_use]
    pub fn no_match(path: &str) -> Self {
        Self {
            status: MatchStatus::NoMatch,
            name: None,
            path: path.to_string(),
            handler: None,
            parameters: Parameters::new(),
        }
    }

    #[must_use]
    pub fn is_match(&self) -> bool {
        self.status == MatchStatus::Match
    }

    #[must_use]
    pub fn status(&self) -> MatchStatus {
        self.status
    }

    /// Route name, present iff matched.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Matched request path, or the generated URL for dispatch by name.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    #[must_use]
    pub fn handler(&self) -> Option<&HandlerId> {
        self.handler.as_ref()
    }

    /// Captured parameters in capture order (path, then host, then route defaults).
    #[must_use]
    pub fn parameters(&self) -> &Parameters {
        &self.parameters
    }
}

/// Matches a request against a route collection.
pub trait RequestMatcher {
    fn match_request(&self, request: &RequestContext, routes: &RouteCollection) -> MatchContext;
}

/// First-match-wins matcher walking routes in registration order.
///
/// A route matches when its method, scheme, host and path constraints all
/// hold. There is no specificity ranking: registration order is the only
/// tie-break. Matching is pure.
#[derive(Debug, Clone, Copy, Default)]
pub struct PatternMatcher;

impl PatternMatcher {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Test one route; returns captured parameters on success.
    #[must_use]
    pub fn match_route(&self, route: &Route, request: &RequestContext) -> Option<Parameters> {
        if !route.allows_method(request.method()) || !route.allows_scheme(request.scheme()) {
            return None;
        }

        let host_captures = match route.host() {
            Some(host) => Some(host.match_captures(request.host())?),
            None => None,
        };
        let path_captures = route.path().match_captures(request.path())?;

        let mut params = Parameters::new();
        for (name, value) in path_captures {
            params.insert_shared(name, value);
        }
        for (name, value) in host_captures.into_iter().flatten() {
            params.insert_shared(name, value);
        }
        for (name, value) in route.defaults().iter() {
            if !params.contains(name) {
                params.insert(name, value);
            }
        }
        Some(params)
    }
}

impl RequestMatcher for PatternMatcher {
    fn match_request(&self, request: &RequestContext, routes: &RouteCollection) -> MatchContext {
        debug!(
            method = %request.method(),
            host = %request.host(),
            path = %request.path(),
            "Route match attempt"
        );
        let started = Instant::now();

        for route in routes {
            if let Some(params) = self.match_route(route, request) {
                let duration = started.elapsed();
                if duration > SLOW_MATCH_THRESHOLD {
                    warn!(
                        method = %request.method(),
                        path = %request.path(),
                        route_name = %route.name(),
                        duration_us = duration.as_micros() as u64,
                        "Slow route matching detected"
                    );
                } else {
                    info!(
                        method = %request.method(),
                        path = %request.path(),
                        route_name = %route.name(),
                        route_pattern = %route.path().source(),
                        path_params = ?params,
                        duration_us = duration.as_micros() as u64,
                        "Route matched"
                    );
                }
                return MatchContext::matched(
                    route.name(),
                    request.path(),
                    route.handler().clone(),
                    params,
                );
            }
        }

        debug!(
            method = %request.method(),
            path = %request.path(),
            routes_checked = routes.len(),
            duration_us = started.elapsed().as_micros() as u64,
            "No route matched"
        );
        MatchContext::no_match(request.path())
    }
}
