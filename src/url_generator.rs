//! Reverse routing: route name + parameters → URL.
//!
//! The generator keeps an *ambient* [`RequestContext`], the context in effect
//! for URL generation right now. The router swaps it around every dispatch so
//! handlers can build host-aware URLs without threading the context through.
//! The slot is interior-mutable because the generator is shared through
//! `&Router` during nested dispatch.

use crate::error::{Result, RoutingError};
use crate::request::{default_port, Parameters, RequestContext, DEFAULT_HOST, DEFAULT_SCHEME};
use crate::route::{Route, RouteCollection, Template, Token};
use serde::Deserialize;
use std::cell::RefCell;
use std::fmt::Write as _;
use std::sync::Arc;
use tracing::debug;

/// Output format of [`UrlGenerator::generate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum UrlType {
    /// `/base/users/42`
    #[default]
    RelativePath = 0,
    /// `http://host:port/base/users/42`
    AbsolutePath = 1,
}

impl TryFrom<u8> for UrlType {
    type Error = u8;

    fn try_from(value: u8) -> std::result::Result<Self, Self::Error> {
        match value {
            0 => Ok(UrlType::RelativePath),
            1 => Ok(UrlType::AbsolutePath),
            other => Err(other),
        }
    }
}

/// Generates URLs for named routes.
#[derive(Debug)]
pub struct UrlGenerator {
    routes: RefCell<Arc<RouteCollection>>,
    context: RefCell<Option<RequestContext>>,
}

impl UrlGenerator {
    #[must_use]
    pub fn new(routes: Arc<RouteCollection>) -> Self {
        Self {
            routes: RefCell::new(routes),
            context: RefCell::new(None),
        }
    }

    /// Generator with an initial ambient context.
    #[must_use]
    pub fn with_context(routes: Arc<RouteCollection>, context: RequestContext) -> Self {
        let generator = Self::new(routes);
        generator.set_request_context(context);
        generator
    }

    pub fn set_request_context(&self, context: RequestContext) {
        *self.context.borrow_mut() = Some(context);
    }

    /// Snapshot of the ambient context, `None` if never set.
    #[must_use]
    pub fn request_context(&self) -> Option<RequestContext> {
        self.context.borrow().clone()
    }

    /// Put `context` in the slot and hand back what was there.
    pub(crate) fn replace_request_context(
        &self,
        context: Option<RequestContext>,
    ) -> Option<RequestContext> {
        std::mem::replace(&mut *self.context.borrow_mut(), context)
    }

    /// Rebind the collection used for lookups.
    pub fn set_routes(&self, routes: Arc<RouteCollection>) {
        *self.routes.borrow_mut() = routes;
    }

    #[must_use]
    pub fn routes(&self) -> Arc<RouteCollection> {
        Arc::clone(&self.routes.borrow())
    }

    /// Generate a URL for the route `name`.
    ///
    /// Every path capture takes its value from `parameters`, falling back to
    /// the route defaults. Parameters that no capture consumes are appended
    /// as a query string. For [`UrlType::AbsolutePath`] the scheme, host and
    /// non-default port come from the ambient context; `host` overrides the
    /// host.
    pub fn generate(
        &self,
        name: &str,
        parameters: &Parameters,
        host: Option<&str>,
        url_type: UrlType,
    ) -> Result<String> {
        let routes = self.routes();
        let route = routes.get(name)?;
        let context = self.context.borrow();
        let context = context.as_ref();

        let mut url = String::new();
        if let Some(ctx) = context {
            url.push_str(ctx.base_path());
        }
        url.push_str(&fill(route, route.path(), parameters)?);

        let query = leftover_query(route, parameters);
        if !query.is_empty() {
            url.push('?');
            url.push_str(&query);
        }

        if url_type == UrlType::AbsolutePath {
            let prefix = match host {
                Some(h) => authority(route, context, h, h.contains(':')),
                None => match route.host() {
                    Some(template) => {
                        let h = fill(route, template, parameters)?;
                        authority(route, context, &h, false)
                    }
                    None => {
                        let h = context.map(RequestContext::host).unwrap_or(DEFAULT_HOST);
                        authority(route, context, h, false)
                    }
                },
            };
            url.insert_str(0, &prefix);
        }

        debug!(route_name = %name, url = %url, url_type = ?url_type, "URL generated");
        Ok(url)
    }

    /// The ambient path without query string, `None` without ambient context.
    #[must_use]
    pub fn current_path(&self, url_type: UrlType) -> Option<String> {
        let context = self.context.borrow();
        let ctx = context.as_ref()?;
        let mut path = format!("{}{}", ctx.base_path(), ctx.path());
        if url_type == UrlType::AbsolutePath {
            path.insert_str(0, &context_authority(ctx));
        }
        Some(path)
    }

    /// The ambient URL including its query string.
    #[must_use]
    pub fn current_url(&self, url_type: UrlType) -> Option<String> {
        let mut url = self.current_path(url_type)?;
        let context = self.context.borrow();
        let query = context.as_ref().map(RequestContext::query).unwrap_or_default();
        if !query.is_empty() {
            url.push('?');
            url.push_str(query);
        }
        Some(url)
    }
}

/// Substitute captures of `template` with encoded values, rejecting any
/// value the template would not capture back unchanged.
fn fill(route: &Route, template: &Template, parameters: &Parameters) -> Result<String> {
    let mut out = String::with_capacity(template.source().len() + 16);
    for token in template.tokens() {
        match token {
            Token::Literal(text) => out.push_str(text),
            Token::Capture(i) => {
                let capture = &template.captures()[*i];
                let name = capture.name.as_ref();
                let value = parameters
                    .get(name)
                    .or_else(|| route.defaults().get(name))
                    .ok_or_else(|| RoutingError::MissingParameter {
                        route: route.name().to_string(),
                        parameter: name.to_string(),
                    })?;
                // Checked in encoded form, the same text the matcher sees.
                let encoded = urlencoding::encode(value);
                if value.is_empty() || !capture.pattern.is_match(&encoded) {
                    return Err(RoutingError::InvalidParameter {
                        route: route.name().to_string(),
                        parameter: name.to_string(),
                        value: value.to_string(),
                    });
                }
                out.push_str(&encoded);
            }
        }
    }
    Ok(out)
}

/// Parameters not consumed by a capture, minus values equal to route defaults.
fn leftover_query(route: &Route, parameters: &Parameters) -> String {
    let is_capture = |name: &str| {
        route.path().capture_names().any(|c| c == name)
            || route
                .host()
                .is_some_and(|h| h.capture_names().any(|c| c == name))
    };
    let mut query = String::new();
    for (name, value) in parameters.iter() {
        if is_capture(name) || route.defaults().get(name) == Some(value) {
            continue;
        }
        if !query.is_empty() {
            query.push('&');
        }
        let _ = write!(
            query,
            "{}={}",
            urlencoding::encode(name),
            urlencoding::encode(value)
        );
    }
    query
}

/// `scheme://host[:port]` for a generated URL.
fn authority(
    route: &Route,
    context: Option<&RequestContext>,
    host: &str,
    host_has_port: bool,
) -> String {
    let ambient_scheme = context.map(RequestContext::scheme).unwrap_or(DEFAULT_SCHEME);
    let scheme = if route.allows_scheme(ambient_scheme) {
        ambient_scheme
    } else {
        route.schemes().first().map(String::as_str).unwrap_or(ambient_scheme)
    };

    let mut out = format!("{scheme}://{host}");
    if !host_has_port && scheme == ambient_scheme {
        if let Some(ctx) = context {
            if ctx.port() != default_port(scheme) {
                let _ = write!(out, ":{}", ctx.port());
            }
        }
    }
    out
}

fn context_authority(ctx: &RequestContext) -> String {
    if ctx.is_default_port() {
        format!("{}://{}", ctx.scheme(), ctx.host())
    } else {
        format!("{}://{}:{}", ctx.scheme(), ctx.host(), ctx.port())
    }
}
