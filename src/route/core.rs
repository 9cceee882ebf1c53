use super::template::{Template, TemplateKind};
use crate::error::{Result, RoutingError};
use crate::handler::{HandlerId, Invocable};
use crate::request::Parameters;
use http::Method;
use std::collections::HashMap;

/// A named, immutable rule mapping a path/method/host pattern to a handler.
///
/// Templates are compiled and the handler identifier is parsed when the route
/// is built, so a `Route` that exists is always well-formed.
#[derive(Debug, Clone)]
pub struct Route {
    name: String,
    path: Template,
    methods: Vec<Method>,
    host: Option<Template>,
    schemes: Vec<String>,
    handler: HandlerId,
    requirements: HashMap<String, String>,
    defaults: Parameters,
}

impl Route {
    /// Start building a route named `name` for the path template `path`.
    #[must_use]
    pub fn builder(name: &str, path: &str) -> RouteBuilder {
        RouteBuilder {
            name: name.to_string(),
            path: path.to_string(),
            methods: Vec::new(),
            host: None,
            schemes: Vec::new(),
            handler: None,
            requirements: HashMap::new(),
            defaults: Parameters::new(),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Compiled path template
    #[must_use]
    pub fn path(&self) -> &Template {
        &self.path
    }

    /// Allowed methods; empty means any method.
    #[must_use]
    pub fn methods(&self) -> &[Method] {
        &self.methods
    }

    #[must_use]
    pub fn host(&self) -> Option<&Template> {
        self.host.as_ref()
    }

    /// Allowed schemes; empty means any scheme.
    #[must_use]
    pub fn schemes(&self) -> &[String] {
        &self.schemes
    }

    #[must_use]
    pub fn handler(&self) -> &HandlerId {
        &self.handler
    }

    #[must_use]
    pub fn requirements(&self) -> &HashMap<String, String> {
        &self.requirements
    }

    #[must_use]
    pub fn defaults(&self) -> &Parameters {
        &self.defaults
    }

    #[must_use]
    pub fn allows_method(&self, method: &Method) -> bool {
        self.methods.is_empty() || self.methods.contains(method)
    }

    #[must_use]
    pub fn allows_scheme(&self, scheme: &str) -> bool {
        self.schemes.is_empty() || self.schemes.iter().any(|s| s.eq_ignore_ascii_case(scheme))
    }
}

enum HandlerSource {
    Raw(String),
    Id(HandlerId),
}

/// Builder for [`Route`].
pub struct RouteBuilder {
    name: String,
    path: String,
    methods: Vec<Method>,
    host: Option<String>,
    schemes: Vec<String>,
    handler: Option<HandlerSource>,
    requirements: HashMap<String, String>,
    defaults: Parameters,
}

impl RouteBuilder {
    /// Add an allowed method.
    #[must_use]
    pub fn method(mut self, method: Method) -> Self {
        if !self.methods.contains(&method) {
            self.methods.push(method);
        }
        self
    }

    #[must_use]
    pub fn methods(mut self, methods: impl IntoIterator<Item = Method>) -> Self {
        for m in methods {
            self = self.method(m);
        }
        self
    }

    /// Restrict the route to a host; `{name}` captures are allowed.
    #[must_use]
    pub fn host(mut self, host: &str) -> Self {
        self.host = Some(host.to_string());
        self
    }

    #[must_use]
    pub fn scheme(mut self, scheme: &str) -> Self {
        self.schemes.push(scheme.to_ascii_lowercase());
        self
    }

    /// Handler identifier in `Class::method` or `service@method` form.
    #[must_use]
    pub fn handler(mut self, identifier: &str) -> Self {
        self.handler = Some(HandlerSource::Raw(identifier.to_string()));
        self
    }

    /// An already-parsed handler identifier.
    #[must_use]
    pub fn handler_id(mut self, id: HandlerId) -> Self {
        self.handler = Some(HandlerSource::Id(id));
        self
    }

    /// Attach an invocable directly, bypassing identifier parsing.
    #[must_use]
    pub fn invocable(self, invocable: Invocable) -> Self {
        self.handler_id(HandlerId::Direct(invocable))
    }

    /// Replace the default capture pattern of `name` with `pattern`.
    #[must_use]
    pub fn requirement(mut self, name: &str, pattern: &str) -> Self {
        self.requirements
            .insert(name.to_string(), pattern.to_string());
        self
    }

    /// Value used for `name` when neither the request nor the caller supplies one.
    #[must_use]
    pub fn default(mut self, name: &str, value: &str) -> Self {
        self.defaults.insert(name, value);
        self
    }

    pub fn build(self) -> Result<Route> {
        if self.name.trim().is_empty() {
            return Err(RoutingError::invalid_route(&self.name, "route name is empty"));
        }
        if !self.path.starts_with('/') {
            return Err(RoutingError::invalid_route(
                &self.name,
                format!("path '{}' must start with '/'", self.path),
            ));
        }

        let path = Template::compile(&self.path, TemplateKind::Path, &self.requirements)
            .map_err(|reason| RoutingError::invalid_route(&self.name, reason))?;
        let host = match &self.host {
            Some(h) => Some(
                Template::compile(h, TemplateKind::Host, &self.requirements)
                    .map_err(|reason| RoutingError::invalid_route(&self.name, reason))?,
            ),
            None => None,
        };

        if let Some(host) = &host {
            if let Some(dup) = host
                .capture_names()
                .find(|n| path.capture_names().any(|p| p == *n))
            {
                return Err(RoutingError::invalid_route(
                    &self.name,
                    format!("capture '{dup}' appears in both host and path"),
                ));
            }
        }

        let handler = match self.handler {
            Some(HandlerSource::Raw(raw)) => HandlerId::parse(&raw)?,
            Some(HandlerSource::Id(id)) => id,
            None => return Err(RoutingError::invalid_route(&self.name, "no handler configured")),
        };

        Ok(Route {
            name: self.name,
            path,
            methods: self.methods,
            host,
            schemes: self.schemes,
            handler,
            requirements: self.requirements,
            defaults: self.defaults,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_parses_handler_at_registration() {
        let route = Route::builder("user.show", "/users/{id}")
            .method(Method::GET)
            .handler("users@show")
            .build()
            .unwrap();
        assert_eq!(route.handler().to_string(), "users@show");
        assert!(route.allows_method(&Method::GET));
        assert!(!route.allows_method(&Method::POST));
    }

    #[test]
    fn malformed_handler_fails_at_build() {
        let err = Route::builder("bad", "/x").handler("nonsense").build().unwrap_err();
        assert!(matches!(err, RoutingError::HandlerResolution { ref identifier } if identifier == "nonsense"));
    }

    #[test]
    fn missing_handler_and_bad_path_are_rejected() {
        assert!(matches!(
            Route::builder("a", "/x").build(),
            Err(RoutingError::InvalidRoute { .. })
        ));
        assert!(matches!(
            Route::builder("a", "x").handler("A::b").build(),
            Err(RoutingError::InvalidRoute { .. })
        ));
    }

    #[test]
    fn host_and_path_captures_must_not_collide() {
        let err = Route::builder("a", "/{id}")
            .host("{id}.example.com")
            .handler("A::b")
            .build()
            .unwrap_err();
        assert!(matches!(err, RoutingError::InvalidRoute { .. }));
    }

    #[test]
    fn empty_method_list_allows_anything() {
        let route = Route::builder("any", "/").handler("A::b").build().unwrap();
        assert!(route.allows_method(&Method::PATCH));
        assert!(route.allows_scheme("https"));
    }
}
