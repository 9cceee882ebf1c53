use super::options::DispatchOptions;
use super::scope::{AmbientSwap, DispatchScope};
use crate::error::{Result, RoutingError};
use crate::handler::{HandlerDispatcher, HandlerParser};
use crate::ids::DispatchId;
use crate::matcher::{MatchContext, PatternMatcher, RequestMatcher};
use crate::request::{Parameters, RequestContext};
use crate::response::{PassResponseMapper, ResponseMapper};
use crate::route::{Route, RouteCollection};
use crate::runtime_config::RuntimeConfig;
use crate::url_generator::{UrlGenerator, UrlType};
use once_cell::unsync::OnceCell;
use serde_json::Value;
use std::cell::RefCell;
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, info_span, warn};

/// Top-level orchestrator: matching, dispatch, URL generation and the
/// dispatch stack.
///
/// A router is confined to one thread (its dispatch stack and the
/// generator's ambient context are shared mutable state). Handlers receive
/// `&Router` and may dispatch again; nested dispatches unwind in LIFO order.
pub struct Router {
    routes: Arc<RouteCollection>,
    matcher: Box<dyn RequestMatcher>,
    handlers: HandlerDispatcher,
    response: Box<dyn ResponseMapper>,
    generator: OnceCell<UrlGenerator>,
    stack: RefCell<Vec<String>>,
    config: RuntimeConfig,
}

impl Router {
    /// Router with the default matcher, an empty handler parser, the
    /// identity response mapper and a lazily created URL generator.
    ///
    /// Handlers are not validated; use [`Router::builder`] for that.
    #[must_use]
    pub fn new(routes: impl Into<Arc<RouteCollection>>) -> Self {
        Self {
            routes: routes.into(),
            matcher: Box::new(PatternMatcher),
            handlers: HandlerDispatcher::default(),
            response: Box::new(PassResponseMapper),
            generator: OnceCell::new(),
            stack: RefCell::new(Vec::new()),
            config: RuntimeConfig::default(),
        }
    }

    #[must_use]
    pub fn builder(routes: impl Into<Arc<RouteCollection>>) -> RouterBuilder {
        RouterBuilder {
            routes: routes.into(),
            matcher: None,
            handlers: None,
            response: None,
            generator: None,
            config: RuntimeConfig::from_env(),
        }
    }

    #[must_use]
    pub fn routes(&self) -> &Arc<RouteCollection> {
        &self.routes
    }

    #[must_use]
    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    /// Match `request` and dispatch the matched route.
    ///
    /// Fails with [`RoutingError::NoRouteMatch`] when nothing matches.
    pub fn dispatch(&self, request: &RequestContext) -> Result<Value> {
        let matched = self.matcher.match_request(request, &self.routes);
        if !matched.is_match() {
            warn!(
                method = %request.method(),
                path = %request.path(),
                "No route matched"
            );
            return Err(RoutingError::NoRouteMatch {
                method: request.method().clone(),
                path: request.path().to_string(),
            });
        }
        self.do_dispatch(request.clone(), matched)
    }

    /// Dispatch the route `name` directly, without matching.
    ///
    /// `options` describe the synthetic request the route runs under. The
    /// route's URL is generated against that request; it is relative when
    /// the host is the default `localhost` and absolute otherwise, unless
    /// `options.url_type` says otherwise.
    pub fn dispatch_route(
        &self,
        name: &str,
        parameters: &Parameters,
        options: &DispatchOptions,
    ) -> Result<Value> {
        let route = Arc::clone(self.routes.get(name)?);
        let options = options.resolve()?;
        let synthetic = options.request_context();
        let generator = self.generator();

        let (path, url) = {
            let _swap = AmbientSwap::enter(generator, synthetic.clone());
            let host = Some(options.host.as_str());
            let relative = generator.generate(name, parameters, host, UrlType::RelativePath)?;
            let url = match options.url_type {
                UrlType::RelativePath => relative.clone(),
                UrlType::AbsolutePath => {
                    generator.generate(name, parameters, host, UrlType::AbsolutePath)?
                }
            };
            (path_of(&relative, &options.base_path), url)
        };

        let request = RequestContext::builder()
            .method(options.method.clone())
            .host(&options.host)
            .port(options.port)
            .query(&options.query)
            .scheme(&options.scheme)
            .base_path(&options.base_path)
            .path(&path)
            .build();

        let mut params = parameters.clone();
        for (key, value) in route.defaults().iter() {
            if !params.contains(key) {
                params.insert(key, value);
            }
        }
        let matched = MatchContext::matched(name, &url, route.handler().clone(), params);
        self.do_dispatch(request, matched)
    }

    /// Run the matched handler under `request`.
    ///
    /// For the duration of the call the generator's ambient context is
    /// `request` and `matched`'s route name is on top of the dispatch stack.
    /// Both are undone on every exit path.
    fn do_dispatch(&self, request: RequestContext, matched: MatchContext) -> Result<Value> {
        let route_name = matched.name().unwrap_or_default().to_string();
        let depth = self.depth();
        if !self.config.allows_depth(depth) {
            warn!(
                route_name = %route_name,
                depth = depth,
                limit = self.config.max_dispatch_depth,
                "Dispatch depth limit reached"
            );
            return Err(RoutingError::DispatchDepthExceeded {
                limit: self.config.max_dispatch_depth,
                route: route_name,
            });
        }

        let dispatch_id = DispatchId::new();
        let span = info_span!(
            "dispatch",
            dispatch_id = %dispatch_id,
            route_name = %route_name,
            depth = depth + 1
        );
        let _entered = span.enter();
        let started = Instant::now();

        let scope =
            DispatchScope::enter(self.generator(), &self.stack, request.clone(), &route_name);
        let raw = self.handlers.dispatch_handler(self, &request, &matched)?;
        let response = self.response.map_response(raw);
        drop(scope);

        info!(
            route_name = %route_name,
            method = %request.method(),
            path = %matched.path(),
            duration_us = started.elapsed().as_micros() as u64,
            "Dispatch complete"
        );
        Ok(response)
    }

    /// Outermost route currently executing.
    #[must_use]
    pub fn first_route(&self) -> Option<Arc<Route>> {
        self.first_route_name()
            .and_then(|name| self.routes.get(&name).ok().map(Arc::clone))
    }

    #[must_use]
    pub fn first_route_name(&self) -> Option<String> {
        self.stack.borrow().first().cloned()
    }

    /// Innermost route currently executing.
    #[must_use]
    pub fn current_route(&self) -> Option<Arc<Route>> {
        self.current_route_name()
            .and_then(|name| self.routes.get(&name).ok().map(Arc::clone))
    }

    #[must_use]
    pub fn current_route_name(&self) -> Option<String> {
        self.stack.borrow().last().cloned()
    }

    /// Snapshot of the dispatch stack, outermost first.
    #[must_use]
    pub fn dispatch_stack(&self) -> Vec<String> {
        self.stack.borrow().clone()
    }

    #[must_use]
    pub fn depth(&self) -> usize {
        self.stack.borrow().len()
    }

    /// The URL generator, created on first use and bound to this router's routes.
    pub fn generator(&self) -> &UrlGenerator {
        self.generator
            .get_or_init(|| UrlGenerator::new(Arc::clone(&self.routes)))
    }

    #[must_use]
    pub fn handlers(&self) -> &HandlerDispatcher {
        &self.handlers
    }

    /// Resolve every route's handler once.
    pub fn validate_handlers(&self) -> Result<()> {
        self.handlers.parser().validate(&self.routes)
    }
}

/// Strip `base_path` and query string from a relative URL.
fn path_of(relative: &str, base_path: &str) -> String {
    let without_query = relative.split('?').next().unwrap_or(relative);
    let base = base_path.trim_end_matches('/');
    without_query
        .strip_prefix(base)
        .filter(|rest| rest.starts_with('/'))
        .unwrap_or(without_query)
        .to_string()
}

/// Builder for [`Router`] with injectable collaborators.
pub struct RouterBuilder {
    routes: Arc<RouteCollection>,
    matcher: Option<Box<dyn RequestMatcher>>,
    handlers: Option<HandlerDispatcher>,
    response: Option<Box<dyn ResponseMapper>>,
    generator: Option<UrlGenerator>,
    config: RuntimeConfig,
}

impl RouterBuilder {
    #[must_use]
    pub fn matcher(mut self, matcher: impl RequestMatcher + 'static) -> Self {
        self.matcher = Some(Box::new(matcher));
        self
    }

    #[must_use]
    pub fn handlers(mut self, handlers: HandlerDispatcher) -> Self {
        self.handlers = Some(handlers);
        self
    }

    /// Shorthand for `handlers(HandlerDispatcher::new(parser))`.
    #[must_use]
    pub fn parser(self, parser: HandlerParser) -> Self {
        self.handlers(HandlerDispatcher::new(parser))
    }

    #[must_use]
    pub fn response_mapper(mut self, mapper: impl ResponseMapper + 'static) -> Self {
        self.response = Some(Box::new(mapper));
        self
    }

    /// Use an existing generator. Its route collection is left as is.
    #[must_use]
    pub fn generator(mut self, generator: UrlGenerator) -> Self {
        self.generator = Some(generator);
        self
    }

    #[must_use]
    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    /// Build the router, resolving every handler first when
    /// `config.validate_handlers` is set.
    pub fn build(self) -> Result<Router> {
        let generator = match self.generator {
            Some(g) => OnceCell::with_value(g),
            None => OnceCell::new(),
        };
        let router = Router {
            routes: self.routes,
            matcher: self.matcher.unwrap_or_else(|| Box::new(PatternMatcher)),
            handlers: self.handlers.unwrap_or_default(),
            response: self
                .response
                .unwrap_or_else(|| Box::new(PassResponseMapper)),
            generator,
            stack: RefCell::new(Vec::new()),
            config: self.config,
        };
        if router.config.validate_handlers {
            router.validate_handlers()?;
        }
        info!(
            routes_count = router.routes.len(),
            max_dispatch_depth = router.config.max_dispatch_depth,
            "Router ready"
        );
        Ok(router)
    }
}
