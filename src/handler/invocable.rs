use crate::error::{Result, RoutingError};
use crate::matcher::MatchContext;
use crate::request::{Parameters, RequestContext};
use crate::router::Router;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// Signature shared by every handler.
pub type HandlerFn = dyn Fn(&HandlerCall<'_>) -> anyhow::Result<Value> + Send + Sync;

/// A declared handler argument, bound by name from the match parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Argument {
    pub name: String,
    pub default: Option<String>,
}

/// Something the dispatcher can call.
///
/// Cheap to clone: the function is shared behind an `Arc`.
#[derive(Clone)]
pub struct Invocable {
    func: Arc<HandlerFn>,
    arguments: Vec<Argument>,
}

impl fmt::Debug for Invocable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Invocable")
            .field("arguments", &self.arguments)
            .finish_non_exhaustive()
    }
}

impl Invocable {
    pub fn new<F>(func: F) -> Self
    where
        F: Fn(&HandlerCall<'_>) -> anyhow::Result<Value> + Send + Sync + 'static,
    {
        Self {
            func: Arc::new(func),
            arguments: Vec::new(),
        }
    }

    /// Declare a required argument. Arguments are passed to the handler in
    /// declaration order through [`HandlerCall::args`].
    #[must_use]
    pub fn with_argument(mut self, name: &str) -> Self {
        self.arguments.push(Argument {
            name: name.to_string(),
            default: None,
        });
        self
    }

    /// Declare an argument that falls back to `default` when unmatched.
    #[must_use]
    pub fn with_optional_argument(mut self, name: &str, default: &str) -> Self {
        self.arguments.push(Argument {
            name: name.to_string(),
            default: Some(default.to_string()),
        });
        self
    }

    #[must_use]
    pub fn arguments(&self) -> &[Argument] {
        &self.arguments
    }

    /// Bind declared arguments from `params`.
    pub(crate) fn bind(&self, handler: &str, params: &Parameters) -> Result<Vec<String>> {
        self.arguments
            .iter()
            .map(|arg| {
                params
                    .get(&arg.name)
                    .map(str::to_string)
                    .or_else(|| arg.default.clone())
                    .ok_or_else(|| RoutingError::MissingArgument {
                        handler: handler.to_string(),
                        argument: arg.name.clone(),
                    })
            })
            .collect()
    }

    pub fn invoke(&self, call: &HandlerCall<'_>) -> anyhow::Result<Value> {
        (self.func)(call)
    }
}

/// Everything a handler can see while it runs.
///
/// The router reference allows nested `dispatch`/`dispatch_route` calls and
/// URL generation against the ambient context of this dispatch.
pub struct HandlerCall<'a> {
    router: &'a Router,
    request: &'a RequestContext,
    matched: &'a MatchContext,
    args: Vec<String>,
}

impl<'a> HandlerCall<'a> {
    pub(crate) fn new(
        router: &'a Router,
        request: &'a RequestContext,
        matched: &'a MatchContext,
        args: Vec<String>,
    ) -> Self {
        Self {
            router,
            request,
            matched,
            args,
        }
    }

    /// Bound arguments in declaration order.
    #[must_use]
    pub fn args(&self) -> &[String] {
        &self.args
    }

    #[must_use]
    pub fn param(&self, name: &str) -> Option<&str> {
        self.matched.parameters().get(name)
    }

    /// Like [`HandlerCall::param`] but fails when absent.
    pub fn require(&self, name: &str) -> anyhow::Result<&str> {
        self.param(name)
            .ok_or_else(|| anyhow::anyhow!("parameter '{name}' is not available"))
    }

    #[must_use]
    pub fn parameters(&self) -> &Parameters {
        self.matched.parameters()
    }

    #[must_use]
    pub fn request(&self) -> &RequestContext {
        self.request
    }

    #[must_use]
    pub fn route_name(&self) -> Option<&str> {
        self.matched.name()
    }

    #[must_use]
    pub fn matched(&self) -> &MatchContext {
        self.matched
    }

    #[must_use]
    pub fn router(&self) -> &Router {
        self.router
    }
}
