use super::invocable::HandlerCall;
use super::parser::HandlerParser;
use crate::error::{Result, RoutingError};
use crate::matcher::MatchContext;
use crate::request::RequestContext;
use crate::router::Router;
use serde_json::Value;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Invokes the handler of a [`MatchContext`] with its captured parameters.
///
/// Resolution failures and the handler's own errors are returned unchanged;
/// nothing is caught or translated here.
#[derive(Default)]
pub struct HandlerDispatcher {
    parser: HandlerParser,
}

impl HandlerDispatcher {
    #[must_use]
    pub fn new(parser: HandlerParser) -> Self {
        Self { parser }
    }

    #[must_use]
    pub fn parser(&self) -> &HandlerParser {
        &self.parser
    }

    /// Resolve, bind and invoke the matched handler.
    pub fn dispatch_handler(
        &self,
        router: &Router,
        request: &RequestContext,
        matched: &MatchContext,
    ) -> Result<Value> {
        let id = matched.handler().ok_or_else(|| {
            RoutingError::invalid_route(
                matched.name().unwrap_or_default(),
                "match carries no handler",
            )
        })?;
        let invocable = self.parser.resolve(id)?;
        let handler_name = id.to_string();
        let args = invocable.bind(&handler_name, matched.parameters())?;

        debug!(
            handler_name = %handler_name,
            route_name = ?matched.name(),
            parameters = ?matched.parameters(),
            "Handler execution start"
        );
        let started = Instant::now();

        let call = HandlerCall::new(router, request, matched, args);
        match invocable.invoke(&call) {
            Ok(value) => {
                info!(
                    handler_name = %handler_name,
                    execution_time_us = started.elapsed().as_micros() as u64,
                    "Handler execution complete"
                );
                Ok(value)
            }
            Err(err) => {
                // Nested routing errors surface from inner dispatches unchanged.
                let err = match err.downcast::<RoutingError>() {
                    Ok(routing) => routing,
                    Err(other) => RoutingError::Handler(other),
                };
                warn!(
                    handler_name = %handler_name,
                    error = %err,
                    execution_time_us = started.elapsed().as_micros() as u64,
                    "Handler execution failed"
                );
                Err(err)
            }
        }
    }
}
