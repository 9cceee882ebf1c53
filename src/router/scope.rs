//! Scoped acquisition for the router's shared mutable state.
//!
//! Entering a dispatch swaps the generator's ambient context and pushes the
//! route name; leaving it pops and restores. Both are tied to `Drop`, so they
//! run on every exit path: normal return, `?` propagation and unwinding.
//!
//! Restoration rule: the previous ambient context is put back only if there
//! was one. When the slot was empty the dispatched context stays in effect.

use crate::request::RequestContext;
use crate::url_generator::UrlGenerator;
use std::cell::RefCell;
use tracing::trace;

/// Swaps the ambient context for the lifetime of the guard.
pub(crate) struct AmbientSwap<'a> {
    generator: &'a UrlGenerator,
    previous: Option<RequestContext>,
}

impl<'a> AmbientSwap<'a> {
    pub(crate) fn enter(generator: &'a UrlGenerator, context: RequestContext) -> Self {
        let previous = generator.replace_request_context(Some(context));
        Self {
            generator,
            previous,
        }
    }
}

impl Drop for AmbientSwap<'_> {
    fn drop(&mut self) {
        if let Some(previous) = self.previous.take() {
            self.generator.set_request_context(previous);
        }
    }
}

/// Ambient swap plus a dispatch-stack entry.
///
/// The stack entry is popped in `drop`, before the `_ambient` field restores
/// the context, mirroring the push-after-swap on entry.
pub(crate) struct DispatchScope<'a> {
    stack: &'a RefCell<Vec<String>>,
    _ambient: AmbientSwap<'a>,
}

impl<'a> DispatchScope<'a> {
    pub(crate) fn enter(
        generator: &'a UrlGenerator,
        stack: &'a RefCell<Vec<String>>,
        context: RequestContext,
        route_name: &str,
    ) -> Self {
        let ambient = AmbientSwap::enter(generator, context);
        stack.borrow_mut().push(route_name.to_string());
        trace!(route_name = %route_name, depth = stack.borrow().len(), "Dispatch scope entered");
        Self {
            stack,
            _ambient: ambient,
        }
    }
}

impl Drop for DispatchScope<'_> {
    fn drop(&mut self) {
        let popped = self.stack.borrow_mut().pop();
        trace!(route_name = ?popped, depth = self.stack.borrow().len(), "Dispatch scope left");
    }
}
