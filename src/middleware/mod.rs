//! Middleware hook.
//!
//! Routes carry middleware as ordered tags (`"auth"`, `"api"`), collected
//! from enclosing groups and from [`RouteRegistrar::middleware`](crate::RouteRegistrar::middleware).
//! The contract for an executor: tags run in registration order, before the
//! handler, and any of them may short-circuit with its own response.
//!
//! No executor is bound to the tags yet. [`run`] walks the chain, records
//! each tag in the trace log and lets the request through.

use tracing::trace;

use crate::request::Request;
use crate::response::Response;

/// What a middleware step decided.
pub enum Next {
    /// Hand the request to the next step (or the handler).
    Continue,
    /// Stop here and answer with this response.
    Respond(Response),
}

/// Runs the middleware chain for a matched route.
pub(crate) fn run(tags: &[String], req: &Request) -> Next {
    run_with(tags, req, |tag, req| {
        trace!(middleware = %tag, path = req.path(), "middleware passed");
        Next::Continue
    })
}

/// Feeds each tag to `step` in order. The first [`Next::Respond`] ends the
/// chain and later tags are not visited.
pub(crate) fn run_with(
    tags: &[String],
    req: &Request,
    mut step: impl FnMut(&str, &Request) -> Next,
) -> Next {
    for tag in tags {
        if let Next::Respond(response) = step(tag, req) {
            return Next::Respond(response);
        }
    }
    Next::Continue
}
