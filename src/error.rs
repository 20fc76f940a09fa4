//! Unified error type.

use thiserror::Error;

use crate::method::Method;
use crate::surface::Surface;

/// The error type returned by senda's fallible operations.
///
/// Routing misses are values, not status codes. The server boundary decides
/// how each kind is rendered (see [`Error::is_not_found`]).
#[derive(Debug, Error)]
pub enum Error {
    /// No registered route matches both the verb and the path.
    #[error("route not found: {method} {path}")]
    RouteNotFound { method: Method, path: String },

    /// The matched route names a controller that is not registered for the
    /// negotiated surface.
    #[error("controller not found: {surface}::{controller}")]
    ControllerNotFound { surface: Surface, controller: String },

    /// The controller exists but has no action with the requested name.
    #[error("action not found: {surface}::{action}")]
    ActionNotFound { surface: Surface, action: String },

    /// Two routes were registered under the same name.
    #[error("duplicate route name `{0}`")]
    DuplicateRouteName(String),

    /// The transport delivered a method this crate does not model.
    #[error("unsupported method `{0}`")]
    UnsupportedMethod(String),

    /// The request body ran past the server's size limit.
    #[error("request body exceeds {limit} bytes")]
    PayloadTooLarge { limit: usize },

    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// `true` for the routing and handler misses.
    ///
    /// A handler miss is a configuration problem rather than a routing one,
    /// but both end the request the same way.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::RouteNotFound { .. }
                | Self::ControllerNotFound { .. }
                | Self::ActionNotFound { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn route_not_found_carries_method_and_path() {
        let err = Error::RouteNotFound { method: Method::Post, path: "/usuarios".into() };
        assert_eq!(err.to_string(), "route not found: POST /usuarios");
        assert!(err.is_not_found());
    }

    #[test]
    fn handler_misses_are_not_found() {
        let err = Error::ControllerNotFound { surface: Surface::Api, controller: "Users".into() };
        assert_eq!(err.to_string(), "controller not found: api::Users");
        assert!(err.is_not_found());

        let err = Error::ActionNotFound { surface: Surface::Web, action: "Home@show".into() };
        assert!(err.is_not_found());
    }

    #[test]
    fn configuration_errors_are_not_not_found() {
        assert!(!Error::DuplicateRouteName("home".into()).is_not_found());
        assert!(!Error::UnsupportedMethod("BREW".into()).is_not_found());
    }

    #[test]
    fn payload_too_large_names_the_limit() {
        let err = Error::PayloadTooLarge { limit: 1024 };
        assert_eq!(err.to_string(), "request body exceeds 1024 bytes");
        assert!(!err.is_not_found());
    }
}
