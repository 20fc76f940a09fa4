//! Web vs API content negotiation.
//!
//! Decided once per request at the boundary and handed to
//! [`Router::resolve`](crate::Router::resolve). The router never inspects
//! headers to pick a controller set on its own.

use std::fmt;

use crate::pattern::normalize;
use crate::request::Request;

/// Which controller set serves a request.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Surface {
    /// Browser-facing controllers returning HTML.
    Web,
    /// Programmatic controllers returning the JSON envelope.
    Api,
}

impl Surface {
    /// `Api` when the client asks for JSON or the path is under `/api/`.
    ///
    /// The path is normalised the same way the router normalises it, so
    /// `//api/version` negotiates like `/api/version`. The bare `/api` path
    /// (and `/api/`) does not qualify by itself; only the `Accept` header
    /// can route it to the API controllers.
    pub fn negotiate(req: &Request) -> Self {
        if req.wants_json() || normalize(req.path()).starts_with("/api/") {
            Self::Api
        } else {
            Self::Web
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Web => "web",
            Self::Api => "api",
        }
    }
}

impl fmt::Display for Surface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
