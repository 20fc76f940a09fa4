//! Controllers and the action registry.
//!
//! Routes name their target as `"Controller@action"`. At startup every
//! controller is registered explicitly, once per [`Surface`], so resolving
//! an action is a map lookup instead of a by-name search.
//!
//! ```rust
//! use senda::{Controller, Controllers, Request};
//!
//! async fn index(_req: Request) -> String { "<h1>home</h1>".into() }
//! async fn status(_req: Request) -> &'static str { "ok" }
//!
//! let controllers = Controllers::new()
//!     .web("HomeController", Controller::new().action("index", index))
//!     .api("HomeController", Controller::new().action("index", status));
//! ```

pub mod api;
pub mod web;

use std::collections::HashMap;

use crate::error::Error;
use crate::handler::{BoxedHandler, Handler};
use crate::router::Action;
use crate::surface::Surface;

/// A named set of actions.
#[derive(Default)]
pub struct Controller {
    actions: HashMap<String, BoxedHandler>,
}

impl Controller {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an action. A second registration under the same name
    /// replaces the first.
    pub fn action(mut self, name: &str, handler: impl Handler) -> Self {
        self.actions.insert(name.to_owned(), handler.into_boxed_handler());
        self
    }

    pub fn has_action(&self, name: &str) -> bool {
        self.actions.contains_key(name)
    }
}

/// Every controller the application serves, keyed by surface and name.
#[derive(Default)]
pub struct Controllers {
    controllers: HashMap<(Surface, String), Controller>,
}

impl Controllers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a controller for `surface`.
    pub fn register(mut self, surface: Surface, name: &str, controller: Controller) -> Self {
        self.controllers.insert((surface, name.to_owned()), controller);
        self
    }

    /// Shorthand for `register(Surface::Web, ..)`.
    pub fn web(self, name: &str, controller: Controller) -> Self {
        self.register(Surface::Web, name, controller)
    }

    /// Shorthand for `register(Surface::Api, ..)`.
    pub fn api(self, name: &str, controller: Controller) -> Self {
        self.register(Surface::Api, name, controller)
    }

    /// Whether `action` resolves on at least one surface.
    pub fn knows(&self, action: &Action) -> bool {
        [Surface::Web, Surface::Api].into_iter().any(|surface| {
            self.controllers
                .get(&(surface, action.controller().to_owned()))
                .is_some_and(|c| c.has_action(action.method()))
        })
    }

    pub(crate) fn lookup(&self, surface: Surface, action: &Action) -> Result<BoxedHandler, Error> {
        let controller = self
            .controllers
            .get(&(surface, action.controller().to_owned()))
            .ok_or_else(|| Error::ControllerNotFound {
                surface,
                controller: action.controller().to_owned(),
            })?;

        controller
            .actions
            .get(action.method())
            .cloned()
            .ok_or_else(|| Error::ActionNotFound { surface, action: action.to_string() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::Request;

    async fn noop(_req: Request) -> &'static str { "" }

    fn action(s: &str) -> Action {
        Action::parse(s).unwrap()
    }

    #[test]
    fn lookup_is_per_surface() {
        let controllers = Controllers::new().web("Home", Controller::new().action("index", noop));
        assert!(controllers.lookup(Surface::Web, &action("Home@index")).is_ok());
        let err = controllers.lookup(Surface::Api, &action("Home@index")).err().unwrap();
        assert!(matches!(err, Error::ControllerNotFound { surface: Surface::Api, .. }));
    }

    #[test]
    fn missing_action_is_distinguished_from_missing_controller() {
        let controllers = Controllers::new().web("Home", Controller::new().action("index", noop));
        let err = controllers.lookup(Surface::Web, &action("Home@show")).err().unwrap();
        assert!(matches!(err, Error::ActionNotFound { ref action, .. } if action == "Home@show"));
    }

    #[test]
    fn knows_checks_every_surface() {
        let controllers = Controllers::new().api("Home", Controller::new().action("health", noop));
        assert!(controllers.knows(&action("Home@health")));
        assert!(!controllers.knows(&action("Home@index")));
        assert!(!controllers.knows(&action("Users@health")));
    }
}
