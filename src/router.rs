//! Request router.
//!
//! Two phases. A [`RouterBuilder`] collects routes, with group prefixes and
//! middleware applied while a [`group`](RouterBuilder::group) callback runs.
//! [`RouterBuilder::build`] freezes the table into a [`Router`], which is
//! read-only and can be shared across connection tasks behind an `Arc`.
//!
//! Resolution is a linear scan in registration order and the **first**
//! route whose verb and pattern match wins. A literal route registered after
//! a parameterised one that also matches it is unreachable:
//!
//! ```rust
//! use senda::{Controllers, Method, RouterBuilder};
//!
//! let mut routes = RouterBuilder::new();
//! routes.get("/usuario/{id}", "Users@show");
//! routes.get("/usuario/activo", "Users@active");
//! let router = routes.build(Controllers::new()).unwrap();
//!
//! let matched = router.find(Method::Get, "/usuario/activo").unwrap();
//! assert_eq!(matched.route().action().to_string(), "Users@show");
//! ```

use std::collections::HashSet;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};

use tracing::{debug, warn};

use crate::controller::Controllers;
use crate::error::Error;
use crate::method::Method;
use crate::middleware::{self, Next};
use crate::pattern::{Pattern, normalize};
use crate::request::{Params, Request};
use crate::response::Response;
use crate::surface::Surface;

// ── Action ────────────────────────────────────────────────────────────────────

/// A route target: controller name plus action name, written
/// `"Controller@action"`.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Action {
    controller: String,
    method: String,
}

impl Action {
    /// Parses `"Controller@action"`. Both sides must be non-empty.
    pub fn parse(descriptor: &str) -> Result<Self, InvalidAction> {
        match descriptor.split_once('@') {
            Some((controller, method))
                if !controller.is_empty() && !method.is_empty() && !method.contains('@') =>
            {
                Ok(Self { controller: controller.to_owned(), method: method.to_owned() })
            }
            _ => Err(InvalidAction(descriptor.to_owned())),
        }
    }

    pub fn controller(&self) -> &str { &self.controller }
    pub fn method(&self) -> &str { &self.method }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.controller, self.method)
    }
}

/// An action descriptor that is not of the form `"Controller@action"`.
#[derive(Debug)]
pub struct InvalidAction(String);

impl fmt::Display for InvalidAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "expected `Controller@action`, got `{}`", self.0)
    }
}

impl std::error::Error for InvalidAction {}

// ── Route ─────────────────────────────────────────────────────────────────────

/// One entry of the route table.
#[derive(Clone, Debug)]
pub struct Route {
    method: Method,
    pattern: String,
    action: Action,
    middleware: Vec<String>,
    name: Option<String>,
    compiled: Pattern,
}

impl Route {
    pub fn method(&self) -> Method { self.method }

    /// The normalised pattern, group prefixes included.
    pub fn pattern(&self) -> &str { &self.pattern }

    pub fn action(&self) -> &Action { &self.action }

    /// Middleware tags in the order they will run.
    pub fn middleware(&self) -> &[String] { &self.middleware }

    pub fn name(&self) -> Option<&str> { self.name.as_deref() }

    /// Names of the `{tokens}` in the pattern, left to right.
    pub fn param_names(&self) -> &[String] { self.compiled.names() }
}

// ── Group ─────────────────────────────────────────────────────────────────────

/// Attributes applied to every route registered inside a
/// [`RouterBuilder::group`] callback.
#[derive(Clone, Debug, Default)]
pub struct Group {
    prefix: Option<String>,
    middleware: Vec<String>,
}

impl Group {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    pub fn middleware<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.middleware.extend(tags.into_iter().map(Into::into));
        self
    }
}

/// Prefix and middleware in force while registering.
#[derive(Clone, Debug, Default)]
struct GroupContext {
    prefix: String,
    middleware: Vec<String>,
}

// ── RouterBuilder ─────────────────────────────────────────────────────────────

/// The registration phase of a [`Router`].
///
/// ```rust
/// use senda::{Group, RouterBuilder};
///
/// let mut routes = RouterBuilder::new();
/// routes.get("/", "HomeController@index").name("home");
/// routes.group(Group::new().prefix("admin").middleware(["auth"]), |admin| {
///     admin.get("/dashboard", "AdminController@dashboard");
///     admin.delete("/usuario/{id}", "AdminController@destroy").middleware(["audit"]);
/// });
///
/// let table = routes.routes();
/// assert_eq!(table[2].pattern(), "/admin/usuario/{id}");
/// assert_eq!(table[2].middleware(), ["auth", "audit"]);
/// ```
#[derive(Debug, Default)]
pub struct RouterBuilder {
    routes: Vec<Route>,
    context: GroupContext,
}

impl RouterBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&mut self, pattern: &str, action: &str) -> RouteRegistrar<'_> {
        self.route(Method::Get, pattern, action)
    }

    pub fn post(&mut self, pattern: &str, action: &str) -> RouteRegistrar<'_> {
        self.route(Method::Post, pattern, action)
    }

    pub fn put(&mut self, pattern: &str, action: &str) -> RouteRegistrar<'_> {
        self.route(Method::Put, pattern, action)
    }

    pub fn delete(&mut self, pattern: &str, action: &str) -> RouteRegistrar<'_> {
        self.route(Method::Delete, pattern, action)
    }

    pub fn patch(&mut self, pattern: &str, action: &str) -> RouteRegistrar<'_> {
        self.route(Method::Patch, pattern, action)
    }

    /// Registers one route for `method`.
    ///
    /// # Panics
    ///
    /// Panics if `action` is not `"Controller@action"`. Route tables are
    /// written by hand at startup; a typo there should stop the process.
    pub fn route(&mut self, method: Method, pattern: &str, action: &str) -> RouteRegistrar<'_> {
        let index = self.add(method, pattern, action);
        RouteRegistrar { route: &mut self.routes[index] }
    }

    /// Registers the same pattern and action for each verb in `methods`.
    /// Returns the handle of the last route registered.
    ///
    /// # Panics
    ///
    /// Panics if `methods` is empty or `action` is malformed.
    pub fn matching(
        &mut self,
        methods: &[Method],
        pattern: &str,
        action: &str,
    ) -> RouteRegistrar<'_> {
        let Some((last, rest)) = methods.split_last() else {
            panic!("route `{pattern}`: `matching` needs at least one method");
        };
        for method in rest {
            self.add(*method, pattern, action);
        }
        self.route(*last, pattern, action)
    }

    /// [`matching`](Self::matching) over [`Method::STANDARD`].
    pub fn any(&mut self, pattern: &str, action: &str) -> RouteRegistrar<'_> {
        self.matching(&Method::STANDARD, pattern, action)
    }

    /// Runs `register` with `group`'s prefix and middleware layered on top of
    /// the current ones.
    ///
    /// Groups nest: prefixes concatenate and middleware accumulates outer
    /// first. The previous context is restored when `register` returns, and
    /// also when it panics (the panic is then resumed).
    pub fn group<R>(&mut self, group: Group, register: impl FnOnce(&mut Self) -> R) -> R {
        let saved = self.context.clone();

        if let Some(prefix) = &group.prefix {
            self.context.prefix = format!("{}/{}", saved.prefix, prefix.trim_matches('/'));
        }
        self.context.middleware.extend(group.middleware);

        let outcome = panic::catch_unwind(AssertUnwindSafe(|| register(self)));
        self.context = saved;

        match outcome {
            Ok(value) => value,
            Err(payload) => panic::resume_unwind(payload),
        }
    }

    /// The table as registered so far.
    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    /// Freezes the table.
    ///
    /// Fails if two routes share a name. Routes whose action is registered
    /// on no surface are kept (they answer with a handler miss) and logged.
    pub fn build(self, controllers: Controllers) -> Result<Router, Error> {
        let mut names = HashSet::new();
        for route in &self.routes {
            if let Some(name) = &route.name {
                if !names.insert(name.as_str()) {
                    return Err(Error::DuplicateRouteName(name.clone()));
                }
            }
            if !controllers.knows(&route.action) {
                warn!(method = %route.method, pattern = %route.pattern, action = %route.action,
                    "route action is not registered on any surface");
            }
        }

        debug!(routes = self.routes.len(), "route table frozen");
        Ok(Router { routes: self.routes, controllers })
    }

    fn add(&mut self, method: Method, pattern: &str, action: &str) -> usize {
        let pattern = normalize(&format!("{}/{}", self.context.prefix, pattern));
        let action = Action::parse(action)
            .unwrap_or_else(|e| panic!("invalid route `{method} {pattern}`: {e}"));
        let compiled = Pattern::compile(&pattern)
            .unwrap_or_else(|e| panic!("invalid route `{method} {pattern}`: {e}"));

        self.routes.push(Route {
            method,
            pattern,
            action,
            middleware: self.context.middleware.clone(),
            name: None,
            compiled,
        });
        self.routes.len() - 1
    }
}

// ── RouteRegistrar ────────────────────────────────────────────────────────────

/// Handle to the route just registered. Returned by every registration call
/// so middleware and a name can be chained on.
pub struct RouteRegistrar<'a> {
    route: &'a mut Route,
}

impl RouteRegistrar<'_> {
    /// Appends middleware tags after any inherited from groups.
    pub fn middleware<I, S>(self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.route.middleware.extend(tags.into_iter().map(Into::into));
        self
    }

    /// Sets the route's lookup name. Names must be unique across the table;
    /// [`RouterBuilder::build`] rejects duplicates.
    pub fn name(self, name: impl Into<String>) -> Self {
        self.route.name = Some(name.into());
        self
    }
}

// ── Router ────────────────────────────────────────────────────────────────────

/// A frozen route table plus the controllers it dispatches to.
pub struct Router {
    routes: Vec<Route>,
    controllers: Controllers,
}

/// A route selected by [`Router::find`] and the parameters it extracted.
#[derive(Debug)]
pub struct Matched<'a> {
    route: &'a Route,
    params: Params,
}

impl<'a> Matched<'a> {
    pub fn route(&self) -> &'a Route { self.route }
    pub fn params(&self) -> &Params { &self.params }
}

impl Router {
    /// Finds the first route registered for `method` whose pattern matches
    /// `path`. The path is normalised first, so `/usuarios/` finds
    /// `/usuarios`.
    pub fn find(&self, method: Method, path: &str) -> Result<Matched<'_>, Error> {
        let path = normalize(path);
        self.routes
            .iter()
            .filter(|route| route.method == method)
            .find_map(|route| {
                let params = route.compiled.captures(&path)?;
                Some(Matched { route, params: Params::new(params) })
            })
            .ok_or_else(|| Error::RouteNotFound { method, path })
    }

    /// Routes `req`, runs the middleware hook and awaits the handler
    /// registered for `surface`.
    pub async fn resolve(&self, req: Request, surface: Surface) -> Result<Response, Error> {
        let matched = self.find(req.method(), req.path())?;
        let route = matched.route;
        debug!(
            method = %route.method,
            pattern = %route.pattern,
            action = %route.action,
            %surface,
            "route matched"
        );

        if let Next::Respond(response) = middleware::run(&route.middleware, &req) {
            return Ok(response);
        }

        let handler = self.controllers.lookup(surface, &route.action)?;
        Ok(handler.call(req.with_params(matched.params)).await)
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    pub fn route_named(&self, name: &str) -> Option<&Route> {
        self.routes.iter().find(|route| route.name.as_deref() == Some(name))
    }
}
