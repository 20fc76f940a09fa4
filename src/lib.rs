//! # senda
//!
//! A minimal MVC web framework. It parses requests, routes them and hands
//! them to controllers.
//!
//! ## The pieces
//!
//! - [`Request`]: a read-only snapshot of one inbound request (query and
//!   body input, uploads, normalised headers, client address).
//! - [`RouterBuilder`]: route registration with `{name}` path parameters,
//!   nested [`Group`]s for shared prefixes and middleware tags.
//! - [`Router`]: the frozen table. First registered match wins.
//! - [`Controllers`]: `"Controller@action"` targets, registered per
//!   [`Surface`] (Web or API).
//! - [`Server`]: hyper on tokio, graceful shutdown.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use senda::{Controller, Controllers, Group, Request, RouterBuilder, Server};
//!
//! #[tokio::main]
//! async fn main() {
//!     let mut routes = RouterBuilder::new();
//!     routes.get("/usuario/{id}", "UsuariosController@show").name("usuarios.show");
//!     routes.group(Group::new().prefix("admin").middleware(["auth"]), |admin| {
//!         admin.get("/dashboard", "AdminController@dashboard");
//!     });
//!
//!     let controllers = Controllers::new()
//!         .web("UsuariosController", Controller::new().action("show", show))
//!         .web("AdminController", Controller::new().action("dashboard", dashboard));
//!
//!     let router = routes.build(controllers).unwrap();
//!     Server::bind("127.0.0.1:8080").serve(router).await.unwrap();
//! }
//!
//! async fn show(req: Request) -> String {
//!     format!("<h1>Usuario {}</h1>", req.param("id").unwrap_or("?"))
//! }
//!
//! async fn dashboard(_req: Request) -> String {
//!     "<h1>Admin</h1>".to_owned()
//! }
//! ```

mod error;
mod handler;
mod method;
mod pattern;
mod request;
mod response;
mod router;
mod server;
mod surface;

pub mod app;
pub mod config;
pub mod controller;
pub mod logging;
pub mod middleware;
pub mod value;

pub use controller::{Controller, Controllers};
pub use error::Error;
pub use handler::Handler;
pub use http::StatusCode;
pub use method::Method;
pub use pattern::normalize;
pub use request::{Params, Request, RequestBuilder, UploadError, UploadedFile};
pub use response::{IntoResponse, Response, ResponseBuilder};
pub use router::{
    Action, Group, InvalidAction, Matched, Route, RouteRegistrar, Router, RouterBuilder,
};
pub use server::Server;
pub use surface::Surface;

/// The crate version, as published.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
