//! The bundled starter application.
//!
//! A welcome page for browsers and three informational API endpoints. New
//! projects copy this module and grow it.
//!
//! | Route | Action | Name |
//! |---|---|---|
//! | `GET /` | `HomeController@index` | `home` |
//! | `GET /api` | `HomeController@index` | `api.home` |
//! | `GET /api/version` | `HomeController@version` | `api.version` |
//! | `GET /api/health` | `HomeController@health` | `api.health` |

pub mod api;
pub mod web;

use std::sync::Arc;

use crate::config::AppConfig;
use crate::controller::Controllers;
use crate::error::Error;
use crate::router::{Router, RouterBuilder};

/// Browser routes.
pub fn web_routes(routes: &mut RouterBuilder) {
    routes.get("/", "HomeController@index").name("home");
}

/// API routes.
pub fn api_routes(routes: &mut RouterBuilder) {
    routes.get("/api", "HomeController@index").name("api.home");
    routes.get("/api/version", "HomeController@version").name("api.version");
    routes.get("/api/health", "HomeController@health").name("api.health");
}

/// Both controller sets.
pub fn controllers(config: Arc<AppConfig>) -> Controllers {
    Controllers::new()
        .web("HomeController", web::home_controller(Arc::clone(&config)))
        .api("HomeController", api::home_controller(config))
}

/// The full starter router: web routes first, then API routes.
pub fn router(config: AppConfig) -> Result<Router, Error> {
    let mut routes = RouterBuilder::new();
    web_routes(&mut routes);
    api_routes(&mut routes);
    routes.build(controllers(Arc::new(config)))
}
