//! The starter application plus a small CRUD group.
//!
//! Run with:
//!   RUST_LOG=debug cargo run --example basic
//!
//! Try:
//!   curl http://localhost:8080/
//!   curl http://localhost:8080/api/version
//!   curl -H 'accept: application/json' http://localhost:8080/api/usuario/42
//!   curl -X POST http://localhost:8080/api/usuarios -d 'name=alice&email=a@b.c'
//!   curl -X POST http://localhost:8080/api/usuarios -d 'name=alice'

use std::sync::Arc;

use senda::config::AppConfig;
use senda::controller::api;
use senda::{Controller, Group, Request, Response, RouterBuilder, Server, StatusCode, app, logging};
use serde_json::json;

#[tokio::main]
async fn main() {
    logging::init();
    let config = AppConfig::from_env();

    let mut routes = RouterBuilder::new();
    app::web_routes(&mut routes);
    app::api_routes(&mut routes);
    routes.group(Group::new().prefix("api").middleware(["api"]), |api| {
        api.get("/usuarios", "UsuariosController@index").name("api.usuarios.index");
        api.get("/usuario/{id}", "UsuariosController@show").name("api.usuarios.show");
        api.post("/usuarios", "UsuariosController@store").name("api.usuarios.store");
    });

    let controllers = app::controllers(Arc::new(config.clone())).api(
        "UsuariosController",
        Controller::new()
            .action("index", index)
            .action("show", show)
            .action("store", store),
    );

    let router = routes.build(controllers).expect("route table");
    Server::try_bind(&config.addr)
        .expect("APP_ADDR must be host:port")
        .serve(router)
        .await
        .expect("server error");
}

// GET /api/usuarios
async fn index(_req: Request) -> Response {
    api::success(json!([{"id": 1, "name": "alice"}]), "OK", StatusCode::OK)
}

// GET /api/usuario/{id}
async fn show(req: Request) -> Response {
    match req.param("id") {
        Some("1") => api::success(json!({"id": 1, "name": "alice"}), "OK", StatusCode::OK),
        _ => api::not_found("Usuario"),
    }
}

// POST /api/usuarios
async fn store(req: Request) -> Response {
    let missing: Vec<&str> = ["name", "email"].into_iter().filter(|k| !req.filled(k)).collect();
    if !missing.is_empty() {
        let errors: serde_json::Map<_, _> =
            missing.into_iter().map(|k| (k.to_owned(), json!(["required"]))).collect();
        return api::validation_error(errors.into());
    }
    api::success(req.only(&["name", "email"]), "Created", StatusCode::CREATED)
}
