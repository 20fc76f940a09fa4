use senda::{Controller, Controllers, Error, Group, Method, Request, RouterBuilder, Surface};

async fn echo(req: Request) -> String {
    let params: Vec<String> = req.params().iter().map(|(k, v)| format!("{k}={v}")).collect();
    format!("{} {}", req.method(), params.join(","))
}

fn controllers() -> Controllers {
    let users = || {
        Controller::new()
            .action("index", echo)
            .action("store", echo)
            .action("show", echo)
            .action("active", echo)
            .action("posts", echo)
    };
    Controllers::new().web("Users", users()).api("Users", users())
}

// ── Registration ─────────────────────────────────────────────────────────────

#[test]
fn verb_helpers_register_one_route_each() {
    let mut routes = RouterBuilder::new();
    routes.get("/usuarios", "Users@index");
    routes.post("/usuarios", "Users@store");
    routes.put("/usuario/{id}", "Users@update");
    routes.delete("/usuario/{id}", "Users@destroy");
    routes.patch("/usuario/{id}", "Users@patch");

    let methods: Vec<Method> = routes.routes().iter().map(|r| r.method()).collect();
    assert_eq!(methods, [Method::Get, Method::Post, Method::Put, Method::Delete, Method::Patch]);
    assert_eq!(routes.routes()[2].pattern(), "/usuario/{id}");
    assert_eq!(routes.routes()[2].action().to_string(), "Users@update");
}

#[test]
fn matching_registers_each_verb_and_returns_last() {
    let mut routes = RouterBuilder::new();
    routes.matching(&[Method::Get, Method::Post], "/contacto", "Contact@form").name("contacto");

    let table = routes.routes();
    assert_eq!(table.len(), 2);
    assert_eq!(table[0].method(), Method::Get);
    assert_eq!(table[1].method(), Method::Post);
    assert!(table.iter().all(|r| r.pattern() == "/contacto"));
    assert_eq!(table[0].name(), None);
    assert_eq!(table[1].name(), Some("contacto"));
}

#[test]
fn any_registers_the_five_standard_verbs() {
    let mut routes = RouterBuilder::new();
    routes.any("/webhook", "Hooks@receive");
    let methods: Vec<Method> = routes.routes().iter().map(|r| r.method()).collect();
    assert_eq!(methods, Method::STANDARD);
}

#[test]
fn patterns_are_normalised() {
    let mut routes = RouterBuilder::new();
    routes.get("usuarios", "Users@index");
    routes.get("/productos/", "Products@index");
    routes.get("//api///items//", "Items@index");
    routes.get("", "Home@index");
    routes.get("/", "Home@index");

    let patterns: Vec<&str> = routes.routes().iter().map(|r| r.pattern()).collect();
    assert_eq!(patterns, ["/usuarios", "/productos", "/api/items", "/", "/"]);
}

#[test]
fn registrar_appends_middleware_and_names() {
    let mut routes = RouterBuilder::new();
    routes
        .get("/perfil", "Users@show")
        .middleware(["auth"])
        .middleware(["verified", "throttle"])
        .name("perfil");

    let route = &routes.routes()[0];
    assert_eq!(route.middleware(), ["auth", "verified", "throttle"]);
    assert_eq!(route.name(), Some("perfil"));
}

#[test]
fn group_applies_prefix_and_middleware_then_restores() {
    let mut routes = RouterBuilder::new();
    routes.group(Group::new().prefix("admin").middleware(["auth"]), |admin| {
        admin.get("/dashboard", "Admin@dashboard");
        admin.get("/usuarios", "Admin@users");
    });
    routes.get("/publico", "Home@public");

    let table = routes.routes();
    assert_eq!(table[0].pattern(), "/admin/dashboard");
    assert_eq!(table[1].pattern(), "/admin/usuarios");
    assert_eq!(table[0].middleware(), ["auth"]);
    assert_eq!(table[1].middleware(), ["auth"]);
    assert_eq!(table[2].pattern(), "/publico");
    assert!(table[2].middleware().is_empty());
}

#[test]
fn nested_groups_accumulate() {
    let mut routes = RouterBuilder::new();
    routes.group(Group::new().prefix("api").middleware(["api"]), |api| {
        api.group(Group::new().prefix("/v1/").middleware(["auth"]), |v1| {
            v1.get("/usuarios", "Users@index");
        });
        api.get("/status", "Status@show");
    });

    let table = routes.routes();
    assert_eq!(table[0].pattern(), "/api/v1/usuarios");
    assert_eq!(table[0].middleware(), ["api", "auth"]);
    assert_eq!(table[1].pattern(), "/api/status");
    assert_eq!(table[1].middleware(), ["api"]);
}

#[test]
fn group_without_prefix_only_adds_middleware() {
    let mut routes = RouterBuilder::new();
    routes.group(Group::new().middleware(["auth"]), |authed| {
        authed.get("/perfil", "Users@show");
    });
    assert_eq!(routes.routes()[0].pattern(), "/perfil");
    assert_eq!(routes.routes()[0].middleware(), ["auth"]);
}

#[tokio::test]
async fn grouped_route_resolves_end_to_end() {
    let mut routes = RouterBuilder::new();
    routes.group(Group::new().prefix("admin").middleware(["auth"]), |admin| {
        admin.get("/usuario/{id}", "Users@show").middleware(["admin", "audit"]);
    });
    let router = routes.build(controllers()).unwrap();

    let found = router.find(Method::Get, "/admin/usuario/9").unwrap();
    assert_eq!(found.route().middleware(), ["auth", "admin", "audit"]);
    assert_eq!(found.params().get("id"), Some("9"));
    assert!(router.find(Method::Get, "/usuario/9").is_err());

    let req = Request::builder(Method::Get, "/admin/usuario/9").build();
    let res = router.resolve(req, Surface::Web).await.unwrap();
    assert_eq!(res.body(), b"GET id=9");
}

#[test]
fn nested_group_middleware_is_ordered_outer_first_on_match() {
    let mut routes = RouterBuilder::new();
    routes.group(Group::new().prefix("api").middleware(["api"]), |api| {
        api.group(Group::new().prefix("v1").middleware(["auth", "throttle"]), |v1| {
            v1.post("/usuarios", "Users@store").middleware(["audit"]);
        });
    });
    let router = routes.build(controllers()).unwrap();

    let found = router.find(Method::Post, "/api/v1/usuarios").unwrap();
    assert_eq!(found.route().middleware(), ["api", "auth", "throttle", "audit"]);
}

#[test]
fn duplicate_names_are_rejected_at_build() {
    let mut routes = RouterBuilder::new();
    routes.get("/a", "Users@index").name("dup");
    routes.get("/b", "Users@index").name("dup");
    let err = routes.build(controllers()).err().unwrap();
    assert!(matches!(err, Error::DuplicateRouteName(name) if name == "dup"));
}

#[test]
fn routes_can_be_looked_up_by_name() {
    let mut routes = RouterBuilder::new();
    routes.get("/usuario/{id}", "Users@show").name("usuarios.show");
    let router = routes.build(controllers()).unwrap();
    assert_eq!(router.route_named("usuarios.show").unwrap().pattern(), "/usuario/{id}");
    assert!(router.route_named("missing").is_none());
}

// ── Resolution ───────────────────────────────────────────────────────────────

#[test]
fn same_path_different_verbs_coexist() {
    let mut routes = RouterBuilder::new();
    routes.get("/usuarios", "Users@index");
    routes.post("/usuarios", "Users@store");
    let router = routes.build(controllers()).unwrap();

    assert_eq!(router.routes().len(), 2);
    let matched = router.find(Method::Post, "/usuarios").unwrap();
    assert_eq!(matched.route().method(), Method::Post);
    assert_eq!(matched.route().action().method(), "store");
}

#[test]
fn parameters_are_extracted_in_declaration_order() {
    let mut routes = RouterBuilder::new();
    routes.get("/usuario/{id}/posts/{slug}", "Users@posts");
    let router = routes.build(controllers()).unwrap();

    let matched = router.find(Method::Get, "/usuario/123/posts/hello-world").unwrap();
    let params: Vec<(&str, &str)> = matched.params().iter().collect();
    assert_eq!(params, [("id", "123"), ("slug", "hello-world")]);
    assert_eq!(matched.route().param_names(), ["id", "slug"]);
}

#[test]
fn first_registered_match_wins_over_later_literal() {
    let mut routes = RouterBuilder::new();
    routes.get("/usuario/{id}", "Users@show");
    routes.get("/usuario/activo", "Users@active");
    let router = routes.build(controllers()).unwrap();

    let matched = router.find(Method::Get, "/usuario/activo").unwrap();
    assert_eq!(matched.route().action().method(), "show");
    assert_eq!(matched.params().get("id"), Some("activo"));
}

#[test]
fn literal_registered_first_is_reachable() {
    let mut routes = RouterBuilder::new();
    routes.get("/usuario/activo", "Users@active");
    routes.get("/usuario/{id}", "Users@show");
    let router = routes.build(controllers()).unwrap();

    let found = router.find(Method::Get, "/usuario/activo").unwrap();
    assert_eq!(found.route().action().method(), "active");
    assert_eq!(router.find(Method::Get, "/usuario/7").unwrap().route().action().method(), "show");
}

#[test]
fn request_path_is_normalised_before_matching() {
    let mut routes = RouterBuilder::new();
    routes.get("/usuarios", "Users@index");
    let router = routes.build(controllers()).unwrap();
    assert!(router.find(Method::Get, "/usuarios/").is_ok());
    assert!(router.find(Method::Get, "//usuarios").is_ok());
}

#[test]
fn unmatched_verb_or_path_is_route_not_found() {
    let mut routes = RouterBuilder::new();
    routes.get("/usuarios", "Users@index");
    let router = routes.build(controllers()).unwrap();

    let err = router.find(Method::Delete, "/usuarios").err().unwrap();
    assert!(matches!(
        err,
        Error::RouteNotFound { method: Method::Delete, ref path } if path == "/usuarios"
    ));

    let err = router.find(Method::Get, "/nada/").err().unwrap();
    assert_eq!(err.to_string(), "route not found: GET /nada");
}

#[tokio::test]
async fn resolve_dispatches_with_params() {
    let mut routes = RouterBuilder::new();
    routes.get("/usuario/{id}/posts/{slug}", "Users@posts");
    let router = routes.build(controllers()).unwrap();

    let req = Request::builder(Method::Get, "/usuario/5/posts/intro?draft=1").build();
    let res = router.resolve(req, Surface::Web).await.unwrap();
    assert_eq!(res.body(), b"GET id=5,slug=intro");
}

#[tokio::test]
async fn resolve_unknown_route_fails() {
    let router = RouterBuilder::new().build(controllers()).unwrap();
    let req = Request::builder(Method::Get, "/missing").build();
    let err = router.resolve(req, Surface::Web).await.err().unwrap();
    assert!(matches!(err, Error::RouteNotFound { .. }));
}

#[tokio::test]
async fn resolve_missing_controller_is_handler_miss() {
    let mut routes = RouterBuilder::new();
    routes.get("/reportes", "Reports@index");
    let router = routes.build(controllers()).unwrap();

    let req = Request::builder(Method::Get, "/reportes").build();
    let err = router.resolve(req, Surface::Web).await.err().unwrap();
    assert!(matches!(
        err,
        Error::ControllerNotFound { surface: Surface::Web, ref controller } if controller == "Reports"
    ));
    assert!(err.is_not_found());
}

#[tokio::test]
async fn resolve_missing_action_is_handler_miss() {
    let mut routes = RouterBuilder::new();
    routes.get("/usuarios/exportar", "Users@export");
    let router = routes.build(controllers()).unwrap();

    let req = Request::builder(Method::Get, "/usuarios/exportar").build();
    let err = router.resolve(req, Surface::Api).await.err().unwrap();
    assert!(matches!(err, Error::ActionNotFound { surface: Surface::Api, .. }));
}

#[tokio::test]
async fn surface_selects_controller_set() {
    let controllers = Controllers::new()
        .web("Home", Controller::new().action("index", |_req: Request| async { "web" }))
        .api("Home", Controller::new().action("index", |_req: Request| async { "api" }));
    let mut routes = RouterBuilder::new();
    routes.get("/", "Home@index");
    let router = routes.build(controllers).unwrap();

    let browser = Request::builder(Method::Get, "/").header("accept", "text/html").build();
    let surface = Surface::negotiate(&browser);
    assert_eq!(router.resolve(browser, surface).await.unwrap().body(), b"web");

    let client = Request::builder(Method::Get, "/").header("accept", "application/json").build();
    let surface = Surface::negotiate(&client);
    assert_eq!(router.resolve(client, surface).await.unwrap().body(), b"api");
}

#[test]
fn frozen_router_is_shareable_across_threads() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<senda::Router>();
}
