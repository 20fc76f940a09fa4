//! Browser-facing home controller.

use std::sync::Arc;

use crate::config::AppConfig;
use crate::controller::Controller;
use crate::controller::web::escape;
use crate::request::Request;
use crate::VERSION;

pub fn home_controller(config: Arc<AppConfig>) -> Controller {
    Controller::new().action("index", move |req: Request| {
        let config = Arc::clone(&config);
        async move { index(&req, &config) }
    })
}

/// The welcome page.
fn index(req: &Request, config: &AppConfig) -> String {
    let name = escape(&config.name);
    let api_url = escape(&req.url("/api"));
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Welcome to {name}</title>
</head>
<body>
    <main>
        <h1>Welcome to {name}</h1>
        <p>A simple MVC web framework. Version {VERSION}.</p>
        <p>Framework information is available at <a href="{api_url}">{api_url}</a>.</p>
    </main>
</body>
</html>
"#
    )
}
