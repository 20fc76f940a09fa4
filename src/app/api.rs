//! API home controller: framework info, version and health.

use std::sync::Arc;
use std::time::Instant;

use http::StatusCode;
use serde::Serialize;

use crate::config::AppConfig;
use crate::controller::{Controller, api};
use crate::request::Request;
use crate::response::Response;
use crate::VERSION;

#[derive(Debug, Serialize)]
struct Info<'a> {
    framework: &'a str,
    version: &'a str,
    description: &'a str,
    status: &'a str,
    environment: &'a str,
    endpoints: Endpoints,
}

#[derive(Debug, Serialize)]
struct Endpoints {
    home_web: String,
    api_info: String,
    framework_version: String,
    health_check: String,
}

#[derive(Debug, Serialize)]
struct Version<'a> {
    framework: &'a str,
    version: &'a str,
    major: u64,
    minor: u64,
    patch: u64,
    is_stable: bool,
}

#[derive(Debug, Serialize)]
struct Health<'a> {
    status: &'a str,
    framework: &'a str,
    version: &'a str,
    uptime_seconds: u64,
    debug: bool,
}

pub fn home_controller(config: Arc<AppConfig>) -> Controller {
    let started = Instant::now();
    let info_config = Arc::clone(&config);

    Controller::new()
        .action("index", move |req: Request| {
            let config = Arc::clone(&info_config);
            async move { index(&req, &config) }
        })
        .action("version", |_req: Request| async move { version() })
        .action("health", move |_req: Request| {
            let config = Arc::clone(&config);
            async move { health(&config, started.elapsed().as_secs()) }
        })
}

fn index(req: &Request, config: &AppConfig) -> Response {
    let info = Info {
        framework: &config.name,
        version: VERSION,
        description: "A simple MVC web framework",
        status: "active",
        environment: &config.env,
        endpoints: Endpoints {
            home_web: req.url("/"),
            api_info: req.url("/api"),
            framework_version: req.url("/api/version"),
            health_check: req.url("/api/health"),
        },
    };
    api::success(info, "Framework information", StatusCode::OK)
}

fn version() -> Response {
    let mut parts = VERSION.split('.').map(|p| p.parse::<u64>().unwrap_or(0));
    let (major, minor, patch) = (
        parts.next().unwrap_or(0),
        parts.next().unwrap_or(0),
        parts.next().unwrap_or(0),
    );
    let version = Version {
        framework: env!("CARGO_PKG_NAME"),
        version: VERSION,
        major,
        minor,
        patch,
        is_stable: major >= 1,
    };
    api::success(version, "Current framework version", StatusCode::OK)
}

fn health(config: &AppConfig, uptime_seconds: u64) -> Response {
    let health = Health {
        status: "healthy",
        framework: &config.name,
        version: VERSION,
        uptime_seconds,
        debug: config.debug,
    };
    api::success(health, "Framework running correctly", StatusCode::OK)
}

#[cfg(test)]
mod tests {
    use serde_json::{Value, json};

    use super::*;
    use crate::Method;

    fn body(res: &Response) -> Value {
        serde_json::from_slice(res.body()).unwrap()
    }

    #[test]
    fn index_lists_endpoints_on_request_host() {
        let req = Request::builder(Method::Get, "/api").header("host", "api.test").build();
        let body = body(&index(&req, &AppConfig::default()));
        assert_eq!(body["data"]["environment"], json!("production"));
        assert_eq!(body["data"]["endpoints"]["health_check"], json!("http://api.test/api/health"));
    }

    #[test]
    fn version_splits_semver() {
        let body = body(&version());
        assert_eq!(body["data"]["version"], json!(VERSION));
        assert_eq!(body["data"]["major"], json!(0));
        assert_eq!(body["data"]["is_stable"], json!(false));
    }

    #[test]
    fn health_reports_uptime() {
        let body = body(&health(&AppConfig::default(), 12));
        assert_eq!(body["data"]["status"], json!("healthy"));
        assert_eq!(body["data"]["uptime_seconds"], json!(12));
    }
}
