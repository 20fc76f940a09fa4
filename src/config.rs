//! Application settings from the environment.
//!
//! There are no configuration files. Every setting has a default, so an
//! empty environment yields a working development setup.
//!
//! | Variable | Default |
//! |---|---|
//! | `APP_NAME` | `senda` |
//! | `APP_ENV` | `production` |
//! | `APP_ADDR` | `127.0.0.1:8080` |
//! | `APP_DEBUG` | `false` |

use std::env;

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AppConfig {
    pub name: String,
    pub env: String,
    pub addr: String,
    pub debug: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            name: "senda".to_owned(),
            env: "production".to_owned(),
            addr: "127.0.0.1:8080".to_owned(),
            debug: false,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key lookup. `from_env` passes the process
    /// environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            name: lookup("APP_NAME").filter(|v| !v.is_empty()).unwrap_or(defaults.name),
            env: lookup("APP_ENV").filter(|v| !v.is_empty()).unwrap_or(defaults.env),
            addr: lookup("APP_ADDR").filter(|v| !v.is_empty()).unwrap_or(defaults.addr),
            debug: lookup("APP_DEBUG").map_or(defaults.debug, |v| parse_flag(&v)),
        }
    }
}

/// `true`, `(true)` and `1` are on, any case.
fn parse_flag(raw: &str) -> bool {
    matches!(raw.trim().to_ascii_lowercase().as_str(), "true" | "(true)" | "1")
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> =
            vars.iter().map(|(k, v)| ((*k).to_owned(), (*v).to_owned())).collect();
        move |key: &str| vars.get(key).cloned()
    }

    #[test]
    fn empty_environment_uses_defaults() {
        assert_eq!(AppConfig::from_lookup(lookup(&[])), AppConfig::default());
    }

    #[test]
    fn reads_every_variable() {
        let config = AppConfig::from_lookup(lookup(&[
            ("APP_NAME", "demo"),
            ("APP_ENV", "local"),
            ("APP_ADDR", "0.0.0.0:3000"),
            ("APP_DEBUG", "(TRUE)"),
        ]));
        assert_eq!(config.name, "demo");
        assert_eq!(config.env, "local");
        assert_eq!(config.addr, "0.0.0.0:3000");
        assert!(config.debug);
    }

    #[test]
    fn debug_flag_parsing() {
        assert!(parse_flag("true"));
        assert!(parse_flag("1"));
        assert!(!parse_flag("false"));
        assert!(!parse_flag("yes"));
    }
}
