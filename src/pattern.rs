//! Path normalisation and `{name}` pattern compilation.
//!
//! Every `{token}` becomes a single-segment capture `([^/]+)`; literal text
//! between tokens is regex-escaped. The whole pattern is anchored, so a
//! pattern either matches the full path or not at all.

use std::sync::LazyLock;

use regex::Regex;

static TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{([^}/]+)\}").unwrap_or_else(|e| panic!("invalid token regex: {e}"))
});

/// Collapses repeated slashes, strips leading/trailing slashes and prepends
/// exactly one. The result never ends with `/` unless it is the root.
///
/// ```rust
/// assert_eq!(senda::normalize("//api///v1/usuarios/"), "/api/v1/usuarios");
/// assert_eq!(senda::normalize(""), "/");
/// ```
pub fn normalize(path: &str) -> String {
    let mut out = String::with_capacity(path.len() + 1);
    for segment in path.split('/').filter(|s| !s.is_empty()) {
        out.push('/');
        out.push_str(segment);
    }
    if out.is_empty() {
        out.push('/');
    }
    out
}

/// A compiled route pattern.
#[derive(Clone, Debug)]
pub(crate) struct Pattern {
    regex: Regex,
    names: Vec<String>,
}

impl Pattern {
    /// Compiles an already-normalised pattern.
    pub(crate) fn compile(pattern: &str) -> Result<Self, regex::Error> {
        let mut source = String::from("^");
        let mut names = Vec::new();
        let mut last = 0;

        for caps in TOKEN.captures_iter(pattern) {
            let (Some(whole), Some(name)) = (caps.get(0), caps.get(1)) else { continue };
            source.push_str(&regex::escape(&pattern[last..whole.start()]));
            source.push_str("([^/]+)");
            names.push(name.as_str().to_owned());
            last = whole.end();
        }
        source.push_str(&regex::escape(&pattern[last..]));
        source.push('$');

        Ok(Self { regex: Regex::new(&source)?, names })
    }

    /// Parameter names in left-to-right order.
    pub(crate) fn names(&self) -> &[String] {
        &self.names
    }

    /// Matches `path` and zips the captured values onto the token names.
    pub(crate) fn captures(&self, path: &str) -> Option<Vec<(String, String)>> {
        let caps = self.regex.captures(path)?;
        let values = self.names.iter().enumerate().map(|(i, name)| {
            let value = caps.get(i + 1).map_or("", |m| m.as_str());
            (name.clone(), value.to_owned())
        });
        Some(values.collect())
    }
}
