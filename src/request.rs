//! Incoming HTTP request snapshot.
//!
//! A [`Request`] is built once per inbound request by the transport boundary
//! (the bundled [`Server`](crate::Server), or your own via
//! [`Request::builder`]) and is read-only afterwards. The router attaches the
//! extracted path [`Params`] just before the handler runs.

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use bytes::Bytes;
use serde_json::{Map, Value};

use crate::method::Method;
use crate::value;

/// Forwarding headers consulted by [`Request::ip`], highest priority first.
const FORWARDED_HEADERS: [&str; 3] = ["x-forwarded-for", "x-real-ip", "client-ip"];

const LOOPBACK: &str = "127.0.0.1";

// ── Params ────────────────────────────────────────────────────────────────────

/// Path parameters in pattern declaration order.
///
/// For `/usuario/{id}/posts/{slug}` matched against
/// `/usuario/123/posts/hello-world`, `nth(0)` is `"123"` and `get("slug")` is
/// `"hello-world"`.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Params(Vec<(String, String)>);

impl Params {
    pub(crate) fn new(pairs: Vec<(String, String)>) -> Self {
        Self(pairs)
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.iter().find(|(k, _)| k == name).map(|(_, v)| v.as_str())
    }

    /// Positional access, matching the order tokens appear in the pattern.
    pub fn nth(&self, index: usize) -> Option<&str> {
        self.0.get(index).map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize { self.0.len() }
    pub fn is_empty(&self) -> bool { self.0.is_empty() }
}

// ── Uploaded files ────────────────────────────────────────────────────────────

/// Why an upload did not arrive intact.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum UploadError {
    /// Exceeded the server or form size limit.
    TooLarge,
    /// Only part of the file was received.
    Partial,
    /// The field was present but no file was chosen.
    NoFile,
    /// The transport could not store the upload.
    Storage,
}

/// Descriptor for one uploaded file.
#[derive(Clone, Debug)]
pub struct UploadedFile {
    pub filename: String,
    pub content_type: Option<String>,
    pub size: u64,
    pub data: Bytes,
    pub error: Option<UploadError>,
}

impl UploadedFile {
    /// A successfully received file. `size` is taken from `data`.
    pub fn new(
        filename: impl Into<String>,
        content_type: Option<String>,
        data: impl Into<Bytes>,
    ) -> Self {
        let data = data.into();
        Self {
            filename: filename.into(),
            content_type,
            size: data.len() as u64,
            data,
            error: None,
        }
    }

    /// A descriptor for an upload that failed in transit.
    pub fn failed(filename: impl Into<String>, error: UploadError) -> Self {
        Self {
            filename: filename.into(),
            content_type: None,
            size: 0,
            data: Bytes::new(),
            error: Some(error),
        }
    }

    /// No transport error and a non-empty payload.
    pub fn is_valid(&self) -> bool {
        self.error.is_none() && self.size > 0
    }
}

// ── Request ───────────────────────────────────────────────────────────────────

/// An incoming HTTP request.
#[derive(Clone, Debug)]
pub struct Request {
    method: Method,
    path: String,
    target: String,
    query: Map<String, Value>,
    form: Map<String, Value>,
    files: HashMap<String, UploadedFile>,
    headers: HashMap<String, String>,
    remote_addr: Option<String>,
    params: Params,
}

impl Request {
    /// Starts a request from a method and a raw request target such as
    /// `/usuarios?page=2`. The query string is decoded into the query map.
    pub fn builder(method: Method, target: impl Into<String>) -> RequestBuilder {
        RequestBuilder::new(method, target.into())
    }

    pub fn method(&self) -> Method { self.method }

    pub fn is_method(&self, method: Method) -> bool { self.method == method }
    pub fn is_get(&self) -> bool { self.is_method(Method::Get) }
    pub fn is_post(&self) -> bool { self.is_method(Method::Post) }

    /// The request path without its query string.
    pub fn path(&self) -> &str { &self.path }

    /// The raw request target, query string included.
    pub fn full_url(&self) -> &str { &self.target }

    /// A query-string value.
    pub fn query(&self, key: &str) -> Option<&Value> {
        self.query.get(key)
    }

    /// A body (form or JSON) value.
    pub fn post(&self, key: &str) -> Option<&Value> {
        self.form.get(key)
    }

    /// Body first, then query string. An explicit `null` counts as absent,
    /// so a `null` body value falls through to the query string.
    pub fn input(&self, key: &str) -> Option<&Value> {
        self.post(key)
            .filter(|v| !v.is_null())
            .or_else(|| self.query(key).filter(|v| !v.is_null()))
    }

    /// [`input`](Self::input) narrowed to string values.
    pub fn input_str(&self, key: &str) -> Option<&str> {
        self.input(key).and_then(Value::as_str)
    }

    /// Query values merged with body values. Body wins on collisions.
    pub fn all(&self) -> Map<String, Value> {
        let mut merged = self.query.clone();
        merged.extend(self.form.iter().map(|(k, v)| (k.clone(), v.clone())));
        merged
    }

    /// The subset of [`all`](Self::all) whose keys appear in `keys`.
    pub fn only(&self, keys: &[&str]) -> Map<String, Value> {
        let mut all = self.all();
        keys.iter()
            .filter_map(|k| all.remove(*k).map(|v| ((*k).to_owned(), v)))
            .collect()
    }

    /// [`all`](Self::all) minus the given keys.
    pub fn except(&self, keys: &[&str]) -> Map<String, Value> {
        let mut all = self.all();
        for key in keys {
            all.remove(*key);
        }
        all
    }

    /// Present in either map, even if the value is empty.
    pub fn has(&self, key: &str) -> bool {
        self.form.contains_key(key) || self.query.contains_key(key)
    }

    /// Present and not blank. See [`value::is_blank`] for what blank means.
    pub fn filled(&self, key: &str) -> bool {
        self.has(key) && self.input(key).is_some_and(value::is_filled)
    }

    pub fn file(&self, key: &str) -> Option<&UploadedFile> {
        self.files.get(key)
    }

    /// A file is only "had" if it arrived without error and is non-empty.
    pub fn has_file(&self, key: &str) -> bool {
        self.file(key).is_some_and(UploadedFile::is_valid)
    }

    pub fn files(&self) -> &HashMap<String, UploadedFile> { &self.files }

    /// Header lookup. Names are matched after the same normalisation applied
    /// at construction: lower-case, `_` read as `-`.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(&normalize_header(name)).map(String::as_str)
    }

    pub fn headers(&self) -> &HashMap<String, String> { &self.headers }

    /// The client address.
    ///
    /// Forwarding headers are checked in a fixed order; a comma-separated
    /// chain yields its first entry. Falls back to the peer address, then to
    /// the loopback address.
    pub fn ip(&self) -> &str {
        FORWARDED_HEADERS
            .iter()
            .filter_map(|name| self.headers.get(*name))
            .chain(self.remote_addr.as_ref())
            .map(|raw| raw.split(',').next().unwrap_or_default().trim())
            .find(|ip| !ip.is_empty())
            .unwrap_or(LOOPBACK)
    }

    pub fn user_agent(&self) -> &str {
        self.header("user-agent").unwrap_or_default()
    }

    /// `X-Requested-With: XMLHttpRequest`, any case.
    pub fn is_ajax(&self) -> bool {
        self.header("x-requested-with")
            .is_some_and(|v| v.eq_ignore_ascii_case("xmlhttprequest"))
    }

    /// The `Accept` header mentions `application/json`.
    pub fn wants_json(&self) -> bool {
        self.header("accept").is_some_and(|v| v.contains("application/json"))
    }

    /// Builds an absolute URL on this request's host.
    ///
    /// ```rust
    /// use senda::{Method, Request};
    ///
    /// let req = Request::builder(Method::Get, "/").header("host", "example.com").build();
    /// assert_eq!(req.url("/api/health"), "http://example.com/api/health");
    /// assert_eq!(req.url(""), "http://example.com");
    /// ```
    pub fn url(&self, path: &str) -> String {
        let scheme = match self.header("x-forwarded-proto") {
            Some(proto) if proto.eq_ignore_ascii_case("https") => "https",
            _ => "http",
        };
        let host = self.header("host").unwrap_or("localhost:8080");
        let path = path.trim_start_matches('/');
        if path.is_empty() {
            format!("{scheme}://{host}")
        } else {
            format!("{scheme}://{host}/{path}")
        }
    }

    /// Returns a named path parameter.
    ///
    /// For a route `/users/{id}`, `req.param("id")` on `/users/42` returns `Some("42")`.
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name)
    }

    pub fn params(&self) -> &Params { &self.params }

    pub(crate) fn with_params(mut self, params: Params) -> Self {
        self.params = params;
        self
    }
}

fn normalize_header(name: &str) -> String {
    name.trim().to_ascii_lowercase().replace('_', "-")
}

// ── RequestBuilder ────────────────────────────────────────────────────────────

/// Fluent constructor for [`Request`], fed from raw transport data.
///
/// ```rust
/// use senda::{Method, Request};
///
/// let req = Request::builder(Method::Post, "/usuarios?ref=home")
///     .header("Content-Type", "application/x-www-form-urlencoded")
///     .form("name", "alice")
///     .remote_addr("10.0.0.7")
///     .build();
///
/// assert_eq!(req.path(), "/usuarios");
/// assert_eq!(req.input_str("ref"), Some("home"));
/// assert_eq!(req.input_str("name"), Some("alice"));
/// assert_eq!(req.ip(), "10.0.0.7");
/// ```
#[derive(Debug)]
pub struct RequestBuilder {
    method: Method,
    target: String,
    form: Map<String, Value>,
    files: HashMap<String, UploadedFile>,
    headers: HashMap<String, String>,
    remote_addr: Option<String>,
}

impl RequestBuilder {
    fn new(method: Method, target: String) -> Self {
        Self {
            method,
            target,
            form: Map::new(),
            files: HashMap::new(),
            headers: HashMap::new(),
            remote_addr: None,
        }
    }

    /// Adds a header. A repeated name is joined onto the earlier value with
    /// `", "`, in arrival order.
    pub fn header(mut self, name: &str, value: impl Into<String>) -> Self {
        let value = value.into();
        match self.headers.entry(normalize_header(name)) {
            Entry::Occupied(mut existing) => {
                let joined = existing.get_mut();
                joined.push_str(", ");
                joined.push_str(&value);
            }
            Entry::Vacant(slot) => {
                slot.insert(value);
            }
        }
        self
    }

    /// Adds a string body field.
    pub fn form(self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.form_value(key, Value::String(value.into()))
    }

    /// Adds a typed body field (e.g. from a JSON body).
    pub fn form_value(mut self, key: impl Into<String>, value: Value) -> Self {
        self.form.insert(key.into(), value);
        self
    }

    /// Replaces the whole body map.
    pub fn form_map(mut self, form: Map<String, Value>) -> Self {
        self.form = form;
        self
    }

    pub fn file(mut self, key: impl Into<String>, file: UploadedFile) -> Self {
        self.files.insert(key.into(), file);
        self
    }

    /// The directly connected peer.
    pub fn remote_addr(mut self, addr: impl Into<String>) -> Self {
        self.remote_addr = Some(addr.into());
        self
    }

    pub fn build(self) -> Request {
        let target = if self.target.is_empty() { "/".to_owned() } else { self.target };
        let (path, query_string) = match target.split_once('?') {
            Some((path, query)) => (path.to_owned(), query),
            None => (target.clone(), ""),
        };
        let query = parse_query(query_string);

        Request {
            method: self.method,
            path,
            query,
            target,
            form: self.form,
            files: self.files,
            headers: self.headers,
            remote_addr: self.remote_addr,
            params: Params::default(),
        }
    }
}

/// Decodes a query string. Undecodable input yields an empty map; repeated
/// keys keep the last value.
pub(crate) fn parse_query(raw: &str) -> Map<String, Value> {
    serde_urlencoded::from_str::<Vec<(String, String)>>(raw)
        .unwrap_or_default()
        .into_iter()
        .map(|(k, v)| (k, Value::String(v)))
        .collect()
}
