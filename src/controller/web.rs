//! Helpers for browser-facing controllers.

use http::StatusCode;
use http::header::LOCATION;

use crate::response::Response;

/// An HTML page with an explicit status.
pub fn html(content: impl Into<String>, status: StatusCode) -> Response {
    Response::builder().status(status).html(content)
}

/// `302 Found` to `location`.
pub fn redirect(location: &str) -> Response {
    Response::builder()
        .status(StatusCode::FOUND)
        .header(LOCATION.as_str(), location)
        .no_body()
}

/// Escapes text for interpolation into HTML.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            _ => out.push(c),
        }
    }
    out
}
