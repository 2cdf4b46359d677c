//! One-shot messages carried across a redirect in a cookie.

use crate::infrastructure::http::middleware::error::ValidationErrors;
use axum::{
    http::{
        header::{HOST, REFERER},
        HeaderMap, HeaderValue, StatusCode,
    },
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use url::Url;

pub const FLASH_COOKIE: &str = "flash";

/// Browsers silently drop cookies past roughly 4 KB.
pub const MAX_FLASH_BYTES: usize = 3800;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flash {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub success: Option<String>,
    #[serde(default, skip_serializing_if = "ValidationErrors::is_empty")]
    pub errors: ValidationErrors,
    /// Previously submitted form input, for re-populating the form
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub old: BTreeMap<String, String>,
}

impl Flash {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            success: Some(message.into()),
            ..Self::default()
        }
    }

    pub fn with_errors(errors: ValidationErrors, old: BTreeMap<String, String>) -> Self {
        Self {
            errors,
            old,
            ..Self::default()
        }
    }

    pub fn old(&self, field: &str) -> Option<&str> {
        self.old.get(field).map(String::as_str)
    }

    pub fn encode(&self) -> String {
        // Serializing a struct of strings and maps cannot fail
        let json = serde_json::to_vec(self).unwrap_or_default();
        URL_SAFE_NO_PAD.encode(json)
    }

    pub fn decode(value: &str) -> Option<Self> {
        let bytes = URL_SAFE_NO_PAD.decode(value).ok()?;
        serde_json::from_slice(&bytes).ok()
    }

    /// Store the flash in the jar for the next request.
    ///
    /// Old input is dropped, largest value first, until the cookie fits;
    /// messages and errors always survive.
    pub fn put(mut self, jar: CookieJar) -> CookieJar {
        let mut value = self.encode();
        while value.len() > MAX_FLASH_BYTES {
            let largest = self
                .old
                .iter()
                .max_by_key(|(_, v)| v.len())
                .map(|(k, _)| k.clone());
            match largest {
                Some(field) => {
                    self.old.remove(&field);
                    value = self.encode();
                }
                None => break,
            }
        }

        let cookie = Cookie::build((FLASH_COOKIE, value))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax);
        jar.add(cookie)
    }

    /// Read and clear the flash. A malformed cookie reads as empty.
    pub fn take(jar: CookieJar) -> (CookieJar, Flash) {
        match jar.get(FLASH_COOKIE).map(|c| c.value().to_string()) {
            Some(value) => {
                let flash = Flash::decode(&value).unwrap_or_default();
                let jar = jar.remove(Cookie::build((FLASH_COOKIE, "")).path("/"));
                (jar, flash)
            }
            None => (jar, Flash::default()),
        }
    }
}

fn is_htmx(headers: &HeaderMap) -> bool {
    headers.get("HX-Request").is_some()
}

/// Redirect to `location`. HTMX callers get `HX-Redirect` instead of a 303
/// so the browser navigates rather than swapping the target page in place.
pub fn redirect_to(headers: &HeaderMap, location: &str) -> Response {
    if is_htmx(headers) {
        if let Ok(value) = HeaderValue::from_str(location) {
            let mut response = StatusCode::OK.into_response();
            response.headers_mut().insert("HX-Redirect", value);
            return response;
        }
    }
    Redirect::to(location).into_response()
}

/// Redirect to the referring page, falling back when there is none.
pub fn redirect_back(headers: &HeaderMap, fallback: &str) -> Response {
    let location = headers
        .get(REFERER)
        .and_then(|h| h.to_str().ok())
        .and_then(|referer| local_path(headers, referer))
        .unwrap_or_else(|| fallback.to_string());
    redirect_to(headers, &location)
}

/// Reduce a referer on this host to its path and query.
///
/// Absolute referers must name the request's `Host`; without one only
/// relative referers are accepted.
fn local_path(headers: &HeaderMap, referer: &str) -> Option<String> {
    let host = headers.get(HOST).and_then(|h| h.to_str().ok());
    if host.is_none() && Url::parse(referer).is_ok() {
        return None;
    }

    let base = Url::parse(&format!("http://{}/", host.unwrap_or("localhost"))).ok()?;
    let target = base.join(referer).ok()?;
    if !matches!(target.scheme(), "http" | "https")
        || target.host_str() != base.host_str()
        || target.port() != base.port()
    {
        return None;
    }

    let path = target.path();
    if path.starts_with("//") || path.starts_with("/\\") {
        return None;
    }
    match target.query() {
        Some(query) => Some(format!("{}?{}", path, query)),
        None => Some(path.to_string()),
    }
}
