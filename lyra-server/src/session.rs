//! Explicit per-request session context
//!
//! Session values travel as plain cookies (`token`, `title`, `artists`,
//! `url`). They are read once per request into an immutable
//! [`SessionContext`] that handlers pass to each pipeline stage.

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{
        header::{AUTHORIZATION, COOKIE},
        request::Parts,
        HeaderMap,
    },
};
use std::collections::HashMap;
use std::convert::Infallible;

pub const COOKIE_TOKEN: &str = "token";
pub const COOKIE_TITLE: &str = "title";
pub const COOKIE_ARTISTS: &str = "artists";
pub const COOKIE_IMAGE: &str = "image";
pub const COOKIE_URL: &str = "url";

/// Track identity remembered from the last resolution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionTrack {
    pub title: String,
    /// `", "`-joined artist display string
    pub artists: String,
}

/// Immutable view of the caller's session for one request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionContext {
    /// Playback bearer credential
    pub bearer: Option<String>,
    pub track: Option<SessionTrack>,
    /// Lyrics page resolved for the current track
    pub match_url: Option<String>,
}

impl SessionContext {
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let cookies = parse_cookies(headers);

        let bearer = headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .or_else(|| non_empty(&cookies, COOKIE_TOKEN));

        let track = non_empty(&cookies, COOKIE_TITLE).map(|title| SessionTrack {
            title,
            artists: cookies.get(COOKIE_ARTISTS).cloned().unwrap_or_default(),
        });

        Self {
            bearer,
            track,
            match_url: non_empty(&cookies, COOKIE_URL),
        }
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for SessionContext
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self::from_headers(&parts.headers))
    }
}

fn non_empty(cookies: &HashMap<String, String>, name: &str) -> Option<String> {
    cookies.get(name).filter(|v| !v.is_empty()).cloned()
}

/// All cookies of a request, percent-decoded; the first occurrence of a name wins
fn parse_cookies(headers: &HeaderMap) -> HashMap<String, String> {
    let mut cookies = HashMap::new();

    for header in headers.get_all(COOKIE) {
        let Ok(raw) = header.to_str() else {
            continue;
        };
        for pair in raw.split(';') {
            let Some((name, value)) = pair.trim().split_once('=') else {
                continue;
            };
            let value = urlencoding::decode(value)
                .map(|v| v.into_owned())
                .unwrap_or_else(|_| value.to_string());
            cookies.entry(name.to_string()).or_insert(value);
        }
    }

    cookies
}

/// `Set-Cookie` value storing `value` (percent-encoded) under `name`
pub fn set_cookie(name: &str, value: &str) -> String {
    format!(
        "{}={}; Path=/; SameSite=Lax",
        name,
        urlencoding::encode(value)
    )
}

/// `Set-Cookie` value removing `name`
pub fn clear_cookie(name: &str) -> String {
    format!("{}=; Path=/; Max-Age=0; SameSite=Lax", name)
}
