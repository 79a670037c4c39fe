//! Cookie plumbing between HTTP requests and the in-memory `SessionStore`.
//!
//! The cookie only carries an opaque token; the session data itself never
//! leaves the server.

use crate::state::AppState;
use axum::extract::FromRequestParts;
use axum::http::header::{COOKIE, HeaderMap};
use axum::http::request::Parts;
use sign_assist_core::{Session, SessionToken};
use std::convert::Infallible;

pub const COOKIE_NAME: &str = "sign_assist_session";

/// The caller's session token (if it sent a valid one) and the session it maps to.
#[derive(Debug, Clone)]
pub struct CurrentSession {
    pub token: Option<SessionToken>,
    pub session: Option<Session>,
}

impl FromRequestParts<AppState> for CurrentSession {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = token_from_headers(&parts.headers);
        let session = match &token {
            Some(token) => state.sessions.get(token).await,
            None => None,
        };
        Ok(Self { token, session })
    }
}

/// Finds our cookie among all `Cookie` headers. Malformed values are ignored.
pub fn token_from_headers(headers: &HeaderMap) -> Option<SessionToken> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == COOKIE_NAME)
        .and_then(|(_, value)| SessionToken::parse(value))
}

pub fn issue_cookie(token: &SessionToken) -> String {
    format!("{COOKIE_NAME}={token}; Path=/; HttpOnly; SameSite=Lax")
}

pub fn expire_cookie() -> String {
    format!("{COOKIE_NAME}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0")
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_token_is_found_among_other_cookies() {
        let token = SessionToken::generate();
        let mut headers = HeaderMap::new();
        headers.append(COOKIE, HeaderValue::from_static("theme=dark"));
        let ours = format!("lang=en; {COOKIE_NAME}={token}");
        headers.append(COOKIE, HeaderValue::from_str(&ours).unwrap());

        assert_eq!(token_from_headers(&headers), Some(token));
    }

    #[test]
    fn test_missing_or_malformed_cookie_yields_none() {
        let mut headers = HeaderMap::new();
        assert_eq!(token_from_headers(&headers), None);

        headers.insert(
            COOKIE,
            HeaderValue::from_static("sign_assist_session=forged"),
        );
        assert_eq!(token_from_headers(&headers), None);
    }

    #[test]
    fn test_issued_cookie_round_trips() {
        let token = SessionToken::generate();
        let set_cookie = issue_cookie(&token);
        // A browser echoes back only the `name=value` part.
        let echoed = set_cookie.split(';').next().unwrap();

        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_str(echoed).unwrap());

        assert_eq!(token_from_headers(&headers), Some(token));
        assert!(expire_cookie().contains("Max-Age=0"));
    }
}
