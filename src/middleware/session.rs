use std::convert::Infallible;

use axum::{extract::FromRequestParts, http::request::Parts};
use axum_extra::extract::{
    SignedCookieJar,
    cookie::{Cookie, Key, SameSite},
};

use crate::AppState;

pub const REPORT_COOKIE: &str = "report_id";

/// Report id carried from the lookup form to the results page, if the signed cookie is valid.
pub struct ReportSession(pub Option<i64>);

impl FromRequestParts<AppState> for ReportSession {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let jar = SignedCookieJar::from_headers(&parts.headers, state.cookie_key.clone());
        Ok(ReportSession(report_id(&jar)))
    }
}

fn report_id(jar: &SignedCookieJar) -> Option<i64> {
    jar.get(REPORT_COOKIE)
        .and_then(|cookie| cookie.value().parse().ok())
        .filter(|id: &i64| *id > 0)
}

pub fn remember_report(jar: SignedCookieJar, report_id: i64) -> SignedCookieJar {
    let cookie = Cookie::build((REPORT_COOKIE, report_id.to_string()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax);
    jar.add(cookie)
}

/// Signing key from `SESSION_KEY`. Falls back to a random key, which invalidates sessions on restart.
pub fn cookie_key(secret: Option<&str>) -> Key {
    match secret {
        Some(secret) => match Key::try_from(secret.as_bytes()) {
            Ok(key) => key,
            Err(_) => {
                tracing::warn!("SESSION_KEY is shorter than 64 bytes, using a random key");
                Key::generate()
            }
        },
        None => {
            tracing::warn!("SESSION_KEY not set, sessions will not survive a restart");
            Key::generate()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{HeaderMap, HeaderValue, header};

    #[test]
    fn test_cookie_key_from_long_secret() {
        let secret = "k".repeat(64);
        let a = cookie_key(Some(&secret));
        let b = cookie_key(Some(&secret));
        assert_eq!(a.master(), b.master());
    }

    #[test]
    fn test_short_secret_falls_back_to_random_key() {
        let a = cookie_key(Some("short"));
        let b = cookie_key(Some("short"));
        assert_ne!(a.master(), b.master());
    }

    #[test]
    fn test_remembered_report_is_readable() {
        let jar = remember_report(SignedCookieJar::new(Key::generate()), 445566);
        let cookie = jar.get(REPORT_COOKIE).unwrap();
        assert_eq!(cookie.value(), "445566");
    }

    #[test]
    fn test_unsigned_cookie_is_ignored() {
        let key = Key::generate();
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_static("report_id=445566"));
        let jar = SignedCookieJar::from_headers(&headers, key);
        assert_eq!(report_id(&jar), None);
    }
}
