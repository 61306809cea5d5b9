//! One-shot notices carried across redirects in a short-lived cookie.
//!
//! Mutating handlers push a notice and redirect; the next rendered page
//! takes the notices, which clears the cookie.

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use serde::{Deserialize, Serialize};

const FLASH_COOKIE_NAME: &str = "flash";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FlashMessage {
    pub level: String,
    pub message: String,
}

fn push(jar: CookieJar, level: &str, message: &str) -> CookieJar {
    let mut messages = peek(&jar);
    messages.push(FlashMessage {
        level: level.to_string(),
        message: message.to_string(),
    });
    // Base64 keeps the payload inside the cookie-value character set
    let value = URL_SAFE_NO_PAD.encode(serde_json::to_string(&messages).unwrap_or_default());
    jar.add(
        Cookie::build((FLASH_COOKIE_NAME, value))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .build(),
    )
}

pub fn success(jar: CookieJar, message: &str) -> CookieJar {
    push(jar, "success", message)
}

pub fn error(jar: CookieJar, message: &str) -> CookieJar {
    push(jar, "error", message)
}

pub fn info(jar: CookieJar, message: &str) -> CookieJar {
    push(jar, "info", message)
}

fn peek(jar: &CookieJar) -> Vec<FlashMessage> {
    jar.get(FLASH_COOKIE_NAME)
        .and_then(|cookie| URL_SAFE_NO_PAD.decode(cookie.value()).ok())
        .and_then(|bytes| serde_json::from_slice(&bytes).ok())
        .unwrap_or_default()
}

/// Read pending notices and clear the cookie.
pub fn take(jar: CookieJar) -> (CookieJar, Vec<FlashMessage>) {
    let messages = peek(&jar);
    let jar = jar.remove(Cookie::build((FLASH_COOKIE_NAME, "")).path("/").build());
    (jar, messages)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_then_take_round_trips() {
        let jar = CookieJar::new();
        let jar = success(jar, "saved");
        let jar = error(jar, "broken");

        let (jar, messages) = take(jar);
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].level, "success");
        assert_eq!(messages[0].message, "saved");
        assert_eq!(messages[1].level, "error");

        let (_, empty) = take(jar);
        assert!(empty.is_empty());
    }
}
