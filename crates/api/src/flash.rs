//! One-time acknowledgement messages carried across a redirect.
//!
//! The message travels in the `rc_flash` cookie as `hex(message).hex(tag)`,
//! where the tag is an HMAC-SHA256 over the message keyed with the JWT
//! secret. The next rendered page shows it and clears the cookie.

use std::convert::Infallible;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::auth::cookies::{clear_cookie, read_cookie, set_cookie};
use crate::state::AppState;

pub const FLASH_COOKIE: &str = "rc_flash";

type HmacSha256 = Hmac<Sha256>;

fn mac(secret: &str) -> HmacSha256 {
    <HmacSha256 as Mac>::new_from_slice(secret.as_bytes())
        .expect("HMAC can take key of any size")
}

fn to_hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

fn from_hex(value: &str) -> Option<Vec<u8>> {
    if value.len() % 2 != 0 {
        return None;
    }
    (0..value.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(value.get(i..i + 2)?, 16).ok())
        .collect()
}

/// Encode and sign a message for the flash cookie.
pub fn sign(message: &str, secret: &str) -> String {
    let mut mac = mac(secret);
    mac.update(message.as_bytes());
    let tag = mac.finalize().into_bytes();
    format!("{}.{}", to_hex(message.as_bytes()), to_hex(&tag))
}

/// Verify and decode a flash cookie value. Tampered values yield `None`.
pub fn verify(value: &str, secret: &str) -> Option<String> {
    let (message_hex, tag_hex) = value.split_once('.')?;
    let message = from_hex(message_hex)?;
    let tag = from_hex(tag_hex)?;

    let mut mac = mac(secret);
    mac.update(&message);
    mac.verify_slice(&tag).ok()?;
    String::from_utf8(message).ok()
}

/// `Set-Cookie` value carrying `message` to the next page.
pub fn flash_cookie(message: &str, state: &AppState) -> String {
    set_cookie(
        FLASH_COOKIE,
        &sign(message, &state.config.jwt.secret),
        None,
        state.config.cookie_secure,
    )
}

/// The flash message sent with the current request, if any.
#[derive(Debug, Default)]
pub struct IncomingFlash {
    message: Option<String>,
    present: bool,
}

impl IncomingFlash {
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// `Set-Cookie` value consuming the flash, when the request carried one.
    pub fn clear_header(&self) -> Option<String> {
        self.present.then(|| clear_cookie(FLASH_COOKIE))
    }
}

impl FromRequestParts<AppState> for IncomingFlash {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Some(raw) = read_cookie(&parts.headers, FLASH_COOKIE) else {
            return Ok(Self::default());
        };
        let message = verify(raw, &state.config.jwt.secret);
        if message.is_none() {
            tracing::warn!("Discarding flash cookie with invalid signature");
        }
        Ok(Self {
            message,
            present: true,
        })
    }
}
