//! One-shot user warnings carried across a redirect in a cookie.

use axum::http::{HeaderMap, header};

pub const FLASH_COOKIE: &str = "weather_flash";

/// `Set-Cookie` value carrying `messages` to the next page load.
pub fn set_cookie(messages: &[&str]) -> String {
    format!(
        "{FLASH_COOKIE}={}; Path=/; HttpOnly; SameSite=Lax",
        urlencoding::encode(&messages.join("\n"))
    )
}

/// `Set-Cookie` value that drops the flash cookie once shown.
pub fn clear_cookie() -> String {
    format!("{FLASH_COOKIE}=; Path=/; Max-Age=0")
}

/// Pending flash messages from the request's `Cookie` headers.
pub fn read(headers: &HeaderMap) -> Vec<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .filter(|(name, _)| *name == FLASH_COOKIE)
        .filter_map(|(_, value)| urlencoding::decode(value).ok())
        .flat_map(|decoded| {
            decoded
                .split('\n')
                .filter(|m| !m.is_empty())
                .map(str::to_string)
                .collect::<Vec<_>>()
        })
        .collect()
}
