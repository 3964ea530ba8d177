use std::net::SocketAddr;

use axum::http::{HeaderMap, header::COOKIE};

pub const DEVICE_COOKIE: &str = "device_id";

/// One year.
pub const DEVICE_COOKIE_MAX_AGE_SECS: u64 = 31_536_000;

/// First hop of `X-Forwarded-For` if present, else the peer address.
pub fn network_address(headers: &HeaderMap, peer: SocketAddr) -> String {
    headers
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
        .map(str::trim)
        .filter(|first| !first.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| peer.ip().to_string())
}

pub fn device_cookie(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == DEVICE_COOKIE)
        .map(|(_, value)| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

pub fn set_device_cookie(token: &str) -> String {
    format!(
        "{DEVICE_COOKIE}={token}; Max-Age={DEVICE_COOKIE_MAX_AGE_SECS}; Path=/; SameSite=Lax; HttpOnly"
    )
}

/// Treats an empty or blank optional string as absent.
pub fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
