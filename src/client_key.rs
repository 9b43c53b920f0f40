// src/client_key.rs

//! Client key derivation for callers sitting behind a reverse proxy.

/// Key used when a request carries no usable address.
///
/// Every such request shares one bucket.
pub const UNKNOWN_CLIENT: &str = "unknown";

/// Derive a client key from an `X-Forwarded-For` header value.
///
/// The first (client-most) address wins. Absent or blank values fall back
/// to [`UNKNOWN_CLIENT`].
pub fn client_key_from_forwarded(header: Option<&str>) -> &str {
    header
        .and_then(|value| value.split(',').next())
        .map(str::trim)
        .filter(|first| !first.is_empty())
        .unwrap_or(UNKNOWN_CLIENT)
}
