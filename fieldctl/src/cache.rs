//! Cache-control metadata attached by the response shaper.
//!
//! Per-tenant GET responses are privately cacheable with short lifetimes;
//! token-addressed public resources are shared-cacheable with longer ones.
//! Mutations never attach cache headers.

use axum::http::{HeaderName, HeaderValue, header};

/// Cache header for per-tenant GET responses. `max_age` should stay within
/// 15..=60 seconds and `stale_while_revalidate` within 30..=120.
pub fn private_cache(max_age: u32, stale_while_revalidate: u32) -> [(HeaderName, HeaderValue); 1] {
    let value = format!("private, max-age={max_age}, stale-while-revalidate={stale_while_revalidate}");
    [(
        header::CACHE_CONTROL,
        HeaderValue::from_str(&value).expect("cache-control value is always valid ASCII"),
    )]
}

/// Cache header for public token-addressed resources (estimate pages,
/// consultations). The opaque token in the URL is the capability, so shared
/// caching is safe.
pub fn public_cache() -> [(HeaderName, HeaderValue); 1] {
    [(
        header::CACHE_CONTROL,
        HeaderValue::from_static("public, max-age=300, stale-while-revalidate=600"),
    )]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_private_cache_value() {
        let [(name, value)] = private_cache(30, 60);
        assert_eq!(name, header::CACHE_CONTROL);
        assert_eq!(value.to_str().unwrap(), "private, max-age=30, stale-while-revalidate=60");
    }

    #[test]
    fn test_public_cache_value() {
        let [(name, value)] = public_cache();
        assert_eq!(name, header::CACHE_CONTROL);
        assert_eq!(value.to_str().unwrap(), "public, max-age=300, stale-while-revalidate=600");
    }
}
