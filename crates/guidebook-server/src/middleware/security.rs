//! Response headers applied to every route.
//!
//! Guidebook pages are static HTML with an inline theme `<style>` and no
//! scripts, so the policy only opens what the shell actually emits.

use axum::http::HeaderValue;
use axum::http::header::HeaderName;
use tower_http::set_header::SetResponseHeaderLayer;

/// Content-Security-Policy for rendered pages and API responses.
const CSP: &str = "default-src 'self'; \
                   script-src 'self'; \
                   style-src 'self' 'unsafe-inline'; \
                   img-src 'self' data:; \
                   connect-src 'self'; \
                   frame-ancestors 'none'";

fn overriding(name: &'static str, value: &'static str) -> SetResponseHeaderLayer<HeaderValue> {
    SetResponseHeaderLayer::overriding(
        HeaderName::from_static(name),
        HeaderValue::from_static(value),
    )
}

pub(crate) fn csp_layer() -> SetResponseHeaderLayer<HeaderValue> {
    overriding("content-security-policy", CSP)
}

pub(crate) fn content_type_options_layer() -> SetResponseHeaderLayer<HeaderValue> {
    overriding("x-content-type-options", "nosniff")
}

pub(crate) fn frame_options_layer() -> SetResponseHeaderLayer<HeaderValue> {
    overriding("x-frame-options", "DENY")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn directive(name: &str) -> Option<&'static str> {
        CSP.split(';')
            .map(str::trim)
            .find_map(|d| d.strip_prefix(name))
            .map(str::trim)
    }

    #[test]
    fn test_inline_styles_allowed_for_theme() {
        assert_eq!(directive("style-src"), Some("'self' 'unsafe-inline'"));
    }

    #[test]
    fn test_no_inline_scripts_or_sockets() {
        assert_eq!(directive("script-src"), Some("'self'"));
        // Pages are fully rendered server-side, no live reload channel
        assert_eq!(directive("connect-src"), Some("'self'"));
        assert!(!CSP.contains("ws:"));
    }

    #[test]
    fn test_not_frameable() {
        assert_eq!(directive("frame-ancestors"), Some("'none'"));
    }
}
