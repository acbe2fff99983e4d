use super::*;

// =============================================================================
// protection — path classification
// =============================================================================

#[test]
fn protection_open_paths_pass() {
    assert_eq!(protection("/"), Protection::Open);
    assert_eq!(protection("/login"), Protection::Open);
    assert_eq!(protection("/api/auth/login"), Protection::Open);
    assert_eq!(protection("/api/auth/signup"), Protection::Open);
    assert_eq!(protection("/healthz"), Protection::Open);
}

#[test]
fn protection_page_prefixes() {
    assert_eq!(protection("/dashboard"), Protection::Page);
    assert_eq!(protection("/settings"), Protection::Page);
    assert_eq!(protection("/profile"), Protection::Page);
    assert_eq!(protection("/user/42/edit"), Protection::Page);
}

#[test]
fn protection_api_prefixes() {
    assert_eq!(protection("/api/user"), Protection::Api);
    assert_eq!(protection("/api/user/search"), Protection::Api);
    assert_eq!(protection("/api/auth/me"), Protection::Api);
    assert_eq!(protection("/api/auth/update-password"), Protection::Api);
    assert_eq!(protection("/api/auth/delete"), Protection::Api);
}

#[test]
fn protection_is_segment_aware() {
    // A longer segment sharing the prefix text is not protected.
    assert_eq!(protection("/userx"), Protection::Open);
    assert_eq!(protection("/dashboards"), Protection::Open);
    assert_eq!(protection("/api/users"), Protection::Open);
}

#[test]
fn protection_api_wins_over_page() {
    // "/api/user" must never be classified as a page redirect target.
    assert_eq!(protection("/api/user/123"), Protection::Api);
}

// =============================================================================
// bearer_token
// =============================================================================

fn headers_with_auth(value: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
    headers
}

#[test]
fn bearer_token_extracts_value() {
    let headers = headers_with_auth("Bearer abc123");
    assert_eq!(bearer_token(&headers), Some("abc123"));
}

#[test]
fn bearer_token_missing_header() {
    assert_eq!(bearer_token(&HeaderMap::new()), None);
}

#[test]
fn bearer_token_rejects_other_schemes() {
    let headers = headers_with_auth("Basic abc123");
    assert_eq!(bearer_token(&headers), None);
}

#[test]
fn bearer_token_rejects_empty_token() {
    let headers = headers_with_auth("Bearer ");
    assert_eq!(bearer_token(&headers), None);
}

// =============================================================================
// security headers
// =============================================================================

#[test]
fn security_headers_cover_fixed_set() {
    let mut headers = HeaderMap::new();
    apply_security_headers(&mut headers);
    assert_eq!(headers.get("x-content-type-options").unwrap(), "nosniff");
    assert_eq!(headers.get("x-frame-options").unwrap(), "DENY");
    assert_eq!(headers.get("x-xss-protection").unwrap(), "1; mode=block");
    assert_eq!(
        headers.get("referrer-policy").unwrap(),
        "strict-origin-when-cross-origin"
    );
    assert!(headers.contains_key("content-security-policy"));
}

#[test]
fn security_headers_overwrite_existing_values() {
    let mut headers = HeaderMap::new();
    headers.insert("x-frame-options", HeaderValue::from_static("SAMEORIGIN"));
    apply_security_headers(&mut headers);
    assert_eq!(headers.get("x-frame-options").unwrap(), "DENY");
}

#[test]
fn csp_restricts_default_src_to_self() {
    let csp = SECURITY_HEADERS
        .iter()
        .find(|(name, _)| *name == "content-security-policy")
        .map(|(_, value)| *value)
        .unwrap();
    assert!(csp.starts_with("default-src 'self'"));
}
