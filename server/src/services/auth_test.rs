use super::*;

// =============================================================================
// normalize_email
// =============================================================================

#[test]
fn normalize_email_lowercases_and_trims() {
    assert_eq!(normalize_email("  Ann@Example.COM "), Some("ann@example.com".to_owned()));
}

#[test]
fn normalize_email_rejects_missing_at() {
    assert_eq!(normalize_email("ann.example.com"), None);
}

#[test]
fn normalize_email_rejects_empty_local_or_domain() {
    assert_eq!(normalize_email("@example.com"), None);
    assert_eq!(normalize_email("ann@"), None);
    assert_eq!(normalize_email(""), None);
}

#[test]
fn normalize_email_rejects_double_at() {
    assert_eq!(normalize_email("a@b@c"), None);
}

// =============================================================================
// acceptable_password
// =============================================================================

#[test]
fn acceptable_password_minimum_length() {
    assert!(!acceptable_password("short"));
    assert!(!acceptable_password("1234567"));
    assert!(acceptable_password("12345678"));
}

// =============================================================================
// password hashing
// =============================================================================

#[test]
fn generate_salt_is_32_hex_chars() {
    let salt = generate_salt();
    assert_eq!(salt.len(), 32);
    assert!(salt.chars().all(|c| c.is_ascii_hexdigit()));
}

#[test]
fn generate_salt_two_calls_differ() {
    assert_ne!(generate_salt(), generate_salt());
}

#[test]
fn verify_password_accepts_matching() {
    let salt = generate_salt();
    let hash = hash_password("correct horse", &salt);
    assert!(verify_password("correct horse", &salt, &hash));
}

#[test]
fn verify_password_rejects_wrong_password() {
    let salt = generate_salt();
    let hash = hash_password("correct horse", &salt);
    assert!(!verify_password("wrong horse", &salt, &hash));
}

#[test]
fn verify_password_rejects_wrong_salt() {
    let hash = hash_password("correct horse", &generate_salt());
    assert!(!verify_password("correct horse", &generate_salt(), &hash));
}

#[test]
fn hash_password_salt_changes_digest() {
    assert_ne!(hash_password("pw", "aa"), hash_password("pw", "bb"));
}

// =============================================================================
// google config
// =============================================================================

#[test]
fn authorize_url_encodes_parameters() {
    let config = GoogleConfig {
        client_id: "client id".to_owned(),
        client_secret: "secret".to_owned(),
        redirect_uri: "http://localhost:3000/auth/google/callback".to_owned(),
    };
    let url = config.authorize_url("st/ate");
    assert!(url.starts_with("https://accounts.google.com/o/oauth2/v2/auth?"));
    assert!(url.contains("client_id=client%20id"));
    assert!(url.contains("redirect_uri=http%3A%2F%2Flocalhost%3A3000%2Fauth%2Fgoogle%2Fcallback"));
    assert!(url.contains("state=st%2Fate"));
    assert!(url.contains("response_type=code"));
}
