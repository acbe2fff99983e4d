use super::*;

fn payload(name: &str, email: &str, password: &str) -> SignupPayload {
    SignupPayload {
        name: name.to_owned(),
        email: email.to_owned(),
        password: password.to_owned(),
        age: None,
        gender: None,
        profile_picture: None,
    }
}

// =============================================================================
// validate_signup
// =============================================================================

#[test]
fn validate_signup_accepts_and_normalizes() {
    let p = payload("Ann", " Ann@Example.com ", "longenough");
    assert_eq!(validate_signup(&p), Ok("ann@example.com".to_owned()));
}

#[test]
fn validate_signup_rejects_blank_name() {
    let p = payload("   ", "ann@example.com", "longenough");
    assert_eq!(validate_signup(&p), Err("name required"));
}

#[test]
fn validate_signup_rejects_bad_email() {
    let p = payload("Ann", "not-an-email", "longenough");
    assert_eq!(validate_signup(&p), Err("invalid email"));
}

#[test]
fn validate_signup_rejects_short_password() {
    let p = payload("Ann", "ann@example.com", "short");
    assert_eq!(validate_signup(&p), Err("password too short"));
}

// =============================================================================
// payload decoding — wire format is camelCase
// =============================================================================

#[test]
fn signup_payload_decodes_camel_case() {
    let p: SignupPayload = serde_json::from_str(
        r#"{"name":"Ann","email":"a@b.c","password":"longenough","profilePicture":"http://x/y.png"}"#,
    )
    .unwrap();
    assert_eq!(p.profile_picture.as_deref(), Some("http://x/y.png"));
    assert_eq!(p.age, None);
}

#[test]
fn change_password_payload_decodes_camel_case() {
    let p: ChangePasswordPayload =
        serde_json::from_str(r#"{"currentPassword":"old","newPassword":"new"}"#).unwrap();
    assert_eq!(p.current_password, "old");
    assert_eq!(p.new_password, "new");
}

#[test]
fn auth_response_serializes_user_summary() {
    let resp = AuthResponse {
        user: session::SessionUser {
            id: uuid::Uuid::nil(),
            name: "Ann".to_owned(),
            email: "ann@example.com".to_owned(),
            profile_picture: None,
        },
        token: "abc".to_owned(),
    };
    let json = serde_json::to_value(&resp).unwrap();
    assert_eq!(json["token"], "abc");
    assert_eq!(json["user"]["name"], "Ann");
    // camelCase on the wire
    assert!(json["user"].get("profilePicture").is_some());
}

// =============================================================================
// OAuth callback handoff
// =============================================================================

#[test]
fn oauth_state_cookie_replacement_is_expired() {
    // Every callback response carries this replacement, so a failed callback
    // cannot leave a live CSRF state value behind.
    let cookie = expired_oauth_state_cookie();
    assert_eq!(cookie.name(), "oauth_state");
    assert_eq!(cookie.value(), "");
    assert_eq!(cookie.max_age(), Some(Duration::ZERO));
    assert_eq!(cookie.http_only(), Some(true));
}

#[test]
fn callback_destination_encodes_session_pair() {
    let user = session::SessionUser {
        id: uuid::Uuid::nil(),
        name: "Ann O'Leary".to_owned(),
        email: "ann@example.com".to_owned(),
        profile_picture: None,
    };
    let url = callback_destination("tok en", &user);

    assert!(url.starts_with("/?token=tok%20en&user="), "got {url}");
    // The user half must decode back to the summary the client expects.
    let encoded = url.split("&user=").nth(1).unwrap();
    let decoded = urlencoding::decode(encoded).unwrap();
    let value: serde_json::Value = serde_json::from_str(&decoded).unwrap();
    assert_eq!(value["name"], "Ann O'Leary");
    assert_eq!(value["email"], "ann@example.com");
}
