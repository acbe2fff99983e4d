use super::*;

const USER_JSON: &str = "%7B%22id%22%3A%22u1%22%2C%22name%22%3A%22Ann%22%7D";

// =============================================================================
// parse_callback
// =============================================================================

#[test]
fn plain_urls_have_no_callback() {
    assert_eq!(parse_callback(""), CallbackOutcome::Absent);
    assert_eq!(parse_callback("?"), CallbackOutcome::Absent);
    assert_eq!(parse_callback("?page=2&sort=name"), CallbackOutcome::Absent);
}

#[test]
fn valid_pair_parses() {
    let search = format!("?token=abc123&user={USER_JSON}");
    let CallbackOutcome::Parsed(payload) = parse_callback(&search) else {
        panic!("expected parsed outcome");
    };
    assert_eq!(payload.token, "abc123");
    assert_eq!(payload.user.id, "u1");
    assert_eq!(payload.user.name, "Ann");
}

#[test]
fn parameter_order_does_not_matter() {
    let search = format!("?user={USER_JSON}&token=abc123");
    assert!(matches!(parse_callback(&search), CallbackOutcome::Parsed(_)));
}

#[test]
fn half_a_pair_is_malformed() {
    assert_eq!(parse_callback("?token=abc123"), CallbackOutcome::Malformed);
    assert_eq!(parse_callback(&format!("?user={USER_JSON}")), CallbackOutcome::Malformed);
}

#[test]
fn empty_token_is_malformed() {
    let search = format!("?token=&user={USER_JSON}");
    assert_eq!(parse_callback(&search), CallbackOutcome::Malformed);
}

#[test]
fn invalid_user_json_is_malformed() {
    assert_eq!(
        parse_callback("?token=abc&user=%7Bnot-json"),
        CallbackOutcome::Malformed
    );
    assert_eq!(
        parse_callback("?token=abc&user=%5B1%2C2%5D"),
        CallbackOutcome::Malformed
    );
}

#[test]
fn surrounding_parameters_are_ignored() {
    let search = format!("?from=google&token=abc&user={USER_JSON}&theme=dark");
    assert!(matches!(parse_callback(&search), CallbackOutcome::Parsed(_)));
}

#[test]
fn valueless_pairs_are_skipped() {
    let search = format!("?flag&token=abc&user={USER_JSON}");
    assert!(matches!(parse_callback(&search), CallbackOutcome::Parsed(_)));
}

// =============================================================================
// strip_callback_params
// =============================================================================

#[test]
fn stripping_removes_only_the_pair() {
    let search = format!("?from=google&token=abc&user={USER_JSON}&theme=dark");
    assert_eq!(strip_callback_params(&search), "?from=google&theme=dark");
}

#[test]
fn stripping_everything_yields_empty() {
    let search = format!("?token=abc&user={USER_JSON}");
    assert_eq!(strip_callback_params(&search), "");
}

#[test]
fn stripping_a_clean_url_is_identity() {
    assert_eq!(strip_callback_params("?page=2"), "?page=2");
    assert_eq!(strip_callback_params(""), "");
}

#[test]
fn cleaned_url_preserves_path_query_and_fragment() {
    let search = format!("?from=google&token=abc&user={USER_JSON}");
    assert_eq!(
        cleaned_url("/dashboard", &search, "#section-2"),
        "/dashboard?from=google#section-2"
    );
}

#[test]
fn cleaned_url_without_fragment_or_leftover_query() {
    let search = format!("?token=abc&user={USER_JSON}");
    assert_eq!(cleaned_url("/", &search, ""), "/");
}

#[test]
fn reparsing_a_stripped_url_is_absent() {
    let search = format!("?token=abc&user={USER_JSON}");
    let cleaned = strip_callback_params(&search);
    assert_eq!(parse_callback(&cleaned), CallbackOutcome::Absent);
}
