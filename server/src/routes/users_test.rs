use super::*;

// =============================================================================
// sort_column — whitelist only, never raw input
// =============================================================================

#[test]
fn sort_column_accepts_whitelisted_fields() {
    assert_eq!(sort_column(Some("id")), "id");
    assert_eq!(sort_column(Some("name")), "name");
    assert_eq!(sort_column(Some("email")), "email");
}

#[test]
fn sort_column_maps_camel_case_aliases() {
    assert_eq!(sort_column(Some("createdAt")), "created_at");
    assert_eq!(sort_column(Some("updatedAt")), "updated_at");
    assert_eq!(sort_column(Some("updated_at")), "updated_at");
}

#[test]
fn sort_column_rejects_unknown_fields() {
    assert_eq!(sort_column(Some("password_hash")), "created_at");
    assert_eq!(sort_column(Some("1; DROP TABLE users")), "created_at");
    assert_eq!(sort_column(None), "created_at");
}

#[test]
fn sort_column_is_case_insensitive() {
    assert_eq!(sort_column(Some("NAME")), "name");
}

// =============================================================================
// order_direction
// =============================================================================

#[test]
fn order_direction_defaults_to_asc() {
    assert_eq!(order_direction(None), "ASC");
    assert_eq!(order_direction(Some("sideways")), "ASC");
}

#[test]
fn order_direction_accepts_desc() {
    assert_eq!(order_direction(Some("desc")), "DESC");
    assert_eq!(order_direction(Some("DESC")), "DESC");
}

// =============================================================================
// clamp_page / clamp_limit
// =============================================================================

#[test]
fn clamp_page_floors_at_one() {
    assert_eq!(clamp_page(None), 1);
    assert_eq!(clamp_page(Some(0)), 1);
    assert_eq!(clamp_page(Some(-3)), 1);
    assert_eq!(clamp_page(Some(7)), 7);
}

#[test]
fn clamp_limit_defaults_and_caps() {
    assert_eq!(clamp_limit(None), 10);
    assert_eq!(clamp_limit(Some(0)), 10);
    assert_eq!(clamp_limit(Some(25)), 25);
    assert_eq!(clamp_limit(Some(10_000)), 100);
}

#[test]
fn clamp_page_bounds_the_offset_computation() {
    // The OFFSET is (page - 1) * limit; an absurd page value must not be able
    // to overflow it into a panic or a negative offset.
    let page = clamp_page(Some(i64::MAX));
    let limit = clamp_limit(Some(i64::MAX));
    assert!((page - 1).checked_mul(limit).is_some());
}

// =============================================================================
// page_info
// =============================================================================

#[test]
fn page_info_middle_page() {
    let info = page_info(45, 2, 10);
    assert_eq!(info.total_pages, 5);
    assert_eq!(info.total_users, 45);
    assert!(info.has_next_page);
    assert!(info.has_prev_page);
}

#[test]
fn page_info_first_and_last_page() {
    let first = page_info(45, 1, 10);
    assert!(first.has_next_page);
    assert!(!first.has_prev_page);

    let last = page_info(45, 5, 10);
    assert!(!last.has_next_page);
    assert!(last.has_prev_page);
}

#[test]
fn page_info_empty_result() {
    let info = page_info(0, 1, 10);
    assert_eq!(info.total_pages, 0);
    assert!(!info.has_next_page);
    assert!(!info.has_prev_page);
}

#[test]
fn page_info_exact_multiple() {
    assert_eq!(page_info(50, 1, 10).total_pages, 5);
    assert_eq!(page_info(51, 1, 10).total_pages, 6);
}

#[test]
fn pagination_serializes_camel_case() {
    let json = serde_json::to_value(page_info(1, 1, 10)).unwrap();
    assert!(json.get("currentPage").is_some());
    assert!(json.get("hasNextPage").is_some());
}
