use super::*;

// =============================================================================
// parse_query
// =============================================================================

#[test]
fn parse_query_strips_leading_question_mark() {
    let q = parse_query("?sort=price&page=2");
    assert_eq!(q.get("sort").map(String::as_str), Some("price"));
    assert_eq!(q.get("page").map(String::as_str), Some("2"));
}

#[test]
fn parse_query_empty_string_is_empty_map() {
    assert!(parse_query("").is_empty());
    assert!(parse_query("?").is_empty());
}

#[test]
fn parse_query_flag_without_value() {
    let q = parse_query("sale&&color=red");
    assert_eq!(q.len(), 2);
    assert_eq!(q.get("sale").map(String::as_str), Some(""));
}

// =============================================================================
// MemoryNavigator
// =============================================================================

#[test]
fn memory_navigator_records_history_and_moves() {
    let nav = MemoryNavigator::new("/account/login");
    nav.navigate_to("/");
    assert_eq!(nav.history(), vec!["/".to_owned()]);
    assert_eq!(nav.current_path(), "/");
}

#[test]
fn memory_navigator_visit_splits_query() {
    let nav = MemoryNavigator::new("/");
    nav.visit("/collection/shirts?size=m");
    assert_eq!(nav.current_path(), "/collection/shirts");
    assert_eq!(nav.current_query().get("size").map(String::as_str), Some("m"));
    assert!(nav.history().is_empty());
}

#[test]
fn route_target_path_ignores_query() {
    assert_eq!(RouteTarget::path("/cart").query, None);
}
