use std::sync::Arc;

use serde_json::json;
use tablesearch::access::SqliteAccess;
use tablesearch::dialect::DialectKind;
use tablesearch::service::SearchService;

fn setup() -> (SearchService, Arc<SqliteAccess>) {
    let access = Arc::new(SqliteAccess::open(":memory:").unwrap());
    access
        .execute_batch(
            "CREATE TABLE people (name TEXT, dept TEXT);
             INSERT INTO people VALUES ('O''Brien', 'X'), ('Bob', 'Y'), ('100%', 'Z'), ('1000', 'Z');",
        )
        .unwrap();
    let service = SearchService::new("people", DialectKind::MySql, access.clone()).expect("service");
    (service, access)
}

#[test]
fn quote_in_value_is_data() {
    let (service, _) = setup();
    let envelope = service.handle_json(json!({
        "action": "getResults",
        "criteria": [{ "column": "name", "operator": "equals", "value": "O'Brien" }]
    }));
    assert!(envelope.success, "{}", envelope.message);
    assert_eq!(envelope.data.len(), 1);
}

#[test]
fn statement_text_in_value_is_data() {
    let (service, access) = setup();
    for operator in ["equals", "contains", "does not equal"] {
        let envelope = service.handle_json(json!({
            "action": "getResults",
            "criteria": [{ "column": "name", "operator": operator, "value": "'; DROP TABLE people; --" }]
        }));
        assert!(envelope.success, "{}", envelope.message);
        let expected = if operator == "does not equal" { 4 } else { 0 };
        assert_eq!(envelope.data.len(), expected, "operator {operator}");
    }
    let still_there = tablesearch::access::DataAccess::fetch(access.as_ref(), "SELECT COUNT(*) AS n FROM people", &[]).unwrap();
    assert_eq!(still_there[0]["n"], json!(4));
}

#[test]
fn tautology_in_value_matches_nothing() {
    let (service, _) = setup();
    let envelope = service.handle_json(json!({
        "action": "getResults",
        "criteria": [{ "column": "name", "operator": "equals", "value": "x' OR '1'='1" }]
    }));
    assert!(envelope.success);
    assert!(envelope.data.is_empty());
}

#[test]
fn wildcards_in_contains_are_literal() {
    let (service, _) = setup();
    let envelope = service.handle_json(json!({
        "action": "getResults",
        "criteria": [{ "column": "name", "operator": "contains", "value": "0%" }]
    }));
    assert_eq!(envelope.data.len(), 1, "only the literal 100% row");
    assert_eq!(envelope.data[0]["name"], json!("100%"));
}

#[test]
fn hostile_column_name_is_rejected() {
    let (service, _) = setup();
    let envelope = service.handle_json(json!({
        "action": "getResults",
        "criteria": [{ "column": "name` = 'x' OR 1=1 --", "operator": "equals", "value": "a" }]
    }));
    assert!(!envelope.success);
    assert!(envelope.data.is_empty());
}
