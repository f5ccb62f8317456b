use tablesearch::access::SqliteAccess;
use tablesearch::dialect::{MySqlDialect, SqliteDialect};
use tablesearch::error::SearchError;
use tablesearch::registry::ColumnRegistry;
use tablesearch::target::Target;

fn access(setup: &str) -> SqliteAccess {
    let access = SqliteAccess::open(":memory:").unwrap();
    access.execute_batch(setup).unwrap();
    access
}

#[test]
fn introspect_keeps_select_order() {
    let access = access("CREATE TABLE t (a TEXT, b TEXT, c TEXT); INSERT INTO t VALUES ('1', '2', '3');");
    let registry = ColumnRegistry::introspect(&Target::parse("t"), &MySqlDialect, &access).expect("registry");
    assert_eq!(registry.list(), ["a", "b", "c"]);
}

#[test]
fn omit_is_case_insensitive() {
    let access = access("CREATE TABLE t (a TEXT, b TEXT, c TEXT); INSERT INTO t VALUES ('1', '2', '3');");
    let mut registry = ColumnRegistry::introspect(&Target::parse("t"), &MySqlDialect, &access).unwrap();
    registry.omit(&["B", "not_there"]);
    assert_eq!(registry.list(), ["a", "c"], "unmatched names are ignored");
}

#[test]
fn has_uses_stored_casing() {
    let access = access("CREATE TABLE t (Name TEXT); INSERT INTO t VALUES ('x');");
    let registry = ColumnRegistry::introspect(&Target::parse("t"), &SqliteDialect, &access).unwrap();
    assert!(registry.has("Name"));
    assert!(!registry.has("name"));
}

#[test]
fn empty_table_fails_initialization() {
    let access = access("CREATE TABLE t (a TEXT);");
    let err = ColumnRegistry::introspect(&Target::parse("t"), &MySqlDialect, &access).unwrap_err();
    assert!(matches!(err, SearchError::Initialization(_)));
    assert!(err.to_string().contains("Not able to gather column data"));
}

#[test]
fn unknown_table_fails_initialization() {
    let access = access("CREATE TABLE t (a TEXT);");
    let err = ColumnRegistry::introspect(&Target::parse("nope"), &MySqlDialect, &access).unwrap_err();
    assert!(matches!(err, SearchError::Initialization(_)));
}

#[test]
fn subquery_target_is_sampled_as_derived_table() {
    let access = access("CREATE TABLE t (a TEXT, b TEXT); INSERT INTO t VALUES ('1', '2');");
    let target = Target::parse("SELECT b FROM t");
    assert!(matches!(target, Target::Subquery(_)));
    let registry = ColumnRegistry::introspect(&target, &MySqlDialect, &access).unwrap();
    assert_eq!(registry.list(), ["b"]);
}

#[test]
fn empty_column_list_is_rejected() {
    assert!(ColumnRegistry::new(Vec::new()).is_err());
}
