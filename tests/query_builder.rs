use tablesearch::builder::{QueryBuilder, RowLimit};
use tablesearch::conditions::ConditionSet;
use tablesearch::criteria::{Conjunction, Criterion, Operator};
use tablesearch::dialect::{MySqlDialect, OracleDialect};
use tablesearch::error::SearchError;
use tablesearch::registry::ColumnRegistry;
use tablesearch::target::Target;

fn registry() -> ColumnRegistry {
    ColumnRegistry::new(vec!["name".to_string(), "dept".to_string()]).unwrap()
}

fn eq(column: &str, value: &str, conjunction: Option<Conjunction>) -> Option<Criterion> {
    Some(Criterion::new(column, Operator::Equals, value, conjunction))
}

#[test]
fn hole_is_skipped_and_first_is_always_anded() {
    let (registry, conditions, target) = (registry(), ConditionSet::new(), Target::parse("people"));
    let builder = QueryBuilder::new(&MySqlDialect, &target, &registry, &conditions, RowLimit::default());
    let criteria = vec![
        eq("name", "Anna", Some(Conjunction::Or)),
        None,
        eq("dept", "Y", Some(Conjunction::Or)),
    ];
    let statement = builder.results(&criteria).unwrap();
    assert_eq!(
        statement.sql,
        "SELECT `name`, `dept` FROM `people` WHERE 1=1 AND (`name` = ? OR `dept` = ?) LIMIT 500"
    );
    assert_eq!(statement.params, vec!["Anna", "Y"]);
}

#[test]
fn conjunctions_fold_left_to_right() {
    let (registry, conditions, target) = (registry(), ConditionSet::new(), Target::parse("people"));
    let builder = QueryBuilder::new(&MySqlDialect, &target, &registry, &conditions, RowLimit::default());
    let criteria = vec![
        eq("name", "a", None),
        eq("name", "b", Some(Conjunction::Or)),
        Some(Criterion::new("dept", Operator::NotEquals, "c", Some(Conjunction::And))),
    ];
    let sql = builder.results(&criteria).unwrap().sql;
    assert!(sql.contains("((`name` = ? OR `name` = ?) AND `dept` <> ?)"), "{sql}");
}

#[test]
fn contains_binds_escaped_pattern() {
    let (registry, conditions, target) = (registry(), ConditionSet::new(), Target::parse("people"));
    let builder = QueryBuilder::new(&MySqlDialect, &target, &registry, &conditions, RowLimit::default());
    let criteria = vec![Some(Criterion::new("name", Operator::Contains, "50%_off!", None))];
    let statement = builder.results(&criteria).unwrap();
    assert!(statement.sql.contains("`name` LIKE ? ESCAPE '!'"));
    assert_eq!(statement.params, vec!["%50!%!_off!!%"]);
}

#[test]
fn conditions_follow_criteria_and_limit_is_last() {
    let (registry, target) = (registry(), Target::parse("people"));
    let mut conditions = ConditionSet::new();
    conditions.add("tenant_id = 7").unwrap();
    conditions.add("admin = 'no'").unwrap();
    let limit = RowLimit::new(10).unwrap();
    let builder = QueryBuilder::new(&MySqlDialect, &target, &registry, &conditions, limit);
    let sql = builder.results(&[eq("name", "x", None)]).unwrap().sql;
    assert!(sql.ends_with("AND `name` = ? AND (tenant_id = 7) AND (admin = 'no') LIMIT 10"), "{sql}");
}

#[test]
fn no_criteria_is_still_bounded() {
    let (registry, conditions, target) = (registry(), ConditionSet::new(), Target::parse("people"));
    let builder = QueryBuilder::new(&MySqlDialect, &target, &registry, &conditions, RowLimit::default());
    let statement = builder.results(&[None, None]).unwrap();
    assert_eq!(statement.sql, "SELECT `name`, `dept` FROM `people` WHERE 1=1 LIMIT 500");
    assert!(statement.params.is_empty());
}

#[test]
fn oracle_rendering() {
    let registry = ColumnRegistry::new(vec!["NAME".to_string(), "DEPT".to_string()]).unwrap();
    let (conditions, target) = (ConditionSet::new(), Target::parse("PEOPLE"));
    let builder = QueryBuilder::new(&OracleDialect, &target, &registry, &conditions, RowLimit::default());
    let criteria = vec![
        eq("NAME", "Anna", None),
        Some(Criterion::new("DEPT", Operator::Contains, "X", Some(Conjunction::Or))),
    ];
    let statement = builder.results(&criteria).unwrap();
    assert_eq!(
        statement.sql,
        "SELECT NAME, DEPT FROM PEOPLE WHERE 1=1 AND (NAME = :1 OR DEPT LIKE :2 ESCAPE '!') AND ROWNUM < 501"
    );
    let distinct = builder.distinct("DEPT").unwrap();
    assert_eq!(distinct.sql, "SELECT DISTINCT DEPT FROM PEOPLE WHERE 1=1 AND ROWNUM < 501");
}

#[test]
fn unknown_column_rejects_whole_statement() {
    let (registry, conditions, target) = (registry(), ConditionSet::new(), Target::parse("people"));
    let builder = QueryBuilder::new(&MySqlDialect, &target, &registry, &conditions, RowLimit::default());
    let err = builder.results(&[eq("name", "a", None), eq("salary", "1", None)]).unwrap_err();
    assert!(matches!(err, SearchError::Validation(_)));
    assert!(err.to_string().contains("salary"));
}

#[test]
fn row_limit_must_be_positive() {
    assert!(RowLimit::new(0).is_err());
    assert!(RowLimit::new(-5).is_err());
    assert_eq!(RowLimit::new(1).unwrap().get(), 1);
    assert_eq!(RowLimit::default().get(), 500);
}
