//! Secondary-table (join) compilation tests

mod common;

use common::{string_column, TestContext};
use sievesql::{DataType, Error, Value};

#[test]
fn test_join_condition_compiles_against_both_tables() {
    let ctx = TestContext::cities_with_states();
    let statement = ctx
        .compiler()
        .compile_select(
            "SELECT cities.name, states.abbrev FROM cities \
             JOIN states ON cities.state = states.name",
        )
        .unwrap();
    assert_eq!(statement.joins.len(), 1);
    assert_eq!(statement.joins[0].table, 1);

    let rows = ctx
        .query(
            "SELECT cities.name, states.abbrev FROM cities \
             JOIN states ON cities.state = states.name",
        )
        .unwrap();
    assert_eq!(
        rows,
        vec![
            vec![Value::string("San Jose"), Value::string("CA")],
            vec![Value::string("Boston"), Value::string("MA")],
        ]
    );
}

#[test]
fn test_table_aliases() {
    let ctx = TestContext::cities_with_states();
    let rows = ctx
        .query("SELECT c.name, s.abbrev FROM cities c JOIN states s ON c.state = s.name")
        .unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0][1], Value::string("CA"));
}

#[test]
fn test_ambiguous_bare_column() {
    let ctx = TestContext::cities_with_states();
    // "name" exists in both tables.
    assert_eq!(
        ctx.query("SELECT name FROM cities JOIN states ON state = states.name")
            .err(),
        Some(Error::AmbiguousColumn("name".into()))
    );
}

#[test]
fn test_secondary_fields_in_where_gated() {
    let mut ctx = TestContext::cities_with_states();
    assert!(matches!(
        ctx.query(
            "SELECT cities.name FROM cities JOIN states ON cities.state = states.name \
             WHERE abbrev = 'CA'"
        ),
        Err(Error::UnknownColumn(_))
    ));

    ctx.options.allow_fields_in_secondary_tables = true;
    let rows = ctx
        .query(
            "SELECT cities.name FROM cities JOIN states ON cities.state = states.name \
             WHERE abbrev = 'CA'",
        )
        .unwrap();
    assert_eq!(string_column(&rows), vec!["San Jose"]);
}

#[test]
fn test_wildcard_covers_joined_tables() {
    let ctx = TestContext::cities_with_states();
    let statement = ctx
        .compiler()
        .compile_select("SELECT * FROM cities JOIN states ON cities.state = states.name")
        .unwrap();
    // All six catalog fields, primary then secondary.
    assert_eq!(statement.columns.len(), 6);
}

#[test]
fn test_auto_add_secondary_geometry_fields() {
    let mut ctx = TestContext::cities_with_states();
    ctx.options.auto_add_secondary_geometry_fields = true;
    let statement = ctx
        .compiler()
        .compile_select(
            "SELECT cities.name FROM cities JOIN states ON cities.state = states.name",
        )
        .unwrap();
    // The boundary geometry column is appended to the explicit list.
    assert_eq!(statement.columns.len(), 2);
    assert_eq!(statement.columns[1].data_type, DataType::Geometry);
}

#[test]
fn test_join_unknown_table() {
    let ctx = TestContext::cities_with_states();
    assert_eq!(
        ctx.query("SELECT cities.name FROM cities JOIN counties ON cities.state = counties.name")
            .err(),
        Some(Error::UnknownTable("counties".into()))
    );
}

#[test]
fn test_join_condition_must_be_boolean() {
    let ctx = TestContext::cities_with_states();
    assert!(matches!(
        ctx.query("SELECT cities.name FROM cities JOIN states ON states.abbrev"),
        Err(Error::TypeMismatch { .. })
    ));
}
