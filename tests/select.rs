//! SELECT statement compilation and execution tests

mod common;

use common::{string_column, TestContext};
use sievesql::{CompileOptions, DataType, Error, QueryMode, Value};

#[test]
fn test_projection_and_alias() {
    let ctx = TestContext::cities();
    let rows = ctx.query("SELECT name, population AS pop FROM cities").unwrap();
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0], vec![Value::string("San Jose"), Value::F64(1.2e6)]);

    let statement = ctx
        .compiler()
        .compile_select("SELECT name, population AS pop FROM cities")
        .unwrap();
    assert_eq!(statement.mode, QueryMode::Records);
    assert_eq!(
        statement.output_names(&ctx.compiler().unparse_options()),
        vec!["name", "pop"]
    );
}

#[test]
fn test_order_by_desc_limit_offset() {
    let ctx = TestContext::cities();
    // Second-largest city by population.
    let rows = ctx
        .query("SELECT name FROM cities ORDER BY population DESC LIMIT 1 OFFSET 1")
        .unwrap();
    assert_eq!(string_column(&rows), vec!["Boston"]);
}

#[test]
fn test_order_by_ascending_default() {
    let ctx = TestContext::cities();
    let rows = ctx
        .query("SELECT name FROM cities ORDER BY population")
        .unwrap();
    assert_eq!(string_column(&rows), vec!["San Diego", "Boston", "San Jose"]);
}

#[test]
fn test_order_by_output_alias() {
    let ctx = TestContext::cities();
    let rows = ctx
        .query("SELECT name AS n FROM cities ORDER BY n DESC")
        .unwrap();
    assert_eq!(string_column(&rows), vec!["San Jose", "San Diego", "Boston"]);
}

#[test]
fn test_wildcard_expansion() {
    let ctx = TestContext::cities();
    let statement = ctx.compiler().compile_select("SELECT * FROM cities").unwrap();
    assert_eq!(statement.columns.len(), 2);
    assert_eq!(
        statement.output_names(&ctx.compiler().unparse_options()),
        vec!["name", "population"]
    );

    // The always-prefix option shows up in generated output names.
    let mut prefixed = TestContext::cities();
    prefixed.options = CompileOptions {
        always_prefix_column_with_table_name: true,
        ..CompileOptions::default()
    };
    let statement = prefixed
        .compiler()
        .compile_select("SELECT * FROM cities")
        .unwrap();
    assert_eq!(
        statement.output_names(&prefixed.compiler().unparse_options()),
        vec!["cities.name", "cities.population"]
    );
}

#[test]
fn test_where_clause_filters_records() {
    let ctx = TestContext::cities();
    let rows = ctx
        .query("SELECT name FROM cities WHERE population > 1000 AND name LIKE 'San%'")
        .unwrap();
    assert_eq!(string_column(&rows), vec!["San Jose"]);
}

#[test]
fn test_expression_columns_and_cast() {
    let ctx = TestContext::cities();
    let rows = ctx
        .query("SELECT name, population / 1000 FROM cities WHERE name = 'Boston'")
        .unwrap();
    assert_eq!(rows[0], vec![Value::string("Boston"), Value::F64(700.0)]);

    let statement = ctx
        .compiler()
        .compile_select("SELECT CAST(population AS BIGINT) FROM cities")
        .unwrap();
    assert_eq!(statement.columns[0].cast_to, Some(DataType::I64));
    assert_eq!(statement.columns[0].data_type, DataType::I64);
    let rows = ctx
        .query("SELECT CAST(population AS BIGINT) FROM cities WHERE name = 'San Jose'")
        .unwrap();
    assert_eq!(rows[0], vec![Value::I64(1_200_000)]);
}

#[test]
fn test_union_all_chain() {
    let ctx = TestContext::cities();
    let statement = ctx
        .compiler()
        .compile_select(
            "SELECT name FROM cities WHERE population > 1000000 \
             UNION ALL SELECT name FROM cities WHERE population < 1000",
        )
        .unwrap();
    // Members stay separate statements chained to the right.
    assert!(statement.union_next.is_some());
    assert!(statement.union_next.as_ref().unwrap().union_next.is_none());

    let rows = ctx
        .query(
            "SELECT name FROM cities WHERE population > 1000000 \
             UNION ALL SELECT name FROM cities WHERE population < 1000",
        )
        .unwrap();
    assert_eq!(string_column(&rows), vec!["San Jose", "San Diego"]);
}

#[test]
fn test_union_all_arity_must_match() {
    let ctx = TestContext::cities();
    let result = ctx
        .compiler()
        .compile_select("SELECT name FROM cities UNION ALL SELECT name, population FROM cities");
    assert!(matches!(result, Err(Error::Execution(_))));
}

#[test]
fn test_push_union_all_appends_right() {
    let ctx = TestContext::cities();
    let compiler = ctx.compiler();
    let mut first = compiler.compile_select("SELECT name FROM cities").unwrap();
    let second = compiler
        .compile_select("SELECT name FROM cities WHERE population < 1000")
        .unwrap();
    let third = compiler
        .compile_select("SELECT name FROM cities WHERE population > 1000000")
        .unwrap();
    first.push_union_all(second).unwrap();
    first.push_union_all(third).unwrap();

    let chain_len = {
        let mut len = 1;
        let mut tail = &first;
        while let Some(next) = tail.union_next.as_deref() {
            len += 1;
            tail = next;
        }
        len
    };
    assert_eq!(chain_len, 3);
}

#[test]
fn test_unknown_table() {
    let ctx = TestContext::cities();
    assert_eq!(
        ctx.query("SELECT name FROM towns").err(),
        Some(Error::UnknownTable("towns".into()))
    );
}

#[test]
fn test_order_by_unknown_target() {
    let ctx = TestContext::cities();
    assert!(ctx
        .query("SELECT name FROM cities ORDER BY altitude")
        .is_err());
}

#[test]
fn test_limit_zero_and_unbounded() {
    let ctx = TestContext::cities();
    assert!(ctx.query("SELECT name FROM cities LIMIT 0").unwrap().is_empty());
    assert_eq!(ctx.query("SELECT name FROM cities").unwrap().len(), 3);
    assert_eq!(
        ctx.query("SELECT name FROM cities OFFSET 2").unwrap().len(),
        1
    );
}
