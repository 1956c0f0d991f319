//! End-to-end WHERE clause filtering tests

mod common;

use common::TestContext;
use sievesql::{CompileOptions, Error, Value};

#[test]
fn test_population_and_name_filter() {
    let ctx = TestContext::cities();
    // San Diego fails the population predicate, Boston fails the name
    // predicate.
    assert_eq!(
        ctx.matching_names("population > 1000 AND name LIKE 'San%'")
            .unwrap(),
        vec!["San Jose"]
    );
}

#[test]
fn test_like_and_ilike_case_behavior() {
    let mut ctx = TestContext::cities();
    ctx.insert(vec![Value::string("san jose"), Value::F64(1.0)]);

    assert_eq!(
        ctx.matching_names("name LIKE 'San%'").unwrap(),
        vec!["San Jose", "San Diego"]
    );
    assert_eq!(
        ctx.matching_names("name ILIKE 'SAN%'").unwrap(),
        vec!["San Jose", "San Diego", "san jose"]
    );
    assert_eq!(
        ctx.matching_names("name NOT LIKE 'San%'").unwrap(),
        vec!["Boston", "san jose"]
    );
}

#[test]
fn test_between_matches_boundaries() {
    let ctx = TestContext::cities();
    // BETWEEN is inclusive on both ends, exactly like the rewritten
    // (>= AND <=) form.
    assert_eq!(
        ctx.matching_names("population BETWEEN 500 AND 700000").unwrap(),
        vec!["Boston", "San Diego"]
    );
    assert_eq!(
        ctx.matching_names("population >= 500 AND population <= 700000")
            .unwrap(),
        vec!["Boston", "San Diego"]
    );
    assert_eq!(
        ctx.matching_names("population NOT BETWEEN 500 AND 700000")
            .unwrap(),
        vec!["San Jose"]
    );
}

#[test]
fn test_integer_column_vs_float_literal() {
    let mut ctx = TestContext::cities();
    ctx.catalog
        .add_field(sievesql::PRIMARY_TABLE, "rank", sievesql::DataType::I32);
    ctx.records[0].push(Value::I32(1));
    ctx.records[1].push(Value::I32(2));
    ctx.records[2].push(Value::I32(3));

    // Numeric comparisons never mismatch across widths.
    assert_eq!(
        ctx.matching_names("rank < 2.5").unwrap(),
        vec!["San Jose", "Boston"]
    );
}

#[test]
fn test_string_vs_integer_comparison_gated_by_option() {
    let mut ctx = TestContext::cities();
    assert!(matches!(
        ctx.filter("name = 42"),
        Err(Error::TypeMismatch { .. })
    ));

    ctx.options = CompileOptions {
        allow_mismatch_type_on_field_comparison: true,
        ..CompileOptions::default()
    };
    // Tolerated: no error, and unparseable names compare as unknown.
    assert_eq!(ctx.matching_names("name = 42").unwrap(), Vec::<String>::new());

    ctx.insert(vec![Value::string("42"), Value::F64(1.0)]);
    assert_eq!(ctx.matching_names("name = 42").unwrap(), vec!["42"]);
}

#[test]
fn test_in_list_and_is_null() {
    let mut ctx = TestContext::cities();
    ctx.insert(vec![Value::Null, Value::F64(10.0)]);

    assert_eq!(
        ctx.matching_names("name IN ('Boston', 'San Diego')").unwrap(),
        vec!["Boston", "San Diego"]
    );
    assert_eq!(ctx.filter("name IS NULL").unwrap().len(), 1);
    assert_eq!(ctx.filter("name IS NOT NULL").unwrap().len(), 3);
}

#[test]
fn test_arithmetic_in_predicates() {
    let ctx = TestContext::cities();
    assert_eq!(
        ctx.matching_names("population / 2 > 500000").unwrap(),
        vec!["San Jose"]
    );
    assert_eq!(
        ctx.matching_names("population - 500 = 0").unwrap(),
        vec!["San Diego"]
    );
}

#[test]
fn test_unknown_column_error() {
    let ctx = TestContext::cities();
    assert_eq!(
        ctx.filter("altitude > 100").err(),
        Some(Error::UnknownColumn("altitude".into()))
    );
}

#[test]
fn test_syntax_error_carries_position() {
    let ctx = TestContext::cities();
    match ctx.filter("population >") {
        Err(Error::Syntax { position, .. }) => assert_eq!(position, 12),
        other => panic!("expected a syntax error, got {:?}", other),
    }
}

#[test]
fn test_no_partial_tree_on_error() {
    let ctx = TestContext::cities();
    // A compile error aborts compilation; the caller sees only the error.
    let result = ctx.compiler().compile_filter("population > 'high'");
    assert!(matches!(result, Err(Error::TypeMismatch { .. })));
}

#[test]
fn test_string_arithmetic_rejected() {
    let ctx = TestContext::cities();
    assert!(matches!(
        ctx.filter("name + 1 > 2"),
        Err(Error::TypeMismatch { .. })
    ));
    // Tolerance only covers comparisons, never arithmetic.
    let mut tolerant = TestContext::cities();
    tolerant.options.allow_mismatch_type_on_field_comparison = true;
    assert!(matches!(
        tolerant.filter("name + 1 > 2"),
        Err(Error::TypeMismatch { .. })
    ));
}
