//! Select execution over a caller-supplied record set
//!
//! Drives a compiled statement: WHERE filtering, projection or
//! aggregation per query mode, ORDER BY sorting, OFFSET/LIMIT, and
//! UNION ALL chain concatenation. The engine never joins records itself;
//! the caller's records (and fetch callback) must already cover the
//! secondary-table columns a join makes visible.

use super::aggregator::{create_accumulator, DistinctCollector};
use super::expression::{evaluate_with_registrar, is_match};
use crate::error::Result;
use crate::functions::FunctionRegistrar;
use crate::semantic::{QueryMode, SelectStatement};
use crate::types::expression::ColumnRef;
use crate::types::{Row, Value};
use std::cmp::Ordering;

/// Execute a compiled select over a set of records, returning output
/// rows. Union members run in chain order over the same record set and
/// their rows are concatenated.
pub fn execute_select<R, F>(
    statement: &SelectStatement,
    records: &[R],
    fetch: &mut F,
    registrar: Option<&dyn FunctionRegistrar>,
) -> Result<Vec<Row>>
where
    F: FnMut(&ColumnRef, &R) -> Result<Value>,
{
    let mut rows = execute_member(statement, records, fetch, registrar)?;
    let mut next = statement.union_next.as_deref();
    while let Some(member) = next {
        rows.append(&mut execute_member(member, records, fetch, registrar)?);
        next = member.union_next.as_deref();
    }
    Ok(rows)
}

fn execute_member<R, F>(
    statement: &SelectStatement,
    records: &[R],
    fetch: &mut F,
    registrar: Option<&dyn FunctionRegistrar>,
) -> Result<Vec<Row>>
where
    F: FnMut(&ColumnRef, &R) -> Result<Value>,
{
    let rows = match statement.mode {
        QueryMode::Records => execute_records(statement, records, fetch, registrar)?,
        QueryMode::Summary => execute_summary(statement, records, fetch, registrar)?,
        QueryMode::DistinctList => execute_distinct(statement, records, fetch, registrar)?,
    };
    Ok(apply_offset_limit(rows, statement.offset, statement.limit))
}

/// One output row per passing record, sorted and trimmed.
fn execute_records<R, F>(
    statement: &SelectStatement,
    records: &[R],
    fetch: &mut F,
    registrar: Option<&dyn FunctionRegistrar>,
) -> Result<Vec<Row>>
where
    F: FnMut(&ColumnRef, &R) -> Result<Value>,
{
    let mut keyed: Vec<(Row, Row)> = Vec::new();
    for record in records {
        if !passes_where(statement, record, fetch, registrar)? {
            continue;
        }
        let row = project(statement, record, fetch, registrar)?;
        // Sort keys may reference fields outside the output columns, so
        // they are fetched separately while the record is at hand.
        let keys = statement
            .order_by
            .iter()
            .map(|key| Ok(fetch(&key.column, record).unwrap_or(Value::Null)))
            .collect::<Result<Row>>()?;
        keyed.push((keys, row));
    }

    sort_rows(&mut keyed, statement);
    Ok(keyed.into_iter().map(|(_, row)| row).collect())
}

/// A single aggregated row over all passing records.
fn execute_summary<R, F>(
    statement: &SelectStatement,
    records: &[R],
    fetch: &mut F,
    registrar: Option<&dyn FunctionRegistrar>,
) -> Result<Vec<Row>>
where
    F: FnMut(&ColumnRef, &R) -> Result<Value>,
{
    let mut accumulators = statement
        .columns
        .iter()
        .map(|column| {
            let kind = column.aggregate.as_ref().expect("summary column");
            create_accumulator(kind, column.distinct, registrar)
        })
        .collect::<Result<Vec<_>>>()?;

    for record in records {
        if !passes_where(statement, record, fetch, registrar)? {
            continue;
        }
        for (column, accumulator) in statement.columns.iter().zip(accumulators.iter_mut()) {
            let value = evaluate_with_registrar(&column.expr, record, fetch, registrar)?;
            accumulator.add(value)?;
        }
    }

    let row = accumulators
        .into_iter()
        .map(|accumulator| accumulator.finalize())
        .collect::<Result<Row>>()?;
    Ok(vec![row])
}

/// One row per distinct value combination, in first-seen order unless
/// sorted.
fn execute_distinct<R, F>(
    statement: &SelectStatement,
    records: &[R],
    fetch: &mut F,
    registrar: Option<&dyn FunctionRegistrar>,
) -> Result<Vec<Row>>
where
    F: FnMut(&ColumnRef, &R) -> Result<Value>,
{
    let mut collector = DistinctCollector::new();
    for record in records {
        if !passes_where(statement, record, fetch, registrar)? {
            continue;
        }
        collector.add(project(statement, record, fetch, registrar)?);
    }
    let mut rows = collector.into_rows();

    if !statement.order_by.is_empty() {
        // ORDER BY targets are validated to be output columns here, so
        // sort keys come from the rows themselves.
        let positions: Vec<(usize, bool)> = statement
            .order_by
            .iter()
            .filter_map(|key| {
                statement
                    .columns
                    .iter()
                    .position(|c| c.column == Some(key.column))
                    .map(|pos| (pos, key.ascending))
            })
            .collect();
        rows.sort_by(|a, b| {
            for (pos, ascending) in &positions {
                let ordering = a[*pos].cmp(&b[*pos]);
                let ordering = if *ascending { ordering } else { ordering.reverse() };
                if ordering != Ordering::Equal {
                    return ordering;
                }
            }
            Ordering::Equal
        });
    }
    Ok(rows)
}

fn passes_where<R, F>(
    statement: &SelectStatement,
    record: &R,
    fetch: &mut F,
    registrar: Option<&dyn FunctionRegistrar>,
) -> Result<bool>
where
    F: FnMut(&ColumnRef, &R) -> Result<Value>,
{
    match &statement.r#where {
        Some(filter) => {
            let value = evaluate_with_registrar(filter, record, fetch, registrar)?;
            Ok(is_match(&value))
        }
        None => Ok(true),
    }
}

fn project<R, F>(
    statement: &SelectStatement,
    record: &R,
    fetch: &mut F,
    registrar: Option<&dyn FunctionRegistrar>,
) -> Result<Row>
where
    F: FnMut(&ColumnRef, &R) -> Result<Value>,
{
    statement
        .columns
        .iter()
        .map(|column| evaluate_with_registrar(&column.expr, record, fetch, registrar))
        .collect()
}

/// Stable sort by the pre-fetched ORDER BY keys.
fn sort_rows(keyed: &mut [(Row, Row)], statement: &SelectStatement) {
    if statement.order_by.is_empty() {
        return;
    }
    keyed.sort_by(|(a, _), (b, _)| {
        for (i, key) in statement.order_by.iter().enumerate() {
            let ordering = a[i].cmp(&b[i]);
            let ordering = if key.ascending { ordering } else { ordering.reverse() };
            if ordering != Ordering::Equal {
                return ordering;
            }
        }
        Ordering::Equal
    });
}

fn apply_offset_limit(rows: Vec<Row>, offset: u64, limit: Option<u64>) -> Vec<Row> {
    let iter = rows.into_iter().skip(offset as usize);
    match limit {
        Some(limit) => iter.take(limit as usize).collect(),
        None => iter.collect(),
    }
}
