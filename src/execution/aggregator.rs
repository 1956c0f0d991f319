//! The aggregation engine
//!
//! Maintains running state per output column for summary queries
//! (COUNT/SUM/AVG/MIN/MAX over all input records) and for distinct-list
//! queries (unique value tracking). Distinct state inside an aggregate
//! uses a type-aware sorted set; distinct-list output uses an
//! insertion-ordered sequence with a sorted membership set, because
//! output order matters there.

use crate::error::{Error, Result};
use crate::functions::{Function, FunctionRegistrar};
use crate::operators;
use crate::semantic::AggregateKind;
use crate::types::{compare, Row, Value};
use std::cmp::Ordering;
use std::collections::BTreeSet;

/// Running aggregate state for one output column.
pub trait Accumulator {
    /// Fold one input value into the running state. NULL operands are
    /// ignored, except by COUNT(*) which is fed a constant.
    fn add(&mut self, value: Value) -> Result<()>;

    /// Produce the aggregate result.
    fn finalize(self: Box<Self>) -> Result<Value>;
}

/// COUNT accumulator, optionally over distinct values only
struct CountAccumulator {
    count: i64,
    distinct: Option<BTreeSet<Value>>,
}

impl Accumulator for CountAccumulator {
    fn add(&mut self, value: Value) -> Result<()> {
        if value.is_null() {
            return Ok(());
        }
        match &mut self.distinct {
            Some(seen) => {
                if seen.insert(value) {
                    self.count += 1;
                }
            }
            None => self.count += 1,
        }
        Ok(())
    }

    fn finalize(self: Box<Self>) -> Result<Value> {
        Ok(Value::I64(self.count))
    }
}

/// SUM accumulator
struct SumAccumulator {
    sum: Value,
    distinct: Option<BTreeSet<Value>>,
}

impl Accumulator for SumAccumulator {
    fn add(&mut self, value: Value) -> Result<()> {
        if value.is_null() {
            return Ok(());
        }
        if let Some(seen) = &mut self.distinct
            && !seen.insert(value.clone())
        {
            return Ok(());
        }
        // Integer sums run in 64 bits, matching the checked result type.
        let value = match value {
            Value::I32(v) => Value::I64(v as i64),
            v => v,
        };
        self.sum = if self.sum.is_null() {
            value
        } else {
            operators::execute_add(&self.sum, &value)?
        };
        Ok(())
    }

    fn finalize(self: Box<Self>) -> Result<Value> {
        Ok(self.sum)
    }
}

/// AVG accumulator
struct AvgAccumulator {
    sum: Value,
    count: i64,
    distinct: Option<BTreeSet<Value>>,
}

impl Accumulator for AvgAccumulator {
    fn add(&mut self, value: Value) -> Result<()> {
        if value.is_null() {
            return Ok(());
        }
        if let Some(seen) = &mut self.distinct
            && !seen.insert(value.clone())
        {
            return Ok(());
        }
        self.sum = if self.sum.is_null() {
            value
        } else {
            operators::execute_add(&self.sum, &value)?
        };
        self.count += 1;
        Ok(())
    }

    fn finalize(self: Box<Self>) -> Result<Value> {
        if self.count == 0 {
            return Ok(Value::Null);
        }
        Ok(Value::F64(self.sum.to_f64()? / self.count as f64))
    }
}

/// MIN accumulator, updating through the type-aware comparator
struct MinAccumulator {
    min: Value,
}

impl Accumulator for MinAccumulator {
    fn add(&mut self, value: Value) -> Result<()> {
        if !value.is_null()
            && (self.min.is_null() || compare(&value, &self.min)? == Ordering::Less)
        {
            self.min = value;
        }
        Ok(())
    }

    fn finalize(self: Box<Self>) -> Result<Value> {
        Ok(self.min)
    }
}

/// MAX accumulator
struct MaxAccumulator {
    max: Value,
}

impl Accumulator for MaxAccumulator {
    fn add(&mut self, value: Value) -> Result<()> {
        if !value.is_null()
            && (self.max.is_null() || compare(&value, &self.max)? == Ordering::Greater)
        {
            self.max = value;
        }
        Ok(())
    }

    fn finalize(self: Box<Self>) -> Result<Value> {
        Ok(self.max)
    }
}

/// A registrar-supplied aggregate: values are collected and handed to the
/// custom function's execute in one call.
struct CustomAccumulator<'a> {
    function: &'a dyn Function,
    values: Vec<Value>,
}

impl Accumulator for CustomAccumulator<'_> {
    fn add(&mut self, value: Value) -> Result<()> {
        if !value.is_null() {
            self.values.push(value);
        }
        Ok(())
    }

    fn finalize(self: Box<Self>) -> Result<Value> {
        self.function.execute(&self.values)
    }
}

/// Create the accumulator for an aggregate kind.
pub fn create_accumulator<'a>(
    kind: &AggregateKind,
    distinct: bool,
    registrar: Option<&'a dyn FunctionRegistrar>,
) -> Result<Box<dyn Accumulator + 'a>> {
    let distinct_set = || distinct.then(BTreeSet::new);
    Ok(match kind {
        AggregateKind::Count => Box::new(CountAccumulator {
            count: 0,
            distinct: distinct_set(),
        }),
        AggregateKind::Sum => Box::new(SumAccumulator {
            sum: Value::Null,
            distinct: distinct_set(),
        }),
        AggregateKind::Avg => Box::new(AvgAccumulator {
            sum: Value::Null,
            count: 0,
            distinct: distinct_set(),
        }),
        AggregateKind::Min => Box::new(MinAccumulator { min: Value::Null }),
        AggregateKind::Max => Box::new(MaxAccumulator { max: Value::Null }),
        AggregateKind::Custom(name) => {
            let function = registrar
                .and_then(|r| r.lookup(name))
                .ok_or_else(|| Error::UnsupportedCustomFunction(name.clone()))?;
            Box::new(CustomAccumulator {
                function,
                values: Vec::new(),
            })
        }
    })
}

/// Distinct-list state: an insertion-ordered sequence of unique rows,
/// with a sorted set for membership checks.
pub struct DistinctCollector {
    rows: Vec<Row>,
    seen: BTreeSet<Row>,
}

impl DistinctCollector {
    pub fn new() -> Self {
        DistinctCollector {
            rows: Vec::new(),
            seen: BTreeSet::new(),
        }
    }

    /// Adds a row, keeping only the first occurrence of each value
    /// combination.
    pub fn add(&mut self, row: Row) {
        if self.seen.insert(row.clone()) {
            self.rows.push(row);
        }
    }

    /// The distinct rows, in first-seen order.
    pub fn into_rows(self) -> Vec<Row> {
        self.rows
    }
}

impl Default for DistinctCollector {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(kind: AggregateKind, distinct: bool, values: Vec<Value>) -> Value {
        let mut acc = create_accumulator(&kind, distinct, None).unwrap();
        for value in values {
            acc.add(value).unwrap();
        }
        acc.finalize().unwrap()
    }

    #[test]
    fn test_count_ignores_nulls() {
        assert_eq!(
            run(
                AggregateKind::Count,
                false,
                vec![Value::I64(1), Value::Null, Value::I64(3)]
            ),
            Value::I64(2)
        );
    }

    #[test]
    fn test_count_distinct() {
        assert_eq!(
            run(
                AggregateKind::Count,
                true,
                vec![Value::I64(1), Value::I64(1), Value::I64(2)]
            ),
            Value::I64(2)
        );
    }

    #[test]
    fn test_sum_and_avg() {
        assert_eq!(
            run(
                AggregateKind::Sum,
                false,
                vec![Value::I32(10), Value::I32(20), Value::I32(30)]
            ),
            Value::I64(60)
        );
        assert_eq!(
            run(
                AggregateKind::Avg,
                false,
                vec![Value::I32(10), Value::I32(20), Value::I32(30)]
            ),
            Value::F64(20.0)
        );
        assert_eq!(run(AggregateKind::Avg, false, vec![]), Value::Null);
    }

    #[test]
    fn test_min_max_type_aware() {
        // Mixed widths compare numerically, not lexically
        let values = vec![Value::F64(500.0), Value::I64(700_000), Value::F64(1.2e6)];
        assert_eq!(
            run(AggregateKind::Min, false, values.clone()),
            Value::F64(500.0)
        );
        assert_eq!(run(AggregateKind::Max, false, values), Value::F64(1.2e6));
    }

    #[test]
    fn test_distinct_collector_keeps_first_seen_order() {
        let mut collector = DistinctCollector::new();
        collector.add(vec![Value::string("B")]);
        collector.add(vec![Value::string("A")]);
        collector.add(vec![Value::string("B")]);
        collector.add(vec![Value::string("C")]);
        assert_eq!(
            collector.into_rows(),
            vec![
                vec![Value::string("B")],
                vec![Value::string("A")],
                vec![Value::string("C")],
            ]
        );
    }
}
