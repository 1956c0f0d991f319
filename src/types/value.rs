//! Runtime values produced by expression evaluation

use super::data_type::DataType;
use crate::error::{Error, Result};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// A row of values projected from one record
pub type Row = Vec<Value>;

/// A geometry payload: WKT text plus an optional spatial reference id.
///
/// The engine treats geometry as opaque; it only needs equality, a total
/// order (for distinct tracking) and the WKT keyword for validation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Geometry {
    pub wkt: String,
    pub srid: Option<i32>,
}

impl Geometry {
    pub fn new(wkt: impl Into<String>) -> Self {
        Geometry {
            wkt: wkt.into(),
            srid: None,
        }
    }

    pub fn with_srid(wkt: impl Into<String>, srid: i32) -> Self {
        Geometry {
            wkt: wkt.into(),
            srid: Some(srid),
        }
    }

    /// The WKT keyword (POINT, LINESTRING, POLYGON, ...), uppercased.
    pub fn geometry_type(&self) -> String {
        self.wkt
            .trim_start()
            .chars()
            .take_while(|c| c.is_ascii_alphabetic())
            .collect::<String>()
            .to_uppercase()
    }
}

/// Runtime values
#[derive(Clone, Serialize, Deserialize)]
pub enum Value {
    Null,
    Bool(bool),
    I32(i32),
    I64(i64),
    F64(f64),
    Str(String),
    Date(NaiveDate),
    Time(NaiveTime),
    Timestamp(NaiveDateTime),
    Geometry(Geometry),
}

impl Value {
    /// Create an I64 value (most common integer type)
    pub fn integer(i: i64) -> Self {
        Value::I64(i)
    }

    /// Create a string value
    pub fn string(s: impl Into<String>) -> Self {
        Value::Str(s.into())
    }

    /// Create a boolean value
    pub fn boolean(b: bool) -> Self {
        Value::Bool(b)
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Check if value is any integer type
    pub fn is_integer(&self) -> bool {
        matches!(self, Value::I32(_) | Value::I64(_))
    }

    /// Check if value is numeric (integer or float)
    pub fn is_numeric(&self) -> bool {
        matches!(self, Value::I32(_) | Value::I64(_) | Value::F64(_))
    }

    /// Convert any integer to i64
    pub fn to_i64(&self) -> Result<i64> {
        match self {
            Value::I32(v) => Ok(*v as i64),
            Value::I64(v) => Ok(*v),
            _ => Err(Error::TypeMismatch {
                expected: "integer".into(),
                found: self.data_type().to_string(),
            }),
        }
    }

    /// Convert any numeric value to f64
    pub fn to_f64(&self) -> Result<f64> {
        match self {
            Value::I32(v) => Ok(*v as f64),
            Value::I64(v) => Ok(*v as f64),
            Value::F64(v) => Ok(*v),
            _ => Err(Error::TypeMismatch {
                expected: "numeric".into(),
                found: self.data_type().to_string(),
            }),
        }
    }

    /// Get the data type of this value
    pub fn data_type(&self) -> DataType {
        match self {
            Value::Null => DataType::Null,
            Value::Bool(_) => DataType::Bool,
            Value::I32(_) => DataType::I32,
            Value::I64(_) => DataType::I64,
            Value::F64(_) => DataType::F64,
            Value::Str(_) => DataType::Str,
            Value::Date(_) => DataType::Date,
            Value::Time(_) => DataType::Time,
            Value::Timestamp(_) => DataType::Timestamp,
            Value::Geometry(_) => DataType::Geometry,
        }
    }
}

/// Compare two values using SQL semantics. NULLs sort first; mixed
/// numeric widths compare by promotion. Incomparable types are an error.
pub fn compare(left: &Value, right: &Value) -> Result<Ordering> {
    use Value::*;

    match (left, right) {
        (Null, Null) => return Ok(Ordering::Equal),
        (Null, _) => return Ok(Ordering::Less),
        (_, Null) => return Ok(Ordering::Greater),
        _ => {}
    }

    Ok(match (left, right) {
        (Bool(a), Bool(b)) => a.cmp(b),

        (I32(a), I32(b)) => a.cmp(b),
        (I64(a), I64(b)) => a.cmp(b),
        (I32(a), I64(b)) => (*a as i64).cmp(b),
        (I64(a), I32(b)) => a.cmp(&(*b as i64)),

        (F64(a), F64(b)) => a
            .partial_cmp(b)
            .ok_or_else(|| Error::InvalidValue("cannot compare NaN values".into()))?,
        (a, F64(b)) if a.is_integer() => a
            .to_f64()?
            .partial_cmp(b)
            .ok_or_else(|| Error::InvalidValue("cannot compare NaN values".into()))?,
        (F64(a), b) if b.is_integer() => a
            .partial_cmp(&b.to_f64()?)
            .ok_or_else(|| Error::InvalidValue("cannot compare NaN values".into()))?,

        (Str(a), Str(b)) => a.cmp(b),

        (Date(a), Date(b)) => a.cmp(b),
        (Time(a), Time(b)) => a.cmp(b),
        (Timestamp(a), Timestamp(b)) => a.cmp(b),

        // Temporal vs string comparisons parse the string at runtime
        (Date(date), Str(s)) | (Str(s), Date(date)) => {
            let parsed = NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .map_err(|_| Error::InvalidValue(format!("cannot parse '{}' as date", s)))?;
            if matches!(left, Date(_)) {
                date.cmp(&parsed)
            } else {
                parsed.cmp(date)
            }
        }
        (Time(time), Str(s)) | (Str(s), Time(time)) => {
            let parsed = NaiveTime::parse_from_str(s, "%H:%M:%S")
                .map_err(|_| Error::InvalidValue(format!("cannot parse '{}' as time", s)))?;
            if matches!(left, Time(_)) {
                time.cmp(&parsed)
            } else {
                parsed.cmp(time)
            }
        }
        (Timestamp(ts), Str(s)) | (Str(s), Timestamp(ts)) => {
            let parsed = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
                .map_err(|_| Error::InvalidValue(format!("cannot parse '{}' as timestamp", s)))?;
            if matches!(left, Timestamp(_)) {
                ts.cmp(&parsed)
            } else {
                parsed.cmp(ts)
            }
        }

        (Geometry(a), Geometry(b)) => a.cmp(b),

        _ => {
            return Err(Error::TypeMismatch {
                expected: left.data_type().to_string(),
                found: right.data_type().to_string(),
            });
        }
    })
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "NULL"),
            Value::Bool(b) => write!(f, "{}", if *b { "TRUE" } else { "FALSE" }),
            Value::I32(i) => write!(f, "{}", i),
            Value::I64(i) => write!(f, "{}", i),
            Value::F64(v) => {
                if v.fract() == 0.0 && v.is_finite() && v.abs() < 1e15 {
                    write!(f, "{:.1}", v)
                } else {
                    write!(f, "{}", v)
                }
            }
            Value::Str(s) => write!(f, "'{}'", s.replace('\'', "''")),
            Value::Date(d) => write!(f, "DATE '{}'", d),
            Value::Time(t) => write!(f, "TIME '{}'", t),
            Value::Timestamp(ts) => write!(f, "TIMESTAMP '{}'", ts.format("%Y-%m-%d %H:%M:%S")),
            Value::Geometry(g) => write!(f, "'{}'", g.wkt),
        }
    }
}

// Debug prints the variant name for nicer test output
impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "Null"),
            Value::Bool(b) => write!(f, "Bool({})", b),
            Value::I32(i) => write!(f, "I32({})", i),
            Value::I64(i) => write!(f, "I64({})", i),
            Value::F64(v) => write!(f, "F64({})", v),
            Value::Str(s) => write!(f, "Str({})", s),
            Value::Date(d) => write!(f, "Date({})", d),
            Value::Time(t) => write!(f, "Time({})", t),
            Value::Timestamp(ts) => write!(f, "Timestamp({})", ts),
            Value::Geometry(g) => write!(f, "Geometry({})", g.wkt),
        }
    }
}

/// Simple equality by value, with floats compared by bit pattern so that
/// Eq, Hash and Ord stay consistent for distinct sets. SQL NULL semantics
/// live in expression evaluation, not here.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::I32(a), Value::I32(b)) => a == b,
            (Value::I64(a), Value::I64(b)) => a == b,
            (Value::F64(a), Value::F64(b)) => a.to_bits() == b.to_bits(),
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Date(a), Value::Date(b)) => a == b,
            (Value::Time(a), Value::Time(b)) => a == b,
            (Value::Timestamp(a), Value::Timestamp(b)) => a == b,
            (Value::Geometry(a), Value::Geometry(b)) => a == b,
            _ => false,
        }
    }
}

impl std::hash::Hash for Value {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Value::Null => {}
            Value::Bool(b) => b.hash(state),
            Value::I32(i) => i.hash(state),
            Value::I64(i) => i.hash(state),
            Value::F64(v) => v.to_bits().hash(state),
            Value::Str(s) => s.hash(state),
            Value::Date(d) => d.hash(state),
            Value::Time(t) => t.hash(state),
            Value::Timestamp(ts) => ts.hash(state),
            Value::Geometry(g) => g.hash(state),
        }
    }
}

impl Eq for Value {}

impl Ord for Value {
    fn cmp(&self, other: &Self) -> Ordering {
        // Total order for distinct sets and sorting: comparable values use
        // SQL ordering, incomparable types order by variant.
        compare(self, other).unwrap_or_else(|_| {
            fn rank(v: &Value) -> u8 {
                match v {
                    Value::Null => 0,
                    Value::Bool(_) => 1,
                    Value::I32(_) | Value::I64(_) | Value::F64(_) => 2,
                    Value::Str(_) => 3,
                    Value::Date(_) => 4,
                    Value::Time(_) => 5,
                    Value::Timestamp(_) => 6,
                    Value::Geometry(_) => 7,
                }
            }
            rank(self).cmp(&rank(other))
        })
    }
}

impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mixed_numeric_compare() {
        assert_eq!(
            compare(&Value::I32(2), &Value::I64(10)).unwrap(),
            Ordering::Less
        );
        assert_eq!(
            compare(&Value::I64(3), &Value::F64(3.0)).unwrap(),
            Ordering::Equal
        );
        assert_eq!(
            compare(&Value::F64(2.5), &Value::I32(2)).unwrap(),
            Ordering::Greater
        );
    }

    #[test]
    fn test_null_sorts_first() {
        assert_eq!(
            compare(&Value::Null, &Value::I64(0)).unwrap(),
            Ordering::Less
        );
        assert_eq!(
            compare(&Value::Str("a".into()), &Value::Null).unwrap(),
            Ordering::Greater
        );
    }

    #[test]
    fn test_geometry_type_keyword() {
        let g = Geometry::new("Point (1 2)");
        assert_eq!(g.geometry_type(), "POINT");
        let g = Geometry::with_srid("POLYGON ((0 0, 1 0, 1 1, 0 0))", 4326);
        assert_eq!(g.geometry_type(), "POLYGON");
        assert_eq!(g.srid, Some(4326));
    }
}
