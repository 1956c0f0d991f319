//! Runtime value coercion for CAST evaluation

use super::data_type::DataType;
use super::value::Value;
use crate::error::{Error, Result};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

/// Whether a CAST from `from` to `to` is supported. The checker rejects
/// unsupported combinations up front instead of truncating silently.
pub fn cast_supported(from: &DataType, to: &DataType) -> bool {
    use DataType::*;

    let from = from.base_type();
    let to = to.base_type();
    if from == to || from == &Null {
        return true;
    }
    match to {
        I32 | I64 | F64 => from.is_numeric() || from == &Str || from == &Bool,
        Str => !matches!(from, Geometry),
        Bool => matches!(from, Bool | Str),
        Date | Time | Timestamp => from == &Str,
        Geometry => matches!(from, Geometry),
        Nullable(_) | Null => false,
    }
}

/// Coerce a runtime value to the target type. A NULL input stays NULL;
/// an unconvertible value is an InvalidValue error.
pub fn coerce_value(value: &Value, to: &DataType) -> Result<Value> {
    use DataType as T;
    use Value as V;

    if value.is_null() {
        return Ok(V::Null);
    }
    let to = to.base_type();
    if &value.data_type() == to {
        return Ok(value.clone());
    }

    let convert_error = |value: &Value| {
        Error::InvalidValue(format!("cannot convert {:?} to {}", value, to))
    };

    Ok(match (value, to) {
        (V::I64(v), T::I32) => {
            V::I32(i32::try_from(*v).map_err(|_| convert_error(value))?)
        }
        (V::I32(v), T::I64) => V::I64(*v as i64),
        (V::F64(v), T::I32) => V::I32(v.trunc() as i32),
        (V::F64(v), T::I64) => V::I64(v.trunc() as i64),
        (v, T::F64) if v.is_integer() => V::F64(v.to_f64()?),
        (V::Bool(b), T::I32) => V::I32(*b as i32),
        (V::Bool(b), T::I64) => V::I64(*b as i64),
        (V::Bool(b), T::F64) => V::F64(if *b { 1.0 } else { 0.0 }),

        (V::Str(s), T::I32) => V::I32(parse_number(s).map_err(|_| convert_error(value))? as i32),
        (V::Str(s), T::I64) => V::I64(parse_number(s).map_err(|_| convert_error(value))? as i64),
        (V::Str(s), T::F64) => {
            V::F64(s.trim().parse().map_err(|_| convert_error(value))?)
        }
        (V::Str(s), T::Bool) => match s.trim().to_uppercase().as_str() {
            "TRUE" | "T" | "1" => V::Bool(true),
            "FALSE" | "F" | "0" => V::Bool(false),
            _ => return Err(convert_error(value)),
        },
        (V::Str(s), T::Date) => V::Date(
            NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|_| convert_error(value))?,
        ),
        (V::Str(s), T::Time) => V::Time(
            NaiveTime::parse_from_str(s, "%H:%M:%S").map_err(|_| convert_error(value))?,
        ),
        (V::Str(s), T::Timestamp) => V::Timestamp(
            NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
                .map_err(|_| convert_error(value))?,
        ),

        (v, T::Str) => {
            // Strings render without quoting.
            match v {
                V::Str(s) => V::Str(s.clone()),
                V::Date(d) => V::Str(d.to_string()),
                V::Time(t) => V::Str(t.to_string()),
                V::Timestamp(ts) => V::Str(ts.format("%Y-%m-%d %H:%M:%S").to_string()),
                V::Bool(b) => V::Str(if *b { "TRUE" } else { "FALSE" }.into()),
                V::I32(i) => V::Str(i.to_string()),
                V::I64(i) => V::Str(i.to_string()),
                V::F64(f) => V::Str(f.to_string()),
                _ => return Err(convert_error(value)),
            }
        }

        _ => return Err(convert_error(value)),
    })
}

/// Parses a string as an integer, accepting a float form and truncating.
fn parse_number(s: &str) -> std::result::Result<i64, ()> {
    let s = s.trim();
    if let Ok(v) = s.parse::<i64>() {
        return Ok(v);
    }
    s.parse::<f64>().map(|v| v.trunc() as i64).map_err(|_| ())
}
