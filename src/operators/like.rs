//! LIKE pattern matching operator implementation

use super::helpers::*;
use super::traits::BinaryOperator;
use crate::error::{Error, Result};
use crate::types::{DataType, Value};

pub struct LikeOperator;

impl BinaryOperator for LikeOperator {
    fn name(&self) -> &'static str {
        "pattern matching"
    }

    fn symbol(&self) -> &'static str {
        "LIKE"
    }

    fn validate(&self, left: &DataType, right: &DataType) -> Result<DataType> {
        validate_like_pair(left, right, "LIKE")
    }

    fn execute(&self, left: &Value, right: &Value) -> Result<Value> {
        match (left, right) {
            (Value::Null, _) | (_, Value::Null) => Ok(Value::Null),
            (Value::Str(text), Value::Str(pattern)) => {
                Ok(Value::Bool(match_pattern(text, pattern, false)?))
            }
            _ => Err(Error::TypeMismatch {
                expected: "STRING values".into(),
                found: format!("{:?} LIKE {:?}", left, right),
            }),
        }
    }
}

/// Both LIKE operands must be strings; there is no implicit cast.
pub(super) fn validate_like_pair(
    left: &DataType,
    right: &DataType,
    symbol: &str,
) -> Result<DataType> {
    use DataType::*;

    let (l, r, nullable) = unwrap_nullable_pair(left, right);
    match (l, r) {
        (Str | Null, Str | Null) => Ok(wrap_nullable(Bool, nullable || l == &Null || r == &Null)),
        _ => Err(Error::TypeMismatch {
            expected: "STRING types".into(),
            found: format!("{} {} {}", left, symbol, right),
        }),
    }
}

/// Match a SQL LIKE pattern:
/// % matches zero or more characters
/// _ matches exactly one character
/// \ escapes the next character
pub(super) fn match_pattern(text: &str, pattern: &str, case_insensitive: bool) -> Result<bool> {
    let regex_pattern = sql_pattern_to_regex(pattern, case_insensitive);
    let re = regex::Regex::new(&regex_pattern)
        .map_err(|e| Error::InvalidValue(format!("invalid LIKE pattern: {}", e)))?;
    Ok(re.is_match(text))
}

/// Convert a SQL LIKE pattern to an anchored regex pattern.
fn sql_pattern_to_regex(pattern: &str, case_insensitive: bool) -> String {
    let mut regex = String::new();
    if case_insensitive {
        regex.push_str("(?i)");
    }
    regex.push('^');
    let mut escaped = false;
    for ch in pattern.chars() {
        if escaped {
            match ch {
                '.' | '^' | '$' | '*' | '+' | '?' | '(' | ')' | '[' | ']' | '{' | '}' | '|'
                | '\\' => {
                    regex.push('\\');
                    regex.push(ch);
                }
                _ => regex.push(ch),
            }
            escaped = false;
            continue;
        }
        match ch {
            '%' => regex.push_str(".*"),
            '_' => regex.push('.'),
            '\\' => escaped = true,
            '.' | '^' | '$' | '*' | '+' | '?' | '(' | ')' | '[' | ']' | '{' | '}' | '|' => {
                regex.push('\\');
                regex.push(ch);
            }
            _ => regex.push(ch),
        }
    }
    regex.push('$');
    regex
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_like() {
        let op = LikeOperator;

        assert_eq!(
            op.validate(&DataType::Str, &DataType::Str).unwrap(),
            DataType::Bool
        );
        assert!(op.validate(&DataType::I64, &DataType::Str).is_err());

        assert_eq!(
            op.execute(
                &Value::Str("San Jose".into()),
                &Value::Str("San%".into())
            )
            .unwrap(),
            Value::Bool(true)
        );
        assert_eq!(
            op.execute(&Value::Str("Boston".into()), &Value::Str("San%".into()))
                .unwrap(),
            Value::Bool(false)
        );
        // LIKE is case sensitive
        assert_eq!(
            op.execute(
                &Value::Str("san jose".into()),
                &Value::Str("San%".into())
            )
            .unwrap(),
            Value::Bool(false)
        );
        assert_eq!(
            op.execute(&Value::Str("hello".into()), &Value::Str("h_llo".into()))
                .unwrap(),
            Value::Bool(true)
        );
        assert_eq!(
            op.execute(&Value::Null, &Value::Str("x%".into())).unwrap(),
            Value::Null
        );
    }

    #[test]
    fn test_sql_pattern_to_regex() {
        assert_eq!(sql_pattern_to_regex("hello%", false), "^hello.*$");
        assert_eq!(sql_pattern_to_regex("h_llo", false), "^h.llo$");
        assert_eq!(sql_pattern_to_regex("\\%x", false), "^%x$");
        assert_eq!(sql_pattern_to_regex("a.b", false), "^a\\.b$");
        assert_eq!(sql_pattern_to_regex("San%", true), "(?i)^San.*$");
    }
}
