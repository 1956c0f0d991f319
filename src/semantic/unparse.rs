//! Rendering resolved expressions back to canonical text
//!
//! Round-tripping preserves semantics, not original formatting: the output
//! reparses to a tree that evaluates identically.

use crate::types::expression::{ColumnRef, Expression};
use crate::types::{DataType, FieldCatalog};
use std::fmt::Write;

/// Options controlling unparse output.
#[derive(Debug, Clone)]
pub struct UnparseOptions {
    /// Identifier quoting character, used when a name needs quoting
    pub quote_char: char,
    /// Prefix every column with its table name, even in the primary table
    pub always_prefix_column_with_table_name: bool,
}

impl Default for UnparseOptions {
    fn default() -> Self {
        UnparseOptions {
            quote_char: '"',
            always_prefix_column_with_table_name: false,
        }
    }
}

/// Renders an expression to canonical text against the given catalog.
pub fn unparse(expr: &Expression, catalog: &FieldCatalog, options: &UnparseOptions) -> String {
    let mut out = String::new();
    write_expr(&mut out, expr, catalog, options);
    out
}

fn write_expr(out: &mut String, expr: &Expression, catalog: &FieldCatalog, opts: &UnparseOptions) {
    use Expression::*;

    match expr {
        Constant(value) => {
            let _ = write!(out, "{}", value);
        }

        Column(column) => write_column(out, column, catalog, opts),

        And(l, r) => write_binary(out, "AND", l, r, catalog, opts),
        Or(l, r) => write_binary(out, "OR", l, r, catalog, opts),
        Not(expr) => {
            out.push_str("(NOT ");
            write_expr(out, expr, catalog, opts);
            out.push(')');
        }

        Equal(l, r) => write_binary(out, "=", l, r, catalog, opts),
        NotEqual(l, r) => write_binary(out, "!=", l, r, catalog, opts),
        LessThan(l, r) => write_binary(out, "<", l, r, catalog, opts),
        LessThanOrEqual(l, r) => write_binary(out, "<=", l, r, catalog, opts),
        GreaterThan(l, r) => write_binary(out, ">", l, r, catalog, opts),
        GreaterThanOrEqual(l, r) => write_binary(out, ">=", l, r, catalog, opts),

        Add(l, r) => write_binary(out, "+", l, r, catalog, opts),
        Subtract(l, r) => write_binary(out, "-", l, r, catalog, opts),
        Multiply(l, r) => write_binary(out, "*", l, r, catalog, opts),
        Divide(l, r) => write_binary(out, "/", l, r, catalog, opts),
        Remainder(l, r) => write_binary(out, "%", l, r, catalog, opts),
        Negate(expr) => {
            out.push_str("(-");
            write_expr(out, expr, catalog, opts);
            out.push(')');
        }
        Identity(expr) => {
            out.push_str("(+");
            write_expr(out, expr, catalog, opts);
            out.push(')');
        }

        Like(l, r, negated) => {
            write_binary(out, if *negated { "NOT LIKE" } else { "LIKE" }, l, r, catalog, opts)
        }
        ILike(l, r, negated) => write_binary(
            out,
            if *negated { "NOT ILIKE" } else { "ILIKE" },
            l,
            r,
            catalog,
            opts,
        ),

        IsNull(expr, negated) => {
            out.push('(');
            write_expr(out, expr, catalog, opts);
            out.push_str(if *negated { " IS NOT NULL" } else { " IS NULL" });
            out.push(')');
        }

        InList {
            expr,
            list,
            negated,
        } => {
            out.push('(');
            write_expr(out, expr, catalog, opts);
            out.push_str(if *negated { " NOT IN (" } else { " IN (" });
            for (i, item) in list.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                write_expr(out, item, catalog, opts);
            }
            out.push_str("))");
        }

        Function(name, args) => {
            out.push_str(name);
            out.push('(');
            for (i, arg) in args.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                write_expr(out, arg, catalog, opts);
            }
            out.push(')');
        }

        Cast { expr, to } => {
            out.push_str("CAST(");
            write_expr(out, expr, catalog, opts);
            out.push_str(" AS ");
            out.push_str(&cast_type_name(to));
            out.push(')');
        }
    }
}

fn write_binary(
    out: &mut String,
    symbol: &str,
    lhs: &Expression,
    rhs: &Expression,
    catalog: &FieldCatalog,
    opts: &UnparseOptions,
) {
    out.push('(');
    write_expr(out, lhs, catalog, opts);
    out.push(' ');
    out.push_str(symbol);
    out.push(' ');
    write_expr(out, rhs, catalog, opts);
    out.push(')');
}

/// Renders a resolved column back to its catalog name, prefixing with the
/// table name for secondary tables or when always-prefix is set.
fn write_column(out: &mut String, column: &ColumnRef, catalog: &FieldCatalog, opts: &UnparseOptions) {
    let field = match catalog.field(column.field) {
        Some(field) => field,
        None => {
            let _ = write!(out, "#{}", column.field);
            return;
        }
    };
    let prefix = opts.always_prefix_column_with_table_name || column.table != 0;
    if prefix && let Some(table) = catalog.table(column.table) {
        write_ident(out, table.effective_name(), opts.quote_char);
        out.push('.');
    }
    write_ident(out, &field.name, opts.quote_char);
}

/// Quotes an identifier with the configured character when it is not a
/// plain bare identifier.
fn write_ident(out: &mut String, name: &str, quote_char: char) {
    let plain = !name.is_empty()
        && name.chars().next().is_some_and(|c| c.is_alphabetic() || c == '_')
        && name.chars().all(|c| c.is_alphanumeric() || c == '_')
        && crate::parsing::Lexer::new(name)
            .next()
            .is_some_and(|t| matches!(t, Ok(crate::parsing::Token::Ident(_))));
    if plain {
        out.push_str(name);
    } else {
        out.push(quote_char);
        for c in name.chars() {
            out.push(c);
            if c == quote_char {
                out.push(quote_char);
            }
        }
        out.push(quote_char);
    }
}

/// The SQL spelling of a cast target type.
fn cast_type_name(data_type: &DataType) -> String {
    match data_type.base_type() {
        DataType::I32 => "INTEGER".into(),
        DataType::I64 => "BIGINT".into(),
        DataType::F64 => "DOUBLE".into(),
        DataType::Str => "VARCHAR".into(),
        DataType::Bool => "BOOLEAN".into(),
        DataType::Date => "DATE".into(),
        DataType::Time => "TIME".into(),
        DataType::Timestamp => "TIMESTAMP".into(),
        DataType::Geometry => "GEOMETRY".into(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::expression::ColumnRef;
    use crate::types::{TableDef, Value, PRIMARY_TABLE};

    fn catalog() -> FieldCatalog {
        let mut catalog = FieldCatalog::new(TableDef::new("mem", "cities"));
        catalog.add_field(PRIMARY_TABLE, "name", DataType::Str);
        catalog.add_field(PRIMARY_TABLE, "population", DataType::F64);
        catalog
    }

    #[test]
    fn test_unparse_comparison() {
        let catalog = catalog();
        let expr = Expression::GreaterThan(
            Box::new(Expression::Column(ColumnRef { table: 0, field: 1 })),
            Box::new(Expression::Constant(Value::I32(1000))),
        );
        assert_eq!(
            unparse(&expr, &catalog, &UnparseOptions::default()),
            "(population > 1000)"
        );
    }

    #[test]
    fn test_unparse_always_prefix() {
        let catalog = catalog();
        let expr = Expression::Column(ColumnRef { table: 0, field: 0 });
        let options = UnparseOptions {
            always_prefix_column_with_table_name: true,
            ..UnparseOptions::default()
        };
        assert_eq!(unparse(&expr, &catalog, &options), "cities.name");
    }

    #[test]
    fn test_unparse_quotes_awkward_names() {
        let mut catalog = catalog();
        catalog.add_field(PRIMARY_TABLE, "line count", DataType::I64);
        let expr = Expression::Column(ColumnRef { table: 0, field: 2 });
        assert_eq!(
            unparse(&expr, &catalog, &UnparseOptions::default()),
            "\"line count\""
        );
    }

    #[test]
    fn test_unparse_string_escaping() {
        let catalog = catalog();
        let expr = Expression::Constant(Value::string("it's"));
        assert_eq!(
            unparse(&expr, &catalog, &UnparseOptions::default()),
            "'it''s'"
        );
    }
}
