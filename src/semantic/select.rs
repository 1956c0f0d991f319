//! Select statement analysis
//!
//! The second compilation phase: takes the parser's raw SELECT (clauses
//! split, names unresolved) and produces a validated statement bound to
//! the field catalog. Wildcards are expanded, aggregates recognized,
//! every expression resolved and type-checked, and the query mode
//! classified.

use super::resolver::Resolver;
use super::typing::TypeChecker;
use super::unparse::{unparse, UnparseOptions};
use super::CompileOptions;
use crate::error::{Error, Result};
use crate::functions::{self, FunctionRegistrar};
use crate::parsing::ast;
use crate::semantic::normalize::replace_between_by_ge_and_le;
use crate::types::expression::{ColumnRef, Expression};
use crate::types::{DataType, FieldCatalog, Value, PRIMARY_TABLE};
use serde::{Deserialize, Serialize};

/// Aggregate applied to an output column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AggregateKind {
    Avg,
    Min,
    Max,
    Count,
    Sum,
    /// A registrar-supplied aggregate, by name
    Custom(String),
}

impl AggregateKind {
    fn from_name(name: &str) -> Option<AggregateKind> {
        Some(match name {
            "AVG" => AggregateKind::Avg,
            "MIN" => AggregateKind::Min,
            "MAX" => AggregateKind::Max,
            "COUNT" => AggregateKind::Count,
            "SUM" => AggregateKind::Sum,
            _ => return None,
        })
    }

    pub fn name(&self) -> &str {
        match self {
            AggregateKind::Avg => "AVG",
            AggregateKind::Min => "MIN",
            AggregateKind::Max => "MAX",
            AggregateKind::Count => "COUNT",
            AggregateKind::Sum => "SUM",
            AggregateKind::Custom(name) => name,
        }
    }
}

/// One output column of a compiled select.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnDef {
    /// The source expression; for aggregated columns, the operand inside
    /// the aggregate
    pub expr: Expression,
    /// Aggregate applied over all input records, if any
    pub aggregate: Option<AggregateKind>,
    /// COUNT(*): count records rather than non-null operand values
    pub count_star: bool,
    /// Output column alias, when given in the query
    pub alias: Option<String>,
    /// Deduplicate values (SELECT DISTINCT or COUNT(DISTINCT ...))
    pub distinct: bool,
    /// Result type of the output column
    pub data_type: DataType,
    /// Explicit top-level cast target, when the column is a CAST
    pub cast_to: Option<DataType>,
    /// Resolved indices when the source expression is a bare column
    pub column: Option<ColumnRef>,
    /// Spatial reference of a constant geometry result, when known
    pub geometry_srid: Option<i32>,
}

impl ColumnDef {
    /// The name this column reports in output rows.
    pub fn output_name(&self, catalog: &FieldCatalog, options: &UnparseOptions) -> String {
        if let Some(alias) = &self.alias {
            return alias.clone();
        }
        if let Some(aggregate) = &self.aggregate {
            let operand = if self.count_star {
                "*".to_string()
            } else {
                unparse(&self.expr, catalog, options)
            };
            return format!("{}({})", aggregate.name(), operand);
        }
        if let Some(column) = &self.column
            && let Some(field) = catalog.field(column.field)
        {
            if options.always_prefix_column_with_table_name
                && let Some(table) = catalog.table(column.table)
            {
                return format!("{}.{}", table.effective_name(), field.name);
            }
            return field.name.clone();
        }
        unparse(&self.expr, catalog, options)
    }
}

/// A join condition tied to one secondary table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JoinDef {
    /// Index of the secondary table in the catalog
    pub table: usize,
    /// The checked join condition
    pub condition: Expression,
}

/// One ORDER BY key: a resolved field and a direction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderKey {
    pub column: ColumnRef,
    pub ascending: bool,
}

/// How a compiled select produces output rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QueryMode {
    /// One output row per input record
    Records,
    /// A single aggregated row
    Summary,
    /// One row per distinct value combination
    DistinctList,
}

/// A compiled, validated SELECT statement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectStatement {
    /// The catalog the statement was resolved against, with query aliases
    /// applied
    pub catalog: FieldCatalog,
    /// Output column definitions
    pub columns: Vec<ColumnDef>,
    /// Join conditions, one per joined secondary table
    pub joins: Vec<JoinDef>,
    /// The checked WHERE tree, if any
    pub r#where: Option<Expression>,
    /// ORDER BY keys
    pub order_by: Vec<OrderKey>,
    /// Maximum number of rows to return; None is unbounded
    pub limit: Option<u64>,
    /// Number of leading rows to skip
    pub offset: u64,
    /// Query mode, classified from the column list
    pub mode: QueryMode,
    /// The next member of the UNION ALL chain, if any
    pub union_next: Option<Box<SelectStatement>>,
}

impl SelectStatement {
    /// Appends a compiled select to the end of the union chain. Members
    /// stay independent trees; only the output arity must line up.
    pub fn push_union_all(&mut self, other: SelectStatement) -> Result<()> {
        if other.columns.len() != self.columns.len() {
            return Err(Error::Execution(format!(
                "UNION ALL members select {} and {} columns",
                self.columns.len(),
                other.columns.len()
            )));
        }
        let mut tail = self;
        while tail.union_next.is_some() {
            tail = tail.union_next.as_deref_mut().unwrap();
        }
        tail.union_next = Some(Box::new(other));
        Ok(())
    }

    /// Output column names, from the first union member.
    pub fn output_names(&self, options: &UnparseOptions) -> Vec<String> {
        self.columns
            .iter()
            .map(|c| c.output_name(&self.catalog, options))
            .collect()
    }
}

/// Analyzes a raw select against a catalog, producing a compiled
/// statement. Union members are validated independently.
pub fn analyze(
    raw: &ast::SelectStatement,
    catalog: &FieldCatalog,
    options: &CompileOptions,
    registrar: Option<&dyn FunctionRegistrar>,
) -> Result<SelectStatement> {
    let mut statement = analyze_member(raw, catalog, options, registrar)?;
    let mut next = raw.union_next.as_deref();
    while let Some(member) = next {
        statement.push_union_all(analyze_member(member, catalog, options, registrar)?)?;
        next = member.union_next.as_deref();
    }
    Ok(statement)
}

fn analyze_member(
    raw: &ast::SelectStatement,
    catalog: &FieldCatalog,
    options: &CompileOptions,
    registrar: Option<&dyn FunctionRegistrar>,
) -> Result<SelectStatement> {
    // Bind the query's table references (and aliases) to the catalog.
    let catalog = bind_tables(raw, catalog)?;
    let resolver = Resolver::new(&catalog, options, registrar);
    let checker = TypeChecker::new(&catalog, options, registrar);

    // Expand wildcards into the explicit catalog column set.
    let items = expand_wildcard(&raw.select, &catalog, options, !raw.joins.is_empty());

    // Build column definitions, peeling off aggregate calls.
    let mut columns = Vec::with_capacity(items.len());
    for (expr, alias) in &items {
        columns.push(analyze_column(
            expr,
            alias.clone(),
            raw.distinct,
            &resolver,
            &checker,
            registrar,
            options,
        )?);
    }

    // Classify the query mode from the column list.
    let aggregated = columns.iter().filter(|c| c.aggregate.is_some()).count();
    let mode = if aggregated > 0 {
        if aggregated != columns.len() {
            return Err(Error::Execution(
                "summary query mixes aggregated and non-aggregated columns".into(),
            ));
        }
        QueryMode::Summary
    } else if raw.distinct {
        validate_distinct(&columns, options)?;
        QueryMode::DistinctList
    } else {
        QueryMode::Records
    };

    // Join conditions see all tables and must be boolean.
    let mut joins = Vec::with_capacity(raw.joins.len());
    for join in &raw.joins {
        let table = catalog
            .find_table(join.table.alias.as_deref().unwrap_or(&join.table.name))
            .ok_or_else(|| Error::UnknownTable(join.table.name.clone()))?;
        if table == PRIMARY_TABLE {
            return Err(Error::Execution(format!(
                "cannot join the primary table {}",
                join.table.name
            )));
        }
        let mut on = join.on.clone();
        replace_between_by_ge_and_le(&mut on);
        let condition = resolver.resolve(&on, true)?;
        expect_boolean(&checker.check(&condition)?, "JOIN condition")?;
        joins.push(JoinDef { table, condition });
    }

    // WHERE: secondary-table fields are gated by an option.
    let r#where = match &raw.r#where {
        Some(expr) => {
            let mut expr = expr.clone();
            replace_between_by_ge_and_le(&mut expr);
            let resolved = resolver.resolve(&expr, options.allow_fields_in_secondary_tables)?;
            expect_boolean(&checker.check(&resolved)?, "WHERE clause")?;
            Some(resolved)
        }
        None => None,
    };

    let order_by = analyze_order_by(raw, &columns, &catalog, mode)?;

    Ok(SelectStatement {
        catalog,
        columns,
        joins,
        r#where,
        order_by,
        limit: raw.limit,
        offset: raw.offset.unwrap_or(0),
        mode,
        union_next: None,
    })
}

/// Clones the catalog and applies the query's table aliases, validating
/// that every referenced table exists.
fn bind_tables(raw: &ast::SelectStatement, catalog: &FieldCatalog) -> Result<FieldCatalog> {
    let mut bound = catalog.clone();

    let primary = bound
        .find_table(&raw.from.name)
        .ok_or_else(|| Error::UnknownTable(raw.from.name.clone()))?;
    if primary != PRIMARY_TABLE {
        return Err(Error::Execution(format!(
            "{} is a secondary table and cannot be selected from",
            raw.from.name
        )));
    }

    let mut aliases: Vec<(usize, Option<String>)> = vec![(primary, raw.from.alias.clone())];
    for join in &raw.joins {
        let table = bound
            .find_table(&join.table.name)
            .ok_or_else(|| Error::UnknownTable(join.table.name.clone()))?;
        aliases.push((table, join.table.alias.clone()));
    }
    for (table, alias) in aliases {
        if let Some(alias) = alias {
            bound.set_table_alias(table, alias);
        }
    }
    Ok(bound)
}

/// Resolves a `*` column list into the explicit catalog column set. When
/// the always-prefix option is set, expanded columns are aliased with
/// their table prefix. With joined tables, the auto-add option appends
/// geometry fields of secondary tables that the list does not mention.
fn expand_wildcard(
    items: &[(ast::Expression, Option<String>)],
    catalog: &FieldCatalog,
    options: &CompileOptions,
    has_joins: bool,
) -> Vec<(ast::Expression, Option<String>)> {
    let column_item = |field_index: usize| {
        let field = &catalog.fields()[field_index];
        let table = catalog
            .table(field.table)
            .map(|t| t.effective_name().to_string());
        let expr = ast::Expression::Column(table.clone(), field.name.clone());
        let alias = match (&table, options.always_prefix_column_with_table_name) {
            (Some(table), true) => Some(format!("{}.{}", table, field.name)),
            _ => None,
        };
        (expr, alias)
    };

    let mut expanded = Vec::new();
    for (expr, alias) in items {
        if matches!(expr, ast::Expression::All) {
            for field_index in 0..catalog.fields().len() {
                expanded.push(column_item(field_index));
            }
        } else {
            expanded.push((expr.clone(), alias.clone()));
        }
    }

    if options.auto_add_secondary_geometry_fields && has_joins {
        for (field_index, field) in catalog.fields().iter().enumerate() {
            if field.table == PRIMARY_TABLE || field.data_type.base_type() != &DataType::Geometry {
                continue;
            }
            let mentioned = expanded.iter().any(|(expr, _)| {
                matches!(
                    expr,
                    ast::Expression::Column(_, name) if name.eq_ignore_ascii_case(&field.name)
                )
            });
            if !mentioned {
                expanded.push(column_item(field_index));
            }
        }
    }

    expanded
}

fn analyze_column(
    expr: &ast::Expression,
    alias: Option<String>,
    select_distinct: bool,
    resolver: &Resolver,
    checker: &TypeChecker,
    registrar: Option<&dyn FunctionRegistrar>,
    options: &CompileOptions,
) -> Result<ColumnDef> {
    // Peel off a top-level aggregate call, together with any DISTINCT
    // encoded in the function name by the parser.
    if let ast::Expression::Function(name, args) = expr {
        let (base_name, distinct) = match name.to_uppercase() {
            n if n.ends_with("_DISTINCT") => {
                (n.trim_end_matches("_DISTINCT").to_string(), true)
            }
            n => (n, false),
        };
        let aggregate = match AggregateKind::from_name(&base_name) {
            Some(kind) => Some(kind),
            None => {
                // A registrar aggregate compiles as a custom kind.
                let is_custom_aggregate = options.allow_custom_functions
                    && registrar
                        .and_then(|r| r.lookup(&base_name))
                        .map(|f| f.signature().is_aggregate)
                        .unwrap_or(false);
                is_custom_aggregate.then(|| AggregateKind::Custom(base_name.clone()))
            }
        };

        if let Some(aggregate) = aggregate {
            return analyze_aggregate_column(
                aggregate, args, alias, distinct, resolver, checker, registrar,
            );
        } else if distinct {
            return Err(Error::Execution(format!(
                "DISTINCT is only valid in aggregate functions, not {}",
                base_name
            )));
        }
    }

    // A plain (non-aggregated) column expression.
    let mut normalized = expr.clone();
    replace_between_by_ge_and_le(&mut normalized);
    let resolved = resolver.resolve(&normalized, true)?;
    let data_type = checker.check(&resolved)?;
    Ok(ColumnDef {
        cast_to: match &resolved {
            Expression::Cast { to, .. } => Some(to.clone()),
            _ => None,
        },
        column: match &resolved {
            Expression::Column(column) => Some(*column),
            _ => None,
        },
        geometry_srid: constant_geometry_srid(&resolved),
        expr: resolved,
        aggregate: None,
        count_star: false,
        alias,
        distinct: select_distinct,
        data_type,
    })
}

fn analyze_aggregate_column(
    aggregate: AggregateKind,
    args: &[ast::Expression],
    alias: Option<String>,
    distinct: bool,
    resolver: &Resolver,
    checker: &TypeChecker,
    registrar: Option<&dyn FunctionRegistrar>,
) -> Result<ColumnDef> {
    // COUNT(*) counts records; other aggregates take exactly one operand.
    let count_star =
        aggregate == AggregateKind::Count && matches!(args, [ast::Expression::All]);
    if count_star && distinct {
        return Err(Error::Execution("COUNT(DISTINCT *) is not valid".into()));
    }

    let (expr, data_type) = if count_star {
        (Expression::Constant(Value::I64(1)), DataType::I64)
    } else {
        let [arg] = args else {
            return Err(Error::Execution(format!(
                "{} takes 1 argument, got {}",
                aggregate.name(),
                args.len()
            )));
        };
        let mut arg = arg.clone();
        replace_between_by_ge_and_le(&mut arg);
        let resolved = resolver.resolve(&arg, true)?;
        let operand_type = checker.check(&resolved)?;
        let function = functions::resolve_function(aggregate.name(), registrar, true)?;
        let data_type = function.validate(&[operand_type])?;
        (resolved, data_type)
    };

    Ok(ColumnDef {
        column: match &expr {
            Expression::Column(column) => Some(*column),
            _ => None,
        },
        geometry_srid: None,
        cast_to: None,
        expr,
        aggregate: Some(aggregate),
        count_star,
        alias,
        distinct,
        data_type,
    })
}

/// DISTINCT constraints: geometry needs its own option, and more than one
/// field is rejected unless explicitly enabled.
fn validate_distinct(columns: &[ColumnDef], options: &CompileOptions) -> Result<()> {
    if columns.len() > 1 && !options.allow_distinct_on_multiple_fields {
        return Err(Error::Execution(
            "SELECT DISTINCT on multiple fields is not enabled".into(),
        ));
    }
    for column in columns {
        if column.data_type.base_type() == &DataType::Geometry
            && !options.allow_distinct_on_geometry_field
        {
            return Err(Error::Execution(
                "SELECT DISTINCT on a geometry field is not enabled".into(),
            ));
        }
    }
    Ok(())
}

/// Validates ORDER BY targets: a catalog field, or the alias of an output
/// column that is itself a bare field reference.
fn analyze_order_by(
    raw: &ast::SelectStatement,
    columns: &[ColumnDef],
    catalog: &FieldCatalog,
    mode: QueryMode,
) -> Result<Vec<OrderKey>> {
    if raw.order_by.is_empty() {
        return Ok(Vec::new());
    }
    if mode == QueryMode::Summary {
        return Err(Error::Execution(
            "ORDER BY is not supported on summary queries".into(),
        ));
    }

    let mut order_by = Vec::with_capacity(raw.order_by.len());
    for (expr, direction) in &raw.order_by {
        let ast::Expression::Column(table, name) = expr else {
            return Err(Error::Execution(
                "ORDER BY must name a field or output column".into(),
            ));
        };

        // An unqualified name may refer to an output column alias.
        let column = if table.is_none() {
            columns
                .iter()
                .find(|c| c.alias.as_deref().is_some_and(|a| a.eq_ignore_ascii_case(name)))
                .and_then(|c| c.column)
        } else {
            None
        };
        let column = match column {
            Some(column) => column,
            None => {
                let field = catalog.resolve_column(table.as_deref(), name, true)?;
                ColumnRef {
                    table: catalog.fields()[field].table,
                    field,
                }
            }
        };

        // Distinct lists can only be ordered by what they output.
        if mode == QueryMode::DistinctList
            && !columns.iter().any(|c| c.column == Some(column))
        {
            return Err(Error::Execution(format!(
                "ORDER BY {} is not in the DISTINCT column list",
                name
            )));
        }

        order_by.push(OrderKey {
            column,
            ascending: *direction == ast::Direction::Ascending,
        });
    }
    Ok(order_by)
}

/// The spatial reference of a constant geometry column, when known.
fn constant_geometry_srid(expr: &Expression) -> Option<i32> {
    match expr {
        Expression::Constant(Value::Geometry(geometry)) => geometry.srid,
        _ => None,
    }
}

/// A WHERE or JOIN condition must type-check to a boolean.
fn expect_boolean(data_type: &DataType, what: &str) -> Result<()> {
    match data_type.base_type() {
        DataType::Bool | DataType::Null => Ok(()),
        other => Err(Error::TypeMismatch {
            expected: format!("BOOLEAN {}", what),
            found: other.to_string(),
        }),
    }
}
