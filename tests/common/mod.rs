//! Common test utilities for integration tests
#![allow(dead_code)]

use sievesql::{
    execute_select, is_match, CompileOptions, Compiler, DataType, FieldCatalog, FunctionRegistrar,
    Row, TableDef, Value, PRIMARY_TABLE,
};

/// Test context bundling a catalog, an in-memory record set and compile
/// options. Records are rows of values in catalog field order.
pub struct TestContext {
    pub catalog: FieldCatalog,
    pub records: Vec<Row>,
    pub options: CompileOptions,
}

impl TestContext {
    pub fn new(catalog: FieldCatalog) -> Self {
        TestContext {
            catalog,
            records: Vec::new(),
            options: CompileOptions::default(),
        }
    }

    /// The three-city data set: {San Jose, 1.2e6}, {Boston, 700000},
    /// {San Diego, 500}.
    pub fn cities() -> Self {
        let mut catalog = FieldCatalog::new(TableDef::new("memory", "cities"));
        catalog.add_field(PRIMARY_TABLE, "name", DataType::Str);
        catalog.add_field(PRIMARY_TABLE, "population", DataType::F64);
        let mut ctx = TestContext::new(catalog);
        ctx.insert(vec![Value::string("San Jose"), Value::F64(1.2e6)]);
        ctx.insert(vec![Value::string("Boston"), Value::F64(700_000.0)]);
        ctx.insert(vec![Value::string("San Diego"), Value::F64(500.0)]);
        ctx
    }

    /// Cities joined with a states table: city fields plus
    /// states.name and states.abbrev.
    pub fn cities_with_states() -> Self {
        let mut catalog = FieldCatalog::new(TableDef::new("memory", "cities"));
        catalog.add_field(PRIMARY_TABLE, "name", DataType::Str);
        catalog.add_field(PRIMARY_TABLE, "population", DataType::F64);
        catalog.add_field(PRIMARY_TABLE, "state", DataType::Str);
        let states = catalog.add_table(TableDef::new("memory", "states"));
        catalog.add_field(states, "name", DataType::Str);
        catalog.add_field(states, "abbrev", DataType::Str);
        catalog.add_field(states, "boundary", DataType::Geometry);

        let mut ctx = TestContext::new(catalog);
        // Rows carry the joined values, as a record source performing the
        // physical join would supply them.
        ctx.insert(vec![
            Value::string("San Jose"),
            Value::F64(1.2e6),
            Value::string("California"),
            Value::string("California"),
            Value::string("CA"),
            Value::Geometry(sievesql::Geometry::with_srid("POLYGON ((0 0, 1 0, 1 1, 0 0))", 4326)),
        ]);
        ctx.insert(vec![
            Value::string("Boston"),
            Value::F64(700_000.0),
            Value::string("Massachusetts"),
            Value::string("Massachusetts"),
            Value::string("MA"),
            Value::Geometry(sievesql::Geometry::with_srid("POLYGON ((2 2, 3 2, 3 3, 2 2))", 4326)),
        ]);
        ctx
    }

    pub fn insert(&mut self, row: Row) {
        self.records.push(row);
    }

    pub fn compiler(&self) -> Compiler<'_> {
        Compiler::new(&self.catalog).with_options(self.options.clone())
    }

    /// Compiles and runs a WHERE string, returning the matching records.
    pub fn filter(&self, text: &str) -> sievesql::Result<Vec<&Row>> {
        self.filter_with(text, None)
    }

    /// Like `filter`, with a custom function registrar.
    pub fn filter_with(
        &self,
        text: &str,
        registrar: Option<&dyn FunctionRegistrar>,
    ) -> sievesql::Result<Vec<&Row>> {
        let mut compiler = self.compiler();
        if let Some(registrar) = registrar {
            compiler = compiler.with_registrar(registrar);
        }
        let filter = compiler.compile_filter(text)?;
        let mut matched = Vec::new();
        for record in &self.records {
            let value = sievesql::evaluate_with_registrar(
                &filter.expr,
                record,
                &mut fetch_by_index,
                registrar,
            )?;
            if is_match(&value) {
                matched.push(record);
            }
        }
        Ok(matched)
    }

    /// Compiles and runs a SELECT string over the record set.
    pub fn query(&self, text: &str) -> sievesql::Result<Vec<Row>> {
        self.query_with(text, None)
    }

    /// Like `query`, with a custom function registrar.
    pub fn query_with(
        &self,
        text: &str,
        registrar: Option<&dyn FunctionRegistrar>,
    ) -> sievesql::Result<Vec<Row>> {
        let mut compiler = self.compiler();
        if let Some(registrar) = registrar {
            compiler = compiler.with_registrar(registrar);
        }
        let statement = compiler.compile_select(text)?;
        execute_select(&statement, &self.records, &mut fetch_by_index, registrar)
    }

    /// The names (first field) of records matching a WHERE string.
    pub fn matching_names(&self, text: &str) -> sievesql::Result<Vec<String>> {
        Ok(self
            .filter(text)?
            .into_iter()
            .map(|row| match &row[0] {
                Value::Str(name) => name.clone(),
                other => panic!("expected a string name, got {:?}", other),
            })
            .collect())
    }
}

/// Fetch callback for rows stored in catalog field order.
pub fn fetch_by_index(column: &sievesql::ColumnRef, record: &Row) -> sievesql::Result<Value> {
    record
        .get(column.field)
        .cloned()
        .ok_or_else(|| sievesql::Error::Execution(format!("no field {}", column.field)))
}

/// Convenience for asserting on single-column string output rows.
pub fn string_column(rows: &[Row]) -> Vec<String> {
    rows.iter()
        .map(|row| match &row[0] {
            Value::Str(s) => s.clone(),
            other => panic!("expected a string, got {:?}", other),
        })
        .collect()
}
