//! The field catalog: columns and tables an expression can reference

use super::data_type::DataType;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Index of the primary table in a catalog's table list.
pub const PRIMARY_TABLE: usize = 0;

/// One column available to expressions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDef {
    /// Column name, as referenced in query text
    pub name: String,
    /// Declared type of the column
    pub data_type: DataType,
    /// Index into the catalog's table list of the owning table
    pub table: usize,
}

/// One table contributing fields to the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableDef {
    /// Identifier of the record source backing this table
    pub source: String,
    /// Table name, as referenced in query text
    pub name: String,
    /// Optional alias, taking precedence over the name during resolution
    pub alias: Option<String>,
}

impl TableDef {
    pub fn new(source: impl Into<String>, name: impl Into<String>) -> Self {
        TableDef {
            source: source.into(),
            name: name.into(),
            alias: None,
        }
    }

    /// The name this table answers to: the alias if set, else the name.
    pub fn effective_name(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.name)
    }
}

/// The set of fields and tables expressions are resolved against.
///
/// Table index 0 is the primary table; higher indices are secondary
/// (joined) tables. Field order is the catalog order used by wildcard
/// expansion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldCatalog {
    fields: Vec<FieldDef>,
    tables: Vec<TableDef>,
}

impl FieldCatalog {
    /// Create a catalog with a single primary table and no fields.
    pub fn new(primary: TableDef) -> Self {
        FieldCatalog {
            fields: Vec::new(),
            tables: vec![primary],
        }
    }

    /// Add a secondary (joined) table, returning its table index.
    pub fn add_table(&mut self, table: TableDef) -> usize {
        self.tables.push(table);
        self.tables.len() - 1
    }

    /// Add a field to the given table, returning its field index.
    pub fn add_field(
        &mut self,
        table: usize,
        name: impl Into<String>,
        data_type: DataType,
    ) -> usize {
        self.fields.push(FieldDef {
            name: name.into(),
            data_type,
            table,
        });
        self.fields.len() - 1
    }

    pub fn fields(&self) -> &[FieldDef] {
        &self.fields
    }

    pub fn tables(&self) -> &[TableDef] {
        &self.tables
    }

    pub fn field(&self, index: usize) -> Option<&FieldDef> {
        self.fields.get(index)
    }

    pub fn table(&self, index: usize) -> Option<&TableDef> {
        self.tables.get(index)
    }

    /// Set or replace the alias of a table.
    pub fn set_table_alias(&mut self, table: usize, alias: impl Into<String>) {
        if let Some(table) = self.tables.get_mut(table) {
            table.alias = Some(alias.into());
        }
    }

    /// Look up a table index by name or alias (case-insensitive).
    pub fn find_table(&self, name: &str) -> Option<usize> {
        self.tables
            .iter()
            .position(|t| t.effective_name().eq_ignore_ascii_case(name))
    }

    /// Resolve a possibly table-qualified column name to a field index.
    ///
    /// Bare names must be unambiguous: when `allow_secondary` is false
    /// only the primary table is searched; when true, a bare name that
    /// matches fields in more than one table is an AmbiguousColumn error.
    pub fn resolve_column(
        &self,
        table: Option<&str>,
        name: &str,
        allow_secondary: bool,
    ) -> Result<usize> {
        if let Some(table_name) = table {
            let table_idx = self
                .find_table(table_name)
                .ok_or_else(|| Error::UnknownTable(table_name.to_string()))?;
            if table_idx != PRIMARY_TABLE && !allow_secondary {
                return Err(Error::UnknownColumn(format!("{}.{}", table_name, name)));
            }
            return self
                .fields
                .iter()
                .position(|f| f.table == table_idx && f.name.eq_ignore_ascii_case(name))
                .ok_or_else(|| Error::UnknownColumn(format!("{}.{}", table_name, name)));
        }

        let mut found: Option<usize> = None;
        for (i, field) in self.fields.iter().enumerate() {
            if field.table != PRIMARY_TABLE && !allow_secondary {
                continue;
            }
            if field.name.eq_ignore_ascii_case(name) {
                if let Some(prev) = found {
                    // Duplicates within one table shadow in catalog order;
                    // matches across tables are ambiguous.
                    if self.fields[prev].table != field.table {
                        return Err(Error::AmbiguousColumn(name.to_string()));
                    }
                } else {
                    found = Some(i);
                }
            }
        }
        found.ok_or_else(|| Error::UnknownColumn(name.to_string()))
    }
}
