//! Core types: data types, values, the field catalog and resolved trees

pub mod coercion;
pub mod data_type;
pub mod expression;
pub mod schema;
pub mod value;

pub use data_type::DataType;
pub use expression::{ColumnRef, Expression};
pub use schema::{FieldCatalog, FieldDef, TableDef, PRIMARY_TABLE};
pub use value::{compare, Geometry, Row, Value};
