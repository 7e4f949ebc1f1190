//! Catalog introspection core for Relviz.
//!
//! This crate turns raw catalog rows (schema names, table lists, column
//! definitions, foreign-key constraints) into a cross-referenced structural
//! model and serializes it for the visualization front end. Raw rows come
//! from a [`CatalogSource`] capability; the live MySQL implementation lives
//! in `relviz-mysql`, and [`MemoryCatalogSource`] provides a substitutable
//! in-memory source for tests and demos.
//!
//! Resolution runs bottom-up in one synchronous pass per build:
//! column rows become [`Field`]s, fields become [`Table`]s, tables become
//! [`Schema`]s, and the schemas form the [`CatalogModel`]. The graph is
//! immutable once loaded; only the value-enumeration queries go back to the
//! source at call time.

pub mod comment;
pub mod conventions;
pub mod error;
pub mod field;
pub mod fk;
pub mod model;
pub mod schema;
pub mod source;
pub mod table;

pub use comment::StructuredComment;
pub use conventions::Conventions;
pub use error::ModelError;
pub use field::{Field, FieldLength, KeyKind};
pub use fk::FkIndex;
pub use model::CatalogModel;
pub use schema::Schema;
pub use source::memory::MemoryCatalogSource;
pub use source::{CatalogSource, ColumnRow, FkEdge, TableRow};
pub use table::Table;
