//! The catalog capability consumed by every resolver.
//!
//! Rows are typed here, at the source boundary, so the resolvers never have
//! to guard against unexpected row shapes. Adapters translate their native
//! catalog results into these structs and parse the key marker into
//! [`KeyKind`] before anything downstream sees it.

use async_trait::async_trait;

use crate::field::KeyKind;

pub mod memory;

/// One base table as reported by the catalog.
#[derive(Debug, Clone, PartialEq)]
pub struct TableRow {
    pub name: String,
    /// Raw comment string; parsed speculatively during resolution.
    pub comment: Option<String>,
}

/// One column as reported by the catalog.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnRow {
    pub name: String,
    /// Declared type, e.g. `varchar(45)`. Absent when the catalog reports
    /// no type at all.
    pub data_type: Option<String>,
    pub nullable: bool,
    pub key: KeyKind,
    pub default: Option<String>,
    pub extra: Option<String>,
    /// Raw comment string; parsed speculatively during resolution.
    pub comment: Option<String>,
}

impl ColumnRow {
    /// Create a column row with the given name and type. Defaults to
    /// nullable with no key, no default, no extra, no comment.
    pub fn new(name: impl Into<String>, data_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data_type: Some(data_type.into()),
            nullable: true,
            key: KeyKind::None,
            default: None,
            extra: None,
            comment: None,
        }
    }
}

/// A foreign-key constraint as a directed pair of `table.column`
/// identifiers, schema-local on both ends.
#[derive(Debug, Clone, PartialEq)]
pub struct FkEdge {
    /// The referencing column.
    pub referencing: String,
    /// The referenced column.
    pub referenced: String,
}

/// Capability for reading a relational catalog.
///
/// Every method is fallible; callers recover per the resolution error
/// policy: schema enumeration failure aborts a build, everything else
/// degrades to an empty result. Implementations are not required to be
/// reentrant; the resolvers await each call sequentially and never
/// interleave queries.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Enumerate schema names in catalog order.
    async fn list_schemas(&self) -> anyhow::Result<Vec<String>>;

    /// Base tables of one schema, with raw comments, in catalog order.
    async fn list_tables(&self, schema: &str) -> anyhow::Result<Vec<TableRow>>;

    /// Columns of one table in ordinal position order.
    async fn list_columns(&self, schema: &str, table: &str) -> anyhow::Result<Vec<ColumnRow>>;

    /// The full foreign-key edge set of one schema, in a single round-trip.
    async fn list_fk_edges(&self, schema: &str) -> anyhow::Result<Vec<FkEdge>>;

    /// Distinct current values of one column, ordered by value.
    ///
    /// This reads row data, not catalog metadata; it is the one operation
    /// the resolved model calls back into at query time.
    async fn distinct_values(
        &self,
        schema: &str,
        table: &str,
        column: &str,
    ) -> anyhow::Result<Vec<serde_json::Value>>;
}
