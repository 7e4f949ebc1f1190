//! Table resolution: fields in catalog column order plus the table-level
//! derived sets.

use indexmap::IndexMap;
use serde::Serialize;

use crate::comment::{self, StructuredComment};
use crate::conventions::Conventions;
use crate::field::{Field, KeyKind};
use crate::fk::FkIndex;
use crate::source::ColumnRow;

/// One base table with all fields resolved.
///
/// `fields` preserves catalog column order; `struct` (the serialized name of
/// `by_name`) holds the records in the same order. The `fields` key is the
/// leaf-detection signal for the visualization consumer, so it is always
/// serialized, even when empty.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Table {
    /// Qualified `schema.table`.
    pub name: String,
    pub comment: Option<StructuredComment>,
    pub is_history: bool,
    /// First field in catalog column order whose key kind is primary.
    pub primary_key: Option<String>,
    /// Field names in catalog column order.
    pub fields: Vec<String>,
    /// Field records keyed by name, same order as `fields`.
    #[serde(rename = "struct")]
    pub by_name: IndexMap<String, Field>,
}

impl Table {
    /// Resolve one table from its ordered catalog column rows and the
    /// schema-wide foreign-key index.
    ///
    /// A zero-column table (possible when the catalog changes between the
    /// table listing and the column query) resolves to an empty field set
    /// with no primary key.
    pub fn resolve(
        schema: &str,
        name: &str,
        raw_comment: Option<&str>,
        columns: &[ColumnRow],
        fks: &FkIndex,
        conventions: &Conventions,
    ) -> Self {
        let comment = comment::parse_structured(raw_comment);
        let is_history = conventions.table_is_history(name, comment.as_ref());

        let mut fields = Vec::with_capacity(columns.len());
        let mut by_name = IndexMap::with_capacity(columns.len());
        for row in columns {
            let field = Field::resolve(schema, name, row, fks, conventions);
            fields.push(row.name.clone());
            by_name.insert(row.name.clone(), field);
        }

        let primary_key = by_name
            .values()
            .find(|f| f.key == KeyKind::Primary)
            .map(|f| f.name.clone());

        Self {
            name: format!("{}.{}", schema, name),
            comment,
            is_history,
            primary_key,
            fields,
            by_name,
        }
    }

    /// Get a field by name.
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.by_name.get(name)
    }

    /// All field names in catalog column order, hidden fields included.
    pub fn field_names(&self) -> &[String] {
        &self.fields
    }

    /// The primary key field name, if the table has one.
    pub fn primary_key(&self) -> Option<&str> {
        self.primary_key.as_deref()
    }

    /// The `description` entry of the structured comment.
    pub fn description(&self) -> Option<&str> {
        self.comment.as_ref()?.get("description")?.as_str()
    }

    /// Fields not hidden by convention, in column order.
    pub fn visible_fields(&self) -> Vec<&str> {
        self.filter_fields(|f| !f.hidden)
    }

    /// Visible fields that cannot be null.
    pub fn required_fields(&self) -> Vec<&str> {
        self.filter_fields(|f| f.required && !f.hidden)
    }

    /// Visible fields carrying a uniqueness constraint.
    pub fn unique_fields(&self) -> Vec<&str> {
        self.filter_fields(|f| f.unique && !f.hidden)
    }

    /// Visible fields that are both unique and required: primary-key
    /// candidates even when the catalog stores no primary index for them.
    pub fn visible_key_candidates(&self) -> Vec<&str> {
        self.filter_fields(|f| f.unique && f.required && !f.hidden)
    }

    /// For every field of this table some foreign key points at, the
    /// referencing `table.column`.
    pub fn referenced_from(&self) -> Vec<&str> {
        self.by_name
            .values()
            .filter_map(|f| f.referenced_by.as_deref())
            .collect()
    }

    fn filter_fields(&self, pred: impl Fn(&Field) -> bool) -> Vec<&str> {
        self.by_name
            .values()
            .filter(|f| pred(f))
            .map(|f| f.name.as_str())
            .collect()
    }
}
