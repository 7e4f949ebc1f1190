//! Schema resolution: all tables of one database, resolved against a shared
//! foreign-key edge set.

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;
use tracing::warn;

use crate::conventions::Conventions;
use crate::field::Field;
use crate::fk::FkIndex;
use crate::source::CatalogSource;
use crate::table::Table;

/// One schema with all tables resolved, in catalog order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Schema {
    pub name: String,
    /// Table names in catalog order.
    pub tables: Vec<String>,
    /// Table records keyed by name, same order as `tables`.
    #[serde(rename = "struct")]
    pub by_name: IndexMap<String, Table>,
}

impl Schema {
    /// Resolve one schema through the catalog capability.
    ///
    /// The table list and the schema-wide foreign-key edge set are fetched
    /// once each (never per table), then every table is resolved against
    /// the shared edge set. A failed table, edge, or column query degrades
    /// to an empty result for the piece it covers and is logged, never
    /// propagated.
    pub async fn resolve(name: &str, source: &dyn CatalogSource, conventions: &Conventions) -> Self {
        let table_rows = match source.list_tables(name).await {
            Ok(rows) => rows,
            Err(err) => {
                warn!(schema = name, error = %err, "table listing failed; resolving empty schema");
                Vec::new()
            }
        };

        let edges = match source.list_fk_edges(name).await {
            Ok(edges) => edges,
            Err(err) => {
                warn!(schema = name, error = %err, "foreign key listing failed; resolving without edges");
                Vec::new()
            }
        };
        let fks = FkIndex::from_edges(&edges);

        let mut tables = Vec::with_capacity(table_rows.len());
        let mut by_name = IndexMap::with_capacity(table_rows.len());
        for row in &table_rows {
            let columns = match source.list_columns(name, &row.name).await {
                Ok(columns) => columns,
                Err(err) => {
                    warn!(
                        schema = name,
                        table = %row.name,
                        error = %err,
                        "column listing failed; resolving empty table"
                    );
                    Vec::new()
                }
            };
            let table =
                Table::resolve(name, &row.name, row.comment.as_deref(), &columns, &fks, conventions);
            tables.push(row.name.clone());
            by_name.insert(row.name.clone(), table);
        }

        Self {
            name: name.to_string(),
            tables,
            by_name,
        }
    }

    /// Get a table by name.
    pub fn table(&self, table: &str) -> Option<&Table> {
        self.by_name.get(table)
    }

    /// All table names, history tables included.
    pub fn all_tables(&self) -> &[String] {
        &self.tables
    }

    /// Table names that are data tables (not history counterparts).
    pub fn data_tables(&self) -> Vec<&str> {
        self.by_name
            .iter()
            .filter(|(_, t)| !t.is_history)
            .map(|(name, _)| name.as_str())
            .collect()
    }

    /// The primary key field of a table, if both exist.
    pub fn primary_key(&self, table: &str) -> Option<&str> {
        self.table(table)?.primary_key()
    }

    /// The `description` comment entry of a table, if set.
    pub fn table_description(&self, table: &str) -> Option<&str> {
        self.table(table)?.description()
    }

    /// Get a field by table and name.
    pub fn field(&self, table: &str, field: &str) -> Option<&Field> {
        self.table(table)?.field(field)
    }

    /// All field names of a table, hidden fields included. Empty for an
    /// unknown table.
    pub fn all_fields(&self, table: &str) -> Vec<&str> {
        self.table(table)
            .map(|t| t.field_names().iter().map(String::as_str).collect())
            .unwrap_or_default()
    }

    /// Visible field names of a table. Empty for an unknown table.
    pub fn visible_fields(&self, table: &str) -> Vec<&str> {
        self.table(table).map(Table::visible_fields).unwrap_or_default()
    }

    /// Required (and visible) field names of a table.
    pub fn required_fields(&self, table: &str) -> Vec<&str> {
        self.table(table).map(Table::required_fields).unwrap_or_default()
    }

    /// Unique (and visible) field names of a table.
    pub fn unique_fields(&self, table: &str) -> Vec<&str> {
        self.table(table).map(Table::unique_fields).unwrap_or_default()
    }

    /// True when the named field exists and is required.
    pub fn field_is_required(&self, table: &str, field: &str) -> bool {
        self.field(table, field).map(|f| f.required).unwrap_or(false)
    }

    /// The `column_format` hint of every field of a table, hidden fields
    /// included, in column order.
    pub fn field_formats(&self, table: &str) -> IndexMap<String, Option<String>> {
        let Some(t) = self.table(table) else {
            return IndexMap::new();
        };
        t.by_name
            .values()
            .map(|f| (f.name.clone(), f.format().map(str::to_string)))
            .collect()
    }

    /// Distinct current values of every visible unique field of a table,
    /// keyed by field name. Runs live against the catalog source.
    pub async fn unique_values(
        &self,
        source: &dyn CatalogSource,
        table: &str,
    ) -> IndexMap<String, Vec<Value>> {
        let Some(t) = self.table(table) else {
            return IndexMap::new();
        };
        let mut out = IndexMap::new();
        for field in t.unique_fields() {
            let values = self.distinct_field_values(source, table, field).await;
            out.insert(field.to_string(), values);
        }
        out
    }

    /// Like [`Schema::unique_values`], but each field's values are keyed by
    /// the row's value of `key_field`, for callers that need `key_field`
    /// (unique and required) as a row identifier.
    pub async fn keyed_unique_values(
        &self,
        source: &dyn CatalogSource,
        table: &str,
        key_field: &str,
    ) -> IndexMap<String, IndexMap<String, Value>> {
        let Some(t) = self.table(table) else {
            return IndexMap::new();
        };
        let keys = self.distinct_field_values(source, table, key_field).await;

        let mut out = IndexMap::new();
        for field in t.unique_fields() {
            let values = self.distinct_field_values(source, table, field).await;
            let keyed: IndexMap<String, Value> = keys
                .iter()
                .map(key_string)
                .zip(values.into_iter())
                .collect();
            out.insert(field.to_string(), keyed);
        }
        out
    }

    /// Candidate values for every visible foreign-key field of a table: the
    /// distinct values currently present in the referenced column. Fields
    /// whose referenced column holds no values are omitted.
    pub async fn fk_values(
        &self,
        source: &dyn CatalogSource,
        table: &str,
    ) -> IndexMap<String, Vec<Value>> {
        let Some(t) = self.table(table) else {
            return IndexMap::new();
        };
        let mut out = IndexMap::new();
        for name in t.visible_fields() {
            let Some((ref_table, ref_column)) = t.field(name).and_then(Field::fk_target) else {
                continue;
            };
            let values = match source.distinct_values(&self.name, ref_table, ref_column).await {
                Ok(values) => values,
                Err(err) => {
                    warn!(
                        schema = %self.name,
                        table = ref_table,
                        column = ref_column,
                        error = %err,
                        "foreign key value enumeration failed"
                    );
                    Vec::new()
                }
            };
            if !values.is_empty() {
                out.insert(name.to_string(), values);
            }
        }
        out
    }

    /// Distinct current values of one field. Empty unless the field exists
    /// and is unique.
    pub async fn distinct_field_values(
        &self,
        source: &dyn CatalogSource,
        table: &str,
        field: &str,
    ) -> Vec<Value> {
        let Some(f) = self.field(table, field) else {
            return Vec::new();
        };
        if !f.unique {
            return Vec::new();
        }
        match source.distinct_values(&self.name, table, field).await {
            Ok(values) => values,
            Err(err) => {
                warn!(
                    schema = %self.name,
                    table,
                    field,
                    error = %err,
                    "value enumeration failed"
                );
                Vec::new()
            }
        }
    }
}

/// Map keys must be strings; scalars keep their literal rendering.
fn key_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
