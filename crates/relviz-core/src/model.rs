//! The top-level catalog model: every schema, resolved once, plus the JSON
//! projection consumed by the visualization layer.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::conventions::Conventions;
use crate::error::ModelError;
use crate::field::Field;
use crate::schema::Schema;
use crate::source::CatalogSource;
use crate::table::Table;

/// Schemas never loaded into the model: the server's own catalogs.
const RESERVED_SCHEMAS: [&str; 2] = ["information_schema", "performance_schema"];

/// The fully resolved structural model of one catalog snapshot.
///
/// Built once from a snapshot of catalog queries issued at load time and
/// immutable thereafter. The model owns its schemas, which own their tables,
/// which own their fields; foreign-key links are plain identifiers, not
/// references. The catalog capability is retained only for the live
/// value-enumeration queries.
///
/// Serializes as `{"schemas": [...], "struct": {...}}` with key and array
/// order matching catalog order.
#[derive(Serialize)]
pub struct CatalogModel {
    schemas: Vec<String>,
    #[serde(rename = "struct")]
    by_name: IndexMap<String, Schema>,
    #[serde(skip)]
    source: Arc<dyn CatalogSource>,
    #[serde(skip)]
    conventions: Conventions,
}

impl CatalogModel {
    /// Build the whole graph from one catalog snapshot with the default
    /// conventions.
    pub async fn load(source: Arc<dyn CatalogSource>) -> Result<Self, ModelError> {
        Self::load_with(source, Conventions::default()).await
    }

    /// Build the whole graph with explicit conventions.
    ///
    /// Schema enumeration failure is the single fatal error; every other
    /// catalog irregularity degrades inside the resolvers.
    pub async fn load_with(
        source: Arc<dyn CatalogSource>,
        conventions: Conventions,
    ) -> Result<Self, ModelError> {
        let names = source
            .list_schemas()
            .await
            .map_err(ModelError::SchemaEnumeration)?;

        let mut schemas = Vec::with_capacity(names.len());
        let mut by_name = IndexMap::with_capacity(names.len());
        for name in names {
            if RESERVED_SCHEMAS.contains(&name.as_str()) {
                continue;
            }
            debug!(schema = %name, "resolving schema");
            let schema = Schema::resolve(&name, source.as_ref(), &conventions).await;
            schemas.push(name.clone());
            by_name.insert(name, schema);
        }

        Ok(Self {
            schemas,
            by_name,
            source,
            conventions,
        })
    }

    /// Schema names in catalog order.
    pub fn schemas(&self) -> &[String] {
        &self.schemas
    }

    /// Get a schema by name.
    pub fn schema(&self, schema: &str) -> Option<&Schema> {
        self.by_name.get(schema)
    }

    /// Get a table by schema and name.
    pub fn table(&self, schema: &str, table: &str) -> Option<&Table> {
        self.schema(schema)?.table(table)
    }

    /// Get a field by schema, table, and name.
    pub fn field(&self, schema: &str, table: &str, field: &str) -> Option<&Field> {
        self.schema(schema)?.field(table, field)
    }

    /// The conventions the graph was resolved with.
    pub fn conventions(&self) -> &Conventions {
        &self.conventions
    }

    /// Data tables (non-history) of a schema. Empty for an unknown schema.
    pub fn data_tables(&self, schema: &str) -> Vec<&str> {
        self.schema(schema).map(Schema::data_tables).unwrap_or_default()
    }

    /// The primary key field of a table, if schema, table, and key exist.
    pub fn primary_key(&self, schema: &str, table: &str) -> Option<&str> {
        self.schema(schema)?.primary_key(table)
    }

    /// Visible field names of a table.
    pub fn visible_fields(&self, schema: &str, table: &str) -> Vec<&str> {
        self.schema(schema)
            .map(|s| s.visible_fields(table))
            .unwrap_or_default()
    }

    /// Required (and visible) field names of a table.
    pub fn required_fields(&self, schema: &str, table: &str) -> Vec<&str> {
        self.schema(schema)
            .map(|s| s.required_fields(table))
            .unwrap_or_default()
    }

    /// Unique (and visible) field names of a table.
    pub fn unique_fields(&self, schema: &str, table: &str) -> Vec<&str> {
        self.schema(schema)
            .map(|s| s.unique_fields(table))
            .unwrap_or_default()
    }

    /// Distinct current values of every visible unique field of a table.
    /// Round-trips to the catalog source at call time.
    pub async fn unique_values(&self, schema: &str, table: &str) -> IndexMap<String, Vec<Value>> {
        match self.schema(schema) {
            Some(s) => s.unique_values(self.source.as_ref(), table).await,
            None => IndexMap::new(),
        }
    }

    /// [`CatalogModel::unique_values`] keyed by the row's value of
    /// `key_field`.
    pub async fn keyed_unique_values(
        &self,
        schema: &str,
        table: &str,
        key_field: &str,
    ) -> IndexMap<String, IndexMap<String, Value>> {
        match self.schema(schema) {
            Some(s) => {
                s.keyed_unique_values(self.source.as_ref(), table, key_field)
                    .await
            }
            None => IndexMap::new(),
        }
    }

    /// Candidate values for every visible foreign-key field of a table.
    /// Round-trips to the catalog source at call time.
    pub async fn fk_values(&self, schema: &str, table: &str) -> IndexMap<String, Vec<Value>> {
        match self.schema(schema) {
            Some(s) => s.fk_values(self.source.as_ref(), table).await,
            None => IndexMap::new(),
        }
    }

    /// Distinct current values of one unique field.
    pub async fn distinct_field_values(
        &self,
        schema: &str,
        table: &str,
        field: &str,
    ) -> Vec<Value> {
        match self.schema(schema) {
            Some(s) => s.distinct_field_values(self.source.as_ref(), table, field).await,
            None => Vec::new(),
        }
    }

    /// Project the whole graph to its JSON document.
    pub fn to_json(&self) -> serde_json::Result<Value> {
        serde_json::to_value(self)
    }

    /// Project one schema to its JSON document. `None` when the name is
    /// unknown.
    pub fn schema_json(&self, schema: &str) -> serde_json::Result<Option<Value>> {
        self.schema(schema).map(serde_json::to_value).transpose()
    }

    /// Project one table to its JSON document. `None` when either name is
    /// unknown.
    pub fn table_json(&self, schema: &str, table: &str) -> serde_json::Result<Option<Value>> {
        self.table(schema, table).map(serde_json::to_value).transpose()
    }
}

impl fmt::Debug for CatalogModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CatalogModel")
            .field("schemas", &self.schemas)
            .field("struct", &self.by_name)
            .finish_non_exhaustive()
    }
}
