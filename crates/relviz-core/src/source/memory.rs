//! In-memory catalog fixtures.
//!
//! A substitutable [`CatalogSource`] backed by plain maps, used by the
//! integration tests and by consumers that want to resolve a hand-built
//! catalog without a server.

use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::Value;

use super::{CatalogSource, ColumnRow, FkEdge, TableRow};

/// An infallible catalog built by hand.
#[derive(Debug, Clone, Default)]
pub struct MemoryCatalogSource {
    schemas: Vec<String>,
    tables: HashMap<String, Vec<TableRow>>,
    columns: HashMap<(String, String), Vec<ColumnRow>>,
    edges: HashMap<String, Vec<FkEdge>>,
    values: HashMap<(String, String, String), Vec<Value>>,
}

impl MemoryCatalogSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a schema. Schemas are listed in registration order.
    pub fn add_schema(&mut self, name: impl Into<String>) {
        let name = name.into();
        if !self.schemas.contains(&name) {
            self.schemas.push(name);
        }
    }

    /// Register a table, registering its schema as needed. Tables are
    /// listed in registration order.
    pub fn add_table(&mut self, schema: &str, table: impl Into<String>, comment: Option<&str>) {
        self.add_schema(schema);
        self.tables.entry(schema.to_string()).or_default().push(TableRow {
            name: table.into(),
            comment: comment.map(str::to_string),
        });
    }

    /// Append a column to a table.
    pub fn add_column(&mut self, schema: &str, table: &str, column: ColumnRow) {
        self.columns
            .entry((schema.to_string(), table.to_string()))
            .or_default()
            .push(column);
    }

    /// Register a foreign-key edge between two `table.column` identifiers.
    pub fn add_fk_edge(&mut self, schema: &str, referencing: &str, referenced: &str) {
        self.edges.entry(schema.to_string()).or_default().push(FkEdge {
            referencing: referencing.to_string(),
            referenced: referenced.to_string(),
        });
    }

    /// Seed the distinct values reported for one column.
    pub fn add_distinct_values(&mut self, schema: &str, table: &str, column: &str, values: Vec<Value>) {
        self.values
            .insert((schema.to_string(), table.to_string(), column.to_string()), values);
    }
}

#[async_trait]
impl CatalogSource for MemoryCatalogSource {
    async fn list_schemas(&self) -> anyhow::Result<Vec<String>> {
        Ok(self.schemas.clone())
    }

    async fn list_tables(&self, schema: &str) -> anyhow::Result<Vec<TableRow>> {
        Ok(self.tables.get(schema).cloned().unwrap_or_default())
    }

    async fn list_columns(&self, schema: &str, table: &str) -> anyhow::Result<Vec<ColumnRow>> {
        Ok(self
            .columns
            .get(&(schema.to_string(), table.to_string()))
            .cloned()
            .unwrap_or_default())
    }

    async fn list_fk_edges(&self, schema: &str) -> anyhow::Result<Vec<FkEdge>> {
        Ok(self.edges.get(schema).cloned().unwrap_or_default())
    }

    async fn distinct_values(
        &self,
        schema: &str,
        table: &str,
        column: &str,
    ) -> anyhow::Result<Vec<Value>> {
        Ok(self
            .values
            .get(&(schema.to_string(), table.to_string(), column.to_string()))
            .cloned()
            .unwrap_or_default())
    }
}
