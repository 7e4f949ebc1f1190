//! Foreign-key edge index.
//!
//! Built once per schema from the full edge set and consulted in both
//! directions during field resolution, keeping whole-schema resolution
//! near-linear in column count. Links are stored as plain `table.column`
//! identifiers, never as object references, so the graph carries no cyclic
//! ownership.

use std::collections::HashMap;

use crate::source::FkEdge;

/// Bidirectional lookup over a schema's foreign-key constraints.
#[derive(Debug, Clone, Default)]
pub struct FkIndex {
    forward: HashMap<String, String>,
    reverse: HashMap<String, String>,
}

impl FkIndex {
    /// Index an edge set. When several columns reference the same target,
    /// the reverse direction keeps the first referencing column in edge
    /// order.
    pub fn from_edges(edges: &[FkEdge]) -> Self {
        let mut forward = HashMap::with_capacity(edges.len());
        let mut reverse = HashMap::with_capacity(edges.len());
        for edge in edges {
            forward
                .entry(edge.referencing.clone())
                .or_insert_with(|| edge.referenced.clone());
            reverse
                .entry(edge.referenced.clone())
                .or_insert_with(|| edge.referencing.clone());
        }
        Self { forward, reverse }
    }

    /// The `table.column` this column points at, if it is a foreign key.
    pub fn reference_of(&self, qualified: &str) -> Option<&str> {
        self.forward.get(qualified).map(String::as_str)
    }

    /// The `table.column` pointing at this column, if any does.
    pub fn referenced_by(&self, qualified: &str) -> Option<&str> {
        self.reverse.get(qualified).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.forward.len()
    }

    pub fn is_empty(&self) -> bool {
        self.forward.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn edge(referencing: &str, referenced: &str) -> FkEdge {
        FkEdge {
            referencing: referencing.to_string(),
            referenced: referenced.to_string(),
        }
    }

    #[test]
    fn resolves_both_directions() {
        let index = FkIndex::from_edges(&[edge("orders.customer_id", "customers.id")]);
        assert_eq!(index.reference_of("orders.customer_id"), Some("customers.id"));
        assert_eq!(index.referenced_by("customers.id"), Some("orders.customer_id"));
        assert_eq!(index.reference_of("customers.id"), None);
        assert_eq!(index.referenced_by("orders.customer_id"), None);
    }

    #[test]
    fn chained_keys_can_be_fk_and_referenced_at_once() {
        let index = FkIndex::from_edges(&[
            edge("orders.customer_id", "customers.id"),
            edge("shipments.customer_id", "orders.customer_id"),
        ]);
        assert_eq!(index.reference_of("orders.customer_id"), Some("customers.id"));
        assert_eq!(index.referenced_by("orders.customer_id"), Some("shipments.customer_id"));
    }

    #[test]
    fn reverse_lookup_keeps_the_first_referencing_column() {
        let index = FkIndex::from_edges(&[
            edge("orders.customer_id", "customers.id"),
            edge("invoices.customer_id", "customers.id"),
        ]);
        assert_eq!(index.referenced_by("customers.id"), Some("orders.customer_id"));
        assert_eq!(index.len(), 2);
    }
}
