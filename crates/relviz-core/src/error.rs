//! Error taxonomy for model construction.
//!
//! Only losing the catalog itself is fatal. Partial or malformed catalog
//! results deeper in the graph degrade to empty/absent values inside the
//! resolvers, and lookups by unknown name return `None`/empty from every
//! query method.

/// Fatal failures while building a [`crate::CatalogModel`].
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    /// The catalog could not enumerate its schemas. Raised once at the top
    /// of a build; nothing below schema enumeration raises at all.
    #[error("failed to enumerate catalog schemas: {0}")]
    SchemaEnumeration(#[source] anyhow::Error),
}
