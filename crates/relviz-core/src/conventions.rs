//! Naming and comment conventions.
//!
//! Hidden-field and history-table detection are deployment policy rather
//! than catalog fact, so both rules are carried as data on a [`Conventions`]
//! value threaded through resolution. The defaults match the deployments
//! Relviz was written for; supply different prefixes, suffixes, or comment
//! keys to change the policy. Both predicates are pure: they are evaluated
//! per field/table during graph construction and must not touch the
//! database.

use crate::comment::{self, StructuredComment};

/// Pluggable hidden-field and history-table rules.
#[derive(Debug, Clone)]
pub struct Conventions {
    /// Field-name prefix marking a bookkeeping field (e.g. `_UID`) as
    /// hidden from user-facing listings.
    pub hidden_field_prefix: String,
    /// Structured-comment key that marks a field as hidden.
    pub hidden_comment_key: String,
    /// Table-name suffix marking a table as the audit counterpart of a
    /// data table.
    pub history_table_suffix: String,
    /// Structured-comment key that marks a table as a history table.
    pub history_comment_key: String,
}

impl Default for Conventions {
    fn default() -> Self {
        Self {
            hidden_field_prefix: "_".to_string(),
            hidden_comment_key: "hidden".to_string(),
            history_table_suffix: "_history".to_string(),
            history_comment_key: "history".to_string(),
        }
    }
}

impl Conventions {
    /// True when a field is excluded from user-facing listings. The field
    /// still appears in the full structural model.
    pub fn field_is_hidden(&self, name: &str, comment: Option<&StructuredComment>) -> bool {
        comment::flag(comment, &self.hidden_comment_key)
            || (!self.hidden_field_prefix.is_empty() && name.starts_with(&self.hidden_field_prefix))
    }

    /// True when a table is the history counterpart of a data table.
    pub fn table_is_history(&self, name: &str, comment: Option<&StructuredComment>) -> bool {
        comment::flag(comment, &self.history_comment_key)
            || (!self.history_table_suffix.is_empty() && name.ends_with(&self.history_table_suffix))
    }
}
