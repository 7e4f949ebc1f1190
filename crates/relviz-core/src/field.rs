//! Field resolution: one derived-attribute record per column.

use serde::{Serialize, Serializer};

use crate::comment::{self, StructuredComment};
use crate::conventions::Conventions;
use crate::fk::FkIndex;
use crate::source::ColumnRow;

/// Base types that are never required regardless of declared nullability.
/// Fixed policy carried over from the deployments Relviz models: these
/// columns are filled in by the database, not by the user.
const NEVER_REQUIRED_TYPES: [&str; 2] = ["timestamp", "date"];

/// Key marker of a column (`PRI`, `UNI`, `MUL`, or empty in the catalog).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyKind {
    #[default]
    None,
    Primary,
    Unique,
    #[serde(rename = "multi")]
    Multiple,
}

impl KeyKind {
    /// Parse the catalog's key marker. Anything unrecognized is no key.
    pub fn from_catalog(raw: &str) -> Self {
        match raw {
            "PRI" => Self::Primary,
            "UNI" => Self::Unique,
            "MUL" => Self::Multiple,
            _ => Self::None,
        }
    }

    /// Primary and unique keys both enforce uniqueness.
    pub fn is_unique(self) -> bool {
        matches!(self, Self::Primary | Self::Unique)
    }
}

/// Parsed length of a declared column type.
///
/// Three-state on purpose: a `text` column has no length, which is not the
/// same as a column whose type the catalog failed to report at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldLength {
    /// The column has no declared type.
    Unknown,
    /// The type carries no parenthesized length (`text`, `datetime`).
    None,
    /// The parenthesized length (`varchar(45)` is 45).
    Chars(u32),
}

impl FieldLength {
    /// Parse the parenthesized length out of a declared type.
    ///
    /// A suffix that is not a plain integer contributes its leading digits
    /// (`decimal(10,2)` is 10); a suffix with no digits degrades to 0,
    /// matching the integer coercion existing catalogs were resolved with.
    pub fn parse(data_type: Option<&str>) -> Self {
        let Some(ty) = data_type.filter(|t| !t.trim().is_empty()) else {
            return Self::Unknown;
        };
        match ty.split_once('(') {
            Some((_, suffix)) => {
                let digits: String = suffix.chars().take_while(|c| c.is_ascii_digit()).collect();
                Self::Chars(digits.parse().unwrap_or(0))
            }
            None => Self::None,
        }
    }
}

impl Serialize for FieldLength {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Self::Unknown => serializer.serialize_str("unknown"),
            Self::None => serializer.serialize_none(),
            Self::Chars(n) => serializer.serialize_u32(*n),
        }
    }
}

/// One column of one table, with every derived attribute resolved.
///
/// Foreign-key linkage is held in both directions as plain `table.column`
/// identifiers; `is_fk` holds exactly when `fk_reference` is present, and
/// `is_referenced` exactly when `referenced_by` is.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Field {
    pub name: String,
    /// Qualified `schema.table` owning this field.
    pub table: String,
    #[serde(rename = "type")]
    pub data_type: Option<String>,
    pub length: FieldLength,
    pub key: KeyKind,
    pub default: Option<String>,
    pub extra: Option<String>,
    pub comment: Option<StructuredComment>,
    pub required: bool,
    pub unique: bool,
    pub hidden: bool,
    pub is_fk: bool,
    pub fk_reference: Option<String>,
    pub is_referenced: bool,
    pub referenced_by: Option<String>,
}

impl Field {
    /// Resolve one catalog column row.
    ///
    /// Never fails: a malformed comment or missing type degrades to an
    /// absent value instead of aborting the table carrying the column.
    pub fn resolve(
        schema: &str,
        table: &str,
        row: &ColumnRow,
        fks: &FkIndex,
        conventions: &Conventions,
    ) -> Self {
        let comment = comment::parse_structured(row.comment.as_deref());
        let hidden = conventions.field_is_hidden(&row.name, comment.as_ref());
        let required = !row.nullable && !never_required(row.data_type.as_deref());

        let qualified = format!("{}.{}", table, row.name);
        let fk_reference = fks.reference_of(&qualified).map(str::to_string);
        let referenced_by = fks.referenced_by(&qualified).map(str::to_string);

        Self {
            name: row.name.clone(),
            table: format!("{}.{}", schema, table),
            data_type: row.data_type.clone(),
            length: FieldLength::parse(row.data_type.as_deref()),
            key: row.key,
            default: row.default.clone(),
            extra: row.extra.clone(),
            comment,
            required,
            unique: row.key.is_unique(),
            hidden,
            is_fk: fk_reference.is_some(),
            fk_reference,
            is_referenced: referenced_by.is_some(),
            referenced_by,
        }
    }

    /// The `column_format` hint from the structured comment, if set.
    pub fn format(&self) -> Option<&str> {
        self.comment.as_ref()?.get("column_format")?.as_str()
    }

    /// Referenced table and column as a `(table, column)` pair, if this
    /// field is a foreign key.
    pub fn fk_target(&self) -> Option<(&str, &str)> {
        self.fk_reference.as_deref()?.split_once('.')
    }
}

fn never_required(data_type: Option<&str>) -> bool {
    let Some(ty) = data_type else {
        return false;
    };
    let base = ty.split('(').next().unwrap_or(ty).trim().to_ascii_lowercase();
    NEVER_REQUIRED_TYPES.contains(&base.as_str())
}
