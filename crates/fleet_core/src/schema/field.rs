//! Field descriptor value types.
//!
//! # Responsibility
//! - Describe one `fleet` column: storage kind, display label, filter behavior.
//!
//! # Invariants
//! - Descriptors are `'static` and never mutated after construction.
//! - `allowed_values` is empty for free-text fields.

/// SQL storage kind of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Integer,
    Text,
}

impl FieldKind {
    /// Column type used in the `CREATE TABLE` statement.
    pub fn sql_type(self) -> &'static str {
        match self {
            Self::Integer => "INTEGER",
            Self::Text => "TEXT",
        }
    }
}

/// How a field is matched when building filter criteria from form input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryMode {
    /// Free-text entry. Switches to `LIKE` when the value contains `%`.
    ExactString,
    /// Dropdown selection, always an equality match.
    Dropdown,
    /// Radio selection, always an equality match.
    Radio,
}

impl QueryMode {
    /// Whether the input widget restricts values to `allowed_values`.
    pub fn is_choice(self) -> bool {
        match self {
            Self::ExactString => false,
            Self::Dropdown | Self::Radio => true,
        }
    }
}

/// Schema metadata for one `fleet` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDescriptor {
    /// Column name; part of the on-disk contract.
    pub column: &'static str,
    pub kind: FieldKind,
    /// Human-readable name shown by the presentation layer.
    pub label: &'static str,
    pub query_mode: QueryMode,
    /// Valid values for dropdown/radio fields.
    pub allowed_values: &'static [&'static str],
    /// Width hint for list views, in pixels.
    pub display_width: u16,
}

impl FieldDescriptor {
    /// Returns whether `value` is acceptable for this field's choice set.
    ///
    /// Free-text fields accept anything. Radio fields also accept the empty
    /// string, which means no option was selected.
    pub fn accepts(&self, value: &str) -> bool {
        match self.query_mode {
            QueryMode::ExactString => true,
            QueryMode::Dropdown => self.allowed_values.contains(&value),
            QueryMode::Radio => value.is_empty() || self.allowed_values.contains(&value),
        }
    }
}
