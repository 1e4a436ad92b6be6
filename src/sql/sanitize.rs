//! Identifier Validation Utilities
//!
//! Type and attribute names become table and column names verbatim (column
//! names lower-cased), so they are validated once when a descriptor is built.

use std::sync::OnceLock;

use regex::Regex;

fn identifier_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("identifier pattern is valid")
    })
}

/// Validate a type or attribute name
///
/// Rules:
/// - Must start with a letter or underscore
/// - Can only contain ASCII letters, digits and underscores
///
/// # Example
/// ```
/// use entity_mapper::sql::validate_identifier;
///
/// assert!(validate_identifier("seatingCapacity").is_ok());
/// assert!(validate_identifier("2fast").is_err());
/// assert!(validate_identifier("drop table").is_err());
/// ```
pub fn validate_identifier(name: &str) -> Result<(), String> {
    if name.is_empty() {
        return Err("Identifier cannot be empty".to_string());
    }

    if !identifier_pattern().is_match(name) {
        return Err(format!(
            "Invalid identifier '{}': must start with a letter or underscore and contain only letters, digits and underscores",
            name
        ));
    }

    Ok(())
}

/// Column name for an attribute
pub fn column_name(attribute_name: &str) -> String {
    attribute_name.to_lowercase()
}
