//! DDL Generation
//!
//! Generates `create table` statements from the attributes of a registered type.

use tracing::debug;

use crate::attribute::{Attribute, AttributeIntrospector, AttributeList};
use crate::config::MapperConfig;
use crate::descriptor::TypeDescriptor;
use crate::error::{MapperError, Result};

/// Schema generator for registered types
pub struct SchemaGenerator<'a> {
    config: &'a MapperConfig,
}

impl<'a> SchemaGenerator<'a> {
    /// Create a new schema generator with the given configuration
    pub fn new(config: &'a MapperConfig) -> Self {
        Self { config }
    }

    /// Generate the CREATE statement for a type
    ///
    /// Returns `None` when the type has no attributes to map.
    pub fn create_statement(
        &self,
        descriptor: &TypeDescriptor,
        select_serialisable_only: bool,
    ) -> Result<Option<String>> {
        let attributes = AttributeIntrospector::new(self.config)
            .attributes_of(descriptor, select_serialisable_only)?;
        self.generate_create_table(descriptor.name(), &attributes)
    }

    /// Generate a CREATE statement for an explicit attribute list
    pub fn generate_create_table(
        &self,
        table_name: &str,
        attributes: &AttributeList,
    ) -> Result<Option<String>> {
        if attributes.is_empty() {
            return Ok(None);
        }

        let column_defs = attributes
            .iter()
            .map(|attr| self.format_column_definition(attr))
            .collect::<Result<Vec<_>>>()?;

        debug!(table = %table_name, columns = column_defs.len(), "generated create statement");

        Ok(Some(format!(
            "create table {}({})",
            table_name,
            column_defs.join(", ")
        )))
    }

    /// Column type of an attribute
    ///
    /// `String` maps to the text type bounded by the override's length (or the
    /// configured default without an override); primitives keep their
    /// lower-cased type name; anything else has no mapping.
    pub fn column_type(&self, attribute: &Attribute) -> Result<String> {
        let type_name = attribute.effective_type_name();

        if type_name == "String" {
            let length = attribute
                .meta
                .as_ref()
                .map(|meta| meta.length)
                .unwrap_or(self.config.default_text_length);
            Ok(format!("{}({})", self.config.text_type, length))
        } else if attribute.field_type.is_primitive() {
            Ok(type_name.to_lowercase())
        } else {
            Err(MapperError::configuration(format!(
                "Attribute '{}' has unsupported type '{}'",
                attribute.name, type_name
            )))
        }
    }

    fn format_column_definition(&self, attribute: &Attribute) -> Result<String> {
        Ok(format!(
            "{} {}",
            attribute.column_name(),
            self.column_type(attribute)?
        ))
    }
}
