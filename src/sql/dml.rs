//! DML Generation
//!
//! Reads attribute values off instances and renders `insert into` statements.

use tracing::debug;

use crate::attribute::{Attribute, AttributeIntrospector, AttributeList};
use crate::config::MapperConfig;
use crate::descriptor::{Entity, TypeDescriptor};
use crate::error::{MapperError, Result};
use crate::types::Value;

/// Row generator for instances of registered types
pub struct RowGenerator<'a> {
    config: &'a MapperConfig,
}

impl<'a> RowGenerator<'a> {
    pub fn new(config: &'a MapperConfig) -> Self {
        Self { config }
    }

    /// Generate the INSERT statement for an instance
    ///
    /// String values are wrapped in single quotes verbatim; no escaping is applied.
    pub fn insert_statement(
        &self,
        descriptor: &TypeDescriptor,
        instance: &dyn Entity,
        select_serialisable_only: bool,
    ) -> Result<String> {
        let attributes = self.attributes(descriptor, instance, select_serialisable_only)?;

        if attributes.is_empty() {
            return Ok(format!("insert into {}", descriptor.name()));
        }

        let mut columns = Vec::with_capacity(attributes.len());
        let mut literals = Vec::with_capacity(attributes.len());
        for attribute in &attributes {
            let value = read_attribute(descriptor, instance, attribute)?;
            columns.push(attribute.column_name());
            literals.push(render_literal(attribute, &value)?);
        }

        debug!(table = %descriptor.name(), columns = columns.len(), "generated insert statement");

        Ok(format!(
            "insert into {}({}) values({})",
            descriptor.name(),
            columns.join(","),
            literals.join(",")
        ))
    }

    /// Name and current value of each attribute, in attribute order
    pub fn attribute_values(
        &self,
        descriptor: &TypeDescriptor,
        instance: &dyn Entity,
        select_serialisable_only: bool,
    ) -> Result<Vec<(String, Value)>> {
        self.attributes(descriptor, instance, select_serialisable_only)?
            .iter()
            .map(|a| Ok((a.name.clone(), read_attribute(descriptor, instance, a)?)))
            .collect()
    }

    /// Current value of one attribute, declared by the type or any ancestor
    pub fn attribute_value(
        &self,
        descriptor: &TypeDescriptor,
        instance: &dyn Entity,
        name: &str,
    ) -> Result<Value> {
        let attributes = self.attributes(descriptor, instance, false)?;
        let attribute = attributes.get(name).ok_or_else(|| {
            MapperError::not_found(format!(
                "Attribute '{}' does not exist in '{}'",
                name,
                descriptor.name()
            ))
        })?;
        read_attribute(descriptor, instance, attribute)
    }

    /// Two-column dump of every attribute, names right-aligned
    ///
    /// ```text
    /// >Object: Item
    ///    id   7
    /// label   Pen
    /// price   1.5
    /// ```
    pub fn render_object(&self, descriptor: &TypeDescriptor, instance: &dyn Entity) -> Result<String> {
        let values = self.attribute_values(descriptor, instance, false)?;
        let width = values.iter().map(|(name, _)| name.len()).max().unwrap_or(0);

        let mut lines = Vec::with_capacity(values.len() + 1);
        lines.push(format!(">Object: {}", descriptor.name()));
        for (name, value) in &values {
            lines.push(format!("{:>width$}   {}", name, value, width = width));
        }
        Ok(lines.join("\n"))
    }

    fn attributes(
        &self,
        descriptor: &TypeDescriptor,
        instance: &dyn Entity,
        select_serialisable_only: bool,
    ) -> Result<AttributeList> {
        if instance.concrete_type_id() != descriptor.type_id() {
            return Err(MapperError::configuration(format!(
                "Instance is not a '{}'",
                descriptor.name()
            )));
        }
        AttributeIntrospector::new(self.config).attributes_of(descriptor, select_serialisable_only)
    }
}

/// Read an attribute directly if its field has a reader, otherwise through a
/// `get<name>` getter found on the type or an ancestor
pub(crate) fn read_attribute(
    descriptor: &TypeDescriptor,
    instance: &dyn Entity,
    attribute: &Attribute,
) -> Result<Value> {
    let target = instance.as_any();

    let direct = descriptor
        .lineage()
        .nth(attribute.depth)
        .and_then(|owner| owner.field(&attribute.name))
        .zip(descriptor.project(target, attribute.depth))
        .and_then(|(field, part)| field.read(part));
    if let Some(value) = direct {
        return Ok(value);
    }

    let getter_name = format!("get{}", attribute.name);
    for (depth, level) in descriptor.lineage().enumerate() {
        let Some(getter) = level.getter_ignore_case(&getter_name) else {
            continue;
        };
        let Some(part) = descriptor.project(target, depth) else {
            continue;
        };
        match getter.call(part) {
            Some(Ok(value)) => return Ok(value),
            Some(Err(e)) => {
                return Err(MapperError::instantiation(
                    format!("Getter '{}' of '{}' failed", getter.name(), level.name()),
                    e,
                ));
            }
            None => continue,
        }
    }

    Err(MapperError::configuration(format!(
        "Attribute '{}' of '{}' is not readable and has no getter",
        attribute.name,
        descriptor.name()
    )))
}

/// SQL literal of an attribute value
pub fn render_literal(attribute: &Attribute, value: &Value) -> Result<String> {
    let type_name = attribute.effective_type_name();

    if type_name == "String" {
        Ok(format!("'{}'", value))
    } else if attribute.field_type.is_primitive() {
        Ok(value.to_string())
    } else {
        Err(MapperError::configuration(format!(
            "Attribute '{}' has unsupported type '{}'",
            attribute.name, type_name
        )))
    }
}
