//! Attribute discovery
//!
//! Flattens a descriptor and its ancestors into an ordered attribute list,
//! optionally narrowed to the subset named by the type's selection accessor.

use std::collections::VecDeque;

use serde::Serialize;
use tracing::{debug, trace};

use crate::config::MapperConfig;
use crate::descriptor::TypeDescriptor;
use crate::error::{MapperError, Result};
use crate::sql::sanitize::column_name;
use crate::types::{AttributeMeta, FieldType};

/// A persistable, named, typed property of a type
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Attribute {
    pub name: String,
    pub field_type: FieldType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<AttributeMeta>,
    /// Name heuristically denotes a row identifier
    pub is_identifier: bool,
    /// Parent links between the introspected type and the declaring type
    #[serde(skip)]
    pub(crate) depth: usize,
}

impl Attribute {
    /// Lower-cased column name
    pub fn column_name(&self) -> String {
        column_name(&self.name)
    }

    /// Type name governing column mapping: the override's semantic type when
    /// present, the declared type's simple name otherwise
    pub fn effective_type_name(&self) -> &str {
        self.meta
            .as_ref()
            .and_then(AttributeMeta::semantic_type_name)
            .unwrap_or_else(|| self.field_type.simple_name())
    }

    /// 0 for own fields, 1 for the parent's, and so on
    pub fn depth(&self) -> usize {
        self.depth
    }
}

/// Ordered attributes of one type
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct AttributeList(Vec<Attribute>);

impl AttributeList {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Attribute> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[Attribute] {
        &self.0
    }

    pub fn names(&self) -> Vec<&str> {
        self.0.iter().map(|a| a.name.as_str()).collect()
    }

    pub fn get(&self, name: &str) -> Option<&Attribute> {
        self.0.iter().find(|a| a.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }
}

impl IntoIterator for AttributeList {
    type Item = Attribute;
    type IntoIter = std::vec::IntoIter<Attribute>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a AttributeList {
    type Item = &'a Attribute;
    type IntoIter = std::slice::Iter<'a, Attribute>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Discovers the persistable attributes of registered types
pub struct AttributeIntrospector<'a> {
    config: &'a MapperConfig,
}

impl<'a> AttributeIntrospector<'a> {
    pub fn new(config: &'a MapperConfig) -> Self {
        Self { config }
    }

    /// Attributes of `descriptor`
    ///
    /// Own fields come first, then each ancestor's attribute list (itself
    /// discovered without selection). Identifiers are prepended as they are
    /// encountered. With `select_serialisable_only`, the list holds exactly the
    /// names returned by the type's selection accessor.
    pub fn attributes_of(
        &self,
        descriptor: &TypeDescriptor,
        select_serialisable_only: bool,
    ) -> Result<AttributeList> {
        let lineage: Vec<&TypeDescriptor> = descriptor.lineage().collect();

        // ancestors are resolved deepest first so each level sees its parent's ordered list
        let mut inherited: Vec<Attribute> = Vec::new();
        for (depth, ancestor) in lineage.iter().enumerate().skip(1).rev() {
            let mut candidates = self.own_attributes(ancestor, depth);
            candidates.append(&mut inherited);
            inherited = identifiers_first(candidates);
        }

        let mut candidates = self.own_attributes(descriptor, 0);
        candidates.append(&mut inherited);

        if !select_serialisable_only {
            let attributes = identifiers_first(candidates);
            debug!(
                type_name = %descriptor.name(),
                count = attributes.len(),
                "discovered attributes"
            );
            return Ok(AttributeList(attributes));
        }

        let names = match descriptor.invoke_selection() {
            None => {
                return Err(MapperError::configuration(format!(
                    "Type '{}' has no selection accessor",
                    descriptor.name()
                )));
            }
            Some(Err(e)) => {
                return Err(MapperError::configuration(format!(
                    "Selection accessor of '{}' failed: {}",
                    descriptor.name(),
                    e
                )));
            }
            Some(Ok(names)) => names,
        };

        let mut selected: Vec<Attribute> = Vec::with_capacity(names.len());
        for name in &names {
            if selected.iter().any(|a| &a.name == name) {
                return Err(MapperError::configuration(format!(
                    "Selection of '{}' names attribute '{}' more than once",
                    descriptor.name(),
                    name
                )));
            }
            let attribute = candidates
                .iter()
                .find(|a| &a.name == name)
                .ok_or_else(|| {
                    MapperError::not_found(format!(
                        "Attribute '{}' selected by '{}' does not exist",
                        name,
                        descriptor.name()
                    ))
                })?;
            selected.push(attribute.clone());
        }

        let attributes = identifiers_first(selected);
        debug!(
            type_name = %descriptor.name(),
            count = attributes.len(),
            "discovered selected attributes"
        );
        Ok(AttributeList(attributes))
    }

    /// Selected attributes when the type declares a selection accessor, all attributes otherwise
    pub fn attributes_auto(&self, descriptor: &TypeDescriptor) -> Result<AttributeList> {
        self.attributes_of(descriptor, descriptor.has_selection())
    }

    fn own_attributes(&self, descriptor: &TypeDescriptor, depth: usize) -> Vec<Attribute> {
        descriptor
            .fields()
            .iter()
            .map(|field| {
                let is_identifier = self.config.is_identifier(field.name());
                trace!(
                    type_name = %descriptor.name(),
                    attribute = %field.name(),
                    depth,
                    is_identifier,
                    "collected attribute"
                );
                Attribute {
                    name: field.name().to_string(),
                    field_type: field.field_type().clone(),
                    meta: field.meta().cloned(),
                    is_identifier,
                    depth,
                }
            })
            .collect()
    }
}

fn identifiers_first(candidates: Vec<Attribute>) -> Vec<Attribute> {
    let mut ordered = VecDeque::with_capacity(candidates.len());
    for attribute in candidates {
        if attribute.is_identifier {
            ordered.push_front(attribute);
        } else {
            ordered.push_back(attribute);
        }
    }
    ordered.into()
}
