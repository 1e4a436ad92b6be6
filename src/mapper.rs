//! Mapper - main entry point
//!
//! Owns the type registry and the mapping configuration, and exposes every
//! mapping operation by registered type name or by instance.

use std::sync::Arc;

use crate::attribute::{AttributeIntrospector, AttributeList};
use crate::bag::ValueBag;
use crate::config::MapperConfig;
use crate::descriptor::{Entity, TypeDescriptor};
use crate::error::Result;
use crate::registry::TypeRegistry;
use crate::resolver::ConstructorResolver;
use crate::sql::ddl::SchemaGenerator;
use crate::sql::dml::RowGenerator;
use crate::synthetic::SyntheticDataFactory;
use crate::types::Value;

/// Metadata mapper over a set of registered types
#[derive(Debug, Default)]
pub struct Mapper {
    /// Registered type descriptors
    registry: TypeRegistry,
    /// Mapping configuration
    config: MapperConfig,
}

impl Mapper {
    /// Create an empty mapper from configuration
    pub fn new(config: MapperConfig) -> Self {
        Self {
            registry: TypeRegistry::new(),
            config,
        }
    }

    /// Create a mapper over an existing registry
    pub fn from_registry(registry: TypeRegistry, config: MapperConfig) -> Self {
        Self { registry, config }
    }

    pub fn registry(&self) -> &TypeRegistry {
        &self.registry
    }

    pub fn config(&self) -> &MapperConfig {
        &self.config
    }

    /// Register a type descriptor
    pub fn register(&mut self, descriptor: Arc<TypeDescriptor>) -> Result<()> {
        self.registry.register(descriptor)
    }

    /// Descriptor registered under `type_name`
    pub fn descriptor(&self, type_name: &str) -> Result<&Arc<TypeDescriptor>> {
        self.registry.descriptor(type_name)
    }

    // =========================================================================
    // Attribute Operations
    // =========================================================================

    /// Ordered attributes of a type, optionally narrowed to its selection
    pub fn attributes_of(
        &self,
        type_name: &str,
        select_serialisable_only: bool,
    ) -> Result<AttributeList> {
        let descriptor = self.descriptor(type_name)?;
        self.introspector()
            .attributes_of(descriptor, select_serialisable_only)
    }

    /// Attributes of a type, narrowed to its selection when it declares one
    pub fn attributes_auto(&self, type_name: &str) -> Result<AttributeList> {
        let descriptor = self.descriptor(type_name)?;
        self.introspector().attributes_auto(descriptor)
    }

    // =========================================================================
    // Construction Operations
    // =========================================================================

    /// Build an instance from values in constructor parameter order
    pub fn resolve_ordered(&self, type_name: &str, values: &[Value]) -> Result<Box<dyn Entity>> {
        ConstructorResolver::resolve_ordered(self.descriptor(type_name)?, values)
    }

    /// Build an instance from values in any order
    pub fn resolve_unsorted(&self, type_name: &str, values: &ValueBag) -> Result<Box<dyn Entity>> {
        ConstructorResolver::resolve_unsorted(self.descriptor(type_name)?, values)
    }

    /// Build an instance from the members of a JSON object, in any order
    pub fn resolve_json(
        &self,
        type_name: &str,
        properties: &serde_json::Value,
    ) -> Result<Box<dyn Entity>> {
        let descriptor = self.descriptor(type_name)?;
        let values = ValueBag::from_json(properties)?;
        ConstructorResolver::resolve_unsorted(descriptor, &values)
    }

    /// Build an instance filled with synthetic values
    pub fn populate(
        &self,
        type_name: &str,
        factory: &mut SyntheticDataFactory,
    ) -> Result<Box<dyn Entity>> {
        factory.populate_with(&self.config, self.descriptor(type_name)?)
    }

    // =========================================================================
    // SQL Operations
    // =========================================================================

    /// CREATE statement for a type; `None` when it has no attributes
    pub fn create_statement(
        &self,
        type_name: &str,
        select_serialisable_only: bool,
    ) -> Result<Option<String>> {
        let descriptor = self.descriptor(type_name)?;
        SchemaGenerator::new(&self.config).create_statement(descriptor, select_serialisable_only)
    }

    /// INSERT statement for an instance of a registered type
    pub fn insert_statement(
        &self,
        instance: &dyn Entity,
        select_serialisable_only: bool,
    ) -> Result<String> {
        let descriptor = self.registry.of_instance(instance)?;
        RowGenerator::new(&self.config).insert_statement(
            descriptor,
            instance,
            select_serialisable_only,
        )
    }

    // =========================================================================
    // Instance Operations
    // =========================================================================

    /// Attribute names and current values of an instance
    pub fn attribute_values(
        &self,
        instance: &dyn Entity,
        select_serialisable_only: bool,
    ) -> Result<Vec<(String, Value)>> {
        let descriptor = self.registry.of_instance(instance)?;
        RowGenerator::new(&self.config).attribute_values(
            descriptor,
            instance,
            select_serialisable_only,
        )
    }

    /// Current value of one attribute of an instance
    pub fn attribute_value(&self, instance: &dyn Entity, name: &str) -> Result<Value> {
        let descriptor = self.registry.of_instance(instance)?;
        RowGenerator::new(&self.config).attribute_value(descriptor, instance, name)
    }

    /// Aligned two-column dump of an instance's attributes
    pub fn render_object(&self, instance: &dyn Entity) -> Result<String> {
        let descriptor = self.registry.of_instance(instance)?;
        RowGenerator::new(&self.config).render_object(descriptor, instance)
    }

    fn introspector(&self) -> AttributeIntrospector<'_> {
        AttributeIntrospector::new(&self.config)
    }
}
