//! Registry of type descriptors, looked up by simple name or by Rust type

use std::any::TypeId;
use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use crate::descriptor::{Entity, TypeDescriptor};
use crate::error::{MapperError, Result};

/// Registered descriptors
#[derive(Debug, Default)]
pub struct TypeRegistry {
    by_name: HashMap<String, Arc<TypeDescriptor>>,
    by_type: HashMap<TypeId, Arc<TypeDescriptor>>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from descriptors, failing on the first conflict
    pub fn from_descriptors<I>(descriptors: I) -> Result<Self>
    where
        I: IntoIterator<Item = Arc<TypeDescriptor>>,
    {
        let mut registry = Self::new();
        for descriptor in descriptors {
            registry.register(descriptor)?;
        }
        Ok(registry)
    }

    /// Register a descriptor
    ///
    /// Both the simple name and the Rust type must be unused.
    pub fn register(&mut self, descriptor: Arc<TypeDescriptor>) -> Result<()> {
        if self.by_name.contains_key(descriptor.name()) {
            return Err(MapperError::configuration(format!(
                "Type '{}' is already registered",
                descriptor.name()
            )));
        }
        if let Some(existing) = self.by_type.get(&descriptor.type_id()) {
            return Err(MapperError::configuration(format!(
                "Type '{}' describes the same Rust type as '{}'",
                descriptor.name(),
                existing.name()
            )));
        }

        debug!(type_name = %descriptor.name(), "registered type");
        self.by_type
            .insert(descriptor.type_id(), Arc::clone(&descriptor));
        self.by_name
            .insert(descriptor.name().to_string(), descriptor);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&Arc<TypeDescriptor>> {
        self.by_name.get(name)
    }

    /// Descriptor by simple name, failing when unregistered
    pub fn descriptor(&self, name: &str) -> Result<&Arc<TypeDescriptor>> {
        self.get(name).ok_or_else(|| {
            MapperError::configuration(format!("Type '{}' is not registered", name))
        })
    }

    pub fn get_type<T: Entity>(&self) -> Option<&Arc<TypeDescriptor>> {
        self.by_type.get(&TypeId::of::<T>())
    }

    /// Descriptor of the runtime type of `instance`
    pub fn of_instance(&self, instance: &dyn Entity) -> Result<&Arc<TypeDescriptor>> {
        self.by_type.get(&instance.concrete_type_id()).ok_or_else(|| {
            MapperError::configuration(format!(
                "Type of instance {:?} is not registered",
                instance
            ))
        })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    /// Registered simple names, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.by_name.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}
