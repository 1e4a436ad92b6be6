//! Type descriptors: the registered metadata the mapper works from
//!
//! A persistable type describes itself once through [`TypeDescriptor::builder`]:
//! its declared fields (with optional readers, writers and metadata overrides),
//! its constructors, its getters, an optional parent descriptor and an optional
//! selection accessor. Descriptors are immutable after `build()` and shared as
//! `Arc<TypeDescriptor>`.

use std::any::{Any, TypeId};
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use tracing::debug;

use crate::error::{ArgError, BoxError, MapperError, Result};
use crate::sql::sanitize::validate_identifier;
use crate::types::{AttributeMeta, FieldType, Value};

// ============================================================================
// Entity
// ============================================================================

/// A value the mapper can read, build and populate
///
/// Implement with [`impl_entity!`](crate::impl_entity).
pub trait Entity: Any + fmt::Debug {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl dyn Entity {
    /// Runtime type of the concrete value behind the trait object
    pub fn concrete_type_id(&self) -> TypeId {
        Any::type_id(self.as_any())
    }

    pub fn downcast_ref<T: Entity>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }

    pub fn downcast_mut<T: Entity>(&mut self) -> Option<&mut T> {
        self.as_any_mut().downcast_mut::<T>()
    }
}

/// Implement [`Entity`] for one or more types
#[macro_export]
macro_rules! impl_entity {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl $crate::Entity for $ty {
                fn as_any(&self) -> &dyn ::std::any::Any {
                    self
                }

                fn as_any_mut(&mut self) -> &mut dyn ::std::any::Any {
                    self
                }
            }
        )+
    };
}

// ============================================================================
// Constructor Arguments
// ============================================================================

/// Positional arguments handed to a registered constructor
#[derive(Debug)]
pub struct Args {
    values: std::vec::IntoIter<Value>,
    position: usize,
}

impl Args {
    pub fn new(values: Vec<Value>) -> Self {
        Self {
            values: values.into_iter(),
            position: 0,
        }
    }

    /// Take the next value as is
    pub fn value(&mut self) -> std::result::Result<Value, ArgError> {
        let value = self
            .values
            .next()
            .ok_or(ArgError::Missing(self.position))?;
        self.position += 1;
        Ok(value)
    }

    /// Take the next value converted to `R`
    pub fn arg<R>(&mut self) -> std::result::Result<R, ArgError>
    where
        R: TryFrom<Value, Error = ArgError>,
    {
        let position = self.position;
        let value = self.value()?;
        R::try_from(value).map_err(|e| e.at(position))
    }

    /// Number of values not yet taken
    pub fn remaining(&self) -> usize {
        self.values.len()
    }
}

// ============================================================================
// Descriptor Parts
// ============================================================================

type FieldReader = Box<dyn Fn(&dyn Any) -> Option<Value> + Send + Sync>;
type FieldWriter = Box<dyn Fn(&mut dyn Any, Value) -> Option<std::result::Result<(), BoxError>> + Send + Sync>;
type GetterFn = Box<dyn Fn(&dyn Any) -> Option<std::result::Result<Value, BoxError>> + Send + Sync>;
type ConstructorFn = Box<dyn Fn(&mut Args) -> std::result::Result<Box<dyn Entity>, BoxError> + Send + Sync>;
type SelectionFn = Box<dyn Fn() -> std::result::Result<Vec<String>, BoxError> + Send + Sync>;

/// A declared field of a type
pub struct FieldDescriptor {
    name: String,
    field_type: FieldType,
    meta: Option<AttributeMeta>,
    reader: Option<FieldReader>,
    writer: Option<FieldWriter>,
}

impl FieldDescriptor {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn field_type(&self) -> &FieldType {
        &self.field_type
    }

    pub fn meta(&self) -> Option<&AttributeMeta> {
        self.meta.as_ref()
    }

    /// Whether the field can be read directly, without a getter
    pub fn is_readable(&self) -> bool {
        self.reader.is_some()
    }

    pub fn is_writable(&self) -> bool {
        self.writer.is_some()
    }

    /// Direct read; `None` when the field has no reader or `target` is not the owning type
    pub(crate) fn read(&self, target: &dyn Any) -> Option<Value> {
        self.reader.as_ref().and_then(|read| read(target))
    }

    pub(crate) fn write(
        &self,
        target: &mut dyn Any,
        value: Value,
    ) -> Option<std::result::Result<(), BoxError>> {
        self.writer.as_ref().and_then(|write| write(target, value))
    }
}

impl fmt::Debug for FieldDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldDescriptor")
            .field("name", &self.name)
            .field("field_type", &self.field_type)
            .field("meta", &self.meta)
            .field("readable", &self.is_readable())
            .field("writable", &self.is_writable())
            .finish()
    }
}

/// One constructor candidate
pub struct ConstructorDescriptor {
    params: Vec<FieldType>,
    build: ConstructorFn,
}

impl ConstructorDescriptor {
    /// Declared parameter types, in order
    pub fn params(&self) -> &[FieldType] {
        &self.params
    }

    pub fn arity(&self) -> usize {
        self.params.len()
    }

    pub(crate) fn invoke(
        &self,
        values: Vec<Value>,
    ) -> std::result::Result<Box<dyn Entity>, BoxError> {
        (self.build)(&mut Args::new(values))
    }
}

impl fmt::Debug for ConstructorDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConstructorDescriptor")
            .field("params", &self.params)
            .finish()
    }
}

/// A zero-argument accessor, e.g. `getName`
pub struct GetterDescriptor {
    name: String,
    call: GetterFn,
}

impl GetterDescriptor {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// `None` when `target` is not the owning type
    pub(crate) fn call(&self, target: &dyn Any) -> Option<std::result::Result<Value, BoxError>> {
        (self.call)(target)
    }
}

impl fmt::Debug for GetterDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GetterDescriptor")
            .field("name", &self.name)
            .finish()
    }
}

/// Projection from a value to the parent part it embeds
trait Projection: Send + Sync {
    fn project<'a>(&self, target: &'a dyn Any) -> Option<&'a dyn Any>;
    fn project_mut<'a>(&self, target: &'a mut dyn Any) -> Option<&'a mut dyn Any>;
}

struct Upcast<T, P> {
    upcast: fn(&T) -> &P,
    upcast_mut: fn(&mut T) -> &mut P,
}

impl<T: Entity, P: Entity> Projection for Upcast<T, P> {
    fn project<'a>(&self, target: &'a dyn Any) -> Option<&'a dyn Any> {
        let child = target.downcast_ref::<T>()?;
        Some((self.upcast)(child).as_any())
    }

    fn project_mut<'a>(&self, target: &'a mut dyn Any) -> Option<&'a mut dyn Any> {
        let child = target.downcast_mut::<T>()?;
        Some((self.upcast_mut)(child).as_any_mut())
    }
}

struct ParentLink {
    descriptor: Arc<TypeDescriptor>,
    projection: Box<dyn Projection>,
}

// ============================================================================
// TypeDescriptor
// ============================================================================

/// Registered metadata of one persistable type
pub struct TypeDescriptor {
    name: String,
    type_id: TypeId,
    fields: Vec<FieldDescriptor>,
    constructors: Vec<ConstructorDescriptor>,
    getters: Vec<GetterDescriptor>,
    parent: Option<ParentLink>,
    selection: Option<SelectionFn>,
}

impl TypeDescriptor {
    /// Start describing the Rust type `T` under the simple name `name`
    pub fn builder<T: Entity>(name: impl Into<String>) -> TypeDescriptorBuilder<T> {
        TypeDescriptorBuilder::new(name)
    }

    /// Simple name, used as the table name
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// Fields declared directly by this type, in declaration order
    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    /// Constructor candidates, in declaration order
    pub fn constructors(&self) -> &[ConstructorDescriptor] {
        &self.constructors
    }

    pub fn getters(&self) -> &[GetterDescriptor] {
        &self.getters
    }

    pub fn parent(&self) -> Option<&Arc<TypeDescriptor>> {
        self.parent.as_ref().map(|link| &link.descriptor)
    }

    /// Whether the type declares a selection accessor
    pub fn has_selection(&self) -> bool {
        self.selection.is_some()
    }

    /// This descriptor followed by each ancestor, nearest first
    pub fn lineage(&self) -> impl Iterator<Item = &TypeDescriptor> {
        std::iter::successors(Some(self), |d| d.parent_descriptor())
    }

    /// Declared field by exact name (own fields only)
    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Getter by name, ignoring ASCII case (own getters only)
    pub fn getter_ignore_case(&self, name: &str) -> Option<&GetterDescriptor> {
        self.getters
            .iter()
            .find(|g| g.name.eq_ignore_ascii_case(name))
    }

    /// The zero-argument constructor, if declared
    pub fn default_constructor(&self) -> Option<&ConstructorDescriptor> {
        self.constructors.iter().find(|c| c.params.is_empty())
    }

    pub(crate) fn invoke_selection(
        &self,
    ) -> Option<std::result::Result<Vec<String>, BoxError>> {
        self.selection.as_ref().map(|select| select())
    }

    /// Walk `depth` parent links down from a value of this type
    pub(crate) fn project<'a>(&self, target: &'a dyn Any, depth: usize) -> Option<&'a dyn Any> {
        let mut current = target;
        let mut descriptor = self;
        for _ in 0..depth {
            let link = descriptor.parent.as_ref()?;
            current = link.projection.project(current)?;
            descriptor = &link.descriptor;
        }
        Some(current)
    }

    pub(crate) fn project_mut<'a>(
        &self,
        target: &'a mut dyn Any,
        depth: usize,
    ) -> Option<&'a mut dyn Any> {
        let mut current = target;
        let mut descriptor = self;
        for _ in 0..depth {
            let link = descriptor.parent.as_ref()?;
            current = link.projection.project_mut(current)?;
            descriptor = &link.descriptor;
        }
        Some(current)
    }

    fn parent_descriptor(&self) -> Option<&TypeDescriptor> {
        self.parent.as_ref().map(|link| link.descriptor.as_ref())
    }
}

impl fmt::Debug for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeDescriptor")
            .field("name", &self.name)
            .field("fields", &self.fields)
            .field("constructors", &self.constructors)
            .field("getters", &self.getters)
            .field("parent", &self.parent_descriptor().map(|p| p.name()))
            .field("has_selection", &self.has_selection())
            .finish()
    }
}

// ============================================================================
// Builders
// ============================================================================

/// Declaration of one field of `T`
pub struct FieldSpec<T> {
    name: String,
    field_type: FieldType,
    meta: Option<AttributeMeta>,
    reader: Option<FieldReader>,
    writer: Option<FieldWriter>,
    _marker: PhantomData<fn(T)>,
}

impl<T: Entity> FieldSpec<T> {
    /// A field with no direct reader; values are read through a getter
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
            meta: None,
            reader: None,
            writer: None,
            _marker: PhantomData,
        }
    }

    /// Make the field directly readable
    pub fn reader<F>(mut self, read: F) -> Self
    where
        F: Fn(&T) -> Value + Send + Sync + 'static,
    {
        self.reader = Some(Box::new(move |target: &dyn Any| {
            target.downcast_ref::<T>().map(&read)
        }));
        self
    }

    /// Make the field directly writable
    pub fn writer<F>(mut self, write: F) -> Self
    where
        F: Fn(&mut T, Value) -> std::result::Result<(), BoxError> + Send + Sync + 'static,
    {
        self.writer = Some(Box::new(move |target: &mut dyn Any, value: Value| {
            target.downcast_mut::<T>().map(|t| write(t, value))
        }));
        self
    }

    /// Attach a metadata override
    pub fn meta(mut self, meta: AttributeMeta) -> Self {
        self.meta = Some(meta);
        self
    }

    fn into_descriptor(self) -> FieldDescriptor {
        FieldDescriptor {
            name: self.name,
            field_type: self.field_type,
            meta: self.meta,
            reader: self.reader,
            writer: self.writer,
        }
    }
}

/// Builder for TypeDescriptor
pub struct TypeDescriptorBuilder<T> {
    name: String,
    fields: Vec<FieldDescriptor>,
    constructors: Vec<ConstructorDescriptor>,
    getters: Vec<GetterDescriptor>,
    parent: Option<(ParentLink, TypeId)>,
    selections: Vec<SelectionFn>,
    _marker: PhantomData<fn(T)>,
}

impl<T: Entity> TypeDescriptorBuilder<T> {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
            constructors: Vec::new(),
            getters: Vec::new(),
            parent: None,
            selections: Vec::new(),
            _marker: PhantomData,
        }
    }

    /// Declare `parent` as the parent type; `T` embeds a `P`
    pub fn extends<P: Entity>(
        mut self,
        parent: &Arc<TypeDescriptor>,
        upcast: fn(&T) -> &P,
        upcast_mut: fn(&mut T) -> &mut P,
    ) -> Self {
        let link = ParentLink {
            descriptor: Arc::clone(parent),
            projection: Box::new(Upcast { upcast, upcast_mut }),
        };
        self.parent = Some((link, TypeId::of::<P>()));
        self
    }

    pub fn field(mut self, field: FieldSpec<T>) -> Self {
        self.fields.push(field.into_descriptor());
        self
    }

    /// Declare a constructor with the given parameter types
    pub fn constructor<F>(mut self, params: Vec<FieldType>, build: F) -> Self
    where
        F: Fn(&mut Args) -> std::result::Result<T, BoxError> + Send + Sync + 'static,
    {
        self.constructors.push(ConstructorDescriptor {
            params,
            build: Box::new(move |args: &mut Args| {
                build(args).map(|value| Box::new(value) as Box<dyn Entity>)
            }),
        });
        self
    }

    /// Declare a getter, e.g. `getName`
    pub fn getter<F>(mut self, name: impl Into<String>, call: F) -> Self
    where
        F: Fn(&T) -> std::result::Result<Value, BoxError> + Send + Sync + 'static,
    {
        self.getters.push(GetterDescriptor {
            name: name.into(),
            call: Box::new(move |target: &dyn Any| target.downcast_ref::<T>().map(&call)),
        });
        self
    }

    /// Declare the selection accessor returning the persisted subset of attribute names
    pub fn selection<F>(mut self, accessor: F) -> Self
    where
        F: Fn() -> std::result::Result<Vec<String>, BoxError> + Send + Sync + 'static,
    {
        self.selections.push(Box::new(accessor));
        self
    }

    /// Validate the declaration and build the descriptor
    pub fn build(self) -> Result<Arc<TypeDescriptor>> {
        validate_identifier(&self.name).map_err(MapperError::configuration)?;

        if self.selections.len() > 1 {
            return Err(MapperError::configuration(format!(
                "Type '{}' declares {} selection accessors, expected at most one",
                self.name,
                self.selections.len()
            )));
        }

        let parent = match self.parent {
            Some((link, parent_type)) => {
                if TypeDescriptor::type_id(&link.descriptor) != parent_type {
                    return Err(MapperError::configuration(format!(
                        "Type '{}' extends '{}' with an upcast to a different Rust type",
                        self.name,
                        link.descriptor.name()
                    )));
                }
                Some(link)
            }
            None => None,
        };

        let mut seen: Vec<&str> = Vec::new();
        for field in &self.fields {
            validate_identifier(&field.name).map_err(MapperError::configuration)?;
            if seen.contains(&field.name.as_str()) {
                return Err(MapperError::configuration(format!(
                    "Type '{}' declares attribute '{}' twice",
                    self.name, field.name
                )));
            }
            seen.push(&field.name);
        }

        if let Some(link) = &parent {
            for ancestor in link.descriptor.lineage() {
                if let Some(clash) = ancestor.fields().iter().find(|f| seen.contains(&f.name()))
                {
                    return Err(MapperError::configuration(format!(
                        "Attribute '{}' of type '{}' shadows the same attribute of '{}'",
                        clash.name(),
                        self.name,
                        ancestor.name()
                    )));
                }
            }
        }

        debug!(
            type_name = %self.name,
            fields = self.fields.len(),
            constructors = self.constructors.len(),
            getters = self.getters.len(),
            parent = parent.as_ref().map(|l| l.descriptor.name()),
            "built type descriptor"
        );

        Ok(Arc::new(TypeDescriptor {
            name: self.name,
            type_id: TypeId::of::<T>(),
            fields: self.fields,
            constructors: self.constructors,
            getters: self.getters,
            parent,
            selection: self.selections.into_iter().next(),
        }))
    }
}
