//! # entity-mapper
//!
//! A descriptor-driven metadata mapper for plain Rust data types.
//!
//! Each persistable type is described once in a [`TypeDescriptor`]: its fields,
//! constructors, getters, parent type and an optional selection of persisted
//! attributes. From those descriptors the mapper discovers attribute lists,
//! picks constructors for loose bags of values, and emits SQL text.
//!
//! ## Features
//!
//! - **Attribute Discovery**: Own and inherited attributes, identifiers first
//! - **Selected Subsets**: A per-type accessor narrows the persisted attributes
//! - **Constructor Resolution**: Ordered and unordered value matching
//! - **SQL Text**: `create table` and `insert into` statements
//! - **Synthetic Data**: Plausible instances for demos and tests
//!
//! ## Quick Start
//!
//! ```rust
//! use entity_mapper::{
//!     impl_entity, FieldSpec, FieldType, Mapper, MapperConfig, TypeDescriptor, Value, ValueBag,
//! };
//!
//! #[derive(Debug, Default)]
//! struct Item {
//!     id: i32,
//!     label: String,
//!     price: f64,
//! }
//!
//! impl_entity!(Item);
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let item = TypeDescriptor::builder::<Item>("Item")
//!         .field(FieldSpec::new("id", FieldType::INT).reader(|i: &Item| Value::Int(i.id)))
//!         .field(FieldSpec::new("label", FieldType::TEXT).reader(|i: &Item| Value::from(i.label.as_str())))
//!         .field(FieldSpec::new("price", FieldType::DOUBLE).reader(|i: &Item| Value::Double(i.price)))
//!         .constructor(vec![FieldType::INT, FieldType::TEXT, FieldType::DOUBLE], |args| {
//!             Ok(Item { id: args.arg()?, label: args.arg()?, price: args.arg()? })
//!         })
//!         .build()?;
//!
//!     let mut mapper = Mapper::new(MapperConfig::default());
//!     mapper.register(item)?;
//!
//!     assert_eq!(
//!         mapper.create_statement("Item", false)?.as_deref(),
//!         Some("create table Item(id int, label varchar(100), price double)")
//!     );
//!
//!     // Values may come in any order
//!     let pen = mapper.resolve_unsorted(
//!         "Item",
//!         &ValueBag::new().with("label", "Pen").with("price", 1.5).with("id", 7),
//!     )?;
//!
//!     assert_eq!(
//!         mapper.insert_statement(pen.as_ref(), false)?,
//!         "insert into Item(id,label,price) values(7,'Pen',1.5)"
//!     );
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Configuration
//!
//! ```rust
//! use entity_mapper::MapperConfig;
//!
//! let config = MapperConfig::builder()
//!     .default_text_length(100)        // Text bound without a metadata override
//!     .text_type("varchar")            // Text column keyword
//!     .identifier_markers(["id", "no"]) // Name fragments marking identifiers
//!     .build();
//! ```
//!
//! ## Inheritance
//!
//! A type embedding its parent declares the link with
//! [`TypeDescriptorBuilder::extends`]. Inherited attributes follow the type's
//! own attributes, and values are read and written through the embedded parent.

pub mod attribute;
pub mod bag;
pub mod config;
pub mod descriptor;
pub mod error;
pub mod mapper;
pub mod registry;
pub mod resolver;
pub mod sql;
pub mod synthetic;
pub mod types;

// Re-export main types for convenience
pub use attribute::{Attribute, AttributeIntrospector, AttributeList};
pub use bag::ValueBag;
pub use config::{MapperConfig, MapperConfigBuilder, SyntheticConfig, SyntheticConfigBuilder};
pub use descriptor::{
    Args, ConstructorDescriptor, Entity, FieldDescriptor, FieldSpec, GetterDescriptor,
    TypeDescriptor, TypeDescriptorBuilder,
};
pub use error::{ArgError, BoxError, MapperError, Result};
pub use mapper::Mapper;
pub use registry::TypeRegistry;
pub use resolver::ConstructorResolver;
pub use synthetic::{Generators, SyntheticDataFactory};
pub use types::{AttributeMeta, FieldType, Primitive, Value};

// Re-export SQL generators for advanced users
pub use sql::ddl::SchemaGenerator;
pub use sql::dml::RowGenerator;
pub use sql::sanitize::validate_identifier;
