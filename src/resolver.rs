//! Constructor resolution
//!
//! Matches values against the declared constructors of a type, either in the
//! caller's order or in any order, and builds the instance.

use tracing::debug;

use crate::attribute::AttributeList;
use crate::bag::ValueBag;
use crate::descriptor::{ConstructorDescriptor, Entity, TypeDescriptor};
use crate::error::{MapperError, Result};
use crate::types::{FieldType, Value};

/// Selects and invokes constructors
pub struct ConstructorResolver;

impl ConstructorResolver {
    /// Build through the first constructor whose parameters accept `values` position by position
    pub fn resolve_ordered(descriptor: &TypeDescriptor, values: &[Value]) -> Result<Box<dyn Entity>> {
        let value_types: Vec<FieldType> = values.iter().map(Value::value_type).collect();

        let constructor = descriptor
            .constructors()
            .iter()
            .find(|c| {
                c.arity() == value_types.len()
                    && c.params().iter().zip(&value_types).all(|(p, v)| p.accepts(v))
            })
            .ok_or_else(|| no_match(descriptor, &value_types))?;

        debug!(
            type_name = %descriptor.name(),
            arity = constructor.arity(),
            "resolved constructor in order"
        );
        invoke(descriptor, constructor, values.to_vec())
    }

    /// Build through the first constructor that every bag value can be assigned to
    ///
    /// Each parameter takes the first compatible value not already taken. The
    /// first fully assigned constructor wins; assignments are never revisited.
    pub fn resolve_unsorted(descriptor: &TypeDescriptor, bag: &ValueBag) -> Result<Box<dyn Entity>> {
        let values = bag.to_values();
        let value_types: Vec<FieldType> = values.iter().map(Value::value_type).collect();

        let (constructor, order) = descriptor
            .constructors()
            .iter()
            .find_map(|c| assign(c.params(), &value_types).map(|order| (c, order)))
            .ok_or_else(|| no_match(descriptor, &value_types))?;

        debug!(
            type_name = %descriptor.name(),
            arity = constructor.arity(),
            ?order,
            "resolved constructor from unordered values"
        );
        let arranged = order.into_iter().map(|i| values[i].clone()).collect();
        invoke(descriptor, constructor, arranged)
    }

    /// First constructor whose parameters can take every attribute, matched by declared type
    pub fn constructor_for_attributes<'d>(
        descriptor: &'d TypeDescriptor,
        attributes: &AttributeList,
    ) -> Result<&'d ConstructorDescriptor> {
        let declared: Vec<FieldType> = attributes.iter().map(|a| a.field_type.clone()).collect();
        descriptor
            .constructors()
            .iter()
            .find(|c| assign(c.params(), &declared).is_some())
            .ok_or_else(|| no_match(descriptor, &declared))
    }
}

/// Greedy assignment of available types to parameters; returns, per parameter,
/// the index of the value it takes
fn assign(params: &[FieldType], available: &[FieldType]) -> Option<Vec<usize>> {
    if params.len() != available.len() {
        return None;
    }

    let mut taken = vec![false; available.len()];
    let mut order = Vec::with_capacity(params.len());
    for param in params {
        let index = available
            .iter()
            .enumerate()
            .position(|(i, t)| !taken[i] && param.accepts(t))?;
        taken[index] = true;
        order.push(index);
    }
    Some(order)
}

fn invoke(
    descriptor: &TypeDescriptor,
    constructor: &ConstructorDescriptor,
    values: Vec<Value>,
) -> Result<Box<dyn Entity>> {
    constructor.invoke(values).map_err(|e| {
        MapperError::instantiation(
            format!(
                "Constructor {}({}) failed",
                descriptor.name(),
                signature(constructor.params())
            ),
            e,
        )
    })
}

fn no_match(descriptor: &TypeDescriptor, types: &[FieldType]) -> MapperError {
    MapperError::configuration(format!(
        "No constructor of '{}' matches ({})",
        descriptor.name(),
        signature(types)
    ))
}

fn signature(types: &[FieldType]) -> String {
    types
        .iter()
        .map(FieldType::simple_name)
        .collect::<Vec<_>>()
        .join(", ")
}
