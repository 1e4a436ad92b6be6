//! Synthetic instances for demos and tests
//!
//! Builds an instance through its zero-argument constructor and fills every
//! attribute with a plausible value: identifiers from a per-type generator,
//! well-known attribute names from curated pools, everything else by type.

use std::any::TypeId;
use std::collections::HashMap;

use chrono::{Duration, Local};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, RngCore, SeedableRng};
use tracing::{debug, warn};

use crate::attribute::{Attribute, AttributeIntrospector};
use crate::config::{MapperConfig, SyntheticConfig};
use crate::descriptor::{Entity, TypeDescriptor};
use crate::error::{MapperError, Result};
use crate::types::{FieldType, Primitive, Value};

// ============================================================================
// Value Pools
// ============================================================================

const ADDRESSES: &[&str] = &[
    "Cau Giay, Ha Noi",
    "Dong Da, Ha Noi",
    "Hai Ba Trung, Ha Noi",
    "Bach Mai, Ha Noi",
    "Mai Dong, Ha Noi",
    "Tu Liem, Ha Noi",
    "Co Nhue, Ha Noi",
];

const PHONES: &[&str] = &[
    "01253341234",
    "01253341235",
    "01253412343",
    "01253343412",
    "01252334134",
    "01253423431",
    "01213341234",
    "01213341235",
    "01213412343",
    "01213343412",
    "01212334134",
    "01213423431",
];

const FLOWER_NAMES: &[&str] = &["Lily", "Rose", "Sunflower", "Tulips"];

const COLOURS: &[&str] = &[
    "Red", "Yellow", "Orange", "Blue", "Green", "Cyan", "Purple", "White",
];

const NAMES: &[&str] = &[
    "Tran Van Thang",
    "Tran Thi Hai Linh",
    "Tran Nguyen Than",
    "Bui Van Tam",
    "Le Van Thang",
    "Le Thi Hai Linh",
    "Le Nguyen Than",
    "Le Van Tam",
    "Nguyen Van Thang",
    "Nguyen Thi Hai Linh",
    "Nguyen Nguyen Than",
    "Nguyen Van Tam",
    "Dinh Van Thang",
    "Dinh Thi Hai Linh",
    "Dinh Nguyen Than",
    "Dinh Van Tam",
];

const PRICES: &[f64] = &[
    5.0, 5.2, 5.5, 5.6, 5.7, 5.8, 6.0, 7.0, 7.2, 7.5, 7.6, 7.7, 7.8, 10.0, 10.2, 10.5, 10.6, 10.7,
    10.8,
];

const QUANTITIES: &[i32] = &[1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 20, 30, 40, 50, 60, 70, 80];

const DATE_FORMAT: &str = "%b %-d, %Y";

// ============================================================================
// Generators
// ============================================================================

/// Random sources used by the factory
///
/// Seeded once, never reset. Each registered type gets its own identifier
/// generator on first use.
#[derive(Debug)]
pub struct Generators {
    ints: StdRng,
    floats: StdRng,
    chars: StdRng,
    picks: StdRng,
    id_seeds: StdRng,
    ids: HashMap<TypeId, StdRng>,
}

impl Generators {
    pub fn from_entropy() -> Self {
        Self {
            ints: StdRng::from_entropy(),
            floats: StdRng::from_entropy(),
            chars: StdRng::from_entropy(),
            picks: StdRng::from_entropy(),
            id_seeds: StdRng::from_entropy(),
            ids: HashMap::new(),
        }
    }

    /// Reproducible generators
    pub fn seeded(seed: u64) -> Self {
        Self {
            ints: StdRng::seed_from_u64(seed),
            floats: StdRng::seed_from_u64(seed.wrapping_add(1)),
            chars: StdRng::seed_from_u64(seed.wrapping_add(2)),
            picks: StdRng::seed_from_u64(seed.wrapping_add(3)),
            id_seeds: StdRng::seed_from_u64(seed.wrapping_add(4)),
            ids: HashMap::new(),
        }
    }

    /// Next identifier for `type_id`, in `1..=max`
    pub fn next_id(&mut self, type_id: TypeId, max: i32) -> i32 {
        let seeds = &mut self.id_seeds;
        self.ids
            .entry(type_id)
            .or_insert_with(|| StdRng::seed_from_u64(seeds.next_u64()))
            .gen_range(1..=max.max(1))
    }

    /// Integer in `1..=max`
    pub fn next_int(&mut self, max: i32) -> i32 {
        self.ints.gen_range(1..=max.max(1))
    }

    /// Float in `[1, 2)`
    pub fn next_float(&mut self) -> f32 {
        self.floats.gen_range(1.0..2.0)
    }

    /// `length` random characters in `A..=Z`
    pub fn next_string(&mut self, length: usize) -> String {
        (0..length)
            .map(|_| char::from(self.chars.gen_range(b'A'..=b'Z')))
            .collect()
    }

    fn pick<T: Clone>(&mut self, pool: &[T]) -> Option<T> {
        pool.choose(&mut self.picks).cloned()
    }

    fn next_day_offset(&mut self, window_days: i64) -> i64 {
        self.ints.gen_range(0..window_days.max(1))
    }
}

impl Default for Generators {
    fn default() -> Self {
        Self::from_entropy()
    }
}

// ============================================================================
// Factory
// ============================================================================

/// Builds instances filled with plausible values
#[derive(Debug)]
pub struct SyntheticDataFactory {
    config: SyntheticConfig,
    generators: Generators,
    dates: Vec<String>,
}

impl SyntheticDataFactory {
    /// Factory with entropy-seeded generators
    pub fn new(config: SyntheticConfig) -> Self {
        Self::with_generators(config, Generators::from_entropy())
    }

    pub fn with_generators(config: SyntheticConfig, mut generators: Generators) -> Self {
        let today = Local::now().date_naive();
        let dates = (0..config.date_pool_size)
            .map(|_| {
                let offset = generators.next_day_offset(config.date_window_days);
                (today + Duration::days(offset))
                    .format(DATE_FORMAT)
                    .to_string()
            })
            .collect();

        Self {
            config,
            generators,
            dates,
        }
    }

    /// Dates the factory draws from for `date` attributes
    pub fn dates(&self) -> &[String] {
        &self.dates
    }

    /// Create an instance of `descriptor` with every attribute filled, using
    /// the default attribute discovery settings
    pub fn populate(&mut self, descriptor: &TypeDescriptor) -> Result<Box<dyn Entity>> {
        self.populate_with(&MapperConfig::default(), descriptor)
    }

    /// Create an instance of `descriptor` with every attribute filled
    ///
    /// `mapper_config` decides which attributes exist and which are identifiers.
    /// Attributes whose type has no generator are left at their constructed value.
    pub fn populate_with(
        &mut self,
        mapper_config: &MapperConfig,
        descriptor: &TypeDescriptor,
    ) -> Result<Box<dyn Entity>> {
        let constructor = descriptor.default_constructor().ok_or_else(|| {
            MapperError::configuration(format!(
                "Type '{}' has no zero-argument constructor",
                descriptor.name()
            ))
        })?;
        let mut instance = constructor.invoke(Vec::new()).map_err(|e| {
            MapperError::instantiation(
                format!("Constructor {}() failed", descriptor.name()),
                e,
            )
        })?;

        let attributes =
            AttributeIntrospector::new(mapper_config).attributes_auto(descriptor)?;

        for attribute in &attributes {
            let Some(value) = self.value_for(descriptor, attribute) else {
                warn!(
                    type_name = %descriptor.name(),
                    attribute = %attribute.name,
                    field_type = %attribute.field_type,
                    "attribute type is not supported, leaving it unset"
                );
                continue;
            };
            assign(descriptor, instance.as_mut(), attribute, value)?;
        }

        debug!(
            type_name = %descriptor.name(),
            attributes = attributes.len(),
            "populated synthetic instance"
        );
        Ok(instance)
    }

    fn value_for(&mut self, descriptor: &TypeDescriptor, attribute: &Attribute) -> Option<Value> {
        if attribute.is_identifier {
            let id = self
                .generators
                .next_id(descriptor.type_id(), self.config.max_id);
            return shaped_number(id, &attribute.field_type);
        }

        if let Some(value) = self.pool_value(descriptor.name(), &attribute.name) {
            if attribute.field_type.accepts(&value.value_type()) {
                return Some(value);
            }
        }

        self.random_value(&attribute.field_type)
    }

    fn pool_value(&mut self, type_name: &str, attribute_name: &str) -> Option<Value> {
        let name = attribute_name.to_lowercase();
        let g = &mut self.generators;

        if name.contains("address") {
            g.pick(ADDRESSES).map(Value::from)
        } else if name.contains("phone") {
            g.pick(PHONES).map(Value::from)
        } else if type_name.eq_ignore_ascii_case("Flower") && name.contains("name") {
            g.pick(FLOWER_NAMES).map(Value::from)
        } else if name.contains("colour") || name.contains("color") {
            g.pick(COLOURS).map(Value::from)
        } else if name.contains("name") {
            g.pick(NAMES).map(Value::from)
        } else if name.contains("price") {
            g.pick(PRICES).map(Value::Double)
        } else if name.contains("date") {
            g.pick(&self.dates).map(Value::Text)
        } else if name.contains("quantity") || name.contains("qty") {
            g.pick(QUANTITIES).map(Value::Int)
        } else {
            None
        }
    }

    fn random_value(&mut self, field_type: &FieldType) -> Option<Value> {
        let g = &mut self.generators;
        let max = self.config.max_random_int;

        if *field_type == FieldType::Text {
            return Some(Value::Text(g.next_string(self.config.text_length)));
        }

        let primitive = field_type.primitive()?;
        if primitive.is_floating() {
            let n = g.next_float();
            return Some(match primitive {
                Primitive::Float => Value::Float(n),
                _ => Value::Double(f64::from(n)),
            });
        }
        if primitive.is_integral() {
            let bound = match primitive {
                Primitive::Byte => i32::from(i8::MAX),
                Primitive::Short => max.min(i32::from(i16::MAX)),
                _ => max,
            };
            return shaped_number(g.next_int(bound), field_type);
        }

        match primitive {
            Primitive::Boolean => Some(Value::Boolean(false)),
            _ => None,
        }
    }
}

impl Default for SyntheticDataFactory {
    fn default() -> Self {
        Self::new(SyntheticConfig::default())
    }
}

fn bounded<T: TryFrom<i32>>(n: i32) -> Option<T> {
    T::try_from(n).ok()
}

/// Whole number shaped to the declared type; text renders it as digits
fn shaped_number(n: i32, field_type: &FieldType) -> Option<Value> {
    if *field_type == FieldType::Text {
        return Some(Value::Text(n.to_string()));
    }

    match field_type.primitive()? {
        Primitive::Int => Some(Value::Int(n)),
        Primitive::Long => Some(Value::Long(i64::from(n))),
        Primitive::Short => bounded(n).map(Value::Short),
        Primitive::Byte => bounded(n).map(Value::Byte),
        Primitive::Float => Some(Value::Float(n as f32)),
        Primitive::Double => Some(Value::Double(f64::from(n))),
        Primitive::Boolean | Primitive::Char => None,
    }
}

/// Write `value` into the field backing `attribute`, through the parent chain
fn assign(
    descriptor: &TypeDescriptor,
    instance: &mut dyn Entity,
    attribute: &Attribute,
    value: Value,
) -> Result<()> {
    let field = descriptor
        .lineage()
        .nth(attribute.depth())
        .and_then(|owner| owner.field(&attribute.name))
        .filter(|field| field.is_writable())
        .ok_or_else(|| {
            MapperError::configuration(format!(
                "Attribute '{}' of '{}' is not writable",
                attribute.name,
                descriptor.name()
            ))
        })?;

    let part = descriptor
        .project_mut(instance.as_any_mut(), attribute.depth())
        .ok_or_else(|| {
            MapperError::configuration(format!(
                "Instance does not embed the owner of '{}'",
                attribute.name
            ))
        })?;

    match field.write(part, value) {
        Some(Ok(())) => Ok(()),
        Some(Err(e)) => Err(MapperError::instantiation(
            format!("Writing '{}' of '{}' failed", attribute.name, descriptor.name()),
            e,
        )),
        None => Err(MapperError::configuration(format!(
            "Attribute '{}' of '{}' rejected the instance",
            attribute.name,
            descriptor.name()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::descriptor::FieldSpec;

    #[derive(Debug, Default, Clone, PartialEq)]
    struct Flower {
        id: i32,
        name: String,
        colour: String,
        price: f64,
    }

    #[derive(Debug, Default, Clone, PartialEq)]
    struct Gadget {
        serial_no: String,
        label: String,
        weight: f64,
        stock: i64,
        level: i8,
        ready: bool,
        initial: char,
        quantity: i32,
        price: i32,
    }

    crate::impl_entity!(Flower, Gadget);

    fn flower_descriptor() -> Arc<TypeDescriptor> {
        TypeDescriptor::builder::<Flower>("Flower")
            .field(FieldSpec::new("name", FieldType::TEXT).writer(|f: &mut Flower, v| {
                f.name = v.try_into()?;
                Ok(())
            }))
            .field(FieldSpec::new("id", FieldType::INT).writer(|f: &mut Flower, v| {
                f.id = v.try_into()?;
                Ok(())
            }))
            .field(FieldSpec::new("colour", FieldType::TEXT).writer(|f: &mut Flower, v| {
                f.colour = v.try_into()?;
                Ok(())
            }))
            .field(FieldSpec::new("price", FieldType::DOUBLE).writer(|f: &mut Flower, v| {
                f.price = v.try_into()?;
                Ok(())
            }))
            .constructor(vec![], |_| Ok(Flower::default()))
            .build()
            .unwrap()
    }

    fn gadget_descriptor() -> Arc<TypeDescriptor> {
        TypeDescriptor::builder::<Gadget>("Gadget")
            .field(FieldSpec::new("serialNo", FieldType::TEXT).writer(|g: &mut Gadget, v| {
                g.serial_no = v.try_into()?;
                Ok(())
            }))
            .field(FieldSpec::new("label", FieldType::TEXT).writer(|g: &mut Gadget, v| {
                g.label = v.try_into()?;
                Ok(())
            }))
            .field(FieldSpec::new("weight", FieldType::DOUBLE).writer(|g: &mut Gadget, v| {
                g.weight = v.try_into()?;
                Ok(())
            }))
            .field(FieldSpec::new("stock", FieldType::LONG).writer(|g: &mut Gadget, v| {
                g.stock = v.try_into()?;
                Ok(())
            }))
            .field(FieldSpec::new("level", FieldType::BYTE).writer(|g: &mut Gadget, v| {
                g.level = v.try_into()?;
                Ok(())
            }))
            .field(FieldSpec::new("ready", FieldType::BOOLEAN).writer(|g: &mut Gadget, v| {
                g.ready = v.try_into()?;
                Ok(())
            }))
            .field(FieldSpec::new("initial", FieldType::CHAR).writer(|g: &mut Gadget, v| {
                g.initial = v.try_into()?;
                Ok(())
            }))
            .field(FieldSpec::new("quantity", FieldType::INT).writer(|g: &mut Gadget, v| {
                g.quantity = v.try_into()?;
                Ok(())
            }))
            .field(FieldSpec::new("price", FieldType::INT).writer(|g: &mut Gadget, v| {
                g.price = v.try_into()?;
                Ok(())
            }))
            .constructor(vec![], |_| Ok(Gadget::default()))
            .build()
            .unwrap()
    }

    fn factory(seed: u64) -> SyntheticDataFactory {
        SyntheticDataFactory::with_generators(SyntheticConfig::default(), Generators::seeded(seed))
    }

    // =========================================================================
    // Pool Tests
    // =========================================================================

    #[test]
    fn test_flower_uses_pools() {
        let mut factory = factory(7);
        let built = factory.populate(&flower_descriptor()).unwrap();
        let flower = built.downcast_ref::<Flower>().unwrap();

        assert!((1..=100).contains(&flower.id));
        assert!(FLOWER_NAMES.contains(&flower.name.as_str()));
        assert!(COLOURS.contains(&flower.colour.as_str()));
        assert!(PRICES.contains(&flower.price));
    }

    #[test]
    fn test_pool_value_of_wrong_type_falls_back() {
        let mut factory = factory(11);
        let built = factory.populate(&gadget_descriptor()).unwrap();
        let gadget = built.downcast_ref::<Gadget>().unwrap();

        // price pool holds doubles; an int price gets a random integer
        assert!((1..=10000).contains(&gadget.price));
        assert!(QUANTITIES.contains(&gadget.quantity));
    }

    #[test]
    fn test_date_pool_within_window() {
        let factory = factory(3);
        let today = Local::now().date_naive();
        let last = today + Duration::days(60);

        assert_eq!(factory.dates().len(), 20);
        for date in factory.dates() {
            let parsed = chrono::NaiveDate::parse_from_str(date, DATE_FORMAT).unwrap();
            assert!(parsed >= today - Duration::days(1) && parsed <= last);
        }
    }

    // =========================================================================
    // Type-driven Tests
    // =========================================================================

    #[test]
    fn test_type_driven_values() {
        let mut factory = factory(5);
        let built = factory.populate(&gadget_descriptor()).unwrap();
        let gadget = built.downcast_ref::<Gadget>().unwrap();

        assert_eq!(gadget.label.len(), 20);
        assert!(gadget.label.chars().all(|c| c.is_ascii_uppercase()));
        assert!((1.0..2.0).contains(&gadget.weight));
        assert!((1..=10000).contains(&gadget.stock));
        assert!((1..=127).contains(&gadget.level));
        assert!(!gadget.ready);
    }

    #[test]
    fn test_unsupported_type_left_unset() {
        let mut factory = factory(5);
        let built = factory.populate(&gadget_descriptor()).unwrap();
        assert_eq!(built.downcast_ref::<Gadget>().unwrap().initial, '\0');
    }

    #[test]
    fn test_text_identifier_rendered_as_digits() {
        let mut factory = factory(9);
        let built = factory.populate(&gadget_descriptor()).unwrap();
        let serial: i32 = built
            .downcast_ref::<Gadget>()
            .unwrap()
            .serial_no
            .parse()
            .unwrap();
        assert!((1..=100).contains(&serial));
    }

    #[test]
    fn test_seeded_factories_agree() {
        let first = factory(42).populate(&gadget_descriptor()).unwrap();
        let second = factory(42).populate(&gadget_descriptor()).unwrap();
        assert_eq!(
            first.downcast_ref::<Gadget>(),
            second.downcast_ref::<Gadget>()
        );
    }

    #[test]
    fn test_custom_text_length() {
        let config = SyntheticConfig::builder().text_length(5).build();
        let mut factory = SyntheticDataFactory::with_generators(config, Generators::seeded(1));
        let built = factory.populate(&gadget_descriptor()).unwrap();
        assert_eq!(built.downcast_ref::<Gadget>().unwrap().label.len(), 5);
    }

    #[test]
    fn test_populate_with_custom_identifier_markers() {
        let config = MapperConfig::builder().identifier_markers(["label"]).build();
        let mut factory = factory(13);
        let built = factory.populate_with(&config, &gadget_descriptor()).unwrap();
        let gadget = built.downcast_ref::<Gadget>().unwrap();

        let label: i32 = gadget.label.parse().unwrap();
        assert!((1..=100).contains(&label));
        // serialNo is no longer an identifier under these markers
        assert_eq!(gadget.serial_no.len(), 20);
    }

    // =========================================================================
    // Generator Tests
    // =========================================================================

    #[test]
    fn test_identifier_generators_are_per_type() {
        let mut generators = Generators::seeded(1);
        let flower_ids: Vec<i32> = (0..50)
            .map(|_| generators.next_id(TypeId::of::<Flower>(), 100))
            .collect();
        assert!(flower_ids.iter().all(|id| (1..=100).contains(id)));

        let mut replay = Generators::seeded(1);
        replay.next_id(TypeId::of::<Flower>(), 100);
        let gadget_first = replay.next_id(TypeId::of::<Gadget>(), 100);
        assert!((1..=100).contains(&gadget_first));
    }

    #[test]
    fn test_number_shapes() {
        assert_eq!(shaped_number(7, &FieldType::LONG), Some(Value::Long(7)));
        assert_eq!(shaped_number(7, &FieldType::TEXT), Some(Value::from("7")));
        assert_eq!(shaped_number(7, &FieldType::DOUBLE), Some(Value::Double(7.0)));
        assert_eq!(shaped_number(7, &FieldType::BOOLEAN), None);
        assert_eq!(shaped_number(7, &FieldType::other("Uuid")), None);
    }

    // =========================================================================
    // Failure Tests
    // =========================================================================

    #[test]
    fn test_missing_default_constructor() {
        let descriptor = TypeDescriptor::builder::<Flower>("Flower")
            .constructor(vec![FieldType::INT], |a| {
                Ok(Flower {
                    id: a.arg()?,
                    ..Flower::default()
                })
            })
            .build()
            .unwrap();

        let err = factory(1).populate(&descriptor).unwrap_err();
        assert!(matches!(err, MapperError::Configuration(_)));
    }

    #[test]
    fn test_missing_writer() {
        let descriptor = TypeDescriptor::builder::<Flower>("Flower")
            .field(FieldSpec::new("name", FieldType::TEXT))
            .constructor(vec![], |_| Ok(Flower::default()))
            .build()
            .unwrap();

        let err = factory(1).populate(&descriptor).unwrap_err();
        assert!(matches!(err, MapperError::Configuration(_)));
        assert!(err.to_string().contains("not writable"));
    }

    #[test]
    fn test_failing_writer() {
        let descriptor = TypeDescriptor::builder::<Flower>("Flower")
            .field(
                FieldSpec::new("price", FieldType::DOUBLE)
                    .writer(|_: &mut Flower, _| Err("prices are frozen".into())),
            )
            .constructor(vec![], |_| Ok(Flower::default()))
            .build()
            .unwrap();

        let err = factory(1).populate(&descriptor).unwrap_err();
        assert!(matches!(err, MapperError::Instantiation { .. }));
    }

    #[test]
    fn test_failing_constructor() {
        let descriptor = TypeDescriptor::builder::<Flower>("Flower")
            .constructor(vec![], |_| Err("out of seeds".into()))
            .build()
            .unwrap();

        let err = factory(1).populate(&descriptor).unwrap_err();
        assert!(matches!(err, MapperError::Instantiation { .. }));
    }
}
