//! Object blueprints: the facet configuration an object type is built from.
//!
//! A blueprint is plain data, loadable from JSON, using the same nested
//! shapes builders write by hand:
//!
//! ```
//! use coc_objects::blueprint::{validate_blueprint, ObjectBlueprint};
//!
//! let json = r#"{
//!     "class": "Chair",
//!     "guid": "FNT-CHR-000001",
//!     "parts": {
//!         "body": ["wood", 1, 2500.0],
//!         "screw": ["iron", 16, 1.8]
//!     },
//!     "seats": { "seat": 1 }
//! }"#;
//! let blueprint: ObjectBlueprint = serde_json::from_str(json).unwrap();
//! assert!(validate_blueprint(&blueprint).is_empty());
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::marker::PhantomData;

use serde::de::{self, MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};

use crate::container::LockKind;
use crate::parts::PartSpec;
use crate::slots::SlotSpec;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContainerSpec {
    pub max_capacity: u32,
    pub max_volume: f64,
    pub max_mass: f64,
    #[serde(default)]
    pub lock: LockKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StackSpec {
    pub can_stack: bool,
    pub max_stack: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectBlueprint {
    /// Class tag, used for stacking identity.
    pub class: String,
    /// Catalogue identifier, e.g. `FNT-CHR-000001`.
    #[serde(default = "default_guid")]
    pub guid: String,
    /// Shown by `look` in a room.
    #[serde(default = "default_visible")]
    pub visible: bool,
    /// Intrinsic mass in grams, added to the facet totals.
    #[serde(default)]
    pub base_mass: f64,
    #[serde(default)]
    pub volume: f64,
    /// `{component: [material, amount, unit mass]}`; part names are prefixed
    /// with the object name when spawned.
    #[serde(default, deserialize_with = "unique_keys")]
    pub parts: BTreeMap<String, PartSpec>,
    /// `{seat name: capacity}`
    #[serde(default, deserialize_with = "unique_keys")]
    pub seats: BTreeMap<String, u32>,
    /// `{slot name: [max_capacity, max_volume, max_mass]}`
    #[serde(default, deserialize_with = "unique_keys")]
    pub slots: BTreeMap<String, SlotSpec>,
    #[serde(default)]
    pub container: Option<ContainerSpec>,
    #[serde(default)]
    pub stack: Option<StackSpec>,
}

fn default_guid() -> String {
    "AAA-AAA-000000".to_string()
}

fn default_visible() -> bool {
    true
}

/// Map field that fails on a repeated key instead of keeping the last one.
fn unique_keys<'de, D, V>(deserializer: D) -> Result<BTreeMap<String, V>, D::Error>
where
    D: Deserializer<'de>,
    V: Deserialize<'de>,
{
    struct UniqueKeys<V>(PhantomData<V>);

    impl<'de, V: Deserialize<'de>> Visitor<'de> for UniqueKeys<V> {
        type Value = BTreeMap<String, V>;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a map with unique keys")
        }

        fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
            let mut out = BTreeMap::new();
            while let Some((key, value)) = map.next_entry::<String, V>()? {
                if out.contains_key(&key) {
                    return Err(de::Error::custom(format_args!("duplicate key '{}'", key)));
                }
                out.insert(key, value);
            }
            Ok(out)
        }
    }

    deserializer.deserialize_map(UniqueKeys(PhantomData))
}

impl ObjectBlueprint {
    /// An empty blueprint of the given class.
    pub fn new(class: &str) -> Self {
        Self {
            class: class.to_string(),
            guid: default_guid(),
            visible: true,
            base_mass: 0.0,
            volume: 0.0,
            parts: BTreeMap::new(),
            seats: BTreeMap::new(),
            slots: BTreeMap::new(),
            container: None,
            stack: None,
        }
    }
}

/// Blueprint validation error.
#[derive(Debug, Clone, PartialEq)]
pub enum BlueprintError {
    EmptyClass,
    /// Mass or volume field is negative or not a number.
    InvalidQuantity { field: String, value: f64 },
    ZeroPartAmount(String),
    EmptyName(&'static str),
    ZeroMaxStack,
}

impl std::fmt::Display for BlueprintError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BlueprintError::EmptyClass => write!(f, "class is empty"),
            BlueprintError::InvalidQuantity { field, value } => {
                write!(f, "{} must be a non-negative number, got {}", field, value)
            }
            BlueprintError::ZeroPartAmount(part) => write!(f, "part '{}' has amount 0", part),
            BlueprintError::EmptyName(what) => write!(f, "{} with an empty name", what),
            BlueprintError::ZeroMaxStack => write!(f, "max_stack must be at least 1"),
        }
    }
}

fn check_quantity(errors: &mut Vec<BlueprintError>, field: String, value: f64) {
    if value.is_nan() || value < 0.0 {
        errors.push(BlueprintError::InvalidQuantity { field, value });
    }
}

/// Validate a blueprint, returning all errors found.
pub fn validate_blueprint(bp: &ObjectBlueprint) -> Vec<BlueprintError> {
    let mut errors = Vec::new();

    if bp.class.trim().is_empty() {
        errors.push(BlueprintError::EmptyClass);
    }
    check_quantity(&mut errors, "base_mass".into(), bp.base_mass);
    check_quantity(&mut errors, "volume".into(), bp.volume);

    for (name, spec) in &bp.parts {
        if name.trim().is_empty() {
            errors.push(BlueprintError::EmptyName("part"));
        }
        if spec.amount() == 0 {
            errors.push(BlueprintError::ZeroPartAmount(name.clone()));
        }
        check_quantity(&mut errors, format!("parts.{}.mass", name), spec.unit_mass());
    }

    if bp.seats.keys().any(|s| s.trim().is_empty()) {
        errors.push(BlueprintError::EmptyName("seat"));
    }

    for (name, spec) in &bp.slots {
        if name.trim().is_empty() {
            errors.push(BlueprintError::EmptyName("slot"));
        }
        check_quantity(&mut errors, format!("slots.{}.max_volume", name), spec.1);
        check_quantity(&mut errors, format!("slots.{}.max_mass", name), spec.2);
    }

    if let Some(c) = &bp.container {
        check_quantity(&mut errors, "container.max_volume".into(), c.max_volume);
        check_quantity(&mut errors, "container.max_mass".into(), c.max_mass);
    }

    if let Some(s) = &bp.stack {
        if s.max_stack == 0 {
            errors.push(BlueprintError::ZeroMaxStack);
        }
    }

    errors
}

// ── Built-in catalogue ─────────────────────────────────────────────────

/// Common wood chair, `FNT-CHR-000001`.
pub fn chair() -> ObjectBlueprint {
    let mut bp = ObjectBlueprint::new("Chair");
    bp.guid = "FNT-CHR-000001".to_string();
    bp.volume = 80.0;
    bp.parts = BTreeMap::from([
        ("body".to_string(), PartSpec::new("wood", 1, 2500.0)),
        ("upholstery".to_string(), PartSpec::new("cloth", 1, 150.0)),
        ("filling".to_string(), PartSpec::new("vegetable hair", 1, 350.0)),
        ("screw".to_string(), PartSpec::new("iron", 16, 1.8)),
    ]);
    bp.seats = BTreeMap::from([("seat".to_string(), 1)]);
    bp
}

/// Canvas backpack with two side pockets and a main compartment.
pub fn backpack() -> ObjectBlueprint {
    let mut bp = ObjectBlueprint::new("Backpack");
    bp.guid = "EQP-BPK-000001".to_string();
    bp.volume = 30.0;
    bp.parts = BTreeMap::from([
        ("bag".to_string(), PartSpec::new("cloth", 1, 900.0)),
        ("buckle".to_string(), PartSpec::new("iron", 2, 25.0)),
    ]);
    bp.slots = BTreeMap::from([
        ("left pocket".to_string(), SlotSpec(1, 2.0, 1500.0)),
        ("right pocket".to_string(), SlotSpec(1, 2.0, 1500.0)),
        ("main".to_string(), SlotSpec(4, 25.0, 12000.0)),
    ]);
    bp
}

/// Wooden sea chest with a brass lock.
pub fn sea_chest() -> ObjectBlueprint {
    let mut bp = ObjectBlueprint::new("SeaChest");
    bp.guid = "FNT-CHS-000001".to_string();
    bp.volume = 200.0;
    bp.parts = BTreeMap::from([
        ("box".to_string(), PartSpec::new("wood", 1, 14000.0)),
        ("hinge".to_string(), PartSpec::new("iron", 2, 120.0)),
    ]);
    bp.container = Some(ContainerSpec {
        max_capacity: 20,
        max_volume: 150.0,
        max_mass: 60000.0,
        lock: LockKind::Key("brass key".to_string()),
    });
    bp
}

/// Silver dollar; stacks up to 50.
pub fn silver_dollar() -> ObjectBlueprint {
    let mut bp = ObjectBlueprint::new("SilverDollar");
    bp.guid = "ITM-COI-000001".to_string();
    bp.base_mass = 26.73;
    bp.volume = 0.1;
    bp.stack = Some(StackSpec {
        can_stack: true,
        max_stack: 50,
    });
    bp
}

/// Every built-in blueprint keyed by class.
pub fn catalogue() -> BTreeMap<String, ObjectBlueprint> {
    [chair(), backpack(), sea_chest(), silver_dollar()]
        .into_iter()
        .map(|bp| (bp.class.clone(), bp))
        .collect()
}
