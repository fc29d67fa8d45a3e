//! Capabilities a facet needs from the objects it refers to.
//!
//! Seats, slots, containers and stacks never own the objects placed in them.
//! They record an [`ObjectRef`], a snapshot of identity, mass and volume taken
//! through the [`Physical`] capability at the moment of admission.

use serde::{Deserialize, Serialize};

/// Stable identifier of a game object inside the host world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ObjectId(pub u64);

impl std::fmt::Display for ObjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Anything with a physical presence that can sit, be attached or be stored.
pub trait Physical {
    fn id(&self) -> ObjectId;
    fn name(&self) -> &str;
    /// Mass in grams.
    fn mass(&self) -> f64;
    fn volume(&self) -> f64;
}

/// Extra capability needed to merge an object into a stack.
pub trait StackCandidate: Physical {
    /// Class tag; stacking requires exact equality.
    fn class(&self) -> &str;
    /// False once the object has been upgraded, damaged or otherwise altered.
    fn is_original(&self) -> bool;
    /// How many items the candidate already represents.
    fn stack_count(&self) -> u32;
    /// Mass of one item, without whatever the candidate already stacks.
    fn unit_mass(&self) -> f64;
}

/// Non-owning reference held by a facet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectRef {
    pub id: ObjectId,
    pub name: String,
    pub mass: f64,
    pub volume: f64,
}

impl ObjectRef {
    pub fn of<P: Physical + ?Sized>(obj: &P) -> Self {
        Self {
            id: obj.id(),
            name: obj.name().to_string(),
            mass: obj.mass(),
            volume: obj.volume(),
        }
    }
}

impl Physical for ObjectRef {
    fn id(&self) -> ObjectId {
        self.id
    }
    fn name(&self) -> &str {
        &self.name
    }
    fn mass(&self) -> f64 {
        self.mass
    }
    fn volume(&self) -> f64 {
        self.volume
    }
}

/// Round to 6 decimal places, the precision every reported quantity uses.
pub fn round6(value: f64) -> f64 {
    (value * 1_000_000.0).round() / 1_000_000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round6_truncates_noise() {
        assert_eq!(round6(3.0288000000001), 3.0288);
        assert_eq!(round6(0.0030288), 0.003029);
        assert_eq!(round6(0.0), 0.0);
    }

    #[test]
    fn object_ref_snapshots_capability() {
        let r = ObjectRef {
            id: ObjectId(7),
            name: "lamp".into(),
            mass: 900.0,
            volume: 2.0,
        };
        let copy = ObjectRef::of(&r);
        assert_eq!(copy, r);
        assert_eq!(ObjectId(7).to_string(), "#7");
    }
}
