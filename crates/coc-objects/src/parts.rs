//! Physical parts an object is built from.
//!
//! Configuration shape: `{part name: [material, amount, unit mass]}`.
//! A part contributes `amount × unit_mass` grams; [`Parts::update_total_mass`]
//! rolls those contributions up.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::ObjectError;
use crate::materials::{Material, PropertyValue};

/// One configuration entry: `[material, amount, unit mass]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartSpec(pub String, pub u32, pub f64);

impl PartSpec {
    pub fn new(material: &str, amount: u32, unit_mass: f64) -> Self {
        Self(material.to_string(), amount, unit_mass)
    }

    pub fn material(&self) -> &str {
        &self.0
    }

    pub fn amount(&self) -> u32 {
        self.1
    }

    pub fn unit_mass(&self) -> f64 {
        self.2
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Part {
    name: String,
    material: Material,
    amount: u32,
    unit_mass: f64,
}

impl Part {
    pub fn new(name: &str, spec: &PartSpec) -> Self {
        Self {
            name: name.to_string(),
            material: Material::new(spec.material()),
            amount: spec.amount(),
            unit_mass: spec.unit_mass(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn material(&self) -> &Material {
        &self.material
    }

    pub fn amount(&self) -> u32 {
        self.amount
    }

    pub fn unit_mass(&self) -> f64 {
        self.unit_mass
    }

    /// Mass this part contributes to its object.
    pub fn mass(&self) -> f64 {
        self.amount as f64 * self.unit_mass
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Parts {
    parts: BTreeMap<String, Part>,
    total_mass: f64,
}

impl Parts {
    /// Build one part per entry and compute the total mass.
    pub fn new<'a, I>(specs: I) -> Result<Self, ObjectError>
    where
        I: IntoIterator<Item = (&'a str, &'a PartSpec)>,
    {
        let mut parts = BTreeMap::new();
        for (name, spec) in specs {
            if parts.contains_key(name) {
                return Err(ObjectError::DuplicatePart(name.to_string()));
            }
            parts.insert(name.to_string(), Part::new(name, spec));
        }
        let mut built = Self {
            parts,
            total_mass: 0.0,
        };
        built.update_total_mass();
        Ok(built)
    }

    pub fn parts_amount(&self) -> usize {
        self.parts.len()
    }

    pub fn total_mass(&self) -> f64 {
        self.total_mass
    }

    pub fn update_total_mass(&mut self) -> f64 {
        self.total_mass = self.parts.values().map(Part::mass).sum();
        self.total_mass
    }

    pub fn iter(&self) -> impl Iterator<Item = &Part> {
        self.parts.values()
    }

    pub fn search_part(&self, name: &str) -> bool {
        self.parts.contains_key(name)
    }

    pub fn access_part(&self, name: &str) -> Option<&Part> {
        self.parts.get(name)
    }

    /// Material property of a named part, by property code.
    pub fn access_part_property(&self, name: &str, code: &str) -> Result<&PropertyValue, ObjectError> {
        let part = self
            .parts
            .get(name)
            .ok_or_else(|| ObjectError::UnknownPart(name.to_string()))?;
        part.material.get_property(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reference::round6;

    fn chair_specs() -> Vec<(String, PartSpec)> {
        vec![
            ("chair body".into(), PartSpec::new("wood", 1, 2500.0)),
            ("chair upholstery".into(), PartSpec::new("cloth", 1, 150.0)),
            ("chair filling".into(), PartSpec::new("vegetable hair", 1, 350.0)),
            ("chair screw".into(), PartSpec::new("iron", 16, 1.8)),
        ]
    }

    fn build(specs: &[(String, PartSpec)]) -> Result<Parts, ObjectError> {
        Parts::new(specs.iter().map(|(n, s)| (n.as_str(), s)))
    }

    #[test]
    fn total_mass_counts_every_unit() {
        let parts = build(&chair_specs()).unwrap();
        assert_eq!(parts.parts_amount(), 4);
        assert_eq!(round6(parts.total_mass()), 3028.8);
    }

    #[test]
    fn total_mass_independent_of_order() {
        let mut specs = chair_specs();
        let forward = build(&specs).unwrap().total_mass();
        specs.reverse();
        let backward = build(&specs).unwrap().total_mass();
        assert_eq!(round6(forward), round6(backward));
    }

    #[test]
    fn duplicate_part_rejected() {
        let mut specs = chair_specs();
        specs.push(("chair body".into(), PartSpec::new("iron", 1, 1.0)));
        assert_eq!(
            build(&specs),
            Err(ObjectError::DuplicatePart("chair body".into()))
        );
    }

    #[test]
    fn part_lookup_and_property() {
        let parts = build(&chair_specs()).unwrap();
        assert!(parts.search_part("chair screw"));
        assert!(!parts.search_part("chair leg"));
        let screw = parts.access_part("chair screw").unwrap();
        assert_eq!(screw.amount(), 16);
        assert_eq!(screw.unit_mass(), 1.8);
        assert_eq!(screw.material().name(), "iron");
        assert_eq!(
            parts.access_part_property("chair screw", "FL"),
            Ok(&PropertyValue::Flag(false))
        );
        assert_eq!(
            parts.access_part_property("chair leg", "FL"),
            Err(ObjectError::UnknownPart("chair leg".into()))
        );
    }

    #[test]
    fn empty_parts_weigh_nothing() {
        let parts = Parts::default();
        assert_eq!(parts.parts_amount(), 0);
        assert_eq!(parts.total_mass(), 0.0);
    }
}
