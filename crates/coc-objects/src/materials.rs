//! Material property tables.
//!
//! Every material carries the full base table of 27 properties. A material
//! listed in [`MATERIAL_OVERRIDES`] replaces some defaults with `CODE:value`
//! entries; any other name (including unknown ones) keeps the base table.
//!
//! | Code | Property            | Default |
//! |------|---------------------|---------|
//! | FL   | Flammable           | true    |
//! | CD   | Conductivity        | 0.0     |
//! | SP   | Soundproofing       | 0.0     |
//! | MG   | Magnetic            | 0.0     |
//! | RD   | Radioactive         | 0.0     |
//! | LU   | Luminosity          | 0.0     |
//! | PS   | Photosensitivity    | 0.0     |
//! | TH   | Toughness           | 0.0     |
//! | FP..IP | Phase-change points | 0.0   |
//! | FR..KR | Resistances       | 0.0     |
//! | CL   | Color               | white   |
//! | RF   | Reflectivity        | 0.0     |
//! | TR   | Transparency        | 0.0     |
//!
//! `SP` is shared by Soundproofing and Sublimation Point: an override sets
//! both, and a lookup by code answers with the first (Soundproofing).

use serde::{Deserialize, Serialize};

use crate::error::ObjectError;

/// A single property value. Overrides are parsed literally and never coerced
/// to the type of the default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PropertyValue {
    Flag(bool),
    Number(f64),
    Text(String),
}

impl PropertyValue {
    fn parse(raw: &str) -> Self {
        match raw {
            "True" => Self::Flag(true),
            "False" => Self::Flag(false),
            _ => match raw.parse::<f64>() {
                Ok(n) => Self::Number(n),
                Err(_) => Self::Text(raw.to_string()),
            },
        }
    }

    pub fn as_flag(&self) -> Option<bool> {
        match self {
            Self::Flag(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl std::fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Flag(b) => write!(f, "{}", b),
            Self::Number(n) => write!(f, "{}", n),
            Self::Text(s) => write!(f, "{}", s),
        }
    }
}

enum DefaultValue {
    Flag(bool),
    Number(f64),
    Text(&'static str),
}

/// Base property table: (name, code, default).
static PROPERTIES: [(&str, &str, DefaultValue); 27] = [
    ("Flammable", "FL", DefaultValue::Flag(true)),
    ("Conductivity", "CD", DefaultValue::Number(0.0)),
    ("Soundproofing", "SP", DefaultValue::Number(0.0)),
    ("Magnetic", "MG", DefaultValue::Number(0.0)),
    ("Radioactive", "RD", DefaultValue::Number(0.0)),
    ("Luminosity", "LU", DefaultValue::Number(0.0)),
    ("Photosensitivity", "PS", DefaultValue::Number(0.0)),
    ("Toughness", "TH", DefaultValue::Number(0.0)),
    ("Freezing Point", "FP", DefaultValue::Number(0.0)),
    ("Melting Point", "MP", DefaultValue::Number(0.0)),
    ("Evaporation Point", "EP", DefaultValue::Number(0.0)),
    ("Condensation Point", "CP", DefaultValue::Number(0.0)),
    ("Deposition Point", "DP", DefaultValue::Number(0.0)),
    ("Sublimation Point", "SP", DefaultValue::Number(0.0)),
    ("Vaporization Point", "VP", DefaultValue::Number(0.0)),
    ("Ionization Point", "IP", DefaultValue::Number(0.0)),
    ("Fire Resistance", "FR", DefaultValue::Number(0.0)),
    ("Cold Resistance", "CR", DefaultValue::Number(0.0)),
    ("Water Resistance", "WR", DefaultValue::Number(0.0)),
    ("Shock Resistance", "SR", DefaultValue::Number(0.0)),
    ("Acid Resistance", "AR", DefaultValue::Number(0.0)),
    ("Plasma Resistance", "PR", DefaultValue::Number(0.0)),
    ("Explosive Resistance", "ER", DefaultValue::Number(0.0)),
    ("Kinect Resistance", "KR", DefaultValue::Number(0.0)),
    ("Color", "CL", DefaultValue::Text("white")),
    ("Reflectivity", "RF", DefaultValue::Number(0.0)),
    ("Transparency", "TR", DefaultValue::Number(0.0)),
];

/// Per-material overrides, applied in order (a later entry for the same
/// code wins).
pub const MATERIAL_OVERRIDES: &[(&str, &[&str])] = &[
    (
        "wood",
        &[
            "SP:0.5", "TH:-1.0", "FR:2.0", "CR:0.9", "WR:1.5", "SR:-2.5", "AR:-2.1", "PR:3.0",
            "ER:3.0", "KR:1.0", "CR:brown",
        ],
    ),
    ("cloth", &["FL:True"]),
    ("vegetable hair", &["FL:True"]),
    ("iron", &["FL:False"]),
];

/// Names of every material with its own override table.
pub fn known_materials() -> impl Iterator<Item = &'static str> {
    MATERIAL_OVERRIDES.iter().map(|(name, _)| *name)
}

/// An immutable material property table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Material {
    name: String,
    /// Values aligned with the base table order.
    values: Vec<PropertyValue>,
}

impl Material {
    pub fn new(name: &str) -> Self {
        let mut values: Vec<PropertyValue> = PROPERTIES
            .iter()
            .map(|(_, _, d)| match d {
                DefaultValue::Flag(b) => PropertyValue::Flag(*b),
                DefaultValue::Number(n) => PropertyValue::Number(*n),
                DefaultValue::Text(s) => PropertyValue::Text(s.to_string()),
            })
            .collect();

        if let Some((_, overrides)) = MATERIAL_OVERRIDES.iter().find(|(m, _)| *m == name) {
            for entry in overrides.iter() {
                let Some((code, raw)) = entry.split_once(':') else {
                    log::warn!("Malformed override '{}' for material '{}'", entry, name);
                    continue;
                };
                for (i, (_, c, _)) in PROPERTIES.iter().enumerate() {
                    if *c == code {
                        values[i] = PropertyValue::parse(raw);
                    }
                }
            }
        }

        Self {
            name: name.to_string(),
            values,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Value for a property code such as `"FL"` or `"CL"`.
    pub fn get_property(&self, code: &str) -> Result<&PropertyValue, ObjectError> {
        PROPERTIES
            .iter()
            .position(|(_, c, _)| *c == code)
            .map(|i| &self.values[i])
            .ok_or_else(|| ObjectError::UnknownProperty(code.to_string()))
    }

    /// Value by full property name, e.g. `"Melting Point"`.
    pub fn property(&self, name: &str) -> Option<&PropertyValue> {
        PROPERTIES
            .iter()
            .position(|(n, _, _)| *n == name)
            .map(|i| &self.values[i])
    }

    /// All properties in table order as `(name, code, value)`.
    pub fn properties(&self) -> impl Iterator<Item = (&'static str, &'static str, &PropertyValue)> {
        PROPERTIES
            .iter()
            .zip(self.values.iter())
            .map(|((n, c, _), v)| (*n, *c, v))
    }

    pub fn is_flammable(&self) -> bool {
        self.values[0].as_flag().unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_table_complete_for_every_material() {
        for name in known_materials().chain(["unobtainium"]) {
            let m = Material::new(name);
            assert_eq!(m.properties().count(), 27, "{name} should carry all properties");
        }
    }

    #[test]
    fn unknown_material_keeps_defaults() {
        let m = Material::new("unobtainium");
        assert_eq!(m.get_property("FL"), Ok(&PropertyValue::Flag(true)));
        assert_eq!(
            m.get_property("CL"),
            Ok(&PropertyValue::Text("white".to_string()))
        );
        assert_eq!(m.get_property("TR"), Ok(&PropertyValue::Number(0.0)));
    }

    #[test]
    fn iron_is_not_flammable() {
        assert!(!Material::new("iron").is_flammable());
        assert!(Material::new("cloth").is_flammable());
    }

    #[test]
    fn wood_overrides_applied() {
        let wood = Material::new("wood");
        assert_eq!(wood.get_property("TH"), Ok(&PropertyValue::Number(-1.0)));
        assert_eq!(wood.get_property("FR"), Ok(&PropertyValue::Number(2.0)));
        assert_eq!(wood.get_property("KR"), Ok(&PropertyValue::Number(1.0)));
        // Color is untouched; the "brown" entry targets CR
        assert_eq!(wood.get_property("CL").unwrap().as_text(), Some("white"));
    }

    #[test]
    fn later_override_wins_and_keeps_raw_text() {
        let wood = Material::new("wood");
        assert_eq!(
            wood.get_property("CR"),
            Ok(&PropertyValue::Text("brown".to_string()))
        );
        assert_eq!(wood.get_property("CR").unwrap().as_number(), None);
    }

    #[test]
    fn shared_code_updates_both_properties() {
        let wood = Material::new("wood");
        assert_eq!(wood.property("Soundproofing"), Some(&PropertyValue::Number(0.5)));
        assert_eq!(
            wood.property("Sublimation Point"),
            Some(&PropertyValue::Number(0.5))
        );
    }

    #[test]
    fn unknown_code_is_an_error() {
        let m = Material::new("iron");
        assert_eq!(
            m.get_property("ZZ"),
            Err(ObjectError::UnknownProperty("ZZ".to_string()))
        );
        assert!(m.property("Sharpness").is_none());
    }
}
