//! Mass and gravity-dependent weight.
//!
//! Mass is in grams. Weight is always `mass × gravity` and has no setter;
//! it is recomputed whenever mass or gravity changes.

use serde::{Deserialize, Serialize};

use crate::reference::round6;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Mass {
    mass: f64,
    gravity: f64,
    weight: f64,
}

impl Mass {
    pub fn new(mass: f64, gravity: f64) -> Self {
        Self {
            mass,
            gravity,
            weight: mass * gravity,
        }
    }

    pub fn mass(&self) -> f64 {
        round6(self.mass)
    }

    pub fn gravity(&self) -> f64 {
        round6(self.gravity)
    }

    pub fn weight(&self) -> f64 {
        round6(self.weight)
    }

    pub fn set_mass(&mut self, mass: f64) {
        self.mass = mass;
        self.weight = self.mass * self.gravity;
    }

    pub fn set_gravity(&mut self, gravity: f64) {
        self.gravity = gravity;
        self.weight = self.mass * self.gravity;
    }

    /// Weight in milligrams.
    pub fn weight_mg(&self) -> f64 {
        round6(self.weight * 1000.0)
    }

    /// Weight in grams (the native unit).
    pub fn weight_gr(&self) -> f64 {
        round6(self.weight)
    }

    pub fn weight_kg(&self) -> f64 {
        round6(self.weight / 1000.0)
    }

    /// Weight in metric tonnes.
    pub fn weight_tn(&self) -> f64 {
        round6(self.weight / 1_000_000.0)
    }
}

impl Default for Mass {
    fn default() -> Self {
        Self::new(0.0, 1.0)
    }
}
