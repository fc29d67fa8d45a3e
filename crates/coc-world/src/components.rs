//! ECS components attached to object entities, plus room records.

use serde::{Deserialize, Serialize};

use coc_objects::ObjectId;

/// A room objects can lie in. Gravity applies to everything inside it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Room {
    pub key: String,
    pub gravity: f64,
}

/// Where an object is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Location {
    /// Lying loose in a room.
    Room(String),
    /// Seated on, attached to or stored in another object.
    Held(ObjectId),
}

impl Location {
    pub fn holder(&self) -> Option<ObjectId> {
        match self {
            Location::Held(id) => Some(*id),
            Location::Room(_) => None,
        }
    }
}
