//! Save/Load for object worlds, and blueprint loading.
//!
//! Worlds are written with bincode. Each object is stored whole together
//! with its location; entities are rebuilt on load with their original ids.
//! Blueprints are authored as JSON.

use std::collections::BTreeMap;
use std::io::{Read, Write};

use serde::{Deserialize, Serialize};

use coc_objects::blueprint::{validate_blueprint, ObjectBlueprint};
use coc_objects::GameObject;

use crate::components::{Location, Room};
use crate::world::ObjectWorld;

/// Version number for save file format (increment when format changes)
pub const SAVE_VERSION: u32 = 1;

/// Serializable snapshot of an object world
#[derive(Serialize, Deserialize)]
pub struct SaveData {
    /// Save format version
    pub version: u32,
    /// Next id to hand out
    pub next_id: u64,
    pub rooms: Vec<Room>,
    pub blueprints: Vec<ObjectBlueprint>,
    pub entities: Vec<SerializableEntity>,
}

/// One object entity with its components
#[derive(Serialize, Deserialize)]
pub struct SerializableEntity {
    pub object: GameObject,
    pub location: Location,
}

/// Save the complete world to a writer
pub fn save_world<W: Write>(writer: W, world: &ObjectWorld) -> Result<(), SaveError> {
    let entities: Vec<SerializableEntity> = world
        .entries()
        .into_iter()
        .map(|(object, location)| SerializableEntity { object, location })
        .collect();

    let save_data = SaveData {
        version: SAVE_VERSION,
        next_id: world.next_id(),
        rooms: world.rooms().cloned().collect(),
        blueprints: world.blueprints().cloned().collect(),
        entities,
    };

    bincode::serialize_into(writer, &save_data)?;
    log::info!(
        "Saved world: {} rooms, {} objects",
        save_data.rooms.len(),
        save_data.entities.len()
    );
    Ok(())
}

/// Load a world from a reader
pub fn load_world<R: Read>(reader: R) -> Result<ObjectWorld, SaveError> {
    let save_data: SaveData = bincode::deserialize_from(reader)?;

    if save_data.version != SAVE_VERSION {
        return Err(SaveError::VersionMismatch {
            expected: SAVE_VERSION,
            found: save_data.version,
        });
    }

    let object_count = save_data.entities.len();
    let world = ObjectWorld::restore(
        save_data.rooms,
        save_data.blueprints,
        save_data
            .entities
            .into_iter()
            .map(|e| (e.object, e.location))
            .collect(),
        save_data.next_id,
    );
    log::info!("Loaded world: {} objects", object_count);
    Ok(world)
}

/// Parse a JSON array of blueprints, keyed by class. Blueprints that fail
/// validation are skipped with a warning.
pub fn load_blueprints(json: &str) -> Result<BTreeMap<String, ObjectBlueprint>, SaveError> {
    let parsed: Vec<ObjectBlueprint> = serde_json::from_str(json)?;
    let mut blueprints = BTreeMap::new();
    for bp in parsed {
        let errors = validate_blueprint(&bp);
        if !errors.is_empty() {
            for e in &errors {
                log::warn!("Blueprint '{}': {}", bp.class, e);
            }
            continue;
        }
        blueprints.insert(bp.class.clone(), bp);
    }
    log::info!("Loaded {} blueprints", blueprints.len());
    Ok(blueprints)
}

/// Errors that can occur during save/load
#[derive(Debug)]
pub enum SaveError {
    Io(std::io::Error),
    Bincode(Box<bincode::ErrorKind>),
    Json(serde_json::Error),
    VersionMismatch { expected: u32, found: u32 },
}

impl From<std::io::Error> for SaveError {
    fn from(e: std::io::Error) -> Self {
        SaveError::Io(e)
    }
}

impl From<Box<bincode::ErrorKind>> for SaveError {
    fn from(e: Box<bincode::ErrorKind>) -> Self {
        SaveError::Bincode(e)
    }
}

impl From<serde_json::Error> for SaveError {
    fn from(e: serde_json::Error) -> Self {
        SaveError::Json(e)
    }
}

impl std::fmt::Display for SaveError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SaveError::Io(e) => write!(f, "IO error: {}", e),
            SaveError::Bincode(e) => write!(f, "Serialization error: {}", e),
            SaveError::Json(e) => write!(f, "Blueprint JSON error: {}", e),
            SaveError::VersionMismatch { expected, found } => {
                write!(
                    f,
                    "Save version mismatch: expected {}, found {}",
                    expected, found
                )
            }
        }
    }
}

impl std::error::Error for SaveError {}
