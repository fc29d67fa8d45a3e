//! Object world for the Call of Cthulhu MUD.
//!
//! Hosts composite objects from `coc_objects` as `hecs` entities inside
//! rooms with their own gravity, and carries out the operations that involve
//! two objects at once: sitting, attaching, storing and stacking.
//!
//! # Example
//!
//! ```rust
//! use coc_objects::blueprint;
//! use coc_world::prelude::*;
//!
//! let mut world = ObjectWorld::new();
//! world.add_room("parlour", 1.0);
//! let chair = world.spawn(&blueprint::chair(), "Old chair", "parlour").unwrap();
//! assert_eq!(world.object(chair).unwrap().mass().weight_kg(), 3.0288);
//! ```

pub mod components;
pub mod error;
pub mod persistence;
pub mod world;

/// Commonly used types for convenient importing
pub mod prelude {
    pub use crate::components::{Location, Room};
    pub use crate::error::WorldError;
    pub use crate::persistence::{load_blueprints, load_world, save_world, SaveError};
    pub use crate::world::ObjectWorld;
}
