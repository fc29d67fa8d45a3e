//! Physical object model for the Call of Cthulhu MUD.
//!
//! Every in-game object is a composition of facets: what it is made of,
//! how much it weighs, who sits on it, what hangs off it, what it holds and
//! how many identical copies it represents. Facets are plain data with
//! mass rollup; nothing here knows about rooms, persistence or commands.
//! Cross-object references are [`reference::ObjectRef`] snapshots resolved
//! by the host through [`reference::ObjectId`].
//!
//! # Module Overview
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`blueprint`] | Object blueprints, validation and the built-in catalogue |
//! | [`container`] | Bulk storage with open/closed state and key locks |
//! | [`error`] | `ObjectError` and seat occupancy reasons |
//! | [`info`] | Builder information panel |
//! | [`mass`] | Mass in grams, gravity, derived weight in several units |
//! | [`materials`] | Material property table and per-material overrides |
//! | [`object`] | `GameObject`, the composite of all facets |
//! | [`parts`] | Named components with material and mass |
//! | [`reference`] | Object ids, the `Physical` trait, reference snapshots |
//! | [`seats`] | Named seats with capacity and occupants |
//! | [`slots`] | Attachment points with capacity, volume and mass ceilings |
//! | [`stackable`] | Merging and splitting stacks of identical objects |

pub mod blueprint;
pub mod container;
pub mod error;
pub mod info;
pub mod mass;
pub mod materials;
pub mod object;
pub mod parts;
pub mod reference;
pub mod seats;
pub mod slots;
pub mod stackable;

pub use error::ObjectError;
pub use object::GameObject;
pub use reference::{ObjectId, ObjectRef, Physical, StackCandidate};
