//! Errors raised by facet mutations and object construction.
//!
//! Routine game outcomes (a full slot, a stack at its limit) are not errors;
//! they come back as tagged outcome enums from the facet that decided them.
//! `ObjectError` is reserved for calls that should never happen with a
//! correct configuration: unknown names on a write path, duplicate keys,
//! a blueprint that fails validation.

use crate::blueprint::BlueprintError;
use crate::reference::ObjectId;

/// Why a seat refused an occupant change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OccupancyReason {
    /// Seat has no free places left.
    Full,
    /// That object is not sitting there.
    NotSeated(ObjectId),
    /// The object is already sitting there.
    AlreadySeated(ObjectId),
}

#[derive(Debug, Clone, PartialEq)]
pub enum ObjectError {
    Occupancy {
        seat: String,
        reason: OccupancyReason,
    },
    UnknownSeat(String),
    UnknownSlot(String),
    NotInSlot {
        slot: String,
        object: ObjectId,
    },
    UnknownPart(String),
    DuplicatePart(String),
    UnknownProperty(String),
    NotInContainer(ObjectId),
    ContainerLocked,
    ContainerClosed,
    WrongKey,
    NotLockable,
    InvalidBlueprint(Vec<BlueprintError>),
}

impl std::fmt::Display for ObjectError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ObjectError::Occupancy { seat, reason } => match reason {
                OccupancyReason::Full => write!(f, "Not enough free places in seat '{}'", seat),
                OccupancyReason::NotSeated(who) => {
                    write!(f, "{} is not sitting in seat '{}'", who, seat)
                }
                OccupancyReason::AlreadySeated(who) => {
                    write!(f, "{} is already sitting in seat '{}'", who, seat)
                }
            },
            ObjectError::UnknownSeat(name) => write!(f, "No seat named '{}'", name),
            ObjectError::UnknownSlot(name) => write!(f, "No slot named '{}'", name),
            ObjectError::NotInSlot { slot, object } => {
                write!(f, "{} is not attached to slot '{}'", object, slot)
            }
            ObjectError::UnknownPart(name) => write!(f, "No part named '{}'", name),
            ObjectError::DuplicatePart(name) => write!(f, "Part '{}' is defined twice", name),
            ObjectError::UnknownProperty(code) => write!(f, "Unknown material property '{}'", code),
            ObjectError::NotInContainer(id) => write!(f, "{} is not in the container", id),
            ObjectError::ContainerLocked => write!(f, "The container is locked"),
            ObjectError::ContainerClosed => write!(f, "The container is closed"),
            ObjectError::WrongKey => write!(f, "That key does not fit the lock"),
            ObjectError::NotLockable => write!(f, "The container has no lock"),
            ObjectError::InvalidBlueprint(errors) => {
                write!(f, "Invalid blueprint ({} problems)", errors.len())?;
                for e in errors {
                    write!(f, "; {}", e)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ObjectError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_the_seat() {
        let e = ObjectError::Occupancy {
            seat: "seat".to_string(),
            reason: OccupancyReason::Full,
        };
        assert_eq!(e.to_string(), "Not enough free places in seat 'seat'");
    }

    #[test]
    fn display_names_objects_by_id() {
        let e = ObjectError::Occupancy {
            seat: "bench".to_string(),
            reason: OccupancyReason::NotSeated(ObjectId(4)),
        };
        assert_eq!(e.to_string(), "#4 is not sitting in seat 'bench'");
        assert_eq!(
            ObjectError::NotInContainer(ObjectId(9)).to_string(),
            "#9 is not in the container"
        );
    }

    #[test]
    fn display_lists_blueprint_problems() {
        let e = ObjectError::InvalidBlueprint(vec![BlueprintError::EmptyClass]);
        let text = e.to_string();
        assert!(text.starts_with("Invalid blueprint (1 problems)"), "{text}");
    }
}
