use coc_objects::{ObjectError, ObjectId};

/// Errors from world-level operations.
#[derive(Debug, Clone, PartialEq)]
pub enum WorldError {
    NoSuchObject(ObjectId),
    NoSuchRoom(String),
    NoSuchBlueprint(String),
    /// The object already sits on, hangs from or lies inside something.
    ObjectHeld(ObjectId),
    /// An object cannot hold itself.
    SelfReference(ObjectId),
    /// The object is not seated on, attached to or stored in that holder.
    NotHeldBy { object: ObjectId, holder: ObjectId },
    Object(ObjectError),
}

impl From<ObjectError> for WorldError {
    fn from(e: ObjectError) -> Self {
        WorldError::Object(e)
    }
}

impl std::fmt::Display for WorldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WorldError::NoSuchObject(id) => write!(f, "No object {}", id),
            WorldError::NoSuchRoom(key) => write!(f, "No room '{}'", key),
            WorldError::NoSuchBlueprint(class) => write!(f, "No blueprint for class '{}'", class),
            WorldError::ObjectHeld(id) => write!(f, "Object {} is already held", id),
            WorldError::SelfReference(id) => write!(f, "Object {} cannot hold itself", id),
            WorldError::NotHeldBy { object, holder } => {
                write!(f, "Object {} is not held by {}", object, holder)
            }
            WorldError::Object(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for WorldError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            WorldError::Object(e) => Some(e),
            _ => None,
        }
    }
}
