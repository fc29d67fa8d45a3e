//! Bulk storage with open/closed and lock state.
//!
//! Admission uses the same ceiling pattern as slots, preceded by two state
//! checks: the facet must be an enabled container and it must be open.

use serde::{Deserialize, Serialize};

use crate::error::ObjectError;
use crate::reference::{ObjectId, ObjectRef, Physical};

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LockKind {
    #[default]
    None,
    /// Opened by the key with this id.
    Key(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Lock {
    pub kind: LockKind,
    pub locked: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContainerRejection {
    NotAContainer,
    Closed,
    NoCapacity,
    ExceedsMaxVolume,
    ExceedsMaxMass,
}

impl ContainerRejection {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NotAContainer => "not_a_container",
            Self::Closed => "closed",
            Self::NoCapacity => "no_capacity",
            Self::ExceedsMaxVolume => "exceeds_max_volume",
            Self::ExceedsMaxMass => "exceeds_max_mass",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContainerOutcome {
    Stored,
    Rejected(ContainerRejection),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Container {
    is_container: bool,
    is_open: bool,
    lock: Lock,
    max_capacity: u32,
    max_volume: f64,
    max_mass: f64,
    contents: Vec<ObjectRef>,
    total_mass: f64,
}

impl Default for Container {
    /// A disabled facet, present only so mass rollup is uniform.
    fn default() -> Self {
        Self {
            is_container: false,
            is_open: false,
            lock: Lock::default(),
            max_capacity: 0,
            max_volume: 0.0,
            max_mass: 0.0,
            contents: Vec::new(),
            total_mass: 0.0,
        }
    }
}

impl Container {
    /// An enabled, open container.
    pub fn new(max_capacity: u32, max_volume: f64, max_mass: f64, lock: LockKind) -> Self {
        Self {
            is_container: true,
            is_open: true,
            lock: Lock {
                kind: lock,
                locked: false,
            },
            max_capacity,
            max_volume,
            max_mass,
            contents: Vec::new(),
            total_mass: 0.0,
        }
    }

    pub fn is_container(&self) -> bool {
        self.is_container
    }

    pub fn is_open(&self) -> bool {
        self.is_open
    }

    pub fn is_locked(&self) -> bool {
        self.lock.locked
    }

    pub fn lock_kind(&self) -> &LockKind {
        &self.lock.kind
    }

    pub fn max_capacity(&self) -> u32 {
        self.max_capacity
    }

    pub fn contents(&self) -> &[ObjectRef] {
        &self.contents
    }

    pub fn used_volume(&self) -> f64 {
        self.contents.iter().map(|o| o.volume).sum()
    }

    pub fn total_mass(&self) -> f64 {
        self.total_mass
    }

    pub fn update_total_mass(&mut self) -> f64 {
        self.total_mass = self.contents.iter().map(|o| o.mass).sum();
        self.total_mass
    }

    pub fn open(&mut self) -> Result<(), ObjectError> {
        if self.lock.locked {
            return Err(ObjectError::ContainerLocked);
        }
        self.is_open = true;
        Ok(())
    }

    pub fn close(&mut self) {
        self.is_open = false;
    }

    /// Lock with a key. Closes the container.
    pub fn lock(&mut self, key: &str) -> Result<(), ObjectError> {
        self.check_key(key)?;
        self.is_open = false;
        self.lock.locked = true;
        Ok(())
    }

    pub fn unlock(&mut self, key: &str) -> Result<(), ObjectError> {
        self.check_key(key)?;
        self.lock.locked = false;
        Ok(())
    }

    fn check_key(&self, key: &str) -> Result<(), ObjectError> {
        match &self.lock.kind {
            LockKind::None => Err(ObjectError::NotLockable),
            LockKind::Key(k) if k == key => Ok(()),
            LockKind::Key(_) => Err(ObjectError::WrongKey),
        }
    }

    pub fn put<P: Physical + ?Sized>(&mut self, obj: &P) -> ContainerOutcome {
        let obj = ObjectRef::of(obj);
        let reason = if !self.is_container {
            Some(ContainerRejection::NotAContainer)
        } else if !self.is_open {
            Some(ContainerRejection::Closed)
        } else if self.contents.len() as u32 >= self.max_capacity {
            Some(ContainerRejection::NoCapacity)
        } else if self.used_volume() + obj.volume > self.max_volume {
            Some(ContainerRejection::ExceedsMaxVolume)
        } else if self.total_mass + obj.mass > self.max_mass {
            Some(ContainerRejection::ExceedsMaxMass)
        } else {
            None
        };

        if let Some(reason) = reason {
            log::warn!("{} not stored: {}", obj.name, reason.as_str());
            return ContainerOutcome::Rejected(reason);
        }
        log::debug!("{} stored", obj.name);
        self.contents.push(obj);
        self.update_total_mass();
        ContainerOutcome::Stored
    }

    pub fn take(&mut self, obj: ObjectId) -> Result<ObjectRef, ObjectError> {
        if !self.is_open {
            return Err(ObjectError::ContainerClosed);
        }
        let idx = self
            .contents
            .iter()
            .position(|o| o.id == obj)
            .ok_or(ObjectError::NotInContainer(obj))?;
        let taken = self.contents.remove(idx);
        self.update_total_mass();
        log::debug!("{} taken out", taken.name);
        Ok(taken)
    }

    /// Replace the stored snapshot of a content whose mass or volume changed.
    /// Works whether the container is open or not.
    pub fn refresh(&mut self, obj: &ObjectRef) -> bool {
        let Some(held) = self.contents.iter_mut().find(|o| o.id == obj.id) else {
            return false;
        };
        *held = obj.clone();
        self.update_total_mass();
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reference::ObjectId;

    fn item(id: u64, name: &str, volume: f64, mass: f64) -> ObjectRef {
        ObjectRef {
            id: ObjectId(id),
            name: name.to_string(),
            mass,
            volume,
        }
    }

    fn chest() -> Container {
        Container::new(3, 10.0, 5000.0, LockKind::Key("brass key".into()))
    }

    #[test]
    fn disabled_container_weighs_nothing() {
        let mut c = Container::default();
        assert!(!c.is_container());
        assert_eq!(c.update_total_mass(), 0.0);
        assert_eq!(
            c.put(&item(1, "book", 1.0, 1.0)),
            ContainerOutcome::Rejected(ContainerRejection::NotAContainer)
        );
    }

    #[test]
    fn store_and_take() {
        let mut c = chest();
        assert_eq!(c.put(&item(1, "book", 2.0, 800.0)), ContainerOutcome::Stored);
        assert_eq!(c.put(&item(2, "candle", 1.0, 200.0)), ContainerOutcome::Stored);
        assert_eq!(c.total_mass(), 1000.0);
        assert_eq!(c.contents()[0].name, "book");

        let taken = c.take(ObjectId(1)).unwrap();
        assert_eq!(taken.name, "book");
        assert_eq!(c.total_mass(), 200.0);
        assert_eq!(
            c.take(ObjectId(1)),
            Err(ObjectError::NotInContainer(ObjectId(1)))
        );
    }

    #[test]
    fn namesakes_taken_by_id() {
        let mut c = chest();
        c.put(&item(1, "lamp", 1.5, 455.0));
        c.put(&item(2, "lamp", 1.5, 2000.0));
        let taken = c.take(ObjectId(2)).unwrap();
        assert_eq!(taken.mass, 2000.0);
        assert_eq!(c.total_mass(), 455.0);
        assert_eq!(c.contents()[0].id, ObjectId(1));
    }

    #[test]
    fn refresh_while_locked() {
        let mut c = chest();
        c.put(&item(1, "satchel", 4.0, 975.0));
        c.lock("brass key").unwrap();
        assert!(c.refresh(&item(1, "satchel", 4.0, 1430.0)));
        assert_eq!(c.total_mass(), 1430.0);
        assert!(!c.refresh(&item(2, "book", 1.0, 1.0)));
    }

    #[test]
    fn ceilings_enforced() {
        let mut c = chest();
        assert_eq!(
            c.put(&item(1, "statue", 11.0, 1.0)),
            ContainerOutcome::Rejected(ContainerRejection::ExceedsMaxVolume)
        );
        assert_eq!(
            c.put(&item(2, "ingot", 1.0, 6000.0)),
            ContainerOutcome::Rejected(ContainerRejection::ExceedsMaxMass)
        );
        for i in 0..3 {
            assert_eq!(c.put(&item(10 + i, "pebble", 0.1, 1.0)), ContainerOutcome::Stored);
        }
        assert_eq!(
            c.put(&item(20, "pebble", 0.1, 1.0)),
            ContainerOutcome::Rejected(ContainerRejection::NoCapacity)
        );
    }

    #[test]
    fn lock_cycle() {
        let mut c = chest();
        assert_eq!(c.lock("iron key"), Err(ObjectError::WrongKey));
        c.lock("brass key").unwrap();
        assert!(c.is_locked());
        assert!(!c.is_open());
        assert_eq!(c.open(), Err(ObjectError::ContainerLocked));
        assert_eq!(
            c.put(&item(1, "book", 1.0, 1.0)),
            ContainerOutcome::Rejected(ContainerRejection::Closed)
        );
        c.unlock("brass key").unwrap();
        c.open().unwrap();
        assert_eq!(c.put(&item(1, "book", 1.0, 1.0)), ContainerOutcome::Stored);
    }

    #[test]
    fn lockless_container() {
        let mut c = Container::new(1, 1.0, 1.0, LockKind::None);
        assert_eq!(c.lock("any"), Err(ObjectError::NotLockable));
        c.close();
        assert_eq!(c.take(ObjectId(1)), Err(ObjectError::ContainerClosed));
        c.open().unwrap();
        assert!(c.is_open());
    }
}
