//! Attachment slots with capacity, volume and mass ceilings.
//!
//! A slot reports `capacity()` as places *left*: a slot with
//! `max_capacity = 1` shows 1 when empty and 0 when holding one object.
//!
//! Admission runs these checks in order and stops at the first failure:
//!
//! 1. the slot exists
//! 2. at least one place left
//! 3. the slot's free volume can hold the object
//! 4. occupied + incoming volume stays within `max_volume`
//! 5. occupied + incoming mass stays within `max_mass`
//! 6. one more object stays within `max_capacity`

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::ObjectError;
use crate::reference::{ObjectId, ObjectRef, Physical};

/// One configuration entry: `[max_capacity, max_volume, max_mass]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SlotSpec(pub u32, pub f64, pub f64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotRejection {
    NoSuchSlot,
    NoCapacity,
    InsufficientSlotVolume,
    ExceedsMaxVolume,
    ExceedsMaxMass,
    ExceedsMaxCapacity,
}

impl SlotRejection {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NoSuchSlot => "no_such_slot",
            Self::NoCapacity => "no_capacity",
            Self::InsufficientSlotVolume => "insufficient_slot_volume",
            Self::ExceedsMaxVolume => "exceeds_max_volume",
            Self::ExceedsMaxMass => "exceeds_max_mass",
            Self::ExceedsMaxCapacity => "exceeds_max_capacity",
        }
    }
}

/// Result of [`Slots::add_to_slot`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlotOutcome {
    Ok(String),
    Rejected(SlotRejection),
}

impl SlotOutcome {
    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Ok(_))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Slot {
    name: String,
    max_capacity: u32,
    max_volume: f64,
    max_mass: f64,
    contents: Vec<ObjectRef>,
    volume: f64,
    mass: f64,
}

impl Slot {
    fn new(name: &str, spec: SlotSpec) -> Self {
        Self {
            name: name.to_string(),
            max_capacity: spec.0,
            max_volume: spec.1,
            max_mass: spec.2,
            contents: Vec::new(),
            volume: 0.0,
            mass: 0.0,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Places left.
    pub fn capacity(&self) -> u32 {
        self.max_capacity.saturating_sub(self.contents.len() as u32)
    }

    pub fn max_capacity(&self) -> u32 {
        self.max_capacity
    }

    pub fn max_volume(&self) -> f64 {
        self.max_volume
    }

    pub fn max_mass(&self) -> f64 {
        self.max_mass
    }

    /// Volume taken by attached objects.
    pub fn volume(&self) -> f64 {
        self.volume
    }

    pub fn free_volume(&self) -> f64 {
        self.max_volume - self.volume
    }

    /// Mass of attached objects.
    pub fn mass(&self) -> f64 {
        self.mass
    }

    pub fn content(&self) -> &[ObjectRef] {
        &self.contents
    }

    pub fn is_free(&self) -> bool {
        self.capacity() >= 1
    }

    fn admit(&self, obj: &ObjectRef) -> Option<SlotRejection> {
        if self.capacity() < 1 {
            return Some(SlotRejection::NoCapacity);
        }
        if self.free_volume() < obj.volume {
            return Some(SlotRejection::InsufficientSlotVolume);
        }
        if self.volume + obj.volume > self.max_volume {
            return Some(SlotRejection::ExceedsMaxVolume);
        }
        if self.mass + obj.mass > self.max_mass {
            return Some(SlotRejection::ExceedsMaxMass);
        }
        if self.contents.len() as u32 + 1 > self.max_capacity {
            return Some(SlotRejection::ExceedsMaxCapacity);
        }
        None
    }

    fn recompute(&mut self) {
        self.volume = self.contents.iter().map(|o| o.volume).sum();
        self.mass = self.contents.iter().map(|o| o.mass).sum();
    }
}

/// Summary line for `free_slots` / `used_slots`.
#[derive(Debug, Clone, PartialEq)]
pub struct SlotListing {
    pub name: String,
    pub capacity: u32,
    pub volume: f64,
    pub mass: f64,
}

impl From<&Slot> for SlotListing {
    fn from(slot: &Slot) -> Self {
        Self {
            name: slot.name.clone(),
            capacity: slot.capacity(),
            volume: slot.volume,
            mass: slot.mass,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Slots {
    slots: BTreeMap<String, Slot>,
    total_mass: f64,
}

impl Slots {
    /// Build from `{slot name: [max_capacity, max_volume, max_mass]}`.
    pub fn new<'a, I>(config: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, SlotSpec)>,
    {
        let slots = config
            .into_iter()
            .map(|(name, spec)| (name.to_string(), Slot::new(name, spec)))
            .collect();
        Self {
            slots,
            total_mass: 0.0,
        }
    }

    pub fn has_slots(&self) -> bool {
        !self.slots.is_empty()
    }

    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    pub fn slot(&self, name: &str) -> Option<&Slot> {
        self.slots.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Slot> {
        self.slots.values()
    }

    pub fn add_to_slot<P: Physical + ?Sized>(&mut self, slot_name: &str, obj: &P) -> SlotOutcome {
        let Some(slot) = self.slots.get_mut(slot_name) else {
            return SlotOutcome::Rejected(SlotRejection::NoSuchSlot);
        };
        let obj = ObjectRef::of(obj);
        if let Some(reason) = slot.admit(&obj) {
            log::warn!(
                "{} rejected by slot '{}': {}",
                obj.name,
                slot_name,
                reason.as_str()
            );
            return SlotOutcome::Rejected(reason);
        }

        log::debug!("{} attached to slot '{}'", obj.name, slot_name);
        slot.contents.push(obj);
        slot.recompute();
        self.update_total_mass();
        SlotOutcome::Ok(slot_name.to_string())
    }

    /// Detach an object from a slot. Answers with the destination so the
    /// caller can confirm where the object went.
    pub fn remove_from_slot(
        &mut self,
        slot_name: &str,
        obj: ObjectId,
        new_location: &str,
    ) -> Result<(ObjectRef, String), ObjectError> {
        let slot = self
            .slots
            .get_mut(slot_name)
            .ok_or_else(|| ObjectError::UnknownSlot(slot_name.to_string()))?;
        let idx = slot
            .contents
            .iter()
            .position(|o| o.id == obj)
            .ok_or_else(|| ObjectError::NotInSlot {
                slot: slot_name.to_string(),
                object: obj,
            })?;
        let removed = slot.contents.remove(idx);
        slot.recompute();
        log::debug!(
            "{} detached from slot '{}' to {}",
            removed.name,
            slot_name,
            new_location
        );
        self.update_total_mass();
        Ok((removed, new_location.to_string()))
    }

    /// Replace the stored snapshot of an attached object. Ceilings are not
    /// re-checked. Returns false when the object is in no slot.
    pub fn refresh(&mut self, obj: &ObjectRef) -> bool {
        let Some(slot) = self
            .slots
            .values_mut()
            .find(|s| s.contents.iter().any(|o| o.id == obj.id))
        else {
            return false;
        };
        for held in slot.contents.iter_mut().filter(|o| o.id == obj.id) {
            *held = obj.clone();
        }
        slot.recompute();
        self.update_total_mass();
        true
    }

    pub fn free_slots(&self) -> Vec<SlotListing> {
        self.slots
            .values()
            .filter(|s| s.capacity() >= 1)
            .map(SlotListing::from)
            .collect()
    }

    pub fn used_slots(&self) -> Vec<SlotListing> {
        self.slots
            .values()
            .filter(|s| s.capacity() == 0)
            .map(SlotListing::from)
            .collect()
    }

    pub fn update_total_mass(&mut self) -> f64 {
        self.total_mass = self.slots.values().map(Slot::mass).sum();
        self.total_mass
    }

    pub fn total_mass(&self) -> f64 {
        self.total_mass
    }
}
