//! Composite game objects assembled from facets.
//!
//! Every object has a [`Mass`]; the other facets are optional and fixed at
//! creation by the blueprint. Mutations go through the wrappers here so the
//! object's own mass is recomputed after every change:
//!
//! ```
//! use coc_objects::blueprint;
//! use coc_objects::object::GameObject;
//! use coc_objects::reference::ObjectId;
//!
//! let chair = GameObject::from_blueprint(ObjectId(1), "Old chair", &blueprint::chair(), 1.0).unwrap();
//! assert_eq!(chair.mass().mass(), 3028.8);
//! assert_eq!(chair.mass().weight_kg(), 3.0288);
//! ```

use serde::{Deserialize, Serialize};

use crate::blueprint::{validate_blueprint, ObjectBlueprint};
use crate::container::{Container, ContainerOutcome, ContainerRejection};
use crate::error::ObjectError;
use crate::mass::Mass;
use crate::parts::Parts;
use crate::reference::{round6, ObjectId, ObjectRef, Physical, StackCandidate};
use crate::seats::Seats;
use crate::slots::{SlotOutcome, SlotRejection, Slots};
use crate::stackable::{StackOutcome, Stackable};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameObject {
    id: ObjectId,
    name: String,
    class: String,
    guid: String,
    visible: bool,
    original: bool,
    volume: f64,
    base_mass: f64,
    mass: Mass,
    parts: Option<Parts>,
    seats: Option<Seats>,
    slots: Option<Slots>,
    container: Option<Container>,
    stack: Option<Stackable>,
}

impl GameObject {
    /// Build an object from a validated blueprint. Part names become
    /// `"<name> <component>"`.
    pub fn from_blueprint(
        id: ObjectId,
        name: &str,
        bp: &ObjectBlueprint,
        gravity: f64,
    ) -> Result<Self, ObjectError> {
        let errors = validate_blueprint(bp);
        if !errors.is_empty() {
            return Err(ObjectError::InvalidBlueprint(errors));
        }

        let parts = if bp.parts.is_empty() {
            None
        } else {
            let named: Vec<(String, _)> = bp
                .parts
                .iter()
                .map(|(component, spec)| (format!("{} {}", name, component), spec))
                .collect();
            Some(Parts::new(named.iter().map(|(n, s)| (n.as_str(), *s)))?)
        };

        let seats = (!bp.seats.is_empty())
            .then(|| Seats::new(bp.seats.iter().map(|(n, c)| (n.as_str(), *c))));

        let slots = (!bp.slots.is_empty())
            .then(|| Slots::new(bp.slots.iter().map(|(n, s)| (n.as_str(), *s))));

        let container = bp.container.as_ref().map(|c| {
            Container::new(c.max_capacity, c.max_volume, c.max_mass, c.lock.clone())
        });

        let stack = bp
            .stack
            .map(|s| Stackable::new(&bp.class, s.can_stack, s.max_stack));

        let mut obj = Self {
            id,
            name: name.to_string(),
            class: bp.class.clone(),
            guid: bp.guid.clone(),
            visible: bp.visible,
            original: true,
            volume: bp.volume,
            base_mass: bp.base_mass,
            mass: Mass::new(0.0, gravity),
            parts,
            seats,
            slots,
            container,
            stack,
        };
        obj.update_total_mass();
        log::info!(
            "Created {} '{}' ({}) mass={}g",
            obj.class,
            obj.name,
            obj.id,
            obj.mass.mass()
        );
        Ok(obj)
    }

    pub fn id(&self) -> ObjectId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn class(&self) -> &str {
        &self.class
    }

    pub fn guid(&self) -> &str {
        &self.guid
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn is_original(&self) -> bool {
        self.original
    }

    pub fn mass(&self) -> &Mass {
        &self.mass
    }

    pub fn volume(&self) -> f64 {
        self.volume
    }

    pub fn parts(&self) -> Option<&Parts> {
        self.parts.as_ref()
    }

    pub fn seats(&self) -> Option<&Seats> {
        self.seats.as_ref()
    }

    pub fn slots(&self) -> Option<&Slots> {
        self.slots.as_ref()
    }

    pub fn container(&self) -> Option<&Container> {
        self.container.as_ref()
    }

    /// Open/close/lock access. Contents go through `store`/`retrieve`.
    pub fn container_mut(&mut self) -> Option<&mut Container> {
        self.container.as_mut()
    }

    pub fn stack(&self) -> Option<&Stackable> {
        self.stack.as_ref()
    }

    /// Flag the object as altered; it will no longer stack.
    pub fn mark_modified(&mut self) {
        self.original = false;
    }

    /// Moved somewhere with different gravity.
    pub fn set_gravity(&mut self, gravity: f64) {
        self.mass.set_gravity(gravity);
    }

    /// Recompute own mass from the base mass plus every facet's aggregate.
    pub fn update_total_mass(&mut self) -> f64 {
        let mut total = self.base_mass;
        if let Some(p) = &mut self.parts {
            total += p.update_total_mass();
        }
        if let Some(s) = &mut self.seats {
            total += s.update_total_mass();
        }
        if let Some(s) = &mut self.slots {
            total += s.update_total_mass();
        }
        if let Some(c) = &mut self.container {
            total += c.update_total_mass();
        }
        if let Some(s) = &mut self.stack {
            total += s.update_total_mass();
        }
        self.mass.set_mass(total);
        self.mass.mass()
    }

    /// Take a fresh snapshot of an object this one holds, in whichever facet
    /// holds it, and recompute own mass. Returns false when it holds no
    /// object with that id.
    pub fn refresh_held(&mut self, held: &ObjectRef) -> bool {
        let found = self.seats.as_mut().is_some_and(|s| s.refresh(held))
            || self.slots.as_mut().is_some_and(|s| s.refresh(held))
            || self.container.as_mut().is_some_and(|c| c.refresh(held));
        if found {
            self.update_total_mass();
        }
        found
    }

    // ── Seats ──────────────────────────────────────────────────────────

    pub fn sit<P: Physical + ?Sized>(&mut self, seat: &str, occupant: &P) -> Result<(), ObjectError> {
        let seats = self
            .seats
            .as_mut()
            .ok_or_else(|| ObjectError::UnknownSeat(seat.to_string()))?;
        seats.at_enter_seat(seat, occupant)?;
        self.update_total_mass();
        Ok(())
    }

    pub fn stand(&mut self, seat: &str, occupant: ObjectId) -> Result<ObjectRef, ObjectError> {
        let seats = self
            .seats
            .as_mut()
            .ok_or_else(|| ObjectError::UnknownSeat(seat.to_string()))?;
        let left = seats.at_leave_seat(seat, occupant)?;
        self.update_total_mass();
        Ok(left)
    }

    pub fn clear_seat(&mut self, seat: &str) -> Result<Vec<ObjectRef>, ObjectError> {
        let seats = self
            .seats
            .as_mut()
            .ok_or_else(|| ObjectError::UnknownSeat(seat.to_string()))?;
        let removed = seats.clear_seats(seat)?;
        self.update_total_mass();
        Ok(removed)
    }

    pub fn clear_all_seats(&mut self) -> Vec<ObjectRef> {
        let removed = self
            .seats
            .as_mut()
            .map(Seats::clear_all_seats)
            .unwrap_or_default();
        self.update_total_mass();
        removed
    }

    // ── Slots ──────────────────────────────────────────────────────────

    pub fn attach<P: Physical + ?Sized>(&mut self, slot: &str, obj: &P) -> SlotOutcome {
        let Some(slots) = self.slots.as_mut() else {
            return SlotOutcome::Rejected(SlotRejection::NoSuchSlot);
        };
        let outcome = slots.add_to_slot(slot, obj);
        if outcome.is_ok() {
            self.update_total_mass();
        }
        outcome
    }

    pub fn detach(
        &mut self,
        slot: &str,
        obj: ObjectId,
        new_location: &str,
    ) -> Result<(ObjectRef, String), ObjectError> {
        let slots = self
            .slots
            .as_mut()
            .ok_or_else(|| ObjectError::UnknownSlot(slot.to_string()))?;
        let detached = slots.remove_from_slot(slot, obj, new_location)?;
        self.update_total_mass();
        Ok(detached)
    }

    // ── Container ──────────────────────────────────────────────────────

    pub fn store<P: Physical + ?Sized>(&mut self, obj: &P) -> ContainerOutcome {
        let Some(container) = self.container.as_mut() else {
            return ContainerOutcome::Rejected(ContainerRejection::NotAContainer);
        };
        let outcome = container.put(obj);
        if outcome == ContainerOutcome::Stored {
            self.update_total_mass();
        }
        outcome
    }

    pub fn retrieve(&mut self, obj: ObjectId) -> Result<ObjectRef, ObjectError> {
        let container = self
            .container
            .as_mut()
            .ok_or(ObjectError::NotInContainer(obj))?;
        let taken = container.take(obj)?;
        self.update_total_mass();
        Ok(taken)
    }

    // ── Stack ──────────────────────────────────────────────────────────

    pub fn add_stack<C: StackCandidate + ?Sized>(&mut self, candidate: &C) -> StackOutcome {
        let Some(stack) = self.stack.as_mut() else {
            return StackOutcome::NotStackable;
        };
        let outcome = stack.add_stack(candidate);
        if outcome == StackOutcome::Merged {
            self.update_total_mass();
        }
        outcome
    }

    /// Split `n` items off; returns the class to spawn them from.
    pub fn remove_stack(&mut self, n: u32) -> Option<String> {
        let class = self.stack.as_mut()?.remove_stack(n)?.to_string();
        self.update_total_mass();
        Some(class)
    }

    pub fn clear_stack(&mut self) {
        if let Some(stack) = self.stack.as_mut() {
            stack.clear_stack();
        }
        self.update_total_mass();
    }

    /// Builder information panel.
    pub fn info(&self) -> String {
        crate::info::render(self)
    }
}

impl Physical for GameObject {
    fn id(&self) -> ObjectId {
        self.id
    }
    fn name(&self) -> &str {
        &self.name
    }
    fn mass(&self) -> f64 {
        self.mass.mass()
    }
    fn volume(&self) -> f64 {
        self.volume
    }
}

impl StackCandidate for GameObject {
    fn class(&self) -> &str {
        &self.class
    }
    fn is_original(&self) -> bool {
        self.original
    }
    fn stack_count(&self) -> u32 {
        self.stack.as_ref().map_or(1, Stackable::actual_stack)
    }
    fn unit_mass(&self) -> f64 {
        round6(self.mass.mass() - self.stack.as_ref().map_or(0.0, Stackable::total_mass))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blueprint;

    fn old_chair() -> GameObject {
        GameObject::from_blueprint(ObjectId(1), "Old chair", &blueprint::chair(), 1.0).unwrap()
    }

    fn investigator(id: u64, mass: f64) -> ObjectRef {
        ObjectRef {
            id: ObjectId(id),
            name: format!("investigator {id}"),
            mass,
            volume: 70.0,
        }
    }

    #[test]
    fn chair_identity() {
        let chair = old_chair();
        assert_eq!(chair.guid(), "FNT-CHR-000001");
        assert!(chair.is_visible());
        assert!(chair.is_original());
        assert_eq!(
            chair.parts().unwrap().iter().next().unwrap().name(),
            "Old chair body"
        );
    }

    #[test]
    fn chair_mass_and_units() {
        let chair = old_chair();
        assert_eq!(chair.mass().mass(), 3028.8);
        assert_eq!(chair.mass().gravity(), 1.0);
        assert_eq!(chair.mass().weight(), 3028.8);
        assert_eq!(chair.mass().weight_mg(), 3_028_800.0);
        assert_eq!(chair.mass().weight_gr(), 3028.8);
        assert_eq!(chair.mass().weight_kg(), 3.0288);
        assert_eq!(chair.mass().weight_tn(), 0.003029);
    }

    #[test]
    fn sitting_adds_occupant_mass() {
        let mut chair = old_chair();
        chair.sit("seat", &investigator(2, 70_000.0)).unwrap();
        assert_eq!(chair.mass().mass(), 73_028.8);
        assert_eq!(chair.seats().unwrap().free_seats(), 0);
        chair.stand("seat", ObjectId(2)).unwrap();
        assert_eq!(chair.mass().mass(), 3028.8);
    }

    #[test]
    fn facetless_operations_fail_cleanly() {
        let mut chair = old_chair();
        assert_eq!(
            chair.attach("hook", &investigator(2, 1.0)),
            SlotOutcome::Rejected(SlotRejection::NoSuchSlot)
        );
        assert_eq!(
            chair.store(&investigator(2, 1.0)),
            ContainerOutcome::Rejected(ContainerRejection::NotAContainer)
        );
        assert_eq!(chair.add_stack(&old_chair()), StackOutcome::NotStackable);
        assert_eq!(chair.remove_stack(1), None);
        assert!(matches!(
            chair.detach("hook", ObjectId(2), "floor"),
            Err(ObjectError::UnknownSlot(_))
        ));
    }

    #[test]
    fn gravity_changes_weight_not_mass() {
        let mut chair = old_chair();
        chair.set_gravity(0.5);
        assert_eq!(chair.mass().mass(), 3028.8);
        assert_eq!(chair.mass().weight(), 1514.4);
        chair.sit("seat", &investigator(2, 1000.0)).unwrap();
        assert_eq!(chair.mass().weight(), 2014.4);
    }

    #[test]
    fn coin_stack_mass() {
        let bp = blueprint::silver_dollar();
        let mut purse = GameObject::from_blueprint(ObjectId(1), "dollar", &bp, 1.0).unwrap();
        let other = GameObject::from_blueprint(ObjectId(2), "dollar", &bp, 1.0).unwrap();
        assert_eq!(purse.mass().mass(), 26.73);
        assert_eq!(purse.add_stack(&other), StackOutcome::Merged);
        assert_eq!(purse.mass().mass(), 53.46);
        assert_eq!(purse.stack_count(), 2);
        assert_eq!(purse.remove_stack(1).as_deref(), Some("SilverDollar"));
        assert_eq!(purse.mass().mass(), 26.73);
    }

    #[test]
    fn merging_a_pile_counts_each_coin_once() {
        let bp = blueprint::silver_dollar();
        let mut purse = GameObject::from_blueprint(ObjectId(1), "dollar", &bp, 1.0).unwrap();
        let mut pile = GameObject::from_blueprint(ObjectId(2), "dollar", &bp, 1.0).unwrap();
        for id in 3..5 {
            let coin = GameObject::from_blueprint(ObjectId(id), "dollar", &bp, 1.0).unwrap();
            assert_eq!(pile.add_stack(&coin), StackOutcome::Merged);
        }
        assert_eq!(pile.mass().mass(), 80.19);
        assert_eq!(pile.unit_mass(), 26.73);

        assert_eq!(purse.add_stack(&pile), StackOutcome::Merged);
        assert_eq!(purse.stack_count(), 4);
        assert_eq!(purse.mass().mass(), 106.92);
        assert_eq!(purse.stack().unwrap().representative().unwrap().mass, 26.73);
    }

    #[test]
    fn refresh_held_follows_a_heavier_occupant() {
        let mut chair = old_chair();
        chair.sit("seat", &investigator(2, 70_000.0)).unwrap();
        assert!(chair.refresh_held(&investigator(2, 71_000.0)));
        assert_eq!(chair.mass().mass(), 74_028.8);
        assert!(!chair.refresh_held(&investigator(3, 1.0)));
        assert_eq!(chair.mass().mass(), 74_028.8);
    }

    #[test]
    fn modified_object_does_not_stack() {
        let bp = blueprint::silver_dollar();
        let mut purse = GameObject::from_blueprint(ObjectId(1), "dollar", &bp, 1.0).unwrap();
        let mut bent = GameObject::from_blueprint(ObjectId(2), "dollar", &bp, 1.0).unwrap();
        bent.mark_modified();
        assert_eq!(purse.add_stack(&bent), StackOutcome::CandidateModified);
        assert_eq!(purse.stack().unwrap().actual_stack(), 1);
    }

    #[test]
    fn invalid_blueprint_refused() {
        let mut bp = blueprint::chair();
        bp.class.clear();
        assert!(matches!(
            GameObject::from_blueprint(ObjectId(1), "x", &bp, 1.0),
            Err(ObjectError::InvalidBlueprint(_))
        ));
    }
}
