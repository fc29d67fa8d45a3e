//! Named seats with a fixed number of places.
//!
//! Mutations are strict and fail with [`ObjectError`]; lookups are lenient
//! and answer `None` so UI queries never have to handle errors.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{ObjectError, OccupancyReason};
use crate::reference::{ObjectId, ObjectRef, Physical};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Seat {
    name: String,
    capacity: u32,
    occupants: BTreeMap<ObjectId, ObjectRef>,
    mass: f64,
}

/// Single field of a seat, for `access_seat_data`.
#[derive(Debug, Clone, PartialEq)]
pub enum SeatData {
    Name(String),
    Capacity(u32),
    Free(u32),
    Occupants(Vec<String>),
    Mass(f64),
}

impl Seat {
    fn new(name: &str, capacity: u32) -> Self {
        Self {
            name: name.to_string(),
            capacity,
            occupants: BTreeMap::new(),
            mass: 0.0,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    pub fn free(&self) -> u32 {
        self.capacity - self.occupants.len() as u32
    }

    pub fn occupants(&self) -> impl Iterator<Item = &ObjectRef> {
        self.occupants.values()
    }

    pub fn occupant_count(&self) -> usize {
        self.occupants.len()
    }

    pub fn mass(&self) -> f64 {
        self.mass
    }

    fn update_mass(&mut self) {
        self.mass = self.occupants.values().map(|o| o.mass).sum();
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Seats {
    seats: BTreeMap<String, Seat>,
    total_mass: f64,
}

impl Seats {
    /// Build from `{seat name: capacity}`.
    pub fn new<'a, I>(config: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, u32)>,
    {
        let seats = config
            .into_iter()
            .map(|(name, capacity)| (name.to_string(), Seat::new(name, capacity)))
            .collect();
        Self {
            seats,
            total_mass: 0.0,
        }
    }

    pub fn at_enter_seat<P: Physical + ?Sized>(
        &mut self,
        seat_name: &str,
        occupant: &P,
    ) -> Result<(), ObjectError> {
        let seat = self
            .seats
            .get_mut(seat_name)
            .ok_or_else(|| ObjectError::UnknownSeat(seat_name.to_string()))?;

        if seat.occupants.contains_key(&occupant.id()) {
            return Err(ObjectError::Occupancy {
                seat: seat_name.to_string(),
                reason: OccupancyReason::AlreadySeated(occupant.id()),
            });
        }
        if seat.free() == 0 {
            log::warn!("{} can't sit in '{}': seat full", occupant.name(), seat_name);
            return Err(ObjectError::Occupancy {
                seat: seat_name.to_string(),
                reason: OccupancyReason::Full,
            });
        }

        seat.occupants.insert(occupant.id(), ObjectRef::of(occupant));
        seat.update_mass();
        log::debug!("{} sat in '{}'", occupant.name(), seat_name);
        self.update_total_mass();
        Ok(())
    }

    /// Remove an occupant from a seat, returning its reference.
    pub fn at_leave_seat(
        &mut self,
        seat_name: &str,
        occupant: ObjectId,
    ) -> Result<ObjectRef, ObjectError> {
        let seat = self
            .seats
            .get_mut(seat_name)
            .ok_or_else(|| ObjectError::UnknownSeat(seat_name.to_string()))?;
        let left = seat
            .occupants
            .remove(&occupant)
            .ok_or_else(|| ObjectError::Occupancy {
                seat: seat_name.to_string(),
                reason: OccupancyReason::NotSeated(occupant),
            })?;
        seat.update_mass();
        log::debug!("{} left '{}'", left.name, seat_name);
        self.update_total_mass();
        Ok(left)
    }

    /// Empty one seat, returning whoever was sitting there.
    pub fn clear_seats(&mut self, seat_name: &str) -> Result<Vec<ObjectRef>, ObjectError> {
        let seat = self
            .seats
            .get_mut(seat_name)
            .ok_or_else(|| ObjectError::UnknownSeat(seat_name.to_string()))?;
        let removed = std::mem::take(&mut seat.occupants).into_values().collect();
        seat.update_mass();
        self.update_total_mass();
        Ok(removed)
    }

    pub fn clear_all_seats(&mut self) -> Vec<ObjectRef> {
        let mut removed = Vec::new();
        for seat in self.seats.values_mut() {
            removed.extend(std::mem::take(&mut seat.occupants).into_values());
            seat.update_mass();
        }
        self.update_total_mass();
        removed
    }

    /// Replace the stored snapshot of an occupant whose mass or volume
    /// changed. Returns false when it is not seated here.
    pub fn refresh(&mut self, occupant: &ObjectRef) -> bool {
        let Some(seat) = self
            .seats
            .values_mut()
            .find(|s| s.occupants.contains_key(&occupant.id))
        else {
            return false;
        };
        seat.occupants.insert(occupant.id, occupant.clone());
        seat.update_mass();
        self.update_total_mass();
        true
    }

    pub fn update_total_mass(&mut self) -> f64 {
        self.total_mass = self.seats.values().map(Seat::mass).sum();
        self.total_mass
    }

    pub fn total_mass(&self) -> f64 {
        self.total_mass
    }

    /// Total number of places across all seats.
    pub fn seats(&self) -> u32 {
        self.seats.values().map(Seat::capacity).sum()
    }

    pub fn free_seats(&self) -> u32 {
        self.seats.values().map(Seat::free).sum()
    }

    pub fn seat_count(&self) -> usize {
        self.seats.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Seat> {
        self.seats.values()
    }

    pub fn search_seats(&self, seat_name: &str) -> bool {
        self.seats.contains_key(seat_name)
    }

    pub fn search_in_seats(&self, seat_name: &str, occupant: ObjectId) -> Option<&ObjectRef> {
        self.seats.get(seat_name)?.occupants.get(&occupant)
    }

    pub fn access_seat(&self, seat_name: &str) -> Option<&Seat> {
        self.seats.get(seat_name)
    }

    /// One field of a seat by name: `name`, `capacity`, `free`, `occupants`
    /// or `mass`.
    pub fn access_seat_data(&self, seat_name: &str, field: &str) -> Option<SeatData> {
        let seat = self.seats.get(seat_name)?;
        match field {
            "name" => Some(SeatData::Name(seat.name.clone())),
            "capacity" => Some(SeatData::Capacity(seat.capacity)),
            "free" => Some(SeatData::Free(seat.free())),
            "occupants" => Some(SeatData::Occupants(
                seat.occupants.values().map(|o| o.name.clone()).collect(),
            )),
            "mass" => Some(SeatData::Mass(seat.mass)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reference::ObjectId;

    fn person(id: u64, name: &str, mass: f64) -> ObjectRef {
        ObjectRef {
            id: ObjectId(id),
            name: name.to_string(),
            mass,
            volume: 70.0,
        }
    }

    #[test]
    fn fresh_single_seat() {
        let seats = Seats::new([("seat", 1)]);
        assert_eq!(seats.seat_count(), 1);
        assert_eq!(seats.seats(), 1);
        assert_eq!(seats.free_seats(), 1);
        let seat = seats.access_seat("seat").unwrap();
        assert_eq!(seat.capacity(), 1);
        assert_eq!(seat.occupant_count(), 0);
    }

    #[test]
    fn enter_and_leave_track_mass() {
        let mut seats = Seats::new([("bench", 2)]);
        seats.at_enter_seat("bench", &person(1, "Armitage", 80_000.0)).unwrap();
        seats.at_enter_seat("bench", &person(2, "Wilmarth", 65_000.0)).unwrap();
        assert_eq!(seats.total_mass(), 145_000.0);
        assert_eq!(seats.free_seats(), 0);

        let left = seats.at_leave_seat("bench", ObjectId(1)).unwrap();
        assert_eq!(left.id, ObjectId(1));
        assert_eq!(seats.total_mass(), 65_000.0);
        assert_eq!(seats.free_seats(), 1);
    }

    #[test]
    fn full_seat_rejects() {
        let mut seats = Seats::new([("seat", 1)]);
        seats.at_enter_seat("seat", &person(1, "Armitage", 1.0)).unwrap();
        let err = seats.at_enter_seat("seat", &person(2, "Wilmarth", 1.0));
        assert_eq!(
            err,
            Err(ObjectError::Occupancy {
                seat: "seat".into(),
                reason: OccupancyReason::Full
            })
        );
        assert_eq!(seats.access_seat("seat").unwrap().occupant_count(), 1);
    }

    #[test]
    fn unknown_seat_and_absent_occupant() {
        let mut seats = Seats::new([("seat", 1)]);
        assert_eq!(
            seats.at_enter_seat("throne", &person(1, "Armitage", 1.0)),
            Err(ObjectError::UnknownSeat("throne".into()))
        );
        assert!(matches!(
            seats.at_leave_seat("seat", ObjectId(1)),
            Err(ObjectError::Occupancy {
                reason: OccupancyReason::NotSeated(_),
                ..
            })
        ));
    }

    #[test]
    fn same_occupant_twice_rejected() {
        let mut seats = Seats::new([("sofa", 3)]);
        seats.at_enter_seat("sofa", &person(1, "Armitage", 1.0)).unwrap();
        assert!(matches!(
            seats.at_enter_seat("sofa", &person(1, "Armitage", 1.0)),
            Err(ObjectError::Occupancy {
                reason: OccupancyReason::AlreadySeated(_),
                ..
            })
        ));
        assert_eq!(seats.free_seats(), 2);
    }

    #[test]
    fn namesakes_share_a_bench() {
        let mut seats = Seats::new([("bench", 2)]);
        seats.at_enter_seat("bench", &person(1, "guard", 80_000.0)).unwrap();
        seats.at_enter_seat("bench", &person(2, "guard", 95_000.0)).unwrap();
        assert_eq!(seats.free_seats(), 0);

        let left = seats.at_leave_seat("bench", ObjectId(2)).unwrap();
        assert_eq!(left.mass, 95_000.0);
        assert_eq!(seats.total_mass(), 80_000.0);
        assert!(seats.search_in_seats("bench", ObjectId(1)).is_some());
    }

    #[test]
    fn refresh_replaces_occupant_snapshot() {
        let mut seats = Seats::new([("seat", 1)]);
        seats.at_enter_seat("seat", &person(1, "Armitage", 80_000.0)).unwrap();
        assert!(seats.refresh(&person(1, "Armitage", 81_500.0)));
        assert_eq!(seats.total_mass(), 81_500.0);
        assert!(!seats.refresh(&person(2, "Wilmarth", 1.0)));
        assert_eq!(seats.total_mass(), 81_500.0);
    }

    #[test]
    fn clear_one_seat_leaves_others() {
        let mut seats = Seats::new([("driver", 1), ("back", 3)]);
        seats.at_enter_seat("driver", &person(1, "Armitage", 10.0)).unwrap();
        seats.at_enter_seat("back", &person(2, "Wilmarth", 20.0)).unwrap();
        let removed = seats.clear_seats("back").unwrap();
        assert_eq!(removed.len(), 1);
        assert_eq!(seats.total_mass(), 10.0);
        assert!(seats.search_in_seats("driver", ObjectId(1)).is_some());

        let removed = seats.clear_all_seats();
        assert_eq!(removed.len(), 1);
        assert_eq!(seats.total_mass(), 0.0);
        assert_eq!(seats.free_seats(), 4);
    }

    #[test]
    fn capacity_invariant_under_random_sequence() {
        let mut seats = Seats::new([("a", 2), ("b", 1)]);
        for step in 0..40u64 {
            let who = step * 7 % 4;
            let seat = if step % 3 == 0 { "b" } else { "a" };
            if step % 2 == 0 {
                let _ = seats.at_enter_seat(seat, &person(who, "passenger", 1.0));
            } else {
                let _ = seats.at_leave_seat(seat, ObjectId(who));
            }
            for s in seats.iter() {
                assert!(s.occupant_count() as u32 <= s.capacity());
                assert_eq!(s.free(), s.capacity() - s.occupant_count() as u32);
            }
        }
    }

    #[test]
    fn lenient_lookups() {
        let mut seats = Seats::new([("seat", 1)]);
        seats.at_enter_seat("seat", &person(1, "Armitage", 5.0)).unwrap();
        assert!(seats.search_seats("seat"));
        assert!(!seats.search_seats("throne"));
        assert!(seats.search_in_seats("throne", ObjectId(1)).is_none());
        assert_eq!(
            seats.access_seat_data("seat", "occupants"),
            Some(SeatData::Occupants(vec!["Armitage".into()]))
        );
        assert_eq!(seats.access_seat_data("seat", "free"), Some(SeatData::Free(0)));
        assert_eq!(seats.access_seat_data("seat", "colour"), None);
        assert_eq!(seats.access_seat_data("throne", "mass"), None);
    }
}
