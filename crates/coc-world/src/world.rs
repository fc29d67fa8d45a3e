//! Object world - rooms and composite objects as ECS entities.
//!
//! Facets hold `ObjectRef` snapshots of the objects they reference; the
//! world owns the objects themselves and keeps each one's [`Location`] in
//! step with the facet that holds it. Every cross-object operation resolves
//! ids first, then mutates the host, then relocates the other object, then
//! pushes the host's new mass up through whatever holds it.
//!
//! Gravity flows the other way: placing an object re-applies gravity to
//! everything it holds, at any depth.

use std::collections::BTreeMap;

use hecs::{Entity, World};

use coc_objects::blueprint::ObjectBlueprint;
use coc_objects::container::ContainerOutcome;
use coc_objects::slots::SlotOutcome;
use coc_objects::stackable::StackOutcome;
use coc_objects::{GameObject, ObjectId, ObjectRef};

use crate::components::{Location, Room};
use crate::error::WorldError;

/// Holder chains deeper than this are treated as broken.
const MAX_HOLDER_DEPTH: usize = 64;

pub struct ObjectWorld {
    /// ECS world; every entity carries a `GameObject` and a `Location`
    world: World,
    rooms: BTreeMap<String, Room>,
    /// Blueprints by class, used to respawn items split off a stack
    blueprints: BTreeMap<String, ObjectBlueprint>,
    index: BTreeMap<ObjectId, Entity>,
    next_id: u64,
}

impl Default for ObjectWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl ObjectWorld {
    pub fn new() -> Self {
        Self {
            world: World::new(),
            rooms: BTreeMap::new(),
            blueprints: BTreeMap::new(),
            index: BTreeMap::new(),
            next_id: 1,
        }
    }

    // ── Rooms and blueprints ───────────────────────────────────────────

    pub fn add_room(&mut self, key: &str, gravity: f64) {
        self.rooms.insert(
            key.to_string(),
            Room {
                key: key.to_string(),
                gravity,
            },
        );
    }

    pub fn room(&self, key: &str) -> Option<&Room> {
        self.rooms.get(key)
    }

    pub fn rooms(&self) -> impl Iterator<Item = &Room> {
        self.rooms.values()
    }

    /// Register a blueprint so objects of its class can be spawned by name.
    pub fn register_blueprint(&mut self, bp: ObjectBlueprint) {
        self.blueprints.insert(bp.class.clone(), bp);
    }

    pub fn blueprint(&self, class: &str) -> Option<&ObjectBlueprint> {
        self.blueprints.get(class)
    }

    pub fn blueprints(&self) -> impl Iterator<Item = &ObjectBlueprint> {
        self.blueprints.values()
    }

    // ── Objects ────────────────────────────────────────────────────────

    /// Create an object in a room, under that room's gravity. The blueprint
    /// is registered if its class is not known yet.
    pub fn spawn(
        &mut self,
        bp: &ObjectBlueprint,
        name: &str,
        room: &str,
    ) -> Result<ObjectId, WorldError> {
        let gravity = self.room_gravity(room)?;
        let id = ObjectId(self.next_id);
        let obj = GameObject::from_blueprint(id, name, bp, gravity)?;
        self.next_id += 1;
        if !self.blueprints.contains_key(&bp.class) {
            self.blueprints.insert(bp.class.clone(), bp.clone());
        }
        let entity = self.world.spawn((obj, Location::Room(room.to_string())));
        self.index.insert(id, entity);
        log::info!("Spawned {} '{}' in {}", id, name, room);
        Ok(id)
    }

    /// Spawn from a registered blueprint.
    pub fn spawn_class(&mut self, class: &str, name: &str, room: &str) -> Result<ObjectId, WorldError> {
        let bp = self
            .blueprints
            .get(class)
            .cloned()
            .ok_or_else(|| WorldError::NoSuchBlueprint(class.to_string()))?;
        self.spawn(&bp, name, room)
    }

    pub fn despawn(&mut self, id: ObjectId) -> Result<(), WorldError> {
        let entity = self.entity(id)?;
        self.world
            .despawn(entity)
            .map_err(|_| WorldError::NoSuchObject(id))?;
        self.index.remove(&id);
        log::debug!("Despawned {}", id);
        Ok(())
    }

    pub fn object(&self, id: ObjectId) -> Result<hecs::Ref<'_, GameObject>, WorldError> {
        let entity = self.entity(id)?;
        self.world
            .get::<&GameObject>(entity)
            .map_err(|_| WorldError::NoSuchObject(id))
    }

    /// Direct access for facet state that does not move other objects, such
    /// as opening or locking a container. Call [`Self::refresh_holders`]
    /// afterwards if the change affects the object's mass.
    pub fn object_mut(&self, id: ObjectId) -> Result<hecs::RefMut<'_, GameObject>, WorldError> {
        let entity = self.entity(id)?;
        self.world
            .get::<&mut GameObject>(entity)
            .map_err(|_| WorldError::NoSuchObject(id))
    }

    pub fn location(&self, id: ObjectId) -> Result<Location, WorldError> {
        let entity = self.entity(id)?;
        let location = self
            .world
            .get::<&Location>(entity)
            .map_err(|_| WorldError::NoSuchObject(id))?;
        Ok((*location).clone())
    }

    /// Objects lying loose in a room, by id.
    pub fn objects_in(&self, room: &str) -> Vec<ObjectId> {
        let mut ids: Vec<ObjectId> = self
            .world
            .query::<(&GameObject, &Location)>()
            .iter()
            .filter(|(_, (_, loc))| matches!(loc, Location::Room(r) if r == room))
            .map(|(_, (obj, _))| obj.id())
            .collect();
        ids.sort();
        ids
    }

    pub fn object_count(&self) -> usize {
        self.index.len()
    }

    pub fn ids(&self) -> impl Iterator<Item = ObjectId> + '_ {
        self.index.keys().copied()
    }

    /// The room an object is ultimately in, following its holders.
    pub fn room_of(&self, id: ObjectId) -> Result<String, WorldError> {
        let mut current = id;
        for _ in 0..MAX_HOLDER_DEPTH {
            match self.location(current)? {
                Location::Room(room) => return Ok(room),
                Location::Held(holder) => current = holder,
            }
        }
        Err(WorldError::SelfReference(id))
    }

    /// Move a loose object to another room and apply that room's gravity to
    /// it and everything it holds.
    pub fn move_to_room(&mut self, id: ObjectId, room: &str) -> Result<(), WorldError> {
        self.ensure_loose(id)?;
        self.place(id, Location::Room(room.to_string()))
    }

    // ── Seats ──────────────────────────────────────────────────────────

    pub fn sit(&mut self, host: ObjectId, seat: &str, occupant: ObjectId) -> Result<(), WorldError> {
        self.ensure_distinct(host, occupant)?;
        self.ensure_loose(occupant)?;
        let who = self.snapshot(occupant)?;
        self.object_mut(host)?.sit(seat, &who)?;
        self.place(occupant, Location::Held(host))?;
        self.refresh_holders(host)
    }

    /// The occupant stands up into the host's room.
    pub fn stand(&mut self, host: ObjectId, seat: &str, occupant: ObjectId) -> Result<(), WorldError> {
        self.ensure_held_by(occupant, host)?;
        self.object_mut(host)?.stand(seat, occupant)?;
        let room = self.room_of(host)?;
        self.place(occupant, Location::Room(room))?;
        self.refresh_holders(host)
    }

    // ── Slots ──────────────────────────────────────────────────────────

    pub fn attach(&mut self, host: ObjectId, slot: &str, obj: ObjectId) -> Result<SlotOutcome, WorldError> {
        self.ensure_distinct(host, obj)?;
        self.ensure_loose(obj)?;
        let what = self.snapshot(obj)?;
        let outcome = self.object_mut(host)?.attach(slot, &what);
        if outcome.is_ok() {
            self.place(obj, Location::Held(host))?;
            self.refresh_holders(host)?;
        }
        Ok(outcome)
    }

    /// Detach into a room.
    pub fn detach(&mut self, host: ObjectId, slot: &str, obj: ObjectId, room: &str) -> Result<(), WorldError> {
        self.room_gravity(room)?;
        self.ensure_held_by(obj, host)?;
        self.object_mut(host)?.detach(slot, obj, room)?;
        self.place(obj, Location::Room(room.to_string()))?;
        self.refresh_holders(host)
    }

    // ── Container ──────────────────────────────────────────────────────

    pub fn store(&mut self, host: ObjectId, obj: ObjectId) -> Result<ContainerOutcome, WorldError> {
        self.ensure_distinct(host, obj)?;
        self.ensure_loose(obj)?;
        let what = self.snapshot(obj)?;
        let outcome = self.object_mut(host)?.store(&what);
        if outcome == ContainerOutcome::Stored {
            self.place(obj, Location::Held(host))?;
            self.refresh_holders(host)?;
        }
        Ok(outcome)
    }

    /// Take an object out into the container's room.
    pub fn retrieve(&mut self, host: ObjectId, obj: ObjectId) -> Result<(), WorldError> {
        self.ensure_held_by(obj, host)?;
        self.object_mut(host)?.retrieve(obj)?;
        let room = self.room_of(host)?;
        self.place(obj, Location::Room(room))?;
        self.refresh_holders(host)
    }

    // ── Stacks ─────────────────────────────────────────────────────────

    /// Merge `candidate` into `host`'s stack. A merged candidate is
    /// despawned.
    pub fn stack_onto(&mut self, host: ObjectId, candidate: ObjectId) -> Result<StackOutcome, WorldError> {
        self.ensure_distinct(host, candidate)?;
        self.ensure_loose(candidate)?;
        let merged = {
            let c = self.object(candidate)?;
            (*c).clone()
        };
        let outcome = self.object_mut(host)?.add_stack(&merged);
        if outcome == StackOutcome::Merged {
            self.despawn(candidate)?;
            self.refresh_holders(host)?;
        }
        Ok(outcome)
    }

    /// Split `n` items off `host` as fresh objects in the host's room.
    /// Returns no ids when the stack is too small or `n` is zero.
    pub fn split_stack(&mut self, host: ObjectId, n: u32) -> Result<Vec<ObjectId>, WorldError> {
        let (class, name) = {
            let obj = self.object(host)?;
            (obj.class().to_string(), obj.name().to_string())
        };
        let bp = self
            .blueprints
            .get(&class)
            .cloned()
            .ok_or_else(|| WorldError::NoSuchBlueprint(class.clone()))?;
        let room = self.room_of(host)?;

        if self.object_mut(host)?.remove_stack(n).is_none() {
            log::warn!("Cannot split {} off {}", n, host);
            return Ok(Vec::new());
        }
        self.refresh_holders(host)?;
        (0..n).map(|_| self.spawn(&bp, &name, &room)).collect()
    }

    /// Re-snapshot `id` in its holder, then that holder in its own holder,
    /// up to the room. Each holder recomputes its mass on the way.
    pub fn refresh_holders(&mut self, id: ObjectId) -> Result<(), WorldError> {
        let mut current = id;
        for _ in 0..MAX_HOLDER_DEPTH {
            let Some(holder) = self.location(current)?.holder() else {
                return Ok(());
            };
            let snapshot = self.snapshot(current)?;
            if !self.object_mut(holder)?.refresh_held(&snapshot) {
                log::warn!("{} is placed in {} but no facet holds it", current, holder);
                return Err(WorldError::NotHeldBy {
                    object: current,
                    holder,
                });
            }
            current = holder;
        }
        Err(WorldError::SelfReference(id))
    }

    // ── Internals ──────────────────────────────────────────────────────

    fn entity(&self, id: ObjectId) -> Result<Entity, WorldError> {
        self.index
            .get(&id)
            .copied()
            .ok_or(WorldError::NoSuchObject(id))
    }

    fn room_gravity(&self, room: &str) -> Result<f64, WorldError> {
        self.rooms
            .get(room)
            .map(|r| r.gravity)
            .ok_or_else(|| WorldError::NoSuchRoom(room.to_string()))
    }

    fn snapshot(&self, id: ObjectId) -> Result<ObjectRef, WorldError> {
        let obj = self.object(id)?;
        Ok(ObjectRef::of(&*obj))
    }

    fn ensure_distinct(&self, host: ObjectId, other: ObjectId) -> Result<(), WorldError> {
        if host == other {
            return Err(WorldError::SelfReference(host));
        }
        Ok(())
    }

    fn ensure_held_by(&self, id: ObjectId, holder: ObjectId) -> Result<(), WorldError> {
        match self.location(id)? {
            Location::Held(h) if h == holder => Ok(()),
            _ => Err(WorldError::NotHeldBy { object: id, holder }),
        }
    }

    fn ensure_loose(&self, id: ObjectId) -> Result<(), WorldError> {
        match self.location(id)? {
            Location::Held(_) => Err(WorldError::ObjectHeld(id)),
            Location::Room(_) => Ok(()),
        }
    }

    /// Set an object's location and the gravity that comes with it. Objects
    /// it holds pick up the same gravity.
    fn place(&mut self, id: ObjectId, location: Location) -> Result<(), WorldError> {
        let gravity = match &location {
            Location::Room(room) => self.room_gravity(room)?,
            Location::Held(holder) => self.object(*holder)?.mass().gravity(),
        };
        let entity = self.entity(id)?;
        {
            let mut loc = self
                .world
                .get::<&mut Location>(entity)
                .map_err(|_| WorldError::NoSuchObject(id))?;
            *loc = location;
        }
        self.object_mut(id)?.set_gravity(gravity);
        self.spread_gravity(id, gravity)
    }

    /// Apply `gravity` to every object held by `id`, level by level.
    fn spread_gravity(&self, id: ObjectId, gravity: f64) -> Result<(), WorldError> {
        let mut frontier = vec![id];
        for _ in 0..MAX_HOLDER_DEPTH {
            let held: Vec<ObjectId> = self
                .world
                .query::<(&GameObject, &Location)>()
                .iter()
                .filter(|(_, (_, loc))| loc.holder().is_some_and(|h| frontier.contains(&h)))
                .map(|(_, (obj, _))| obj.id())
                .collect();
            if held.is_empty() {
                return Ok(());
            }
            for child in &held {
                self.object_mut(*child)?.set_gravity(gravity);
            }
            frontier = held;
        }
        Err(WorldError::SelfReference(id))
    }

    // ── Persistence hooks ──────────────────────────────────────────────

    pub(crate) fn entries(&self) -> Vec<(GameObject, Location)> {
        let mut entries: Vec<(GameObject, Location)> = self
            .world
            .query::<(&GameObject, &Location)>()
            .iter()
            .map(|(_, (obj, loc))| (obj.clone(), loc.clone()))
            .collect();
        entries.sort_by_key(|(obj, _)| obj.id());
        entries
    }

    pub(crate) fn next_id(&self) -> u64 {
        self.next_id
    }

    pub(crate) fn restore(
        rooms: Vec<Room>,
        blueprints: Vec<ObjectBlueprint>,
        entries: Vec<(GameObject, Location)>,
        next_id: u64,
    ) -> Self {
        let mut world = Self::new();
        world.next_id = next_id;
        for room in rooms {
            world.rooms.insert(room.key.clone(), room);
        }
        for bp in blueprints {
            world.blueprints.insert(bp.class.clone(), bp);
        }
        for (obj, loc) in entries {
            let id = obj.id();
            let entity = world.world.spawn((obj, loc));
            world.index.insert(id, entity);
        }
        world
    }

    pub fn save<W: std::io::Write>(&self, writer: W) -> Result<(), crate::persistence::SaveError> {
        crate::persistence::save_world(writer, self)
    }

    pub fn load<R: std::io::Read>(&mut self, reader: R) -> Result<(), crate::persistence::SaveError> {
        *self = crate::persistence::load_world(reader)?;
        Ok(())
    }
}
