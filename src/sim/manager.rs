//! Entity ownership with deferred membership changes
//!
//! Additions and removals are staged and only applied at the start of
//! `update`, so nothing iterating the live set ever sees it change under it.
//! An entity deactivated during frame N stays visible (inactive) for the
//! rest of frame N and is gone once frame N+1's update has run.

use std::collections::{HashMap, HashSet};

use super::entity::{Entity, EntityId, EntityKind, Playfield};

#[derive(Debug, Default)]
pub struct EntityManager {
    live: Vec<Entity>,
    pending_add: Vec<Entity>,
    pending_remove: HashSet<EntityId>,
    /// Indices into `live`, per kind; rebuilt whenever membership changes
    by_kind: [Vec<usize>; EntityKind::COUNT],
    slots: HashMap<EntityId, usize>,
    /// Entities dropped by the most recent update
    removed: Vec<Entity>,
}

impl EntityManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stage an entity; it becomes visible after the next `update`
    pub fn add(&mut self, entity: Entity) -> EntityId {
        let id = entity.id();
        self.pending_add.push(entity);
        id
    }

    /// Stage an entity for removal at the next `update`
    pub fn remove(&mut self, id: EntityId) {
        self.pending_remove.insert(id);
    }

    /// One cycle: promote additions, drop removals and dead entities, then
    /// update everything still active.
    pub fn update(&mut self, dt: f32, field: &Playfield) {
        self.removed.clear();

        // (a) promote staged additions
        self.live.append(&mut self.pending_add);

        // (b) drop staged removals plus anything already inactive
        let pending = std::mem::take(&mut self.pending_remove);
        let (keep, gone): (Vec<Entity>, Vec<Entity>) = std::mem::take(&mut self.live)
            .into_iter()
            .partition(|e| e.is_active() && !pending.contains(&e.id()));
        self.live = keep;
        self.removed = gone;
        self.reindex();

        // (c) update; anything that dies here is staged for the next cycle
        for entity in &mut self.live {
            entity.update(dt, field);
            if !entity.is_active() {
                self.pending_remove.insert(entity.id());
            }
        }
    }

    fn reindex(&mut self) {
        for list in &mut self.by_kind {
            list.clear();
        }
        self.slots.clear();
        for (i, entity) in self.live.iter().enumerate() {
            self.by_kind[entity.kind().index()].push(i);
            self.slots.insert(entity.id(), i);
        }
    }

    /// Entities removed by the most recent update (for pool reclamation)
    pub fn drain_removed(&mut self) -> Vec<Entity> {
        std::mem::take(&mut self.removed)
    }

    /// Forget everything, staged or live
    pub fn clear(&mut self) {
        self.live.clear();
        self.pending_add.clear();
        self.pending_remove.clear();
        self.removed.clear();
        self.reindex();
    }

    pub fn all(&self) -> &[Entity] {
        &self.live
    }

    pub fn all_mut(&mut self) -> &mut [Entity] {
        &mut self.live
    }

    pub fn by_kind(&self, kind: EntityKind) -> impl Iterator<Item = &Entity> + '_ {
        self.by_kind[kind.index()].iter().map(|&i| &self.live[i])
    }

    /// Mutable access to every live entity of `kind`
    pub fn by_kind_mut(&mut self, kind: EntityKind) -> impl Iterator<Item = &mut Entity> + '_ {
        self.live.iter_mut().filter(move |e| e.kind() == kind)
    }

    /// Live entities of `kind` (active or awaiting removal)
    pub fn count(&self, kind: EntityKind) -> usize {
        self.by_kind[kind.index()].len()
    }

    /// Staged entities of `kind`
    pub fn pending_count(&self, kind: EntityKind) -> usize {
        self.pending_add.iter().filter(|e| e.kind() == kind).count()
    }

    pub fn has(&self, kind: EntityKind) -> bool {
        !self.by_kind[kind.index()].is_empty()
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.slots.get(&id).map(|&i| &self.live[i])
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.slots.get(&id).map(|&i| &mut self.live[i])
    }

    /// The live player, preferring an active one
    pub fn player(&self) -> Option<&Entity> {
        let mut players = self.by_kind(EntityKind::Player);
        let first = players.next()?;
        if first.is_active() {
            return Some(first);
        }
        players.find(|p| p.is_active()).or(Some(first))
    }

    pub fn player_mut(&mut self) -> Option<&mut Entity> {
        let id = self.player()?.id();
        self.get_mut(id)
    }

    /// Live entity count
    pub fn len(&self) -> usize {
        self.live.len()
    }

    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }

    /// Entities waiting to be promoted
    pub fn pending_len(&self) -> usize {
        self.pending_add.len()
    }
}
