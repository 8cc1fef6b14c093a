//! Bounded entity pools
//!
//! Each entity kind lives in its own pool with a hard capacity. Spawning into
//! a full pool is silently dropped, never queued. The caps bound the pairwise
//! collision cost and keep the playfield from saturating with projectiles.

use serde::Serialize;

/// Unique, monotonic entity identifier (render key and explosion aging only)
pub type EntityId = u32;

/// Which edge of the playfield an entity leaves through
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exit {
    /// Pruned once `y <= 0` (player bullets)
    Top,
    /// Pruned once `y >= height` (everything that descends)
    Bottom,
}

/// An entity that can be stored in a pool and moved vertically
pub trait PoolEntity {
    fn id(&self) -> EntityId;
    fn y(&self) -> f32;
    fn y_mut(&mut self) -> &mut f32;
    /// Edge that removes this entity
    fn exit(&self) -> Exit {
        Exit::Bottom
    }

    fn left_playfield(&self, height: f32) -> bool {
        match self.exit() {
            Exit::Top => self.y() <= 0.0,
            Exit::Bottom => self.y() >= height,
        }
    }
}

/// Result of a spawn request
#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpawnOutcome {
    Accepted,
    /// Pool at capacity; the entity was dropped
    Rejected,
}

impl SpawnOutcome {
    pub fn accepted(self) -> bool {
        self == SpawnOutcome::Accepted
    }
}

/// Fixed-capacity collection of live entities, kept in spawn order
#[derive(Debug, Clone, Serialize)]
#[serde(transparent)]
pub struct Pool<T> {
    items: Vec<T>,
    #[serde(skip)]
    capacity: usize,
}

impl<T: PoolEntity> Pool<T> {
    pub fn new(capacity: usize) -> Self {
        Self {
            items: Vec::with_capacity(capacity),
            capacity,
        }
    }

    pub fn spawn(&mut self, entity: T) -> SpawnOutcome {
        if self.items.len() >= self.capacity {
            return SpawnOutcome::Rejected;
        }
        self.items.push(entity);
        SpawnOutcome::Accepted
    }

    /// Move every entity by `velocity * dt_factor` and prune the ones that
    /// left the playfield. Returns the number pruned.
    pub fn advance(&mut self, velocity: f32, dt_factor: f32, height: f32) -> usize {
        let delta = velocity * dt_factor;
        for entity in &mut self.items {
            *entity.y_mut() += delta;
        }
        self.remove_where(|e| e.left_playfield(height))
    }

    /// Remove every entity matching the predicate. Returns the number removed.
    pub fn remove_where<F>(&mut self, mut predicate: F) -> usize
    where
        F: FnMut(&T) -> bool,
    {
        let before = self.items.len();
        self.items.retain(|e| !predicate(e));
        before - self.items.len()
    }

    /// Remove the entities with the given ids
    pub fn remove_ids(&mut self, ids: &[EntityId]) -> usize {
        if ids.is_empty() {
            return 0;
        }
        self.remove_where(|e| ids.contains(&e.id()))
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.items.len() >= self.capacity
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, T> {
        self.items.iter_mut()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.items
    }
}

impl<'a, T: PoolEntity> IntoIterator for &'a Pool<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
