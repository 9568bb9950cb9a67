//! Cosmetic particle bursts, recycled through an owned pool
//!
//! Spent particles drained from the manager are kept (up to the cap) and
//! refilled in place on the next burst instead of building new entities.

use glam::Vec2;
use rand::Rng;

use super::entity::{Entity, EntityKind};
use super::geometry::Vec2Ext;
use super::kinds::particle;
use super::manager::EntityManager;
use super::pool::Pool;

const BURST_SPEED_MIN: f32 = 60.0;
const BURST_SPEED_MAX: f32 = 180.0;
const LIFE_MIN: f32 = 0.3;
const LIFE_MAX: f32 = 0.7;
const SIZE_MIN: f32 = 3.0;
const SIZE_MAX: f32 = 6.0;

#[derive(Debug)]
pub struct ParticleSystem {
    pool: Pool<Entity>,
    max_particles: usize,
}

impl ParticleSystem {
    pub fn new(max_particles: usize) -> Self {
        Self {
            pool: Pool::with_capacity(max_particles),
            max_particles,
        }
    }

    /// Spawn up to `count` particles bursting out of `pos`. Never pushes the
    /// live + staged particle count past the cap. Returns how many were added.
    pub fn emit(
        &mut self,
        manager: &mut EntityManager,
        pos: Vec2,
        count: usize,
        color: [f32; 4],
        rng: &mut impl Rng,
    ) -> usize {
        let present =
            manager.count(EntityKind::Particle) + manager.pending_count(EntityKind::Particle);
        let count = count.min(self.max_particles.saturating_sub(present));

        for _ in 0..count {
            let angle = rng.random_range(0.0..std::f32::consts::TAU);
            let speed = rng.random_range(BURST_SPEED_MIN..BURST_SPEED_MAX);
            let vel = Vec2::X.rotated(angle) * speed;
            let life = rng.random_range(LIFE_MIN..LIFE_MAX);
            let size = rng.random_range(SIZE_MIN..SIZE_MAX);

            let entity = match self.pool.acquire() {
                Some(mut spent) => {
                    particle::respawn(&mut spent, pos, vel, size, life, color);
                    spent
                }
                None => particle::spawn(pos, vel, size, life, color),
            };
            manager.add(entity);
        }
        count
    }

    /// Keep spent particles from a manager cycle for reuse
    pub fn recycle(&mut self, removed: impl IntoIterator<Item = Entity>) {
        for entity in removed {
            if entity.kind() == EntityKind::Particle {
                self.pool.release(entity);
            }
        }
    }

    /// Spare particles waiting in the pool
    pub fn pooled(&self) -> usize {
        self.pool.len()
    }

    pub fn clear(&mut self) {
        self.pool.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::entity::Playfield;
    use crate::sim::kinds::player;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_emit_respects_cap() {
        let mut ps = ParticleSystem::new(10);
        let mut m = EntityManager::new();
        let mut rng = Pcg32::seed_from_u64(5);

        assert_eq!(ps.emit(&mut m, Vec2::ZERO, 6, [1.0; 4], &mut rng), 6);
        // Staged particles count toward the cap
        assert_eq!(ps.emit(&mut m, Vec2::ZERO, 6, [1.0; 4], &mut rng), 4);
        assert_eq!(ps.emit(&mut m, Vec2::ZERO, 6, [1.0; 4], &mut rng), 0);
        assert_eq!(m.pending_count(EntityKind::Particle), 10);
    }

    #[test]
    fn test_spent_particles_are_reused() {
        let field = Playfield::new(800.0, 600.0);
        let mut ps = ParticleSystem::new(16);
        let mut m = EntityManager::new();
        let mut rng = Pcg32::seed_from_u64(6);

        ps.emit(&mut m, Vec2::new(100.0, 100.0), 4, [1.0; 4], &mut rng);
        m.add(player::spawn(Vec2::new(400.0, 540.0)));
        m.update(1.0, &field); // every particle outlives at most 0.7s
        m.update(0.016, &field);
        ps.recycle(m.drain_removed());
        assert_eq!(ps.pooled(), 4);

        ps.emit(&mut m, Vec2::new(50.0, 50.0), 2, [0.5; 4], &mut rng);
        assert_eq!(ps.pooled(), 2);
        m.update(0.0, &field);
        let fresh: Vec<_> = m.by_kind(EntityKind::Particle).collect();
        assert_eq!(fresh.len(), 2);
        assert!(fresh.iter().all(|p| p.is_active() && p.pos() == Vec2::new(50.0, 50.0)));
        // The player was never pooled
        assert!(m.player().is_some());
    }
}
