//! Motion integration and pairwise collision dispatch
//!
//! Collision geometry is always the entity's bounding box. Which pairs are
//! even tested is decided by a static kind-pair allow-list.

use super::entity::{Entity, EntityKind};

/// Whether two kinds interact at all. Symmetric by construction: every arm
/// matches both orders.
pub fn can_collide(a: EntityKind, b: EntityKind) -> bool {
    use EntityKind::*;
    matches!(
        (a, b),
        (Player, Enemy)
            | (Enemy, Player)
            | (Player, PowerUp)
            | (PowerUp, Player)
            | (Player, Barrel)
            | (Barrel, Player)
            | (Player, Projectile)
            | (Projectile, Player)
            | (Enemy, Projectile)
            | (Projectile, Enemy)
            | (Barrel, Projectile)
            | (Projectile, Barrel)
    )
}

/// Allowed kinds and overlapping boxes, both entities active
pub fn colliding(a: &Entity, b: &Entity) -> bool {
    a.is_active()
        && b.is_active()
        && can_collide(a.kind(), b.kind())
        && a.bounds().overlaps(&b.bounds())
}

/// Euler integration followed by an O(n²) overlap scan
#[derive(Debug, Default, Clone, Copy)]
pub struct PhysicsSystem;

impl PhysicsSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Move every active entity, then dispatch collisions. Returns how many
    /// contacts were dispatched.
    pub fn update(&self, dt: f32, entities: &mut [Entity]) -> usize {
        let mut contacts = 0;

        for entity in entities.iter_mut().filter(|e| e.is_active()) {
            entity.transform.pos += entity.transform.vel * dt;
        }

        for i in 0..entities.len() {
            let (head, tail) = entities.split_at_mut(i + 1);
            let a = &mut head[i];
            for b in tail.iter_mut() {
                // `a` may have died earlier in this scan
                if !a.is_active() {
                    break;
                }
                if !colliding(a, b) {
                    continue;
                }
                contacts += 1;
                a.on_collision(b);
                b.on_collision(a);
            }
        }
        contacts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::PLAYER_HEALTH;
    use crate::sim::entity::DespawnReason;
    use crate::sim::kinds::{EnemyKind, Owner, PowerUpKind, barrel, enemy, particle, pickup, player, projectile};
    use crate::sim::level::LevelConfig;
    use glam::Vec2;
    use proptest::prelude::*;

    fn kind_strategy() -> impl Strategy<Value = EntityKind> {
        prop::sample::select(EntityKind::ALL.to_vec())
    }

    #[test]
    fn test_particles_collide_with_nothing() {
        for kind in EntityKind::ALL {
            assert!(!can_collide(EntityKind::Particle, kind));
        }
    }

    #[test]
    fn test_integration() {
        let mut entities = vec![particle::spawn(Vec2::ZERO, Vec2::new(10.0, -20.0), 2.0, 1.0, [1.0; 4])];
        PhysicsSystem::new().update(0.5, &mut entities);
        assert_eq!(entities[0].pos(), Vec2::new(5.0, -10.0));
    }

    #[test]
    fn test_inactive_entities_do_not_move() {
        let mut e = particle::spawn(Vec2::ZERO, Vec2::new(10.0, 0.0), 2.0, 1.0, [1.0; 4]);
        e.destroy(DespawnReason::Expired);
        let mut entities = vec![e];
        PhysicsSystem::new().update(1.0, &mut entities);
        assert_eq!(entities[0].pos(), Vec2::ZERO);
    }

    #[test]
    fn test_projectile_kills_enemy_in_either_order() {
        for swap in [false, true] {
            let shot = projectile::spawn(Owner::Player, Vec2::new(100.0, 100.0), Vec2::ZERO, 1);
            let foe = enemy::spawn(EnemyKind::Basic, Vec2::new(100.0, 100.0), &LevelConfig::BASE);
            let mut entities = if swap { vec![foe, shot] } else { vec![shot, foe] };
            let contacts = PhysicsSystem::new().update(0.0, &mut entities);

            assert!(entities.iter().all(|e| !e.is_active()));
            let foe = entities.iter().find(|e| e.kind() == EntityKind::Enemy).unwrap();
            assert_eq!(foe.despawn_reason(), Some(DespawnReason::Killed));
            assert_eq!(contacts, 1);
        }
    }

    #[test]
    fn test_single_hit_projectile() {
        let pos = Vec2::new(200.0, 200.0);
        let mut entities = vec![
            projectile::spawn(Owner::Player, pos, Vec2::ZERO, 1),
            enemy::spawn(EnemyKind::Basic, pos, &LevelConfig::BASE),
            enemy::spawn(EnemyKind::Basic, pos, &LevelConfig::BASE),
        ];
        PhysicsSystem::new().update(0.0, &mut entities);
        let alive = entities
            .iter()
            .filter(|e| e.kind() == EntityKind::Enemy && e.is_active())
            .count();
        assert_eq!(alive, 1);
    }

    #[test]
    fn test_separated_boxes_do_not_collide() {
        let mut entities = vec![
            player::spawn(Vec2::new(100.0, 100.0)),
            enemy::spawn(EnemyKind::Basic, Vec2::new(300.0, 100.0), &LevelConfig::BASE),
        ];
        assert_eq!(PhysicsSystem::new().update(0.0, &mut entities), 0);
        assert!(entities.iter().all(|e| e.is_active()));
    }

    #[test]
    fn test_player_pickup_and_barrel_contacts() {
        let pos = Vec2::new(100.0, 100.0);
        let mut entities = vec![
            player::spawn(pos),
            pickup::spawn(PowerUpKind::Shield, pos),
            barrel::spawn_with(pos, PowerUpKind::MultiShot),
        ];
        assert_eq!(PhysicsSystem::new().update(0.0, &mut entities), 2);
        assert!(entities[0].is_active());
        assert_eq!(entities[0].health(), PLAYER_HEALTH);
        assert_eq!(entities[1].despawn_reason(), Some(DespawnReason::Collected));
        assert_eq!(entities[2].despawn_reason(), Some(DespawnReason::Collided));
    }

    proptest! {
        #[test]
        fn allow_list_is_symmetric(a in kind_strategy(), b in kind_strategy()) {
            prop_assert_eq!(can_collide(a, b), can_collide(b, a));
        }

        #[test]
        fn detection_is_symmetric(
            dx in -80.0f32..80.0, dy in -80.0f32..80.0,
        ) {
            let a = player::spawn(Vec2::new(200.0, 200.0));
            let b = enemy::spawn(EnemyKind::Heavy, Vec2::new(200.0 + dx, 200.0 + dy), &LevelConfig::BASE);
            prop_assert_eq!(colliding(&a, &b), colliding(&b, &a));
        }
    }
}
