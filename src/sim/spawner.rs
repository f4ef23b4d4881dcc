//! Spawn timer and falling-object generation
//!
//! A timer accumulates tick deltas; each time it reaches the current spawn
//! interval a batch is emitted and the timer restarts from zero.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::state::{FallingObject, ObjectKind};
use crate::config::GameConfig;
use crate::consts::*;

/// What the spawner needs to know about the current tick
#[derive(Debug, Clone, Copy)]
pub struct SpawnContext {
    pub elapsed: f32,
    pub spawn_interval: f32,
    pub crazy: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Spawner {
    /// Frames accumulated since the last batch
    timer: f32,
}

impl Spawner {
    pub fn timer(&self) -> f32 {
        self.timer
    }

    /// Accumulate `delta_frames`; emit a batch once the interval is reached.
    /// IDs are assigned consecutively from `first_id`.
    pub fn try_spawn<R: Rng>(
        &mut self,
        delta_frames: f32,
        ctx: SpawnContext,
        config: &GameConfig,
        rng: &mut R,
        first_id: u32,
    ) -> Vec<FallingObject> {
        self.timer += delta_frames;
        if self.timer < ctx.spawn_interval {
            return Vec::new();
        }
        self.timer = 0.0;

        let count = batch_size(ctx.elapsed, config.easy_phase, ctx.crazy);
        (0..count)
            .map(|i| spawn_object(first_id + i as u32, ctx.crazy, config, rng))
            .collect()
    }
}

/// Objects per batch. Crazy mode takes precedence over elapsed time.
pub fn batch_size(elapsed: f32, easy_phase: f32, crazy: bool) -> usize {
    if crazy {
        CRAZY_BATCH
    } else if elapsed >= easy_phase {
        RAMP_BATCH
    } else {
        EASY_BATCH
    }
}

/// Pick a kind from a uniform draw `r` in [0, 1)
///
/// Normal: 15% bomb, 15% bad egg, 60% egg, 10% gold.
/// Crazy:  30% bomb, 30% bad egg, 30% egg, 10% gold.
pub fn select_kind(r: f32, crazy: bool) -> ObjectKind {
    let (bomb, bad_egg) = if crazy { (0.30, 0.60) } else { (0.15, 0.30) };
    if r < bomb {
        ObjectKind::Bomb
    } else if r < bad_egg {
        ObjectKind::BadEgg
    } else if r < 0.90 {
        ObjectKind::Egg
    } else {
        ObjectKind::Gold
    }
}

/// Fall speed for a kind. `r` is a uniform draw used for jitter (bombs ignore it).
pub fn fall_speed(kind: ObjectKind, r: f32, config: &GameConfig) -> f32 {
    match kind {
        ObjectKind::Bomb => config.bomb_speed,
        ObjectKind::Egg | ObjectKind::BadEgg => config.egg_speed + r * EGG_SPEED_JITTER,
        ObjectKind::Gold => config.egg_speed + r * GOLD_SPEED_JITTER,
    }
}

/// Create one object above the visible area at a random column
pub fn spawn_object<R: Rng>(
    id: u32,
    crazy: bool,
    config: &GameConfig,
    rng: &mut R,
) -> FallingObject {
    let kind = select_kind(rng.random::<f32>(), crazy);
    let vertical_speed = match kind {
        ObjectKind::Bomb => fall_speed(kind, 0.0, config),
        _ => fall_speed(kind, rng.random::<f32>(), config),
    };
    let span = config.screen_width - SPAWN_MARGIN * 2.0;
    let x = SPAWN_MARGIN + rng.random::<f32>() * span;
    let rotation_speed = (rng.random::<f32>() - 0.5) * SPAWN_ROTATION_RANGE;

    FallingObject {
        id,
        kind,
        pos: Vec2::new(x, SPAWN_Y),
        vertical_speed,
        rotation_speed,
        rotation: 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn ctx(elapsed: f32, crazy: bool) -> SpawnContext {
        SpawnContext {
            elapsed,
            spawn_interval: 60.0,
            crazy,
        }
    }

    #[test]
    fn test_select_kind_thresholds() {
        assert_eq!(select_kind(0.0, false), ObjectKind::Bomb);
        assert_eq!(select_kind(0.149, false), ObjectKind::Bomb);
        assert_eq!(select_kind(0.15, false), ObjectKind::BadEgg);
        assert_eq!(select_kind(0.30, false), ObjectKind::Egg);
        assert_eq!(select_kind(0.899, false), ObjectKind::Egg);
        assert_eq!(select_kind(0.90, false), ObjectKind::Gold);

        assert_eq!(select_kind(0.29, true), ObjectKind::Bomb);
        assert_eq!(select_kind(0.59, true), ObjectKind::BadEgg);
        assert_eq!(select_kind(0.60, true), ObjectKind::Egg);
        assert_eq!(select_kind(0.95, true), ObjectKind::Gold);
    }

    #[test]
    fn test_kind_distribution_normal() {
        let mut rng = Pcg32::seed_from_u64(2024);
        let draws = 100_000;
        let mut counts = [0usize; 4];
        for _ in 0..draws {
            let idx = match select_kind(rng.random::<f32>(), false) {
                ObjectKind::Bomb => 0,
                ObjectKind::BadEgg => 1,
                ObjectKind::Egg => 2,
                ObjectKind::Gold => 3,
            };
            counts[idx] += 1;
        }
        let expected = [0.15, 0.15, 0.60, 0.10];
        for (count, want) in counts.iter().zip(expected) {
            let share = *count as f64 / draws as f64;
            assert!(
                (share - want).abs() < 0.01,
                "share {share} too far from {want}"
            );
        }
    }

    #[test]
    fn test_batch_sizes() {
        let config = GameConfig::default();
        let mut rng = Pcg32::seed_from_u64(1);

        let mut spawner = Spawner::default();
        assert_eq!(spawner.try_spawn(60.0, ctx(10.0, false), &config, &mut rng, 1).len(), 2);

        let mut spawner = Spawner::default();
        assert_eq!(spawner.try_spawn(60.0, ctx(50.0, false), &config, &mut rng, 1).len(), 4);

        for elapsed in [10.0, 50.0, 95.0, 119.0] {
            let mut spawner = Spawner::default();
            let batch = spawner.try_spawn(60.0, ctx(elapsed, true), &config, &mut rng, 1);
            assert_eq!(batch.len(), 6);
        }
    }

    #[test]
    fn test_timer_accumulates_and_resets() {
        let config = GameConfig::default();
        let mut rng = Pcg32::seed_from_u64(5);
        let mut spawner = Spawner::default();

        for _ in 0..59 {
            assert!(spawner.try_spawn(1.0, ctx(10.0, false), &config, &mut rng, 1).is_empty());
        }
        let batch = spawner.try_spawn(1.0, ctx(10.0, false), &config, &mut rng, 40);
        assert_eq!(batch.len(), 2);
        assert_eq!(batch[0].id, 40);
        assert_eq!(batch[1].id, 41);
        assert_eq!(spawner.timer(), 0.0);
    }

    #[test]
    fn test_spawned_objects_in_bounds() {
        let config = GameConfig::default();
        let mut rng = Pcg32::seed_from_u64(77);
        for id in 0..1000 {
            let obj = spawn_object(id, id % 2 == 0, &config, &mut rng);
            assert!(obj.pos.x >= SPAWN_MARGIN);
            assert!(obj.pos.x <= config.screen_width - SPAWN_MARGIN);
            assert_eq!(obj.pos.y, SPAWN_Y);
            assert!(obj.rotation_speed.abs() <= SPAWN_ROTATION_RANGE / 2.0);
            match obj.kind {
                ObjectKind::Bomb => assert_eq!(obj.vertical_speed, config.bomb_speed),
                ObjectKind::Gold => {
                    assert!(obj.vertical_speed >= 4.0 && obj.vertical_speed < 5.5)
                }
                _ => assert!(obj.vertical_speed >= 4.0 && obj.vertical_speed < 6.0),
            }
        }
    }
}
