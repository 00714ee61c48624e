use super::constants::{
  CONSUMABLE_COLORS, MAP_MAX_X, MAP_MAX_Y, MAP_MIN_X, MAP_MIN_Y, MAX_CONSUMABLE_COUNT,
  POOL_PREWARM_COUNT, SPAWN_INTERVAL_MS,
};
use super::pool::EntityPool;
use super::types::{PrototypeId, Vec2};
use rand::Rng;

#[derive(Debug, Clone, Copy)]
pub struct SpawnOrder {
  pub prototype: PrototypeId,
  pub position: Vec2,
}

/// Keeps the arena stocked with consumables: a synchronous initial batch on
/// first simulation start, then one interval-gated spawn at a time while at
/// least one client is connected.
#[derive(Debug)]
pub struct ConsumableSpawner {
  started: bool,
  next_spawn_at: i64,
}

impl ConsumableSpawner {
  pub fn new() -> Self {
    Self {
      started: false,
      next_spawn_at: 0,
    }
  }

  pub fn started(&self) -> bool {
    self.started
  }

  /// First-start initialization: pre-warms the pool and emits the initial
  /// batch of spawn orders. Idempotent.
  pub fn start(&mut self, pool: &mut EntityPool, now: i64) -> Vec<SpawnOrder> {
    if self.started {
      return Vec::new();
    }
    self.started = true;
    self.next_spawn_at = now + SPAWN_INTERVAL_MS;
    pool.prewarm(POOL_PREWARM_COUNT);
    (0..MAX_CONSUMABLE_COUNT).map(|_| Self::roll()).collect()
  }

  /// Interval check, re-evaluated every tick. The connection-count gate is
  /// what stops and resumes spawning; no explicit restart exists. A roll for
  /// a prototype already at its ceiling skips that interval entirely.
  pub fn tick(&mut self, pool: &EntityPool, connected: usize, now: i64) -> Option<SpawnOrder> {
    if !self.started || now < self.next_spawn_at {
      return None;
    }
    self.next_spawn_at = now + SPAWN_INTERVAL_MS;
    if connected == 0 {
      return None;
    }
    let order = Self::roll();
    if pool.active_count(order.prototype) < MAX_CONSUMABLE_COUNT {
      Some(order)
    } else {
      None
    }
  }

  fn roll() -> SpawnOrder {
    let mut rng = rand::thread_rng();
    SpawnOrder {
      prototype: rng.gen_range(0..CONSUMABLE_COLORS.len()),
      position: Vec2 {
        x: rng.gen_range(MAP_MIN_X..=MAP_MAX_X),
        y: rng.gen_range(MAP_MIN_Y..=MAP_MAX_Y),
      },
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::game::types::EntityHandle;

  fn in_bounds(position: Vec2) -> bool {
    position.x >= MAP_MIN_X
      && position.x <= MAP_MAX_X
      && position.y >= MAP_MIN_Y
      && position.y <= MAP_MAX_Y
  }

  #[test]
  fn start_emits_initial_batch_once() {
    let mut pool = EntityPool::new(CONSUMABLE_COLORS.len());
    let mut spawner = ConsumableSpawner::new();

    let orders = spawner.start(&mut pool, 0);
    assert_eq!(orders.len(), MAX_CONSUMABLE_COUNT);
    for order in &orders {
      assert!(order.prototype < CONSUMABLE_COLORS.len());
      assert!(in_bounds(order.position));
    }
    assert_eq!(pool.total_instantiated(0), POOL_PREWARM_COUNT);

    assert!(spawner.start(&mut pool, 0).is_empty());
  }

  #[test]
  fn tick_waits_for_interval() {
    let mut pool = EntityPool::new(CONSUMABLE_COLORS.len());
    let mut spawner = ConsumableSpawner::new();
    spawner.start(&mut pool, 0);

    assert!(spawner.tick(&pool, 1, SPAWN_INTERVAL_MS - 1).is_none());
    assert!(spawner.tick(&pool, 1, SPAWN_INTERVAL_MS).is_some());
  }

  #[test]
  fn tick_skips_while_no_client_connected() {
    let mut pool = EntityPool::new(CONSUMABLE_COLORS.len());
    let mut spawner = ConsumableSpawner::new();
    spawner.start(&mut pool, 0);

    assert!(spawner.tick(&pool, 0, SPAWN_INTERVAL_MS).is_none());
    // The gate is re-evaluated on the next interval, nothing to restart.
    assert!(spawner.tick(&pool, 1, SPAWN_INTERVAL_MS * 2).is_some());
  }

  #[test]
  fn tick_respects_population_ceiling() {
    let mut pool = EntityPool::new(CONSUMABLE_COLORS.len());
    let mut spawner = ConsumableSpawner::new();
    spawner.start(&mut pool, 0);

    for prototype in 0..CONSUMABLE_COLORS.len() {
      for _ in 0..MAX_CONSUMABLE_COUNT {
        pool.acquire(prototype);
      }
    }
    // Every prototype is at its ceiling, so no roll may spawn.
    for step in 1..=16 {
      assert!(spawner.tick(&pool, 1, SPAWN_INTERVAL_MS * step).is_none());
    }

    // Dropping prototype 0 below the ceiling allows spawning again, but only
    // for that prototype.
    let handle = EntityHandle { id: 1, prototype: 0 };
    pool.release(handle, 0);
    let mut spawned = None;
    for step in 17..2000 {
      if let Some(order) = spawner.tick(&pool, 1, SPAWN_INTERVAL_MS * step) {
        spawned = Some(order);
        break;
      }
    }
    let order = spawned.expect("a below-ceiling prototype spawns eventually");
    assert_eq!(order.prototype, 0);
  }
}
