pub const TICK_MS: u64 = 50;

pub const PLAYER_SPEED: f64 = 3.0;
pub const PLAYER_TIMEOUT_MS: i64 = 15000;

pub const MAP_MIN_X: f64 = -9.0;
pub const MAP_MAX_X: f64 = 9.0;
pub const MAP_MIN_Y: f64 = -5.0;
pub const MAP_MAX_Y: f64 = 5.0;

// Per-prototype population ceiling, also the size of the initial batch.
pub const MAX_CONSUMABLE_COUNT: usize = 30;
pub const SPAWN_INTERVAL_MS: i64 = 2000;
pub const POOL_PREWARM_COUNT: usize = 30;
pub const CONSUME_RADIUS: f64 = 0.4;

pub const SEGMENT_DISTANCE: f64 = 0.3;
pub const SEGMENT_DELAY: f64 = 0.1;
pub const SEGMENT_MOVE_STEP: f64 = 10.0;

pub const CLAIM_COOLDOWN_MS: i64 = 500;

pub const CONSUMABLE_COLORS: [&str; 6] = [
  "#ff6b6b",
  "#ffd166",
  "#06d6a0",
  "#4dabf7",
  "#f06595",
  "#845ef7",
];
