pub mod arbiter;
pub mod constants;
pub mod growth;
pub mod input;
pub mod math;
pub mod physics;
pub mod pool;
pub mod room;
pub mod spawner;
pub mod types;
