use serde::{Deserialize, Serialize};

pub type PlayerId = String;
pub type PrototypeId = usize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
  pub x: f64,
  pub y: f64,
}

/// Identifies a pooled networked instance and the prototype it was created
/// from. Handles are stamped with their bucket so a release to the wrong
/// bucket can be rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntityHandle {
  pub id: u32,
  pub prototype: PrototypeId,
}

#[derive(Debug, Clone)]
pub struct Consumable {
  pub handle: EntityHandle,
  pub position: Vec2,
  pub color: String,
}

/// What a segment trails behind: the owning player's head, or the segment
/// appended just before it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FollowTarget {
  Head,
  Segment(u32),
}

#[derive(Debug, Clone)]
pub struct Segment {
  pub id: u32,
  // Non-owning back-reference; ownership flows only Player -> Segment.
  pub owner: PlayerId,
  pub follow: FollowTarget,
  pub position: Vec2,
  pub heading: Vec2,
  pub color: String,
  pub draw_order: i32,
}

#[derive(Debug, Clone)]
pub struct Player {
  pub id: PlayerId,
  pub name: String,
  pub position: Vec2,
  pub heading: Vec2,
  pub target: Vec2,
  // Server-writable only; replicated to every observer.
  pub length: u16,
  // Segment ids in chain order, head side first.
  pub segments: Vec<u32>,
  pub last_collided_color: String,
  pub last_claim_at: i64,
  pub connected: bool,
  pub last_seen: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct SegmentSnapshot {
  pub position: Vec2,
  pub color: String,
  pub order: i32,
}

#[derive(Debug, Clone, Serialize)]
pub struct PlayerSnapshot {
  pub id: PlayerId,
  pub name: String,
  pub position: Vec2,
  pub heading: Vec2,
  pub length: u16,
  pub segments: Vec<SegmentSnapshot>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ConsumableSnapshot {
  pub id: u32,
  pub position: Vec2,
  pub color: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct GameStateSnapshot {
  pub now: i64,
  pub consumables: Vec<ConsumableSnapshot>,
  pub players: Vec<PlayerSnapshot>,
}
