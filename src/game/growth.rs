use super::constants::{SEGMENT_DELAY, SEGMENT_DISTANCE, SEGMENT_MOVE_STEP};
use super::math::{add, lerp, normalize, scale, sub};
use super::types::{FollowTarget, Player, Segment};
use std::collections::HashMap;

/// Server-authority growth step: bumps the length counter and appends one
/// segment to the chain. Callable for any player regardless of which event
/// triggered it (consumable eaten, rival defeated). Returns the new segment
/// id.
pub fn add_length(
  player: &mut Player,
  segments: &mut HashMap<u32, Segment>,
  next_segment_id: &mut u32,
) -> u32 {
  player.length = player.length.saturating_add(1);
  append_segment(player, segments, next_segment_id)
}

fn append_segment(
  player: &mut Player,
  segments: &mut HashMap<u32, Segment>,
  next_segment_id: &mut u32,
) -> u32 {
  let follow = match player.segments.last() {
    Some(tail_id) => FollowTarget::Segment(*tail_id),
    None => FollowTarget::Head,
  };
  let id = *next_segment_id;
  *next_segment_id += 1;
  segments.insert(
    id,
    Segment {
      id,
      owner: player.id.clone(),
      follow,
      // New segments appear at the head and fall into place as the chain
      // advances.
      position: player.position,
      heading: player.heading,
      color: player.last_collided_color.clone(),
      // Later segments render beneath earlier ones.
      draw_order: -(player.length as i32),
    },
  );
  player.segments.push(id);
  id
}

/// Reconciles a chain to `length - 1` entries by appending the missing
/// segments. Used when a player object materializes with nonzero length
/// already on the books (reconnects), so observers see a complete chain
/// rather than one that grows from scratch.
pub fn backfill_segments(
  player: &mut Player,
  segments: &mut HashMap<u32, Segment>,
  next_segment_id: &mut u32,
) {
  while player.segments.len() + 1 < player.length as usize {
    append_segment(player, segments, next_segment_id);
  }
}

/// Cascade-destroys every segment owned by the player. Order is arbitrary;
/// no segment may outlive its owner.
pub fn release_segments(player: &mut Player, segments: &mut HashMap<u32, Segment>) {
  for id in player.segments.drain(..) {
    segments.remove(&id);
  }
}

/// Follow-the-leader motion: each segment trails its follow target by a
/// fixed distance, smoothed by a delay factor. Walked in chain order so each
/// segment sees its predecessor's already-advanced position.
pub fn advance_segments(player: &Player, segments: &mut HashMap<u32, Segment>, dt: f64) {
  let mut leader_position = player.position;
  let mut leader_heading = player.heading;

  for id in &player.segments {
    let Some(segment) = segments.get_mut(id) else { continue };
    let mut target = sub(leader_position, scale(leader_heading, SEGMENT_DISTANCE));
    target = add(target, scale(sub(segment.position, target), SEGMENT_DELAY));
    let previous = segment.position;
    segment.position = lerp(segment.position, target, dt * SEGMENT_MOVE_STEP);
    let travelled = sub(segment.position, previous);
    if travelled.x != 0.0 || travelled.y != 0.0 {
      segment.heading = normalize(travelled);
    }
    leader_position = segment.position;
    leader_heading = segment.heading;
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::game::types::{PlayerId, Vec2};

  fn make_player(id: &str, length: u16) -> Player {
    Player {
      id: PlayerId::from(id),
      name: "Test".to_string(),
      position: Vec2 { x: 0.0, y: 0.0 },
      heading: Vec2 { x: 0.0, y: 1.0 },
      target: Vec2 { x: 0.0, y: 0.0 },
      length,
      segments: Vec::new(),
      last_collided_color: "#ffffff".to_string(),
      last_claim_at: 0,
      connected: true,
      last_seen: 0,
    }
  }

  #[test]
  fn add_length_appends_one_segment_per_step() {
    let mut player = make_player("p1", 1);
    let mut segments = HashMap::new();
    let mut next_id = 1;

    player.last_collided_color = "#ff6b6b".to_string();
    add_length(&mut player, &mut segments, &mut next_id);
    assert_eq!(player.length, 2);
    assert_eq!(player.segments.len(), 1);

    add_length(&mut player, &mut segments, &mut next_id);
    assert_eq!(player.length, 3);
    assert_eq!(player.segments.len(), 2);
    assert_eq!(segments.len(), player.length as usize - 1);
  }

  #[test]
  fn appended_segment_takes_last_collided_color_and_order() {
    let mut player = make_player("p1", 1);
    let mut segments = HashMap::new();
    let mut next_id = 1;

    player.last_collided_color = "#06d6a0".to_string();
    let id = add_length(&mut player, &mut segments, &mut next_id);
    let segment = &segments[&id];
    assert_eq!(segment.color, "#06d6a0");
    assert_eq!(segment.draw_order, -2);
    assert_eq!(segment.owner, player.id);
  }

  #[test]
  fn chain_anchors_head_then_previous_tail() {
    let mut player = make_player("p1", 1);
    let mut segments = HashMap::new();
    let mut next_id = 1;

    let first = add_length(&mut player, &mut segments, &mut next_id);
    let second = add_length(&mut player, &mut segments, &mut next_id);

    assert_eq!(segments[&first].follow, FollowTarget::Head);
    assert_eq!(segments[&second].follow, FollowTarget::Segment(first));
  }

  #[test]
  fn backfill_restores_full_chain() {
    let mut player = make_player("p1", 5);
    let mut segments = HashMap::new();
    let mut next_id = 1;

    backfill_segments(&mut player, &mut segments, &mut next_id);
    assert_eq!(player.segments.len(), 4);
    assert_eq!(segments.len(), 4);

    // Already-complete chains are untouched.
    backfill_segments(&mut player, &mut segments, &mut next_id);
    assert_eq!(player.segments.len(), 4);
  }

  #[test]
  fn release_segments_leaves_nothing_behind() {
    let mut player = make_player("p1", 1);
    let mut segments = HashMap::new();
    let mut next_id = 1;
    for _ in 0..3 {
      add_length(&mut player, &mut segments, &mut next_id);
    }

    release_segments(&mut player, &mut segments);
    assert!(player.segments.is_empty());
    assert!(segments.is_empty());
  }

  #[test]
  fn advance_pulls_segments_behind_the_head() {
    let mut player = make_player("p1", 1);
    let mut segments = HashMap::new();
    let mut next_id = 1;
    add_length(&mut player, &mut segments, &mut next_id);

    player.position = Vec2 { x: 0.0, y: 2.0 };
    player.heading = Vec2 { x: 0.0, y: 1.0 };
    let id = player.segments[0];
    for _ in 0..200 {
      advance_segments(&player, &mut segments, 0.05);
    }

    let segment = &segments[&id];
    // The segment settles behind the head along its heading.
    assert!(segment.position.y < player.position.y);
    assert!((segment.position.x - player.position.x).abs() < 1e-3);
  }
}
