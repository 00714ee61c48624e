use super::arbiter::{self, PlayerClaim};
use super::constants::{
  CONSUMABLE_COLORS, MAP_MAX_X, MAP_MAX_Y, MAP_MIN_X, MAP_MIN_Y, PLAYER_SPEED, PLAYER_TIMEOUT_MS,
  TICK_MS,
};
use super::growth;
use super::input::parse_target;
use super::math::{move_towards, normalize, sub};
use super::physics::{self, ConsumableContact};
use super::pool::EntityPool;
use super::spawner::{ConsumableSpawner, SpawnOrder};
use super::types::{
  Consumable, ConsumableSnapshot, GameStateSnapshot, Player, PlayerId, PlayerSnapshot,
  SegmentSnapshot, Vec2,
};
use crate::protocol::{self, ClientMessage, ServerMessage};
use crate::shared::names::sanitize_player_name;
use rand::Rng;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};
use tokio::sync::mpsc::UnboundedSender;
use tokio::sync::Mutex;
use uuid::Uuid;

/// One arena with its own authoritative simulation. All state mutation
/// happens under a single lock, driven either by an arriving client message
/// or by the tick task; no partial mutation of a player is ever observable.
#[derive(Debug)]
pub struct Room {
  state: Mutex<RoomState>,
  running: AtomicBool,
}

#[derive(Debug)]
struct SessionEntry {
  sender: UnboundedSender<String>,
  player_id: Option<PlayerId>,
}

#[derive(Debug)]
struct RoomState {
  sessions: HashMap<String, SessionEntry>,
  players: HashMap<PlayerId, Player>,
  segments: HashMap<u32, super::types::Segment>,
  consumables: HashMap<u32, Consumable>,
  pool: EntityPool,
  spawner: ConsumableSpawner,
  next_segment_id: u32,
}

impl Room {
  pub fn new() -> Self {
    Self {
      state: Mutex::new(RoomState::new()),
      running: AtomicBool::new(false),
    }
  }

  pub async fn add_session(&self, sender: UnboundedSender<String>) -> String {
    let session_id = Uuid::new_v4().to_string();
    let mut state = self.state.lock().await;
    state.sessions.insert(
      session_id.clone(),
      SessionEntry {
        sender,
        player_id: None,
      },
    );
    session_id
  }

  pub async fn remove_session(&self, session_id: &str) {
    let mut state = self.state.lock().await;
    state.disconnect_session(session_id);
  }

  pub async fn handle_text_message(self: &Arc<Self>, session_id: &str, text: &str) {
    let Some(message) = protocol::decode_client_message(text) else { return };
    let mut state = self.state.lock().await;
    match message {
      ClientMessage::Join { name, player_id } => {
        state.handle_join(session_id, name, player_id);
        drop(state);
        self.ensure_loop();
      }
      ClientMessage::Move { target } => {
        state.handle_move(session_id, target);
      }
      ClientMessage::Collision { player1, player2 } => {
        state.handle_collision(session_id, player1, player2);
      }
      ClientMessage::SegmentCollision { segment_owner } => {
        state.handle_segment_collision(session_id, segment_owner);
      }
    }
  }

  /// Growth entry point, callable by any authorized source regardless of
  /// ownership. Requests for players that no longer exist are a no-op.
  pub async fn add_length(&self, player_id: &str) {
    let mut state = self.state.lock().await;
    state.grow(player_id);
  }

  fn ensure_loop(self: &Arc<Self>) {
    if self
      .running
      .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
      .is_err()
    {
      return;
    }

    let room = Arc::clone(self);
    tokio::spawn(async move {
      let mut interval = tokio::time::interval(std::time::Duration::from_millis(TICK_MS));
      loop {
        interval.tick().await;
        let mut state = room.state.lock().await;
        if state.sessions.is_empty() {
          room.running.store(false, Ordering::SeqCst);
          break;
        }
        state.tick();
      }
    });
  }
}

impl RoomState {
  fn new() -> Self {
    Self {
      sessions: HashMap::new(),
      players: HashMap::new(),
      segments: HashMap::new(),
      consumables: HashMap::new(),
      pool: EntityPool::new(CONSUMABLE_COLORS.len()),
      spawner: ConsumableSpawner::new(),
      next_segment_id: 1,
    }
  }

  fn now_millis() -> i64 {
    let now = SystemTime::now()
      .duration_since(UNIX_EPOCH)
      .unwrap_or_default();
    now.as_millis() as i64
  }

  fn disconnect_session(&mut self, session_id: &str) {
    let Some(entry) = self.sessions.remove(session_id) else { return };
    if let Some(player_id) = entry.player_id {
      if let Some(player) = self.players.get_mut(&player_id) {
        player.connected = false;
        player.last_seen = Self::now_millis();
      }
    }
  }

  fn handle_join(&mut self, session_id: &str, name: Option<String>, player_id: Option<String>) {
    let raw_name = name.unwrap_or_else(|| "Player".to_string());
    let sanitized_name = sanitize_player_name(&raw_name, "Player");

    let player_id = if let Some(id) = player_id.and_then(|value| Uuid::parse_str(&value).ok()) {
      let id_string = id.to_string();
      if let Some(player) = self.players.get_mut(&id_string) {
        player.name = sanitized_name;
        player.connected = true;
        player.last_seen = Self::now_millis();
        // A resumed player can carry nonzero length; rebuild the chain so
        // every observer sees it complete rather than growing from scratch.
        growth::backfill_segments(player, &mut self.segments, &mut self.next_segment_id);
        id_string
      } else {
        self.create_player(id, sanitized_name)
      }
    } else {
      self.create_player(Uuid::new_v4(), sanitized_name)
    };

    let payload = protocol::encode_server_message(&ServerMessage::Init {
      player_id: player_id.clone(),
      state: self.build_snapshot(Self::now_millis()),
    });
    if let Some(session) = self.sessions.get_mut(session_id) {
      session.player_id = Some(player_id);
      let _ = session.sender.send(payload);
    }
  }

  fn create_player(&mut self, id: Uuid, name: String) -> PlayerId {
    let id_string = id.to_string();
    let mut rng = rand::thread_rng();
    let position = Vec2 {
      x: rng.gen_range(MAP_MIN_X..=MAP_MAX_X),
      y: rng.gen_range(MAP_MIN_Y..=MAP_MAX_Y),
    };
    let player = Player {
      id: id_string.clone(),
      name,
      position,
      heading: Vec2 { x: 0.0, y: 1.0 },
      target: position,
      length: 1,
      segments: Vec::new(),
      last_collided_color: "#ffffff".to_string(),
      last_claim_at: 0,
      connected: true,
      last_seen: Self::now_millis(),
    };
    tracing::debug!(player_id = %id_string, "player joined");
    self.players.insert(id_string.clone(), player);
    id_string
  }

  fn handle_move(&mut self, session_id: &str, target: Vec2) {
    let Some(player_id) = self.session_player_id(session_id) else { return };
    let Some(player) = self.players.get_mut(&player_id) else { return };
    let Some(target) = parse_target(target) else { return };
    player.target = target;
    player.last_seen = Self::now_millis();
  }

  fn handle_collision(&mut self, session_id: &str, player1: PlayerClaim, player2: PlayerClaim) {
    let Some(claimant_id) = self.session_player_id(session_id) else { return };
    if claimant_id != player1.id {
      tracing::debug!(session_id, "claim names a player the session does not own");
      return;
    }
    if !self.begin_claim(&claimant_id) {
      return;
    }

    // Submitted lengths are untrusted; both sides are read back from
    // authoritative state, and a vanished participant voids the claim.
    let Some(length1) = self.players.get(&player1.id).map(|player| player.length) else { return };
    let Some(length2) = self.players.get(&player2.id).map(|player| player.length) else { return };

    let outcome = arbiter::arbitrate(
      &PlayerClaim {
        id: player1.id,
        length: length1,
      },
      &PlayerClaim {
        id: player2.id,
        length: length2,
      },
    );
    self.send_outcomes(&outcome);
  }

  fn handle_segment_collision(&mut self, session_id: &str, segment_owner: PlayerId) {
    let Some(loser_id) = self.session_player_id(session_id) else { return };
    // Running into any foreign trailing segment is an unconditional loss for
    // the colliding head; contact with the player's own tail is not.
    if segment_owner == loser_id {
      return;
    }
    if !self.begin_claim(&loser_id) {
      return;
    }
    let outcome = arbiter::Outcome {
      winner: segment_owner,
      loser: loser_id,
    };
    self.send_outcomes(&outcome);
  }

  fn begin_claim(&mut self, player_id: &str) -> bool {
    let now = Self::now_millis();
    let Some(player) = self.players.get_mut(player_id) else { return false };
    if !arbiter::claim_allowed(player.last_claim_at, now) {
      return false;
    }
    player.last_claim_at = now;
    true
  }

  /// Unicasts the two outcome notifications: the winner alone learns it ate
  /// a player, the loser alone receives game-over. A side destroyed while
  /// the claim was in flight is skipped. The loser is not eliminated here;
  /// its client tears down the session on receipt of game-over.
  fn send_outcomes(&mut self, outcome: &arbiter::Outcome) {
    tracing::debug!(winner = %outcome.winner, loser = %outcome.loser, "collision resolved");
    if self.players.contains_key(&outcome.winner) {
      self.send_to_player(
        &outcome.winner,
        &ServerMessage::AtePlayer {
          loser_id: outcome.loser.clone(),
        },
      );
    }
    if self.players.contains_key(&outcome.loser) {
      self.send_to_player(&outcome.loser, &ServerMessage::GameOver);
    }
  }

  fn grow(&mut self, player_id: &str) {
    let Some(player) = self.players.get_mut(player_id) else { return };
    let previous = player.length;
    growth::add_length(player, &mut self.segments, &mut self.next_segment_id);
    let length = player.length;
    self.send_to_player(player_id, &ServerMessage::ChangedLength { previous, length });
  }

  fn consume(&mut self, contact: &ConsumableContact) {
    let Some(consumable) = self.consumables.get(&contact.entity) else { return };
    let color = consumable.color.clone();
    let handle = consumable.handle;
    let Some(player) = self.players.get_mut(&contact.player) else { return };
    player.last_collided_color = color;
    // Despawn and reclaim in one step so the consumable is never visible
    // after it has been eaten.
    self.consumables.remove(&contact.entity);
    self.pool.release(handle, handle.prototype);
    self.grow(&contact.player);
  }

  fn spawn_consumable(&mut self, order: SpawnOrder) {
    // Acquiring does not place the instance in the world; it only becomes
    // visible and collidable once inserted here, fully configured.
    let handle = self.pool.acquire(order.prototype);
    self.consumables.insert(
      handle.id,
      Consumable {
        handle,
        position: order.position,
        color: CONSUMABLE_COLORS[order.prototype].to_string(),
      },
    );
  }

  fn expire_players(&mut self, now: i64) {
    let expired: Vec<PlayerId> = self
      .players
      .iter()
      .filter(|(_, player)| !player.connected && now - player.last_seen > PLAYER_TIMEOUT_MS)
      .map(|(id, _)| id.clone())
      .collect();
    for id in expired {
      self.destroy_player(&id);
    }
  }

  fn destroy_player(&mut self, player_id: &str) {
    let Some(mut player) = self.players.remove(player_id) else { return };
    growth::release_segments(&mut player, &mut self.segments);
    tracing::debug!(player_id, "player destroyed");
  }

  fn session_player_id(&self, session_id: &str) -> Option<PlayerId> {
    self
      .sessions
      .get(session_id)
      .and_then(|entry| entry.player_id.clone())
  }

  fn tick(&mut self) {
    let now = Self::now_millis();
    let dt_seconds = TICK_MS as f64 / 1000.0;

    self.expire_players(now);

    if !self.spawner.started() {
      let orders = self.spawner.start(&mut self.pool, now);
      for order in orders {
        self.spawn_consumable(order);
      }
    }

    let player_ids: Vec<PlayerId> = self.players.keys().cloned().collect();
    for id in &player_ids {
      let Some(player) = self.players.get_mut(id) else { continue };
      if !player.connected {
        continue;
      }
      let moved = move_towards(player.position, player.target, PLAYER_SPEED * dt_seconds);
      if moved != player.position {
        player.position = moved;
        if player.target != player.position {
          player.heading = normalize(sub(player.target, player.position));
        }
      }
    }

    for id in &player_ids {
      let Some(player) = self.players.get(id) else { continue };
      growth::advance_segments(player, &mut self.segments, dt_seconds);
    }

    let contacts = physics::detect_consumable_contacts(&self.players, &self.consumables);
    for contact in contacts {
      self.consume(&contact);
    }

    if let Some(order) = self.spawner.tick(&self.pool, self.sessions.len(), now) {
      self.spawn_consumable(order);
    }

    self.broadcast_state(now);
  }

  fn build_snapshot(&self, now: i64) -> GameStateSnapshot {
    let consumables = self
      .consumables
      .iter()
      .map(|(id, consumable)| ConsumableSnapshot {
        id: *id,
        position: consumable.position,
        color: consumable.color.clone(),
      })
      .collect();
    let players = self
      .players
      .values()
      .map(|player| PlayerSnapshot {
        id: player.id.clone(),
        name: player.name.clone(),
        position: player.position,
        heading: player.heading,
        length: player.length,
        segments: player
          .segments
          .iter()
          .filter_map(|id| self.segments.get(id))
          .map(|segment| SegmentSnapshot {
            position: segment.position,
            color: segment.color.clone(),
            order: segment.draw_order,
          })
          .collect(),
      })
      .collect();
    GameStateSnapshot {
      now,
      consumables,
      players,
    }
  }

  fn send_to_player(&mut self, player_id: &str, message: &ServerMessage) {
    let payload = protocol::encode_server_message(message);
    let mut stale = Vec::new();
    for (session_id, session) in &self.sessions {
      if session.player_id.as_deref() != Some(player_id) {
        continue;
      }
      if session.sender.send(payload.clone()).is_err() {
        stale.push(session_id.clone());
      }
    }
    for session_id in stale {
      self.disconnect_session(&session_id);
    }
  }

  fn broadcast_state(&mut self, now: i64) {
    let payload = protocol::encode_server_message(&ServerMessage::State {
      state: self.build_snapshot(now),
    });
    let mut stale = Vec::new();
    for (session_id, session) in &self.sessions {
      if session.sender.send(payload.clone()).is_err() {
        stale.push(session_id.clone());
      }
    }
    for session_id in stale {
      self.disconnect_session(&session_id);
    }
  }
}
