use crate::game::arbiter::PlayerClaim;
use crate::game::types::{GameStateSnapshot, PlayerId, Vec2};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
pub enum ClientMessage {
  #[serde(rename = "join")]
  Join {
    name: Option<String>,
    #[serde(rename = "playerId")]
    player_id: Option<String>,
  },
  /// Relayed target world position, sampled by the owning client every tick.
  #[serde(rename = "move")]
  Move { target: Vec2 },
  /// Head-to-head collision claim: the submitting client lists itself first
  /// and the rival second.
  #[serde(rename = "collision")]
  Collision {
    player1: PlayerClaim,
    player2: PlayerClaim,
  },
  /// Contact with a foreign trailing segment: an unconditional loss for the
  /// sender, no length comparison involved.
  #[serde(rename = "segmentCollision")]
  SegmentCollision {
    #[serde(rename = "segmentOwner")]
    segment_owner: PlayerId,
  },
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type")]
pub enum ServerMessage {
  #[serde(rename = "init")]
  Init {
    #[serde(rename = "playerId")]
    player_id: PlayerId,
    state: GameStateSnapshot,
  },
  #[serde(rename = "state")]
  State { state: GameStateSnapshot },
  /// Growth notification, delivered only to the owning connection.
  #[serde(rename = "changedLength")]
  ChangedLength { previous: u16, length: u16 },
  /// Delivered only to the winner of an arbitration.
  #[serde(rename = "atePlayer")]
  AtePlayer {
    #[serde(rename = "loserId")]
    loser_id: PlayerId,
  },
  /// Delivered only to the loser; the receiving client raises its local
  /// game-over signal and terminates the session.
  #[serde(rename = "gameOver")]
  GameOver,
}

pub fn decode_client_message(text: &str) -> Option<ClientMessage> {
  serde_json::from_str(text).ok()
}

pub fn encode_server_message(message: &ServerMessage) -> String {
  serde_json::to_string(message).unwrap_or_default()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn decode_join_with_name() {
    let message = decode_client_message(r#"{"type":"join","name":"Viper"}"#).expect("message");
    match message {
      ClientMessage::Join { name, player_id } => {
        assert_eq!(name.as_deref(), Some("Viper"));
        assert!(player_id.is_none());
      }
      _ => panic!("unexpected message"),
    }
  }

  #[test]
  fn decode_collision_claim_pair() {
    let text = r#"{
      "type": "collision",
      "player1": { "id": "a", "length": 2 },
      "player2": { "id": "b", "length": 5 }
    }"#;
    let message = decode_client_message(text).expect("message");
    match message {
      ClientMessage::Collision { player1, player2 } => {
        assert_eq!(player1.id, "a");
        assert_eq!(player1.length, 2);
        assert_eq!(player2.id, "b");
        assert_eq!(player2.length, 5);
      }
      _ => panic!("unexpected message"),
    }
  }

  #[test]
  fn decode_rejects_unknown_type() {
    assert!(decode_client_message(r#"{"type":"teleport"}"#).is_none());
  }

  #[test]
  fn encode_game_over_is_tagged() {
    let encoded = encode_server_message(&ServerMessage::GameOver);
    assert_eq!(encoded, r#"{"type":"gameOver"}"#);
  }

  #[test]
  fn encode_changed_length_carries_both_values() {
    let encoded = encode_server_message(&ServerMessage::ChangedLength {
      previous: 3,
      length: 4,
    });
    assert!(encoded.contains(r#""previous":3"#));
    assert!(encoded.contains(r#""length":4"#));
  }
}
