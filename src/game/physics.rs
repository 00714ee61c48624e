use super::constants::CONSUME_RADIUS;
use super::math::distance;
use super::types::{Consumable, Player, PlayerId};
use std::collections::HashMap;

/// A boolean contact between two tagged bodies, as an external detection
/// layer would report it. The arbitration and growth logic consumes these
/// without doing geometry of its own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsumableContact {
  pub player: PlayerId,
  pub entity: u32,
}

/// Stand-in for the external 2D physics step: overlap tests between player
/// heads and consumables. Player-versus-player contacts are not detected
/// here; those arrive as client-submitted claims.
pub fn detect_consumable_contacts(
  players: &HashMap<PlayerId, Player>,
  consumables: &HashMap<u32, Consumable>,
) -> Vec<ConsumableContact> {
  let mut contacts = Vec::new();
  for player in players.values() {
    if !player.connected {
      continue;
    }
    for (entity, consumable) in consumables {
      if distance(player.position, consumable.position) < CONSUME_RADIUS {
        contacts.push(ConsumableContact {
          player: player.id.clone(),
          entity: *entity,
        });
      }
    }
  }
  contacts
}
