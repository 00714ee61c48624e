use super::constants::CLAIM_COOLDOWN_MS;
use super::types::PlayerId;
use serde::{Deserialize, Serialize};

/// One side of a collision claim: an (identity, length) snapshot as the
/// initiating client saw it. Lengths travel on the wire for compatibility;
/// the server re-reads its authoritative values at decision time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerClaim {
  pub id: PlayerId,
  pub length: u16,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
  pub winner: PlayerId,
  pub loser: PlayerId,
}

/// Head-to-head arbitration: the strictly greater length wins. On an exact
/// tie the second-listed participant is declared winner; that rule is kept
/// as documented even though it favors the rival of whoever reported first.
pub fn arbitrate(player1: &PlayerClaim, player2: &PlayerClaim) -> Outcome {
  if player1.length > player2.length {
    Outcome {
      winner: player1.id.clone(),
      loser: player2.id.clone(),
    }
  } else {
    Outcome {
      winner: player2.id.clone(),
      loser: player1.id.clone(),
    }
  }
}

/// Debounce for arbitration requests: contacts keep firing while two bodies
/// stay in touch, but a player may only open one claim per cooldown window.
pub fn claim_allowed(last_claim_at: i64, now: i64) -> bool {
  now - last_claim_at >= CLAIM_COOLDOWN_MS
}
