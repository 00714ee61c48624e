use super::types::Vec2;

/// Validates a client-relayed target position. Only finiteness is checked;
/// plausibility limits (max per-tick displacement) are a deliberate non-goal
/// here and would slot in at this boundary.
pub fn parse_target(value: Vec2) -> Option<Vec2> {
  if !value.x.is_finite() || !value.y.is_finite() {
    return None;
  }
  Some(value)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn rejects_non_finite_targets() {
    assert!(parse_target(Vec2 { x: f64::NAN, y: 0.0 }).is_none());
    assert!(parse_target(Vec2 { x: 0.0, y: f64::INFINITY }).is_none());
  }

  #[test]
  fn accepts_finite_targets() {
    let target = parse_target(Vec2 { x: -3.5, y: 2.0 }).expect("target");
    assert_eq!(target.x, -3.5);
    assert_eq!(target.y, 2.0);
  }
}
