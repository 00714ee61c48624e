use super::types::Vec2;

pub fn length(v: Vec2) -> f64 {
  (v.x * v.x + v.y * v.y).sqrt()
}

pub fn distance(a: Vec2, b: Vec2) -> f64 {
  length(sub(a, b))
}

pub fn add(a: Vec2, b: Vec2) -> Vec2 {
  Vec2 {
    x: a.x + b.x,
    y: a.y + b.y,
  }
}

pub fn sub(a: Vec2, b: Vec2) -> Vec2 {
  Vec2 {
    x: a.x - b.x,
    y: a.y - b.y,
  }
}

pub fn scale(v: Vec2, factor: f64) -> Vec2 {
  Vec2 {
    x: v.x * factor,
    y: v.y * factor,
  }
}

pub fn normalize(v: Vec2) -> Vec2 {
  let len = length(v);
  if !len.is_finite() || len == 0.0 {
    return Vec2 { x: 0.0, y: 0.0 };
  }
  Vec2 {
    x: v.x / len,
    y: v.y / len,
  }
}

/// Bounded-speed linear step: never overshoots the target.
pub fn move_towards(current: Vec2, target: Vec2, max_delta: f64) -> Vec2 {
  let delta = sub(target, current);
  let dist = length(delta);
  if dist <= max_delta || dist == 0.0 {
    return target;
  }
  add(current, scale(delta, max_delta / dist))
}

pub fn lerp(a: Vec2, b: Vec2, t: f64) -> Vec2 {
  let t = clamp(t, 0.0, 1.0);
  Vec2 {
    x: a.x + (b.x - a.x) * t,
    y: a.y + (b.y - a.y) * t,
  }
}

pub fn clamp(value: f64, min: f64, max: f64) -> f64 {
  value.min(max).max(min)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn move_towards_clamps_to_max_delta() {
    let current = Vec2 { x: 0.0, y: 0.0 };
    let target = Vec2 { x: 10.0, y: 0.0 };
    let stepped = move_towards(current, target, 1.5);
    assert!((stepped.x - 1.5).abs() < 1e-9);
    assert_eq!(stepped.y, 0.0);
  }

  #[test]
  fn move_towards_reaches_target_without_overshoot() {
    let current = Vec2 { x: 0.0, y: 0.0 };
    let target = Vec2 { x: 0.3, y: 0.4 };
    let stepped = move_towards(current, target, 1.0);
    assert_eq!(stepped, target);
  }

  #[test]
  fn lerp_clamps_factor() {
    let a = Vec2 { x: 0.0, y: 0.0 };
    let b = Vec2 { x: 2.0, y: -2.0 };
    let past = lerp(a, b, 3.0);
    assert_eq!(past, b);
  }

  #[test]
  fn normalize_zero_vector_is_zero() {
    let zero = normalize(Vec2 { x: 0.0, y: 0.0 });
    assert_eq!(zero.x, 0.0);
    assert_eq!(zero.y, 0.0);
  }
}
