use super::types::{EntityHandle, PrototypeId};

#[derive(Debug, Default)]
struct Bucket {
  inactive: Vec<u32>,
  active: usize,
  total: usize,
}

/// Per-prototype free-lists of inactive instances. Lending and reclaiming
/// instances here bounds allocation churn for short-lived networked
/// entities; an acquired handle is not yet present in the simulation until
/// the caller spawns it into the world.
#[derive(Debug)]
pub struct EntityPool {
  buckets: Vec<Bucket>,
  next_instance_id: u32,
}

impl EntityPool {
  pub fn new(prototype_count: usize) -> Self {
    let buckets = (0..prototype_count).map(|_| Bucket::default()).collect();
    Self {
      buckets,
      next_instance_id: 1,
    }
  }

  /// Instantiates instances up front so steady-state acquire never allocates.
  pub fn prewarm(&mut self, per_prototype: usize) {
    for prototype in 0..self.buckets.len() {
      while self.buckets[prototype].total < per_prototype {
        let id = self.instantiate(prototype);
        self.buckets[prototype].inactive.push(id);
      }
    }
  }

  fn instantiate(&mut self, prototype: PrototypeId) -> u32 {
    let id = self.next_instance_id;
    self.next_instance_id += 1;
    self.buckets[prototype].total += 1;
    id
  }

  /// Lends an instance, reactivating a pooled one when available and lazily
  /// growing the pool past its pre-warm size otherwise.
  pub fn acquire(&mut self, prototype: PrototypeId) -> EntityHandle {
    let id = match self.buckets[prototype].inactive.pop() {
      Some(id) => id,
      None => self.instantiate(prototype),
    };
    self.buckets[prototype].active += 1;
    EntityHandle { id, prototype }
  }

  /// Deactivates an instance and returns it to its bucket. A handle released
  /// against the wrong prototype is rejected and leaked rather than allowed
  /// to corrupt another bucket.
  pub fn release(&mut self, handle: EntityHandle, prototype: PrototypeId) -> bool {
    if handle.prototype != prototype {
      tracing::warn!(
        instance = handle.id,
        stated = prototype,
        actual = handle.prototype,
        "handle released to the wrong bucket, leaking instance"
      );
      return false;
    }
    let bucket = &mut self.buckets[prototype];
    bucket.active = bucket.active.saturating_sub(1);
    bucket.inactive.push(handle.id);
    true
  }

  pub fn active_count(&self, prototype: PrototypeId) -> usize {
    self.buckets[prototype].active
  }

  pub fn inactive_count(&self, prototype: PrototypeId) -> usize {
    self.buckets[prototype].inactive.len()
  }

  pub fn total_instantiated(&self, prototype: PrototypeId) -> usize {
    self.buckets[prototype].total
  }
}
