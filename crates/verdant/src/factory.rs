//! # Object Factory
//!
//! Visual objects for loaded chunks come from a factory so the host can
//! pool them. The engine only acquires, names, positions and releases.
//!
//! [`PooledFactory`] is the default: a free-list pool that grows when it
//! runs dry and never shrinks.

/// Handle to a factory-owned object.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ObjectHandle(u32);

impl ObjectHandle {
    /// Slot index inside the factory.
    #[inline]
    #[must_use]
    pub const fn index(self) -> u32 {
        self.0
    }
}

/// Source of visual objects.
pub trait ObjectFactory {
    /// Takes an object out of the pool.
    fn acquire(&mut self) -> ObjectHandle;
    /// Returns an object to the pool. Unknown or free handles are ignored.
    fn release(&mut self, handle: ObjectHandle);
    /// Moves an object.
    fn set_position(&mut self, handle: ObjectHandle, position: [f32; 3]);
    /// Names an object.
    fn set_name(&mut self, handle: ObjectHandle, name: &str);
}

/// Bookkeeping for one pooled object.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PooledObject {
    /// Display name.
    pub name: String,
    /// World position.
    pub position: [f32; 3],
    /// Currently handed out.
    pub active: bool,
}

/// Free-list object pool.
#[derive(Debug, Default)]
pub struct PooledFactory {
    objects: Vec<PooledObject>,
    /// Indices of inactive slots.
    free_list: Vec<u32>,
}

impl PooledFactory {
    /// Creates a pool with `capacity` objects ready.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let capacity = u32::try_from(capacity).unwrap_or(u32::MAX);
        Self {
            objects: vec![PooledObject::default(); capacity as usize],
            free_list: (0..capacity).rev().collect(),
        }
    }

    /// Objects currently handed out.
    #[must_use]
    pub fn active_count(&self) -> usize {
        self.objects.len() - self.free_list.len()
    }

    /// Objects ever created.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.objects.len()
    }

    /// Looks up an active object.
    #[must_use]
    pub fn get(&self, handle: ObjectHandle) -> Option<&PooledObject> {
        self.objects
            .get(handle.0 as usize)
            .filter(|object| object.active)
    }

    fn get_mut(&mut self, handle: ObjectHandle) -> Option<&mut PooledObject> {
        self.objects
            .get_mut(handle.0 as usize)
            .filter(|object| object.active)
    }
}

impl ObjectFactory for PooledFactory {
    fn acquire(&mut self) -> ObjectHandle {
        let index = self.free_list.pop().unwrap_or_else(|| {
            self.objects.push(PooledObject::default());
            (self.objects.len() - 1) as u32
        });
        let object = &mut self.objects[index as usize];
        object.active = true;
        ObjectHandle(index)
    }

    fn release(&mut self, handle: ObjectHandle) {
        let Some(object) = self.get_mut(handle) else {
            tracing::warn!(handle = handle.0, "release of unknown object ignored");
            return;
        };
        object.active = false;
        object.name.clear();
        self.free_list.push(handle.0);
    }

    fn set_position(&mut self, handle: ObjectHandle, position: [f32; 3]) {
        if let Some(object) = self.get_mut(handle) {
            object.position = position;
        }
    }

    fn set_name(&mut self, handle: ObjectHandle, name: &str) {
        if let Some(object) = self.get_mut(handle) {
            name.clone_into(&mut object.name);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_acquire_release_reuses_slots() {
        let mut factory = PooledFactory::new(2);
        let a = factory.acquire();
        let b = factory.acquire();
        assert_ne!(a, b);
        assert_eq!(factory.active_count(), 2);

        factory.release(a);
        assert_eq!(factory.active_count(), 1);
        let c = factory.acquire();
        assert_eq!(c, a);
        assert_eq!(factory.capacity(), 2);
    }

    #[test]
    fn test_grows_when_exhausted() {
        let mut factory = PooledFactory::new(1);
        let _a = factory.acquire();
        let b = factory.acquire();
        assert_eq!(b.index(), 1);
        assert_eq!(factory.capacity(), 2);
    }

    #[test]
    fn test_release_ignores_unknown_and_double_release() {
        let mut factory = PooledFactory::new(1);
        let a = factory.acquire();
        factory.release(a);
        factory.release(a);
        factory.release(ObjectHandle(99));
        assert_eq!(factory.active_count(), 0);
        assert_eq!(factory.acquire(), a);
        assert_eq!(factory.active_count(), 1);
    }

    #[test]
    fn test_name_and_position() {
        let mut factory = PooledFactory::default();
        let h = factory.acquire();
        factory.set_name(h, "Chunk (16, 0, 0)");
        factory.set_position(h, [16.0, 0.0, 0.0]);
        let object = factory.get(h).unwrap();
        assert_eq!(object.name, "Chunk (16, 0, 0)");
        assert_eq!(object.position, [16.0, 0.0, 0.0]);

        factory.release(h);
        assert!(factory.get(h).is_none());
    }
}
