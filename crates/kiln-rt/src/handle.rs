//! Generation-tagged handles standing in for host object identity.
//!
//! Identity comparison in the emulated runtime means "same underlying
//! instance", which a garbage-collected host gets from reference equality.
//! Here the stored value is an opaque handle into an arena instead of a raw
//! address: two handles are the same object iff index and generation both
//! match, and a freed slot bumps its generation so a stale handle can never
//! alias a newer occupant.

/// Opaque identity of one arena-held object, or [`Handle::NULL`] for the
/// explicit "no value" marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Handle {
    index: u32,
    generation: u32,
}

impl Handle {
    /// The absent-value marker. A legal cell value, never a valid arena key.
    pub const NULL: Handle = Handle {
        index: u32::MAX,
        generation: 0,
    };

    pub fn is_null(self) -> bool {
        self == Self::NULL
    }
}

impl Default for Handle {
    fn default() -> Self {
        Self::NULL
    }
}

struct Slot<T> {
    generation: u32,
    value: Option<T>,
}

/// Owner of the objects handles refer to.
#[derive(Default)]
pub struct HandleArena<T> {
    slots: Vec<Slot<T>>,
    free: Vec<u32>,
}

impl<T> HandleArena<T> {
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
        }
    }

    pub fn alloc(&mut self, value: T) -> Handle {
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.value = Some(value);
            return Handle {
                index,
                generation: slot.generation,
            };
        }
        let index = self.slots.len() as u32;
        self.slots.push(Slot {
            generation: 1,
            value: Some(value),
        });
        Handle {
            index,
            generation: 1,
        }
    }

    pub fn get(&self, handle: Handle) -> Option<&T> {
        let slot = self.slots.get(handle.index as usize)?;
        if slot.generation != handle.generation {
            return None;
        }
        slot.value.as_ref()
    }

    pub fn get_mut(&mut self, handle: Handle) -> Option<&mut T> {
        let slot = self.slots.get_mut(handle.index as usize)?;
        if slot.generation != handle.generation {
            return None;
        }
        slot.value.as_mut()
    }

    /// Release the slot; the stale handle stops resolving and its slot is
    /// reused under a new generation.
    pub fn free(&mut self, handle: Handle) -> Option<T> {
        let slot = self.slots.get_mut(handle.index as usize)?;
        if slot.generation != handle.generation {
            return None;
        }
        let value = slot.value.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(handle.index);
        Some(value)
    }

    pub fn contains(&self, handle: Handle) -> bool {
        self.get(handle).is_some()
    }

    pub fn len(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alloc_and_get() {
        let mut arena = HandleArena::new();
        let a = arena.alloc("a");
        let b = arena.alloc("b");
        assert_ne!(a, b);
        assert_eq!(arena.get(a), Some(&"a"));
        assert_eq!(arena.get(b), Some(&"b"));
        assert_eq!(arena.len(), 2);
    }

    #[test]
    fn null_never_resolves() {
        let arena: HandleArena<u8> = HandleArena::new();
        assert!(Handle::NULL.is_null());
        assert!(arena.get(Handle::NULL).is_none());
    }

    #[test]
    fn reused_slot_does_not_alias_stale_handle() {
        let mut arena = HandleArena::new();
        let stale = arena.alloc("first");
        assert_eq!(arena.free(stale), Some("first"));

        let fresh = arena.alloc("second");
        // Same slot, different generation: identity must not carry over.
        assert_ne!(stale, fresh);
        assert!(arena.get(stale).is_none());
        assert_eq!(arena.get(fresh), Some(&"second"));
    }

    #[test]
    fn double_free_is_a_no_op() {
        let mut arena = HandleArena::new();
        let h = arena.alloc(7);
        assert_eq!(arena.free(h), Some(7));
        assert_eq!(arena.free(h), None);
        assert!(arena.is_empty());
    }
}
