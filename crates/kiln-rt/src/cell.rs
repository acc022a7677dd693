//! Atomic-looking reference cell for the cooperative single-threaded host.
//!
//! "Atomic" here is trivial: the host never preempts, so every operation
//! runs to completion without interleaving and no fencing exists or is
//! needed. The cell stores an identity [`Handle`]; mutation decisions
//! compare handles, never the referenced values.

use std::cell::Cell;

use crate::handle::Handle;

/// A reference cell with the update operations compiled code expects from
/// an atomic reference. All operations are total and never suspend.
#[derive(Debug, Default)]
pub struct AtomicCell {
    value: Cell<Handle>,
}

impl AtomicCell {
    pub fn new(initial: Handle) -> Self {
        Self {
            value: Cell::new(initial),
        }
    }

    pub fn get(&self) -> Handle {
        self.value.get()
    }

    /// Unconditional replace; immediately visible to all subsequent reads.
    pub fn set(&self, v: Handle) {
        self.value.set(v);
    }

    /// Identical to [`set`](Self::set) in this model. The deferred-visibility
    /// distinction only exists on truly preemptive hosts and collapses to a
    /// synchronous write here.
    pub fn lazy_set(&self, v: Handle) {
        self.set(v);
    }

    /// Write `update` iff the current value is identity-equal to `expected`.
    /// Returns whether the write happened; on false the cell is unchanged.
    pub fn compare_and_set(&self, expected: Handle, update: Handle) -> bool {
        if self.value.get() == expected {
            self.value.set(update);
            true
        } else {
            false
        }
    }

    /// Same contract as [`compare_and_set`](Self::compare_and_set); no
    /// spurious failure is modeled (documented simplification).
    pub fn weak_compare_and_set(&self, expected: Handle, update: Handle) -> bool {
        self.compare_and_set(expected, update)
    }

    /// Install `v` and return the immediately-preceding value.
    pub fn get_and_set(&self, v: Handle) -> Handle {
        self.value.replace(v)
    }
}
