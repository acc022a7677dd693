//! Runtime emulation shims for compiled code on a single-threaded,
//! garbage-collected host.
//!
//! Everything here assumes the host's cooperative, non-preemptive execution
//! model: operations run synchronously to completion, atomicity is the
//! absence of interleaving, and nothing in this crate is `Sync`.

pub mod cell;
pub mod handle;
pub mod loader;
pub mod throwable;

pub use cell::AtomicCell;
pub use handle::{Handle, HandleArena};
pub use loader::{ClassLoader, ResourceResolver, Runtime};
pub use throwable::{Throwable, ThrowableKind};
