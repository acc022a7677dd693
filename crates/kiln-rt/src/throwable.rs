//! The closed throwable hierarchy and its catch-matching table.
//!
//! The emulated runtime needs a fixed set of error kinds with the reference
//! library's ancestor chain, not an open class graph. Kinds are a tagged
//! enum and catch-matching is a static table lookup; none of these
//! operations can fail.

use std::rc::{Rc, Weak};

use serde::Serialize;

/// One kind in the fixed tree
/// `Throwable -> Error -> VirtualMachineError -> { StackOverflow, InternalError }`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ThrowableKind {
    Throwable,
    Error,
    VirtualMachineError,
    StackOverflow,
    InternalError,
}

impl ThrowableKind {
    /// Stable tag identifying the kind at persistence/interop boundaries.
    pub fn tag(self) -> &'static str {
        match self {
            ThrowableKind::Throwable => "throwable",
            ThrowableKind::Error => "error",
            ThrowableKind::VirtualMachineError => "virtual_machine_error",
            ThrowableKind::StackOverflow => "stack_overflow",
            ThrowableKind::InternalError => "internal_error",
        }
    }

    /// Self plus every ancestor, root last. This is the whole hierarchy;
    /// catch-matching never walks anything at runtime.
    pub fn ancestors(self) -> &'static [ThrowableKind] {
        use ThrowableKind::*;
        match self {
            Throwable => &[Throwable],
            Error => &[Error, Throwable],
            VirtualMachineError => &[VirtualMachineError, Error, Throwable],
            StackOverflow => &[StackOverflow, VirtualMachineError, Error, Throwable],
            InternalError => &[InternalError, VirtualMachineError, Error, Throwable],
        }
    }

    pub fn parent(self) -> Option<ThrowableKind> {
        self.ancestors().get(1).copied()
    }

    /// An instance of `self` matches a handler declared for `handler` iff
    /// `handler` is `self` or one of its ancestors.
    pub fn matches(self, handler: ThrowableKind) -> bool {
        self.ancestors().contains(&handler)
    }
}

/// One thrown condition: a kind, an optional message, and an optional cause
/// edge for reporting chains.
///
/// Instances have `Rc` identity for reference comparison. The cause is a
/// weak back-reference only; it never keeps the cause alive.
#[derive(Debug)]
pub struct Throwable {
    kind: ThrowableKind,
    message: Option<String>,
    cause: Option<Weak<Throwable>>,
}

impl Throwable {
    pub fn new(
        kind: ThrowableKind,
        message: Option<String>,
        cause: Option<&Rc<Throwable>>,
    ) -> Rc<Throwable> {
        Rc::new(Throwable {
            kind,
            message,
            cause: cause.map(Rc::downgrade),
        })
    }

    pub fn kind(&self) -> ThrowableKind {
        self.kind
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// The cause, if one was recorded and is still alive.
    pub fn cause(&self) -> Option<Rc<Throwable>> {
        self.cause.as_ref().and_then(Weak::upgrade)
    }

    /// Catch-matching against a handler's declared kind.
    pub fn matches(&self, handler: ThrowableKind) -> bool {
        self.kind.matches(handler)
    }
}

impl std::fmt::Display for Throwable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.message {
            Some(message) => write!(f, "{}: {message}", self.kind.tag())?,
            None => write!(f, "{}", self.kind.tag())?,
        }
        if let Some(cause) = self.cause() {
            write!(f, "\ncaused by: {cause}")?;
        }
        Ok(())
    }
}
