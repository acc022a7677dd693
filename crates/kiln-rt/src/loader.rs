//! Classloader delegation chain rooted in an explicit runtime context.
//!
//! The reference runtime keeps one process-wide system loader behind a
//! hidden global accessor. Here the single instance lives in a [`Runtime`]
//! context constructed once at process start and handed to consumers, which
//! keeps the "exactly one root, globally reachable" contract without
//! implicit global mutable state.

use std::rc::Rc;

/// External resource surface. Concrete resolution (host resource tables,
/// bundled assets) lives outside this crate; the default chain answers
/// "not found".
pub trait ResourceResolver {
    /// Full bytes of the named resource, or `None`. Never a partial result.
    fn resolve(&self, name: &str) -> Option<Vec<u8>>;
}

/// One node in the parent-linked delegation chain. The parent back-reference
/// is fixed at construction and never mutated.
pub struct ClassLoader {
    parent: Option<Rc<ClassLoader>>,
    resolver: Option<Rc<dyn ResourceResolver>>,
}

impl ClassLoader {
    fn system() -> Rc<ClassLoader> {
        Rc::new(ClassLoader {
            parent: None,
            resolver: None,
        })
    }

    /// A non-root loader delegating toward `parent`. The chain stays acyclic
    /// because a child can only point at an already-constructed ancestor.
    pub fn child_of(parent: &Rc<ClassLoader>) -> Rc<ClassLoader> {
        Rc::new(ClassLoader {
            parent: Some(Rc::clone(parent)),
            resolver: None,
        })
    }

    pub fn child_with_resolver(
        parent: &Rc<ClassLoader>,
        resolver: Rc<dyn ResourceResolver>,
    ) -> Rc<ClassLoader> {
        Rc::new(ClassLoader {
            parent: Some(Rc::clone(parent)),
            resolver: Some(resolver),
        })
    }

    /// `None` exactly for the system loader.
    pub fn parent(&self) -> Option<&Rc<ClassLoader>> {
        self.parent.as_ref()
    }

    /// Parent-first delegation: ancestors are consulted before this node's
    /// own resolver. Absent any resolver on the chain the answer is an
    /// explicit not-found.
    pub fn resolve_resource(&self, name: &str) -> Option<Vec<u8>> {
        if let Some(parent) = &self.parent {
            if let Some(bytes) = parent.resolve_resource(name) {
                return Some(bytes);
            }
        }
        self.resolver.as_ref().and_then(|r| r.resolve(name))
    }
}

/// Process-wide runtime context. Constructed once at process start; owns the
/// single system loader for its whole lifetime.
pub struct Runtime {
    system_loader: Rc<ClassLoader>,
}

impl Runtime {
    pub fn new() -> Self {
        Self {
            system_loader: ClassLoader::system(),
        }
    }

    /// The root of every delegation chain; the same instance on every call.
    pub fn system_loader(&self) -> &Rc<ClassLoader> {
        &self.system_loader
    }
}

impl Default for Runtime {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct MapResolver(Vec<(&'static str, &'static [u8])>);

    impl ResourceResolver for MapResolver {
        fn resolve(&self, name: &str) -> Option<Vec<u8>> {
            self.0
                .iter()
                .find(|(n, _)| *n == name)
                .map(|(_, bytes)| bytes.to_vec())
        }
    }

    #[test]
    fn system_loader_is_stable_and_rootless() {
        let rt = Runtime::new();
        let first = Rc::clone(rt.system_loader());
        let second = Rc::clone(rt.system_loader());
        assert!(Rc::ptr_eq(&first, &second));
        assert!(first.parent().is_none());
    }

    #[test]
    fn child_chain_terminates_at_system_loader() {
        let rt = Runtime::new();
        let child = ClassLoader::child_of(rt.system_loader());
        let grandchild = ClassLoader::child_of(&child);

        let parent = grandchild.parent().expect("parent");
        assert!(Rc::ptr_eq(parent, &child));
        let root = parent.parent().expect("root");
        assert!(Rc::ptr_eq(root, rt.system_loader()));
        assert!(root.parent().is_none());
    }

    #[test]
    fn default_resolution_is_not_found() {
        let rt = Runtime::new();
        let child = ClassLoader::child_of(rt.system_loader());
        assert!(rt.system_loader().resolve_resource("a/b.bin").is_none());
        assert!(child.resolve_resource("a/b.bin").is_none());
    }

    #[test]
    fn own_resolver_answers_when_parents_cannot() {
        let rt = Runtime::new();
        let child = ClassLoader::child_with_resolver(
            rt.system_loader(),
            Rc::new(MapResolver(vec![("app.cfg", b"k=v")])),
        );
        assert_eq!(child.resolve_resource("app.cfg"), Some(b"k=v".to_vec()));
        assert!(child.resolve_resource("missing").is_none());
    }

    #[test]
    fn delegation_is_parent_first() {
        let rt = Runtime::new();
        let parent = ClassLoader::child_with_resolver(
            rt.system_loader(),
            Rc::new(MapResolver(vec![("shared.bin", b"parent")])),
        );
        let child = ClassLoader::child_with_resolver(
            &parent,
            Rc::new(MapResolver(vec![("shared.bin", b"child")])),
        );
        assert_eq!(
            child.resolve_resource("shared.bin"),
            Some(b"parent".to_vec())
        );
    }
}
