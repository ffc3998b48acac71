//! Namespace tree construction
//!
//! Binding `Foo.Bar.Baz` walks the scope from the root: missing containers
//! for `Foo` and `Foo.Bar` are created as empty tables, and `Baz` is bound
//! to the module only if nothing is bound there yet.

use thiserror::Error;

use crate::module::ModuleHandle;
use crate::path;
use crate::value::{Scope, Value};

/// Errors that can occur while binding a namespace
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NamespaceError {
    /// An intermediate segment is bound to something that cannot hold names
    #[error("{path} is a {kind}, not a namespace")]
    NotAContainer { path: String, kind: &'static str },
}

/// Outcome of binding a module into the namespace tree
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Binding {
    /// The module was bound at its location
    Bound,
    /// Something was already bound there and was left untouched
    Occupied,
}

/// Bind a module at its dotted location under `root`
///
/// Nothing is created unless the whole path can be bound.
pub fn bind(root: &Scope, identifier: &str, handle: &ModuleHandle) -> Result<Binding, NamespaceError> {
    check_containers(root, identifier)?;

    let (parents, last) = match identifier.rsplit_once('.') {
        Some((parents, last)) => (Some(parents), last),
        None => (None, identifier),
    };

    let mut parent = root.clone();
    for (depth, segment) in parents.into_iter().flat_map(path::segments).enumerate() {
        parent.insert_if_absent(segment, Scope::new());
        let value = parent.get(segment).unwrap_or(Value::Nil);
        parent = value.child_scope().ok_or_else(|| NamespaceError::NotAContainer {
            path: path::segments(identifier).take(depth + 1).collect::<Vec<_>>().join("."),
            kind: value.kind(),
        })?;
    }

    if parent.insert_if_absent(last, handle.clone()) {
        Ok(Binding::Bound)
    } else {
        tracing::debug!(%identifier, "namespace slot already bound; keeping existing binding");
        Ok(Binding::Occupied)
    }
}

/// Verify every existing intermediate binding can hold names
fn check_containers(root: &Scope, identifier: &str) -> Result<(), NamespaceError> {
    let segments: Vec<&str> = path::segments(identifier).collect();
    let mut parent = root.clone();
    for (depth, segment) in segments[..segments.len() - 1].iter().enumerate() {
        let Some(value) = parent.get(segment) else {
            return Ok(());
        };
        parent = value.child_scope().ok_or_else(|| NamespaceError::NotAContainer {
            path: segments[..=depth].join("."),
            kind: value.kind(),
        })?;
    }
    Ok(())
}

/// Find a module already bound at a dotted location
pub fn find_module(root: &Scope, identifier: &str) -> Option<ModuleHandle> {
    match root.lookup(identifier)? {
        Value::Module(handle) => Some(handle),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::module::ModuleDef;

    fn module(name: &str) -> ModuleHandle {
        ModuleHandle::new(ModuleDef::new(name))
    }

    #[test]
    fn test_bind_creates_containers() {
        let root = Scope::new();
        let handle = module("Foo.Bar.Baz");

        assert_eq!(bind(&root, "Foo.Bar.Baz", &handle), Ok(Binding::Bound));
        assert!(root.get("Foo").unwrap().as_table().is_some());
        assert_eq!(find_module(&root, "Foo.Bar.Baz"), Some(handle));
    }

    #[test]
    fn test_bind_single_segment() {
        let root = Scope::new();
        let handle = module("Digest");

        assert_eq!(bind(&root, "Digest", &handle), Ok(Binding::Bound));
        assert_eq!(root.get("Digest"), Some(Value::Module(handle)));
    }

    #[test]
    fn test_first_writer_wins() {
        let root = Scope::new();
        let first = module("Foo.Bar");
        let second = module("Foo.Bar");

        bind(&root, "Foo.Bar", &first).unwrap();
        assert_eq!(bind(&root, "Foo.Bar", &second), Ok(Binding::Occupied));
        assert_eq!(find_module(&root, "Foo.Bar"), Some(first));
    }

    #[test]
    fn test_existing_containers_reused() {
        let root = Scope::new();
        bind(&root, "Test.Simple", &module("Test.Simple")).unwrap();
        let test_ns = root.get("Test").unwrap();

        bind(&root, "Test.More", &module("Test.More")).unwrap();

        assert_eq!(root.get("Test"), Some(test_ns));
        assert!(find_module(&root, "Test.Simple").is_some());
        assert!(find_module(&root, "Test.More").is_some());
    }

    #[test]
    fn test_nests_under_module_members() {
        let root = Scope::new();
        let outer = module("DOM");
        bind(&root, "DOM", &outer).unwrap();

        let inner = module("DOM.Display");
        assert_eq!(bind(&root, "DOM.Display", &inner), Ok(Binding::Bound));
        assert_eq!(outer.member("Display"), Some(Value::Module(inner)));
    }

    #[test]
    fn test_scalar_in_path_is_rejected() {
        let root = Scope::new();
        root.set("Foo", "not a namespace");

        let result = bind(&root, "Foo.Bar.Baz", &module("Foo.Bar.Baz"));

        assert!(matches!(
            result,
            Err(NamespaceError::NotAContainer { ref path, kind: "string" }) if path == "Foo"
        ));
    }

    #[test]
    fn test_failed_bind_creates_nothing() {
        let root = Scope::new();
        let a: Scope = [("B", Value::Int(1))].into_iter().collect();
        root.set("A", a.clone());

        assert!(bind(&root, "A.B.C", &module("A.B.C")).is_err());
        assert_eq!(a.len(), 1);
        assert_eq!(root.len(), 1);
    }
}
