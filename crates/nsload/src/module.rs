//! Module definitions and handles

use std::fmt;
use std::rc::Rc;

use crate::exports::ExportDecl;
use crate::value::{NativeFunction, Scope, Value};

/// A module definition as produced by evaluating its source
#[derive(Debug)]
pub struct ModuleDef {
    name: String,
    constructor: Option<NativeFunction>,
    exports: ExportDecl,
    members: Scope,
    prototype: Option<Scope>,
}

impl ModuleDef {
    /// Create an empty definition for a dotted identifier
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            constructor: None,
            exports: ExportDecl::default(),
            members: Scope::new(),
            prototype: None,
        }
    }

    /// Set the callable form
    pub fn with_constructor(mut self, constructor: NativeFunction) -> Self {
        self.constructor = Some(constructor);
        self
    }

    /// Set the export declaration
    pub fn with_exports(mut self, exports: ExportDecl) -> Self {
        self.exports = exports;
        self
    }

    /// Add a member symbol
    pub fn with_member(self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.members.set(name, value);
        self
    }

    /// Replace the member scope
    pub fn with_members(mut self, members: Scope) -> Self {
        self.members = members;
        self
    }

    /// Set the instance template
    pub fn with_prototype(mut self, prototype: Scope) -> Self {
        self.prototype = Some(prototype);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Shared handle to a loaded module
///
/// The module cache and the namespace tree hold clones of the same handle.
/// Equality is identity.
#[derive(Clone)]
pub struct ModuleHandle(Rc<ModuleDef>);

impl ModuleHandle {
    pub fn new(def: ModuleDef) -> Self {
        Self(Rc::new(def))
    }

    /// Dotted identifier the module was defined under
    pub fn name(&self) -> &str {
        &self.0.name
    }

    pub fn exports(&self) -> &ExportDecl {
        &self.0.exports
    }

    /// Member symbols, the source of exported values
    pub fn members(&self) -> &Scope {
        &self.0.members
    }

    /// Look up a single member symbol
    pub fn member(&self, name: &str) -> Option<Value> {
        self.0.members.get(name)
    }

    /// Instance template, shared by reference with every binding of this module
    pub fn prototype(&self) -> Option<&Scope> {
        self.0.prototype.as_ref()
    }

    pub fn constructor(&self) -> Option<&NativeFunction> {
        self.0.constructor.as_ref()
    }

    /// Invoke the callable form, if the module has one
    pub fn call(&self, args: &[Value]) -> Option<Value> {
        self.0.constructor.as_ref().map(|c| c.call(args))
    }

    /// Check whether two handles refer to the same module
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl From<ModuleDef> for ModuleHandle {
    fn from(def: ModuleDef) -> Self {
        Self::new(def)
    }
}

impl PartialEq for ModuleHandle {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl fmt::Debug for ModuleHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModuleHandle")
            .field("name", &self.0.name)
            .field("exports", &self.0.exports)
            .field("members", &self.0.members.names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handle_identity() {
        let a = ModuleHandle::new(ModuleDef::new("Foo.Bar"));
        let b = ModuleHandle::new(ModuleDef::new("Foo.Bar"));
        assert_eq!(a, a.clone());
        assert_ne!(a, b);
    }

    #[test]
    fn test_members_and_constructor() {
        let handle = ModuleHandle::new(
            ModuleDef::new("Name.Space")
                .with_member("functionOne", 1i64)
                .with_constructor(NativeFunction::new("Name.Space", |_| Value::from("built"))),
        );

        assert_eq!(handle.member("functionOne"), Some(Value::Int(1)));
        assert_eq!(handle.call(&[]), Some(Value::from("built")));
        assert!(handle.prototype().is_none());
    }

    #[test]
    fn test_prototype_shared_between_clones() {
        let proto = Scope::new();
        let handle = ModuleHandle::new(ModuleDef::new("DOM.Display").with_prototype(proto.clone()));
        let other = handle.clone();

        proto.set("register", Scope::new());
        assert!(other.prototype().is_some_and(|p| p.contains("register")));
    }
}
