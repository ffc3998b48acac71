//! Values and namespace scopes
//!
//! A [`Scope`] is a shared, mutable name → [`Value`] table. The global
//! scope, intermediate namespace containers, module members and prototypes
//! are all scopes. Cloning a scope clones the reference, not the table.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use crate::module::ModuleHandle;

/// A value bound in a scope
#[derive(Clone)]
pub enum Value {
    Nil,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    List(Vec<Value>),
    /// Nested scope (namespace container or plain table)
    Table(Scope),
    Function(NativeFunction),
    Module(ModuleHandle),
}

impl Value {
    /// The scope that dotted lookups descend into, if any
    ///
    /// Tables descend into themselves, modules into their members.
    pub fn child_scope(&self) -> Option<Scope> {
        match self {
            Value::Table(scope) => Some(scope.clone()),
            Value::Module(handle) => Some(handle.members().clone()),
            _ => None,
        }
    }

    /// Get the module handle if this is a module
    pub fn as_module(&self) -> Option<&ModuleHandle> {
        match self {
            Value::Module(handle) => Some(handle),
            _ => None,
        }
    }

    /// Get the scope if this is a table
    pub fn as_table(&self) -> Option<&Scope> {
        match self {
            Value::Table(scope) => Some(scope),
            _ => None,
        }
    }

    /// Get the string if this is a string
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Short name of the value's kind
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Nil => "nil",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Str(_) => "string",
            Value::List(_) => "list",
            Value::Table(_) => "table",
            Value::Function(_) => "function",
            Value::Module(_) => "module",
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Nil, Value::Nil) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Table(a), Value::Table(b)) => a.ptr_eq(b),
            (Value::Function(a), Value::Function(b)) => a.ptr_eq(b),
            (Value::Module(a), Value::Module(b)) => a.ptr_eq(b),
            _ => false,
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Nil => write!(f, "Nil"),
            Value::Bool(b) => write!(f, "Bool({})", b),
            Value::Int(i) => write!(f, "Int({})", i),
            Value::Float(x) => write!(f, "Float({})", x),
            Value::Str(s) => write!(f, "Str({:?})", s),
            Value::List(items) => f.debug_tuple("List").field(items).finish(),
            Value::Table(scope) => write!(f, "Table({:?})", scope.names()),
            Value::Function(func) => write!(f, "Function({})", func.name()),
            Value::Module(handle) => write!(f, "Module({})", handle.name()),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Nil => write!(f, "nil"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(x) => write!(f, "{}", x),
            Value::Str(s) => write!(f, "{:?}", s),
            Value::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
            Value::Table(scope) => write!(f, "{{{}}}", scope.names().join(", ")),
            Value::Function(func) => write!(f, "<function {}>", func.name()),
            Value::Module(handle) => write!(f, "<module {}>", handle.name()),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Float(x)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<Scope> for Value {
    fn from(scope: Scope) -> Self {
        Value::Table(scope)
    }
}

impl From<NativeFunction> for Value {
    fn from(func: NativeFunction) -> Self {
        Value::Function(func)
    }
}

impl From<ModuleHandle> for Value {
    fn from(handle: ModuleHandle) -> Self {
        Value::Module(handle)
    }
}

/// A host-provided callable
#[derive(Clone)]
pub struct NativeFunction {
    name: Rc<str>,
    func: Rc<dyn Fn(&[Value]) -> Value>,
}

impl NativeFunction {
    pub fn new(name: &str, func: impl Fn(&[Value]) -> Value + 'static) -> Self {
        Self {
            name: Rc::from(name),
            func: Rc::new(func),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn call(&self, args: &[Value]) -> Value {
        (self.func)(args)
    }

    /// Check whether two functions are the same object
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.func, &other.func)
    }
}

impl fmt::Debug for NativeFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NativeFunction({})", self.name)
    }
}

/// Shared mutable namespace table
#[derive(Clone, Default)]
pub struct Scope(Rc<RefCell<BTreeMap<String, Value>>>);

impl Scope {
    /// Create a new empty scope
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a binding
    pub fn get(&self, name: &str) -> Option<Value> {
        self.0.borrow().get(name).cloned()
    }

    /// Check if a name is bound
    pub fn contains(&self, name: &str) -> bool {
        self.0.borrow().contains_key(name)
    }

    /// Bind a name, replacing any previous binding
    pub fn set(&self, name: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.borrow_mut().insert(name.into(), value.into())
    }

    /// Bind a name only if it is not bound yet
    ///
    /// Returns `true` if the value was written.
    pub fn insert_if_absent(&self, name: &str, value: impl Into<Value>) -> bool {
        let mut table = self.0.borrow_mut();
        if table.contains_key(name) {
            return false;
        }
        table.insert(name.to_string(), value.into());
        true
    }

    /// Look up a dotted path, descending through tables and module members
    pub fn lookup(&self, dotted: &str) -> Option<Value> {
        let mut segments = dotted.split('.');
        let mut value = self.get(segments.next()?)?;
        for segment in segments {
            value = value.child_scope()?.get(segment)?;
        }
        Some(value)
    }

    /// Bound names in sorted order
    pub fn names(&self) -> Vec<String> {
        self.0.borrow().keys().cloned().collect()
    }

    /// Snapshot of all bindings in name order
    pub fn entries(&self) -> Vec<(String, Value)> {
        self.0
            .borrow()
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.0.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.borrow().is_empty()
    }

    /// Check whether two scopes are the same table
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.0.borrow().iter()).finish()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Scope {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let scope = Scope::new();
        for (name, value) in iter {
            scope.set(name, value);
        }
        scope
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_if_absent_first_writer_wins() {
        let scope = Scope::new();
        assert!(scope.insert_if_absent("x", 1i64));
        assert!(!scope.insert_if_absent("x", 2i64));
        assert_eq!(scope.get("x"), Some(Value::Int(1)));
    }

    #[test]
    fn test_clone_shares_table() {
        let scope = Scope::new();
        let alias = scope.clone();
        alias.set("y", "shared");
        assert_eq!(scope.get("y"), Some(Value::from("shared")));
        assert!(scope.ptr_eq(&alias));
    }

    #[test]
    fn test_lookup_dotted() {
        let inner: Scope = [("Baz", Value::Int(7))].into_iter().collect();
        let middle: Scope = [("Bar", Value::Table(inner))].into_iter().collect();
        let root: Scope = [("Foo", Value::Table(middle))].into_iter().collect();

        assert_eq!(root.lookup("Foo.Bar.Baz"), Some(Value::Int(7)));
        assert!(root.lookup("Foo.Missing").is_none());
        assert!(root.lookup("Foo.Bar.Baz.Deeper").is_none());
    }

    #[test]
    fn test_table_equality_is_identity() {
        let a = Scope::new();
        let b = Scope::new();
        assert_ne!(Value::Table(a.clone()), Value::Table(b));
        assert_eq!(Value::Table(a.clone()), Value::Table(a));
    }

    #[test]
    fn test_native_function_call() {
        let double = NativeFunction::new("double", |args| match args.first() {
            Some(Value::Int(i)) => Value::Int(i * 2),
            _ => Value::Nil,
        });
        assert_eq!(double.call(&[Value::Int(21)]), Value::Int(42));
        assert_eq!(double.call(&[]), Value::Nil);
    }
}
