//! Module factories
//!
//! A factory turns fetched source text into module definitions. It runs
//! with an [`Evaluation`] context that can stage definitions and load
//! other modules through the same loader, so dependencies declared by a
//! module are loaded while it is being materialized.

mod manifest;

pub use manifest::ManifestFactory;

use std::collections::BTreeMap;

use thiserror::Error;

use crate::error::LoadError;
use crate::loader::Loader;
use crate::module::{ModuleDef, ModuleHandle};
use crate::names::NameList;
use crate::value::{Scope, Value};

/// Errors raised while evaluating a module source
#[derive(Debug, Error)]
pub enum EvalError {
    /// Source could not be parsed
    #[error("Parse error: {0}")]
    Parse(String),

    /// Source is well-formed but describes an invalid module
    #[error("Invalid module: {0}")]
    Invalid(String),

    /// A nested load failed fatally
    #[error("{0}")]
    Load(#[from] LoadError),
}

/// Turns source text into module definitions
pub trait ModuleFactory {
    fn evaluate(&self, source: &str, eval: &mut Evaluation<'_>) -> Result<(), EvalError>;
}

impl<F> ModuleFactory for F
where
    F: Fn(&str, &mut Evaluation<'_>) -> Result<(), EvalError>,
{
    fn evaluate(&self, source: &str, eval: &mut Evaluation<'_>) -> Result<(), EvalError> {
        self(source, eval)
    }
}

/// Context for evaluating one module source
pub struct Evaluation<'a> {
    loader: &'a mut Loader,
    identifier: &'a str,
    defined: BTreeMap<String, ModuleHandle>,
}

impl<'a> Evaluation<'a> {
    pub(crate) fn new(loader: &'a mut Loader, identifier: &'a str) -> Self {
        Self {
            loader,
            identifier,
            defined: BTreeMap::new(),
        }
    }

    /// Identifier of the module being loaded
    pub fn identifier(&self) -> &str {
        self.identifier
    }

    /// Stage a definition at its dotted name
    ///
    /// A later definition under the same name replaces an earlier one.
    pub fn define(&mut self, def: ModuleDef) -> ModuleHandle {
        let handle = ModuleHandle::new(def);
        self.defined.insert(handle.name().to_string(), handle.clone());
        handle
    }

    /// A definition staged by this evaluation
    pub fn defined(&self, name: &str) -> Option<&ModuleHandle> {
        self.defined.get(name)
    }

    /// Load another module
    pub fn require(&mut self, identifier: &str) -> Result<Option<ModuleHandle>, LoadError> {
        self.loader.require(identifier)
    }

    /// Load another module and export from it into the global scope
    pub fn use_module(
        &mut self,
        identifier: &str,
        imports: &[NameList],
    ) -> Result<Option<ModuleHandle>, LoadError> {
        self.loader.use_module(identifier, imports)
    }

    /// The shared global scope
    pub fn global_scope(&self) -> &Scope {
        self.loader.global_scope()
    }

    /// Look up a dotted name in the global scope
    pub fn lookup(&self, dotted: &str) -> Option<Value> {
        self.loader.global_scope().lookup(dotted)
    }

    pub(crate) fn into_definitions(self) -> BTreeMap<String, ModuleHandle> {
        self.defined
    }
}
