//! Export resolution
//!
//! A module declares three lists:
//! - `export`: symbols copied when the caller requests nothing specific
//! - `export_ok`: symbols copied only on request
//! - `export_tags`: named groups (e.g. `:all`) expanding to symbol names
//!
//! Resolving a request produces a flat set of symbol names, which is then
//! applied to a target scope without overwriting existing bindings.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::module::ModuleHandle;
use crate::names::{self, NameList};
use crate::value::Scope;

/// Export metadata declared by a module
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportDecl {
    /// Exported unless the caller names what it wants
    #[serde(default)]
    pub export: Vec<String>,

    /// Exported only when requested
    #[serde(default)]
    pub export_ok: Vec<String>,

    /// Tag name → symbol names
    #[serde(default)]
    pub export_tags: BTreeMap<String, Vec<String>>,
}

impl ExportDecl {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_export<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.export = names.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_export_ok<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.export_ok = names.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_tag<I, S>(mut self, tag: impl Into<String>, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.export_tags
            .insert(tag.into(), names.into_iter().map(Into::into).collect());
        self
    }

    /// Check if a name is in the default or opt-in list
    pub fn is_exportable(&self, name: &str) -> bool {
        self.export.iter().any(|n| n == name) || self.export_ok.iter().any(|n| n == name)
    }

    /// Symbols listed under a tag, empty if the tag is unknown
    pub fn tag(&self, tag: &str) -> &[String] {
        self.export_tags.get(tag).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Resolve a request into the symbol names to copy
    ///
    /// An empty request selects the default list. Otherwise each flattened
    /// name is taken directly if it is exportable, expanded if it is a tag,
    /// and dropped if it is neither. Duplicates are removed, first
    /// occurrence wins.
    pub fn resolve(&self, requested: &[NameList]) -> Vec<String> {
        if requested.is_empty() {
            return dedup(self.export.iter().cloned());
        }

        let mut resolved = Vec::new();
        for request in names::flatten(requested) {
            if self.is_exportable(&request) {
                resolved.push(request);
                continue;
            }
            let group = self.tag(&request);
            if group.is_empty() {
                tracing::debug!(name = %request, "dropping unknown export request");
            }
            resolved.extend(group.iter().cloned());
        }
        dedup(resolved)
    }
}

fn dedup(names: impl IntoIterator<Item = String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for name in names {
        if !out.contains(&name) {
            out.push(name);
        }
    }
    out
}

/// Copy resolved symbols from a module into a target scope
///
/// Names already bound in the target are left alone, as are names the
/// module has no member for. Returns the names actually copied.
pub fn apply(handle: &ModuleHandle, names: &[String], target: &Scope) -> Vec<String> {
    let mut copied = Vec::new();
    for name in names {
        if target.contains(name) {
            tracing::debug!(module = handle.name(), %name, "keeping existing binding");
            continue;
        }
        let Some(value) = handle.member(name) else {
            tracing::debug!(module = handle.name(), %name, "module has no such member");
            continue;
        };
        if target.insert_if_absent(name, value) {
            copied.push(name.clone());
        }
    }
    copied
}

/// Resolve a request against a module and apply it to a target scope
pub fn export_into(handle: &ModuleHandle, requested: &[NameList], target: &Scope) -> Vec<String> {
    let names = handle.exports().resolve(requested);
    apply(handle, &names, target)
}
