//! Declarative TOML module sources
//!
//! ```toml
//! [[use]]
//! module = "Some.Dependency"
//! import = [":all"]            # omit for the default exports
//!
//! [module."Digest.MD5"]
//! export_ok = ["md5", "md5Hex"]
//! export_tags = { ":all" = ["md5", "md5Hex"] }
//! members = { md5 = "...", md5Hex = "..." }
//! prototype = { register = {} }
//! ```
//!
//! Dependencies are loaded first, then every `[module.*]` table is staged.

use std::collections::BTreeMap;

use serde::Deserialize;

use super::{EvalError, Evaluation, ModuleFactory};
use crate::exports::ExportDecl;
use crate::module::ModuleDef;
use crate::names::NameList;
use crate::value::{Scope, Value};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ModuleSource {
    #[serde(default, rename = "use")]
    uses: Vec<UseSpec>,

    #[serde(default)]
    module: BTreeMap<String, ModuleSpec>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct UseSpec {
    module: String,

    /// `None` requests the default exports, `Some([])` requests nothing
    #[serde(default)]
    import: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ModuleSpec {
    #[serde(default)]
    export: Vec<String>,

    #[serde(default)]
    export_ok: Vec<String>,

    #[serde(default)]
    export_tags: BTreeMap<String, Vec<String>>,

    #[serde(default)]
    members: toml::Table,

    #[serde(default)]
    prototype: Option<toml::Table>,
}

/// Factory for declarative TOML module sources
#[derive(Debug, Default, Clone, Copy)]
pub struct ManifestFactory;

impl ManifestFactory {
    pub fn new() -> Self {
        Self
    }
}

impl ModuleFactory for ManifestFactory {
    fn evaluate(&self, source: &str, eval: &mut Evaluation<'_>) -> Result<(), EvalError> {
        let parsed: ModuleSource =
            toml::from_str(source).map_err(|e| EvalError::Parse(e.to_string()))?;

        for dependency in &parsed.uses {
            let imports: Vec<NameList> = match &dependency.import {
                None => Vec::new(),
                Some(names) => vec![NameList::list(names)],
            };
            if eval.use_module(&dependency.module, &imports)?.is_none() {
                tracing::debug!(
                    module = eval.identifier(),
                    dependency = %dependency.module,
                    "dependency did not load"
                );
            }
        }

        for (name, spec) in parsed.module {
            if name.is_empty() || name.split('.').any(str::is_empty) {
                return Err(EvalError::Invalid(format!("bad module name {name:?}")));
            }
            eval.define(spec.into_def(name));
        }

        Ok(())
    }
}

impl ModuleSpec {
    fn into_def(self, name: String) -> ModuleDef {
        let exports = ExportDecl {
            export: self.export,
            export_ok: self.export_ok,
            export_tags: self.export_tags,
        };
        let mut def = ModuleDef::new(name)
            .with_exports(exports)
            .with_members(table_to_scope(self.members));
        if let Some(prototype) = self.prototype {
            def = def.with_prototype(table_to_scope(prototype));
        }
        def
    }
}

fn table_to_scope(table: toml::Table) -> Scope {
    table.into_iter().map(|(k, v)| (k, toml_to_value(v))).collect()
}

fn toml_to_value(value: toml::Value) -> Value {
    match value {
        toml::Value::String(s) => Value::Str(s),
        toml::Value::Integer(i) => Value::Int(i),
        toml::Value::Float(x) => Value::Float(x),
        toml::Value::Boolean(b) => Value::Bool(b),
        toml::Value::Datetime(dt) => Value::Str(dt.to_string()),
        toml::Value::Array(items) => Value::List(items.into_iter().map(toml_to_value).collect()),
        toml::Value::Table(table) => Value::Table(table_to_scope(table)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toml_to_value() {
        let table: toml::Table = toml::from_str(
            r#"
            name = "md5"
            size = 16
            ratio = 0.5
            enabled = true
            tags = ["a", 1]
            nested = { inner = "x" }
            "#,
        )
        .unwrap();

        let scope = table_to_scope(table);

        assert_eq!(scope.get("name"), Some(Value::from("md5")));
        assert_eq!(scope.get("size"), Some(Value::Int(16)));
        assert_eq!(scope.get("ratio"), Some(Value::Float(0.5)));
        assert_eq!(scope.get("enabled"), Some(Value::Bool(true)));
        assert_eq!(
            scope.get("tags"),
            Some(Value::List(vec![Value::from("a"), Value::Int(1)]))
        );
        assert_eq!(scope.lookup("nested.inner"), Some(Value::from("x")));
    }

    #[test]
    fn test_spec_into_def() {
        let source: ModuleSource = toml::from_str(
            r#"
            [module."Name.Space"]
            export = ["functionOne"]
            export_ok = ["specialOne"]
            export_tags = { ":all" = ["functionOne", "specialOne"] }
            members = { functionOne = 1, specialOne = 2 }
            prototype = { publicProperty = "you see me" }
            "#,
        )
        .unwrap();

        let (name, spec) = source.module.into_iter().next().unwrap();
        let def = spec.into_def(name);
        let handle = crate::module::ModuleHandle::new(def);

        assert_eq!(handle.name(), "Name.Space");
        assert_eq!(handle.exports().export, vec!["functionOne"]);
        assert_eq!(handle.exports().tag(":all").len(), 2);
        assert_eq!(handle.member("specialOne"), Some(Value::Int(2)));
        assert_eq!(
            handle.prototype().and_then(|p| p.get("publicProperty")),
            Some(Value::from("you see me"))
        );
    }

    #[test]
    fn test_unknown_keys_rejected() {
        let result: Result<ModuleSource, _> = toml::from_str(
            r#"
            [module."A"]
            exports = ["typo"]
            "#,
        );
        assert!(result.is_err());
    }
}
