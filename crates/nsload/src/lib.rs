//! nsload: load-once module loading into dotted namespaces
//!
//! This crate provides:
//! - Package identifier to resource path conversion (`Foo.Bar` → `Foo/Bar.js`)
//! - An ordered repository search list with prepend-on-add precedence
//! - A module cache enforcing at most one fetch and evaluation per path
//! - Namespace tree construction with first-writer-wins binding
//! - Exporter-style imports (default list, opt-in list, tags)
//! - Configurable error reporting (silent, warn, fatal)
//!
//! ```ignore
//! use nsload::{Loader, ManifestFactory, UrlFetcher};
//!
//! let mut loader = Loader::new(UrlFetcher::current_dir()?, ManifestFactory);
//! loader.add_repository("js/private");
//! loader.use_module("Test.More", &["plan".into(), "ok".into()])?;
//! ```

pub mod cache;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod exports;
pub mod factory;
pub mod fetch;
pub mod loader;
pub mod module;
pub mod names;
pub mod namespace;
pub mod path;
pub mod repository;
pub mod value;

pub use cache::{CacheStats, CachedModule, ModuleCache};
pub use config::{find_config, ConfigError, LoaderConfig, CONFIG_FILE};
pub use diagnostics::{Diagnostics, ErrorLevel, Notifier, TracingNotifier};
pub use error::LoadError;
pub use exports::ExportDecl;
pub use factory::{EvalError, Evaluation, ManifestFactory, ModuleFactory};
pub use fetch::{Fetch, FetchError, FsFetcher, HttpFetcher, MemoryFetcher, UrlFetcher};
pub use loader::Loader;
pub use module::{ModuleDef, ModuleHandle};
pub use names::NameList;
pub use namespace::{Binding, NamespaceError};
pub use path::resolve_path;
pub use repository::RepositoryList;
pub use value::{NativeFunction, Scope, Value};
