//! Load orchestration
//!
//! `require` resolves an identifier to a resource path, returns the cached
//! module if the path was loaded before, otherwise searches the repository
//! list, evaluates the first source found and binds the result into the
//! global scope. `use_module` additionally exports symbols from the module
//! into the global scope.

use std::rc::Rc;

use crate::cache::{CachedModule, ModuleCache};
use crate::config::LoaderConfig;
use crate::diagnostics::{Diagnostics, ErrorLevel, Notifier};
use crate::error::LoadError;
use crate::exports;
use crate::factory::{Evaluation, ModuleFactory};
use crate::fetch::{compute_checksum, Fetch};
use crate::module::ModuleHandle;
use crate::names::NameList;
use crate::namespace::{self, Binding};
use crate::path::{self, DEFAULT_EXTENSION};
use crate::repository::RepositoryList;
use crate::value::Scope;

/// Module loader
///
/// Owns the global scope, the repository list, the module cache and the
/// diagnostics state. Single-threaded: nested loads triggered while a
/// module is being evaluated are plain recursive calls.
pub struct Loader {
    global: Scope,
    repositories: RepositoryList,
    cache: ModuleCache,
    diagnostics: Diagnostics,
    fetcher: Rc<dyn Fetch>,
    factory: Rc<dyn ModuleFactory>,
    extension: String,
    /// Resource paths currently being materialized, outermost first
    loading: Vec<String>,
}

/// Source text and the URL it came from
struct Fetched {
    url: String,
    source: String,
}

impl Loader {
    /// Create a loader with the default configuration
    pub fn new(fetcher: impl Fetch + 'static, factory: impl ModuleFactory + 'static) -> Self {
        Self::from_config(&LoaderConfig::default(), fetcher, factory)
    }

    /// Create a loader from a configuration
    pub fn from_config(
        config: &LoaderConfig,
        fetcher: impl Fetch + 'static,
        factory: impl ModuleFactory + 'static,
    ) -> Self {
        let extension = match config.extension.trim_start_matches('.') {
            "" => DEFAULT_EXTENSION.to_string(),
            ext => ext.to_string(),
        };
        Self {
            global: Scope::new(),
            repositories: RepositoryList::new(config.repositories.clone()),
            cache: ModuleCache::new(),
            diagnostics: Diagnostics::new(config.error_level),
            fetcher: Rc::new(fetcher),
            factory: Rc::new(factory),
            extension,
            loading: Vec::new(),
        }
    }

    /// Use `scope` as the global scope
    pub fn with_global_scope(mut self, scope: Scope) -> Self {
        self.set_global_scope(scope);
        self
    }

    /// Replace the warning channel
    pub fn with_notifier(mut self, notifier: impl Notifier + 'static) -> Self {
        self.diagnostics.set_notifier(notifier);
        self
    }

    /// Replace the global scope
    ///
    /// Meant to be called before anything is loaded; modules loaded earlier
    /// stay cached but are not bound in the new scope.
    pub fn set_global_scope(&mut self, scope: Scope) {
        if !self.cache.is_empty() {
            tracing::warn!(
                loaded = self.cache.len(),
                "global scope replaced after modules were loaded"
            );
        }
        self.global = scope;
    }

    pub fn global_scope(&self) -> &Scope {
        &self.global
    }

    pub fn repositories(&self) -> &RepositoryList {
        &self.repositories
    }

    /// Add repositories ahead of the existing ones
    pub fn add_repository(&mut self, entries: impl Into<NameList>) -> &mut Self {
        self.repositories.add(entries);
        self
    }

    pub fn cache(&self) -> &ModuleCache {
        &self.cache
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    pub fn diagnostics_mut(&mut self) -> &mut Diagnostics {
        &mut self.diagnostics
    }

    pub fn error_level(&self) -> ErrorLevel {
        self.diagnostics.level()
    }

    pub fn set_error_level(&mut self, level: ErrorLevel) {
        self.diagnostics.set_level(level);
    }

    /// Most recent error message
    pub fn last_error(&self) -> Option<&str> {
        self.diagnostics.last_error()
    }

    /// Resource path for an identifier
    pub fn resolve_path(&self, identifier: &str) -> String {
        path::resolve_path(identifier, &self.extension)
    }

    /// Check if an identifier's path has been loaded
    pub fn is_loaded(&self, identifier: &str) -> bool {
        self.cache.contains(&self.resolve_path(identifier))
    }

    /// Load a module
    ///
    /// Returns the cached handle if the path was loaded before. A module
    /// already bound at the identifier in the global scope is returned
    /// as-is and is not recorded in the cache.
    ///
    /// `Ok(None)` signals failure under the silent and warn levels; the
    /// message is in [`Loader::last_error`]. Under the fatal level the
    /// failure is returned as `Err`.
    pub fn require(&mut self, identifier: &str) -> Result<Option<ModuleHandle>, LoadError> {
        let path = self.resolve_path(identifier);
        if let Some(handle) = self.cache.get(&path) {
            tracing::debug!(%identifier, %path, "module cache hit");
            return Ok(Some(handle));
        }

        if let Some(handle) = namespace::find_module(&self.global, identifier) {
            tracing::debug!(%identifier, "using module already defined in global scope");
            return Ok(Some(handle));
        }

        if self.loading.contains(&path) {
            return self.fail(LoadError::Circular(identifier.to_string()));
        }

        let fetched = match self.fetch_source(identifier, &path) {
            Ok(fetched) => fetched,
            Err(err) => return self.fail(err),
        };

        self.loading.push(path.clone());
        let materialized = self.materialize(&fetched.source, identifier);
        self.loading.pop();

        match materialized {
            Ok(handle) => {
                tracing::debug!(%identifier, url = %fetched.url, "module loaded");
                let handle = self.cache.insert(CachedModule {
                    path,
                    checksum: compute_checksum(fetched.source.as_bytes()),
                    url: fetched.url,
                    handle,
                });
                Ok(Some(handle))
            }
            Err(err) => self.fail(err),
        }
    }

    /// Load a module and export symbols from it into the global scope
    ///
    /// An empty `imports` slice exports the module's default list.
    pub fn use_module(
        &mut self,
        identifier: &str,
        imports: &[NameList],
    ) -> Result<Option<ModuleHandle>, LoadError> {
        let Some(handle) = self.require(identifier)? else {
            return Ok(None);
        };
        self.exporter(&handle, imports);
        Ok(Some(handle))
    }

    /// Export symbols from an already loaded module into the global scope
    ///
    /// Returns the names that were copied.
    pub fn exporter(&self, handle: &ModuleHandle, imports: &[NameList]) -> Vec<String> {
        exports::export_into(handle, imports, &self.global)
    }

    /// Route a load error through diagnostics
    fn fail(&mut self, error: LoadError) -> Result<Option<ModuleHandle>, LoadError> {
        self.diagnostics.report(error, None)?;
        Ok(None)
    }

    /// Search the repositories in order, returning the first source found
    ///
    /// Failures before the last repository are skipped; the last failure is
    /// the one reported.
    fn fetch_source(&self, identifier: &str, path: &str) -> Result<Fetched, LoadError> {
        let last = self.repositories.len().checked_sub(1).ok_or_else(|| {
            LoadError::NoRepositories {
                identifier: identifier.to_string(),
            }
        })?;

        for (i, repository) in self.repositories.iter().enumerate() {
            let url = path::path_to_url(repository, path);
            match self.fetcher.fetch_text(&url) {
                Ok(source) => return Ok(Fetched { url, source }),
                Err(source) if i == last => {
                    return Err(LoadError::NotFound {
                        identifier: identifier.to_string(),
                        url,
                        source,
                    })
                }
                Err(e) => {
                    tracing::debug!(%url, error = %e, "not in repository, trying next");
                }
            }
        }

        Err(LoadError::NoRepositories {
            identifier: identifier.to_string(),
        })
    }

    /// Evaluate a source and bind the module it defines
    fn materialize(&mut self, source: &str, identifier: &str) -> Result<ModuleHandle, LoadError> {
        let namespace_error = |reason: String| LoadError::Namespace {
            identifier: identifier.to_string(),
            reason,
        };

        let factory = Rc::clone(&self.factory);
        let mut eval = Evaluation::new(self, identifier);
        factory
            .evaluate(source, &mut eval)
            .map_err(|e| namespace_error(e.to_string()))?;
        let defined = eval.into_definitions();

        let handle = defined
            .get(identifier)
            .cloned()
            .or_else(|| namespace::find_module(&self.global, identifier))
            .ok_or_else(|| namespace_error("no module defined under this name".to_string()))?;

        if namespace::bind(&self.global, identifier, &handle)
            .map_err(|e| namespace_error(e.to_string()))?
            == Binding::Occupied
        {
            tracing::debug!(%identifier, "returning newly loaded module; namespace keeps the earlier binding");
        }

        for (name, other) in defined.iter().filter(|(name, _)| *name != identifier) {
            if let Err(e) = namespace::bind(&self.global, name, other) {
                tracing::debug!(module = %name, error = %e, "could not bind extra definition");
            }
        }

        Ok(handle)
    }
}

impl std::fmt::Debug for Loader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Loader")
            .field("repositories", &self.repositories)
            .field("cache", &self.cache)
            .field("diagnostics", &self.diagnostics)
            .field("extension", &self.extension)
            .finish_non_exhaustive()
    }
}
