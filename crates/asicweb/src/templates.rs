//! Page templates loaded from the `www` directory at startup.
//!
//! Every `*.html` file directly inside the directory becomes one named
//! template in a single [`minijinja`] environment, so pages can extend or
//! include each other by file name. The store is read-only once built.

use std::path::Path;

use minijinja::{Environment, UndefinedBehavior};
use serde::Serialize;

use crate::config::StartupMode;
use crate::error::LoadError;

/// In-memory collection of parsed page templates keyed by file name.
#[derive(Debug)]
pub struct TemplateStore {
    env: Environment<'static>,
    names: Vec<String>,
}

impl TemplateStore {
    /// A store with no templates; every render fails.
    pub fn empty() -> Self {
        let mut env = Environment::new();
        // A view model missing a field is a render failure, not a blank.
        env.set_undefined_behavior(UndefinedBehavior::Strict);
        Self {
            env,
            names: Vec::new(),
        }
    }

    /// Load every `*.html` file directly under `dir`.
    ///
    /// In [`StartupMode::Degrade`] unreadable entries are logged and
    /// skipped, and an unreadable directory yields an empty store.
    pub fn load_dir(dir: &Path, mode: StartupMode) -> Result<Self, LoadError> {
        let mut store = Self::empty();

        let entries = match std::fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(source) => {
                let err = LoadError::Io {
                    path: dir.to_path_buf(),
                    source,
                };
                if mode == StartupMode::FailFast {
                    return Err(err);
                }
                tracing::warn!(error = %err, "template directory unavailable, no pages loaded");
                return Ok(store);
            }
        };

        let mut files: Vec<_> = entries
            .filter_map(Result::ok)
            .filter(|entry| entry.file_type().is_ok_and(|t| t.is_file()))
            .filter_map(|entry| {
                let name = entry.file_name().into_string().ok()?;
                tracing::debug!(file = %name, "found file in template directory");
                name.ends_with(".html").then(|| (name, entry.path()))
            })
            .collect();
        files.sort();

        for (name, path) in files {
            let result = std::fs::read_to_string(&path)
                .map_err(|source| LoadError::Io {
                    path: path.clone(),
                    source,
                })
                .and_then(|source| store.add(name.clone(), source));

            match result {
                Ok(()) => {}
                Err(err) if mode == StartupMode::Degrade => {
                    tracing::warn!(error = %err, "skipping template");
                }
                Err(err) => return Err(err),
            }
        }

        tracing::info!(
            dir = %dir.display(),
            templates = ?store.names,
            "templates loaded"
        );

        Ok(store)
    }

    /// Parse `source` and register it under `name`.
    pub fn add(&mut self, name: String, source: String) -> Result<(), LoadError> {
        self.env
            .add_template_owned(name.clone(), source)
            .map_err(|source| LoadError::Template {
                name: name.clone(),
                source,
            })?;
        self.names.push(name);
        Ok(())
    }

    /// Names of all loaded templates, in load order.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Whether no template is loaded.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Render the template `name` with `view` as its context.
    pub fn render<S: Serialize>(&self, name: &str, view: S) -> Result<String, minijinja::Error> {
        self.env.get_template(name)?.render(view)
    }
}
