/*
 * Copyright (c) 2025 Raphael Amorim
 *
 * This file is part of envfile, which is licensed
 * under GNU General Public License v3.0.
 */

//! Loading a file into a [`VariableStore`].

use crate::error::{Error, Result};
use crate::lexer::Lexer;
use crate::parser::{Parser, Statement};
use crate::resolver::resolve_nested;
use crate::store::{ProcessEnvironment, VariableStore};
use crate::validator::Validator;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub const DEFAULT_FILENAME: &str = ".env";

/// Who wins when a name already has a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadMode {
    /// Existing values are kept.
    #[default]
    Immutable,
    /// File values replace existing ones.
    Overload,
}

/// What a single load saw.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Loaded {
    /// Every declared name in file order, duplicates included.
    pub names: Vec<String>,
    /// Every non-empty source line.
    pub lines: Vec<String>,
}

/// Applies assignments to a store, one line at a time.
pub struct Loader<S: VariableStore> {
    store: S,
    mode: LoadMode,
    names: Vec<String>,
}

impl<S: VariableStore> Loader<S> {
    pub fn new(store: S, mode: LoadMode) -> Self {
        Self {
            store,
            mode,
            names: Vec::new(),
        }
    }

    pub fn mode(&self) -> LoadMode {
        self.mode
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    pub fn get_variable(&self, name: &str) -> Option<String> {
        self.store.get(name)
    }

    /// Record `name` and write it unless an immutable load finds it already set.
    pub fn set_variable(&mut self, name: &str, value: &str) {
        self.names.push(name.to_string());

        if self.mode == LoadMode::Immutable && self.store.contains(name) {
            debug!(name, "keeping existing value");
            return;
        }

        debug!(name, "setting variable");
        self.store.set(name, value);
    }

    /// Remove `name` from the store. Immutable loaders never clear.
    pub fn clear_variable(&mut self, name: &str) {
        if self.mode == LoadMode::Immutable {
            return;
        }
        self.store.clear(name);
    }

    /// Parse `content` and apply every assignment in order.
    ///
    /// A malformed value aborts the load, but lines before it stay applied.
    pub fn load_str(&mut self, content: &str) -> Result<Loaded> {
        let start = self.names.len();
        let mut lines = Vec::new();

        for statement in Parser::new(Lexer::new(content)) {
            let statement = statement?;
            lines.push(statement.line().text.clone());

            if let Statement::Assignment { name, value, .. } = statement {
                let store = &self.store;
                let mut unresolved = Vec::new();
                let resolved = resolve_nested(&value, |reference| {
                    let found = store.get(reference);
                    if found.is_none() {
                        unresolved.push(reference.to_string());
                    }
                    found
                });
                for reference in &unresolved {
                    debug!(name = %name, reference = %reference, "nested reference left unresolved");
                }
                self.set_variable(&name, &resolved);
            }
        }

        Ok(Loaded {
            names: self.names[start..].to_vec(),
            lines,
        })
    }
}

fn read_file(path: &Path) -> Result<String> {
    let metadata = fs::metadata(path).map_err(|e| Error::path(path, e))?;
    if !metadata.is_file() {
        return Err(Error::path(
            path,
            io::Error::new(io::ErrorKind::InvalidInput, "not a regular file"),
        ));
    }
    let bytes = fs::read(path).map_err(|e| Error::path(path, e))?;
    // Invalid UTF-8 becomes U+FFFD rather than discarding the whole file
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// A `.env` file in a directory, bound to a store.
pub struct Dotenv<S: VariableStore = ProcessEnvironment> {
    dir: PathBuf,
    filename: String,
    store: S,
    names: Vec<String>,
}

impl Dotenv<ProcessEnvironment> {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self::with_store(dir, ProcessEnvironment::new())
    }
}

impl<S: VariableStore> Dotenv<S> {
    pub fn with_store(dir: impl Into<PathBuf>, store: S) -> Self {
        Self {
            dir: dir.into(),
            filename: DEFAULT_FILENAME.to_string(),
            store,
            names: Vec::new(),
        }
    }

    pub fn filename(mut self, filename: impl Into<String>) -> Self {
        let filename = filename.into();
        self.filename = if filename.is_empty() {
            DEFAULT_FILENAME.to_string()
        } else {
            filename
        };
        self
    }

    pub fn file_path(&self) -> PathBuf {
        // `Path::join` already copes with a trailing separator on `dir`
        self.dir.join(&self.filename)
    }

    /// Load without touching variables that are already set.
    pub fn load(&mut self) -> Result<Loaded> {
        self.load_with(LoadMode::Immutable)
    }

    /// Like [`Dotenv::load`], but a missing or unreadable file yields an empty result.
    pub fn safe_load(&mut self) -> Result<Loaded> {
        match self.load() {
            Err(err) if err.is_path() => {
                debug!(error = %err, "no environment file, nothing loaded");
                Ok(Loaded::default())
            }
            other => other,
        }
    }

    /// Load, replacing any existing values.
    pub fn overload(&mut self) -> Result<Loaded> {
        self.load_with(LoadMode::Overload)
    }

    pub fn load_with(&mut self, mode: LoadMode) -> Result<Loaded> {
        let path = self.file_path();
        let content = read_file(&path)?;

        let mut loader = Loader::new(&mut self.store, mode);
        let result = loader.load_str(&content);
        // Partially applied loads still report what they declared
        self.names.extend_from_slice(loader.names());

        let loaded = result?;
        info!(
            path = %path.display(),
            variables = loaded.names.len(),
            mode = ?mode,
            "loaded environment file"
        );
        Ok(loaded)
    }

    /// Start validating that `names` are present in the store.
    pub fn required(&self, names: &[&str]) -> Result<Validator<'_, S>> {
        Validator::new(&self.store, names)
    }

    /// Names declared by every load so far.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }
}

/// Load `dir/filename` into the process environment, keeping existing values.
///
/// The store used here is dropped on return, so only the OS mirror survives.
/// Where [`Mirror::detect`] yields [`Mirror::Off`] (wasm targets) nothing is
/// kept; use [`Dotenv`] there and read from [`Dotenv::store`].
///
/// [`Mirror::detect`]: crate::store::Mirror::detect
/// [`Mirror::Off`]: crate::store::Mirror::Off
pub fn load(dir: impl AsRef<Path>, filename: &str) -> Result<Loaded> {
    Dotenv::new(dir.as_ref()).filename(filename).load()
}

/// [`load`], but a missing file is not an error. Same store caveat as [`load`].
pub fn safe_load(dir: impl AsRef<Path>, filename: &str) -> Result<Loaded> {
    Dotenv::new(dir.as_ref()).filename(filename).safe_load()
}

/// Load `dir/filename` into the process environment, replacing existing values.
/// Same store caveat as [`load`].
pub fn overload(dir: impl AsRef<Path>, filename: &str) -> Result<Loaded> {
    Dotenv::new(dir.as_ref()).filename(filename).overload()
}
