/*
 * Copyright (c) 2025 Raphael Amorim
 *
 * This file is part of envfile, which is licensed
 * under GNU General Public License v3.0.
 */

//! Where loaded variables end up.
//!
//! [`ProcessEnvironment`] is the real thing: an in-process override table, the
//! OS environment and a fallback table, consulted in that order. [`MemoryStore`]
//! is a plain map for tests and dry runs.
//!
//! Nothing here takes a lock. Two threads loading into the same environment
//! interleave individual writes, and a whole-file load is not atomic.

use std::collections::HashMap;
use std::env;
use tracing::warn;

/// Read/write access to a key→string mapping.
pub trait VariableStore {
    fn get(&self, name: &str) -> Option<String>;

    fn set(&mut self, name: &str, value: &str);

    fn clear(&mut self, name: &str);

    fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }
}

impl<S: VariableStore + ?Sized> VariableStore for &mut S {
    fn get(&self, name: &str) -> Option<String> {
        (**self).get(name)
    }

    fn set(&mut self, name: &str, value: &str) {
        (**self).set(name, value)
    }

    fn clear(&mut self, name: &str) {
        (**self).clear(name)
    }
}

/// Whether writes are mirrored into the real process environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mirror {
    Os,
    Off,
}

impl Mirror {
    /// Resolved once per store; wasm targets have no process environment.
    pub fn detect() -> Self {
        if cfg!(target_family = "wasm") {
            Mirror::Off
        } else {
            Mirror::Os
        }
    }
}

impl Default for Mirror {
    fn default() -> Self {
        Mirror::detect()
    }
}

#[derive(Debug, Clone, Default)]
pub struct ProcessEnvironment {
    overrides: HashMap<String, String>,
    fallback: HashMap<String, String>,
    mirror: Mirror,
}

impl ProcessEnvironment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep everything in-process; the OS environment is still read.
    pub fn in_process() -> Self {
        Self::new().with_mirror(Mirror::Off)
    }

    pub fn with_mirror(mut self, mirror: Mirror) -> Self {
        self.mirror = mirror;
        self
    }

    /// Seed the lowest-priority table, consulted after the OS environment.
    pub fn with_fallback<I, K, V>(mut self, vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.fallback
            .extend(vars.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    pub fn mirror(&self) -> Mirror {
        self.mirror
    }

    pub fn overrides(&self) -> &HashMap<String, String> {
        &self.overrides
    }
}

// `std::env::set_var` panics on these
fn os_safe(name: &str, value: Option<&str>) -> bool {
    !name.is_empty()
        && !name.contains(['=', '\0'])
        && !value.is_some_and(|v| v.contains('\0'))
}

impl VariableStore for ProcessEnvironment {
    fn get(&self, name: &str) -> Option<String> {
        if let Some(value) = self.overrides.get(name) {
            return Some(value.clone());
        }
        // A value that is not valid UTF-8 still counts as set
        if os_safe(name, None) {
            if let Some(value) = env::var_os(name) {
                return Some(value.to_string_lossy().into_owned());
            }
        }
        self.fallback.get(name).cloned()
    }

    fn set(&mut self, name: &str, value: &str) {
        if self.mirror == Mirror::Os {
            if os_safe(name, Some(value)) {
                // The environment is process-global; callers own the threading story.
                unsafe {
                    env::set_var(name, value);
                }
            } else {
                warn!(name, "variable cannot be mirrored into the OS environment");
            }
        }
        self.overrides.insert(name.to_string(), value.to_string());
        self.fallback.insert(name.to_string(), value.to_string());
    }

    fn clear(&mut self, name: &str) {
        if self.mirror == Mirror::Os && os_safe(name, None) {
            unsafe {
                env::remove_var(name);
            }
        }
        self.overrides.remove(name);
        self.fallback.remove(name);
    }
}

/// In-memory store that never touches the process environment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryStore {
    vars: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.vars.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for MemoryStore {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            vars: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

impl VariableStore for MemoryStore {
    fn get(&self, name: &str) -> Option<String> {
        self.vars.get(name).cloned()
    }

    fn set(&mut self, name: &str, value: &str) {
        self.vars.insert(name.to_string(), value.to_string());
    }

    fn clear(&mut self, name: &str) {
        self.vars.remove(name);
    }
}
