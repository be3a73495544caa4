/*
 * Copyright (c) 2025 Raphael Amorim
 *
 * This file is part of envfile, which is licensed
 * under GNU General Public License v3.0.
 */

//! Presence and shape checks for required variables.

use crate::error::{Error, Result};
use crate::store::VariableStore;

/// Assertions over a fixed set of names. Every check reports all failing
/// names at once rather than stopping at the first.
pub struct Validator<'s, S: VariableStore> {
    store: &'s S,
    names: Vec<String>,
}

impl<'s, S: VariableStore> Validator<'s, S> {
    /// Fails if any of `names` is absent from `store`.
    pub fn new(store: &'s S, names: &[&str]) -> Result<Self> {
        let validator = Self {
            store,
            names: names.iter().map(|n| n.to_string()).collect(),
        };
        validator.assert("is missing", |value| value.is_some())?;
        Ok(validator)
    }

    pub fn not_empty(self) -> Result<Self> {
        self.assert("is empty", |value| {
            value.is_some_and(|v| !v.trim().is_empty())
        })?;
        Ok(self)
    }

    pub fn is_integer(self) -> Result<Self> {
        self.assert("is not an integer", |value| {
            value.is_some_and(|v| v.trim().parse::<i64>().is_ok())
        })?;
        Ok(self)
    }

    /// Accepts `true`/`false`, `on`/`off`, `yes`/`no`, `1`/`0` in any case.
    pub fn is_boolean(self) -> Result<Self> {
        self.assert("is not a boolean", |value| {
            value.is_some_and(|v| {
                matches!(
                    v.trim().to_ascii_lowercase().as_str(),
                    "true" | "false" | "on" | "off" | "yes" | "no" | "1" | "0"
                )
            })
        })?;
        Ok(self)
    }

    pub fn allowed_values(self, choices: &[&str]) -> Result<Self> {
        let message = format!("is not one of [{}]", choices.join(", "));
        self.assert(&message, |value| {
            value.is_some_and(|v| choices.contains(&v))
        })?;
        Ok(self)
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    fn assert<F>(&self, message: &str, check: F) -> Result<()>
    where
        F: Fn(Option<&str>) -> bool,
    {
        let failures: Vec<String> = self
            .names
            .iter()
            .filter(|name| !check(self.store.get(name).as_deref()))
            .map(|name| format!("{name} {message}"))
            .collect();

        if failures.is_empty() {
            Ok(())
        } else {
            Err(Error::Validation(failures.join(", ")))
        }
    }
}
