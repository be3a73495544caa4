/*
 * Copyright (c) 2025 Raphael Amorim
 *
 * This file is part of envfile, which is licensed
 * under GNU General Public License v3.0.
 */

//! `${NAME}` interpolation against already-known variables.

use regex::{Captures, Regex};
use std::sync::LazyLock;

static NESTED_REFERENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([A-Za-z0-9_.]+)\}").unwrap());

/// Replace every `${NAME}` in `value` with `lookup(NAME)`.
///
/// Unknown names leave the token untouched. Substituted text is not scanned
/// again, so a value that itself contains `${...}` is inserted literally.
/// `lookup` sees each token exactly once, which lets callers record misses.
pub fn resolve_nested<F>(value: &str, mut lookup: F) -> String
where
    F: FnMut(&str) -> Option<String>,
{
    if !value.contains('$') {
        return value.to_string();
    }

    NESTED_REFERENCE
        .replace_all(value, |caps: &Captures| match lookup(&caps[1]) {
            Some(found) => found,
            None => caps[0].to_string(),
        })
        .into_owned()
}
