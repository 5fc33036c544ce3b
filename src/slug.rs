//! URL slugs for products.
//!
//! A slug is the lowercased name with every run of characters outside
//! `[a-z0-9]` collapsed to one `-`, trimmed of leading and trailing `-`.
//! Collisions are resolved by appending `-1`, `-2`, ... against a set of
//! known slugs fetched once per write.
//!
//! The collision check is not atomic with the insert: two concurrent
//! creations with the same name can compute the same candidate. The store's
//! unique slug constraint rejects the loser with a conflict.

use std::collections::HashSet;

use thiserror::Error;

const SEPARATOR: char = '-';

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SlugError {
    #[error("name `{0}` has no characters usable in a slug")]
    Unrepresentable(String),
}

/// Derive the base slug for a name.
pub fn derive_slug(name: &str) -> Result<String, SlugError> {
    let mut slug = String::with_capacity(name.len());
    let mut pending_separator = false;

    for ch in name.to_lowercase().chars() {
        if ch.is_ascii_lowercase() || ch.is_ascii_digit() {
            if pending_separator && !slug.is_empty() {
                slug.push(SEPARATOR);
            }
            pending_separator = false;
            slug.push(ch);
        } else {
            pending_separator = true;
        }
    }

    if slug.is_empty() {
        return Err(SlugError::Unrepresentable(name.to_string()));
    }
    Ok(slug)
}

/// Pick the first of `base`, `base-1`, `base-2`, ... not in `existing`.
pub fn unique_slug(base: &str, existing: &HashSet<String>) -> String {
    if !existing.contains(base) {
        return base.to_string();
    }

    (1u64..)
        .map(|counter| format!("{base}{SEPARATOR}{counter}"))
        .find(|candidate| !existing.contains(candidate))
        .unwrap_or_else(|| base.to_string())
}
