//! Shared rule helpers for the metadata and data transformers
//!
//! Both transformers run the same rule vocabulary against opposite sides
//! of the metric; the helpers here take the target map and a `section`
//! label for error messages.

use serde::Deserialize;

use sluice_core::Fields;

use crate::{flatten, TransformError, TransformResult};

/// A source and destination key pair, with the option to keep the source.
///
/// Parameterizes the copy and rename rules. When `destination` is left
/// empty, the source name is used as the destination name.
#[derive(Debug, Clone, Deserialize)]
pub struct SourceDestination {
    /// Name of the source field.
    pub source: String,

    /// The destination name. Defaults to the source name when empty.
    #[serde(default)]
    pub destination: String,

    /// Keep the source field instead of deleting it.
    #[serde(default)]
    pub keep: bool,
}

impl SourceDestination {
    /// The effective destination key.
    pub fn destination(&self) -> &str {
        if self.destination.is_empty() {
            &self.source
        } else {
            &self.destination
        }
    }
}

/// `set`: unconditional assignment, creating the map if absent.
pub(crate) fn apply_set(target: &mut Option<Fields>, set: &Fields) {
    if set.is_empty() {
        return;
    }
    let map = target.get_or_insert_with(Fields::new);
    for (key, value) in set {
        map.insert(key.clone(), value.clone());
    }
}

/// `require`: fail if any listed key is missing or null.
pub(crate) fn check_require(
    target: &Option<Fields>,
    fields: &[String],
    section: &'static str,
) -> TransformResult<()> {
    for field in fields {
        let present = target
            .as_ref()
            .and_then(|map| map.get(field))
            .is_some_and(|value| !value.is_null());
        if !present {
            return Err(TransformError::missing(section, field));
        }
    }
    Ok(())
}

/// `remove`: delete listed keys if present.
pub(crate) fn apply_remove(target: &mut Option<Fields>, fields: &[String]) {
    let Some(map) = target.as_mut() else { return };
    for field in fields {
        map.remove(field);
    }
}

/// `ban`: fail if any listed key is present.
pub(crate) fn check_ban(
    target: &Option<Fields>,
    fields: &[String],
    section: &'static str,
) -> TransformResult<()> {
    for field in fields {
        if target.as_ref().is_some_and(|map| map.contains_key(field)) {
            return Err(TransformError::banned(section, field));
        }
    }
    Ok(())
}

/// `rename`: move each source key to its destination.
///
/// A rename onto itself (destination defaulting included) keeps the key.
pub(crate) fn apply_rename(target: &mut Option<Fields>, rules: &[SourceDestination]) {
    let Some(map) = target.as_mut() else { return };
    for rule in rules {
        let Some(value) = map.get(&rule.source).cloned() else {
            continue;
        };
        let destination = rule.destination().to_string();
        let moved = destination != rule.source;
        map.insert(destination, value);
        if !rule.keep && moved {
            map.remove(&rule.source);
        }
    }
}

/// `flatten`: collapse each configured path.
///
/// Shape mismatches are logged and skipped; only `require`/`ban` and the
/// deprecation gate may abort a transformer pass.
pub(crate) fn apply_flatten(
    target: &mut Option<Fields>,
    paths: &[Vec<String>],
    separator: &str,
    keep_original: bool,
    section: &'static str,
) {
    if paths.is_empty() {
        return;
    }
    let Some(map) = target.as_mut() else { return };
    for path in paths {
        if let Err(error) = flatten::flatten(map, path, separator, keep_original, section) {
            tracing::warn!(%error, "flatten skipped");
        }
    }
}
