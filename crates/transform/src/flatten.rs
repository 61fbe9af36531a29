//! Flatten primitive - nested-structure collapse
//!
//! Flatten copies the children of a nested value up to the top level of
//! the map that contains it. Both the metadata and data transformers use
//! it; they differ only in defaults and in where the step runs in the
//! rule order.
//!
//! Given `{"net": {"rx": 10, "tx": 20}}` and path `["net"]` with separator
//! `"__"`, the map becomes `{"net__rx": 10, "net__tx": 20}` (plus the
//! original `net` when `keep_original` is set).
//!
//! Collisions overwrite silently.

use serde_json::Value;

use sluice_core::Fields;

use crate::{TransformError, TransformResult};

#[cfg(test)]
#[path = "flatten_test.rs"]
mod tests;

/// Sentinel separator: no prefix is built from the path at all.
pub const DROP_SEPARATOR: &str = "drop";

/// Collapse the value at `path` into top-level keys of `fields`.
///
/// - The path names the nested value to collapse; every intermediate step
///   must be an object. A missing or non-object intermediate is a silent
///   no-op.
/// - New keys are `prefix + separator + child key`, where the prefix joins
///   the whole path with the separator. The separator [`DROP_SEPARATOR`]
///   makes both the prefix and the join empty.
/// - An array value flattens per element: object elements contribute
///   `index + separator + key` entries (the prefix does not participate),
///   scalar elements contribute their bare index.
/// - A leaf that is neither an object nor an array is a cast failure.
/// - Unless `keep_original` is set, the key equal to the prefix is removed
///   after all writes.
///
/// `section` only labels errors ("metadata" or "data").
pub fn flatten(
    fields: &mut Fields,
    path: &[String],
    separator: &str,
    keep_original: bool,
    section: &'static str,
) -> TransformResult<()> {
    let Some((leaf_key, parents)) = path.split_last() else {
        return Ok(());
    };

    let mut parent: &Fields = fields;
    for step in parents {
        match parent.get(step) {
            Some(Value::Object(next)) => parent = next,
            _ => return Ok(()),
        }
    }

    let Some(leaf) = parent.get(leaf_key).cloned() else {
        return Err(TransformError::cast_failed(section, path));
    };

    let (prefix, sep) = if separator == DROP_SEPARATOR {
        (String::new(), "")
    } else {
        (path.join(separator), separator)
    };

    let mut flattened: Vec<(String, Value)> = Vec::new();
    match leaf {
        Value::Object(object) => {
            for (key, value) in object {
                flattened.push((format!("{prefix}{sep}{key}"), value));
            }
        }
        Value::Array(elements) => {
            for (index, element) in elements.into_iter().enumerate() {
                match element {
                    Value::Object(object) => {
                        for (key, value) in object {
                            flattened.push((format!("{index}{sep}{key}"), value));
                        }
                    }
                    scalar => flattened.push((index.to_string(), scalar)),
                }
            }
        }
        _ => return Err(TransformError::cast_failed(section, path)),
    }

    for (key, value) in flattened {
        fields.insert(key, value);
    }
    if !keep_original {
        fields.remove(&prefix);
    }
    Ok(())
}
