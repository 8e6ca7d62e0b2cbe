//! Pass 2: Reference Rewriting
//!
//! Pass 0 stripped whitespace from schema names; this pass does the same to
//! every `$ref` string anywhere in the tree so references keep resolving to
//! the cleaned names. Purely structural — it does not check that the
//! rewritten reference actually resolves.

use serde_json::{Map, Value};

use crate::config::ConvertOptions;
use crate::error::ConvertError;
use crate::schema_utils::strip_whitespace;

/// Strip whitespace from every `$ref` string in the tree, in place.
///
/// # Errors
///
/// Returns [`ConvertError::RecursionDepthExceeded`] when the tree is deeper
/// than `options.max_depth`.
pub fn rewrite_refs(
    map: &mut Map<String, Value>,
    path: &str,
    depth: usize,
    options: &ConvertOptions,
) -> Result<(), ConvertError> {
    if depth > options.max_depth {
        return Err(ConvertError::RecursionDepthExceeded {
            path: path.to_string(),
            max_depth: options.max_depth,
        });
    }

    for (key, value) in map.iter_mut() {
        if key == "$ref" {
            if let Value::String(reference) = value {
                if reference.contains(char::is_whitespace) {
                    *reference = strip_whitespace(reference).into_owned();
                }
                continue;
            }
        }
        rewrite_value(value, &format!("{path}/{key}"), depth + 1, options)?;
    }
    Ok(())
}

fn rewrite_value(
    value: &mut Value,
    path: &str,
    depth: usize,
    options: &ConvertOptions,
) -> Result<(), ConvertError> {
    match value {
        Value::Object(map) => rewrite_refs(map, path, depth, options),
        Value::Array(items) => {
            for (i, item) in items.iter_mut().enumerate() {
                rewrite_value(item, &format!("{path}/{i}"), depth + 1, options)?;
            }
            Ok(())
        }
        _ => Ok(()),
    }
}

// ===========================================================================
// Tests
// ===========================================================================
