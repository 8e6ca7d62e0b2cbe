//! Document loading, assembly, and emission.
//!
//! The working representation is a `serde_json::Value` tree (with
//! insertion-order-preserving maps), regardless of whether the source text
//! was YAML or JSON. YAML mappings may carry non-string scalar keys
//! (unquoted status codes like `200:` parse as integers); those are
//! stringified on the way in so the rest of the pipeline only ever sees
//! string-keyed mappings.

use serde_json::{Map, Value};

use crate::config::{CollisionPolicy, ConvertOptions};
use crate::error::ConvertError;

/// OpenAPI metadata keys dropped from the document root before any other
/// stage runs. The target dialect has no use for them.
const DROPPED_ROOT_KEYS: &[&str] = &[
    "info",
    "openapi",
    "servers",
    "tags",
    "webhooks",
    "externalDocs",
    "security",
];

/// `components` sections that are consumed during conversion and must not
/// survive into the emitted document.
const OBSOLETE_COMPONENT_SECTIONS: &[&str] = &["parameters", "securitySchemes", "responses"];

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

/// Parse an OpenAPI document (YAML, or JSON as its subset) into a generic
/// tree.
///
/// # Errors
///
/// Returns [`ConvertError::Yaml`] on malformed input, [`ConvertError::NotAMapping`]
/// if the root is not a mapping, and [`ConvertError::UnsupportedKey`] if a
/// mapping key is itself a sequence or mapping.
pub fn load_document(text: &str) -> Result<Value, ConvertError> {
    let raw: serde_yaml::Value = serde_yaml::from_str(text)?;
    let doc = yaml_to_json(raw)?;
    if !doc.is_object() {
        return Err(ConvertError::NotAMapping);
    }
    Ok(doc)
}

/// Serialize the transformed tree back to YAML text.
///
/// # Errors
///
/// Returns [`ConvertError::Yaml`] if serialization fails.
pub fn emit_document(doc: &Value) -> Result<String, ConvertError> {
    Ok(serde_yaml::to_string(doc)?)
}

fn yaml_to_json(value: serde_yaml::Value) -> Result<Value, ConvertError> {
    Ok(match value {
        serde_yaml::Value::Null => Value::Null,
        serde_yaml::Value::Bool(b) => Value::Bool(b),
        serde_yaml::Value::Number(n) => yaml_number(&n),
        serde_yaml::Value::String(s) => Value::String(s),
        serde_yaml::Value::Sequence(seq) => {
            let mut items = Vec::with_capacity(seq.len());
            for item in seq {
                items.push(yaml_to_json(item)?);
            }
            Value::Array(items)
        }
        serde_yaml::Value::Mapping(mapping) => {
            let mut map = Map::new();
            for (key, val) in mapping {
                map.insert(yaml_key(key)?, yaml_to_json(val)?);
            }
            Value::Object(map)
        }
        serde_yaml::Value::Tagged(tagged) => yaml_to_json(tagged.value)?,
    })
}

fn yaml_number(n: &serde_yaml::Number) -> Value {
    if let Some(i) = n.as_i64() {
        Value::from(i)
    } else if let Some(u) = n.as_u64() {
        Value::from(u)
    } else {
        // .nan / .inf have no JSON representation
        n.as_f64().and_then(serde_json::Number::from_f64).map_or(Value::Null, Value::Number)
    }
}

fn yaml_key(key: serde_yaml::Value) -> Result<String, ConvertError> {
    match key {
        serde_yaml::Value::String(s) => Ok(s),
        serde_yaml::Value::Number(n) => Ok(n.to_string()),
        serde_yaml::Value::Bool(b) => Ok(b.to_string()),
        serde_yaml::Value::Null => Ok("null".to_string()),
        _ => Err(ConvertError::UnsupportedKey),
    }
}

// ---------------------------------------------------------------------------
// Assembly
// ---------------------------------------------------------------------------

/// Drop the OpenAPI metadata keys from the document root.
pub fn strip_metadata(root: &mut Map<String, Value>) {
    for key in DROPPED_ROOT_KEYS {
        root.remove(*key);
    }
}

/// Merge synthesized schemas into `components.schemas`, creating the table
/// if the source document had none.
///
/// # Errors
///
/// Returns [`ConvertError::Collision`] when a synthesized name shadows an
/// existing schema and the policy is [`CollisionPolicy::Error`].
pub fn merge_schemas(
    root: &mut Map<String, Value>,
    new_schemas: Map<String, Value>,
    options: &ConvertOptions,
) -> Result<(), ConvertError> {
    let components = root
        .entry("components")
        .or_insert_with(|| Value::Object(Map::new()));
    if !components.is_object() {
        *components = Value::Object(Map::new());
    }
    let Some(components) = components.as_object_mut() else {
        return Ok(());
    };
    let schemas = components
        .entry("schemas")
        .or_insert_with(|| Value::Object(Map::new()));
    if !schemas.is_object() {
        *schemas = Value::Object(Map::new());
    }
    let Some(schemas) = schemas.as_object_mut() else {
        return Ok(());
    };

    for (name, schema) in new_schemas {
        if schemas.contains_key(&name) {
            match options.on_collision {
                CollisionPolicy::Error => return Err(ConvertError::Collision { name }),
                CollisionPolicy::Overwrite => {
                    tracing::warn!(schema = %name, "synthesized schema overwrites an existing definition");
                }
            }
        }
        schemas.insert(name, schema);
    }
    Ok(())
}

/// Remove the `components` sections that were consumed during conversion,
/// leaving `schemas` (possibly empty).
pub fn strip_component_sections(root: &mut Map<String, Value>) {
    if let Some(components) = root.get_mut("components").and_then(Value::as_object_mut) {
        for key in OBSOLETE_COMPONENT_SECTIONS {
            components.remove(*key);
        }
    }
}

// ===========================================================================
// Tests
// ===========================================================================
