//! Pass 3: Schema Simplification
//!
//! Relaxes every named schema to what the target dialect can express.
//! Object-ness is inferred from the presence of `properties`, so the
//! top-level `type` goes away; required-ness is inverted into per-property
//! `nullable` flags; and anonymous nested object shapes collapse to an
//! opaque `{type: object}` because the dialect has no way to name them.
//!
//! The loss of inner shape for anonymous objects is intentional.

use serde_json::{json, Map, Value};

use crate::config::ConvertOptions;
use crate::error::ConvertError;

/// Simplify every schema in `components.schemas`, in place.
///
/// # Errors
///
/// Returns [`ConvertError::RecursionDepthExceeded`] when a schema nests
/// deeper than `options.max_depth`.
pub fn simplify_schemas(
    root: &mut Map<String, Value>,
    options: &ConvertOptions,
) -> Result<(), ConvertError> {
    let schemas = root
        .get_mut("components")
        .and_then(|c| c.get_mut("schemas"))
        .and_then(Value::as_object_mut);
    let Some(schemas) = schemas else {
        return Ok(());
    };

    for (name, schema) in schemas.iter_mut() {
        simplify(schema, &format!("#/components/schemas/{name}"), 0, options)?;
    }
    Ok(())
}

/// Apply the dialect relaxation rules to one schema node.
///
/// Also called recursively for array `items` that carry a named reference or
/// scalar shape (anonymous object items are collapsed instead).
pub fn simplify(
    schema: &mut Value,
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

    let Some(schema) = schema.as_object_mut() else {
        return Ok(());
    };

    // The dialect infers object-ness from `properties`.
    schema.remove("type");

    // Capture before mutating properties; nullability depends on it.
    let required: Vec<String> = schema
        .get("required")
        .and_then(Value::as_array)
        .map(|names| {
            names
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();

    if let Some(properties) = schema.get_mut("properties").and_then(Value::as_object_mut) {
        for (name, property) in properties.iter_mut() {
            let Some(prop) = property.as_object_mut() else {
                continue;
            };

            if !prop.contains_key("type") && !prop.contains_key("$ref") {
                prop.insert("type".to_string(), Value::String("string".to_string()));
            }
            if prop.get("format").and_then(Value::as_str) == Some("uuid") {
                prop.remove("format");
            }
            prop.remove("enum");
            if !required.iter().any(|r| r == name) {
                prop.insert("nullable".to_string(), Value::Bool(true));
            }

            let ty = prop.get("type").and_then(Value::as_str).map(str::to_string);

            // Anonymous embedded objects flatten to an opaque object type.
            if ty.as_deref() == Some("object") && !prop.contains_key("$ref") {
                prop.clear();
                prop.insert("type".to_string(), Value::String("object".to_string()));
                continue;
            }

            if ty.as_deref() == Some("array") {
                if let Some(items) = prop.get_mut("items") {
                    let anonymous = items.get("type").and_then(Value::as_str) == Some("object")
                        && items.get("$ref").is_none();
                    if anonymous {
                        *items = json!({ "type": "object" });
                    } else {
                        simplify(
                            items,
                            &format!("{path}/properties/{name}/items"),
                            depth + 1,
                            options,
                        )?;
                    }
                }
            }
        }
    }

    // Fully consumed by the nullability rule above.
    schema.remove("required");
    Ok(())
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn run(mut schema: Value) -> Value {
        simplify(&mut schema, "#", 0, &ConvertOptions::default()).unwrap();
        schema
    }

    #[test]
    fn test_top_level_type_and_required_are_dropped() {
        let output = run(json!({
            "type": "object",
            "properties": { "name": { "type": "string" } },
            "required": ["name"]
        }));

        assert!(output.get("type").is_none());
        assert!(output.get("required").is_none());
    }

    #[test]
    fn test_untyped_property_defaults_to_string() {
        let output = run(json!({
            "properties": { "note": { "description": "free text" } }
        }));

        assert_eq!(output["properties"]["note"]["type"], json!("string"));
    }

    #[test]
    fn test_ref_property_gets_no_default_type() {
        let output = run(json!({
            "properties": { "company": { "$ref": "#/components/schemas/Company" } }
        }));

        let company = &output["properties"]["company"];
        assert!(company.get("type").is_none());
        assert_eq!(company["$ref"], json!("#/components/schemas/Company"));
        // Not required, so still marked nullable.
        assert_eq!(company["nullable"], json!(true));
    }

    #[test]
    fn test_uuid_format_dropped_others_kept() {
        let output = run(json!({
            "properties": {
                "id": { "type": "string", "format": "uuid" },
                "createdAt": { "type": "string", "format": "date-time" }
            }
        }));

        assert!(output["properties"]["id"].get("format").is_none());
        assert_eq!(
            output["properties"]["createdAt"]["format"],
            json!("date-time")
        );
    }

    #[test]
    fn test_enum_is_dropped_unconditionally() {
        let output = run(json!({
            "properties": {
                "status": { "type": "string", "enum": ["open", "closed"] }
            }
        }));

        assert!(output["properties"]["status"].get("enum").is_none());
    }

    #[test]
    fn test_nullable_iff_not_required() {
        let output = run(json!({
            "type": "object",
            "properties": {
                "name": { "type": "string" },
                "nickname": { "type": "string" }
            },
            "required": ["name"]
        }));

        assert!(output["properties"]["name"].get("nullable").is_none());
        assert_eq!(output["properties"]["nickname"]["nullable"], json!(true));
    }

    #[test]
    fn test_anonymous_object_property_collapses() {
        let output = run(json!({
            "properties": {
                "address": {
                    "type": "object",
                    "properties": { "street": { "type": "string" } },
                    "description": "lost along with the shape"
                }
            }
        }));

        assert_eq!(
            output["properties"]["address"],
            json!({ "type": "object" })
        );
    }

    #[test]
    fn test_array_with_anonymous_object_items_collapses() {
        let output = run(json!({
            "properties": {
                "tags": {
                    "type": "array",
                    "items": {
                        "type": "object",
                        "properties": { "label": { "type": "string" } }
                    }
                }
            }
        }));

        assert_eq!(
            output["properties"]["tags"]["items"],
            json!({ "type": "object" })
        );
    }

    #[test]
    fn test_array_with_ref_items_is_kept_and_simplified() {
        let output = run(json!({
            "properties": {
                "companies": {
                    "type": "array",
                    "items": { "$ref": "#/components/schemas/Company" }
                }
            }
        }));

        assert_eq!(
            output["properties"]["companies"]["items"],
            json!({ "$ref": "#/components/schemas/Company" })
        );
    }

    #[test]
    fn test_array_scalar_items_lose_their_type() {
        // Items recursion applies the same top-level rules, including the
        // `type` drop.
        let output = run(json!({
            "properties": {
                "names": {
                    "type": "array",
                    "items": { "type": "string" }
                }
            }
        }));

        assert_eq!(output["properties"]["names"]["items"], json!({}));
    }

    #[test]
    fn test_simplify_schemas_walks_whole_table() {
        let mut doc = json!({
            "components": {
                "schemas": {
                    "A": { "type": "object", "properties": { "x": {} } },
                    "B": { "type": "string" }
                }
            }
        });
        simplify_schemas(doc.as_object_mut().unwrap(), &ConvertOptions::default()).unwrap();

        assert_eq!(
            doc["components"]["schemas"]["A"],
            json!({ "properties": { "x": { "type": "string", "nullable": true } } })
        );
        assert_eq!(doc["components"]["schemas"]["B"], json!({}));
    }

    #[test]
    fn test_depth_guard() {
        let mut schema = json!({
            "properties": {
                "a": {
                    "type": "array",
                    "items": {
                        "properties": {
                            "b": { "type": "array", "items": { "properties": {} } }
                        }
                    }
                }
            }
        });
        let options = ConvertOptions {
            max_depth: 1,
            ..ConvertOptions::default()
        };

        let err = simplify(&mut schema, "#", 0, &options).unwrap_err();
        match err {
            ConvertError::RecursionDepthExceeded { max_depth, .. } => assert_eq!(max_depth, 1),
            other => panic!("expected RecursionDepthExceeded, got: {:?}", other),
        }
    }
}
