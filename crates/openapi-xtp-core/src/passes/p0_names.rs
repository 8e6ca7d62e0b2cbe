//! Pass 0: Schema Name Normalization
//!
//! Schema names in hand-written OpenAPI documents sometimes carry embedded
//! whitespace ("Company For Update"). The target dialect requires bare
//! identifiers, so every key of `components.schemas` is rewritten with all
//! whitespace stripped and the table is rebuilt under the cleaned keys.
//!
//! Two distinct original names can normalize to the same cleaned name; what
//! happens then is governed by [`CollisionPolicy`]. Pass 2 later rewrites
//! every `$ref` string the same way so references keep resolving.

use serde_json::{Map, Value};

use crate::config::{CollisionPolicy, ConvertOptions};
use crate::error::ConvertError;
use crate::schema_utils::strip_whitespace;

/// Rebuild `components.schemas` with whitespace-free keys.
///
/// A document without `components` (or without a schema table) is left
/// untouched.
///
/// # Errors
///
/// Returns [`ConvertError::Collision`] when two names normalize to the same
/// key and the policy is [`CollisionPolicy::Error`].
pub fn normalize_names(
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

    let mut cleaned = Map::new();
    for (name, schema) in std::mem::take(schemas) {
        let clean = strip_whitespace(&name).into_owned();
        if cleaned.contains_key(&clean) {
            match options.on_collision {
                CollisionPolicy::Error => return Err(ConvertError::Collision { name: clean }),
                CollisionPolicy::Overwrite => {
                    tracing::warn!(schema = %clean, "schema names collide after normalization, keeping the later definition");
                }
            }
        }
        cleaned.insert(clean, schema);
    }
    *schemas = cleaned;
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

    fn run(mut doc: Value) -> Value {
        normalize_names(doc.as_object_mut().unwrap(), &ConvertOptions::default()).unwrap();
        doc
    }

    #[test]
    fn test_names_lose_all_whitespace() {
        let doc = run(json!({
            "components": {
                "schemas": {
                    "Company For Update": { "type": "object" },
                    "Person": { "type": "object" }
                }
            }
        }));

        let schemas = doc["components"]["schemas"].as_object().unwrap();
        assert!(schemas.contains_key("CompanyForUpdate"));
        assert!(schemas.contains_key("Person"));
        assert!(schemas.keys().all(|k| !k.contains(char::is_whitespace)));
    }

    #[test]
    fn test_missing_components_is_noop() {
        let doc = run(json!({ "paths": {} }));
        assert_eq!(doc, json!({ "paths": {} }));
    }

    #[test]
    fn test_collision_overwrite_keeps_later_definition() {
        let doc = run(json!({
            "components": {
                "schemas": {
                    "Company Dto": { "type": "string" },
                    "CompanyDto": { "type": "object" }
                }
            }
        }));

        assert_eq!(
            doc["components"]["schemas"],
            json!({ "CompanyDto": { "type": "object" } })
        );
    }

    #[test]
    fn test_collision_error_policy() {
        let mut doc = json!({
            "components": {
                "schemas": {
                    "Company Dto": { "type": "string" },
                    "CompanyDto": { "type": "object" }
                }
            }
        });
        let options = ConvertOptions {
            on_collision: CollisionPolicy::Error,
            ..ConvertOptions::default()
        };

        let err = normalize_names(doc.as_object_mut().unwrap(), &options).unwrap_err();
        match err {
            ConvertError::Collision { name } => assert_eq!(name, "CompanyDto"),
            other => panic!("expected Collision, got: {:?}", other),
        }
    }
}
