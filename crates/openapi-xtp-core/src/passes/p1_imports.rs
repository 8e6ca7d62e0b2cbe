//! Pass 1: Operation Selection & Schema Synthesis
//!
//! Walks every `(path, method, operation)` triple under `paths`, keeps the
//! operations whose `operationId` matches the configured filter, and
//! synthesizes for each one:
//!
//! - an Input schema (`<OperationId>Input`) built from path template
//!   parameters, query parameters, and the JSON request body;
//! - an Output schema (`<OperationId>Output`) built from the first 2xx
//!   response;
//! - an import entry wiring both together by `$ref`.
//!
//! Operations without an `operationId` are skipped. The pass only reads the
//! document; the assembler merges its result back in.

use regex::Regex;
use serde_json::{json, Map, Value};

use crate::config::{CollisionPolicy, ConvertOptions};
use crate::error::ConvertError;
use crate::schema_utils::{capitalize_first, strip_whitespace};

const JSON_CONTENT_TYPE: &str = "application/json";

/// Result of running the import synthesis pass.
#[derive(Debug)]
pub struct ImportsPassResult {
    /// The `imports` mapping, keyed by cleaned `operationId`, in document
    /// order.
    pub imports: Map<String, Value>,
    /// Schemas synthesized for the imports, to be merged into
    /// `components.schemas`.
    pub schemas: Map<String, Value>,
}

/// Scan `paths` and synthesize imports plus their Input/Output schemas.
///
/// # Errors
///
/// Returns [`ConvertError::Resolution`] when a query parameter references a
/// name absent from `components.parameters`, and [`ConvertError::Collision`]
/// when two operations synthesize the same schema name under
/// [`CollisionPolicy::Error`].
pub fn synthesize(
    root: &Map<String, Value>,
    include: &Regex,
    options: &ConvertOptions,
) -> Result<ImportsPassResult, ConvertError> {
    let mut imports = Map::new();
    let mut schemas = Map::new();

    let global_params = root
        .get("components")
        .and_then(|c| c.get("parameters"))
        .and_then(Value::as_object);

    let Some(paths) = root.get("paths").and_then(Value::as_object) else {
        return Ok(ImportsPassResult { imports, schemas });
    };

    // `{param}` placeholders in path templates
    let template_param = Regex::new(r"\{([^}]+)\}")?;

    for (path, methods) in paths {
        let Some(methods) = methods.as_object() else {
            continue;
        };
        for (method, details) in methods {
            // Path-level `parameters` entries land here too; they are
            // sequences and fall out with the non-operation shapes.
            let Some(details) = details.as_object() else {
                continue;
            };
            let Some(raw_id) = details.get("operationId").and_then(Value::as_str) else {
                tracing::debug!(path = %path, method = %method, "skipping operation without operationId");
                continue;
            };
            if !include.is_match(raw_id) {
                continue;
            }

            let operation_id = strip_whitespace(raw_id).into_owned();
            let input_name = format!("{}Input", capitalize_first(&operation_id));
            let output_name = format!("{}Output", capitalize_first(&operation_id));

            let input = input_schema(path, details, global_params, &template_param)?;
            let output = output_schema(details.get("responses").and_then(Value::as_object), &operation_id);
            insert_schema(&mut schemas, input_name.clone(), input, options)?;
            insert_schema(&mut schemas, output_name.clone(), output, options)?;

            imports.insert(
                operation_id,
                import_entry(details, &input_name, &output_name),
            );
        }
    }

    Ok(ImportsPassResult { imports, schemas })
}

fn insert_schema(
    schemas: &mut Map<String, Value>,
    name: String,
    schema: Value,
    options: &ConvertOptions,
) -> Result<(), ConvertError> {
    if schemas.contains_key(&name) {
        match options.on_collision {
            CollisionPolicy::Error => return Err(ConvertError::Collision { name }),
            CollisionPolicy::Overwrite => {
                tracing::warn!(schema = %name, "two operations synthesize the same schema name, keeping the later one");
            }
        }
    }
    schemas.insert(name, schema);
    Ok(())
}

// ---------------------------------------------------------------------------
// Input synthesis
// ---------------------------------------------------------------------------

/// Build the Input schema for one operation.
///
/// Property insertion order is significant and fixed: path parameters, then
/// query parameters, then the request body.
fn input_schema(
    path: &str,
    details: &Map<String, Value>,
    global_params: Option<&Map<String, Value>>,
    template_param: &Regex,
) -> Result<Value, ConvertError> {
    let mut properties = Map::new();
    let mut required = Vec::new();

    // Path template parameters are always required strings.
    for capture in template_param.captures_iter(path) {
        if let Some(name) = capture.get(1) {
            properties.insert(name.as_str().to_string(), json!({ "type": "string" }));
            required.push(Value::String(name.as_str().to_string()));
        }
    }

    // Query parameters, resolving `$ref` against the global parameter table.
    if let Some(params) = details.get("parameters").and_then(Value::as_array) {
        for param in params {
            let Some(param) = param.as_object() else {
                continue;
            };
            let param = match param.get("$ref").and_then(Value::as_str) {
                Some(reference) => resolve_parameter(reference, global_params)?,
                None => param,
            };
            if param.get("in").and_then(Value::as_str) != Some("query") {
                continue;
            }
            let Some(name) = param.get("name").and_then(Value::as_str) else {
                continue;
            };
            let ty = param
                .get("schema")
                .and_then(|s| s.get("type"))
                .and_then(Value::as_str)
                .unwrap_or("string");
            properties.insert(name.to_string(), json!({ "type": ty }));
            if param.get("required").and_then(Value::as_bool) == Some(true) {
                required.push(Value::String(name.to_string()));
            }
        }
    }

    // JSON request body becomes a `body` property.
    if let Some(body) = details.get("requestBody") {
        let schema = body
            .get("content")
            .and_then(|c| c.get(JSON_CONTENT_TYPE))
            .and_then(|c| c.get("schema"));
        if let Some(schema) = schema {
            let body_property = match schema.get("$ref") {
                Some(reference) => json!({ "$ref": reference }),
                None => schema.clone(),
            };
            properties.insert("body".to_string(), body_property);
            if body.get("required").and_then(Value::as_bool) == Some(true) {
                required.push(Value::String("body".to_string()));
            }
        }
    }

    Ok(json!({
        "type": "object",
        "properties": properties,
        "required": required
    }))
}

fn resolve_parameter<'a>(
    reference: &str,
    global_params: Option<&'a Map<String, Value>>,
) -> Result<&'a Map<String, Value>, ConvertError> {
    let name = reference.rsplit('/').next().unwrap_or(reference);
    global_params
        .and_then(|params| params.get(name))
        .and_then(Value::as_object)
        .ok_or_else(|| ConvertError::Resolution {
            parameter: name.to_string(),
        })
}

// ---------------------------------------------------------------------------
// Output synthesis
// ---------------------------------------------------------------------------

/// Build the Output schema for one operation from its first 2xx response.
///
/// No 2xx response means the operation produces nothing typed: the Output
/// schema is the empty mapping, and the import entry still references it.
fn output_schema(responses: Option<&Map<String, Value>>, operation_id: &str) -> Value {
    let first_2xx = responses.and_then(|responses| {
        responses.iter().find(|(code, _)| {
            code.trim()
                .parse::<u16>()
                .is_ok_and(|code| (200..300).contains(&code))
        })
    });
    let Some((_, response)) = first_2xx else {
        return json!({});
    };

    let schema = response
        .get("content")
        .and_then(|c| c.get(JSON_CONTENT_TYPE))
        .and_then(|c| c.get("schema"))
        .cloned()
        .unwrap_or_else(|| json!({}));

    let payload = if let Some(reference) = schema.get("$ref") {
        json!({ "$ref": reference })
    } else if let Some(data) = schema.get("properties").and_then(|p| p.get("data")) {
        // One level of single-property `data` envelope unwrapping, nothing
        // deeper.
        match data.get("properties").and_then(Value::as_object) {
            Some(inner) if inner.len() == 1 => inner
                .values()
                .next()
                .cloned()
                .unwrap_or_else(|| data.clone()),
            _ => data.clone(),
        }
    } else {
        schema
    };

    json!({
        "description": format!("Output type for {operation_id}"),
        "properties": {
            "statusCode": {
                "type": "integer",
                "description": "HTTP Status code"
            },
            "payload": payload
        }
    })
}

// ---------------------------------------------------------------------------
// Import entries
// ---------------------------------------------------------------------------

fn import_entry(details: &Map<String, Value>, input_name: &str, output_name: &str) -> Value {
    let description = details
        .get("description")
        .and_then(Value::as_str)
        .unwrap_or("");
    json!({
        "description": description,
        "input": {
            "contentType": JSON_CONTENT_TYPE,
            "$ref": format!("#/components/schemas/{input_name}")
        },
        "output": {
            "contentType": JSON_CONTENT_TYPE,
            "$ref": format!("#/components/schemas/{output_name}")
        }
    })
}

// ===========================================================================
// Tests
// ===========================================================================
