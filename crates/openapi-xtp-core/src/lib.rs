//! Convert an OpenAPI 3.x service description into an XTP Schema — the
//! plugin-interface description format used to define host/plugin function
//! signatures.
//!
//! The transform is a single linear pipeline over a generic document tree:
//! schema names are normalized, one import (with an Input and an Output
//! schema) is synthesized per selected operation, every `$ref` is rewritten
//! to the normalized names, and each schema is relaxed to what the target
//! dialect can express. The output is a derived, lossy artifact — there is
//! no round trip back to OpenAPI.
//!
//! ## Usage
//!
//! ```rust
//! use openapi_xtp_core::{convert, ConvertOptions};
//! use serde_json::json;
//!
//! let doc = json!({
//!     "openapi": "3.0.0",
//!     "paths": {
//!         "/companies/{id}": {
//!             "get": {
//!                 "operationId": "findCompany",
//!                 "responses": { "200": {} }
//!             }
//!         }
//!     }
//! });
//!
//! let result = convert(&doc, &ConvertOptions::default()).unwrap();
//! assert_eq!(result.document["version"], "v1-draft");
//! assert!(result.document["imports"]["findCompany"].is_object());
//! ```

pub mod config;
pub mod document;
pub mod error;
pub mod passes;
pub mod schema_utils;

pub use config::{CollisionPolicy, ConvertOptions};
pub use document::{emit_document, load_document};
pub use error::ConvertError;

use regex::Regex;
use serde_json::Value;

/// Result of a successful conversion.
#[derive(Debug)]
pub struct ConvertResult {
    /// The finished XTP Schema document tree.
    pub document: Value,
    /// Cleaned `operationId`s that became imports, in document order.
    pub imported: Vec<String>,
}

/// Run the full OpenAPI → XTP transform on a parsed document tree.
///
/// The input is not modified; the returned [`ConvertResult`] owns the
/// transformed tree. Stage order matters and is fixed: metadata strip,
/// version stamp, name normalization, import synthesis, schema merge,
/// reference rewrite, `paths` removal, schema simplification.
///
/// # Errors
///
/// Fails on an invalid `include` pattern, a non-mapping root, an
/// unresolvable query-parameter reference, a schema-name collision under
/// [`CollisionPolicy::Error`], or a tree deeper than
/// `options.max_depth`.
pub fn convert(doc: &Value, options: &ConvertOptions) -> Result<ConvertResult, ConvertError> {
    let include = Regex::new(&options.include)?;

    let mut document = doc.clone();
    let root = document.as_object_mut().ok_or(ConvertError::NotAMapping)?;

    document::strip_metadata(root);
    root.insert(
        "version".to_string(),
        Value::String(options.version.clone()),
    );

    passes::p0_names::normalize_names(root, options)?;

    let synthesized = passes::p1_imports::synthesize(root, &include, options)?;
    let imported: Vec<String> = synthesized.imports.keys().cloned().collect();

    document::merge_schemas(root, synthesized.schemas, options)?;
    document::strip_component_sections(root);
    root.insert("imports".to_string(), Value::Object(synthesized.imports));

    passes::p2_refs::rewrite_refs(root, "#", 0, options)?;

    root.remove("paths");

    passes::p3_simplify::simplify_schemas(root, options)?;

    tracing::debug!(imports = imported.len(), "conversion complete");
    Ok(ConvertResult { document, imported })
}
