use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

/// The primitive shapes a record field may take on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Non-empty JSON string.
    Text,
    /// JSON number (integer or float).
    Number,
}

/// A single declared field of a resource type.
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
}

/// ResourceSchema
///
/// The statically declared field set of one resource type. Both resource
/// collections share the same controller; only the schema differs. Field
/// order matters: create validation reports the first violation in declared
/// order, deterministically.
#[derive(Debug)]
pub struct ResourceSchema {
    /// Singular resource label, used in error messages ("user not found").
    pub resource: &'static str,
    pub fields: &'static [FieldSpec],
}

pub static USER_SCHEMA: ResourceSchema = ResourceSchema {
    resource: "user",
    fields: &[
        FieldSpec { name: "name", kind: FieldKind::Text },
        FieldSpec { name: "email", kind: FieldKind::Text },
        FieldSpec { name: "age", kind: FieldKind::Number },
    ],
};

pub static PRODUCT_SCHEMA: ResourceSchema = ResourceSchema {
    resource: "product",
    fields: &[
        FieldSpec { name: "name", kind: FieldKind::Text },
        FieldSpec { name: "price", kind: FieldKind::Number },
        FieldSpec { name: "image", kind: FieldKind::Text },
    ],
};

/// A validated scalar field value.
///
/// Numbers stay as `serde_json::Number` end to end so integer inputs are
/// echoed back without a float rewrite.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    Number(serde_json::Number),
}

/// The validated field set of a record, keyed by field name. Partial
/// documents exist only between update validation and the store's merge.
pub type Document = BTreeMap<String, FieldValue>;

/// ValidationError
///
/// Carries a human-readable message naming the offending field. Always maps
/// to a 400 at the HTTP boundary and is raised before any store interaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    message: String,
}

impl ValidationError {
    fn missing(field: &str) -> Self {
        Self { message: format!("{field} is required") }
    }

    fn wrong_shape(field: &str, kind: FieldKind) -> Self {
        let message = match kind {
            FieldKind::Text => format!("{field} must be a non-empty string"),
            FieldKind::Number => format!("{field} must be a number"),
        };
        Self { message }
    }

    fn not_an_object() -> Self {
        Self { message: "request body must be a JSON object".to_string() }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for ValidationError {}

/// Checks one supplied value against its declared shape.
fn coerce(spec: &FieldSpec, value: &Value) -> Result<FieldValue, ValidationError> {
    match (spec.kind, value) {
        (FieldKind::Text, Value::String(s)) if !s.trim().is_empty() => {
            Ok(FieldValue::Text(s.clone()))
        }
        (FieldKind::Number, Value::Number(n)) => Ok(FieldValue::Number(n.clone())),
        _ => Err(ValidationError::wrong_shape(spec.name, spec.kind)),
    }
}

/// validate_create
///
/// Every declared field must be present and well-shaped. Fails fast on the
/// first violation in declared field order. Fields not named by the schema
/// are dropped, never forwarded to storage.
pub fn validate_create(schema: &ResourceSchema, payload: &Value) -> Result<Document, ValidationError> {
    let body = payload.as_object().ok_or_else(ValidationError::not_an_object)?;
    let mut doc = Document::new();
    for spec in schema.fields {
        let value = body
            .get(spec.name)
            .ok_or_else(|| ValidationError::missing(spec.name))?;
        doc.insert(spec.name.to_string(), coerce(spec, value)?);
    }
    Ok(doc)
}

/// validate_update
///
/// Partial updates: no field is required, but any declared field that is
/// present must satisfy the create-time shape rule (a JSON null counts as a
/// shape violation, not an omission). Unknown fields are dropped, which keeps
/// arbitrary attribute injection out of the store. An empty result is valid.
pub fn validate_update(schema: &ResourceSchema, payload: &Value) -> Result<Document, ValidationError> {
    let body = payload.as_object().ok_or_else(ValidationError::not_an_object)?;
    let mut doc = Document::new();
    for spec in schema.fields {
        if let Some(value) = body.get(spec.name) {
            doc.insert(spec.name.to_string(), coerce(spec, value)?);
        }
    }
    Ok(doc)
}
