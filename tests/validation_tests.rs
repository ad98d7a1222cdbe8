use record_portal::schema::{
    Document, FieldValue, PRODUCT_SCHEMA, USER_SCHEMA, validate_create, validate_update,
};
use serde_json::json;

fn text(s: &str) -> FieldValue {
    FieldValue::Text(s.to_string())
}

fn number(n: i64) -> FieldValue {
    FieldValue::Number(n.into())
}

// --- Create validation ---

#[test]
fn create_accepts_a_complete_payload() {
    let payload = json!({"name": "Ann", "email": "ann@x.com", "age": 30});
    let doc = validate_create(&USER_SCHEMA, &payload).expect("valid payload rejected");

    let expected: Document = [
        ("name".to_string(), text("Ann")),
        ("email".to_string(), text("ann@x.com")),
        ("age".to_string(), number(30)),
    ]
    .into_iter()
    .collect();
    assert_eq!(doc, expected);
}

#[test]
fn create_names_the_missing_field() {
    let payload = json!({"name": "Ann", "age": 30});
    let err = validate_create(&USER_SCHEMA, &payload).unwrap_err();
    assert_eq!(err.message(), "email is required");
}

#[test]
fn create_reports_the_first_violation_in_declared_order() {
    // Both name and email are missing; name is declared first.
    let payload = json!({"age": 30});
    let err = validate_create(&USER_SCHEMA, &payload).unwrap_err();
    assert_eq!(err.message(), "name is required");
}

#[test]
fn create_rejects_wrong_shapes() {
    let payload = json!({"name": "Ann", "email": "ann@x.com", "age": "thirty"});
    let err = validate_create(&USER_SCHEMA, &payload).unwrap_err();
    assert_eq!(err.message(), "age must be a number");

    let payload = json!({"name": "", "email": "ann@x.com", "age": 30});
    let err = validate_create(&USER_SCHEMA, &payload).unwrap_err();
    assert_eq!(err.message(), "name must be a non-empty string");

    // Whitespace-only text is as empty as empty.
    let payload = json!({"name": "   ", "email": "ann@x.com", "age": 30});
    assert!(validate_create(&USER_SCHEMA, &payload).is_err());
}

#[test]
fn create_drops_undeclared_fields() {
    let payload = json!({"name": "Ann", "email": "ann@x.com", "age": 30, "role": "admin"});
    let doc = validate_create(&USER_SCHEMA, &payload).expect("valid payload rejected");
    assert!(!doc.contains_key("role"));
    assert_eq!(doc.len(), 3);
}

#[test]
fn create_rejects_non_object_bodies() {
    let err = validate_create(&USER_SCHEMA, &json!(["Ann"])).unwrap_err();
    assert_eq!(err.message(), "request body must be a JSON object");
    assert!(validate_create(&USER_SCHEMA, &json!("Ann")).is_err());
}

#[test]
fn product_schema_validates_its_own_field_set() {
    let payload = json!({"name": "Mug", "price": 9});
    let err = validate_create(&PRODUCT_SCHEMA, &payload).unwrap_err();
    assert_eq!(err.message(), "image is required");

    let payload = json!({"name": "Mug", "price": 9, "image": "mug.jpg"});
    assert!(validate_create(&PRODUCT_SCHEMA, &payload).is_ok());
}

// --- Update validation ---

#[test]
fn update_allows_partial_and_empty_payloads() {
    let doc = validate_update(&USER_SCHEMA, &json!({"age": 31})).expect("partial rejected");
    assert_eq!(doc.len(), 1);
    assert_eq!(doc.get("age"), Some(&number(31)));

    let doc = validate_update(&USER_SCHEMA, &json!({})).expect("empty patch rejected");
    assert!(doc.is_empty());
}

#[test]
fn update_still_enforces_shapes_on_present_fields() {
    let err = validate_update(&USER_SCHEMA, &json!({"age": "old"})).unwrap_err();
    assert_eq!(err.message(), "age must be a number");

    // Null is a shape violation, not an omission.
    let err = validate_update(&USER_SCHEMA, &json!({"email": null})).unwrap_err();
    assert_eq!(err.message(), "email must be a non-empty string");
}

#[test]
fn update_drops_undeclared_fields() {
    let payload = json!({"age": 31, "is_admin": true});
    let doc = validate_update(&USER_SCHEMA, &payload).expect("valid patch rejected");
    assert!(!doc.contains_key("is_admin"));
    assert_eq!(doc.len(), 1);
}

#[test]
fn field_values_keep_integer_wire_shape() {
    // 30 must round-trip as 30, not 30.0.
    let doc = validate_update(&USER_SCHEMA, &json!({"age": 30})).unwrap();
    let json = serde_json::to_string(&doc).unwrap();
    assert_eq!(json, r#"{"age":30}"#);
}
