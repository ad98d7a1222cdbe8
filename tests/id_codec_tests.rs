use record_portal::id::RecordId;

// The codec is the only gate between raw path input and the store: anything
// that is not a 24-digit hex token must be rejected here, before any store
// interaction.

#[test]
fn accepts_24_hex_digits() {
    let id = RecordId::parse("0123456789abcdef01234567").expect("valid token rejected");
    assert_eq!(id.as_str(), "0123456789abcdef01234567");
}

#[test]
fn normalizes_uppercase_to_lowercase() {
    let id = RecordId::parse("0123456789ABCDEF01234567").expect("valid token rejected");
    assert_eq!(id.as_str(), "0123456789abcdef01234567");
}

#[test]
fn rejects_wrong_length() {
    // One short, one long, and empty.
    assert!(RecordId::parse("0123456789abcdef0123456").is_err());
    assert!(RecordId::parse("0123456789abcdef012345678").is_err());
    assert!(RecordId::parse("").is_err());
}

#[test]
fn rejects_non_hex_characters() {
    assert!(RecordId::parse("0123456789abcdef0123456z").is_err());
    assert!(RecordId::parse("not-a-record-id-at-all!!").is_err());
    // Correct length but contains a space.
    assert!(RecordId::parse("0123456789abcdef 1234567").is_err());
}

#[test]
fn generated_ids_satisfy_the_format() {
    let id = RecordId::generate();
    assert_eq!(id.as_str().len(), 24);
    assert!(RecordId::parse(id.as_str()).is_ok());
}

#[test]
fn serializes_as_a_plain_string() {
    let id = RecordId::parse("0123456789abcdef01234567").unwrap();
    let json = serde_json::to_string(&id).unwrap();
    assert_eq!(json, r#""0123456789abcdef01234567""#);
}

#[test]
fn deserialization_validates_the_format() {
    let ok: Result<RecordId, _> = serde_json::from_str(r#""0123456789abcdef01234567""#);
    assert!(ok.is_ok());

    let bad: Result<RecordId, _> = serde_json::from_str(r#""nope""#);
    assert!(bad.is_err());
}
