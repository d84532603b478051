use contacts_core::{Contact, NO_NUMBER_PHONE};
use uuid::Uuid;

#[test]
fn contact_serialization_uses_expected_wire_fields() {
    let id = Uuid::parse_str("11111111-2222-4333-8444-555555555555").unwrap();
    let contact = Contact::with_id(id, "Anna", Some("123456789")).unwrap();

    let json = serde_json::to_value(&contact).unwrap();
    assert_eq!(json["id"], id.to_string());
    assert_eq!(json["name"], "Anna");
    assert_eq!(json["phone"], "123456789");

    let decoded: Contact = serde_json::from_value(json).unwrap();
    assert_eq!(decoded, contact);
}

#[test]
fn deserialize_rejects_blank_name() {
    let value = serde_json::json!({
        "id": "11111111-2222-4333-8444-555555555555",
        "name": "   ",
        "phone": NO_NUMBER_PHONE,
    });

    let err = serde_json::from_value::<Contact>(value).unwrap_err();
    assert!(
        err.to_string().contains("contact name must not be blank"),
        "unexpected error: {err}"
    );
}

#[test]
fn deserialize_rejects_nil_id() {
    let value = serde_json::json!({
        "id": Uuid::nil().to_string(),
        "name": "Anna",
        "phone": "123",
    });

    assert!(serde_json::from_value::<Contact>(value).is_err());
}
