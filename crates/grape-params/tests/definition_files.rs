//! # Schema Definition Files
//!
//! Schemas loaded from YAML definitions bind exactly like schemas built in
//! code, including nested objects, arrays of objects and mode handling.

use grape_core::{Map, Value};
use grape_params::{FieldType, Params};

const ORDER_SCHEMA: &str = r#"
fields:
  - name: customer
    type: string
    validate: "required,min=2"
    required_on: [create]
    required: true
  - name: email
    type: string
    validate: "omitempty,email"
  - name: quantity
    type: integer
    validate: "gte=1,lte=100"
    required_on: [create, " update "]
  - name: total
    type: bigdecimal
  - name: shipping
    type: json
    schema:
      fields:
        - { name: city, type: string, required_on: [create] }
        - { name: zip, type: string, validate: "len=5,number" }
  - name: lines
    type: slice
    of: json
    schema:
      fields:
        - { name: sku, type: string, required_on: [create] }
        - { name: qty, type: integer }
"#;

fn order_schema() -> Params {
    serde_yaml::from_str(ORDER_SCHEMA).unwrap()
}

fn body(json: &str) -> Map {
    serde_json::from_str(json).unwrap()
}

#[test]
fn loads_all_fields_in_order() {
    let params = order_schema();
    let names: Vec<_> = params.fields().iter().map(|p| p.name.as_str()).collect();
    assert_eq!(
        names,
        vec!["customer", "email", "quantity", "total", "shipping", "lines"]
    );
    assert_eq!(
        params.field("lines").unwrap().element_type,
        Some(FieldType::Json)
    );
}

#[test]
fn binds_a_complete_order() {
    let input = order_schema()
        .bind_and_validate(
            &body(
                r#"{
                    "customer": "Ada",
                    "email": "ada@example.com",
                    "quantity": 3,
                    "total": 19.99,
                    "shipping": {"city": "Oslo", "zip": "01500"},
                    "lines": [{"sku": "A-1", "qty": 2.0}, {"sku": "B-2"}],
                    "coupon": "SPRING"
                }"#,
            ),
            "create",
        )
        .unwrap();

    assert_eq!(input.string("customer"), "Ada");
    assert_eq!(input.integer("quantity", 0), 3);
    assert_eq!(input.big_decimal("total"), "19.9900000000");
    assert_eq!(input.string("coupon"), "SPRING");
    let lines = input.json("lines").unwrap().as_array().unwrap();
    assert_eq!(lines[0].as_object().unwrap()["qty"], Value::Int(2));
}

#[test]
fn trimmed_modes_make_fields_required() {
    let err = order_schema()
        .bind_and_validate(&body(r#"{"customer": "Ada"}"#), "update")
        .unwrap_err();
    assert_eq!(err.to_string(), "missing required field 'quantity' for update");
}

#[test]
fn nested_rule_failure_is_wrapped() {
    let err = order_schema()
        .bind_and_validate(
            &body(r#"{"customer": "Ada", "quantity": 1, "shipping": {"city": "Oslo", "zip": "15"}}"#),
            "create",
        )
        .unwrap_err();
    assert_eq!(err.field(), Some("shipping"));
    assert!(err
        .to_string()
        .starts_with("field 'shipping' validation failed: field 'zip' validation failed: "));
}

#[test]
fn empty_optional_email_is_allowed() {
    assert!(order_schema()
        .bind_and_validate(
            &body(r#"{"customer": "Ada", "quantity": 1, "email": ""}"#),
            "create"
        )
        .is_ok());
}

#[test]
fn quantity_bounds_apply_to_truncated_value() {
    let err = order_schema()
        .bind_and_validate(&body(r#"{"customer": "Ada", "quantity": 0.9}"#), "create")
        .unwrap_err();
    assert_eq!(err.field(), Some("quantity"));
    assert_eq!(err.code(), "VALIDATION_FAILED");
}

#[test]
fn json_definition_matches_yaml_definition() {
    let yaml = order_schema();
    let json = serde_json::to_string(&yaml).unwrap();
    let reloaded: Params = serde_json::from_str(&json).unwrap();
    assert_eq!(reloaded, yaml);
}
