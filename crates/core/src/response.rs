//! Decoding of EAN-Search API response bodies.
//!
//! The API uses four JSON shapes depending on the operation: an array of
//! records carrying a single scalar field, an array of full records, an array
//! carrying a `"valid"` boolean, and an object with a `"productlist"` array.
//! Records are loosely typed (the field set varies by operation), so they are
//! kept as string-keyed JSON maps rather than fixed structs.
//!
//! The API signals errors in-band with an `"error"` key in the first record;
//! that maps to `None` here. Invalid JSON or a body of the wrong overall
//! shape is a [`LookupError::Decode`].

use serde_json::Value;

use crate::error::LookupError;

/// A single product record: string keys, loosely-typed values.
pub type Record = serde_json::Map<String, Value>;

/// First record of an array response. Empty array or in-band error = `None`.
pub fn first_record(body: &str) -> Result<Option<Record>, LookupError> {
    let records: Vec<Record> =
        serde_json::from_str(body).map_err(|e| LookupError::Decode(e.to_string()))?;
    let Some(first) = records.into_iter().next() else {
        return Ok(None);
    };
    if first.contains_key("error") {
        return Ok(None);
    }
    Ok(Some(first))
}

/// A single string field from the first record of an array response.
/// Missing field = `None`, consistent with the in-band error convention.
pub fn scalar_field(body: &str, field: &str) -> Result<Option<String>, LookupError> {
    Ok(first_record(body)?.and_then(|r| match r.get(field) {
        Some(Value::String(s)) => Some(s.clone()),
        Some(Value::Null) | None => None,
        Some(other) => Some(other.to_string()),
    }))
}

/// A boolean field from the first record. The API serializes booleans as the
/// strings `"true"` / `"false"`, but plain JSON booleans are accepted too.
pub fn bool_field(body: &str, field: &str) -> Result<Option<bool>, LookupError> {
    let Some(record) = first_record(body)? else {
        return Ok(None);
    };
    match record.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Bool(b)) => Ok(Some(*b)),
        Some(Value::String(s)) if s.eq_ignore_ascii_case("true") => Ok(Some(true)),
        Some(Value::String(s)) if s.eq_ignore_ascii_case("false") => Ok(Some(false)),
        Some(other) => Err(LookupError::Decode(format!(
            "field '{}' is not a boolean: {}",
            field, other
        ))),
    }
}

/// The `"productlist"` array of an object response, in API order.
/// A well-formed object without the field decodes as an empty list.
pub fn product_list(body: &str) -> Result<Vec<Record>, LookupError> {
    let value: Value =
        serde_json::from_str(body).map_err(|e| LookupError::Decode(e.to_string()))?;
    let Value::Object(mut object) = value else {
        return Err(LookupError::Decode("expected a JSON object".to_string()));
    };
    match object.remove("productlist") {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Array(items)) => items
            .into_iter()
            .map(|item| match item {
                Value::Object(record) => Ok(record),
                other => Err(LookupError::Decode(format!(
                    "productlist entry is not an object: {}",
                    other
                ))),
            })
            .collect(),
        Some(other) => Err(LookupError::Decode(format!(
            "productlist is not an array: {}",
            other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn scalar_field_extracts_name() {
        let out = scalar_field(r#"[{"ean":"5099750442227","name":"Widget"}]"#, "name").unwrap();
        assert_eq!(out, Some("Widget".to_string()));
    }

    #[test]
    fn scalar_field_error_record_is_none() {
        let out = scalar_field(r#"[{"error":"Invalid EAN code"}]"#, "name").unwrap();
        assert_eq!(out, None);
    }

    #[test]
    fn scalar_field_missing_field_is_none() {
        let out = scalar_field(r#"[{"ean":"5099750442227"}]"#, "name").unwrap();
        assert_eq!(out, None);
    }

    #[test]
    fn scalar_field_empty_array_is_none() {
        assert_eq!(scalar_field("[]", "name").unwrap(), None);
    }

    #[test]
    fn scalar_field_invalid_json_is_decode_error() {
        let err = scalar_field("not json", "name").unwrap_err();
        assert!(matches!(err, LookupError::Decode(_)));
    }

    #[test]
    fn scalar_field_object_body_is_decode_error() {
        let err = scalar_field(r#"{"name":"Widget"}"#, "name").unwrap_err();
        assert!(matches!(err, LookupError::Decode(_)));
    }

    #[test]
    fn first_record_keeps_all_fields() {
        let record = first_record(r#"[{"ean":"4011200296908","name":"A","categoryId":45}]"#)
            .unwrap()
            .unwrap();
        assert_eq!(record["ean"], "4011200296908");
        assert_eq!(record["categoryId"], 45);
    }

    #[test]
    fn bool_field_parses_string_booleans() {
        assert_eq!(bool_field(r#"[{"valid":"true"}]"#, "valid").unwrap(), Some(true));
        assert_eq!(bool_field(r#"[{"valid":"false"}]"#, "valid").unwrap(), Some(false));
    }

    #[test]
    fn bool_field_parses_json_booleans() {
        assert_eq!(bool_field(r#"[{"valid":true}]"#, "valid").unwrap(), Some(true));
    }

    #[test]
    fn bool_field_missing_key_is_none() {
        assert_eq!(bool_field(r#"[{"ean":"123"}]"#, "valid").unwrap(), None);
    }

    #[test]
    fn bool_field_unparseable_is_decode_error() {
        let err = bool_field(r#"[{"valid":"maybe"}]"#, "valid").unwrap_err();
        assert!(matches!(err, LookupError::Decode(_)));
    }

    #[test]
    fn product_list_preserves_order() {
        let body = r#"{"productlist":[{"name":"A"},{"name":"B"}]}"#;
        let list = product_list(body).unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(list[0]["name"], "A");
        assert_eq!(list[1]["name"], "B");
    }

    #[test]
    fn product_list_missing_field_is_empty() {
        let list = product_list(r#"{"totalproducts":0}"#).unwrap();
        assert!(list.is_empty());
    }

    #[test]
    fn product_list_array_body_is_decode_error() {
        let err = product_list(r#"[{"name":"A"}]"#).unwrap_err();
        assert!(matches!(err, LookupError::Decode(_)));
    }
}
