//! Structural validation of book payloads against the fixed field schema.
//!
//! Validation is purely type-based: no cross-field rules, no emptiness
//! checks. Unknown keys are never an error; they are stripped before
//! anything reaches storage.

use serde_json::{Map, Value};

/// Expected JSON type of a schema field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    String,
    /// String that must start with an http(s) scheme.
    Url,
    Integer,
    /// Integer strictly greater than zero.
    PositiveInteger,
}

/// One entry of the book schema.
pub struct FieldSpec {
    pub name: &'static str,
    pub ty: FieldType,
    pub required: bool,
}

/// The fixed book schema, in validation-report order.
pub const BOOK_FIELDS: &[FieldSpec] = &[
    FieldSpec {
        name: "isbn",
        ty: FieldType::String,
        required: true,
    },
    FieldSpec {
        name: "amazon_url",
        ty: FieldType::Url,
        required: true,
    },
    FieldSpec {
        name: "author",
        ty: FieldType::String,
        required: true,
    },
    FieldSpec {
        name: "language",
        ty: FieldType::String,
        required: true,
    },
    FieldSpec {
        name: "pages",
        ty: FieldType::PositiveInteger,
        required: true,
    },
    FieldSpec {
        name: "publisher",
        ty: FieldType::String,
        required: true,
    },
    FieldSpec {
        name: "title",
        ty: FieldType::String,
        required: true,
    },
    FieldSpec {
        name: "year",
        ty: FieldType::Integer,
        required: true,
    },
];

/// Validation mode: full object on create, supplied fields only on update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Create,
    Update,
}

/// Validate `input` against the book schema.
///
/// Returns the ordered list of human-readable violations, one per broken
/// constraint. Keys outside the schema are skipped entirely.
pub fn validate(input: &Map<String, Value>, mode: Mode) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    for field in BOOK_FIELDS {
        match input.get(field.name) {
            None => {
                if mode == Mode::Create && field.required {
                    errors.push(format!("{} is required", field.name));
                }
            }
            Some(value) => {
                if let Some(error) = check_type(field, value) {
                    errors.push(error);
                }
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Copy only schema-recognized keys out of `input`.
pub fn recognized_fields(input: &Map<String, Value>) -> Map<String, Value> {
    let mut fields = Map::new();
    for field in BOOK_FIELDS {
        if let Some(value) = input.get(field.name) {
            fields.insert(field.name.to_string(), value.clone());
        }
    }
    fields
}

fn check_type(field: &FieldSpec, value: &Value) -> Option<String> {
    match field.ty {
        FieldType::String => {
            if !value.is_string() {
                return Some(format!("{} must be a string", field.name));
            }
        }
        FieldType::Url => match value.as_str() {
            None => return Some(format!("{} must be a string", field.name)),
            Some(s) => {
                if !s.starts_with("http://") && !s.starts_with("https://") {
                    return Some(format!("{} must be a valid http(s) URL", field.name));
                }
            }
        },
        FieldType::Integer => {
            if value.as_i64().is_none() {
                return Some(format!("{} must be an integer", field.name));
            }
        }
        FieldType::PositiveInteger => match value.as_i64() {
            None => return Some(format!("{} must be an integer", field.name)),
            Some(n) if n <= 0 => {
                return Some(format!("{} must be a positive integer", field.name))
            }
            Some(_) => {}
        },
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn full_payload() -> Map<String, Value> {
        json!({
            "isbn": "0691161518",
            "amazon_url": "http://a.co/eobPtX2",
            "author": "Matthew Lane",
            "language": "english",
            "pages": 264,
            "publisher": "Princeton University Press",
            "title": "Power-Up",
            "year": 2017
        })
        .as_object()
        .unwrap()
        .clone()
    }

    #[test]
    fn accepts_complete_payload_in_create_mode() {
        assert!(validate(&full_payload(), Mode::Create).is_ok());
    }

    #[test]
    fn reports_each_missing_required_field() {
        for field in BOOK_FIELDS {
            let mut payload = full_payload();
            payload.remove(field.name);

            let errors = validate(&payload, Mode::Create).unwrap_err();
            assert_eq!(errors, vec![format!("{} is required", field.name)]);
        }
    }

    #[test]
    fn reports_wrong_types_in_schema_order() {
        let mut payload = full_payload();
        payload.insert("author".to_string(), json!(12));
        payload.insert("pages".to_string(), json!("many"));

        let errors = validate(&payload, Mode::Create).unwrap_err();
        assert_eq!(
            errors,
            vec![
                "author must be a string".to_string(),
                "pages must be an integer".to_string(),
            ]
        );
    }

    #[test]
    fn rejects_non_positive_pages() {
        let mut payload = full_payload();
        payload.insert("pages".to_string(), json!(0));

        let errors = validate(&payload, Mode::Create).unwrap_err();
        assert_eq!(errors, vec!["pages must be a positive integer".to_string()]);
    }

    #[test]
    fn rejects_malformed_amazon_url() {
        let mut payload = full_payload();
        payload.insert("amazon_url".to_string(), json!("ftp://a.co/eobPtX2"));

        let errors = validate(&payload, Mode::Create).unwrap_err();
        assert_eq!(
            errors,
            vec!["amazon_url must be a valid http(s) URL".to_string()]
        );
    }

    #[test]
    fn update_mode_skips_absent_fields() {
        let payload = json!({"language": "spanish"}).as_object().unwrap().clone();
        assert!(validate(&payload, Mode::Update).is_ok());
    }

    #[test]
    fn update_mode_still_checks_supplied_fields() {
        let payload = json!({"pages": "lots"}).as_object().unwrap().clone();
        let errors = validate(&payload, Mode::Update).unwrap_err();
        assert_eq!(errors, vec!["pages must be an integer".to_string()]);
    }

    #[test]
    fn update_mode_accepts_empty_body() {
        assert!(validate(&Map::new(), Mode::Update).is_ok());
    }

    #[test]
    fn unknown_keys_are_not_errors() {
        let payload = json!({"moneyTeam": "FloydMaywhether"})
            .as_object()
            .unwrap()
            .clone();
        assert!(validate(&payload, Mode::Update).is_ok());
    }

    #[test]
    fn recognized_fields_strips_unknown_keys() {
        let payload = json!({"language": "spanish", "favShow": "IDK, hard to pick"})
            .as_object()
            .unwrap()
            .clone();

        let fields = recognized_fields(&payload);
        assert_eq!(fields.len(), 1);
        assert!(fields.contains_key("language"));
    }
}
