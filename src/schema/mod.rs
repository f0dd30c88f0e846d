//! Structural validation for configuration snapshots and inbound payloads.
//!
//! Both are checked the same way: compile a JSON schema, run the candidate
//! value through it, and collect every field-level failure. The built-in
//! schemas are compiled once, see [`definitions`].

pub mod definitions;

use std::fmt;

use jsonschema::{Validator, validator_for};
use serde_json::Value;

/// A single failed constraint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    /// JSON pointer to the failing location (`""` is the document root).
    pub path: String,
    /// The violated schema keyword (`required`, `type`, `enum`, ...).
    pub keyword: String,
    pub message: String,
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let path = if self.path.is_empty() { "/" } else { &self.path };
        write!(f, "{path}: {} [{}]", self.message, self.keyword)
    }
}

/// Outcome of validating one value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationReport {
    pub valid: bool,
    pub errors: Vec<FieldError>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// All errors on one line, comma separated.
    pub fn summary(&self) -> String {
        self.errors
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Validate `instance` against `schema`.
///
/// A schema that fails to compile produces an invalid report with a single
/// root-level error rather than a panic.
pub fn validate(schema: &Value, instance: &Value) -> ValidationReport {
    let validator = match validator_for(schema) {
        Ok(validator) => validator,
        Err(e) => {
            return ValidationReport {
                valid: false,
                errors: vec![FieldError {
                    path: String::new(),
                    keyword: "schema".into(),
                    message: format!("invalid schema: {e}"),
                }],
            };
        }
    };

    validate_with(&validator, instance)
}

/// Validate `instance` against an already compiled schema.
pub fn validate_with(validator: &Validator, instance: &Value) -> ValidationReport {
    let errors: Vec<FieldError> = validator
        .iter_errors(instance)
        .map(|e| FieldError {
            path: e.instance_path().as_str().to_string(),
            keyword: e.kind().keyword().to_string(),
            message: e.to_string(),
        })
        .collect();

    ValidationReport {
        valid: errors.is_empty(),
        errors,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn person_schema() -> Value {
        json!({
            "type": "object",
            "required": ["name", "pets"],
            "properties": {
                "name": { "type": "string" },
                "pets": {
                    "type": "array",
                    "items": {
                        "type": "object",
                        "required": ["kind"],
                        "properties": { "kind": { "enum": ["cat", "dog"] } }
                    }
                }
            }
        })
    }

    #[test]
    fn valid_instance_has_no_errors() {
        let report = validate(
            &person_schema(),
            &json!({ "name": "ada", "pets": [{ "kind": "cat" }] }),
        );
        assert!(report.is_valid());
        assert!(report.errors.is_empty());
        assert_eq!(report.summary(), "");
    }

    #[test]
    fn reports_missing_required_field() {
        let report = validate(&person_schema(), &json!({ "pets": [] }));
        assert!(!report.is_valid());
        assert_eq!(report.errors.len(), 1);
        assert_eq!(report.errors[0].keyword, "required");
        assert_eq!(report.errors[0].path, "");
        assert!(report.errors[0].message.contains("name"));
    }

    #[test]
    fn reports_nested_array_paths() {
        let report = validate(
            &person_schema(),
            &json!({ "name": 7, "pets": [{ "kind": "cat" }, { "kind": "ferret" }] }),
        );
        assert!(!report.is_valid());
        let paths: Vec<&str> = report.errors.iter().map(|e| e.path.as_str()).collect();
        assert!(paths.contains(&"/name"));
        assert!(paths.contains(&"/pets/1/kind"));

        let summary = report.summary();
        assert!(summary.contains("/name"));
        assert!(summary.contains("[enum]"));
    }

    #[test]
    fn compiled_validator_gives_the_same_report() {
        let validator = validator_for(&person_schema()).unwrap();
        let instance = json!({ "name": 7, "pets": [] });
        assert_eq!(
            validate_with(&validator, &instance),
            validate(&person_schema(), &instance)
        );
    }

    #[test]
    fn uncompilable_schema_is_reported() {
        let report = validate(&json!({ "type": "not-a-type" }), &json!({}));
        assert!(!report.is_valid());
        assert_eq!(report.errors[0].keyword, "schema");
    }
}
