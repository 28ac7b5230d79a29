use crate::error::{FieldError, ValidationError};
use serde_json::{Map, Value};

/// Inclusive bounds of the identifier schema.
pub const ID_MIN: i64 = 1;
pub const ID_MAX: i64 = 20;

/// What a validator does with payload keys its schema does not declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnknownFields {
    #[default]
    Ignore,
    Reject,
}

impl UnknownFields {
    pub fn from_strict(strict: bool) -> Self {
        if strict { Self::Reject } else { Self::Ignore }
    }
}

/// A record that can be produced from an untyped request payload.
pub trait Schema: Sized {
    /// The payload keys this schema declares.
    const FIELDS: &'static [&'static str];

    fn validate(payload: &Value, unknown: UnknownFields) -> Result<Self, ValidationError>;
}

/// Collects every violation found in a JSON object before reporting them.
///
/// Extraction methods always return a value so a schema can build its record
/// unconditionally; `finish` discards that record when anything was recorded.
pub struct ObjectValidator<'a> {
    object: Option<&'a Map<String, Value>>,
    errors: Vec<FieldError>,
    unknown: Vec<FieldError>,
}

impl<'a> ObjectValidator<'a> {
    pub fn new(payload: &'a Value, declared: &[&str], policy: UnknownFields) -> Self {
        let Some(object) = payload.as_object() else {
            return Self {
                object: None,
                errors: vec![FieldError::new("value", "\"value\" must be of type object")],
                unknown: Vec::new(),
            };
        };

        let unknown = match policy {
            UnknownFields::Ignore => Vec::new(),
            UnknownFields::Reject => object
                .keys()
                .filter(|key| !declared.contains(&key.as_str()))
                .map(|key| FieldError::new(key.as_str(), format!("\"{key}\" is not allowed")))
                .collect(),
        };

        Self {
            object: Some(object),
            errors: Vec::new(),
            unknown,
        }
    }

    /// A present, non-empty JSON string. The value is returned untouched.
    pub fn required_string(&mut self, field: &str) -> String {
        let Some(object) = self.object else {
            return String::new();
        };

        let message = match object.get(field) {
            Some(Value::String(s)) if !s.is_empty() => return s.clone(),
            Some(Value::String(_)) => format!("\"{field}\" is not allowed to be empty"),
            Some(_) => format!("\"{field}\" must be a string"),
            None => format!("\"{field}\" is required"),
        };
        self.errors.push(FieldError::new(field, message));
        String::new()
    }

    pub fn finish<T>(mut self, record: T) -> Result<T, ValidationError> {
        self.errors.append(&mut self.unknown);
        if self.errors.is_empty() {
            Ok(record)
        } else {
            tracing::debug!(violations = self.errors.len(), "Payload failed schema validation.");
            Err(ValidationError {
                details: self.errors,
            })
        }
    }
}

/// Validates an identifier path segment: an integer within `[ID_MIN, ID_MAX]`.
pub fn validate_id(raw: &str) -> Result<i64, ValidationError> {
    let trimmed = raw.trim();
    let id = match trimmed.parse::<i64>() {
        Ok(id) => id,
        Err(_) => {
            let message = match trimmed.parse::<f64>() {
                Ok(n) if n.is_finite() => "\"id\" must be an integer",
                _ => "\"id\" must be a number",
            };
            return Err(ValidationError::single("id", message));
        }
    };

    if id < ID_MIN {
        return Err(ValidationError::single(
            "id",
            format!("\"id\" must be greater than or equal to {ID_MIN}"),
        ));
    }
    if id > ID_MAX {
        return Err(ValidationError::single(
            "id",
            format!("\"id\" must be less than or equal to {ID_MAX}"),
        ));
    }
    Ok(id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn id_within_bounds_is_accepted() {
        assert_eq!(validate_id("1"), Ok(1));
        assert_eq!(validate_id("20"), Ok(20));
        assert_eq!(validate_id(" 7 "), Ok(7));
    }

    #[test]
    fn id_out_of_bounds_is_rejected() {
        let low = validate_id("0").unwrap_err();
        assert_eq!(low.to_string(), "\"id\" must be greater than or equal to 1");
        let high = validate_id("21").unwrap_err();
        assert_eq!(high.to_string(), "\"id\" must be less than or equal to 20");
    }

    #[test]
    fn id_that_is_not_an_integer_is_rejected() {
        assert_eq!(validate_id("abc").unwrap_err().to_string(), "\"id\" must be a number");
        assert_eq!(validate_id("").unwrap_err().to_string(), "\"id\" must be a number");
        assert_eq!(validate_id("2.5").unwrap_err().to_string(), "\"id\" must be an integer");
    }

    #[test]
    fn non_object_payload_reports_a_single_error() {
        let payload = json!(["COMPANY_NAME"]);
        let mut v = ObjectValidator::new(&payload, &["COMPANY_NAME"], UnknownFields::Ignore);
        let _ = v.required_string("COMPANY_NAME");
        let err = v.finish(()).unwrap_err();
        assert_eq!(err.details.len(), 1);
        assert_eq!(err.to_string(), "\"value\" must be of type object");
    }

    #[test]
    fn every_violation_is_reported() {
        let payload = json!({ "A": "", "B": 3, "extra": true });
        let mut v = ObjectValidator::new(&payload, &["A", "B", "C"], UnknownFields::Reject);
        let _ = v.required_string("A");
        let _ = v.required_string("B");
        let _ = v.required_string("C");
        let err = v.finish(()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "\"A\" is not allowed to be empty. \"B\" must be a string. \"C\" is required. \"extra\" is not allowed"
        );
        assert!(err.mentions("extra"));
    }

    #[test]
    fn whitespace_is_kept_verbatim() {
        let payload = json!({ "A": "  padded " });
        let mut v = ObjectValidator::new(&payload, &["A"], UnknownFields::Ignore);
        let a = v.required_string("A");
        assert_eq!(v.finish(a).unwrap(), "  padded ");
    }
}
