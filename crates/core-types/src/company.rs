use crate::error::ValidationError;
use crate::validation::{ObjectValidator, Schema, UnknownFields};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A full `company` row as accepted by the create endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct NewCompany {
    pub company_id: String,
    pub company_name: String,
    pub company_city: String,
}

/// Body of a partial update that only renames the company.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct CompanyNameUpdate {
    pub company_name: String,
}

/// Body of a full update. The identifier comes from the path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct CompanyUpdate {
    pub company_name: String,
    pub company_city: String,
}

impl Schema for NewCompany {
    const FIELDS: &'static [&'static str] = &["COMPANY_ID", "COMPANY_NAME", "COMPANY_CITY"];

    fn validate(payload: &Value, unknown: UnknownFields) -> Result<Self, ValidationError> {
        let mut v = ObjectValidator::new(payload, Self::FIELDS, unknown);
        let record = Self {
            company_id: v.required_string("COMPANY_ID"),
            company_name: v.required_string("COMPANY_NAME"),
            company_city: v.required_string("COMPANY_CITY"),
        };
        v.finish(record)
    }
}

impl Schema for CompanyNameUpdate {
    const FIELDS: &'static [&'static str] = &["COMPANY_NAME"];

    fn validate(payload: &Value, unknown: UnknownFields) -> Result<Self, ValidationError> {
        let mut v = ObjectValidator::new(payload, Self::FIELDS, unknown);
        let record = Self {
            company_name: v.required_string("COMPANY_NAME"),
        };
        v.finish(record)
    }
}

impl Schema for CompanyUpdate {
    const FIELDS: &'static [&'static str] = &["COMPANY_NAME", "COMPANY_CITY"];

    fn validate(payload: &Value, unknown: UnknownFields) -> Result<Self, ValidationError> {
        let mut v = ObjectValidator::new(payload, Self::FIELDS, unknown);
        let record = Self {
            company_name: v.required_string("COMPANY_NAME"),
            company_city: v.required_string("COMPANY_CITY"),
        };
        v.finish(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn create_payload_is_normalized() {
        let payload = json!({
            "COMPANY_ID": "21",
            "COMPANY_NAME": "Acme",
            "COMPANY_CITY": "Charlotte",
        });
        let company = NewCompany::validate(&payload, UnknownFields::Ignore).unwrap();
        assert_eq!(company.company_id, "21");
        assert_eq!(company.company_name, "Acme");
        assert_eq!(company.company_city, "Charlotte");
    }

    #[test]
    fn create_payload_missing_name_fails() {
        let payload = json!({ "COMPANY_ID": "21", "COMPANY_CITY": "Charlotte" });
        let err = NewCompany::validate(&payload, UnknownFields::Ignore).unwrap_err();
        assert_eq!(err.to_string(), "\"COMPANY_NAME\" is required");
    }

    #[test]
    fn numeric_identifier_is_not_coerced() {
        let payload = json!({ "COMPANY_ID": 21, "COMPANY_NAME": "Acme", "COMPANY_CITY": "Charlotte" });
        let err = NewCompany::validate(&payload, UnknownFields::Ignore).unwrap_err();
        assert!(err.mentions("COMPANY_ID"));
    }

    #[test]
    fn extra_fields_follow_the_policy() {
        let payload = json!({ "COMPANY_NAME": "Acme", "COMPANY_CITY": "Paris" });
        assert!(CompanyNameUpdate::validate(&payload, UnknownFields::Ignore).is_ok());
        let err = CompanyNameUpdate::validate(&payload, UnknownFields::Reject).unwrap_err();
        assert_eq!(err.to_string(), "\"COMPANY_CITY\" is not allowed");
    }

    #[test]
    fn full_update_requires_both_fields() {
        let err = CompanyUpdate::validate(&json!({}), UnknownFields::Ignore).unwrap_err();
        assert_eq!(err.details.len(), 2);
        assert_eq!(
            err.to_string(),
            "\"COMPANY_NAME\" is required. \"COMPANY_CITY\" is required"
        );
    }

    #[test]
    fn records_serialize_with_column_names() {
        let company = NewCompany {
            company_id: "9".into(),
            company_name: "Foodies.".into(),
            company_city: "London".into(),
        };
        assert_eq!(
            serde_json::to_value(&company).unwrap(),
            json!({ "COMPANY_ID": "9", "COMPANY_NAME": "Foodies.", "COMPANY_CITY": "London" })
        );
    }
}
