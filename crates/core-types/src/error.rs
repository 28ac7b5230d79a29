use serde::Serialize;
use thiserror::Error;

/// One violated constraint, tied to the field it was found on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Returned by every schema validator when the input does not match its shape.
///
/// The display text joins all messages with `". "`, which is what clients
/// receive in the body of a 422 response.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[error("{}", join_messages(.details))]
pub struct ValidationError {
    pub details: Vec<FieldError>,
}

impl ValidationError {
    pub fn single(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            details: vec![FieldError::new(field, message)],
        }
    }

    /// True when a violation was recorded against `field`.
    pub fn mentions(&self, field: &str) -> bool {
        self.details.iter().any(|d| d.field == field)
    }
}

fn join_messages(details: &[FieldError]) -> String {
    details
        .iter()
        .map(|d| d.message.as_str())
        .collect::<Vec<_>>()
        .join(". ")
}
