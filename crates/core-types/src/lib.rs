//! Domain records of the sample database and the schema validators that
//! produce them from raw request payloads.

pub mod company;
pub mod error;
pub mod validation;

// Re-export the core types to provide a clean public API.
pub use company::{CompanyNameUpdate, CompanyUpdate, NewCompany};
pub use error::{FieldError, ValidationError};
pub use validation::{Schema, UnknownFields, validate_id};
