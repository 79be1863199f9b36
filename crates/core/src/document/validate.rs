/// Input validation applied before any store or generator call.
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),
    #[error("patch must contain at least one of `sections`, `layout` or `title`")]
    EmptyPatch,
    #[error("patch body must be a JSON object")]
    PatchNotObject,
    #[error("patch body is not valid: {0}")]
    MalformedPatch(String),
}

/// Both classification fields are required and must not be blank.
pub fn validate_generation_fields(
    business_type: Option<&str>,
    industry: Option<&str>,
) -> Result<(), ValidationError> {
    let mut missing = Vec::new();
    if business_type.map_or(true, |v| v.trim().is_empty()) {
        missing.push("business_type");
    }
    if industry.map_or(true, |v| v.trim().is_empty()) {
        missing.push("industry");
    }
    if missing.is_empty() {
        Ok(())
    } else {
        Err(ValidationError::MissingFields(missing))
    }
}
