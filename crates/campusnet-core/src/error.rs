use thiserror::Error;

/// A request field failed validation before any store access.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{field} is required")]
    MissingField { field: &'static str },

    #[error("{field} is invalid: {reason}")]
    InvalidField { field: &'static str, reason: String },
}

/// Return the value of a required field, treating an empty string as missing.
pub fn require(field: &'static str, value: &str) -> Result<String, ValidationError> {
    if value.is_empty() {
        return Err(ValidationError::MissingField { field });
    }
    Ok(value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_value_is_missing() {
        assert_eq!(
            require("student_id", ""),
            Err(ValidationError::MissingField {
                field: "student_id",
            })
        );
        assert_eq!(require("student_id", "S1").unwrap(), "S1");
    }

    #[test]
    fn whitespace_is_kept_as_is() {
        assert_eq!(require("name", " ").unwrap(), " ");
    }

    #[test]
    fn messages_name_the_field() {
        let err = ValidationError::MissingField {
            field: "course_code",
        };
        assert_eq!(err.to_string(), "course_code is required");

        let err = ValidationError::InvalidField {
            field: "post_id",
            reason: "expected an integer".to_string(),
        };
        assert_eq!(err.to_string(), "post_id is invalid: expected an integer");
    }
}
