use thiserror::Error;

/// Core error type for JSON-to-Parquet conversion and encoding
#[derive(Error, Debug)]
pub enum ParquetJsonError {
    /// The schema references a kind/format combination with no columnar mapping
    #[error("unsupported schema: {0}")]
    UnsupportedSchema(String),

    /// A runtime value's shape disagrees with the writer built for its field
    #[error("type mismatch for field '{field}': expected {expected}, got {actual}")]
    TypeMismatch {
        field: String,
        expected: &'static str,
        actual: String,
    },

    /// A required field is absent from the source value with no default to substitute
    #[error("required field '{0}' is missing and has no default")]
    RequiredFieldMissing(String),

    /// Structural schema errors (malformed descriptor, mismatched trees)
    #[error("schema error: {0}")]
    Schema(String),
}

/// Result type alias for JSON-to-Parquet operations
pub type Result<T> = std::result::Result<T, ParquetJsonError>;

impl ParquetJsonError {
    /// Create a new unsupported-schema error
    pub fn unsupported<S: Into<String>>(msg: S) -> Self {
        ParquetJsonError::UnsupportedSchema(msg.into())
    }

    /// Create a new schema error
    pub fn schema<S: Into<String>>(msg: S) -> Self {
        ParquetJsonError::Schema(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = ParquetJsonError::unsupported("free-form maps have no mapping");
        assert_eq!(
            err.to_string(),
            "unsupported schema: free-form maps have no mapping"
        );

        let err = ParquetJsonError::schema("root descriptor must be an object");
        assert_eq!(
            err.to_string(),
            "schema error: root descriptor must be an object"
        );
    }

    #[test]
    fn test_type_mismatch_display() {
        let err = ParquetJsonError::TypeMismatch {
            field: "age".to_string(),
            expected: "32-bit integer",
            actual: "string".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "type mismatch for field 'age': expected 32-bit integer, got string"
        );
    }

    #[test]
    fn test_required_field_display() {
        let err = ParquetJsonError::RequiredFieldMissing("key2".to_string());
        assert!(err.to_string().contains("key2"));
    }
}
