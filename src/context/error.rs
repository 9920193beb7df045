//! Context error types.

/// Errors raised by object handles.
#[derive(thiserror::Error, Debug)]
pub enum ObjectError {
    /// The object has no method with this name.
    #[error("Method {method} not found on {type_name}")]
    MethodNotFound { type_name: String, method: String },

    /// The method ran and failed.
    #[error("Method {method} failed: {message}")]
    Failed { method: String, message: String },
}

/// Errors building a context from external data.
#[derive(thiserror::Error, Debug)]
pub enum ContextError {
    /// The top-level JSON value was not an object.
    #[error("Context must be a JSON object, got {0}")]
    NotAnObject(&'static str),

    /// The JSON document could not be parsed.
    #[error("Failed to parse context JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_an_object_display() {
        let err = ContextError::NotAnObject("array");
        assert!(err.to_string().contains("array"));
    }
}
