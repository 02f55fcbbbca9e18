//! Base validation trait and common utilities
//!
//! Copyright (c) 2025 Ediflow Team
//! Licensed under the Apache-2.0 license

use crate::validation::error::{Rule, ValidationError, ValidationErrors, ValidationResult};
use serde_json::Value;

/// Validation context tracking the current JSON path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationContext {
    /// Current JSON path
    pub path: String,
}

impl Default for ValidationContext {
    fn default() -> Self {
        Self::new()
    }
}

impl ValidationContext {
    /// Create a root validation context
    pub fn new() -> Self {
        Self {
            path: "$".to_string(),
        }
    }

    /// Create a child context with updated path
    pub fn child<P: AsRef<str>>(&self, path_segment: P) -> Self {
        Self {
            path: format!("{}.{}", self.path, path_segment.as_ref()),
        }
    }

    /// Create a child context for array index
    pub fn child_index(&self, index: usize) -> Self {
        Self {
            path: format!("{}[{}]", self.path, index),
        }
    }
}

/// Base trait for document validators
pub trait SchemaValidator {
    /// The type being validated
    type Input: ?Sized;

    /// Collect every violation in one pass, starting at `context`
    fn collect_errors_with_context(
        &self,
        input: &Self::Input,
        context: &ValidationContext,
    ) -> ValidationErrors;

    /// Collect every violation in one pass from the document root
    fn collect_errors(&self, input: &Self::Input) -> ValidationErrors {
        self.collect_errors_with_context(input, &ValidationContext::new())
    }

    /// Validate a document, failing with all collected violations
    fn validate(&self, input: &Self::Input) -> ValidationResult<()> {
        self.collect_errors(input).into_result()
    }
}

/// Helper functions for required-field checks.
///
/// Two notions of "missing" are in use. [`is_absent`](Self::is_absent) only
/// rejects absent, null, and empty-string values, so numeric zero passes.
/// [`is_falsy`](Self::is_falsy) also rejects `false` and zero.
pub struct ValidationHelpers;

impl ValidationHelpers {
    /// Absent, null, or the empty string
    pub fn is_absent(value: Option<&Value>) -> bool {
        match value {
            None | Some(Value::Null) => true,
            Some(Value::String(s)) => s.is_empty(),
            Some(_) => false,
        }
    }

    /// Absent, null, `false`, zero, or the empty string
    pub fn is_falsy(value: Option<&Value>) -> bool {
        match value {
            None | Some(Value::Null) => true,
            Some(Value::Bool(b)) => !b,
            Some(Value::Number(n)) => n.as_f64() == Some(0.0),
            Some(Value::String(s)) => s.is_empty(),
            Some(Value::Array(_)) | Some(Value::Object(_)) => false,
        }
    }

    /// Returns the array when the value is a non-empty array
    pub fn non_empty_array(value: Option<&Value>) -> Option<&Vec<Value>> {
        value
            .and_then(Value::as_array)
            .filter(|items| !items.is_empty())
    }

    /// Push an error when `field` fails the given rule
    pub fn require(
        errors: &mut ValidationErrors,
        parent: &Value,
        field: &str,
        rule: Rule,
        context: &ValidationContext,
        message: impl FnOnce() -> String,
    ) {
        let value = parent.get(field);
        let missing = match rule {
            Rule::Present => Self::is_absent(value),
            Rule::NonEmpty => Self::is_falsy(value),
            Rule::NonEmptyArray => Self::non_empty_array(value).is_none(),
        };
        if missing {
            errors.add(ValidationError::new(context.child(field).path, rule, message()));
        }
    }
}
