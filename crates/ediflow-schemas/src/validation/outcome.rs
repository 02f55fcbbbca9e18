//! Validation outcome and the three-field result contract
//!
//! Downstream consumers read exactly `status`, `success`, and `errorMessage`;
//! the shape and the message texts here are a wire contract.
//!
//! Copyright (c) 2025 Ediflow Team
//! Licensed under the Apache-2.0 license

use crate::validation::error::ValidationErrors;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Message reported when no payload was supplied
pub const MISSING_INPUT_MESSAGE: &str = "Pallet_array_JSON field is empty or missing";

/// Prefix of the message reported when the payload is not valid JSON
pub const MALFORMED_INPUT_PREFIX: &str = "Pallet_array_JSON is malformed or invalid JSON: ";

/// Outcome of validating one raw payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationOutcome {
    /// No payload at all (absent, empty, `{}` or `null`)
    MissingInput,
    /// The payload could not be parsed; carries the parser diagnostic
    MalformedInput { message: String },
    /// The payload parsed; `errors` is empty when the document is valid
    Validated { errors: ValidationErrors },
}

impl ValidationOutcome {
    /// Parsed and free of violations
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Validated { errors } if errors.is_empty())
    }

    /// Parsed but with at least one violation
    pub fn is_invalid(&self) -> bool {
        matches!(self, Self::Validated { errors } if !errors.is_empty())
    }

    /// Violation messages in traversal order; empty for the input-level outcomes
    pub fn error_messages(&self) -> Vec<&str> {
        match self {
            Self::Validated { errors } => errors.messages(),
            _ => Vec::new(),
        }
    }

    pub fn status(&self) -> ResultStatus {
        match self {
            Self::MalformedInput { .. } => ResultStatus::InvalidJson,
            Self::MissingInput => ResultStatus::MissingData,
            Self::Validated { errors } if errors.is_empty() => ResultStatus::Valid,
            Self::Validated { .. } => ResultStatus::MissingData,
        }
    }

    /// Render the wire result for this outcome
    pub fn to_script_result(&self) -> ScriptResult {
        match self {
            Self::MissingInput => ScriptResult::failure(ResultStatus::MissingData, MISSING_INPUT_MESSAGE),
            Self::MalformedInput { message } => ScriptResult::failure(
                ResultStatus::InvalidJson,
                format!("{}{}", MALFORMED_INPUT_PREFIX, message),
            ),
            Self::Validated { errors } if errors.is_empty() => ScriptResult::valid(),
            Self::Validated { errors } => ScriptResult::failure(ResultStatus::MissingData, errors.joined()),
        }
    }
}

/// Wire status values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResultStatus {
    Valid,
    InvalidJson,
    MissingData,
}

impl fmt::Display for ResultStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResultStatus::Valid => write!(f, "VALID"),
            ResultStatus::InvalidJson => write!(f, "INVALID_JSON"),
            ResultStatus::MissingData => write!(f, "MISSING_DATA"),
        }
    }
}

/// The three-field result written back to the host
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptResult {
    pub status: ResultStatus,
    pub success: bool,
    #[serde(rename = "errorMessage")]
    pub error_message: String,
}

impl ScriptResult {
    pub fn valid() -> Self {
        Self {
            status: ResultStatus::Valid,
            success: true,
            error_message: String::new(),
        }
    }

    pub fn failure(status: ResultStatus, message: impl Into<String>) -> Self {
        Self {
            status,
            success: false,
            error_message: message.into(),
        }
    }

    /// Compact JSON as handed to the host's result channel
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

impl From<&ValidationOutcome> for ScriptResult {
    fn from(outcome: &ValidationOutcome) -> Self {
        outcome.to_script_result()
    }
}
