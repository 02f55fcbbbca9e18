//! Validation module for pallet payloads
//!
//! [`validate_payload`] runs three stages over a raw string:
//!
//! - **Presence**: absent input or a "no data" sentinel yields `MissingInput`
//! - **Parse**: a JSON syntax error yields `MalformedInput`
//! - **Fields**: every required-field violation is collected in one pass
//!
//! All three outcome kinds are ordinary return values; nothing here panics
//! or returns `Err` for bad input.
//!
//! Copyright (c) 2025 Ediflow Team
//! Licensed under the Apache-2.0 license

pub mod base;
pub mod error;
pub mod outcome;
pub mod pallet;

// Re-export commonly used types
pub use base::{SchemaValidator, ValidationContext, ValidationHelpers};
pub use error::{Rule, ValidationError, ValidationErrors, ValidationResult};
pub use outcome::{ResultStatus, ScriptResult, ValidationOutcome};
pub use pallet::PalletDocumentValidator;

use serde_json::Value;
use tracing::{debug, info, warn};

/// Literal payloads treated the same as no payload
pub const NO_DATA_SENTINELS: [&str; 2] = ["{}", "null"];

/// Whether a raw payload counts as missing
pub fn is_missing_payload(raw: Option<&str>) -> bool {
    match raw {
        None => true,
        Some(s) => s.is_empty() || NO_DATA_SENTINELS.contains(&s),
    }
}

/// Validate a raw pallet payload
///
/// Parsing keeps serde_json's nesting limit of 128 levels; anything deeper,
/// even in a field no rule looks at, is reported as `MalformedInput`.
///
/// # Examples
///
/// ```rust
/// use ediflow_schemas::validation::{validate_payload, ResultStatus};
///
/// let raw = r#"{"totalPallets":1,"pallets":[]}"#;
/// let outcome = validate_payload(Some(raw));
///
/// assert_eq!(outcome.status(), ResultStatus::MissingData);
/// assert_eq!(outcome.error_messages(), vec!["Missing or empty pallets array in JSON"]);
/// ```
pub fn validate_payload(raw: Option<&str>) -> ValidationOutcome {
    debug!(length = raw.map(str::len), "Validating pallet payload");

    let raw = match raw {
        Some(raw) if !is_missing_payload(Some(raw)) => raw,
        _ => {
            warn!("{}", outcome::MISSING_INPUT_MESSAGE);
            return ValidationOutcome::MissingInput;
        }
    };

    let document: Value = match serde_json::from_str(raw) {
        Ok(document) => {
            debug!("JSON parsed successfully");
            document
        }
        Err(e) => {
            warn!(error = %e, "Payload is not valid JSON");
            return ValidationOutcome::MalformedInput { message: e.to_string() };
        }
    };

    validate_document(&document)
}

/// Validate an already-parsed document
pub fn validate_document(document: &Value) -> ValidationOutcome {
    let errors = PalletDocumentValidator::new().collect_errors(document);

    if errors.is_empty() {
        info!("Validation passed - all required fields present");
    } else {
        warn!(count = errors.len(), errors = %errors, "Validation errors");
    }

    ValidationOutcome::Validated { errors }
}

/// Validate several payloads independently, preserving input order
pub fn validate_payloads_batch<'a, I>(payloads: I) -> Vec<ValidationOutcome>
where
    I: IntoIterator<Item = Option<&'a str>>,
{
    payloads.into_iter().map(validate_payload).collect()
}
