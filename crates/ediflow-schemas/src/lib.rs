//! Ediflow Schemas - Required-field validation for pallet payloads
//!
//! This crate validates the pallet document of an advance ship notice
//! (header → pallets → items) and renders the result contract consumed by
//! the integration host.
//!
//! ## Features
//!
//! - **Staged Validation**: missing input, malformed JSON, and field-level
//!   violations are distinct outcomes, never panics
//! - **Complete Reports**: every violation is collected in one pass, in
//!   document order, with a JSON path for each
//! - **Stable Wire Contract**: `status` / `success` / `errorMessage`
//!
//! ## Quick Start
//!
//! ```rust
//! use ediflow_schemas::{validate_payload, ResultStatus};
//!
//! let raw = r#"{
//!     "totalPallets": 1,
//!     "pallets": [{
//!         "sscc": "S1",
//!         "items": [{"vpn": "V1", "ediUom": "EA", "poLineNumber": "1"}]
//!     }]
//! }"#;
//!
//! let outcome = validate_payload(Some(raw));
//! assert_eq!(outcome.status(), ResultStatus::MissingData);
//!
//! let result = outcome.to_script_result();
//! assert_eq!(
//!     result.error_message,
//!     "Pallet 1 missing palletNumber, Pallet 1 Item 1 missing or empty qty"
//! );
//! ```
//!
//! ## Required Fields
//!
//! - `totalPallets`: present (numeric zero is accepted)
//! - `pallets`: non-empty array
//! - per pallet: `palletNumber` present, `sscc` non-empty, `items` non-empty array
//! - per item: `qty` present, `vpn`, `ediUom`, `poLineNumber` non-empty
//!
//! Copyright (c) 2025 Ediflow Team
//! Licensed under the Apache-2.0 license

pub mod validation;

// Re-export commonly used types for convenience
pub use validation::{
    is_missing_payload, validate_document, validate_payload, validate_payloads_batch,
    PalletDocumentValidator, ResultStatus, Rule, SchemaValidator, ScriptResult,
    ValidationContext, ValidationError, ValidationErrors, ValidationHelpers,
    ValidationOutcome, ValidationResult,
};
