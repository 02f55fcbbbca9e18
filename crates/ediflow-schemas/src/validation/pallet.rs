//! Required-field validation for pallet (ASN) documents
//!
//! The document is walked top-down (header, pallets, items) and every
//! violation is recorded in traversal order. Positions in messages are
//! 1-based. An invalid `pallets` array suppresses all pallet-level checks;
//! an invalid `items` array suppresses item checks for that pallet only.
//!
//! Copyright (c) 2025 Ediflow Team
//! Licensed under the Apache-2.0 license

use crate::validation::base::{SchemaValidator, ValidationContext, ValidationHelpers};
use crate::validation::error::{Rule, ValidationError, ValidationErrors};
use serde_json::Value;
use tracing::trace;

/// Item fields checked for truthiness, in reporting order after `qty`
const ITEM_NON_EMPTY_FIELDS: [&str; 3] = ["vpn", "ediUom", "poLineNumber"];

/// Validator for the header → pallets → items hierarchy
#[derive(Debug, Clone, Copy, Default)]
pub struct PalletDocumentValidator;

impl PalletDocumentValidator {
    pub fn new() -> Self {
        Self
    }

    fn validate_header(&self, document: &Value, ctx: &ValidationContext, errors: &mut ValidationErrors) {
        ValidationHelpers::require(errors, document, "totalPallets", Rule::Present, ctx, || {
            "Missing totalPallets field in JSON".to_string()
        });
    }

    fn validate_pallet(
        &self,
        pallet: &Value,
        pallet_num: usize,
        ctx: &ValidationContext,
        errors: &mut ValidationErrors,
    ) {
        // palletNumber is an identity check: null/absent only, "" passes
        if matches!(pallet.get("palletNumber"), None | Some(Value::Null)) {
            errors.add(ValidationError::new(
                ctx.child("palletNumber").path,
                Rule::Present,
                format!("Pallet {} missing palletNumber", pallet_num),
            ));
        }

        ValidationHelpers::require(errors, pallet, "sscc", Rule::NonEmpty, ctx, || {
            format!("Pallet {} missing or empty sscc", pallet_num)
        });

        let items_ctx = ctx.child("items");
        match ValidationHelpers::non_empty_array(pallet.get("items")) {
            None => errors.add(ValidationError::new(
                items_ctx.path,
                Rule::NonEmptyArray,
                format!("Pallet {} missing or empty items array", pallet_num),
            )),
            Some(items) => {
                for (j, item) in items.iter().enumerate() {
                    self.validate_item(item, pallet_num, j + 1, &items_ctx.child_index(j), errors);
                }
            }
        }
    }

    fn validate_item(
        &self,
        item: &Value,
        pallet_num: usize,
        item_num: usize,
        ctx: &ValidationContext,
        errors: &mut ValidationErrors,
    ) {
        ValidationHelpers::require(errors, item, "qty", Rule::Present, ctx, || {
            format!("Pallet {} Item {} missing or empty qty", pallet_num, item_num)
        });

        for field in ITEM_NON_EMPTY_FIELDS {
            ValidationHelpers::require(errors, item, field, Rule::NonEmpty, ctx, || {
                format!("Pallet {} Item {} missing or empty {}", pallet_num, item_num, field)
            });
        }
    }
}

impl SchemaValidator for PalletDocumentValidator {
    type Input = Value;

    fn collect_errors_with_context(&self, document: &Value, ctx: &ValidationContext) -> ValidationErrors {
        let mut errors = ValidationErrors::new();

        self.validate_header(document, ctx, &mut errors);

        let pallets_ctx = ctx.child("pallets");
        match ValidationHelpers::non_empty_array(document.get("pallets")) {
            None => errors.add(ValidationError::new(
                pallets_ctx.path,
                Rule::NonEmptyArray,
                "Missing or empty pallets array in JSON",
            )),
            Some(pallets) => {
                trace!(count = pallets.len(), "Validating pallets");
                for (i, pallet) in pallets.iter().enumerate() {
                    self.validate_pallet(pallet, i + 1, &pallets_ctx.child_index(i), &mut errors);
                }
            }
        }

        errors
    }
}
