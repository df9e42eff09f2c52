//! Sale form validation.

use super::models::{SaleDraft, SaleRecord};
use thiserror::Error;

/// Length of a buyer's national ID.
pub const BUYER_ID_LENGTH: usize = 8;

pub const MISSING_FIELDS_MESSAGE: &str = "All fields are required";
pub const INVALID_ID_MESSAGE: &str = "Buyer ID must be exactly 8 digits";

/// Why a draft was rejected. Checks run in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("All fields are required")]
    MissingFields,

    #[error("Buyer ID must be exactly 8 digits")]
    InvalidId,
}

impl ValidationError {
    /// Title of the notification reporting this error.
    pub fn title(self) -> &'static str {
        match self {
            Self::MissingFields => "Incomplete form",
            Self::InvalidId => "Invalid buyer ID",
        }
    }
}

pub type ValidationResult = Result<SaleRecord, ValidationError>;

/// Validate a draft, short-circuiting on the first failed check.
///
/// Text values are trimmed in the resulting record.
pub fn validate(draft: &SaleDraft) -> ValidationResult {
    let required = [
        &draft.vehicle,
        &draft.amount,
        &draft.buyer_name,
        &draft.buyer_id,
        &draft.buyer_contact,
    ];
    let Some(purchase_type) = draft.purchase_type else {
        return Err(ValidationError::MissingFields);
    };
    if required.iter().any(|value| value.trim().is_empty()) {
        return Err(ValidationError::MissingFields);
    }

    let buyer_id = draft.buyer_id.trim();
    if !is_valid_buyer_id(buyer_id) {
        return Err(ValidationError::InvalidId);
    }

    Ok(SaleRecord {
        vehicle: draft.vehicle.trim().to_string(),
        purchase_type,
        amount: draft.amount.trim().to_string(),
        buyer_name: draft.buyer_name.trim().to_string(),
        buyer_id: buyer_id.to_string(),
        buyer_contact: draft.buyer_contact.trim().to_string(),
        seller_code: draft.seller_code.trim().to_string(),
    })
}

/// Exactly [`BUYER_ID_LENGTH`] ASCII decimal digits.
pub fn is_valid_buyer_id(id: &str) -> bool {
    id.chars().count() == BUYER_ID_LENGTH && id.chars().all(|c| c.is_ascii_digit())
}
