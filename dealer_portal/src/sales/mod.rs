//! Car-sale registration: drafts, validation and submission.

pub mod models;
pub mod sink;
pub mod validation;

pub use models::{
    PurchaseType, SaleDraft, SaleField, SaleRecord, UnknownPurchaseType, VEHICLE_CATALOG,
};
pub use sink::{LoggingSaleSink, RecordingSaleSink, SaleSink};
pub use validation::{
    BUYER_ID_LENGTH, INVALID_ID_MESSAGE, MISSING_FIELDS_MESSAGE, ValidationError,
    ValidationResult, is_valid_buyer_id, validate,
};
