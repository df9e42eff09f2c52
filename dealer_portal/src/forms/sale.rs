//! Sale registration form state.

use crate::{
    notification::Notification,
    sales::{SaleDraft, SaleField, SaleSink, validate},
};
use log::debug;

pub const SALE_REGISTERED_TITLE: &str = "Sale registered";
pub const SALE_REGISTERED_MESSAGE: &str = "The sale was registered successfully";

/// The sale draft being edited.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SaleForm {
    draft: SaleDraft,
}

impl SaleForm {
    pub fn new(seller_code: impl Into<String>) -> Self {
        Self {
            draft: SaleDraft::for_seller(seller_code),
        }
    }

    pub fn draft(&self) -> &SaleDraft {
        &self.draft
    }

    /// Replace the draft with one where `field` holds `value`.
    pub fn edit(&mut self, field: SaleField, value: &str) {
        self.draft = self.draft.with_field(field, value);
    }

    /// Update the seller code shown on the form.
    pub fn set_seller_code(&mut self, seller_code: impl Into<String>) {
        self.draft = SaleDraft {
            seller_code: seller_code.into(),
            ..self.draft.clone()
        };
    }

    /// Validate and submit the draft.
    ///
    /// On success the record goes to `sink` once and the form resets to an
    /// empty draft for `seller_code`. On failure nothing is submitted and
    /// the draft is kept for correction.
    pub fn submit(&mut self, seller_code: &str, sink: &mut dyn SaleSink) -> Notification {
        self.set_seller_code(seller_code);

        match validate(&self.draft) {
            Ok(record) => {
                sink.submit(&record);
                self.draft = SaleDraft::for_seller(seller_code);
                Notification::success(SALE_REGISTERED_TITLE, SALE_REGISTERED_MESSAGE)
            }
            Err(e) => {
                debug!("Sale rejected: {e}");
                Notification::error(e.title(), e.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        notification::NotificationKind,
        sales::{MISSING_FIELDS_MESSAGE, PurchaseType, RecordingSaleSink},
    };

    fn filled_form() -> SaleForm {
        let mut form = SaleForm::new("VEN001");
        form.edit(SaleField::Vehicle, "Honda Civic 2024");
        form.edit(SaleField::PurchaseType, "Cash");
        form.edit(SaleField::Amount, "90000");
        form.edit(SaleField::BuyerName, "Ana Ruiz");
        form.edit(SaleField::BuyerId, "12345678");
        form.edit(SaleField::BuyerContact, "987654321");
        form
    }

    #[test]
    fn test_valid_submit_resets_form() {
        let mut form = filled_form();
        let mut sink = RecordingSaleSink::default();

        let notification = form.submit("VEN001", &mut sink);

        assert_eq!(notification.kind, NotificationKind::Success);
        assert_eq!(sink.records.len(), 1);
        let record = &sink.records[0];
        assert_eq!(record.vehicle, "Honda Civic 2024");
        assert_eq!(record.purchase_type, PurchaseType::Cash);
        assert_eq!(record.seller_code, "VEN001");
        assert_eq!(form.draft(), &SaleDraft::for_seller("VEN001"));
    }

    #[test]
    fn test_seller_code_read_at_submit_time() {
        let mut form = filled_form();
        let mut sink = RecordingSaleSink::default();

        form.submit("VEN003", &mut sink);

        assert_eq!(sink.records[0].seller_code, "VEN003");
        assert_eq!(form.draft().seller_code, "VEN003");
    }

    #[test]
    fn test_missing_field_keeps_draft() {
        let mut form = filled_form();
        form.edit(SaleField::Vehicle, "");
        let before = form.draft().clone();
        let mut sink = RecordingSaleSink::default();

        let notification = form.submit("VEN001", &mut sink);

        assert!(notification.is_error());
        assert_eq!(notification.message, MISSING_FIELDS_MESSAGE);
        assert!(sink.records.is_empty());
        assert_eq!(form.draft(), &before);
    }

    #[test]
    fn test_invalid_id_notification() {
        let mut form = filled_form();
        form.edit(SaleField::BuyerId, "1234567");
        let mut sink = RecordingSaleSink::default();

        let notification = form.submit("VEN001", &mut sink);
        assert_eq!(notification.title, "Invalid buyer ID");
        assert!(sink.records.is_empty());
    }
}
