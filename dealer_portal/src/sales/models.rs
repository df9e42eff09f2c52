//! Sale registration data.

use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Vehicles offered by the registration form.
pub const VEHICLE_CATALOG: [&str; 5] = [
    "Toyota Corolla 2024",
    "Honda Civic 2024",
    "Nissan Sentra 2024",
    "Hyundai Elantra 2024",
    "Mazda 3 2024",
];

/// How the buyer pays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PurchaseType {
    Cash,
    Credit,
}

impl PurchaseType {
    pub const ALL: [PurchaseType; 2] = [PurchaseType::Cash, PurchaseType::Credit];
}

impl fmt::Display for PurchaseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cash => write!(f, "Cash"),
            Self::Credit => write!(f, "Credit"),
        }
    }
}

/// Error for an unrecognized purchase type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownPurchaseType(pub String);

impl fmt::Display for UnknownPurchaseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Unknown purchase type '{}'. Use 'cash' or 'credit'",
            self.0
        )
    }
}

impl std::error::Error for UnknownPurchaseType {}

impl FromStr for PurchaseType {
    type Err = UnknownPurchaseType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "cash" => Ok(Self::Cash),
            "credit" | "credito" | "crédito" => Ok(Self::Credit),
            _ => Err(UnknownPurchaseType(s.to_string())),
        }
    }
}

/// Editable fields of the sale form. The seller code is not editable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SaleField {
    Vehicle,
    PurchaseType,
    Amount,
    BuyerName,
    BuyerId,
    BuyerContact,
}

impl SaleField {
    /// Fields in form order.
    pub const ALL: [SaleField; 6] = [
        SaleField::Vehicle,
        SaleField::PurchaseType,
        SaleField::Amount,
        SaleField::BuyerName,
        SaleField::BuyerId,
        SaleField::BuyerContact,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Vehicle => "Vehicle",
            Self::PurchaseType => "Purchase type (Cash/Credit)",
            Self::Amount => "Amount",
            Self::BuyerName => "Buyer name",
            Self::BuyerId => "Buyer ID (8 digits)",
            Self::BuyerContact => "Buyer contact",
        }
    }

    /// Options for fields chosen from a fixed list.
    pub fn options(self) -> Option<Vec<&'static str>> {
        match self {
            Self::Vehicle => Some(VEHICLE_CATALOG.to_vec()),
            Self::PurchaseType => Some(vec!["Cash", "Credit"]),
            _ => None,
        }
    }
}

/// Sale form contents before validation.
///
/// Drafts are values: every edit produces a new draft through
/// [`SaleDraft::with_field`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SaleDraft {
    pub vehicle: String,
    pub purchase_type: Option<PurchaseType>,
    pub amount: String,
    pub buyer_name: String,
    pub buyer_id: String,
    pub buyer_contact: String,
    pub seller_code: String,
}

impl SaleDraft {
    /// An empty draft for the given seller.
    pub fn for_seller(seller_code: impl Into<String>) -> Self {
        Self {
            seller_code: seller_code.into(),
            ..Self::default()
        }
    }

    /// A copy of this draft with one field replaced.
    ///
    /// An unrecognized purchase type clears the selection.
    #[must_use]
    pub fn with_field(&self, field: SaleField, value: &str) -> Self {
        let mut next = self.clone();
        match field {
            SaleField::Vehicle => next.vehicle = value.to_string(),
            SaleField::PurchaseType => next.purchase_type = value.parse().ok(),
            SaleField::Amount => next.amount = value.to_string(),
            SaleField::BuyerName => next.buyer_name = value.to_string(),
            SaleField::BuyerId => next.buyer_id = value.to_string(),
            SaleField::BuyerContact => next.buyer_contact = value.to_string(),
        }
        next
    }

    /// Current value of a field as text.
    pub fn value(&self, field: SaleField) -> String {
        match field {
            SaleField::Vehicle => self.vehicle.clone(),
            SaleField::PurchaseType => self
                .purchase_type
                .map(|kind| kind.to_string())
                .unwrap_or_default(),
            SaleField::Amount => self.amount.clone(),
            SaleField::BuyerName => self.buyer_name.clone(),
            SaleField::BuyerId => self.buyer_id.clone(),
            SaleField::BuyerContact => self.buyer_contact.clone(),
        }
    }
}

/// A validated sale, ready for submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleRecord {
    pub vehicle: String,
    pub purchase_type: PurchaseType,
    pub amount: String,
    pub buyer_name: String,
    pub buyer_id: String,
    pub buyer_contact: String,
    pub seller_code: String,
}
