//! # Dealer Portal
//!
//! Session and sale-registration core of the Automotriz JJ employee portal.
//!
//! The crate holds everything a front end needs except HTTP and rendering:
//!
//! - [`auth`]: the token store, the [`auth::AuthApi`] seam to the remote
//!   service, and the [`auth::SessionManager`] state machine
//! - [`navigation`]: protected routing between the login view and the
//!   dashboard
//! - [`forms`]: login and sale form state
//! - [`sales`]: sale drafts, validation and submission sinks
//! - [`notification`]: the single modal notification
//! - [`portal`]: the [`Portal`] controller tying them together
//!
//! ## Example
//!
//! ```
//! use dealer_portal::sales::{SaleDraft, SaleField, ValidationError, validate};
//!
//! let draft = SaleDraft::for_seller("VEN001")
//!     .with_field(SaleField::Vehicle, "Mazda 3 2024")
//!     .with_field(SaleField::PurchaseType, "cash")
//!     .with_field(SaleField::Amount, "88000")
//!     .with_field(SaleField::BuyerName, "Ana Ruiz")
//!     .with_field(SaleField::BuyerId, "1234567")
//!     .with_field(SaleField::BuyerContact, "987654321");
//!
//! assert_eq!(validate(&draft), Err(ValidationError::InvalidId));
//! ```

pub mod auth;
pub mod forms;
pub mod navigation;
pub mod notification;
pub mod portal;
pub mod sales;

pub use auth::{AuthApi, SessionManager};
pub use navigation::{Route, View};
pub use notification::{Notification, NotificationKind};
pub use portal::Portal;
