//! Form state for the login and dashboard views.

pub mod login;
pub mod sale;

pub use login::{LoginField, LoginForm, MISSING_CREDENTIALS_MESSAGE};
pub use sale::{SALE_REGISTERED_MESSAGE, SALE_REGISTERED_TITLE, SaleForm};
