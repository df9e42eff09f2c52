//! Authentication: token storage, the remote API seam and the session.
//!
//! The session is restored optimistically from the [`TokenStore`] on
//! startup, established by [`SessionManager::login`] and ended by
//! [`SessionManager::logout`] or by the API reporting
//! [`ApiEvent::SessionExpired`].
//!
//! ## Example
//!
//! ```
//! use dealer_portal::auth::{MemoryTokenStore, TokenStore};
//!
//! let store = MemoryTokenStore::new();
//! store.set("t1").unwrap();
//! assert_eq!(store.get().unwrap().as_deref(), Some("t1"));
//! ```

pub mod api;
pub mod errors;
pub mod models;
pub mod session;
pub mod store;

pub use api::{ApiEvent, ApiEventReceiver, ApiEventSender, AuthApi, event_channel};
pub use errors::{ApiError, ApiResult, ProfileError, StoreError, StoreResult};
pub use models::{Credentials, HealthStatus, TokenResponse, UserProfile, UserRef};
pub use session::{
    CONNECTION_ERROR_MESSAGE, INVALID_CREDENTIALS_MESSAGE, LoginOutcome, Session, SessionManager,
    SessionPhase,
};
pub use store::{FileTokenStore, MemoryTokenStore, TOKEN_FILE_NAME, TokenStore};
