//! Integration tests for the portal controller.
//!
//! Drives login, sale registration and session expiry through the public
//! API with a scripted authentication backend.

use async_trait::async_trait;
use dealer_portal::{
    AuthApi, Portal, SessionManager, View,
    auth::{
        ApiError, ApiEvent, ApiEventSender, ApiResult, Credentials, HealthStatus,
        MemoryTokenStore, TokenResponse, TokenStore, UserProfile, event_channel,
    },
    forms::{LoginField, MISSING_CREDENTIALS_MESSAGE},
    navigation::Route,
    notification::NotificationKind,
    sales::{PurchaseType, SaleField, SaleRecord, SaleSink},
};
use std::sync::{Arc, Mutex};

/// Accepts one username/password pair and answers `/auth/me` with a
/// fixed profile while the expected token is stored.
struct ScriptedApi {
    username: &'static str,
    password: &'static str,
    token: &'static str,
    store: Arc<dyn TokenStore>,
    events: ApiEventSender,
    calls: Mutex<usize>,
}

impl ScriptedApi {
    fn calls(&self) -> usize {
        *self.calls.lock().unwrap()
    }

    fn reject(&self) -> ApiError {
        self.store.clear().unwrap();
        self.events.send(ApiEvent::SessionExpired).unwrap();
        ApiError::Unauthorized {
            detail: Some("Could not validate credentials".to_string()),
        }
    }
}

#[async_trait]
impl AuthApi for ScriptedApi {
    async fn login(&self, credentials: &Credentials) -> ApiResult<TokenResponse> {
        *self.calls.lock().unwrap() += 1;
        if credentials.username == self.username && credentials.password == self.password {
            Ok(TokenResponse {
                access_token: Some(self.token.to_string()),
                token_type: Some("bearer".to_string()),
            })
        } else {
            Err(ApiError::Unauthorized {
                detail: Some("Incorrect username or password".to_string()),
            })
        }
    }

    async fn profile(&self) -> ApiResult<UserProfile> {
        *self.calls.lock().unwrap() += 1;
        if self.store.get().unwrap().as_deref() != Some(self.token) {
            return Err(self.reject());
        }
        Ok(UserProfile {
            username: self.username.to_string(),
            full_name: Some("Carla Rojas".to_string()),
            email: None,
            seller_code: Some("V-001".to_string()),
            branch: Some("Centro".to_string()),
            role: None,
            message: None,
        })
    }

    async fn health(&self) -> ApiResult<HealthStatus> {
        Ok(HealthStatus {
            status: "healthy".to_string(),
            service: None,
            version: None,
        })
    }
}

#[derive(Clone, Default)]
struct SharedSink(Arc<Mutex<Vec<SaleRecord>>>);

impl SaleSink for SharedSink {
    fn submit(&mut self, record: &SaleRecord) {
        self.0.lock().unwrap().push(record.clone());
    }
}

struct Harness {
    portal: Portal<ScriptedApi>,
    api: Arc<ScriptedApi>,
    store: Arc<dyn TokenStore>,
    sink: SharedSink,
}

fn harness(store: MemoryTokenStore) -> Harness {
    let store: Arc<dyn TokenStore> = Arc::new(store);
    let (tx, rx) = event_channel();
    let api = Arc::new(ScriptedApi {
        username: "admin",
        password: "admin123",
        token: "t1",
        store: store.clone(),
        events: tx,
        calls: Mutex::new(0),
    });
    let sink = SharedSink::default();
    let session = SessionManager::new(api.clone(), store.clone());
    let mut portal = Portal::new(session, rx, Box::new(sink.clone()));
    portal.start();
    Harness {
        portal,
        api,
        store,
        sink,
    }
}

async fn login(portal: &mut Portal<ScriptedApi>, username: &str, password: &str) {
    portal.login_form_mut().edit(LoginField::Username, username);
    portal.login_form_mut().edit(LoginField::Password, password);
    portal.submit_login().await;
}

fn fill_sale(portal: &mut Portal<ScriptedApi>, buyer_id: &str) {
    let form = portal.sale_form_mut();
    form.edit(SaleField::Vehicle, "Honda Civic 2024");
    form.edit(SaleField::PurchaseType, "Crédito");
    form.edit(SaleField::Amount, "32000");
    form.edit(SaleField::BuyerName, "Luis Vega");
    form.edit(SaleField::BuyerId, buyer_id);
    form.edit(SaleField::BuyerContact, "+56 9 5555 0101");
}

// ============================================================================
// Startup Tests
// ============================================================================

#[tokio::test]
async fn test_startup_without_token_shows_login() {
    let h = harness(MemoryTokenStore::new());
    assert_eq!(h.portal.view(), View::Login);
    assert_eq!(h.portal.navigator().route(), Route::Login);
    assert!(!h.portal.session().is_authenticated());
}

#[tokio::test]
async fn test_startup_with_token_trusts_it() {
    let h = harness(MemoryTokenStore::with_token("t1"));
    assert_eq!(h.portal.view(), View::Dashboard);
    assert_eq!(h.portal.session().user().unwrap().token, "t1");
    assert_eq!(h.api.calls(), 0, "restore must not contact the server");
}

// ============================================================================
// Login Tests
// ============================================================================

#[tokio::test]
async fn test_login_then_register_sale() {
    let mut h = harness(MemoryTokenStore::new());

    login(&mut h.portal, "admin", "admin123").await;
    assert_eq!(h.portal.view(), View::Dashboard);
    assert_eq!(h.store.get().unwrap().as_deref(), Some("t1"));

    h.portal.refresh_profile().await.unwrap();
    fill_sale(&mut h.portal, "87654321");
    let notification = h.portal.submit_sale();

    assert_eq!(notification.kind, NotificationKind::Success);
    let records = h.sink.0.lock().unwrap().clone();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].purchase_type, PurchaseType::Credit);
    assert_eq!(records[0].buyer_id, "87654321");
    assert_eq!(records[0].seller_code, "V-001");

    let draft = h.portal.sale_form().draft();
    assert_eq!(draft.vehicle, "");
    assert_eq!(draft.seller_code, "V-001");
}

#[tokio::test]
async fn test_missing_credentials_skip_the_server() {
    let mut h = harness(MemoryTokenStore::new());
    login(&mut h.portal, "admin", "").await;

    assert_eq!(h.api.calls(), 0);
    assert_eq!(
        h.portal.login_form().error(),
        Some(MISSING_CREDENTIALS_MESSAGE)
    );
}

#[tokio::test]
async fn test_wrong_password_keeps_login_view() {
    let mut h = harness(MemoryTokenStore::new());
    login(&mut h.portal, "admin", "nope").await;

    assert_eq!(h.portal.view(), View::Login);
    assert_eq!(
        h.portal.login_form().error(),
        Some("Incorrect username or password")
    );
    assert_eq!(h.store.get().unwrap(), None);
}

// ============================================================================
// Sale Validation Tests
// ============================================================================

#[tokio::test]
async fn test_short_buyer_id_is_rejected() {
    let mut h = harness(MemoryTokenStore::with_token("t1"));
    fill_sale(&mut h.portal, "1234567");

    let notification = h.portal.submit_sale();

    assert_eq!(notification.kind, NotificationKind::Error);
    assert_eq!(notification.message, "Buyer ID must be exactly 8 digits");
    assert!(h.sink.0.lock().unwrap().is_empty());
    assert_eq!(h.portal.sale_form().draft().buyer_id, "1234567");
}

#[tokio::test]
async fn test_empty_field_is_rejected() {
    let mut h = harness(MemoryTokenStore::with_token("t1"));
    fill_sale(&mut h.portal, "12345678");
    h.portal.sale_form_mut().edit(SaleField::BuyerContact, "  ");

    let notification = h.portal.submit_sale();

    assert_eq!(notification.message, "All fields are required");
    assert!(h.sink.0.lock().unwrap().is_empty());
    assert!(h.portal.notification().is_some());
}

// ============================================================================
// Session Expiry Tests
// ============================================================================

#[tokio::test]
async fn test_stale_token_returns_to_login() {
    let mut h = harness(MemoryTokenStore::with_token("stale"));
    assert_eq!(h.portal.view(), View::Dashboard);

    assert!(h.portal.refresh_profile().await.is_err());

    assert_eq!(h.portal.view(), View::Login);
    assert_eq!(h.store.get().unwrap(), None);
    assert!(!h.portal.session().is_authenticated());
}

#[tokio::test]
async fn test_logout_is_idempotent() {
    let mut h = harness(MemoryTokenStore::with_token("t1"));

    assert_eq!(h.portal.logout(), View::Login);
    assert_eq!(h.portal.logout(), View::Login);
    assert_eq!(h.store.get().unwrap(), None);
}
