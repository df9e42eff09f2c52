//! The application controller front ends drive.
//!
//! [`Portal`] owns the session, navigation, both forms and the active
//! notification, and reacts to [`ApiEvent`]s raised by the HTTP layer.

use crate::{
    auth::{
        ApiEvent, ApiEventReceiver, ApiResult, AuthApi, HealthStatus, LoginOutcome, ProfileError,
        Session, SessionManager, UserProfile,
    },
    forms::{LoginForm, SaleForm},
    navigation::{Navigator, View},
    notification::{Notification, NotificationSlot},
    sales::SaleSink,
};
use log::{info, warn};
use tokio::sync::mpsc::error::TryRecvError;

pub struct Portal<A> {
    session: SessionManager<A>,
    navigator: Navigator,
    login_form: LoginForm,
    sale_form: SaleForm,
    notification: NotificationSlot,
    events: ApiEventReceiver,
    sink: Box<dyn SaleSink>,
    expired: bool,
}

impl<A: AuthApi> Portal<A> {
    /// Assemble a portal. `events` must be the receiver paired with the
    /// sender given to the API client.
    pub fn new(
        session: SessionManager<A>,
        events: ApiEventReceiver,
        sink: Box<dyn SaleSink>,
    ) -> Self {
        Self {
            session,
            navigator: Navigator::new(),
            login_form: LoginForm::new(),
            sale_form: SaleForm::default(),
            notification: NotificationSlot::default(),
            events,
            sink,
            expired: false,
        }
    }

    /// Restore the session and pick the first view.
    pub fn start(&mut self) -> View {
        self.session.initialize();
        self.sale_form.set_seller_code(self.session.seller_code());
        self.navigator.sync(self.session.is_authenticated())
    }

    pub fn view(&self) -> View {
        self.navigator.view()
    }

    pub fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    pub fn session(&self) -> &Session {
        self.session.session()
    }

    pub fn session_manager(&self) -> &SessionManager<A> {
        &self.session
    }

    pub fn api(&self) -> &A {
        self.session.api()
    }

    pub fn login_form(&self) -> &LoginForm {
        &self.login_form
    }

    pub fn login_form_mut(&mut self) -> &mut LoginForm {
        &mut self.login_form
    }

    pub fn sale_form(&self) -> &SaleForm {
        &self.sale_form
    }

    pub fn sale_form_mut(&mut self) -> &mut SaleForm {
        &mut self.sale_form
    }

    pub fn notification(&self) -> Option<&Notification> {
        self.notification.active()
    }

    pub fn dismiss_notification(&mut self) -> Option<Notification> {
        self.notification.dismiss()
    }

    /// Submit the login form. `None` means the presence check failed.
    pub async fn submit_login(&mut self) -> Option<LoginOutcome> {
        let outcome = self.login_form.submit(&mut self.session).await;
        // A rejected login also answers 401.
        self.process_events();

        if outcome.as_ref().is_some_and(LoginOutcome::is_success) {
            self.login_form = LoginForm::new();
            self.sale_form.set_seller_code(self.session.seller_code());
        }
        self.navigator.sync(self.session.is_authenticated());
        outcome
    }

    pub fn logout(&mut self) -> View {
        self.session.logout();
        self.sale_form = SaleForm::default();
        self.notification.dismiss();
        self.navigator.sync(false)
    }

    /// Validate and submit the sale form, showing the result as the active
    /// notification.
    pub fn submit_sale(&mut self) -> Notification {
        let seller_code = self.session.seller_code().to_string();
        let notification = self.sale_form.submit(&seller_code, self.sink.as_mut());
        self.notification.show(notification.clone());
        notification
    }

    /// Fetch the user's profile and refresh the seller code on the form.
    pub async fn refresh_profile(&mut self) -> Result<UserProfile, ProfileError> {
        let result = self.session.refresh_profile().await.cloned();
        self.process_events();
        if result.is_ok() {
            self.sale_form.set_seller_code(self.session.seller_code());
        }
        result
    }

    pub async fn check_health(&mut self) -> ApiResult<HealthStatus> {
        let result = self.session.api().health().await;
        self.process_events();
        result
    }

    /// Whether a signed-in session was ended by the server since the last
    /// call. Reading the flag clears it.
    pub fn take_expired(&mut self) -> bool {
        std::mem::take(&mut self.expired)
    }

    /// Handle every pending [`ApiEvent`]. Returns how many were handled.
    ///
    /// Only a rejection that ends an authenticated session raises the flag
    /// read by [`Portal::take_expired`]. A 401 on the login call does not.
    pub fn process_events(&mut self) -> usize {
        let mut handled = 0;
        loop {
            match self.events.try_recv() {
                Ok(ApiEvent::SessionExpired) => {
                    handled += 1;
                    self.expired |= self.session.is_authenticated();
                    self.session.expire();
                    self.login_form.clear_password();
                    self.sale_form = SaleForm::default();
                    self.navigator.force_login();
                    info!("Session rejected by the server, showing login");
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    if handled == 0 {
                        warn!("API event channel closed");
                    }
                    break;
                }
            }
        }
        handled
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        auth::{
            ApiError, MemoryTokenStore, TokenStore,
            api::{
                event_channel,
                stub::{StubApi, token},
            },
        },
        forms::LoginField,
        navigation::Route,
        notification::NotificationKind,
        sales::{RecordingSaleSink, SaleDraft, SaleField, SaleRecord},
    };
    use std::sync::{Arc, Mutex};

    /// Sink whose records stay observable after it is boxed.
    #[derive(Clone, Default)]
    struct SharedSink(Arc<Mutex<RecordingSaleSink>>);

    impl SaleSink for SharedSink {
        fn submit(&mut self, record: &SaleRecord) {
            self.0.lock().unwrap().submit(record);
        }
    }

    impl SharedSink {
        fn records(&self) -> Vec<SaleRecord> {
            self.0.lock().unwrap().records.clone()
        }
    }

    fn portal(store: Arc<MemoryTokenStore>) -> (Portal<StubApi>, Arc<StubApi>, SharedSink) {
        let (tx, rx) = event_channel();
        let api = Arc::new(StubApi::with_interceptor(store.clone(), tx));
        let sink = SharedSink::default();
        let session = SessionManager::new(api.clone(), store);
        (
            Portal::new(session, rx, Box::new(sink.clone())),
            api,
            sink,
        )
    }

    fn fill_sale(portal: &mut Portal<StubApi>) {
        let form = portal.sale_form_mut();
        form.edit(SaleField::Vehicle, "Nissan Sentra 2024");
        form.edit(SaleField::PurchaseType, "Credit");
        form.edit(SaleField::Amount, "75000");
        form.edit(SaleField::BuyerName, "Carlos Soto");
        form.edit(SaleField::BuyerId, "44556677");
        form.edit(SaleField::BuyerContact, "912345678");
    }

    #[test]
    fn test_start_signed_out() {
        let (mut portal, _, _) = portal(Arc::new(MemoryTokenStore::new()));
        assert_eq!(portal.start(), View::Login);
        assert!(!portal.session().is_authenticated());
    }

    #[test]
    fn test_start_with_stored_token() {
        let (mut portal, _, _) = portal(Arc::new(MemoryTokenStore::with_token("t0")));
        assert_eq!(portal.start(), View::Dashboard);
    }

    #[tokio::test]
    async fn test_login_moves_to_dashboard() {
        let store = Arc::new(MemoryTokenStore::new());
        let (mut portal, api, _) = portal(store.clone());
        api.push_login(token("t1"));
        portal.start();

        portal.login_form_mut().edit(LoginField::Username, "admin");
        portal.login_form_mut().edit(LoginField::Password, "admin123");
        let outcome = portal.submit_login().await.unwrap();

        assert!(outcome.is_success());
        assert_eq!(portal.view(), View::Dashboard);
        assert_eq!(store.get().unwrap().as_deref(), Some("t1"));
        assert_eq!(portal.login_form().value(LoginField::Password), "");
    }

    #[tokio::test]
    async fn test_rejected_login_stays_on_login() {
        let (mut portal, api, _) = portal(Arc::new(MemoryTokenStore::new()));
        api.push_login(Err(ApiError::Unauthorized {
            detail: Some("Incorrect username or password".to_string()),
        }));
        portal.start();

        portal.login_form_mut().edit(LoginField::Username, "admin");
        portal.login_form_mut().edit(LoginField::Password, "bad");
        portal.submit_login().await;

        assert_eq!(portal.view(), View::Login);
        assert_eq!(
            portal.login_form().error(),
            Some("Incorrect username or password")
        );
    }

    #[tokio::test]
    async fn test_expired_token_forces_login() {
        let store = Arc::new(MemoryTokenStore::with_token("stale"));
        let (mut portal, api, _) = portal(store.clone());
        api.push_profile(Err(ApiError::Unauthorized { detail: None }));
        assert_eq!(portal.start(), View::Dashboard);

        let result = portal.refresh_profile().await;

        assert!(result.is_err());
        assert_eq!(portal.view(), View::Login);
        assert_eq!(portal.navigator().route(), Route::Login);
        assert!(!portal.session().is_authenticated());
        assert_eq!(store.get().unwrap(), None);
    }

    #[tokio::test]
    async fn test_expiry_is_reported_once() {
        let (mut portal, api, _) = portal(Arc::new(MemoryTokenStore::with_token("stale")));
        api.push_profile(Err(ApiError::Unauthorized { detail: None }));
        portal.start();
        assert!(!portal.take_expired());

        let _ = portal.refresh_profile().await;

        // Drained inside the call, so nothing is left for the front end.
        assert_eq!(portal.process_events(), 0);
        assert!(portal.take_expired());
        assert!(!portal.take_expired());
    }

    #[tokio::test]
    async fn test_rejected_login_is_not_an_expiry() {
        let (mut portal, api, _) = portal(Arc::new(MemoryTokenStore::new()));
        api.push_login(Err(ApiError::Unauthorized { detail: None }));
        portal.start();

        portal.login_form_mut().edit(LoginField::Username, "admin");
        portal.login_form_mut().edit(LoginField::Password, "bad");
        portal.submit_login().await;

        assert_eq!(portal.view(), View::Login);
        assert!(!portal.take_expired());
    }

    #[test]
    fn test_invalid_sale_shows_error_without_submitting() {
        let (mut portal, _, sink) = portal(Arc::new(MemoryTokenStore::with_token("t1")));
        portal.start();
        fill_sale(&mut portal);
        portal.sale_form_mut().edit(SaleField::Vehicle, "");

        let notification = portal.submit_sale();

        assert_eq!(notification.kind, NotificationKind::Error);
        assert_eq!(notification.message, "All fields are required");
        assert!(sink.records().is_empty());
        assert_eq!(portal.notification(), Some(&notification));
    }

    #[tokio::test]
    async fn test_valid_sale_submits_once_and_resets() {
        let store = Arc::new(MemoryTokenStore::with_token("t1"));
        let (mut portal, api, sink) = portal(store);
        api.push_profile(Ok(UserProfile {
            username: "CIRO".to_string(),
            seller_code: Some("VEN002".to_string()),
            ..UserProfile::default()
        }));
        portal.start();
        portal.refresh_profile().await.unwrap();
        fill_sale(&mut portal);

        let kind = portal.submit_sale().kind;

        assert_eq!(kind, NotificationKind::Success);
        let records = sink.records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].buyer_name, "Carlos Soto");
        assert_eq!(records[0].seller_code, "VEN002");
        assert_eq!(portal.sale_form().draft(), &SaleDraft::for_seller("VEN002"));
    }

    #[test]
    fn test_new_notification_replaces_old() {
        let (mut portal, _, _) = portal(Arc::new(MemoryTokenStore::with_token("t1")));
        portal.start();

        portal.submit_sale();
        fill_sale(&mut portal);
        portal.submit_sale();

        assert_eq!(
            portal.notification().map(|n| n.kind),
            Some(NotificationKind::Success)
        );
        portal.dismiss_notification();
        assert!(portal.notification().is_none());
    }

    #[test]
    fn test_logout_returns_to_login() {
        let store = Arc::new(MemoryTokenStore::with_token("t1"));
        let (mut portal, _, _) = portal(store.clone());
        portal.start();

        assert_eq!(portal.logout(), View::Login);
        assert_eq!(portal.logout(), View::Login);
        assert_eq!(store.get().unwrap(), None);
    }
}
