//! Desk Controller
//!
//! The application context object: turns user actions into requests,
//! applies push events to the state mirror and feeds the notifier.
//!
//! An action keeps its control busy for the lifetime of exactly one
//! request and reports the outcome to the log and a toast. Work the view
//! layer has to schedule is handed back as a [`Followup`].

use std::rc::Rc;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::activity::{LogLevel, ToastKind, ToastSurface};
use crate::api::{ApiAck, AuctionApi, AuctionsResponse, BidArgs, LoginArgs, SettingsArgs};
use crate::config::DeskConfig;
use crate::error::ApiError;
use crate::push::{OutboundEvent, PushEmitter, PushEvent};
use crate::render::format_money;
use crate::store::{
    BidForm, Control, Modal, RefreshTicket, SettingsForm, StateCell, StatusBadge, StatusKind,
};

/// Work left for the view layer after an action or push event
#[derive(Debug, Clone, PartialEq)]
pub enum Followup {
    Refresh,
    RefreshAfter(Duration),
    /// Put the originating auto-bid checkbox back to `checked`
    RevertToggle { domain: String, checked: bool },
}

/// Request kinds, for uniform failure reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Login,
    Refresh,
    Bid,
    Settings,
    AutoBid,
}

impl Action {
    fn label(self) -> &'static str {
        match self {
            Action::Login => "Login",
            Action::Refresh => "Refresh",
            Action::Bid => "Bid",
            Action::Settings => "Settings update",
            Action::AutoBid => "Auto-bid update",
        }
    }

    fn failure_title(self) -> &'static str {
        match self {
            Action::Bid => "Bid failed",
            _ => "Error",
        }
    }
}

pub struct Desk<A, E, S> {
    api: Rc<A>,
    emitter: E,
    state: S,
    config: Rc<DeskConfig>,
}

impl<A, E: Clone, S: Clone> Clone for Desk<A, E, S> {
    fn clone(&self) -> Self {
        Self {
            api: Rc::clone(&self.api),
            emitter: self.emitter.clone(),
            state: self.state.clone(),
            config: Rc::clone(&self.config),
        }
    }
}

impl<A, E, S> Desk<A, E, S>
where
    A: AuctionApi,
    E: PushEmitter,
    S: StateCell,
{
    pub fn new(api: A, emitter: E, state: S, config: DeskConfig) -> Self {
        Self { api: Rc::new(api), emitter, state, config: Rc::new(config) }
    }

    /// Monitoring controls are usable (monitor page: after a confirmed login)
    pub fn monitoring_enabled(&self) -> bool {
        self.state.with_state(|s| s.monitoring_enabled(self.config.variant))
    }

    // ========================
    // Notifier
    // ========================

    pub fn log(&self, message: impl Into<String>, level: LogLevel) {
        let message = message.into();
        let time = chrono::Local::now().format(self.config.log_time_format).to_string();
        debug!(level = level.css_class(), %message, "activity");
        self.state.update_state(|s| {
            s.activity.push(time, message, level);
        });
    }

    pub fn toast(&self, title: impl Into<String>, message: impl Into<String>, kind: ToastKind) {
        let duration = self.config.toast_duration;
        self.state.update_state(|s| {
            s.show_toast(ToastSurface::General, title.into(), message.into(), kind, duration)
        });
    }

    fn auto_bid_toast(&self, domain: &str, amount: f64) {
        let duration = self.config.auto_bid_toast_duration;
        let message = format!("Auto-bid of ${amount} placed on {domain}!");
        self.state.update_state(|s| {
            s.show_toast(ToastSurface::AutoBid, "Auto-bid".into(), message, ToastKind::Success, duration)
        });
    }

    pub fn dismiss_toast(&self, surface: ToastSurface, id: u64) {
        self.state.update_state(|s| s.dismiss_toast(surface, id));
    }

    fn report_failure(&self, action: Action, err: &ApiError) {
        warn!(action = action.label(), error = %err, "request failed");
        self.log(format!("{} failed: {err}", action.label()), LogLevel::Error);
        let fallback = format!("{} request failed.", action.label());
        self.toast(action.failure_title(), err.user_message(&fallback), ToastKind::Error);
    }

    fn set_busy(&self, control: Control, busy: bool) {
        self.state.update_state(|s| s.busy.set(control, busy));
    }

    fn set_status(&self, text: &str, kind: StatusKind) {
        self.state.update_state(|s| s.status = StatusBadge::new(text, kind));
    }

    // ========================
    // Lifecycle
    // ========================

    /// Page start. The dashboard greets and loads right away; the monitor
    /// page waits for a login.
    pub fn start(&self) -> Option<Followup> {
        info!(variant = ?self.config.variant, "desk started");
        if !self.config.variant.enforces_ceiling() {
            return None;
        }
        self.log("Welcome to the auction dashboard!", LogLevel::Success);
        self.log("Start monitoring to follow live auctions.", LogLevel::Info);
        Some(Followup::Refresh)
    }

    pub fn welcome(&self) {
        self.toast("Welcome!", "Your domain auction dashboard is ready.", ToastKind::Success);
    }

    /// Periodic refresh tick; only refreshes while monitoring.
    pub fn periodic_tick(&self) -> Option<Followup> {
        self.state.with_state(|s| s.is_monitoring).then_some(Followup::Refresh)
    }

    // ========================
    // Actions
    // ========================

    pub async fn login(&self, email: &str, password: &str) {
        let (email, password) = (email.trim(), password.trim());
        if email.is_empty() || password.is_empty() {
            self.toast("Error", "Enter your email and password.", ToastKind::Error);
            return;
        }

        self.set_busy(Control::Login, true);
        let result = self
            .api
            .login(&LoginArgs { email, password })
            .await
            .and_then(ApiAck::into_result);
        match result {
            // Accepted for processing; the outcome arrives as `login_result`
            Ok(_) => self.log("Signing in...", LogLevel::Info),
            Err(err) => self.report_failure(Action::Login, &err),
        }
        self.set_busy(Control::Login, false);
    }

    pub fn toggle_monitoring(&self) {
        if !self.monitoring_enabled() {
            self.toast("Error", "Sign in first.", ToastKind::Error);
            return;
        }
        let event = if self.state.with_state(|s| s.is_monitoring) {
            OutboundEvent::StopMonitoring
        } else {
            OutboundEvent::StartMonitoring
        };
        debug!(event = event.name(), "emit");
        self.emitter.emit(event);
    }

    pub async fn refresh_auctions(&self) {
        if self.config.variant.requires_login() && !self.state.with_state(|s| s.is_logged_in) {
            self.toast("Error", "Sign in first.", ToastKind::Error);
            return;
        }

        let mut ticket = RefreshTicket::default();
        self.state.update_state(|s| ticket = s.begin_refresh());
        let result = self.api.list_auctions().await.and_then(AuctionsResponse::into_result);
        match result {
            Ok(listing) => {
                let enforces_ceiling = self.config.variant.enforces_ceiling();
                let mut applied = false;
                self.state.update_state(|s| {
                    if let (true, Some(limit)) = (enforces_ceiling, listing.max_bid_limit) {
                        s.bid_ceiling = limit;
                    }
                    applied = s.finish_refresh(ticket, Some(listing.items));
                });
                if applied {
                    self.log("Auction list refreshed.", LogLevel::Info);
                } else {
                    debug!(seq = ticket.seq, "discarding stale auction list");
                }
            }
            Err(err) => {
                self.state.update_state(|s| {
                    s.finish_refresh(ticket, None);
                });
                self.report_failure(Action::Refresh, &err);
            }
        }
    }

    pub fn open_bid_modal(&self, domain: &str) {
        let step = self.config.bid_step;
        let enforces_ceiling = self.config.variant.enforces_ceiling();
        self.state.update_state(|s| {
            let Some(current_bid) = s.item(domain).map(|item| item.current_bid) else { return };
            s.modal = Some(Modal::Bid(BidForm {
                domain: domain.to_string(),
                current_bid,
                amount: format!("{:.2}", current_bid + step),
                ceiling: enforces_ceiling.then_some(s.bid_ceiling),
            }));
        });
    }

    pub fn open_settings_modal(&self, domain: &str) {
        let enforces_ceiling = self.config.variant.enforces_ceiling();
        self.state.update_state(|s| {
            let Some(item) = s.item(domain) else { return };
            let max_bid = if item.max_bid > 0.0 || enforces_ceiling {
                item.max_bid.to_string()
            } else {
                String::new()
            };
            let form = SettingsForm {
                domain: domain.to_string(),
                max_bid,
                auto_bid: item.auto_bid_enabled,
                ceiling: enforces_ceiling.then_some(s.bid_ceiling),
            };
            s.modal = Some(Modal::Settings(form));
        });
    }

    pub fn close_modal(&self) {
        self.state.update_state(|s| s.modal = None);
    }

    pub async fn submit_bid(&self, domain: &str, amount: &str) -> Option<Followup> {
        let amount = match parse_amount(amount) {
            Some(amount) if amount > 0.0 && !domain.is_empty() => amount,
            _ => {
                self.toast("Error", "Enter a valid bid.", ToastKind::Error);
                return None;
            }
        };
        if self.config.variant.enforces_ceiling() {
            let ceiling = self.state.with_state(|s| s.bid_ceiling);
            if amount > ceiling {
                self.toast("Error", format!("Bid exceeds the limit (${ceiling})."), ToastKind::Error);
                return None;
            }
        }

        self.set_busy(Control::SubmitBid, true);
        let result = self
            .api
            .place_bid(&BidArgs { domain_name: domain, bid_amount: amount })
            .await
            .and_then(ApiAck::into_result);
        let followup = match result {
            Ok(message) => {
                self.log(format!("Bid of {} placed on {domain}.", format_money(amount)), LogLevel::Success);
                self.toast("Bid placed", message, ToastKind::Success);
                self.state.update_state(|s| s.close_bid_modal());
                // Give the server time to settle before re-reading
                Some(Followup::RefreshAfter(self.config.bid_settle_delay))
            }
            Err(err) => {
                self.report_failure(Action::Bid, &err);
                None
            }
        };
        self.set_busy(Control::SubmitBid, false);
        followup
    }

    pub async fn save_settings(&self, domain: &str, max_bid: &str, auto_bid: bool) -> Option<Followup> {
        if domain.is_empty() {
            self.toast("Error", "Pick a domain first.", ToastKind::Error);
            return None;
        }
        let max_bid = parse_amount(max_bid).unwrap_or(0.0);
        if self.config.variant.enforces_ceiling() {
            let ceiling = self.state.with_state(|s| s.bid_ceiling);
            if max_bid > ceiling {
                self.toast("Error", format!("Max bid exceeds the limit (${ceiling})."), ToastKind::Error);
                return None;
            }
        }

        self.set_busy(Control::SaveSettings, true);
        let result = self
            .api
            .save_settings(&SettingsArgs { domain_name: domain, max_bid, auto_bid })
            .await
            .and_then(ApiAck::into_result);
        let followup = match result {
            Ok(_) => {
                self.log(format!("Settings for {domain} updated."), LogLevel::Success);
                self.toast("Settings saved", "Your settings were saved.", ToastKind::Success);
                self.state.update_state(|s| s.close_settings_modal());
                Some(Followup::Refresh)
            }
            Err(err) => {
                self.report_failure(Action::Settings, &err);
                None
            }
        };
        self.set_busy(Control::SaveSettings, false);
        followup
    }

    /// Flip auto-bid for one row, re-sending its known max bid.
    pub async fn toggle_auto_bid(&self, domain: &str, enabled: bool) -> Option<Followup> {
        let max_bid = self.state.with_state(|s| s.item(domain).map(|item| item.max_bid))?;

        let result = self
            .api
            .save_settings(&SettingsArgs { domain_name: domain, max_bid, auto_bid: enabled })
            .await
            .and_then(ApiAck::into_result);
        match result {
            Ok(_) => {
                let verb = if enabled { "enabled" } else { "disabled" };
                self.log(format!("Auto-bid {verb} for {domain}."), LogLevel::Info);
                Some(Followup::Refresh)
            }
            Err(err) => {
                self.report_failure(Action::AutoBid, &err);
                Some(Followup::RevertToggle { domain: domain.to_string(), checked: !enabled })
            }
        }
    }

    // ========================
    // Push Events
    // ========================

    pub fn handle_push(&self, event: PushEvent) -> Option<Followup> {
        match event {
            PushEvent::Connected => {
                self.state.update_state(|s| s.connected = true);
                self.log("Connected to server.", LogLevel::Success);
            }
            PushEvent::Disconnected => {
                self.state.update_state(|s| s.connected = false);
                self.log("Lost connection to server.", LogLevel::Error);
                if self.config.variant.requires_login() {
                    self.set_status("Disconnected", StatusKind::Offline);
                }
            }
            PushEvent::LoginResult(result) => {
                if result.success {
                    self.state.update_state(|s| s.is_logged_in = true);
                    self.set_status("Signed in", StatusKind::Online);
                    self.log("Signed in to the auction account.", LogLevel::Success);
                    return Some(Followup::Refresh);
                }
                let message = result.message.unwrap_or_default();
                self.log(format!("Login failed: {message}"), LogLevel::Error);
                self.toast("Login failed", message, ToastKind::Error);
            }
            PushEvent::AuctionUpdate(update) => {
                let stamp = update.timestamp.unwrap_or_else(|| "just now".to_string());
                debug!(count = update.items.len(), "auction update");
                self.state.update_state(|s| s.apply_push_update(update.items, stamp));
            }
            PushEvent::BidResult(bid) => {
                let outcome = if bid.result.success { "succeeded" } else { "failed" };
                let message = format!("Bid of ${} on {}: {outcome}", bid.amount, bid.domain);
                if bid.result.success {
                    self.log(message.clone(), LogLevel::Success);
                    self.toast("Bid placed", message, ToastKind::Success);
                } else {
                    self.log(message.clone(), LogLevel::Error);
                    self.toast("Bid failed", bid.result.message.unwrap_or(message), ToastKind::Error);
                }
            }
            PushEvent::MonitoringStarted => {
                self.state.update_state(|s| s.is_monitoring = true);
                self.set_status("Monitoring", StatusKind::Monitoring);
                self.log("Auction monitoring started.", LogLevel::Success);
            }
            PushEvent::MonitoringStopped => {
                let logged_in = self.state.with_state(|s| {
                    s.is_logged_in || !self.config.variant.requires_login()
                });
                self.state.update_state(|s| s.is_monitoring = false);
                if logged_in {
                    self.set_status("Signed in", StatusKind::Online);
                } else {
                    self.set_status("Signed out", StatusKind::Offline);
                }
                self.log("Auction monitoring stopped.", LogLevel::Warning);
            }
            PushEvent::AutoBidExecuted(executed) => {
                if !self.config.variant.enforces_ceiling() {
                    debug!(domain = %executed.domain, "auto-bid notice ignored on monitor page");
                    return None;
                }
                let message = executed
                    .message
                    .unwrap_or_else(|| format!("Auto-bid of ${} placed on {}", executed.amount, executed.domain));
                self.log(format!("🤖 {message}"), LogLevel::Success);
                self.auto_bid_toast(&executed.domain, executed.amount);
                return Some(Followup::RefreshAfter(self.config.auto_bid_settle_delay));
            }
            PushEvent::Error(notice) => {
                self.log(notice.message.clone(), LogLevel::Error);
                self.toast("Error", notice.message, ToastKind::Error);
            }
        }
        None
    }
}

/// Finite decimal from a form field; anything else is `None`.
fn parse_amount(text: &str) -> Option<f64> {
    text.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    use futures::executor::block_on;
    use serde_json::{json, Value};

    use crate::api::AuctionsResponse;
    use crate::config::Variant;
    use crate::models::{AuctionItem, AuctionUpdate, AutoBidExecuted, LoginResult};
    use crate::store::DeskState;

    type State = Rc<RefCell<DeskState>>;

    /// Records every request body and answers with canned responses
    struct FakeApi {
        requests: RefCell<Vec<(&'static str, Value)>>,
        ack: RefCell<Result<ApiAck, ApiError>>,
        listing: RefCell<Result<AuctionsResponse, ApiError>>,
        /// Runs while a list request is "in flight"
        during_list: RefCell<Option<Box<dyn Fn()>>>,
    }

    impl FakeApi {
        fn new() -> Self {
            Self {
                requests: RefCell::new(Vec::new()),
                ack: RefCell::new(Ok(ApiAck::ok("ok"))),
                listing: RefCell::new(Ok(listing(vec![], None))),
                during_list: RefCell::new(None),
            }
        }

        fn record(&self, endpoint: &'static str, body: Value) {
            self.requests.borrow_mut().push((endpoint, body));
        }
    }

    impl AuctionApi for FakeApi {
        async fn login(&self, args: &LoginArgs<'_>) -> Result<ApiAck, ApiError> {
            self.record("login", serde_json::to_value(args).unwrap());
            self.ack.borrow().clone()
        }

        async fn list_auctions(&self) -> Result<AuctionsResponse, ApiError> {
            self.record("auctions", Value::Null);
            if let Some(hook) = self.during_list.borrow().as_ref() {
                hook();
            }
            self.listing.borrow().clone()
        }

        async fn place_bid(&self, args: &BidArgs<'_>) -> Result<ApiAck, ApiError> {
            self.record("bid", serde_json::to_value(args).unwrap());
            self.ack.borrow().clone()
        }

        async fn save_settings(&self, args: &SettingsArgs<'_>) -> Result<ApiAck, ApiError> {
            self.record("settings", serde_json::to_value(args).unwrap());
            self.ack.borrow().clone()
        }
    }

    #[derive(Clone, Default)]
    struct Emitted(Rc<RefCell<Vec<OutboundEvent>>>);

    impl PushEmitter for Emitted {
        fn emit(&self, event: OutboundEvent) {
            self.0.borrow_mut().push(event);
        }
    }

    fn listing(items: Vec<AuctionItem>, max_bid_limit: Option<f64>) -> AuctionsResponse {
        AuctionsResponse { success: true, items, max_bid_limit, message: None }
    }

    fn item(domain: &str, current_bid: f64, max_bid: f64) -> AuctionItem {
        AuctionItem {
            domain_name: domain.to_string(),
            current_bid,
            my_current_bid: 0.0,
            max_bid,
            time_left: "1h 7m".to_string(),
            auto_bid_enabled: false,
            bid_count: None,
            auction_id: None,
        }
    }

    struct Harness {
        desk: Desk<FakeApi, Emitted, State>,
        api: Rc<FakeApi>,
        emitted: Emitted,
        state: State,
    }

    fn harness(variant: Variant) -> Harness {
        let config = DeskConfig::for_variant(variant);
        let state: State = Rc::new(RefCell::new(DeskState::new(&config)));
        let emitted = Emitted::default();
        let desk = Desk::new(FakeApi::new(), emitted.clone(), state.clone(), config);
        let api = Rc::clone(&desk.api);
        Harness { desk, api, emitted, state }
    }

    impl Harness {
        fn requests(&self) -> Vec<(&'static str, Value)> {
            self.api.requests.borrow().clone()
        }

        fn toast_message(&self) -> Option<String> {
            self.state.borrow().toast.as_ref().map(|t| t.message.clone())
        }

        fn toast_kind(&self) -> Option<ToastKind> {
            self.state.borrow().toast.as_ref().map(|t| t.kind)
        }

        fn seed(&self, items: Vec<AuctionItem>) {
            self.state.borrow_mut().replace_items(items);
        }

        fn sign_in(&self) {
            self.desk.handle_push(PushEvent::LoginResult(LoginResult { success: true, message: None }));
        }
    }

    #[test]
    fn test_submit_bid_rejects_bad_amounts_without_request() {
        let h = harness(Variant::Monitor);
        for amount in ["0", "-5", "abc", "", "NaN", "inf"] {
            assert_eq!(block_on(h.desk.submit_bid("a.com", amount)), None);
            assert_eq!(h.toast_kind(), Some(ToastKind::Error), "{amount}");
        }
        assert!(block_on(h.desk.submit_bid("", "20")).is_none());
        assert!(h.requests().is_empty());
    }

    #[test]
    fn test_dashboard_submit_bid_respects_ceiling() {
        let h = harness(Variant::Dashboard);
        h.state.borrow_mut().bid_ceiling = 150.0;

        assert_eq!(block_on(h.desk.submit_bid("a.com", "150.01")), None);
        assert!(h.requests().is_empty());
        assert!(h.toast_message().unwrap().contains("$150"));

        let followup = block_on(h.desk.submit_bid("a.com", "150"));
        assert_eq!(followup, Some(Followup::RefreshAfter(Duration::from_secs(1))));
        assert_eq!(h.requests(), vec![("bid", json!({"domain_name": "a.com", "bid_amount": 150.0}))]);
    }

    #[test]
    fn test_monitor_page_has_no_ceiling() {
        let h = harness(Variant::Monitor);
        let followup = block_on(h.desk.submit_bid("a.com", "500"));
        assert_eq!(followup, Some(Followup::RefreshAfter(Duration::from_secs(2))));
        assert_eq!(h.requests().len(), 1);
    }

    #[test]
    fn test_successful_bid_closes_modal_and_clears_busy() {
        let h = harness(Variant::Monitor);
        h.seed(vec![item("a.com", 20.0, 0.0)]);
        h.desk.open_bid_modal("a.com");
        {
            let state = h.state.borrow();
            let Some(Modal::Bid(form)) = &state.modal else { panic!("bid modal not open") };
            assert_eq!(form.amount, "25.00");
            assert_eq!(form.ceiling, None);
        }

        block_on(h.desk.submit_bid("a.com", "25.00"));
        let state = h.state.borrow();
        assert!(state.modal.is_none());
        assert!(!state.busy.submit_bid);
        assert_eq!(state.toast.as_ref().unwrap().kind, ToastKind::Success);
        assert_eq!(state.activity.latest().unwrap().level, LogLevel::Success);
    }

    #[test]
    fn test_rejected_bid_keeps_modal_open() {
        let h = harness(Variant::Monitor);
        h.seed(vec![item("a.com", 20.0, 0.0)]);
        h.desk.open_bid_modal("a.com");
        *h.api.ack.borrow_mut() = Ok(ApiAck::rejected("Bid must exceed $20"));

        assert_eq!(block_on(h.desk.submit_bid("a.com", "20")), None);
        let state = h.state.borrow();
        assert!(matches!(state.modal, Some(Modal::Bid(_))));
        assert!(!state.busy.submit_bid);
        let toast = state.toast.as_ref().unwrap();
        assert_eq!(toast.title, "Bid failed");
        assert_eq!(toast.message, "Bid must exceed $20");
    }

    #[test]
    fn test_transport_failure_is_reported_like_rejection() {
        let h = harness(Variant::Monitor);
        *h.api.ack.borrow_mut() = Err(ApiError::Status(502));

        assert_eq!(block_on(h.desk.submit_bid("a.com", "30")), None);
        let state = h.state.borrow();
        assert_eq!(state.toast.as_ref().unwrap().kind, ToastKind::Error);
        assert_eq!(state.toast.as_ref().unwrap().message, "Bid request failed.");
        assert!(state.activity.latest().unwrap().message.contains("502"));
        assert!(!state.busy.submit_bid);
    }

    #[test]
    fn test_toggle_monitoring_requires_login() {
        let h = harness(Variant::Monitor);
        h.desk.toggle_monitoring();
        assert!(h.emitted.0.borrow().is_empty());
        assert_eq!(h.toast_kind(), Some(ToastKind::Error));
    }

    #[test]
    fn test_monitoring_flips_only_on_push() {
        let h = harness(Variant::Monitor);
        h.sign_in();

        h.desk.toggle_monitoring();
        assert_eq!(*h.emitted.0.borrow(), vec![OutboundEvent::StartMonitoring]);
        assert!(!h.state.borrow().is_monitoring);

        // Still not monitoring, so a second click asks to start again
        h.desk.toggle_monitoring();
        assert_eq!(h.emitted.0.borrow().last(), Some(&OutboundEvent::StartMonitoring));

        h.desk.handle_push(PushEvent::MonitoringStarted);
        assert!(h.state.borrow().is_monitoring);
        assert_eq!(h.state.borrow().status.kind, StatusKind::Monitoring);

        h.desk.toggle_monitoring();
        assert_eq!(h.emitted.0.borrow().last(), Some(&OutboundEvent::StopMonitoring));

        h.desk.handle_push(PushEvent::MonitoringStopped);
        assert!(!h.state.borrow().is_monitoring);
        assert_eq!(h.state.borrow().status.kind, StatusKind::Online);
    }

    #[test]
    fn test_login_flow_unlocks_monitoring_and_refreshes() {
        let h = harness(Variant::Monitor);
        assert!(!h.desk.monitoring_enabled());
        block_on(h.desk.login(" a@b.com ", "pw"));
        assert_eq!(h.requests(), vec![("login", json!({"email": "a@b.com", "password": "pw"}))]);
        // Accepted is not signed in
        assert!(!h.state.borrow().is_logged_in);
        assert!(!h.desk.monitoring_enabled());
        assert!(!h.state.borrow().busy.login);

        let followup = h.desk.handle_push(PushEvent::LoginResult(LoginResult { success: true, message: None }));
        assert_eq!(followup, Some(Followup::Refresh));
        assert!(h.state.borrow().is_logged_in);
        assert_eq!(h.state.borrow().status.kind, StatusKind::Online);
        assert!(h.desk.monitoring_enabled());

        h.desk.toggle_monitoring();
        assert_eq!(*h.emitted.0.borrow(), vec![OutboundEvent::StartMonitoring]);
    }

    #[test]
    fn test_failed_login_result_stays_signed_out() {
        let h = harness(Variant::Monitor);
        let followup = h.desk.handle_push(PushEvent::LoginResult(LoginResult {
            success: false,
            message: Some("Wrong password".into()),
        }));
        assert_eq!(followup, None);
        assert!(!h.state.borrow().is_logged_in);
        assert_eq!(h.toast_message().as_deref(), Some("Wrong password"));
    }

    #[test]
    fn test_login_requires_both_fields() {
        let h = harness(Variant::Monitor);
        block_on(h.desk.login("a@b.com", "   "));
        block_on(h.desk.login("", "pw"));
        assert!(h.requests().is_empty());
        assert_eq!(h.toast_kind(), Some(ToastKind::Error));
    }

    #[test]
    fn test_toggle_auto_bid_resends_known_max_bid() {
        let h = harness(Variant::Monitor);
        h.seed(vec![item("example.com", 30.0, 50.0)]);

        let followup = block_on(h.desk.toggle_auto_bid("example.com", true));
        assert_eq!(followup, Some(Followup::Refresh));
        assert_eq!(
            h.requests(),
            vec![("settings", json!({"domain_name": "example.com", "max_bid": 50.0, "auto_bid": true}))]
        );
    }

    #[test]
    fn test_toggle_auto_bid_failure_reverts_checkbox() {
        let h = harness(Variant::Dashboard);
        h.seed(vec![item("example.com", 30.0, 50.0)]);
        *h.api.ack.borrow_mut() = Ok(ApiAck::rejected("Not allowed"));

        let followup = block_on(h.desk.toggle_auto_bid("example.com", true));
        assert_eq!(
            followup,
            Some(Followup::RevertToggle { domain: "example.com".into(), checked: false })
        );
        assert_eq!(h.toast_message().as_deref(), Some("Not allowed"));

        *h.api.ack.borrow_mut() = Err(ApiError::Network("offline".into()));
        let followup = block_on(h.desk.toggle_auto_bid("example.com", false));
        assert_eq!(
            followup,
            Some(Followup::RevertToggle { domain: "example.com".into(), checked: true })
        );
    }

    #[test]
    fn test_toggle_auto_bid_unknown_domain_is_noop() {
        let h = harness(Variant::Monitor);
        assert_eq!(block_on(h.desk.toggle_auto_bid("missing.com", true)), None);
        assert!(h.requests().is_empty());
    }

    #[test]
    fn test_auto_bid_executed_toasts_and_schedules_refresh() {
        let h = harness(Variant::Dashboard);
        let followup = h.desk.handle_push(PushEvent::AutoBidExecuted(AutoBidExecuted {
            domain: "cloudservices.io".into(),
            amount: 52.5,
            message: Some("cloudservices.io auto-bid $52.5".into()),
        }));

        let Some(Followup::RefreshAfter(delay)) = followup else {
            panic!("expected delayed refresh, got {followup:?}");
        };
        assert!(delay >= Duration::from_secs(1) && delay <= Duration::from_secs(2));

        let state = h.state.borrow();
        let toast = state.auto_bid_toast.as_ref().unwrap();
        assert!(toast.message.contains("cloudservices.io"));
        assert!(toast.message.contains("52.5"));
        assert_eq!(toast.duration, Duration::from_secs(6));
    }

    #[test]
    fn test_auction_update_replaces_list() {
        let h = harness(Variant::Monitor);
        h.seed(vec![item("old.com", 1.0, 0.0)]);
        h.desk.handle_push(PushEvent::AuctionUpdate(AuctionUpdate {
            items: vec![item("a.com", 10.0, 0.0), item("b.com", 12.0, 0.0)],
            timestamp: Some("2025-01-01T12:00:00".into()),
        }));
        let state = h.state.borrow();
        let domains: Vec<&str> = state.items.iter().map(|i| i.domain_name.as_str()).collect();
        assert_eq!(domains, vec!["a.com", "b.com"]);
        assert_eq!(state.last_updated.as_deref(), Some("2025-01-01T12:00:00"));
    }

    #[test]
    fn test_refresh_requires_login_on_monitor_page() {
        let h = harness(Variant::Monitor);
        block_on(h.desk.refresh_auctions());
        assert!(h.requests().is_empty());
        assert_eq!(h.toast_kind(), Some(ToastKind::Error));
    }

    #[test]
    fn test_dashboard_refresh_captures_ceiling() {
        let h = harness(Variant::Dashboard);
        *h.api.listing.borrow_mut() = Ok(listing(vec![item("a.com", 10.0, 0.0)], Some(150.0)));

        block_on(h.desk.refresh_auctions());
        let state = h.state.borrow();
        assert_eq!(state.bid_ceiling, 150.0);
        assert_eq!(state.items.len(), 1);
        assert!(!state.busy.refresh);
    }

    #[test]
    fn test_refresh_keeps_ceiling_when_absent() {
        let h = harness(Variant::Dashboard);
        block_on(h.desk.refresh_auctions());
        assert_eq!(h.state.borrow().bid_ceiling, 180.0);
    }

    #[test]
    fn test_refresh_overtaken_by_push_is_discarded() {
        let h = harness(Variant::Dashboard);
        *h.api.listing.borrow_mut() = Ok(listing(vec![item("stale.com", 1.0, 0.0)], Some(170.0)));
        let state = h.state.clone();
        *h.api.during_list.borrow_mut() = Some(Box::new(move || {
            state.borrow_mut().apply_push_update(vec![item("pushed.com", 2.0, 0.0)], "t".into());
        }));

        block_on(h.desk.refresh_auctions());
        let state = h.state.borrow();
        assert_eq!(state.items[0].domain_name, "pushed.com");
        assert_eq!(state.bid_ceiling, 170.0);
        assert!(!state.busy.refresh);
    }

    #[test]
    fn test_refresh_overtaken_by_later_refresh_is_discarded() {
        let h = harness(Variant::Dashboard);
        *h.api.listing.borrow_mut() = Ok(listing(vec![item("older.com", 1.0, 0.0)], None));
        let state = h.state.clone();
        *h.api.during_list.borrow_mut() = Some(Box::new(move || {
            let mut s = state.borrow_mut();
            let later = s.begin_refresh();
            s.finish_refresh(later, Some(vec![item("newer.com", 2.0, 0.0)]));
        }));

        block_on(h.desk.refresh_auctions());
        let state = h.state.borrow();
        assert_eq!(state.items[0].domain_name, "newer.com");
        assert!(!state.busy.refresh);
    }

    #[test]
    fn test_overlapping_refresh_keeps_control_busy() {
        let h = harness(Variant::Dashboard);
        *h.api.listing.borrow_mut() = Ok(listing(vec![item("a.com", 1.0, 0.0)], None));
        let state = h.state.clone();
        // A second refresh goes out and is still pending when the first lands
        *h.api.during_list.borrow_mut() = Some(Box::new(move || {
            state.borrow_mut().begin_refresh();
        }));

        block_on(h.desk.refresh_auctions());
        let state = h.state.borrow();
        assert_eq!(state.items[0].domain_name, "a.com");
        assert!(state.busy.refresh);
        assert_eq!(state.refreshes_in_flight, 1);
    }

    #[test]
    fn test_settings_defaults_unparseable_max_bid_to_zero() {
        let h = harness(Variant::Monitor);
        h.seed(vec![item("a.com", 10.0, 0.0)]);
        h.desk.open_settings_modal("a.com");

        let followup = block_on(h.desk.save_settings("a.com", "lots", true));
        assert_eq!(followup, Some(Followup::Refresh));
        assert_eq!(
            h.requests(),
            vec![("settings", json!({"domain_name": "a.com", "max_bid": 0.0, "auto_bid": true}))]
        );
        assert!(h.state.borrow().modal.is_none());
    }

    #[test]
    fn test_dashboard_settings_respect_ceiling() {
        let h = harness(Variant::Dashboard);
        assert_eq!(block_on(h.desk.save_settings("a.com", "181", false)), None);
        assert!(h.requests().is_empty());
        assert!(block_on(h.desk.save_settings("", "10", false)).is_none());
        assert!(h.requests().is_empty());
    }

    #[test]
    fn test_settings_modal_prefill() {
        let h = harness(Variant::Monitor);
        h.seed(vec![item("a.com", 10.0, 0.0), item("b.com", 10.0, 75.5)]);

        h.desk.open_settings_modal("a.com");
        let Some(Modal::Settings(form)) = h.state.borrow().modal.clone() else { panic!() };
        assert_eq!(form.max_bid, "");

        h.desk.open_settings_modal("b.com");
        let Some(Modal::Settings(form)) = h.state.borrow().modal.clone() else { panic!() };
        assert_eq!(form.max_bid, "75.5");
    }

    #[test]
    fn test_dashboard_start_and_periodic_tick() {
        let h = harness(Variant::Dashboard);
        assert_eq!(h.desk.start(), Some(Followup::Refresh));
        assert_eq!(h.state.borrow().activity.len(), 2);

        assert_eq!(h.desk.periodic_tick(), None);
        h.desk.handle_push(PushEvent::MonitoringStarted);
        assert_eq!(h.desk.periodic_tick(), Some(Followup::Refresh));

        assert_eq!(harness(Variant::Monitor).desk.start(), None);
    }

    #[test]
    fn test_disconnect_marks_offline() {
        let h = harness(Variant::Monitor);
        h.desk.handle_push(PushEvent::Connected);
        assert!(h.state.borrow().connected);
        h.desk.handle_push(PushEvent::Disconnected);
        let state = h.state.borrow();
        assert!(!state.connected);
        assert_eq!(state.status.text, "Disconnected");
        assert_eq!(state.activity.latest().unwrap().level, LogLevel::Error);
    }
}
