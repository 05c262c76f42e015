//! Desk State Store
//!
//! Client-side mirror of the auction list plus session and UI state.
//! Uses Leptos reactive_stores for field-level reactivity.

use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use reactive_stores::Store;

use crate::activity::{ActivityLog, Toast, ToastKind, ToastSurface};
use crate::config::{DeskConfig, Variant};
use crate::models::AuctionItem;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Offline,
    Online,
    Monitoring,
}

impl StatusKind {
    pub fn css_class(self) -> &'static str {
        match self {
            StatusKind::Offline => "status-offline",
            StatusKind::Online => "status-online",
            StatusKind::Monitoring => "status-monitoring",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StatusBadge {
    pub text: String,
    pub kind: StatusKind,
}

impl StatusBadge {
    pub fn new(text: &str, kind: StatusKind) -> Self {
        Self { text: text.to_string(), kind }
    }
}

/// Controls that are disabled while their request is in flight.
/// Refresh is tracked by `begin_refresh` / `finish_refresh` instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Login,
    SubmitBid,
    SaveSettings,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BusyControls {
    pub login: bool,
    pub refresh: bool,
    pub submit_bid: bool,
    pub save_settings: bool,
}

impl BusyControls {
    pub fn set(&mut self, control: Control, busy: bool) {
        match control {
            Control::Login => self.login = busy,
            Control::SubmitBid => self.submit_bid = busy,
            Control::SaveSettings => self.save_settings = busy,
        }
    }
}

/// Issue stamp of one list refresh
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RefreshTicket {
    pub seq: u64,
    /// `push_epoch` when the request went out
    pub push_epoch: u64,
}

/// Prefilled bid form
#[derive(Debug, Clone, PartialEq)]
pub struct BidForm {
    pub domain: String,
    pub current_bid: f64,
    pub amount: String,
    /// Input `max` attribute (dashboard)
    pub ceiling: Option<f64>,
}

/// Prefilled settings form
#[derive(Debug, Clone, PartialEq)]
pub struct SettingsForm {
    pub domain: String,
    pub max_bid: String,
    pub auto_bid: bool,
    pub ceiling: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Modal {
    Bid(BidForm),
    Settings(SettingsForm),
}

/// Whole desk state with field-level reactivity
#[derive(Clone, Debug, Store)]
pub struct DeskState {
    /// Last received auction list; replaced wholesale, never patched
    pub items: Vec<AuctionItem>,
    /// Bumped by every pushed `auction_update`
    pub push_epoch: u64,
    /// Sequence of the last refresh issued
    pub refresh_seq: u64,
    /// Sequence of the newest refresh whose list was applied
    pub refresh_applied: u64,
    pub refreshes_in_flight: u32,
    pub is_logged_in: bool,
    pub is_monitoring: bool,
    /// Push channel is up
    pub connected: bool,
    pub status: StatusBadge,
    pub last_updated: Option<String>,
    /// Server-supplied bid ceiling (dashboard guard)
    pub bid_ceiling: f64,
    pub busy: BusyControls,
    pub modal: Option<Modal>,
    pub activity: ActivityLog,
    pub toast: Option<Toast>,
    pub auto_bid_toast: Option<Toast>,
    pub toast_seq: u64,
}

impl DeskState {
    pub fn new(config: &DeskConfig) -> Self {
        Self {
            items: Vec::new(),
            push_epoch: 0,
            refresh_seq: 0,
            refresh_applied: 0,
            refreshes_in_flight: 0,
            is_logged_in: false,
            is_monitoring: false,
            connected: false,
            status: StatusBadge::new("Signed out", StatusKind::Offline),
            last_updated: None,
            bid_ceiling: config.default_bid_ceiling,
            busy: BusyControls::default(),
            modal: None,
            activity: ActivityLog::with_capacity(config.log_capacity),
            toast: None,
            auto_bid_toast: None,
            toast_seq: 0,
        }
    }

    pub fn item(&self, domain: &str) -> Option<&AuctionItem> {
        self.items.iter().find(|item| item.domain_name == domain)
    }

    pub fn replace_items(&mut self, items: Vec<AuctionItem>) {
        self.items = items;
    }

    /// Server-pushed list; always applies and outdates refreshes in flight.
    pub fn apply_push_update(&mut self, items: Vec<AuctionItem>, stamp: String) {
        self.replace_items(items);
        self.push_epoch += 1;
        self.last_updated = Some(stamp);
    }

    pub fn begin_refresh(&mut self) -> RefreshTicket {
        self.refresh_seq += 1;
        self.refreshes_in_flight += 1;
        self.busy.refresh = true;
        RefreshTicket { seq: self.refresh_seq, push_epoch: self.push_epoch }
    }

    /// Settle one refresh. `items` is applied only if no push and no later
    /// refresh has landed since the request went out. Returns whether it was.
    pub fn finish_refresh(&mut self, ticket: RefreshTicket, items: Option<Vec<AuctionItem>>) -> bool {
        self.refreshes_in_flight = self.refreshes_in_flight.saturating_sub(1);
        if self.refreshes_in_flight == 0 {
            self.busy.refresh = false;
        }
        let Some(items) = items else { return false };
        if ticket.push_epoch != self.push_epoch || ticket.seq <= self.refresh_applied {
            return false;
        }
        self.replace_items(items);
        self.refresh_applied = ticket.seq;
        true
    }

    /// Monitoring controls are usable
    pub fn monitoring_enabled(&self, variant: Variant) -> bool {
        variant.monitoring_unlocked(self.is_logged_in)
    }

    pub fn show_toast(
        &mut self,
        surface: ToastSurface,
        title: String,
        message: String,
        kind: ToastKind,
        duration: std::time::Duration,
    ) {
        self.toast_seq += 1;
        let toast = Some(Toast { id: self.toast_seq, title, message, kind, duration });
        match surface {
            ToastSurface::General => self.toast = toast,
            ToastSurface::AutoBid => self.auto_bid_toast = toast,
        }
    }

    /// Clear a toast if it is still the one identified by `id`.
    pub fn dismiss_toast(&mut self, surface: ToastSurface, id: u64) {
        let slot = match surface {
            ToastSurface::General => &mut self.toast,
            ToastSurface::AutoBid => &mut self.auto_bid_toast,
        };
        if slot.as_ref().is_some_and(|t| t.id == id) {
            *slot = None;
        }
    }

    pub fn close_bid_modal(&mut self) {
        if matches!(self.modal, Some(Modal::Bid(_))) {
            self.modal = None;
        }
    }

    pub fn close_settings_modal(&mut self) {
        if matches!(self.modal, Some(Modal::Settings(_))) {
            self.modal = None;
        }
    }
}

/// Type alias for the store
pub type DeskStore = Store<DeskState>;

// ========================
// State Access Seam
// ========================

/// Read/update access to the desk state.
///
/// The browser uses the reactive store; tests use a plain `Rc<RefCell<_>>`.
pub trait StateCell: Clone + 'static {
    fn with_state<R>(&self, f: impl FnOnce(&DeskState) -> R) -> R;
    fn update_state(&self, f: impl FnOnce(&mut DeskState));
}

impl StateCell for DeskStore {
    fn with_state<R>(&self, f: impl FnOnce(&DeskState) -> R) -> R {
        self.with_untracked(f)
    }

    fn update_state(&self, f: impl FnOnce(&mut DeskState)) {
        self.update(f);
    }
}

impl StateCell for Rc<RefCell<DeskState>> {
    fn with_state<R>(&self, f: impl FnOnce(&DeskState) -> R) -> R {
        f(&self.borrow())
    }

    fn update_state(&self, f: impl FnOnce(&mut DeskState)) {
        f(&mut self.borrow_mut());
    }
}
