//! Desk Configuration
//!
//! Per-page defaults: endpoints, timer delays and limits.

use std::time::Duration;

/// Which page the desk is driving
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variant {
    /// Login form + monitoring controls
    Monitor,
    /// Signed-in dashboard with bid ceiling and auto-bid notifications
    Dashboard,
}

impl Variant {
    /// Pick the variant from `window.location.pathname`.
    pub fn from_path(path: &str) -> Self {
        if path.trim_end_matches('/').ends_with("/dashboard") {
            Variant::Dashboard
        } else {
            Variant::Monitor
        }
    }

    /// Monitor page gates refresh and monitoring on a confirmed login
    pub fn requires_login(self) -> bool {
        matches!(self, Variant::Monitor)
    }

    /// Whether the monitoring button is usable given the session state
    pub fn monitoring_unlocked(self, is_logged_in: bool) -> bool {
        !self.requires_login() || is_logged_in
    }

    /// Dashboard guards bids and max bids with the server ceiling
    pub fn enforces_ceiling(self) -> bool {
        matches!(self, Variant::Dashboard)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DeskConfig {
    pub variant: Variant,
    pub login_endpoint: String,
    pub auctions_endpoint: String,
    pub bid_endpoint: String,
    pub settings_endpoint: String,
    pub socket_path: String,
    /// Activity log keeps this many newest entries
    pub log_capacity: usize,
    /// chrono format for activity timestamps
    pub log_time_format: &'static str,
    pub toast_duration: Duration,
    pub auto_bid_toast_duration: Duration,
    /// Wait before re-reading the list after a manual bid
    pub bid_settle_delay: Duration,
    /// Wait before re-reading the list after an auto-bid notification
    pub auto_bid_settle_delay: Duration,
    /// Refresh cadence while monitoring (dashboard only)
    pub periodic_refresh: Option<Duration>,
    /// Delay of the welcome toast (dashboard only)
    pub welcome_delay: Option<Duration>,
    /// Ceiling used until the server sends `max_bid_limit`
    pub default_bid_ceiling: f64,
    /// Bid form prefill is current bid + this
    pub bid_step: f64,
}

impl DeskConfig {
    pub fn for_variant(variant: Variant) -> Self {
        let base = Self {
            variant,
            login_endpoint: "/api/login".to_string(),
            auctions_endpoint: "/api/auctions".to_string(),
            bid_endpoint: "/api/bid".to_string(),
            settings_endpoint: "/api/settings".to_string(),
            socket_path: "/socket.io".to_string(),
            log_capacity: crate::activity::LOG_CAPACITY,
            log_time_format: "%H:%M",
            toast_duration: Duration::from_millis(5_000),
            auto_bid_toast_duration: Duration::from_millis(6_000),
            bid_settle_delay: Duration::from_millis(2_000),
            auto_bid_settle_delay: Duration::from_millis(1_000),
            periodic_refresh: None,
            welcome_delay: None,
            default_bid_ceiling: 180.0,
            bid_step: 5.0,
        };

        match variant {
            Variant::Monitor => base,
            Variant::Dashboard => Self {
                log_time_format: "%H:%M:%S",
                toast_duration: Duration::from_millis(4_000),
                bid_settle_delay: Duration::from_millis(1_000),
                periodic_refresh: Some(Duration::from_secs(30)),
                welcome_delay: Some(Duration::from_millis(1_000)),
                ..base
            },
        }
    }
}

/// Millisecond count for `gloo_timers`, saturating at `u32::MAX`.
pub fn millis(duration: Duration) -> u32 {
    u32::try_from(duration.as_millis()).unwrap_or(u32::MAX)
}
