//! UI Components
//!
//! Leptos components for the desk page.

mod status_bar;
mod login_form;
mod summary_cards;
mod auction_table;
mod bid_modal;
mod settings_modal;
mod activity_log;
mod toast;

pub use status_bar::StatusBar;
pub use login_form::LoginForm;
pub use summary_cards::SummaryCards;
pub use auction_table::AuctionTable;
pub use bid_modal::BidModal;
pub use settings_modal::SettingsModal;
pub use activity_log::ActivityLogPanel;
pub use toast::ToastHost;
