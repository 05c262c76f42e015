//! Table Rendering
//!
//! Pure view models for the auction table and summary counters. The table is
//! rebuilt from the whole list on every change; nothing is patched per row.

use crate::config::Variant;
use crate::models::AuctionItem;

/// Entry transition applied to every row on each redraw
pub const ROW_CLASS: &str = "fade-in";

#[derive(Debug, Clone, PartialEq)]
pub enum TableBody {
    Placeholder(Placeholder),
    Rows(Vec<RowView>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Placeholder {
    pub colspan: u8,
    pub title: &'static str,
    pub hint: Option<&'static str>,
}

/// One table row, fields already formatted for display
#[derive(Debug, Clone, PartialEq)]
pub struct RowView {
    pub domain: String,
    pub current_bid: String,
    /// Dashboard column only
    pub my_bid: Option<String>,
    pub time_left: String,
    pub max_bid: String,
    pub auto_bid_enabled: bool,
    pub is_my_bid: bool,
    pub is_winning: bool,
    /// Trophy when winning, target when merely bidding
    pub indicator: Option<&'static str>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    pub total: usize,
    pub auto_bid: usize,
    /// Dashboard only
    pub active_bids: Option<usize>,
}

/// `$12.50`
pub fn format_money(amount: f64) -> String {
    format!("${:.2}", amount)
}

/// Number of columns the variant's table has
pub fn column_count(variant: Variant) -> u8 {
    match variant {
        Variant::Monitor => 6,
        Variant::Dashboard => 7,
    }
}

pub fn table_body(items: &[AuctionItem], variant: Variant) -> TableBody {
    if items.is_empty() {
        return TableBody::Placeholder(Placeholder {
            colspan: column_count(variant),
            title: "No domains are being bid on.",
            hint: match variant {
                Variant::Monitor => None,
                Variant::Dashboard => Some("Start monitoring to see live auctions."),
            },
        });
    }
    TableBody::Rows(items.iter().map(|item| row_view(item, variant)).collect())
}

fn row_view(item: &AuctionItem, variant: Variant) -> RowView {
    let (my_bid, max_bid, is_my_bid, is_winning) = match variant {
        Variant::Monitor => {
            let max_bid = if item.max_bid > 0.0 { format_money(item.max_bid) } else { "-".to_string() };
            (None, max_bid, false, false)
        }
        Variant::Dashboard => {
            let my_bid = if item.has_my_bid() { format_money(item.my_current_bid) } else { "-".to_string() };
            (Some(my_bid), format_money(item.max_bid), item.has_my_bid(), item.is_winning())
        }
    };

    let indicator = if is_winning {
        Some("🏆")
    } else if is_my_bid {
        Some("🎯")
    } else {
        None
    };

    RowView {
        domain: item.domain_name.clone(),
        current_bid: format_money(item.current_bid),
        my_bid,
        time_left: item.time_left.clone(),
        max_bid,
        auto_bid_enabled: item.auto_bid_enabled,
        is_my_bid,
        is_winning,
        indicator,
    }
}

pub fn summary(items: &[AuctionItem], variant: Variant) -> Summary {
    Summary {
        total: items.len(),
        auto_bid: items.iter().filter(|i| i.auto_bid_enabled).count(),
        active_bids: match variant {
            Variant::Monitor => None,
            Variant::Dashboard => Some(items.iter().filter(|i| i.has_my_bid()).count()),
        },
    }
}
