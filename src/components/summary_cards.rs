//! Summary Cards Component
//!
//! Counters derived from the current list. Active bids are dashboard only.

use leptos::prelude::*;

use crate::config::Variant;
use crate::context::use_desk;
use crate::render;
use crate::store::DeskStateStoreFields;

#[component]
pub fn SummaryCards(variant: Variant) -> impl IntoView {
    let state = use_desk().state;
    let counts = Memo::new(move |_| state.items().with(|items| render::summary(items, variant)));

    view! {
        <div class="summary-cards row">
            <div class="col card">
                <span class="card-label">"Domains"</span>
                <span id="total-domains" class="card-value">{move || counts.get().total}</span>
            </div>
            <div class="col card">
                <span class="card-label">"Auto-bid"</span>
                <span id="auto-bid-count" class="card-value">{move || counts.get().auto_bid}</span>
            </div>
            {move || counts.get().active_bids.map(|active| view! {
                <div class="col card">
                    <span class="card-label">"Active bids"</span>
                    <span id="active-bids" class="card-value">{active}</span>
                </div>
            })}
        </div>
    }
}
