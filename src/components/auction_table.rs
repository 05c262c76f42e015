//! Auction Table Component
//!
//! Full redraw of the list on every change. Row controls are handled by
//! one delegated listener on the table body, keyed by `data-domain`.

use leptos::prelude::*;
use leptos::task::spawn_local;
use wasm_bindgen::JsCast;
use web_sys::{Element, HtmlInputElement};

use crate::config::Variant;
use crate::context::use_desk;
use crate::desk::Followup;
use crate::render::{self, RowView, TableBody, ROW_CLASS};
use crate::store::DeskStateStoreFields;

const ACTION_BID: &str = "bid";
const ACTION_SETTINGS: &str = "settings";
const ACTION_AUTO_BID: &str = "auto-bid";

/// Closest element carrying `data-action`, with its action and domain
fn action_target(ev: &web_sys::Event) -> Option<(String, String, Element)> {
    let target = ev.target()?.dyn_into::<Element>().ok()?;
    let el = target.closest("[data-action]").ok()??;
    let action = el.get_attribute("data-action")?;
    let domain = el.get_attribute("data-domain")?;
    Some((action, domain, el))
}

#[component]
fn AuctionRow(row: RowView) -> impl IntoView {
    let class = match (row.is_winning, row.is_my_bid) {
        (true, _) => format!("{ROW_CLASS} winning"),
        (false, true) => format!("{ROW_CLASS} my-bid"),
        _ => ROW_CLASS.to_string(),
    };
    let domain = row.domain.clone();

    view! {
        <tr class=class>
            <td class="domain">
                {row.indicator.map(|icon| view! { <span class="bid-indicator">{icon}</span> })}
                <strong>{row.domain.clone()}</strong>
            </td>
            <td>{row.current_bid}</td>
            {row.my_bid.map(|mine| view! { <td>{mine}</td> })}
            <td>{row.time_left}</td>
            <td>{row.max_bid}</td>
            <td>
                <input
                    type="checkbox"
                    class="form-check-input"
                    data-action=ACTION_AUTO_BID
                    data-domain=domain.clone()
                    prop:checked=row.auto_bid_enabled
                />
            </td>
            <td class="actions">
                <button class="btn btn-sm btn-primary" data-action=ACTION_BID data-domain=domain.clone()>
                    "Bid"
                </button>
                <button class="btn btn-sm btn-outline-secondary" data-action=ACTION_SETTINGS data-domain=domain>
                    "Settings"
                </button>
            </td>
        </tr>
    }
}

#[component]
pub fn AuctionTable(variant: Variant) -> impl IntoView {
    let ctx = use_desk();
    let state = ctx.state;

    let on_click = move |ev: web_sys::MouseEvent| {
        let Some((action, domain, _)) = action_target(&ev) else { return };
        match action.as_str() {
            ACTION_BID => ctx.desk().open_bid_modal(&domain),
            ACTION_SETTINGS => ctx.desk().open_settings_modal(&domain),
            _ => {}
        }
    };

    let on_change = move |ev: web_sys::Event| {
        let Some((action, domain, el)) = action_target(&ev) else { return };
        if action != ACTION_AUTO_BID {
            return;
        }
        let Ok(input) = el.dyn_into::<HtmlInputElement>() else { return };
        let enabled = input.checked();
        let desk = ctx.desk();
        spawn_local(async move {
            match desk.toggle_auto_bid(&domain, enabled).await {
                Some(Followup::RevertToggle { checked, .. }) => input.set_checked(checked),
                other => ctx.run(other),
            }
        });
    };

    let body = move || match state.items().with(|items| render::table_body(items, variant)) {
        TableBody::Placeholder(placeholder) => view! {
            <tr>
                <td colspan=placeholder.colspan.to_string() class="text-center text-muted py-4">
                    <p class="mb-1">{placeholder.title}</p>
                    {placeholder.hint.map(|hint| view! { <small>{hint}</small> })}
                </td>
            </tr>
        }
        .into_any(),
        TableBody::Rows(rows) => rows
            .into_iter()
            .map(|row| view! { <AuctionRow row=row /> })
            .collect_view()
            .into_any(),
    };

    view! {
        <table class="table auction-table">
            <thead>
                <tr>
                    <th>"Domain"</th>
                    <th>"Current bid"</th>
                    <Show when=move || variant == Variant::Dashboard>
                        <th>"My bid"</th>
                    </Show>
                    <th>"Time left"</th>
                    <th>"Max bid"</th>
                    <th>"Auto-bid"</th>
                    <th>"Actions"</th>
                </tr>
            </thead>
            <tbody id="auctions-tbody" on:click=on_click on:change=on_change>
                {body}
            </tbody>
        </table>
    }
}
