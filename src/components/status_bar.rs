//! Status Bar Component
//!
//! Connection badge, monitoring and refresh controls, last-update stamp.

use leptos::prelude::*;
use tracing::info;

use crate::config::Variant;
use crate::context::use_desk;
use crate::store::DeskStateStoreFields;

#[component]
pub fn StatusBar(variant: Variant) -> impl IntoView {
    let ctx = use_desk();
    let state = ctx.state;

    let toggle_monitoring = move |_| ctx.desk().toggle_monitoring();
    let refresh = move |_| ctx.refresh();

    // Dashboard: confirm, then leave for the monitor page
    let logout = move |_| {
        let win = window();
        if win.confirm_with_message("Sign out of the dashboard?").unwrap_or(false) {
            info!("logout");
            ctx.teardown();
            let _ = win.location().set_href("/");
        }
    };

    let badge_class = move || format!("badge {}", state.status().get().kind.css_class());

    view! {
        <header class="status-bar">
            <span id="status-badge" class=badge_class>
                {move || state.status().get().text}
            </span>

            <button
                id="monitor-btn"
                class=move || if state.is_monitoring().get() { "btn btn-warning" } else { "btn btn-success" }
                disabled=move || !variant.monitoring_unlocked(state.is_logged_in().get())
                on:click=toggle_monitoring
            >
                {move || if state.is_monitoring().get() { "Stop Monitoring" } else { "Start Monitoring" }}
            </button>

            <button
                id="refresh-btn"
                class="btn btn-outline-primary"
                disabled=move || state.busy().get().refresh
                on:click=refresh
            >
                {move || if state.busy().get().refresh { "Refreshing..." } else { "Refresh" }}
            </button>

            <span class="last-update">
                {move || match variant {
                    Variant::Dashboard => format!("Last update: {}", ctx.now.get()),
                    Variant::Monitor => state
                        .last_updated()
                        .get()
                        .map(|stamp| format!("Last update: {}", stamp))
                        .unwrap_or_default(),
                }}
            </span>

            <Show when=move || variant == Variant::Dashboard>
                <button id="logout-btn" class="btn btn-outline-secondary" on:click=logout>
                    "Logout"
                </button>
            </Show>
        </header>
    }
}
