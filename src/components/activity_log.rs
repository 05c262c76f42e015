//! Activity Log Component
//!
//! Time-stamped entries, newest at the bottom, kept scrolled to the end.

use leptos::html;
use leptos::prelude::*;

use crate::activity::LogEntry;
use crate::context::use_desk;
use crate::store::DeskStateStoreFields;

#[component]
pub fn ActivityLogPanel() -> impl IntoView {
    let state = use_desk().state;
    let container = NodeRef::<html::Div>::new();

    let entries = move || state.activity().with(|log| log.entries().cloned().collect::<Vec<LogEntry>>());

    // Follow the newest entry
    Effect::new(move |_| {
        state.activity().track();
        if let Some(el) = container.get() {
            el.set_scroll_top(el.scroll_height());
        }
    });

    view! {
        <div class="card activity-card">
            <div class="card-header">"Activity"</div>
            <div id="activity-log" class="activity-log" node_ref=container>
                <For
                    each=entries
                    key=|entry| entry.id
                    children=move |entry| {
                        view! {
                            <div class=format!("log-entry {}", entry.level.css_class())>
                                <span class="log-time">{entry.time}</span>
                                <span class="log-message">{entry.message}</span>
                            </div>
                        }
                    }
                />
            </div>
        </div>
    }
}
