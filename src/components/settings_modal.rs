//! Settings Modal Component
//!
//! Per-domain max bid and auto-bid switch.

use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::context::use_desk;
use crate::render::format_money;
use crate::store::{DeskStateStoreFields, Modal, SettingsForm};

#[component]
fn SettingsDialog(form: SettingsForm) -> impl IntoView {
    let ctx = use_desk();
    let state = ctx.state;
    let max_bid = RwSignal::new(form.max_bid.clone());
    let auto_bid = RwSignal::new(form.auto_bid);
    let domain = form.domain.clone();

    let submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let desk = ctx.desk();
        let domain = domain.clone();
        let (max_bid, auto_bid) = (max_bid.get_untracked(), auto_bid.get_untracked());
        spawn_local(async move {
            let followup = desk.save_settings(&domain, &max_bid, auto_bid).await;
            ctx.run(followup);
        });
    };
    let close = move |_| ctx.desk().close_modal();

    view! {
        <div class="modal-backdrop show" on:click=close>
            <div class="modal-dialog" on:click=|ev| ev.stop_propagation()>
                <form id="settings-form" class="modal-content" on:submit=submit>
                    <div class="modal-header">
                        <h5 class="modal-title">
                            "Settings for " <span id="settings-domain">{form.domain.clone()}</span>
                        </h5>
                        <button type="button" class="btn-close" on:click=close></button>
                    </div>
                    <div class="modal-body">
                        <label for="max-bid">"Max bid"</label>
                        <input
                            type="number"
                            id="max-bid"
                            class="form-control"
                            step="0.01"
                            min="0"
                            max=form.ceiling.map(|c| c.to_string())
                            prop:value=move || max_bid.get()
                            on:input=move |ev| max_bid.set(event_target_value(&ev))
                        />
                        {form.ceiling.map(|c| view! {
                            <small class="text-muted">{format!("Limit: {}", format_money(c))}</small>
                        })}
                        <div class="form-check">
                            <input
                                type="checkbox"
                                id="auto-bid-enabled"
                                class="form-check-input"
                                prop:checked=move || auto_bid.get()
                                on:change=move |ev| auto_bid.set(event_target_checked(&ev))
                            />
                            <label for="auto-bid-enabled">"Auto-bid"</label>
                        </div>
                    </div>
                    <div class="modal-footer">
                        <button type="button" class="btn btn-secondary" on:click=close>"Cancel"</button>
                        <button
                            type="submit"
                            id="save-settings"
                            class="btn btn-primary"
                            disabled=move || state.busy().get().save_settings
                        >
                            {move || if state.busy().get().save_settings { "Saving..." } else { "Save" }}
                        </button>
                    </div>
                </form>
            </div>
        </div>
    }
}

#[component]
pub fn SettingsModal() -> impl IntoView {
    let state = use_desk().state;
    let form = Memo::new(move |_| match state.modal().get() {
        Some(Modal::Settings(form)) => Some(form),
        _ => None,
    });

    move || form.get().map(|form| view! { <SettingsDialog form=form /> })
}
