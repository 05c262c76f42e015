//! Bid Modal Component
//!
//! Prefilled bid form for one domain.

use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::context::use_desk;
use crate::render::format_money;
use crate::store::{BidForm, DeskStateStoreFields, Modal};

#[component]
fn BidDialog(form: BidForm) -> impl IntoView {
    let ctx = use_desk();
    let state = ctx.state;
    let amount = RwSignal::new(form.amount.clone());
    let domain = form.domain.clone();

    let submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let desk = ctx.desk();
        let domain = domain.clone();
        let amount = amount.get_untracked();
        spawn_local(async move {
            let followup = desk.submit_bid(&domain, &amount).await;
            ctx.run(followup);
        });
    };
    let close = move |_| ctx.desk().close_modal();

    view! {
        <div class="modal-backdrop show" on:click=close>
            <div class="modal-dialog" on:click=|ev| ev.stop_propagation()>
                <form id="bid-form" class="modal-content" on:submit=submit>
                    <div class="modal-header">
                        <h5 class="modal-title">"Place bid"</h5>
                        <button type="button" class="btn-close" on:click=close></button>
                    </div>
                    <div class="modal-body">
                        <p>
                            <strong id="bid-domain">{form.domain.clone()}</strong>
                            " · current "
                            <span id="bid-current">{format_money(form.current_bid)}</span>
                        </p>
                        <input
                            type="number"
                            id="bid-amount"
                            class="form-control"
                            step="0.01"
                            min="0"
                            max=form.ceiling.map(|c| c.to_string())
                            prop:value=move || amount.get()
                            on:input=move |ev| amount.set(event_target_value(&ev))
                        />
                        {form.ceiling.map(|c| view! {
                            <small class="text-muted">{format!("Limit: {}", format_money(c))}</small>
                        })}
                    </div>
                    <div class="modal-footer">
                        <button type="button" class="btn btn-secondary" on:click=close>"Cancel"</button>
                        <button
                            type="submit"
                            id="submit-bid"
                            class="btn btn-primary"
                            disabled=move || state.busy().get().submit_bid
                        >
                            {move || if state.busy().get().submit_bid { "Placing..." } else { "Place bid" }}
                        </button>
                    </div>
                </form>
            </div>
        </div>
    }
}

#[component]
pub fn BidModal() -> impl IntoView {
    let state = use_desk().state;
    let form = Memo::new(move |_| match state.modal().get() {
        Some(Modal::Bid(form)) => Some(form),
        _ => None,
    });

    move || form.get().map(|form| view! { <BidDialog form=form /> })
}
