//! Toast Component
//!
//! One toast slot per surface; each toast dismisses itself after its
//! duration unless a newer one took its place.

use gloo_timers::callback::Timeout;
use leptos::prelude::*;

use crate::activity::ToastSurface;
use crate::config::millis;
use crate::context::use_desk;
use crate::store::DeskStateStoreFields;

#[component]
pub fn ToastHost(surface: ToastSurface) -> impl IntoView {
    let ctx = use_desk();
    let state = ctx.state;
    let toast = Memo::new(move |_| match surface {
        ToastSurface::General => state.toast().get(),
        ToastSurface::AutoBid => state.auto_bid_toast().get(),
    });

    // Replacing the handle cancels the previous toast's timer
    let dismiss_timer = StoredValue::new_local(None::<Timeout>);
    Effect::new(move |_| {
        let timer = toast.get().map(|t| {
            let id = t.id;
            Timeout::new(millis(t.duration), move || ctx.desk().dismiss_toast(surface, id))
        });
        dismiss_timer.set_value(timer);
    });

    let container_class = match surface {
        ToastSurface::General => "toast-container position-fixed top-0 end-0 p-3",
        ToastSurface::AutoBid => "toast-container position-fixed bottom-0 end-0 p-3",
    };

    view! {
        <div class=container_class>
            {move || toast.get().map(|t| {
                let id = t.id;
                view! {
                    <div class="toast show fade-in" role="alert">
                        <div class="toast-header">
                            <i class=t.kind.icon_class()></i>
                            <strong class="me-auto">{t.title}</strong>
                            <button
                                type="button"
                                class="btn-close"
                                on:click=move |_| ctx.desk().dismiss_toast(surface, id)
                            ></button>
                        </div>
                        <div class="toast-body">{t.message}</div>
                    </div>
                }
            })}
        </div>
    }
}
