//! Login Form Component
//!
//! Monitor page credentials form. The outcome arrives as a push event.

use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::context::use_desk;
use crate::store::DeskStateStoreFields;

#[component]
pub fn LoginForm() -> impl IntoView {
    let ctx = use_desk();
    let state = ctx.state;

    let (email, set_email) = signal(String::new());
    let (password, set_password) = signal(String::new());

    let submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let desk = ctx.desk();
        let (email, password) = (email.get_untracked(), password.get_untracked());
        spawn_local(async move {
            desk.login(&email, &password).await;
            set_password.set(String::new());
        });
    };

    view! {
        <Show
            when=move || !state.is_logged_in().get()
            fallback=|| view! { <p class="login-done text-success">"Signed in."</p> }
        >
            <form id="login-form" class="login-form" on:submit=submit>
                <input
                    type="email"
                    id="email"
                    placeholder="Email"
                    prop:value=move || email.get()
                    on:input=move |ev| set_email.set(event_target_value(&ev))
                />
                <input
                    type="password"
                    id="password"
                    placeholder="Password"
                    prop:value=move || password.get()
                    on:input=move |ev| set_password.set(event_target_value(&ev))
                />
                <button
                    type="submit"
                    id="login-btn"
                    class="btn btn-primary"
                    disabled=move || state.busy().get().login
                >
                    {move || if state.busy().get().login { "Signing in..." } else { "Sign in" }}
                </button>
            </form>
        </Show>
    }
}
