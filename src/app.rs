//! Auction Desk App
//!
//! Root component: picks the page variant, wires the push channel and the
//! controller, then lays out the page.

use gloo_timers::callback::{Interval, Timeout};
use leptos::prelude::*;
use push_channel::{socket_url, PushChannel};
use reactive_stores::Store;

use crate::api::HttpApi;
use crate::components::{
    ActivityLogPanel, AuctionTable, BidModal, LoginForm, SettingsModal, StatusBar, SummaryCards,
    ToastHost,
};
use crate::activity::ToastSurface;
use crate::config::{millis, DeskConfig, Variant};
use crate::context::DeskContext;
use crate::desk::Desk;
use crate::push;
use crate::store::DeskState;

#[component]
pub fn App() -> impl IntoView {
    let location = window().location();
    let variant = location
        .pathname()
        .map(|path| Variant::from_path(&path))
        .unwrap_or(Variant::Monitor);
    let config = DeskConfig::for_variant(variant);

    // State
    let state = Store::new(DeskState::new(&config));

    // Push channel
    let url = socket_url(
        &location.protocol().unwrap_or_default(),
        &location.host().unwrap_or_default(),
        &config.socket_path,
    );
    let channel = PushChannel::connect(url);

    let periodic_refresh = config.periodic_refresh;
    let welcome_delay = config.welcome_delay;
    let desk = Desk::new(HttpApi::new(&config), channel.clone(), state, config);
    let ctx = DeskContext::new(state, desk, channel.clone());
    provide_context(ctx);

    push::subscribe(&channel, move |event| ctx.handle_push(event));

    if variant == Variant::Dashboard {
        ctx.run(ctx.desk().start());

        let welcome = welcome_delay.map(|delay| Timeout::new(millis(delay), move || ctx.desk().welcome()));
        let periodic = periodic_refresh.map(|every| {
            Interval::new(millis(every), move || ctx.run(ctx.desk().periodic_tick()))
        });
        let tick = move || ctx.now.set(chrono::Local::now().format("%H:%M:%S").to_string());
        tick();
        let clock = Interval::new(1_000, tick);

        ctx.set_timers(|t| {
            t.welcome = welcome;
            t.periodic = periodic;
            t.clock = Some(clock);
        });
    }

    on_cleanup(move || ctx.teardown());

    view! {
        <div class="container">
            <StatusBar variant=variant />

            <Show when=move || variant == Variant::Monitor>
                <LoginForm />
            </Show>

            <SummaryCards variant=variant />

            <div class="row">
                <main class="col-lg-8">
                    <AuctionTable variant=variant />
                </main>
                <aside class="col-lg-4">
                    <ActivityLogPanel />
                </aside>
            </div>

            <BidModal />
            <SettingsModal />

            <ToastHost surface=ToastSurface::General />
            <Show when=move || variant == Variant::Dashboard>
                <ToastHost surface=ToastSurface::AutoBid />
            </Show>
        </div>
    }
}
