//! Desk Context
//!
//! Shared handles provided via Leptos Context API, plus the timers that
//! carry out a controller's `Followup`s.

use gloo_timers::callback::{Interval, Timeout};
use leptos::prelude::*;
use leptos::task::spawn_local;
use push_channel::PushChannel;
use tracing::warn;

use crate::api::HttpApi;
use crate::config::millis;
use crate::desk::{Desk, Followup};
use crate::push::PushEvent;
use crate::store::DeskStore;

pub type AppDesk = Desk<HttpApi, PushChannel, DeskStore>;

/// Every timer the page owns. Dropping a handle cancels it.
#[derive(Default)]
pub struct Timers {
    /// Pending delayed refresh; a newer one replaces it
    pub settle: Option<Timeout>,
    pub welcome: Option<Timeout>,
    pub periodic: Option<Interval>,
    pub clock: Option<Interval>,
}

#[derive(Clone, Copy)]
pub struct DeskContext {
    pub state: DeskStore,
    /// Wall clock shown in the dashboard header
    pub now: RwSignal<String>,
    desk: StoredValue<AppDesk, LocalStorage>,
    channel: StoredValue<PushChannel, LocalStorage>,
    timers: StoredValue<Timers, LocalStorage>,
}

impl DeskContext {
    pub fn new(state: DeskStore, desk: AppDesk, channel: PushChannel) -> Self {
        Self {
            state,
            now: RwSignal::new(String::new()),
            desk: StoredValue::new_local(desk),
            channel: StoredValue::new_local(channel),
            timers: StoredValue::new_local(Timers::default()),
        }
    }

    pub fn desk(&self) -> AppDesk {
        self.desk.get_value()
    }

    /// Re-read the auction list in the background.
    pub fn refresh(&self) {
        let desk = self.desk();
        spawn_local(async move { desk.refresh_auctions().await });
    }

    pub fn run(&self, followup: Option<Followup>) {
        match followup {
            None => {}
            Some(Followup::Refresh) => self.refresh(),
            Some(Followup::RefreshAfter(delay)) => {
                let ctx = *self;
                let timeout = Timeout::new(millis(delay), move || ctx.refresh());
                self.timers.update_value(|t| t.settle = Some(timeout));
            }
            // Needs the originating element; the table handles it
            Some(Followup::RevertToggle { domain, .. }) => {
                warn!(%domain, "toggle revert reached the context");
            }
        }
    }

    pub fn handle_push(&self, event: PushEvent) {
        let followup = self.desk().handle_push(event);
        self.run(followup);
    }

    pub fn set_timers(&self, f: impl FnOnce(&mut Timers)) {
        self.timers.update_value(f);
    }

    /// Cancel every timer and close the push channel.
    pub fn teardown(&self) {
        self.timers.update_value(|t| *t = Timers::default());
        self.channel.with_value(PushChannel::close);
    }
}

pub fn use_desk() -> DeskContext {
    expect_context::<DeskContext>()
}
