//! Refresh On Return
//!
//! Pushed changes can be missed while the socket is down or the tab sleeps;
//! reload when the window regains focus or the tab becomes visible again.

use leptos::ev;
use leptos::prelude::*;

pub fn refresh_on_return(refresh: impl Fn() + Clone + 'static) {
    let on_focus = {
        let refresh = refresh.clone();
        window_event_listener(ev::focus, move |_| refresh())
    };
    let on_visible = window_event_listener(ev::Custom::<web_sys::Event>::new("visibilitychange"), move |_| {
        if !document().hidden() {
            refresh();
        }
    });
    on_cleanup(move || {
        on_focus.remove();
        on_visible.remove();
    });
}
