//! Realtime Socket
//!
//! One websocket per page, joined to one channel. Incoming change frames
//! fan out through a `ChangeHub`; subscriptions handed out here keep the
//! socket open, and it closes once the last one is dropped.

use std::rc::Rc;

use bingo_core::remote::realtime::{self, MessageRefs};
use bingo_core::{BingoConfig, BingoError, BingoResult, ChangeFilter, ChangeHub, EventSource, Subscription};
use gloo_timers::callback::Interval;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::{CloseEvent, Event, MessageEvent, WebSocket};

#[derive(Clone)]
pub struct RealtimeSocket {
    inner: Rc<SocketInner>,
}

struct SocketInner {
    ws: WebSocket,
    channel: String,
    refs: Rc<MessageRefs>,
    hub: ChangeHub,
    _heartbeat: Interval,
    _on_open: Closure<dyn FnMut(Event)>,
    _on_message: Closure<dyn FnMut(MessageEvent)>,
    _on_error: Closure<dyn FnMut(Event)>,
    _on_close: Closure<dyn FnMut(CloseEvent)>,
}

impl RealtimeSocket {
    /// Open the socket and join `channel` with `filters` once connected
    pub fn connect(config: &BingoConfig, channel: &str, filters: &[ChangeFilter]) -> BingoResult<Self> {
        let url = realtime::socket_url(config)?;
        let ws = WebSocket::new(&url)
            .map_err(|e| BingoError::Subscription(format!("cannot open websocket: {:?}", e)))?;
        let refs = Rc::new(MessageRefs::default());
        let hub = ChangeHub::new();

        let join = realtime::join_message(channel, filters, &config.supabase_anon_key, refs.next()).to_json();
        let on_open = {
            let ws = ws.clone();
            let channel = channel.to_string();
            Closure::<dyn FnMut(Event)>::new(move |_: Event| {
                log::info!("Realtime connected, joining {}", channel);
                if ws.send_with_str(&join).is_err() {
                    log::error!("Realtime join for {} could not be sent", channel);
                }
            })
        };

        let on_message = {
            let hub = hub.clone();
            Closure::<dyn FnMut(MessageEvent)>::new(move |ev: MessageEvent| {
                if let Some(text) = ev.data().as_string() {
                    realtime::dispatch_frame(&hub, &text);
                }
            })
        };

        let on_error = Closure::<dyn FnMut(Event)>::new(move |_: Event| {
            log::error!("Realtime socket error");
        });

        // ends the streams; the follow loop in `live` opens a new socket
        let on_close = {
            let hub = hub.clone();
            Closure::<dyn FnMut(CloseEvent)>::new(move |ev: CloseEvent| {
                log::warn!("Realtime socket closed ({}) {}", ev.code(), ev.reason());
                hub.close();
            })
        };

        ws.set_onopen(Some(on_open.as_ref().unchecked_ref()));
        ws.set_onmessage(Some(on_message.as_ref().unchecked_ref()));
        ws.set_onerror(Some(on_error.as_ref().unchecked_ref()));
        ws.set_onclose(Some(on_close.as_ref().unchecked_ref()));

        let heartbeat = {
            let ws = ws.clone();
            let refs = refs.clone();
            Interval::new(config.heartbeat_interval_ms, move || {
                if ws.ready_state() == WebSocket::OPEN {
                    let _ = ws.send_with_str(&realtime::heartbeat_message(refs.next()).to_json());
                }
            })
        };

        Ok(Self {
            inner: Rc::new(SocketInner {
                ws,
                channel: channel.to_string(),
                refs,
                hub,
                _heartbeat: heartbeat,
                _on_open: on_open,
                _on_message: on_message,
                _on_error: on_error,
                _on_close: on_close,
            }),
        })
    }
}

impl EventSource for RealtimeSocket {
    fn subscribe(&self, filter: ChangeFilter) -> BingoResult<Subscription> {
        Ok(self.inner.hub.subscribe(filter)?.retain(self.inner.clone()))
    }
}

impl Drop for SocketInner {
    fn drop(&mut self) {
        if self.ws.ready_state() == WebSocket::OPEN {
            let leave = realtime::leave_message(&self.channel, self.refs.next());
            let _ = self.ws.send_with_str(&leave.to_json());
        }
        self.ws.set_onopen(None);
        self.ws.set_onmessage(None);
        self.ws.set_onerror(None);
        self.ws.set_onclose(None);
        let _ = self.ws.close();
        self.hub.close();
        log::debug!("Realtime socket for {} released", self.channel);
    }
}
