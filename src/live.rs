//! Live Item List
//!
//! Wiring shared by the board and admin pages: full loads into the page
//! store and a change subscription bound to the component's lifetime. A
//! dropped socket is reopened with backoff, and every resubscribe reloads
//! the rows to cover what was missed in between.

use std::time::Duration;

use bingo_core::{Backoff, BingoConfig, EventSource, ItemCache, ItemRepository, SyncClient};
use futures::future::abortable;
use gloo_timers::future::TimeoutFuture;
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::realtime::RealtimeSocket;
use crate::store::{store_set_loaded, ItemsStore};

/// Reload every row. Failures are logged; the store keeps what it had.
pub fn spawn_refresh<R, C>(sync: SyncClient<R, C>, store: ItemsStore)
where
    R: ItemRepository + 'static,
    C: ItemCache + 'static,
{
    spawn_local(async move {
        match sync.refresh().await {
            Ok(count) => {
                log::info!("Loaded {} items", count);
                store_set_loaded(&store);
            }
            Err(e) => log::error!("Error loading items: {}", e),
        }
    });
}

/// Subscribe `sync` to `channel` until the owning component is cleaned up
pub fn follow_changes<R, C>(config: &BingoConfig, channel: &str, sync: SyncClient<R, C>, store: ItemsStore)
where
    R: ItemRepository + Clone + 'static,
    C: ItemCache + Clone + 'static,
{
    let filter = sync.filter(&config.schema, &config.table);
    let backoff = Backoff::from_config(config);
    let connect = {
        let config = config.clone();
        let channel = channel.to_string();
        let sync = sync.clone();
        move |attempt: u32| {
            if attempt > 0 {
                log::info!("Rejoining {} (attempt {})", channel, attempt);
                spawn_refresh(sync.clone(), store);
            }
            RealtimeSocket::connect(&config, &channel, std::slice::from_ref(&filter))
                .and_then(|socket| socket.subscribe(filter.clone()))
        }
    };
    let sleep = |delay: Duration| TimeoutFuture::new(u32::try_from(delay.as_millis()).unwrap_or(u32::MAX));

    let (task, handle) = abortable(async move { sync.follow_reconnecting(connect, backoff, sleep).await });
    spawn_local(async move {
        let _ = task.await;
    });
    on_cleanup(move || handle.abort());
}
