//! Realtime Wire Protocol
//!
//! Frames for Supabase Realtime (Phoenix channels, `vsn=1.0.0`). A channel is
//! joined with its `postgres_changes` filters; row changes then arrive as
//! `postgres_changes` frames on the channel topic. The socket must see a
//! heartbeat on the `phoenix` topic at least every 30 seconds.

use std::cell::Cell;

use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::config::BingoConfig;
use crate::domain::{Item, ItemId};
use crate::error::{BingoError, BingoResult};
use crate::feed::{ChangeEvent, ChangeFilter, ChangeHub, ChangeKind, RowChange};

pub const PROTOCOL_VSN: &str = "1.0.0";
const PHOENIX_TOPIC: &str = "phoenix";

pub mod events {
    pub const JOIN: &str = "phx_join";
    pub const LEAVE: &str = "phx_leave";
    pub const REPLY: &str = "phx_reply";
    pub const ERROR: &str = "phx_error";
    pub const CLOSE: &str = "phx_close";
    pub const HEARTBEAT: &str = "heartbeat";
    pub const POSTGRES_CHANGES: &str = "postgres_changes";
    pub const SYSTEM: &str = "system";
}

/// One Phoenix frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhoenixMessage {
    pub topic: String,
    pub event: String,
    #[serde(default)]
    pub payload: Value,
    #[serde(rename = "ref", default)]
    pub msg_ref: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub join_ref: Option<String>,
}

impl PhoenixMessage {
    pub fn to_json(&self) -> String {
        // a Value payload always serializes
        serde_json::to_string(self).unwrap_or_default()
    }
}

/// Monotonic message refs for one socket
#[derive(Debug, Default)]
pub struct MessageRefs(Cell<u64>);

impl MessageRefs {
    pub fn next(&self) -> String {
        let next = self.0.get() + 1;
        self.0.set(next);
        next.to_string()
    }
}

/// Websocket url for the project in `config`
pub fn socket_url(config: &BingoConfig) -> BingoResult<String> {
    let base = config.base_url();
    let host = if let Some(rest) = base.strip_prefix("https://") {
        format!("wss://{}", rest)
    } else if let Some(rest) = base.strip_prefix("http://") {
        format!("ws://{}", rest)
    } else {
        return Err(BingoError::Config(format!("cannot derive websocket url from {}", base)));
    };
    Ok(format!(
        "{}/realtime/v1/websocket?apikey={}&vsn={}",
        host,
        utf8_percent_encode(&config.supabase_anon_key, NON_ALPHANUMERIC),
        PROTOCOL_VSN
    ))
}

pub fn channel_topic(channel: &str) -> String {
    format!("realtime:{}", channel)
}

/// Join `channel`, asking for one `postgres_changes` binding per filter kind
pub fn join_message(channel: &str, filters: &[ChangeFilter], access_token: &str, msg_ref: String) -> PhoenixMessage {
    let bindings: Vec<Value> = filters
        .iter()
        .flat_map(|filter| {
            filter.kinds.iter().map(move |kind| {
                json!({
                    "event": kind.as_str(),
                    "schema": filter.schema,
                    "table": filter.table,
                })
            })
        })
        .collect();

    PhoenixMessage {
        topic: channel_topic(channel),
        event: events::JOIN.to_string(),
        payload: json!({
            "config": {
                "broadcast": { "ack": false, "self": false },
                "presence": { "key": "" },
                "postgres_changes": bindings,
                "private": false,
            },
            "access_token": access_token,
        }),
        join_ref: Some(msg_ref.clone()),
        msg_ref: Some(msg_ref),
    }
}

pub fn leave_message(channel: &str, msg_ref: String) -> PhoenixMessage {
    PhoenixMessage {
        topic: channel_topic(channel),
        event: events::LEAVE.to_string(),
        payload: json!({}),
        msg_ref: Some(msg_ref),
        join_ref: None,
    }
}

pub fn heartbeat_message(msg_ref: String) -> PhoenixMessage {
    PhoenixMessage {
        topic: PHOENIX_TOPIC.to_string(),
        event: events::HEARTBEAT.to_string(),
        payload: json!({}),
        msg_ref: Some(msg_ref),
        join_ref: None,
    }
}

/// What an incoming frame means to us
#[derive(Debug, Clone, PartialEq)]
pub enum Frame {
    Change(ChangeEvent),
    /// Answer to a join, leave or heartbeat
    Reply {
        topic: String,
        msg_ref: Option<String>,
        ok: bool,
        response: Value,
    },
    /// Server-side status for the channel, e.g. postgres_changes ready or failed
    System { topic: String, ok: bool, message: String },
    ChannelError { topic: String },
    ChannelClosed { topic: String },
    Other { topic: String, event: String },
}

#[derive(Deserialize)]
struct ChangesPayload {
    data: ChangeData,
}

#[derive(Deserialize)]
struct ChangeData {
    #[serde(rename = "type")]
    kind: String,
    schema: String,
    table: String,
    #[serde(default)]
    record: Option<Value>,
    #[serde(default)]
    old_record: Option<Value>,
}

#[derive(Deserialize)]
struct RowKey {
    id: ItemId,
}

pub fn decode_frame(raw: &str) -> BingoResult<Frame> {
    let message: PhoenixMessage = serde_json::from_str(raw)?;
    let PhoenixMessage {
        topic,
        event,
        payload,
        msg_ref,
        ..
    } = message;

    let frame = match event.as_str() {
        events::POSTGRES_CHANGES => Frame::Change(decode_change(payload)?),
        events::REPLY => {
            let ok = payload.get("status").and_then(Value::as_str) == Some("ok");
            let response = payload.get("response").cloned().unwrap_or(Value::Null);
            Frame::Reply {
                topic,
                msg_ref,
                ok,
                response,
            }
        }
        events::SYSTEM => {
            let ok = payload.get("status").and_then(Value::as_str) == Some("ok");
            let message = payload
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string();
            Frame::System { topic, ok, message }
        }
        events::ERROR => Frame::ChannelError { topic },
        events::CLOSE => Frame::ChannelClosed { topic },
        _ => Frame::Other {
            topic,
            event: event.clone(),
        },
    };
    Ok(frame)
}

fn decode_change(payload: Value) -> BingoResult<ChangeEvent> {
    let ChangesPayload { data } = serde_json::from_value(payload)?;
    let kind = ChangeKind::parse(&data.kind)
        .ok_or_else(|| BingoError::Decode(format!("unknown change type {}", data.kind)))?;

    let change = match kind {
        ChangeKind::Insert | ChangeKind::Update => {
            let record = data
                .record
                .ok_or_else(|| BingoError::Decode(format!("{} without record", data.kind)))?;
            let item: Item = serde_json::from_value(record)?;
            if kind == ChangeKind::Insert {
                RowChange::Insert(item)
            } else {
                RowChange::Update(item)
            }
        }
        ChangeKind::Delete => {
            let old = data
                .old_record
                .ok_or_else(|| BingoError::Decode("DELETE without old_record".into()))?;
            let key: RowKey = serde_json::from_value(old)?;
            RowChange::Delete(key.id)
        }
    };
    Ok(ChangeEvent::new(data.schema, data.table, change))
}

/// Route one incoming text frame: changes go to `hub`, channel trouble is
/// logged. Returns how many subscribers received a change.
pub fn dispatch_frame(hub: &ChangeHub, raw: &str) -> usize {
    match decode_frame(raw) {
        Ok(Frame::Change(event)) => hub.publish(event),
        Ok(Frame::Reply { topic, ok: false, response, .. }) => {
            log::error!("Realtime request on {} failed: {}", topic, response);
            0
        }
        Ok(Frame::System { topic, ok, message }) => {
            if ok {
                log::info!("Realtime {}: {}", topic, message);
            } else {
                log::error!("Realtime {}: {}", topic, message);
            }
            0
        }
        Ok(Frame::ChannelError { topic }) => {
            log::error!("Realtime channel {} errored", topic);
            0
        }
        Ok(Frame::ChannelClosed { topic }) => {
            log::warn!("Realtime channel {} closed by server", topic);
            0
        }
        Ok(Frame::Reply { .. }) | Ok(Frame::Other { .. }) => 0,
        Err(e) => {
            log::warn!("Ignoring realtime frame: {}", e);
            0
        }
    }
}
