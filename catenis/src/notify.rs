// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

use std::fmt::{Debug, Formatter};
use std::sync::{Arc, Mutex};

use catenis_core::{Error, ErrorKind, Result, WsConnection, WsMessage};
use catenis_ctn1::X_BCOT_TIMESTAMP;
use http::header::{AUTHORIZATION, SEC_WEBSOCKET_PROTOCOL};
use http::HeaderMap;
use log::{debug, warn};
use serde_json::{Map, Value};
use tokio::runtime::Handle;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use crate::constants::*;
use crate::endpoint::ServiceType;
use crate::invoke::Invoker;

/// Events delivered by a [`WsNotifyChannel`].
#[derive(Debug)]
pub enum NotifyEvent {
    /// The service accepted the channel and will start sending notifications.
    Open,
    /// A notification, as sent by the service.
    Notify(Value),
    /// The channel failed. A close follows.
    Error(Error),
    /// The channel is closed.
    Close {
        /// WebSocket close code.
        code: u16,
        /// WebSocket close reason.
        reason: String,
    },
}

enum ChannelState {
    Idle,
    Connecting,
    Open(UnboundedSender<()>),
    Closed,
}

/// WsNotifyChannel receives notifications of one event over a WebSocket.
///
/// Events are read with [`WsNotifyChannel::recv`] once the channel is open. A
/// closed channel may be opened again, events of every session share one stream.
pub struct WsNotifyChannel {
    event_name: String,
    invoker: Arc<Invoker>,
    runtime: Option<Handle>,

    state: Arc<Mutex<ChannelState>>,
    events_tx: UnboundedSender<NotifyEvent>,
    events_rx: tokio::sync::Mutex<UnboundedReceiver<NotifyEvent>>,
}

impl Debug for WsNotifyChannel {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WsNotifyChannel")
            .field("event_name", &self.event_name)
            .field("is_open", &self.is_open())
            .finish_non_exhaustive()
    }
}

impl WsNotifyChannel {
    pub(crate) fn new(invoker: Arc<Invoker>, event_name: String, runtime: Option<Handle>) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        Self {
            event_name,
            invoker,
            runtime,
            state: Arc::new(Mutex::new(ChannelState::Idle)),
            events_tx,
            events_rx: tokio::sync::Mutex::new(events_rx),
        }
    }

    /// Name of the notification event this channel listens to.
    pub fn event_name(&self) -> &str {
        &self.event_name
    }

    /// Whether the channel is open.
    pub fn is_open(&self) -> bool {
        matches!(
            *self.state.lock().expect("lock poisoned"),
            ChannelState::Open(_)
        )
    }

    /// Open the channel.
    ///
    /// Returns once the WebSocket is connected and the authentication message is
    /// sent. The service confirms the channel with a [`NotifyEvent::Open`].
    pub async fn open(&self) -> Result<()> {
        let guard = ConnectingGuard::enter(&self.state)?;

        let handle = match &self.runtime {
            Some(handle) => handle.clone(),
            None => Handle::try_current().map_err(|e| {
                Error::notify_channel_open("no runtime to drive the notification channel")
                    .with_source(e)
            })?,
        };

        let conn = self.connect().await.map_err(|e| {
            if e.kind() == ErrorKind::NotifyChannelOpen {
                e
            } else {
                Error::notify_channel_open("failed to open notification channel").with_source(e)
            }
        })?;

        let (close_tx, close_rx) = mpsc::unbounded_channel();
        guard.open(close_tx);

        debug!("notification channel for {} is open", self.event_name);
        handle.spawn(run_channel(
            conn,
            close_rx,
            self.events_tx.clone(),
            self.state.clone(),
        ));
        Ok(())
    }

    async fn connect(&self) -> Result<Box<dyn WsConnection>> {
        let url = self.invoker.endpoints().assemble(
            ServiceType::WsNotify,
            ":eventName",
            &[("eventName", self.event_name.as_str())],
            &[],
        )?;

        // The handshake can't carry the signature, so it goes in the first message.
        let (mut parts, ()) = http::Request::get(url.as_str()).body(())?.into_parts();
        self.invoker.sign(&mut parts, b"").await?;
        let auth = auth_message(&parts.headers)?;

        let req = http::Request::get(url.as_str())
            .header(SEC_WEBSOCKET_PROTOCOL, NOTIFY_WS_SUBPROTOCOL)
            .body(())?;
        let mut conn = self.invoker.context().ws_connect(req).await?;
        conn.send_text(auth).await?;

        Ok(conn)
    }

    /// Close the channel.
    ///
    /// Does nothing if the channel is not open. The closing completes in the
    /// background and ends with a [`NotifyEvent::Close`].
    pub fn close(&self) {
        if let ChannelState::Open(close_tx) = &*self.state.lock().expect("lock poisoned") {
            debug!("closing notification channel for {}", self.event_name);
            let _ = close_tx.send(());
        }
    }

    /// Receive the next event.
    ///
    /// Returns `None` once every event of a closed channel has been received,
    /// or right away if the channel was never opened. Events left over from a
    /// previous session are still delivered after the channel is reopened.
    pub async fn recv(&self) -> Option<NotifyEvent> {
        let mut events = self.events_rx.lock().await;
        // The close event is queued before the state leaves `Open`.
        if !self.is_open() {
            return events.try_recv().ok();
        }
        events.recv().await
    }
}

impl Drop for WsNotifyChannel {
    fn drop(&mut self) {
        if let Ok(state) = self.state.lock() {
            if let ChannelState::Open(close_tx) = &*state {
                let _ = close_tx.send(());
            }
        }
    }
}

/// Moves the channel to `Connecting` and back to `Idle` unless opening succeeds.
struct ConnectingGuard<'a> {
    state: &'a Mutex<ChannelState>,
    done: bool,
}

impl<'a> ConnectingGuard<'a> {
    fn enter(state: &'a Mutex<ChannelState>) -> Result<Self> {
        let mut current = state.lock().expect("lock poisoned");
        if matches!(*current, ChannelState::Connecting | ChannelState::Open(_)) {
            return Err(Error::notify_channel_already_open());
        }
        *current = ChannelState::Connecting;

        Ok(Self { state, done: false })
    }

    fn open(mut self, close_tx: UnboundedSender<()>) {
        *self.state.lock().expect("lock poisoned") = ChannelState::Open(close_tx);
        self.done = true;
    }
}

impl Drop for ConnectingGuard<'_> {
    fn drop(&mut self) {
        if self.done {
            return;
        }
        if let Ok(mut state) = self.state.lock() {
            *state = ChannelState::Idle;
        }
    }
}

/// Build the authentication message from the headers of the signed request.
fn auth_message(headers: &HeaderMap) -> Result<String> {
    let mut msg = Map::new();
    for name in [X_BCOT_TIMESTAMP, AUTHORIZATION.as_str()] {
        let value = match headers.get(name) {
            Some(v) => v.to_str()?.to_string(),
            None => String::new(),
        };
        msg.insert(name.to_string(), Value::String(value));
    }

    serde_json::to_string(&msg)
        .map_err(|e| Error::unexpected("failed to serialize auth message").with_source(e))
}

/// Read the socket until it's closed, forwarding everything as events.
async fn run_channel(
    mut conn: Box<dyn WsConnection>,
    mut close_rx: UnboundedReceiver<()>,
    events: UnboundedSender<NotifyEvent>,
    state: Arc<Mutex<ChannelState>>,
) {
    let mut closing = false;

    let (code, reason) = loop {
        tokio::select! {
            _ = close_rx.recv(), if !closing => {
                closing = true;
                if let Err(e) = conn.close(WS_CLOSE_NORMAL, "").await {
                    warn!("failed to close notification channel: {e}");
                    let _ = events.send(NotifyEvent::Error(e));
                    break (WS_CLOSE_ABNORMAL, String::new());
                }
            }
            msg = conn.recv() => match msg {
                Some(Ok(WsMessage::Text(text))) if text == NOTIFY_CHANNEL_OPEN_MSG => {
                    let _ = events.send(NotifyEvent::Open);
                }
                Some(Ok(WsMessage::Text(text))) => {
                    let event = match serde_json::from_str::<Value>(&text) {
                        Ok(payload) => NotifyEvent::Notify(payload),
                        Err(e) => {
                            warn!("invalid notification message: {text}");
                            NotifyEvent::Error(
                                Error::notify_channel("invalid notification message").with_source(e),
                            )
                        }
                    };
                    let _ = events.send(event);
                }
                Some(Ok(WsMessage::Close { code, reason })) => break (code, reason),
                Some(Err(e)) => {
                    warn!("notification channel failed: {e}");
                    let _ = events.send(NotifyEvent::Error(e));

                    if closing {
                        break (WS_CLOSE_ABNORMAL, String::new());
                    }
                    closing = true;
                    if conn.close(WS_CLOSE_POLICY_VIOLATION, "").await.is_err() {
                        break (WS_CLOSE_ABNORMAL, String::new());
                    }
                }
                None => break (WS_CLOSE_ABNORMAL, String::new()),
            }
        }
    };

    debug!("notification channel closed with code {code}");
    let mut current = match state.lock() {
        Ok(current) => current,
        Err(poisoned) => poisoned.into_inner(),
    };
    let _ = events.send(NotifyEvent::Close { code, reason });
    *current = ChannelState::Closed;
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::HeaderValue;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_auth_message() {
        let mut headers = HeaderMap::new();
        headers.insert(X_BCOT_TIMESTAMP, HeaderValue::from_static("20240101T120000Z"));
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_static("CTN1-HMAC-SHA256 Credential=dev1/20240101/ctn1_request, Signature=abc"),
        );
        headers.insert("host", HeaderValue::from_static("catenis.io"));

        assert_eq!(
            auth_message(&headers).unwrap(),
            r#"{"authorization":"CTN1-HMAC-SHA256 Credential=dev1/20240101/ctn1_request, Signature=abc","x-bcot-timestamp":"20240101T120000Z"}"#
        );
    }

    #[test]
    fn test_connecting_guard_resets_state() {
        let state = Mutex::new(ChannelState::Closed);

        {
            let _guard = ConnectingGuard::enter(&state).unwrap();
            assert!(matches!(*state.lock().unwrap(), ChannelState::Connecting));
            let err = ConnectingGuard::enter(&state).err().unwrap();
            assert_eq!(err.kind(), ErrorKind::NotifyChannelAlreadyOpen);
        }
        assert!(matches!(*state.lock().unwrap(), ChannelState::Idle));

        let (tx, _rx) = mpsc::unbounded_channel();
        ConnectingGuard::enter(&state).unwrap().open(tx);
        assert!(matches!(*state.lock().unwrap(), ChannelState::Open(_)));
    }
}
