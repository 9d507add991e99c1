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

//! [`WsConnect`] implementation backed by [`tokio_tungstenite`].

use async_trait::async_trait;
use catenis_core::{Error, Result, WsConnect, WsConnection, WsMessage};
use futures::{SinkExt, StreamExt};
use log::debug;
use std::fmt::{Debug, Formatter};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::protocol::frame::coding::CloseCode;
use tokio_tungstenite::tungstenite::protocol::CloseFrame;
use tokio_tungstenite::tungstenite::{self, Message};
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

/// TungsteniteWsConnect opens WebSocket connections with tokio-tungstenite.
#[derive(Debug, Default, Clone, Copy)]
pub struct TungsteniteWsConnect;

#[async_trait]
impl WsConnect for TungsteniteWsConnect {
    async fn ws_connect(&self, req: http::Request<()>) -> Result<Box<dyn WsConnection>> {
        // Let tungstenite fill in the handshake headers, then carry ours over.
        let mut handshake = req
            .uri()
            .to_string()
            .into_client_request()
            .map_err(|e| Error::request_invalid("invalid websocket url").with_source(e))?;
        for (name, value) in req.headers() {
            handshake.headers_mut().insert(name.clone(), value.clone());
        }

        debug!("connecting websocket: {}", handshake.uri());
        let (stream, resp) = connect_async(handshake).await.map_err(|e| {
            Error::notify_channel_open("failed to establish websocket connection").with_source(e)
        })?;
        debug!("websocket connected with status {}", resp.status());

        Ok(Box::new(TungsteniteWsConnection { stream }))
    }
}

/// An open WebSocket connection.
pub struct TungsteniteWsConnection {
    stream: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

impl Debug for TungsteniteWsConnection {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TungsteniteWsConnection").finish_non_exhaustive()
    }
}

#[async_trait]
impl WsConnection for TungsteniteWsConnection {
    async fn send_text(&mut self, text: String) -> Result<()> {
        self.stream
            .send(Message::Text(text))
            .await
            .map_err(|e| Error::notify_channel("failed to send websocket message").with_source(e))
    }

    async fn recv(&mut self) -> Option<Result<WsMessage>> {
        loop {
            let msg = match self.stream.next().await? {
                Ok(msg) => msg,
                Err(tungstenite::Error::ConnectionClosed | tungstenite::Error::AlreadyClosed) => {
                    return None
                }
                Err(e) => {
                    return Some(Err(
                        Error::notify_channel("websocket connection failed").with_source(e)
                    ))
                }
            };

            match msg {
                Message::Text(text) => return Some(Ok(WsMessage::Text(text))),
                Message::Close(frame) => {
                    let (code, reason) = match frame {
                        Some(frame) => (u16::from(frame.code), frame.reason.into_owned()),
                        None => (u16::from(CloseCode::Status), String::new()),
                    };
                    return Some(Ok(WsMessage::Close { code, reason }));
                }
                // Pings are answered by tungstenite itself.
                _ => continue,
            }
        }
    }

    async fn close(&mut self, code: u16, reason: &str) -> Result<()> {
        let frame = CloseFrame {
            code: CloseCode::from(code),
            reason: reason.to_string().into(),
        };

        match self.stream.close(Some(frame)).await {
            Ok(()) | Err(tungstenite::Error::ConnectionClosed | tungstenite::Error::AlreadyClosed) => {
                Ok(())
            }
            Err(e) => Err(Error::notify_channel("failed to close websocket").with_source(e)),
        }
    }
}
