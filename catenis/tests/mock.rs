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

//! In-memory transports used by the tests.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bytes::Bytes;
use catenis::{Client, Config, Context, Error, HttpSend, Result, WsConnect, WsConnection, WsMessage};
use catenis_core::hash::hex_hmac_sha256;
use catenis_ctn1::{canonical_request_string, derive_signing_key, string_to_sign};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender, WeakUnboundedSender};

pub const DEVICE_ID: &str = "dev1";
pub const SECRET: &str = "s3cr3t";

/// A request as it was handed to the transport.
#[derive(Debug, Clone)]
pub struct SentRequest {
    pub method: http::Method,
    pub uri: http::Uri,
    pub headers: http::HeaderMap,
    pub body: Bytes,
}

/// Records every request and answers with the queued responses, or with an
/// empty success envelope once the queue is drained.
#[derive(Debug, Clone, Default)]
pub struct MockHttpSend {
    requests: Arc<Mutex<Vec<SentRequest>>>,
    responses: Arc<Mutex<VecDeque<Result<http::Response<Bytes>>>>>,
}

impl MockHttpSend {
    pub fn respond(&self, status: u16, body: &str) {
        self.respond_with(
            http::Response::builder()
                .status(status)
                .header("content-type", "application/json")
                .body(Bytes::from(body.to_string()))
                .unwrap(),
        );
    }

    #[allow(dead_code)]
    pub fn respond_with(&self, resp: http::Response<Bytes>) {
        self.responses.lock().unwrap().push_back(Ok(resp));
    }

    pub fn fail(&self, err: Error) {
        self.responses.lock().unwrap().push_back(Err(err));
    }

    pub fn requests(&self) -> Vec<SentRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn last_request(&self) -> SentRequest {
        self.requests().pop().expect("no request was sent")
    }
}

#[async_trait]
impl HttpSend for MockHttpSend {
    async fn http_send(&self, req: http::Request<Bytes>) -> Result<http::Response<Bytes>> {
        let (parts, body) = req.into_parts();
        self.requests.lock().unwrap().push(SentRequest {
            method: parts.method,
            uri: parts.uri,
            headers: parts.headers,
            body,
        });

        match self.responses.lock().unwrap().pop_front() {
            Some(resp) => resp,
            None => Ok(http::Response::new(Bytes::from_static(
                br#"{"status":"success","data":{}}"#,
            ))),
        }
    }
}

/// What a mock server does with a websocket connection.
#[derive(Debug, Clone, Default)]
pub struct MockWsConnect {
    pub handshakes: Arc<Mutex<Vec<http::Request<()>>>>,
    pub sent: Arc<Mutex<Vec<String>>>,
    pub closes: Arc<Mutex<Vec<(u16, String)>>>,
    server: Arc<Mutex<Option<UnboundedSender<Result<WsMessage>>>>>,
    reject: Arc<Mutex<bool>>,
}

impl MockWsConnect {
    /// Make the next handshakes fail.
    pub fn reject(&self) {
        *self.reject.lock().unwrap() = true;
    }

    /// Push a message from the server to the open connection.
    pub fn push(&self, msg: Result<WsMessage>) {
        let server = self.server.lock().unwrap();
        server
            .as_ref()
            .expect("no open connection")
            .send(msg)
            .unwrap();
    }

    /// Drop the connection without a close frame.
    pub fn hang_up(&self) {
        self.server.lock().unwrap().take();
    }
}

#[async_trait]
impl WsConnect for MockWsConnect {
    async fn ws_connect(&self, req: http::Request<()>) -> Result<Box<dyn WsConnection>> {
        self.handshakes.lock().unwrap().push(req);
        if *self.reject.lock().unwrap() {
            return Err(Error::unexpected("handshake rejected"));
        }

        let (tx, rx) = mpsc::unbounded_channel();
        *self.server.lock().unwrap() = Some(tx.clone());

        Ok(Box::new(MockWsConnection {
            incoming: rx,
            echo: tx.downgrade(),
            sent: self.sent.clone(),
            closes: self.closes.clone(),
        }))
    }
}

#[derive(Debug)]
struct MockWsConnection {
    incoming: UnboundedReceiver<Result<WsMessage>>,
    echo: WeakUnboundedSender<Result<WsMessage>>,
    sent: Arc<Mutex<Vec<String>>>,
    closes: Arc<Mutex<Vec<(u16, String)>>>,
}

#[async_trait]
impl WsConnection for MockWsConnection {
    async fn send_text(&mut self, text: String) -> Result<()> {
        self.sent.lock().unwrap().push(text);
        Ok(())
    }

    async fn recv(&mut self) -> Option<Result<WsMessage>> {
        self.incoming.recv().await
    }

    async fn close(&mut self, code: u16, reason: &str) -> Result<()> {
        self.closes.lock().unwrap().push((code, reason.to_string()));
        // The server answers the closing handshake with the same code.
        if let Some(server) = self.echo.upgrade() {
            let _ = server.send(Ok(WsMessage::Close {
                code,
                reason: reason.to_string(),
            }));
        }
        Ok(())
    }
}

pub fn signed_config() -> Config {
    Config::new().with_credential(DEVICE_ID, SECRET)
}

pub fn client_with(config: Config) -> (Client, MockHttpSend, MockWsConnect) {
    let http = MockHttpSend::default();
    let ws = MockWsConnect::default();
    let ctx = Context::new()
        .with_http_send(http.clone())
        .with_ws_connect(ws.clone());

    let client = Client::with_context(ctx, config).unwrap();
    (client, http, ws)
}

pub fn header<'a>(req: &'a SentRequest, name: &str) -> Option<&'a str> {
    req.headers.get(name).map(|v| v.to_str().unwrap())
}

/// Recompute the signature of a sent request from what went over the wire.
pub fn assert_signed(req: &SentRequest) {
    let timestamp = header(req, "x-bcot-timestamp").expect("missing timestamp header");
    let authorization = header(req, "authorization").expect("missing authorization header");
    let host = header(req, "host").expect("missing host header");
    let target = req.uri.path_and_query().unwrap().as_str();

    let date_stamp = &timestamp[..8];
    let scope = format!("{date_stamp}/ctn1_request");
    let creq =
        canonical_request_string(&req.method, target, host, timestamp, &req.body).unwrap();
    let string_to_sign = string_to_sign(timestamp, &scope, &creq).unwrap();
    let signature = hex_hmac_sha256(
        &derive_signing_key(SECRET, date_stamp),
        string_to_sign.as_bytes(),
    );

    assert_eq!(
        authorization,
        format!("CTN1-HMAC-SHA256 Credential={DEVICE_ID}/{scope}, Signature={signature}")
    );
}
