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

use std::time::Duration;

use catenis::{BlockingClient, Context, ErrorKind, NotifyEvent, WsMessage};
use pretty_assertions::assert_eq;
use serde_json::json;

use crate::mock::*;

fn blocking_client() -> (BlockingClient, MockHttpSend, MockWsConnect) {
    let http = MockHttpSend::default();
    let ws = MockWsConnect::default();
    let ctx = Context::new()
        .with_http_send(http.clone())
        .with_ws_connect(ws.clone());

    let client = BlockingClient::with_context(ctx, signed_config()).unwrap();
    (client, http, ws)
}

#[test]
fn test_blocking_requests() {
    let (client, http, _) = blocking_client();
    http.respond(200, r#"{"status":"success","data":{"messageId":"m123"}}"#);
    http.respond(404, r#"{"status":"error","message":"Invalid message ID"}"#);

    let data = client.log_message("hello", None).unwrap();
    assert_eq!(data, json!({"messageId": "m123"}));
    assert_signed(&http.last_request());

    let err = client.read_message("unknown", None).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ApiResponse);
    assert_eq!(err.service_message(), Some("Invalid message ID"));
}

#[test]
fn test_blocking_notify_channel() {
    let (client, _, ws) = blocking_client();
    let channel = client.create_ws_notify_channel("sent-msg-read");
    assert_eq!(channel.event_name(), "sent-msg-read");

    channel.open().unwrap();
    assert_eq!(
        channel.open().unwrap_err().kind(),
        ErrorKind::NotifyChannelAlreadyOpen
    );
    assert!(channel.recv_timeout(Duration::from_millis(50)).is_none());

    ws.push(Ok(WsMessage::Text(r#"{"messageId":"m1"}"#.to_string())));
    match channel.recv() {
        Some(NotifyEvent::Notify(payload)) => assert_eq!(payload, json!({"messageId": "m1"})),
        other => panic!("unexpected event: {other:?}"),
    }

    channel.close();
    match channel.recv_timeout(Duration::from_secs(5)) {
        Some(NotifyEvent::Close { code, .. }) => assert_eq!(code, 1000),
        other => panic!("unexpected event: {other:?}"),
    }
    assert!(!channel.is_open());
}
