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

use catenis_core::time::{parse_rfc3339, DateTime};
use catenis_core::{Context, Signer};
use catenis_ctn1::{RequestSigner, StaticCredentialProvider};
use http::header::AUTHORIZATION;
use http::Method;
use pretty_assertions::assert_eq;
use test_case::test_case;

fn at(s: &str) -> DateTime {
    parse_rfc3339(s).expect("time must be valid")
}

fn init_signer(time: &str) -> Signer<catenis_ctn1::Credential> {
    let _ = env_logger::builder().is_test(true).try_init();

    Signer::new(
        Context::new(),
        StaticCredentialProvider::new("dev1", "s3cr3t"),
        RequestSigner::new().with_time(at(time)),
    )
}

fn parts(method: Method, uri: &str) -> http::request::Parts {
    http::Request::builder()
        .method(method)
        .uri(uri)
        .body(())
        .expect("request must be valid")
        .into_parts()
        .0
}

#[test_case(
    Method::GET,
    "https://catenis.io/api/0.10/messages/log",
    b"",
    "ea22409f073ae1aa9c42a1b25ce506796551ea01dee5f7a0d0b36fcaa9a37853";
    "get without body"
)]
#[test_case(
    Method::POST,
    "https://catenis.io/api/0.10/messages/log",
    br#"{"message":"hello"}"#,
    "21a8f7acc9a1214540a290b2a66f1f996d17a06d11cb23eec56971427dec31bc";
    "post with body"
)]
#[test_case(
    Method::GET,
    "https://catenis.io/api/0.10/notify/ws/new-msg-received",
    b"",
    "f9eb7b59dba787dc8f778f993fc5da8b155301472b8ee4387a455c2adbeb0f48";
    "notification channel"
)]
#[test_case(
    Method::GET,
    "https://catenis.io/api/0.10/messages?action=send&direction=inbound&readState=unread&limit=0",
    b"",
    "c178ed83a4375bcc27861fd9114b97062f70e4666c518d391ff2d089afd42733";
    "query kept verbatim"
)]
#[tokio::test]
async fn test_sign(method: Method, uri: &str, body: &[u8], signature: &str) {
    let signer = init_signer("2024-01-01T12:00:00Z");

    let mut req = parts(method, uri);
    signer.sign(&mut req, body).await.expect("sign must succeed");

    assert_eq!(
        req.headers[AUTHORIZATION].to_str().unwrap(),
        format!("CTN1-HMAC-SHA256 Credential=dev1/20240101/ctn1_request, Signature={signature}")
    );
}

#[tokio::test]
async fn test_sign_reuses_key_on_next_day() {
    let _ = env_logger::builder().is_test(true).try_init();

    let builder = RequestSigner::new();
    let cred = catenis_ctn1::Credential::new("dev1", "s3cr3t");
    let ctx = Context::new();

    // Warm the key cache on the first day.
    let signer = builder.with_time(at("2024-01-01T12:00:00Z"));
    let mut req = parts(Method::GET, "https://catenis.io/api/0.10/messages/log");
    catenis_core::SignRequest::sign_request(&signer, &ctx, &mut req, b"", Some(&cred))
        .await
        .unwrap();

    let signer = signer.with_time(at("2024-01-02T08:00:00Z"));
    let mut req = parts(Method::GET, "https://catenis.io/api/0.10/messages/log");
    catenis_core::SignRequest::sign_request(&signer, &ctx, &mut req, b"", Some(&cred))
        .await
        .unwrap();

    assert_eq!(req.headers["x-bcot-timestamp"], "20240102T080000Z");
    assert_eq!(
        req.headers[AUTHORIZATION].to_str().unwrap(),
        "CTN1-HMAC-SHA256 Credential=dev1/20240101/ctn1_request, Signature=3c8553268f5378ccc8f0244754d2741ec7fc4dfd744814858ecdb96dd5b9227b"
    );
}

#[tokio::test]
async fn test_sign_without_credential() {
    let _ = env_logger::builder().is_test(true).try_init();

    let signer = Signer::new(
        Context::new(),
        catenis_ctn1::DefaultCredentialProvider::new(),
        RequestSigner::new(),
    );

    let mut req = parts(Method::GET, "https://catenis.io/api/0.10/messages/log");
    signer.sign(&mut req, b"").await.expect("sign must succeed");

    assert!(req.headers.get(AUTHORIZATION).is_none());
}
