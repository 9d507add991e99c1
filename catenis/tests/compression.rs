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

use std::io::{Read, Write};

use bytes::Bytes;
use catenis_core::hash::hex_hmac_sha256;
use catenis_ctn1::{canonical_request_string, derive_signing_key, string_to_sign};
use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;
use flate2::Compression;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

use crate::init_logger;
use crate::mock::*;

fn inflate(data: &[u8]) -> Vec<u8> {
    let mut out = Vec::new();
    ZlibDecoder::new(data).read_to_end(&mut out).unwrap();
    out
}

#[tokio::test]
async fn test_large_body_is_compressed_and_signed_over_wire_bytes() {
    init_logger();
    let (client, http, _) = client_with(signed_config());
    let message = "a".repeat(2048);

    client.log_message(message.as_str(), None).await.unwrap();

    let req = http.last_request();
    assert_eq!(header(&req, "content-encoding"), Some("deflate"));
    let logical = inflate(&req.body);
    assert_eq!(
        serde_json::from_slice::<Value>(&logical).unwrap(),
        json!({"message": message})
    );
    assert!(req.body.len() < logical.len());
    assert_signed(&req);

    // A signature over the uncompressed body must not match.
    let timestamp = header(&req, "x-bcot-timestamp").unwrap();
    let date_stamp = &timestamp[..8];
    let scope = format!("{date_stamp}/ctn1_request");
    let creq = canonical_request_string(
        &req.method,
        req.uri.path(),
        header(&req, "host").unwrap(),
        timestamp,
        &logical,
    )
    .unwrap();
    let signature = hex_hmac_sha256(
        &derive_signing_key(SECRET, date_stamp),
        string_to_sign(timestamp, &scope, &creq).unwrap().as_bytes(),
    );
    assert!(!header(&req, "authorization").unwrap().ends_with(&signature));
}

#[tokio::test]
async fn test_compress_threshold() {
    let (client, http, _) = client_with(signed_config().with_compress_threshold(16));

    // {"message":"0123"} is 18 bytes long.
    client.log_message("0123", None).await.unwrap();
    assert_eq!(header(&http.last_request(), "content-encoding"), Some("deflate"));

    // {"message":"01"} is 16 bytes long.
    client.log_message("01", None).await.unwrap();
    assert_eq!(header(&http.last_request(), "content-encoding"), Some("deflate"));

    // {"message":"0"} is 15 bytes long.
    client.log_message("0", None).await.unwrap();
    let req = http.last_request();
    assert_eq!(header(&req, "content-encoding"), None);
    assert_eq!(&req.body[..], br#"{"message":"0"}"#);
}

#[tokio::test]
async fn test_compression_disabled() {
    let (client, http, _) = client_with(signed_config().with_use_compression(false));

    client.log_message("b".repeat(4096), None).await.unwrap();

    let req = http.last_request();
    assert_eq!(header(&req, "accept-encoding"), None);
    assert_eq!(header(&req, "content-encoding"), None);
    assert_signed(&req);
}

#[tokio::test]
async fn test_deflated_response() {
    let (client, http, _) = client_with(signed_config());

    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder
        .write_all(br#"{"status":"success","data":{"balance":{"total":10}}}"#)
        .unwrap();
    let body = encoder.finish().unwrap();

    http.respond_with(
        http::Response::builder()
            .status(200)
            .header("content-encoding", "deflate")
            .body(Bytes::from(body))
            .unwrap(),
    );

    let data = client.get_asset_balance("a1").await.unwrap();
    assert_eq!(data, json!({"balance": {"total": 10}}));
}
