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

use bytes::Bytes;
use catenis_core::{Context, Error, Result, Signer};
use catenis_ctn1::Credential;
use http::header::{ACCEPT, ACCEPT_ENCODING, CONTENT_ENCODING, CONTENT_TYPE, USER_AGENT};
use http::{Method, StatusCode};
use log::debug;
use serde_json::Value;

use crate::constants::*;
use crate::endpoint::{QueryValue, ServiceEndpoints, ServiceType};

/// Request to an API endpoint, before it is assembled and signed.
#[derive(Debug, Clone)]
pub(crate) struct ApiRequest<'a> {
    method: Method,
    path: &'a str,
    url_params: Vec<(&'a str, &'a str)>,
    query_params: Vec<(&'a str, QueryValue)>,
    body: Option<Value>,
    sign: bool,
}

impl<'a> ApiRequest<'a> {
    pub fn get(path: &'a str) -> Self {
        Self {
            method: Method::GET,
            path,
            url_params: Vec::new(),
            query_params: Vec::new(),
            body: None,
            sign: true,
        }
    }

    pub fn post(path: &'a str, body: Value) -> Self {
        Self {
            method: Method::POST,
            body: Some(body),
            ..Self::get(path)
        }
    }

    pub fn url_param(mut self, key: &'a str, value: &'a str) -> Self {
        self.url_params.push((key, value));
        self
    }

    pub fn query(mut self, key: &'a str, value: impl Into<QueryValue>) -> Self {
        self.query_params.push((key, value.into()));
        self
    }

    pub fn query_opt<V: Into<QueryValue>>(self, key: &'a str, value: Option<V>) -> Self {
        match value {
            Some(v) => self.query(key, v),
            None => self,
        }
    }

    /// Send the request without signature, for public endpoints.
    pub fn unsigned(mut self) -> Self {
        self.sign = false;
        self
    }
}

/// Invoker builds, signs and sends the API requests.
#[derive(Debug, Clone)]
pub(crate) struct Invoker {
    ctx: Context,
    signer: Signer<Credential>,
    endpoints: ServiceEndpoints,
    use_compression: bool,
    compress_threshold: usize,
}

impl Invoker {
    pub fn new(
        ctx: Context,
        signer: Signer<Credential>,
        endpoints: ServiceEndpoints,
        use_compression: bool,
        compress_threshold: usize,
    ) -> Self {
        Self {
            ctx,
            signer,
            endpoints,
            use_compression: use_compression && cfg!(feature = "compression"),
            compress_threshold,
        }
    }

    pub fn context(&self) -> &Context {
        &self.ctx
    }

    pub fn endpoints(&self) -> &ServiceEndpoints {
        &self.endpoints
    }

    /// Sign the request with the client credential.
    pub async fn sign(&self, parts: &mut http::request::Parts, body: &[u8]) -> Result<()> {
        self.signer.sign(parts, body).await
    }

    /// Send the request and return the `data` of the response envelope.
    pub async fn invoke(&self, req: ApiRequest<'_>) -> Result<Value> {
        let url = self.endpoints.assemble(
            ServiceType::Api,
            req.path,
            &req.url_params,
            &req.query_params,
        )?;

        let mut builder = http::Request::builder()
            .method(req.method.clone())
            .uri(url.as_str())
            .header(ACCEPT, CONTENT_TYPE_JSON)
            .header(USER_AGENT, CLIENT_USER_AGENT);
        if self.use_compression {
            builder = builder.header(ACCEPT_ENCODING, ENCODING_DEFLATE);
        }

        let mut body = Vec::new();
        if let Some(json) = &req.body {
            body = serde_json::to_vec(json).map_err(|e| {
                Error::request_invalid("failed to serialize request body").with_source(e)
            })?;
            builder = builder.header(CONTENT_TYPE, CONTENT_TYPE_JSON);

            if self.use_compression && body.len() >= self.compress_threshold {
                body = compress(&body)?;
                builder = builder.header(CONTENT_ENCODING, ENCODING_DEFLATE);
            }
        }

        let (mut parts, ()) = builder.body(())?.into_parts();
        // Sign the bytes that go over the wire, after compression.
        if req.sign {
            self.sign(&mut parts, &body).await?;
        }

        debug!("invoking api endpoint: {} {}", parts.method, parts.uri);
        let resp = self
            .ctx
            .http_send(http::Request::from_parts(parts, Bytes::from(body)))
            .await
            .map_err(|e| {
                if e.is_client_error() {
                    e
                } else {
                    Error::client_request("failed to send request to api endpoint").with_source(e)
                }
            })?;

        process_response(resp)
    }
}

/// Unwrap the response envelope returned by an API endpoint.
pub(crate) fn process_response(resp: http::Response<Bytes>) -> Result<Value> {
    let status = resp.status();
    let deflated = resp
        .headers()
        .get(CONTENT_ENCODING)
        .is_some_and(|v| v.as_bytes().eq_ignore_ascii_case(ENCODING_DEFLATE.as_bytes()));

    let body = match deflated {
        false => resp.into_body(),
        true if status == StatusCode::OK => Bytes::from(decompress(resp.body())?),
        // An error status must survive a body that fails to inflate.
        true => match decompress(resp.body()) {
            Ok(body) => Bytes::from(body),
            Err(err) => {
                debug!("failed to inflate error response body: {err}");
                Bytes::new()
            }
        },
    };
    let text = String::from_utf8_lossy(&body);

    if status != StatusCode::OK {
        debug!("api endpoint returned error status {status}: {text}");
        let service_message = serde_json::from_slice::<Value>(&body)
            .ok()
            .filter(|v| v.get("status").is_some_and(|s| !s.is_null()))
            .and_then(|v| match v.get("message") {
                Some(Value::String(msg)) => Some(msg.clone()),
                Some(Value::Null) | None => None,
                Some(other) => Some(other.to_string()),
            });

        return Err(Error::api_response(status, service_message));
    }

    match serde_json::from_slice::<Value>(&body) {
        Ok(Value::Object(mut envelope))
            if envelope.get("status") == Some(&Value::String("success".to_string())) =>
        {
            match envelope.remove("data") {
                Some(data) if !data.is_null() => Ok(data),
                _ => Err(Error::unexpected_response(&text)),
            }
        }
        _ => Err(Error::unexpected_response(&text)),
    }
}

#[cfg(feature = "compression")]
fn compress(data: &[u8]) -> Result<Vec<u8>> {
    use flate2::write::ZlibEncoder;
    use flate2::Compression;
    use std::io::Write;

    let mut encoder = ZlibEncoder::new(Vec::with_capacity(data.len() / 2), Compression::default());
    encoder.write_all(data)?;
    Ok(encoder.finish()?)
}

#[cfg(not(feature = "compression"))]
fn compress(data: &[u8]) -> Result<Vec<u8>> {
    Ok(data.to_vec())
}

#[cfg(feature = "compression")]
fn decompress(data: &[u8]) -> Result<Vec<u8>> {
    use flate2::read::ZlibDecoder;
    use std::io::Read;

    let mut out = Vec::with_capacity(data.len() * 2);
    ZlibDecoder::new(data)
        .read_to_end(&mut out)
        .map_err(|e| Error::client_request("failed to inflate response body").with_source(e))?;
    Ok(out)
}

#[cfg(not(feature = "compression"))]
fn decompress(_: &[u8]) -> Result<Vec<u8>> {
    Err(Error::client_request(
        "response body is compressed but compression support is disabled",
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use catenis_core::ErrorKind;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn response(status: u16, body: &str) -> http::Response<Bytes> {
        http::Response::builder()
            .status(status)
            .body(Bytes::from(body.to_string()))
            .unwrap()
    }

    #[test]
    fn test_process_success() {
        let data = process_response(response(
            200,
            r#"{"status":"success","data":{"messageId":"m123"}}"#,
        ))
        .unwrap();

        assert_eq!(data, json!({"messageId": "m123"}));
    }

    #[test]
    fn test_process_api_error() {
        let err = process_response(response(400, r#"{"status":"error","message":"bad thing"}"#))
            .unwrap_err();

        assert!(err.is_api_error());
        assert_eq!(err.status_code(), Some(StatusCode::BAD_REQUEST));
        assert_eq!(err.service_message(), Some("bad thing"));
        assert!(err.to_string().contains("bad thing"));
    }

    #[test]
    fn test_process_api_error_without_service_message() {
        let err = process_response(response(503, "<html>Service Unavailable</html>")).unwrap_err();

        assert!(err.is_api_error());
        assert_eq!(err.service_message(), None);
        assert!(err.to_string().contains("Service Unavailable"));
    }

    #[test]
    fn test_process_api_error_with_broken_deflated_body() {
        let mut resp = response(500, "definitely not zlib");
        resp.headers_mut()
            .insert(CONTENT_ENCODING, http::HeaderValue::from_static("deflate"));

        let err = process_response(resp).unwrap_err();

        assert!(err.is_api_error());
        assert_eq!(err.status_code(), Some(StatusCode::INTERNAL_SERVER_ERROR));
        assert_eq!(err.service_message(), None);
    }

    #[test]
    fn test_process_invalid_envelope() {
        for body in [
            "not json",
            "",
            r#"{"status":"success"}"#,
            r#"{"status":"success","data":null}"#,
            r#"{"status":"error","data":{}}"#,
            r#"[1,2,3]"#,
        ] {
            let err = process_response(response(200, body)).unwrap_err();

            assert_eq!(err.kind(), ErrorKind::UnexpectedResponse, "body: {body}");
            assert!(err.is_client_error());
            assert!(err.to_string().contains(body));
        }
    }

    #[cfg(feature = "compression")]
    #[test]
    fn test_process_deflated_response() {
        let body = compress(br#"{"status":"success","data":{"count":1}}"#).unwrap();
        let resp = http::Response::builder()
            .status(200)
            .header(CONTENT_ENCODING, "deflate")
            .body(Bytes::from(body))
            .unwrap();

        assert_eq!(process_response(resp).unwrap(), json!({"count": 1}));
    }

    #[cfg(feature = "compression")]
    #[test]
    fn test_compress_round_trip() {
        let data = "x".repeat(2048);
        let compressed = compress(data.as_bytes()).unwrap();

        assert!(compressed.len() < data.len());
        assert_eq!(decompress(&compressed).unwrap(), data.as_bytes());
    }
}
