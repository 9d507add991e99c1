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

use crate::constants::{SCOPE_REQUEST, SIGN_METHOD_ID, X_BCOT_TIMESTAMP};
use crate::key::SigningKeyCache;
use crate::Credential;
use async_trait::async_trait;
use catenis_core::hash::{hex_hmac_sha256, hex_sha256};
use catenis_core::time::{format_iso8601, now, DateTime};
use catenis_core::{Context, Result, SignRequest, SigningRequest};
use http::header::{AUTHORIZATION, HOST};
use http::{HeaderValue, Method};
use log::debug;
use std::fmt::Write;

/// RequestSigner that implements CTN1 request signing.
///
/// The signer adds the `Host` and `X-BCoT-Timestamp` headers and the
/// `Authorization` header carrying the signature. It holds the signing key
/// cache, so one instance should be shared by every request of a client.
#[derive(Debug, Default)]
pub struct RequestSigner {
    keys: SigningKeyCache,
    time: Option<DateTime>,
}

impl RequestSigner {
    /// Create a new signer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Specify the signing time.
    ///
    /// # Note
    ///
    /// We should always take current time to sign requests.
    /// Only use this function for testing.
    pub fn with_time(mut self, time: DateTime) -> Self {
        self.time = Some(time);
        self
    }
}

#[async_trait]
impl SignRequest for RequestSigner {
    type Credential = Credential;

    async fn sign_request(
        &self,
        _ctx: &Context,
        req: &mut http::request::Parts,
        body: &[u8],
        credential: Option<&Self::Credential>,
    ) -> Result<()> {
        let Some(cred) = credential else {
            return Ok(());
        };

        let now = self.time.unwrap_or_else(now);
        let mut signed_req = SigningRequest::build(req)?;

        if !signed_req.headers.contains_key(HOST) {
            let host = HeaderValue::from_str(signed_req.authority.as_str())?;
            signed_req.headers.insert(HOST, host);
        }

        let timestamp = format_iso8601(now);
        signed_req
            .headers
            .insert(X_BCOT_TIMESTAMP, HeaderValue::from_str(&timestamp)?);

        let creq = canonical_request_string(
            &signed_req.method,
            &signed_req.target,
            signed_req.header_get_or_default(&HOST)?,
            &timestamp,
            body,
        )?;
        debug!("calculated canonical request: {creq}");

        let (date_stamp, signing_key) = self.keys.signing_key(&cred.api_access_secret, now);
        let scope = format!("{date_stamp}/{SCOPE_REQUEST}");
        let string_to_sign = string_to_sign(&timestamp, &scope, &creq)?;
        debug!("calculated string to sign: {string_to_sign}");

        let signature = hex_hmac_sha256(&signing_key, string_to_sign.as_bytes());

        let mut authorization = HeaderValue::from_str(&format!(
            "{SIGN_METHOD_ID} Credential={}/{scope}, Signature={signature}",
            cred.device_id
        ))?;
        authorization.set_sensitive(true);
        signed_req.headers.insert(AUTHORIZATION, authorization);

        signed_req.apply(req)
    }
}

/// Build the canonical request string.
///
/// ```text
/// METHOD
/// /path?query
/// host:catenis.io
/// x-bcot-timestamp:20240101T120000Z
///
/// hex(sha256(body))
/// ```
pub fn canonical_request_string(
    method: &Method,
    target: &str,
    host: &str,
    timestamp: &str,
    body: &[u8],
) -> Result<String> {
    let mut f = String::with_capacity(256);

    writeln!(f, "{method}")?;
    writeln!(f, "{target}")?;
    writeln!(f, "host:{host}")?;
    writeln!(f, "{X_BCOT_TIMESTAMP}:{timestamp}")?;
    // Blank line closes the signed headers.
    writeln!(f)?;
    writeln!(f, "{}", hex_sha256(body))?;

    Ok(f)
}

/// Build the string to sign from the canonical request.
pub fn string_to_sign(timestamp: &str, scope: &str, canonical_request: &str) -> Result<String> {
    let mut f = String::with_capacity(256);

    writeln!(f, "{SIGN_METHOD_ID}")?;
    writeln!(f, "{timestamp}")?;
    writeln!(f, "{scope}")?;
    writeln!(f, "{}", hex_sha256(canonical_request.as_bytes()))?;

    Ok(f)
}
