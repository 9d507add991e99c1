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

use crate::constants::{SCOPE_REQUEST, SIGN_VALID_DAYS, SIGN_VERSION_ID};
use catenis_core::hash::hmac_sha256;
use catenis_core::time::{format_date, DateTime};
use chrono::TimeDelta;
use log::debug;
use std::fmt::{Debug, Formatter};
use std::sync::Mutex;

/// SigningKeyCache keeps the derived signing key across requests.
///
/// A key is derived from the API access secret and the date of its first use,
/// and is reused for [`SIGN_VALID_DAYS`] days counted from that instant. The
/// credential scope of every signature keeps the date the key was derived for,
/// not the date of the request.
#[derive(Default)]
pub struct SigningKeyCache {
    state: Mutex<SigningKeyState>,
}

#[derive(Default)]
struct SigningKeyState {
    last_sign_date: Option<DateTime>,
    last_sign_key: Option<Vec<u8>>,
}

impl Debug for SigningKeyCache {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let state = self.state.lock().expect("lock poisoned");
        f.debug_struct("SigningKeyCache")
            .field("last_sign_date", &state.last_sign_date)
            .finish_non_exhaustive()
    }
}

impl SigningKeyCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the signing key to use at `now`.
    ///
    /// Returns the date stamp (`YYYYMMDD`) the key belongs to along with the
    /// raw key bytes.
    pub fn signing_key(&self, api_access_secret: &str, now: DateTime) -> (String, Vec<u8>) {
        let mut state = self.state.lock().expect("lock poisoned");

        let use_same_key = match state.last_sign_date {
            Some(last) if now - last < TimeDelta::days(SIGN_VALID_DAYS) => {
                state.last_sign_key.is_some()
            }
            _ => {
                state.last_sign_date = Some(now);
                false
            }
        };

        let sign_date = state.last_sign_date.unwrap_or(now);
        let date_stamp = format_date(sign_date);

        if use_same_key {
            if let Some(key) = &state.last_sign_key {
                return (date_stamp, key.clone());
            }
        }

        debug!("deriving new signing key for date {date_stamp}");
        let key = derive_signing_key(api_access_secret, &date_stamp);
        state.last_sign_key = Some(key.clone());

        (date_stamp, key)
    }
}

/// Derive the signing key for given date stamp.
pub fn derive_signing_key(api_access_secret: &str, date_stamp: &str) -> Vec<u8> {
    let date_key = hmac_sha256(
        format!("{SIGN_VERSION_ID}{api_access_secret}").as_bytes(),
        date_stamp.as_bytes(),
    );

    hmac_sha256(&date_key, SCOPE_REQUEST.as_bytes())
}
