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

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC};

// Service location.
pub const DEFAULT_HOST: &str = "catenis.io";
pub const SANDBOX_SUBDOMAIN: &str = "sandbox.";
pub const DEFAULT_API_VERSION: &str = "0.10";
pub const API_PATH: &str = "/api/";
pub const NOTIFY_ROOT_PATH: &str = "notify";
pub const WS_NOTIFY_ROOT_PATH: &str = "ws";

// Notification channel.
pub const NOTIFY_WS_SUBPROTOCOL: &str = "notify.catenis.io";
pub const NOTIFY_CHANNEL_OPEN_MSG: &str = "NOTIFICATION_CHANNEL_OPEN";
pub const WS_CLOSE_NORMAL: u16 = 1000;
pub const WS_CLOSE_ABNORMAL: u16 = 1006;
pub const WS_CLOSE_POLICY_VIOLATION: u16 = 1008;

// Request defaults.
pub const DEFAULT_COMPRESS_THRESHOLD: usize = 1024;
pub const CLIENT_USER_AGENT: &str = concat!("Catenis API Rust client/", env!("CARGO_PKG_VERSION"));
pub const CONTENT_TYPE_JSON: &str = "application/json";
pub const ENCODING_DEFLATE: &str = "deflate";

/// Env value for the host of the Catenis API server.
pub const CATENIS_HOST: &str = "CATENIS_HOST";
/// Env value for the environment: `prod`, `sandbox` or `beta`.
pub const CATENIS_ENVIRONMENT: &str = "CATENIS_ENVIRONMENT";
/// Env value for whether to use a secure connection: `true` or `false`.
pub const CATENIS_SECURE: &str = "CATENIS_SECURE";
/// Env value for the version of the Catenis API.
pub const CATENIS_API_VERSION: &str = "CATENIS_API_VERSION";

/// AsciiSet used to encode query values and path parameters.
///
/// Encodes every byte except the unreserved characters: 'A'-'Z', 'a'-'z',
/// '0'-'9', '-', '.', '_', and '~'.
pub static URI_ENCODE_SET: AsciiSet = NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');
