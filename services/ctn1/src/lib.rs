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

//! CTN1 signer for the Catenis API.
//!
//! ## Example
//!
//! ```no_run
//! use catenis_core::{Context, OsEnv, Result, Signer};
//! use catenis_ctn1::{RequestSigner, StaticCredentialProvider};
//!
//! # async fn example() -> Result<()> {
//! let ctx = Context::new().with_env(OsEnv);
//! let signer = Signer::new(
//!     ctx,
//!     StaticCredentialProvider::new("device_id", "api_access_secret"),
//!     RequestSigner::new(),
//! );
//!
//! let req = http::Request::get("https://catenis.io/api/0.10/messages/log")
//!     .body(())
//!     .map_err(catenis_core::Error::from)?;
//! let (mut parts, _) = req.into_parts();
//! signer.sign(&mut parts, b"").await?;
//! # Ok(())
//! # }
//! ```

mod constants;
pub use constants::{
    CATENIS_API_ACCESS_SECRET, CATENIS_DEVICE_ID, SCOPE_REQUEST, SIGN_METHOD_ID, SIGN_VALID_DAYS,
    SIGN_VERSION_ID, X_BCOT_TIMESTAMP,
};

mod credential;
pub use credential::Credential;

mod key;
pub use key::{derive_signing_key, SigningKeyCache};

mod sign_request;
pub use sign_request::{canonical_request_string, string_to_sign, RequestSigner};

mod provide_credential;
pub use provide_credential::{
    DefaultCredentialProvider, EnvCredentialProvider, StaticCredentialProvider,
};
