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

use catenis_core::utils::Redact;
use catenis_core::SigningCredential;
use std::fmt::{Debug, Formatter};

/// Credential that holds the device id and the API access secret.
#[derive(Default, Clone)]
pub struct Credential {
    /// Id of the virtual device issuing the requests.
    pub device_id: String,
    /// API access secret of the device.
    pub api_access_secret: String,
}

impl Credential {
    /// Create a new credential.
    pub fn new(device_id: impl Into<String>, api_access_secret: impl Into<String>) -> Self {
        Self {
            device_id: device_id.into(),
            api_access_secret: api_access_secret.into(),
        }
    }
}

impl Debug for Credential {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credential")
            .field("device_id", &self.device_id)
            .field("api_access_secret", &Redact::from(&self.api_access_secret))
            .finish()
    }
}

impl SigningCredential for Credential {
    fn is_valid(&self) -> bool {
        !self.device_id.is_empty() && !self.api_access_secret.is_empty()
    }
}
