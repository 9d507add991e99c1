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

use crate::Credential;
use async_trait::async_trait;
use catenis_core::{Context, ProvideCredential, Result};

/// StaticCredentialProvider provides a fixed device credential.
///
/// This is what a client built with an explicit device id and API access
/// secret uses.
#[derive(Debug, Clone)]
pub struct StaticCredentialProvider {
    device_id: String,
    api_access_secret: String,
}

impl StaticCredentialProvider {
    /// Create a new StaticCredentialProvider.
    pub fn new(device_id: &str, api_access_secret: &str) -> Self {
        Self {
            device_id: device_id.to_string(),
            api_access_secret: api_access_secret.to_string(),
        }
    }
}

#[async_trait]
impl ProvideCredential for StaticCredentialProvider {
    type Credential = Credential;

    async fn provide_credential(&self, _: &Context) -> Result<Option<Self::Credential>> {
        Ok(Some(Credential::new(
            self.device_id.clone(),
            self.api_access_secret.clone(),
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_static_credential_provider() {
        let provider = StaticCredentialProvider::new("d8YpQ7jgPBJEkBrnvp58", "s3cr3t");
        let cred = provider
            .provide_credential(&Context::new())
            .await
            .unwrap()
            .unwrap();

        assert_eq!(cred.device_id, "d8YpQ7jgPBJEkBrnvp58");
        assert_eq!(cred.api_access_secret, "s3cr3t");
    }
}
