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

use crate::constants::{CATENIS_API_ACCESS_SECRET, CATENIS_DEVICE_ID};
use crate::Credential;
use async_trait::async_trait;
use catenis_core::{Context, ProvideCredential, Result};
use log::debug;

/// EnvCredentialProvider loads the device credential from environment variables.
///
/// - `CATENIS_DEVICE_ID`
/// - `CATENIS_API_ACCESS_SECRET`
#[derive(Debug, Default, Clone)]
pub struct EnvCredentialProvider;

impl EnvCredentialProvider {
    /// Create a new EnvCredentialProvider.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ProvideCredential for EnvCredentialProvider {
    type Credential = Credential;

    async fn provide_credential(&self, ctx: &Context) -> Result<Option<Self::Credential>> {
        let device_id = ctx.env_var(CATENIS_DEVICE_ID).filter(|v| !v.is_empty());
        let api_access_secret = ctx
            .env_var(CATENIS_API_ACCESS_SECRET)
            .filter(|v| !v.is_empty());

        match (device_id, api_access_secret) {
            (Some(device_id), Some(api_access_secret)) => {
                debug!("loaded credential of device {device_id} from env");
                Ok(Some(Credential::new(device_id, api_access_secret)))
            }
            _ => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use catenis_core::StaticEnv;
    use std::collections::HashMap;

    #[tokio::test]
    async fn test_env_credential_provider() {
        let ctx = Context::new().with_env(StaticEnv {
            envs: HashMap::from_iter([
                (CATENIS_DEVICE_ID.to_string(), "device".to_string()),
                (CATENIS_API_ACCESS_SECRET.to_string(), "secret".to_string()),
            ]),
        });

        let cred = EnvCredentialProvider::new()
            .provide_credential(&ctx)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(cred.device_id, "device");
        assert_eq!(cred.api_access_secret, "secret");
    }

    #[tokio::test]
    async fn test_env_credential_provider_partial() {
        let ctx = Context::new().with_env(StaticEnv {
            envs: HashMap::from_iter([(CATENIS_DEVICE_ID.to_string(), "device".to_string())]),
        });

        let cred = EnvCredentialProvider::new()
            .provide_credential(&ctx)
            .await
            .unwrap();
        assert!(cred.is_none());
    }
}
