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

use std::fmt::{Debug, Display, Formatter};
use std::str::FromStr;
use std::time::Duration;

use crate::constants::*;
use crate::ApiVersion;
use catenis_core::utils::Redact;
use catenis_core::{Context, Error, Result};
use catenis_ctn1::{CATENIS_API_ACCESS_SECRET, CATENIS_DEVICE_ID};
use log::warn;

/// Environment of the targeted Catenis API server.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Environment {
    /// Production environment.
    #[default]
    Prod,
    /// Sandbox environment, served from the `sandbox.` sub-domain.
    Sandbox,
}

impl FromStr for Environment {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "prod" => Ok(Environment::Prod),
            // `beta` is the former name of the sandbox environment.
            "sandbox" | "beta" => Ok(Environment::Sandbox),
            v => Err(Error::config_invalid(format!("Invalid environment: {v}"))),
        }
    }
}

impl Display for Environment {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Prod => f.write_str("prod"),
            Environment::Sandbox => f.write_str("sandbox"),
        }
    }
}

/// Config carries all the configuration of a Catenis API client.
///
/// Unset fields fall back to their defaults when the client is built.
#[derive(Clone, Default)]
pub struct Config {
    /// Host name (with optional port) of the Catenis API server.
    ///
    /// Loaded from this field if it's `is_some`, then env value [`CATENIS_HOST`].
    /// Defaults to `catenis.io`.
    pub host: Option<String>,
    /// Environment of the Catenis API server.
    ///
    /// Loaded from this field if it's `is_some`, then env value [`CATENIS_ENVIRONMENT`].
    /// Defaults to [`Environment::Prod`].
    pub environment: Option<Environment>,
    /// Whether a secure connection (HTTPS/WSS) should be used.
    ///
    /// Loaded from this field if it's `is_some`, then env value [`CATENIS_SECURE`].
    /// Defaults to `true`.
    pub secure: Option<bool>,
    /// Version of the Catenis API to target, as `<major>.<minor>`.
    ///
    /// Loaded from this field if it's `is_some`, then env value [`CATENIS_API_VERSION`].
    /// Defaults to `0.10`.
    pub version: Option<String>,
    /// Whether request and response bodies should be compressed. Defaults to `true`.
    pub use_compression: Option<bool>,
    /// Minimum size, in bytes, of a request body for it to be compressed. Defaults to 1024.
    pub compress_threshold: Option<usize>,
    /// Time to wait for a response. Zero or unset means no timeout.
    pub timeout: Option<Duration>,
    /// Id of the device issuing the requests.
    ///
    /// Loaded from this field if it's `is_some`, then env value [`CATENIS_DEVICE_ID`].
    pub device_id: Option<String>,
    /// API access secret of the device.
    ///
    /// Loaded from this field if it's `is_some`, then env value [`CATENIS_API_ACCESS_SECRET`].
    pub api_access_secret: Option<String>,
    /// Runtime used to drive notification channels.
    ///
    /// When unset, channels run on the runtime they are opened from.
    pub runtime: Option<tokio::runtime::Handle>,
}

impl Debug for Config {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("host", &self.host)
            .field("environment", &self.environment)
            .field("secure", &self.secure)
            .field("version", &self.version)
            .field("use_compression", &self.use_compression)
            .field("compress_threshold", &self.compress_threshold)
            .field("timeout", &self.timeout)
            .field("device_id", &self.device_id)
            .field("api_access_secret", &Redact::from(&self.api_access_secret))
            .finish_non_exhaustive()
    }
}

impl Config {
    /// Create a new Config
    pub fn new() -> Self {
        Self::default()
    }

    /// Set host
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    /// Set environment
    pub fn with_environment(mut self, environment: Environment) -> Self {
        self.environment = Some(environment);
        self
    }

    /// Set secure
    pub fn with_secure(mut self, secure: bool) -> Self {
        self.secure = Some(secure);
        self
    }

    /// Set API version
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// Set use_compression
    pub fn with_use_compression(mut self, use_compression: bool) -> Self {
        self.use_compression = Some(use_compression);
        self
    }

    /// Set compress_threshold
    pub fn with_compress_threshold(mut self, compress_threshold: usize) -> Self {
        self.compress_threshold = Some(compress_threshold);
        self
    }

    /// Set timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the device credential.
    pub fn with_credential(
        mut self,
        device_id: impl Into<String>,
        api_access_secret: impl Into<String>,
    ) -> Self {
        self.device_id = Some(device_id.into());
        self.api_access_secret = Some(api_access_secret.into());
        self
    }

    /// Set the runtime used to drive notification channels.
    pub fn with_runtime(mut self, runtime: tokio::runtime::Handle) -> Self {
        self.runtime = Some(runtime);
        self
    }

    /// Load config from env.
    ///
    /// Fields that are already set are kept. Env values that can't be parsed
    /// are ignored.
    pub fn from_env(mut self, ctx: &Context) -> Self {
        if let Some(v) = ctx.env_var(CATENIS_HOST).filter(|v| !v.is_empty()) {
            self.host.get_or_insert(v);
        }
        if let Some(v) = ctx.env_var(CATENIS_ENVIRONMENT) {
            match v.parse() {
                Ok(env) => {
                    self.environment.get_or_insert(env);
                }
                Err(err) => warn!("ignoring {CATENIS_ENVIRONMENT}: {err}"),
            }
        }
        if let Some(v) = ctx.env_var(CATENIS_SECURE) {
            match v.parse() {
                Ok(secure) => {
                    self.secure.get_or_insert(secure);
                }
                Err(err) => warn!("ignoring {CATENIS_SECURE}: {err}"),
            }
        }
        if let Some(v) = ctx.env_var(CATENIS_API_VERSION).filter(|v| !v.is_empty()) {
            self.version.get_or_insert(v);
        }
        if let Some(v) = ctx.env_var(CATENIS_DEVICE_ID) {
            self.device_id.get_or_insert(v);
        }
        if let Some(v) = ctx.env_var(CATENIS_API_ACCESS_SECRET) {
            self.api_access_secret.get_or_insert(v);
        }

        self
    }

    /// Host the client talks to, including the environment sub-domain.
    pub(crate) fn effective_host(&self) -> String {
        let host = self
            .host
            .as_deref()
            .filter(|v| !v.is_empty())
            .unwrap_or(DEFAULT_HOST);

        match self.environment.unwrap_or_default() {
            Environment::Prod => host.to_string(),
            Environment::Sandbox => format!("{SANDBOX_SUBDOMAIN}{host}"),
        }
    }

    pub(crate) fn api_version(&self) -> Result<ApiVersion> {
        self.version
            .as_deref()
            .unwrap_or(DEFAULT_API_VERSION)
            .parse()
    }

    pub(crate) fn compress_threshold(&self) -> Result<usize> {
        match self.compress_threshold {
            None => Ok(DEFAULT_COMPRESS_THRESHOLD),
            Some(0) => Err(Error::config_invalid(
                "compress threshold must be greater than zero",
            )),
            Some(v) => Ok(v),
        }
    }

    /// Timeout to apply to requests, `None` if requests never time out.
    pub(crate) fn effective_timeout(&self) -> Option<Duration> {
        self.timeout.filter(|v| !v.is_zero())
    }
}
