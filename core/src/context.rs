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

use crate::{Error, Result};
use bytes::Bytes;
use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::Arc;

/// Context provides the transports and environment used by the client.
///
/// ## Important
///
/// catenis-core provides NO default transports. Users MAY configure components they need.
/// Any unconfigured component will use a no-op implementation that returns errors or empty values when called.
///
/// ## Example
///
/// ```
/// use catenis_core::{Context, OsEnv};
///
/// let ctx = Context::new().with_env(OsEnv);
/// ```
#[derive(Clone)]
pub struct Context {
    http: Arc<dyn HttpSend>,
    ws: Arc<dyn WsConnect>,
    env: Arc<dyn Env>,
}

impl Debug for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context")
            .field("http", &self.http)
            .field("ws", &self.ws)
            .field("env", &self.env)
            .finish()
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}

impl Context {
    /// Create a new Context with no-op implementations.
    ///
    /// Use the `with_*` methods to configure the components you need.
    pub fn new() -> Self {
        Self {
            http: Arc::new(NoopHttpSend),
            ws: Arc::new(NoopWsConnect),
            env: Arc::new(NoopEnv),
        }
    }

    /// Replace the HTTP client implementation.
    pub fn with_http_send(mut self, http: impl HttpSend) -> Self {
        self.http = Arc::new(http);
        self
    }

    /// Replace the WebSocket connector implementation.
    pub fn with_ws_connect(mut self, ws: impl WsConnect) -> Self {
        self.ws = Arc::new(ws);
        self
    }

    /// Replace the environment implementation.
    pub fn with_env(mut self, env: impl Env) -> Self {
        self.env = Arc::new(env);
        self
    }

    /// Send http request and return the response.
    #[inline]
    pub async fn http_send(&self, req: http::Request<Bytes>) -> Result<http::Response<Bytes>> {
        self.http.http_send(req).await
    }

    /// Open a WebSocket connection described by the given handshake request.
    #[inline]
    pub async fn ws_connect(&self, req: http::Request<()>) -> Result<Box<dyn WsConnection>> {
        self.ws.ws_connect(req).await
    }

    /// Get the environment variable.
    ///
    /// - Returns `Some(v)` if the environment variable is found and is valid utf-8.
    /// - Returns `None` if the environment variable is not found or value is invalid.
    #[inline]
    pub fn env_var(&self, key: &str) -> Option<String> {
        self.env.var(key)
    }

    /// Returns an hashmap of (variable, value) pairs of strings, for all the
    /// environment variables of the current process.
    #[inline]
    pub fn env_vars(&self) -> HashMap<String, String> {
        self.env.vars()
    }
}

/// HttpSend is used to send the API requests.
///
/// The request handed over has already been signed: implementations must send the
/// method, target, headers and body exactly as they are, otherwise the remote
/// signature check will fail.
#[async_trait::async_trait]
pub trait HttpSend: Debug + Send + Sync + 'static {
    /// Send http request and return the response.
    async fn http_send(&self, req: http::Request<Bytes>) -> Result<http::Response<Bytes>>;
}

/// WsConnect is used to open the WebSocket used by notification channels.
#[async_trait::async_trait]
pub trait WsConnect: Debug + Send + Sync + 'static {
    /// Perform the WebSocket handshake for the request.
    ///
    /// The request carries the target url and the `Sec-WebSocket-Protocol` header
    /// with the subprotocol to offer.
    async fn ws_connect(&self, req: http::Request<()>) -> Result<Box<dyn WsConnection>>;
}

/// WsConnection is an open WebSocket.
///
/// `recv` must be cancel safe: it is polled in `select!` loops together with
/// close commands.
#[async_trait::async_trait]
pub trait WsConnection: Debug + Send + 'static {
    /// Send a text message.
    async fn send_text(&mut self, text: String) -> Result<()>;

    /// Receive the next text or close message.
    ///
    /// Returns `None` once the connection is gone.
    async fn recv(&mut self) -> Option<Result<WsMessage>>;

    /// Start the closing handshake with given code and reason.
    async fn close(&mut self, code: u16, reason: &str) -> Result<()>;
}

/// Messages received from a [`WsConnection`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WsMessage {
    /// A text message.
    Text(String),
    /// The peer closed the connection.
    Close {
        /// Close code, `1005` if the peer didn't send one.
        code: u16,
        /// Close reason.
        reason: String,
    },
}

/// Env abstracts environment variable access.
pub trait Env: Debug + Send + Sync + 'static {
    /// Get an environment variable.
    ///
    /// - Returns `Some(v)` if the environment variable is found and is valid utf-8.
    /// - Returns `None` if the environment variable is not found or value is invalid.
    fn var(&self, key: &str) -> Option<String>;

    /// Returns an hashmap of (variable, value) pairs of strings, for all the
    /// environment variables of the current process.
    fn vars(&self) -> HashMap<String, String>;
}

/// Implements Env for the OS context.
#[derive(Debug, Copy, Clone)]
pub struct OsEnv;

impl Env for OsEnv {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var_os(key)?.into_string().ok()
    }

    fn vars(&self) -> HashMap<String, String> {
        std::env::vars().collect()
    }
}

/// StaticEnv provides a static env environment.
///
/// This is useful for testing or for providing a fixed environment.
#[derive(Debug, Clone, Default)]
pub struct StaticEnv {
    /// The environment variables to use.
    pub envs: HashMap<String, String>,
}

impl Env for StaticEnv {
    fn var(&self, key: &str) -> Option<String> {
        self.envs.get(key).cloned()
    }

    fn vars(&self) -> HashMap<String, String> {
        self.envs.clone()
    }
}

/// NoopHttpSend is a no-op implementation that always returns an error.
///
/// This is used when no HTTP client is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopHttpSend;

#[async_trait::async_trait]
impl HttpSend for NoopHttpSend {
    async fn http_send(&self, _req: http::Request<Bytes>) -> Result<http::Response<Bytes>> {
        Err(Error::unexpected(
            "HTTP sending not supported: no HTTP client configured",
        ))
    }
}

/// NoopWsConnect is a no-op implementation that always returns an error.
///
/// This is used when no WebSocket connector is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopWsConnect;

#[async_trait::async_trait]
impl WsConnect for NoopWsConnect {
    async fn ws_connect(&self, _req: http::Request<()>) -> Result<Box<dyn WsConnection>> {
        Err(Error::unexpected(
            "WebSocket connecting not supported: no WebSocket connector configured",
        ))
    }
}

/// NoopEnv is a no-op implementation that always returns None/empty.
///
/// This is used when no environment is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopEnv;

impl Env for NoopEnv {
    fn var(&self, _key: &str) -> Option<String> {
        None
    }

    fn vars(&self) -> HashMap<String, String> {
        HashMap::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_noop_context() {
        let ctx = Context::new();

        let req = http::Request::new(Bytes::new());
        assert!(ctx.http_send(req).await.is_err());
        assert!(ctx.ws_connect(http::Request::new(())).await.is_err());
        assert_eq!(ctx.env_var("CATENIS_DEVICE_ID"), None);
    }

    #[test]
    fn test_static_env() {
        let ctx = Context::new().with_env(StaticEnv {
            envs: HashMap::from([("CATENIS_HOST".to_string(), "localhost".to_string())]),
        });

        assert_eq!(ctx.env_var("CATENIS_HOST"), Some("localhost".to_string()));
        assert_eq!(ctx.env_vars().len(), 1);
    }
}
