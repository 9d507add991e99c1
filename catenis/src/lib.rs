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

//! Client of the Catenis API.
//!
//! Requests are signed with the CTN1 scheme by [`catenis_ctn1`] and sent through
//! the transports of a [`Context`]. With the `default-context` feature (on by
//! default) [`Client::new`] wires reqwest and tokio-tungstenite for you.
//!
//! ## Example
//!
//! ```no_run
//! use catenis::{Client, Config, NotifyEvent};
//!
//! # async fn example() -> catenis::Result<()> {
//! let client = Client::new(Config::new().with_credential("device_id", "api_access_secret"))?;
//!
//! let data = client.log_message("Hello, Catenis", None).await?;
//! println!("logged message {}", data["messageId"]);
//!
//! let channel = client.create_ws_notify_channel("new-msg-received");
//! channel.open().await?;
//! while let Some(event) = channel.recv().await {
//!     match event {
//!         NotifyEvent::Notify(payload) => println!("notification: {payload}"),
//!         NotifyEvent::Close { code, .. } => println!("closed with {code}"),
//!         _ => {}
//!     }
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Features
//!
//! - `compression`: deflate request bodies over the configured threshold and accept
//!   deflated responses.
//! - `default-context`: provide [`Client::new`] and [`BlockingClient::new`].

#![warn(missing_docs)]

mod constants;
pub use constants::{CATENIS_API_VERSION, CATENIS_ENVIRONMENT, CATENIS_HOST, CATENIS_SECURE};
pub use catenis_ctn1::{CATENIS_API_ACCESS_SECRET, CATENIS_DEVICE_ID};

mod config;
pub use config::{Config, Environment};

mod version;
pub use version::ApiVersion;

mod endpoint;
pub use endpoint::{QueryValue, ServiceEndpoints, ServiceType};

mod invoke;

pub mod options;
pub use options::*;

mod client;
pub use client::Client;

mod notify;
pub use notify::{NotifyEvent, WsNotifyChannel};

mod blocking;
pub use blocking::{BlockingClient, BlockingWsNotifyChannel};

pub use catenis_core::{
    Context, Env, Error, ErrorKind, HttpSend, OsEnv, Result, StaticEnv, WsConnect, WsConnection,
    WsMessage,
};
