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

//! Blocking client, for use outside of an async runtime.

use std::sync::Arc;
use std::time::Duration;

use catenis_core::{Context, Error, Result};
use chrono::{DateTime, Utc};
use serde_json::Value;
use tokio::runtime::Runtime;

use crate::client::Client;
use crate::config::Config;
use crate::notify::{NotifyEvent, WsNotifyChannel};
use crate::options::*;
use crate::version::ApiVersion;

/// Blocking counterpart of [`Client`].
///
/// Every call blocks the current thread until the response is processed. The
/// client owns a small runtime that also drives its notification channels.
///
/// Must not be used, nor dropped, from within an async context.
#[derive(Debug, Clone)]
pub struct BlockingClient {
    client: Client,
    runtime: Arc<Runtime>,
}

impl BlockingClient {
    /// Create a client that talks to the Catenis API over reqwest and tokio-tungstenite.
    #[cfg(feature = "default-context")]
    pub fn new(config: Config) -> Result<Self> {
        let runtime = build_runtime()?;
        let client = {
            let _guard = runtime.enter();
            Client::new(config.with_runtime(runtime.handle().clone()))?
        };

        Ok(Self {
            client,
            runtime: Arc::new(runtime),
        })
    }

    /// Create a client on top of the given context.
    pub fn with_context(ctx: Context, config: Config) -> Result<Self> {
        let runtime = build_runtime()?;
        let client = Client::with_context(ctx, config.with_runtime(runtime.handle().clone()))?;

        Ok(Self {
            client,
            runtime: Arc::new(runtime),
        })
    }

    /// Version of the Catenis API this client targets.
    pub fn api_version(&self) -> ApiVersion {
        self.client.api_version()
    }

    /// The async client this client drives.
    pub fn as_async(&self) -> &Client {
        &self.client
    }

    /// Log a message. See [`Client::log_message`].
    pub fn log_message(
        &self,
        message: impl Into<Message>,
        options: Option<LogMessageOptions>,
    ) -> Result<Value> {
        self.runtime
            .block_on(self.client.log_message(message, options))
    }

    /// Send a message. See [`Client::send_message`].
    pub fn send_message(
        &self,
        message: impl Into<Message>,
        target_device: DeviceId,
        options: Option<SendMessageOptions>,
    ) -> Result<Value> {
        self.runtime
            .block_on(self.client.send_message(message, target_device, options))
    }

    /// Read a message. See [`Client::read_message`].
    pub fn read_message(&self, message_id: &str, options: Option<ReadMessageArg>) -> Result<Value> {
        self.runtime
            .block_on(self.client.read_message(message_id, options))
    }

    /// See [`Client::retrieve_message_container`].
    pub fn retrieve_message_container(&self, message_id: &str) -> Result<Value> {
        self.runtime
            .block_on(self.client.retrieve_message_container(message_id))
    }

    /// See [`Client::retrieve_message_origin`].
    pub fn retrieve_message_origin(
        &self,
        message_id: &str,
        msg_to_sign: Option<&str>,
    ) -> Result<Value> {
        self.runtime
            .block_on(self.client.retrieve_message_origin(message_id, msg_to_sign))
    }

    /// See [`Client::retrieve_message_progress`].
    pub fn retrieve_message_progress(&self, message_id: &str) -> Result<Value> {
        self.runtime
            .block_on(self.client.retrieve_message_progress(message_id))
    }

    /// See [`Client::list_messages`].
    pub fn list_messages(
        &self,
        selector: Option<MessageSelector>,
        limit: Option<u32>,
        skip: Option<u32>,
    ) -> Result<Value> {
        self.runtime
            .block_on(self.client.list_messages(selector, limit, skip))
    }

    /// See [`Client::list_permission_events`].
    pub fn list_permission_events(&self) -> Result<Value> {
        self.runtime.block_on(self.client.list_permission_events())
    }

    /// See [`Client::retrieve_permission_rights`].
    pub fn retrieve_permission_rights(&self, event_name: &str) -> Result<Value> {
        self.runtime
            .block_on(self.client.retrieve_permission_rights(event_name))
    }

    /// See [`Client::set_permission_rights`].
    pub fn set_permission_rights(&self, event_name: &str, rights: PermissionRights) -> Result<Value> {
        self.runtime
            .block_on(self.client.set_permission_rights(event_name, rights))
    }

    /// See [`Client::check_effective_permission_right`].
    pub fn check_effective_permission_right(
        &self,
        event_name: &str,
        device_id: &str,
        is_prod_unique_id: bool,
    ) -> Result<Value> {
        self.runtime.block_on(self.client.check_effective_permission_right(
            event_name,
            device_id,
            is_prod_unique_id,
        ))
    }

    /// See [`Client::list_notification_events`].
    pub fn list_notification_events(&self) -> Result<Value> {
        self.runtime.block_on(self.client.list_notification_events())
    }

    /// See [`Client::retrieve_device_identification_info`].
    pub fn retrieve_device_identification_info(
        &self,
        device_id: &str,
        is_prod_unique_id: bool,
    ) -> Result<Value> {
        self.runtime.block_on(
            self.client
                .retrieve_device_identification_info(device_id, is_prod_unique_id),
        )
    }

    /// See [`Client::issue_asset`].
    pub fn issue_asset(
        &self,
        asset_info: AssetInfo,
        amount: f64,
        holding_device: Option<DeviceId>,
    ) -> Result<Value> {
        self.runtime
            .block_on(self.client.issue_asset(asset_info, amount, holding_device))
    }

    /// See [`Client::reissue_asset`].
    pub fn reissue_asset(
        &self,
        asset_id: &str,
        amount: f64,
        holding_device: Option<DeviceId>,
    ) -> Result<Value> {
        self.runtime
            .block_on(self.client.reissue_asset(asset_id, amount, holding_device))
    }

    /// See [`Client::transfer_asset`].
    pub fn transfer_asset(
        &self,
        asset_id: &str,
        amount: f64,
        receiving_device: DeviceId,
    ) -> Result<Value> {
        self.runtime
            .block_on(self.client.transfer_asset(asset_id, amount, receiving_device))
    }

    /// See [`Client::retrieve_asset_info`].
    pub fn retrieve_asset_info(&self, asset_id: &str) -> Result<Value> {
        self.runtime
            .block_on(self.client.retrieve_asset_info(asset_id))
    }

    /// See [`Client::get_asset_balance`].
    pub fn get_asset_balance(&self, asset_id: &str) -> Result<Value> {
        self.runtime
            .block_on(self.client.get_asset_balance(asset_id))
    }

    /// See [`Client::list_owned_assets`].
    pub fn list_owned_assets(&self, limit: Option<u32>, skip: Option<u32>) -> Result<Value> {
        self.runtime
            .block_on(self.client.list_owned_assets(limit, skip))
    }

    /// See [`Client::list_issued_assets`].
    pub fn list_issued_assets(&self, limit: Option<u32>, skip: Option<u32>) -> Result<Value> {
        self.runtime
            .block_on(self.client.list_issued_assets(limit, skip))
    }

    /// See [`Client::retrieve_asset_issuance_history`].
    pub fn retrieve_asset_issuance_history(
        &self,
        asset_id: &str,
        start_date: Option<DateTime<Utc>>,
        end_date: Option<DateTime<Utc>>,
        limit: Option<u32>,
        skip: Option<u32>,
    ) -> Result<Value> {
        self.runtime.block_on(self.client.retrieve_asset_issuance_history(
            asset_id, start_date, end_date, limit, skip,
        ))
    }

    /// See [`Client::list_asset_holders`].
    pub fn list_asset_holders(
        &self,
        asset_id: &str,
        limit: Option<u32>,
        skip: Option<u32>,
    ) -> Result<Value> {
        self.runtime
            .block_on(self.client.list_asset_holders(asset_id, limit, skip))
    }

    /// Create a channel to receive notifications of the given event.
    pub fn create_ws_notify_channel(&self, event_name: impl Into<String>) -> BlockingWsNotifyChannel {
        BlockingWsNotifyChannel {
            channel: self.client.create_ws_notify_channel(event_name),
            runtime: self.runtime.clone(),
        }
    }
}

/// Blocking counterpart of [`WsNotifyChannel`].
#[derive(Debug)]
pub struct BlockingWsNotifyChannel {
    channel: WsNotifyChannel,
    runtime: Arc<Runtime>,
}

impl BlockingWsNotifyChannel {
    /// Name of the notification event this channel listens to.
    pub fn event_name(&self) -> &str {
        self.channel.event_name()
    }

    /// Whether the channel is open.
    pub fn is_open(&self) -> bool {
        self.channel.is_open()
    }

    /// Open the channel. See [`WsNotifyChannel::open`].
    pub fn open(&self) -> Result<()> {
        self.runtime.block_on(self.channel.open())
    }

    /// Close the channel. Does nothing if the channel is not open.
    pub fn close(&self) {
        self.channel.close()
    }

    /// Wait for the next event. See [`WsNotifyChannel::recv`].
    pub fn recv(&self) -> Option<NotifyEvent> {
        self.runtime.block_on(self.channel.recv())
    }

    /// Wait at most `timeout` for the next event.
    ///
    /// Returns `None` if no event arrived in time or if the channel is done.
    pub fn recv_timeout(&self, timeout: Duration) -> Option<NotifyEvent> {
        self.runtime.block_on(async {
            tokio::time::timeout(timeout, self.channel.recv())
                .await
                .ok()
                .flatten()
        })
    }
}

fn build_runtime() -> Result<Runtime> {
    tokio::runtime::Builder::new_multi_thread()
        .worker_threads(1)
        .thread_name("catenis-client")
        .enable_all()
        .build()
        .map_err(|e| Error::unexpected("failed to build client runtime").with_source(e))
}
