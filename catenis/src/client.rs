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

use std::sync::Arc;

use catenis_core::{Context, Error, Result, Signer};
use catenis_ctn1::{DefaultCredentialProvider, RequestSigner, StaticCredentialProvider};
use chrono::{DateTime, Utc};
use log::debug;
use serde::Serialize;
use serde_json::{json, Map, Value};

use crate::config::Config;
use crate::endpoint::ServiceEndpoints;
use crate::invoke::{ApiRequest, Invoker};
use crate::notify::WsNotifyChannel;
use crate::options::*;
use crate::version::ApiVersion;

/// Client of the Catenis API.
///
/// Cloning a client is cheap: clones share the transports, the credential and
/// the signing key cache.
///
/// ## Example
///
/// ```no_run
/// use catenis::{Client, Config};
///
/// # async fn example() -> catenis::Result<()> {
/// let client = Client::new(
///     Config::new()
///         .with_environment(catenis::Environment::Sandbox)
///         .with_credential("d8YpQ7jgPBJEkBrnvp58", "267a687115b9752f2eec5be849b570b29133528f928868d811bad5e48e97a1d62d432bab44803586b2ac35002ec6f0eeaa98bec79b64f2f69b9cb0935b4df2c4"),
/// )?;
///
/// let data = client.log_message("My message", None).await?;
/// println!("message id: {}", data["messageId"]);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Client {
    invoker: Arc<Invoker>,
    api_version: ApiVersion,
    runtime: Option<tokio::runtime::Handle>,
}

impl Client {
    /// Create a client that talks to the Catenis API over reqwest and tokio-tungstenite.
    #[cfg(feature = "default-context")]
    pub fn new(config: Config) -> Result<Self> {
        use catenis_core::OsEnv;
        use catenis_http_send_reqwest::ReqwestHttpSend;
        use catenis_ws_connect_tungstenite::TungsteniteWsConnect;

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.effective_timeout() {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .map_err(|e| Error::config_invalid("failed to build http client").with_source(e))?;

        let ctx = Context::new()
            .with_http_send(ReqwestHttpSend::new(http))
            .with_ws_connect(TungsteniteWsConnect)
            .with_env(OsEnv);

        Self::with_context(ctx, config)
    }

    /// Create a client on top of the given context.
    ///
    /// The context provides the transports; the timeout in `config` is not applied
    /// here and must be set on the context's HTTP client instead.
    pub fn with_context(ctx: Context, config: Config) -> Result<Self> {
        let endpoints = ServiceEndpoints::new(&config)?;
        let api_version = config.api_version()?;
        let compress_threshold = config.compress_threshold()?;

        // Credential from config first, then from the context env.
        let mut loader = DefaultCredentialProvider::new();
        let device_id = config.device_id.as_deref().filter(|v| !v.is_empty());
        let secret = config.api_access_secret.as_deref().filter(|v| !v.is_empty());
        match (device_id, secret) {
            (Some(device_id), Some(secret)) => {
                loader = loader.push_front(StaticCredentialProvider::new(device_id, secret));
            }
            (None, None) => debug!("no device credential configured, falling back to env"),
            _ => {
                return Err(Error::credential_invalid(
                    "device id and api access secret must be set together",
                ))
            }
        }
        let signer = Signer::new(ctx.clone(), loader, RequestSigner::new());

        let invoker = Invoker::new(
            ctx,
            signer,
            endpoints,
            config.use_compression.unwrap_or(true),
            compress_threshold,
        );

        Ok(Self {
            invoker: Arc::new(invoker),
            api_version,
            runtime: config.runtime,
        })
    }

    /// Version of the Catenis API this client targets.
    pub fn api_version(&self) -> ApiVersion {
        self.api_version
    }

    /// Endpoints this client sends its requests to.
    pub fn endpoints(&self) -> &ServiceEndpoints {
        self.invoker.endpoints()
    }

    /// Context this client was built with.
    pub fn context(&self) -> &Context {
        self.invoker.context()
    }

    /// Log a message.
    pub async fn log_message(
        &self,
        message: impl Into<Message>,
        options: Option<LogMessageOptions>,
    ) -> Result<Value> {
        let mut body = Map::new();
        body.insert("message".to_string(), to_value(message.into())?);
        insert_options(&mut body, options)?;

        self.invoker
            .invoke(ApiRequest::post("messages/log", Value::Object(body)))
            .await
    }

    /// Send a message to another device.
    pub async fn send_message(
        &self,
        message: impl Into<Message>,
        target_device: DeviceId,
        options: Option<SendMessageOptions>,
    ) -> Result<Value> {
        let mut body = Map::new();
        body.insert("message".to_string(), to_value(message.into())?);
        body.insert("targetDevice".to_string(), to_value(target_device)?);
        insert_options(&mut body, options)?;

        self.invoker
            .invoke(ApiRequest::post("messages/send", Value::Object(body)))
            .await
    }

    /// Read a message.
    ///
    /// `options` is either just the encoding of the returned message or the
    /// complete [`ReadMessageOptions`].
    pub async fn read_message(
        &self,
        message_id: &str,
        options: Option<ReadMessageArg>,
    ) -> Result<Value> {
        let opts: ReadMessageOptions = options.map(Into::into).unwrap_or_default();

        let req = ApiRequest::get("messages/:messageId")
            .url_param("messageId", message_id)
            .query_opt("encoding", opts.encoding.map(|v| v.to_string()))
            .query_opt("continuationToken", opts.continuation_token)
            .query_opt("dataChunkSize", opts.data_chunk_size)
            .query_opt("async", opts.is_async);
        self.invoker.invoke(req).await
    }

    /// Retrieve the blockchain transaction or storage location that holds a message.
    pub async fn retrieve_message_container(&self, message_id: &str) -> Result<Value> {
        let req =
            ApiRequest::get("messages/:messageId/container").url_param("messageId", message_id);
        self.invoker.invoke(req).await
    }

    /// Retrieve the origin of a message.
    ///
    /// This endpoint is public: the request is not signed.
    pub async fn retrieve_message_origin(
        &self,
        message_id: &str,
        msg_to_sign: Option<&str>,
    ) -> Result<Value> {
        let req = ApiRequest::get("messages/:messageId/origin")
            .url_param("messageId", message_id)
            .query_opt("msgToSign", msg_to_sign)
            .unsigned();
        self.invoker.invoke(req).await
    }

    /// Retrieve the progress of an asynchronous message processing.
    pub async fn retrieve_message_progress(&self, message_id: &str) -> Result<Value> {
        let req =
            ApiRequest::get("messages/:messageId/progress").url_param("messageId", message_id);
        self.invoker.invoke(req).await
    }

    /// List messages matching the selector.
    pub async fn list_messages(
        &self,
        selector: Option<MessageSelector>,
        limit: Option<u32>,
        skip: Option<u32>,
    ) -> Result<Value> {
        let mut req = ApiRequest::get("messages");

        if let Some(selector) = selector {
            let (from_ids, from_prod_unique_ids) = split_device_ids(&selector.from_devices);
            let (to_ids, to_prod_unique_ids) = split_device_ids(&selector.to_devices);

            req = req
                .query_opt("action", selector.action.map(|v| v.to_string()))
                .query_opt("direction", selector.direction.map(|v| v.to_string()))
                .query_opt("fromDeviceIds", from_ids)
                .query_opt("fromDeviceProdUniqueIds", from_prod_unique_ids)
                .query_opt("toDeviceIds", to_ids)
                .query_opt("toDeviceProdUniqueIds", to_prod_unique_ids)
                .query_opt("readState", selector.read_state.map(|v| v.to_string()))
                .query_opt("startDate", selector.start_date)
                .query_opt("endDate", selector.end_date);
        }

        let req = req.query_opt("limit", limit).query_opt("skip", skip);
        self.invoker.invoke(req).await
    }

    /// List the system defined permission events.
    pub async fn list_permission_events(&self) -> Result<Value> {
        self.invoker
            .invoke(ApiRequest::get("permission/events"))
            .await
    }

    /// Retrieve the permission rights currently set for an event.
    pub async fn retrieve_permission_rights(&self, event_name: &str) -> Result<Value> {
        let req = ApiRequest::get("permission/events/:eventName/rights")
            .url_param("eventName", event_name);
        self.invoker.invoke(req).await
    }

    /// Set permission rights for an event.
    pub async fn set_permission_rights(
        &self,
        event_name: &str,
        rights: PermissionRights,
    ) -> Result<Value> {
        let req = ApiRequest::post("permission/events/:eventName/rights", to_value(rights)?)
            .url_param("eventName", event_name);
        self.invoker.invoke(req).await
    }

    /// Check the permission right effectively applied to a device for an event.
    pub async fn check_effective_permission_right(
        &self,
        event_name: &str,
        device_id: &str,
        is_prod_unique_id: bool,
    ) -> Result<Value> {
        let req = ApiRequest::get("permission/events/:eventName/rights/:deviceId")
            .url_param("eventName", event_name)
            .url_param("deviceId", device_id)
            .query_opt("isProdUniqueId", is_prod_unique_id.then_some(true));
        self.invoker.invoke(req).await
    }

    /// List the system defined notification events.
    pub async fn list_notification_events(&self) -> Result<Value> {
        self.invoker
            .invoke(ApiRequest::get("notification/events"))
            .await
    }

    /// Retrieve the identification information of a device.
    pub async fn retrieve_device_identification_info(
        &self,
        device_id: &str,
        is_prod_unique_id: bool,
    ) -> Result<Value> {
        let req = ApiRequest::get("devices/:deviceId")
            .url_param("deviceId", device_id)
            .query_opt("isProdUniqueId", is_prod_unique_id.then_some(true));
        self.invoker.invoke(req).await
    }

    /// Issue an amount of a new asset.
    pub async fn issue_asset(
        &self,
        asset_info: AssetInfo,
        amount: f64,
        holding_device: Option<DeviceId>,
    ) -> Result<Value> {
        let mut body = Map::new();
        body.insert("assetInfo".to_string(), to_value(asset_info)?);
        body.insert("amount".to_string(), json!(amount));
        if let Some(device) = holding_device {
            body.insert("holdingDevice".to_string(), to_value(device)?);
        }

        self.invoker
            .invoke(ApiRequest::post("assets/issue", Value::Object(body)))
            .await
    }

    /// Issue an additional amount of an existing asset.
    pub async fn reissue_asset(
        &self,
        asset_id: &str,
        amount: f64,
        holding_device: Option<DeviceId>,
    ) -> Result<Value> {
        let mut body = Map::new();
        body.insert("amount".to_string(), json!(amount));
        if let Some(device) = holding_device {
            body.insert("holdingDevice".to_string(), to_value(device)?);
        }

        let req = ApiRequest::post("assets/:assetId/issue", Value::Object(body))
            .url_param("assetId", asset_id);
        self.invoker.invoke(req).await
    }

    /// Transfer an amount of an asset to a device.
    pub async fn transfer_asset(
        &self,
        asset_id: &str,
        amount: f64,
        receiving_device: DeviceId,
    ) -> Result<Value> {
        let body = json!({
            "amount": amount,
            "receivingDevice": to_value(receiving_device)?,
        });

        let req = ApiRequest::post("assets/:assetId/transfer", body).url_param("assetId", asset_id);
        self.invoker.invoke(req).await
    }

    /// Retrieve information about an asset.
    pub async fn retrieve_asset_info(&self, asset_id: &str) -> Result<Value> {
        let req = ApiRequest::get("assets/:assetId").url_param("assetId", asset_id);
        self.invoker.invoke(req).await
    }

    /// Get the balance of an asset held by the device.
    pub async fn get_asset_balance(&self, asset_id: &str) -> Result<Value> {
        let req = ApiRequest::get("assets/:assetId/balance").url_param("assetId", asset_id);
        self.invoker.invoke(req).await
    }

    /// List the assets owned by the device.
    pub async fn list_owned_assets(&self, limit: Option<u32>, skip: Option<u32>) -> Result<Value> {
        let req = ApiRequest::get("assets/owned")
            .query_opt("limit", limit)
            .query_opt("skip", skip);
        self.invoker.invoke(req).await
    }

    /// List the assets issued by the device.
    pub async fn list_issued_assets(&self, limit: Option<u32>, skip: Option<u32>) -> Result<Value> {
        let req = ApiRequest::get("assets/issued")
            .query_opt("limit", limit)
            .query_opt("skip", skip);
        self.invoker.invoke(req).await
    }

    /// Retrieve the issuance history of an asset.
    pub async fn retrieve_asset_issuance_history(
        &self,
        asset_id: &str,
        start_date: Option<DateTime<Utc>>,
        end_date: Option<DateTime<Utc>>,
        limit: Option<u32>,
        skip: Option<u32>,
    ) -> Result<Value> {
        let req = ApiRequest::get("assets/:assetId/issuance")
            .url_param("assetId", asset_id)
            .query_opt("startDate", start_date)
            .query_opt("endDate", end_date)
            .query_opt("limit", limit)
            .query_opt("skip", skip);
        self.invoker.invoke(req).await
    }

    /// List the devices currently holding an amount of an asset.
    pub async fn list_asset_holders(
        &self,
        asset_id: &str,
        limit: Option<u32>,
        skip: Option<u32>,
    ) -> Result<Value> {
        let req = ApiRequest::get("assets/:assetId/holders")
            .url_param("assetId", asset_id)
            .query_opt("limit", limit)
            .query_opt("skip", skip);
        self.invoker.invoke(req).await
    }

    /// Create a channel to receive notifications of the given event.
    ///
    /// The channel is not connected until [`WsNotifyChannel::open`] is called.
    pub fn create_ws_notify_channel(&self, event_name: impl Into<String>) -> WsNotifyChannel {
        WsNotifyChannel::new(self.invoker.clone(), event_name.into(), self.runtime.clone())
    }
}

fn to_value(v: impl Serialize) -> Result<Value> {
    serde_json::to_value(v).map_err(|e| {
        Error::request_invalid("failed to serialize request parameter").with_source(e)
    })
}

/// Add `options` to the body unless nothing in it is set.
fn insert_options(body: &mut Map<String, Value>, options: Option<impl Serialize>) -> Result<()> {
    let Some(options) = options else {
        return Ok(());
    };

    match to_value(options)? {
        Value::Object(map) if map.is_empty() => {}
        value => {
            body.insert("options".to_string(), value);
        }
    }
    Ok(())
}
