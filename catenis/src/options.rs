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

//! Parameters of the API endpoint methods.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt::{Display, Formatter};

/// Encoding of message contents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Encoding {
    /// UTF-8 text.
    Utf8,
    /// Base64 encoded binary.
    Base64,
    /// Hex encoded binary.
    Hex,
}

impl Display for Encoding {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Encoding::Utf8 => "utf8",
            Encoding::Base64 => "base64",
            Encoding::Hex => "hex",
        })
    }
}

/// Where a message should be stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Storage {
    /// Let the service decide.
    Auto,
    /// Embedded in the blockchain transaction.
    Embedded,
    /// Stored in the external storage repository.
    External,
}

/// Message contents, either whole or as one data chunk.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Message {
    /// The whole message.
    Text(String),
    /// A chunk of a message sent in parts.
    Chunk(MessageChunk),
}

impl From<&str> for Message {
    fn from(v: &str) -> Self {
        Message::Text(v.to_string())
    }
}

impl From<String> for Message {
    fn from(v: String) -> Self {
        Message::Text(v)
    }
}

impl From<MessageChunk> for Message {
    fn from(v: MessageChunk) -> Self {
        Message::Chunk(v)
    }
}

/// One chunk of a message passed in parts.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageChunk {
    /// The data of this chunk. May be omitted for a final chunk.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
    /// Whether this is the final chunk. The service assumes `true` when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_final: Option<bool>,
    /// Token returned for the previous chunk.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub continuation_token: Option<String>,
}

/// Identifies a device, either by its Catenis device id or by its product unique id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceId {
    /// The id.
    pub id: String,
    /// Whether `id` is a product unique id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_prod_unique_id: Option<bool>,
}

impl DeviceId {
    /// A Catenis device id.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            is_prod_unique_id: None,
        }
    }

    /// A product unique id.
    pub fn prod_unique_id(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            is_prod_unique_id: Some(true),
        }
    }

    pub(crate) fn is_prod_unique(&self) -> bool {
        self.is_prod_unique_id.unwrap_or(false)
    }
}

/// Options of the Log Message endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LogMessageOptions {
    /// Encoding of the message contents.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub encoding: Option<Encoding>,
    /// Whether the message should be encrypted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub encrypt: Option<bool>,
    /// Whether the message should be processed as an off-chain message.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub off_chain: Option<bool>,
    /// Where the message should be stored.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage: Option<Storage>,
    /// Whether processing should be done asynchronously.
    #[serde(rename = "async", skip_serializing_if = "Option::is_none")]
    pub is_async: Option<bool>,
}

/// Options of the Send Message endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageOptions {
    /// Encoding of the message contents.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub encoding: Option<Encoding>,
    /// Whether the message should be encrypted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub encrypt: Option<bool>,
    /// Whether the message should be processed as an off-chain message.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub off_chain: Option<bool>,
    /// Where the message should be stored.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage: Option<Storage>,
    /// Whether the message should be sent with read confirmation enabled.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub read_confirmation: Option<bool>,
    /// Whether processing should be done asynchronously.
    #[serde(rename = "async", skip_serializing_if = "Option::is_none")]
    pub is_async: Option<bool>,
}

/// Options of the Read Message endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReadMessageOptions {
    /// Encoding to use for the returned message.
    pub encoding: Option<Encoding>,
    /// Token to read the next data chunk.
    pub continuation_token: Option<String>,
    /// Size, in bytes, of the largest data chunk to return.
    pub data_chunk_size: Option<u32>,
    /// Whether processing should be done asynchronously.
    pub is_async: Option<bool>,
}

/// Argument of [`crate::Client::read_message`]: a bare encoding or the complete options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadMessageArg {
    /// Only the encoding option.
    Encoding(Encoding),
    /// All the options.
    Options(ReadMessageOptions),
}

impl From<Encoding> for ReadMessageArg {
    fn from(v: Encoding) -> Self {
        ReadMessageArg::Encoding(v)
    }
}

impl From<ReadMessageOptions> for ReadMessageArg {
    fn from(v: ReadMessageOptions) -> Self {
        ReadMessageArg::Options(v)
    }
}

impl From<ReadMessageArg> for ReadMessageOptions {
    fn from(v: ReadMessageArg) -> Self {
        match v {
            ReadMessageArg::Encoding(encoding) => ReadMessageOptions {
                encoding: Some(encoding),
                ..Default::default()
            },
            ReadMessageArg::Options(opts) => opts,
        }
    }
}

/// Action originally performed on a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageAction {
    /// Logged messages.
    Log,
    /// Sent messages.
    Send,
    /// Any message.
    Any,
}

impl Display for MessageAction {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            MessageAction::Log => "log",
            MessageAction::Send => "send",
            MessageAction::Any => "any",
        })
    }
}

/// Direction of a sent message, seen from the requesting device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageDirection {
    /// Messages sent to the device.
    Inbound,
    /// Messages sent from the device.
    Outbound,
    /// Both directions.
    Any,
}

impl Display for MessageDirection {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            MessageDirection::Inbound => "inbound",
            MessageDirection::Outbound => "outbound",
            MessageDirection::Any => "any",
        })
    }
}

/// Read state of a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadState {
    /// Messages not read yet.
    Unread,
    /// Messages already read.
    Read,
    /// Any message.
    Any,
}

impl Display for ReadState {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            ReadState::Unread => "unread",
            ReadState::Read => "read",
            ReadState::Any => "any",
        })
    }
}

/// Selects the messages returned by the List Messages endpoint.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MessageSelector {
    /// Action performed on the messages.
    pub action: Option<MessageAction>,
    /// Direction of sent messages.
    pub direction: Option<MessageDirection>,
    /// Devices that sent the messages.
    pub from_devices: Vec<DeviceId>,
    /// Devices the messages were sent to.
    pub to_devices: Vec<DeviceId>,
    /// Read state of the messages.
    pub read_state: Option<ReadState>,
    /// Lower boundary of the time frame of the messages.
    pub start_date: Option<DateTime<Utc>>,
    /// Upper boundary of the time frame of the messages.
    pub end_date: Option<DateTime<Utc>>,
}

/// Split devices into comma separated lists of device ids and product unique ids.
pub(crate) fn split_device_ids(devices: &[DeviceId]) -> (Option<String>, Option<String>) {
    let (prod_unique, device): (Vec<&DeviceId>, Vec<&DeviceId>) = devices
        .iter()
        .filter(|d| !d.id.is_empty())
        .partition(|d| d.is_prod_unique());

    let join = |ids: Vec<&DeviceId>| {
        (!ids.is_empty()).then(|| {
            ids.iter()
                .map(|d| d.id.as_str())
                .collect::<Vec<_>>()
                .join(",")
        })
    };

    (join(device), join(prod_unique))
}

/// Permission right at system level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PermissionRight {
    /// Allow.
    Allow,
    /// Deny.
    Deny,
}

/// Rights to set for a given level.
///
/// Entries may contain `self` to refer to the requesting entity, and `none`
/// accepts the `*` wildcard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RightsSetting<T> {
    /// Entities given allow right.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allow: Option<Vec<T>>,
    /// Entities given deny right.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deny: Option<Vec<T>>,
    /// Entities the rights of which should be removed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub none: Option<Vec<T>>,
}

impl<T> Default for RightsSetting<T> {
    fn default() -> Self {
        Self {
            allow: None,
            deny: None,
            none: None,
        }
    }
}

/// Permission rights of the Set Permission Rights endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PermissionRights {
    /// Right at system level.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<PermissionRight>,
    /// Rights at Catenis node level, by node index.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub catenis_node: Option<RightsSetting<String>>,
    /// Rights at client level, by client id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client: Option<RightsSetting<String>>,
    /// Rights at device level.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device: Option<RightsSetting<DeviceId>>,
}

/// Information for creating a new asset.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetInfo {
    /// Name of the asset.
    pub name: String,
    /// Description of the asset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Whether more units can be issued later.
    pub can_reissue: bool,
    /// Number of decimal places of fractional amounts.
    pub decimal_places: u8,
}
