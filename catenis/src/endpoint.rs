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

//! Assembly of API and notification endpoint urls.

use std::borrow::Cow;
use std::fmt::{Display, Formatter, Write};

use crate::constants::*;
use crate::{ApiVersion, Config};
use catenis_core::{Error, Result};
use chrono::{DateTime, Utc};
use percent_encoding::{percent_decode_str, utf8_percent_encode};
use url::Url;

/// Services exposed by a Catenis API server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceType {
    /// The request/response API.
    Api,
    /// The WebSocket notification service.
    WsNotify,
}

/// Value of a query string parameter.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryValue {
    /// A string value.
    Str(String),
    /// An integer value.
    Int(i64),
    /// A boolean value, sent as `1` or `0`.
    Bool(bool),
}

impl Display for QueryValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            QueryValue::Str(v) => f.write_str(v),
            QueryValue::Int(v) => write!(f, "{v}"),
            // An empty value would be read back as an empty string.
            QueryValue::Bool(false) => f.write_str("0"),
            QueryValue::Bool(true) => f.write_str("1"),
        }
    }
}

impl From<&str> for QueryValue {
    fn from(v: &str) -> Self {
        QueryValue::Str(v.to_string())
    }
}

impl From<String> for QueryValue {
    fn from(v: String) -> Self {
        QueryValue::Str(v)
    }
}

impl From<bool> for QueryValue {
    fn from(v: bool) -> Self {
        QueryValue::Bool(v)
    }
}

impl From<i64> for QueryValue {
    fn from(v: i64) -> Self {
        QueryValue::Int(v)
    }
}

impl From<u32> for QueryValue {
    fn from(v: u32) -> Self {
        QueryValue::Int(v.into())
    }
}

impl From<DateTime<Utc>> for QueryValue {
    fn from(v: DateTime<Utc>) -> Self {
        QueryValue::Str(catenis_core::time::format_rfc3339(v))
    }
}

/// Root urls of the services of one Catenis API server.
///
/// Both roots end with a slash so that endpoint paths resolve below them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceEndpoints {
    api_root: Url,
    ws_notify_root: Url,
}

impl ServiceEndpoints {
    /// Compute the service roots for given config.
    pub fn new(config: &Config) -> Result<Self> {
        let host = config.effective_host();
        let secure = config.secure.unwrap_or(true);
        let version: ApiVersion = config.api_version()?;

        let api_base_path = format!("{API_PATH}{version}/");
        let ws_notify_base_path =
            format!("{api_base_path}{NOTIFY_ROOT_PATH}/{WS_NOTIFY_ROOT_PATH}/");

        let http_scheme = if secure { "https" } else { "http" };
        let ws_scheme = if secure { "wss" } else { "ws" };

        let parse = |s: String| {
            Url::parse(&s).map_err(|e| {
                Error::config_invalid(format!("invalid service endpoint: {s}")).with_source(e)
            })
        };

        let api_root = parse(format!("{http_scheme}://{host}{api_base_path}"))?;
        let ws_notify_root = parse(format!("{ws_scheme}://{host}{ws_notify_base_path}"))?;
        if api_root.path() != api_base_path {
            return Err(Error::config_invalid(format!("invalid host: {host}")));
        }

        Ok(Self {
            api_root,
            ws_notify_root,
        })
    }

    /// Root of the request/response API, e.g. `https://catenis.io/api/0.10/`.
    pub fn api_root(&self) -> &Url {
        &self.api_root
    }

    /// Root of the notification service, e.g. `wss://catenis.io/api/0.10/notify/ws/`.
    pub fn ws_notify_root(&self) -> &Url {
        &self.ws_notify_root
    }

    /// Assemble the complete url of an endpoint.
    ///
    /// `path` is relative to the service root and may contain `:name` tokens
    /// which are replaced with the matching entry of `url_params`. Query
    /// parameters are appended in the given order.
    ///
    /// Duplicate slashes are collapsed so that the target that gets signed is
    /// the same as the one that is sent.
    pub fn assemble(
        &self,
        service: ServiceType,
        path: &str,
        url_params: &[(&str, &str)],
        query_params: &[(&str, QueryValue)],
    ) -> Result<Url> {
        let mut relative = format_path(path, url_params);

        if !query_params.is_empty() {
            relative.push('?');
            for (idx, (key, value)) in query_params.iter().enumerate() {
                if idx > 0 {
                    relative.push('&');
                }
                write!(
                    relative,
                    "{}={}",
                    utf8_percent_encode(key, &URI_ENCODE_SET),
                    utf8_percent_encode(&value.to_string(), &URI_ENCODE_SET)
                )?;
            }
        }

        let root = match service {
            ServiceType::Api => &self.api_root,
            ServiceType::WsNotify => &self.ws_notify_root,
        };

        // Anchor the path below the root: a leading segment like `a:b` must not be
        // taken for a scheme.
        let mut url = root.join(&format!("./{relative}")).map_err(|e| {
            Error::request_invalid(format!("invalid endpoint path: {relative}")).with_source(e)
        })?;

        let path = remove_duplicate_slashes(url.path());
        if let Cow::Owned(path) = path {
            url.set_path(&path);
        }

        Ok(url)
    }
}

/// Replace `:name` tokens of the path with their values.
///
/// A token only matches when it is not followed by another word character, so
/// `:id` does not touch `:idx`. Values are url-decoded first and then encoded as
/// a single path segment.
fn format_path(path: &str, url_params: &[(&str, &str)]) -> String {
    let mut formatted = path.to_string();

    for (key, value) in url_params {
        let token = format!(":{key}");
        let value = percent_decode_str(value).decode_utf8_lossy();
        let value = utf8_percent_encode(&value, &URI_ENCODE_SET).to_string();

        let mut out = String::with_capacity(formatted.len() + value.len());
        let mut rest = formatted.as_str();
        while let Some(pos) = rest.find(&token) {
            let after = &rest[pos + token.len()..];
            out.push_str(&rest[..pos]);

            let at_boundary = after
                .chars()
                .next()
                .map_or(true, |c| !(c.is_alphanumeric() || c == '_'));
            if at_boundary {
                out.push_str(&value);
            } else {
                out.push_str(&token);
            }
            rest = after;
        }
        out.push_str(rest);

        formatted = out;
    }

    formatted
}

fn remove_duplicate_slashes(path: &str) -> Cow<'_, str> {
    if !path.contains("//") {
        return Cow::Borrowed(path);
    }

    let mut out = String::with_capacity(path.len());
    let mut last_slash = false;
    for c in path.chars() {
        if c == '/' && last_slash {
            continue;
        }
        last_slash = c == '/';
        out.push(c);
    }
    Cow::Owned(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Environment;
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    fn endpoints() -> ServiceEndpoints {
        ServiceEndpoints::new(&Config::new()).unwrap()
    }

    #[test]
    fn test_default_roots() {
        let ep = endpoints();

        assert_eq!(ep.api_root().as_str(), "https://catenis.io/api/0.10/");
        assert_eq!(
            ep.ws_notify_root().as_str(),
            "wss://catenis.io/api/0.10/notify/ws/"
        );
    }

    #[test]
    fn test_insecure_sandbox_roots() {
        let ep = ServiceEndpoints::new(
            &Config::new()
                .with_host("localhost:3000")
                .with_environment(Environment::Sandbox)
                .with_secure(false)
                .with_version("0.12"),
        )
        .unwrap();

        assert_eq!(
            ep.api_root().as_str(),
            "http://sandbox.localhost:3000/api/0.12/"
        );
        assert_eq!(
            ep.ws_notify_root().as_str(),
            "ws://sandbox.localhost:3000/api/0.12/notify/ws/"
        );
    }

    #[test_case("catenis.io/evil"; "path in host")]
    #[test_case("bad host"; "space")]
    fn test_invalid_host(host: &str) {
        assert!(ServiceEndpoints::new(&Config::new().with_host(host)).is_err());
    }

    #[test_case("messages/:messageId", &[("messageId", "m123")], "messages/m123"; "single")]
    #[test_case(
        "permission/events/:eventName/rights/:deviceId",
        &[("eventName", "receive-msg"), ("deviceId", "d1")],
        "permission/events/receive-msg/rights/d1";
        "multiple"
    )]
    #[test_case("assets/:id/:idx", &[("id", "a1")], "assets/a1/:idx"; "word boundary")]
    #[test_case("messages/:messageId", &[], "messages/:messageId"; "unmatched kept")]
    #[test_case("messages/:messageId", &[("messageId", "a%20b")], "messages/a%20b"; "unescaped then encoded")]
    #[test_case("messages/:messageId", &[("messageId", "a/b")], "messages/a%2Fb"; "single segment")]
    fn test_format_path(path: &str, params: &[(&str, &str)], expected: &str) {
        assert_eq!(format_path(path, params), expected);
    }

    #[test]
    fn test_assemble_notify_url() {
        let url = endpoints()
            .assemble(
                ServiceType::WsNotify,
                ":eventName",
                &[("eventName", "new-msg-received")],
                &[],
            )
            .unwrap();

        assert_eq!(
            url.as_str(),
            "wss://catenis.io/api/0.10/notify/ws/new-msg-received"
        );
    }

    #[test]
    fn test_assemble_collapses_duplicate_slashes() {
        let url = endpoints()
            .assemble(
                ServiceType::Api,
                "messages/:messageId/container",
                &[("messageId", "")],
                &[],
            )
            .unwrap();

        assert_eq!(url.as_str(), "https://catenis.io/api/0.10/messages/container");
        assert!(!url.path().contains("//"));
    }

    #[test]
    fn test_assemble_query_in_order() {
        let url = endpoints()
            .assemble(
                ServiceType::Api,
                "messages",
                &[],
                &[
                    ("action", "send".into()),
                    ("direction", "inbound".into()),
                    ("startDate", "2024-01-01T00:00:00Z".into()),
                    ("limit", 200u32.into()),
                    ("skip", 0u32.into()),
                ],
            )
            .unwrap();

        assert_eq!(
            url.as_str(),
            "https://catenis.io/api/0.10/messages?action=send&direction=inbound&startDate=2024-01-01T00%3A00%3A00Z&limit=200&skip=0"
        );
    }

    #[test]
    fn test_assemble_bool_query() {
        let url = endpoints()
            .assemble(
                ServiceType::Api,
                "messages/:messageId",
                &[("messageId", "m1")],
                &[("async", false.into()), ("isProdUniqueId", true.into())],
            )
            .unwrap();

        assert_eq!(url.query(), Some("async=0&isProdUniqueId=1"));
    }
}
