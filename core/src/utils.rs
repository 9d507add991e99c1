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

//! Utility functions and types.

use std::fmt::{Debug, Formatter};

/// Redact hides secrets like the API access secret in debug output.
///
/// - Empty input is printed as `EMPTY`.
/// - Input shorter than 12 bytes is printed as `***`.
/// - Otherwise only the first and last three characters are kept, so that two
///   different secrets can still be told apart in logs.
#[derive(Clone, Copy)]
pub struct Redact<'a>(Option<&'a str>);

impl<'a> From<&'a str> for Redact<'a> {
    fn from(value: &'a str) -> Self {
        Redact(Some(value))
    }
}

impl<'a> From<&'a String> for Redact<'a> {
    fn from(value: &'a String) -> Self {
        Redact(Some(value.as_str()))
    }
}

impl<'a> From<&'a Option<String>> for Redact<'a> {
    fn from(value: &'a Option<String>) -> Self {
        Redact(value.as_deref())
    }
}

impl Debug for Redact<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let v = match self.0 {
            None | Some("") => return f.write_str("EMPTY"),
            Some(v) => v,
        };

        if v.len() < 12 || !v.is_char_boundary(3) || !v.is_char_boundary(v.len() - 3) {
            return f.write_str("***");
        }

        write!(f, "{}***{}", &v[..3], &v[v.len() - 3..])
    }
}
