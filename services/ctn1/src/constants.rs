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

// Headers used by CTN1 signing.
pub const X_BCOT_TIMESTAMP: &str = "x-bcot-timestamp";

// Signing identifiers.
pub const SIGN_VERSION_ID: &str = "CTN1";
pub const SIGN_METHOD_ID: &str = "CTN1-HMAC-SHA256";
pub const SCOPE_REQUEST: &str = "ctn1_request";

/// Number of days a derived signing key stays in use.
pub const SIGN_VALID_DAYS: i64 = 7;

// Env values used by Catenis.
pub const CATENIS_DEVICE_ID: &str = "CATENIS_DEVICE_ID";
pub const CATENIS_API_ACCESS_SECRET: &str = "CATENIS_API_ACCESS_SECRET";
