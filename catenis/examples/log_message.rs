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

//! Log a message and wait for it to be read.
//!
//! Credentials and service location are taken from the environment:
//! `CATENIS_DEVICE_ID`, `CATENIS_API_ACCESS_SECRET`, `CATENIS_ENVIRONMENT`...

use std::time::Duration;

use catenis::{BlockingClient, Config, Context, NotifyEvent, OsEnv};

fn main() -> catenis::Result<()> {
    env_logger::init();

    let config = Config::new().from_env(&Context::new().with_env(OsEnv));
    let client = BlockingClient::new(config)?;

    let data = client.log_message("Hello from Rust", None)?;
    println!("logged message: {data}");

    let channel = client.create_ws_notify_channel("new-msg-received");
    channel.open()?;
    while let Some(event) = channel.recv_timeout(Duration::from_secs(60)) {
        match event {
            NotifyEvent::Open => println!("notification channel is open"),
            NotifyEvent::Notify(payload) => println!("new message: {payload}"),
            NotifyEvent::Error(err) => eprintln!("notification channel error: {err}"),
            NotifyEvent::Close { code, reason } => {
                println!("notification channel closed: [{code}] {reason}");
                break;
            }
        }
    }
    channel.close();

    Ok(())
}
