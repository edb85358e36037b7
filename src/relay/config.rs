/*
 * Copyright (C) 2017 Genymobile
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 * You may obtain a copy of the License at
 *
 *     http://www.apache.org/licenses/LICENSE-2.0
 *
 * Unless required by applicable law or agreed to in writing, software
 * distributed under the License is distributed on an "AS IS" BASIS,
 * WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 * See the License for the specific language governing permissions and
 * limitations under the License.
 */

use serde::Deserialize;
use std::fs;
use std::time::Duration;

pub const DEFAULT_LISTEN_ADDR: &str = "localhost:9090";
pub const DEFAULT_WORKER_COUNT: usize = 5;
pub const DEFAULT_DIAL_TIMEOUT_MS: u64 = 1000;

#[derive(Debug, Clone, Deserialize)]
pub struct RelayConfig {
    pub target_addr: String,
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,
    #[serde(default = "default_worker_count")]
    pub worker_count: usize,
    #[serde(default = "default_dial_timeout_ms")]
    pub dial_timeout_ms: u64,
}

fn default_listen_addr() -> String {
    DEFAULT_LISTEN_ADDR.to_string()
}

fn default_worker_count() -> usize {
    DEFAULT_WORKER_COUNT
}

fn default_dial_timeout_ms() -> u64 {
    DEFAULT_DIAL_TIMEOUT_MS
}

impl RelayConfig {
    pub fn new<S: Into<String>>(target_addr: S) -> Self {
        Self {
            target_addr: target_addr.into(),
            listen_addr: default_listen_addr(),
            worker_count: DEFAULT_WORKER_COUNT,
            dial_timeout_ms: DEFAULT_DIAL_TIMEOUT_MS,
        }
    }

    // simple String as errors is sufficient, we never need to inspect them
    pub fn from_file(path: &str) -> Result<Self, String> {
        let content =
            fs::read_to_string(path).map_err(|err| format!("Cannot read \"{}\": {}", path, err))?;
        Self::from_toml(&content).map_err(|err| format!("Cannot parse \"{}\": {}", path, err))
    }

    fn from_toml(content: &str) -> Result<Self, String> {
        toml::from_str(content).map_err(|err| err.to_string())
    }

    pub fn dial_timeout(&self) -> Duration {
        Duration::from_millis(self.dial_timeout_ms)
    }
}
