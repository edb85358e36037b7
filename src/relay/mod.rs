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

pub use self::config::RelayConfig;
pub use self::error::{BindError, DialError, PairError};
pub use self::relay::{Relay, RelayHandle};

mod acceptor;
mod config;
mod error;
mod pump;
#[allow(clippy::module_inception)] // relay.rs is in relay/
mod relay;
mod tunnel;
mod worker;
