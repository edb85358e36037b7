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

use log::*;
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::mpsc;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use super::acceptor::Acceptor;
use super::config::RelayConfig;
use super::error::BindError;
use super::worker::WorkerPool;

const TAG: &str = "Relay";

const SHUTDOWN_WAKE_TIMEOUT: Duration = Duration::from_millis(100);

pub struct Relay {
    config: RelayConfig,
}

impl Relay {
    pub fn new(config: RelayConfig) -> Self {
        Self { config }
    }

    /// Bind the listen address and start relaying in the background.
    ///
    /// Returns as soon as the listener is bound; accepting and pairing run
    /// on their own threads and report failures through the log only.
    pub fn start(&self) -> Result<RelayHandle, BindError> {
        let listen_addr = self.config.listen_addr.as_str();
        let listener =
            TcpListener::bind(listen_addr).map_err(|err| BindError::new(listen_addr, err))?;
        let local_addr = listener
            .local_addr()
            .map_err(|err| BindError::new(listen_addr, err))?;

        let accepted = Arc::new(AtomicU64::new(0));
        let shutdown = Arc::new(AtomicBool::new(false));

        let (queue_tx, queue_rx) = mpsc::channel();
        WorkerPool::spawn(
            self.config.worker_count,
            queue_rx,
            self.config.target_addr.clone(),
            self.config.dial_timeout(),
        );

        let acceptor = Acceptor::new(listener, queue_tx, accepted.clone(), shutdown.clone());
        thread::spawn(move || acceptor.run());

        info!(
            target: TAG,
            "Relay server started on {}, forwarding to {}", local_addr, self.config.target_addr
        );
        Ok(RelayHandle {
            local_addr,
            target_addr: self.config.target_addr.clone(),
            accepted,
            shutdown,
        })
    }
}

/// Live view on a started relay: the bound address, the target, the
/// accepted-connection counter, and the cooperative shutdown switch.
pub struct RelayHandle {
    local_addr: SocketAddr,
    target_addr: String,
    accepted: Arc<AtomicU64>,
    shutdown: Arc<AtomicBool>,
}

impl RelayHandle {
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    pub fn target_addr(&self) -> &str {
        &self.target_addr
    }

    /// Number of inbound connections handed to a worker so far. Dial
    /// failures do not roll it back.
    pub fn connections_accepted(&self) -> u64 {
        self.accepted.load(Ordering::SeqCst)
    }

    /// Stop accepting new connections. Connections already queued are
    /// still served, and established sessions drain on their own.
    pub fn shutdown(&self) {
        self.shutdown.store(true, Ordering::SeqCst);
        // wake the acceptor so it observes the flag; the connection itself
        // is thrown away
        let _ = TcpStream::connect_timeout(&self.local_addr, SHUTDOWN_WAKE_TIMEOUT);
    }
}
