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
use std::io;
use std::net::{TcpListener, TcpStream};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::mpsc::Sender;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

const TAG: &str = "Acceptor";

// do not spin on persistent accept failures (fd exhaustion and friends)
const ACCEPT_RETRY_DELAY: Duration = Duration::from_millis(100);

pub struct Acceptor {
    listener: TcpListener,
    queue: Sender<(u64, TcpStream)>,
    accepted: Arc<AtomicU64>,
    shutdown: Arc<AtomicBool>,
}

impl Acceptor {
    pub fn new(
        listener: TcpListener,
        queue: Sender<(u64, TcpStream)>,
        accepted: Arc<AtomicU64>,
        shutdown: Arc<AtomicBool>,
    ) -> Self {
        Self {
            listener,
            queue,
            accepted,
            shutdown,
        }
    }

    /// Accept connections until shutdown, handing each one to the worker
    /// queue. The accepted-connection counter increments once per
    /// connection handed over, whatever happens to it afterwards.
    pub fn run(self) {
        let mut next_id = 1u64;
        loop {
            if self.shutdown.load(Ordering::SeqCst) {
                info!(target: TAG, "Shutdown requested, no longer accepting");
                break;
            }
            match self.listener.accept() {
                Ok((stream, peer_addr)) => {
                    if self.shutdown.load(Ordering::SeqCst) {
                        // the shutdown wake-up connection, or a late client
                        info!(target: TAG, "Shutdown requested, no longer accepting");
                        break;
                    }
                    let connection_id = next_id;
                    next_id += 1;
                    if self.queue.send((connection_id, stream)).is_err() {
                        error!(target: TAG, "Connection queue is closed, stopping");
                        break;
                    }
                    self.accepted.fetch_add(1, Ordering::SeqCst);
                    info!(
                        target: TAG,
                        "Connection #{} accepted from {}", connection_id, peer_addr
                    );
                }
                Err(ref err)
                    if err.kind() == io::ErrorKind::Interrupted
                        || err.kind() == io::ErrorKind::ConnectionAborted =>
                {
                    continue
                }
                Err(err) => {
                    // the listener is owned by this loop and still valid
                    error!(target: TAG, "Cannot accept connection: {}", err);
                    thread::sleep(ACCEPT_RETRY_DELAY);
                }
            }
        }
        // dropping the listener and the queue sender lets the workers
        // drain what is left and stop
    }
}
