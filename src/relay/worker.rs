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
use std::net::TcpStream;
use std::sync::mpsc::Receiver;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use super::tunnel;

const TAG: &str = "Worker";

pub struct WorkerPool;

impl WorkerPool {
    /// Start `count` workers consuming the shared connection queue.
    ///
    /// Each worker pairs one connection at a time, so the pool bounds the
    /// number of concurrent dials; established sessions relay on their own
    /// pump threads and are not limited by the pool.
    pub fn spawn(
        count: usize,
        queue: Receiver<(u64, TcpStream)>,
        target_addr: String,
        dial_timeout: Duration,
    ) {
        let queue = Arc::new(Mutex::new(queue));
        for worker_id in 0..count {
            let queue = queue.clone();
            let target_addr = target_addr.clone();
            thread::spawn(move || Self::run(worker_id, &queue, &target_addr, dial_timeout));
        }
    }

    fn run(
        worker_id: usize,
        queue: &Mutex<Receiver<(u64, TcpStream)>>,
        target_addr: &str,
        dial_timeout: Duration,
    ) {
        loop {
            // take the next connection, then release the queue before the
            // (possibly long) pairing
            let received = match queue.lock() {
                Ok(guard) => guard.recv(),
                // a sibling worker panicked while holding the queue
                Err(_) => break,
            };
            match received {
                Ok((connection_id, stream)) => {
                    if let Err(err) =
                        tunnel::establish(connection_id, stream, target_addr, dial_timeout)
                    {
                        error!(target: TAG, "Connection #{}: {}", connection_id, err);
                    }
                }
                // queue closed and drained
                Err(_) => break,
            }
        }
        debug!(target: TAG, "Worker {} stopped", worker_id);
    }
}
