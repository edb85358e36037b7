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
use std::net::{Shutdown, TcpStream, ToSocketAddrs};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use super::error::{DialError, PairError};
use super::pump::{self, Direction};

const TAG: &str = "Tunnel";

/// Pair an accepted inbound connection with a new outbound connection to
/// the target, then relay until either direction terminates.
///
/// Blocks the calling worker until the first of the two pumps reports,
/// then shuts down both endpoints and returns; the second pump finishes
/// on its own. On dial failure the inbound connection is closed and the
/// error is returned to the caller.
pub fn establish(
    connection_id: u64,
    inbound: TcpStream,
    target_addr: &str,
    dial_timeout: Duration,
) -> Result<(), PairError> {
    let outbound = match dial(target_addr, dial_timeout) {
        Ok(stream) => stream,
        // inbound is dropped here, which closes it
        Err(err) => return Err(DialError::new(target_addr, err).into()),
    };
    debug!(
        target: TAG,
        "#{} connected to {}", connection_id, target_addr
    );

    // clone everything before spawning anything, so a failure leaves no
    // half-piped session behind
    let up_source = inbound.try_clone()?;
    let up_destination = outbound.try_clone()?;
    let down_source = outbound.try_clone()?;
    let down_destination = inbound.try_clone()?;

    let (done_tx, done_rx) = mpsc::channel();
    let up_done = done_tx.clone();
    thread::spawn(move || {
        pump::pump(
            connection_id,
            up_source,
            up_destination,
            Direction::ClientToTarget,
            up_done,
        )
    });
    thread::spawn(move || {
        pump::pump(
            connection_id,
            down_source,
            down_destination,
            Direction::TargetToClient,
            done_tx,
        )
    });

    match done_rx.recv() {
        Ok(Direction::ClientToTarget) => info!(
            target: TAG,
            "#{} client connection closed, closing target", connection_id
        ),
        Ok(Direction::TargetToClient) => info!(
            target: TAG,
            "#{} target connection closed, closing client", connection_id
        ),
        // both pumps hold a sender until they terminate
        Err(_) => warn!(target: TAG, "#{} pumps vanished silently", connection_id),
    }
    close(&inbound);
    close(&outbound);
    Ok(())
}

fn dial(target_addr: &str, timeout: Duration) -> io::Result<TcpStream> {
    let mut last_error = None;
    for addr in target_addr.to_socket_addrs()? {
        match TcpStream::connect_timeout(&addr, timeout) {
            Ok(stream) => return Ok(stream),
            Err(err) => last_error = Some(err),
        }
    }
    Err(last_error.unwrap_or_else(|| {
        io::Error::new(io::ErrorKind::InvalidInput, "target address did not resolve")
    }))
}

// shutting down an endpoint that the other pump already brought down is a
// no-op, not a failure
fn close(stream: &TcpStream) {
    let _ = stream.shutdown(Shutdown::Both);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Write};
    use std::net::TcpListener;

    fn connected_pair() -> (TcpStream, TcpStream) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let client = TcpStream::connect(addr).unwrap();
        let (accepted, _) = listener.accept().unwrap();
        (client, accepted)
    }

    fn unreachable_addr() -> String {
        // bind then drop, so the port is known to refuse connections
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        addr.to_string()
    }

    #[test]
    fn test_dial_failure_reported() {
        let (_client, inbound) = connected_pair();
        let target = unreachable_addr();

        let result = establish(1, inbound, &target, Duration::from_millis(200));
        match result {
            Err(PairError::Dial(_)) => (),
            other => panic!("expected dial error, got {:?}", other),
        }
    }

    #[test]
    fn test_dial_failure_closes_inbound() {
        let (mut client, inbound) = connected_pair();
        let target = unreachable_addr();

        establish(1, inbound, &target, Duration::from_millis(200)).unwrap_err();

        client
            .set_read_timeout(Some(Duration::from_secs(5)))
            .unwrap();
        let mut buf = [0u8; 16];
        // the relay end is gone, the client must observe end-of-stream
        assert_eq!(0, client.read(&mut buf).unwrap());
    }

    #[test]
    fn test_session_relays_and_terminates() {
        // single-connection echo target
        let target_listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let target_addr = target_listener.local_addr().unwrap().to_string();
        thread::spawn(move || {
            let (mut stream, _) = target_listener.accept().unwrap();
            let mut buf = [0u8; 4096];
            loop {
                match stream.read(&mut buf) {
                    Ok(0) | Err(_) => break,
                    Ok(n) => {
                        if stream.write_all(&buf[..n]).is_err() {
                            break;
                        }
                    }
                }
            }
        });

        let (client, inbound) = connected_pair();
        let client_thread = thread::spawn(move || {
            let mut client = client;
            client
                .set_read_timeout(Some(Duration::from_secs(5)))
                .unwrap();
            client.write_all(b"ping").unwrap();
            let mut buf = [0u8; 4];
            client.read_exact(&mut buf).unwrap();
            assert_eq!(b"ping", &buf);
            // half-close from the client ends the session
            client.shutdown(Shutdown::Write).unwrap();
        });

        establish(1, inbound, &target_addr, Duration::from_secs(1)).unwrap();
        client_thread.join().unwrap();
    }
}
