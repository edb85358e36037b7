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
use std::fmt;
use std::io::{self, Read, Write};
use std::sync::mpsc::Sender;

const TAG: &str = "Pump";

const BUFFER_SIZE: usize = 4096;

/// Which half of a connection pair a pump forwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    ClientToTarget,
    TargetToClient,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Direction::ClientToTarget => write!(f, "client to target"),
            Direction::TargetToClient => write!(f, "target to client"),
        }
    }
}

/// Forward bytes from `source` to `destination` until end-of-stream or
/// error, then report the direction on `done`.
///
/// The done signal is emitted on every terminal path, exactly once, so the
/// waiter on the other end can never block forever. The send result is
/// ignored: the receiver is dropped as soon as the first of the two pumps
/// of a pair reports.
pub fn pump<R: Read, W: Write>(
    connection_id: u64,
    mut source: R,
    mut destination: W,
    direction: Direction,
    done: Sender<Direction>,
) {
    match copy_stream(connection_id, &mut source, &mut destination, direction) {
        Ok(total) => debug!(
            target: TAG,
            "#{} {}: end of stream after {} bytes", connection_id, direction, total
        ),
        Err(err) => warn!(
            target: TAG,
            "#{} {}: stream error: {}", connection_id, direction, err
        ),
    }
    let _ = done.send(direction);
}

fn copy_stream<R: Read, W: Write>(
    connection_id: u64,
    source: &mut R,
    destination: &mut W,
    direction: Direction,
) -> io::Result<u64> {
    let mut buf = [0u8; BUFFER_SIZE];
    let mut total = 0u64;
    loop {
        let r = match source.read(&mut buf) {
            Ok(0) => return Ok(total),
            Ok(r) => r,
            Err(ref err) if err.kind() == io::ErrorKind::Interrupted => continue,
            Err(err) => return Err(err),
        };
        destination.write_all(&buf[..r])?;
        total += r as u64;
        debug!(
            target: TAG,
            "#{} {}: wrote {} bytes", connection_id, direction, r
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use std::sync::mpsc;

    struct FailingWriter;

    impl Write for FailingWriter {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "broken pipe"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    struct FailingReader {
        prefix: Cursor<Vec<u8>>,
    }

    impl Read for FailingReader {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            match self.prefix.read(buf) {
                Ok(0) => Err(io::Error::new(io::ErrorKind::ConnectionReset, "reset")),
                other => other,
            }
        }
    }

    #[test]
    fn test_copies_bytes_in_order() {
        let (tx, rx) = mpsc::channel();
        let source = Cursor::new(b"foo bar 1234567890\n".to_vec());
        let mut destination = Vec::new();

        pump(1, source, &mut destination, Direction::ClientToTarget, tx);

        assert_eq!(b"foo bar 1234567890\n".to_vec(), destination);
        assert_eq!(Direction::ClientToTarget, rx.recv().unwrap());
    }

    #[test]
    fn test_copies_more_than_one_buffer() {
        let (tx, rx) = mpsc::channel();
        let payload: Vec<u8> = (0..10 * BUFFER_SIZE).map(|i| (i % 251) as u8).collect();
        let source = Cursor::new(payload.clone());
        let mut destination = Vec::new();

        pump(1, source, &mut destination, Direction::TargetToClient, tx);

        assert_eq!(payload, destination);
        assert_eq!(Direction::TargetToClient, rx.recv().unwrap());
    }

    #[test]
    fn test_eof_signals_done_exactly_once() {
        let (tx, rx) = mpsc::channel();
        let source = Cursor::new(Vec::new());

        pump(1, source, Vec::new(), Direction::ClientToTarget, tx);

        assert!(rx.recv().is_ok());
        // the pump's sender is gone, no second signal may arrive
        assert!(rx.recv().is_err());
    }

    #[test]
    fn test_read_error_signals_done() {
        let (tx, rx) = mpsc::channel();
        let source = FailingReader {
            prefix: Cursor::new(b"partial".to_vec()),
        };
        let mut destination = Vec::new();

        pump(1, source, &mut destination, Direction::ClientToTarget, tx);

        assert_eq!(b"partial".to_vec(), destination);
        assert!(rx.recv().is_ok());
        assert!(rx.recv().is_err());
    }

    #[test]
    fn test_write_error_signals_done() {
        let (tx, rx) = mpsc::channel();
        let source = Cursor::new(b"doomed".to_vec());

        pump(1, source, FailingWriter, Direction::TargetToClient, tx);

        assert_eq!(Direction::TargetToClient, rx.recv().unwrap());
        assert!(rx.recv().is_err());
    }

    #[test]
    fn test_dropped_receiver_is_tolerated() {
        let (tx, rx) = mpsc::channel();
        drop(rx);
        let source = Cursor::new(b"late".to_vec());
        let mut destination = Vec::new();

        // must not panic even though nobody listens anymore
        pump(1, source, &mut destination, Direction::ClientToTarget, tx);

        assert_eq!(b"late".to_vec(), destination);
    }
}
