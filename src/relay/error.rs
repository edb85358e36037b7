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

use std::error;
use std::fmt;
use std::io;

/// The listening socket could not be created.
#[derive(Debug)]
pub struct BindError {
    addr: String,
    error: io::Error,
}

/// The outbound connection to the target could not be established.
#[derive(Debug)]
pub struct DialError {
    addr: String,
    error: io::Error,
}

/// Any failure while pairing an inbound connection with an outbound one.
#[derive(Debug)]
pub enum PairError {
    Dial(DialError),
    Io(io::Error),
}

impl BindError {
    pub fn new<S: Into<String>>(addr: S, error: io::Error) -> Self {
        Self {
            addr: addr.into(),
            error,
        }
    }
}

impl fmt::Display for BindError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Cannot bind on {}: {}", self.addr, self.error)
    }
}

impl error::Error for BindError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        Some(&self.error)
    }
}

impl DialError {
    pub fn new<S: Into<String>>(addr: S, error: io::Error) -> Self {
        Self {
            addr: addr.into(),
            error,
        }
    }
}

impl fmt::Display for DialError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Cannot open connection to {}: {}", self.addr, self.error)
    }
}

impl error::Error for DialError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        Some(&self.error)
    }
}

impl fmt::Display for PairError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            PairError::Dial(ref err) => write!(f, "{}", err),
            PairError::Io(ref err) => write!(f, "IO error: {}", err),
        }
    }
}

impl error::Error for PairError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match *self {
            PairError::Dial(ref err) => Some(err),
            PairError::Io(ref err) => Some(err),
        }
    }
}

impl From<DialError> for PairError {
    fn from(error: DialError) -> Self {
        PairError::Dial(error)
    }
}

impl From<io::Error> for PairError {
    fn from(error: io::Error) -> Self {
        PairError::Io(error)
    }
}
