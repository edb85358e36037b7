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

pub struct CommandLineArguments {
    target_addr: Option<String>,
    listen_addr: Option<String>,
    worker_count: Option<usize>,
    dial_timeout_ms: Option<u64>,
    conf_path: Option<String>,
    verbose: bool,
}

impl CommandLineArguments {
    // simple String as errors is sufficient, we never need to inspect them
    pub fn parse<S: Into<String>>(args: Vec<S>) -> Result<Self, String> {
        let mut target_addr = None;
        let mut listen_addr = None;
        let mut worker_count = None;
        let mut dial_timeout_ms = None;
        let mut conf_path = None;
        let mut verbose = false;

        let mut iter = args.into_iter();
        while let Some(arg) = iter.next() {
            let arg = arg.into();
            if "-l" == arg {
                if listen_addr.is_some() {
                    return Err(String::from("Listen address already set"));
                }
                if let Some(value) = iter.next() {
                    listen_addr = Some(value.into());
                } else {
                    return Err(String::from("Missing -l parameter"));
                }
            } else if "-w" == arg {
                if worker_count.is_some() {
                    return Err(String::from("Worker count already set"));
                }
                if let Some(value) = iter.next() {
                    let value: String = value.into();
                    let count: usize = value
                        .parse()
                        .map_err(|_| format!("Invalid worker count: \"{}\"", value))?;
                    if count == 0 {
                        return Err(String::from("Invalid worker count: 0"));
                    }
                    worker_count = Some(count);
                } else {
                    return Err(String::from("Missing -w parameter"));
                }
            } else if "-t" == arg {
                if dial_timeout_ms.is_some() {
                    return Err(String::from("Dial timeout already set"));
                }
                if let Some(value) = iter.next() {
                    let value: String = value.into();
                    let timeout: u64 = value
                        .parse()
                        .map_err(|_| format!("Invalid dial timeout: \"{}\"", value))?;
                    if timeout == 0 {
                        return Err(String::from("Invalid dial timeout: 0"));
                    }
                    dial_timeout_ms = Some(timeout);
                } else {
                    return Err(String::from("Missing -t parameter"));
                }
            } else if "-c" == arg {
                if conf_path.is_some() {
                    return Err(String::from("Configuration file already set"));
                }
                if let Some(value) = iter.next() {
                    conf_path = Some(value.into());
                } else {
                    return Err(String::from("Missing -c parameter"));
                }
            } else if "-v" == arg {
                if verbose {
                    return Err(String::from("Verbose already set"));
                }
                verbose = true;
            } else if target_addr.is_none() && !arg.starts_with('-') {
                target_addr = Some(arg);
            } else {
                return Err(format!("Unexpected argument: \"{}\"", arg));
            }
        }
        Ok(Self {
            target_addr,
            listen_addr,
            worker_count,
            dial_timeout_ms,
            conf_path,
            verbose,
        })
    }

    pub fn target_addr(&self) -> Option<&str> {
        self.target_addr.as_deref()
    }

    pub fn listen_addr(&self) -> Option<&str> {
        self.listen_addr.as_deref()
    }

    pub fn worker_count(&self) -> Option<usize> {
        self.worker_count
    }

    pub fn dial_timeout_ms(&self) -> Option<u64> {
        self.dial_timeout_ms
    }

    pub fn conf_path(&self) -> Option<&str> {
        self.conf_path.as_deref()
    }

    pub fn verbose(&self) -> bool {
        self.verbose
    }
}
