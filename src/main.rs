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

mod cli_args;
mod logger;

use crate::cli_args::CommandLineArguments;
use log::*;
use std::env;
use std::process::exit;
use std::sync::mpsc;
use yaler::relay::{Relay, RelayConfig};

const TAG: &str = "Main";

fn print_usage() {
    eprintln!("Usage: yaler [options] <target_addr>");
    eprintln!();
    eprintln!("Relay every connection accepted on the listen address to <target_addr>.");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  -l <addr>  listen address (default \"localhost:9090\")");
    eprintln!("  -w <n>     worker count (default 5)");
    eprintln!("  -t <ms>    dial timeout in milliseconds (default 1000)");
    eprintln!("  -c <file>  TOML configuration file");
    eprintln!("  -v         log relayed chunks (debug level)");
}

fn build_config(args: &CommandLineArguments) -> Result<RelayConfig, String> {
    let mut config = match args.conf_path() {
        Some(path) => RelayConfig::from_file(path)?,
        None => match args.target_addr() {
            Some(target_addr) => RelayConfig::new(target_addr),
            None => return Err(String::from("Target address is required")),
        },
    };
    // command line parameters override the configuration file
    if let Some(target_addr) = args.target_addr() {
        config.target_addr = target_addr.to_string();
    }
    if let Some(listen_addr) = args.listen_addr() {
        config.listen_addr = listen_addr.to_string();
    }
    if let Some(worker_count) = args.worker_count() {
        config.worker_count = worker_count;
    }
    if let Some(dial_timeout_ms) = args.dial_timeout_ms() {
        config.dial_timeout_ms = dial_timeout_ms;
    }
    Ok(config)
}

fn main() {
    let raw_args: Vec<String> = env::args().skip(1).collect();
    let args = match CommandLineArguments::parse(raw_args) {
        Ok(args) => args,
        Err(err) => {
            eprintln!("{}", err);
            print_usage();
            exit(2);
        }
    };

    let threshold = if args.verbose() {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    logger::init(threshold).unwrap();

    let config = match build_config(&args) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{}", err);
            print_usage();
            exit(2);
        }
    };

    let handle = match Relay::new(config).start() {
        Ok(handle) => handle,
        Err(err) => {
            eprintln!("error: {}", err);
            exit(1);
        }
    };
    info!(
        target: TAG,
        "Relaying {} -> {}",
        handle.local_addr(),
        handle.target_addr()
    );

    let (signal_tx, signal_rx) = mpsc::channel();
    ctrlc::set_handler(move || {
        let _ = signal_tx.send(());
    })
    .expect("Error setting Ctrl-C handler");

    signal_rx.recv().expect("Signal channel closed");
    info!(target: TAG, "Interrupted");
    handle.shutdown();
    info!(
        target: TAG,
        "{} connections accepted in total",
        handle.connections_accepted()
    );
}
