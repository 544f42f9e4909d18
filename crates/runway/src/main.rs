// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use clap::error::ErrorKind;
use clap::Parser;

use runway::config::Config;
use runway::error::SimError;

#[tokio::main]
async fn main() {
    let config = match Config::try_parse() {
        Ok(config) => config,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            print!("{e}");
            std::process::exit(0);
        }
        Err(_) => {
            // CLI contract: exactly one input-file argument, EINVAL otherwise.
            let usage = SimError::BadInvocation;
            println!("{usage}");
            std::process::exit(usage.exit_code());
        }
    };

    if let Err(e) = config.validate() {
        eprintln!("error: {e}");
        std::process::exit(SimError::BadInvocation.exit_code());
    }

    if let Err(e) = runway::run::run(config).await {
        println!("{e}");
        let code = e.downcast_ref::<SimError>().map(SimError::exit_code).unwrap_or(1);
        std::process::exit(code);
    }
}
