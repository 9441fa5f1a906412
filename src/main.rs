// Copyright (c) 2024-2025 Jesse Morgan / Morgan Forge
// SPDX-License-Identifier: AGPL-3.0-or-later

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::time::Duration;
use tracing::Level;

use wos::{ClientConfig, WosClient, WosError, XmlElement};

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Exit codes following sysexits.h conventions
mod exit_codes {
    /// Success - operation completed successfully
    pub const SUCCESS: i32 = 0;
    /// General error - unspecified error
    pub const ERROR: i32 = 1;
    /// Usage error - e.g. searching without a session
    pub const USAGE: i32 = 64;
    /// Data error - malformed response or rejected query
    pub const DATA_ERR: i32 = 65;
    /// Service unavailable - Web of Science unreachable
    pub const SERVICE_UNAVAILABLE: i32 = 69;
    /// Permission denied - authentication refused
    pub const NO_PERM: i32 = 77;
}

use exit_codes::*;

/// wos - query the Web of Science from the command line.
#[derive(Parser)]
#[command(name = "wos")]
#[command(version = VERSION)]
#[command(about = "Query the Web of Science web services.")]
#[command(long_about = "wos - Web of Science session client\n\n\
    Search:              wos search \"TS=cancer\" --count 10\n\
    Keep the session:    wos connect  (prints the SID)\n\
    Reuse it:            wos --sid <SID> --keep-session search \"AU=Smith\"\n\
    Close it:            wos --sid <SID> close\n\n\
    Premium credentials are read from WOS_USER / WOS_PASSWORD, a session id from WOS_SID.")]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Premium username (overrides WOS_USER)
    #[arg(long, global = true)]
    user: Option<String>,

    /// Premium password (overrides WOS_PASSWORD)
    #[arg(long, global = true)]
    password: Option<String>,

    /// Reuse an existing session id (overrides WOS_SID)
    #[arg(long, global = true)]
    sid: Option<String>,

    /// Leave the session open when the command finishes
    #[arg(long, global = true)]
    keep_session: bool,

    /// Web of Science host
    #[arg(long, global = true, value_name = "URL")]
    base_url: Option<String>,

    /// Request timeout in seconds
    #[arg(long, global = true, value_name = "SECS")]
    timeout: Option<u64>,

    /// Quiet mode: only errors on stderr
    #[arg(short = 'q', long, global = true)]
    quiet: bool,

    /// Verbose mode: log every SOAP exchange
    #[arg(short = 'v', long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a query
    ///
    /// Examples:
    ///   wos search "TS=cancer"
    ///   wos search "AU=Einstein AND PY=1905" --count 20 --json
    Search {
        /// Query in Web of Science syntax
        query: String,
        /// Number of records to retrieve
        #[arg(short, long, default_value_t = wos::types::DEFAULT_COUNT)]
        count: u32,
        /// Print the response as JSON
        #[arg(long)]
        json: bool,
    },

    /// Authenticate and print the session id, leaving the session open
    Connect,

    /// Close the session given with --sid or WOS_SID
    Close,
}

fn init_logging(cli: &Cli) {
    let level = if cli.verbose {
        Level::DEBUG
    } else if cli.quiet {
        Level::ERROR
    } else {
        Level::INFO
    };

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn build_config(cli: &Cli) -> ClientConfig {
    let mut config = ClientConfig::from_env();

    if let Some(user) = &cli.user {
        config.user = Some(user.clone());
    }
    if let Some(password) = &cli.password {
        config.password = Some(password.clone());
    }
    if let Some(sid) = &cli.sid {
        config.sid = Some(sid.clone());
    }
    if let Some(url) = &cli.base_url {
        config = config.with_base_url(url.as_str());
    }
    if let Some(secs) = cli.timeout {
        config = config.with_timeout(Duration::from_secs(secs));
    }

    config.with_close_on_exit(!cli.keep_session)
}

fn print_response(response: &XmlElement, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(response)?);
    } else {
        print!("{}", response.to_indented_string());
    }
    Ok(())
}

fn run(cli: &Cli) -> Result<()> {
    let config = build_config(cli);

    match &cli.command {
        Commands::Search { query, count, json } => {
            let mut client = WosClient::with_config(config)?;
            client.with_session(|wos| {
                let response = wos.search(query, *count)?;
                print_response(&response, *json)?;
                if !wos.close_on_exit() {
                    if let Some(sid) = wos.session_id() {
                        eprintln!("{} Session kept open: {}", "[i]".cyan(), sid);
                    }
                }
                Ok(())
            })
        }
        Commands::Connect => {
            let mut client = WosClient::with_config(config.with_close_on_exit(false))?;
            client.connect()?;
            if let Some(sid) = client.session_id() {
                println!("{}", sid);
            }
            Ok(())
        }
        Commands::Close => {
            if config.sid.is_none() {
                return Err(anyhow::anyhow!(WosError::SessionNotOpen));
            }
            let mut client = WosClient::with_config(config.with_close_on_exit(false))?;
            client.resume_and_close()?;
            if !cli.quiet {
                eprintln!("{} Session closed", "[OK]".green());
            }
            Ok(())
        }
    }
}

fn exit_code_for(err: &anyhow::Error) -> i32 {
    match err.downcast_ref::<WosError>() {
        Some(WosError::SessionNotOpen) | Some(WosError::InvalidCount(_)) => USAGE,
        Some(WosError::EmptySession) => NO_PERM,
        Some(WosError::Fault { .. }) | Some(WosError::Xml(_)) | Some(WosError::UnknownOperation(_)) => {
            DATA_ERR
        }
        Some(WosError::Descriptor(_))
        | Some(WosError::Http { .. })
        | Some(WosError::Network(_))
        | Some(WosError::Timeout(_)) => SERVICE_UNAVAILABLE,
        None => ERROR,
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(&cli);

    let code = match run(&cli) {
        Ok(()) => SUCCESS,
        Err(err) => {
            let message = match err.downcast_ref::<WosError>() {
                Some(wos_err) => wos_err.guidance().build(),
                None => wos::format_simple_error(&format!("{:#}", err)),
            };
            eprintln!("{}", message.red());
            exit_code_for(&err)
        }
    };

    std::process::exit(code);
}
