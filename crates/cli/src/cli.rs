// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Kibitz Contributors

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "kibitz")]
#[command(about = "Watch and play in shared game rooms over the kibitzd daemon")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// List rooms known to the daemon
    List {
        /// Daemon socket path (overrides config)
        #[arg(long)]
        socket: Option<PathBuf>,
    },
    /// Join a room and print its events until interrupted
    Watch {
        /// Room id to join (created if absent)
        room: String,
        /// Display name to announce in the room
        #[arg(long)]
        name: Option<String>,
        /// Daemon socket path (overrides config)
        #[arg(long)]
        socket: Option<PathBuf>,
        /// Poll interval in milliseconds (overrides config)
        #[arg(long)]
        interval_ms: Option<u64>,
    },
}
