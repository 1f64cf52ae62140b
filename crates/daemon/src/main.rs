// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Kibitz Contributors

//! kibitzd - The kibitz room daemon.
//!
//! Owns the flat-file room store at `~/.local/state/kibitz/` and
//! listens on a Unix socket for framed JSON requests from `kibitz`
//! clients.
//!
//! Usage:
//!   kibitzd [--state-dir <path>] [--socket <path>]

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use kibitzd::{start, ServerConfig};

/// Socket filename within the state directory.
const SOCKET_NAME: &str = "daemon.sock";
/// PID filename within the state directory.
const PID_NAME: &str = "daemon.pid";
/// Lock filename for single instance guarantee.
const LOCK_NAME: &str = "daemon.lock";
/// Room documents live in this subdirectory.
const ROOMS_DIR: &str = "rooms";

fn main() {
    let args: Vec<String> = std::env::args().collect();
    let state_dir = parse_flag(&args, "--state-dir")
        .map(PathBuf::from)
        .unwrap_or_else(default_state_dir);
    if let Err(e) = fs::create_dir_all(&state_dir) {
        eprintln!("failed to create state dir {}: {}", state_dir.display(), e);
        std::process::exit(1);
    }

    let log_path = state_dir.join("daemon.log");
    setup_logging(&log_path);

    tracing::info!("kibitzd starting, state_dir={}", state_dir.display());

    // Acquire file lock for single instance
    let lock_path = state_dir.join(LOCK_NAME);
    let lock_file = match acquire_lock(&lock_path) {
        Ok(f) => f,
        Err(e) => {
            tracing::error!("failed to acquire lock: {}", e);
            std::process::exit(1);
        }
    };

    // Write PID file
    let pid_path = state_dir.join(PID_NAME);
    if let Err(e) = write_pid_file(&pid_path) {
        tracing::error!("failed to write PID file: {}", e);
        std::process::exit(1);
    }

    let socket_path = parse_flag(&args, "--socket")
        .map(PathBuf::from)
        .unwrap_or_else(|| state_dir.join(SOCKET_NAME));

    let handle = match start(ServerConfig {
        socket_path,
        rooms_dir: state_dir.join(ROOMS_DIR),
    }) {
        Ok(h) => h,
        Err(e) => {
            tracing::error!("failed to start server: {}", e);
            let _ = fs::remove_file(&pid_path);
            std::process::exit(1);
        }
    };

    // Signal readiness to parent process
    println!("READY");
    // Flush stdout so parent sees READY immediately
    let _ = std::io::stdout().flush();

    handle.wait();

    let _ = fs::remove_file(&pid_path);
    drop(lock_file);
    tracing::info!("kibitzd stopped");
}

fn parse_flag(args: &[String], flag: &str) -> Option<String> {
    args.iter()
        .position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .cloned()
}

fn default_state_dir() -> PathBuf {
    if let Some(dir) = dirs::state_dir() {
        return dir.join("kibitz");
    }
    dirs::home_dir()
        .map(|h| h.join(".local/state/kibitz"))
        .unwrap_or_else(|| PathBuf::from(".local/state/kibitz"))
}

fn setup_logging(log_path: &Path) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    // Try to open log file, fall back to stderr
    if let Ok(file) = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_path)
    {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(file)
            .with_ansi(false)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }
}

fn acquire_lock(lock_path: &Path) -> std::io::Result<fs::File> {
    use fs2::FileExt;

    let file = fs::OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(lock_path)?;
    file.try_lock_exclusive()
        .map_err(|_| std::io::Error::other("another daemon instance is already running"))?;
    Ok(file)
}

fn write_pid_file(pid_path: &Path) -> std::io::Result<()> {
    fs::write(pid_path, format!("{}", std::process::id()))
}
