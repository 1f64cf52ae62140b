// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Kibitz Contributors

//! Command entry points for the `kibitz` binary.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use crate::cli::Command;
use crate::client::RoomClient;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::ident;
use crate::sync::{RoomEvent, SyncClient, SyncConfig, UnixTransport};

pub fn run(command: Command) -> Result<()> {
    match command {
        Command::List { socket } => list(socket),
        Command::Watch {
            room,
            name,
            socket,
            interval_ms,
        } => watch(room, name, socket, interval_ms),
    }
}

fn list(socket: Option<PathBuf>) -> Result<()> {
    let config = Config::load()?;
    let client = RoomClient::new(socket.unwrap_or_else(|| config.socket_path()));
    let rooms = client.list()?;
    if rooms.is_empty() {
        println!("no rooms");
        return Ok(());
    }
    for room in rooms {
        println!(
            "{:<24} rev {:<6} {:<8} updated {}",
            room.id,
            room.rev,
            if room.has_fen { "in-game" } else { "fresh" },
            room.updated_at.format("%Y-%m-%d %H:%M:%S"),
        );
    }
    Ok(())
}

fn watch(
    room: String,
    name: Option<String>,
    socket: Option<PathBuf>,
    interval_ms: Option<u64>,
) -> Result<()> {
    let config = Config::load()?;
    let socket = socket.unwrap_or_else(|| config.socket_path());
    let poll_interval = interval_ms
        .map(Duration::from_millis)
        .unwrap_or_else(|| config.poll_interval());

    let (tx, rx) = mpsc::channel();
    let printer = thread::spawn(move || {
        for event in rx {
            print_event(&event);
        }
    });

    let transport = UnixTransport::new(socket);
    let mut client = SyncClient::new(transport, room, ident::generate_client_id(), tx)
        .with_config(SyncConfig { poll_interval });

    client.create().map_err(|e| Error::Daemon(e.to_string()))?;
    if let Some(name) = name.or(config.name) {
        client.set_name(name).map_err(|e| Error::Daemon(e.to_string()))?;
    }

    // Ctrl-C sets the flag; run returns and the drop below sends the
    // detached leave.
    let stop = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&stop);
    ctrlc::set_handler(move || flag.store(true, Ordering::SeqCst))
        .map_err(|e| Error::Io(std::io::Error::other(e)))?;
    client.run(&stop);

    drop(client);
    let _ = printer.join();
    Ok(())
}

fn print_event(event: &RoomEvent) {
    match event {
        RoomEvent::Assigned { side } => println!("joined as {}", side),
        RoomEvent::State { fen } => println!("position {}", fen),
        RoomEvent::Move { from, to, fen } => match fen {
            Some(fen) => println!("move {} {} ({})", from, to, fen),
            None => println!("move {} {}", from, to),
        },
        RoomEvent::Chat { by, text } => {
            println!("chat [{}] {}", by.as_deref().unwrap_or("?"), text)
        }
        RoomEvent::Gift { by, gift } => {
            println!("gift [{}] {}", by.as_deref().unwrap_or("?"), gift)
        }
        RoomEvent::Names(names) => {
            for (id, name) in names {
                println!("name {} = {}", id, name);
            }
        }
        RoomEvent::Players(seats) => println!(
            "players w={} b={}",
            seats.w.as_deref().unwrap_or("-"),
            seats.b.as_deref().unwrap_or("-"),
        ),
        RoomEvent::Offer { kind, by } => {
            println!("offer {} from {}", kind, by.as_deref().unwrap_or("?"))
        }
        RoomEvent::OfferCleared => println!("offer cleared"),
        RoomEvent::Result(result) => println!("result {}", result),
        RoomEvent::Score(score) => println!("score {}-{}", score.w, score.b),
    }
}
