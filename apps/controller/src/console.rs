//! Line-oriented operator console standing in for the button panel.

use std::io::BufRead;

use client_core::ChannelStatus;
use shared::{domain::CommandState, protocol::Intent};
use tokio::sync::{mpsc, watch};

pub const HELP: &str = "commands: forward | reverse | left | right | release | stop | \
speed <0-100> | lights [on|off|toggle] | horn [on|off|toggle] | status | help | quit";

#[derive(Clone)]
pub struct ConsoleView {
    snapshots: watch::Receiver<CommandState>,
    status: watch::Receiver<ChannelStatus>,
}

impl ConsoleView {
    pub fn new(
        snapshots: watch::Receiver<CommandState>,
        status: watch::Receiver<ChannelStatus>,
    ) -> Self {
        Self { snapshots, status }
    }

    pub fn render(&self) -> String {
        render(&self.snapshots.borrow(), *self.status.borrow())
    }

    /// Prints a status line whenever the snapshot or link status changes.
    pub async fn print_updates(mut self) {
        let mut snapshots_live = true;
        let mut status_live = true;
        while snapshots_live || status_live {
            tokio::select! {
                changed = self.snapshots.changed(), if snapshots_live => {
                    if changed.is_err() {
                        snapshots_live = false;
                        continue;
                    }
                }
                changed = self.status.changed(), if status_live => {
                    if changed.is_err() {
                        status_live = false;
                        continue;
                    }
                }
            }
            self.snapshots.mark_unchanged();
            self.status.mark_unchanged();
            println!("{}", self.render());
        }
    }
}

pub fn render(state: &CommandState, status: ChannelStatus) -> String {
    format!(
        "direction={} speed={}% lights={} horn={} battery={}% link={:?}",
        state.direction(),
        state.speed(),
        on_off(state.headlights_on()),
        on_off(state.horn_on()),
        state.battery(),
        status,
    )
}

fn on_off(on: bool) -> &'static str {
    if on {
        "on"
    } else {
        "off"
    }
}

/// Reads stdin on a dedicated thread so a pending read never holds up
/// runtime shutdown.
pub fn spawn_line_reader() -> mpsc::Receiver<String> {
    let (tx, rx) = mpsc::channel(64);
    std::thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else {
                break;
            };
            if tx.blocking_send(line).is_err() {
                break;
            }
        }
    });
    rx
}

/// Turns console lines into intents until `quit` or end of input. Dropping
/// `intents` on return ends the session.
pub async fn forward_intents(
    mut lines: mpsc::Receiver<String>,
    intents: mpsc::Sender<Intent>,
    view: ConsoleView,
) {
    while let Some(line) = lines.recv().await {
        let line = line.trim();
        match line.to_ascii_lowercase().as_str() {
            "" => continue,
            "quit" | "exit" | "q" => break,
            "status" => {
                println!("{}", view.render());
                continue;
            }
            "help" | "?" => {
                println!("{HELP}");
                continue;
            }
            _ => {}
        }

        match line.parse::<Intent>() {
            Ok(intent) => {
                if intents.send(intent).await.is_err() {
                    break;
                }
            }
            Err(err) => println!("{err}; type 'help' for commands"),
        }
    }
}

#[cfg(test)]
#[path = "tests/console_tests.rs"]
mod tests;
