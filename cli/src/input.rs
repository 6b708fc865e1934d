//! Line input from stdin, read off the consumer thread.

use std::io::{self, BufRead};
use std::thread;

use tokio::sync::mpsc;

const INPUT_CHANNEL_CAPACITY: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    FetchText,
    FetchImage,
    Help,
    Quit,
}

impl Command {
    pub fn parse(line: &str) -> Option<Self> {
        match line.trim().to_ascii_lowercase().as_str() {
            "text" | "t" => Some(Self::FetchText),
            "image" | "i" => Some(Self::FetchImage),
            "help" | "h" | "?" => Some(Self::Help),
            "quit" | "q" | "exit" => Some(Self::Quit),
            _ => None,
        }
    }
}

pub enum InputMsg {
    Line(String),
    Error(String),
}

/// Forwards stdin lines over a bounded channel.
///
/// The reader runs on a detached thread: a blocking `read_line` cannot be
/// interrupted, and a runtime blocking task would hold up shutdown.
pub struct StdinPump {
    rx: mpsc::Receiver<InputMsg>,
}

impl StdinPump {
    pub fn new() -> io::Result<Self> {
        let (tx, rx) = mpsc::channel(INPUT_CHANNEL_CAPACITY);
        thread::Builder::new()
            .name("stdin-pump".to_string())
            .spawn(move || input_loop(&tx))?;
        Ok(Self { rx })
    }

    /// `None` once stdin is closed.
    pub async fn recv(&mut self) -> Option<InputMsg> {
        self.rx.recv().await
    }
}

impl Drop for StdinPump {
    fn drop(&mut self) {
        self.rx.close();
    }
}

fn input_loop(tx: &mpsc::Sender<InputMsg>) {
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        let msg = match lines.next() {
            Some(Ok(line)) => InputMsg::Line(line),
            Some(Err(e)) => InputMsg::Error(e.to_string()),
            None => break,
        };
        let failed = matches!(msg, InputMsg::Error(_));
        if tx.blocking_send(msg).is_err() || failed {
            break;
        }
    }
    tracing::debug!("stdin pump stopped");
}
