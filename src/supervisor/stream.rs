//! Session event stream between capture threads and the control thread
//!
//! Each supervised session owns one channel. The two capture threads and the
//! wait thread are the only senders; the control thread is the single
//! consumer. Lines within one stream arrive in write order; no ordering is
//! guaranteed across stdout vs stderr.

use std::io::{BufRead, BufReader, Read};
use std::sync::mpsc::{channel, Receiver, Sender, TryRecvError};
use std::thread;

/// Which child stream a line came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamOrigin {
    Stdout,
    Stderr,
}

/// One full line of child output, tagged with its origin
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputLine {
    pub origin: StreamOrigin,
    pub text: String,
}

/// A message from the session to the control thread
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    Line(OutputLine),
    /// Final event of a session. `exit_code` is `None` when the child was
    /// killed by a signal; `signal` carries the signal number in that case.
    Exited {
        exit_code: Option<i32>,
        signal: Option<i32>,
    },
}

/// Consumer half of a session channel
pub struct EventStream {
    receiver: Receiver<SessionEvent>,
}

impl EventStream {
    /// Create a sender/consumer pair for a fresh session
    pub fn new() -> (EventSender, Self) {
        let (tx, rx) = channel();
        (EventSender { tx }, EventStream { receiver: rx })
    }

    /// Block until the next event; `None` once the session is finished and
    /// fully drained.
    pub fn recv(&self) -> Option<SessionEvent> {
        self.receiver.recv().ok()
    }

    /// Non-blocking poll for the next event
    pub fn try_recv(&self) -> Option<SessionEvent> {
        match self.receiver.try_recv() {
            Ok(event) => Some(event),
            Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => None,
        }
    }
}

pub struct EventIter {
    receiver: Receiver<SessionEvent>,
}

impl Iterator for EventIter {
    type Item = SessionEvent;

    fn next(&mut self) -> Option<Self::Item> {
        self.receiver.recv().ok()
    }
}

impl IntoIterator for EventStream {
    type Item = SessionEvent;
    type IntoIter = EventIter;

    fn into_iter(self) -> Self::IntoIter {
        EventIter {
            receiver: self.receiver,
        }
    }
}

/// Producer half of a session channel
#[derive(Clone)]
pub struct EventSender {
    tx: Sender<SessionEvent>,
}

impl EventSender {
    /// Send one output line; returns false once the consumer is gone
    pub fn send_line(&self, origin: StreamOrigin, text: String) -> bool {
        self.tx
            .send(SessionEvent::Line(OutputLine { origin, text }))
            .is_ok()
    }

    /// Send the final exit event
    pub fn send_exit(&self, exit_code: Option<i32>, signal: Option<i32>) -> bool {
        self.tx
            .send(SessionEvent::Exited { exit_code, signal })
            .is_ok()
    }
}

/// Spawn a capture thread that forwards full lines from `stream` until EOF.
/// A consumer hang-up stops the thread early; undecodable lines are skipped.
pub fn spawn_line_reader<R>(
    stream: R,
    origin: StreamOrigin,
    sender: EventSender,
) -> thread::JoinHandle<()>
where
    R: Read + Send + 'static,
{
    thread::spawn(move || {
        let reader = BufReader::new(stream);
        for line in reader.lines() {
            match line {
                Ok(text) => {
                    if !sender.send_line(origin, text) {
                        break;
                    }
                }
                Err(_) => continue,
            }
        }
    })
}
