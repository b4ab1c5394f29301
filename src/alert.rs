//! Alert detection on delivered output lines
//!
//! The sink inspects every line the supervisor delivers and, on a marker
//! match, fires the registered notifier plus a best-effort speech
//! announcement. This is a side effect of output content only; it has no
//! influence on the process lifecycle.

use std::process::{Command, Stdio};
use std::thread;

use log::debug;

use crate::supervisor::stream::OutputLine;

/// Marker substrings that flag a line as an alert, matched case-sensitively
pub const ALERT_MARKERS: &[&str] = &["Alert", "🚨"];

/// Phrase handed to the speech command when an alert fires
pub const ALERT_PHRASE: &str = "Network speed alert detected";

#[cfg(target_os = "macos")]
const SPEECH_COMMAND: &str = "say";
#[cfg(not(target_os = "macos"))]
const SPEECH_COMMAND: &str = "spd-say";

/// True when a line contains one of the fixed alert markers
pub fn contains_alert_marker(text: &str) -> bool {
    ALERT_MARKERS.iter().any(|marker| text.contains(marker))
}

/// Name of the platform speech command, for requirement checks
pub fn speech_command() -> &'static str {
    SPEECH_COMMAND
}

/// User-visible notification target for alert lines
pub trait Notifier {
    fn notify(&mut self, line: &OutputLine);
}

/// Best-effort speech announcement. Every failure is swallowed: a missing
/// speech command must never disturb the session.
pub struct SpeechAlert {
    phrase: String,
}

impl SpeechAlert {
    pub fn new() -> Self {
        Self {
            phrase: ALERT_PHRASE.to_string(),
        }
    }

    pub fn with_phrase(phrase: &str) -> Self {
        Self {
            phrase: phrase.to_string(),
        }
    }

    /// Speak the phrase. The spawned child is reaped on a detached thread
    /// so a slow speech daemon cannot block the control thread.
    pub fn announce(&self) {
        let spawned = Command::new(SPEECH_COMMAND)
            .arg(&self.phrase)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn();
        match spawned {
            Ok(mut child) => {
                thread::spawn(move || {
                    let _ = child.wait();
                });
            }
            Err(err) => debug!("speech announcement unavailable: {}", err),
        }
    }
}

impl Default for SpeechAlert {
    fn default() -> Self {
        Self::new()
    }
}

/// Feeds delivered lines through the marker check and fires the alert path
pub struct AlertSink<N: Notifier> {
    notifier: N,
    speech: Option<SpeechAlert>,
}

impl<N: Notifier> AlertSink<N> {
    pub fn new(notifier: N, speech: Option<SpeechAlert>) -> Self {
        Self { notifier, speech }
    }

    /// Inspect one delivered line; returns true when the alert path fired
    pub fn observe(&mut self, line: &OutputLine) -> bool {
        if !contains_alert_marker(&line.text) {
            return false;
        }
        self.notifier.notify(line);
        if let Some(speech) = &self.speech {
            speech.announce();
        }
        true
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }
}
