//! scriptwatch: gated script launching with supervised output
//!
//! Launches a user-selected PowerShell script behind a content gate and
//! supervises the resulting interpreter process, streaming its output
//! line-by-line to a sink that raises alerts on marker substrings.
//!
//! # Modules
//!
//! - **gate**: pre-execution screening (extension, size, keyword denylist)
//! - **supervisor**: interpreter sessions, lifecycle state, output capture
//! - **alert**: marker detection, notification, best-effort speech
//! - **errors**: crate-wide error type
//!
//! # Example
//!
//! ```ignore
//! use scriptwatch::{ScriptGate, Supervisor, SupervisorConfig, SessionEvent};
//!
//! let gate = ScriptGate::default();
//! let verdict = gate.evaluate("scan.ps1".as_ref());
//! if verdict.is_approved() {
//!     let mut supervisor = Supervisor::new(SupervisorConfig::default())?;
//!     for event in supervisor.start("scan.ps1".as_ref())? {
//!         match event {
//!             SessionEvent::Line(line) => println!("{}", line.text),
//!             SessionEvent::Exited { exit_code, .. } => {
//!                 println!("exited: {:?}", exit_code);
//!             }
//!         }
//!     }
//! }
//! ```

pub mod alert;
pub mod errors;
pub mod gate;
pub mod supervisor;

// Public API
pub use alert::{contains_alert_marker, AlertSink, Notifier, SpeechAlert};
pub use errors::{Result, WatchError};
pub use gate::{GateConfig, SafetyVerdict, ScriptCandidate, ScriptGate};
pub use supervisor::stream::{EventStream, OutputLine, SessionEvent, StreamOrigin};
pub use supervisor::{SessionState, Supervisor, SupervisorConfig};
