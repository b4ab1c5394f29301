//! Process supervisor: interpreter sessions with line-streamed output
//!
//! Spawns the configured interpreter against an approved script, captures
//! stdout and stderr line-by-line on dedicated threads, and reports
//! lifecycle transitions over the session's event channel. At most one
//! session may be Running at a time; stopping is a hard kill with no
//! graceful-shutdown negotiation.

use std::fmt;
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::os::unix::process::ExitStatusExt;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread;

use log::warn;
use nix::sys::signal::{kill, Signal};
use nix::unistd::Pid;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

use crate::errors::{Result, WatchError};

pub mod stream;


use stream::{EventSender, EventStream, StreamOrigin};

/// Default interpreter executable
pub const DEFAULT_INTERPRETER: &str = "pwsh";

/// Fixed flags passed before the script path. `-ExecutionPolicy Bypass`
/// sidesteps the default execution-policy restriction so unsigned local
/// scripts run at all.
pub const DEFAULT_INTERPRETER_ARGS: &[&str] =
    &["-NoProfile", "-ExecutionPolicy", "Bypass", "-File"];

/// Supervisor configuration
#[derive(Debug, Clone)]
pub struct SupervisorConfig {
    /// Interpreter executable, resolved through PATH if not absolute
    pub interpreter: PathBuf,
    /// Flags inserted between the interpreter and the script path
    pub interpreter_args: Vec<String>,
    /// Optional append-only log receiving one line per spawn failure
    pub failure_log: Option<PathBuf>,
}

impl Default for SupervisorConfig {
    fn default() -> Self {
        Self {
            interpreter: PathBuf::from(DEFAULT_INTERPRETER),
            interpreter_args: DEFAULT_INTERPRETER_ARGS
                .iter()
                .map(|a| a.to_string())
                .collect(),
            failure_log: None,
        }
    }
}

impl SupervisorConfig {
    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.interpreter.as_os_str().is_empty() {
            return Err(WatchError::InvalidConfig(
                "interpreter cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Lifecycle state of the current session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    NotStarted,
    Running,
    Stopped,
    Exited,
    Failed,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SessionState::NotStarted => "idle",
            SessionState::Running => "running",
            SessionState::Stopped => "stopped",
            SessionState::Exited => "exited",
            SessionState::Failed => "failed",
        };
        f.write_str(label)
    }
}

/// State of one spawn attempt. Shared with that session's wait thread; a
/// fresh session gets a fresh cell, so a stale wait thread can never touch
/// a successor's state.
struct Session {
    state: Arc<Mutex<SessionState>>,
    pid: Option<Pid>,
}

fn lock_state(state: &Mutex<SessionState>) -> MutexGuard<'_, SessionState> {
    state.lock().unwrap_or_else(|poison| poison.into_inner())
}

/// Supervises at most one interpreter session at a time
pub struct Supervisor {
    config: SupervisorConfig,
    session: Option<Session>,
}

impl Supervisor {
    /// Create a supervisor with a validated configuration
    pub fn new(config: SupervisorConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            session: None,
        })
    }

    pub fn config(&self) -> &SupervisorConfig {
        &self.config
    }

    /// State of the current session, `NotStarted` before the first spawn
    pub fn state(&self) -> SessionState {
        match &self.session {
            Some(session) => *lock_state(&session.state),
            None => SessionState::NotStarted,
        }
    }

    pub fn is_running(&self) -> bool {
        self.state() == SessionState::Running
    }

    /// Pid of the child while the session is Running
    pub fn pid(&self) -> Option<i32> {
        let session = self.session.as_ref()?;
        let state = lock_state(&session.state);
        if *state == SessionState::Running {
            session.pid.map(Pid::as_raw)
        } else {
            None
        }
    }

    /// Start a fresh session for `script`. Fails with `AlreadyRunning` if a
    /// session is active; on spawn failure the session is recorded as
    /// Failed and the failure log (if configured) receives one line.
    pub fn start(&mut self, script: &Path) -> Result<EventStream> {
        if self.is_running() {
            return Err(WatchError::AlreadyRunning);
        }

        let mut command = Command::new(&self.config.interpreter);
        command
            .args(&self.config.interpreter_args)
            .arg(script)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        let mut child = match command.spawn() {
            Ok(child) => child,
            Err(err) => {
                self.log_spawn_failure(&err);
                self.session = Some(Session {
                    state: Arc::new(Mutex::new(SessionState::Failed)),
                    pid: None,
                });
                return Err(WatchError::Spawn(err));
            }
        };

        let (Some(stdout), Some(stderr)) = (child.stdout.take(), child.stderr.take()) else {
            let _ = child.kill();
            let _ = child.wait();
            return Err(WatchError::Spawn(io::Error::other(
                "child output pipes unavailable",
            )));
        };

        let pid = Pid::from_raw(child.id() as i32);
        let (sender, events) = EventStream::new();
        let stdout_reader = stream::spawn_line_reader(stdout, StreamOrigin::Stdout, sender.clone());
        let stderr_reader = stream::spawn_line_reader(stderr, StreamOrigin::Stderr, sender.clone());

        let state = Arc::new(Mutex::new(SessionState::Running));
        spawn_wait_thread(
            child,
            Arc::clone(&state),
            sender,
            stdout_reader,
            stderr_reader,
        );

        self.session = Some(Session {
            state,
            pid: Some(pid),
        });
        Ok(events)
    }

    /// Hard-kill the running session. Fails with `NotRunning` when no
    /// session is active, and with `Stop` when the signal cannot be
    /// delivered (e.g. the child exited between the check and the kill).
    pub fn stop(&mut self) -> Result<()> {
        let session = self.session.as_ref().ok_or(WatchError::NotRunning)?;
        let mut state = lock_state(&session.state);
        if *state != SessionState::Running {
            return Err(WatchError::NotRunning);
        }
        let Some(pid) = session.pid else {
            return Err(WatchError::NotRunning);
        };
        kill(pid, Signal::SIGKILL)
            .map_err(|err| WatchError::Stop(format!("could not kill pid {}: {}", pid, err)))?;
        *state = SessionState::Stopped;
        Ok(())
    }

    fn log_spawn_failure(&self, err: &io::Error) {
        let Some(path) = &self.config.failure_log else {
            return;
        };
        let timestamp = OffsetDateTime::now_utc()
            .format(&Rfc3339)
            .unwrap_or_else(|_| "unknown-time".to_string());
        let line = format!("{} spawn failure: {}\n", timestamp, err);
        let appended = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .and_then(|mut file| file.write_all(line.as_bytes()));
        if let Err(write_err) = appended {
            warn!(
                "could not append to failure log {}: {}",
                path.display(),
                write_err
            );
        }
    }
}

impl Drop for Supervisor {
    fn drop(&mut self) {
        // A running child must not outlive its supervisor.
        if self.is_running() {
            let _ = self.stop();
        }
    }
}

/// Reap the child, drain the capture threads, then publish the exit.
/// Joining the readers first makes `Exited` the final event on the channel.
fn spawn_wait_thread(
    mut child: std::process::Child,
    state: Arc<Mutex<SessionState>>,
    sender: EventSender,
    stdout_reader: thread::JoinHandle<()>,
    stderr_reader: thread::JoinHandle<()>,
) {
    thread::spawn(move || {
        let status = child.wait();
        let _ = stdout_reader.join();
        let _ = stderr_reader.join();

        let (exit_code, signal) = match &status {
            Ok(status) => (status.code(), status.signal()),
            Err(err) => {
                warn!("failed to wait for child: {}", err);
                (None, None)
            }
        };

        {
            let mut state = lock_state(&state);
            // stop() may have won the race; Stopped stays Stopped.
            if *state == SessionState::Running {
                *state = SessionState::Exited;
            }
        }

        sender.send_exit(exit_code, signal);
    });
}
