//! Integration tests for scriptwatch
//!
//! These tests drive the gate and supervisor together the way the console
//! host does: evaluate first, spawn only on approval, drain the event
//! channel on the calling thread.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use scriptwatch::{
    AlertSink, Notifier, OutputLine, SafetyVerdict, ScriptGate, SessionEvent, SessionState,
    StreamOrigin, Supervisor, SupervisorConfig,
};
use tempfile::tempdir;

static INTEGRATION_TEST_LOCK: Mutex<()> = Mutex::new(());

fn sh_config() -> SupervisorConfig {
    SupervisorConfig {
        interpreter: PathBuf::from("/bin/sh"),
        interpreter_args: Vec::new(),
        failure_log: None,
    }
}

fn write_script(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).unwrap();
    path
}

#[derive(Default)]
struct CountingNotifier {
    fired: Vec<OutputLine>,
}

impl Notifier for CountingNotifier {
    fn notify(&mut self, line: &OutputLine) {
        self.fired.push(line.clone());
    }
}

/// A rejected candidate never reaches the spawn step.
#[test]
fn rejected_script_is_never_spawned() {
    let _lock = INTEGRATION_TEST_LOCK.lock();
    let tmp = tempdir().unwrap();

    let mut contents = String::new();
    for i in 0..9 {
        contents.push_str(&format!("echo 'sample {}'\n", i));
    }
    contents.push_str("$client.DownloadFile($url, $out)\n");
    let script = write_script(tmp.path(), "scan.ps1", &contents);

    let verdict = ScriptGate::default().evaluate(&script);
    assert_eq!(
        verdict,
        SafetyVerdict::RejectedKeyword {
            keyword: "DownloadFile".to_string()
        }
    );

    let mut supervisor = Supervisor::new(sh_config()).unwrap();
    if verdict.is_approved() {
        let _ = supervisor.start(&script);
    }
    assert_eq!(supervisor.state(), SessionState::NotStarted);
}

/// Approved script whose output contains an alert marker: the sink fires
/// exactly once, for the matching stdout line.
#[test]
fn approved_alert_line_fires_sink_once() {
    let _lock = INTEGRATION_TEST_LOCK.lock();
    let tmp = tempdir().unwrap();
    let script = write_script(
        tmp.path(),
        "scan.ps1",
        "echo 'ping 12ms'\necho 'Alert: link saturated'\necho 'ping 14ms'\n",
    );

    let verdict = ScriptGate::default().evaluate(&script);
    assert!(verdict.is_approved());

    let mut supervisor = Supervisor::new(sh_config()).unwrap();
    let events = supervisor.start(&script).unwrap();

    let mut sink = AlertSink::new(CountingNotifier::default(), None);
    let mut delivered = 0;
    for event in events {
        match event {
            SessionEvent::Line(line) => {
                delivered += 1;
                sink.observe(&line);
            }
            SessionEvent::Exited { exit_code, .. } => {
                assert_eq!(exit_code, Some(0));
            }
        }
    }

    assert_eq!(delivered, 3);
    assert_eq!(
        sink.notifier().fired,
        vec![OutputLine {
            origin: StreamOrigin::Stdout,
            text: "Alert: link saturated".to_string()
        }]
    );
    assert_eq!(supervisor.state(), SessionState::Exited);
}

/// Stop confirms termination, and a later start is an independent session.
#[test]
fn stop_then_restart_runs_independent_sessions() {
    let _lock = INTEGRATION_TEST_LOCK.lock();
    let tmp = tempdir().unwrap();
    let long = write_script(tmp.path(), "long.ps1", "exec sleep 30\n");
    let quick = write_script(tmp.path(), "quick.ps1", "echo 'second session'\n");

    assert!(ScriptGate::default().evaluate(&long).is_approved());
    assert!(ScriptGate::default().evaluate(&quick).is_approved());

    let mut supervisor = Supervisor::new(sh_config()).unwrap();
    let first = supervisor.start(&long).unwrap();
    assert!(supervisor.is_running());

    supervisor.stop().unwrap();
    assert_eq!(supervisor.state(), SessionState::Stopped);
    let first_events: Vec<_> = first.into_iter().collect();
    assert!(matches!(
        first_events.last(),
        Some(SessionEvent::Exited {
            exit_code: None,
            signal: Some(9)
        })
    ));

    let second = supervisor.start(&quick).unwrap();
    let second_events: Vec<_> = second.into_iter().collect();
    assert!(second_events.contains(&SessionEvent::Line(OutputLine {
        origin: StreamOrigin::Stdout,
        text: "second session".to_string()
    })));
    assert_eq!(supervisor.state(), SessionState::Exited);
}

/// Stderr output is delivered with its origin preserved and does not
/// trigger the alert path unless it carries a marker.
#[test]
fn stderr_lines_keep_origin_and_skip_alerts() {
    let _lock = INTEGRATION_TEST_LOCK.lock();
    let tmp = tempdir().unwrap();
    let script = write_script(
        tmp.path(),
        "noisy.ps1",
        "echo 'probe timeout' 1>&2\necho 'ping 18ms'\n",
    );

    let mut supervisor = Supervisor::new(sh_config()).unwrap();
    let events = supervisor.start(&script).unwrap();

    let mut sink = AlertSink::new(CountingNotifier::default(), None);
    let mut stderr_lines = Vec::new();
    for event in events {
        if let SessionEvent::Line(line) = event {
            sink.observe(&line);
            if line.origin == StreamOrigin::Stderr {
                stderr_lines.push(line.text);
            }
        }
    }

    assert_eq!(stderr_lines, vec!["probe timeout".to_string()]);
    assert!(sink.notifier().fired.is_empty());
}
