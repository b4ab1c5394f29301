use std::path::PathBuf;
use std::sync::atomic::{AtomicI32, Ordering};

use console::style;
use log::{debug, info};
use nix::sys::signal::{sigaction, SaFlags, SigAction, SigHandler, SigSet, Signal};

use scriptwatch::{
    contains_alert_marker, AlertSink, GateConfig, Notifier, OutputLine, ScriptGate, SessionEvent,
    SpeechAlert, StreamOrigin, Supervisor, SupervisorConfig,
};

/// Configuration for a gated run
pub struct RunConfig {
    pub script: PathBuf,
    pub interpreter: Option<PathBuf>,
    pub max_size: Option<u64>,
    pub failure_log: Option<PathBuf>,
    pub no_speech: bool,
}

/// Child pid for the interrupt handler; 0 when no session is live.
static CHILD_PID: AtomicI32 = AtomicI32::new(0);

extern "C" fn handle_interrupt(_signal: libc::c_int) {
    // Only async-signal-safe calls are allowed here: raw kill plus _exit.
    let pid = CHILD_PID.load(Ordering::SeqCst);
    if pid > 0 {
        unsafe { libc::kill(pid, libc::SIGKILL) };
    }
    unsafe { libc::_exit(130) }
}

/// Ctrl-C must not orphan the interpreter: kill it, then leave with the
/// conventional interrupted-exit status.
fn install_interrupt_handler() {
    let action = SigAction::new(
        SigHandler::Handler(handle_interrupt),
        SaFlags::empty(),
        SigSet::empty(),
    );
    if let Err(err) = unsafe { sigaction(Signal::SIGINT, &action) } {
        debug!("could not install SIGINT handler: {}", err);
    }
}

/// Alert banner on the console, with a terminal bell
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&mut self, line: &OutputLine) {
        println!(
            "{} {}\x07",
            style("[ALERT]").yellow().bold(),
            style(&line.text).yellow().bold()
        );
    }
}

fn render_line(line: &OutputLine) {
    match line.origin {
        StreamOrigin::Stderr => {
            println!("{}", style(format!("[error] {}", line.text)).red());
        }
        StreamOrigin::Stdout if contains_alert_marker(&line.text) => {
            println!("{}", style(&line.text).yellow());
        }
        StreamOrigin::Stdout => {
            println!("{}", style(&line.text).green());
        }
    }
}

fn print_status(state: impl std::fmt::Display) {
    println!("{} status: {}", style("[info]").dim(), state);
}

pub fn run_watch(config: RunConfig) -> Result<(), Box<dyn std::error::Error>> {
    let mut gate_config = GateConfig::default();
    if let Some(max_size) = config.max_size {
        gate_config.max_bytes = max_size;
    }
    let gate = ScriptGate::new(gate_config);

    info!("Evaluating {}", config.script.display());
    let verdict = gate.evaluate(&config.script);
    if !verdict.is_approved() {
        return Err(verdict.reason().into());
    }
    println!(
        "{} script approved: {}",
        style("[info]").dim(),
        config.script.display()
    );

    let mut supervisor_config = SupervisorConfig::default();
    if let Some(interpreter) = config.interpreter {
        supervisor_config.interpreter = interpreter;
    }
    supervisor_config.failure_log = config.failure_log;

    let mut supervisor = Supervisor::new(supervisor_config)?;
    install_interrupt_handler();

    let events = supervisor.start(&config.script)?;
    if let Some(pid) = supervisor.pid() {
        CHILD_PID.store(pid, Ordering::SeqCst);
        info!("Interpreter started (pid {})", pid);
    }
    print_status(supervisor.state());

    let speech = if config.no_speech {
        None
    } else {
        Some(SpeechAlert::new())
    };
    let mut sink = AlertSink::new(ConsoleNotifier, speech);

    let mut exit_code = 0;
    for event in events {
        match event {
            SessionEvent::Line(line) => {
                render_line(&line);
                sink.observe(&line);
            }
            SessionEvent::Exited {
                exit_code: code,
                signal,
            } => {
                CHILD_PID.store(0, Ordering::SeqCst);
                match (code, signal) {
                    (Some(code), _) => {
                        println!(
                            "{} interpreter exited with code {}",
                            style("[info]").dim(),
                            if code == 0 {
                                style(code).green().bold()
                            } else {
                                style(code).red().bold()
                            }
                        );
                        exit_code = code;
                    }
                    (None, Some(signal)) => {
                        println!(
                            "{} interpreter killed by signal {}",
                            style("[info]").dim(),
                            style(signal).red().bold()
                        );
                        exit_code = 128 + signal;
                    }
                    (None, None) => {
                        println!("{} interpreter exit status unknown", style("[info]").dim());
                        exit_code = 1;
                    }
                }
            }
        }
    }
    print_status(supervisor.state());

    std::process::exit(exit_code);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stderr_lines_render_without_panicking() {
        render_line(&OutputLine {
            origin: StreamOrigin::Stderr,
            text: "probe failed".to_string(),
        });
    }

    #[test]
    fn console_notifier_accepts_alert_lines() {
        let mut notifier = ConsoleNotifier;
        notifier.notify(&OutputLine {
            origin: StreamOrigin::Stdout,
            text: "Alert: link saturated".to_string(),
        });
    }
}
