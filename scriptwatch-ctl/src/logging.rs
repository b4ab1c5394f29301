use console::style;
use env_logger::{Builder, Env};
use log::Level;
use std::io::Write;

/// Initialize logger based on verbose flag
pub fn init_logger(verbose: bool) {
    let env = Env::default().filter_or("RUST_LOG", if verbose { "debug" } else { "info" });

    Builder::from_env(env)
        .format(|buf, record| {
            let level = match record.level() {
                Level::Error => style("ERROR").red().bold().to_string(),
                Level::Warn => style("WARN ").yellow().bold().to_string(),
                Level::Info => style("INFO ").green().to_string(),
                Level::Debug => style("DEBUG").cyan().to_string(),
                Level::Trace => style("TRACE").dim().to_string(),
            };
            writeln!(buf, "{} {}", level, record.args())
        })
        .init();
}
