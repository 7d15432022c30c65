use anyhow::anyhow;
use log::{Level, LevelFilter, Log, Metadata, Record};

/// Forwards `log` records to the browser console, prefixed with their target
/// (`api-client`, `ledger-view`, `session`, ...).
pub struct ConsoleLogger;

static LOGGER: ConsoleLogger = ConsoleLogger;

impl ConsoleLogger {
    /// Install the console logger. Fails if another logger is already set.
    pub fn init(level: LevelFilter) -> anyhow::Result<()> {
        log::set_logger(&LOGGER).map_err(|e| anyhow!("Failed to install console logger: {}", e))?;
        log::set_max_level(level);
        Ok(())
    }
}

fn format_line(record: &Record) -> String {
    format!("[{}] {}", record.target(), record.args())
}

impl Log for ConsoleLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let line = format_line(record);
        match record.level() {
            Level::Error => gloo::console::error!(line),
            Level::Warn => gloo::console::warn!(line),
            Level::Info => gloo::console::info!(line),
            Level::Debug | Level::Trace => gloo::console::debug!(line),
        }
    }

    fn flush(&self) {}
}
