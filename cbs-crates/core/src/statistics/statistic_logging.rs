//! Global configuration of where and how statistics are written.

use std::fmt::Debug;
use std::fmt::Display;
use std::fmt::Formatter;
use std::io::stdout;
use std::io::Write;
use std::sync::OnceLock;
use std::sync::RwLock;

use convert_case::Case;
use convert_case::Casing;

/// Statistics are written as `{prefix} {name}={value}` lines to `writer`, optionally followed by
/// a closing line once a block of statistics is complete.
pub struct StatisticOptions {
    prefix: &'static str,
    closing_line: Option<&'static str>,
    casing: Option<Case>,
    writer: Box<dyn Write + Send + Sync>,
}

impl StatisticOptions {
    fn write_statistic(&mut self, name: impl Display, value: impl Display) {
        let name = match self.casing {
            Some(casing) => name.to_string().to_case(casing),
            None => name.to_string(),
        };
        let _ = writeln!(self.writer, "{} {name}={value}", self.prefix);
    }

    fn write_closing_line(&mut self) {
        if let Some(closing_line) = self.closing_line {
            let _ = writeln!(self.writer, "{closing_line}");
        }
    }
}

impl Debug for StatisticOptions {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StatisticOptions")
            .field("prefix", &self.prefix)
            .field("closing_line", &self.closing_line)
            .field("casing", &self.casing)
            .field("writer", &"<Writer>")
            .finish()
    }
}

static STATISTIC_OPTIONS: OnceLock<RwLock<StatisticOptions>> = OnceLock::new();

/// Configures the logging of the statistics.
///
/// Only the first call has an effect. When no writer is provided the statistics go to stdout.
/// Until this function is called, [`log_statistic`] does nothing.
pub fn configure_statistic_logging(
    prefix: &'static str,
    closing_line: Option<&'static str>,
    casing: Option<Case>,
    writer: Option<Box<dyn Write + Send + Sync>>,
) {
    let _ = STATISTIC_OPTIONS.get_or_init(|| {
        RwLock::from(StatisticOptions {
            prefix,
            closing_line,
            casing,
            writer: writer.unwrap_or(Box::new(stdout())),
        })
    });
}

fn with_options(action: impl FnOnce(&mut StatisticOptions)) {
    if let Some(lock) = STATISTIC_OPTIONS.get() {
        if let Ok(mut options) = lock.write() {
            action(&mut options);
        }
    }
}

/// Logs the statistic `name` with `value` in the configured format.
pub fn log_statistic(name: impl Display, value: impl Display) {
    with_options(|options| options.write_statistic(name, value));
}

/// Logs the closing line of a block of statistics, if one is configured.
pub fn log_statistic_postfix() {
    with_options(StatisticOptions::write_closing_line);
}

/// Returns whether statistic logging has been configured.
pub fn should_log_statistics() -> bool {
    STATISTIC_OPTIONS.get().is_some()
}
