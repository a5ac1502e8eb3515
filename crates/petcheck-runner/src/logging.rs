//! Explicit logging handle
//!
//! A [`Logger`] owns its own `tracing` dispatcher; nothing is installed
//! process-wide. Code inside [`Logger::scope`] logs through the plain
//! `tracing` macros and lands in this handle's sink as
//! `timestamp - logger-name - level - message`.

use std::fmt;
use std::io;
use std::str::FromStr;
use std::sync::{Arc, Mutex};

use tracing::{Dispatch, Event, Level, Subscriber};
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::time::{FormatTime, SystemTime};
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields, MakeWriter};
use tracing_subscriber::registry::LookupSpan;

/// `2026-10-19T08:15:02.123456Z - petcheck_runner::fixture - INFO - created pet 124`
#[derive(Debug, Clone, Copy, Default)]
pub struct LineFormat;

impl<S, N> FormatEvent<S, N> for LineFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        SystemTime.format_time(&mut writer)?;
        let meta = event.metadata();
        write!(writer, " - {} - {} - ", meta.target(), meta.level())?;
        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

/// Logging handle passed down to every scenario
#[derive(Clone)]
pub struct Logger {
    dispatch: Dispatch,
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger").finish_non_exhaustive()
    }
}

impl Logger {
    /// Console logger writing to stderr.
    #[must_use]
    pub fn console(level: Level) -> Self {
        Self::with_writer(level, io::stderr)
    }

    /// Logger that drops everything.
    #[must_use]
    pub fn silent() -> Self {
        Self {
            dispatch: Dispatch::none(),
        }
    }

    pub fn with_writer<W>(level: Level, make_writer: W) -> Self
    where
        W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
    {
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(level)
            .with_ansi(false)
            .with_writer(make_writer)
            .event_format(LineFormat)
            .finish();
        Self {
            dispatch: Dispatch::new(subscriber),
        }
    }

    /// Logger writing into an in-memory buffer, for inspecting output.
    #[must_use]
    pub fn capture(level: Level) -> (Self, CaptureBuffer) {
        let buffer = CaptureBuffer::default();
        (Self::with_writer(level, buffer.clone()), buffer)
    }

    /// Run `f` with this logger as the current dispatcher.
    pub fn scope<R>(&self, f: impl FnOnce() -> R) -> R {
        tracing::dispatcher::with_default(&self.dispatch, f)
    }
}

/// Parse a level name, falling back to INFO for unknown values.
#[must_use]
pub fn parse_level(name: &str) -> Level {
    Level::from_str(name.trim()).unwrap_or(Level::INFO)
}

/// Shared in-memory sink
#[derive(Debug, Clone, Default)]
pub struct CaptureBuffer {
    buf: Arc<Mutex<Vec<u8>>>,
}

impl CaptureBuffer {
    #[must_use]
    pub fn contents(&self) -> String {
        self.buf
            .lock()
            .map(|b| String::from_utf8_lossy(&b).into_owned())
            .unwrap_or_default()
    }
}

impl io::Write for CaptureBuffer {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        self.buf
            .lock()
            .map_err(|e| io::Error::other(e.to_string()))?
            .extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for CaptureBuffer {
    type Writer = Self;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_format_has_four_parts() {
        let (logger, buffer) = Logger::capture(Level::INFO);
        logger.scope(|| tracing::info!("created pet 124"));

        let output = buffer.contents();
        let line = output.lines().next().unwrap();
        let parts: Vec<&str> = line.splitn(4, " - ").collect();
        assert_eq!(parts.len(), 4, "{line}");
        assert!(parts[0].contains('T'), "timestamp: {}", parts[0]);
        assert_eq!(parts[1], "petcheck_runner::logging::tests");
        assert_eq!(parts[2], "INFO");
        assert_eq!(parts[3], "created pet 124");
    }

    #[test]
    fn level_filter_applies() {
        let (logger, buffer) = Logger::capture(Level::WARN);
        logger.scope(|| {
            tracing::info!("hidden");
            tracing::warn!("teardown failed");
        });
        let output = buffer.contents();
        assert!(!output.contains("hidden"));
        assert!(output.contains(" - WARN - teardown failed"));
    }

    #[test]
    fn nothing_logged_outside_scope() {
        let (_logger, buffer) = Logger::capture(Level::TRACE);
        tracing::error!("not routed");
        assert!(buffer.contents().is_empty());
    }

    #[test]
    fn loggers_are_independent() {
        let (first, first_buf) = Logger::capture(Level::INFO);
        let (second, second_buf) = Logger::capture(Level::INFO);
        first.scope(|| tracing::info!("one"));
        second.scope(|| tracing::info!("two"));
        assert!(first_buf.contents().contains("one"));
        assert!(!first_buf.contents().contains("two"));
        assert!(second_buf.contents().contains("two"));
    }

    #[test]
    fn parse_level_names() {
        assert_eq!(parse_level("debug"), Level::DEBUG);
        assert_eq!(parse_level("WARN"), Level::WARN);
        assert_eq!(parse_level("bogus"), Level::INFO);
    }

    #[test]
    fn silent_logger_swallows() {
        Logger::silent().scope(|| tracing::error!("dropped"));
    }
}
