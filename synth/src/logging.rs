//! Logging severity switches and subscriber installation.
//!
//! Generated command lines carry one `--<level>` switch per configured
//! severity. The first configured severity whose switch is present selects
//! the verbosity, which is installed once before the callable runs.
//!
//! Subscribers installed here write through [`Gated`], so log output is
//! dropped while a [`LogSilence`] guard is alive on the current thread.

use std::cell::Cell;
use std::fmt;
use std::io;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::level_filters::LevelFilter;
use tracing::{Level, debug};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::fmt::writer::EitherWriter;

thread_local! {
    static SILENCED: Cell<bool> = const { Cell::new(false) };
}

/// Severity names recognized on generated command lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Critical,
    Error,
    Warning,
    Info,
    Debug,
}

impl LogLevel {
    /// Default priority order, most severe first.
    pub const ALL: [LogLevel; 5] = [
        LogLevel::Critical,
        LogLevel::Error,
        LogLevel::Warning,
        LogLevel::Info,
        LogLevel::Debug,
    ];

    /// Switch name, e.g. `warning` for `--warning`.
    pub fn name(self) -> &'static str {
        match self {
            Self::Critical => "critical",
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Info => "info",
            Self::Debug => "debug",
        }
    }

    /// Maximum `tracing` verbosity for this severity. `tracing` has no level
    /// above `ERROR`, so `critical` shares it.
    pub fn level_filter(self) -> LevelFilter {
        match self {
            Self::Critical | Self::Error => LevelFilter::ERROR,
            Self::Warning => LevelFilter::WARN,
            Self::Info => LevelFilter::INFO,
            Self::Debug => LevelFilter::DEBUG,
        }
    }

    pub fn level(self) -> Level {
        match self {
            Self::Critical | Self::Error => Level::ERROR,
            Self::Warning => Level::WARN,
            Self::Info => Level::INFO,
            Self::Debug => Level::DEBUG,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "critical" | "fatal" => Ok(Self::Critical),
            "error" => Ok(Self::Error),
            "warning" | "warn" => Ok(Self::Warning),
            "info" => Ok(Self::Info),
            "debug" => Ok(Self::Debug),
            other => Err(format!("unknown log level: {other}")),
        }
    }
}

/// Picks the first level in `order` whose switch was set.
///
/// # Examples
///
/// ```
/// use programmify_synth::logging::{LogLevel, select_level};
///
/// let set = [LogLevel::Debug, LogLevel::Warning];
/// let picked = select_level(&LogLevel::ALL, |level| set.contains(&level));
/// assert_eq!(picked, Some(LogLevel::Warning));
/// ```
pub fn select_level(order: &[LogLevel], is_set: impl Fn(LogLevel) -> bool) -> Option<LogLevel> {
    order.iter().copied().find(|level| is_set(*level))
}

/// Drops log output written through [`Gated`] on this thread until dropped.
#[must_use = "log output is restored as soon as the guard is dropped"]
pub struct LogSilence {
    previous: bool,
}

/// Silences [`Gated`] writers on the current thread.
pub fn silence() -> LogSilence {
    LogSilence {
        previous: SILENCED.with(|s| s.replace(true)),
    }
}

/// Whether [`Gated`] writers currently drop output on this thread.
pub fn is_silenced() -> bool {
    SILENCED.with(Cell::get)
}

impl Drop for LogSilence {
    fn drop(&mut self) {
        SILENCED.with(|s| s.set(self.previous));
    }
}

/// Writer factory that hands out a sink while logs are silenced.
///
/// # Examples
///
/// ```
/// use programmify_synth::logging::{self, Gated};
/// use programmify_synth::streams::SharedBuffer;
///
/// let buf = SharedBuffer::default();
/// let sink = buf.clone();
/// let subscriber = tracing_subscriber::fmt()
///     .with_writer(Gated::new(move || sink.clone()))
///     .finish();
///
/// tracing::subscriber::with_default(subscriber, || {
///     let _quiet = logging::silence();
///     tracing::info!("dropped");
/// });
/// assert_eq!(buf.contents(), "");
/// ```
#[derive(Debug, Clone)]
pub struct Gated<M> {
    inner: M,
}

impl<M> Gated<M> {
    pub fn new(inner: M) -> Self {
        Self { inner }
    }
}

impl<'a, M> MakeWriter<'a> for Gated<M>
where
    M: MakeWriter<'a>,
{
    type Writer = EitherWriter<M::Writer, io::Sink>;

    fn make_writer(&'a self) -> Self::Writer {
        if is_silenced() {
            EitherWriter::B(io::sink())
        } else {
            EitherWriter::A(self.inner.make_writer())
        }
    }
}

/// Installs a stderr `fmt` subscriber capped at `level`.
///
/// A subscriber that is already installed is left in place.
pub fn install(level: LogLevel) {
    let result = tracing_subscriber::fmt()
        .with_max_level(level.level_filter())
        .with_writer(Gated::new(io::stderr))
        .try_init();
    if let Err(err) = result {
        debug!(level = %level, error = %err, "Subscriber already installed");
    }
}

/// Installs a stderr subscriber filtered by `RUST_LOG`, defaulting to
/// `default_directive` (e.g. `"warn"`).
pub fn init_from_env(default_directive: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Gated::new(io::stderr))
        .try_init();
}
