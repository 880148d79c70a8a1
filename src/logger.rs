//! Terminal logging.
//!
//! All output here goes to stderr; stdout belongs to route JSON, generated
//! code and hot update messages.
//!
//! ```ignore
//! log!("routes"; "synthesized {} records", count);
//! debug!("meta"; "loaded {} entries", n);
//! ```
//!
//! Watch mode additionally keeps one [`WatchStatus`] block that each pass
//! overwrites in place.

use crossterm::{
    cursor, execute,
    terminal::{Clear, ClearType},
};
use owo_colors::OwoColorize;
use parking_lot::Mutex;
use std::{
    io::{Write, stderr},
    sync::LazyLock,
    sync::atomic::{AtomicBool, Ordering},
    time::SystemTime,
};

static VERBOSE: AtomicBool = AtomicBool::new(false);

pub fn set_verbose(v: bool) {
    VERBOSE.store(v, Ordering::Relaxed);
}

pub fn is_verbose() -> bool {
    VERBOSE.load(Ordering::Relaxed)
}

// ============================================================================
// Macros
// ============================================================================

/// `log!("module"; "format {}", args)`
#[macro_export]
macro_rules! log {
    ($module:expr; $($arg:tt)*) => {{
        $crate::logger::log($module, &format!($($arg)*))
    }};
}

/// Like [`log!`], only when verbose.
#[macro_export]
macro_rules! debug {
    ($module:expr; $($arg:tt)*) => {{
        if $crate::logger::is_verbose() {
            $crate::logger::log($module, &format!($($arg)*))
        }
    }};
}

/// Run a block only when verbose, for debug output that is costly to build.
#[macro_export]
macro_rules! debug_do {
    ($($body:tt)*) => {{
        if $crate::logger::is_verbose() {
            $($body)*
        }
    }};
}

// ============================================================================
// Prefixed lines
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tone {
    Hmr,
    Watch,
    Error,
    Warn,
    Other,
}

impl Tone {
    fn of(module: &str) -> Self {
        match module.to_ascii_lowercase().as_str() {
            "hmr" => Self::Hmr,
            "watch" => Self::Watch,
            "error" => Self::Error,
            "warn" => Self::Warn,
            _ => Self::Other,
        }
    }

    fn paint(self, prefix: &str) -> String {
        match self {
            Self::Hmr => prefix.bright_blue().bold().to_string(),
            Self::Watch => prefix.bright_green().bold().to_string(),
            Self::Error => prefix.bright_red().bold().to_string(),
            Self::Warn => prefix.bright_magenta().bold().to_string(),
            Self::Other => prefix.bright_yellow().bold().to_string(),
        }
    }
}

/// Write `[module] message` to stderr.
pub fn log(module: &str, message: &str) {
    let prefix = Tone::of(module).paint(&format!("[{module}]"));

    let mut err = stderr().lock();
    execute!(err, Clear(ClearType::UntilNewLine)).ok();
    writeln!(err, "{prefix} {message}").ok();
    err.flush().ok();

    // the status block is no longer the last thing on screen
    if let Some(mut status) = WATCH_STATUS.try_lock() {
        status.last_lines = 0;
    }
}

// ============================================================================
// Watch status
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StatusKind {
    Success,
    Warning,
    Error,
}

impl StatusKind {
    fn symbol(self) -> String {
        match self {
            Self::Success => "✓".green().to_string(),
            Self::Warning => "⚠".yellow().to_string(),
            Self::Error => "✗".red().to_string(),
        }
    }
}

/// Single status block for watch mode, rewritten after every pass.
pub struct WatchStatus {
    /// Lines the previous block occupied.
    last_lines: usize,
}

static WATCH_STATUS: LazyLock<Mutex<WatchStatus>> =
    LazyLock::new(|| Mutex::new(WatchStatus::new()));

impl WatchStatus {
    pub const fn new() -> Self {
        Self { last_lines: 0 }
    }

    pub fn success(&mut self, message: &str) {
        self.show(StatusKind::Success, message);
    }

    pub fn warning(&mut self, message: &str) {
        self.show(StatusKind::Warning, message);
    }

    /// `detail` goes on the following lines; empty means none.
    pub fn error(&mut self, summary: &str, detail: &str) {
        self.show(StatusKind::Error, &join_detail(summary, detail));
    }

    fn show(&mut self, kind: StatusKind, message: &str) {
        let mut err = stderr().lock();

        if self.last_lines > 0 {
            let lines = u16::try_from(self.last_lines).unwrap_or(u16::MAX);
            execute!(err, cursor::MoveUp(lines), Clear(ClearType::FromCursorDown)).ok();
        }

        let stamp = format!("[{}]", clock(unix_secs())).dimmed().to_string();
        writeln!(err, "{stamp} {} {message}", kind.symbol()).ok();
        err.flush().ok();

        self.last_lines = line_count(message);
    }
}

pub fn status_success(message: &str) {
    WATCH_STATUS.lock().success(message);
}

pub fn status_warning(message: &str) {
    WATCH_STATUS.lock().warning(message);
}

pub fn status_error(summary: &str, detail: &str) {
    WATCH_STATUS.lock().error(summary, detail);
}

fn join_detail(summary: &str, detail: &str) -> String {
    if detail.is_empty() {
        summary.to_string()
    } else {
        format!("{summary}\n{detail}")
    }
}

fn line_count(message: &str) -> usize {
    message.lines().count().max(1)
}

fn unix_secs() -> u64 {
    SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// `HH:MM:SS` in UTC.
fn clock(secs: u64) -> String {
    let day = secs % 86400;
    format!("{:02}:{:02}:{:02}", day / 3600, (day / 60) % 60, day % 60)
}
