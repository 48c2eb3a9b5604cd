//! Terminal Logging Module
//!
//! Provides:
//! - Structured logging (tracing) to a daily-rolling JSON file and to stderr
//! - Diagnostic error reporting (miette)
//! - Spinners for slow model calls (indicatif)
//! - Terminal styling with colors and emoji (console)
//! - Automatic terminal capability detection

use std::fs;
use std::io;
use std::path::PathBuf;
use std::sync::OnceLock;
use std::time::Duration;

use console::{style, Term};
use flate2::write::GzEncoder;
use flate2::Compression;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use supports_color::Stream;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

const LOG_FILE_PREFIX: &str = "writeright.log";

static TERMINAL_CAPS: OnceLock<TerminalCapabilities> = OnceLock::new();

fn get_terminal_caps() -> &'static TerminalCapabilities {
    TERMINAL_CAPS.get_or_init(TerminalCapabilities::detect)
}

// ============================================================================
// Terminal Capability Detection
// ============================================================================

/// Terminal color support levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorLevel {
    /// 24-bit TrueColor (16.7M colors)
    TrueColor,
    /// 256-color palette
    Ansi256,
    /// 16 ANSI colors
    Ansi16,
    /// No color support
    NoColor,
}

/// Detected terminal capabilities
#[derive(Debug, Clone)]
pub struct TerminalCapabilities {
    pub color_level: ColorLevel,
    pub supports_unicode: bool,
    pub is_interactive: bool,
    pub width: u16,
}

impl TerminalCapabilities {
    /// Detect terminal capabilities from environment
    pub fn detect() -> Self {
        use is_terminal::IsTerminal;

        let color_level = match supports_color::on(Stream::Stdout) {
            Some(support) if support.has_16m => ColorLevel::TrueColor,
            Some(support) if support.has_256 => ColorLevel::Ansi256,
            Some(support) if support.has_basic => ColorLevel::Ansi16,
            _ => ColorLevel::NoColor,
        };

        let is_interactive = io::stdout().is_terminal();
        let width = Term::stdout().size().1;

        // Unicode support heuristic
        let supports_unicode = std::env::var("TERM")
            .map(|t| !t.contains("dumb"))
            .unwrap_or(true)
            && std::env::var("LANG")
                .map(|l| l.contains("UTF-8") || l.contains("utf8"))
                .unwrap_or(true);

        Self {
            color_level,
            supports_unicode,
            is_interactive,
            width,
        }
    }

    /// Check if colors should be used
    pub fn should_colorize(&self) -> bool {
        self.is_interactive && self.color_level != ColorLevel::NoColor
    }
}

/// Capabilities of the current terminal, detected once.
pub fn terminal_caps() -> &'static TerminalCapabilities {
    get_terminal_caps()
}

// ============================================================================
// Logging Initialization
// ============================================================================

/// Directory holding the rolling log files.
pub fn log_dir() -> PathBuf {
    dirs::data_dir()
        .map(|d| d.join("writeright").join("logs"))
        .unwrap_or_else(|| PathBuf::from("logs"))
}

/// Initialize the logging system.
///
/// This sets up:
/// 1. A file logger (JSON formatted, daily rolling) in the app data directory.
/// 2. A stderr logger (compact) so stdout stays clean for results.
/// 3. Redirects standard `log` crate events to `tracing`.
/// 4. Configures miette for diagnostic error reporting.
///
/// `RUST_LOG` overrides both filters. Without it the file gets `info` and
/// stderr gets `debug` when `verbose`, otherwise `warn`.
///
/// Returns a `WorkerGuard` which must be kept alive for the duration of the application
/// to ensure buffered logs are flushed on shutdown.
pub fn init(verbose: bool) -> WorkerGuard {
    let log_dir = log_dir();

    if !log_dir.exists() {
        if let Err(e) = fs::create_dir_all(&log_dir) {
            eprintln!("Failed to create logs directory: {}", e);
        }
    }

    let file_appender = tracing_appender::rolling::daily(&log_dir, LOG_FILE_PREFIX);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let file_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let stderr_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if verbose { "debug" } else { "warn" }));

    // File Layer: JSON format for easy parsing/ingestion
    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking)
        .json()
        .with_file(true)
        .with_line_number(true)
        .with_thread_ids(true)
        .with_target(true)
        .with_filter(file_filter);

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(io::stderr)
        .compact()
        .with_target(false)
        .with_filter(stderr_filter);

    let installed = tracing_subscriber::registry()
        .with(file_layer)
        .with(stderr_layer)
        .try_init()
        .is_ok();

    // No-op when tracing-subscriber already installed the bridge
    let _ = tracing_log::LogTracer::init();

    init_miette();

    if installed {
        let log_dir_clone = log_dir.clone();
        std::thread::spawn(move || {
            compress_old_logs(log_dir_clone);
        });

        log::info!(
            "Logging initialized. Writing to: {:?} (daily rolling)",
            log_dir.join(LOG_FILE_PREFIX)
        );
    }

    guard
}

/// Compress rolled log files other than today's
fn compress_old_logs(log_dir: PathBuf) {
    let today_suffix = chrono::Local::now().format("%Y-%m-%d").to_string();

    let Ok(entries) = fs::read_dir(&log_dir) else {
        return;
    };

    for entry in entries.flatten() {
        let path = entry.path();
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };

        if should_compress(name, &today_suffix) {
            if let Err(e) = compress_file(&path) {
                log::warn!("Failed to compress old log {:?}: {}", path, e);
            } else {
                log::info!("Compressed old log: {:?}", path);
            }
        }
    }
}

/// Rolled files are named `writeright.log.YYYY-MM-DD`.
fn should_compress(name: &str, today_suffix: &str) -> bool {
    name.starts_with(&format!("{LOG_FILE_PREFIX}."))
        && !name.ends_with(today_suffix)
        && !name.ends_with(".gz")
}

fn compress_file(path: &std::path::Path) -> io::Result<()> {
    let file = fs::File::open(path)?;
    let mut reader = io::BufReader::new(file);

    let mut gz_path_name = path
        .file_name()
        .ok_or_else(|| io::Error::new(io::ErrorKind::Other, "No filename"))?
        .to_os_string();
    gz_path_name.push(".gz");
    let parent_dir = path
        .parent()
        .ok_or_else(|| io::Error::new(io::ErrorKind::Other, "No parent directory"))?;
    let gz_path = parent_dir.join(gz_path_name);

    // Skip if already exists
    if gz_path.exists() {
        return Ok(());
    }

    let output = fs::File::create(&gz_path)?;
    let mut encoder = GzEncoder::new(output, Compression::default());

    io::copy(&mut reader, &mut encoder)?;
    encoder.finish()?;

    fs::remove_file(path)?;

    Ok(())
}

/// Initialize miette for diagnostic error reporting
fn init_miette() {
    let caps = get_terminal_caps();

    miette::set_hook(Box::new(move |_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(caps.color_level == ColorLevel::TrueColor)
                .unicode(caps.supports_unicode)
                .context_lines(3)
                .tab_width(4)
                .break_words(true)
                .color(caps.should_colorize())
                .build(),
        )
    }))
    .ok(); // Ignore if already set
}

// ============================================================================
// Emoji Support
// ============================================================================

/// Convert emoji shortcodes to actual emoji
/// e.g., `:tada:` -> `🎉`
pub fn convert_emoji(text: &str) -> String {
    let caps = get_terminal_caps();
    if !caps.supports_unicode {
        return convert_emoji_fallback(text);
    }

    let mut result = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch != ':' {
            result.push(ch);
            continue;
        }

        let mut code = String::new();
        let mut found_end = false;

        while let Some(&next_ch) = chars.peek() {
            if next_ch == ':' {
                chars.next();
                found_end = true;
                break;
            }
            if !next_ch.is_alphanumeric() && next_ch != '_' && next_ch != '-' {
                break;
            }
            code.push(next_ch);
            chars.next();
        }

        if found_end && !code.is_empty() {
            if let Some(emoji) = emojis::get_by_shortcode(&code) {
                result.push_str(emoji.as_str());
                continue;
            }
        }
        // Not a valid emoji, restore the original
        result.push(':');
        result.push_str(&code);
        if found_end {
            result.push(':');
        }
    }

    result
}

/// Fallback for terminals without Unicode support
fn convert_emoji_fallback(text: &str) -> String {
    text.replace(":tada:", "*")
        .replace(":white_check_mark:", "[v]")
        .replace(":x:", "[x]")
        .replace(":warning:", "[!]")
        .replace(":information_source:", "(i)")
        .replace(":repeat:", "->")
        .replace(":round_pushpin:", "@")
}

// ============================================================================
// Spinners (Indicatif Integration)
// ============================================================================

/// Progress styles used by the CLI
pub struct ProgressStyles;

impl ProgressStyles {
    /// Spinner for indeterminate operations
    pub fn spinner() -> ProgressStyle {
        ProgressStyle::default_spinner()
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "✔"])
            .template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    }
}

/// Start a spinner for a slow call. Hidden when stderr is not interactive.
pub fn spinner(message: &str) -> ProgressBar {
    use is_terminal::IsTerminal;

    new_spinner(message, io::stderr().is_terminal())
}

fn new_spinner(message: &str, interactive: bool) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if !interactive {
        pb.set_draw_target(ProgressDrawTarget::hidden());
    }
    pb.set_style(ProgressStyles::spinner());
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

// ============================================================================
// Console Output Utilities
// ============================================================================

/// Print a styled panel with title and content
pub fn print_panel(title: &str, content: &str) {
    let caps = get_terminal_caps();
    let width = (caps.width as usize).clamp(20, 80);

    let border_char = if caps.supports_unicode { "─" } else { "-" };
    let corner_tl = if caps.supports_unicode { "╭" } else { "+" };
    let corner_tr = if caps.supports_unicode { "╮" } else { "+" };
    let corner_bl = if caps.supports_unicode { "╰" } else { "+" };
    let corner_br = if caps.supports_unicode { "╯" } else { "+" };
    let side = if caps.supports_unicode { "│" } else { "|" };

    let title_display = format!(" {} ", title);
    let border_len = width
        .saturating_sub(console::measure_text_width(&title_display))
        .saturating_sub(2)
        .max(1);
    let top = format!(
        "{}{}{}{}",
        style(corner_tl).cyan(),
        style(&title_display).cyan().bold(),
        style(border_char.repeat(border_len)).cyan(),
        style(corner_tr).cyan()
    );

    let bottom_border_len = width.saturating_sub(2).max(1);
    let bottom = format!(
        "{}{}{}",
        style(corner_bl).cyan(),
        style(border_char.repeat(bottom_border_len)).cyan(),
        style(corner_br).cyan()
    );

    println!("{}", top);
    let content_width = width.saturating_sub(4).max(1);
    for line in content.lines() {
        let padding = content_width.saturating_sub(console::measure_text_width(line));
        println!(
            "{} {}{} {}",
            style(side).cyan(),
            line,
            " ".repeat(padding),
            style(side).cyan()
        );
    }
    println!("{}", bottom);
}

/// Print a success message
pub fn print_success(message: &str) {
    let prefix = convert_emoji(":tada:");
    println!("{} {}", style(prefix).green(), style(message).green());
}

/// Print a warning message
pub fn print_warning(message: &str) {
    let prefix = convert_emoji(":warning:");
    eprintln!(
        "{} {}",
        style(prefix).yellow(),
        style(message).yellow().bold()
    );
}

/// Print an info message
pub fn print_info(message: &str) {
    let prefix = convert_emoji(":information_source:");
    println!("{} {}", style(prefix).blue(), style(message).blue());
}

// ============================================================================
// Tests
// ============================================================================
