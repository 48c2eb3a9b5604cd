//! writeright CLI - check text for spelling and grammar issues

use std::io::{self, Read};
use std::path::{Path, PathBuf};

use clap::{Parser, ValueEnum};
use console::style;
use is_terminal::IsTerminal;
use writeright::config::AppConfig;
use writeright::core::annotate::render_terminal;
use writeright::core::logging::{self, convert_emoji};
use writeright::{ensure_not_blank, CheckError, CheckPipeline, CheckReport, CheckResult};

#[derive(Parser)]
#[command(name = "writeright")]
#[command(about = "Spelling and grammar checker with inline annotations")]
#[command(version)]
struct Cli {
    /// Text to check (reads --file or stdin when omitted)
    text: Option<String>,

    /// Read the text from a file
    #[arg(short, long, conflicts_with = "text")]
    file: Option<PathBuf>,

    /// Configuration file (defaults to the user config location)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Write the annotated HTML to a file
    #[arg(long)]
    html_out: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value = "text")]
    format: OutputFormat,

    /// Skip the holistic rewrite
    #[arg(long)]
    no_rewrite: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[tokio::main]
async fn main() -> miette::Result<()> {
    let cli = Cli::parse();

    let _log_guard = logging::init(cli.verbose);
    log::info!("writeright v{} starting", writeright::VERSION);

    let text = read_input(&cli)?;
    if let Err(err) = ensure_not_blank(&text) {
        logging::print_warning(&err.to_string());
        return Ok(());
    }

    let mut config = match &cli.config {
        Some(path) => AppConfig::load_from(path)?,
        None => AppConfig::load(),
    };
    if cli.no_rewrite {
        config.rewrite.enabled = false;
    }

    let pipeline = CheckPipeline::from_config(&config)?;

    let spinner = (cli.format == OutputFormat::Text).then(|| logging::spinner("Checking text..."));
    let result = pipeline.check(&text).await;
    if let Some(spinner) = spinner {
        spinner.finish_and_clear();
    }

    let report = match result {
        Err(err) if err.is_warning() => {
            logging::print_warning(&err.to_string());
            return Ok(());
        }
        other => other?,
    };

    if let Some(path) = &cli.html_out {
        write_html(path, &report)?;
    }

    match cli.format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&report)
                .map_err(|e| CheckError::Config(format!("cannot serialize report: {e}")))?;
            println!("{json}");
        }
        OutputFormat::Text => print_report(&pipeline, &report, cli.html_out.is_some()),
    }

    Ok(())
}

/// Text from the argument, the file, or stdin, in that order.
fn read_input(cli: &Cli) -> CheckResult<String> {
    if let Some(text) = &cli.text {
        return Ok(text.clone());
    }
    if let Some(path) = &cli.file {
        return Ok(std::fs::read_to_string(path)?);
    }

    let stdin = io::stdin();
    if stdin.is_terminal() {
        // Nothing piped in; reported as a blank submission
        return Ok(String::new());
    }
    let mut text = String::new();
    stdin.lock().read_to_string(&mut text)?;
    Ok(text)
}

fn write_html(path: &Path, report: &CheckReport) -> CheckResult<()> {
    std::fs::write(path, &report.annotated_html)?;
    log::info!("Wrote annotated HTML to {}", path.display());
    Ok(())
}

fn print_report(pipeline: &CheckPipeline, report: &CheckReport, html_written: bool) {
    for service in &report.degraded {
        logging::print_warning(&format!(
            "{service} checking unavailable, results may be incomplete"
        ));
    }

    if let Some(corrected) = &report.corrected_text {
        logging::print_panel("Corrected Text", corrected);
    }

    let segments = pipeline
        .annotator()
        .segments(&report.original, report.issues.as_slice());
    let colorize = logging::terminal_caps().should_colorize();
    logging::print_panel("Highlighted Issues", &render_terminal(&segments, colorize));

    if html_written {
        logging::print_info("Annotated HTML saved");
    } else {
        println!("{}", style("Annotated HTML").bold());
        println!("{}", report.annotated_html);
    }
    println!();

    if !report.has_issues() {
        logging::print_success("No issues found!");
        return;
    }

    println!("{}", style("Detected Issues").bold());
    for summary in report.summaries() {
        println!(
            "{} {}: {}",
            convert_emoji(":x:"),
            style(format!("{} issue", summary.kind)).bold(),
            summary.message
        );
        println!(
            "{} Suggestion(s): {}",
            convert_emoji(":repeat:"),
            summary.suggestions
        );
        println!("{} At: '{}'", convert_emoji(":round_pushpin:"), summary.snippet);
        println!();
    }
}
