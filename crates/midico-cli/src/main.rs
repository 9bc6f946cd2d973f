mod narrate;

use std::io::{IsTerminal, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use glob::glob;
use midico_core::{
    ExtractError, MidicoError, OutputKind, OutputLayout, SourceError, extract_file, locate_region,
    output_path, read_input, render_dump, render_json, render_timestamps, write_output,
};
use tracing::info;
use tracing_subscriber::Layer;

use narrate::TracingObserver;

#[derive(Parser, Debug)]
#[command(name = "mdcextract")]
#[command(version)]
#[command(
    about = "Extract fixed-point timestamps from the L1/L2 region of a Midico file.",
    long_about = None,
    after_help = "Examples:\n  mdcextract take.mdc\n  mdcextract sessions/take.mdc --layout preserve\n  mdcextract take.mdc --format json --stdout\n  mdcextract take.mdc --dump"
)]
struct Cli {
    /// Path to a Midico file (a glob pattern must match exactly one file)
    input: PathBuf,

    /// Where to write the output file
    #[arg(long, value_enum, default_value_t = LayoutArg::Strip, env = "MIDICO_OUTPUT_LAYOUT")]
    layout: LayoutArg,

    /// Output format for decoded timestamps
    #[arg(long, value_enum, default_value_t = FormatArg::Text)]
    format: FormatArg,

    /// Write a byte listing of the region instead of timestamps
    #[arg(long, conflicts_with = "format")]
    dump: bool,

    /// Write output to stdout instead of a file
    #[arg(long)]
    stdout: bool,

    /// Suppress non-error output
    #[arg(long, conflicts_with = "verbose")]
    quiet: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Log format
    #[arg(long, value_enum, default_value_t = LogFormat::Compact, env = "MIDICO_LOG_FORMAT")]
    log_format: LogFormat,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LayoutArg {
    /// Write into the current working directory
    Strip,
    /// Write beside the input file
    Preserve,
}

impl From<LayoutArg> for OutputLayout {
    fn from(value: LayoutArg) -> Self {
        match value {
            LayoutArg::Strip => OutputLayout::StripDirectory,
            LayoutArg::Preserve => OutputLayout::PreserveDirectory,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum FormatArg {
    Text,
    Json,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogFormat {
    Compact,
    Pretty,
    Json,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(err) = init_logging(&cli) {
        eprintln!("error: {err}");
        return ExitCode::from(2);
    }

    match cmd_extract(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {}", err.message);
            if let Some(hint) = err.hint {
                eprintln!("hint: {}", hint);
            }
            ExitCode::from(2)
        }
    }
}

fn init_logging(cli: &Cli) -> Result<()> {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let filter = if cli.quiet {
        EnvFilter::new("warn")
    } else {
        let default_level = match cli.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        };
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level))
    };

    let ansi = std::io::stderr().is_terminal();
    let fmt_layer = match cli.log_format {
        LogFormat::Json => fmt::layer()
            .json()
            .with_target(true)
            .with_writer(std::io::stderr)
            .boxed(),
        LogFormat::Pretty => fmt::layer()
            .pretty()
            .with_ansi(ansi)
            .with_writer(std::io::stderr)
            .boxed(),
        LogFormat::Compact => fmt::layer()
            .compact()
            .with_ansi(ansi)
            .with_writer(std::io::stderr)
            .boxed(),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    Ok(())
}

#[derive(Debug)]
struct CliError {
    message: String,
    hint: Option<String>,
}

impl CliError {
    fn new(message: impl Into<String>, hint: Option<String>) -> Self {
        Self {
            message: message.into(),
            hint,
        }
    }
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

impl From<anyhow::Error> for CliError {
    fn from(err: anyhow::Error) -> Self {
        CliError::new(format!("{err:#}"), None)
    }
}

impl From<SourceError> for CliError {
    fn from(err: SourceError) -> Self {
        let hint = match err {
            SourceError::NotFound { .. } => Some("check the input path".to_string()),
            SourceError::NotAFile { .. } => Some("pass a Midico file, not a directory".to_string()),
            SourceError::Io(_) => None,
        };
        CliError::new(err.to_string(), hint)
    }
}

impl From<MidicoError> for CliError {
    fn from(err: MidicoError) -> Self {
        let hint = match err {
            MidicoError::MarkerNotFound { .. } => {
                Some("expected an L1 (4C 31) ... L2 (4C 32) marker pair".to_string())
            }
            MidicoError::TooShort { .. } => None,
        };
        CliError::new(err.to_string(), hint)
    }
}

impl From<ExtractError> for CliError {
    fn from(err: ExtractError) -> Self {
        match err {
            ExtractError::Source(err) => err.into(),
            ExtractError::Format(err) => err.into(),
        }
    }
}

fn cmd_extract(cli: &Cli) -> Result<(), CliError> {
    let input = resolve_input_path(&cli.input)?;
    let kind = if cli.dump {
        OutputKind::Dump
    } else {
        match cli.format {
            FormatArg::Text => OutputKind::Timestamps,
            FormatArg::Json => OutputKind::Json,
        }
    };

    let rendered = render(&input, kind)?;

    if cli.stdout {
        std::io::stdout()
            .lock()
            .write_all(rendered.as_bytes())
            .context("Failed to write to stdout")?;
        return Ok(());
    }

    let target = output_path(&input, cli.layout.into(), kind).ok_or_else(|| {
        CliError::new(
            format!("cannot derive output name from '{}'", input.display()),
            Some("pass a path to a file".to_string()),
        )
    })?;
    write_output(&target, &rendered)
        .with_context(|| format!("Failed to write output: {}", target.display()))?;

    if !cli.quiet {
        eprintln!("OK: output written -> {}", target.display());
    }
    Ok(())
}

fn render(input: &Path, kind: OutputKind) -> Result<String, CliError> {
    info!(input = %input.display(), "processing file");
    if kind == OutputKind::Dump {
        let data = read_input(input)?;
        let region = locate_region(&data)?;
        info!(bytes = region.len(), "region located");
        return Ok(render_dump(region.bytes()));
    }

    let extraction = extract_file(input, &mut TracingObserver)?;
    info!(
        timestamps = extraction.records,
        discarded = extraction.discarded_tail_bytes,
        "timestamps extracted"
    );

    match kind {
        OutputKind::Json => render_json(&extraction)
            .context("JSON serialization failed")
            .map_err(Into::into),
        _ => Ok(render_timestamps(&extraction.timestamps)),
    }
}

fn resolve_input_path(input: &Path) -> Result<PathBuf, CliError> {
    let pattern = input.to_string_lossy();
    if input.is_file() || !is_glob_pattern(&pattern) {
        return Ok(input.to_path_buf());
    }

    let mut matches = Vec::new();
    let paths = glob(&pattern).map_err(|err| {
        CliError::new(
            format!("invalid input pattern '{}'", pattern),
            Some(format!("pattern error: {}", err.msg)),
        )
    })?;
    for entry in paths {
        let path = entry.map_err(|err| {
            CliError::new(
                format!("invalid input pattern '{}'", pattern),
                Some(format!("pattern error: {}", err)),
            )
        })?;
        if path.is_file() {
            matches.push(path);
        }
    }

    if matches.is_empty() {
        return Err(CliError::new(
            format!("no files match pattern '{}'", pattern),
            Some("check the path or quote the pattern".to_string()),
        ));
    }
    if matches.len() > 1 {
        let mut message = format!(
            "multiple files match pattern '{}' ({} matches)",
            pattern,
            matches.len()
        );
        let listed = matches
            .iter()
            .take(3)
            .map(|p| p.display().to_string())
            .collect::<Vec<_>>()
            .join(", ");
        message.push_str("; matches: ");
        message.push_str(&listed);
        if matches.len() > 3 {
            message.push_str(", ...");
        }
        return Err(CliError::new(
            message,
            Some("pass a single Midico file, or run once per file".to_string()),
        ));
    }

    Ok(matches.remove(0))
}

fn is_glob_pattern(input: &str) -> bool {
    input.contains('*') || input.contains('?') || input.contains('[')
}
