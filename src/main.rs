mod app_settings;
mod error;
mod logger;

use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use captions_core::{
    CaptionDisplay, Cue, ParsedCaptionSet, RenderSurface, StyleOptions, TtmlParsingOptions,
    language_display_name,
};
use clap::{Parser, ValueEnum};
use log::LevelFilter;
use ttml_processor::{generate_stylesheet, parse_ttml_file};

use app_settings::AppSettings;
use error::{AppError, AppResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// Cue listing per language
    Summary,
    /// The parsed caption set as JSON
    Json,
    /// The stylesheet for the document's classes and regions
    Css,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for LevelFilter {
    fn from(level: CliLogLevel) -> Self {
        match level {
            CliLogLevel::Error => Self::Error,
            CliLogLevel::Warn => Self::Warn,
            CliLogLevel::Info => Self::Info,
            CliLogLevel::Debug => Self::Debug,
            CliLogLevel::Trace => Self::Trace,
        }
    }
}

/// Parse a TTML / DFXP caption document and inspect the cues it produces.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// TTML or DFXP document to load
    #[arg(value_name = "FILE")]
    file: PathBuf,

    /// Show which cues are on screen at this playback time, in seconds (repeatable)
    #[arg(long = "at", value_name = "SECONDS")]
    at: Vec<f64>,

    /// Language to report on (defaults to the document's preferred language)
    #[arg(long, value_name = "CODE")]
    lang: Option<String>,

    /// Height of the caption area in pixels, used for cell units
    #[arg(long, value_name = "PX")]
    height: Option<f64>,

    /// What to print
    #[arg(long, value_enum, default_value_t = OutputFormat::Summary)]
    format: OutputFormat,

    /// JSON file with viewer style options
    #[arg(long, value_name = "FILE")]
    style_options: Option<PathBuf>,

    /// Also write the log to the data directory
    #[arg(long)]
    log_file: bool,

    /// Log verbosity, overriding the settings file
    #[arg(long, value_enum)]
    log_level: Option<CliLogLevel>,
}

/// Prints attach/detach notifications as the display driver emits them.
struct ConsoleSurface<'a> {
    out: &'a mut String,
}

impl RenderSurface for ConsoleSurface<'_> {
    fn attach(&mut self, index: usize, cue: &Cue) {
        let _ = writeln!(self.out, "  + #{index} {}", describe_cue(cue));
    }

    fn detach(&mut self, index: usize, cue: &Cue) {
        let _ = writeln!(self.out, "  - #{index} {}", describe_cue(cue));
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let settings = AppSettings::load();

    let level = cli
        .log_level
        .map_or(settings.log_settings.log_level, LevelFilter::from);
    logger::init_global_logger(level, cli.log_file || settings.log_settings.enable_file_log);

    match run(&cli, &settings) {
        Ok(report) => {
            print!("{report}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("{e}");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli, settings: &AppSettings) -> AppResult<String> {
    let style = load_style_options(
        cli.style_options
            .as_deref()
            .or(settings.caption_settings.style_options_file.as_deref()),
    )?;
    let options = TtmlParsingOptions {
        surface_height: cli
            .height
            .unwrap_or(settings.caption_settings.surface_height),
        style,
    };

    let captions = parse_ttml_file(&cli.file, &options)?;
    for warning in &captions.warnings {
        log::warn!("{}: {warning}", cli.file.display());
    }
    log::info!(
        "Loaded {} cue(s) in {} language(s) from {}",
        captions.total_cues(),
        captions.languages.len(),
        cli.file.display()
    );

    let mut report = match cli.format {
        OutputFormat::Json => serde_json::to_string_pretty(&captions)? + "\n",
        OutputFormat::Css => generate_stylesheet(&captions, &options.style) + "\n",
        OutputFormat::Summary => summarize(&captions, cli.lang.as_deref()),
    };

    if !cli.at.is_empty() {
        report.push_str(&replay(Arc::new(captions), cli.lang.as_deref(), &cli.at)?);
    }
    Ok(report)
}

fn load_style_options(path: Option<&Path>) -> AppResult<StyleOptions> {
    let Some(path) = path else {
        return Ok(StyleOptions::default());
    };
    log::debug!("Reading style options from {}", path.display());
    let json = fs::read_to_string(path)?;
    Ok(StyleOptions::from_json_str(&json)?)
}

fn summarize(captions: &ParsedCaptionSet, language: Option<&str>) -> String {
    let mut out = String::new();
    if captions.is_empty() {
        out.push_str("No timed captions found.\n");
    }
    for code in &captions.languages {
        if language.is_some_and(|wanted| wanted != code) {
            continue;
        }
        let Some(timeline) = captions.timeline(code) else {
            continue;
        };
        let _ = writeln!(
            out,
            "{} ({code}): {} cue(s)",
            language_display_name(code),
            timeline.len()
        );
        for cue in timeline.iter() {
            let _ = writeln!(out, "  {}", describe_cue(cue));
        }
    }
    if !captions.warnings.is_empty() {
        let _ = writeln!(out, "{} warning(s)", captions.warnings.len());
    }
    out
}

/// Feeds the requested times through a caption display, in the order given.
fn replay(captions: Arc<ParsedCaptionSet>, language: Option<&str>, times: &[f64]) -> AppResult<String> {
    let mut display = CaptionDisplay::new(Arc::clone(&captions));
    let mut out = String::new();

    if let Some(language) = language {
        if captions.timeline(language).is_none() {
            return Err(AppError::Custom(format!(
                "no captions in language '{language}' (available: {})",
                captions.languages.join(", ")
            )));
        }
        display.set_language(language, &mut ConsoleSurface { out: &mut out });
    }
    let Some(language) = display.language().map(str::to_string) else {
        out.push_str("No captions to display.\n");
        return Ok(out);
    };
    display.enable();

    for &time in times {
        let _ = writeln!(out, "at {time:.3}s ({language}):");
        display.update(time, &mut ConsoleSurface { out: &mut out });
        let active = captions.active_cues(&language, time);
        if active.is_empty() {
            out.push_str("  (nothing showing)\n");
        }
        for cue in active {
            let _ = writeln!(out, "  = {}", describe_cue(cue));
        }
    }
    Ok(out)
}

fn describe_cue(cue: &Cue) -> String {
    format!(
        "[{:>9.3} - {:>9.3}] {}{}: {}",
        cue.begin,
        cue.end,
        cue.id.as_deref().map(|id| format!("{id} ")).unwrap_or_default(),
        cue.region.as_deref().unwrap_or("(default region)"),
        cue.text().replace('\n', " / ")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use ttml_processor::parse_ttml;

    const DOCUMENT: &str = r#"<tt xmlns="http://www.w3.org/ns/ttml" xml:lang="en"><body><div>
        <p xml:id="a" begin="1s" end="3s">A</p>
        <p xml:id="b" begin="2s" end="4s">B<br/>second</p>
    </div></body></tt>"#;

    fn captions() -> ParsedCaptionSet {
        parse_ttml(DOCUMENT, &TtmlParsingOptions::default()).unwrap()
    }

    #[test]
    fn test_cli_arguments() {
        let cli = Cli::try_parse_from([
            "ttml_captions",
            "subs.ttml",
            "--at",
            "1.5",
            "--at",
            "2.5",
            "--format",
            "css",
            "--lang",
            "fr",
        ])
        .unwrap();
        assert_eq!(cli.file, PathBuf::from("subs.ttml"));
        assert_eq!(cli.at, vec![1.5, 2.5]);
        assert_eq!(cli.format, OutputFormat::Css);
        assert_eq!(cli.lang.as_deref(), Some("fr"));
        assert!(!cli.log_file);
    }

    #[test]
    fn test_summary_lists_cues() {
        let summary = summarize(&captions(), None);
        assert!(summary.starts_with("English (en): 2 cue(s)\n"));
        assert!(summary.contains("a (default region): A"));
        assert!(summary.contains("b (default region): B / second"));
    }

    #[test]
    fn test_replay_reports_changes() {
        let out = replay(Arc::new(captions()), None, &[1.5, 2.5, 3.5]).unwrap();
        let lines: Vec<_> = out.lines().collect();
        assert_eq!(lines[0], "at 1.500s (en):");
        assert!(lines[1].starts_with("  + #0"));
        assert!(out.contains("  - #0"));
        assert!(out.ends_with("b (default region): B / second\n"));
    }

    #[test]
    fn test_replay_rejects_unknown_language() {
        assert!(matches!(
            replay(Arc::new(captions()), Some("de"), &[1.0]),
            Err(AppError::Custom(_))
        ));
    }
}
