//! Waylint CLI - tag consistency checker for OSM road and path ways

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use glob::glob;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use waylint::config::{ColorMode, Config, OutputFormat};
use waylint::engine::{Engine, RunSummary};
use waylint::report::SummaryReport;
use waylint::sink::{DiagnosticSink, JsonLinesSink, SqliteSink, TextSink};
use waylint::source::{self, SourceFormat};
use waylint::{AccessCombinations, Rule, Topic};

#[derive(Parser)]
#[command(
    name = "waylint",
    version,
    about = "Tag consistency checker for OSM road and path ways",
    long_about = "Checks the tags of every highway in an OSM XML or NDJSON extract and \
                  reports inconsistencies grouped into layers."
)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check ways and report diagnostics
    Check {
        /// Input files or glob patterns (.osm, .ndjson, .jsonl)
        #[arg(required = true)]
        files: Vec<String>,

        /// Output format
        #[arg(short, long, value_enum)]
        format: Option<Format>,

        /// Output file (required for sqlite, stdout otherwise)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Number of parallel jobs (0 = auto)
        #[arg(short, long)]
        jobs: Option<usize>,

        /// Disable specific rules (comma-separated)
        #[arg(long, value_delimiter = ',')]
        disable: Option<Vec<String>>,

        /// Only enable specific rules (comma-separated)
        #[arg(long, value_delimiter = ',')]
        select: Option<Vec<String>>,

        /// Select rules by id prefix (e.g., 'ref-')
        #[arg(long, value_delimiter = ',')]
        extend: Option<Vec<String>>,

        /// Ignore rules by id prefix
        #[arg(long, value_delimiter = ',')]
        ignore: Option<Vec<String>>,

        /// Only run rules of these topics (comma-separated)
        #[arg(long, value_delimiter = ',')]
        topics: Option<Vec<Topic>>,

        /// Append author and changeset to text output
        #[arg(long)]
        provenance: bool,

        /// Show per-rule timing statistics
        #[arg(long)]
        timing: bool,

        /// Do not print the run summary
        #[arg(short, long)]
        quiet: bool,
    },

    /// Count combinations of access tags on admitted ways
    Combinations {
        /// Input files or glob patterns
        #[arg(required = true)]
        files: Vec<String>,

        /// Only show the most frequent combinations
        #[arg(short = 'n', long)]
        top: Option<usize>,
    },

    /// List available rules
    Rules {
        /// Only list rules of one topic
        #[arg(long)]
        topic: Option<Topic>,
    },

    /// Show detailed information about a rule
    Explain {
        /// Rule ID to explain
        rule_id: String,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Text,
    Json,
    Sqlite,
}

impl From<Format> for OutputFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Text => OutputFormat::Text,
            Format::Json => OutputFormat::Json,
            Format::Sqlite => OutputFormat::Sqlite,
        }
    }
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => Config::load(path)
            .with_context(|| format!("failed to load config {}", path.display())),
        None => Config::load_default().context("failed to load default config"),
    }
}

/// Expand glob patterns into input files with a known format
fn expand_inputs(patterns: &[String]) -> Result<Vec<(PathBuf, SourceFormat)>> {
    let mut files = Vec::new();
    for pattern in patterns {
        let paths = glob(pattern).with_context(|| format!("invalid pattern '{}'", pattern))?;
        let mut matched = false;
        for entry in paths.flatten() {
            if !entry.is_file() {
                continue;
            }
            matched = true;
            match SourceFormat::from_path(&entry) {
                Some(format) => files.push((entry, format)),
                None => log::warn!("skipping {}: unknown input format", entry.display()),
            }
        }
        if !matched {
            bail!("no input matches '{}'", pattern);
        }
    }
    if files.is_empty() {
        bail!("no input files found");
    }
    Ok(files)
}

fn print_rule(rule: &Rule, active: bool) {
    let marker = if active { "".normal() } else { " [off]".dimmed() };
    println!(
        "    {} ({}) -> {}{}",
        rule.id.cyan(),
        rule.topic,
        rule.layers.join(", "),
        marker
    );
    if !rule.description.is_empty() {
        println!("      {}", rule.description);
    }
}

fn handle_rules(engine: &Engine, topic: Option<Topic>) {
    for t in Topic::ALL {
        if topic.is_some_and(|wanted| wanted != t) {
            continue;
        }
        let rules: Vec<&Rule> = engine.rules().iter().filter(|r| r.topic == t).collect();
        if rules.is_empty() {
            continue;
        }
        println!("  {}", t.to_string().bold());
        for rule in rules {
            print_rule(rule, engine.is_active(rule.id));
        }
    }
    println!();
    println!(
        "{} rules, {} active",
        engine.rules().len(),
        engine.active_rules().count()
    );
}

fn handle_explain(engine: &Engine, rule_id: &str) -> Result<()> {
    let Some(rule) = engine.rule(rule_id) else {
        bail!("rule '{}' not found (see `waylint rules`)", rule_id);
    };

    println!("{}", "Rule Details".bold());
    println!();
    println!("  {}: {}", "ID".bold(), rule.id.cyan());
    println!("  {}: {}", "Topic".bold(), rule.topic);
    println!("  {}: {}", "Layers".bold(), rule.layers.join(", "));
    if let Some(style) = engine.config().get_style_override(rule.id) {
        println!("  {}: {} (configured)", "Style".bold(), style);
    }
    println!(
        "  {}: {}",
        "Active".bold(),
        if engine.is_active(rule.id) {
            "yes".green()
        } else {
            "no".red()
        }
    );
    if !rule.description.is_empty() {
        println!();
        println!("  {}", "Description".bold());
        println!("  {}", rule.description);
    }
    for layer in rule.layers {
        if let Some(info) = engine.registry().get(layer) {
            println!();
            println!("  {} {}", "Layer".bold(), info.name.cyan());
            println!("  {}", info.description);
        }
    }
    Ok(())
}

fn output_writer(output: Option<&Path>) -> Result<Box<dyn Write>> {
    Ok(match output {
        Some(path) => Box::new(BufWriter::new(
            File::create(path).with_context(|| format!("cannot create {}", path.display()))?,
        )),
        None => Box::new(BufWriter::new(std::io::stdout())),
    })
}

fn open_sink(
    engine: &Engine,
    format: OutputFormat,
    output: Option<&Path>,
    provenance: bool,
    colored: bool,
) -> Result<Box<dyn DiagnosticSink>> {
    Ok(match format {
        OutputFormat::Text => {
            let mut sink = TextSink::new(output_writer(output)?);
            sink.colored = colored && output.is_none();
            sink.show_provenance = provenance;
            Box::new(sink)
        }
        OutputFormat::Json => Box::new(JsonLinesSink::new(output_writer(output)?)),
        OutputFormat::Sqlite => {
            let Some(path) = output else {
                bail!("sqlite output needs --output <file>");
            };
            Box::new(
                SqliteSink::create(path, engine.registry())
                    .with_context(|| format!("cannot initialize {}", path.display()))?,
            )
        }
    })
}

struct CheckArgs {
    files: Vec<String>,
    output: Option<PathBuf>,
    provenance: bool,
    timing: bool,
    quiet: bool,
}

fn handle_check(config: Config, args: CheckArgs, colored: bool) -> Result<RunSummary> {
    let inputs = expand_inputs(&args.files)?;
    let engine = Engine::new(config)?;
    let format = engine.config().output.format;
    let mut sink = open_sink(
        &engine,
        format,
        args.output.as_deref(),
        args.provenance,
        colored,
    )?;

    let mut summary = RunSummary::default();
    for (path, input_format) in &inputs {
        let features = source::open(path, *input_format)
            .with_context(|| format!("cannot open {}", path.display()))?;
        let result = engine
            .run(features, &mut sink)
            .with_context(|| format!("checking {} failed", path.display()))?;
        summary.merge(result);
    }

    if engine.config().output.statistics && !args.quiet {
        let mut report = SummaryReport::new();
        report.colored = colored;
        report.show_timings = args.timing;
        eprint!("{}", report.format(&summary));
    }
    Ok(summary)
}

fn handle_combinations(files: &[String], top: Option<usize>) -> Result<()> {
    let mut stats = AccessCombinations::default();
    let mut malformed = 0;

    for (path, format) in expand_inputs(files)? {
        let features =
            source::open(&path, format).with_context(|| format!("cannot open {}", path.display()))?;
        for item in features {
            match item {
                Ok(feature) => {
                    stats.add(&feature);
                }
                Err(e) if e.is_record_error() => {
                    log::warn!("skipping input record: {}", e);
                    malformed += 1;
                }
                Err(e) => {
                    return Err(e).with_context(|| format!("reading {} failed", path.display()))
                }
            }
        }
    }

    let mut out = BufWriter::new(std::io::stdout());
    for combination in stats.sorted().iter().take(top.unwrap_or(usize::MAX)) {
        writeln!(out, "{}", combination)?;
    }
    out.flush()?;

    log::info!(
        "{} ways, {} distinct combinations, {} malformed records",
        stats.total(),
        stats.distinct(),
        malformed
    );
    Ok(())
}

fn run(cli: Cli) -> Result<i32> {
    let mut config = load_config(cli.config.as_deref())?;

    let colored = match config.output.color {
        _ if cli.no_color => false,
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => std::env::var_os("NO_COLOR").is_none(),
    };
    colored::control::set_override(colored);

    match cli.command {
        Commands::Check {
            files,
            format,
            output,
            jobs,
            disable,
            select,
            extend,
            ignore,
            topics,
            provenance,
            timing,
            quiet,
        } => {
            config.merge_cli(format.map(Into::into), jobs, disable, select, topics);
            if let Some(prefixes) = extend {
                config.add_extend_prefixes(prefixes);
            }
            if let Some(prefixes) = ignore {
                config.add_ignore_prefixes(prefixes);
            }
            if timing {
                config.engine.timing = true;
            }

            let args = CheckArgs {
                files,
                output,
                provenance,
                timing,
                quiet,
            };
            let summary = handle_check(config, args, colored)?;
            Ok(if summary.diagnostics() > 0 { 1 } else { 0 })
        }
        Commands::Combinations { files, top } => {
            handle_combinations(&files, top)?;
            Ok(0)
        }
        Commands::Rules { topic } => {
            handle_rules(&Engine::new(config)?, topic);
            Ok(0)
        }
        Commands::Explain { rule_id } => {
            handle_explain(&Engine::new(config)?, &rule_id)?;
            Ok(0)
        }
    }
}

fn main() {
    // Initialize logger
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("{}: {:#}", "error".red().bold(), e);
            std::process::exit(2);
        }
    }
}
