//! Ideograph CLI
//!
//! Command-line interface for:
//! - Writing the decomposition reports (`report <name>... | --all`)
//! - Looking up a single key
//! - Merging duplicate keys into a target and writing the rewritten data
//! - Unnesting nested decompositions into flat records
//! - Parsing one ideographic description sequence
//! - Checking a decomposition file against the record grammar

use anyhow::{anyhow, bail, Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use colored::Colorize;
use ideograph_dsl::ids::parse_ids_sequence;
use ideograph_dsl::key::is_intermediate;
use ideograph_dsl::record::{check_record_line, parse_records};
use ideograph_dsl::unnest::unnest_text;
use ideograph_store::DecompStore;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::Level;

mod config;
mod inputs;
mod reports;
mod sink;

use config::ReportConfig;
use inputs::Inputs;
use reports::ReportKind;
use sink::ReportSink;

/// First intermediate number handed out by `unnest` unless told otherwise.
const DEFAULT_UNNEST_START: u64 = 70100;

/// Keys per line in the key list appended to unnested output.
const KEYS_PER_LINE: usize = 50;

#[derive(Parser)]
#[command(name = "ideograph")]
#[command(author, version, about = "Ideograph decomposition analysis")]
struct Cli {
    /// JSON configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Directory holding the decomposition, replacement and IDS files
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,
    /// Directory holding the Unihan files
    #[arg(long, global = true)]
    unihan_dir: Option<PathBuf>,
    /// Directory reports are written to
    #[arg(long, global = true)]
    out_dir: Option<PathBuf>,
    /// Never prefix report files with a byte-order mark
    #[arg(long, global = true)]
    no_bom: bool,
    /// More log output (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
    /// Only log errors
    #[arg(short, long, global = true)]
    quiet: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write reports into the output directory.
    Report {
        /// Reports to write
        #[arg(value_enum)]
        names: Vec<ReportKind>,
        /// Write every report
        #[arg(long, conflicts_with = "names")]
        all: bool,
        /// List report names and their files
        #[arg(long)]
        list: bool,
    },

    /// Show the record, owners and tags of one key.
    Lookup { key: String },

    /// Merge keys into a target, re-resolve, and write `newCharData.txt`.
    Merge {
        target: String,
        #[arg(required = true)]
        sources: Vec<String>,
    },

    /// Rewrite nested decompositions into flat records.
    Unnest {
        file: PathBuf,
        /// First intermediate number to hand out
        #[arg(long, default_value_t = DEFAULT_UNNEST_START)]
        start: u64,
        /// Output file (stdout when omitted)
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Parse one ideographic description sequence.
    Ids { sequence: String },

    /// Check a decomposition file; fails when any line is rejected.
    Check {
        file: PathBuf,
        /// Also fail on shape/component-count mismatches
        #[arg(long)]
        strict: bool,
    },
}

impl Cli {
    fn apply_overrides(&self, config: &mut ReportConfig) {
        if let Some(dir) = &self.data_dir {
            config.data_dir = dir.clone();
        }
        if let Some(dir) = &self.unihan_dir {
            config.unihan_dir = dir.clone();
        }
        if let Some(dir) = &self.out_dir {
            config.out_dir = dir.clone();
        }
        if self.no_bom {
            config.write_bom = false;
        }
    }

    fn log_level(&self, config: &ReportConfig) -> Level {
        if self.quiet {
            return Level::ERROR;
        }
        match self.verbose {
            0 => config.log_level.parse().unwrap_or(Level::INFO),
            1 => Level::DEBUG,
            _ => Level::TRACE,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut config = ReportConfig::load(cli.config.as_deref())?;
    cli.apply_overrides(&mut config);

    tracing_subscriber::fmt()
        .with_max_level(cli.log_level(&config))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    match cli.command {
        Commands::Report { names, all, list } => cmd_report(&config, &names, all, list),
        Commands::Lookup { key } => cmd_lookup(&config, &key),
        Commands::Merge { target, sources } => cmd_merge(&config, &target, &sources),
        Commands::Unnest { file, start, out } => cmd_unnest(&file, start, out.as_deref()),
        Commands::Ids { sequence } => cmd_ids(&sequence),
        Commands::Check { file, strict } => cmd_check(&file, strict),
    }
}

fn load_store(config: &ReportConfig) -> Result<DecompStore> {
    let (store, _) = DecompStore::build(
        &config.char_data_path(),
        Some(config.replacements_path().as_path()),
    )?;
    Ok(store)
}

// ============================================================================
// Commands
// ============================================================================

fn cmd_report(config: &ReportConfig, names: &[ReportKind], all: bool, list: bool) -> Result<()> {
    if list {
        for kind in ReportKind::ALL {
            println!("{:<26} {}", kind.name(), kind.file_name());
        }
        return Ok(());
    }
    let kinds: Vec<ReportKind> = if all { ReportKind::ALL.to_vec() } else { names.to_vec() };
    if kinds.is_empty() {
        bail!("no reports requested (name some or pass --all)");
    }

    let inputs = Inputs::load(config, &kinds);
    let mut sink = ReportSink::new(&config.out_dir, config.write_bom);
    for kind in &kinds {
        let started = Instant::now();
        sink.emit(*kind, inputs.render(*kind));
        tracing::debug!(
            report = kind.name(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "report finished"
        );
    }

    println!(
        "{} {} report(s) to {}",
        "wrote".green().bold(),
        sink.written.len(),
        sink.out_dir().display()
    );
    if sink.failed.is_empty() {
        return Ok(());
    }
    let failed: Vec<&str> = sink.failed.iter().map(|k| k.name()).collect();
    eprintln!("{} {}", "failed".red().bold(), failed.join(", "));
    Err(anyhow!("{} report(s) failed", failed.len()))
}

fn cmd_lookup(config: &ReportConfig, key: &str) -> Result<()> {
    let store = load_store(config)?;
    let record = store
        .record(key)
        .ok_or_else(|| anyhow!("no record for `{key}`"))?;
    println!("{}:{}", key.bold(), record);
    println!("  {} {}", "owners".cyan(), store.owners(key).join(","));
    println!("  {} {}", "tag".cyan(), store.decomp_tag(key));
    println!("  {} {}", "owner tag".cyan(), store.owner_tag(key));
    println!("  {} {}", "flattened".cyan(), store.flattened_signature(key));
    println!("  {} {}", "expanded".cyan(), store.full_expansion(key));
    Ok(())
}

fn cmd_merge(config: &ReportConfig, target: &str, sources: &[String]) -> Result<()> {
    let mut store = load_store(config)?;
    if !store.contains(target) {
        tracing::warn!(key = %target, "merge target has no record");
    }
    for source in sources {
        if !store.contains(source) {
            tracing::warn!(key = %source, "merge source has no record");
        }
    }

    store.merge(target, sources);
    let report = store.resolve();
    for (key, err) in store.unwritable() {
        tracing::warn!(key = %key, error = %err, "merged record will not read back");
    }
    let sink = ReportSink::new(&config.out_dir, config.write_bom);
    let path = sink.write(ReportKind::NewCharData, &reports::new_char_data(&store))?;

    println!(
        "{} {} into {} ({} intermediates removed)",
        "merged".green().bold(),
        sources.join(","),
        target.bold(),
        report.removed.len()
    );
    println!("  {} {}", "→".cyan(), path.display());
    Ok(())
}

fn cmd_unnest(file: &Path, start: u64, out: Option<&Path>) -> Result<()> {
    let text = fs::read_to_string(file)
        .with_context(|| format!("failed to read {}", file.display()))?;
    let unnested = unnest_text(&text, start);
    for (line, err) in &unnested.errors {
        tracing::warn!(line = line + 1, error = %err, "line copied through unchanged");
    }

    let mut output = unnested.lines.join("\n");
    output.push('\n');
    output.push_str(&"=".repeat(80));
    output.push('\n');
    for chunk in unnested.keys.chunks(KEYS_PER_LINE) {
        output.push_str(&chunk.concat());
        output.push('\n');
    }

    match out {
        Some(path) => {
            fs::write(path, &output)
                .with_context(|| format!("failed to write {}", path.display()))?;
            eprintln!("{} {}", "wrote".green().bold(), path.display());
        }
        None => print!("{output}"),
    }
    let hoisted = unnested.lines.iter().filter(|l| is_intermediate(l)).count();
    eprintln!(
        "  {} {} record(s), {} intermediate(s), {} error(s), next {}",
        "→".yellow(),
        unnested.keys.len(),
        hoisted,
        unnested.errors.len(),
        unnested.next
    );
    Ok(())
}

fn cmd_ids(sequence: &str) -> Result<()> {
    let decomp = parse_ids_sequence(sequence)
        .with_context(|| format!("failed to parse `{sequence}`"))?;
    println!("{decomp}");
    println!(
        "  {} {} component(s)",
        "→".cyan(),
        decomp.components.len()
    );
    Ok(())
}

fn cmd_check(file: &Path, strict: bool) -> Result<()> {
    let text = fs::read_to_string(file)
        .with_context(|| format!("failed to read {}", file.display()))?;
    let parsed = parse_records(text.trim_start_matches('\u{feff}'));

    for (line, err) in &parsed.errors {
        println!("{} line {}: {}", "rejected".red(), line + 1, err);
    }
    let mut mismatches = 0;
    for (key, record) in &parsed.records {
        if let Some(arity) = record.arity_issue() {
            mismatches += 1;
            println!(
                "{} {}:{} expects {} component(s)",
                "arity".yellow(),
                key,
                record,
                arity
            );
        }
        if let Err(err) = check_record_line(key, record) {
            tracing::warn!(key = %key, error = %err, "record will not read back");
        }
    }

    println!(
        "{} {} record(s), {} rejected, {} arity mismatch(es)",
        "checked".green().bold(),
        parsed.records.len(),
        parsed.errors.len(),
        mismatches
    );
    if !parsed.errors.is_empty() {
        bail!("{} line(s) rejected", parsed.errors.len());
    }
    if strict && mismatches > 0 {
        bail!("{mismatches} arity mismatch(es)");
    }
    Ok(())
}
