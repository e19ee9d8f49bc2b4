//! Command-line front end over the normalization pipeline.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use tracing_subscriber::filter::LevelFilter;

use linkernorm::{LabelMode, LinkerRecord, normalize};

#[derive(Parser, Debug)]
#[command(version, about = "Normalize a MOF linker SMILES to its deprotonated anion")]
pub struct Cli {
    /// SMILES string of one neutral linker.
    #[arg(
        long,
        value_name = "SMILES",
        required_unless_present = "input",
        conflicts_with = "input"
    )]
    pub smiles: Option<String>,

    /// File with one SMILES per line; blank lines and `#` comments are
    /// skipped.
    #[arg(long, value_name = "PATH")]
    pub input: Option<PathBuf>,

    /// Maximum number of acidic protons to remove (default: all detected).
    #[arg(long, value_name = "K")]
    pub remove_k: Option<usize>,

    /// Core label notation to emit.
    #[arg(long, value_enum, default_value_t = LabelModeArg::Auto)]
    pub label_mode: LabelModeArg,

    /// Emit JSON instead of `field: value` lines.
    #[arg(long)]
    pub json: bool,

    /// Increase log verbosity (-v INFO, -vv DEBUG, -vvv TRACE).
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Silence all log output.
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LabelModeArg {
    Auto,
    Aggregated,
    Ring,
}

impl From<LabelModeArg> for LabelMode {
    fn from(arg: LabelModeArg) -> Self {
        match arg {
            LabelModeArg::Auto => LabelMode::Auto,
            LabelModeArg::Aggregated => LabelMode::Aggregated,
            LabelModeArg::Ring => LabelMode::Ring,
        }
    }
}

/// Logs go to stderr so stdout stays clean for records.
pub fn init_logging(verbose: u8, quiet: bool) {
    let level = if quiet {
        LevelFilter::OFF
    } else {
        match verbose {
            0 => LevelFilter::WARN,
            1 => LevelFilter::INFO,
            2 => LevelFilter::DEBUG,
            _ => LevelFilter::TRACE,
        }
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}

pub fn run(cli: Cli) -> ExitCode {
    let mode = LabelMode::from(cli.label_mode);
    if let Some(path) = &cli.input {
        run_batch(path, cli.remove_k, mode, cli.json)
    } else {
        // clap enforces --smiles whenever --input is absent.
        let smiles = cli.smiles.as_deref().unwrap_or_default();
        run_single(smiles, cli.remove_k, mode, cli.json)
    }
}

fn run_single(smiles: &str, remove_k: Option<usize>, mode: LabelMode, json: bool) -> ExitCode {
    match normalize(smiles, remove_k, mode) {
        Ok(record) => {
            if json {
                println!("{}", to_json_pretty(&record));
            } else {
                println!("{}", render_plain(&record));
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("ERROR: {e}");
            ExitCode::from(2)
        }
    }
}

/// Process a whole file, one SMILES per line. A failing line is reported
/// and skipped; the exit code says whether anything failed.
fn run_batch(path: &Path, remove_k: Option<usize>, mode: LabelMode, json: bool) -> ExitCode {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) => {
            eprintln!("ERROR: {}: {e}", path.display());
            return ExitCode::from(2);
        }
    };

    let mut failures = 0usize;
    let mut emitted = 0usize;
    for (line_no, line) in text.lines().enumerate() {
        let smiles = line.trim();
        if smiles.is_empty() || smiles.starts_with('#') {
            continue;
        }
        match normalize(smiles, remove_k, mode) {
            Ok(record) => {
                if json {
                    println!("{}", serde_json::to_string(&record).expect("record serializes"));
                } else {
                    if emitted > 0 {
                        println!();
                    }
                    println!("{}", render_plain(&record));
                }
                emitted += 1;
            }
            Err(e) => {
                eprintln!("ERROR: line {}: {e}", line_no + 1);
                failures += 1;
            }
        }
    }

    if failures > 0 {
        ExitCode::from(2)
    } else {
        ExitCode::SUCCESS
    }
}

fn to_json_pretty(record: &LinkerRecord) -> String {
    serde_json::to_string_pretty(record).expect("record serializes")
}

/// `field: value` lines in wire order; an absent label prints as `null`.
fn render_plain(record: &LinkerRecord) -> String {
    format!(
        "removed_H: {}\nstructure: {}\nstandard_id: {}\nhashed_id: {}\nformula: {}\nexact_mass: {}\ncore_label: {}",
        record.removed_h,
        record.structure,
        record.standard_id,
        record.hashed_id,
        record.formula,
        record.exact_mass,
        record.core_label.as_deref().unwrap_or("null"),
    )
}
