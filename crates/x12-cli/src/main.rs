//! # x12-cli
//!
//! Command-line interface for the X12 EDI processing engine: parse,
//! validate, regenerate, and acknowledge EDI files.

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand, ValueEnum};
use x12::{Engine, Severity, StrictnessLevel, ValidationProfile, ValidationReport};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CliExitCode {
    Success = 0,
    Warnings = 1,
    Errors = 2,
}

impl CliExitCode {
    fn as_exit_code(self) -> ExitCode {
        ExitCode::from(self as u8)
    }

    fn from_report(report: &ValidationReport) -> Self {
        if report.error_count() > 0 {
            Self::Errors
        } else if report.warning_count() > 0 {
            Self::Warnings
        } else {
            Self::Success
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ProfileArg {
    /// Format and envelope checks only
    Base,
    /// HIPAA 5010 semantic rules
    Hipaa,
}

impl ProfileArg {
    fn to_profile(self, strict: bool) -> ValidationProfile {
        let profile = match self {
            ProfileArg::Base => ValidationProfile::default(),
            ProfileArg::Hipaa => ValidationProfile::hipaa_5010(),
        };
        if strict {
            profile.with_strictness(StrictnessLevel::Strict)
        } else {
            profile
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum AckKindArg {
    /// 997 Functional Acknowledgment
    #[value(name = "997")]
    Ack997,
    /// 999 Implementation Acknowledgment
    #[value(name = "999")]
    Ack999,
}

#[derive(Parser)]
#[command(name = "x12")]
#[command(about = "X12 EDI processing engine CLI")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse an EDI file and print the envelope tree
    Parse {
        /// Input file path
        input: PathBuf,
    },

    /// Validate an EDI file and print findings
    Validate {
        /// Input file path
        input: PathBuf,

        /// Validation profile
        #[arg(short, long, value_enum, default_value = "base")]
        profile: ProfileArg,

        /// Escalate warnings to errors
        #[arg(long)]
        strict: bool,
    },

    /// Re-generate an EDI file from its parsed tree
    Generate {
        /// Input file path
        input: PathBuf,

        /// Output file path (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Produce a 997/999 acknowledgment for an EDI file
    Ack {
        /// Input file path
        input: PathBuf,

        /// Acknowledgment kind
        #[arg(short, long, value_enum, default_value = "997")]
        kind: AckKindArg,

        /// Validation profile used to derive outcomes
        #[arg(short, long, value_enum, default_value = "hipaa")]
        profile: ProfileArg,

        /// Output file path (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(code) => code.as_exit_code(),
        Err(e) => {
            eprintln!("error: {e:#}");
            CliExitCode::Errors.as_exit_code()
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<CliExitCode> {
    let engine = Engine::new();

    match cli.command {
        Commands::Parse { input } => {
            let parsed = parse_file(&engine, &input)?;
            print_tree(&parsed.interchange);
            for warning in &parsed.warnings {
                println!("warning [{}]: {}", warning.kind.code(), warning.message);
            }
            Ok(if parsed.warnings.is_empty() {
                CliExitCode::Success
            } else {
                CliExitCode::Warnings
            })
        }

        Commands::Validate {
            input,
            profile,
            strict,
        } => {
            let parsed = parse_file(&engine, &input)?;
            let report = engine.validate(&parsed, &profile.to_profile(strict));
            print_report(&report);
            Ok(CliExitCode::from_report(&report))
        }

        Commands::Generate { input, output } => {
            let parsed = parse_file(&engine, &input)?;
            let bytes = engine
                .generate(&parsed.interchange, None)
                .context("failed to generate EDI")?;
            write_output(output.as_deref(), &bytes)?;
            Ok(CliExitCode::Success)
        }

        Commands::Ack {
            input,
            kind,
            profile,
            output,
        } => {
            let parsed = parse_file(&engine, &input)?;
            let report = engine.validate(&parsed, &profile.to_profile(false));
            let ack = match kind {
                AckKindArg::Ack997 => engine.ack997(&parsed.interchange, &report),
                AckKindArg::Ack999 => engine.ack999(&parsed.interchange, &report),
            };
            let bytes = engine
                .generate(&ack, None)
                .context("failed to generate acknowledgment")?;
            write_output(output.as_deref(), &bytes)?;
            Ok(CliExitCode::from_report(&report))
        }
    }
}

fn parse_file(engine: &Engine, input: &PathBuf) -> anyhow::Result<x12::ParseOutput> {
    let bytes = fs::read(input).with_context(|| format!("cannot read {}", input.display()))?;
    if bytes.is_empty() {
        bail!("{} is empty", input.display());
    }
    engine
        .parse(&bytes)
        .with_context(|| format!("cannot parse {}", input.display()))
}

fn write_output(output: Option<&std::path::Path>, bytes: &[u8]) -> anyhow::Result<()> {
    match output {
        Some(path) => fs::write(path, bytes)
            .with_context(|| format!("cannot write {}", path.display()))?,
        None => println!("{}", String::from_utf8_lossy(bytes)),
    }
    Ok(())
}

fn print_tree(interchange: &x12::Interchange) {
    println!(
        "interchange {} -> {} (control {}, {} group(s))",
        interchange.sender_id.trim(),
        interchange.receiver_id.trim(),
        interchange.control_number,
        interchange.functional_groups.len()
    );
    for group in &interchange.functional_groups {
        println!(
            "  group {} control {} version {} ({} transaction(s))",
            group.functional_id_code,
            group.control_number,
            group.version,
            group.transactions.len()
        );
        for txn in &group.transactions {
            println!(
                "    transaction {} control {} ({} segment(s))",
                txn.transaction_set_id,
                txn.control_number,
                txn.segment_count()
            );
            print_loop(&txn.root, 3);
        }
    }
}

fn print_loop(node: &x12::Loop, depth: usize) {
    let indent = "  ".repeat(depth);
    for seg in &node.segments {
        println!("{indent}{}", seg.id);
    }
    for child in &node.loops {
        println!("{indent}loop {}", child.id);
        print_loop(child, depth + 1);
    }
}

fn print_report(report: &ValidationReport) {
    for finding in &report.findings {
        let level = match finding.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Info => "info",
        };
        println!(
            "{level} [{}] {} at {}",
            finding.code, finding.message, finding.location
        );
    }
    println!(
        "{} error(s), {} warning(s)",
        report.error_count(),
        report.warning_count()
    );
}
