// Copyright (C) 2024-2025 Fred Clausen and the ratatui project contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! # xtask - Project Automation
//!
//! Developer commands for the demand matrix workspace.
//!
//! - `cargo xtask ci`: lint, build and test everything
//! - `cargo xtask sample-dataset`: write a deterministic dataset envelope
//!   for running the server locally
//! - `cargo xtask validate-dataset <path>`: run structure diagnostics on an
//!   envelope file

#![deny(
    clippy::pedantic,
    //clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]

use std::{
    fmt::Debug,
    io,
    path::{Path, PathBuf},
    process::Output,
    vec,
};

use cargo_metadata::MetadataCommand;
use clap::{Parser, Subcommand};
use clap_verbosity_flag::{InfoLevel, Verbosity};
use color_eyre::{
    eyre::{eyre, Context},
    Result,
};
use demand_matrix::{validate_structure, StructureReport};
use demand_matrix_api::{CapacityEntry, DatasetEnvelope};
use demand_matrix_domain::{
    DataPoint, DemandDataset, MonthInfo, MonthKey, ReferenceEntry, SkillName, StaffRef,
    TaskAssignment,
};
use duct::cmd;
use std::collections::BTreeSet;
use time::Month;
use tracing::level_filters::LevelFilter;
use tracing_log::AsTrace;

fn main() -> Result<()> {
    color_eyre::install()?;
    let args = Args::parse();
    tracing_subscriber::fmt()
        .with_max_level(args.log_level())
        .without_time()
        .init();

    match args.run() {
        Ok(()) => (),
        Err(err) => {
            tracing::error!("{err}");
            std::process::exit(1);
        }
    }
    Ok(())
}

#[derive(Debug, Parser)]
#[command(bin_name = "cargo xtask", styles = clap_cargo::style::CLAP_STYLING)]
struct Args {
    #[command(subcommand)]
    command: Command,

    #[command(flatten)]
    verbosity: Verbosity<InfoLevel>,
}

impl Args {
    fn run(self) -> Result<()> {
        self.command.run()
    }

    fn log_level(&self) -> LevelFilter {
        self.verbosity.log_level_filter().as_trace()
    }
}

#[derive(Clone, Debug, Subcommand)]
enum Command {
    /// Run CI checks (lint, build, test)
    CI,

    /// Build the project
    #[command(visible_alias = "b")]
    Build,

    /// Run cargo check
    #[command(visible_alias = "c")]
    Check,

    /// Lint formatting, typos, clippy, and docs
    #[command(visible_alias = "l")]
    Lint,

    /// Run clippy on the project
    #[command(visible_alias = "cl")]
    LintClippy,

    /// Check documentation for errors and warnings
    #[command(visible_alias = "d")]
    LintDocs,

    /// Check for formatting issues in the project
    #[command(visible_alias = "lf")]
    LintFormatting,

    /// Check for typos in the project
    #[command(visible_alias = "lt")]
    LintTypos,

    /// Fix clippy warnings in the project
    #[command(visible_alias = "fc")]
    FixClippy,

    /// Fix formatting issues in the project
    #[command(visible_alias = "fmt")]
    FixFormatting,

    /// Fix typos in the project
    #[command(visible_alias = "typos")]
    FixTypos,

    /// Run tests
    #[command(visible_alias = "t")]
    Test,

    /// Run doc tests
    #[command(visible_alias = "td")]
    TestDocs,

    /// Run lib tests
    #[command(visible_alias = "tl")]
    TestLibs,

    /// Write a deterministic sample dataset envelope
    #[command(visible_alias = "sd")]
    SampleDataset {
        /// Where to write the envelope JSON
        #[arg(short, long, default_value = "sample-dataset.json")]
        output: PathBuf,

        /// Number of months on the month axis
        #[arg(long, default_value_t = 6)]
        months: usize,

        /// First month of the axis (`YYYY-MM`)
        #[arg(long, default_value = "2026-01")]
        start: String,
    },

    /// Run structure diagnostics on a dataset envelope file
    #[command(visible_alias = "vd")]
    ValidateDataset {
        /// The envelope JSON file to check
        path: PathBuf,
    },
}

impl Command {
    fn run(self) -> Result<()> {
        match self {
            Self::CI => ci(),
            Self::Build => build(),
            Self::Check => check(),
            Self::Lint => lint(),
            Self::LintClippy => lint_clippy(),
            Self::LintDocs => lint_docs(),
            Self::LintFormatting => lint_format(),
            Self::LintTypos => lint_typos(),
            Self::FixClippy => fix_clippy(),
            Self::FixFormatting => fix_format(),
            Self::FixTypos => fix_typos(),
            Self::Test => test(),
            Self::TestDocs => test_docs(),
            Self::TestLibs => test_libs(),
            Self::SampleDataset {
                output,
                months,
                start,
            } => sample_dataset(&output, months, &start),
            Self::ValidateDataset { path } => validate_dataset(&path),
        }
    }
}

/// Run CI checks (lint, build, test)
fn ci() -> Result<()> {
    lint()?;
    build()?;
    test()?;
    Ok(())
}

/// Build the project
fn build() -> Result<()> {
    run_cargo(vec!["build", "--all-targets", "--all-features"])
}

/// Run cargo check
fn check() -> Result<()> {
    run_cargo(vec!["check", "--all-targets", "--all-features"])
}

/// Lint formatting, typos, clippy, and docs
fn lint() -> Result<()> {
    lint_clippy()?;
    lint_docs()?;
    lint_format()?;
    lint_typos()
}

/// Run clippy on the project
fn lint_clippy() -> Result<()> {
    run_cargo(vec![
        "clippy",
        "--all-targets",
        "--all-features",
        "--",
        "-D",
        "warnings",
    ])
}

/// Fix clippy warnings in the project
fn fix_clippy() -> Result<()> {
    run_cargo(vec![
        "clippy",
        "--all-targets",
        "--all-features",
        "--fix",
        "--allow-dirty",
        "--allow-staged",
        "--",
        "-D",
        "warnings",
    ])
}

/// Check that docs build without errors using docs.rs-equivalent flags
fn lint_docs() -> Result<()> {
    let meta = MetadataCommand::new()
        .exec()
        .wrap_err("failed to get cargo metadata")?;

    for package in meta.workspace_default_packages() {
        cmd(
            "cargo",
            [
                "doc",
                "--no-deps",
                "--all-features",
                "--package",
                &package.name,
            ],
        )
        .env_remove("CARGO")
        .env("RUSTUP_TOOLCHAIN", "nightly")
        .env("RUSTDOCFLAGS", "--cfg docsrs -D warnings")
        .run_with_trace()?;
    }

    Ok(())
}

/// Lint formatting issues in the project
fn lint_format() -> Result<()> {
    run_cargo_nightly(vec!["fmt", "--all", "--check"])
}

/// Fix formatting issues in the project
fn fix_format() -> Result<()> {
    run_cargo_nightly(vec!["fmt", "--all"])
}

/// Check for typos in the project using [typos-cli](https://github.com/crate-ci/typos/)
fn lint_typos() -> Result<()> {
    cmd!("typos").run_with_trace()?;
    Ok(())
}

/// Fix typos in the project
fn fix_typos() -> Result<()> {
    cmd!("typos", "-w").run_with_trace()?;
    Ok(())
}

/// Run lib tests and doc tests
fn test() -> Result<()> {
    test_libs()?;
    test_docs()?; // run last because it's slow
    Ok(())
}

/// Run doc tests for the workspace's default packages
fn test_docs() -> Result<()> {
    run_cargo(vec!["test", "--doc", "--all-features"])
}

/// Run lib tests for the workspace's default packages
fn test_libs() -> Result<()> {
    run_cargo(vec!["test", "--all-targets", "--all-features"])
}

/// Run a cargo subcommand with the default toolchain
fn run_cargo(args: Vec<&str>) -> Result<()> {
    cmd("cargo", args).run_with_trace()?;
    Ok(())
}

/// Run a cargo subcommand with the nightly toolchain
fn run_cargo_nightly(args: Vec<&str>) -> Result<()> {
    cmd("cargo", args)
        // CARGO env var is set because we're running in a cargo subcommand
        .env_remove("CARGO")
        .env("RUSTUP_TOOLCHAIN", "nightly")
        .run_with_trace()?;
    Ok(())
}

const SAMPLE_SKILLS: [&str; 4] = ["Audit", "Bookkeeping", "Payroll", "Tax Prep"];

const SAMPLE_CLIENTS: [(&str, &str); 5] = [
    ("c1", "Acme Corp"),
    ("c2", "Globex"),
    ("c3", "Initech"),
    ("c4", "Umbrella"),
    ("c5", "Hooli"),
];

const SAMPLE_STAFF: [(&str, &str); 3] = [
    ("A", "Alice Adams"),
    ("B", "Bob Brown"),
    ("C", "Carol Chen"),
];

const SAMPLE_HOURS: [f64; 9] = [2.0, 2.5, 3.0, 3.5, 4.0, 5.0, 6.0, 7.5, 8.0];

const SAMPLE_CAPACITY_HOURS: f64 = 20.0;

/// Builds the month axis starting at `start`.
fn sample_months(start: &str, count: usize) -> Result<Vec<MonthInfo>> {
    let (mut year, mut month): (i32, Month) = MonthKey::new(start)
        .parse()
        .wrap_err_with(|| format!("invalid start month '{start}'"))?;

    let mut months: Vec<MonthInfo> = Vec::with_capacity(count);
    for _ in 0..count {
        let name: String = month.to_string();
        let label: String = format!("{} {year}", name.get(..3).unwrap_or(&name));
        let key: String = format!("{year:04}-{:02}", u8::from(month));
        months.push(MonthInfo::new(&key, &label));

        if month == Month::December {
            year += 1;
        }
        month = month.next();
    }
    Ok(months)
}

/// Rotates through every preferred staff reference shape the fetch layer
/// produces, including unassigned tasks.
fn sample_staff_ref(seed: usize) -> Option<StaffRef> {
    match seed % 4 {
        0 => Some(StaffRef::plain(SAMPLE_STAFF[0].0)),
        1 => Some(StaffRef::structured(
            Some(&format!(" {} ", SAMPLE_STAFF[1].0.to_lowercase())),
            Some(SAMPLE_STAFF[1].1),
        )),
        2 => Some(StaffRef::structured(
            Some(SAMPLE_STAFF[2].0),
            Some(SAMPLE_STAFF[2].1),
        )),
        _ => None,
    }
}

/// Builds a deterministic envelope with a sparse skill × month grid.
fn build_sample_envelope(start: &str, month_count: usize) -> Result<DatasetEnvelope> {
    let months: Vec<MonthInfo> = sample_months(start, month_count)?;
    let skills: BTreeSet<SkillName> = SAMPLE_SKILLS.iter().map(|s| SkillName::new(s)).collect();

    let mut data_points: Vec<DataPoint> = Vec::new();
    let mut capacity: Vec<CapacityEntry> = Vec::new();
    let mut task_number: usize = 0;

    for (m, month) in months.iter().enumerate() {
        for (s, skill) in SAMPLE_SKILLS.iter().enumerate() {
            capacity.push(CapacityEntry {
                skill: (*skill).to_string(),
                month: month.key.to_string(),
                hours: SAMPLE_CAPACITY_HOURS,
            });

            if (m + 2 * s) % 5 == 4 {
                continue;
            }

            let tasks: Vec<TaskAssignment> = (0..=((m + s) % 3))
                .map(|k| {
                    task_number += 1;
                    let (client_id, client_name) =
                        SAMPLE_CLIENTS[(m + s + k) % SAMPLE_CLIENTS.len()];
                    TaskAssignment::new(
                        &format!("task-{task_number:04}"),
                        client_id,
                        client_name,
                        SAMPLE_HOURS[(m * 3 + s * 5 + k * 7) % SAMPLE_HOURS.len()],
                        sample_staff_ref(m + s + k),
                    )
                })
                .collect();

            data_points.push(DataPoint::new(skill, month.key.as_str(), tasks));
        }
    }

    Ok(DatasetEnvelope {
        dataset: DemandDataset::new(months, skills, data_points),
        available_clients: SAMPLE_CLIENTS
            .iter()
            .map(|(id, name)| ReferenceEntry::new(id, name))
            .collect(),
        available_preferred_staff: SAMPLE_STAFF
            .iter()
            .map(|(id, name)| ReferenceEntry::new(id, name))
            .collect(),
        capacity,
    })
}

/// Write a deterministic sample dataset envelope
fn sample_dataset(output: &Path, months: usize, start: &str) -> Result<()> {
    let envelope: DatasetEnvelope = build_sample_envelope(start, months)?;
    let json: String =
        serde_json::to_string_pretty(&envelope).wrap_err("failed to serialize sample dataset")?;
    std::fs::write(output, json)
        .wrap_err_with(|| format!("failed to write {}", output.display()))?;

    tracing::info!(
        "wrote {} data points over {} months to {}",
        envelope.dataset.data_points.len(),
        envelope.dataset.months.len(),
        output.display()
    );
    Ok(())
}

/// Run structure diagnostics on a dataset envelope file
fn validate_dataset(path: &Path) -> Result<()> {
    let json: String = std::fs::read_to_string(path)
        .wrap_err_with(|| format!("failed to read {}", path.display()))?;
    let envelope: DatasetEnvelope = DatasetEnvelope::from_json(&json)?;
    let report: StructureReport = validate_structure(&envelope.dataset);

    for warning in &report.warnings {
        tracing::warn!("{warning}");
    }
    for issue in &report.issues {
        tracing::error!("{issue}");
    }

    if report.is_valid {
        tracing::info!(
            "{} is structurally valid ({} warnings)",
            path.display(),
            report.warnings.len()
        );
        Ok(())
    } else {
        Err(eyre!(
            "{} has {} structural issues",
            path.display(),
            report.issues.len()
        ))
    }
}

trait ExpressionExt {
    /// Run the command and log the command being run
    fn run_with_trace(&self) -> io::Result<Output>;
}

impl ExpressionExt for duct::Expression {
    fn run_with_trace(&self) -> io::Result<Output> {
        tracing::info!("running command: {:?}", self);
        self.run().inspect_err(|_| {
            // The command that was run may have scrolled off the screen, so repeat it here
            tracing::error!("failed to run command: {:?}", self);
        })
    }
}
