//! Suite run command.

use crate::OutputFormat;
use anyhow::{Context, Result};
use chrono::Local;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use tat_core::{cac_tat_suite, run_suite, Config, RunContext, SuiteOptions, SuiteReport};

/// Arguments of `tat run`.
pub struct RunArgs {
    pub filter: Option<String>,
    pub offline: bool,
    pub config: Option<PathBuf>,
    pub site: Option<PathBuf>,
    pub fixtures: Option<PathBuf>,
    pub format: OutputFormat,
}

/// Run the suite and report; fails if any scenario failed.
pub fn run(args: RunArgs) -> Result<()> {
    let mut config = match &args.config {
        Some(path) => {
            if !path.is_file() {
                anyhow::bail!("Config file {} not found", path.display());
            }
            Config::load(path)
                .with_context(|| format!("Failed to load config from {}", path.display()))?
        }
        None => {
            let cwd = std::env::current_dir().context("Failed to read current directory")?;
            Config::load_from_dir(&cwd).context("Failed to load tat.toml")?
        }
    };
    if args.site.is_some() {
        config.fixtures.site = args.site;
    }
    if args.fixtures.is_some() {
        config.fixtures.root = args.fixtures;
    }

    let ctx = RunContext::new(config).context("Failed to prepare the run")?;
    let options = SuiteOptions {
        filter: args.filter,
        offline: args.offline,
    };

    let suite: Vec<_> = cac_tat_suite()
        .into_iter()
        .filter(|s| options.selects(s))
        .collect();
    if suite.is_empty() {
        anyhow::bail!("No scenarios match the filter");
    }

    let started_at = Local::now();
    let report = match args.format {
        OutputFormat::Text => run_with_progress(suite, &ctx, &options)?,
        OutputFormat::Json => run_suite(suite, &ctx, &options, |_| {}),
    };

    match args.format {
        OutputFormat::Text => print_text(&report, &started_at.format("%Y-%m-%d %H:%M:%S").to_string()),
        OutputFormat::Json => {
            let mut value = serde_json::to_value(&report)?;
            if let Some(obj) = value.as_object_mut() {
                obj.insert(
                    "started_at".to_string(),
                    serde_json::Value::String(started_at.to_rfc3339()),
                );
            }
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
    }

    if !report.is_success() {
        anyhow::bail!("{} of {} scenarios failed", report.failed, report.results.len());
    }
    Ok(())
}

fn run_with_progress(
    suite: Vec<tat_core::Scenario>,
    ctx: &RunContext,
    options: &SuiteOptions,
) -> Result<SuiteReport> {
    let pb = ProgressBar::new(suite.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("█▓▒░  "),
    );

    let report = run_suite(suite, ctx, options, |result| {
        if !result.success {
            pb.println(format!("  {} {}", style("×").red(), result.name));
        }
        pb.set_message(result.name.clone());
        pb.inc(1);
    });
    pb.finish_and_clear();
    Ok(report)
}

fn print_text(report: &SuiteReport, started_at: &str) {
    println!();
    println!(
        "{} {}",
        style("Suite Report").bold(),
        style(format!("(run {}, {})", report.run_id, started_at)).dim()
    );
    for result in &report.results {
        let mark = if result.skipped {
            style("-").yellow()
        } else if result.success {
            style("✓").green()
        } else {
            style("×").red()
        };
        println!(
            "  {} {} {}",
            mark,
            result.name,
            style(format!("{}ms", result.elapsed_ms)).dim()
        );
    }

    if report.failed > 0 {
        println!();
        println!("{}", style("Failures:").red().bold());
        for failure in report.failures() {
            println!("  {} {}", style("×").red(), style(&failure.name).bold());
            println!(
                "    {}: {}",
                failure.location(),
                failure.failed_step.as_deref().unwrap_or("(before first step)")
            );
            if let Some(error) = &failure.error {
                println!("    {}", error);
            }
            if let Some(hint) = &failure.hint {
                println!("    {} {}", style("Hint:").cyan(), hint);
            }
        }
    }

    println!();
    println!(
        "  Passed:  {}",
        style(report.passed).green()
    );
    println!(
        "  Failed:  {}",
        if report.failed > 0 {
            style(report.failed).red()
        } else {
            style(report.failed).green()
        }
    );
    println!("  Skipped: {}", style(report.skipped).yellow());
}
