//! Output formatting and reporting
//!
//! Human output is colored through `colored`, whose global override is set
//! once in `main`. JSON output is always pretty-printed to stdout.

use crate::OutputFormat;
use colored::Colorize;
use serde::Serialize;
use serde_json::json;
use std::fmt::Write as _;
use std::path::Path;
use tsconf_core::{
    ChangeReport, ChangeReporter, ConfigChange, LoaderResult, PolicyEntry, PolicyTable, TsConfig,
};

/// Reporter printing changes to stderr, leaving stdout for command results
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleReporter;

impl ChangeReporter for ConsoleReporter {
    fn report(&self, report: &ChangeReport, config_path: &Path) {
        eprint!("{}", render_changes(report, config_path, false));
    }
}

/// Render a change report, either as applied changes or as pending ones
pub fn render_changes(report: &ChangeReport, config_path: &Path, pending: bool) -> String {
    let mut out = String::new();
    let file = config_path.display().to_string();

    if !report.suggested.is_empty() {
        let heading = if pending {
            format!("Suggested values missing from {file}:")
        } else {
            format!("Suggested values were added to {file}; they can be changed to fit the project:")
        };
        let _ = writeln!(out, "{}", heading.bold());
        for change in &report.suggested {
            let _ = writeln!(out, "  {} {}", "+".green(), render_change(change));
        }
    }

    if !report.required.is_empty() {
        let heading = if pending {
            format!("Mandatory changes pending in {file}:")
        } else {
            format!("Mandatory changes were made to {file}:")
        };
        let _ = writeln!(out, "{}", heading.bold());
        for change in &report.required {
            let _ = writeln!(out, "  {} {}", "!".yellow(), render_change(change));
        }
    }

    out
}

fn render_change(change: &ConfigChange) -> String {
    let mut line = format!("{} = {}", change.option.cyan(), change.value);
    if let Some(reason) = &change.reason {
        let _ = write!(line, " {}", format!("({reason})").dimmed());
    }
    line
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Print the result of `load`
pub fn print_loader_result(result: &LoaderResult, format: OutputFormat) -> anyhow::Result<()> {
    if format == OutputFormat::Json {
        return print_json(result);
    }

    let Some(config_path) = &result.config_path else {
        println!("{}", no_config_message());
        return Ok(());
    };

    println!("{} {}", "Config:".bold(), config_path.display());
    match &result.base_url {
        Some(base_url) => println!("{} {base_url}", "baseUrl:".bold()),
        None => println!("{} {}", "baseUrl:".bold(), "(none)".dimmed()),
    }
    match &result.paths {
        Some(paths) if !paths.is_empty() => {
            println!("{}", "paths:".bold());
            for (pattern, targets) in paths {
                println!("  {pattern} -> {}", targets.join(", "));
            }
        }
        _ => println!("{} {}", "paths:".bold(), "(none)".dimmed()),
    }
    Ok(())
}

/// Print that no config governs `start`
pub fn print_no_config(start: &Path, format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => print_json(&json!({ "configPath": null })),
        OutputFormat::Human => {
            println!("{} (searched from {})", no_config_message(), start.display());
            Ok(())
        }
    }
}

fn no_config_message() -> String {
    "No tsconfig.json or jsconfig.json found".yellow().to_string()
}

/// Print the pending changes found by `check`
pub fn print_check(
    config_path: &Path,
    report: &ChangeReport,
    format: OutputFormat,
) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => print_json(&json!({
            "configPath": config_path,
            "changes": report,
        })),
        OutputFormat::Human => {
            if report.is_empty() {
                println!(
                    "{} {} satisfies the policy",
                    "ok".green().bold(),
                    config_path.display()
                );
            } else {
                print!("{}", render_changes(report, config_path, true));
                println!(
                    "{} pending change(s); run `tsconf load` to apply them",
                    report.len()
                );
            }
            Ok(())
        }
    }
}

/// Print a resolved config
pub fn print_config(
    config_path: &Path,
    config: &TsConfig,
    format: OutputFormat,
) -> anyhow::Result<()> {
    if format == OutputFormat::Human {
        println!("{} {}", "Resolved config:".bold(), config_path.display());
    }
    println!("{}", config.to_pretty_json()?);
    Ok(())
}

/// Print a policy table
pub fn print_policy(policy: &PolicyTable, format: OutputFormat) -> anyhow::Result<()> {
    if format == OutputFormat::Json {
        return print_json(policy);
    }

    println!("{}", "Compiler options:".bold());
    for (option, entry) in policy.desired_options() {
        match entry {
            PolicyEntry::Suggested { value } => {
                println!("  {:<10} {} = {value}", "suggested".green(), option.cyan());
            }
            PolicyEntry::Required { value, reason } => {
                println!(
                    "  {:<10} {} = {value} {}",
                    "required".yellow(),
                    option.cyan(),
                    format!("({reason})").dimmed()
                );
            }
        }
    }
    println!(
        "{} {}",
        "Default include:".bold(),
        policy.default_include().join(", ")
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn report() -> ChangeReport {
        ChangeReport {
            suggested: vec![ConfigChange {
                option: "strict".to_string(),
                value: json!(true),
                reason: None,
            }],
            required: vec![ConfigChange {
                option: "jsx".to_string(),
                value: json!("react-jsx"),
                reason: Some("the automatic React JSX runtime is used".to_string()),
            }],
        }
    }

    #[test]
    fn test_render_applied_changes() {
        colored::control::set_override(false);
        let rendered = render_changes(&report(), Path::new("/repo/tsconfig.json"), false);

        assert_eq!(
            rendered,
            "Suggested values were added to /repo/tsconfig.json; they can be changed to fit the project:\n  \
+ strict = true\n\
Mandatory changes were made to /repo/tsconfig.json:\n  \
! jsx = \"react-jsx\" (the automatic React JSX runtime is used)\n"
        );
    }

    #[test]
    fn test_render_pending_changes_skips_empty_sections() {
        colored::control::set_override(false);
        let mut report = report();
        report.suggested.clear();

        let rendered = render_changes(&report, Path::new("/repo/tsconfig.json"), true);

        assert!(rendered.starts_with("Mandatory changes pending in /repo/tsconfig.json:"));
        assert!(!rendered.contains("Suggested"));
    }

    #[test]
    fn test_render_empty_report() {
        let rendered = render_changes(&ChangeReport::default(), Path::new("/x"), false);
        assert!(rendered.is_empty());
    }
}
