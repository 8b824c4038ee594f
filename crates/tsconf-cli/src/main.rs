//! tsconf CLI
//!
//! Command-line interface for locating, resolving and normalizing
//! `tsconfig.json` / `jsconfig.json` files

mod commands;
mod output;

use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{Shell, generate};
use colored::Colorize;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use tsconf_core::SuggestionRule;

#[derive(Parser)]
#[command(name = "tsconf")]
#[command(about = "Locate, resolve and normalize tsconfig.json / jsconfig.json files")]
#[command(version = tsconf_core::VERSION)]
#[command(
    long_about = "tsconf finds the tsconfig.json or jsconfig.json that governs a directory,\n\
flattens its `extends` chain, and fills in or enforces compiler options from a policy table.\n\
\n\
Examples:\n  \
tsconf load                  # Normalize the config for the current directory\n  \
tsconf check app/            # Show pending changes without writing\n  \
tsconf show --format json    # Print the resolved config\n  \
tsconf policy                # Print the active policy table"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// TOML policy file replacing the built-in policy
    #[arg(
        long,
        global = true,
        env = "TSCONF_POLICY",
        help = "Path to a TOML policy file (default: built-in policy)"
    )]
    policy: Option<PathBuf>,

    /// When a suggested option counts as already set
    #[arg(
        long,
        global = true,
        value_enum,
        default_value = "top-level-key-check",
        help = "Rule deciding whether a suggested option applies"
    )]
    suggestion_rule: RuleArg,

    /// Output format
    #[arg(long, global = true, value_enum, default_value = "human")]
    format: OutputFormat,

    /// Verbose output (can be used multiple times for increased verbosity)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    /// Generate shell completion script
    #[arg(
        long,
        value_enum,
        help = "Generate completion script for specified shell"
    )]
    generate_completion: Option<Shell>,
}

#[derive(Subcommand)]
enum Commands {
    /// Locate, resolve and reconcile the config, writing it back if needed
    Load {
        /// Directory to start from, or an explicit config file
        #[arg(help = "Starting directory or config file (default: current directory)")]
        path: Option<PathBuf>,
    },

    /// Report the changes `load` would make without writing anything
    Check {
        /// Directory to start from, or an explicit config file
        #[arg(help = "Starting directory or config file (default: current directory)")]
        path: Option<PathBuf>,
    },

    /// Print the resolved config with its `extends` chain merged in
    Show {
        /// Directory to start from, or an explicit config file
        #[arg(help = "Starting directory or config file (default: current directory)")]
        path: Option<PathBuf>,
    },

    /// Print the active policy table
    Policy,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable output with colors
    Human,
    /// JSON format for programmatic consumption
    Json,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum RuleArg {
    /// Skip options present as top-level keys or in compilerOptions
    TopLevelKeyCheck,
    /// Skip options present in compilerOptions only
    CompilerOptionsOnly,
}

impl From<RuleArg> for SuggestionRule {
    fn from(rule: RuleArg) -> Self {
        match rule {
            RuleArg::TopLevelKeyCheck => SuggestionRule::TopLevelKeyCheck,
            RuleArg::CompilerOptionsOnly => SuggestionRule::CompilerOptionsOnly,
        }
    }
}

/// How a successful command finished
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Clean,
    ChangesPending,
}

impl From<Outcome> for ExitCode {
    fn from(outcome: Outcome) -> Self {
        match outcome {
            Outcome::Clean => ExitCode::SUCCESS,
            Outcome::ChangesPending => ExitCode::from(1),
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Handle shell completion generation
    if let Some(shell) = cli.generate_completion {
        generate_completion_script(shell);
        return ExitCode::SUCCESS;
    }

    // Initialize colored output
    let use_colors = !cli.no_color && std::env::var_os("NO_COLOR").is_none();
    colored::control::set_override(use_colors);

    // Initialize tracing based on verbosity
    let log_level = match cli.verbose {
        0 => "tsconf=warn",
        1 => "tsconf=info",
        2 => "tsconf=debug",
        _ => "tsconf=trace",
    };
    tsconf_core::init_tracing_with(log_level);

    match run_command(cli) {
        Ok(outcome) => outcome.into(),
        Err(e) => {
            tracing::debug!("Command failed: {e:?}");
            eprintln!("{} {e:#}", "error:".red().bold());
            ExitCode::from(2)
        }
    }
}

fn generate_completion_script(shell: Shell) {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    generate(shell, &mut cmd, name, &mut io::stdout());
}

fn run_command(cli: Cli) -> anyhow::Result<Outcome> {
    let settings = commands::Settings {
        policy: cli.policy,
        rule: cli.suggestion_rule.into(),
        format: cli.format,
    };
    let start = |path: Option<PathBuf>| path.unwrap_or_else(|| PathBuf::from("."));

    match cli.command {
        Some(Commands::Load { path }) => commands::load_command(&start(path), &settings),
        Some(Commands::Check { path }) => commands::check_command(&start(path), &settings),
        Some(Commands::Show { path }) => commands::show_command(&start(path), &settings),
        Some(Commands::Policy) => commands::policy_command(&settings),
        None => {
            // No subcommand provided, show help
            let mut cmd = Cli::command();
            cmd.print_help()?;
            Ok(Outcome::Clean)
        }
    }
}
