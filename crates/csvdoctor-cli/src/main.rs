//! CSV Doctor CLI - diagnose and fix CSV files.

mod cli;
mod commands;
mod logging;

use clap::Parser;
use cli::{Cli, Commands};
use csvdoctor::DoctorConfig;

fn main() {
    let cli = Cli::parse();

    if let Err(e) = logging::init_logging(cli.verbose, cli.quiet) {
        eprintln!("Warning: {}", e);
    }

    let config = DoctorConfig {
        parallel: !cli.sequential,
        ..DoctorConfig::default()
    };
    let verbose = cli.verbose > 0;

    let result = match cli.command {
        Commands::Analyze { file, json } => commands::analyze::run(file, json, config, verbose),

        Commands::Fix {
            file,
            issues,
            all,
            output,
        } => commands::fix::run(file, issues, all, output, config),

        Commands::Diff { file, issues, all } => commands::diff::run(file, issues, all, config),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
