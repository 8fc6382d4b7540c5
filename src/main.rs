use std::path::PathBuf;

use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};

use statement_summary::cli::{
    handle_config_command, handle_convert_command, handle_init_command, handle_report_command,
    ConvertArgs, ReportArgs,
};
use statement_summary::config::{Settings, StatementPaths};
use statement_summary::logging::init_tracing;

#[derive(Parser)]
#[command(
    name = "stmtsum",
    author = "Kaylee Beyene",
    version,
    about = "Monthly income/expense summaries from payment statements",
    long_about = "stmtsum reads exported payment statements (xlsx, csv, or tables \
                  extracted from PDF), finds the transaction header, and totals \
                  income and expense per calendar month across all files."
)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    /// Use this settings file instead of the one in the config directory
    #[arg(long, global = true, value_name = "FILE")]
    settings: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Summarize statements by month
    #[command(alias = "summary")]
    Report(ReportArgs),

    /// Convert the tables of a PDF into an xlsx sheet
    Convert(ConvertArgs),

    /// Write the default settings file
    Init,

    /// Show current configuration and paths
    Config,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let paths = StatementPaths::new()?;
    let load_settings = || -> Result<Settings> {
        let settings = match &cli.settings {
            Some(path) => Settings::load_from(path)?,
            None => Settings::load_or_create(&paths)?,
        };
        Ok(settings)
    };

    match cli.command {
        Some(Commands::Report(args)) => handle_report_command(&load_settings()?, args)?,
        Some(Commands::Convert(args)) => handle_convert_command(args)?,
        Some(Commands::Init) => handle_init_command(&paths)?,
        Some(Commands::Config) => handle_config_command(&paths, &load_settings()?)?,
        None => {
            println!("stmtsum - Monthly income/expense summaries");
            println!();
            println!("Run 'stmtsum --help' for usage information.");
            println!("Run 'stmtsum report <DIR>' to summarize a folder of statements.");
        }
    }

    Ok(())
}
