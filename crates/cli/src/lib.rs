pub mod commands;
pub mod remote;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use crate::commands::browse::BrowseArgs;

#[derive(Debug, Parser)]
#[command(
    name = "caddie",
    about = "Golf club catalog and bag builder CLI",
    long_about = "Browse the club catalog, build a bag, find loft gaps, and manage the catalog store.",
    after_help = "Examples:\n  caddie migrate\n  caddie seed\n  \
                  caddie browse --category Wedge --sort price-asc\n  \
                  caddie lofts 46 56 --save\n  caddie bag 1101 1501"
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Apply pending database migrations and return structured status output")]
    Migrate,
    #[command(about = "Replace the stored catalog with the bundled or a given JSON catalog")]
    Seed {
        #[arg(long, help = "Catalog JSON file to load instead of the bundled catalog")]
        file: Option<PathBuf>,
    },
    #[command(about = "Inspect effective configuration values with source attribution")]
    Config,
    #[command(about = "Filter, sort and page through the club catalog")]
    Browse(BrowseArgs),
    #[command(about = "Show or save the lofts of clubs you already own, with gap targets")]
    Lofts {
        #[arg(help = "Lofts in degrees, e.g. 46 or 10.5°")]
        values: Vec<String>,
        #[arg(long, help = "Persist the given lofts as your current clubs")]
        save: bool,
    },
    #[command(about = "Build a bag from variant ids and report its loft gaps")]
    Bag {
        #[arg(required = true, help = "Variant ids to add, in order")]
        variant_ids: Vec<i64>,
    },
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .compact()
        .try_init();
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();
    init_logging();

    let result = match cli.command {
        Command::Migrate => commands::migrate::run(),
        Command::Seed { file } => commands::seed::run(file.as_deref()),
        Command::Config => commands::config::run(),
        Command::Browse(args) => commands::browse::run(&args),
        Command::Lofts { values, save } => commands::lofts::run(&values, save),
        Command::Bag { variant_ids } => commands::bag::run(&variant_ids),
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}
