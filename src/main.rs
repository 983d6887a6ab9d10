mod combinators;
mod commands;
mod config;
mod definitions;
mod diagnostics;
mod dom;
mod error;
mod grammar;
mod graph;
mod linkage;
mod offsets;
mod paths;
mod references;
mod scanner;
mod selector;
mod stylesheet;
mod types;
mod unit;

use std::process::ExitCode;

use clap::{Parser, Subcommand};

/// Command-line interface for selgraph.
#[derive(Parser)]
#[command(
    name = "selgraph",
    version,
    about = "Cross-reference graph from HTML id/class usages to CSS selector definitions"
)]
struct Cli {
    /// The subcommand to run.
    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands. Both read JSON on stdin and write JSON to stdout.
#[derive(Subcommand)]
enum Commands {
    /// Build defs and refs for the source unit on stdin
    #[command(name = "build-graph", alias = "graph")]
    BuildGraph,
    /// List the stylesheets and HTML files under the working directory as one unit
    #[command(alias = "scan")]
    Discover,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .format_timestamp(None)
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::BuildGraph => commands::build_graph(),
        Commands::Discover => commands::discover(),
    };

    return match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            diagnostics::print_error(&e);
            ExitCode::FAILURE
        },
    };
}
