//! `dotport`: the DOT transportation data portal from the terminal.

use clap::Parser;
use colored::Colorize;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

mod cli;
mod commands;
mod config;
mod context;
mod datasets;
mod output;

use cli::{Cli, Commands};
use context::Context;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(err) = run(cli).await {
        eprintln!("{} {:#}", "✗".red(), err);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let ctx = Context::new(&cli)?;

    match cli.command {
        Commands::Dashboard => commands::dashboard::run(&ctx).await,
        Commands::Browse(args) => commands::browse::run(&ctx, args).await,
        Commands::List(args) => commands::records::list(&ctx, args).await,
        Commands::View(args) => commands::records::view(&ctx, args).await,
        Commands::Create(args) => commands::records::create(&ctx, args).await,
        Commands::Edit(args) => commands::records::edit(&ctx, args).await,
        Commands::Delete(args) => commands::records::delete(&ctx, args).await,
        Commands::Config(cmd) => commands::config::execute(&ctx, cmd).await,
    }
}

/// Diagnostics go to stderr so piped table/JSON output stays clean.
fn init_tracing(verbose: bool) {
    let default_filter = if verbose {
        "dotport=debug,dotport_sdk=debug,dotport_core=debug"
    } else {
        "warn"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();
}
