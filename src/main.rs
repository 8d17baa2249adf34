mod browser;
mod cli;
mod tui;

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();

    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr)
                .compact(),
        )
        .init();

    let result = match cli.command {
        Commands::Load { file } => cli::load::run(&file),
        Commands::Report {
            filter,
            expand,
            expand_all,
        } => cli::report::run(&filter, &expand, expand_all),
        Commands::Browse { filter } => cli::browse::run(&filter),
        Commands::Saved { search } => cli::saved::list(search.as_deref()),
        Commands::Delete { index } => cli::saved::delete(index),
        Commands::Clear { yes } => cli::saved::clear(yes),
        Commands::Export { output } => cli::export::run(output),
        Commands::Status => cli::status::run(),
        Commands::Config { set } => cli::config::run(&set),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
