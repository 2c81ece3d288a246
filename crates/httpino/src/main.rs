mod cli;
mod commands;
mod logging;
mod output;

use clap::Parser;
use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let result = commands::load_store(cli.config.as_deref()).and_then(|store| match cli.command {
        Commands::Read { path, pretty } => commands::read::run(&store, &path, pretty),
        Commands::Write { path, json } => commands::write::run(&store, &path, &json),
        Commands::Hammer {
            path,
            writers,
            readers,
            rounds,
        } => commands::hammer::run(store, &path, writers, readers, rounds),
    });

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
