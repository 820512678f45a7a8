mod book_cmd;
mod cli;
mod layout_cmd;
mod page_range;
mod shared;
mod words_cmd;

use clap::Parser;
use cli::{Cli, Commands};
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Words {
            ref file,
            ref pages,
            ref layout,
            pretty,
        } => words_cmd::run(file, pages.as_deref(), &layout.params(), pretty),
        Commands::Book {
            ref file,
            ref title,
            ref id,
            ref layout,
            pretty,
        } => book_cmd::run(
            file,
            title.as_deref(),
            id.as_deref(),
            &layout.params(),
            pretty,
        ),
        Commands::Layout {
            ref file,
            ref pages,
            ref layout,
        } => layout_cmd::run(file, pages.as_deref(), &layout.params()),
    };

    if let Err(code) = result {
        std::process::exit(code);
    }
}

/// Log to stderr so stdout stays valid JSON. `RUST_LOG` wins over `-v`.
fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}
