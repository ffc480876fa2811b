use clap::Parser;
use tidyfold::cli::{Cli, run_cli};
use tidyfold::output::OutputFormatter;

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run_cli(cli) {
        OutputFormatter::error(&e);
        std::process::exit(1);
    }
}
