use clap::Parser;
use downsort::cli::{Cli, run_cli};
use downsort::output::OutputFormatter;

fn main() {
    let cli = Cli::parse();
    if let Err(message) = run_cli(cli) {
        OutputFormatter::error(&message);
        std::process::exit(1);
    }
}
