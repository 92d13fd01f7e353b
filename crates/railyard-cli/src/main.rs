//! Railyard CLI - Draw regular expressions as railroad diagrams

mod cli;
mod colorizer;

use clap::Parser;

fn main() {
    // Logging is initialized in run() once flags and environment are known
    let cli_args = cli::Cli::parse();
    let app = cli::RailyardApp::new();

    if let Err(e) = app.run(cli_args) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
