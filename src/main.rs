//! knot-tools binary entry point.

use std::process::ExitCode;

use clap::Parser;
use knot_tools::cli::logging::{init_logging, LogFormat};
use knot_tools::cli::{run, Cli};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(LogFormat::from_env(), "info");

    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
