//! aiwork CLI Binary
//!
//! Command-line entry point: stdio tool server, plugin bridge, and workspace commands.

use aiwork::logging::init_logging;
use aiwork::tooling::cli::{Cli, CliContext};
use clap::Parser;
use std::process;

fn main() {
    let cli = Cli::parse();

    let context = match CliContext::new(cli.workspace.clone(), cli.config.clone()) {
        Ok(ctx) => ctx,
        Err(e) => {
            eprintln!("Error initializing workspace: {}", e);
            process::exit(1);
        }
    };

    // CLI flags override the config file's logging section
    let mut logging = context.tool_context().config().logging.clone();
    if let Some(level) = &cli.log_level {
        logging.level = level.clone();
    }
    if let Some(format) = &cli.log_format {
        logging.format = format.clone();
    }
    if let Some(output) = &cli.log_output {
        logging.output = output.clone();
    }
    if cli.log_file.is_some() {
        logging.file = cli.log_file.clone();
    }
    if let Err(e) = init_logging(Some(&logging)) {
        eprintln!("Warning: logging disabled: {}", e);
    }

    match context.execute(&cli.command) {
        Ok(output) => {
            if !output.is_empty() {
                println!("{}", output);
            }
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}
