// rewrite/src/main.rs
//! Rewrite entry point.
//!
//! Parses arguments, sets up logging and hands off to the selected command.
//! The process exit code is the one the command reports.

use clap::Parser;
use log::LevelFilter;

use rewrite::cli::Cli;
use rewrite::commands::{self, EXIT_ERROR};
use rewrite::logger;
use rewrite::ui::output_format;

fn main() {
    let cli = Cli::parse();

    let level = if cli.quiet {
        Some(LevelFilter::Off)
    } else if cli.debug {
        Some(LevelFilter::Debug)
    } else {
        None
    };
    logger::init_logger(level);

    let code = match commands::run(cli) {
        Ok(code) => code,
        Err(e) => {
            output_format::error_msg(format!("{:#}", e));
            EXIT_ERROR
        }
    };

    std::process::exit(code);
}
