use clap::Parser;
use cmd_util::cli::{process_command, Cli};
use cmd_util::config::ConfigLoader;
use cmd_util::logging::setup_logging;
use cmd_util::{error_message, maybe_report_error, warning_message};
use std::process::exit;

fn main() {
    let cli = Cli::parse();

    if let Err(e) = setup_logging(cli.verbose) {
        warning_message!("{:#}", e);
    }

    let config = match cli.config.as_deref() {
        Some(path) => ConfigLoader::load_from(Some(path)),
        None => ConfigLoader::load(),
    };
    let config = match config {
        Ok(config) => config,
        Err(e) => {
            error_message!("{:#}", e);
            exit(1);
        }
    };

    if let Err(e) = process_command(cli.command, &config) {
        error_message!("{:#}", e);
        maybe_report_error(&e, &config, &config.report_endpoint);
        exit(1);
    }
}
