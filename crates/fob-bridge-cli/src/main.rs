//! fob-bridge CLI entry point: argument parsing, logging setup, and
//! command dispatch.

use clap::Parser;
use fob_bridge_cli::{cli, commands, error, logger, ui};
use miette::Result;

#[tokio::main]
async fn main() -> Result<()> {
    let args = cli::Cli::parse();

    logger::init_logger(args.verbose, args.quiet, args.no_color);
    ui::init_colors(args.no_color);

    let cwd = args.cwd;
    let result = match args.command {
        cli::Command::Resolve(resolve_args) => commands::resolve_execute(resolve_args, &cwd),
        cli::Command::Asset(asset_args) => commands::asset_execute(asset_args, &cwd),
        cli::Command::Csp(csp_args) => commands::csp_execute(csp_args, &cwd),
        cli::Command::Check(check_args) => commands::check_execute(check_args, &cwd),
        cli::Command::Serve(serve_args) => commands::serve_execute(serve_args, &cwd).await,
    };

    result.map_err(error::cli_error_to_miette)
}
