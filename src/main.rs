mod cli;
mod client;
mod config;
mod error;
mod failures;
mod links;
mod output;
mod summary;
mod types;

use std::process::ExitCode;

use clap::Parser;
use cli::Cli;
use console::style;
use log::info;

use crate::error::CircleStatsError;

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::init();

    output::print_banner();

    let cli = Cli::parse();
    info!("Starting circlestats");

    match cli.execute().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            report_error(&err);
            ExitCode::FAILURE
        }
    }
}

fn report_error(err: &anyhow::Error) {
    if let Some(CircleStatsError::NoFailingAction { build_num, steps }) =
        err.downcast_ref::<CircleStatsError>()
    {
        // Echo the step list to stdout so it can be piped into jq.
        println!("{steps}");
        eprintln!(
            "{}",
            style(format!(
                "Error: build {build_num} is marked failed but none of its actions failed"
            ))
            .red()
        );
        return;
    }

    eprintln!("{}", style(format!("Error: {err:#}")).red());
}
