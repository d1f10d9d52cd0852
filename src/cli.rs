use anyhow::Result;
use clap::{Parser, Subcommand};
use log::info;
use serde::Serialize;
use std::path::PathBuf;

use crate::client::CircleClient;
use crate::config::Config;
use crate::failures;
use crate::output;
use crate::summary;

#[derive(Parser)]
#[command(name = "circlestats")]
#[command(author, version, about = "CircleCI build failure reporting", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(short = 'P', long, global = true, env = "CIRCLECI_PROJECT")]
    project: Option<String>,

    #[arg(short, long, global = true, env = "CIRCLECI_KEY")]
    key: Option<String>,

    #[arg(short, long, global = true)]
    output: Option<PathBuf>,

    #[arg(short, long, global = true, default_value_t = false)]
    pretty: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Show failures whose action name matches a filter
    Inspect {
        /// Case-insensitive substring matched against action names
        filter: String,

        #[arg(short, long, default_value_t = 25)]
        limit: usize,
    },
    /// Count failures grouped by step and action
    Stats {
        #[arg(short, long, default_value_t = 25)]
        limit: usize,
    },
    /// Show failure details for the most recent failed builds
    Last {
        #[arg(short, long, default_value_t = 25)]
        limit: usize,
    },
    /// Summarize recent builds per branch
    Info {
        #[arg(short, long, default_value_t = 25)]
        limit: usize,
    },
}

impl Cli {
    fn client(&self) -> crate::error::Result<CircleClient> {
        let config = Config::new(self.project.clone(), self.key.clone())?;
        CircleClient::new(&config)
    }

    fn emit<T: Serialize>(&self, value: &T) -> Result<()> {
        let json = if self.pretty {
            serde_json::to_string_pretty(value)?
        } else {
            serde_json::to_string(value)?
        };

        if let Some(output_path) = &self.output {
            std::fs::write(output_path, json)?;
            info!("Report written to: {}", output_path.display());
        } else {
            println!("{json}");
        }

        Ok(())
    }

    async fn execute_inspect(&self, filter: &str, limit: usize) -> Result<()> {
        info!("Inspecting failures matching '{filter}'");

        let client = self.client()?;
        let failures = failures::collect_failures(&client, limit).await?;
        let matching = failures::filter_by_action(&failures, filter);

        self.emit(&matching)
    }

    async fn execute_stats(&self, limit: usize) -> Result<()> {
        info!("Counting failures across the last {limit} failed builds");

        let client = self.client()?;
        let failures = failures::collect_failures(&client, limit).await?;
        let ranked = failures::rank_by_count(failures::aggregate(&failures));

        self.emit(&ranked)
    }

    async fn execute_last(&self, limit: usize) -> Result<()> {
        info!("Collecting failure details for the last {limit} failed builds");

        let client = self.client()?;
        let failures = failures::collect_failures(&client, limit).await?;

        self.emit(&failures)
    }

    async fn execute_info(&self, limit: usize) -> Result<()> {
        info!("Summarizing the last {limit} builds");

        let client = self.client()?;
        let builds = client.recent_builds(limit, None).await?;
        let summary = summary::summarize(&builds);

        if self.output.is_some() {
            self.emit(&summary)
        } else {
            output::print_summary(client.project(), &summary);
            Ok(())
        }
    }

    pub async fn execute(&self) -> Result<()> {
        match &self.command {
            Commands::Inspect { filter, limit } => self.execute_inspect(filter, *limit).await,
            Commands::Stats { limit } => self.execute_stats(*limit).await,
            Commands::Last { limit } => self.execute_last(*limit).await,
            Commands::Info { limit } => self.execute_info(*limit).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_command_surface_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_limit_defaults_to_25() {
        let cli = Cli::try_parse_from(["circlestats", "stats"]).unwrap();
        match cli.command {
            Commands::Stats { limit } => assert_eq!(limit, 25),
            _ => panic!("expected the stats subcommand"),
        }
    }

    #[test]
    fn test_inspect_takes_a_filter_and_global_flags() {
        let cli = Cli::try_parse_from([
            "circlestats",
            "inspect",
            "timeout",
            "--limit",
            "5",
            "-P",
            "org/repo",
            "--pretty",
        ])
        .unwrap();

        assert!(cli.pretty);
        assert_eq!(cli.project.as_deref(), Some("org/repo"));
        match cli.command {
            Commands::Inspect { filter, limit } => {
                assert_eq!(filter, "timeout");
                assert_eq!(limit, 5);
            }
            _ => panic!("expected the inspect subcommand"),
        }
    }

    #[test]
    fn test_inspect_requires_a_filter() {
        assert!(Cli::try_parse_from(["circlestats", "inspect"]).is_err());
    }
}
