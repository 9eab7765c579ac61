// fybrik-cli/src/cli.rs

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "fybrik-solver")]
#[command(about = "Solver, reconciler and host process for a data-governance control plane", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the path solver once against an environment + one asset's request.
    Solve {
        /// YAML environment manifest (clusters/modules/storage accounts).
        #[arg(long)]
        env: PathBuf,

        /// YAML `DataInfo` describing the asset to solve for.
        #[arg(long)]
        data_info: PathBuf,
    },

    /// Run one synchronous reconciliation pass against a fixture request.
    Reconcile {
        /// YAML environment manifest.
        #[arg(long)]
        env: PathBuf,

        /// YAML reconcile request.
        #[arg(long)]
        request: PathBuf,
    },

    /// Bootstrap the long-running host process.
    Serve {
        /// YAML environment manifest the in-process worker pool reconciles against.
        #[arg(long)]
        env: PathBuf,

        #[arg(long, default_value = ":8080")]
        metrics_bind_addr: String,

        #[arg(long, default_value = "false")]
        leader_elect: bool,

        #[arg(long, default_value = "true")]
        enable_application_controller: bool,

        #[arg(long, default_value = "false")]
        enable_blueprint_controller: bool,

        #[arg(long, default_value = "false")]
        enable_plotter_controller: bool,

        #[arg(long, default_value = "false")]
        enable_all_controllers: bool,

        #[arg(long, default_value = "fybrik-system")]
        namespace: String,

        /// Number of poll iterations before exiting; omit to run forever.
        #[arg(long)]
        max_iterations: Option<u64>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_solve_with_required_flags() {
        let cli = Cli::parse_from(["fybrik-solver", "solve", "--env", "env.yaml", "--data-info", "asset.yaml"]);
        match cli.command {
            Commands::Solve { env, data_info } => {
                assert_eq!(env, PathBuf::from("env.yaml"));
                assert_eq!(data_info, PathBuf::from("asset.yaml"));
            }
            _ => panic!("expected Solve command"),
        }
    }

    #[test]
    fn parses_serve_defaults() {
        let cli = Cli::parse_from(["fybrik-solver", "serve", "--env", "env.yaml"]);
        match cli.command {
            Commands::Serve { namespace, enable_application_controller, leader_elect, .. } => {
                assert_eq!(namespace, "fybrik-system");
                assert!(enable_application_controller);
                assert!(!leader_elect);
            }
            _ => panic!("expected Serve command"),
        }
    }
}
