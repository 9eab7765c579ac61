// fybrik-cli/src/main.rs

mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    fybrik_core::infrastructure::logging::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Solve { env, data_info } => commands::solve::execute(env, data_info).await,
        Commands::Reconcile { env, request } => commands::reconcile::execute(env, request).await,
        Commands::Serve {
            env,
            metrics_bind_addr,
            leader_elect,
            enable_application_controller,
            enable_blueprint_controller,
            enable_plotter_controller,
            enable_all_controllers,
            namespace,
            max_iterations,
        } => {
            commands::serve::execute(commands::serve::ServeOptions {
                env,
                metrics_bind_addr,
                leader_elect,
                enable_application_controller,
                enable_blueprint_controller,
                enable_plotter_controller,
                enable_all_controllers,
                namespace,
                max_iterations,
            })
            .await
        }
    };

    if let Err(err) = result {
        eprintln!("error: {err:?}");
        std::process::exit(1);
    }

    Ok(())
}
