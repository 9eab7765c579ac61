// fybrik-cli/src/commands/solve.rs
//
// USE CASE: run the path solver once.

use std::path::PathBuf;

use anyhow::Context;
use comfy_table::Table;
use fybrik_core::domain::model::DataInfo;
use fybrik_core::domain::solver::PathSolver;
use fybrik_core::infrastructure::config::load_environment;

pub async fn execute(env: PathBuf, data_info: PathBuf) -> anyhow::Result<()> {
    let environment = load_environment(&env)
        .with_context(|| format!("failed to load environment manifest from {:?}", env))?;

    let content = std::fs::read_to_string(&data_info)
        .with_context(|| format!("failed to read data-info file {:?}", data_info))?;
    let data_info: DataInfo = serde_yaml::from_str(&content)
        .with_context(|| format!("failed to parse data-info YAML from {:?}", data_info))?;

    match PathSolver::solve(&environment, &data_info) {
        Ok(solution) => {
            println!("solved: {} edge(s)", solution.len());

            let mut table = Table::new();
            table.set_header(vec!["module", "capability", "cluster", "storage account", "actions"]);
            for edge in &solution.edges {
                table.add_row(vec![
                    edge.module.clone(),
                    format!("{:?}[{}]", edge.capability_kind, edge.capability_index),
                    edge.cluster.clone(),
                    edge.storage_account.clone().unwrap_or_else(|| "-".to_string()),
                    edge.actions.iter().map(|a| a.name.0.clone()).collect::<Vec<_>>().join(", "),
                ]);
            }
            println!("{table}");
        }
        Err(diagnostic) => {
            eprintln!("{:?}", miette::Report::new(diagnostic));
            std::process::exit(1);
        }
    }

    Ok(())
}
