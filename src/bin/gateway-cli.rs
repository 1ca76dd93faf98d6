use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use serde_json::Value;

use workload_gateway::config::loader::parse_table;
use workload_gateway::config::schema::{SourceConfig, DEFAULT_SOURCE_URL};
use workload_gateway::config::{ConfigSource, ConfigStore, ConfigTable};
use workload_gateway::forward::{Forwarder, HttpUpstream};
use workload_gateway::providers::ProviderRegistry;
use workload_gateway::routing::plan_routes;

#[derive(Parser)]
#[command(name = "gateway-cli")]
#[command(about = "Management CLI for the workload gateway", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the live workload table of a running gateway
    Config {
        #[arg(short, long, default_value = "http://localhost:8080")]
        url: String,
    },
    /// Fetch a remote workloads document and print it as JSON
    Fetch {
        #[arg(short, long, default_value = DEFAULT_SOURCE_URL)]
        url: String,
    },
    /// Parse a local workloads document and print the routes it produces
    Check {
        file: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Config { url } => {
            let res = reqwest::get(format!("{}/config", url.trim_end_matches('/'))).await?;
            print_response(res).await?;
        }
        Commands::Fetch { url } => {
            let source = ConfigSource::new(&SourceConfig {
                url,
                ..SourceConfig::default()
            })?;
            let table = source.fetch().await?;
            println!("{}", serde_json::to_string_pretty(&table)?);
        }
        Commands::Check { file } => {
            let table = parse_table(&std::fs::read_to_string(&file)?)?;
            print_plan(&table);
        }
    }

    Ok(())
}

fn print_plan(table: &ConfigTable) {
    let registry = ProviderRegistry::builtin(
        Arc::new(ConfigStore::new()),
        Forwarder::new(Arc::new(HttpUpstream::default())),
    );
    let plan = plan_routes(table, &registry);

    for binding in &plan.bindings {
        println!(
            "{:<7} {:<32} -> {} ({})",
            binding.method.as_str(),
            binding.path,
            table[&binding.workload].host,
            binding.provider
        );
    }
    for (workload, reason) in &plan.skipped {
        eprintln!("skipped {workload}: {reason}");
    }
    println!(
        "{} workload(s) routed, {} skipped",
        plan.routed_workloads().len(),
        plan.skipped.len()
    );
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    if !status.is_success() {
        eprintln!("Error: gateway returned status {}", status);
        if let Ok(text) = res.text().await {
            eprintln!("Response: {}", text);
        }
        return Ok(());
    }

    let json: Value = res.json().await?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
