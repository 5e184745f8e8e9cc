use clap::{Parser, Subcommand};
use serde_json::Value;
use std::process::ExitCode;
use std::time::Duration;
use url::Url;

use faculty_gateway::resolver::probe;

#[derive(Parser)]
#[command(name = "gateway-cli")]
#[command(about = "Management CLI for the faculty admin gateway", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:3000")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the gateway's current endpoint decision
    Status,
    /// Probe a backend base URL from this machine
    Probe {
        /// Backend base URL to probe
        target: String,

        /// Probe timeout in milliseconds
        #[arg(long, default_value_t = 5000)]
        timeout_ms: u64,
    },
}

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();

    match cli.command {
        Commands::Status => {
            let res = client
                .get(format!("{}/resolver/status", cli.url.trim_end_matches('/')))
                .send()
                .await?;
            print_response(res).await
        }
        Commands::Probe { target, timeout_ms } => {
            let target = Url::parse(&target)?;
            if probe(&client, &target, Duration::from_millis(timeout_ms)).await {
                println!("{} reachable", target);
                Ok(ExitCode::SUCCESS)
            } else {
                println!("{} unreachable", target);
                Ok(ExitCode::FAILURE)
            }
        }
    }
}

async fn print_response(res: reqwest::Response) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let status = res.status();
    if !status.is_success() {
        eprintln!("Error: gateway returned status {}", status);
        if let Ok(text) = res.text().await {
            eprintln!("Response: {}", text);
        }
        return Ok(ExitCode::FAILURE);
    }

    let json: Value = res.json().await?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(ExitCode::SUCCESS)
}
