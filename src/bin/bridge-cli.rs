use clap::{Parser, Subcommand};
use serde_json::Value;

use rpc_bridge::RpcRequest;

#[derive(Parser)]
#[command(name = "bridge-cli")]
#[command(about = "Command-line client for a running RPC bridge", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:50051")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Execute a method
    Execute {
        method: String,
        /// JSON object payload
        #[arg(short, long, default_value = "{}")]
        payload: String,
        /// Downstream deadline in milliseconds
        #[arg(long)]
        timeout_ms: Option<u64>,
    },
    /// Compensate a method
    Compensate {
        method: String,
        #[arg(short, long, default_value = "{}")]
        payload: String,
        #[arg(long)]
        timeout_ms: Option<u64>,
    },
    /// Probe downstream health through the bridge
    Health,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();

    match cli.command {
        Commands::Execute { method, payload, timeout_ms } => {
            let request = build_request(method, &payload, timeout_ms)?;
            let res = client
                .post(format!("{}/rpc/execute", cli.url))
                .json(&request)
                .send()
                .await?;
            print_response(res).await?;
        }
        Commands::Compensate { method, payload, timeout_ms } => {
            let request = build_request(method, &payload, timeout_ms)?;
            let res = client
                .post(format!("{}/rpc/compensate", cli.url))
                .json(&request)
                .send()
                .await?;
            print_response(res).await?;
        }
        Commands::Health => {
            let res = client.get(format!("{}/rpc/health", cli.url)).send().await?;
            print_response(res).await?;
        }
    }

    Ok(())
}

fn build_request(
    method: String,
    payload: &str,
    timeout_ms: Option<u64>,
) -> Result<RpcRequest, serde_json::Error> {
    let payload: Value = serde_json::from_str(payload)?;
    let mut request = RpcRequest::new(method, payload);
    request.timeout_ms = timeout_ms;
    Ok(request)
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    if !status.is_success() {
        eprintln!("Error: bridge returned status {}", status);
        if let Ok(text) = res.text().await {
            eprintln!("Response: {}", text);
        }
        return Ok(());
    }

    let json: Value = res.json().await?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
