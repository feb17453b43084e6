use clap::{Parser, Subcommand};
use serde_json::{json, Value};

#[derive(Parser)]
#[command(name = "gateway-cli")]
#[command(about = "Command-line client for the multisig gateway", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8080")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the latest block number seen by the gateway
    BlockNumber,
    /// Check gateway liveness
    Health,
    /// Queue a transaction on the multisig
    Submit {
        /// Destination address
        #[arg(long)]
        to: String,
        /// Value in wei (base-10)
        #[arg(long, default_value = "0")]
        value: String,
        /// Hex calldata for the destination
        #[arg(long, default_value = "")]
        data: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let base = cli.url.trim_end_matches('/');

    let res = match cli.command {
        Commands::BlockNumber => client.get(format!("{base}/block-number")).send().await?,
        Commands::Health => client.get(format!("{base}/health")).send().await?,
        Commands::Submit { to, value, data } => {
            client
                .post(format!("{base}/submit-transaction"))
                .json(&json!({ "to": to, "value": value, "data": data }))
                .send()
                .await?
        }
    };

    print_response(res).await
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    let text = res.text().await?;

    if !status.is_success() {
        eprintln!("Error: gateway returned status {status}");
        eprintln!("Response: {text}");
        std::process::exit(1);
    }

    match serde_json::from_str::<Value>(&text) {
        Ok(json) => println!("{}", serde_json::to_string_pretty(&json)?),
        Err(_) => println!("{text}"),
    }
    Ok(())
}
