use clap::{Parser, Subcommand};
use reqwest::header::{HeaderValue, CONTENT_TYPE};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "forwardhook-cli")]
#[command(about = "Management CLI for the forwardhook relay", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8000")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check that the relay is up
    Health,
    /// Post a notification file to the relay
    Send {
        /// JSON file with an "items" notification
        #[arg(short, long)]
        file: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let base = cli.url.trim_end_matches('/');

    match cli.command {
        Commands::Health => {
            let res = client.get(format!("{}/health-check", base)).send().await?;
            print_status(res).await;
        }
        Commands::Send { file } => {
            let body = tokio::fs::read(&file).await?;
            serde_json::from_slice::<serde_json::Value>(&body)
                .map_err(|e| format!("{} is not valid JSON: {}", file.display(), e))?;

            let res = client
                .post(format!("{}/", base))
                .header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
                .body(body)
                .send()
                .await?;
            print_status(res).await;
        }
    }

    Ok(())
}

async fn print_status(res: reqwest::Response) {
    let status = res.status();
    if status.is_success() {
        println!("{}", status);
        return;
    }

    eprintln!("Error: relay returned status {}", status);
    if let Ok(text) = res.text().await {
        if !text.is_empty() {
            eprintln!("Response: {}", text);
        }
    }
}
