use clap::{Parser, Subcommand};
use serde_json::Value;

#[derive(Parser)]
#[command(name = "config-cli")]
#[command(about = "Client for a running configuration service", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8080")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check whether the configuration loaded
    Status,
    /// Show service version and configuration source
    Version,
    /// Export the configuration tree, or the subtree at PATH
    Tree {
        /// Slash-separated node path, e.g. traffic/cheapo
        path: Option<String>,
    },
    /// Resolve parameters for a search
    Match {
        /// Level and comma-separated terms, e.g. --level model=cheapo,luxuria
        #[arg(short, long = "level", value_parser = parse_level, required = true)]
        levels: Vec<(String, String)>,
    },
}

fn parse_level(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .map(|(level, terms)| (level.to_string(), terms.to_string()))
        .ok_or_else(|| format!("expected LEVEL=TERMS, got '{}'", raw))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let base = cli.url.trim_end_matches('/');

    let request = match cli.command {
        Commands::Status => client.get(format!("{}/status", base)),
        Commands::Version => client.get(format!("{}/version", base)),
        Commands::Tree { path } => {
            let path = path.unwrap_or_default();
            client.get(format!("{}/tree/{}", base, path.trim_start_matches('/')))
        }
        Commands::Match { levels } => client.get(format!("{}/tree", base)).query(&levels),
    };

    print_response(request.send().await?).await
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    if !status.is_success() {
        eprintln!("Error: service returned status {}", status);
        if let Ok(text) = res.text().await {
            eprintln!("Response: {}", text);
        }
        std::process::exit(1);
    }

    let json: Value = res.json().await?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
