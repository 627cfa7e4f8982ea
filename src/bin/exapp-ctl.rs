use clap::{Parser, Subcommand};
use reqwest::Method;
use serde_json::Value;

use exapp_shim::host::AppCredentials;

#[derive(Parser)]
#[command(name = "exapp-ctl")]
#[command(about = "Call the ExApp shim's lifecycle endpoints as the host would", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://127.0.0.1:9030")]
    url: String,

    #[arg(long, env = "APP_ID", default_value = "visionatrix")]
    app_id: String,

    #[arg(long, env = "APP_VERSION", default_value = "1.0.0")]
    app_version: String,

    #[arg(long, env = "APP_SECRET", default_value = "")]
    secret: String,

    #[arg(long, env = "AA_VERSION", default_value = "2.0.0")]
    aa_version: String,

    /// Nextcloud user the call is made for.
    #[arg(long, default_value = "admin")]
    user: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Liveness probe
    Heartbeat,
    /// Start model fetching
    Init,
    /// Register the app's UI entry
    Enable,
    /// Remove the app's UI entry
    Disable,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();

    let credentials = AppCredentials {
        app_id: cli.app_id,
        app_version: cli.app_version,
        secret: cli.secret,
        aa_version: cli.aa_version,
    };
    let headers = credentials.signed_headers(&cli.user)?;

    let (method, path) = match cli.command {
        Commands::Heartbeat => (Method::GET, "heartbeat"),
        Commands::Init => (Method::POST, "init"),
        Commands::Enable => (Method::PUT, "enabled?enabled=true"),
        Commands::Disable => (Method::PUT, "enabled?enabled=false"),
    };

    let res = client
        .request(method, format!("{}/{}", cli.url.trim_end_matches('/'), path))
        .headers(headers)
        .send()
        .await?;
    print_response(res).await
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    if !status.is_success() {
        eprintln!("Error: shim returned status {}", status);
        if let Ok(text) = res.text().await {
            eprintln!("Response: {}", text);
        }
        return Ok(());
    }

    let json: Value = res.json().await?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
