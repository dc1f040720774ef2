use clap::{Parser, Subcommand};
use serde_json::{Map, Value};

#[derive(Parser)]
#[command(name = "gateway-cli")]
#[command(about = "Command-line client for the user gateway", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8080")]
    url: String,

    /// Value sent in the API-Version header.
    #[arg(long)]
    api_version: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a user id
    Validate { user_id: String },
    /// Register a user
    Register {
        #[arg(short, long)]
        email: String,
        /// Extra registration fields as key=value
        #[arg(short, long = "field", value_parser = parse_field)]
        fields: Vec<(String, String)>,
    },
    /// Liveness probe
    Health,
    /// Readiness probe (includes the user service)
    Ready,
}

fn parse_field(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .ok_or_else(|| format!("expected key=value, got '{raw}'"))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();

    let request = match cli.command {
        Commands::Validate { user_id } => {
            let mut url = reqwest::Url::parse(&cli.url)?;
            url.path_segments_mut()
                .map_err(|_| "gateway URL cannot be a base")?
                .pop_if_empty()
                .extend(["api", "users", user_id.as_str(), "validate"]);
            client.get(url)
        }
        Commands::Register { email, fields } => {
            let mut body = Map::new();
            body.insert("email".to_string(), Value::String(email));
            for (key, value) in fields {
                body.insert(key, Value::String(value));
            }
            client
                .post(format!("{}/api/users/register", cli.url.trim_end_matches('/')))
                .json(&body)
        }
        Commands::Health => client.get(format!("{}/health", cli.url.trim_end_matches('/'))),
        Commands::Ready => client.get(format!("{}/ready", cli.url.trim_end_matches('/'))),
    };

    let request = match &cli.api_version {
        Some(version) => request.header("API-Version", version),
        None => request,
    };

    print_response(request.send().await?).await
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    let text = res.text().await?;
    let pretty = serde_json::from_str::<Value>(&text)
        .and_then(|json| serde_json::to_string_pretty(&json))
        .unwrap_or(text);

    if !status.is_success() {
        eprintln!("Error: gateway returned status {}", status);
        eprintln!("{}", pretty);
        std::process::exit(1);
    }

    println!("{}", pretty);
    Ok(())
}
