use clap::{Parser, Subcommand};
use reqwest::header::AUTHORIZATION;
use reqwest::Method;
use serde_json::{Map, Value};

#[derive(Parser)]
#[command(name = "gateway-cli")]
#[command(about = "Command-line client for the action gateway", long_about = None)]
struct Cli {
    #[arg(short, long, env = "GATEWAY_URL", default_value = "http://localhost:8080")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Invoke a named action, e.g. `action getBoard -p boardId=abc`
    Action {
        name: String,
        /// HTTP method to use (GET, POST, PUT, DELETE)
        #[arg(short, long, default_value = "GET")]
        method: String,
        /// Parameters as key=value
        #[arg(short, long = "param", value_parser = parse_param)]
        params: Vec<(String, String)>,
    },
    /// Send a message to the assistant
    Chat { message: String },
    /// Forward a request to a raw upstream path
    Raw {
        path: String,
        #[arg(short, long, default_value = "GET")]
        method: String,
        /// Caller token, sent as a bearer token
        #[arg(short, long)]
        token: Option<String>,
    },
}

fn parse_param(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .ok_or_else(|| format!("expected key=value, got `{raw}`"))
}

fn parse_method(raw: &str) -> Result<Method, Box<dyn std::error::Error>> {
    Ok(Method::from_bytes(raw.to_ascii_uppercase().as_bytes())?)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let endpoint = format!("{}/", cli.url.trim_end_matches('/'));

    let res = match cli.command {
        Commands::Action { name, method, params } => {
            let method = parse_method(&method)?;
            let request = client.request(method.clone(), &endpoint);
            if method == Method::GET || method == Method::DELETE {
                let mut query = vec![("action".to_string(), name)];
                query.extend(params);
                request.query(&query).send().await?
            } else {
                let mut body = Map::new();
                body.insert("action".into(), Value::from(name));
                for (k, v) in params {
                    body.insert(k, Value::from(v));
                }
                request.json(&Value::Object(body)).send().await?
            }
        }
        Commands::Chat { message } => {
            client
                .post(&endpoint)
                .json(&serde_json::json!({ "action": "chat", "message": message }))
                .send()
                .await?
        }
        Commands::Raw { path, method, token } => {
            let mut request = client
                .request(parse_method(&method)?, &endpoint)
                .query(&[("path", path)]);
            if let Some(token) = token {
                request = request.header(AUTHORIZATION, format!("Bearer {token}"));
            }
            request.send().await?
        }
    };

    print_response(res).await
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    let text = res.text().await?;
    if !status.is_success() {
        eprintln!("Error: gateway returned status {}", status);
    }
    match serde_json::from_str::<Value>(&text) {
        Ok(json) => println!("{}", serde_json::to_string_pretty(&json)?),
        Err(_) => println!("{}", text),
    }
    Ok(())
}
