//! Command-line front end: send one request through the egress sidecar.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use serde_json::Value;

use envoy_client::config::loader::load_config;
use envoy_client::observability::{logging, metrics};
use envoy_client::{ClientConfig, RequestBuilder, RetryOn};

#[derive(Parser)]
#[command(name = "envoy-client")]
#[command(about = "Send a request to a mesh service through the Envoy egress proxy", long_about = None)]
struct Cli {
    /// TOML config with egress, retry and header defaults
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Egress base address (overrides config and CLIENT_EGRESS)
    #[arg(short, long)]
    egress: Option<String>,

    /// Target service name
    #[arg(short, long)]
    service: String,

    /// Value for x-envoy-max-retries
    #[arg(short, long, allow_negative_numbers = true)]
    retries: Option<i64>,

    /// Value for x-envoy-retry-on (e.g. 5xx, reset, connect-failure)
    #[arg(long)]
    retry_on: Option<RetryOn>,

    /// Extra header as "name: value"; may repeat
    #[arg(short = 'H', long = "header", value_parser = parse_header)]
    headers: Vec<(String, String)>,

    /// Attach a fresh x-request-id
    #[arg(long)]
    request_id: bool,

    #[arg(value_enum)]
    method: HttpMethod,

    /// Request path, starting with '/'
    path: String,
}

#[derive(Clone, Copy, ValueEnum)]
enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

fn parse_header(raw: &str) -> Result<(String, String), String> {
    let (name, value) = raw
        .split_once(':')
        .ok_or_else(|| format!("expected 'name: value', got '{}'", raw))?;
    Ok((name.trim().to_string(), value.trim().to_string()))
}

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => ClientConfig::default(),
    };

    logging::init_logging(&config.observability)?;
    metrics::set_enabled(config.observability.metrics_enabled);

    // Logged here: the subscriber does not exist until the config is read.
    tracing::info!(
        config = ?cli.config,
        egress = config.egress.as_deref().unwrap_or("<env or default>"),
        default_headers = config.headers.len(),
        "Configuration loaded"
    );

    let mut request = RequestBuilder::from_config(&config)?;
    if let Some(egress) = &cli.egress {
        request.egress(egress.clone());
    }
    request.service(cli.service.clone());
    if let Some(retries) = cli.retries {
        request.retries(retries);
    }
    if let Some(policy) = cli.retry_on {
        request.retry_on(policy);
    }
    for (name, value) in &cli.headers {
        request.header(name.clone(), value.clone());
    }
    if cli.request_id {
        request.request_id();
    }

    match cli.method {
        HttpMethod::Get => request.get(&cli.path),
        HttpMethod::Post => request.post(&cli.path),
        HttpMethod::Put => request.put(&cli.path),
        HttpMethod::Delete => request.delete(&cli.path),
    };

    tracing::info!(uri = %request.uri(), "Sending request");
    let response = request.send().await?;
    print_response(response).await
}

async fn print_response(res: reqwest::Response) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let status = res.status();
    let is_json = res
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("application/json"));
    let text = res.text().await?;

    if !status.is_success() {
        eprintln!("Error: upstream returned status {}", status);
        if !text.is_empty() {
            eprintln!("Response: {}", text);
        }
        return Ok(ExitCode::FAILURE);
    }

    println!("Status: {}", status);
    match serde_json::from_str::<Value>(&text) {
        Ok(json) if is_json => println!("{}", serde_json::to_string_pretty(&json)?),
        _ => println!("{}", text),
    }
    Ok(ExitCode::SUCCESS)
}
