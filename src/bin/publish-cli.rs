use clap::{Parser, Subcommand};
use reqwest::header::CONTENT_TYPE;
use reqwest::Url;
use serde_json::Value;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "publish-cli")]
#[command(about = "Publish payloads through the HStream HTTP server", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://127.0.0.1:6580")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Append one payload to a stream
    Publish {
        /// Target stream name
        stream: String,

        /// Read the payload from a file
        #[arg(short, long, conflicts_with = "data")]
        file: Option<PathBuf>,

        /// Inline payload
        #[arg(short, long)]
        data: Option<String>,

        /// Content-Type sent with the payload
        #[arg(short, long, default_value = "application/octet-stream")]
        content_type: String,

        /// Ordering key for the record
        #[arg(short, long)]
        key: Option<String>,
    },
    /// Check that the server is up
    Health,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let base = cli.url.trim_end_matches('/');

    match cli.command {
        Commands::Publish {
            stream,
            file,
            data,
            content_type,
            key,
        } => {
            let payload = match (file, data) {
                (Some(path), _) => tokio::fs::read(path).await?,
                (None, Some(text)) => text.into_bytes(),
                (None, None) => Vec::new(),
            };

            let mut request = client
                .post(publish_url(base, &stream)?)
                .header(CONTENT_TYPE, content_type)
                .body(payload);
            if let Some(key) = key {
                request = request.query(&[("key", key)]);
            }

            print_response(request.send().await?).await?;
        }
        Commands::Health => {
            let res = client.get(format!("{}/health", base)).send().await?;
            print_response(res).await?;
        }
    }

    Ok(())
}

/// `{base}/streams/{stream}:publish` with the stream name as a single,
/// percent-encoded path segment.
fn publish_url(base: &str, stream: &str) -> Result<Url, Box<dyn std::error::Error>> {
    let mut url = Url::parse(base)?;
    url.path_segments_mut()
        .map_err(|_| format!("{} cannot be used as a base URL", base))?
        .pop_if_empty()
        .push("streams")
        .push(&format!("{}:publish", stream));
    Ok(url)
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    let text = res.text().await?;
    let pretty = serde_json::from_str::<Value>(&text)
        .and_then(|json| serde_json::to_string_pretty(&json))
        .unwrap_or(text);

    if status.is_success() {
        println!("{}", pretty);
        Ok(())
    } else {
        eprintln!("Error: server returned status {}", status);
        eprintln!("{}", pretty);
        Err(format!("request failed with {}", status).into())
    }
}
